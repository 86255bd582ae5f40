use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::symbols::Marker;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph};

use super::mode::{ViewMode, ViewerState};
use crate::clip::{Clip, positive_spectrum};

/// One clip on screen, with the legend name and colour it is drawn in.
pub struct Trace<'a> {
    pub name: String,
    pub clip: &'a Clip,
    pub color: Color,
}

pub fn render(frame: &mut Frame, area: Rect, traces: &[Trace<'_>], state: &ViewerState) {
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(8),    // plot
            Constraint::Length(4), // readout + key help
        ])
        .split(area);

    // braille cells hold 2 dots across
    let max_points = (sections[0].width as usize).max(1) * 2;
    match state.mode {
        ViewMode::Waveform => draw_waveform(frame, sections[0], traces, state, max_points),
        ViewMode::Spectrum => draw_spectrum(frame, sections[0], &traces[0], state, max_points),
        ViewMode::Spectrogram => draw_spectrogram(frame, sections[0], &traces[0], state),
    }
    draw_status(frame, sections[1], traces, state);
}

fn draw_waveform(frame: &mut Frame, area: Rect, traces: &[Trace<'_>], state: &ViewerState, max_points: usize) {
    let series: Vec<Vec<(f64, f64)>> = traces
        .iter()
        .map(|t| waveform_points(t.clip, state.start_ms, state.end_ms, max_points))
        .collect();
    let datasets: Vec<Dataset<'_>> = traces
        .iter()
        .zip(&series)
        .map(|(t, points)| {
            Dataset::default()
                .name(t.name.clone())
                .marker(Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(t.color))
                .data(points)
        })
        .collect();

    let (x0, x1) = (state.start_ms / 1000.0, state.end_ms / 1000.0);
    let title = if state.is_zoomed() {
        format!(" Zoomed waveform {x0:.2}s - {x1:.2}s ")
    } else {
        " Waveform ".to_string()
    };
    let chart = Chart::new(datasets)
        .block(Block::default().title(title).borders(Borders::ALL))
        .x_axis(
            Axis::default()
                .title("Time (s)")
                .bounds([x0, x1])
                .labels([format!("{x0:.2}"), format!("{:.2}", (x0 + x1) / 2.0), format!("{x1:.2}")]),
        )
        .y_axis(
            Axis::default()
                .title("Amplitude")
                .bounds([Clip::MIN_AMPLITUDE as f64, Clip::MAX_AMPLITUDE as f64])
                .labels(["-32768", "0", "32767"]),
        );
    frame.render_widget(chart, area);
}

fn draw_spectrum(frame: &mut Frame, area: Rect, trace: &Trace<'_>, state: &ViewerState, max_points: usize) {
    let block = Block::default().title(" Frequency spectrum (FFT) ").borders(Borders::ALL);
    let points = spectrum_points(trace.clip, state.start_ms, state.end_ms, max_points);
    let Some(top) = points.iter().map(|p| p.1).reduce(f64::max).filter(|&m| m > 0.0) else {
        frame.render_widget(Paragraph::new("No frequency content in this window.").block(block), area);
        return;
    };

    let nyquist = trace.clip.frame_rate() as f64 / 2.0;
    let datasets = vec![
        Dataset::default()
            .name(trace.name.clone())
            .marker(Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(trace.color))
            .data(&points),
    ];
    let chart = Chart::new(datasets)
        .block(block)
        .x_axis(
            Axis::default()
                .title("Frequency (Hz)")
                .bounds([0.0, nyquist])
                .labels(["0".to_string(), format!("{:.0}", nyquist / 2.0), format!("{nyquist:.0}")]),
        )
        .y_axis(
            Axis::default()
                .title("Magnitude")
                .bounds([0.0, top * 1.05])
                .labels(["0".to_string(), format!("{top:.0}")]),
        );
    frame.render_widget(chart, area);
}

fn draw_spectrogram(frame: &mut Frame, area: Rect, trace: &Trace<'_>, state: &ViewerState) {
    let block = Block::default().title(" Spectrogram ").borders(Borders::ALL);
    let inner = block.inner(area);
    let rows = inner.height as usize;
    let cells = spectrogram_cells(trace.clip, state.start_ms, state.end_ms, inner.width as usize, rows);
    if cells.is_empty() {
        frame.render_widget(Paragraph::new("Not enough audio in this window.").block(block), area);
        return;
    }

    // highest band on the top row
    let lines: Vec<Line<'_>> = (0..rows)
        .rev()
        .map(|band| {
            let spans: Vec<Span<'_>> = cells
                .iter()
                .map(|column| Span::styled(" ", Style::default().bg(heat(column[band]))))
                .collect();
            Line::from(spans)
        })
        .collect();
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn heat(level: f64) -> Color {
    const RAMP: [Color; 6] = [Color::Black, Color::Blue, Color::Magenta, Color::Red, Color::Yellow, Color::White];
    RAMP[(level.clamp(0.0, 1.0) * (RAMP.len() - 1) as f64).round() as usize]
}

fn draw_status(frame: &mut Frame, area: Rect, traces: &[Trace<'_>], state: &ViewerState) {
    let mut lines = Vec::new();
    for t in traces {
        let mut text = format!(
            "{}: {:.0}ms @ {} Hz, {} ch",
            t.name,
            t.clip.length_ms(),
            t.clip.frame_rate(),
            t.clip.channels()
        );
        if state.show_peak {
            if let Some((peak, at_ms)) = peak_location(t.clip) {
                text.push_str(&format!("  | peak amplitude {peak} at {:.3}s", at_ms / 1000.0));
            }
        }
        lines.push(Line::styled(text, Style::default().fg(t.color)));
    }
    let help = if traces.len() > 1 {
        "[w] waveform  [+/-] zoom  [</>] pan  [0] reset  [p] peak  [q] quit"
    } else {
        "[w] waveform  [f] spectrum  [s] spectrogram  [+/-] zoom  [</>] pan  [0] reset  [p] peak  [q] quit"
    };
    lines.push(Line::from(help));
    frame.render_widget(Paragraph::new(lines).block(Block::default().borders(Borders::TOP)), area);
}

/// Min/max envelope of the clip between two times, at most `max_points` points,
/// as `(seconds, amplitude)` pairs.
pub fn waveform_points(clip: &Clip, start_ms: f64, end_ms: f64, max_points: usize) -> Vec<(f64, f64)> {
    let format = clip.format();
    let start = format.frame_index(start_ms).min(clip.frame_count());
    let mono = clip.mono_frames(start, format.frame_index(end_ms));
    if mono.is_empty() {
        return Vec::new();
    }

    let buckets = (max_points / 2).max(1);
    let per_bucket = mono.len().div_ceil(buckets);
    let seconds = |i: usize| format.duration_ms(start + i) / 1000.0;
    if per_bucket <= 1 {
        return mono.iter().enumerate().map(|(i, &v)| (seconds(i), v)).collect();
    }

    let mut points = Vec::with_capacity(buckets * 2);
    for (b, chunk) in mono.chunks(per_bucket).enumerate() {
        let lo = chunk.iter().copied().fold(f64::INFINITY, f64::min);
        let hi = chunk.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let t = seconds(b * per_bucket);
        points.push((t, lo));
        points.push((t, hi));
    }
    points
}

/// Spectrum of the window, thinned to `max_points` by keeping the strongest bin
/// of each group.
pub fn spectrum_points(clip: &Clip, start_ms: f64, end_ms: f64, max_points: usize) -> Vec<(f64, f64)> {
    let Ok(bins) = clip.spectrum(start_ms, Some(end_ms)) else {
        return Vec::new();
    };
    let per_point = bins.len().div_ceil(max_points.max(1)).max(1);
    bins.chunks(per_point)
        .filter_map(|group| {
            group
                .iter()
                .max_by(|a, b| a.magnitude.total_cmp(&b.magnitude))
                .map(|b| (b.frequency, b.magnitude))
        })
        .collect()
}

/// Short-time spectra of the window: up to `columns` equal time slices, each
/// split into `rows` frequency bands (lowest first) holding the strongest bin's
/// magnitude on a decibel scale, normalised to `0.0..=1.0` across the grid.
/// Empty when there is not enough audio for two samples per slice.
pub fn spectrogram_cells(clip: &Clip, start_ms: f64, end_ms: f64, columns: usize, rows: usize) -> Vec<Vec<f64>> {
    let format = clip.format();
    let mono = clip.mono_frames(format.frame_index(start_ms), format.frame_index(end_ms));
    let columns = columns.min(mono.len() / 4);
    if columns == 0 || rows == 0 {
        return Vec::new();
    }

    let per_column = mono.len() / columns;
    let mut cells: Vec<Vec<f64>> = mono
        .chunks_exact(per_column)
        .take(columns)
        .map(|slice| {
            let bins = positive_spectrum(slice, format.frame_rate);
            (0..rows)
                .map(|band| {
                    let (lo, hi) = (band * bins.len() / rows, (band + 1) * bins.len() / rows);
                    let strongest = bins[lo..hi].iter().map(|b| b.magnitude).fold(0.0, f64::max);
                    20.0 * (strongest + 1.0).log10()
                })
                .collect()
        })
        .collect();

    let top = cells.iter().flatten().copied().fold(0.0, f64::max);
    if top > 0.0 {
        cells.iter_mut().flatten().for_each(|level| *level /= top);
    }
    cells
}

/// Loudest sample and the time it occurs at, in ms.
pub fn peak_location(clip: &Clip) -> Option<(i32, f64)> {
    let (index, peak) = clip
        .samples()
        .iter()
        .enumerate()
        .map(|(i, &s)| (i, (s as i32).abs()))
        .max_by_key(|&(_, a)| a)?;
    Some((peak, clip.format().duration_ms(index / clip.channels())))
}
