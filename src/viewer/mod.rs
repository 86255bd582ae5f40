//! Terminal waveform/spectrum viewer.
//!
//! Takes over the terminal until the user quits, so calls block. Clips are only
//! read, never modified.

use std::time::Duration;

use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::style::Color;
use tracing::{info, warn};

use crate::clip::Clip;
use crate::error::Result;

mod input;
mod mode;
mod view;

pub use input::ViewerEvent;
pub use mode::{ViewMode, ViewerState};
pub use view::{Trace, peak_location, spectrogram_cells, spectrum_points, waveform_points};

const TICK: Duration = Duration::from_millis(50);

/// Shows one clip: waveform, zoom, spectrum, spectrogram and peak readout.
pub fn view(clip: &Clip) -> Result<()> {
    run(vec![Trace {
        name: "Audio".to_string(),
        clip,
        color: Color::Blue,
    }])
}

/// Shows two clips' waveforms on the same axes for comparison.
pub fn view_with(clip: &Clip, other: &Clip) -> Result<()> {
    run(vec![
        Trace {
            name: "Audio 1 (Blue)".to_string(),
            clip,
            color: Color::Blue,
        },
        Trace {
            name: "Audio 2 (Red)".to_string(),
            clip: other,
            color: Color::Red,
        },
    ])
}

impl Clip {
    pub fn view(&self) -> Result<()> {
        view(self)
    }

    pub fn view_with(&self, other: &Clip) -> Result<()> {
        view_with(self, other)
    }
}

/// Applies one key event. Returns `false` once the viewer should close.
pub fn apply(state: &mut ViewerState, event: ViewerEvent, dual: bool) -> bool {
    match event {
        ViewerEvent::Quit => return false,
        ViewerEvent::ShowWaveform => state.mode = ViewMode::Waveform,
        ViewerEvent::ShowSpectrum if !dual => state.mode = ViewMode::Spectrum,
        ViewerEvent::ShowSpectrum => {}
        ViewerEvent::ShowSpectrogram if !dual => state.mode = ViewMode::Spectrogram,
        ViewerEvent::ShowSpectrogram => {}
        ViewerEvent::TogglePeak => state.show_peak = !state.show_peak,
        ViewerEvent::ZoomIn => state.zoom_in(),
        ViewerEvent::ZoomOut => state.zoom_out(),
        ViewerEvent::PanLeft => state.pan(-0.25),
        ViewerEvent::PanRight => state.pan(0.25),
        ViewerEvent::Reset => state.reset(),
    }
    true
}

fn run(traces: Vec<Trace<'_>>) -> Result<()> {
    if let Some(empty) = traces.iter().find(|t| t.clip.is_empty()) {
        warn!("{} has no samples to display", empty.name);
        return Ok(());
    }
    let duration = traces.iter().map(|t| t.clip.length_ms()).fold(0.0, f64::max);
    let mut state = ViewerState::new(duration);

    terminal::enable_raw_mode()?;
    let _guard = TerminalGuard; // restores the terminal however we leave
    crossterm::execute!(std::io::stdout(), EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(std::io::stdout());
    let mut term = Terminal::new(backend)?;
    term.clear()?;
    info!(clips = traces.len(), "viewer opened");

    loop {
        term.draw(|frame| {
            let area = frame.area();
            view::render(frame, area, &traces, &state);
        })?;
        let Some(event) = input::poll_input(TICK)? else {
            continue;
        };
        if !apply(&mut state, event, traces.len() > 1) {
            break;
        }
    }
    info!("viewer closed");
    Ok(())
}

struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = crossterm::execute!(std::io::stdout(), LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}
