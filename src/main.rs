use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use clipkit::config::{self, Settings};
use clipkit::{Clip, Waveform, generate_note_with};
use tracing::warn;

const USAGE: &str = "usage:
  clipkit info <file>
  clipkit play <file>
  clipkit view <file> [other-file]
  clipkit note <name> <duration-ms> <waveform> [out.wav]
  clipkit demo [out.wav]";

fn main() {
    // stdout belongs to the viewer
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    if let Err(e) = run() {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let cwd = std::env::current_dir().unwrap_or_default();
    let settings = config::load_settings(&cwd).unwrap_or_else(|e| {
        warn!("ignoring settings: {e}");
        Settings::default()
    });

    let args: Vec<String> = std::env::args().skip(1).collect();
    let args: Vec<&str> = args.iter().map(String::as_str).collect();
    match args.as_slice() {
        ["info", path] => info(Path::new(path), &settings),
        ["play", path] => {
            Clip::open(path)?.play();
            Ok(())
        }
        ["view", path] => Ok(Clip::open(path)?.view()?),
        ["view", path, other] => Ok(Clip::open(path)?.view_with(&Clip::open(other)?)?),
        ["note", name, duration_ms, waveform, rest @ ..] => {
            let duration_ms: u64 = duration_ms
                .parse()
                .with_context(|| format!("duration must be whole milliseconds, got {duration_ms:?}"))?;
            let waveform: Waveform = waveform.parse()?;
            let clip = generate_note_with(&settings, name, duration_ms, waveform, 0.0)?;
            let pitch = clip.pitch_at_time_with_window(clip.length_ms() / 2.0, settings.pitch_window_ms)?;
            println!("{name}: {waveform}, {duration_ms}ms, measured pitch {pitch:.1} Hz");
            finish(&clip, rest.first().map(PathBuf::from))
        }
        ["demo", rest @ ..] => finish(&demo(&settings)?, rest.first().map(PathBuf::from)),
        _ => {
            eprintln!("{USAGE}");
            bail!("unrecognised arguments: {}", args.join(" "))
        }
    }
}

fn info(path: &Path, settings: &Settings) -> anyhow::Result<()> {
    let clip = Clip::open(path)?;
    println!("{}", path.display());
    println!("  duration:      {:.1}ms", clip.length_ms());
    println!("  frame rate:    {} Hz", clip.frame_rate());
    println!("  channels:      {}", clip.channels());
    println!("  sample width:  {} bytes", clip.sample_width());
    if clip.is_empty() {
        return Ok(());
    }
    println!("  peak:          {}", clip.peak_amplitude());
    println!("  average:       {:.1}", clip.average_amplitude(0.0, None)?);
    let middle = clip.length_ms() / 2.0;
    println!(
        "  pitch @ {middle:.0}ms: {:.1} Hz",
        clip.pitch_at_time_with_window(middle, settings.pitch_window_ms)?
    );
    Ok(())
}

// A short arpeggio over a looped bass note, swelling at the end.
fn demo(settings: &Settings) -> clipkit::Result<Clip> {
    let mut melody = Clip::new();
    for name in ["C4", "E4", "G4", "C5"] {
        melody += &generate_note_with(settings, name, 300, Waveform::Triangle, -6.0)?;
    }
    melody *= 2;

    let bass = generate_note_with(settings, "C2", 600, Waveform::Sine, -9.0)?;
    melody.overlay(&bass, 0, true);
    melody.crescendo(melody.length_ms() / 2.0, None, 1.4)?;
    melody.fade_out(200);
    Ok(melody)
}

fn finish(clip: &Clip, out: Option<PathBuf>) -> anyhow::Result<()> {
    match out {
        Some(path) => {
            clip.save(&path).with_context(|| format!("saving {}", path.display()))?;
            println!("wrote {}", path.display());
        }
        None => clip.play(),
    }
    Ok(())
}
