use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEventKind};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewerEvent {
    ShowWaveform,
    ShowSpectrum,
    ShowSpectrogram,
    TogglePeak,
    ZoomIn,
    ZoomOut,
    PanLeft,
    PanRight,
    Reset,
    Quit,
}

// poll for a key press and translate it; `None` on timeout or unbound keys
pub fn poll_input(timeout: Duration) -> std::io::Result<Option<ViewerEvent>> {
    if !event::poll(timeout)? {
        return Ok(None);
    }
    if let Event::Key(key) = event::read()? {
        if key.kind != KeyEventKind::Press {
            return Ok(None);
        }
        return Ok(map_key(key.code));
    }
    Ok(None)
}

pub fn map_key(code: KeyCode) -> Option<ViewerEvent> {
    let event = match code {
        KeyCode::Esc | KeyCode::Char('q') => ViewerEvent::Quit,
        KeyCode::Char('w') => ViewerEvent::ShowWaveform,
        KeyCode::Char('f') => ViewerEvent::ShowSpectrum,
        KeyCode::Char('s') => ViewerEvent::ShowSpectrogram,
        KeyCode::Char('p') => ViewerEvent::TogglePeak,
        KeyCode::Char('+' | '=') | KeyCode::Up => ViewerEvent::ZoomIn,
        KeyCode::Char('-') | KeyCode::Down => ViewerEvent::ZoomOut,
        KeyCode::Left | KeyCode::Char('h') => ViewerEvent::PanLeft,
        KeyCode::Right | KeyCode::Char('l') => ViewerEvent::PanRight,
        KeyCode::Char('0') => ViewerEvent::Reset,
        _ => return None,
    };
    Some(event)
}
