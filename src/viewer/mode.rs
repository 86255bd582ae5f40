// What the viewer is currently showing. Pure state, no terminal access.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewMode {
    Waveform,
    Spectrum,
    Spectrogram,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ViewerState {
    pub mode: ViewMode,
    pub show_peak: bool,
    pub start_ms: f64,
    pub end_ms: f64,
    duration_ms: f64,
}

impl ViewerState {
    const MIN_SPAN_MS: f64 = 5.0;

    pub fn new(duration_ms: f64) -> Self {
        Self {
            mode: ViewMode::Waveform,
            show_peak: false,
            start_ms: 0.0,
            end_ms: duration_ms,
            duration_ms,
        }
    }

    pub fn duration_ms(&self) -> f64 {
        self.duration_ms
    }

    pub fn span_ms(&self) -> f64 {
        self.end_ms - self.start_ms
    }

    pub fn is_zoomed(&self) -> bool {
        self.start_ms > 0.0 || self.end_ms < self.duration_ms
    }

    // halve the visible span around its centre
    pub fn zoom_in(&mut self) {
        let span = (self.span_ms() / 2.0).max(Self::MIN_SPAN_MS.min(self.duration_ms));
        let centre = self.start_ms + self.span_ms() / 2.0;
        self.set_window(centre - span / 2.0, span);
    }

    pub fn zoom_out(&mut self) {
        let span = (self.span_ms() * 2.0).min(self.duration_ms);
        let centre = self.start_ms + self.span_ms() / 2.0;
        self.set_window(centre - span / 2.0, span);
    }

    /// Moves the window by `fraction` of its width (negative = earlier).
    pub fn pan(&mut self, fraction: f64) {
        let span = self.span_ms();
        self.set_window(self.start_ms + span * fraction, span);
    }

    pub fn reset(&mut self) {
        self.start_ms = 0.0;
        self.end_ms = self.duration_ms;
    }

    fn set_window(&mut self, start_ms: f64, span: f64) {
        let start_ms = start_ms.clamp(0.0, (self.duration_ms - span).max(0.0));
        self.start_ms = start_ms;
        self.end_ms = (start_ms + span).min(self.duration_ms);
    }
}
