//! Logging LED strip

use tracing::{debug, trace};

use sentryhub_core::traits::{hue_to_rgb, LedIndicator, Rgb};

/// What the strip is currently showing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedMode {
    Off,
    Status(Rgb),
    Preview(Rgb),
    Rainbow,
}

/// LED strip that tracks its pixels and logs changes
///
/// Status colours are ignored while an edit session suppresses them.
/// The last status colour is kept so clearing a preview can restore it.
#[derive(Debug)]
pub struct SimLed {
    pixels: Vec<Rgb>,
    brightness: u8,
    mode: LedMode,
    status: Option<Rgb>,
    suppressed: bool,
}

impl SimLed {
    pub fn new(pixel_count: usize) -> Self {
        Self {
            pixels: vec![Rgb::default(); pixel_count],
            brightness: u8::MAX,
            mode: LedMode::Off,
            status: None,
            suppressed: false,
        }
    }

    pub fn pixels(&self) -> &[Rgb] {
        &self.pixels
    }

    pub fn brightness(&self) -> u8 {
        self.brightness
    }

    pub fn mode(&self) -> LedMode {
        self.mode
    }

    pub fn is_suppressed(&self) -> bool {
        self.suppressed
    }

    /// Show a status colour; returns false if suppressed
    pub fn show_status(&mut self, color: Rgb) -> bool {
        self.status = Some(color);
        if self.suppressed {
            trace!("status {:?} held back during edit", color);
            return false;
        }
        if self.mode != LedMode::Status(color) {
            debug!("led status {:?}", color);
        }
        self.fill(color);
        self.mode = LedMode::Status(color);
        true
    }

    fn fill(&mut self, color: Rgb) {
        self.pixels.iter_mut().for_each(|p| *p = color);
    }
}

impl LedIndicator for SimLed {
    fn set_brightness(&mut self, level: u8) {
        debug!("led brightness {}", level);
        self.brightness = level;
    }

    fn preview_color(&mut self, color: Rgb) {
        trace!("led preview {:?}", color);
        self.fill(color);
        self.mode = LedMode::Preview(color);
    }

    fn preview_rainbow(&mut self) {
        let count = self.pixels.len().max(1);
        for (i, pixel) in self.pixels.iter_mut().enumerate() {
            *pixel = hue_to_rgb((i * 100 / count) as i32);
        }
        self.mode = LedMode::Rainbow;
    }

    fn clear_preview(&mut self) {
        match self.status {
            Some(color) => {
                self.fill(color);
                self.mode = LedMode::Status(color);
            }
            None => {
                self.fill(Rgb::default());
                self.mode = LedMode::Off;
            }
        }
    }

    fn suppress_status(&mut self, suppressed: bool) {
        self.suppressed = suppressed;
    }
}
