//! Logging display

use tracing::{debug, enabled, trace, Level};

use sentryhub_core::render::{Bitmap, HEIGHT, WIDTH};
use sentryhub_core::traits::{DisplayDriver, DisplayError, Rotation};

/// Render a frame as text, two pixel rows per line
pub fn render_ascii(frame: &Bitmap, rotation: Rotation) -> String {
    let lit = |x: usize, y: usize| match rotation {
        Rotation::Deg0 => frame.pixel(x, y),
        Rotation::Deg180 => frame.pixel(WIDTH - 1 - x, HEIGHT - 1 - y),
    };

    let mut out = String::with_capacity((WIDTH + 1) * HEIGHT / 2);
    for y in (0..HEIGHT).step_by(2) {
        for x in 0..WIDTH {
            out.push(match (lit(x, y), lit(x, y + 1)) {
                (true, true) => '█',
                (true, false) => '▀',
                (false, true) => '▄',
                (false, false) => ' ',
            });
        }
        out.push('\n');
    }
    out
}

/// Display that keeps the last frame and logs what it was asked to do
#[derive(Debug)]
pub struct SimDisplay {
    frame: Bitmap,
    contrast: u8,
    rotation: Rotation,
    blanked: bool,
    presented: u64,
}

impl Default for SimDisplay {
    fn default() -> Self {
        Self::new()
    }
}

impl SimDisplay {
    pub fn new() -> Self {
        Self {
            frame: Bitmap::blank(),
            contrast: u8::MAX,
            rotation: Rotation::Deg0,
            blanked: true,
            presented: 0,
        }
    }

    pub fn frame(&self) -> &Bitmap {
        &self.frame
    }

    pub fn contrast(&self) -> u8 {
        self.contrast
    }

    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    pub fn is_blanked(&self) -> bool {
        self.blanked
    }

    /// Frames presented since startup
    pub fn presented(&self) -> u64 {
        self.presented
    }
}

impl DisplayDriver for SimDisplay {
    fn present(&mut self, frame: &Bitmap) -> Result<(), DisplayError> {
        self.frame = frame.clone();
        self.blanked = false;
        self.presented += 1;
        if enabled!(Level::TRACE) {
            trace!("frame {}:\n{}", self.presented, render_ascii(frame, self.rotation));
        }
        Ok(())
    }

    fn set_contrast(&mut self, contrast: u8) -> Result<(), DisplayError> {
        debug!("display contrast {}", contrast);
        self.contrast = contrast;
        Ok(())
    }

    fn set_rotation(&mut self, rotation: Rotation) -> Result<(), DisplayError> {
        debug!("display rotation {}°", rotation.degrees());
        self.rotation = rotation;
        Ok(())
    }

    fn blank(&mut self) -> Result<(), DisplayError> {
        debug!("display blanked");
        self.frame = Bitmap::blank();
        self.blanked = true;
        Ok(())
    }
}
