//! Display driver trait for the 128x32 OLED panel

use crate::render::Bitmap;

/// Errors that can occur when talking to the panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError {
    /// Bus write failed
    Bus,
    /// Panel has not been initialized
    NotReady,
}

/// Panel rotation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Rotation {
    Deg0,
    Deg180,
}

impl Rotation {
    pub fn degrees(self) -> u16 {
        match self {
            Rotation::Deg0 => 0,
            Rotation::Deg180 => 180,
        }
    }
}

/// Trait for the physical panel
///
/// The panel is a dumb sink: every frame is fully composed by the engine
/// and pushed whole. Transport errors are the driver's concern; the
/// controller logs them and carries on.
pub trait DisplayDriver {
    /// Push a complete frame to the panel
    fn present(&mut self, frame: &Bitmap) -> Result<(), DisplayError>;

    /// Set the hardware contrast register (0-255)
    fn set_contrast(&mut self, contrast: u8) -> Result<(), DisplayError>;

    /// Set the panel rotation
    fn set_rotation(&mut self, rotation: Rotation) -> Result<(), DisplayError>;

    /// Clear the panel to all-off
    fn blank(&mut self) -> Result<(), DisplayError>;
}

/// Lowest contrast the panel is driven at; below this the glass goes dark
pub const MIN_CONTRAST: u8 = 5;

/// Map a user-facing brightness (0-255) onto the contrast register
///
/// The bottom of the range is lifted so that brightness 0 stays readable.
pub fn effective_contrast(brightness: i32) -> u8 {
    let b = brightness.clamp(0, 255) as u32;
    let span = 255 - MIN_CONTRAST as u32;
    (MIN_CONTRAST as u32 + b * span / 255) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contrast_endpoints() {
        assert_eq!(effective_contrast(0), 5);
        assert_eq!(effective_contrast(255), 255);
    }

    #[test]
    fn test_contrast_clamps_out_of_range() {
        assert_eq!(effective_contrast(-20), 5);
        assert_eq!(effective_contrast(999), 255);
    }

    #[test]
    fn test_contrast_monotonic() {
        let mut last = 0;
        for b in 0..=255 {
            let c = effective_contrast(b);
            assert!(c >= last);
            last = c;
        }
    }
}
