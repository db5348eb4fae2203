//! Status LED trait and colour helpers

/// 8-bit RGB triple
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Trait for the front-panel status LED
///
/// Outside of an edit session the LED shows hub status; while a colour or
/// brightness edit is open the engine takes it over for previews.
pub trait LedIndicator {
    /// Set the global LED brightness (0-255)
    fn set_brightness(&mut self, level: u8);

    /// Show a solid preview colour
    fn preview_color(&mut self, color: Rgb);

    /// Cycle a rainbow so brightness changes are visible
    fn preview_rainbow(&mut self);

    /// Drop any preview and return to status display
    fn clear_preview(&mut self);

    /// Stop (or resume) status updates overwriting the LED
    fn suppress_status(&mut self, suppressed: bool);
}

/// Convert a hue in hundredths (0-100, wrapping at 100) to a fully
/// saturated, full-value RGB colour
pub fn hue_to_rgb(hue_hundredths: i32) -> Rgb {
    const SEGMENT: i32 = 255;
    let h = hue_hundredths.rem_euclid(100);
    let pos = h * SEGMENT * 6 / 100;
    let f = (pos % SEGMENT) as u8;
    let up = f;
    let down = 255 - f;

    match pos / SEGMENT {
        0 => Rgb::new(255, up, 0),
        1 => Rgb::new(down, 255, 0),
        2 => Rgb::new(0, 255, up),
        3 => Rgb::new(0, down, 255),
        4 => Rgb::new(up, 0, 255),
        _ => Rgb::new(255, 0, down),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hue_primaries() {
        assert_eq!(hue_to_rgb(0), Rgb::new(255, 0, 0));
        // One third of the wheel lands on green
        let g = hue_to_rgb(33);
        assert!(g.g == 255 && g.r < 10 && g.b == 0);
        let b = hue_to_rgb(67);
        assert!(b.b == 255 && b.g < 10);
    }

    #[test]
    fn test_hue_wraps() {
        assert_eq!(hue_to_rgb(100), hue_to_rgb(0));
        assert_eq!(hue_to_rgb(-50), hue_to_rgb(50));
    }

    #[test]
    fn test_hue_one_channel_saturated() {
        for h in 0..100 {
            let c = hue_to_rgb(h);
            assert!(c.r == 255 || c.g == 255 || c.b == 255, "hue {}", h);
        }
    }
}
