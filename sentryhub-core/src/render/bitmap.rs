//! 1-bpp frame buffer for the 128x32 panel

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;

/// Panel width in pixels
pub const WIDTH: usize = 128;
/// Panel height in pixels
pub const HEIGHT: usize = 32;
/// Vertical 8-pixel pages, matching the controller's GDDRAM layout
pub const PAGES: usize = HEIGHT / 8;

/// One full frame
///
/// Stored page-major like the panel's own RAM, so a driver can stream
/// `pages()` without repacking.
#[derive(Clone, PartialEq, Eq)]
pub struct Bitmap {
    buffer: [[u8; WIDTH]; PAGES],
}

impl Default for Bitmap {
    fn default() -> Self {
        Self::blank()
    }
}

impl core::fmt::Debug for Bitmap {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "Bitmap({} px lit)", self.lit_count())
    }
}

impl Bitmap {
    pub const fn blank() -> Self {
        Self {
            buffer: [[0; WIDTH]; PAGES],
        }
    }

    /// Read one pixel; out-of-range coordinates read as off
    pub fn pixel(&self, x: usize, y: usize) -> bool {
        if x >= WIDTH || y >= HEIGHT {
            return false;
        }
        self.buffer[y / 8][x] & (1 << (y % 8)) != 0
    }

    /// Write one pixel; out-of-range coordinates are ignored
    pub fn set_pixel(&mut self, x: usize, y: usize, on: bool) {
        if x >= WIDTH || y >= HEIGHT {
            return;
        }
        let mask = 1 << (y % 8);
        if on {
            self.buffer[y / 8][x] |= mask;
        } else {
            self.buffer[y / 8][x] &= !mask;
        }
    }

    pub fn pages(&self) -> &[[u8; WIDTH]; PAGES] {
        &self.buffer
    }

    pub fn is_blank(&self) -> bool {
        self.buffer.iter().all(|page| page.iter().all(|&b| b == 0))
    }

    pub fn lit_count(&self) -> u32 {
        self.buffer
            .iter()
            .flat_map(|page| page.iter())
            .map(|b| b.count_ones())
            .sum()
    }

    /// Lit pixels within a horizontal band of rows
    pub fn lit_in_rows(&self, top: usize, bottom: usize) -> u32 {
        let mut count = 0;
        for y in top..bottom.min(HEIGHT) {
            for x in 0..WIDTH {
                if self.pixel(x, y) {
                    count += 1;
                }
            }
        }
        count
    }
}

impl OriginDimensions for Bitmap {
    fn size(&self) -> Size {
        Size::new(WIDTH as u32, HEIGHT as u32)
    }
}

impl DrawTarget for Bitmap {
    type Color = BinaryColor;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if point.x < 0 || point.y < 0 {
                continue;
            }
            self.set_pixel(point.x as usize, point.y as usize, color.is_on());
        }
        Ok(())
    }
}
