//! Pre-rendered menu frames
//!
//! The item list is padded with a blank row at each end and one frame is
//! drawn per scroll offset. Frame `n` shows padded rows `n..n + 3`, so the
//! highlighted middle row is item `n`.

use alloc::vec;
use alloc::vec::Vec;

use embedded_graphics::mono_font::{ascii::FONT_6X10, MonoTextStyle};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};
use embedded_graphics::text::{Baseline, Text};

use super::bitmap::{Bitmap, WIDTH};
use crate::format::FormattedRow;

/// Glyph cell width of FONT_6X10
pub const CHAR_WIDTH: i32 = 6;
/// Height of one text row
pub const ROW_HEIGHT: u32 = 10;
/// Top edge of each of the three rows
pub const ROW_TOPS: [i32; 3] = [0, 11, 22];
/// Index of the highlighted row
pub const HIGHLIGHT_ROW: usize = 1;

const MARGIN: i32 = 2;
const GAP: i32 = 4;
const INDICATOR: &str = ">>";

/// Draw one menu row
fn draw_row<D>(
    target: &mut D,
    row: &FormattedRow,
    top: i32,
    highlighted: bool,
) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    let fg = if highlighted {
        Rectangle::new(Point::new(0, top), Size::new(WIDTH as u32, ROW_HEIGHT))
            .into_styled(PrimitiveStyle::with_fill(BinaryColor::On))
            .draw(target)?;
        BinaryColor::Off
    } else {
        BinaryColor::On
    };
    let style = MonoTextStyle::new(&FONT_6X10, fg);

    let mut right_edge = WIDTH as i32 - MARGIN;
    if row.descends {
        let x = right_edge - INDICATOR.len() as i32 * CHAR_WIDTH;
        Text::with_baseline(INDICATOR, Point::new(x, top), style, Baseline::Top).draw(target)?;
        right_edge = x - GAP;
    }

    let mut text_limit = right_edge;
    if let Some(right) = &row.right {
        let x = right_edge - right.chars().count() as i32 * CHAR_WIDTH;
        Text::with_baseline(right.as_str(), Point::new(x, top), style, Baseline::Top).draw(target)?;
        text_limit = x - GAP;
    }

    let max_chars = ((text_limit - MARGIN) / CHAR_WIDTH).max(0) as usize;
    let end = row
        .text
        .char_indices()
        .nth(max_chars)
        .map(|(i, _)| i)
        .unwrap_or(row.text.len());
    Text::with_baseline(&row.text.as_str()[..end], Point::new(MARGIN, top), style, Baseline::Top)
        .draw(target)?;

    Ok(())
}

/// Draw a three-row window; `None` slots stay blank
pub fn draw_window<D>(target: &mut D, window: [Option<&FormattedRow>; 3]) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    target.clear(BinaryColor::Off)?;
    for (slot, (row, top)) in window.iter().zip(ROW_TOPS).enumerate() {
        if let Some(row) = row {
            draw_row(target, row, top, slot == HIGHLIGHT_ROW)?;
        }
    }
    Ok(())
}

/// One frame per scroll offset for the current menu
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameCache {
    frames: Vec<Bitmap>,
}

impl Default for FrameCache {
    fn default() -> Self {
        Self {
            frames: vec![Bitmap::blank()],
        }
    }
}

impl FrameCache {
    /// Render every offset of `rows`
    ///
    /// An empty menu yields a single blank frame.
    pub fn build(rows: &[FormattedRow]) -> Self {
        if rows.is_empty() {
            return Self::default();
        }

        let mut padded: Vec<Option<&FormattedRow>> = Vec::with_capacity(rows.len() + 2);
        padded.push(None);
        padded.extend(rows.iter().map(Some));
        padded.push(None);

        let frames = padded
            .windows(3)
            .map(|w| {
                let mut frame = Bitmap::blank();
                // Bitmap drawing is infallible
                let _ = draw_window(&mut frame, [w[0], w[1], w[2]]);
                frame
            })
            .collect();

        Self { frames }
    }

    /// Frame for an offset, clamped to the valid range
    pub fn frame(&self, offset: usize) -> &Bitmap {
        let last = self.frames.len().saturating_sub(1);
        &self.frames[offset.min(last)]
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}
