//! Full-screen bar editor frame

use embedded_graphics::mono_font::{ascii::FONT_6X10, MonoTextStyle};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};
use embedded_graphics::text::{Alignment, Baseline, Text, TextStyleBuilder};

use super::bitmap::{Bitmap, WIDTH};
use crate::edit::BAR_PIXEL_WIDTH;

const BAR_TOP: i32 = 16;
const BAR_HEIGHT: u32 = 10;
const BAR_LEFT: i32 = (WIDTH as i32 - BAR_PIXEL_WIDTH - 2) / 2;

/// Draw the label, value and a `BAR_PIXEL_WIDTH` bar filled to `fill_px`
pub fn draw_bar<D>(target: &mut D, label: &str, value: &str, fill_px: u32) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    let style = MonoTextStyle::new(&FONT_6X10, BinaryColor::On);
    target.clear(BinaryColor::Off)?;

    Text::with_baseline(label, Point::new(2, 0), style, Baseline::Top).draw(target)?;
    Text::with_text_style(
        value,
        Point::new(WIDTH as i32 - 2, 0),
        style,
        TextStyleBuilder::new()
            .alignment(Alignment::Right)
            .baseline(Baseline::Top)
            .build(),
    )
    .draw(target)?;

    Rectangle::new(
        Point::new(BAR_LEFT, BAR_TOP),
        Size::new(BAR_PIXEL_WIDTH as u32 + 2, BAR_HEIGHT),
    )
    .into_styled(PrimitiveStyle::with_stroke(BinaryColor::On, 1))
    .draw(target)?;

    let fill = fill_px.min(BAR_PIXEL_WIDTH as u32);
    if fill > 0 {
        Rectangle::new(
            Point::new(BAR_LEFT + 1, BAR_TOP + 1),
            Size::new(fill, BAR_HEIGHT - 2),
        )
        .into_styled(PrimitiveStyle::with_fill(BinaryColor::On))
        .draw(target)?;
    }

    Ok(())
}

/// Render a bar editor into a fresh frame
pub fn render_bar(label: &str, value: &str, fill_px: u32) -> Bitmap {
    let mut frame = Bitmap::blank();
    let _ = draw_bar(&mut frame, label, value, fill_px);
    frame
}
