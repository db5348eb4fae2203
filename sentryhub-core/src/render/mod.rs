//! Frame rendering
//!
//! Menus are pre-rendered into one bitmap per scroll offset so that
//! encoder bursts only index into a cache. Bar editors draw a separate
//! overlay frame.

pub mod bar;
pub mod bitmap;
pub mod frames;

pub use bar::render_bar;
pub use bitmap::{Bitmap, HEIGHT, WIDTH};
pub use frames::{draw_window, FrameCache};
