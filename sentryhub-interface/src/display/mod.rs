//! Bench stand-ins for the OLED panel and the status LED strip

pub mod led;
pub mod sim;

pub use led::{LedMode, SimLed};
pub use sim::{render_ascii, SimDisplay};
