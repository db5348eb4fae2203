//! Background tasks
//!
//! - Refresh: drives timed refreshes, sleep and scan delivery
//! - Poller: keeps the fact cache fresh
//! - Scan: one worker thread per Wi-Fi scan
//! - Input: reads bench commands into the input channel

pub mod input;
pub mod poller;
pub mod refresh;
pub mod scan;

pub use input::{parse_command, spawn_input_reader, Command, InputSource, LineInput};
pub use poller::{FactPoller, FactSource, LinuxFactSource};
pub use refresh::spawn_refresh;
pub use scan::NmcliScanner;
