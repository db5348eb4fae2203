//! Collaborator traits
//!
//! These traits define the interface between the menu engine and the
//! platform: the OLED panel, the settings file, the status LED, the
//! sensor service and the host itself.

pub mod display;
pub mod input;
pub mod led;
pub mod network;
pub mod sensors;
pub mod settings;
pub mod system;

pub use display::{effective_contrast, DisplayDriver, DisplayError, Rotation};
pub use input::InputEvent;
pub use led::{hue_to_rgb, LedIndicator, Rgb};
pub use network::{Network, NetworkScanner, ScanTicket};
pub use sensors::{SensorDetail, SensorDirectory};
pub use settings::{SettingsError, SettingsStore};
pub use system::{ServiceState, SystemFacts};

/// Every collaborator the controller drives, behind one owner
///
/// Accessors hand out trait objects so the controller stays generic over a
/// single type parameter while each platform supplies its own drivers.
pub trait Hardware {
    fn display(&mut self) -> &mut dyn DisplayDriver;
    fn settings(&mut self) -> &mut dyn SettingsStore;
    fn led(&mut self) -> &mut dyn LedIndicator;
    fn sensors(&mut self) -> &mut dyn SensorDirectory;
    fn facts(&mut self) -> &mut dyn SystemFacts;
    fn scanner(&mut self) -> &mut dyn NetworkScanner;
}
