//! Persistent settings store

/// Errors that can occur when persisting a setting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SettingsError {
    /// Backing storage could not be written
    Io,
    /// Settings could not be encoded
    Encode,
}

impl core::fmt::Display for SettingsError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            SettingsError::Io => f.write_str("settings storage not writable"),
            SettingsError::Encode => f.write_str("settings could not be encoded"),
        }
    }
}

/// Trait for the key/value settings store
///
/// Reads fall back to the supplied default when a key is missing or holds
/// a value of the wrong type.
pub trait SettingsStore {
    fn get_int(&self, key: &str, default: i32) -> i32;
    fn set_int(&mut self, key: &str, value: i32) -> Result<(), SettingsError>;
    fn get_float(&self, key: &str, default: f32) -> f32;
    fn set_float(&mut self, key: &str, value: f32) -> Result<(), SettingsError>;
}

/// Well-known setting keys
pub mod keys {
    pub const DISPLAY_BRIGHTNESS: &str = "display_brightness";
    pub const LED_BRIGHTNESS: &str = "led_brightness";
    pub const ORIENTATION: &str = "orientation";
    pub const HUE_NORMAL: &str = "hue_normal";
    pub const HUE_WARNING: &str = "hue_warning";
    pub const HUE_CRITICAL: &str = "hue_critical";
}

/// Default display brightness when nothing has been stored
pub const DEFAULT_DISPLAY_BRIGHTNESS: i32 = 180;

/// Default LED brightness when nothing has been stored
pub const DEFAULT_LED_BRIGHTNESS: i32 = 255;

/// Default panel orientation (knob on the left)
pub const DEFAULT_ORIENTATION: i32 = 0;
