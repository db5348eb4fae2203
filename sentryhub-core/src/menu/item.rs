//! Menu item variants and capability identifiers
//!
//! Items never carry behaviour of their own. Each variant names a
//! capability (a query, a setting, a choice group, an action) that the
//! controller resolves against its collaborators.

use alloc::string::String;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::traits::settings::keys;

/// A named value the hub can look up for display
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Query {
    WifiSsid,
    IpAddress,
    Uptime,
    /// Status of the first monitored unit
    ServiceStatus,
    LoadAverage,
    ActiveSensorCount,
}

/// Alert severity, each with its own LED hue
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum AlertLevel {
    Normal,
    Warning,
    Critical,
}

impl AlertLevel {
    pub fn key(self) -> &'static str {
        match self {
            AlertLevel::Normal => keys::HUE_NORMAL,
            AlertLevel::Warning => keys::HUE_WARNING,
            AlertLevel::Critical => keys::HUE_CRITICAL,
        }
    }

    /// Factory hue as a fraction of the colour wheel
    pub fn default_hue(self) -> f32 {
        match self {
            AlertLevel::Normal => 0.33,
            AlertLevel::Warning => 0.15,
            AlertLevel::Critical => 0.0,
        }
    }
}

/// A persisted value an editor can bind to
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Setting {
    DisplayBrightness,
    LedBrightness,
    AlertHue(AlertLevel),
    SensorThreshold(String),
}

impl Setting {
    /// Whether editing this setting takes over the status LED
    pub fn previews_led(&self) -> bool {
        matches!(self, Setting::LedBrightness | Setting::AlertHue(_))
    }
}

/// A mutually exclusive option set stored under one key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ChoiceGroup {
    /// 0 = left-handed, 1 = right-handed
    Orientation,
}

impl ChoiceGroup {
    pub fn key(self) -> &'static str {
        match self {
            ChoiceGroup::Orientation => keys::ORIENTATION,
        }
    }

    pub fn default_value(self) -> i32 {
        match self {
            ChoiceGroup::Orientation => crate::traits::settings::DEFAULT_ORIENTATION,
        }
    }
}

/// Fire-and-forget commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Action {
    /// Re-read the sensor list and every value on the current menu
    RescanSensors,
    /// Blank the panel now instead of waiting for the timeout
    BlankDisplay,
}

/// Source of rows for a menu built at navigation time
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Generator {
    NetworkScan,
    ServiceStatus,
}

/// When a dynamic value is re-queried
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RefreshPolicy {
    /// Only when the menu is entered
    #[default]
    OnNavigate,
    /// Also on every tick once this many seconds have passed
    Seconds(u32),
}

impl RefreshPolicy {
    pub fn interval_ms(self) -> Option<u64> {
        match self {
            RefreshPolicy::OnNavigate => None,
            RefreshPolicy::Seconds(s) => Some(u64::from(s) * 1000),
        }
    }
}

/// Identity of a menu on the navigation stack
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MenuId {
    /// A menu from the definition document
    Named(String),
    /// Detail view for one sensor
    Sensor(String),
    /// A generated list
    Generated(Generator),
}

impl MenuId {
    pub fn named(name: impl Into<String>) -> Self {
        MenuId::Named(name.into())
    }
}

/// One row in a menu
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", rename_all = "snake_case"))]
pub enum MenuItem {
    /// Fixed label
    Static {
        text: String,
        #[cfg_attr(feature = "serde", serde(default))]
        right: Option<String>,
    },
    /// Label with a `{token}` filled from a query
    Dynamic {
        text: String,
        #[cfg_attr(feature = "serde", serde(default))]
        right: Option<String>,
        function: Query,
        #[cfg_attr(feature = "serde", serde(default))]
        refresh: RefreshPolicy,
    },
    /// Entry into a generated menu
    DynamicSubmenu { text: String, generator: Generator },
    /// Entry into another menu
    Submenu { text: String, submenu: MenuId },
    /// Pop one level
    Back {
        #[cfg_attr(feature = "serde", serde(default = "default_back_text"))]
        text: String,
    },
    /// One option of a choice group
    Checkbox {
        text: String,
        group: ChoiceGroup,
        value: i32,
    },
    /// Integer setting edited in place
    Editable {
        text: String,
        #[cfg_attr(feature = "serde", serde(default))]
        right: Option<String>,
        setting: Setting,
        min: i32,
        max: i32,
    },
    /// Brightness edited on a full-screen bar
    BrightnessBar {
        text: String,
        setting: Setting,
        #[cfg_attr(feature = "serde", serde(default))]
        min: i32,
        #[cfg_attr(feature = "serde", serde(default = "default_brightness_max"))]
        max: i32,
    },
    /// Alert hue edited on a full-screen bar
    HueBar {
        text: String,
        level: AlertLevel,
        #[cfg_attr(feature = "serde", serde(default))]
        min: f32,
        #[cfg_attr(feature = "serde", serde(default = "default_hue_max"))]
        max: f32,
    },
    /// Sensor alert threshold edited on a full-screen bar
    ThresholdBar {
        text: String,
        sensor: String,
        #[cfg_attr(feature = "serde", serde(default = "default_threshold_min"))]
        min: i32,
        #[cfg_attr(feature = "serde", serde(default = "default_threshold_max"))]
        max: i32,
    },
    /// Sensor count, expanded into one row per active sensor
    SensorSummary {
        text: String,
        #[cfg_attr(feature = "serde", serde(default))]
        refresh: RefreshPolicy,
    },
    /// Run a command on press
    Action { text: String, action: Action },
}

pub const DEFAULT_BACK_TEXT: &str = "Back";
pub const THRESHOLD_MIN_DB: i32 = 30;
pub const THRESHOLD_MAX_DB: i32 = 130;

#[cfg(feature = "serde")]
fn default_back_text() -> String {
    String::from(DEFAULT_BACK_TEXT)
}

#[cfg(feature = "serde")]
fn default_brightness_max() -> i32 {
    255
}

#[cfg(feature = "serde")]
fn default_hue_max() -> f32 {
    1.0
}

#[cfg(feature = "serde")]
fn default_threshold_min() -> i32 {
    THRESHOLD_MIN_DB
}

#[cfg(feature = "serde")]
fn default_threshold_max() -> i32 {
    THRESHOLD_MAX_DB
}

#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for MenuId {
    /// Menu documents only ever name other document menus
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(MenuId::Named)
    }
}

/// Accepts `"on_navigate"` or a whole number of seconds
#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for RefreshPolicy {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct PolicyVisitor;

        impl<'de> serde::de::Visitor<'de> for PolicyVisitor {
            type Value = RefreshPolicy;

            fn expecting(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str("\"on_navigate\" or a positive number of seconds")
            }

            fn visit_str<E: serde::de::Error>(self, v: &str) -> Result<Self::Value, E> {
                match v {
                    "on_navigate" => Ok(RefreshPolicy::OnNavigate),
                    other => other
                        .parse::<u32>()
                        .map_err(|_| E::invalid_value(serde::de::Unexpected::Str(v), &self))
                        .and_then(|s| self.visit_u64(u64::from(s))),
                }
            }

            fn visit_u64<E: serde::de::Error>(self, v: u64) -> Result<Self::Value, E> {
                match u32::try_from(v) {
                    Ok(s) if s > 0 => Ok(RefreshPolicy::Seconds(s)),
                    _ => Err(E::invalid_value(serde::de::Unexpected::Unsigned(v), &self)),
                }
            }

            fn visit_i64<E: serde::de::Error>(self, v: i64) -> Result<Self::Value, E> {
                match u64::try_from(v) {
                    Ok(u) => self.visit_u64(u),
                    Err(_) => Err(E::invalid_value(serde::de::Unexpected::Signed(v), &self)),
                }
            }
        }

        deserializer.deserialize_any(PolicyVisitor)
    }
}

impl MenuItem {
    pub fn text(&self) -> &str {
        match self {
            MenuItem::Static { text, .. }
            | MenuItem::Dynamic { text, .. }
            | MenuItem::DynamicSubmenu { text, .. }
            | MenuItem::Submenu { text, .. }
            | MenuItem::Back { text }
            | MenuItem::Checkbox { text, .. }
            | MenuItem::Editable { text, .. }
            | MenuItem::BrightnessBar { text, .. }
            | MenuItem::HueBar { text, .. }
            | MenuItem::ThresholdBar { text, .. }
            | MenuItem::SensorSummary { text, .. }
            | MenuItem::Action { text, .. } => text,
        }
    }

    /// Right-aligned template, if the item has one
    pub fn right(&self) -> Option<&str> {
        match self {
            MenuItem::Static { right, .. }
            | MenuItem::Dynamic { right, .. }
            | MenuItem::Editable { right, .. } => right.as_deref(),
            _ => None,
        }
    }

    /// Whether pressing this row descends into another menu
    pub fn descends(&self) -> bool {
        matches!(
            self,
            MenuItem::Submenu { .. } | MenuItem::DynamicSubmenu { .. }
        )
    }

    /// Whether pressing this row opens an edit session
    pub fn is_editor(&self) -> bool {
        self.setting().is_some()
    }

    /// Query and policy for rows that show a looked-up value
    pub fn query(&self) -> Option<(Query, RefreshPolicy)> {
        match self {
            MenuItem::Dynamic {
                function, refresh, ..
            } => Some((*function, *refresh)),
            MenuItem::SensorSummary { refresh, .. } => Some((Query::ActiveSensorCount, *refresh)),
            _ => None,
        }
    }

    /// Setting bound by editor rows
    pub fn setting(&self) -> Option<Setting> {
        match self {
            MenuItem::Editable { setting, .. } | MenuItem::BrightnessBar { setting, .. } => {
                Some(setting.clone())
            }
            MenuItem::HueBar { level, .. } => Some(Setting::AlertHue(*level)),
            MenuItem::ThresholdBar { sensor, .. } => Some(Setting::SensorThreshold(sensor.clone())),
            _ => None,
        }
    }
}

/// Replace every `{...}` placeholder in `template` with `value`
///
/// An unterminated `{` is kept literally.
pub fn fill_tokens(template: &str, value: &str) -> String {
    let mut out = String::with_capacity(template.len() + value.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        let Some(close) = rest[open..].find('}') else {
            break;
        };
        out.push_str(&rest[..open]);
        out.push_str(value);
        rest = &rest[open + close + 1..];
    }
    out.push_str(rest);
    out
}
