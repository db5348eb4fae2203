//! Edit sessions
//!
//! At most one setting is edited at a time. While a session is open the
//! encoder adjusts the value instead of moving the cursor, and the next
//! press commits it. There is no cancel.
//!
//! Values are held as integer units: whole numbers for brightness and
//! thresholds, hundredths for hues. This keeps stepping and clamping exact.

use alloc::collections::BTreeMap;
use alloc::string::String;
use core::fmt;

use crate::menu::{MenuItem, Setting};
use crate::traits::settings::{keys, DEFAULT_DISPLAY_BRIGHTNESS, DEFAULT_LED_BRIGHTNESS};
use crate::traits::SettingsStore;

/// Width of the bar drawn for bar-style editors, in pixels
pub const BAR_PIXEL_WIDTH: i32 = 110;

/// Step for a single-detent turn in simple editing
pub const FINE_STEP: i32 = 1;

/// Step for a multi-detent turn in simple editing
pub const COARSE_STEP: i32 = 5;

/// Units of an edit value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Scale {
    Whole,
    Hundredths,
}

/// A setting value in integer units
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EditValue {
    pub units: i32,
    pub scale: Scale,
}

impl EditValue {
    pub const fn whole(units: i32) -> Self {
        Self {
            units,
            scale: Scale::Whole,
        }
    }

    pub const fn hundredths(units: i32) -> Self {
        Self {
            units,
            scale: Scale::Hundredths,
        }
    }

    /// Convert a fraction to hundredths, rounding half away from zero
    pub fn from_fraction(value: f32) -> Self {
        let scaled = value * 100.0;
        let units = if scaled >= 0.0 {
            (scaled + 0.5) as i32
        } else {
            (scaled - 0.5) as i32
        };
        Self::hundredths(units)
    }

    pub fn as_fraction(self) -> f32 {
        match self.scale {
            Scale::Whole => self.units as f32,
            Scale::Hundredths => self.units as f32 / 100.0,
        }
    }

    /// Current persisted value of a setting
    ///
    /// Thresholds come from the cached limits; a sensor without a stored
    /// limit reads as `fallback`.
    pub fn read(
        setting: &Setting,
        settings: &dyn SettingsStore,
        limits: &BTreeMap<String, i32>,
        fallback: i32,
    ) -> Self {
        match setting {
            Setting::DisplayBrightness => Self::whole(
                settings.get_int(keys::DISPLAY_BRIGHTNESS, DEFAULT_DISPLAY_BRIGHTNESS),
            ),
            Setting::LedBrightness => {
                Self::whole(settings.get_int(keys::LED_BRIGHTNESS, DEFAULT_LED_BRIGHTNESS))
            }
            Setting::AlertHue(level) => {
                Self::from_fraction(settings.get_float(level.key(), level.default_hue()))
            }
            Setting::SensorThreshold(name) => {
                Self::whole(limits.get(name).copied().unwrap_or(fallback))
            }
        }
    }
}

impl fmt::Display for EditValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.scale {
            Scale::Whole => write!(f, "{}", self.units),
            Scale::Hundredths => {
                let sign = if self.units < 0 { "-" } else { "" };
                let abs = self.units.unsigned_abs();
                write!(f, "{}{}.{:02}", sign, abs / 100, abs % 100)
            }
        }
    }
}

/// Editor presentation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EditKind {
    /// Value shown in brackets on the menu row
    SimpleValue,
    /// Full-screen bar for a brightness
    BrightnessBar,
    /// Full-screen bar for an alert hue
    HueBar,
    /// Full-screen bar for a sensor threshold
    ThresholdBar,
}

impl EditKind {
    pub fn is_bar(self) -> bool {
        !matches!(self, EditKind::SimpleValue)
    }
}

/// Editor state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EditState {
    #[default]
    Closed,
    SimpleValue,
    BrightnessBar,
    HueBar,
    ThresholdBar,
}

/// Events that move the editor between states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EditEvent {
    /// An editor row was pressed
    Begin(EditKind),
    /// Encoder turned
    Adjust,
    /// Button pressed while editing
    Commit,
}

impl EditState {
    pub fn is_open(self) -> bool {
        !matches!(self, EditState::Closed)
    }

    /// Process an event and return the next state
    pub fn transition(self, event: EditEvent) -> Self {
        use EditEvent::*;
        use EditState::*;

        match (self, event) {
            (Closed, Begin(EditKind::SimpleValue)) => SimpleValue,
            (Closed, Begin(EditKind::BrightnessBar)) => BrightnessBar,
            (Closed, Begin(EditKind::HueBar)) => HueBar,
            (Closed, Begin(EditKind::ThresholdBar)) => ThresholdBar,

            (SimpleValue | BrightnessBar | HueBar | ThresholdBar, Commit) => Closed,

            // Adjusting stays put; beginning while open is ignored
            (state, _) => state,
        }
    }
}

impl From<EditKind> for EditState {
    fn from(kind: EditKind) -> Self {
        EditState::Closed.transition(EditEvent::Begin(kind))
    }
}

/// An open edit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditSession {
    setting: Setting,
    kind: EditKind,
    label: String,
    value: EditValue,
    min: i32,
    max: i32,
}

impl EditSession {
    /// Open a session for an editor row, seeded with `current`
    ///
    /// The seed is clamped into the row's bounds. Returns `None` for rows
    /// that are not editors.
    pub fn open(item: &MenuItem, current: EditValue) -> Option<Self> {
        let (kind, min, max) = match item {
            MenuItem::Editable { min, max, .. } => (EditKind::SimpleValue, *min, *max),
            MenuItem::BrightnessBar { min, max, .. } => (EditKind::BrightnessBar, *min, *max),
            MenuItem::HueBar { min, max, .. } => (
                EditKind::HueBar,
                EditValue::from_fraction(*min).units,
                EditValue::from_fraction(*max).units,
            ),
            MenuItem::ThresholdBar { min, max, .. } => (EditKind::ThresholdBar, *min, *max),
            _ => return None,
        };
        let setting = item.setting()?;
        let (min, max) = if min <= max { (min, max) } else { (max, min) };

        Some(Self {
            setting,
            kind,
            label: String::from(item.text()),
            value: EditValue {
                units: current.units.clamp(min, max),
                scale: current.scale,
            },
            min,
            max,
        })
    }

    pub fn setting(&self) -> &Setting {
        &self.setting
    }

    pub fn kind(&self) -> EditKind {
        self.kind
    }

    pub fn state(&self) -> EditState {
        EditState::from(self.kind)
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn value(&self) -> EditValue {
        self.value
    }

    pub fn bounds(&self) -> (i32, i32) {
        (self.min, self.max)
    }

    /// Whether this session edits the setting bound by `item`
    pub fn targets(&self, item: &MenuItem) -> bool {
        item.setting().as_ref() == Some(&self.setting)
    }

    /// Units moved per detent on a bar: one pixel of bar, never zero
    pub fn bar_step(&self) -> i32 {
        let range = self.range();
        let width = i64::from(BAR_PIXEL_WIDTH);
        let step = ((2 * range + width) / (2 * width)).max(1);
        i32::try_from(step).unwrap_or(i32::MAX)
    }

    // Widened so any i32 bounds stay exact
    fn range(&self) -> i64 {
        i64::from(self.max) - i64::from(self.min)
    }

    /// Apply an encoder delta; returns whether the value changed
    ///
    /// Positive deltas increase the value. Bars move one step per detent;
    /// simple editing moves by one on a single detent and by five on a
    /// fast turn.
    pub fn adjust(&mut self, delta: i32) -> bool {
        if delta == 0 {
            return false;
        }

        let change = if self.kind.is_bar() {
            delta.saturating_mul(self.bar_step())
        } else if delta.unsigned_abs() == 1 {
            delta * FINE_STEP
        } else {
            delta.signum() * COARSE_STEP
        };

        let next = self.value.units.saturating_add(change).clamp(self.min, self.max);
        let changed = next != self.value.units;
        self.value.units = next;
        changed
    }

    /// Filled bar width in pixels
    pub fn bar_fill(&self) -> u32 {
        let range = self.range();
        if range <= 0 {
            return BAR_PIXEL_WIDTH as u32;
        }
        let filled = i64::from(self.value.units) - i64::from(self.min);
        (filled * i64::from(BAR_PIXEL_WIDTH) / range) as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::menu::AlertLevel;
    use proptest::prelude::*;

    fn brightness_bar() -> MenuItem {
        MenuItem::BrightnessBar {
            text: String::from("Display"),
            setting: Setting::DisplayBrightness,
            min: 0,
            max: 255,
        }
    }

    fn hue_bar() -> MenuItem {
        MenuItem::HueBar {
            text: String::from("Warning"),
            level: AlertLevel::Warning,
            min: 0.0,
            max: 1.0,
        }
    }

    fn editable(min: i32, max: i32) -> MenuItem {
        MenuItem::Editable {
            text: String::from("LED: {v}"),
            right: None,
            setting: Setting::LedBrightness,
            min,
            max,
        }
    }

    #[test]
    fn test_state_transitions() {
        let s = EditState::Closed.transition(EditEvent::Begin(EditKind::HueBar));
        assert_eq!(s, EditState::HueBar);
        assert_eq!(s.transition(EditEvent::Adjust), EditState::HueBar);
        assert_eq!(
            s.transition(EditEvent::Begin(EditKind::SimpleValue)),
            EditState::HueBar
        );
        assert_eq!(s.transition(EditEvent::Commit), EditState::Closed);
        assert_eq!(
            EditState::Closed.transition(EditEvent::Commit),
            EditState::Closed
        );
    }

    #[test]
    fn test_open_non_editor() {
        let item = MenuItem::Back {
            text: String::from("Back"),
        };
        assert!(EditSession::open(&item, EditValue::whole(0)).is_none());
    }

    #[test]
    fn test_open_clamps_seed() {
        let s = EditSession::open(&editable(0, 100), EditValue::whole(180)).unwrap();
        assert_eq!(s.value().units, 100);
        assert_eq!(s.state(), EditState::SimpleValue);
    }

    #[test]
    fn test_brightness_bar_step() {
        let s = EditSession::open(&brightness_bar(), EditValue::whole(0)).unwrap();
        // 255 / 110 = 2.32, one pixel per detent
        assert_eq!(s.bar_step(), 2);
    }

    #[test]
    fn test_brightness_bar_saturates() {
        let mut s = EditSession::open(&brightness_bar(), EditValue::whole(0)).unwrap();
        for _ in 0..130 {
            s.adjust(1);
        }
        assert_eq!(s.value().units, 255);
        assert_eq!(s.bar_fill(), BAR_PIXEL_WIDTH as u32);
        assert!(!s.adjust(1));
    }

    #[test]
    fn test_hue_bar_moves_by_hundredths() {
        let mut s = EditSession::open(&hue_bar(), EditValue::from_fraction(0.15)).unwrap();
        assert_eq!(s.bounds(), (0, 100));
        assert_eq!(s.bar_step(), 1);
        assert!(s.adjust(3));
        assert_eq!(s.value().to_string(), "0.18");
        assert!(s.adjust(-20));
        assert_eq!(s.value().units, 0);
    }

    #[test]
    fn test_simple_steps() {
        let mut s = EditSession::open(&editable(0, 255), EditValue::whole(100)).unwrap();
        s.adjust(1);
        assert_eq!(s.value().units, 101);
        s.adjust(-1);
        assert_eq!(s.value().units, 100);
        s.adjust(4);
        assert_eq!(s.value().units, 105);
        s.adjust(-2);
        assert_eq!(s.value().units, 100);
    }

    #[test]
    fn test_extreme_deltas_clamp() {
        let mut s = EditSession::open(&editable(0, 255), EditValue::whole(100)).unwrap();
        assert!(s.adjust(i32::MIN));
        assert_eq!(s.value().units, 95);
        assert!(s.adjust(i32::MAX));
        assert_eq!(s.value().units, 100);

        let mut bar = EditSession::open(&brightness_bar(), EditValue::whole(100)).unwrap();
        bar.adjust(i32::MIN);
        assert_eq!(bar.value().units, 0);
        bar.adjust(i32::MAX);
        assert_eq!(bar.value().units, 255);
    }

    #[test]
    fn test_wide_bar_does_not_overflow() {
        let item = MenuItem::ThresholdBar {
            text: String::from("t"),
            sensor: String::from("s"),
            min: 0,
            max: 100_000_000,
        };
        let mut s = EditSession::open(&item, EditValue::whole(50_000_000)).unwrap();
        assert_eq!(s.bar_step(), 909_091);
        assert!(s.adjust(1));
        assert_eq!(s.value().units, 50_909_091);
        assert_eq!(s.bar_fill(), 56);

        let full = MenuItem::ThresholdBar {
            text: String::from("t"),
            sensor: String::from("s"),
            min: i32::MIN,
            max: i32::MAX,
        };
        let mut s = EditSession::open(&full, EditValue::whole(0)).unwrap();
        s.adjust(3);
        assert!(s.bar_fill() <= BAR_PIXEL_WIDTH as u32);
        s.adjust(i32::MAX);
        assert_eq!(s.value().units, i32::MAX);
        assert_eq!(s.bar_fill(), BAR_PIXEL_WIDTH as u32);
    }

    #[test]
    fn test_targets_by_setting() {
        let s = EditSession::open(&hue_bar(), EditValue::hundredths(10)).unwrap();
        assert!(s.targets(&hue_bar()));
        let other = MenuItem::HueBar {
            text: String::from("Warning copy"),
            level: AlertLevel::Warning,
            min: 0.0,
            max: 1.0,
        };
        assert!(s.targets(&other));
        assert!(!s.targets(&brightness_bar()));
    }

    #[test]
    fn test_value_display() {
        assert_eq!(EditValue::whole(140).to_string(), "140");
        assert_eq!(EditValue::hundredths(5).to_string(), "0.05");
        assert_eq!(EditValue::hundredths(100).to_string(), "1.00");
        assert_eq!(EditValue::hundredths(-25).to_string(), "-0.25");
    }

    #[test]
    fn test_fraction_rounding() {
        assert_eq!(EditValue::from_fraction(0.33).units, 33);
        assert_eq!(EditValue::from_fraction(0.16).units, 16);
        assert_eq!(EditValue::from_fraction(1.0).units, 100);
    }

    proptest! {
        #[test]
        fn prop_value_stays_in_bounds(
            min in -50i32..50,
            span in 0i32..400,
            seed in -500i32..500,
            deltas in proptest::collection::vec(-6i32..6, 0..60),
            bar in any::<bool>(),
        ) {
            let max = min + span;
            let item = if bar {
                MenuItem::ThresholdBar { text: String::from("t"), sensor: String::from("s"), min, max }
            } else {
                editable(min, max)
            };
            let mut s = EditSession::open(&item, EditValue::whole(seed)).unwrap();
            prop_assert!(s.value().units >= min && s.value().units <= max);
            for d in deltas {
                s.adjust(d);
                prop_assert!(s.value().units >= min && s.value().units <= max);
                prop_assert!(s.bar_fill() <= BAR_PIXEL_WIDTH as u32);
            }
        }

        #[test]
        fn prop_monotonic_turns_sum_then_clamp(
            seed in 0i32..=255,
            turns in 0usize..200,
            up in any::<bool>(),
        ) {
            let mut s = EditSession::open(&brightness_bar(), EditValue::whole(seed)).unwrap();
            let delta = if up { 1 } else { -1 };
            for _ in 0..turns {
                s.adjust(delta);
            }
            let expected = (seed + delta * 2 * turns as i32).clamp(0, 255);
            prop_assert_eq!(s.value().units, expected);
        }
    }
}
