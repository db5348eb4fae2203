//! Linux collaborator set

use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::trace;

use sentryhub_core::menu::AlertLevel;
use sentryhub_core::traits::{
    hue_to_rgb, DisplayDriver, Hardware, LedIndicator, NetworkScanner, SensorDetail,
    SensorDirectory, SettingsStore, SystemFacts,
};

use crate::config::FileSettings;
use crate::display::{SimDisplay, SimLed};
use crate::services::{CachedFacts, CachedSensors, FactCache};
use crate::tasks::NmcliScanner;

/// Readings this close under a limit show the warning colour
pub const WARNING_MARGIN_DB: f32 = 5.0;

/// Worst alert level across all sensors with both a reading and a limit
pub fn alert_level(
    details: &BTreeMap<String, SensorDetail>,
    limits: &BTreeMap<String, i32>,
) -> AlertLevel {
    let mut level = AlertLevel::Normal;
    for (name, detail) in details {
        let (Some(reading), Some(limit)) = (detail.current_reading, limits.get(name)) else {
            continue;
        };
        let limit = *limit as f32;
        if reading >= limit {
            return AlertLevel::Critical;
        }
        if reading >= limit - WARNING_MARGIN_DB {
            level = AlertLevel::Warning;
        }
    }
    level
}

/// Everything the controller drives on the Linux hub
pub struct LinuxHardware {
    pub display: SimDisplay,
    pub settings: FileSettings,
    pub led: SimLed,
    pub sensors: CachedSensors,
    pub facts: CachedFacts,
    pub scanner: NmcliScanner,
    cache: Arc<FactCache>,
}

impl LinuxHardware {
    pub fn new(
        display: SimDisplay,
        settings: FileSettings,
        led: SimLed,
        cache: Arc<FactCache>,
        sensors: CachedSensors,
        facts: CachedFacts,
        scanner: NmcliScanner,
    ) -> Self {
        Self {
            display,
            settings,
            led,
            sensors,
            facts,
            scanner,
            cache,
        }
    }

    /// Show the current alert level on the LED in its configured hue
    ///
    /// Held back by the LED while an edit session previews on it.
    pub fn update_status(&mut self) -> AlertLevel {
        let sensors = self.cache.sensors();
        let details: BTreeMap<String, SensorDetail> = sensors
            .iter()
            .map(|name| (name.clone(), self.cache.detail(name)))
            .collect();
        let level = alert_level(&details, &self.cache.limits());

        let hue = self.settings.get_float(level.key(), level.default_hue());
        let color = hue_to_rgb((hue * 100.0).round() as i32);
        if self.led.show_status(color) {
            trace!("status {:?} shown as {:?}", level, color);
        }
        level
    }
}

impl Hardware for LinuxHardware {
    fn display(&mut self) -> &mut dyn DisplayDriver {
        &mut self.display
    }

    fn settings(&mut self) -> &mut dyn SettingsStore {
        &mut self.settings
    }

    fn led(&mut self) -> &mut dyn LedIndicator {
        &mut self.led
    }

    fn sensors(&mut self) -> &mut dyn SensorDirectory {
        &mut self.sensors
    }

    fn facts(&mut self) -> &mut dyn SystemFacts {
        &mut self.facts
    }

    fn scanner(&mut self) -> &mut dyn NetworkScanner {
        &mut self.scanner
    }
}
