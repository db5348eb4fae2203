//! In-memory collaborators for unit tests

use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;
use core::cell::Cell;

use crate::render::Bitmap;
use crate::traits::{
    DisplayDriver, DisplayError, Hardware, LedIndicator, NetworkScanner, Rgb, Rotation,
    ScanTicket, SensorDetail, SensorDirectory, ServiceState, SettingsError, SettingsStore,
    SystemFacts,
};

#[derive(Debug, Default)]
pub struct MemorySettings {
    pub ints: BTreeMap<String, i32>,
    pub floats: BTreeMap<String, f32>,
    pub fail_writes: bool,
}

impl SettingsStore for MemorySettings {
    fn get_int(&self, key: &str, default: i32) -> i32 {
        self.ints.get(key).copied().unwrap_or(default)
    }

    fn set_int(&mut self, key: &str, value: i32) -> Result<(), SettingsError> {
        self.ints.insert(String::from(key), value);
        if self.fail_writes {
            return Err(SettingsError::Io);
        }
        Ok(())
    }

    fn get_float(&self, key: &str, default: f32) -> f32 {
        self.floats.get(key).copied().unwrap_or(default)
    }

    fn set_float(&mut self, key: &str, value: f32) -> Result<(), SettingsError> {
        self.floats.insert(String::from(key), value);
        if self.fail_writes {
            return Err(SettingsError::Io);
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct MockDisplay {
    pub presented: Vec<Bitmap>,
    pub contrast: Option<u8>,
    pub rotation: Option<Rotation>,
    pub blanks: usize,
}

impl MockDisplay {
    pub fn last(&self) -> Option<&Bitmap> {
        self.presented.last()
    }
}

impl DisplayDriver for MockDisplay {
    fn present(&mut self, frame: &Bitmap) -> Result<(), DisplayError> {
        self.presented.push(frame.clone());
        Ok(())
    }

    fn set_contrast(&mut self, contrast: u8) -> Result<(), DisplayError> {
        self.contrast = Some(contrast);
        Ok(())
    }

    fn set_rotation(&mut self, rotation: Rotation) -> Result<(), DisplayError> {
        self.rotation = Some(rotation);
        Ok(())
    }

    fn blank(&mut self) -> Result<(), DisplayError> {
        self.blanks += 1;
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct MockLed {
    pub brightness: Option<u8>,
    pub preview: Option<Rgb>,
    pub rainbow: bool,
    pub suppressed: bool,
}

impl LedIndicator for MockLed {
    fn set_brightness(&mut self, level: u8) {
        self.brightness = Some(level);
    }

    fn preview_color(&mut self, color: Rgb) {
        self.preview = Some(color);
    }

    fn preview_rainbow(&mut self) {
        self.rainbow = true;
    }

    fn clear_preview(&mut self) {
        self.preview = None;
        self.rainbow = false;
    }

    fn suppress_status(&mut self, suppressed: bool) {
        self.suppressed = suppressed;
    }
}

#[derive(Debug)]
pub struct MockSensors {
    pub active: Vec<String>,
    pub limits: BTreeMap<String, i32>,
    pub accept_limits: bool,
    pub list_calls: Cell<usize>,
}

impl Default for MockSensors {
    fn default() -> Self {
        Self {
            active: Vec::new(),
            limits: BTreeMap::new(),
            accept_limits: true,
            list_calls: Cell::new(0),
        }
    }
}

impl SensorDirectory for MockSensors {
    fn list_active_sensors(&self) -> Vec<String> {
        self.list_calls.set(self.list_calls.get() + 1);
        self.active.clone()
    }

    fn get_limits(&self) -> BTreeMap<String, i32> {
        self.limits.clone()
    }

    fn get_sensor_detail(&self, _name: &str) -> SensorDetail {
        SensorDetail {
            current_reading: Some(61.5),
            measurements_per_second: 4.0,
        }
    }

    fn set_limit(&mut self, name: &str, value: i32) -> bool {
        if self.accept_limits {
            self.limits.insert(String::from(name), value);
        }
        self.accept_limits
    }
}

#[derive(Debug)]
pub struct MockFacts {
    pub ssid: String,
    pub ip: String,
    pub uptime: String,
    pub load: String,
    pub services: Vec<(String, ServiceState)>,
    pub calls: Cell<usize>,
}

impl Default for MockFacts {
    fn default() -> Self {
        Self {
            ssid: String::from("home"),
            ip: String::from("10.0.0.5"),
            uptime: String::from("00:01:00"),
            load: String::from("0.10"),
            services: alloc::vec![
                (String::from("sentryhub"), ServiceState::Active),
                (String::from("mosquitto"), ServiceState::Failed),
            ],
            calls: Cell::new(0),
        }
    }
}

impl MockFacts {
    fn count(&self) {
        self.calls.set(self.calls.get() + 1);
    }
}

impl SystemFacts for MockFacts {
    fn wifi_ssid(&self) -> String {
        self.count();
        self.ssid.clone()
    }

    fn ip_address(&self) -> String {
        self.count();
        self.ip.clone()
    }

    fn uptime(&self) -> String {
        self.count();
        self.uptime.clone()
    }

    fn load_average(&self) -> String {
        self.count();
        self.load.clone()
    }

    fn service_status(&self, name: &str) -> ServiceState {
        self.services
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, s)| s.clone())
            .unwrap_or(ServiceState::Unavailable)
    }

    fn monitored_services(&self) -> Vec<String> {
        self.services.iter().map(|(n, _)| n.clone()).collect()
    }
}

#[derive(Debug, Default)]
pub struct MockScanner {
    pub started: Vec<ScanTicket>,
}

impl NetworkScanner for MockScanner {
    fn start_scan(&mut self, ticket: ScanTicket) {
        self.started.push(ticket);
    }
}

#[derive(Debug, Default)]
pub struct MockHardware {
    pub display: MockDisplay,
    pub settings: MemorySettings,
    pub led: MockLed,
    pub sensors: MockSensors,
    pub facts: MockFacts,
    pub scanner: MockScanner,
}

impl Hardware for MockHardware {
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
