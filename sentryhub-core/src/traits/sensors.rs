//! Sensor service directory

use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;

/// Live figures for one sensor
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SensorDetail {
    /// Most recent reading in dB, if the sensor has reported
    pub current_reading: Option<f32>,
    /// Measurement rate
    pub measurements_per_second: f32,
}

/// Trait for the sensor service
///
/// Reads never fail: an unreachable service reports an empty list, no
/// limits and a default detail.
pub trait SensorDirectory {
    /// Names of sensors currently reporting
    fn list_active_sensors(&self) -> Vec<String>;

    /// Alert thresholds by sensor name
    fn get_limits(&self) -> BTreeMap<String, i32>;

    /// Live detail for one sensor
    fn get_sensor_detail(&self, name: &str) -> SensorDetail;

    /// Store a new threshold; returns whether the service accepted it
    fn set_limit(&mut self, name: &str, value: i32) -> bool;
}
