//! Host and sensor-service collaborators
//!
//! Slow probes (subprocesses, HTTP) only ever run on the poller or worker
//! threads. The collaborators handed to the controller read the shared
//! [`FactCache`] and never block.

pub mod cache;
pub mod sensors;
pub mod system;
pub mod wifi;

pub use cache::{FactCache, FactGroup, HostFacts};
pub use sensors::{CachedSensors, HttpSensorDirectory, LimitWriter};
pub use system::{CachedFacts, LinuxSystemFacts};
pub use wifi::parse_scan;
