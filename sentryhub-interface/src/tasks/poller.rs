//! Fact poller task
//!
//! Keeps the fact cache fresh so nothing slow runs under the controller
//! lock. Each fact group is re-fetched once its TTL has run out.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};
use tracing::{debug, info};

use sentryhub_core::traits::{SensorDetail, ServiceState};

use crate::services::{FactCache, FactGroup, HostFacts, HttpSensorDirectory, LinuxSystemFacts};

/// How often the poller wakes to check TTLs and the stop flag
pub const POLL_WAKE_MS: u64 = 250;

/// Blocking probes behind the cache
pub trait FactSource {
    fn host(&self) -> HostFacts;
    fn services(&self, units: &[String]) -> BTreeMap<String, ServiceState>;
    fn sensors(&self) -> Vec<String>;
    fn limits(&self) -> BTreeMap<String, i32>;
    fn detail(&self, name: &str) -> SensorDetail;
}

/// The local host plus the limit service
#[derive(Debug, Clone)]
pub struct LinuxFactSource {
    system: LinuxSystemFacts,
    sensors: HttpSensorDirectory,
}

impl LinuxFactSource {
    pub fn new(system: LinuxSystemFacts, sensors: HttpSensorDirectory) -> Self {
        Self { system, sensors }
    }
}

impl FactSource for LinuxFactSource {
    fn host(&self) -> HostFacts {
        self.system.host()
    }

    fn services(&self, units: &[String]) -> BTreeMap<String, ServiceState> {
        self.system.services(units)
    }

    fn sensors(&self) -> Vec<String> {
        self.sensors.fetch_sensors()
    }

    fn limits(&self) -> BTreeMap<String, i32> {
        self.sensors.fetch_limits()
    }

    fn detail(&self, name: &str) -> SensorDetail {
        self.sensors.fetch_detail(name)
    }
}

/// Fills a [`FactCache`] from a [`FactSource`]
pub struct FactPoller<S> {
    source: S,
    cache: Arc<FactCache>,
    services: Vec<String>,
}

impl<S: FactSource> FactPoller<S> {
    pub fn new(source: S, cache: Arc<FactCache>, services: Vec<String>) -> Self {
        Self {
            source,
            cache,
            services,
        }
    }

    /// Re-fetch every group whose TTL has expired
    ///
    /// Returns the groups that were fetched.
    pub fn poll_due(&self, now: Instant) -> Vec<FactGroup> {
        let mut polled = Vec::new();

        if self.cache.is_due(FactGroup::Host, now) {
            self.cache.store_host(self.source.host(), now);
            polled.push(FactGroup::Host);
        }

        if self.cache.is_due(FactGroup::Services, now) {
            self.cache
                .store_services(self.source.services(&self.services), now);
            polled.push(FactGroup::Services);
        }

        if self.cache.is_due(FactGroup::Sensors, now) {
            let mut sensors = self.source.sensors();
            sensors.sort();
            let limits = self.source.limits();
            let details = sensors
                .iter()
                .map(|name| (name.clone(), self.source.detail(name)))
                .collect();
            debug!("polled {} sensors", sensors.len());
            self.cache.store_sensors(sensors, limits, details, now);
            polled.push(FactGroup::Sensors);
        }

        polled
    }
}

impl<S: FactSource + Send + 'static> FactPoller<S> {
    /// Run on a dedicated thread until `running` is cleared
    pub fn spawn(self, running: Arc<AtomicBool>) -> std::io::Result<JoinHandle<()>> {
        std::thread::Builder::new()
            .name("fact-poller".into())
            .spawn(move || {
                info!("fact poller started, ttl {:?}", self.cache.ttl());
                while running.load(Ordering::Relaxed) {
                    self.poll_due(Instant::now());
                    std::thread::sleep(Duration::from_millis(POLL_WAKE_MS));
                }
                info!("fact poller stopped");
            })
    }
}
