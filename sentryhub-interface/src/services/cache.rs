//! Polled fact cache

use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap};
use std::time::{Duration, Instant};

use sentryhub_core::traits::system::UNKNOWN;
use sentryhub_core::traits::{SensorDetail, ServiceState};

/// Facts polled together on one schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FactGroup {
    Host,
    Services,
    Sensors,
}

/// Display-ready host facts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostFacts {
    pub ssid: String,
    pub ip: String,
    pub uptime: String,
    pub load: String,
}

impl Default for HostFacts {
    fn default() -> Self {
        Self {
            ssid: UNKNOWN.to_string(),
            ip: UNKNOWN.to_string(),
            uptime: UNKNOWN.to_string(),
            load: UNKNOWN.to_string(),
        }
    }
}

#[derive(Debug, Default)]
struct Facts {
    host: HostFacts,
    services: BTreeMap<String, ServiceState>,
    sensors: Vec<String>,
    limits: BTreeMap<String, i32>,
    details: BTreeMap<String, SensorDetail>,
    polled: HashMap<FactGroup, Instant>,
}

/// Last known host and sensor facts with a poll TTL
///
/// Readers always get the most recent value, however old. The TTL only
/// decides when the poller fetches a group again.
#[derive(Debug)]
pub struct FactCache {
    ttl: Duration,
    facts: RwLock<Facts>,
}

impl FactCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            facts: RwLock::new(Facts::default()),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Whether `group` was never polled or has outlived the TTL
    pub fn is_due(&self, group: FactGroup, now: Instant) -> bool {
        match self.facts.read().polled.get(&group) {
            Some(at) => now.saturating_duration_since(*at) >= self.ttl,
            None => true,
        }
    }

    fn mark(facts: &mut Facts, group: FactGroup, now: Instant) {
        facts.polled.insert(group, now);
    }

    pub fn store_host(&self, host: HostFacts, now: Instant) {
        let mut facts = self.facts.write();
        facts.host = host;
        Self::mark(&mut facts, FactGroup::Host, now);
    }

    pub fn host(&self) -> HostFacts {
        self.facts.read().host.clone()
    }

    pub fn store_services(&self, services: BTreeMap<String, ServiceState>, now: Instant) {
        let mut facts = self.facts.write();
        facts.services = services;
        Self::mark(&mut facts, FactGroup::Services, now);
    }

    /// Last polled state of `unit`; units never polled are unavailable
    pub fn service(&self, unit: &str) -> ServiceState {
        self.facts
            .read()
            .services
            .get(unit)
            .cloned()
            .unwrap_or(ServiceState::Unavailable)
    }

    pub fn store_sensors(
        &self,
        sensors: Vec<String>,
        limits: BTreeMap<String, i32>,
        details: BTreeMap<String, SensorDetail>,
        now: Instant,
    ) {
        let mut facts = self.facts.write();
        facts.sensors = sensors;
        facts.limits = limits;
        facts.details = details;
        Self::mark(&mut facts, FactGroup::Sensors, now);
    }

    pub fn sensors(&self) -> Vec<String> {
        self.facts.read().sensors.clone()
    }

    pub fn limits(&self) -> BTreeMap<String, i32> {
        self.facts.read().limits.clone()
    }

    pub fn detail(&self, name: &str) -> SensorDetail {
        self.facts
            .read()
            .details
            .get(name)
            .copied()
            .unwrap_or_default()
    }

    /// Reflect a threshold write before the service confirms it
    pub fn record_limit(&self, name: &str, value: i32) {
        self.facts.write().limits.insert(name.to_string(), value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_groups_due_until_polled() {
        let cache = FactCache::new(Duration::from_secs(5));
        let start = Instant::now();
        assert!(cache.is_due(FactGroup::Host, start));

        cache.store_host(HostFacts::default(), start);
        assert!(!cache.is_due(FactGroup::Host, start + Duration::from_secs(4)));
        assert!(cache.is_due(FactGroup::Host, start + Duration::from_secs(5)));
        assert!(cache.is_due(FactGroup::Services, start));
    }

    #[test]
    fn test_unpolled_reads_degrade() {
        let cache = FactCache::new(Duration::from_secs(5));
        assert_eq!(cache.host().ip, UNKNOWN);
        assert_eq!(cache.service("mosquitto.service"), ServiceState::Unavailable);
        assert!(cache.sensors().is_empty());
        assert_eq!(cache.detail("lab"), SensorDetail::default());
    }

    #[test]
    fn test_optimistic_limit_survives_until_next_poll() {
        let cache = FactCache::new(Duration::from_secs(5));
        let now = Instant::now();
        let mut limits = BTreeMap::new();
        limits.insert("lab".to_string(), 80);
        cache.store_sensors(vec!["lab".to_string()], limits.clone(), BTreeMap::new(), now);

        cache.record_limit("lab", 85);
        assert_eq!(cache.limits().get("lab"), Some(&85));

        cache.store_sensors(vec!["lab".to_string()], limits, BTreeMap::new(), now);
        assert_eq!(cache.limits().get("lab"), Some(&80));
    }
}
