//! Host facts from the local system

use std::collections::BTreeMap;
use std::process::Command;
use std::sync::Arc;
use tracing::debug;

use sentryhub_core::traits::system::format_uptime;
use sentryhub_core::traits::{ServiceState, SystemFacts};

use super::cache::{FactCache, HostFacts};
use super::wifi::unescape_terse;

pub const NO_SSID: &str = "Not connected";
pub const NO_IP: &str = "No IP";
pub const NO_UPTIME: &str = "Unknown";
pub const NO_LOAD: &str = "N/A";

/// Run a command and return its trimmed stdout if it exited cleanly
fn run(program: &str, args: &[&str]) -> Option<String> {
    match Command::new(program).args(args).output() {
        Ok(output) if output.status.success() => {
            Some(String::from_utf8_lossy(&output.stdout).trim().to_string())
        }
        Ok(output) => {
            debug!("{} exited with {}", program, output.status);
            None
        }
        Err(e) => {
            debug!("failed to run {}: {}", program, e);
            None
        }
    }
}

/// Active SSID from `nmcli -t -f active,ssid dev wifi` output
pub fn parse_active_ssid(output: &str) -> Option<String> {
    output
        .lines()
        .find_map(|line| line.strip_prefix("yes:"))
        .map(unescape_terse)
        .filter(|ssid| !ssid.is_empty())
}

/// First address from `hostname -I`
pub fn parse_first_address(output: &str) -> Option<String> {
    output.split_whitespace().next().map(String::from)
}

/// Whole seconds from `/proc/uptime`
pub fn parse_uptime_seconds(text: &str) -> Option<u64> {
    let secs: f64 = text.split_whitespace().next()?.parse().ok()?;
    (secs >= 0.0).then_some(secs as u64)
}

/// `1m / 5m / 15m` from `/proc/loadavg`
pub fn parse_loadavg(text: &str) -> Option<String> {
    let fields: Vec<&str> = text.split_whitespace().take(3).collect();
    (fields.len() == 3).then(|| fields.join(" / "))
}

/// Probes the local Linux host
///
/// Every probe shells out or reads procfs, so this is only used from the
/// poller thread.
#[derive(Debug, Clone, Default)]
pub struct LinuxSystemFacts;

impl LinuxSystemFacts {
    pub fn new() -> Self {
        Self
    }

    pub fn wifi_ssid(&self) -> String {
        if let Some(ssid) = run("iwgetid", &["-r"]).filter(|s| !s.is_empty()) {
            return ssid;
        }
        run("nmcli", &["-t", "-f", "active,ssid", "dev", "wifi"])
            .and_then(|out| parse_active_ssid(&out))
            .unwrap_or_else(|| NO_SSID.to_string())
    }

    pub fn ip_address(&self) -> String {
        run("hostname", &["-I"])
            .and_then(|out| parse_first_address(&out))
            .unwrap_or_else(|| NO_IP.to_string())
    }

    pub fn uptime(&self) -> String {
        std::fs::read_to_string("/proc/uptime")
            .ok()
            .and_then(|text| parse_uptime_seconds(&text))
            .map(format_uptime)
            .unwrap_or_else(|| NO_UPTIME.to_string())
    }

    pub fn load_average(&self) -> String {
        std::fs::read_to_string("/proc/loadavg")
            .ok()
            .and_then(|text| parse_loadavg(&text))
            .unwrap_or_else(|| NO_LOAD.to_string())
    }

    /// `systemctl is-active` prints the state even when it exits non-zero
    pub fn service_status(&self, unit: &str) -> ServiceState {
        match Command::new("systemctl").args(["is-active", unit]).output() {
            Ok(output) => ServiceState::from_status_word(&String::from_utf8_lossy(&output.stdout)),
            Err(e) => {
                debug!("failed to query {}: {}", unit, e);
                ServiceState::Unavailable
            }
        }
    }

    pub fn host(&self) -> HostFacts {
        HostFacts {
            ssid: self.wifi_ssid(),
            ip: self.ip_address(),
            uptime: self.uptime(),
            load: self.load_average(),
        }
    }

    pub fn services(&self, units: &[String]) -> BTreeMap<String, ServiceState> {
        units
            .iter()
            .map(|unit| (unit.clone(), self.service_status(unit)))
            .collect()
    }
}

/// [`SystemFacts`] answered from the poller's cache
#[derive(Debug, Clone)]
pub struct CachedFacts {
    cache: Arc<FactCache>,
    services: Vec<String>,
}

impl CachedFacts {
    pub fn new(cache: Arc<FactCache>, services: Vec<String>) -> Self {
        Self { cache, services }
    }
}

impl SystemFacts for CachedFacts {
    fn wifi_ssid(&self) -> String {
        self.cache.host().ssid
    }

    fn ip_address(&self) -> String {
        self.cache.host().ip
    }

    fn uptime(&self) -> String {
        self.cache.host().uptime
    }

    fn load_average(&self) -> String {
        self.cache.host().load
    }

    fn service_status(&self, name: &str) -> ServiceState {
        self.cache.service(name)
    }

    fn monitored_services(&self) -> Vec<String> {
        self.services.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    #[test]
    fn test_active_ssid() {
        let out = "no:Neighbour\nyes:Home\\:Net\nno:Cafe\n";
        assert_eq!(parse_active_ssid(out), Some("Home:Net".to_string()));
        assert_eq!(parse_active_ssid("no:Cafe\n"), None);
        assert_eq!(parse_active_ssid("yes:\n"), None);
    }

    #[test]
    fn test_first_address() {
        assert_eq!(
            parse_first_address("192.168.1.20 fd00::1 \n"),
            Some("192.168.1.20".to_string())
        );
        assert_eq!(parse_first_address("  \n"), None);
    }

    #[test]
    fn test_uptime_and_load() {
        assert_eq!(parse_uptime_seconds("3723.91 12000.00\n"), Some(3_723));
        assert_eq!(parse_uptime_seconds("garbage"), None);
        assert_eq!(
            parse_loadavg("0.52 0.58 0.59 1/123 4567\n"),
            Some("0.52 / 0.58 / 0.59".to_string())
        );
        assert_eq!(parse_loadavg("0.52"), None);
    }

    #[test]
    fn test_cached_facts_read_cache() {
        let cache = Arc::new(FactCache::new(Duration::from_secs(5)));
        let now = Instant::now();
        cache.store_host(
            HostFacts {
                ssid: "home".to_string(),
                ip: "10.0.0.5".to_string(),
                uptime: "1h 0m 0s".to_string(),
                load: NO_LOAD.to_string(),
            },
            now,
        );
        let mut services = BTreeMap::new();
        services.insert("a.service".to_string(), ServiceState::Failed);
        cache.store_services(services, now);

        let facts = CachedFacts::new(cache, vec!["a.service".to_string()]);
        assert_eq!(facts.wifi_ssid(), "home");
        assert_eq!(facts.ip_address(), "10.0.0.5");
        assert_eq!(facts.load_average(), "N/A");
        assert_eq!(facts.service_status("a.service"), ServiceState::Failed);
        assert_eq!(facts.service_status("b.service"), ServiceState::Unavailable);
        assert_eq!(facts.monitored_services(), vec!["a.service"]);
    }
}
