//! Host facts: network identity, uptime, load and unit status

use alloc::string::String;
use alloc::vec::Vec;

/// Placeholder shown when a fact cannot be determined
pub const UNKNOWN: &str = "?";

/// Service status could not be queried
pub const UNAVAILABLE: &str = "Unavailable";

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// systemd unit state as reported by `systemctl is-active`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceState {
    Active,
    Inactive,
    Failed,
    Activating,
    Deactivating,
    /// Any other state word
    Other(String),
    /// Status could not be queried
    Unavailable,
}

impl ServiceState {
    /// Parse the single-word output of `systemctl is-active`
    pub fn from_status_word(word: &str) -> Self {
        match word.trim() {
            "active" => ServiceState::Active,
            "inactive" => ServiceState::Inactive,
            "failed" => ServiceState::Failed,
            "activating" => ServiceState::Activating,
            "deactivating" => ServiceState::Deactivating,
            "" => ServiceState::Unavailable,
            other => ServiceState::Other(String::from(other)),
        }
    }

    /// Human readable status word
    pub fn label(&self) -> String {
        match self {
            ServiceState::Active => String::from("Active"),
            ServiceState::Inactive => String::from("Inactive"),
            ServiceState::Failed => String::from("Failed"),
            ServiceState::Activating => String::from("Starting"),
            ServiceState::Deactivating => String::from("Stopping"),
            ServiceState::Other(word) => capitalize(word),
            ServiceState::Unavailable => String::from(UNAVAILABLE),
        }
    }

    /// Short badge for list rows
    ///
    /// The three common states get a fixed badge; anything else is the
    /// status word cut to six characters.
    pub fn badge(&self) -> String {
        match self {
            ServiceState::Active => String::from("[up]"),
            ServiceState::Inactive => String::from("[down]"),
            ServiceState::Failed => String::from("[fail]"),
            other => other.label().to_lowercase().chars().take(6).collect(),
        }
    }
}

/// Trait for host facts
///
/// Every method returns a display-ready string and degrades to a sentinel
/// rather than failing.
pub trait SystemFacts {
    fn wifi_ssid(&self) -> String;
    fn ip_address(&self) -> String;
    fn uptime(&self) -> String;
    fn load_average(&self) -> String;
    fn service_status(&self, name: &str) -> ServiceState;
    /// Units shown on the service status screen, in display order
    fn monitored_services(&self) -> Vec<String>;
}

/// Format an uptime in seconds as `3h 25m 7s`
pub fn format_uptime(seconds: u64) -> String {
    use core::fmt::Write;

    let mut out = String::new();
    let _ = write!(
        out,
        "{}h {}m {}s",
        seconds / 3_600,
        (seconds % 3_600) / 60,
        seconds % 60
    );
    out
}
