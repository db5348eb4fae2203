//! Rows synthesized at navigation time
//!
//! Sensor lists, sensor detail screens, scan results and service status
//! are built from live data rather than the definition document. Every
//! generated menu ends in a Back row.

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use super::item::{MenuId, MenuItem, DEFAULT_BACK_TEXT, THRESHOLD_MAX_DB, THRESHOLD_MIN_DB};
use crate::traits::{Network, ScanTicket, SensorDetail, ServiceState};

/// Most networks shown after a scan
pub const MAX_SCAN_RESULTS: usize = 10;

/// Progress of the current Wi-Fi scan
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ScanState {
    #[default]
    Idle,
    Scanning(ScanTicket),
    Complete(heapless::Vec<Network, MAX_SCAN_RESULTS>),
}

fn back() -> MenuItem {
    MenuItem::Back {
        text: String::from(DEFAULT_BACK_TEXT),
    }
}

fn label(text: impl Into<String>, right: Option<String>) -> MenuItem {
    MenuItem::Static {
        text: text.into(),
        right,
    }
}

/// Expand every sensor summary row into itself plus one row per sensor
///
/// Sensor rows are sorted by name and lead to that sensor's detail view.
pub fn expand_sensor_summaries(items: &[MenuItem], sensors: &[String]) -> Vec<MenuItem> {
    let mut sorted: Vec<&String> = sensors.iter().collect();
    sorted.sort();

    let mut out = Vec::with_capacity(items.len() + sensors.len());
    for item in items {
        out.push(item.clone());
        if matches!(item, MenuItem::SensorSummary { .. }) {
            out.extend(sorted.iter().map(|name| MenuItem::Submenu {
                text: (*name).clone(),
                submenu: MenuId::Sensor((*name).clone()),
            }));
        }
    }
    out
}

/// Detail screen for one sensor
pub fn sensor_detail_rows(name: &str, detail: &SensorDetail) -> Vec<MenuItem> {
    let reading = match detail.current_reading {
        Some(db) => format!("{:.1} dB", db),
        None => String::from("--"),
    };

    let mut rows = Vec::with_capacity(5);
    rows.push(label(name, None));
    rows.push(label("Reading", Some(reading)));
    rows.push(label(
        "Rate",
        Some(format!("{:.1}/s", detail.measurements_per_second)),
    ));
    rows.push(MenuItem::ThresholdBar {
        text: String::from("Threshold"),
        sensor: String::from(name),
        min: THRESHOLD_MIN_DB,
        max: THRESHOLD_MAX_DB,
    });
    rows.push(back());
    rows
}

/// Number of signal bars (0-4) for a quality percentage
pub fn signal_bars(signal: u8) -> u8 {
    match signal {
        75.. => 4,
        50..=74 => 3,
        25..=49 => 2,
        1..=24 => 1,
        0 => 0,
    }
}

/// ASCII rendition of the bar count
pub fn signal_glyph(signal: u8) -> &'static str {
    match signal_bars(signal) {
        4 => "||||",
        3 => "|||",
        2 => "||",
        1 => "|",
        _ => "",
    }
}

/// Keep the strongest entry per SSID, strongest first, at most ten
///
/// Hidden networks (empty SSID) are dropped.
pub fn rank_networks(mut networks: Vec<Network>) -> heapless::Vec<Network, MAX_SCAN_RESULTS> {
    networks.retain(|n| !n.ssid.is_empty());
    networks.sort_by(|a, b| b.signal.cmp(&a.signal).then_with(|| a.ssid.cmp(&b.ssid)));

    let mut ranked: heapless::Vec<Network, MAX_SCAN_RESULTS> = heapless::Vec::new();
    for network in networks {
        if ranked.iter().any(|n| n.ssid == network.ssid) {
            continue;
        }
        if ranked.push(network).is_err() {
            break;
        }
    }
    ranked
}

/// Rows for the network scan menu
pub fn scan_rows(state: &ScanState) -> Vec<MenuItem> {
    let mut rows = Vec::new();
    match state {
        ScanState::Idle | ScanState::Scanning(_) => rows.push(label("Scanning...", None)),
        ScanState::Complete(networks) if networks.is_empty() => {
            rows.push(label("No networks", None))
        }
        ScanState::Complete(networks) => {
            rows.extend(networks.iter().map(|n| {
                let glyph = signal_glyph(n.signal);
                let right = (!glyph.is_empty()).then(|| String::from(glyph));
                label(n.ssid.clone(), right)
            }));
        }
    }
    rows.push(back());
    rows
}

/// Rows for the service status menu
pub fn service_rows(services: &[(String, ServiceState)]) -> Vec<MenuItem> {
    let mut rows: Vec<MenuItem> = services
        .iter()
        .map(|(name, state)| label(name.clone(), Some(state.badge())))
        .collect();
    if rows.is_empty() {
        rows.push(label("No services", None));
    }
    rows.push(back());
    rows
}
