//! nmcli Wi-Fi scanning

use std::process::Command;
use tracing::{debug, warn};

use sentryhub_core::traits::Network;

/// Split one line of `nmcli -t` output into fields
///
/// Terse mode escapes `:` and `\` inside values with a backslash.
pub fn split_terse(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                if let Some(next) = chars.next() {
                    current.push(next);
                }
            }
            ':' => fields.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    fields.push(current);
    fields
}

/// Undo terse escaping in a single value
pub fn unescape_terse(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(next) = chars.next() {
                out.push(next);
            }
        } else {
            out.push(c);
        }
    }
    out
}

/// Parse `nmcli -t -f SSID,SIGNAL dev wifi list` output
///
/// Malformed lines are skipped. Hidden networks come through with an
/// empty SSID and are left for ranking to drop.
pub fn parse_scan(output: &str) -> Vec<Network> {
    output
        .lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| {
            let fields = split_terse(line);
            let [ssid, signal] = fields.as_slice() else {
                debug!("skipping scan line: {}", line);
                return None;
            };
            let signal = signal.trim().parse::<u8>().ok()?;
            Some(Network::new(ssid.clone(), signal))
        })
        .collect()
}

/// Run a blocking rescan on `interface`
pub fn scan_networks(interface: &str) -> Vec<Network> {
    let output = Command::new("nmcli")
        .args(["-t", "-f", "SSID,SIGNAL", "dev", "wifi", "list"])
        .args(["ifname", interface, "--rescan", "yes"])
        .output();

    match output {
        Ok(o) if o.status.success() => parse_scan(&String::from_utf8_lossy(&o.stdout)),
        Ok(o) => {
            warn!(
                "nmcli scan failed ({}): {}",
                o.status,
                String::from_utf8_lossy(&o.stderr).trim()
            );
            Vec::new()
        }
        Err(e) => {
            warn!("failed to run nmcli: {}", e);
            Vec::new()
        }
    }
}
