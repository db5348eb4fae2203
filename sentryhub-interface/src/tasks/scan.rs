//! Wi-Fi scan workers

use std::sync::mpsc::Sender;
use tracing::{debug, error};

use sentryhub_core::traits::{Network, NetworkScanner, ScanTicket};

use crate::channels::ScanCompletion;
use crate::services::wifi::scan_networks;

/// Starts each scan on its own thread and reports through a channel
///
/// Completions carry the ticket they were started with; the controller
/// drops any that are no longer current.
#[derive(Clone)]
pub struct NmcliScanner {
    interface: String,
    results: Sender<ScanCompletion>,
    scan: fn(&str) -> Vec<Network>,
}

impl NmcliScanner {
    pub fn new(interface: impl Into<String>, results: Sender<ScanCompletion>) -> Self {
        Self::with_scan(interface, results, scan_networks)
    }

    /// Use `scan` in place of running nmcli
    pub fn with_scan(
        interface: impl Into<String>,
        results: Sender<ScanCompletion>,
        scan: fn(&str) -> Vec<Network>,
    ) -> Self {
        Self {
            interface: interface.into(),
            results,
            scan,
        }
    }
}

impl std::fmt::Debug for NmcliScanner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NmcliScanner")
            .field("interface", &self.interface)
            .finish_non_exhaustive()
    }
}

impl NetworkScanner for NmcliScanner {
    fn start_scan(&mut self, ticket: ScanTicket) {
        let interface = self.interface.clone();
        let results = self.results.clone();
        let scan = self.scan;

        let spawned = std::thread::Builder::new()
            .name(format!("wifi-scan-{}", ticket.0))
            .spawn(move || {
                let networks = scan(&interface);
                debug!("scan {:?} finished with {} networks", ticket, networks.len());
                // The hub is gone if the receiver hung up
                let _ = results.send(ScanCompletion { ticket, networks });
            });
        if let Err(e) = spawned {
            error!("failed to spawn scan worker: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;
    use std::time::Duration;

    fn fake_scan(interface: &str) -> Vec<Network> {
        vec![Network::new(interface, 60)]
    }

    #[test]
    fn test_completion_carries_ticket() {
        let (tx, rx) = mpsc::channel();
        let mut scanner = NmcliScanner::with_scan("wlan1", tx, fake_scan);

        scanner.start_scan(ScanTicket(7));
        let done = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(done.ticket, ScanTicket(7));
        assert_eq!(done.networks, vec![Network::new("wlan1", 60)]);
    }
}
