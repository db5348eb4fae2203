//! Messages passed between worker threads and the hub

use sentryhub_core::traits::{Network, ScanTicket};

/// Result of one background Wi-Fi scan
#[derive(Debug, Clone, PartialEq)]
pub struct ScanCompletion {
    pub ticket: ScanTicket,
    pub networks: Vec<Network>,
}
