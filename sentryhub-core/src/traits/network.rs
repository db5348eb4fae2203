//! Wi-Fi scanning

use alloc::string::String;

/// Identifies one scan request so late completions can be discarded
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ScanTicket(pub u32);

/// A network seen by a scan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Network {
    pub ssid: String,
    /// Signal quality 0-100
    pub signal: u8,
}

impl Network {
    pub fn new(ssid: impl Into<String>, signal: u8) -> Self {
        Self {
            ssid: ssid.into(),
            signal: signal.min(100),
        }
    }
}

/// Trait for starting a background scan
///
/// Implementations must return immediately. The result is delivered later
/// through `MenuController::complete_scan` with the same ticket.
pub trait NetworkScanner {
    fn start_scan(&mut self, ticket: ScanTicket);
}
