//! Shared access to the menu controller
//!
//! Input, the refresh ticker and scan completions all arrive on different
//! threads. They serialize through one reentrant lock, so a handler that
//! triggers a redraw can re-enter the hub on the same thread without
//! deadlocking.

use parking_lot::ReentrantMutex;
use std::cell::RefCell;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

use sentryhub_core::traits::{Hardware, InputEvent};
use sentryhub_core::{MenuController, UiEvent};

use crate::channels::ScanCompletion;

pub struct Hub<H: Hardware> {
    controller: ReentrantMutex<RefCell<MenuController<H>>>,
    epoch: Instant,
    running: Arc<AtomicBool>,
}

impl<H: Hardware> Hub<H> {
    /// Wrap a controller; its clock starts now
    pub fn new(controller: MenuController<H>) -> Self {
        Self {
            controller: ReentrantMutex::new(RefCell::new(controller)),
            epoch: Instant::now(),
            running: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Milliseconds since the hub was created
    pub fn now_ms(&self) -> u64 {
        self.epoch.elapsed().as_millis() as u64
    }

    /// Stop flag shared with the background loops
    pub fn running(&self) -> Arc<AtomicBool> {
        self.running.clone()
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Relaxed)
    }

    /// Run `f` with exclusive access to the controller
    ///
    /// Must not be nested inside another `with_controller` on the same
    /// thread; use the hub methods, which release the borrow first.
    pub fn with_controller<R>(&self, f: impl FnOnce(&mut MenuController<H>) -> R) -> R {
        let guard = self.controller.lock();
        let mut controller = guard.borrow_mut();
        f(&mut controller)
    }

    /// Apply persisted settings and draw the root menu
    pub fn start(&self) {
        let now = self.now_ms();
        self.with_controller(|c| c.start(now));
        info!("hub started");
    }

    pub fn handle_input(&self, event: InputEvent) -> Option<UiEvent> {
        self.handle_input_at(event, self.now_ms())
    }

    /// Handle one input event at `now_ms`
    ///
    /// An event that wakes the panel only redraws it. The redraw re-enters
    /// the hub while this call still holds the lock.
    pub fn handle_input_at(&self, event: InputEvent, now_ms: u64) -> Option<UiEvent> {
        let guard = self.controller.lock();

        let woke = guard.borrow_mut().wake(now_ms);
        if woke {
            debug!("{:?} woke the display", event);
            self.redraw();
            return Some(UiEvent::Woke);
        }

        let outcome = guard.borrow_mut().process_input(event, now_ms);
        if let Some(outcome) = &outcome {
            debug!("{:?} -> {:?}", event, outcome);
        }
        outcome
    }

    pub fn tick(&self) -> bool {
        self.tick_at(self.now_ms())
    }

    pub fn tick_at(&self, now_ms: u64) -> bool {
        self.with_controller(|c| c.tick(now_ms))
    }

    pub fn complete_scan(&self, done: ScanCompletion) -> bool {
        self.with_controller(|c| c.complete_scan(done.ticket, done.networks))
    }

    pub fn redraw(&self) {
        self.with_controller(|c| c.redraw());
    }

    /// Stop the background loops and blank the panel
    pub fn shutdown(&self) {
        if !self.running.swap(false, Ordering::Relaxed) {
            return;
        }
        self.with_controller(|c| {
            if let Err(e) = c.hardware_mut().display().blank() {
                warn!("failed to blank display on shutdown: {:?}", e);
            }
        });
        info!("hub stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use std::sync::mpsc::{self, Receiver};
    use std::time::Duration;

    use sentryhub_core::menu::{Generator, MenuId};
    use sentryhub_core::traits::{Network, Rotation, SettingsStore};

    use crate::config::{parse_menu, FileSettings};
    use crate::display::{LedMode, SimDisplay, SimLed};
    use crate::hardware::LinuxHardware;
    use crate::services::{
        CachedFacts, CachedSensors, FactCache, HostFacts, HttpSensorDirectory, LimitWriter,
    };
    use crate::tasks::refresh::refresh_step;
    use crate::tasks::NmcliScanner;

    const MENU: &str = r#"
        [[menus.main]]
        type = "dynamic"
        text = "IP: {ip}"
        function = "ip_address"

        [[menus.main]]
        type = "dynamic_submenu"
        text = "Wi-Fi"
        generator = "network_scan"

        [[menus.main]]
        type = "brightness_bar"
        text = "Display"
        setting = "display_brightness"

        [[menus.main]]
        type = "back"
    "#;

    fn fake_scan(_interface: &str) -> Vec<Network> {
        vec![Network::new("home", 80), Network::new("cafe", 30)]
    }

    fn hub(dir: &Path) -> (Hub<LinuxHardware>, Receiver<ScanCompletion>) {
        let cache = Arc::new(FactCache::new(Duration::from_secs(60)));
        cache.store_host(
            HostFacts {
                ip: "10.0.0.5".to_string(),
                ..HostFacts::default()
            },
            Instant::now(),
        );
        let directory =
            HttpSensorDirectory::new("http://127.0.0.1:9", Duration::from_millis(100)).unwrap();
        let (scan_tx, scan_rx) = mpsc::channel();

        let hw = LinuxHardware::new(
            SimDisplay::new(),
            FileSettings::load(dir.join("settings.toml")),
            SimLed::new(4),
            cache.clone(),
            CachedSensors::new(cache.clone(), LimitWriter::new(directory)),
            CachedFacts::new(cache, vec!["a.service".to_string()]),
            NmcliScanner::with_scan("wlan0", scan_tx, fake_scan),
        );
        let definition = parse_menu(MENU, Path::new("menu.toml")).unwrap();
        let controller = MenuController::new(hw, definition, 60_000, 0);
        (Hub::new(controller), scan_rx)
    }

    fn texts(hub: &Hub<LinuxHardware>) -> Vec<String> {
        hub.with_controller(|c| c.rows().iter().map(|r| r.text.to_string()).collect())
    }

    #[test]
    fn test_start_draws_root() {
        let dir = tempfile::tempdir().unwrap();
        let (hub, _scans) = hub(dir.path());
        hub.start();

        assert_eq!(texts(&hub), vec!["IP: 10.0.0.5", "Wi-Fi", "Display", "Back"]);
        hub.with_controller(|c| {
            let display = &c.hardware().display;
            assert!(!display.is_blanked());
            assert_eq!(display.rotation(), Rotation::Deg180);
            assert_eq!(c.hardware().led.brightness(), 255);
        });
    }

    #[test]
    fn test_waking_input_only_redraws() {
        let dir = tempfile::tempdir().unwrap();
        let (hub, _scans) = hub(dir.path());
        hub.start();

        assert!(!hub.tick_at(120_000));
        assert!(hub.with_controller(|c| c.hardware().display.is_blanked()));

        assert_eq!(
            hub.handle_input_at(InputEvent::Rotation(1), 120_100),
            Some(UiEvent::Woke)
        );
        hub.with_controller(|c| {
            assert!(!c.is_sleeping());
            assert!(!c.hardware().display.is_blanked());
            assert_eq!(c.selected_index(), 0);
        });

        assert_eq!(
            hub.handle_input_at(InputEvent::Rotation(1), 120_200),
            Some(UiEvent::Moved)
        );
    }

    #[test]
    fn test_scan_delivered_through_channel() {
        let dir = tempfile::tempdir().unwrap();
        let (hub, scans) = hub(dir.path());
        hub.start();

        hub.handle_input_at(InputEvent::Rotation(1), 10);
        assert_eq!(
            hub.handle_input_at(InputEvent::Press, 20),
            Some(UiEvent::Entered(MenuId::Generated(Generator::NetworkScan)))
        );
        assert_eq!(texts(&hub), vec!["Scanning...", "Back"]);

        let done = scans.recv_timeout(Duration::from_secs(5)).unwrap();
        assert!(hub.complete_scan(done));
        assert_eq!(texts(&hub), vec!["home", "cafe", "Back"]);
    }

    #[test]
    fn test_bar_edit_persists_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let (hub, _scans) = hub(dir.path());
        hub.start();

        hub.handle_input_at(InputEvent::Rotation(2), 10);
        hub.handle_input_at(InputEvent::Press, 20);
        hub.handle_input_at(InputEvent::Rotation(-10), 30);
        assert!(hub.with_controller(|c| c.edit_state().is_open()));
        assert_eq!(
            hub.handle_input_at(InputEvent::Press, 40),
            Some(UiEvent::EditCommitted)
        );
        assert!(!hub.with_controller(|c| c.edit_state().is_open()));

        let stored = FileSettings::load(dir.path().join("settings.toml"));
        assert_eq!(stored.get_int("display_brightness", 0), 160);
    }

    #[test]
    fn test_refresh_step_updates_status() {
        let dir = tempfile::tempdir().unwrap();
        let (hub, scans) = hub(dir.path());
        hub.start();

        let interval = Duration::from_millis(5);
        let start = Instant::now();
        let next = refresh_step(&hub, &scans, start, interval);
        assert!(next >= start + interval);
        hub.with_controller(|c| {
            assert!(matches!(c.hardware().led.mode(), LedMode::Status(_)));
        });
    }

    #[test]
    fn test_shutdown_blanks_once() {
        let dir = tempfile::tempdir().unwrap();
        let (hub, _scans) = hub(dir.path());
        hub.start();
        let flag = hub.running();

        hub.shutdown();
        assert!(!hub.is_running());
        assert!(!flag.load(Ordering::Relaxed));
        assert!(hub.with_controller(|c| c.hardware().display.is_blanked()));

        hub.shutdown();
    }
}
