use std::path::PathBuf;
use std::sync::mpsc;
use std::sync::Arc;
use tracing::info;

use sentryhub_core::MenuController;
use sentryhub_interface::config::{load_menu, FileSettings};
use sentryhub_interface::display::{SimDisplay, SimLed};
use sentryhub_interface::services::{
    CachedFacts, CachedSensors, FactCache, HttpSensorDirectory, LimitWriter, LinuxSystemFacts,
};
use sentryhub_interface::tasks::{
    spawn_input_reader, spawn_refresh, FactPoller, LineInput, LinuxFactSource, NmcliScanner,
};
use sentryhub_interface::{AppConfig, Hub, LinuxHardware};

const DEFAULT_CONFIG: &str = "/etc/sentryhub/sentryhub.toml";

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("sentryhub_interface=info".parse()?)
                .add_directive("sentryhub_core=info".parse()?)
                .add_directive("reqwest=warn".parse()?),
        )
        .init();

    let config_path = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG));
    let config = AppConfig::load(&config_path)?;
    let definition = load_menu(&config.menu_path)?;

    // Facts are polled off-lock; the controller only reads the cache
    let cache = Arc::new(FactCache::new(config.fact_ttl()));
    let directory = HttpSensorDirectory::new(&config.limit_service_url, config.http_timeout())?;
    info!("limit service at {}", directory.base());
    let poller = FactPoller::new(
        LinuxFactSource::new(LinuxSystemFacts::new(), directory.clone()),
        cache.clone(),
        config.services.clone(),
    );
    // One synchronous pass so the first frame has real values
    poller.poll_due(std::time::Instant::now());

    let (scan_tx, scan_rx) = mpsc::channel();
    let hardware = LinuxHardware::new(
        SimDisplay::new(),
        FileSettings::load(&config.settings_path),
        SimLed::new(config.led_pixels),
        cache.clone(),
        CachedSensors::new(cache.clone(), LimitWriter::new(directory)),
        CachedFacts::new(cache, config.services.clone()),
        NmcliScanner::new(&config.wifi_interface, scan_tx),
    );

    let controller = MenuController::new(hardware, definition, config.inactivity_timeout_ms, 0);
    let hub = Arc::new(Hub::new(controller));
    hub.start();

    let poller_task = poller.spawn(hub.running())?;
    let refresh_task = spawn_refresh(hub.clone(), scan_rx, config.tick_interval())?;

    let (input_tx, input_rx) = mpsc::channel();
    spawn_input_reader(LineInput::stdin(), input_tx)?;
    info!("ready: +/- to turn, enter to press, q to quit");

    // Runs until the reader quits and drops its sender
    for event in input_rx {
        hub.handle_input(event);
    }

    hub.shutdown();
    let _ = refresh_task.join();
    let _ = poller_task.join();
    Ok(())
}
