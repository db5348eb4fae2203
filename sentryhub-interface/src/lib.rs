//! SentryHub front-panel service
//!
//! Runs the `sentryhub-core` menu engine on the Linux hub:
//!
//! - Configuration, menu definition and persisted settings
//! - Cached host facts and the limit-service client
//! - The shared [`Hub`] and its background tasks

pub mod channels;
pub mod config;
pub mod display;
pub mod hardware;
pub mod hub;
pub mod services;
pub mod tasks;

pub use config::{AppConfig, ConfigError};
pub use hardware::LinuxHardware;
pub use hub::Hub;
