//! Configuration loading
//!
//! Three documents feed the service: the application config, the menu
//! definition and the persisted user settings.

mod app;
mod menu;
mod settings;

pub use app::AppConfig;
pub use menu::{load_menu, parse_menu};
pub use settings::FileSettings;

use std::path::PathBuf;

use sentryhub_core::menu::DefinitionError;

/// Errors that abort startup
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid menu definition: {0}")]
    Definition(DefinitionError),
    #[error("invalid value for {key}: {value}")]
    Invalid { key: &'static str, value: String },
}

// The core error only implements Display, so it cannot be a #[source]
impl From<DefinitionError> for ConfigError {
    fn from(err: DefinitionError) -> Self {
        ConfigError::Definition(err)
    }
}
