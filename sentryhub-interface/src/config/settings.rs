use std::path::{Path, PathBuf};
use toml::{Table, Value};
use tracing::{debug, info, warn};

use sentryhub_core::menu::AlertLevel;
use sentryhub_core::traits::settings::{
    keys, DEFAULT_DISPLAY_BRIGHTNESS, DEFAULT_LED_BRIGHTNESS, DEFAULT_ORIENTATION,
};
use sentryhub_core::traits::{SettingsError, SettingsStore};

/// User settings persisted as a flat TOML table
///
/// Every set rewrites the file before returning. The in-memory table is
/// updated first, so a failed write still changes the running value.
#[derive(Debug)]
pub struct FileSettings {
    path: PathBuf,
    values: Table,
}

impl FileSettings {
    /// Factory values for every known key
    pub fn defaults() -> Table {
        let mut table = Table::new();
        table.insert(
            keys::DISPLAY_BRIGHTNESS.to_string(),
            Value::Integer(DEFAULT_DISPLAY_BRIGHTNESS.into()),
        );
        table.insert(
            keys::LED_BRIGHTNESS.to_string(),
            Value::Integer(DEFAULT_LED_BRIGHTNESS.into()),
        );
        table.insert(
            keys::ORIENTATION.to_string(),
            Value::Integer(DEFAULT_ORIENTATION.into()),
        );
        for level in [AlertLevel::Normal, AlertLevel::Warning, AlertLevel::Critical] {
            table.insert(
                level.key().to_string(),
                Value::Float(decimal(level.default_hue())),
            );
        }
        table
    }

    /// Load settings from `path`
    ///
    /// A missing or unreadable file is not an error: the defaults are used
    /// and the file is written on the first change.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let mut values = Self::defaults();

        match std::fs::read_to_string(&path) {
            Ok(text) => match text.parse::<Table>() {
                Ok(stored) => {
                    debug!("loaded {} settings from {}", stored.len(), path.display());
                    values.extend(stored);
                }
                Err(e) => warn!("corrupt settings file {}, using defaults: {}", path.display(), e),
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!("no settings at {}, using defaults", path.display());
            }
            Err(e) => warn!("cannot read settings {}, using defaults: {}", path.display(), e),
        }

        Self { path, values }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn save(&self) -> Result<(), SettingsError> {
        let text = toml::to_string(&self.values).map_err(|e| {
            warn!("failed to encode settings: {}", e);
            SettingsError::Encode
        })?;

        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() {
                std::fs::create_dir_all(dir).map_err(|e| {
                    warn!("failed to create {}: {}", dir.display(), e);
                    SettingsError::Io
                })?;
            }
        }

        // Write beside the target and rename so a crash never leaves half a file
        let tmp = self.path.with_extension("toml.tmp");
        std::fs::write(&tmp, text)
            .and_then(|()| std::fs::rename(&tmp, &self.path))
            .map_err(|e| {
                warn!("failed to write {}: {}", self.path.display(), e);
                SettingsError::Io
            })
    }
}

/// Widen through the shortest decimal form so 0.15 is stored as 0.15
fn decimal(value: f32) -> f64 {
    value.to_string().parse().unwrap_or(f64::from(value))
}

impl SettingsStore for FileSettings {
    fn get_int(&self, key: &str, default: i32) -> i32 {
        match self.values.get(key) {
            Some(Value::Integer(v)) => i32::try_from(*v).unwrap_or(default),
            Some(Value::Float(v)) => v.round() as i32,
            _ => default,
        }
    }

    fn set_int(&mut self, key: &str, value: i32) -> Result<(), SettingsError> {
        self.values
            .insert(key.to_string(), Value::Integer(value.into()));
        self.save()
    }

    fn get_float(&self, key: &str, default: f32) -> f32 {
        match self.values.get(key) {
            Some(Value::Float(v)) => *v as f32,
            Some(Value::Integer(v)) => *v as f32,
            _ => default,
        }
    }

    fn set_float(&mut self, key: &str, value: f32) -> Result<(), SettingsError> {
        self.values.insert(key.to_string(), Value::Float(decimal(value)));
        self.save()
    }
}
