//! Limit-service client

use reqwest::blocking::Client;
use reqwest::Url;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

use sentryhub_core::traits::{SensorDetail, SensorDirectory};

use super::cache::FactCache;

/// `/api/sensors` answers with a bare list or wrapped in an object
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SensorList {
    Bare(Vec<String>),
    Wrapped { sensors: Vec<String> },
}

#[derive(Debug, Default, Deserialize)]
struct DetailBody {
    #[serde(default)]
    current_reading: Option<f32>,
    #[serde(default)]
    measurements_per_second: f32,
}

/// Blocking HTTP client for the limit service
///
/// Every failure degrades to an empty or default answer and is logged.
/// Calls block for up to the configured timeout, so this only runs on
/// the poller and limit-writer threads.
#[derive(Debug, Clone)]
pub struct HttpSensorDirectory {
    base: String,
    client: Client,
}

impl HttpSensorDirectory {
    pub fn new(base: impl Into<String>, timeout: Duration) -> reqwest::Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base: base.into(),
            client,
        })
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    /// Build `{base}/seg/seg...` with each segment percent-encoded
    pub fn endpoint(&self, segments: &[&str]) -> Option<Url> {
        let mut url = Url::parse(&self.base).ok()?;
        url.path_segments_mut()
            .ok()?
            .pop_if_empty()
            .extend(segments);
        Some(url)
    }

    fn get_json<T: serde::de::DeserializeOwned>(&self, segments: &[&str]) -> Option<T> {
        let Some(url) = self.endpoint(segments) else {
            error!("invalid limit service url {}", self.base);
            return None;
        };
        let result = self
            .client
            .get(url.clone())
            .send()
            .and_then(|r| r.error_for_status())
            .and_then(|r| r.json::<T>());
        match result {
            Ok(body) => Some(body),
            Err(e) => {
                warn!("GET {} failed: {}", url, e);
                None
            }
        }
    }

    pub fn fetch_sensors(&self) -> Vec<String> {
        match self.get_json::<SensorList>(&["api", "sensors"]) {
            Some(SensorList::Bare(list)) | Some(SensorList::Wrapped { sensors: list }) => list,
            None => Vec::new(),
        }
    }

    /// Limits come back as JSON numbers and are rounded to whole dB
    pub fn fetch_limits(&self) -> BTreeMap<String, i32> {
        self.get_json::<BTreeMap<String, f64>>(&["api", "limits"])
            .unwrap_or_default()
            .into_iter()
            .map(|(name, limit)| (name, limit.round() as i32))
            .collect()
    }

    pub fn fetch_detail(&self, name: &str) -> SensorDetail {
        let body = self
            .get_json::<DetailBody>(&["api", "sensors", name])
            .unwrap_or_default();
        SensorDetail {
            current_reading: body.current_reading,
            measurements_per_second: body.measurements_per_second,
        }
    }

    /// POST `{name: value}` to `/limits`
    pub fn post_limit(&self, name: &str, value: i32) -> bool {
        let Some(url) = self.endpoint(&["limits"]) else {
            error!("invalid limit service url {}", self.base);
            return false;
        };
        let mut body = serde_json::Map::new();
        body.insert(name.to_string(), serde_json::Value::from(value));

        info!("updating limit for {} to {}", name, value);
        match self.client.post(url).json(&body).send() {
            Ok(response) if response.status().is_success() => true,
            Ok(response) => {
                warn!("limit update for {} rejected: {}", name, response.status());
                false
            }
            Err(e) => {
                error!("failed to update limit for {}: {}", name, e);
                false
            }
        }
    }
}

impl SensorDirectory for HttpSensorDirectory {
    fn list_active_sensors(&self) -> Vec<String> {
        self.fetch_sensors()
    }

    fn get_limits(&self) -> BTreeMap<String, i32> {
        self.fetch_limits()
    }

    fn get_sensor_detail(&self, name: &str) -> SensorDetail {
        self.fetch_detail(name)
    }

    fn set_limit(&mut self, name: &str, value: i32) -> bool {
        self.post_limit(name, value)
    }
}

/// Sends threshold writes from one-shot worker threads
#[derive(Debug, Clone)]
pub struct LimitWriter {
    directory: HttpSensorDirectory,
}

impl LimitWriter {
    pub fn new(directory: HttpSensorDirectory) -> Self {
        Self { directory }
    }

    pub fn submit(&self, name: &str, value: i32) {
        let directory = self.directory.clone();
        let name = name.to_string();
        let spawned = std::thread::Builder::new()
            .name("limit-write".into())
            .spawn(move || {
                if !directory.post_limit(&name, value) {
                    warn!("threshold {} for {} not stored", value, name);
                }
            });
        if let Err(e) = spawned {
            error!("failed to spawn limit writer: {}", e);
        }
    }
}

/// [`SensorDirectory`] answered from the poller's cache
///
/// Threshold writes go to a [`LimitWriter`] and are recorded in the cache
/// straight away, so the edit is reported as accepted.
#[derive(Debug, Clone)]
pub struct CachedSensors {
    cache: Arc<FactCache>,
    writer: LimitWriter,
}

impl CachedSensors {
    pub fn new(cache: Arc<FactCache>, writer: LimitWriter) -> Self {
        Self { cache, writer }
    }
}

impl SensorDirectory for CachedSensors {
    fn list_active_sensors(&self) -> Vec<String> {
        self.cache.sensors()
    }

    fn get_limits(&self) -> BTreeMap<String, i32> {
        self.cache.limits()
    }

    fn get_sensor_detail(&self, name: &str) -> SensorDetail {
        self.cache.detail(name)
    }

    fn set_limit(&mut self, name: &str, value: i32) -> bool {
        debug!("queueing threshold {} for {}", value, name);
        self.cache.record_limit(name, value);
        self.writer.submit(name, value);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    fn directory(base: &str) -> HttpSensorDirectory {
        HttpSensorDirectory::new(base, Duration::from_millis(200)).unwrap()
    }

    #[test]
    fn test_endpoint_encoding() {
        let d = directory("http://localhost:8000");
        assert_eq!(
            d.endpoint(&["api", "sensors", "back yard"]).unwrap().as_str(),
            "http://localhost:8000/api/sensors/back%20yard"
        );

        let d = directory("http://hub.local/sentry/");
        assert_eq!(
            d.endpoint(&["limits"]).unwrap().as_str(),
            "http://hub.local/sentry/limits"
        );

        assert!(directory("not a url").endpoint(&["limits"]).is_none());
    }

    #[test]
    fn test_sensor_list_shapes() {
        let bare: SensorList = serde_json::from_str(r#"["lab", "porch"]"#).unwrap();
        assert!(matches!(bare, SensorList::Bare(ref v) if v.len() == 2));

        let wrapped: SensorList = serde_json::from_str(r#"{"sensors": ["lab"]}"#).unwrap();
        assert!(matches!(wrapped, SensorList::Wrapped { ref sensors } if sensors == &["lab"]));
    }

    #[test]
    fn test_detail_body_defaults() {
        let body: DetailBody = serde_json::from_str(r#"{"current_reading": 61.5}"#).unwrap();
        assert_eq!(body.current_reading, Some(61.5));
        assert_eq!(body.measurements_per_second, 0.0);
    }

    #[test]
    fn test_unreachable_service_degrades() {
        // Port 9 (discard) is closed on test hosts
        let mut d = directory("http://127.0.0.1:9");
        assert!(d.list_active_sensors().is_empty());
        assert!(d.get_limits().is_empty());
        assert_eq!(d.get_sensor_detail("lab"), SensorDetail::default());
        assert!(!d.set_limit("lab", 80));
    }

    #[test]
    fn test_cached_write_is_optimistic() {
        let cache = Arc::new(FactCache::new(Duration::from_secs(5)));
        cache.store_sensors(
            vec!["lab".to_string()],
            BTreeMap::new(),
            BTreeMap::new(),
            Instant::now(),
        );
        let mut sensors =
            CachedSensors::new(cache.clone(), LimitWriter::new(directory("http://127.0.0.1:9")));

        assert_eq!(sensors.list_active_sensors(), vec!["lab"]);
        assert!(sensors.set_limit("lab", 90));
        assert_eq!(cache.limits().get("lab"), Some(&90));
    }
}
