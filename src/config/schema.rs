//! Configuration schema definitions.
//!
//! The exporter is configured by a TOML file holding a table of named probe
//! modules. All types derive Serde traits; every field has a default so a
//! module can be declared with nothing more than its name.

use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Root configuration for the exporter.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Probe modules keyed by name.
    pub modules: HashMap<String, Module>,
}

impl Config {
    /// Look up a module by name.
    pub fn module(&self, name: &str) -> Option<&Module> {
        self.modules.get(name)
    }
}

/// A named bundle binding a prober to its settings.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct Module {
    /// Registered prober name (e.g. "http"). No fallback: an omitted name
    /// stays empty and fails lookup at probe time.
    pub prober: String,

    /// Deadline for a single check. `0s` disables the deadline.
    #[serde(with = "duration_str")]
    pub timeout: Duration,

    /// Settings for the `http` prober. Ignored by other probers.
    pub http: HttpProbeConfig,
}

impl Default for Module {
    fn default() -> Self {
        Self {
            prober: String::new(),
            timeout: Duration::from_secs(10),
            http: HttpProbeConfig::default(),
        }
    }
}

/// Request shaping and classification for the `http` prober.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct HttpProbeConfig {
    /// Accepted status codes. Empty means any 2xx.
    pub valid_status_codes: Vec<u16>,

    /// Prepended to the target when building the request URL.
    pub prefix: String,

    /// Extra request headers. A `Host` entry (any case) overrides the
    /// request's target host instead of being sent verbatim.
    pub headers: BTreeMap<String, String>,

    /// Follow 3xx responses. When false the redirect itself is classified.
    pub follow_redirects: bool,
}

impl Default for HttpProbeConfig {
    fn default() -> Self {
        Self {
            valid_status_codes: Vec::new(),
            prefix: String::new(),
            headers: BTreeMap::new(),
            follow_redirects: true,
        }
    }
}

/// Human readable durations ("5s", "1m 30s", "250ms").
mod duration_str {
    use std::time::Duration;

    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&humantime::format_duration(*value).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let raw = String::deserialize(deserializer)?;
        humantime::parse_duration(raw.trim()).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_module() {
        let config: Config = toml::from_str(
            r#"
            [modules.sentry]
            prober = "http"
            timeout = "5s"

            [modules.sentry.http]
            valid_status_codes = [200, 204]
            prefix = "https://sentry.example.com/api/0/projects/acme/"
            follow_redirects = false

            [modules.sentry.http.headers]
            Authorization = "Bearer abc"
            Host = "sentry.internal"
            "#,
        )
        .unwrap();

        let module = config.module("sentry").unwrap();
        assert_eq!(module.prober, "http");
        assert_eq!(module.timeout, Duration::from_secs(5));
        assert_eq!(module.http.valid_status_codes, vec![200, 204]);
        assert_eq!(module.http.prefix, "https://sentry.example.com/api/0/projects/acme/");
        assert!(!module.http.follow_redirects);
        assert_eq!(module.http.headers.get("Host").map(String::as_str), Some("sentry.internal"));
        assert_eq!(module.http.headers.len(), 2);
    }

    #[test]
    fn test_module_defaults() {
        let config: Config = toml::from_str("[modules.bare]\n").unwrap();
        let module = config.module("bare").unwrap();
        assert_eq!(module, &Module::default());
        assert!(module.prober.is_empty());
        assert!(module.http.valid_status_codes.is_empty());
        assert!(module.http.follow_redirects);
    }

    #[test]
    fn test_empty_document_has_no_modules() {
        let config: Config = toml::from_str("").unwrap();
        assert!(config.modules.is_empty());
        assert!(config.module("sentry").is_none());
    }

    #[test]
    fn test_compound_and_zero_durations() {
        let config: Config = toml::from_str(
            r#"
            [modules.slow]
            timeout = "1m 30s"
            [modules.unbounded]
            timeout = "0s"
            "#,
        )
        .unwrap();
        assert_eq!(config.modules["slow"].timeout, Duration::from_secs(90));
        assert!(config.modules["unbounded"].timeout.is_zero());
    }

    #[test]
    fn test_invalid_duration_is_rejected() {
        assert!(toml::from_str::<Config>("[modules.x]\ntimeout = \"soon\"\n").is_err());
        assert!(toml::from_str::<Config>("[modules.x]\ntimeout = 5\n").is_err());
    }

    #[test]
    fn test_negative_status_code_is_rejected() {
        assert!(toml::from_str::<Config>("[modules.x.http]\nvalid_status_codes = [-1]\n").is_err());
    }

    #[test]
    fn test_duplicate_module_is_rejected() {
        let doc = "[modules.a]\nprober = \"http\"\n[modules.a]\nprober = \"tcp\"\n";
        assert!(toml::from_str::<Config>(doc).is_err());
    }

    #[test]
    fn test_serialize_round_trips_timeout() {
        let mut config = Config::default();
        config.modules.insert("sentry".into(), Module {
            timeout: Duration::from_millis(1500),
            ..Module::default()
        });
        let text = toml::to_string(&config).unwrap();
        let parsed: Config = toml::from_str(&text).unwrap();
        assert_eq!(parsed, config);
    }
}
