//! Cluster and probe configuration.
//!
//! Per Iron Lotus Framework: Configuration is validated at load time (Poka-Yoke),
//! with sensible defaults and clear error messages.
//!
//! Both tools read the same file. JSON is the native format; a `.toml`
//! extension switches the parser.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::error::{CoreError, Result};

/// Default configuration path for the verification tool.
pub const DEFAULT_VERIFY_CONFIG: &str = "config.json";

/// Default configuration path for the fault tool.
pub const DEFAULT_FAULT_CONFIG: &str = "../verification/config.json";

/// Top-level configuration shared by the fault and verification tools.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationConfig {
    /// First cluster (customers service).
    pub c1: ClusterEndpoints,

    /// Second cluster (visits service).
    pub c2: ClusterEndpoints,

    /// Probe tuning.
    #[serde(default)]
    pub probes: ProbeSettings,
}

impl VerificationConfig {
    /// Creates a configuration for two clusters with default probe settings.
    #[must_use]
    pub fn new(c1: ClusterEndpoints, c2: ClusterEndpoints) -> Self {
        Self {
            c1,
            c2,
            probes: ProbeSettings::default(),
        }
    }

    /// Validates the configuration.
    ///
    /// # Errors
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<()> {
        self.c1.validate("c1")?;
        self.c2.validate("c2")?;
        self.probes.validate()?;
        Ok(())
    }

    /// Loads configuration from a JSON (or `.toml`) file.
    ///
    /// # Errors
    /// Returns [`CoreError::ConfigNotFound`] if the file does not exist, or
    /// a configuration error if it cannot be read, parsed, or validated.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(CoreError::ConfigNotFound(path.to_path_buf()));
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| CoreError::config(format!("failed to read config: {e}")))?;

        let is_toml = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));
        let config: Self = if is_toml {
            toml::from_str(&content)
                .map_err(|e| CoreError::config(format!("failed to parse config: {e}")))?
        } else {
            serde_json::from_str(&content)
                .map_err(|e| CoreError::config(format!("failed to parse config: {e}")))?
        };

        config.validate()?;
        tracing::debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }
}

/// Addresses of one cluster's services.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterEndpoints {
    /// `host[:port]` used for raw TCP reachability.
    pub endpoint: String,

    /// Public-facing `host[:port]` that must not be reachable.
    pub public_endpoint: String,

    /// Internal `host[:port]` of the service API.
    pub internal_endpoint: String,
}

impl ClusterEndpoints {
    /// Creates endpoints for a cluster.
    #[must_use]
    pub fn new(
        endpoint: impl Into<String>,
        public_endpoint: impl Into<String>,
        internal_endpoint: impl Into<String>,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            public_endpoint: public_endpoint.into(),
            internal_endpoint: internal_endpoint.into(),
        }
    }

    fn validate(&self, cluster: &str) -> Result<()> {
        for (field, value) in [
            ("endpoint", &self.endpoint),
            ("public_endpoint", &self.public_endpoint),
            ("internal_endpoint", &self.internal_endpoint),
        ] {
            if value.trim().is_empty() {
                return Err(CoreError::config(format!(
                    "{cluster}.{field} cannot be empty"
                )));
            }
        }
        Ok(())
    }
}

/// Timeouts and thresholds for the verification probes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbeSettings {
    /// TCP connect timeout.
    #[serde(default = "default_connect_timeout")]
    #[serde(with = "humantime_serde")]
    pub connect_timeout: Duration,

    /// Timeout for requests against public endpoints.
    #[serde(default = "default_public_timeout")]
    #[serde(with = "humantime_serde")]
    pub public_timeout: Duration,

    /// Timeout for cross-cluster API requests.
    #[serde(default = "default_request_timeout")]
    #[serde(with = "humantime_serde")]
    pub request_timeout: Duration,

    /// Timeout for `/actuator/health` requests.
    #[serde(default = "default_health_timeout")]
    #[serde(with = "humantime_serde")]
    pub health_timeout: Duration,

    /// Timeout for each attack payload request.
    #[serde(default = "default_waf_timeout")]
    #[serde(with = "humantime_serde")]
    pub waf_timeout: Duration,

    /// Timeout for each request in the rate-limit burst.
    #[serde(default = "default_rate_limit_timeout")]
    #[serde(with = "humantime_serde")]
    pub rate_limit_timeout: Duration,

    /// Number of requests in the rate-limit burst.
    #[serde(default = "default_rate_limit_burst")]
    pub rate_limit_burst: u32,

    /// Pause between burst requests.
    #[serde(default = "default_rate_limit_interval")]
    #[serde(with = "humantime_serde")]
    pub rate_limit_interval: Duration,

    /// Fraction of attack payloads that must be blocked.
    #[serde(default = "default_waf_block_ratio")]
    pub waf_block_ratio: f64,

    /// Attack payloads sent to the WAF and payload-blocking checks.
    #[serde(default = "default_malicious_payloads")]
    pub malicious_payloads: Vec<String>,

    /// User agent presented to public endpoints.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_connect_timeout() -> Duration {
    Duration::from_secs(5)
}

fn default_public_timeout() -> Duration {
    Duration::from_secs(10)
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(10)
}

fn default_health_timeout() -> Duration {
    Duration::from_secs(5)
}

fn default_waf_timeout() -> Duration {
    Duration::from_secs(5)
}

fn default_rate_limit_timeout() -> Duration {
    Duration::from_secs(2)
}

fn default_rate_limit_burst() -> u32 {
    10
}

fn default_rate_limit_interval() -> Duration {
    Duration::from_millis(100)
}

fn default_waf_block_ratio() -> f64 {
    0.8
}

fn default_malicious_payloads() -> Vec<String> {
    vec![
        "'; DROP TABLE users; --".to_string(),
        "<script>alert('xss')</script>".to_string(),
        "../../etc/passwd".to_string(),
        "UNION SELECT * FROM users".to_string(),
    ]
}

fn default_user_agent() -> String {
    "SecurityVerificationTool/1.0".to_string()
}

impl Default for ProbeSettings {
    fn default() -> Self {
        Self {
            connect_timeout: default_connect_timeout(),
            public_timeout: default_public_timeout(),
            request_timeout: default_request_timeout(),
            health_timeout: default_health_timeout(),
            waf_timeout: default_waf_timeout(),
            rate_limit_timeout: default_rate_limit_timeout(),
            rate_limit_burst: default_rate_limit_burst(),
            rate_limit_interval: default_rate_limit_interval(),
            waf_block_ratio: default_waf_block_ratio(),
            malicious_payloads: default_malicious_payloads(),
            user_agent: default_user_agent(),
        }
    }
}

impl ProbeSettings {
    /// Validates probe thresholds.
    ///
    /// # Errors
    /// Returns an error if thresholds are invalid.
    pub fn validate(&self) -> Result<()> {
        if !(self.waf_block_ratio > 0.0 && self.waf_block_ratio <= 1.0) {
            return Err(CoreError::config("waf_block_ratio must be in (0, 1]"));
        }
        if self.rate_limit_burst == 0 {
            return Err(CoreError::config(
                "rate_limit_burst must be greater than 0",
            ));
        }
        if self.malicious_payloads.is_empty() {
            return Err(CoreError::config("malicious_payloads cannot be empty"));
        }
        Ok(())
    }
}

/// Serde helper for humantime durations.
mod humantime_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&humantime::format_duration(*duration).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        humantime::parse_duration(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = r#"{
        "c1": {
            "endpoint": "c1.internal:8081",
            "public_endpoint": "customers.example.com",
            "internal_endpoint": "customers-service.c1.svc:8081"
        },
        "c2": {
            "endpoint": "c2.internal:8082",
            "public_endpoint": "visits.example.com",
            "internal_endpoint": "visits-service.c2.svc:8082"
        }
    }"#;

    fn write_temp(suffix: &str, content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(suffix)
            .tempfile()
            .unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_json_with_default_probes() {
        let file = write_temp(".json", SAMPLE);
        let config = VerificationConfig::load(file.path()).unwrap();

        assert_eq!(config.c1.endpoint, "c1.internal:8081");
        assert_eq!(config.c2.internal_endpoint, "visits-service.c2.svc:8082");
        assert_eq!(config.probes, ProbeSettings::default());
    }

    #[test]
    fn test_load_missing_file() {
        let err = VerificationConfig::load("/nonexistent/crossfire/config.json").unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_load_invalid_json() {
        let file = write_temp(".json", "{ not json");
        let err = VerificationConfig::load(file.path()).unwrap_err();
        assert!(err.to_string().contains("failed to parse config"));
    }

    #[test]
    fn test_load_toml() {
        let content = r#"
            [c1]
            endpoint = "c1:80"
            public_endpoint = "c1.example.com"
            internal_endpoint = "c1.svc:8081"

            [c2]
            endpoint = "c2:80"
            public_endpoint = "c2.example.com"
            internal_endpoint = "c2.svc:8082"

            [probes]
            rate_limit_burst = 25
            health_timeout = "2s"
        "#;
        let file = write_temp(".toml", content);
        let config = VerificationConfig::load(file.path()).unwrap();

        assert_eq!(config.probes.rate_limit_burst, 25);
        assert_eq!(config.probes.health_timeout, Duration::from_secs(2));
        assert_eq!(config.probes.connect_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_probe_overrides_use_humantime() {
        let content = SAMPLE.replacen(
            "\"c2\"",
            "\"probes\": {\"rate_limit_interval\": \"250ms\", \"waf_block_ratio\": 0.5}, \"c2\"",
            1,
        );
        let file = write_temp(".json", &content);
        let config = VerificationConfig::load(file.path()).unwrap();

        assert_eq!(config.probes.rate_limit_interval, Duration::from_millis(250));
        assert!((config.probes.waf_block_ratio - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_validate_empty_endpoint() {
        let mut config = VerificationConfig::new(
            ClusterEndpoints::new("c1:80", "c1.example.com", "c1.svc"),
            ClusterEndpoints::new("c2:80", "c2.example.com", "c2.svc"),
        );
        assert!(config.validate().is_ok());

        config.c2.public_endpoint = "  ".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("c2.public_endpoint"));
    }

    #[test]
    fn test_probe_settings_defaults() {
        let probes = ProbeSettings::default();
        assert_eq!(probes.connect_timeout, Duration::from_secs(5));
        assert_eq!(probes.public_timeout, Duration::from_secs(10));
        assert_eq!(probes.rate_limit_timeout, Duration::from_secs(2));
        assert_eq!(probes.rate_limit_burst, 10);
        assert_eq!(probes.malicious_payloads.len(), 4);
        assert_eq!(probes.user_agent, "SecurityVerificationTool/1.0");
    }

    #[test]
    fn test_probe_settings_validate() {
        let probes = ProbeSettings {
            waf_block_ratio: 0.0,
            ..Default::default()
        };
        assert!(probes.validate().is_err());

        let probes = ProbeSettings {
            waf_block_ratio: 1.5,
            ..Default::default()
        };
        assert!(probes.validate().is_err());

        let probes = ProbeSettings {
            rate_limit_burst: 0,
            ..Default::default()
        };
        assert!(probes.validate().is_err());

        let probes = ProbeSettings {
            malicious_payloads: Vec::new(),
            ..Default::default()
        };
        assert!(probes.validate().is_err());
    }
}
