use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

const DEFAULT_HF_API_URL: &str = "https://api-inference.huggingface.co";
const DEFAULT_HF_MODEL: &str = "distilgpt2";
const DEFAULT_SITE_NAME: &str = "Sprite Blue Jet";
const SESSION_DURATION: u64 = 24 * 60 * 60; // 24 hours in seconds
const MAX_SESSION_DURATION: u64 = 365 * SESSION_DURATION;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{name} has an invalid value: {value}")]
    Invalid { name: &'static str, value: String },
}

/// Runtime settings, read from the environment
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// Shared JSON file overwritten by every submission
    pub data_file: PathBuf,
    pub static_dir: PathBuf,
    /// Business name shown on the home page
    pub site_name: String,
    /// Token for the text-generation API; canned suggestions are used without one
    pub hf_api_token: Option<String>,
    pub hf_model: String,
    pub hf_api_url: String,
    /// Randomise monthly fluctuations; off means midpoint values
    pub jitter: bool,
    pub session_ttl: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            host: "0.0.0.0".to_string(),
            port: 5000,
            data_file: PathBuf::from("sales_data.json"),
            static_dir: PathBuf::from("static"),
            site_name: DEFAULT_SITE_NAME.to_string(),
            hf_api_token: None,
            hf_model: DEFAULT_HF_MODEL.to_string(),
            hf_api_url: DEFAULT_HF_API_URL.to_string(),
            jitter: true,
            session_ttl: Duration::from_secs(SESSION_DURATION),
        }
    }
}

fn parse_bool(name: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid {
            name,
            value: value.to_string(),
        }),
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build a config from any variable lookup; unset or blank values keep defaults
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let mut config = Config::default();

        if let Some(host) = get("HOST") {
            config.host = host;
        }
        if let Some(port) = get("PORT") {
            config.port = port.trim().parse().map_err(|_| ConfigError::Invalid {
                name: "PORT",
                value: port.clone(),
            })?;
        }
        if let Some(path) = get("SALES_DATA_FILE") {
            config.data_file = PathBuf::from(path);
        }
        if let Some(path) = get("STATIC_DIR") {
            config.static_dir = PathBuf::from(path);
        }
        if let Some(name) = get("SITE_NAME") {
            config.site_name = name;
        }
        config.hf_api_token = get("HF_API_TOKEN");
        if let Some(model) = get("HF_MODEL") {
            config.hf_model = model;
        }
        if let Some(url) = get("HF_API_URL") {
            config.hf_api_url = url.trim_end_matches('/').to_string();
        }
        if let Some(jitter) = get("FORECAST_JITTER") {
            config.jitter = parse_bool("FORECAST_JITTER", &jitter)?;
        }
        if let Some(ttl) = get("SESSION_TTL_SECS") {
            let secs = ttl
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs <= MAX_SESSION_DURATION)
                .ok_or_else(|| ConfigError::Invalid {
                    name: "SESSION_TTL_SECS",
                    value: ttl.clone(),
                })?;
            config.session_ttl = Duration::from_secs(secs);
        }

        Ok(config)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.bind_addr(), "0.0.0.0:5000");
        assert_eq!(config.data_file, PathBuf::from("sales_data.json"));
        assert_eq!(config.hf_model, "distilgpt2");
        assert!(config.hf_api_token.is_none());
        assert!(config.jitter);
    }

    #[test]
    fn reads_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("PORT", "8080"),
            ("HF_API_TOKEN", "secret"),
            ("HF_API_URL", "http://localhost:9000/"),
            ("FORECAST_JITTER", "off"),
            ("SESSION_TTL_SECS", "60"),
        ]))
        .unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.hf_api_token.as_deref(), Some("secret"));
        assert_eq!(config.hf_api_url, "http://localhost:9000");
        assert!(!config.jitter);
        assert_eq!(config.session_ttl, Duration::from_secs(60));
    }

    #[test]
    fn blank_values_keep_defaults() {
        let config = Config::from_lookup(lookup(&[("PORT", " "), ("HF_API_TOKEN", "")])).unwrap();
        assert_eq!(config.port, 5000);
        assert!(config.hf_api_token.is_none());
    }

    #[test]
    fn rejects_bad_numbers() {
        let err = Config::from_lookup(lookup(&[("PORT", "eighty")])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::Invalid {
                name: "PORT",
                value: "eighty".to_string()
            }
        );
        assert!(Config::from_lookup(lookup(&[("FORECAST_JITTER", "maybe")])).is_err());
    }

    #[test]
    fn caps_session_lifetime() {
        let err = Config::from_lookup(lookup(&[("SESSION_TTL_SECS", "18446744073709551615")])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::Invalid {
                name: "SESSION_TTL_SECS",
                value: "18446744073709551615".to_string()
            }
        );

        let year = (365 * 24 * 60 * 60).to_string();
        let config = Config::from_lookup(lookup(&[("SESSION_TTL_SECS", year.as_str())])).unwrap();
        assert_eq!(config.session_ttl, Duration::from_secs(365 * 24 * 60 * 60));
    }
}
