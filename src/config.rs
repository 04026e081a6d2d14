use std::{env, path::PathBuf, time::Duration};

use serde::Deserialize;
use uuid::Uuid;

use crate::errors::{
    constants::{
        DEFAULT_ENDPOINT, DEFAULT_OUTPUT_FILE_NAME, ENV_API_KEY, ENV_CREDENTIALS_PATH,
        ENV_ENDPOINT, ENV_OTEL_HTTP_URL, ENV_OUTPUT_DIR, OUTPUT_FILE_EXTENSION,
        OUTPUT_FILE_PREFIX,
    },
    Result,
};

/// Where each synthesis is written.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum OutputLocation {
    /// Every call overwrites the same file.
    Fixed { file_name: String },
    /// Every call gets its own file.
    Unique,
}

impl Default for OutputLocation {
    fn default() -> Self {
        OutputLocation::Fixed {
            file_name: String::from(DEFAULT_OUTPUT_FILE_NAME),
        }
    }
}

impl OutputLocation {
    pub fn next_file_name(&self) -> String {
        match self {
            OutputLocation::Fixed { file_name } => file_name.clone(),
            OutputLocation::Unique => format!(
                "{}{}.{}",
                OUTPUT_FILE_PREFIX,
                Uuid::new_v4(),
                OUTPUT_FILE_EXTENSION
            ),
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct Config {
    pub api_key: Option<String>,
    pub credentials_path: Option<String>,
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    pub output_dir: Option<PathBuf>,
    #[serde(default)]
    pub output: OutputLocation,
    #[serde(default = "default_single_flight")]
    pub single_flight: bool,
    pub request_timeout_secs: Option<u64>,
    pub otel_http_url: Option<String>,
}

fn default_endpoint() -> String {
    String::from(DEFAULT_ENDPOINT)
}

fn default_single_flight() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            credentials_path: None,
            endpoint: default_endpoint(),
            output_dir: None,
            output: OutputLocation::default(),
            single_flight: default_single_flight(),
            request_timeout_secs: None,
            otel_http_url: None,
        }
    }
}

impl Config {
    pub fn from_toml(source: &str) -> Result<Self> {
        Ok(toml::from_str::<Config>(source)?)
    }

    /// Build a config from environment variables. A missing key is not an
    /// error here; the API rejects the request instead.
    pub fn from_env() -> Self {
        Self {
            api_key: env::var(ENV_API_KEY).ok(),
            credentials_path: env::var(ENV_CREDENTIALS_PATH).ok(),
            endpoint: env::var(ENV_ENDPOINT).unwrap_or_else(|_| default_endpoint()),
            output_dir: env::var(ENV_OUTPUT_DIR).ok().map(PathBuf::from),
            otel_http_url: env::var(ENV_OTEL_HTTP_URL).ok(),
            ..Self::default()
        }
    }

    /// Load `path` if it exists, otherwise fall back to the environment.
    pub fn load(path: &str) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(source) => Self::from_toml(&source),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::from_env()),
            Err(e) => Err(e.into()),
        }
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}
