use crate::auth::Credentials;
use crate::dashboard::{DEFAULT_LEADERBOARD_SIZE, DEFAULT_TOP_PERFORMERS};
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::fs::File;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const CONFIG_PATH_ENV: &str = "RESULT_DASHBOARD_CONFIG";
const ENV_PREFIX: &str = "RESULT_DASHBOARD_";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid value for {key}: '{value}'")]
    InvalidValue { key: String, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub http_addr: String,
    pub database_url: String,
    pub teacher_username: String,
    pub teacher_password: String,
    pub top_performers: usize,
    pub leaderboard_size: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        let credentials = Credentials::default();
        Self {
            http_addr: "0.0.0.0:3000".to_string(),
            database_url: "sqlite:///resultdashboard.db".to_string(),
            teacher_username: credentials.username,
            teacher_password: credentials.password,
            top_performers: DEFAULT_TOP_PERFORMERS,
            leaderboard_size: DEFAULT_LEADERBOARD_SIZE,
        }
    }
}

impl DashboardConfig {
    /// Defaults, then the JSON file named by `RESULT_DASHBOARD_CONFIG`, then
    /// individual `RESULT_DASHBOARD_*` variables.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match std::env::var_os(CONFIG_PATH_ENV) {
            Some(path) => Self::from_json_file(path)?,
            None => Self::default(),
        };
        config.apply_os_overrides(std::env::vars_os())?;
        Ok(config)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_reader(file).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Applies `RESULT_DASHBOARD_*` pairs; unrelated keys are ignored.
    pub fn apply_overrides<I, K, V>(&mut self, vars: I) -> Result<(), ConfigError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        for (key, value) in vars {
            let key = key.as_ref();
            let Some(name) = key.strip_prefix(ENV_PREFIX) else {
                continue;
            };
            let value: String = value.into();
            match name {
                "HTTP_ADDR" => self.http_addr = value,
                "DATABASE_URL" => self.database_url = value,
                "TEACHER_USERNAME" => self.teacher_username = value,
                "TEACHER_PASSWORD" => self.teacher_password = value,
                "TOP_PERFORMERS" => self.top_performers = parse_count(key, &value)?,
                "LEADERBOARD_SIZE" => self.leaderboard_size = parse_count(key, &value)?,
                _ => {}
            }
        }
        Ok(())
    }

    /// Like [`DashboardConfig::apply_overrides`] for raw environment pairs.
    /// Entries that are not valid UTF-8 cannot name one of our keys and are
    /// skipped.
    pub fn apply_os_overrides<I>(&mut self, vars: I) -> Result<(), ConfigError>
    where
        I: IntoIterator<Item = (OsString, OsString)>,
    {
        let utf8 = vars.into_iter().filter_map(|(key, value)| {
            Some((key.into_string().ok()?, value.into_string().ok()?))
        });
        self.apply_overrides(utf8)
    }

    pub fn credentials(&self) -> Credentials {
        Credentials::new(&self.teacher_username, &self.teacher_password)
    }

    /// Filesystem path for the SQLite database; accepts `sqlite:///file.db`
    /// style URLs as well as bare paths.
    pub fn database_path(&self) -> PathBuf {
        let url = self.database_url.trim();
        let path = url
            .strip_prefix("sqlite:///")
            .or_else(|| url.strip_prefix("sqlite://"))
            .or_else(|| url.strip_prefix("sqlite:"))
            .unwrap_or(url);
        PathBuf::from(path)
    }
}

fn parse_count(key: &str, value: &str) -> Result<usize, ConfigError> {
    value
        .trim()
        .parse::<usize>()
        .map_err(|_| ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        })
}
