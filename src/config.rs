use std::path::{Path, PathBuf};

use crate::pipeline::generation::openai::{DEFAULT_BASE_URL, DEFAULT_MODEL, DEFAULT_TEMPERATURE};

/// Application-level constants
pub const APP_NAME: &str = "PainNavi";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

pub const DATA_DIR_ENV: &str = "PAINNAVI_DATA_DIR";
pub const MODEL_ENV: &str = "PAINNAVI_MODEL";
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";
pub const BASE_URL_ENV: &str = "OPENAI_BASE_URL";

pub const PROFILE_FILE_NAME: &str = "bot_profile.txt";
pub const LOG_DIR_NAME: &str = "logs";

pub const DEFAULT_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_HISTORY_COUNT: usize = 3;

/// Default tracing filter when `RUST_LOG` is unset.
pub fn default_log_filter() -> &'static str {
    if cfg!(debug_assertions) {
        "painnavi_lib=debug,painnavi=debug,warn"
    } else {
        "painnavi_lib=info,painnavi=info,warn"
    }
}

/// ~/PainNavi/, else the working directory.
fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .map(|home| home.join(APP_NAME))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Runtime settings resolved from the environment. CLI flags override fields.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub timeout_secs: u64,
    pub history_count: usize,
    pub temperature: f32,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve from an arbitrary key lookup. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Self {
            data_dir: get(DATA_DIR_ENV)
                .map(PathBuf::from)
                .unwrap_or_else(default_data_dir),
            api_key: get(API_KEY_ENV),
            model: get(MODEL_ENV).unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            base_url: get(BASE_URL_ENV).unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            history_count: DEFAULT_HISTORY_COUNT,
            temperature: DEFAULT_TEMPERATURE,
        }
    }

    /// Same settings rooted at another data directory.
    pub fn with_data_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.data_dir = dir.as_ref().to_path_buf();
        self
    }

    pub fn profile_path(&self) -> PathBuf {
        self.data_dir.join(PROFILE_FILE_NAME)
    }

    pub fn log_dir(&self) -> PathBuf {
        self.data_dir.join(LOG_DIR_NAME)
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
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_without_environment() {
        let config = AppConfig::from_lookup(lookup(&[]));
        assert_eq!(config.api_key, None);
        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.base_url, "https://api.openai.com/v1");
        assert_eq!(config.timeout_secs, 60);
        assert_eq!(config.history_count, 3);
        assert!((config.temperature - 0.6).abs() < f32::EPSILON);
        assert!(config.data_dir.ends_with(APP_NAME) || config.data_dir == Path::new("."));
    }

    #[test]
    fn environment_values_are_used() {
        let config = AppConfig::from_lookup(lookup(&[
            (DATA_DIR_ENV, "/tmp/painnavi"),
            (API_KEY_ENV, "sk-test"),
            (MODEL_ENV, "gpt-4o"),
            (BASE_URL_ENV, "http://localhost:8080/v1"),
        ]));
        assert_eq!(config.data_dir, PathBuf::from("/tmp/painnavi"));
        assert_eq!(config.api_key.as_deref(), Some("sk-test"));
        assert_eq!(config.model, "gpt-4o");
        assert_eq!(config.base_url, "http://localhost:8080/v1");
    }

    #[test]
    fn blank_values_count_as_unset() {
        let config = AppConfig::from_lookup(lookup(&[(API_KEY_ENV, "  "), (MODEL_ENV, "")]));
        assert_eq!(config.api_key, None);
        assert_eq!(config.model, DEFAULT_MODEL);
    }

    #[test]
    fn derived_paths_under_data_dir() {
        let config = AppConfig::from_lookup(lookup(&[])).with_data_dir("/data");
        assert_eq!(config.profile_path(), PathBuf::from("/data/bot_profile.txt"));
        assert_eq!(config.log_dir(), PathBuf::from("/data/logs"));
    }

    #[test]
    fn app_name_is_painnavi() {
        assert_eq!(APP_NAME, "PainNavi");
    }

    #[test]
    fn app_version_matches_cargo() {
        assert_eq!(APP_VERSION, "0.3.0");
    }
}
