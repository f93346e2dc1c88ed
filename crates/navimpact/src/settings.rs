use std::path::PathBuf;
use std::time::Duration;

use navimpact_client::{ApiConfig, DEFAULT_BASE_URL};

use crate::error::NavImpactError;

pub const API_URL_ENV: &str = "NAVIMPACT_API_URL";
pub const API_KEY_ENV: &str = "NAVIMPACT_API_KEY";
pub const DATA_DIR_ENV: &str = "NAVIMPACT_DATA_DIR";
pub const HTTP_TIMEOUT_ENV: &str = "NAVIMPACT_HTTP_TIMEOUT_SECS";

pub const DEFAULT_DATA_DIR: &str = ".navimpact";
pub const STORE_FILE_NAME: &str = "navimpact-store.json";

#[derive(Debug, Clone)]
pub struct Settings {
    pub api: ApiConfig,
    pub data_dir: PathBuf,
}

impl Settings {
    pub fn from_env() -> Result<Self, NavImpactError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, NavImpactError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let base_url = get(API_URL_ENV).unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let mut api = ApiConfig::new(base_url.trim());
        if let Some(key) = get(API_KEY_ENV) {
            api = api.with_api_key(key.trim());
        }
        if let Some(raw) = get(HTTP_TIMEOUT_ENV) {
            let secs: u64 = raw.trim().parse().map_err(|_| {
                NavImpactError::Config(format!("{HTTP_TIMEOUT_ENV} must be whole seconds, got {raw:?}"))
            })?;
            if secs == 0 {
                return Err(NavImpactError::Config(format!(
                    "{HTTP_TIMEOUT_ENV} must be greater than zero"
                )));
            }
            api = api.with_timeout(Duration::from_secs(secs));
        }

        let data_dir = get(DATA_DIR_ENV).map_or_else(|| PathBuf::from(DEFAULT_DATA_DIR), PathBuf::from);

        Ok(Self { api, data_dir })
    }

    pub fn store_path(&self) -> PathBuf {
        self.data_dir.join(STORE_FILE_NAME)
    }
}
