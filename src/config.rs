use std::{env, path::PathBuf};

use url::Url;

use crate::error::AppError;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_base: Url,
    pub state_dir: PathBuf,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppError> {
        let api_base = env::var("API_BASE_URL")
            .unwrap_or_else(|_| "http://127.0.0.1:8000".to_string());
        let api_base = Url::parse(&api_base)
            .map_err(|err| AppError::Config(format!("invalid API_BASE_URL: {err}")))?;

        let state_dir = env::var("WAYFARER_STATE_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(".wayfarer"));

        Ok(Self {
            api_base,
            state_dir,
        })
    }
}
