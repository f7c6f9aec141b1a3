use std::env;
use std::time::Duration;

use crate::error::AppError;

const DEFAULT_UPLOAD_PATH: &str = "/upload";
const DEFAULT_PAGE_LIMIT: u32 = 10;
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Clone, Debug)]
pub struct GatewayConfig {
    pub base_url: String,
    pub api_token: Option<String>,
    pub upload_path: String,
    pub page_limit: u32,
    pub request_timeout: Duration,
}

impl GatewayConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_token: None,
            upload_path: DEFAULT_UPLOAD_PATH.to_string(),
            page_limit: DEFAULT_PAGE_LIMIT,
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn new_from_env() -> Result<Self, AppError> {
        let base_url = env::var("SCHOOL_API_URL")
            .map_err(|_| AppError::Config("SCHOOL_API_URL is not set".to_string()))?;

        let mut config = Self::new(base_url);
        config.api_token = env::var("SCHOOL_API_TOKEN").ok().filter(|t| !t.is_empty());

        if let Ok(path) = env::var("SCHOOL_UPLOAD_PATH") {
            config.upload_path = path;
        }
        if let Ok(limit) = env::var("SCHOOL_PAGE_LIMIT") {
            config.page_limit = limit
                .parse()
                .map_err(|_| AppError::Config(format!("SCHOOL_PAGE_LIMIT is not a number: {}", limit)))?;
        }
        if let Ok(secs) = env::var("SCHOOL_REQUEST_TIMEOUT_SECS") {
            let secs: u64 = secs
                .parse()
                .map_err(|_| AppError::Config(format!("SCHOOL_REQUEST_TIMEOUT_SECS is not a number: {}", secs)))?;
            config.request_timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}
