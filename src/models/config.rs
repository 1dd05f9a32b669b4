use std::path::Path;
use std::time::Duration;

use chrono::FixedOffset;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8888";
pub const DEFAULT_ENDPOINT: &str = "disposition";
pub const DEFAULT_PAGE_SIZE: usize = 12;
/// zh-TW dates are shown in Taipei time.
pub const DEFAULT_UTC_OFFSET_HOURS: i32 = 8;

/// Board settings. Every field has a default so a partial JSON file is enough.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    /// API root, without a trailing slash
    pub base_url: String,
    /// Path under the base URL (`disposition`, or `dispositions` on older backends)
    pub endpoint: String,
    /// Rows per table page
    pub page_size: usize,
    /// Offset used when turning zoned timestamps into calendar dates
    pub utc_offset_hours: i32,
    /// Request timeout. `None` keeps the HTTP client default.
    pub timeout_secs: Option<u64>,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            utc_offset_hours: DEFAULT_UTC_OFFSET_HOURS,
            timeout_secs: None,
        }
    }
}

impl BoardConfig {
    /// Load settings from a JSON file.
    pub fn load(path: &Path) -> Result<Self, AppError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| AppError::Config(format!("Cannot read {}: {}", path.display(), e)))?;
        let config: BoardConfig = serde_json::from_str(&content)
            .map_err(|e| AppError::Config(format!("Invalid config {}: {}", path.display(), e)))?;
        info!("Loaded config from {}", path.display());
        config.validated()
    }

    /// Reject settings the view layer cannot work with.
    pub fn validated(self) -> Result<Self, AppError> {
        if self.page_size == 0 {
            return Err(AppError::Config("page_size must be at least 1".to_string()));
        }
        if self.base_url.trim().is_empty() {
            return Err(AppError::Config("base_url is empty".to_string()));
        }
        if self.display_offset().is_none() {
            return Err(AppError::Config(format!(
                "utc_offset_hours out of range: {}",
                self.utc_offset_hours
            )));
        }
        Ok(self)
    }

    /// Full URL of the disposition list.
    pub fn endpoint_url(&self) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            self.endpoint.trim_start_matches('/')
        )
    }

    pub fn display_offset(&self) -> Option<FixedOffset> {
        FixedOffset::east_opt(self.utc_offset_hours.checked_mul(3600)?)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}
