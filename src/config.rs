use chrono::{FixedOffset, NaiveDate, Offset, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{AppError, Result};

pub const DEFAULT_PLAYLIST_ID: &str = "PLVcVykBcFZTR4Q6cvmybjPgCklZlv-Ghj";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_db_path")]
    pub db_path: String,

    pub supabase_url: Option<String>,
    pub supabase_anon_key: Option<String>,
    pub access_token: Option<String>,
    pub youtube_api_key: Option<String>,

    #[serde(default = "default_playlist_id")]
    pub youtube_playlist_id: String,

    /// Offset used to decide what "today" is. The plan follows Korea Standard Time.
    #[serde(default = "default_utc_offset_hours")]
    pub utc_offset_hours: i32,
}

fn default_db_path() -> String {
    let data_dir = dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("bible365");
    std::fs::create_dir_all(&data_dir).ok();
    data_dir.join("local.db").to_string_lossy().to_string()
}

fn default_playlist_id() -> String {
    DEFAULT_PLAYLIST_ID.to_string()
}

fn default_utc_offset_hours() -> i32 {
    9
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            supabase_url: None,
            supabase_anon_key: None,
            access_token: None,
            youtube_api_key: None,
            youtube_playlist_id: default_playlist_id(),
            utc_offset_hours: default_utc_offset_hours(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = toml::from_str(&content)?;
            config.validate()?;
            Ok(config)
        } else {
            let config = Config::default();
            config.save()?;
            Ok(config)
        }
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| AppError::Config(e.to_string()))?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("bible365")
            .join("config.toml")
    }

    fn validate(&self) -> Result<()> {
        if let Some(raw) = &self.supabase_url {
            url::Url::parse(raw)
                .map_err(|e| AppError::Config(format!("supabase_url {raw:?}: {e}")))?;
        }
        if !(-12..=14).contains(&self.utc_offset_hours) {
            return Err(AppError::Config(format!(
                "utc_offset_hours out of range: {}",
                self.utc_offset_hours
            )));
        }
        Ok(())
    }

    pub fn utc_offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.utc_offset_hours * 3600).unwrap_or_else(|| Utc.fix())
    }

    /// Today's calendar date in the configured offset.
    pub fn today(&self) -> NaiveDate {
        Utc::now().with_timezone(&self.utc_offset()).date_naive()
    }
}
