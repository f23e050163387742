use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

pub const BOT_TOKEN_ENV: &str = "TELEGRAM_BOT_TOKEN";
pub const API_KEY_ENV: &str = "OPENWEATHER_API_KEY";

/// Request settings for the weather provider.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WeatherSettings {
    pub base_url: String,
    pub units: String,
    pub language: String,
    pub timeout_secs: u64,
}

impl Default for WeatherSettings {
    fn default() -> Self {
        Self {
            base_url: "https://api.openweathermap.org".to_string(),
            units: "metric".to_string(),
            language: "uz".to_string(),
            timeout_secs: 10,
        }
    }
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// bot_token = "..."
/// api_key = "..."
///
/// [weather]
/// language = "uz"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub bot_token: Option<String>,
    pub api_key: Option<String>,
    pub weather: WeatherSettings,
}

/// Both secrets the bot needs to start.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub bot_token: String,
    pub api_key: String,
}

impl Config {
    /// Load config from `path`, or return an empty default if it doesn't exist yet.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weather-bot", "weather-bot")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Overlay secrets from the environment. Non-empty values win over the file.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(token) = non_empty(BOT_TOKEN_ENV) {
            self.bot_token = Some(token);
        }
        if let Some(key) = non_empty(API_KEY_ENV) {
            self.api_key = Some(key);
        }
    }

    pub fn credentials(&self) -> Result<Credentials> {
        let bot_token = self.bot_token.clone().ok_or_else(|| {
            anyhow!(
                "No Telegram bot token configured.\n\
                 Hint: set {BOT_TOKEN_ENV} or run `weather-bot configure`."
            )
        })?;

        let api_key = self.api_key.clone().ok_or_else(|| {
            anyhow!(
                "No OpenWeather API key configured.\n\
                 Hint: set {API_KEY_ENV} or run `weather-bot configure`."
            )
        })?;

        Ok(Credentials { bot_token, api_key })
    }
}
