use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use inquire::{Password, PasswordDisplayMode};
use std::path::{Path, PathBuf};
use tracing::info;
use weather_bot_core::Config;

use crate::telegram;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather-bot", version, about = "Telegram weather bot")]
pub struct Cli {
    /// Config file to use instead of the platform default.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Defaults to `run`.
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand, PartialEq, Eq)]
pub enum Command {
    /// Connect to Telegram and answer messages until interrupted.
    Run,

    /// Store the bot token and OpenWeather API key in the config file.
    Configure,
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        let path = match self.config {
            Some(path) => path,
            None => Config::config_file_path()?,
        };
        let mut config = Config::load_from(&path)?;

        match self.command.unwrap_or(Command::Run) {
            Command::Configure => configure(&mut config, &path),
            Command::Run => {
                config.apply_env(|key| std::env::var(key).ok());
                let credentials = config.credentials()?;
                info!(config = %path.display(), "starting weather bot");
                telegram::run(credentials, &config.weather).await
            }
        }
    }
}

/// Prompt for a secret; an empty answer keeps the current value.
fn prompt_secret(message: &str, current: Option<String>) -> Result<Option<String>> {
    let mut prompt = Password::new(message)
        .without_confirmation()
        .with_display_mode(PasswordDisplayMode::Masked);
    if current.is_some() {
        prompt = prompt.with_help_message("Leave empty to keep the stored value");
    }

    let answer = prompt
        .prompt()
        .with_context(|| format!("Failed to read input for '{message}'"))?;

    let answer = answer.trim();
    Ok(if answer.is_empty() { current } else { Some(answer.to_string()) })
}

fn configure(config: &mut Config, path: &Path) -> Result<()> {
    config.bot_token = prompt_secret("Telegram bot token:", config.bot_token.take())?;
    config.api_key = prompt_secret("OpenWeather API key:", config.api_key.take())?;

    config.save_to(path)?;
    println!("Configuration saved to {}", path.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_subcommand_means_run() {
        let cli = Cli::try_parse_from(["weather-bot"]).unwrap();
        assert_eq!(cli.command, None);
        assert_eq!(cli.config, None);
    }

    #[test]
    fn configure_accepts_config_path() {
        let cli =
            Cli::try_parse_from(["weather-bot", "configure", "--config", "/tmp/bot.toml"]).unwrap();

        assert_eq!(cli.command, Some(Command::Configure));
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/bot.toml")));
    }

    #[test]
    fn unknown_subcommand_is_rejected() {
        assert!(Cli::try_parse_from(["weather-bot", "forecast"]).is_err());
    }
}
