//! Core library for the weather chat bot.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The weather provider abstraction and its OpenWeather client
//! - Rendering of weather data into chat replies
//! - Menu keyboards and the message router
//!
//! It is used by `weather-bot`, which plugs a Telegram transport into [`Router`].

pub mod config;
pub mod format;
pub mod menu;
pub mod model;
pub mod provider;
pub mod router;

pub use config::{Config, Credentials, WeatherSettings};
pub use menu::{Keyboard, KeyboardButton, MenuButton};
pub use model::{
    ChatId, Coordinates, ForecastEntry, InboundEvent, InboundKind, SentMessage, WeatherQuery,
    WeatherSnapshot,
};
pub use provider::{FetchError, OpenWeatherClient, WeatherProvider};
pub use router::{ChatTransport, Route, Router};
