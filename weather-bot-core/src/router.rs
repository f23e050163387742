//! Maps inbound chat events to replies.

use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use crate::{
    format::{format_current, format_forecast},
    menu::{Keyboard, MenuButton},
    model::{ChatId, Coordinates, InboundEvent, InboundKind, SentMessage},
    provider::{WeatherProvider, fetch_current, fetch_forecast},
};

pub const WELCOME_TEXT: &str =
    "🌤️ OB-HAVO BOT\n\nShahar nomini yozing yoki joylashuvingizni yuboring 👇";
pub const HELP_TEXT: &str =
    "📌 FOYDALANISH:\n• Shahar yozing\n• Joylashuv yuboring\n• Mashhur shaharlarni tanlang";
pub const CHOOSE_CITY_TEXT: &str = "Shaharni tanlang:";
pub const MAIN_MENU_TEXT: &str = "Bosh menyu";
pub const FORECAST_USAGE_TEXT: &str = "Masalan: /forecast Toshkent";
pub const CITY_NOT_FOUND_TEXT: &str = "❌ Shahar topilmadi";

pub const LOADING_WEATHER_TEXT: &str = "⏳ Ob-havo olinmoqda...";
pub const LOADING_LOCATION_TEXT: &str = "⏳ Yuklanmoqda...";
pub const LOADING_FORECAST_TEXT: &str = "⏳ Prognoz yuklanmoqda...";

const START_COMMAND: &str = "/start";
const FORECAST_COMMAND: &str = "/forecast";

pub fn forecast_hint(city: &str) -> String {
    format!("📊 Prognoz uchun yozing:\n{FORECAST_COMMAND} {city}")
}

/// Outbound side of the chat platform.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    async fn send(
        &self,
        chat: ChatId,
        text: &str,
        keyboard: Option<&Keyboard>,
    ) -> Result<SentMessage>;

    async fn delete(&self, message: SentMessage) -> Result<()>;
}

/// Which handler an event goes to. Variants are listed in match precedence.
#[derive(Debug, Clone, PartialEq)]
pub enum Route {
    Start,
    Help,
    PopularCities,
    Back,
    Location(Coordinates),
    /// `None` when the command came without a city.
    Forecast(Option<String>),
    /// Menu label with no handler of its own.
    Ignored(MenuButton),
    City(String),
}

impl Route {
    pub fn classify(kind: &InboundKind) -> Self {
        let text = match kind {
            InboundKind::Location(coords) => return Route::Location(*coords),
            InboundKind::Text(text) => text.as_str(),
        };

        if is_command(text, START_COMMAND) {
            return Route::Start;
        }

        match MenuButton::from_caption(text) {
            Some(MenuButton::Help) => return Route::Help,
            Some(MenuButton::PopularCities) => return Route::PopularCities,
            Some(MenuButton::Back) => return Route::Back,
            _ => {}
        }

        if text.starts_with(FORECAST_COMMAND) {
            return Route::Forecast(command_argument(text).map(str::to_owned));
        }

        match MenuButton::from_caption(text) {
            Some(button) => Route::Ignored(button),
            None => Route::City(text.to_owned()),
        }
    }
}

/// `/start`, `/start@botname` and `/start <payload>` all count.
fn is_command(text: &str, command: &str) -> bool {
    let Some(head) = text.split_whitespace().next() else {
        return false;
    };
    head == command
        || head
            .strip_prefix(command)
            .is_some_and(|rest| rest.starts_with('@'))
}

/// Everything after the first whitespace-separated token, trimmed.
fn command_argument(text: &str) -> Option<&str> {
    let (_, rest) = text.trim_start().split_once(char::is_whitespace)?;
    let rest = rest.trim();
    (!rest.is_empty()).then_some(rest)
}

/// Application context: owns the provider and the transport for the process lifetime.
pub struct Router<P: ?Sized, T: ?Sized> {
    provider: Arc<P>,
    transport: Arc<T>,
}

impl<P, T> Router<P, T>
where
    P: WeatherProvider + ?Sized,
    T: ChatTransport + ?Sized,
{
    pub fn new(provider: Arc<P>, transport: Arc<T>) -> Self {
        Self { provider, transport }
    }

    #[instrument(skip(self, event), fields(chat_id = %event.chat))]
    pub async fn handle(&self, event: &InboundEvent) -> Result<()> {
        let route = Route::classify(&event.kind);
        debug!(?route, "routed event");

        let chat = event.chat;
        let main_menu = Keyboard::main_menu();

        match route {
            Route::Start => {
                self.transport.send(chat, WELCOME_TEXT, Some(&main_menu)).await?;
            }
            Route::Help => {
                self.transport.send(chat, HELP_TEXT, Some(&main_menu)).await?;
            }
            Route::PopularCities => {
                let cities = Keyboard::popular_cities();
                self.transport.send(chat, CHOOSE_CITY_TEXT, Some(&cities)).await?;
            }
            Route::Back => {
                self.transport.send(chat, MAIN_MENU_TEXT, Some(&main_menu)).await?;
            }
            Route::Location(coords) => self.location_weather(chat, coords).await?,
            Route::Forecast(None) => {
                self.transport.send(chat, FORECAST_USAGE_TEXT, None).await?;
            }
            Route::Forecast(Some(city)) => self.forecast(chat, &city).await?,
            Route::Ignored(button) => {
                debug!(?button, "menu label without handler, ignoring");
            }
            Route::City(city) => self.city_weather(chat, &city).await?,
        }

        Ok(())
    }

    /// Remove a loading placeholder; failures are logged, not propagated.
    async fn dismiss(&self, loading: SentMessage) {
        if let Err(err) = self.transport.delete(loading).await {
            warn!(message_id = loading.id, error = %err, "failed to delete loading message");
        }
    }

    async fn location_weather(&self, chat: ChatId, coords: Coordinates) -> Result<()> {
        info!(lat = coords.lat, lon = coords.lon, "weather by location");

        let loading = self.transport.send(chat, LOADING_LOCATION_TEXT, None).await?;
        let snapshot = fetch_current(self.provider.as_ref(), None, Some(coords)).await;
        self.dismiss(loading).await;

        self.transport.send(chat, &format_current(snapshot.as_ref()), None).await?;
        Ok(())
    }

    async fn forecast(&self, chat: ChatId, city: &str) -> Result<()> {
        info!(city, "forecast");

        let loading = self.transport.send(chat, LOADING_FORECAST_TEXT, None).await?;
        let entries = fetch_forecast(self.provider.as_ref(), city).await;
        self.dismiss(loading).await;

        self.transport.send(chat, &format_forecast(city, entries.as_deref()), None).await?;
        Ok(())
    }

    async fn city_weather(&self, chat: ChatId, city: &str) -> Result<()> {
        info!(city, "weather by city");

        let loading = self.transport.send(chat, LOADING_WEATHER_TEXT, None).await?;
        let snapshot = fetch_current(self.provider.as_ref(), Some(city), None).await;
        self.dismiss(loading).await;

        match snapshot {
            Some(snapshot) => {
                self.transport.send(chat, &format_current(Some(&snapshot)), None).await?;
                self.transport.send(chat, &forecast_hint(city), None).await?;
            }
            None => {
                self.transport.send(chat, CITY_NOT_FOUND_TEXT, None).await?;
            }
        }

        Ok(())
    }
}
