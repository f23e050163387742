use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// Transport-neutral chat identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChatId(pub i64);

impl std::fmt::Display for ChatId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Handle to a message the bot has already sent, e.g. a loading placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SentMessage {
    pub chat: ChatId,
    pub id: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

/// What to ask the provider for: a city by name or a point on the map.
#[derive(Debug, Clone, PartialEq)]
pub enum WeatherQuery {
    City(String),
    Coordinates(Coordinates),
}

impl WeatherQuery {
    /// Build a query from optional parts. The city takes priority when both are given;
    /// `None` when neither is.
    pub fn from_parts(city: Option<&str>, coordinates: Option<Coordinates>) -> Option<Self> {
        match (city, coordinates) {
            (Some(city), _) => Some(Self::City(city.to_owned())),
            (None, Some(coords)) => Some(Self::Coordinates(coords)),
            (None, None) => None,
        }
    }
}

/// Current conditions for one place, parsed from a single provider response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub city: String,
    pub country: String,
    pub temperature_c: f64,
    pub feels_like_c: f64,
    pub humidity_pct: u8,
    pub pressure_hpa: u32,
    pub wind_speed_mps: f64,
    /// Coarse provider category, e.g. "Rain" or "Clear".
    pub condition: String,
    pub description: String,
    pub sunrise: DateTime<FixedOffset>,
    pub sunset: DateTime<FixedOffset>,
}

/// One 3-hour step of a forecast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastEntry {
    pub time: DateTime<FixedOffset>,
    pub temperature_c: f64,
    pub condition: String,
    pub description: String,
}

/// A message delivered by the chat transport.
#[derive(Debug, Clone, PartialEq)]
pub struct InboundEvent {
    pub chat: ChatId,
    pub kind: InboundKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum InboundKind {
    Text(String),
    Location(Coordinates),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_prefers_city_over_coordinates() {
        let coords = Coordinates { lat: 41.3, lon: 69.2 };
        let query = WeatherQuery::from_parts(Some("Toshkent"), Some(coords));
        assert_eq!(query, Some(WeatherQuery::City("Toshkent".into())));
    }

    #[test]
    fn query_from_coordinates_only() {
        let coords = Coordinates { lat: 39.65, lon: 66.96 };
        let query = WeatherQuery::from_parts(None, Some(coords));
        assert_eq!(query, Some(WeatherQuery::Coordinates(coords)));
    }

    #[test]
    fn query_without_parts_is_none() {
        assert_eq!(WeatherQuery::from_parts(None, None), None);
    }
}
