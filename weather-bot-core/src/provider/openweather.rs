use anyhow::Context;
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, Offset, Utc};
use reqwest::Client;
use serde::{Deserialize, de::DeserializeOwned};
use std::time::Duration;
use tracing::debug;

use crate::{
    config::WeatherSettings,
    model::{ForecastEntry, WeatherQuery, WeatherSnapshot},
};

use super::{FetchError, WeatherProvider};

const CURRENT_PATH: &str = "/data/2.5/weather";
const FORECAST_PATH: &str = "/data/2.5/forecast";
const UNKNOWN: &str = "Noma'lum";

#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    api_key: String,
    base_url: String,
    units: String,
    language: String,
    http: Client,
}

impl OpenWeatherClient {
    pub fn new(api_key: String, settings: &WeatherSettings) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .context("Failed to build HTTP client for OpenWeather")?;

        Ok(Self {
            api_key,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            units: settings.units.clone(),
            language: settings.language.clone(),
            http,
        })
    }

    /// Single GET attempt; any non-success status is an error.
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        mut params: Vec<(&'static str, String)>,
    ) -> Result<T, FetchError> {
        params.extend([
            ("appid", self.api_key.clone()),
            ("units", self.units.clone()),
            ("lang", self.language.clone()),
        ]);

        let url = format!("{}{}", self.base_url, path);
        debug!(%url, "requesting OpenWeather");

        let res = self.http.get(&url).query(&params).send().await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherClient {
    async fn current(&self, query: &WeatherQuery) -> Result<WeatherSnapshot, FetchError> {
        let params = match query {
            WeatherQuery::City(city) => vec![("q", city.clone())],
            WeatherQuery::Coordinates(coords) => {
                vec![("lat", coords.lat.to_string()), ("lon", coords.lon.to_string())]
            }
        };

        let parsed: OwCurrentResponse = self.get_json(CURRENT_PATH, params).await?;
        parsed.into_snapshot()
    }

    async fn forecast(&self, city: &str) -> Result<Vec<ForecastEntry>, FetchError> {
        let parsed: OwForecastResponse =
            self.get_json(FORECAST_PATH, vec![("q", city.to_string())]).await?;
        parsed.into_entries()
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    feels_like: f64,
    humidity: u8,
    pressure: u32,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    main: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwSys {
    #[serde(default)]
    country: String,
    sunrise: i64,
    sunset: i64,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    #[serde(default = "unknown")]
    name: String,
    main: OwMain,
    #[serde(default)]
    weather: Vec<OwWeather>,
    wind: OwWind,
    sys: OwSys,
    /// Shift from UTC in seconds.
    #[serde(default)]
    timezone: i32,
}

impl OwCurrentResponse {
    fn into_snapshot(self) -> Result<WeatherSnapshot, FetchError> {
        let offset = utc_offset(self.timezone);
        let (condition, description) = condition_of(self.weather);

        Ok(WeatherSnapshot {
            city: self.name,
            country: self.sys.country,
            temperature_c: self.main.temp,
            feels_like_c: self.main.feels_like,
            humidity_pct: self.main.humidity,
            pressure_hpa: self.main.pressure,
            wind_speed_mps: self.wind.speed,
            condition,
            description,
            sunrise: local_time(self.sys.sunrise, offset)?,
            sunset: local_time(self.sys.sunset, offset)?,
        })
    }
}

#[derive(Debug, Deserialize)]
struct OwForecastMain {
    temp: f64,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt: i64,
    main: OwForecastMain,
    #[serde(default)]
    weather: Vec<OwWeather>,
}

#[derive(Debug, Deserialize, Default)]
struct OwCity {
    #[serde(default)]
    timezone: i32,
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    #[serde(default)]
    city: OwCity,
    list: Vec<OwForecastEntry>,
}

impl OwForecastResponse {
    fn into_entries(self) -> Result<Vec<ForecastEntry>, FetchError> {
        let offset = utc_offset(self.city.timezone);

        self.list
            .into_iter()
            .map(|entry| {
                let (condition, description) = condition_of(entry.weather);
                Ok(ForecastEntry {
                    time: local_time(entry.dt, offset)?,
                    temperature_c: entry.main.temp,
                    condition,
                    description,
                })
            })
            .collect()
    }
}

fn unknown() -> String {
    UNKNOWN.to_string()
}

fn condition_of(weather: Vec<OwWeather>) -> (String, String) {
    weather
        .into_iter()
        .next()
        .map(|w| (w.main, w.description))
        .unwrap_or_else(|| (String::new(), unknown()))
}

fn utc_offset(seconds: i32) -> FixedOffset {
    FixedOffset::east_opt(seconds).unwrap_or_else(|| Utc.fix())
}

fn local_time(ts: i64, offset: FixedOffset) -> Result<DateTime<FixedOffset>, FetchError> {
    DateTime::from_timestamp(ts, 0)
        .map(|utc| utc.with_timezone(&offset))
        .ok_or_else(|| FetchError::InvalidPayload(format!("timestamp {ts} is out of range")))
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
