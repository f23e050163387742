//! Human-readable rendering of provider data.

use crate::model::{ForecastEntry, WeatherSnapshot};

pub const WEATHER_NOT_FOUND: &str = "❌ Ob-havo ma'lumoti topilmadi";
pub const FORECAST_NOT_FOUND: &str = "❌ Prognoz topilmadi";

pub const DEFAULT_GLYPH: &str = "🌈";

/// Condition category to glyph.
pub const CONDITION_GLYPHS: &[(&str, &str)] = &[
    ("Clear", "☀️"),
    ("Clouds", "☁️"),
    ("Rain", "🌧️"),
    ("Drizzle", "🌦️"),
    ("Thunderstorm", "⛈️"),
    ("Snow", "❄️"),
    ("Mist", "🌫️"),
    ("Fog", "🌫️"),
    ("Haze", "🌫️"),
];

/// Forecast entries come in 3-hour steps, so every 8th is one per day.
const FORECAST_STRIDE: usize = 8;
const FORECAST_DAYS: usize = 5;

pub fn condition_glyph(category: &str) -> &'static str {
    CONDITION_GLYPHS
        .iter()
        .find(|(name, _)| *name == category)
        .map(|(_, glyph)| *glyph)
        .unwrap_or(DEFAULT_GLYPH)
}

pub fn format_current(snapshot: Option<&WeatherSnapshot>) -> String {
    let Some(s) = snapshot else {
        return WEATHER_NOT_FOUND.to_string();
    };

    format!(
        "{glyph} {city}, {country}\n\n\
         🌡️ Harorat: {temp:.1}°C\n\
         🤔 His qilinadi: {feels:.1}°C\n\
         📝 Holat: {desc}\n\n\
         💧 Namlik: {hum}%\n\
         🌪️ Shamol: {wind} m/s\n\
         🔽 Bosim: {pres} hPa\n\n\
         🌅 Quyosh chiqishi: {sunrise}\n\
         🌇 Quyosh botishi: {sunset}",
        glyph = condition_glyph(&s.condition),
        city = s.city,
        country = s.country,
        temp = s.temperature_c,
        feels = s.feels_like_c,
        desc = s.description,
        hum = s.humidity_pct,
        wind = s.wind_speed_mps,
        pres = s.pressure_hpa,
        sunrise = s.sunrise.format("%H:%M"),
        sunset = s.sunset.format("%H:%M"),
    )
}

/// Daily forecast lines for `city`. A present but empty list yields the header alone.
pub fn format_forecast(city: &str, entries: Option<&[ForecastEntry]>) -> String {
    let Some(entries) = entries else {
        return FORECAST_NOT_FOUND.to_string();
    };

    let mut text = format!("📊 {} - 5 KUNLIK PROGNOZ\n\n", city.to_uppercase());

    for entry in entries.iter().step_by(FORECAST_STRIDE).take(FORECAST_DAYS) {
        text.push_str(&format!(
            "{} {}: {:.1}°C, {}\n",
            condition_glyph(&entry.condition),
            entry.time.format("%d.%m"),
            entry.temperature_c,
            entry.description,
        ));
    }

    text
}
