use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Coarse weather categories derived from OpenWeatherMap icon ids.
///
/// Only used to pick a glyph; the provider's own description is what gets shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum WeatherCondition {
    #[default]
    Clear,
    PartlyCloudy,
    Cloudy,
    Fog,
    Drizzle,
    Rain,
    Snow,
    Thunderstorm,
}

impl WeatherCondition {
    /// Convert an icon id such as `"10d"` to a WeatherCondition.
    /// See: https://openweathermap.org/weather-conditions
    pub fn from_icon_id(icon_id: &str) -> Self {
        match icon_id.get(..2) {
            Some("01") => Self::Clear,
            Some("02") => Self::PartlyCloudy,
            Some("03") | Some("04") => Self::Cloudy,
            Some("09") => Self::Drizzle, // Shower rain
            Some("10") => Self::Rain,
            Some("11") => Self::Thunderstorm,
            Some("13") => Self::Snow,
            Some("50") => Self::Fog, // Mist, haze, smoke
            _ => Self::Clear,
        }
    }
}

/// Current conditions for one city, as returned by the gateway.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherResult {
    /// Name as spelled by the provider, not necessarily the user's input
    pub location_name: String,
    pub temperature_c: f64,
    pub feels_like_c: f64,
    pub humidity_pct: u8,
    pub wind_speed: f64,
    pub condition_description: String,
    pub condition_icon_id: String,
    pub fetched_at: DateTime<Utc>,
}

impl WeatherResult {
    pub fn condition(&self) -> WeatherCondition {
        WeatherCondition::from_icon_id(&self.condition_icon_id)
    }

    /// True for night-time icon variants (`"01n"`).
    pub fn is_night(&self) -> bool {
        self.condition_icon_id.ends_with('n')
    }
}
