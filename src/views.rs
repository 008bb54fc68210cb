//! Terminal rendering of controller state.
//!
//! Views are pure functions from a state snapshot to text; they never feed
//! anything back into the controller.

use std::fmt::Write;

use weathlytics_weather::{
    ControllerState, FetchError, HistoryList, WeatherCondition, WeatherResult,
};

const RESET: &str = "\x1b[0m";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    pub fn from_dark_mode(dark_mode: bool) -> Self {
        if dark_mode {
            Theme::Dark
        } else {
            Theme::Light
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    fn accent(self) -> &'static str {
        match self {
            Theme::Light => "\x1b[34m",
            Theme::Dark => "\x1b[96m",
        }
    }

    fn muted(self) -> &'static str {
        match self {
            Theme::Light => "\x1b[90m",
            Theme::Dark => "\x1b[37m",
        }
    }

    fn alert(self) -> &'static str {
        match self {
            Theme::Light => "\x1b[31m",
            Theme::Dark => "\x1b[91m",
        }
    }

    fn name(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
}

/// Placeholder forecast slots. Not derived from any API response.
const FORECAST_SLOTS: [(&str, &str, WeatherCondition, &str); 4] = [
    ("Morning", "9:00", WeatherCondition::Clear, "22°"),
    ("Noon", "12:00", WeatherCondition::Cloudy, "25°"),
    ("Afternoon", "15:00", WeatherCondition::Rain, "23°"),
    ("Evening", "18:00", WeatherCondition::Snow, "20°"),
];

fn glyph(condition: WeatherCondition, night: bool) -> &'static str {
    match condition {
        WeatherCondition::Clear if night => "☾",
        WeatherCondition::Clear => "☀",
        WeatherCondition::PartlyCloudy => "⛅",
        WeatherCondition::Cloudy => "☁",
        WeatherCondition::Fog => "🌫",
        WeatherCondition::Drizzle | WeatherCondition::Rain => "🌧",
        WeatherCondition::Snow => "❄",
        WeatherCondition::Thunderstorm => "⛈",
    }
}

pub fn banner(theme: Theme) -> String {
    format!(
        "{}Weathlytics{}\n{}Know the Weather Before It Knows You.{}\n",
        theme.accent(),
        RESET,
        theme.muted(),
        RESET
    )
}

pub fn help(theme: Theme) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}Commands{}", theme.accent(), RESET);
    for (cmd, what) in [
        ("<city> | search <city>", "look up current weather"),
        ("refresh | r", "re-fetch the city on display"),
        ("history | h", "show recent searches"),
        ("pick <n> | p <n>", "search recent entry n again"),
        ("theme | t", "toggle light/dark"),
        ("quit | q", "exit"),
    ] {
        let _ = writeln!(out, "  {:<24} {}{}{}", cmd, theme.muted(), what, RESET);
    }
    out
}

/// One-line status shown while a fetch is in flight.
pub fn status_line(state: &ControllerState, city: &str, theme: Theme) -> Option<String> {
    if !state.loading {
        return None;
    }
    let verb = if state.refreshing { "Refreshing" } else { "Searching" };
    Some(format!("{}{} {}…{}", theme.muted(), verb, city, RESET))
}

pub fn render(state: &ControllerState, theme: Theme) -> String {
    let mut out = String::new();

    if let Some(error) = &state.error {
        out.push_str(&error_banner(error, theme));
    }

    if let Some(weather) = &state.weather {
        out.push_str(&weather_card(weather, theme));
        out.push_str(&forecast(&weather.location_name, theme));
    }

    if !state.history.is_empty() {
        out.push_str(&history(&state.history, theme));
    }

    out
}

pub fn error_banner(error: &FetchError, theme: Theme) -> String {
    format!("{}! {}{}\n", theme.alert(), error.message, RESET)
}

pub fn weather_card(weather: &WeatherResult, theme: Theme) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{}{} {}{}",
        theme.accent(),
        glyph(weather.condition(), weather.is_night()),
        weather.location_name,
        RESET
    );
    let _ = writeln!(
        out,
        "  {:.0}°C  {}",
        weather.temperature_c, weather.condition_description
    );
    let _ = writeln!(out, "  Feels like  {:.0}°C", weather.feels_like_c);
    let _ = writeln!(out, "  Humidity    {}%", weather.humidity_pct);
    let _ = writeln!(out, "  Wind        {:.1} m/s", weather.wind_speed);
    let _ = writeln!(
        out,
        "  {}Updated {}{}",
        theme.muted(),
        weather.fetched_at.format("%H:%M UTC"),
        RESET
    );
    out
}

pub fn forecast(city: &str, theme: Theme) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{}Daily Forecast{} {}({}){}",
        theme.accent(),
        RESET,
        theme.muted(),
        city,
        RESET
    );
    for (label, time, condition, temp) in FORECAST_SLOTS {
        let _ = writeln!(
            out,
            "  {} {:<10} {:>5}  {}",
            glyph(condition, false),
            label,
            time,
            temp
        );
    }
    out
}

pub fn history(history: &HistoryList, theme: Theme) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}Your most recent searches{}", theme.accent(), RESET);
    if history.is_empty() {
        let _ = writeln!(out, "  {}(none yet){}", theme.muted(), RESET);
    }
    for (i, city) in history.entries().iter().enumerate() {
        let _ = writeln!(out, "  {}. {}", i + 1, city);
    }
    out
}

pub fn theme_changed(theme: Theme) -> String {
    format!("{}Switched to {} theme{}\n", theme.accent(), theme.name(), RESET)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn paris() -> WeatherResult {
        WeatherResult {
            location_name: "Paris".to_string(),
            temperature_c: 18.4,
            feels_like_c: 16.0,
            humidity_pct: 60,
            wind_speed: 3.0,
            condition_description: "clear sky".to_string(),
            condition_icon_id: "01d".to_string(),
            fetched_at: Utc::now(),
        }
    }

    #[test]
    fn test_theme_toggle() {
        assert_eq!(Theme::from_dark_mode(false).toggled(), Theme::Dark);
        assert_eq!(Theme::Dark.toggled(), Theme::Light);
        assert!(theme_changed(Theme::Dark).contains("dark"));
    }

    #[test]
    fn test_empty_state_renders_nothing() {
        assert_eq!(render(&ControllerState::default(), Theme::Light), "");
    }

    #[test]
    fn test_weather_card_fields() {
        let card = weather_card(&paris(), Theme::Light);
        assert!(card.contains("Paris"));
        assert!(card.contains("18°C"));
        assert!(card.contains("clear sky"));
        assert!(card.contains("60%"));
        assert!(card.contains("3.0 m/s"));
        assert!(card.contains("☀"));
    }

    #[test]
    fn test_render_with_weather_includes_forecast_and_history() {
        let mut state = ControllerState {
            weather: Some(paris()),
            ..ControllerState::default()
        };
        state.history.push("Paris");

        let out = render(&state, Theme::Dark);
        assert!(out.contains("Daily Forecast"));
        assert!(out.contains("(Paris)"));
        assert!(out.contains("Morning"));
        assert!(out.contains("1. Paris"));
    }

    #[test]
    fn test_render_error_without_weather() {
        let state = ControllerState {
            error: Some(FetchError::not_found()),
            ..ControllerState::default()
        };

        let out = render(&state, Theme::Light);
        assert!(out.contains("City not found"));
        assert!(!out.contains("Daily Forecast"));
    }

    #[test]
    fn test_status_line_only_while_loading() {
        let mut state = ControllerState::default();
        assert_eq!(status_line(&state, "Paris", Theme::Light), None);

        state.loading = true;
        assert!(status_line(&state, "Paris", Theme::Light).unwrap().contains("Searching Paris"));

        state.refreshing = true;
        assert!(status_line(&state, "Paris", Theme::Light).unwrap().contains("Refreshing"));
    }
}
