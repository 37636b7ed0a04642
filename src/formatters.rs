use serde_json::Value;

use crate::models::{AlertFeature, ForecastPeriod, HistoricalEntry};
use crate::overview::CountryOverview;

const SEPARATOR: &str = "---";

/// Treats empty strings as absent
fn or<'a>(value: &'a Option<String>, fallback: &'a str) -> &'a str {
    value.as_deref().filter(|s| !s.is_empty()).unwrap_or(fallback)
}

/// Formats a single alert as a separator-terminated block
pub fn format_alert(feature: &AlertFeature) -> String {
    let props = &feature.properties;
    [
        format!("Event: {}", or(&props.event, "Unknown")),
        format!("Area: {}", or(&props.area_desc, "Unknown")),
        format!("Severity: {}", or(&props.severity, "Unknown")),
        format!("Status: {}", or(&props.status, "Unknown")),
        format!("Headline: {}", or(&props.headline, "No headline")),
        SEPARATOR.to_string(),
    ]
    .join("\n")
}

/// Formats a single forecast period as a separator-terminated block
pub fn format_period(period: &ForecastPeriod) -> String {
    [
        format!("{}:", or(&period.name, "Unknown")),
        format!(
            "Temperature: {}\u{00b0}{}",
            or(&period.temperature, "Unknown"),
            or(&period.temperature_unit, "F")
        ),
        format!(
            "Wind: {} {}",
            or(&period.wind_speed, "Unknown"),
            or(&period.wind_direction, "")
        ),
        or(&period.short_forecast, "No forecast available").to_string(),
        SEPARATOR.to_string(),
    ]
    .join("\n")
}

/// Strings print without quotes; everything else prints as JSON
fn raw(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

pub fn format_historical_entry(entry: &HistoricalEntry) -> String {
    format!(
        "Date: {}, Temperature: {}\u{00b0}F, Conditions: {}",
        raw(&entry.date),
        raw(&entry.temperature),
        raw(&entry.conditions)
    )
}

/// Formats active alerts for a state, in upstream order
pub fn format_alerts(state: &str, features: &[AlertFeature]) -> String {
    let alerts: Vec<String> = features.iter().map(format_alert).collect();
    format!("Active alerts for {}:\n\n{}", state, alerts.join("\n"))
}

/// Formats NWS forecast periods for a location, in upstream order
pub fn format_forecast(latitude: f64, longitude: f64, periods: &[ForecastPeriod]) -> String {
    let periods: Vec<String> = periods.iter().map(format_period).collect();
    format!(
        "Forecast for {}, {}:\n\n{}",
        latitude,
        longitude,
        periods.join("\n")
    )
}

pub fn format_historical(entries: &[HistoricalEntry]) -> String {
    let lines: Vec<String> = entries.iter().map(format_historical_entry).collect();
    format!("Historical weather data:\n\n{}", lines.join("\n"))
}

/// Formats the travel overview for a country. Sub-regions are not rendered.
pub fn format_overview(country: &str, overview: &CountryOverview) -> String {
    format!(
        "Overview for {}:\n\nWeather: {}\nClothing: {}\nTips: {}",
        country, overview.weather, overview.clothing, overview.tips
    )
}
