use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use thiserror::Error;

// ============================================================================
// National Weather Service API Models
// ============================================================================

/// Scalars render as text; objects, arrays and null count as absent
fn scalar_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    })
}

/// Falls back to `T::default()` when the value has the wrong shape
fn or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(T::deserialize(value).unwrap_or_default())
}

#[derive(Debug, Default, Deserialize)]
pub struct AlertFeature {
    #[serde(default, deserialize_with = "or_default")]
    pub properties: AlertProperties,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AlertProperties {
    #[serde(deserialize_with = "scalar_text")]
    pub event: Option<String>,
    #[serde(rename = "areaDesc", deserialize_with = "scalar_text")]
    pub area_desc: Option<String>,
    #[serde(deserialize_with = "scalar_text")]
    pub severity: Option<String>,
    #[serde(deserialize_with = "scalar_text")]
    pub status: Option<String>,
    #[serde(deserialize_with = "scalar_text")]
    pub headline: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ForecastPeriod {
    #[serde(deserialize_with = "scalar_text")]
    pub name: Option<String>,
    #[serde(deserialize_with = "scalar_text")]
    pub temperature: Option<String>,
    #[serde(rename = "temperatureUnit", deserialize_with = "scalar_text")]
    pub temperature_unit: Option<String>,
    #[serde(rename = "windSpeed", deserialize_with = "scalar_text")]
    pub wind_speed: Option<String>,
    #[serde(rename = "windDirection", deserialize_with = "scalar_text")]
    pub wind_direction: Option<String>,
    #[serde(rename = "shortForecast", deserialize_with = "scalar_text")]
    pub short_forecast: Option<String>,
}

/// One day of historical data. Every field must be present; values are kept
/// as the upstream sent them.
#[derive(Debug, Deserialize)]
pub struct HistoricalEntry {
    pub date: Value,
    pub temperature: Value,
    pub conditions: Value,
}

// ============================================================================
// MCP Tool Request Models
// ============================================================================

/// Parameter violations caught before a handler runs
#[derive(Debug, Error, PartialEq)]
pub enum RequestError {
    #[error("State code must be exactly two letters, got '{0}'")]
    InvalidState(String),

    #[error("Latitude must be between -90 and 90, got {0}")]
    LatitudeOutOfRange(f64),

    #[error("Longitude must be between -180 and 180, got {0}")]
    LongitudeOutOfRange(f64),
}

fn validate_coordinates(latitude: f64, longitude: f64) -> Result<(), RequestError> {
    if !(-90.0..=90.0).contains(&latitude) {
        return Err(RequestError::LatitudeOutOfRange(latitude));
    }
    if !(-180.0..=180.0).contains(&longitude) {
        return Err(RequestError::LongitudeOutOfRange(longitude));
    }
    Ok(())
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
pub struct GetAlertsRequest {
    #[schemars(description = "Two-letter state code (e.g. CA, NY)")]
    pub state: String,
}

impl GetAlertsRequest {
    pub fn validate(&self) -> Result<(), RequestError> {
        if self.state.chars().count() != 2 {
            return Err(RequestError::InvalidState(self.state.clone()));
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
pub struct GetForecastRequest {
    #[schemars(description = "Latitude of the location (-90 to 90)")]
    pub latitude: f64,
    #[schemars(description = "Longitude of the location (-180 to 180)")]
    pub longitude: f64,
}

impl GetForecastRequest {
    pub fn validate(&self) -> Result<(), RequestError> {
        validate_coordinates(self.latitude, self.longitude)
    }
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
pub struct GetHistoricalWeatherRequest {
    #[schemars(description = "Latitude of the location (-90 to 90)")]
    pub latitude: f64,
    #[schemars(description = "Longitude of the location (-180 to 180)")]
    pub longitude: f64,
    #[serde(rename = "startDate")]
    #[schemars(description = "Start date in YYYY-MM-DD format")]
    pub start_date: String,
    #[serde(rename = "endDate")]
    #[schemars(description = "End date in YYYY-MM-DD format")]
    pub end_date: String,
}

impl GetHistoricalWeatherRequest {
    pub fn validate(&self) -> Result<(), RequestError> {
        validate_coordinates(self.latitude, self.longitude)
    }
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
pub struct GetCountryOverviewRequest {
    #[schemars(description = "Name of the country to get an overview for")]
    pub country: String,
}
