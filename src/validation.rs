//! Structural checks on decoded upstream payloads.
//!
//! A [`Shape`] is a list of [`Check`]s over JSON paths. Checking never
//! panics and never inspects values beyond their container kind.

use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

use crate::models::{AlertFeature, ForecastPeriod, HistoricalEntry};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct ShapeError(pub String);

type Path = &'static [&'static str];

/// A single predicate on the value found at a path
#[derive(Debug, Clone, Copy)]
pub enum Check {
    Object(Path),
    Array(Path),
    String(Path),
    /// Absent or null is accepted; anything present must be an array
    OptionalArray(Path),
}

impl Check {
    fn holds(&self, root: &Value) -> bool {
        match *self {
            Check::Object(path) => lookup(root, path).is_some_and(Value::is_object),
            Check::Array(path) => lookup(root, path).is_some_and(Value::is_array),
            Check::String(path) => lookup(root, path)
                .and_then(Value::as_str)
                .is_some_and(|s| !s.is_empty()),
            Check::OptionalArray(path) => match lookup(root, path) {
                None | Some(Value::Null) => true,
                Some(value) => value.is_array(),
            },
        }
    }
}

fn lookup<'a>(root: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter().try_fold(root, |value, key| value.get(key))
}

/// Required structure of one kind of payload
#[derive(Debug, Clone, Copy)]
pub struct Shape {
    pub message: &'static str,
    pub checks: &'static [Check],
}

impl Shape {
    pub fn check(&self, value: &Value) -> Result<(), ShapeError> {
        if self.checks.iter().all(|check| check.holds(value)) {
            Ok(())
        } else {
            Err(ShapeError(self.message.to_string()))
        }
    }
}

pub const FORECAST: Shape = Shape {
    message: "Invalid forecast response format",
    checks: &[Check::Object(&["properties"]), Check::Array(&["properties", "periods"])],
};

pub const POINTS: Shape = Shape {
    message: "Invalid grid point response format",
    checks: &[Check::String(&["properties", "forecast"])],
};

pub const ALERTS: Shape = Shape {
    message: "Invalid alerts response format",
    checks: &[Check::Object(&[]), Check::OptionalArray(&["features"])],
};

pub const HISTORICAL: Shape = Shape {
    message: "Invalid historical response format",
    checks: &[Check::Array(&[])],
};

fn items(value: Option<&Value>) -> &[Value] {
    match value {
        Some(Value::Array(items)) => items,
        _ => &[],
    }
}

/// Decodes each item on its own; an item that is not an object becomes a
/// record of fallbacks
fn lenient_records<T: DeserializeOwned + Default>(value: Option<&Value>) -> Vec<T> {
    items(value)
        .iter()
        .map(|item| T::deserialize(item).unwrap_or_default())
        .collect()
}

fn strict_records<T: DeserializeOwned>(value: Option<&Value>, shape: &Shape) -> Result<Vec<T>, ShapeError> {
    items(value)
        .iter()
        .map(|item| {
            T::deserialize(item).map_err(|e| {
                tracing::debug!("Record rejected: {}", e);
                ShapeError(shape.message.to_string())
            })
        })
        .collect()
}

pub fn validate_forecast(value: &Value) -> Result<Vec<ForecastPeriod>, ShapeError> {
    FORECAST.check(value)?;
    Ok(lenient_records(lookup(value, &["properties", "periods"])))
}

/// The forecast URL advertised by a points lookup
pub fn forecast_url(value: &Value) -> Result<&str, ShapeError> {
    POINTS.check(value)?;
    lookup(value, &["properties", "forecast"])
        .and_then(Value::as_str)
        .ok_or_else(|| ShapeError(POINTS.message.to_string()))
}

/// Missing `features` reads as no alerts
pub fn alert_features(value: &Value) -> Result<Vec<AlertFeature>, ShapeError> {
    ALERTS.check(value)?;
    Ok(lenient_records(value.get("features")))
}

/// Entries are decoded strictly: one entry missing a field rejects the payload
pub fn historical_entries(value: &Value) -> Result<Vec<HistoricalEntry>, ShapeError> {
    HISTORICAL.check(value)?;
    strict_records(Some(value), &HISTORICAL)
}
