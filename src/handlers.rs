//! Tool pipelines. Each one fetches, validates and formats, and always ends
//! in text: failures become fixed messages, details go to the log.

use crate::client::RetryingClient;
use crate::constants::{
    ALERTS_UNAVAILABLE, ALERTS_UNEXPECTED, FORECAST_EMPTY, FORECAST_UNAVAILABLE,
    FORECAST_UNEXPECTED, FORECAST_URL_MISSING, HISTORICAL_UNAVAILABLE, HISTORICAL_UNEXPECTED,
};
use crate::formatters::{format_alerts, format_forecast, format_historical, format_overview};
use crate::overview::CountryTable;
use crate::validation::{alert_features, forecast_url, historical_entries, validate_forecast};

pub struct WeatherTools {
    client: RetryingClient,
    api_base: String,
    countries: CountryTable,
}

impl WeatherTools {
    pub fn new(client: RetryingClient, api_base: impl Into<String>, countries: CountryTable) -> Self {
        Self {
            client,
            api_base: api_base.into().trim_end_matches('/').to_string(),
            countries,
        }
    }

    pub async fn alerts(&self, state: &str) -> String {
        let state_code = state.to_uppercase();
        let url = format!("{}/alerts?area={}", self.api_base, state_code);

        let Some(data) = self.client.fetch_json(&url).await else {
            return ALERTS_UNAVAILABLE.to_string();
        };

        match alert_features(&data) {
            Ok(features) if features.is_empty() => format!("No active alerts for {}", state_code),
            Ok(features) => format_alerts(&state_code, &features),
            Err(e) => {
                tracing::error!("Error in get-alerts tool: {}", e);
                ALERTS_UNEXPECTED.to_string()
            }
        }
    }

    pub async fn forecast(&self, latitude: f64, longitude: f64) -> String {
        let points_url = format!("{}/points/{:.4},{:.4}", self.api_base, latitude, longitude);

        let Some(points) = self.client.fetch_json(&points_url).await else {
            return format!(
                "Failed to retrieve grid point data for coordinates: {}, {}. \
                 This location may not be supported by the NWS API (only US locations are supported).",
                latitude, longitude
            );
        };

        let Ok(url) = forecast_url(&points) else {
            return FORECAST_URL_MISSING.to_string();
        };

        let Some(forecast) = self.client.fetch_json(url).await else {
            return FORECAST_UNAVAILABLE.to_string();
        };

        match validate_forecast(&forecast) {
            Ok(periods) if periods.is_empty() => FORECAST_EMPTY.to_string(),
            Ok(periods) => format_forecast(latitude, longitude, &periods),
            Err(e) => {
                tracing::error!("Error in get-forecast tool: {}", e);
                FORECAST_UNEXPECTED.to_string()
            }
        }
    }

    pub async fn historical(
        &self,
        latitude: f64,
        longitude: f64,
        start_date: &str,
        end_date: &str,
    ) -> String {
        let url = format!(
            "{}/historical?lat={}&lon={}&start={}&end={}",
            self.api_base, latitude, longitude, start_date, end_date
        );

        let Some(data) = self.client.fetch_json(&url).await else {
            return HISTORICAL_UNAVAILABLE.to_string();
        };

        match historical_entries(&data) {
            Ok(entries) => format_historical(&entries),
            Err(e) => {
                tracing::error!("Error in get-historical-weather tool: {}", e);
                HISTORICAL_UNEXPECTED.to_string()
            }
        }
    }

    pub fn country_overview(&self, country: &str) -> String {
        format_overview(country, self.countries.lookup(country))
    }
}
