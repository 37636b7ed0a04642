/// User agent string for HTTP requests
pub const USER_AGENT: &str = "weather-app/1.0";

/// National Weather Service API base URL
pub const NWS_API_BASE: &str = "https://api.weather.gov";

/// Media type requested from the NWS API
pub const GEO_JSON: &str = "application/geo+json";

/// Attempts made per upstream request before giving up
pub const MAX_ATTEMPTS: u32 = 3;

/// Fallback used for every field of an unknown country
pub const NO_COUNTRY_DATA: &str = "No specific data available for this country.";

pub const ALERTS_UNAVAILABLE: &str = "Failed to retrieve alerts data";
pub const ALERTS_UNEXPECTED: &str = "An unexpected error occurred while fetching alerts.";
pub const FORECAST_URL_MISSING: &str = "Failed to get forecast URL from grid point data";
pub const FORECAST_UNAVAILABLE: &str = "Failed to retrieve forecast data";
pub const FORECAST_EMPTY: &str = "No forecast periods available";
pub const FORECAST_UNEXPECTED: &str = "An unexpected error occurred while fetching the forecast.";
pub const HISTORICAL_UNAVAILABLE: &str = "Failed to retrieve historical weather data";
pub const HISTORICAL_UNEXPECTED: &str =
    "An unexpected error occurred while fetching historical weather data.";
