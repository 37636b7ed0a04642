use anyhow::Result;
use rmcp::{
    handler::server::{wrapper::Parameters, ServerHandler, tool::ToolRouter},
    model::{CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router,
    ErrorData as McpError,
};
use std::sync::Arc;

use crate::client::{ReqwestTransport, RetryingClient};
use crate::config::Config;
use crate::handlers::WeatherTools;
use crate::models::{
    GetAlertsRequest, GetCountryOverviewRequest, GetForecastRequest, GetHistoricalWeatherRequest,
    RequestError,
};
use crate::overview::CountryTable;

/// Main weather service that handles MCP requests
#[derive(Clone)]
pub struct Weather {
    tools: Arc<WeatherTools>,
    tool_router: ToolRouter<Self>,
}

impl Weather {
    /// Creates a new Weather service instance
    pub fn new(config: &Config, countries: CountryTable) -> Result<Self> {
        let transport = ReqwestTransport::new(&config.user_agent, config.request_timeout)?;
        let client = RetryingClient::new(Arc::new(transport), config.retry.clone());

        Ok(Self::with_tools(WeatherTools::new(client, config.api_base.clone(), countries)))
    }

    pub fn with_tools(tools: WeatherTools) -> Self {
        Self {
            tools: Arc::new(tools),
            tool_router: Self::tool_router(),
        }
    }
}

fn text(report: String) -> Result<CallToolResult, McpError> {
    Ok(CallToolResult::success(vec![Content::text(report)]))
}

fn invalid(e: RequestError) -> McpError {
    tracing::warn!("Rejected tool parameters: {}", e);
    McpError::invalid_params(e.to_string(), None)
}

#[tool_handler]
impl ServerHandler for Weather {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "weather".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                icons: None,
                title: None,
                website_url: None,
            },
            instructions: Some(
                "A weather information service powered by the National Weather Service API. \
                Provides alerts and forecasts for US locations, historical weather data, \
                and travel overviews for selected countries."
                    .to_string(),
            ),
        }
    }
}

#[tool_router]
impl Weather {
    /// Gets active weather alerts for a US state
    #[tool(name = "get-alerts", description = "Get weather alerts for a state")]
    async fn get_alerts(
        &self,
        Parameters(request): Parameters<GetAlertsRequest>,
    ) -> Result<CallToolResult, McpError> {
        request.validate().map_err(invalid)?;
        tracing::info!("Getting alerts for state: {}", request.state);

        text(self.tools.alerts(&request.state).await)
    }

    /// Gets the NWS forecast for a US location
    #[tool(name = "get-forecast", description = "Get weather forecast for a location")]
    async fn get_forecast(
        &self,
        Parameters(request): Parameters<GetForecastRequest>,
    ) -> Result<CallToolResult, McpError> {
        request.validate().map_err(invalid)?;
        tracing::info!(
            "Getting forecast for coordinates: {}, {}",
            request.latitude,
            request.longitude
        );

        text(self.tools.forecast(request.latitude, request.longitude).await)
    }

    #[tool(
        name = "get-historical-weather",
        description = "Fetch historical weather data for a location"
    )]
    async fn get_historical_weather(
        &self,
        Parameters(request): Parameters<GetHistoricalWeatherRequest>,
    ) -> Result<CallToolResult, McpError> {
        request.validate().map_err(invalid)?;
        tracing::info!(
            "Getting historical weather for {}, {} from {} to {}",
            request.latitude,
            request.longitude,
            request.start_date,
            request.end_date
        );

        let report = self
            .tools
            .historical(
                request.latitude,
                request.longitude,
                &request.start_date,
                &request.end_date,
            )
            .await;
        text(report)
    }

    #[tool(
        name = "get-country-overview",
        description = "Get a general overview for visiting a specific country"
    )]
    async fn get_country_overview(
        &self,
        Parameters(request): Parameters<GetCountryOverviewRequest>,
    ) -> Result<CallToolResult, McpError> {
        tracing::info!("Getting overview for country: {}", request.country);

        text(self.tools.country_overview(&request.country))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::testing::ScriptedTransport;
    use crate::client::RetryPolicy;

    fn weather(transport: ScriptedTransport) -> Weather {
        let client = RetryingClient::new(Arc::new(transport), RetryPolicy::default());
        Weather::with_tools(WeatherTools::new(client, "https://nws.test", CountryTable::default()))
    }

    #[test]
    fn registers_all_tools() {
        let weather = weather(ScriptedTransport::new());
        let mut names: Vec<String> = weather
            .tool_router
            .list_all()
            .into_iter()
            .map(|tool| tool.name.to_string())
            .collect();
        names.sort();

        assert_eq!(
            names,
            vec![
                "get-alerts",
                "get-country-overview",
                "get-forecast",
                "get-historical-weather"
            ]
        );
    }

    #[tokio::test]
    async fn out_of_range_coordinates_never_reach_the_network() {
        let transport = Arc::new(ScriptedTransport::new());
        let client = RetryingClient::new(transport.clone(), RetryPolicy::default());
        let weather = Weather::with_tools(WeatherTools::new(
            client,
            "https://nws.test",
            CountryTable::default(),
        ));

        let result = weather
            .get_forecast(Parameters(GetForecastRequest {
                latitude: 123.0,
                longitude: 0.0,
            }))
            .await;

        assert!(result.is_err());
        assert!(transport.calls().is_empty());
    }

    #[tokio::test]
    async fn bad_state_code_is_rejected() {
        let weather = weather(ScriptedTransport::new());
        let result = weather
            .get_alerts(Parameters(GetAlertsRequest {
                state: "Texas".into(),
            }))
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn overview_is_returned_as_text() {
        let weather = weather(ScriptedTransport::new());
        let result = weather
            .get_country_overview(Parameters(GetCountryOverviewRequest {
                country: "Turkey".into(),
            }))
            .await;
        assert!(result.is_ok());
    }
}
