//! get_weather: current conditions for a place

use std::sync::Arc;

use async_trait::async_trait;
use esap_records::InputField;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use super::envelope::Envelope;
use super::ToolTrait;
use crate::weather::{WeatherClient, WeatherError};

pub struct WeatherTool {
    client: Arc<WeatherClient>,
}

impl WeatherTool {
    pub fn new(client: Arc<WeatherClient>) -> Self {
        Self { client }
    }
}

#[derive(Deserialize)]
struct WeatherArgs {
    #[serde(default)]
    location: String,
}

#[async_trait]
impl ToolTrait for WeatherTool {
    fn name(&self) -> &str {
        "get_weather"
    }

    fn description(&self) -> &str {
        "Get current weather for a location: temperature, feels-like, humidity, wind and conditions."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "location": { "type": "string", "description": "City name, e.g. \"Riyadh\"" }
            },
            "required": ["location"]
        })
    }

    async fn execute(
        &self,
        args: Value,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        let args: WeatherArgs = serde_json::from_value(args)?;
        let location = args.location.trim();
        let fields = vec![InputField {
            name: "location".to_string(),
            required: true,
            description: "City name".to_string(),
            provided: !location.is_empty(),
        }];

        if location.is_empty() {
            return Ok(Envelope::missing_fields(
                self.name(),
                vec!["location".to_string()],
                json!({ "weather": null }),
            )
            .with_input_fields(fields)
            .render()?);
        }

        debug!("get_weather: {}", location);
        let envelope = match self.client.current(location).await {
            Ok(weather) => Envelope::success(
                self.name(),
                200,
                format!("Weather for {} fetched successfully", weather.location),
                json!({ "weather": weather }),
            ),
            Err(e @ WeatherError::LocationNotFound(_)) => {
                Envelope::error(self.name(), 404, e.to_string(), json!({ "weather": null }))
            }
            Err(e) => Envelope::error(
                self.name(),
                500,
                format!("Failed to fetch weather: {}", e),
                json!({ "weather": null }),
            ),
        };

        Ok(envelope.with_input_fields(fields).render()?)
    }
}
