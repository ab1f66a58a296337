//! Two-step workflows: fetch data, then have the model write it up

use esap_config::AgentDefaults;
use esap_provider::{ChatRequest, Message, Provider, ProviderError};
use esap_records::{PageRequest, RecordClient, StoreError};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info};

use crate::weather::{WeatherClient, WeatherError};

#[derive(Error, Debug)]
pub enum WorkflowError {
    #[error(transparent)]
    Weather(#[from] WeatherError),

    #[error("fetch failed: {0}")]
    Store(#[from] StoreError),

    #[error("model call failed: {0}")]
    Provider(#[from] ProviderError),

    #[error("{0} data not found")]
    NoData(&'static str),

    #[error("model returned no text")]
    EmptyAnswer,

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, WorkflowError>;

const ACTIVITY_PLANNER: &str = r#"You are a local activities and travel expert who excels at weather-based planning.
Analyze the weather data and provide practical activity recommendations.

For each day in the forecast, structure your response exactly as follows:

📅 [Day, Month Date, Year]
═══════════════════════════

🌡️ WEATHER SUMMARY
• Conditions: [brief description]
• Temperature: [X°C/Y°F to A°C/B°F]
• Precipitation: [X% chance]

🌅 MORNING ACTIVITIES
Outdoor:
• [Activity Name] - [Brief description including specific location/route]
  Best timing: [specific time range]
  Note: [relevant weather consideration]

🌞 AFTERNOON ACTIVITIES
Outdoor:
• [Activity Name] - [Brief description including specific location/route]
  Best timing: [specific time range]
  Note: [relevant weather consideration]

🏠 INDOOR ALTERNATIVES
• [Activity Name] - [Brief description including specific venue]
  Ideal for: [weather condition that would trigger this alternative]

⚠️ SPECIAL CONSIDERATIONS
• [Any relevant weather warnings, UV index, wind conditions, etc.]

Guidelines:
- Suggest 2-3 time-specific outdoor activities per day
- Include 1-2 indoor backup options
- For precipitation >50%, lead with indoor activities
- All activities must be specific to the location
- Keep descriptions concise but informative"#;

const EMPLOYEE_SUMMARY: &str = r#"You are an HR analyst. Summarize the employee page you are given:
- how many employees are on this page and in total
- the departments and job positions represented
- managers and who reports to them, where known
- records with missing contact details (email or phone)
Keep it short and use bullet points."#;

const SUPPLIER_SUMMARY: &str = r#"You are a procurement analyst. Summarize the supplier page you are given:
- how many suppliers are on this page and in total
- the supplier categories and countries represented
- suppliers missing legal or bank information
- anything that needs follow-up, such as an inactive status
Keep it short and use bullet points."#;

/// What a workflow fetched and what the model made of it
#[derive(Debug, Clone, Serialize)]
pub struct WorkflowOutput {
    pub fetched: Value,
    pub text: String,
}

pub struct WorkflowRunner<P: Provider> {
    provider: P,
    model: String,
    max_tokens: u32,
    temperature: f32,
}

impl<P: Provider> WorkflowRunner<P> {
    pub fn new(provider: P, defaults: &AgentDefaults) -> Self {
        Self {
            provider,
            model: defaults.model.clone(),
            max_tokens: defaults.max_tokens,
            temperature: defaults.temperature,
        }
    }

    /// Daily forecast for `city`, then an activity plan
    pub async fn weather(&self, weather: &WeatherClient, city: &str) -> Result<WorkflowOutput> {
        let forecast = weather.daily_forecast(city).await?;
        let Some(first) = forecast.first() else {
            return Err(WorkflowError::NoData("forecast"));
        };
        info!("weather workflow: {} days for {}", forecast.len(), first.location);

        let prompt = format!(
            "Based on the following weather forecast for {}, suggest appropriate activities:\n{}",
            first.location,
            serde_json::to_string_pretty(&forecast)?
        );
        let fetched = serde_json::to_value(&forecast)?;
        let text = self.summarize(ACTIVITY_PLANNER, prompt).await?;
        Ok(WorkflowOutput { fetched, text })
    }

    pub async fn employees(&self, client: &RecordClient, page: PageRequest) -> Result<WorkflowOutput> {
        self.records(client, page, "employee", EMPLOYEE_SUMMARY).await
    }

    pub async fn suppliers(&self, client: &RecordClient, page: PageRequest) -> Result<WorkflowOutput> {
        self.records(client, page, "supplier", SUPPLIER_SUMMARY).await
    }

    async fn records(
        &self,
        client: &RecordClient,
        page: PageRequest,
        label: &'static str,
        instructions: &str,
    ) -> Result<WorkflowOutput> {
        let result = client.list(page).await?;
        if result.data.is_empty() {
            return Err(WorkflowError::NoData(label));
        }
        info!("{} workflow: {} of {} records", label, result.data.len(), result.count);

        let fetched = serde_json::to_value(&result)?;
        let prompt = format!(
            "Summarize the following {} information:\n{}",
            label,
            serde_json::to_string_pretty(&fetched)?
        );
        let text = self.summarize(instructions, prompt).await?;
        Ok(WorkflowOutput { fetched, text })
    }

    async fn summarize(&self, instructions: &str, prompt: String) -> Result<String> {
        debug!("summarize prompt: {} chars", prompt.len());
        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![Message::system(instructions), Message::user(prompt)],
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            ..Default::default()
        };

        let response = self.provider.chat(request).await?;
        response
            .content
            .filter(|text| !text.trim().is_empty())
            .ok_or(WorkflowError::EmptyAnswer)
    }
}
