//! Uniform response shape returned by every tool

use esap_records::{InputField, ValidationError};
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Error,
}

#[derive(Debug, Clone, Serialize)]
pub struct ToolOutput {
    pub status: Status,
    pub status_code: u16,
    /// True when the call was rejected for missing required fields
    pub required_fields_status: bool,
    pub required_fields: Vec<String>,
    pub input_fields: Vec<InputField>,
    pub data: Value,
}

#[derive(Debug, Clone, Serialize)]
pub struct Envelope {
    pub tool_name: String,
    pub tool_called: bool,
    pub assistant_response: String,
    pub tool_output: ToolOutput,
}

impl Envelope {
    fn new(
        tool_name: &str,
        status: Status,
        status_code: u16,
        message: impl Into<String>,
        data: Value,
    ) -> Self {
        Self {
            tool_name: tool_name.to_string(),
            tool_called: true,
            assistant_response: message.into(),
            tool_output: ToolOutput {
                status,
                status_code,
                required_fields_status: false,
                required_fields: Vec::new(),
                input_fields: Vec::new(),
                data,
            },
        }
    }

    pub fn success(tool_name: &str, status_code: u16, message: impl Into<String>, data: Value) -> Self {
        Self::new(tool_name, Status::Success, status_code, message, data)
    }

    pub fn error(tool_name: &str, status_code: u16, message: impl Into<String>, data: Value) -> Self {
        Self::new(tool_name, Status::Error, status_code, message, data)
    }

    /// 400 listing the required fields that were not supplied
    pub fn missing_fields(tool_name: &str, missing: Vec<String>, data: Value) -> Self {
        let message = format!("Missing required fields: {}", missing.join(", "));
        let mut envelope = Self::error(tool_name, 400, message, data);
        envelope.tool_output.required_fields_status = true;
        envelope.tool_output.required_fields = missing;
        envelope
    }

    /// 400 for input that failed validation. A malformed email is asked for
    /// again, like a missing field.
    pub fn invalid_input(tool_name: &str, error: &ValidationError, data: Value) -> Self {
        let mut envelope = Self::error(tool_name, 400, error.to_string(), data);
        if let ValidationError::InvalidEmail(field) = error {
            envelope.tool_output.required_fields_status = true;
            envelope.tool_output.required_fields = vec![field.clone()];
        }
        envelope
    }

    pub fn with_input_fields(mut self, input_fields: Vec<InputField>) -> Self {
        self.tool_output.input_fields = input_fields;
        self
    }

    pub fn is_success(&self) -> bool {
        self.tool_output.status == Status::Success
    }

    pub fn render(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
