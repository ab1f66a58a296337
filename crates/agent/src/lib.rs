//! Agent personas, tools and workflows over the ESAP services

use thiserror::Error;

pub mod loop_agent;
pub mod persona;
pub mod tools;
pub mod weather;
pub mod workflow;

pub use loop_agent::AgentLoop;
pub use persona::Persona;
pub use tools::{Backends, Envelope, ToolRegistry, ToolTrait};
pub use weather::{WeatherClient, WeatherError};
pub use workflow::{WorkflowError, WorkflowOutput, WorkflowRunner};

#[derive(Error, Debug)]
pub enum AgentError {
    #[error("tool not found: {0}")]
    ToolNotFound(String),

    #[error("tool failed: {0}")]
    ToolExecution(String),

    #[error("unknown agent '{0}' (expected hrms, scm or weather)")]
    UnknownPersona(String),

    #[error("provider error: {0}")]
    Provider(String),

    #[error("record service: {0}")]
    Store(#[from] esap_records::StoreError),

    #[error(transparent)]
    Weather(#[from] WeatherError),

    #[error("max tool iterations exceeded")]
    MaxIterations,
}

pub type Result<T> = std::result::Result<T, AgentError>;
