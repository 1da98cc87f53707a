use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Una línea del log estructurado.
///
/// Se serializa como un objeto JSON plano:
/// `{timestamp, agent, event, details}` para transiciones y
/// `{timestamp, agent, step, message}` para pasos internos de una etapa.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum LogEntry {
    Event {
        timestamp: DateTime<Local>,
        agent: String,
        event: String,
        details: Value,
    },
    Step {
        timestamp: DateTime<Local>,
        agent: String,
        step: String,
        message: String,
    },
}

impl LogEntry {
    pub fn event(agent: impl Into<String>, event: impl Into<String>, details: Value) -> Self {
        LogEntry::Event { timestamp: Local::now(),
                          agent: agent.into(),
                          event: event.into(),
                          details }
    }

    pub fn step(agent: impl Into<String>, step: impl Into<String>, message: impl Into<String>) -> Self {
        LogEntry::Step { timestamp: Local::now(),
                         agent: agent.into(),
                         step: step.into(),
                         message: message.into() }
    }

    pub fn agent(&self) -> &str {
        match self {
            LogEntry::Event { agent, .. } | LogEntry::Step { agent, .. } => agent,
        }
    }
}
