use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subtask {
    #[serde(default = "unknown_agent")]
    pub agent: String,
    #[serde(default = "no_action")]
    pub action: String,
}

fn unknown_agent() -> String {
    "Unknown Agent".to_string()
}
fn no_action() -> String {
    "No action specified".to_string()
}

/// Descomposición de la consulta en subtareas.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Plan {
    #[serde(default)]
    pub objective: String,
    #[serde(default)]
    pub subtasks: Vec<Subtask>,
}

impl Plan {
    /// Plan seguro: la consulta como objetivo y sin subtareas.
    pub fn fallback(query: &str) -> Self {
        Self { objective: query.to_string(),
               subtasks: Vec::new() }
    }

    /// Una línea por subtarea: `1. agent → action`.
    pub fn breakdown(&self) -> Vec<String> {
        self.subtasks
            .iter()
            .enumerate()
            .map(|(i, s)| format!("{}. {} → {}", i + 1, s.agent, s.action))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_get_named_defaults() {
        let plan: Plan = serde_json::from_str(r#"{"subtasks":[{"agent":"Data Agent"},{}]}"#).expect("parse");
        assert_eq!(plan.objective, "");
        assert_eq!(plan.subtasks[0].action, "No action specified");
        assert_eq!(plan.subtasks[1].agent, "Unknown Agent");
        assert_eq!(plan.breakdown()[0], "1. Data Agent → No action specified");
    }
}
