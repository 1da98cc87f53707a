//! Plantillas de prompt y armado de prompts por etapa.
use std::fs;
use std::path::Path;

use ad_domain::{CreativeFinding, DataSummary, HypothesisSet};
use serde_json::Value;

pub const PLANNER_TEMPLATE: &str = "planner_prompt.md";
pub const CREATIVE_TEMPLATE: &str = "creative_prompt.md";

/// Lee una plantilla. El error lleva la ruta para el mensaje.
pub fn load_template(path: &Path) -> Result<String, String> {
    fs::read_to_string(path).map_err(|e| format!("Prompt file not found: {} ({e})", path.display()))
}

fn pretty(value: &impl serde::Serialize) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
}

pub fn planner_prompt(template: &str, query: &str) -> String {
    format!("{template}\n\nUser Query: {query}\n")
}

pub fn insight_prompt(summary: &DataSummary) -> String {
    format!("You are the Insight Agent of an ad performance analysis system.\n\
             Using the dataset summary below, propose hypotheses that explain changes in ROAS and CTR.\n\n\
             Data summary:\n{}\n\n\
             Respond only with JSON of the form:\n\
             {{\"hypotheses\": [{{\"id\": \"H1\", \"title\": \"...\", \"evidence\": \"...\", \"confidence\": 0.0}}]}}\n\
             Confidence must be a number between 0 and 1.\n",
            pretty(summary))
}

pub fn evaluation_prompt(hypotheses: &HypothesisSet, summary: Option<&DataSummary>) -> String {
    let summary = summary.map(|s| pretty(s)).unwrap_or_else(|| "unavailable".to_string());
    format!("You are the Evaluator Agent of an ad performance analysis system.\n\
             Validate each hypothesis against the data summary.\n\n\
             Hypotheses:\n{}\n\n\
             Data summary:\n{}\n\n\
             Respond only with JSON of the form:\n\
             {{\"validated_hypotheses\": [{{\"id\": \"H1\", \"reasoning\": \"...\", \"validated_confidence\": 0.0}}]}}\n",
            pretty(hypotheses),
            summary)
}

pub fn creative_prompt(findings: &[CreativeFinding], insights: &Value, template: &str) -> String {
    format!("You are a senior Facebook Ads creative strategist.\n\n\
             Underperforming creatives:\n{}\n\n\
             Context (insights from earlier analysis):\n{}\n\n\
             Now, based on this information, propose 3 new creative ideas for each weak area.\n\
             Use the following format:\n{template}",
            pretty(&findings),
            pretty(insights))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn planner_prompt_appends_query() {
        assert_eq!(planner_prompt("T", "Analyze ROAS drop"), "T\n\nUser Query: Analyze ROAS drop\n");
    }

    #[test]
    fn missing_template_reports_path() {
        let err = load_template(Path::new("/nope/planner_prompt.md")).expect_err("missing");
        assert!(err.contains("/nope/planner_prompt.md"));
    }
}
