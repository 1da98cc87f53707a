//! PlannerStage
//!
//! - Descompone la consulta en subtareas con una única llamada de generación.
//! - Nunca falla: plantilla ausente, error de generación o JSON inválido
//!   devuelven `{objective: query, subtasks: []}`.

use std::path::PathBuf;
use std::sync::Arc;

use ad_core::{StageContext, StageRunResultTyped, TypedStage};
use ad_domain::Plan;
use ad_llm::{parse_strict_as, GenerationRequest, ResponseProfile, TextGenerator};

use crate::artifacts::PlanArtifact;
use crate::prompts::{load_template, planner_prompt};

pub struct Planner {
    generator: Arc<dyn TextGenerator>,
    template_path: PathBuf,
}

impl Planner {
    pub fn new(generator: Arc<dyn TextGenerator>, template_path: impl Into<PathBuf>) -> Self {
        Self { generator,
               template_path: template_path.into() }
    }

    /// Intenta generar el plan; el error describe el primer fallo.
    pub fn try_plan(&self, query: &str) -> Result<Plan, String> {
        let template = load_template(&self.template_path)?;
        let request = GenerationRequest::new(planner_prompt(&template, query), ResponseProfile::Plan);
        let text = self.generator
                       .generate(&request)
                       .map_err(|e| format!("Model call failed: {e}"))?;
        let mut plan: Plan = parse_strict_as(text.trim()).map_err(|e| format!("Failed to parse plan: {e}"))?;
        if plan.objective.trim().is_empty() {
            plan.objective = query.to_string();
        }
        Ok(plan)
    }

    pub fn plan(&self, query: &str) -> Plan {
        self.try_plan(query).unwrap_or_else(|reason| {
                                log::warn!("planner fallback: {reason}");
                                Plan::fallback(query)
                            })
    }
}

pub struct PlannerStage {
    planner: Planner,
}

impl PlannerStage {
    pub fn new(generator: Arc<dyn TextGenerator>, template_path: impl Into<PathBuf>) -> Self {
        Self { planner: Planner::new(generator, template_path) }
    }
}

impl TypedStage for PlannerStage {
    type Output = PlanArtifact;

    fn id(&self) -> &'static str {
        "plan"
    }

    fn agent(&self) -> &'static str {
        "PlannerAgent"
    }

    fn description(&self) -> &'static str {
        "Decomposing query into subtasks..."
    }

    fn run_typed(&self, ctx: &mut StageContext<'_>) -> StageRunResultTyped<PlanArtifact> {
        let query = ctx.query.to_string();
        let plan = match self.planner.try_plan(&query) {
            Ok(plan) => {
                ctx.log_step("plan", "Task breakdown generated successfully:");
                for line in plan.breakdown() {
                    println!("   {line}");
                }
                plan
            }
            Err(reason) => {
                ctx.log_step("plan", reason);
                Plan::fallback(&query)
            }
        };
        StageRunResultTyped::Success { output: PlanArtifact(plan) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ad_llm::ScriptedGenerator;
    use std::io::Write;

    fn template() -> tempfile::NamedTempFile {
        let mut f = tempfile::NamedTempFile::new().expect("tmp");
        write!(f, "Return a JSON plan.").expect("write");
        f
    }

    #[test]
    fn missing_template_returns_fallback_without_calling_model() {
        let gen = Arc::new(ScriptedGenerator::new().reply("{\"objective\": \"x\"}"));
        let planner = Planner::new(gen.clone(), "/no/such/planner_prompt.md");
        assert_eq!(planner.plan("Analyze ROAS drop"), Plan::fallback("Analyze ROAS drop"));
        assert_eq!(gen.call_count(), 0);
    }

    #[test]
    fn prose_wrapped_plan_is_extracted() {
        let f = template();
        let reply = "Here is the plan:\n{\"objective\": \"Find ROAS drivers\", \"subtasks\": [{\"agent\": \"Data Agent\", \"action\": \"Summarize\"}]}\nThanks";
        let gen = Arc::new(ScriptedGenerator::new().reply(reply));
        let plan = Planner::new(gen.clone(), f.path()).plan("q");
        assert_eq!(plan.objective, "Find ROAS drivers");
        assert_eq!(plan.subtasks.len(), 1);
        assert!(gen.calls()[0].prompt.ends_with("\n\nUser Query: q\n"));
        assert_eq!(gen.calls()[0].profile, ResponseProfile::Plan);
    }

    #[test]
    fn generation_or_parse_failure_falls_back() {
        let f = template();
        let failing = Arc::new(ScriptedGenerator::new().fail("quota"));
        assert_eq!(Planner::new(failing, f.path()).plan("q"), Plan::fallback("q"));
        let garbage = Arc::new(ScriptedGenerator::new().reply("{not json}"));
        assert_eq!(Planner::new(garbage, f.path()).plan("q"), Plan::fallback("q"));
    }

    #[test]
    fn empty_objective_takes_the_query() {
        let f = template();
        let gen = Arc::new(ScriptedGenerator::new().reply("{\"subtasks\": []}"));
        assert_eq!(Planner::new(gen, f.path()).plan("Why is CTR low?").objective, "Why is CTR low?");
    }
}
