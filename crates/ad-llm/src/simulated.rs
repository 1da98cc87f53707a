//! Generador determinista para operar sin backend.
//!
//! El payload depende sólo del `ResponseProfile` de la petición.
use serde_json::{json, Value};

use crate::error::LlmError;
use crate::generator::{GenerationRequest, ResponseProfile, TextGenerator};

const EXCERPT_CHARS: usize = 150;

#[derive(Debug, Default, Clone)]
pub struct SimulatedGenerator;

impl SimulatedGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Payload canónico para un perfil.
    pub fn payload(request: &GenerationRequest) -> Value {
        match request.profile {
            ResponseProfile::Plan => plan_payload(),
            ResponseProfile::Hypotheses => hypotheses_payload(),
            ResponseProfile::Evaluation => json!({
                "validated_hypotheses": [],
                "note": "Simulated evaluator: deterministic baseline retained."
            }),
            ResponseProfile::Creatives => creatives_payload(),
            ResponseProfile::Generic => json!({
                "message": "Simulated generic LLM response",
                "prompt_excerpt": request.prompt.chars().take(EXCERPT_CHARS).collect::<String>(),
            }),
        }
    }
}

fn plan_payload() -> Value {
    json!({
        "objective": "Diagnose ROAS and CTR performance drivers",
        "subtasks": [
            {"agent": "Data Agent", "action": "Analyze data trends"},
            {"agent": "Insight Agent", "action": "Generate hypotheses"},
            {"agent": "Evaluator Agent", "action": "Validate hypotheses"},
            {"agent": "Creative Agent", "action": "Generate new creatives"}
        ]
    })
}

fn hypotheses_payload() -> Value {
    json!({
        "hypotheses": [
            {
                "id": "H1",
                "title": "Ad Fatigue reducing CTR and conversions",
                "evidence": "ROAS declining with consistent spend and impressions; CTR also low for multiple campaigns.",
                "confidence": 0.82
            },
            {
                "id": "H2",
                "title": "Increased competition in ad auctions",
                "evidence": "ROAS decline despite steady CTR may suggest higher CPMs or auction pressure.",
                "confidence": 0.67
            },
            {
                "id": "H3",
                "title": "Audience targeting misalignment",
                "evidence": "CTR low across multiple demographic segments; possible mismatch with creative messaging.",
                "confidence": 0.74
            }
        ]
    })
}

fn creatives_payload() -> Value {
    json!({
        "creative_recommendations": [
            {
                "creative_id": "CR-101",
                "campaign_name": "Simulated Campaign",
                "identified_issue": "Low engagement rate",
                "recommendations": [
                    {
                        "type": "Ad Copy",
                        "headline": "Comfort that lasts all day",
                        "primary_text": "Use emotional storytelling around everyday comfort.",
                        "cta": "Shop Now",
                        "rationale": "Stronger hooks lift CTR on fatigued audiences."
                    },
                    {
                        "type": "Visual Concept",
                        "theme": "Lifestyle imagery",
                        "description": "Real people in daily routines instead of product-only shots.",
                        "rationale": "Lifestyle visuals improve thumb-stop rate."
                    }
                ]
            },
            {
                "creative_id": "CR-102",
                "campaign_name": "Simulated Campaign",
                "identified_issue": "High CPM with low CTR",
                "recommendations": [
                    {
                        "type": "Visual Concept",
                        "theme": "Simplified layout",
                        "description": "One product, one message, CTA placed above the fold.",
                        "rationale": "Cluttered visuals dilute the call to action."
                    }
                ]
            },
            {
                "creative_id": "CR-103",
                "campaign_name": "Simulated Campaign",
                "identified_issue": "Ad fatigue detected",
                "recommendations": [
                    {
                        "type": "Targeting",
                        "suggestion": "Exclude recent purchasers and refresh lookalike seeds.",
                        "rationale": "Reaching new users reduces frequency-driven fatigue."
                    }
                ]
            }
        ]
    })
}

impl TextGenerator for SimulatedGenerator {
    fn name(&self) -> &str {
        "simulated"
    }

    fn generate(&self, request: &GenerationRequest) -> Result<String, LlmError> {
        log::debug!("simulated generation for {:?}", request.profile);
        serde_json::to_string_pretty(&Self::payload(request)).map_err(|e| LlmError::Decode(e.to_string()))
    }
}
