use ad_llm::{recover, GenerationRequest, Recovery, ResponseProfile, SimulatedGenerator, TextGenerator};

#[test]
fn simulated_creatives_survive_strict_recovery() {
    let g = SimulatedGenerator::new();
    let text = g.generate(&GenerationRequest::new("ignored", ResponseProfile::Creatives))
                .expect("generate");
    match recover(&text) {
        Recovery::Strict(v) => {
            let recs = v["creative_recommendations"].as_array().expect("list");
            assert_eq!(recs.len(), 3);
            assert_eq!(recs[0]["recommendations"][0]["type"], "Ad Copy");
        }
        other => panic!("expected strict parse, got {other:?}"),
    }
}

#[test]
fn every_profile_yields_a_json_object() {
    let g = SimulatedGenerator::new();
    for profile in [ResponseProfile::Plan,
                    ResponseProfile::Hypotheses,
                    ResponseProfile::Evaluation,
                    ResponseProfile::Creatives,
                    ResponseProfile::Generic]
    {
        let text = g.generate(&GenerationRequest::new("prompt", profile)).expect("generate");
        assert!(recover(&text).value().is_some_and(|v| v.is_object()), "{profile:?}");
    }
}

#[test]
fn malformed_responses_without_braces_keep_raw_text() {
    for text in ["", "plain prose", "}{", "[1, 2, 3]"] {
        assert_eq!(recover(text), Recovery::Fallback { raw: text.to_string() });
    }
}
