//! ad-llm: capacidad de generación de texto y parsing tolerante de sus
//! respuestas.
pub mod error;
pub mod gemini;
pub mod generator;
pub mod parsing;
#[cfg(any(test, feature = "testing"))]
pub mod scripted;
pub mod simulated;

pub use error::{LlmError, ParseError};
pub use gemini::GeminiClient;
pub use generator::{GenerationRequest, ResponseProfile, TextGenerator};
pub use parsing::{extract_json_object, normalize, parse_strict, parse_strict_as, recover, Recovery};
#[cfg(any(test, feature = "testing"))]
pub use scripted::ScriptedGenerator;
pub use simulated::SimulatedGenerator;
