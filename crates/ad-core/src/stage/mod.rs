//! Definiciones relacionadas a etapas (stages).
//!
//! Una etapa es una unidad del pipeline con un único artifact de salida. Este
//! módulo define:
//! - `StageDefinition`: interfaz neutral usada por el engine.
//! - `TypedStage`: interfaz de alto nivel con output fuertemente tipado.
//! - `StageContext`: lo que el engine presta a la etapa durante `run`.
//! - `StageRunResult` y `StageStatus`.

mod context;
pub mod definition;
mod run_result;
mod status;
pub mod typed;

pub use context::StageContext;
pub use definition::StageDefinition;
pub use run_result::StageRunResult;
pub use status::StageStatus;
pub use typed::{StageRunResultTyped, TypedStage};
