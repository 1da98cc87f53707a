//! ad-adapters: capa de adaptación Dominio ↔ Core.
//!
//! Este crate provee:
//! - Artifacts tipados (uno por archivo de `reports/`).
//! - Las seis etapas del pipeline como `TypedStage`.
//! - El compilador del reporte Markdown.
//! - El ensamblado del pipeline estándar.

pub mod artifacts;
pub mod pipeline;
pub mod prompts;
pub mod report;
pub mod stages;

pub use pipeline::{build_pipeline, standard_stages, PipelineSettings};
pub use report::{compile, compile_dir};
