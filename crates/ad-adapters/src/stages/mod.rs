//! Etapas del pipeline, en orden de ejecución.

pub mod creative;
pub mod evaluate;
pub mod insight;
pub mod planner;
pub mod report;
pub mod summarize;

pub use creative::CreativeStage;
pub use evaluate::EvaluationStage;
pub use insight::InsightStage;
pub use planner::{Planner, PlannerStage};
pub use report::ReportStage;
pub use summarize::SummarizeStage;
