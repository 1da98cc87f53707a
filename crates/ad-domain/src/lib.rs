// ad-domain library entry point
pub mod creative;
pub mod error;
pub mod hypothesis;
pub mod lenient;
pub mod plan;
pub mod record;
pub mod recommendation;
pub mod stats;
pub mod summary;

pub use creative::{find_underperformers, CreativeFinding, IssueClass};
pub use error::{DatasetError, SummaryError};
pub use hypothesis::{EvaluationResults, Hypothesis, HypothesisSet, ValidatedHypothesis};
pub use plan::{Plan, Subtask};
pub use record::{load_dataset, AdRecord, Dataset};
pub use recommendation::{recommendations_from_value, CreativeRecommendation, CreativeRecommendationSet, Recommendation};
pub use stats::{describe, ColumnStats};
pub use summary::{summarize, DataSummary, LowCtrSummary, RoasTrend, Thresholds, TrendDirection};
