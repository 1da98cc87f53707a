//! ad-persistence: adaptadores en disco para el store de artifacts y el
//! log estructurado.
pub mod error;
pub mod fs_store;
pub mod jsonl_sink;

pub use error::PersistenceError;
pub use fs_store::FsArtifactStore;
pub use jsonl_sink::JsonlLogSink;
