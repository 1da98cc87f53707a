//! Modelos neutrales (Artifact, ArtifactKey, ArtifactSpec, ArtifactStore).

pub mod artifact;
pub mod key;
pub mod store;
pub mod typed_artifact;

pub use artifact::{Artifact, ArtifactKind};
pub use key::ArtifactKey;
pub use store::{ArtifactStore, InMemoryArtifactStore};
pub use typed_artifact::{ArtifactDecodeError, ArtifactSpec};
