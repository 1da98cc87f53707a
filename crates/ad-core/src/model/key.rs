//! Clave bien conocida de un artifact dentro del store.
//!
//! La clave es el nombre de archivo relativo al directorio de reportes
//! (`data_summary.json`, `report.md`, ...). El formato se deriva de la
//! extensión.
use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::ArtifactKind;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArtifactKey(Cow<'static, str>);

impl ArtifactKey {
    /// Clave estática, usable en constantes.
    pub const fn fixed(file_name: &'static str) -> Self {
        Self(Cow::Borrowed(file_name))
    }

    pub fn new(file_name: impl Into<String>) -> Self {
        Self(Cow::Owned(file_name.into()))
    }

    pub fn file_name(&self) -> &str {
        &self.0
    }

    pub fn kind(&self) -> ArtifactKind {
        if self.0.ends_with(".md") {
            ArtifactKind::Markdown
        } else {
            ArtifactKind::Json
        }
    }
}

impl fmt::Display for ArtifactKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_follows_extension() {
        assert_eq!(ArtifactKey::fixed("report.md").kind(), ArtifactKind::Markdown);
        assert_eq!(ArtifactKey::new("insights.json").kind(), ArtifactKind::Json);
        assert_eq!(ArtifactKey::fixed("a.json"), ArtifactKey::new("a.json"));
    }
}
