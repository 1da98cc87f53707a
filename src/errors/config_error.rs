use std::path::PathBuf;

use thiserror::Error;

/// Errores de carga de configuración (fatales antes de cualquier etapa).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config YAML: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
    #[error("{0} is required in live mode")]
    MissingSecret(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_secret_names_the_variable() {
        let err = ConfigError::MissingSecret("GOOGLE_API_KEY");
        assert_eq!(err.to_string(), "GOOGLE_API_KEY is required in live mode");
    }

    #[test]
    fn read_error_includes_path() {
        let err = ConfigError::Read { path: PathBuf::from("config/config.yaml"),
                                      source: std::io::Error::other("no such file") };
        assert_eq!(err.to_string(), "cannot read config config/config.yaml: no such file");
    }
}
