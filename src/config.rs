//! Configuración de la aplicación.
//!
//! YAML (`config/config.yaml`, o la ruta de `ADFLOW_CONFIG`) más secretos
//! tomados del entorno. `.env` se carga una única vez. Sólo lectura tras
//! la carga.
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use ad_domain::Thresholds;
use dotenvy::dotenv;
use once_cell::sync::Lazy;
use serde::Deserialize;

use crate::errors::ConfigError;

pub const DEFAULT_CONFIG_PATH: &str = "config/config.yaml";
pub const CONFIG_PATH_VAR: &str = "ADFLOW_CONFIG";

// Carga perezosa del archivo .env una sola vez.
static DOTENV_LOADED: Lazy<()> = Lazy::new(|| {
    let _ = dotenv(); // ignora error si no existe .env
});

/// Forzar carga temprana de .env.
pub fn init_dotenv() {
    Lazy::force(&DOTENV_LOADED);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Generador determinista sin red.
    Simulated,
    /// Backend Gemini; exige `GOOGLE_API_KEY`.
    Live,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Simulated => "simulated",
            Mode::Live => "live",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProjectConfig {
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default = "default_mode")]
    pub mode: Mode,
}

fn default_name() -> String {
    "adflow".to_string()
}
fn default_mode() -> Mode {
    Mode::Simulated
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self { name: default_name(),
               mode: default_mode() }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PathsConfig {
    pub data: PathBuf,
    #[serde(default = "default_reports")]
    pub reports: PathBuf,
    #[serde(default = "default_logs")]
    pub logs: PathBuf,
    #[serde(default = "default_prompts")]
    pub prompts: PathBuf,
}

fn default_reports() -> PathBuf {
    PathBuf::from("reports")
}
fn default_logs() -> PathBuf {
    PathBuf::from("logs")
}
fn default_prompts() -> PathBuf {
    PathBuf::from("prompts")
}

#[derive(Debug, Clone, Deserialize)]
pub struct LlmConfig {
    #[serde(default = "default_model")]
    pub model: String,
}

fn default_model() -> String {
    "gemini-1.5-flash".to_string()
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self { model: default_model() }
    }
}

/// Secretos inyectados desde el entorno; nunca se leen del YAML.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnvSecrets {
    pub google_api_key: Option<String>,
    pub langfuse_public_key: Option<String>,
    pub langfuse_secret_key: Option<String>,
}

impl EnvSecrets {
    pub fn from_env() -> Self {
        init_dotenv();
        let var = |name: &str| env::var(name).ok().filter(|v| !v.trim().is_empty());
        Self { google_api_key: var("GOOGLE_API_KEY"),
               langfuse_public_key: var("LANGFUSE_PUBLIC_KEY"),
               langfuse_secret_key: var("LANGFUSE_SECRET_KEY") }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub project: ProjectConfig,
    pub paths: PathsConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub thresholds: Thresholds,
    #[serde(skip)]
    pub env: EnvSecrets,
}

impl AppConfig {
    /// Parsea YAML y valida; los secretos se pasan explícitamente.
    pub fn from_yaml(text: &str, env: EnvSecrets) -> Result<Self, ConfigError> {
        let mut config: AppConfig = serde_yaml::from_str(text)?;
        config.env = env;
        config.validate()?;
        Ok(config)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read { path: path.to_path_buf(),
                                                                                 source })?;
        Self::from_yaml(&text, EnvSecrets::from_env())
    }

    /// Ruta de `ADFLOW_CONFIG` o `config/config.yaml`.
    pub fn load() -> Result<Self, ConfigError> {
        init_dotenv();
        let path = env::var(CONFIG_PATH_VAR).map(PathBuf::from)
                                            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH));
        Self::load_from(&path)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let t = &self.thresholds;
        if !(t.low_ctr.is_finite() && t.low_roas.is_finite() && t.roas_drop_pct.is_finite()) {
            return Err(ConfigError::Invalid("thresholds must be finite numbers".into()));
        }
        if self.project.mode == Mode::Live && self.env.google_api_key.is_none() {
            return Err(ConfigError::MissingSecret("GOOGLE_API_KEY"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const YAML: &str = "
project:
  name: adflow
  mode: simulated
paths:
  data: data/sample_ads.csv
llm:
  model: gemini-1.5-pro
thresholds:
  low_ctr: 0.8
";

    #[test]
    fn yaml_with_partial_thresholds_uses_defaults() {
        let cfg = AppConfig::from_yaml(YAML, EnvSecrets::default()).expect("config");
        assert_eq!(cfg.project.mode, Mode::Simulated);
        assert_eq!(cfg.paths.data, PathBuf::from("data/sample_ads.csv"));
        assert_eq!(cfg.paths.reports, PathBuf::from("reports"));
        assert_eq!(cfg.llm.model, "gemini-1.5-pro");
        assert_eq!(cfg.thresholds.low_ctr, 0.8);
        assert_eq!(cfg.thresholds.low_roas, 1.5);
        assert_eq!(cfg.thresholds.roas_drop_pct, 20.0);
    }

    #[test]
    fn live_mode_requires_api_key() {
        let yaml = YAML.replace("mode: simulated", "mode: live");
        let err = AppConfig::from_yaml(&yaml, EnvSecrets::default()).unwrap_err();
        assert!(matches!(err, ConfigError::MissingSecret("GOOGLE_API_KEY")));

        let env = EnvSecrets { google_api_key: Some("k".into()),
                               ..EnvSecrets::default() };
        assert_eq!(AppConfig::from_yaml(&yaml, env).expect("config").project.mode, Mode::Live);
    }

    #[test]
    fn missing_paths_section_is_rejected() {
        let err = AppConfig::from_yaml("project:\n  mode: simulated\n", EnvSecrets::default()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn unknown_mode_is_rejected() {
        let yaml = YAML.replace("mode: simulated", "mode: turbo");
        assert!(AppConfig::from_yaml(&yaml, EnvSecrets::default()).is_err());
    }
}
