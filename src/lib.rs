//! adflow
//!
//! Aplicación que ejecuta el pipeline de diagnóstico de anuncios:
//! - `config`: YAML + secretos del entorno.
//! - `app`: preparación de directorios y ejecución de la corrida.
//! - `errors`: errores de preparación que llegan al proceso.

pub mod app;
pub mod config;
pub mod errors;

pub use app::{run, run_with};
pub use config::AppConfig;
pub use errors::{AppError, ConfigError};

/// Une los argumentos posicionales en una única consulta.
pub fn query_from_args<I: IntoIterator<Item = String>>(args: I) -> Result<String, AppError> {
    let query = args.into_iter().collect::<Vec<_>>().join(" ");
    if query.trim().is_empty() {
        return Err(AppError::Usage);
    }
    Ok(query)
}
