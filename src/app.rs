//! Preparación del entorno y ejecución de una corrida completa.

use std::fs;
use std::sync::Arc;

use ad_adapters::{build_pipeline, PipelineSettings};
use ad_core::{InMemoryEventStore, LogEntry, LogSink, PipelineEngine, RunOutcome};
use ad_llm::{GeminiClient, SimulatedGenerator, TextGenerator};
use ad_persistence::{FsArtifactStore, JsonlLogSink, PersistenceError};
use serde_json::json;

use crate::config::{AppConfig, Mode};
use crate::errors::AppError;

pub const LOG_FILE: &str = "system.log";

/// Archivos que una corrida completa deja en el directorio de reportes.
pub const OUTPUTS: [&str; 5] =
    ["data_summary.json", "insights.json", "evaluation_results.json", "creatives.json", "report.md"];

/// Elige el generador según el modo.
pub fn generator_for(config: &AppConfig) -> Result<Arc<dyn TextGenerator>, AppError> {
    match config.project.mode {
        Mode::Simulated => Ok(Arc::new(SimulatedGenerator::new())),
        Mode::Live => {
            let key = config.env
                            .google_api_key
                            .clone()
                            .ok_or(crate::errors::ConfigError::MissingSecret("GOOGLE_API_KEY"))?;
            Ok(Arc::new(GeminiClient::new(config.llm.model.clone(), key)?))
        }
    }
}

/// Ejecuta el pipeline completo con un generador dado.
///
/// Sólo los errores de preparación salen como `Err`; un fallo de etapa
/// termina la corrida y se devuelve como `RunOutcome::Aborted`.
pub fn run_with(config: &AppConfig, query: &str, generator: Arc<dyn TextGenerator>) -> Result<RunOutcome, AppError> {
    fs::create_dir_all(&config.paths.logs).map_err(|e| PersistenceError::io(&config.paths.logs, e))?;
    let store = FsArtifactStore::open(&config.paths.reports)?;
    let mut sink = JsonlLogSink::open(config.paths.logs.join(LOG_FILE))?;

    println!("Starting Agentic System");
    println!("Query: {query}");
    println!("Mode: {}", config.project.mode.as_str());
    println!("Using data: {}", config.paths.data.display());
    println!("Configuration and environment loaded successfully.");
    sink.append(LogEntry::event(ad_core::constants::SYSTEM_AGENT,
                                "initialized",
                                json!({"query": query, "mode": config.project.mode.as_str(), "generator": generator.name()})));
    log::info!("run starting with generator {}", generator.name());

    let settings = PipelineSettings::new(&config.paths.data, &config.paths.prompts, config.thresholds);
    let builder = PipelineEngine::builder(InMemoryEventStore::default(), store, sink);
    let mut engine = build_pipeline(builder, &settings, generator).build();
    let outcome = engine.run(query)?;

    match &outcome {
        RunOutcome::Completed { run_fingerprint, .. } => {
            println!("\nAgentic System Run Complete.");
            println!("Outputs generated:");
            for file in OUTPUTS {
                println!(" - {}", config.paths.reports.join(file).display());
            }
            println!("Run fingerprint: {run_fingerprint}");
        }
        RunOutcome::Aborted { stage_id, error, .. } => {
            println!("\nRun stopped at stage '{stage_id}': {error}");
            println!("Artifacts from earlier stages remain in {}.", config.paths.reports.display());
        }
    }
    Ok(outcome)
}

/// Corrida con el generador que indique la configuración.
pub fn run(config: &AppConfig, query: &str) -> Result<RunOutcome, AppError> {
    let generator = generator_for(config)?;
    run_with(config, query, generator)
}
