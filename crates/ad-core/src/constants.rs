//! Constantes del motor core.
//!
//! `ENGINE_VERSION` participa en el cálculo del fingerprint de la corrida:
//! un cambio de versión invalida los fingerprints previos aunque los
//! artifacts no cambien.

/// Versión lógica del motor de etapas.
pub const ENGINE_VERSION: &str = "S1.0";

/// Agente usado en las entradas de log emitidas por el propio motor.
pub const SYSTEM_AGENT: &str = "System";
