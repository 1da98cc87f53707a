//! Sink de log estructurado inyectado en cada etapa.
//!
//! Sustituye el estado global de logging: el engine es dueño del sink y lo
//! presta a cada etapa a través de `StageContext`. Un único escritor, sin
//! concurrencia. La implementación JSONL en disco vive en `ad-persistence`.

mod entry;

pub use entry::LogEntry;

pub trait LogSink {
    fn append(&mut self, entry: LogEntry);
}

/// Sink en memoria (tests y corridas sin disco).
#[derive(Debug, Default, Clone)]
pub struct InMemoryLogSink {
    pub entries: Vec<LogEntry>,
}

impl InMemoryLogSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Entradas de evento para un agente dado, en orden.
    pub fn events_for(&self, agent: &str) -> Vec<&str> {
        self.entries
            .iter()
            .filter_map(|e| match e {
                LogEntry::Event { agent: a, event, .. } if a == agent => Some(event.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl LogSink for InMemoryLogSink {
    fn append(&mut self, entry: LogEntry) {
        self.entries.push(entry);
    }
}
