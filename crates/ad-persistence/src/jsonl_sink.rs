//! Sink de log JSONL: una entrada por línea, sólo append.
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use ad_core::{LogEntry, LogSink};

use crate::error::PersistenceError;

#[derive(Debug, Clone)]
pub struct JsonlLogSink {
    path: PathBuf,
}

impl JsonlLogSink {
    /// Crea el directorio padre si falta. El archivo se abre en cada append.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, PersistenceError> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| PersistenceError::io(parent, e))?;
        }
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn try_append(&self, entry: &LogEntry) -> Result<(), PersistenceError> {
        let mut line = serde_json::to_string(entry)?;
        line.push('\n');
        let mut file = OpenOptions::new().create(true)
                                         .append(true)
                                         .open(&self.path)
                                         .map_err(|e| PersistenceError::io(&self.path, e))?;
        file.write_all(line.as_bytes()).map_err(|e| PersistenceError::io(&self.path, e))
    }
}

impl LogSink for JsonlLogSink {
    fn append(&mut self, entry: LogEntry) {
        if let Err(e) = self.try_append(&entry) {
            log::warn!("log entry dropped: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    #[test]
    fn appends_one_json_object_per_line() {
        let dir = tempfile::tempdir().expect("tmp");
        let mut sink = JsonlLogSink::open(dir.path().join("logs/system.log")).expect("open");
        sink.append(LogEntry::event("System", "initialized", json!({"query": "q"})));
        sink.append(LogEntry::step("CreativeAgent", "load", "Loading ad performance data."));
        let text = fs::read_to_string(sink.path()).expect("read");
        let lines: Vec<Value> = text.lines().map(|l| serde_json::from_str(l).expect("line")).collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["event"], "initialized");
        assert_eq!(lines[1]["step"], "load");
        assert_eq!(lines[1]["message"], "Loading ad performance data.");
    }
}
