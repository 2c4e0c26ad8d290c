use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised around the counter: loading a run configuration and
/// driving worker threads. The counter itself never produces one.
#[derive(Error, Debug)]
pub enum CounterError {
    #[error("Failed to read config file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid value for '{field}': {reason}")]
    InvalidConfig { field: String, reason: String },

    #[error("Failed to spawn worker {worker}: {source}")]
    Spawn {
        worker: usize,
        #[source]
        source: io::Error,
    },

    #[error("Worker {worker} panicked before finishing its increments")]
    WorkerPanicked { worker: usize },

    #[error("{workers} workers x {increments} increments does not fit in the counter")]
    Overflow { workers: usize, increments: usize },
}

impl CounterError {
    pub fn invalid_config(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CounterError>;
