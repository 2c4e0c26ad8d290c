use crate::error::{CounterError, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

pub const MAX_WORKERS: usize = 1024;
pub const MAX_INCREMENTS_PER_WORKER: usize = 10_000_000;

pub const WORKERS_ENV: &str = "COUNTER_WORKERS";
pub const INCREMENTS_ENV: &str = "COUNTER_INCREMENTS";

/// How many workers to launch and how often each of them increments.
///
/// Every field is optional in TOML; missing ones fall back to the
/// two-workers-five-increments run.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunConfig {
    pub workers: usize,
    pub increments_per_worker: usize,
    /// Print every increment as it happens.
    pub echo: bool,
    pub color: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            workers: 2,
            increments_per_worker: 5,
            echo: true,
            color: true,
        }
    }
}

impl RunConfig {
    pub fn new(workers: usize, increments_per_worker: usize) -> Self {
        Self {
            workers,
            increments_per_worker,
            ..Self::default()
        }
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: RunConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| CounterError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Applies `COUNTER_WORKERS` / `COUNTER_INCREMENTS` from the process
    /// environment.
    pub fn with_env_overrides(self) -> Result<Self> {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    pub fn with_overrides_from<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup(WORKERS_ENV) {
            self.workers = parse_count(WORKERS_ENV, &raw)?;
        }
        if let Some(raw) = lookup(INCREMENTS_ENV) {
            self.increments_per_worker = parse_count(INCREMENTS_ENV, &raw)?;
        }
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<()> {
        if self.workers > MAX_WORKERS {
            return Err(CounterError::invalid_config(
                "workers",
                format!("{} exceeds the maximum of {}", self.workers, MAX_WORKERS),
            ));
        }
        if self.increments_per_worker > MAX_INCREMENTS_PER_WORKER {
            return Err(CounterError::invalid_config(
                "increments_per_worker",
                format!(
                    "{} exceeds the maximum of {}",
                    self.increments_per_worker, MAX_INCREMENTS_PER_WORKER
                ),
            ));
        }
        Ok(())
    }

    /// Total number of increments a run performs, if it fits in the counter.
    pub fn expected_total(&self) -> Result<i64> {
        self.workers
            .checked_mul(self.increments_per_worker)
            .and_then(|total| i64::try_from(total).ok())
            .ok_or(CounterError::Overflow {
                workers: self.workers,
                increments: self.increments_per_worker,
            })
    }
}

fn parse_count(field: &str, raw: &str) -> Result<usize> {
    raw.trim().parse::<usize>().map_err(|err| {
        CounterError::invalid_config(field, format!("'{}' is not a count: {}", raw, err))
    })
}
