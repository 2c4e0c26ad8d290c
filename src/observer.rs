//! Observers notified by [`SharedCounter::increment_observed`].
//!
//! An observer runs while the counter's lock is still held, so the order in
//! which observers see values is the order in which increments happened.
//! Keep `on_increment` short: every other thread waits on it.
//!
//! [`SharedCounter::increment_observed`]: crate::SharedCounter::increment_observed

use colored::Colorize;
use std::sync::{Mutex, PoisonError};

pub trait IncrementObserver: Sync {
    fn on_increment(&self, value: i64);
}

/// Prints `Count after increment = N` for every increment.
#[derive(Debug, Clone, Copy)]
pub struct ConsoleObserver {
    color: bool,
}

impl ConsoleObserver {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    pub fn format_line(&self, value: i64) -> String {
        if self.color {
            format!("Count after increment = {}", value.to_string().cyan())
        } else {
            format!("Count after increment = {}", value)
        }
    }
}

impl Default for ConsoleObserver {
    fn default() -> Self {
        Self::new(true)
    }
}

impl IncrementObserver for ConsoleObserver {
    fn on_increment(&self, value: i64) {
        println!("{}", self.format_line(value));
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SilentObserver;

impl IncrementObserver for SilentObserver {
    fn on_increment(&self, _value: i64) {}
}

/// Keeps every observed value, in observation order.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    seen: Mutex<Vec<i64>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn values(&self) -> Vec<i64> {
        self.seen
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn len(&self) -> usize {
        self.seen.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl IncrementObserver for RecordingObserver {
    fn on_increment(&self, value: i64) {
        self.seen
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(value);
    }
}
