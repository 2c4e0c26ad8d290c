//! A mutex-protected integer counter shared by concurrently running threads,
//! plus a small driver that launches workers against it and joins them.
//!
//! ```
//! use shared_counter::{run, RunConfig, SharedCounter, SilentObserver};
//!
//! let counter = SharedCounter::new();
//! let report = run(&counter, &RunConfig::default(), &SilentObserver).unwrap();
//! assert_eq!(report.final_count, 10);
//! ```

pub mod config;
pub mod counter;
pub mod driver;
pub mod error;
pub mod observer;

pub use config::RunConfig;
pub use counter::SharedCounter;
pub use driver::{run, run_shared, RunReport};
pub use error::{CounterError, Result};
pub use observer::{ConsoleObserver, IncrementObserver, RecordingObserver, SilentObserver};
