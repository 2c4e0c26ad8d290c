use crate::observer::IncrementObserver;
use std::fmt;
use std::sync::{Mutex, MutexGuard};

/// An integer counter that any number of threads can bump concurrently.
///
/// The value lives inside the mutex, so the only way to reach it is through
/// a lock guard. Every operation takes the lock, does its read-modify-write
/// and drops the guard before returning; the guard is also dropped when a
/// critical section unwinds.
///
/// Share it by reference inside [`std::thread::scope`] or wrap it in an
/// `Arc`. Either way the compiler rejects a worker that could outlive it.
pub struct SharedCounter {
    value: Mutex<i64>,
}

impl SharedCounter {
    pub fn new() -> Self {
        Self {
            value: Mutex::new(0),
        }
    }

    /// Adds one and returns the new value.
    ///
    /// No two calls on the same counter ever return the same value.
    pub fn increment(&self) -> i64 {
        let mut guard = self.lock();
        *guard += 1;
        *guard
    }

    /// Like [`increment`](Self::increment), but hands the new value to
    /// `observer` before the lock is released. Observers therefore see values
    /// in exactly the order the increments were applied.
    pub fn increment_observed(&self, observer: &dyn IncrementObserver) -> i64 {
        let mut guard = self.lock();
        *guard += 1;
        observer.on_increment(*guard);
        *guard
    }

    pub fn read(&self) -> i64 {
        *self.lock()
    }

    /// Consumes the counter. Owning it proves no other thread can still
    /// touch it, so no lock is taken.
    pub fn into_inner(self) -> i64 {
        match self.value.into_inner() {
            Ok(value) => value,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    // A panic while holding the guard cannot leave the value half-written:
    // the critical sections are a single add-and-store. Recover instead of
    // propagating the poison.
    fn lock(&self) -> MutexGuard<'_, i64> {
        match self.value.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                log::warn!("counter mutex was poisoned, recovering");
                self.value.clear_poison();
                poisoned.into_inner()
            }
        }
    }
}

impl Default for SharedCounter {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SharedCounter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedCounter")
            .field("value", &self.read())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observer::RecordingObserver;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_new_counter_reads_zero() {
        let counter = SharedCounter::new();
        assert_eq!(counter.read(), 0);
        assert_eq!(SharedCounter::default().read(), 0);
    }

    #[test]
    fn test_single_increment() {
        let counter = SharedCounter::new();
        assert_eq!(counter.increment(), 1);
        assert_eq!(counter.read(), 1);
    }

    #[test]
    fn test_increment_returns_consecutive_values() {
        let counter = SharedCounter::new();
        let returned: Vec<i64> = (0..5).map(|_| counter.increment()).collect();
        assert_eq!(returned, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_increment_observed_reports_new_value() {
        let counter = SharedCounter::new();
        let observer = RecordingObserver::new();
        counter.increment();
        assert_eq!(counter.increment_observed(&observer), 2);
        assert_eq!(observer.values(), vec![2]);
    }

    #[test]
    fn test_two_scoped_workers_reach_ten() {
        let counter = SharedCounter::new();
        thread::scope(|s| {
            for _ in 0..2 {
                s.spawn(|| {
                    for _ in 0..5 {
                        counter.increment();
                    }
                });
            }
        });
        assert_eq!(counter.read(), 10);
        assert_eq!(counter.into_inner(), 10);
    }

    #[test]
    fn test_debug_shows_value() {
        let counter = SharedCounter::new();
        counter.increment();
        assert_eq!(format!("{:?}", counter), "SharedCounter { value: 1 }");
    }

    #[test]
    fn test_recovers_from_poisoned_lock() {
        let counter = Arc::new(SharedCounter::new());
        counter.increment();

        let poisoner = Arc::clone(&counter);
        let result = thread::spawn(move || {
            let _guard = poisoner.value.lock().unwrap();
            panic!("panic while holding the counter lock");
        })
        .join();
        assert!(result.is_err());
        assert!(counter.value.is_poisoned());

        assert_eq!(counter.increment(), 2);
        assert!(!counter.value.is_poisoned());
        assert_eq!(counter.read(), 2);
    }
}
