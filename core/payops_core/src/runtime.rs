//! # Runtime seams
//!
//! The store never reads the wall clock, sleeps, or rolls dice on its own.
//! Those three effects come in through the traits below so that the lifecycle
//! can be driven deterministically:
//!
//! | Trait            | Production            | Tests (`testutils`)   |
//! |------------------|-----------------------|-----------------------|
//! | [`Clock`]        | [`SystemClock`]       | [`ManualScheduler`]   |
//! | [`Scheduler`]    | [`TokioScheduler`]    | [`ManualScheduler`]   |
//! | [`RandomSource`] | [`StdRandom`]         | [`ScriptedRandom`]    |

use std::ops::Range;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::runtime::Handle;

/// A deferred, fire-once callback.
pub type Task = Box<dyn FnOnce() + Send + 'static>;

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Runs a task once after a delay. There is no cancellation; callers that
/// need to discard stale work must check for it when the task fires.
pub trait Scheduler: Send + Sync {
    fn schedule(&self, delay: Duration, task: Task);
}

/// Uniform randomness in `[0, 1)`.
pub trait RandomSource: Send {
    fn next_unit(&mut self) -> f64;

    /// Bernoulli trial that succeeds with probability `p`.
    fn chance(&mut self, p: f64) -> bool {
        self.next_unit() < p
    }

    /// Integer drawn uniformly from `range` (end exclusive).
    fn pick_u64(&mut self, range: Range<u64>) -> u64 {
        let span = range.end.saturating_sub(range.start);
        if span == 0 {
            return range.start;
        }
        let offset = (self.next_unit() * span as f64) as u64;
        range.start + offset.min(span - 1)
    }

    /// Float drawn uniformly from `range` (end exclusive).
    fn pick_f64(&mut self, range: Range<f64>) -> f64 {
        range.start + self.next_unit() * (range.end - range.start)
    }

    fn pick_index(&mut self, len: usize) -> usize {
        self.pick_u64(0..len as u64) as usize
    }
}

pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

pub(crate) fn to_chrono(delay: Duration) -> chrono::Duration {
    chrono::Duration::milliseconds(delay.as_millis().min(i64::MAX as u128) as i64)
}

// ── Production implementations ───────────────────────────────────────

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Spawns one sleeping task per scheduled callback on a Tokio runtime.
#[derive(Debug, Clone)]
pub struct TokioScheduler {
    handle: Handle,
}

impl TokioScheduler {
    pub fn new(handle: Handle) -> Self {
        Self { handle }
    }
}

impl Scheduler for TokioScheduler {
    fn schedule(&self, delay: Duration, task: Task) {
        self.handle.spawn(async move {
            tokio::time::sleep(delay).await;
            task();
        });
    }
}

pub struct StdRandom {
    rng: StdRng,
}

impl StdRandom {
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl RandomSource for StdRandom {
    fn next_unit(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }
}

// ── Deterministic implementations ────────────────────────────────────

#[cfg(any(test, feature = "testutils"))]
pub use self::manual::{ManualScheduler, ScriptedRandom};

#[cfg(any(test, feature = "testutils"))]
mod manual {
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::time::Duration;

    use chrono::{DateTime, TimeZone, Utc};

    use super::{lock, to_chrono, Clock, RandomSource, Scheduler, Task};

    struct Queued {
        due: DateTime<Utc>,
        seq: u64,
        task: Task,
    }

    struct ManualState {
        now: DateTime<Utc>,
        next_seq: u64,
        queue: Vec<Queued>,
    }

    /// Virtual clock and timer queue. Time only moves when [`advance`] is
    /// called; due tasks run in `(due, submission order)` order, with the
    /// clock set to each task's due instant while it runs.
    ///
    /// [`advance`]: ManualScheduler::advance
    pub struct ManualScheduler {
        state: Mutex<ManualState>,
    }

    impl ManualScheduler {
        pub fn new(start: DateTime<Utc>) -> Self {
            Self {
                state: Mutex::new(ManualState {
                    now: start,
                    next_seq: 0,
                    queue: Vec::new(),
                }),
            }
        }

        /// Starts at 2025-01-01T00:00:00Z.
        pub fn at_epoch() -> Self {
            Self::new(Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap())
        }

        pub fn pending(&self) -> usize {
            lock(&self.state).queue.len()
        }

        pub fn advance(&self, by: Duration) {
            let target = lock(&self.state).now + to_chrono(by);
            while let Some(task) = self.pop_due(Some(target)) {
                task();
            }
            let mut state = lock(&self.state);
            if state.now < target {
                state.now = target;
            }
        }

        /// Runs every queued task, including ones scheduled while draining.
        pub fn run_until_idle(&self) {
            while let Some(task) = self.pop_due(None) {
                task();
            }
        }

        fn pop_due(&self, limit: Option<DateTime<Utc>>) -> Option<Task> {
            let mut state = lock(&self.state);
            let index = state
                .queue
                .iter()
                .enumerate()
                .filter(|(_, q)| limit.map_or(true, |l| q.due <= l))
                .min_by_key(|(_, q)| (q.due, q.seq))
                .map(|(i, _)| i)?;
            let queued = state.queue.swap_remove(index);
            if queued.due > state.now {
                state.now = queued.due;
            }
            Some(queued.task)
        }
    }

    impl Clock for ManualScheduler {
        fn now(&self) -> DateTime<Utc> {
            lock(&self.state).now
        }
    }

    impl Scheduler for ManualScheduler {
        fn schedule(&self, delay: Duration, task: Task) {
            let mut state = lock(&self.state);
            let due = state.now + to_chrono(delay);
            let seq = state.next_seq;
            state.next_seq += 1;
            state.queue.push(Queued { due, seq, task });
        }
    }

    /// Replays a fixed list of samples; yields `0.0` once exhausted.
    #[derive(Debug, Default)]
    pub struct ScriptedRandom {
        samples: VecDeque<f64>,
    }

    impl ScriptedRandom {
        pub fn new(samples: impl IntoIterator<Item = f64>) -> Self {
            Self {
                samples: samples.into_iter().collect(),
            }
        }
    }

    impl RandomSource for ScriptedRandom {
        fn next_unit(&mut self) -> f64 {
            self.samples.pop_front().unwrap_or(0.0)
        }
    }
}
