//! Virtual-time task scheduling.
//!
//! The engine never reads a wall clock. Deferred work (turning a
//! mismatched pair back over, advancing the elapsed-time counter) is
//! queued on a `Scheduler` and released when the host advances virtual
//! time. Tests drive time explicitly; an interactive host calls
//! `advance` from its frame or event loop with the real elapsed time.
//!
//! ## Example
//!
//! ```
//! use std::time::Duration;
//! use memory_match::schedule::{Scheduler, TaskKind};
//!
//! let mut scheduler = Scheduler::new();
//! let tick = scheduler
//!     .schedule_repeating(TaskKind::TimerTick, Duration::from_secs(1))
//!     .expect("interval is at least 1ms");
//! scheduler.schedule_once(TaskKind::FlipBack, Duration::from_millis(1500));
//!
//! let fired = scheduler.advance(Duration::from_secs(2));
//! let kinds: Vec<_> = fired.iter().map(|f| f.kind).collect();
//! assert_eq!(kinds, vec![TaskKind::TimerTick, TaskKind::FlipBack, TaskKind::TimerTick]);
//!
//! assert!(scheduler.is_pending(tick));
//! assert!(scheduler.cancel(tick));
//! assert_eq!(scheduler.pending_count(), 0);
//! ```

mod scheduler;

pub use scheduler::{FiredTask, Scheduler, MAX_FIRINGS_PER_ADVANCE};

use serde::{Deserialize, Serialize};

/// Unique identifier for a scheduled task.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TaskId(pub u64);

impl TaskId {
    /// Create a new task ID.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Task({})", self.0)
    }
}

/// What a scheduled task does when it fires.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskKind {
    /// Turn a mismatched pair face-down again.
    FlipBack,

    /// Advance the elapsed-time counter by one second.
    TimerTick,
}
