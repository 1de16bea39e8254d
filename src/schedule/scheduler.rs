//! Deterministic scheduler over a virtual millisecond clock.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::{TaskId, TaskKind};
use crate::core::{GameError, Result};

/// Most firings a single `advance` releases.
///
/// Past this many, repeating tasks skip their remaining missed firings
/// and re-arm after the deadline. At a one second interval that is over
/// 27 hours of catch-up.
pub const MAX_FIRINGS_PER_ADVANCE: usize = 100_000;

/// A queued task.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
struct ScheduledTask {
    id: TaskId,
    kind: TaskKind,
    /// Virtual time (ms) at which the task fires next.
    due: u64,
    /// Re-arm interval for repeating tasks.
    interval: Option<u64>,
}

/// A task released by the scheduler.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FiredTask {
    /// The task that fired.
    pub id: TaskId,

    /// What the task does.
    pub kind: TaskKind,

    /// Virtual time (ms) at which it fired.
    pub at: u64,
}

/// Virtual-time scheduler.
///
/// Tasks fire in order of due time; tasks due at the same instant fire
/// in the order they were scheduled. Repeating tasks are re-armed at
/// `due + interval`, so advancing past several intervals releases one
/// firing per interval. A repeating task whose next firing would fall
/// past the end of the clock is retired instead.
///
/// A game never has more than two tasks queued (one timer tick, one
/// flip-back), so the queue lives inline.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scheduler {
    /// Current virtual time in milliseconds.
    now: u64,

    /// Pending tasks, unordered.
    tasks: SmallVec<[ScheduledTask; 2]>,

    /// Next task ID.
    next_id: u64,
}

fn to_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

impl Scheduler {
    /// Create an empty scheduler at virtual time zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time in milliseconds.
    #[must_use]
    pub fn now(&self) -> u64 {
        self.now
    }

    /// Number of queued tasks.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.tasks.len()
    }

    /// Check if a task is still queued.
    #[must_use]
    pub fn is_pending(&self, id: TaskId) -> bool {
        self.find(id).is_some()
    }

    /// Kind of a queued task.
    #[must_use]
    pub fn kind_of(&self, id: TaskId) -> Option<TaskKind> {
        self.find(id).map(|t| t.kind)
    }

    /// Check if a queued task repeats.
    #[must_use]
    pub fn is_repeating(&self, id: TaskId) -> bool {
        self.find(id).is_some_and(|t| t.interval.is_some())
    }

    fn find(&self, id: TaskId) -> Option<&ScheduledTask> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Virtual time `elapsed` from now.
    #[must_use]
    pub fn deadline_after(&self, elapsed: Duration) -> u64 {
        self.now.saturating_add(to_millis(elapsed))
    }

    /// Queue a task that fires once after `delay`.
    pub fn schedule_once(&mut self, kind: TaskKind, delay: Duration) -> TaskId {
        self.push(kind, to_millis(delay), None)
    }

    /// Queue a task that fires every `interval`, first after one interval.
    ///
    /// Returns `None` without queuing anything if `interval` is under one
    /// millisecond.
    pub fn schedule_repeating(&mut self, kind: TaskKind, interval: Duration) -> Option<TaskId> {
        let interval = to_millis(interval);
        if interval == 0 {
            return None;
        }
        Some(self.push(kind, interval, Some(interval)))
    }

    fn push(&mut self, kind: TaskKind, delay: u64, interval: Option<u64>) -> TaskId {
        let id = TaskId::new(self.next_id);
        self.next_id += 1;
        self.tasks.push(ScheduledTask {
            id,
            kind,
            due: self.now.saturating_add(delay),
            interval,
        });
        id
    }

    /// Remove a queued task. Returns `true` if it was pending.
    pub fn cancel(&mut self, id: TaskId) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        self.tasks.len() != before
    }

    /// Remove every queued task.
    pub fn cancel_all(&mut self) {
        self.tasks.clear();
    }

    /// Release the earliest task due at or before `deadline`.
    ///
    /// The clock moves to the task's due time. Repeating tasks are
    /// re-armed before returning, or retired if the clock cannot reach
    /// their next firing. Returns `None` once nothing is due, leaving the
    /// clock where it is; call `advance_to` to finish.
    pub fn fire_next(&mut self, deadline: u64) -> Option<FiredTask> {
        let index = self
            .tasks
            .iter()
            .enumerate()
            .filter(|(_, t)| t.due <= deadline)
            .min_by_key(|(_, t)| (t.due, t.id))
            .map(|(i, _)| i)?;

        let task = self.tasks[index];
        match task.interval.and_then(|interval| task.due.checked_add(interval)) {
            Some(next) => self.tasks[index].due = next,
            None => {
                self.tasks.remove(index);
            }
        }
        self.now = self.now.max(task.due);

        Some(FiredTask {
            id: task.id,
            kind: task.kind,
            at: task.due,
        })
    }

    /// Re-arm every repeating task due at or before `deadline` to its
    /// first firing after it, without firing. Returns the number of
    /// firings skipped.
    ///
    /// One-shot tasks are left alone. A repeating task that cannot be
    /// re-armed before the end of the clock is retired.
    pub fn skip_missed(&mut self, deadline: u64) -> u64 {
        let mut skipped = 0u64;
        self.tasks.retain(|task| {
            let Some(interval) = task.interval else {
                return true;
            };
            if task.due > deadline {
                return true;
            }
            let missed = (deadline - task.due) / interval + 1;
            skipped = skipped.saturating_add(missed);
            match missed.checked_mul(interval).and_then(|gap| task.due.checked_add(gap)) {
                Some(next) => {
                    task.due = next;
                    true
                }
                None => false,
            }
        });
        skipped
    }

    /// Move the clock forward to `time` without firing anything.
    ///
    /// The clock never runs backwards; earlier times are ignored.
    pub fn advance_to(&mut self, time: u64) {
        self.now = self.now.max(time);
    }

    /// Advance the clock by `elapsed`, returning every firing in order.
    ///
    /// At most `MAX_FIRINGS_PER_ADVANCE` repeating firings are released;
    /// see `skip_missed`.
    pub fn advance(&mut self, elapsed: Duration) -> Vec<FiredTask> {
        let deadline = self.deadline_after(elapsed);
        let mut fired = Vec::new();
        while let Some(task) = self.fire_next(deadline) {
            fired.push(task);
            if fired.len() == MAX_FIRINGS_PER_ADVANCE {
                self.skip_missed(deadline);
            }
        }
        self.advance_to(deadline);
        fired
    }

    /// Check that the queue can only have been built through this API.
    pub(crate) fn validate(&self) -> Result<()> {
        for (i, task) in self.tasks.iter().enumerate() {
            if task.interval == Some(0) {
                return Err(GameError::corrupt(format!("{} repeats with a zero interval", task.id)));
            }
            if task.due < self.now {
                return Err(GameError::corrupt(format!("{} is due before the current time", task.id)));
            }
            if task.id.raw() >= self.next_id {
                return Err(GameError::corrupt(format!("{} was never allocated", task.id)));
            }
            if self.tasks[..i].iter().any(|t| t.id == task.id) {
                return Err(GameError::corrupt(format!("{} is queued twice", task.id)));
            }
        }
        Ok(())
    }
}
