//! Cancellable scheduled tasks owned by a carousel.
//!
//! The widget never touches a wall clock. Its host advances a virtual
//! millisecond clock, and the queue hands back tasks in deadline order.
//! Repeating tasks are re-armed relative to their own deadline, so a host
//! that advances in large steps still sees every tick.

/// Handle for a scheduled task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId(u64);

/// What a scheduled task does when it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    /// Advance to the next slide
    Autoplay,
    /// Reopen the transition gate after an animated slide change
    ClearAnimation,
}

#[derive(Debug, Clone)]
struct Scheduled {
    id: TaskId,
    task: Task,
    due: u64,
    interval: Option<u64>,
}

/// Deadline-ordered task queue on a virtual clock.
#[derive(Debug, Default)]
pub struct TimerQueue {
    now: u64,
    next_id: u64,
    tasks: Vec<Scheduled>,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time in milliseconds.
    pub fn now(&self) -> u64 {
        self.now
    }

    /// Run `task` once, `delay` ms from now.
    pub fn schedule_once(&mut self, delay: u64, task: Task) -> TaskId {
        self.push(delay, task, None)
    }

    /// Run `task` every `interval` ms, starting `interval` ms from now.
    ///
    /// A zero interval is treated as 1 ms so the queue always makes progress.
    pub fn schedule_repeating(&mut self, interval: u64, task: Task) -> TaskId {
        let interval = interval.max(1);
        self.push(interval, task, Some(interval))
    }

    fn push(&mut self, delay: u64, task: Task, interval: Option<u64>) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id += 1;
        self.tasks.push(Scheduled {
            id,
            task,
            due: self.now.saturating_add(delay),
            interval,
        });
        id
    }

    /// Cancel a task. Returns false if it already fired or was cancelled.
    pub fn cancel(&mut self, id: TaskId) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        self.tasks.len() != before
    }

    /// Cancel everything.
    pub fn cancel_all(&mut self) {
        self.tasks.clear();
    }

    pub fn is_scheduled(&self, id: TaskId) -> bool {
        self.tasks.iter().any(|t| t.id == id)
    }

    /// Number of pending tasks of a kind.
    pub fn count(&self, task: Task) -> usize {
        self.tasks.iter().filter(|t| t.task == task).count()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Earliest pending deadline.
    pub fn next_deadline(&self) -> Option<u64> {
        self.tasks.iter().map(|t| t.due).min()
    }

    /// Take the earliest task due at or before `until`.
    ///
    /// The clock moves to that task's deadline. Ties fire in scheduling
    /// order. Repeating tasks are re-armed before being returned.
    pub fn pop_due(&mut self, until: u64) -> Option<(TaskId, Task)> {
        let position = self
            .tasks
            .iter()
            .enumerate()
            .filter(|(_, t)| t.due <= until)
            .min_by_key(|(_, t)| (t.due, t.id.0))
            .map(|(i, _)| i)?;

        let due = self.tasks[position].due;
        self.now = self.now.max(due);

        let scheduled = &mut self.tasks[position];
        let fired = (scheduled.id, scheduled.task);
        match scheduled.interval {
            Some(interval) => scheduled.due = due.saturating_add(interval),
            None => {
                self.tasks.remove(position);
            }
        }
        Some(fired)
    }

    /// Move the clock forward without firing anything.
    pub fn advance_to(&mut self, time: u64) {
        self.now = self.now.max(time);
    }
}
