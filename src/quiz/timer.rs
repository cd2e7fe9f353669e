//! Virtual-clock task scheduler
//!
//! Holds the countdown and feedback-hold timers of a session as explicit,
//! cancellable tasks. Time only moves when the owner advances it, so a
//! frame loop, a test or a headless demo can all drive it.

/// Identifies a scheduled task for cancellation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskHandle(u32);

#[derive(Debug, Clone)]
struct Task<T> {
    handle: TaskHandle,
    payload: T,
    due_ms: u64,
    /// Re-arm interval for repeating tasks
    period_ms: Option<u64>,
}

/// Millisecond scheduler of one-shot and repeating tasks
#[derive(Debug, Clone)]
pub struct Scheduler<T> {
    now_ms: u64,
    tasks: Vec<Task<T>>,
    next_id: u32,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self {
            now_ms: 0,
            tasks: Vec::new(),
            next_id: 1,
        }
    }
}

impl<T: Clone> Scheduler<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    fn next_handle(&mut self) -> TaskHandle {
        let handle = TaskHandle(self.next_id);
        self.next_id += 1;
        handle
    }

    /// Fire `payload` once, `delay_ms` from now
    pub fn schedule_once(&mut self, payload: T, delay_ms: u64) -> TaskHandle {
        let handle = self.next_handle();
        self.tasks.push(Task {
            handle,
            payload,
            due_ms: self.now_ms + delay_ms,
            period_ms: None,
        });
        handle
    }

    /// Fire `payload` every `period_ms`, first time one period from now
    pub fn schedule_repeating(&mut self, payload: T, period_ms: u64) -> TaskHandle {
        let period_ms = period_ms.max(1);
        let handle = self.next_handle();
        self.tasks.push(Task {
            handle,
            payload,
            due_ms: self.now_ms + period_ms,
            period_ms: Some(period_ms),
        });
        handle
    }

    /// Remove a task; returns `false` if it already fired or was cancelled
    pub fn cancel(&mut self, handle: TaskHandle) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.handle != handle);
        self.tasks.len() != before
    }

    pub fn cancel_all(&mut self) {
        self.tasks.clear();
    }

    pub fn is_pending(&self, handle: TaskHandle) -> bool {
        self.tasks.iter().any(|t| t.handle == handle)
    }

    pub fn pending_count(&self) -> usize {
        self.tasks.len()
    }

    /// Take the earliest task due at or before `until_ms`
    ///
    /// Ties fire in scheduling order. The clock moves to the task's due time;
    /// repeating tasks are re-armed one period later.
    pub fn pop_due(&mut self, until_ms: u64) -> Option<(TaskHandle, T)> {
        let index = self
            .tasks
            .iter()
            .enumerate()
            .filter(|(_, t)| t.due_ms <= until_ms)
            .min_by_key(|(_, t)| (t.due_ms, t.handle.0))
            .map(|(i, _)| i)?;

        let due_ms = self.tasks[index].due_ms;
        self.now_ms = self.now_ms.max(due_ms);

        match self.tasks[index].period_ms {
            Some(period) => {
                let task = &mut self.tasks[index];
                task.due_ms += period;
                Some((task.handle, task.payload.clone()))
            }
            None => {
                let task = self.tasks.swap_remove(index);
                Some((task.handle, task.payload))
            }
        }
    }

    /// Move the clock to `until_ms` once every due task has been popped
    pub fn settle(&mut self, until_ms: u64) {
        self.now_ms = self.now_ms.max(until_ms);
    }
}
