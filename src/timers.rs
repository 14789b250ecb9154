//! Deferred tasks on the match clock
//!
//! Every task remembers the epoch it was scheduled in. Bumping the epoch
//! (level reset, restart, new game) cancels everything still pending, so a
//! timer from an old state can never fire into a new one.

#[derive(Debug, Clone)]
struct ScheduledTask<T> {
    due: f64,
    id: u64,
    epoch: u64,
    task: T,
}

#[derive(Debug, Clone)]
pub struct Scheduler<T> {
    /// Seconds since the scheduler was created
    now: f64,
    epoch: u64,
    next_id: u64,
    tasks: Vec<ScheduledTask<T>>,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Self {
            now: 0.0,
            epoch: 0,
            next_id: 0,
            tasks: Vec::new(),
        }
    }

    pub fn now(&self) -> f64 {
        self.now
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Run `task` once `delay_secs` have elapsed (negative delays fire on the
    /// next pop)
    pub fn schedule(&mut self, delay_secs: f32, task: T) {
        let id = self.next_id;
        self.next_id += 1;
        self.tasks.push(ScheduledTask {
            due: self.now + delay_secs.max(0.0) as f64,
            id,
            epoch: self.epoch,
            task,
        });
    }

    /// Move the clock forward without popping anything
    pub fn advance_clock(&mut self, dt: f32) {
        self.now += dt.max(0.0) as f64;
    }

    /// Earliest due task of the current epoch, ties in scheduling order.
    /// Call repeatedly: handling a task may schedule or cancel others.
    pub fn pop_due(&mut self) -> Option<T> {
        let epoch = self.epoch;
        self.tasks.retain(|t| t.epoch == epoch);

        let index = self
            .tasks
            .iter()
            .enumerate()
            .filter(|(_, t)| t.due <= self.now)
            .min_by(|(_, a), (_, b)| a.due.total_cmp(&b.due).then(a.id.cmp(&b.id)))
            .map(|(i, _)| i)?;
        Some(self.tasks.swap_remove(index).task)
    }

    /// Advance and collect every task that came due, in order
    pub fn advance(&mut self, dt: f32) -> Vec<T> {
        self.advance_clock(dt);
        let mut due = Vec::new();
        while let Some(task) = self.pop_due() {
            due.push(task);
        }
        due
    }

    /// Start a new epoch; all pending tasks are dropped
    pub fn bump_epoch(&mut self) -> u64 {
        self.epoch += 1;
        self.tasks.clear();
        self.epoch
    }

    /// Drop all pending tasks without changing epoch
    pub fn clear(&mut self) {
        self.tasks.clear();
    }

    pub fn pending(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}
