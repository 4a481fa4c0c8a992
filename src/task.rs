//! Cooperative repeating tasks driven once per display refresh.
//!
//! A task runs every time the host polls it until its [`TaskHandle`] is
//! cancelled or dropped. Everything stays on the UI thread, so the shared
//! flag is a plain `Rc<Cell<bool>>`.

use std::cell::Cell;
use std::rc::Rc;

#[derive(Debug)]
pub struct RepeatingTask {
    name: &'static str,
    cancelled: Rc<Cell<bool>>,
    runs: u64,
}

/// Owning handle for a [`RepeatingTask`]. Disposing of it stops the task.
#[derive(Debug)]
pub struct TaskHandle {
    name: &'static str,
    cancelled: Rc<Cell<bool>>,
}

impl RepeatingTask {
    pub fn spawn(name: &'static str) -> (Self, TaskHandle) {
        let cancelled = Rc::new(Cell::new(false));
        let task = Self {
            name,
            cancelled: Rc::clone(&cancelled),
            runs: 0,
        };
        (task, TaskHandle { name, cancelled })
    }

    /// True when the task should run for this refresh; counts the run.
    pub fn poll(&mut self) -> bool {
        if self.cancelled.get() {
            return false;
        }
        self.runs += 1;
        true
    }

    pub fn runs(&self) -> u64 {
        self.runs
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl TaskHandle {
    pub fn cancel(self) {
        drop(self);
    }
}

impl Drop for TaskHandle {
    fn drop(&mut self) {
        if !self.cancelled.replace(true) {
            tracing::debug!(task = self.name, "repeating task cancelled");
        }
    }
}
