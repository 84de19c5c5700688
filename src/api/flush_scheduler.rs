use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

/// Deferred unit of work queued by the collector.
pub type FlushTask = Box<dyn FnOnce()>;

/// Runs queued tasks after the current synchronous stretch of work and
/// before the host observes the chart again.
///
/// Implementations must not run a task from inside `schedule`.
pub trait FlushScheduler {
    fn schedule(&self, task: FlushTask);
}

/// FIFO microtask queue drained explicitly by the host.
///
/// The host calls `run_until_idle` once its synchronous render work is done.
/// Tasks queued while draining run in the same drain.
#[derive(Clone, Default)]
pub struct MicrotaskQueue {
    tasks: Rc<RefCell<VecDeque<FlushTask>>>,
}

impl MicrotaskQueue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn pending(&self) -> usize {
        self.tasks.borrow().len()
    }

    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.tasks.borrow().is_empty()
    }

    /// Runs queued tasks until none remain. Returns how many ran.
    pub fn run_until_idle(&self) -> usize {
        let mut ran = 0;
        loop {
            let Some(task) = self.tasks.borrow_mut().pop_front() else {
                break;
            };
            task();
            ran += 1;
        }
        ran
    }
}

impl FlushScheduler for MicrotaskQueue {
    fn schedule(&self, task: FlushTask) {
        self.tasks.borrow_mut().push_back(task);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn tasks_queued_while_draining_run_in_same_drain() {
        let queue = MicrotaskQueue::new();
        let hits = Rc::new(Cell::new(0));

        let inner_queue = queue.clone();
        let inner_hits = Rc::clone(&hits);
        queue.schedule(Box::new(move || {
            inner_hits.set(inner_hits.get() + 1);
            let nested_hits = Rc::clone(&inner_hits);
            inner_queue.schedule(Box::new(move || nested_hits.set(nested_hits.get() + 10)));
        }));

        assert_eq!(queue.pending(), 1);
        assert_eq!(queue.run_until_idle(), 2);
        assert_eq!(hits.get(), 11);
        assert!(queue.is_idle());
    }
}
