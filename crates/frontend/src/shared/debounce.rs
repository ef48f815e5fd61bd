//! Trailing-edge debounce, independent of any timer API.
//!
//! `Debounced<T>` only tracks values and deadlines. Whoever owns it decides
//! how time passes: the Leptos binding arms a timer through a [`Scheduler`]
//! and calls [`Debounced::flush`] when it fires, tests drive it with a
//! [`ManualClock`] and a [`ManualScheduler`].

use gloo_timers::callback::Timeout;

/// Millisecond time source
pub trait Clock {
    fn now_ms(&self) -> u64;
}

/// `Date.now()` of the browser
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserClock;

impl Clock for BrowserClock {
    fn now_ms(&self) -> u64 {
        js_sys::Date::now() as u64
    }
}

/// One-shot timers. Dropping the returned handle cancels the timer.
pub trait Scheduler {
    type Handle: 'static;

    fn schedule(&self, delay_ms: u64, task: Box<dyn FnOnce()>) -> Self::Handle;
}

/// `setTimeout` of the browser
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserScheduler;

impl Scheduler for BrowserScheduler {
    type Handle = Timeout;

    fn schedule(&self, delay_ms: u64, task: Box<dyn FnOnce()>) -> Timeout {
        let millis = u32::try_from(delay_ms).unwrap_or(u32::MAX);
        Timeout::new(millis, task)
    }
}

#[cfg(test)]
pub use manual::{ManualClock, ManualScheduler, ManualTimer};

#[cfg(test)]
mod manual {
    use super::{Clock, Scheduler};
    use std::cell::{Cell, RefCell};
    use std::rc::{Rc, Weak};

    /// Clock that only moves when told to. Clones share the same time.
    #[derive(Debug, Clone, Default)]
    pub struct ManualClock(Rc<Cell<u64>>);

    impl ManualClock {
        pub fn advance(&self, ms: u64) {
            self.0.set(self.0.get() + ms);
        }
    }

    impl Clock for ManualClock {
        fn now_ms(&self) -> u64 {
            self.0.get()
        }
    }

    type Task = Rc<RefCell<Option<Box<dyn FnOnce()>>>>;

    /// Timers that fire only on [`ManualScheduler::run_pending`]
    #[derive(Clone, Default)]
    pub struct ManualScheduler {
        tasks: Rc<RefCell<Vec<Weak<RefCell<Option<Box<dyn FnOnce()>>>>>>>,
    }

    /// Handle of a [`ManualScheduler`] timer; dropping it cancels the timer
    pub struct ManualTimer(Task);

    impl Drop for ManualTimer {
        fn drop(&mut self) {
            self.0.borrow_mut().take();
        }
    }

    impl ManualScheduler {
        /// Timers armed and neither fired nor cancelled
        pub fn pending(&self) -> usize {
            self.tasks
                .borrow()
                .iter()
                .filter_map(Weak::upgrade)
                .filter(|task| task.borrow().is_some())
                .count()
        }

        /// Fires every pending timer, in the order they were armed
        pub fn run_pending(&self) -> usize {
            let tasks: Vec<_> = self.tasks.borrow_mut().drain(..).collect();
            let mut fired = 0;
            for task in tasks.iter().filter_map(Weak::upgrade) {
                let callback = task.borrow_mut().take();
                if let Some(callback) = callback {
                    callback();
                    fired += 1;
                }
            }
            fired
        }
    }

    impl Scheduler for ManualScheduler {
        type Handle = ManualTimer;

        fn schedule(&self, _delay_ms: u64, task: Box<dyn FnOnce()>) -> ManualTimer {
            let task: Task = Rc::new(RefCell::new(Some(task)));
            self.tasks.borrow_mut().push(Rc::downgrade(&task));
            ManualTimer(task)
        }
    }
}

#[derive(Debug, Clone)]
struct Pending<T> {
    value: T,
    deadline: u64,
}

/// Value that follows its source only after the source has been quiet for
/// `delay_ms`.
#[derive(Debug, Clone)]
pub struct Debounced<T> {
    value: T,
    pending: Option<Pending<T>>,
    delay_ms: u64,
}

impl<T> Debounced<T> {
    pub fn new(value: T, delay_ms: u64) -> Self {
        Self {
            value,
            pending: None,
            delay_ms,
        }
    }

    /// Settled value
    pub fn get(&self) -> &T {
        &self.value
    }

    pub fn delay_ms(&self) -> u64 {
        self.delay_ms
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn deadline(&self) -> Option<u64> {
        self.pending.as_ref().map(|p| p.deadline)
    }

    /// Replaces any pending value and restarts the delay from `now_ms`
    pub fn push(&mut self, value: T, now_ms: u64) {
        self.pending = Some(Pending {
            value,
            deadline: now_ms.saturating_add(self.delay_ms),
        });
    }

    /// Settles the pending value once its deadline has passed.
    /// Returns `true` when a pending value was settled.
    pub fn poll(&mut self, now_ms: u64) -> bool {
        match self.deadline() {
            Some(deadline) if now_ms >= deadline => self.flush(),
            _ => false,
        }
    }

    /// Settles the pending value regardless of the deadline
    pub fn flush(&mut self) -> bool {
        match self.pending.take() {
            Some(pending) => {
                self.value = pending.value;
                true
            }
            None => false,
        }
    }

    /// Drops the pending value; the settled value stays as it was
    pub fn cancel(&mut self) -> Option<T> {
        self.pending.take().map(|p| p.value)
    }
}
