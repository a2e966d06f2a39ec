//! One-shot mutations from any thread.
//!
//! The widget tree is only touched on the loop thread. Other threads hand
//! it closures through a [`UiHandle`]; each runs exactly once, in enqueue
//! order, before the next frame's layout.

use std::collections::VecDeque;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

use nenki_engine::platform::Waker;

use crate::app::UiCx;

pub(crate) type Task = Box<dyn FnOnce(&mut UiCx<'_>) + Send>;

struct Shared {
    tasks: Mutex<VecDeque<Task>>,
    waker: Mutex<Waker>,
}

/// Cloneable, `Send` entry point into a running UI.
#[derive(Clone)]
pub struct UiHandle {
    shared: Arc<Shared>,
}

/// Locks `m`, recovering the data if a panicking thread poisoned it.
fn lock<'a, T>(m: &'a Mutex<T>, what: &str) -> MutexGuard<'a, T> {
    m.lock().unwrap_or_else(|poisoned| {
        log::warn!("{what} lock poisoned; recovering");
        poisoned.into_inner()
    })
}

impl UiHandle {
    pub(crate) fn new() -> Self {
        Self {
            shared: Arc::new(Shared { tasks: Mutex::new(VecDeque::new()), waker: Mutex::new(Waker::noop()) }),
        }
    }

    /// Runs `f` on the loop thread before the next layout and wakes the
    /// platform. A task queued while a frame is being built runs in the
    /// frame after.
    pub fn run_once(&self, f: impl FnOnce(&mut UiCx<'_>) + Send + 'static) {
        lock(&self.shared.tasks, "mutation queue").push_back(Box::new(f));
        let waker = lock(&self.shared.waker, "waker").clone();
        waker.wake();
    }

    /// Tasks waiting for the next frame.
    pub fn pending(&self) -> usize {
        lock(&self.shared.tasks, "mutation queue").len()
    }

    pub(crate) fn set_waker(&self, waker: Waker) {
        *lock(&self.shared.waker, "waker") = waker;
    }

    /// Everything queued so far; later tasks wait for the next call.
    pub(crate) fn take_snapshot(&self) -> VecDeque<Task> {
        std::mem::take(&mut *lock(&self.shared.tasks, "mutation queue"))
    }
}

impl fmt::Debug for UiHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UiHandle").field("pending", &self.pending()).finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[test]
    fn snapshot_leaves_later_tasks_queued() {
        let h = UiHandle::new();
        h.run_once(|_| {});
        let snapshot = h.take_snapshot();
        h.run_once(|_| {});
        assert_eq!(snapshot.len(), 1);
        assert_eq!(h.pending(), 1);
    }

    #[test]
    fn enqueue_wakes_the_platform() {
        let h = UiHandle::new();
        let wakes = Arc::new(AtomicUsize::new(0));
        let w = Arc::clone(&wakes);
        h.set_waker(Waker::new(move || {
            w.fetch_add(1, Ordering::SeqCst);
        }));

        let remote = h.clone();
        std::thread::spawn(move || remote.run_once(|_| {})).join().ok();

        assert_eq!(wakes.load(Ordering::SeqCst), 1);
        assert_eq!(h.pending(), 1);
    }

    #[test]
    fn poisoned_queue_still_accepts_tasks() {
        let h = UiHandle::new();
        let remote = h.clone();
        let _ = std::thread::spawn(move || {
            let _guard = remote.shared.tasks.lock();
            panic!("poison the queue");
        })
        .join();

        h.run_once(|_| {});
        assert_eq!(h.pending(), 1);
    }
}
