//! Spawn/await primitive over background workers with cancellation.
//!
//! Each spawned task runs its closure on a dedicated thread and
//! publishes the result over a single-use channel. Cancellation is
//! best-effort cooperative: tripping the token never interrupts the
//! worker, it only shortens waits in code that checks it, namely the
//! waiting side of [`Task::wait`] and builtins that consult
//! [`current_token`].

use std::cell::RefCell;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use tracing::debug;

const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Cancellation flag shared between a task handle and its worker.
#[derive(Debug, Default)]
pub struct CancelToken {
    cancelled: AtomicBool,
}

impl CancelToken {
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Sleep in slices so cancellation can cut the nap short.
    /// Returns false when the sleep was interrupted.
    pub fn sleep(&self, duration: Duration) -> bool {
        let mut remaining = duration;
        while remaining > Duration::ZERO {
            if self.is_cancelled() {
                return false;
            }
            let nap = remaining.min(POLL_INTERVAL);
            thread::sleep(nap);
            remaining -= nap;
        }
        !self.is_cancelled()
    }
}

thread_local! {
    static CURRENT_TOKEN: RefCell<Option<Arc<CancelToken>>> = RefCell::new(None);
}

/// The cancel token of the task running on this thread, if any.
pub fn current_token() -> Option<Arc<CancelToken>> {
    CURRENT_TOKEN.with(|slot| slot.borrow().clone())
}

/// The task was cancelled before a result was observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cancelled;

enum TaskState<T> {
    Pending(Receiver<T>),
    Done(T),
    Cancelled,
}

/// Handle onto a spawned evaluation.
///
/// The first resolution (value or cancellation) is stored on the
/// handle, and every later [`Task::wait`] call answers from the store.
pub struct Task<T> {
    state: Mutex<TaskState<T>>,
    token: Arc<CancelToken>,
}

/// Run `f` on a background worker and hand back the task handle.
///
/// The worker installs its cancel token in a thread-local so
/// cooperative callees (notably the `sleep` builtin) can observe
/// cancellation mid-call.
pub fn spawn<T, F>(f: F) -> Arc<Task<T>>
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    let token = Arc::new(CancelToken::default());
    let worker_token = Arc::clone(&token);
    let (sender, receiver) = mpsc::channel();
    debug!("spawning task worker");
    thread::spawn(move || {
        CURRENT_TOKEN.with(|slot| *slot.borrow_mut() = Some(worker_token));
        let value = f();
        // the handle may already be gone; nothing to do then
        let _ = sender.send(value);
    });
    Arc::new(Task {
        state: Mutex::new(TaskState::Pending(receiver)),
        token,
    })
}

impl<T: Clone> Task<T> {
    /// Block until the task resolves or its cancellation is observed.
    ///
    /// A tripped token wins over a value the worker may have published
    /// in the meantime, so both sides of that race resolve the same
    /// way: through [`Cancelled`].
    pub fn wait(&self) -> Result<T, Cancelled> {
        let mut state = self.state.lock().expect("task lock poisoned");
        loop {
            if matches!(&*state, TaskState::Pending(_)) && self.token.is_cancelled() {
                debug!("task cancelled while awaited");
                *state = TaskState::Cancelled;
                return Err(Cancelled);
            }
            let received = match &*state {
                TaskState::Done(value) => return Ok(value.clone()),
                TaskState::Cancelled => return Err(Cancelled),
                TaskState::Pending(receiver) => receiver.recv_timeout(POLL_INTERVAL),
            };
            match received {
                Ok(value) => {
                    *state = TaskState::Done(value.clone());
                    return Ok(value);
                }
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => {
                    // worker died without publishing a result
                    debug!("task worker disappeared");
                    *state = TaskState::Cancelled;
                    return Err(Cancelled);
                }
            }
        }
    }
}

impl<T> Task<T> {
    /// Trip the cancel token. Best-effort: takes effect when either a
    /// waiter or a cooperative builtin next looks at it.
    pub fn cancel(&self) {
        debug!("cancelling task");
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

impl<T> fmt::Debug for Task<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Task")
            .field("cancelled", &self.token.is_cancelled())
            .finish_non_exhaustive()
    }
}
