//! Execution contexts: single-threaded cooperative run queues onto which work
//! can be scheduled from any thread.
//!
//! An application may run many contexts, each with its own queue. While a
//! context runner executes a task, that context is registered as the current
//! context for the executing thread, which is what lets the dispatcher
//! capture "the logical task active at call time".

mod task_queue;

use std::cell::RefCell;
use std::sync::Arc;

pub use task_queue::{ContextRunner, TaskQueueContext};

/// Unit of work scheduled onto an execution context.
pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// A single-threaded cooperative run queue. Tasks may be scheduled from any
/// thread; they run one at a time, in order, wherever the context's runner
/// lives.
pub trait ExecutionContext: Send + Sync {
    /// Schedules a task. If the context has been torn down, the task is
    /// dropped; the underlying scheduling primitive governs and this call
    /// never fails.
    fn schedule(&self, task: Task);
}

pub type ContextHandle = Arc<dyn ExecutionContext>;

/// Identifies the context active on the calling thread, if any.
pub trait ContextProvider: Send + Sync {
    fn current(&self) -> Option<ContextHandle>;
}

thread_local! {
    static CURRENT_CONTEXT: RefCell<Option<ContextHandle>> = const { RefCell::new(None) };
}

/// Access to the context currently executing on this thread.
pub struct CurrentContext;

impl CurrentContext {
    /// The context whose runner is executing a task on the calling thread.
    pub fn current() -> Option<ContextHandle> {
        CURRENT_CONTEXT.with(|current| current.borrow().clone())
    }

    pub(crate) fn enter(context: ContextHandle) -> ContextScope {
        let previous = CURRENT_CONTEXT.with(|current| current.borrow_mut().replace(context));
        ContextScope { previous }
    }
}

/// Restores the previously active context when dropped.
pub(crate) struct ContextScope {
    previous: Option<ContextHandle>,
}

impl Drop for ContextScope {
    fn drop(&mut self) {
        let previous = self.previous.take();
        CURRENT_CONTEXT.with(|current| *current.borrow_mut() = previous);
    }
}

/// Provider backed by the thread-local current-context registry.
#[derive(Clone, Copy, Debug, Default)]
pub struct ThreadContextProvider;

impl ContextProvider for ThreadContextProvider {
    fn current(&self) -> Option<ContextHandle> {
        CurrentContext::current()
    }
}
