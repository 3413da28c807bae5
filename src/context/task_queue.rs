use std::sync::{Arc, Weak};

use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tracing::*;

use super::{ContextHandle, CurrentContext, ExecutionContext, Task};

/// Execution context backed by an unbounded task channel. Scheduling is
/// thread-safe; execution happens wherever the paired [`ContextRunner`] is
/// driven.
pub struct TaskQueueContext {
    name: String,
    sender: UnboundedSender<Task>,
}

impl TaskQueueContext {
    /// Creates a context and the runner that drains it. The runner stops once
    /// every handle to the context has been dropped and the queue is empty.
    pub fn new(name: impl Into<String>) -> (ContextHandle, ContextRunner) {
        let (sender, receiver) = unbounded_channel();
        let context = Arc::new(TaskQueueContext {
            name: name.into(),
            sender,
        });
        let runner = ContextRunner {
            context: Arc::downgrade(&context),
            receiver,
        };

        (context, runner)
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl ExecutionContext for TaskQueueContext {
    fn schedule(&self, task: Task) {
        if self.sender.send(task).is_err() {
            debug!(context = %self.name, "context torn down, dropping scheduled task");
        }
    }
}

/// Drains a [`TaskQueueContext`]. While a task runs, its context is the
/// current context for the executing thread.
pub struct ContextRunner {
    context: Weak<TaskQueueContext>,
    receiver: UnboundedReceiver<Task>,
}

impl ContextRunner {
    /// Runs tasks until all handles to the context are dropped and no queued
    /// work remains.
    pub async fn run(mut self) {
        while let Some(task) = self.receiver.recv().await {
            self.execute(task);
        }
    }

    /// Runs every task currently queued, then returns the number executed.
    /// Tasks scheduled while draining are executed as well.
    pub fn run_pending(&mut self) -> usize {
        let mut executed = 0;
        while let Ok(task) = self.receiver.try_recv() {
            self.execute(task);
            executed += 1;
        }

        executed
    }

    fn execute(&self, task: Task) {
        let _scope = self
            .context
            .upgrade()
            .map(|context| CurrentContext::enter(context));
        task();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;

    use super::*;

    #[test]
    fn should_run_tasks_in_scheduling_order() {
        let (context, mut runner) = TaskQueueContext::new("test");
        let order = Arc::new(Mutex::new(vec![]));

        for i in 0..3 {
            let order = order.clone();
            context.schedule(Box::new(move || order.lock().unwrap().push(i)));
        }

        assert_eq!(runner.run_pending(), 3);
        assert_eq!(*order.lock().unwrap(), vec![0, 1, 2]);
    }

    #[test]
    fn should_mark_context_current_while_task_runs() {
        let (context, mut runner) = TaskQueueContext::new("test");
        let seen = Arc::new(Mutex::new(None));

        let slot = seen.clone();
        context.schedule(Box::new(move || {
            *slot.lock().unwrap() = CurrentContext::current();
        }));
        runner.run_pending();

        let seen = seen.lock().unwrap().clone().expect("no current context");
        assert!(Arc::ptr_eq(&seen, &context));
        assert!(CurrentContext::current().is_none());
    }

    #[test]
    fn should_drop_tasks_scheduled_after_teardown() {
        let (context, runner) = TaskQueueContext::new("test");
        drop(runner);

        // no panic; the task is silently dropped
        context.schedule(Box::new(|| unreachable!()));
    }

    #[tokio::test]
    async fn should_stop_running_once_all_handles_dropped() {
        let (context, runner) = TaskQueueContext::new("test");
        let ran = Arc::new(AtomicBool::new(false));

        let flag = ran.clone();
        context.schedule(Box::new(move || flag.store(true, Ordering::SeqCst)));
        drop(context);

        runner.run().await;
        assert!(ran.load(Ordering::SeqCst));
    }
}
