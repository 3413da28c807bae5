use std::sync::Arc;

use derivative::Derivative;

use crate::context::{ContextHandle, ContextProvider};
use crate::driver::Completion;
use crate::error::{Error, Result};

/// Redirects asynchronous completions back onto the execution context that
/// issued the call.
///
/// The driver invokes completions on arbitrary internal threads; a wrapped
/// completion never runs the original one there. It instead schedules a task
/// on the context captured at wrap time, and the context's own single-threaded
/// queue delivers it. Completions for the same context are delivered in the
/// order their operations completed; nothing is guaranteed across contexts.
#[derive(Clone, Derivative)]
#[derivative(Debug)]
pub struct ContextDispatcher {
    #[derivative(Debug = "ignore")]
    provider: Arc<dyn ContextProvider>,
}

impl ContextDispatcher {
    pub fn new(provider: Arc<dyn ContextProvider>) -> Self {
        ContextDispatcher { provider }
    }

    /// Captures the context active at the moment of this call and wraps
    /// `completion` for redelivery onto it. Fails with
    /// [`Error::NoActiveContext`] when the calling thread has no context.
    pub fn wrap<V: Send + 'static>(&self, completion: Completion<V>) -> Result<Completion<V>> {
        let context = self.provider.current().ok_or(Error::NoActiveContext)?;
        Ok(Self::wrap_on(context, completion))
    }

    /// Wraps `completion` for redelivery onto an explicit context. The driver
    /// error, if any, passes through unchanged.
    pub fn wrap_on<V: Send + 'static>(
        context: ContextHandle,
        completion: Completion<V>,
    ) -> Completion<V> {
        Box::new(move |result| context.schedule(Box::new(move || completion(result))))
    }
}
