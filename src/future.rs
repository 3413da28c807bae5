use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard};
use std::task::{Context, Poll, Waker};

use crate::driver::{Completion, DriverError};

enum State<V> {
    Pending {
        completion: Option<Completion<V>>,
        waker: Option<Waker>,
    },
    Complete(Option<Result<V, DriverError>>),
    Delivered,
}

fn lock<V>(state: &Mutex<State<V>>) -> MutexGuard<'_, State<V>> {
    state.lock().unwrap_or_else(|error| error.into_inner())
}

/// One-shot handle for an asynchronous driver operation.
///
/// The driver completes the paired [`OperationPromise`] exactly once, from
/// whichever internal thread finished the operation. The caller either
/// attaches a completion with [`on_complete`](OperationFuture::on_complete)
/// or awaits the handle. Single completion is enforced by the type system:
/// both [`OperationPromise::complete`] and `on_complete` consume their side.
pub struct OperationFuture<V> {
    state: Arc<Mutex<State<V>>>,
}

/// Completing side of an [`OperationFuture`], held by the driver.
pub struct OperationPromise<V> {
    state: Arc<Mutex<State<V>>>,
}

impl<V: Send + 'static> OperationFuture<V> {
    pub fn new() -> (OperationPromise<V>, OperationFuture<V>) {
        let state = Arc::new(Mutex::new(State::Pending {
            completion: None,
            waker: None,
        }));

        (
            OperationPromise {
                state: state.clone(),
            },
            OperationFuture { state },
        )
    }

    /// An already-completed handle, for outcomes known up front.
    pub fn ready(result: Result<V, DriverError>) -> Self {
        OperationFuture {
            state: Arc::new(Mutex::new(State::Complete(Some(result)))),
        }
    }

    /// Attaches the completion. If the operation has already completed, the
    /// completion runs immediately on the calling thread; otherwise it runs
    /// on the thread that later completes the promise.
    pub fn on_complete(self, completion: Completion<V>) {
        let ready = {
            let mut state = lock(&self.state);
            match &mut *state {
                State::Pending {
                    completion: slot, ..
                } => {
                    *slot = Some(completion);
                    None
                }
                State::Complete(result) => {
                    let result = result.take();
                    *state = State::Delivered;
                    result.map(|result| (completion, result))
                }
                State::Delivered => None,
            }
        };

        if let Some((completion, result)) = ready {
            completion(result);
        }
    }
}

impl<V: Send + 'static> OperationPromise<V> {
    /// Completes the operation with its single outcome. Runs the attached
    /// completion, if any, on the calling thread.
    pub fn complete(self, result: Result<V, DriverError>) {
        let attached = {
            let mut state = lock(&self.state);
            match &mut *state {
                State::Pending { completion, waker } => {
                    let completion = completion.take();
                    let waker = waker.take();
                    match completion {
                        Some(completion) => {
                            *state = State::Delivered;
                            Some((completion, result, waker))
                        }
                        None => {
                            *state = State::Complete(Some(result));
                            if let Some(waker) = waker {
                                waker.wake();
                            }
                            None
                        }
                    }
                }
                _ => None,
            }
        };

        if let Some((completion, result, waker)) = attached {
            completion(result);
            if let Some(waker) = waker {
                waker.wake();
            }
        }
    }
}

impl<V: Send + 'static> Future for OperationFuture<V> {
    type Output = Result<V, DriverError>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let mut state = lock(&self.state);
        match &mut *state {
            State::Pending { waker, .. } => {
                *waker = Some(cx.waker().clone());
                Poll::Pending
            }
            State::Complete(result) => match result.take() {
                Some(result) => {
                    *state = State::Delivered;
                    Poll::Ready(result)
                }
                None => Poll::Pending,
            },
            State::Delivered => Poll::Pending,
        }
    }
}
