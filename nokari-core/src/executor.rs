use nokari::bot::{Error, Result};

use std::fmt::{self, Debug, Formatter};
use std::future::Future;

use tokio::{
    sync::{mpsc, oneshot},
    task,
};

const QUEUE_SIZE: usize = 32;

/// Runs a command handler. Every call is executed in its own task, so a
/// panicking handler does not take down the caller.
pub struct Executor<T> {
    tx: mpsc::Sender<(T, oneshot::Sender<Result>)>,
}

impl<T> Executor<T>
where
    T: Send + 'static,
{
    pub fn new(tx: mpsc::Sender<(T, oneshot::Sender<Result>)>) -> Self {
        Self { tx }
    }

    /// Creates a new `Executor` from a handler function. This must be called
    /// from within a tokio runtime.
    pub fn from_fn<F>(f: fn(T) -> F) -> Self
    where
        F: Future<Output = Result> + Send + 'static,
    {
        let (tx, mut rx) = mpsc::channel::<(T, oneshot::Sender<Result>)>(QUEUE_SIZE);

        task::spawn(async move {
            while let Some((data, tx)) = rx.recv().await {
                task::spawn(async move {
                    let res = f(data).await;
                    let _ = tx.send(res);
                });
            }
        });

        Self::new(tx)
    }

    pub async fn send(&self, ctx: T) -> Result {
        let (tx, rx) = oneshot::channel();

        if self.tx.send((ctx, tx)).await.is_err() {
            return Err(Error::NoResponse);
        }

        match rx.await {
            Ok(val) => val,
            // The sender was dropped. This likely
            // happened because the command panicked.
            Err(_) => Err(Error::NoResponse),
        }
    }
}

impl<T> Clone for Executor<T> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
        }
    }
}

impl<T> Debug for Executor<T> {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.debug_struct("Executor").finish_non_exhaustive()
    }
}
