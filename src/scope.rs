use std::{future::Future, sync::Arc};

use tokio::sync::watch;

use crate::error::{ClientError, ClientResult};

/// Lifetime of a screen. Requests run through [`ViewScope::run`] resolve to
/// [`ClientError::Cancelled`] once the scope is cancelled or dropped, so a slow
/// response can never touch state the user has navigated away from.
#[derive(Debug)]
pub struct ViewScope {
    tx: Arc<watch::Sender<bool>>,
}

#[derive(Debug, Clone)]
pub struct CancelHandle {
    tx: Arc<watch::Sender<bool>>,
}

impl CancelHandle {
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }
}

impl Default for ViewScope {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewScope {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    pub fn handle(&self) -> CancelHandle {
        CancelHandle {
            tx: self.tx.clone(),
        }
    }

    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.tx.borrow()
    }

    pub async fn run<T, F>(&self, fut: F) -> ClientResult<T>
    where
        F: Future<Output = ClientResult<T>>,
    {
        if self.is_cancelled() {
            return Err(ClientError::Cancelled);
        }
        let mut rx = self.tx.subscribe();
        tokio::select! {
            biased;
            _ = rx.wait_for(|cancelled| *cancelled) => Err(ClientError::Cancelled),
            result = fut => result,
        }
    }
}

impl Drop for ViewScope {
    fn drop(&mut self) {
        self.cancel();
    }
}
