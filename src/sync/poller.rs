//! Fixed-interval poller
//!
//! Fetches once immediately and then on every tick. Each fetch runs in its
//! own task, so a slow request never delays the next tick and responses may
//! arrive out of order; every delivery carries the sequence number of the
//! tick that issued it. Failures are logged and dropped.

use std::future::Future;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::client::ClientResult;

/// A successful fetch tagged with the tick that issued it
#[derive(Debug, Clone, PartialEq)]
pub struct Polled<T> {
    pub seq: u64,
    pub value: T,
}

/// Periodic fetch loop
#[derive(Debug, Clone)]
pub struct Poller {
    name: &'static str,
    period: Duration,
}

impl Poller {
    pub fn new(name: &'static str, period: Duration) -> Self {
        Self { name, period }
    }

    /// Start polling; stops once every receiver of `tx` is gone
    pub fn spawn<T, M, F, Fut>(self, fetch: F, tx: mpsc::Sender<M>) -> JoinHandle<()>
    where
        T: Send + 'static,
        M: From<Polled<T>> + Send + 'static,
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ClientResult<T>> + Send + 'static,
    {
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(self.period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            let mut seq = 0u64;

            loop {
                interval.tick().await;

                if tx.is_closed() {
                    tracing::debug!(poller = self.name, "Receiver gone, stopping poller");
                    break;
                }

                seq += 1;
                let request = fetch();
                let tx = tx.clone();
                let name = self.name;

                tokio::spawn(async move {
                    match request.await {
                        Ok(value) => {
                            let _ = tx.send(Polled { seq, value }.into()).await;
                        }
                        Err(e) => {
                            tracing::warn!(poller = name, seq, "Poll failed: {}", e);
                        }
                    }
                });
            }
        })
    }
}
