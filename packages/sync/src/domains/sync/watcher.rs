//! Polls the worksheet and reacts when its content changes.
//!
//! ```text
//! every interval
//!     │
//!     └─► read products ─► fingerprint
//!             ├─ first load ─────────► on_change
//!             ├─ fingerprint changed ─► on_change
//!             └─ unchanged ──────────► wait
//! ```
//!
//! A failed read or a failed `on_change` waits twice the interval and does
//! not record the fingerprint, so the same content is retried.

use anyhow::Result;
use std::future::Future;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::domains::products::{products_fingerprint, ProductRecord};
use crate::domains::sheets::SheetReader;

/// Content that differs from the last processed snapshot.
#[derive(Debug, Clone)]
pub struct SheetChange {
    pub products: Vec<ProductRecord>,
    pub fingerprint: String,
    pub first_load: bool,
}

pub struct SheetWatcher {
    reader: SheetReader,
    interval: Duration,
    last_fingerprint: Option<String>,
}

impl SheetWatcher {
    pub fn new(reader: SheetReader, interval: Duration) -> Self {
        Self {
            reader,
            interval,
            last_fingerprint: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Read the sheet and report a change, without recording it.
    pub async fn check(&self) -> Result<Option<SheetChange>> {
        let products = self.reader.get_all_products().await?;
        let fingerprint = products_fingerprint(&products)?;

        match &self.last_fingerprint {
            None => Ok(Some(SheetChange {
                products,
                fingerprint,
                first_load: true,
            })),
            Some(last) if *last != fingerprint => Ok(Some(SheetChange {
                products,
                fingerprint,
                first_load: false,
            })),
            Some(_) => Ok(None),
        }
    }

    /// Mark a change as processed.
    pub fn commit(&mut self, change: &SheetChange) {
        self.last_fingerprint = Some(change.fingerprint.clone());
    }

    /// Poll until `cancel` fires, calling `on_change` for each new snapshot.
    pub async fn run<F, Fut>(&mut self, cancel: CancellationToken, mut on_change: F) -> Result<()>
    where
        F: FnMut(Vec<ProductRecord>) -> Fut,
        Fut: Future<Output = Result<()>>,
    {
        info!(interval_secs = self.interval.as_secs_f64(), "Watching sheet for changes");

        loop {
            let wait = match self.check().await {
                Ok(Some(change)) => {
                    if change.first_load {
                        info!(count = change.products.len(), "First load of sheet data");
                    } else {
                        info!(count = change.products.len(), "Changes detected in the sheet");
                    }

                    match on_change(change.products.clone()).await {
                        Ok(()) => {
                            self.commit(&change);
                            self.interval
                        }
                        Err(e) => {
                            error!(error = %e, "Change handler failed");
                            self.interval.saturating_mul(2)
                        }
                    }
                }
                Ok(None) => {
                    debug!("No changes in the sheet");
                    self.interval
                }
                Err(e) => {
                    error!(error = %e, "Error while monitoring the sheet");
                    self.interval.saturating_mul(2)
                }
            };

            tokio::select! {
                _ = cancel.cancelled() => {
                    info!("Sheet watcher stopped");
                    return Ok(());
                }
                _ = tokio::time::sleep(wait) => {}
            }
        }
    }
}
