//! Background load worker sequencing all catalog refreshes.
//!
//! One dedicated task owns the loader, so at most one load runs at a time.
//! Requests arriving while a load is in flight queue up and are coalesced to
//! the newest before the follow-up load, so duplicate back-to-back refreshes
//! never compound. There is no mid-load cancellation; a superseded result is
//! still delivered once and discarded by the control thread's generation
//! check.
use std::sync::Arc;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;

use crate::catalog::CatalogLoader;
use crate::provider::{AppProvider, IconDecoder};
use crate::state::{LoadOutcome, LoadRequest};

/// Spawn the worker task and return the request/outcome channel ends.
///
/// The embedder selects on the outcome receiver from its control thread and
/// feeds each delivery to `Directory::install`; the worker itself never
/// touches engine state.
pub fn spawn<P, D>(
    loader: CatalogLoader<P, D>,
) -> (
    UnboundedSender<LoadRequest>,
    UnboundedReceiver<LoadOutcome>,
    JoinHandle<()>,
)
where
    P: AppProvider + Send + Sync + 'static,
    D: IconDecoder + Send + Sync + 'static,
{
    let (req_tx, mut req_rx) = mpsc::unbounded_channel::<LoadRequest>();
    let (out_tx, out_rx) = mpsc::unbounded_channel::<LoadOutcome>();
    let handle = tokio::spawn(async move {
        let loader = Arc::new(loader);
        while let Some(first) = req_rx.recv().await {
            let req = coalesce_pending(&mut req_rx, first);
            let generation = req.generation;
            let task = Arc::clone(&loader);
            match tokio::task::spawn_blocking(move || task.load(&req.prefs)).await {
                Ok(snapshot) => {
                    if out_tx.send(LoadOutcome { generation, snapshot }).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    tracing::error!(error = %e, generation, "catalog load task failed");
                }
            }
        }
        tracing::debug!("load worker shutting down");
    });
    (req_tx, out_rx, handle)
}

/// Collapse every queued request down to the most recent one.
fn coalesce_pending(rx: &mut UnboundedReceiver<LoadRequest>, first: LoadRequest) -> LoadRequest {
    let mut latest = first;
    let mut dropped = 0usize;
    while let Ok(next) = rx.try_recv() {
        latest = next;
        dropped += 1;
    }
    if dropped > 0 {
        tracing::debug!(dropped, generation = latest.generation, "coalesced refresh requests");
    }
    latest
}
