//! Worker side of the dispatch protocol.
//!
//! A worker process subscribes to the dispatch channel, resolves each
//! published job id into its full record, executes it, and reports progress
//! through the [`StatusMutator`](crate::mutator::StatusMutator). This
//! module provides the first two steps.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use volley_core::job::Job;
use volley_core::keys;
use volley_store::{CoordinationStore, Subscription};

use crate::error::OrchestratorError;

/// Entry point for workers: subscribes to the dispatch channel.
pub struct DispatchListener {
    store: Arc<dyn CoordinationStore>,
}

impl DispatchListener {
    pub fn new(store: Arc<dyn CoordinationStore>) -> Self {
        Self { store }
    }

    /// Open a feed of newly admitted jobs.
    ///
    /// Only jobs dispatched after this call are seen; the channel has no
    /// replay. A worker that was offline catches up by polling the durable
    /// execution history instead.
    pub async fn subscribe(&self) -> Result<DispatchFeed, OrchestratorError> {
        let subscription = self.store.subscribe(keys::DISPATCH_CHANNEL).await?;
        Ok(DispatchFeed {
            store: self.store.clone(),
            subscription,
        })
    }
}

/// A live stream of dispatched jobs.
pub struct DispatchFeed {
    store: Arc<dyn CoordinationStore>,
    subscription: Subscription,
}

impl DispatchFeed {
    /// Await the next dispatched job, or `None` once the channel closes.
    ///
    /// Notifications whose job record cannot be found are logged and
    /// skipped — the record may have expired, or the id may belong to a
    /// foreign publisher.
    pub async fn next_job(&mut self) -> Result<Option<Job>, OrchestratorError> {
        while let Some(job_id) = self.subscription.next_message().await {
            match fetch_job(self.store.as_ref(), &job_id).await? {
                Some(job) => return Ok(Some(job)),
                None => {
                    tracing::warn!(
                        job_id = %job_id,
                        "Dispatch notification without a job record; skipping"
                    );
                }
            }
        }
        Ok(None)
    }

    /// Drive the feed until `cancel` fires, forwarding each job to `sink`.
    ///
    /// Returns cleanly when cancelled, when the channel closes, or when the
    /// sink's receiver is dropped.
    pub async fn run(
        mut self,
        cancel: CancellationToken,
        sink: tokio::sync::mpsc::Sender<Job>,
    ) -> Result<(), OrchestratorError> {
        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!("Dispatch feed shutting down");
                    return Ok(());
                }
                next = self.next_job() => match next? {
                    Some(job) => {
                        if sink.send(job).await.is_err() {
                            tracing::info!("Dispatch feed sink closed");
                            return Ok(());
                        }
                    }
                    None => {
                        tracing::info!("Dispatch channel closed");
                        return Ok(());
                    }
                },
            }
        }
    }
}

/// Load a job record by id.
///
/// `None` when no record exists under the id; malformed records are an
/// error here, since the record itself is what the caller asked for.
pub async fn fetch_job(
    store: &dyn CoordinationStore,
    job_id: &str,
) -> Result<Option<Job>, OrchestratorError> {
    let Some(raw) = store.hash_get(job_id, keys::JOB_RECORD_FIELD).await? else {
        return Ok(None);
    };
    Ok(Some(Job::decode(&raw)?))
}
