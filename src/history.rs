//! Whole-conversation history download
//!
//! A conversation is read batch by batch. Each batch comes from a
//! [`BatchSource`]: either client-side pagination against a
//! [`HistoryFetcher`], or the VKScript equivalent run through `execute`.

use crate::api::{render_history_script, VkApi};
use crate::error::{Error, Result};
use crate::pagination::{paginate, HistoryFetcher};
use crate::types::{HistoryBatch, MessageRecord, PeerId};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, warn};

/// Produces history batches starting at a given offset
#[async_trait]
pub trait BatchSource: Send + Sync {
    /// Fetch the batch starting `processed` messages from the newest one
    async fn next_batch(&self, peer_id: PeerId, processed: u64) -> Result<HistoryBatch>;
}

/// Batches paginated on this side, one request per page
#[derive(Debug)]
pub struct LocalBatches<F: ?Sized> {
    fetcher: Arc<F>,
}

impl<F: HistoryFetcher + ?Sized> LocalBatches<F> {
    /// Paginate against a fetcher
    pub fn new(fetcher: Arc<F>) -> Self {
        Self { fetcher }
    }
}

#[async_trait]
impl<F: HistoryFetcher + ?Sized> BatchSource for LocalBatches<F> {
    async fn next_batch(&self, peer_id: PeerId, processed: u64) -> Result<HistoryBatch> {
        paginate(peer_id, processed, self.fetcher.as_ref()).await
    }
}

/// Batches paginated by VK, one `execute` call per batch
#[derive(Debug)]
pub struct ExecuteBatches {
    api: Arc<VkApi>,
}

impl ExecuteBatches {
    /// Run batches through `execute` on this client
    pub fn new(api: Arc<VkApi>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl BatchSource for ExecuteBatches {
    async fn next_batch(&self, peer_id: PeerId, processed: u64) -> Result<HistoryBatch> {
        let code = render_history_script(peer_id, processed);
        let response = self.api.execute(&code).await?;
        serde_json::from_value(response).map_err(|e| Error::decode("execute", e.to_string()))
    }
}

/// Download a conversation's history, oldest message first.
///
/// Batches are requested until the reported total is reached. With
/// `max_messages` set, only that many of the newest messages are kept and no
/// further batches are requested once they are in. A batch that does not
/// advance the offset ends the download, since the next one would start from
/// the same place.
pub async fn download_history<S>(
    source: &S,
    peer_id: PeerId,
    max_messages: Option<usize>,
) -> Result<Vec<MessageRecord>>
where
    S: BatchSource + ?Sized,
{
    let mut messages = Vec::new();
    let mut processed = 0;

    loop {
        let batch = source.next_batch(peer_id, processed).await?;
        let advanced = batch.processed > processed;
        let complete = batch.is_complete();

        processed = batch.processed;
        messages.extend(batch.messages);

        debug!(
            peer_id,
            processed,
            count = batch.count,
            "Downloaded history batch"
        );

        if let Some(max) = max_messages {
            if messages.len() >= max {
                messages.truncate(max);
                break;
            }
        }

        if complete {
            break;
        }

        if !advanced {
            warn!(
                peer_id,
                processed,
                count = batch.count,
                "History stopped short of the reported total"
            );
            break;
        }
    }

    messages.reverse();
    Ok(messages)
}
