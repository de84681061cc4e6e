//! Pagination types and traits
//!
//! Defines the history fetch capability the paginator runs against and the
//! state it carries between fetches.

use crate::error::Result;
use crate::types::{HistoryBatch, HistoryPage, HistoryRequest, MessageRecord, PeerId};
use async_trait::async_trait;
use std::sync::Arc;

/// Messages requested per fetch. `messages.getHistory` rejects anything larger.
pub const PAGE_SIZE: u32 = 200;

/// Fetches made by one paginate call, the first one included.
///
/// This is also the number of API calls a single `execute` script may make,
/// so a batch never holds more than `PAGE_SIZE * MAX_FETCHES` messages even
/// when the conversation is larger. The remainder is left to the next batch.
pub const MAX_FETCHES: u32 = 25;

/// Source of history pages
#[async_trait]
pub trait HistoryFetcher: Send + Sync {
    /// Fetch one page of a conversation's history
    async fn get_history(&self, request: HistoryRequest) -> Result<HistoryPage>;
}

#[async_trait]
impl<T: HistoryFetcher + ?Sized> HistoryFetcher for Arc<T> {
    async fn get_history(&self, request: HistoryRequest) -> Result<HistoryPage> {
        (**self).get_history(request).await
    }
}

#[async_trait]
impl<T: HistoryFetcher + ?Sized> HistoryFetcher for &T {
    async fn get_history(&self, request: HistoryRequest) -> Result<HistoryPage> {
        (**self).get_history(request).await
    }
}

/// Tracks pagination state during one batch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaginationState {
    /// Offset of the next page
    pub processed: u64,
    /// Total reported by the first page
    pub count: u64,
    /// Fetches made so far
    pub fetches: u32,
}

impl PaginationState {
    /// Start from an offset
    pub fn new(processed: u64) -> Self {
        Self {
            processed,
            ..Default::default()
        }
    }

    /// Request for the next page
    pub fn request(&self, peer_id: PeerId) -> HistoryRequest {
        HistoryRequest {
            offset: self.processed,
            count: PAGE_SIZE,
            peer_id,
        }
    }

    /// Account for a fetched page. Only the first page sets the total.
    pub fn record(&mut self, page: &HistoryPage) {
        if self.fetches == 0 {
            self.count = page.count;
        }
        self.processed += page.items.len() as u64;
        self.fetches += 1;
    }

    /// Whether another fetch is allowed and needed
    pub fn should_continue(&self) -> bool {
        self.fetches < MAX_FETCHES && self.processed < self.count
    }

    /// Finish the batch
    pub fn into_batch(self, messages: Vec<MessageRecord>) -> HistoryBatch {
        HistoryBatch {
            count: self.count,
            processed: self.processed,
            messages,
        }
    }
}
