//! Bounded history pagination
//!
//! Reads up to `MAX_FETCHES` pages of `PAGE_SIZE` messages starting at a
//! given offset. Pages are requested one after another, since every offset
//! depends on how many messages the previous pages returned.

use super::types::{HistoryFetcher, PaginationState};
use crate::error::Result;
use crate::types::{HistoryBatch, PeerId};
use tracing::debug;

/// Fetch one batch of a conversation's history.
///
/// `processed` is the number of messages already read, and is used as the
/// first offset. The returned batch carries the running offset, the total
/// reported by the first page, and all fetched messages in fetch order.
///
/// A short page does not end the batch. Only reaching the reported total or
/// the fetch cap does. Fetch errors are returned as they are.
pub async fn paginate<F>(peer_id: PeerId, processed: u64, fetcher: &F) -> Result<HistoryBatch>
where
    F: HistoryFetcher + ?Sized,
{
    let mut state = PaginationState::new(processed);

    let first = fetcher.get_history(state.request(peer_id)).await?;
    state.record(&first);
    let mut messages = first.items;

    debug!(
        peer_id,
        processed = state.processed,
        count = state.count,
        "Fetched first history page"
    );

    while state.should_continue() {
        let page = fetcher.get_history(state.request(peer_id)).await?;
        state.record(&page);

        debug!(
            peer_id,
            fetch = state.fetches,
            items = page.items.len(),
            processed = state.processed,
            "Fetched history page"
        );

        messages.extend(page.items);
    }

    Ok(state.into_batch(messages))
}
