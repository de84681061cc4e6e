//! Tests for pagination module

use super::*;
use crate::error::{Error, Result};
use crate::types::{HistoryPage, HistoryRequest};
use async_trait::async_trait;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::Mutex;
use test_case::test_case;

/// Serves a conversation of `count` messages with ids `0..count`, newest
/// first, optionally shrinking pages or failing a given call.
struct StubFetcher {
    count: u64,
    page_len: Option<usize>,
    fail_on_call: Option<usize>,
    requests: Mutex<Vec<HistoryRequest>>,
}

impl StubFetcher {
    fn new(count: u64) -> Self {
        Self {
            count,
            page_len: None,
            fail_on_call: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    fn with_page_len(mut self, len: usize) -> Self {
        self.page_len = Some(len);
        self
    }

    fn failing_on(mut self, call: usize) -> Self {
        self.fail_on_call = Some(call);
        self
    }

    fn requests(&self) -> Vec<HistoryRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl HistoryFetcher for StubFetcher {
    async fn get_history(&self, request: HistoryRequest) -> Result<HistoryPage> {
        let call = {
            let mut requests = self.requests.lock().unwrap();
            requests.push(request);
            requests.len()
        };

        if self.fail_on_call == Some(call) {
            return Err(Error::api(6, "Too many requests per second"));
        }

        let limit = self.page_len.unwrap_or(request.count as usize) as u64;
        let end = (request.offset + limit).min(self.count);
        let items = (request.offset..end).map(|id| json!({ "id": id })).collect();

        Ok(HistoryPage::new(self.count, items))
    }
}

/// Returns a fixed sequence of pages, then empty pages.
struct ScriptedFetcher {
    pages: Mutex<Vec<HistoryPage>>,
    calls: Mutex<usize>,
}

impl ScriptedFetcher {
    fn new(mut pages: Vec<HistoryPage>) -> Self {
        pages.reverse();
        Self {
            pages: Mutex::new(pages),
            calls: Mutex::new(0),
        }
    }

    fn calls(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

#[async_trait]
impl HistoryFetcher for ScriptedFetcher {
    async fn get_history(&self, _request: HistoryRequest) -> Result<HistoryPage> {
        *self.calls.lock().unwrap() += 1;
        let mut pages = self.pages.lock().unwrap();
        Ok(pages.pop().unwrap_or_default())
    }
}

fn ids(messages: &[serde_json::Value]) -> Vec<u64> {
    messages.iter().map(|m| m["id"].as_u64().unwrap()).collect()
}

// ============================================================================
// PaginationState Tests
// ============================================================================

#[test]
fn test_pagination_state_request_uses_offset() {
    let state = PaginationState::new(400);
    let request = state.request(42);

    assert_eq!(
        request,
        HistoryRequest {
            offset: 400,
            count: PAGE_SIZE,
            peer_id: 42,
        }
    );
}

#[test]
fn test_pagination_state_record_keeps_first_count() {
    let mut state = PaginationState::new(0);

    state.record(&HistoryPage::new(10, vec![json!({}); 4]));
    state.record(&HistoryPage::new(99, vec![json!({}); 2]));

    assert_eq!(state.count, 10);
    assert_eq!(state.processed, 6);
    assert_eq!(state.fetches, 2);
}

#[test]
fn test_pagination_state_stops_at_cap() {
    let state = PaginationState {
        processed: 10,
        count: 1000,
        fetches: MAX_FETCHES,
    };
    assert!(!state.should_continue());
}

#[test]
fn test_pagination_state_stops_at_count() {
    let state = PaginationState {
        processed: 50,
        count: 50,
        fetches: 1,
    };
    assert!(!state.should_continue());
}

// ============================================================================
// paginate Tests
// ============================================================================

#[tokio::test]
async fn test_single_page_conversation() {
    let fetcher = StubFetcher::new(50);

    let batch = paginate(7, 0, &fetcher).await.unwrap();

    assert_eq!(batch.count, 50);
    assert_eq!(batch.processed, 50);
    assert_eq!(batch.messages.len(), 50);
    assert_eq!(fetcher.requests().len(), 1);
}

#[test_case(1000, 5, 1000 ; "stops when total is reached")]
#[test_case(5000, 25, 5000 ; "exactly fills the cap")]
#[test_case(10000, 25, 5000 ; "truncated at the fetch cap")]
#[test_case(201, 2, 201 ; "short last page")]
#[test_case(0, 1, 0 ; "empty conversation")]
fn test_fetch_counts(count: u64, fetches: usize, processed: u64) {
    let fetcher = StubFetcher::new(count);

    let batch = tokio_test::block_on(paginate(1, 0, &fetcher)).unwrap();

    assert_eq!(fetcher.requests().len(), fetches);
    assert_eq!(batch.processed, processed);
    assert_eq!(batch.messages.len() as u64, processed);
    assert_eq!(batch.count, count);
}

#[tokio::test]
async fn test_offsets_follow_running_total() {
    let fetcher = StubFetcher::new(1000);

    paginate(3, 0, &fetcher).await.unwrap();

    let offsets: Vec<u64> = fetcher.requests().iter().map(|r| r.offset).collect();
    assert_eq!(offsets, vec![0, 200, 400, 600, 800]);
    assert!(fetcher
        .requests()
        .iter()
        .all(|r| r.count == PAGE_SIZE && r.peer_id == 3));
}

#[tokio::test]
async fn test_starts_from_given_offset() {
    let fetcher = StubFetcher::new(10_000);

    let batch = paginate(3, 5000, &fetcher).await.unwrap();

    assert_eq!(fetcher.requests()[0].offset, 5000);
    assert_eq!(batch.processed, 10_000);
    assert_eq!(batch.messages.len(), 5000);
    assert_eq!(batch.messages[0]["id"], 5000);
}

#[tokio::test]
async fn test_messages_concatenated_in_fetch_order() {
    let fetcher = StubFetcher::new(450);

    let batch = paginate(1, 0, &fetcher).await.unwrap();

    assert_eq!(ids(&batch.messages), (0..450).collect::<Vec<_>>());
}

#[tokio::test]
async fn test_undersized_pages_do_not_end_batch() {
    let fetcher = StubFetcher::new(1000).with_page_len(150);

    let batch = paginate(1, 0, &fetcher).await.unwrap();

    // ceil(1000 / 150)
    assert_eq!(fetcher.requests().len(), 7);
    assert_eq!(batch.processed, 1000);
}

#[tokio::test]
async fn test_empty_pages_consume_fetch_cap() {
    let fetcher = ScriptedFetcher::new(vec![HistoryPage::new(300, vec![json!({"id": 1}); 200])]);

    let batch = paginate(1, 0, &fetcher).await.unwrap();

    assert_eq!(fetcher.calls(), MAX_FETCHES as usize);
    assert_eq!(batch.processed, 200);
    assert_eq!(batch.count, 300);
    assert!(!batch.is_complete());
}

#[tokio::test]
async fn test_count_from_first_page_is_reported() {
    let fetcher = ScriptedFetcher::new(vec![
        HistoryPage::new(400, vec![json!({"id": 1}); 200]),
        HistoryPage::new(250, vec![json!({"id": 2}); 200]),
    ]);

    let batch = paginate(1, 0, &fetcher).await.unwrap();

    assert_eq!(fetcher.calls(), 2);
    assert_eq!(batch.count, 400);
    assert_eq!(batch.processed, 400);
}

#[tokio::test]
async fn test_fetch_error_propagates() {
    let fetcher = StubFetcher::new(1000).failing_on(3);

    let err = paginate(1, 0, &fetcher).await.unwrap_err();

    assert!(matches!(err, Error::Api { code: 6, .. }));
    assert_eq!(fetcher.requests().len(), 3);
}

#[tokio::test]
async fn test_first_fetch_error_propagates() {
    let fetcher = StubFetcher::new(1000).failing_on(1);

    assert!(paginate(1, 0, &fetcher).await.is_err());
    assert_eq!(fetcher.requests().len(), 1);
}

#[tokio::test]
async fn test_paginate_through_arc_fetcher() {
    let fetcher = std::sync::Arc::new(StubFetcher::new(10));

    let batch = paginate(1, 0, &fetcher).await.unwrap();

    assert_eq!(batch.processed, 10);
}
