//! Common types used throughout vkms
//!
//! This module contains shared type definitions, type aliases,
//! and the wire shapes exchanged with the VK API.

use serde::{Deserialize, Serialize};

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

/// Conversation identifier
pub type PeerId = i64;

/// A single message record as returned by the API. Kept as raw JSON so that
/// every field survives the dump unchanged.
pub type MessageRecord = JsonValue;

/// Peer ids at or above this value are group chats (`c1` is `2000000001`)
pub const CHAT_PEER_OFFSET: PeerId = 2_000_000_000;

// ============================================================================
// History
// ============================================================================

/// Parameters of one `messages.getHistory` call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryRequest {
    /// Number of messages to skip
    pub offset: u64,
    /// Page size, never above 200
    pub count: u32,
    /// Conversation to read
    pub peer_id: PeerId,
}

/// One page of history
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HistoryPage {
    /// Total number of messages in the conversation
    pub count: u64,
    /// Messages on this page, newest first
    #[serde(default)]
    pub items: Vec<MessageRecord>,
}

impl HistoryPage {
    /// Create a page
    pub fn new(count: u64, items: Vec<MessageRecord>) -> Self {
        Self { count, items }
    }
}

/// Messages accumulated over several pages
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HistoryBatch {
    /// Total reported by the batch's first page
    pub count: u64,
    /// Running offset, including the offset the batch started from
    pub processed: u64,
    /// Pages concatenated in fetch order
    pub messages: Vec<MessageRecord>,
}

impl HistoryBatch {
    /// Whether the running offset has reached the reported total
    pub fn is_complete(&self) -> bool {
        self.processed >= self.count
    }
}

// ============================================================================
// Members
// ============================================================================

/// Users and communities that appear in a conversation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Members {
    /// `users.get` results
    #[serde(default)]
    pub users: Vec<JsonValue>,
    /// `groups.getById` results
    #[serde(default)]
    pub groups: Vec<JsonValue>,
}

// ============================================================================
// Backoff Type
// ============================================================================

/// Backoff strategy for retries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackoffType {
    /// Constant delay between retries
    Constant,
    /// Linear increase in delay
    Linear,
    /// Exponential increase in delay
    #[default]
    Exponential,
}
