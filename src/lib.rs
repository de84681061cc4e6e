//! # vkms
//!
//! Saves VK conversations as machine-friendly JSON.
//!
//! ## Features
//!
//! - **Bounded history pagination**: up to 25 pages of 200 messages per batch
//! - **Server-side batches**: the same loop run through the `execute` method
//! - **Rate limiting and retries**: shared request quota, flood-control retries
//! - **Member lookup**: names of every sender, forwarder and mentioned member
//! - **Transcripts**: saved dumps rendered as plain text, offline
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use vkms::{api::VkApi, config::ApiConfig, history::{download_history, LocalBatches}};
//!
//! #[tokio::main]
//! async fn main() -> vkms::Result<()> {
//!     let api = Arc::new(VkApi::new(&ApiConfig::default(), "token")?);
//!     let source = LocalBatches::new(api);
//!     let messages = download_history(&source, 2_000_000_001, None).await?;
//!     println!("{} messages", messages.len());
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────┐
//! │  cli: dump / peers / parse                             │
//! └───────────────────────────┬────────────────────────────┘
//!                             │
//! ┌──────────┬────────────────┴──┬─────────────┬───────────┐
//! │  peers   │     history       │    users    │   dump    │
//! ├──────────┼───────────────────┼─────────────┼───────────┤
//! │ id parse │ BatchSource       │ member ids  │ JSON file │
//! │ listing  │ paginate / execute│ names       │ per peer  │
//! └──────────┴─────────┬─────────┴─────────────┴─────┬─────┘
//!                      │                             │
//!                      │                   ┌─────────┴─────────┐
//!                      │                   │ render: JSON → txt│
//!                      │                   └───────────────────┘
//!                      │
//!          ┌───────────┴───────────┐
//!          │ api: VkApi → http     │
//!          │ retry, backoff, quota │
//!          └───────────────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Runtime configuration
pub mod config;

/// HTTP client with retry and rate limiting
pub mod http;

/// VK API client
pub mod api;

/// Bounded history pagination
pub mod pagination;

/// Multi-batch history download
pub mod history;

/// Peer ids and conversation listing
pub mod peers;

/// Conversation members
pub mod users;

/// JSON dumps
pub mod dump;

/// Human-readable transcripts
pub mod render;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use pagination::{paginate, HistoryFetcher, MAX_FETCHES, PAGE_SIZE};
pub use types::{HistoryBatch, HistoryPage, HistoryRequest, PeerId};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
