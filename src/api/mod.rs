//! VK API access
//!
//! [`VkApi`] wraps the HTTP client with the method envelope, token and
//! version handling. It also serves as the [`crate::pagination::HistoryFetcher`]
//! for client-side pagination.

mod client;
mod script;

pub use client::{ConversationItem, ConversationsPage, VkApi, GROUPS_PER_CALL, USERS_PER_CALL};
pub use script::render_history_script;
