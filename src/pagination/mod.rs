//! Pagination module
//!
//! # Overview
//!
//! A conversation's history is read in batches. Each batch is a bounded run
//! of offset pages against a [`HistoryFetcher`]: at most [`MAX_FETCHES`]
//! pages of [`PAGE_SIZE`] messages, stopping early once the running offset
//! reaches the total the API reported.

mod paginator;
mod types;

pub use paginator::paginate;
pub use types::{HistoryFetcher, PaginationState, MAX_FETCHES, PAGE_SIZE};

#[cfg(test)]
mod tests;
