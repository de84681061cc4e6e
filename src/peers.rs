//! Peer ids and conversation listing

use crate::api::VkApi;
use crate::error::{Error, Result};
use crate::pagination::PAGE_SIZE;
use crate::types::{PeerId, CHAT_PEER_OFFSET};
use std::collections::BTreeSet;
use tracing::debug;

/// Whether a peer is a group chat
pub fn is_chat(peer_id: PeerId) -> bool {
    peer_id >= CHAT_PEER_OFFSET
}

/// Parse a comma-separated list of peer ids.
///
/// Accepts user ids (`1`), community ids (`-1`) and the chat shorthand
/// `c1`, which stands for `2000000001`. Empty entries are skipped.
pub fn parse_peer_ids(input: &str) -> Result<BTreeSet<PeerId>> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(parse_peer_id)
        .collect()
}

fn parse_peer_id(value: &str) -> Result<PeerId> {
    let invalid = || Error::invalid_peer(value);

    if let Some(chat) = value.strip_prefix('c') {
        if !is_digits(chat) {
            return Err(invalid());
        }
        let chat: PeerId = chat.parse().map_err(|_| invalid())?;
        return CHAT_PEER_OFFSET.checked_add(chat).ok_or_else(invalid);
    }

    let digits = value.strip_prefix('-').unwrap_or(value);
    if !is_digits(digits) {
        return Err(invalid());
    }
    value.parse().map_err(|_| invalid())
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// Choose the peers to process.
///
/// A non-empty `include` set is used as is. Otherwise every listed peer is
/// kept except the excluded ones, in listing order.
pub fn select_peers(
    all: &[PeerId],
    include: &BTreeSet<PeerId>,
    exclude: &BTreeSet<PeerId>,
) -> Vec<PeerId> {
    if !include.is_empty() {
        return include.iter().copied().collect();
    }

    all.iter()
        .copied()
        .filter(|id| !exclude.contains(id))
        .collect()
}

/// List every conversation of the account, most recent first
pub async fn list_peer_ids(api: &VkApi) -> Result<Vec<PeerId>> {
    let mut peers = Vec::new();
    let mut offset = 0;

    loop {
        let page = api.get_conversations(offset, PAGE_SIZE).await?;
        if page.items.is_empty() {
            break;
        }

        offset += page.items.len() as u64;
        peers.extend(page.items.iter().filter_map(|item| item.peer_id()));

        debug!(listed = offset, count = page.count, "Listed conversations");

        if offset >= page.count {
            break;
        }
    }

    Ok(peers)
}
