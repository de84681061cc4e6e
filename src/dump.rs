//! Machine-friendly peer dumps
//!
//! Each conversation is written to `<out_dir>/<peer_id>.json` holding the raw
//! API output: account, conversation info, messages and members.

use crate::api::VkApi;
use crate::error::{Result, ResultExt};
use crate::history::{download_history, BatchSource};
use crate::types::{JsonValue, Members, MessageRecord, PeerId};
use crate::users::{collect_member_ids, download_members};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

/// Everything saved for one conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeerDump {
    /// Conversation id
    pub peer_id: PeerId,
    /// Owner of the token the dump was made with
    pub account: JsonValue,
    /// `messages.getConversationsById` entry
    pub info: JsonValue,
    /// Messages, oldest first
    pub messages: Vec<MessageRecord>,
    /// Users and communities seen in the conversation
    pub members: Members,
    /// When the dump was made
    pub dumped_at: DateTime<Utc>,
}

/// Path of a peer's dump file
pub fn peer_path(out_dir: &Path, peer_id: PeerId) -> PathBuf {
    out_dir.join(format!("{peer_id}.json"))
}

/// Download one conversation and write it to `out_dir`
pub async fn dump_peer(
    api: &VkApi,
    source: &dyn BatchSource,
    account: &JsonValue,
    out_dir: &Path,
    peer_id: PeerId,
    max_messages: Option<usize>,
) -> Result<PathBuf> {
    let info = api.get_conversation(peer_id).await?;
    let messages = download_history(source, peer_id, max_messages).await?;
    let members = download_members(api, &collect_member_ids(&messages, peer_id)).await?;

    info!(
        peer_id,
        messages = messages.len(),
        users = members.users.len(),
        groups = members.groups.len(),
        "Downloaded peer"
    );

    let dump = PeerDump {
        peer_id,
        account: account.clone(),
        info,
        messages,
        members,
        dumped_at: Utc::now(),
    };

    save_peer(out_dir, &dump).await
}

/// Write a dump, creating `out_dir` if needed
pub async fn save_peer(out_dir: &Path, dump: &PeerDump) -> Result<PathBuf> {
    tokio::fs::create_dir_all(out_dir)
        .await
        .with_context(|| format!("creating {}", out_dir.display()))?;

    let path = peer_path(out_dir, dump.peer_id);
    let bytes = serde_json::to_vec(dump)?;
    tokio::fs::write(&path, bytes)
        .await
        .with_context(|| format!("writing {}", path.display()))?;

    Ok(path)
}

/// Read a dump written by [`save_peer`]
pub async fn load_peer(out_dir: &Path, peer_id: PeerId) -> Result<PeerDump> {
    let path = peer_path(out_dir, peer_id);
    let bytes = tokio::fs::read(&path)
        .await
        .with_context(|| format!("reading {}", path.display()))?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// Peers that have a dump in `out_dir`, in ascending order
pub async fn list_dumped_peers(out_dir: &Path) -> Result<Vec<PeerId>> {
    let mut entries = tokio::fs::read_dir(out_dir)
        .await
        .with_context(|| format!("reading {}", out_dir.display()))?;

    let mut peers = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("json") {
            continue;
        }
        if let Some(peer_id) = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .and_then(|stem| stem.parse::<PeerId>().ok())
        {
            peers.push(peer_id);
        }
    }

    peers.sort_unstable();
    Ok(peers)
}
