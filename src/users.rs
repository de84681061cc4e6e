//! Conversation members and their display names

use crate::api::VkApi;
use crate::error::Result;
use crate::peers::is_chat;
use crate::types::{JsonValue, Members, MessageRecord, PeerId};
use std::collections::{BTreeSet, HashMap, VecDeque};

/// Ids of everyone who appears in a conversation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemberIds {
    /// User ids
    pub users: BTreeSet<i64>,
    /// Community ids, as positive numbers
    pub groups: BTreeSet<i64>,
}

impl MemberIds {
    fn add(&mut self, from_id: i64) {
        // i64::MIN has no positive counterpart and is dropped
        if from_id >= 0 {
            self.users.insert(from_id);
        } else if let Some(group_id) = from_id.checked_neg() {
            self.groups.insert(group_id);
        }
    }

    /// Whether no ids were collected
    pub fn is_empty(&self) -> bool {
        self.users.is_empty() && self.groups.is_empty()
    }
}

/// Collect sender ids from messages, their forwarded messages and replies.
///
/// Service messages also contribute the member they act on. In a one-to-one
/// conversation the peer is added too, so that it has a name even when it
/// never wrote anything.
pub fn collect_member_ids(messages: &[MessageRecord], peer_id: PeerId) -> MemberIds {
    let mut ids = MemberIds::default();
    let mut queue: VecDeque<&JsonValue> = messages.iter().collect();

    if !is_chat(peer_id) {
        ids.add(peer_id);
    }

    while let Some(msg) = queue.pop_front() {
        if let Some(from_id) = msg["from_id"].as_i64() {
            ids.add(from_id);
        }

        if let Some(member_id) = msg["action"]["member_id"].as_i64() {
            ids.add(member_id);
        }

        if let Some(forwarded) = msg["fwd_messages"].as_array() {
            queue.extend(forwarded);
        }

        if msg["reply_message"].is_object() {
            queue.push_back(&msg["reply_message"]);
        }
    }

    ids
}

/// Look up the users and communities behind a set of ids
pub async fn download_members(api: &VkApi, ids: &MemberIds) -> Result<Members> {
    let mut members = Members::default();

    if !ids.users.is_empty() {
        let users: Vec<i64> = ids.users.iter().copied().collect();
        members.users = api.get_users(&users).await?;
    }

    if !ids.groups.is_empty() {
        let groups: Vec<i64> = ids.groups.iter().copied().collect();
        members.groups = api.get_groups(&groups).await?;
    }

    Ok(members)
}

/// Map sender ids to display names. Communities are keyed by negative id.
pub fn usernames(members: &Members) -> HashMap<i64, String> {
    let mut names = HashMap::new();

    for user in &members.users {
        let Some(id) = user["id"].as_i64() else {
            continue;
        };
        let mut name = user["first_name"].as_str().unwrap_or_default().to_string();

        // deleted accounts come back without a usable last name
        if user["deactivated"].as_str() != Some("deleted") {
            if let Some(last) = user["last_name"].as_str() {
                name.push(' ');
                name.push_str(last);
            }
        }

        names.insert(id, name);
    }

    for group in &members.groups {
        let key = group["id"].as_i64().and_then(i64::checked_neg);
        if let (Some(key), Some(name)) = (key, group["name"].as_str()) {
            names.insert(key, name.to_string());
        }
    }

    names
}
