//! Attachment placeholders

use crate::types::JsonValue;
use sha1::{Digest, Sha1};
use std::fmt;

/// Attachment of a message, reduced to what the transcript shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Attachment {
    /// Photo, by the URL of its largest size
    Photo { url: String },
    /// Wall post
    Wall { owner_id: i64, post_id: i64 },
    /// Anything else (audio, documents, stickers...)
    Other { kind: String },
}

impl Attachment {
    /// Read an entry of a message's `attachments` array
    pub fn from_json(json: &JsonValue) -> Self {
        let kind = json["type"].as_str().unwrap_or_default();
        let body = &json[kind];

        let parsed = match kind {
            "photo" => largest_photo_url(body).map(|url| Attachment::Photo { url }),
            "wall" => match (body["from_id"].as_i64(), body["id"].as_i64()) {
                (Some(owner_id), Some(post_id)) => Some(Attachment::Wall { owner_id, post_id }),
                _ => None,
            },
            _ => None,
        };

        parsed.unwrap_or_else(|| Attachment::Other {
            kind: kind.to_string(),
        })
    }
}

/// URL of the size with the largest width, then height. Ties go to the last.
fn largest_photo_url(photo: &JsonValue) -> Option<String> {
    photo["sizes"]
        .as_array()?
        .iter()
        .max_by_key(|size| {
            (
                size["width"].as_u64().unwrap_or(0),
                size["height"].as_u64().unwrap_or(0),
            )
        })?["url"]
        .as_str()
        .map(str::to_string)
}

impl fmt::Display for Attachment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Attachment::Photo { url } => {
                write!(f, "[фото: {}]", hex::encode(Sha1::digest(url.as_bytes())))
            }
            Attachment::Wall { owner_id, post_id } => {
                write!(f, "[пост: vk.com/wall{owner_id}_{post_id}]")
            }
            Attachment::Other { .. } => f.write_str("{unknown attachment}"),
        }
    }
}
