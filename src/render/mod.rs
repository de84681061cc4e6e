//! Human-readable transcripts of saved dumps
//!
//! Reads `<out_dir>/<peer_id>.json` written by the dump step, resolves sender
//! names from the saved members and writes `<out_dir>/<peer_id>.txt`. No API
//! access is needed.

mod attachment;
mod message;
mod text;

pub use attachment::Attachment;
pub use message::{parse_messages, Message};
pub use text::render_text;

use crate::dump::{load_peer, PeerDump};
use crate::error::{Result, ResultExt};
use crate::types::PeerId;
use crate::users::usernames;
use chrono::TimeZone;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Transcript format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Format {
    /// Plain text
    #[default]
    Txt,
}

impl Format {
    /// File extension of the format
    pub fn extension(self) -> &'static str {
        match self {
            Format::Txt => "txt",
        }
    }
}

/// Path of a peer's transcript
pub fn transcript_path(out_dir: &Path, peer_id: PeerId, format: Format) -> PathBuf {
    out_dir.join(format!("{peer_id}.{}", format.extension()))
}

/// Render a loaded dump with times shown in `tz`
pub fn render_dump<Tz: TimeZone>(dump: &PeerDump, format: Format, tz: &Tz) -> Result<String> {
    let names = usernames(&dump.members);
    let messages = parse_messages(&dump.messages, &names, tz)?;

    Ok(match format {
        Format::Txt => render_text(&messages),
    })
}

/// Load a saved peer, render it and write the transcript next to the dump
pub async fn render_peer<Tz: TimeZone>(
    out_dir: &Path,
    peer_id: PeerId,
    format: Format,
    tz: &Tz,
) -> Result<PathBuf> {
    let dump = load_peer(out_dir, peer_id).await?;
    let rendered = render_dump(&dump, format, tz)?;
    debug!(peer_id, messages = dump.messages.len(), "Rendered peer");

    let path = transcript_path(out_dir, peer_id, format);
    tokio::fs::write(&path, rendered)
        .await
        .with_context(|| format!("writing {}", path.display()))?;

    Ok(path)
}

#[cfg(test)]
mod tests;
