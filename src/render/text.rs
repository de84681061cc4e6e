//! Plain-text transcript layout
//!
//! ```text
//!         [05 марта 2021]
//! [12:00] Anna K: hello
//! [12:07]         second message from the same sender
//!                 |         [04 марта 2021]
//!                 | [18:30] Boris L: forwarded text
//! ```

use super::message::Message;

/// Indent of a day header
const HEADER_INDENT: &str = "        ";

/// Width of the `[HH:MM]` column
const TIME_WIDTH: usize = 7;

/// Render messages as a transcript.
///
/// Each day opens with a date header. A message from the same sender as the
/// one before it on that day leaves the name column blank. Forwarded
/// messages are rendered the same way and prefixed with `| `.
pub fn render_text(messages: &[Message]) -> String {
    let mut out = String::new();
    let mut prev: Option<&Message> = None;

    for msg in messages {
        if prev.map_or(true, |p| p.day() != msg.day()) {
            if prev.is_some() {
                out.push('\n');
            }
            push_header(&mut out, msg);
            prev = None;
        }

        let continues = prev.is_some_and(|p| p.sender == msg.sender);
        let pad = " ".repeat(msg.name.chars().count());

        for (i, line) in content_lines(msg).iter().enumerate() {
            let rendered = match (i, continues) {
                (0, false) => format!("[{}] {}: {}", msg.time(), msg.name, line),
                (0, true) => format!("[{}] {}  {}", msg.time(), pad, line),
                _ => format!("{} {}  {}", " ".repeat(TIME_WIDTH), pad, line),
            };
            out.push_str(rendered.trim_end());
            out.push('\n');
        }

        prev = Some(msg);
    }

    out
}

fn push_header(out: &mut String, msg: &Message) {
    out.push_str(HEADER_INDENT);
    out.push('[');
    out.push_str(&msg.full_date());
    out.push_str("]\n");
}

/// Text lines, then forwarded messages, then attachments. Never empty.
fn content_lines(msg: &Message) -> Vec<String> {
    let mut lines: Vec<String> = msg.text.lines().map(str::to_string).collect();

    let forwarded = render_text(&msg.forwarded);
    lines.extend(
        forwarded
            .lines()
            .filter(|line| !line.is_empty())
            .map(|line| format!("| {line}")),
    );

    lines.extend(msg.attachments.iter().map(ToString::to_string));

    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}
