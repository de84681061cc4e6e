//! Tests for transcript rendering

use super::*;
use crate::dump::save_peer;
use crate::error::Error;
use crate::types::Members;
use chrono::{FixedOffset, Utc};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::collections::HashMap;
use tempfile::tempdir;

// 2021-03-05 12:00 UTC and friends
const MAR_5_1200: i64 = 1_614_945_600;
const MAR_5_1207: i64 = 1_614_946_020;
const MAR_6_0930: i64 = 1_615_023_000;
const MAR_31_2359: i64 = 1_617_235_140;
const APR_1_0001: i64 = 1_617_235_260;

fn names() -> HashMap<i64, String> {
    HashMap::from([
        (1, "Anna K".to_string()),
        (2, "Boris L".to_string()),
        (-7, "News".to_string()),
    ])
}

fn msg(from_id: i64, date: i64, text: &str) -> Value {
    json!({"from_id": from_id, "date": date, "text": text, "attachments": []})
}

fn render(records: &[Value]) -> String {
    render_text(&parse_messages(records, &names(), &Utc).unwrap())
}

#[test]
fn test_day_header_and_same_sender() {
    let out = render(&[
        msg(1, MAR_5_1200, "hello"),
        msg(1, MAR_5_1207, "again"),
        msg(2, MAR_5_1207, "hi"),
    ]);

    assert_eq!(
        out,
        "        [05 марта 2021]\n\
         [12:00] Anna K: hello\n\
         [12:07]         again\n\
         [12:07] Boris L: hi\n"
    );
}

#[test]
fn test_day_break_repeats_name() {
    let out = render(&[msg(1, MAR_5_1200, "hello"), msg(1, MAR_6_0930, "next day")]);

    assert_eq!(
        out,
        "        [05 марта 2021]\n\
         [12:00] Anna K: hello\n\
         \n        [06 марта 2021]\n\
         [09:30] Anna K: next day\n"
    );
}

#[test]
fn test_day_break_across_month_end() {
    let out = render(&[msg(1, MAR_31_2359, "a"), msg(1, APR_1_0001, "b")]);

    assert_eq!(
        out,
        "        [31 марта 2021]\n\
         [23:59] Anna K: a\n\
         \n        [01 апреля 2021]\n\
         [00:01] Anna K: b\n"
    );
}

#[test]
fn test_forwarded_messages_are_indented() {
    let mut outer = msg(2, MAR_5_1207, "look");
    outer["fwd_messages"] = json!([msg(-7, MAR_5_1200, "post text")]);

    let out = render(&[outer]);
    let indent = " ".repeat(17);

    assert_eq!(
        out,
        format!(
            "        [05 марта 2021]\n\
             [12:07] Boris L: look\n\
             {indent}|         [05 марта 2021]\n\
             {indent}| [12:00] News: post text\n"
        )
    );
}

#[test]
fn test_multiline_text_and_attachments() {
    let mut record = msg(1, MAR_5_1200, "line one\nline two");
    record["attachments"] = json!([
        {"type": "photo", "photo": {"sizes": [
            {"width": 130, "height": 100, "url": "https://sun.userapi.com/small.jpg"},
            {"width": 1280, "height": 960, "url": "https://sun.userapi.com/big.jpg"},
            {"width": 604, "height": 453, "url": "https://sun.userapi.com/mid.jpg"}
        ]}},
        {"type": "wall", "wall": {"from_id": -7, "id": 42}},
        {"type": "audio", "audio": {"id": 1}}
    ]);

    let out = render(&[record]);
    let indent = " ".repeat(16);

    assert_eq!(
        out,
        format!(
            "        [05 марта 2021]\n\
             [12:00] Anna K: line one\n\
             {indent}line two\n\
             {indent}[фото: dbded3149259cb285d02c4698792873f24327782]\n\
             {indent}[пост: vk.com/wall-7_42]\n\
             {indent}{{unknown attachment}}\n"
        )
    );
}

#[test]
fn test_message_without_content_keeps_sender_line() {
    let out = render(&[msg(1, MAR_5_1200, "")]);
    assert_eq!(out, "        [05 марта 2021]\n[12:00] Anna K:\n");
}

#[test]
fn test_unknown_sender_shown_by_id() {
    let out = render(&[msg(99, MAR_5_1200, "who")]);
    assert!(out.contains("[12:00] id99: who\n"));
}

#[test]
fn test_times_follow_time_zone() {
    let moscow = FixedOffset::east_opt(3 * 3600).unwrap();
    let message = Message::from_json(&msg(1, MAR_31_2359, "late"), &names(), &moscow).unwrap();

    assert_eq!(message.time(), "02:59");
    assert_eq!(message.full_date(), "01 апреля 2021");
}

#[test]
fn test_message_without_date_is_rejected() {
    let err = Message::from_json(&json!({"from_id": 1, "text": "x"}), &names(), &Utc).unwrap_err();
    assert!(matches!(err, Error::Render { .. }));
}

#[test]
fn test_photo_without_sizes_is_unknown() {
    let attachment = Attachment::from_json(&json!({"type": "photo", "photo": {}}));
    assert_eq!(
        attachment,
        Attachment::Other {
            kind: "photo".to_string()
        }
    );
}

#[test]
fn test_transcript_path() {
    let path = transcript_path(Path::new("out"), 2_000_000_001, Format::Txt);
    assert_eq!(path, Path::new("out").join("2000000001.txt"));
}

#[tokio::test]
async fn test_render_peer_writes_transcript_next_to_dump() {
    let temp = tempdir().unwrap();

    let dump = PeerDump {
        peer_id: 1,
        account: json!({"id": 2}),
        info: json!({"peer": {"id": 1, "type": "user"}}),
        messages: vec![msg(1, MAR_5_1200, "hello"), msg(2, MAR_5_1207, "hi")],
        members: Members {
            users: vec![
                json!({"id": 1, "first_name": "Anna", "last_name": "K"}),
                json!({"id": 2, "first_name": "Boris", "last_name": "L"}),
            ],
            groups: Vec::new(),
        },
        dumped_at: Utc::now(),
    };
    save_peer(temp.path(), &dump).await.unwrap();

    let path = render_peer(temp.path(), 1, Format::Txt, &Utc).await.unwrap();
    let text = tokio::fs::read_to_string(&path).await.unwrap();

    assert!(path.ends_with("1.txt"));
    assert_eq!(
        text,
        "        [05 марта 2021]\n\
         [12:00] Anna K: hello\n\
         [12:07] Boris L: hi\n"
    );
}

#[tokio::test]
async fn test_render_peer_missing_dump() {
    let temp = tempdir().unwrap();
    let err = render_peer(temp.path(), 5, Format::Txt, &Utc).await.unwrap_err();
    assert!(err.to_string().contains("5.json"));
}
