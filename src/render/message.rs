//! Messages prepared for rendering

use super::attachment::Attachment;
use crate::error::{Error, Result};
use crate::types::{JsonValue, MessageRecord};
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, TimeZone};
use std::collections::HashMap;

/// Month names in the genitive case, as used in a date ("5 марта")
const MONTHS: [&str; 12] = [
    "января",
    "февраля",
    "марта",
    "апреля",
    "мая",
    "июня",
    "июля",
    "августа",
    "сентября",
    "октября",
    "ноября",
    "декабря",
];

/// A message with its sender resolved and its time in the rendering zone
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    /// `from_id` of the message
    pub sender: i64,
    /// Display name of the sender
    pub name: String,
    /// Wall-clock send time
    pub sent_at: NaiveDateTime,
    /// Message text, possibly empty
    pub text: String,
    /// Forwarded messages, oldest first
    pub forwarded: Vec<Message>,
    /// Attachments in API order
    pub attachments: Vec<Attachment>,
}

impl Message {
    /// Build from a raw message record.
    ///
    /// Senders missing from `names` are shown as `id<from_id>`.
    pub fn from_json<Tz: TimeZone>(
        json: &JsonValue,
        names: &HashMap<i64, String>,
        tz: &Tz,
    ) -> Result<Self> {
        let sender = json["from_id"]
            .as_i64()
            .ok_or_else(|| Error::render("message without from_id"))?;

        let sent_at = json["date"]
            .as_i64()
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
            .ok_or_else(|| Error::render(format!("message from {sender} has no valid date")))?
            .with_timezone(tz)
            .naive_local();

        let forwarded = match json["fwd_messages"].as_array() {
            Some(forwarded) => parse_messages(forwarded, names, tz)?,
            None => Vec::new(),
        };

        let attachments = json["attachments"]
            .as_array()
            .map(|items| items.iter().map(Attachment::from_json).collect())
            .unwrap_or_default();

        Ok(Self {
            sender,
            name: names
                .get(&sender)
                .cloned()
                .unwrap_or_else(|| format!("id{sender}")),
            sent_at,
            text: json["text"].as_str().unwrap_or_default().to_string(),
            forwarded,
            attachments,
        })
    }

    /// Calendar day the message was sent on
    pub fn day(&self) -> NaiveDate {
        self.sent_at.date()
    }

    /// Day header text, e.g. `05 марта 2021`
    pub fn full_date(&self) -> String {
        let month = MONTHS[self.sent_at.month0() as usize];
        format!(
            "{:02} {} {}",
            self.sent_at.day(),
            month,
            self.sent_at.year()
        )
    }

    /// Send time as `HH:MM`
    pub fn time(&self) -> String {
        self.sent_at.format("%H:%M").to_string()
    }
}

/// Build every message of a list, keeping its order
pub fn parse_messages<Tz: TimeZone>(
    records: &[MessageRecord],
    names: &HashMap<i64, String>,
    tz: &Tz,
) -> Result<Vec<Message>> {
    records
        .iter()
        .map(|record| Message::from_json(record, names, tz))
        .collect()
}
