//! Telegram export types.
//!
//! Telegram Desktop writes a single JSON document:
//!
//! ```json
//! {
//!   "name": "Chat Name",
//!   "messages": [
//!     {
//!       "id": 12345,
//!       "type": "message",
//!       "date": "2024-01-15T10:30:00",
//!       "date_unixtime": "1705314600",
//!       "from": "Sender Name",
//!       "text": "Hello" | ["Hello", {"type": "link", "text": "url"}],
//!       "photo": "photos/photo_1@15-01-2024_10-30-00.jpg",
//!       "file": "video_files/clip.mp4",
//!       "mime_type": "video/mp4",
//!       "location_information": {"latitude": -34.9, "longitude": -56.16}
//!     }
//!   ]
//! }
//! ```

use serde::Deserialize;
use serde_json::Value;

use crate::message::{Location, MessageRecord};
use crate::time::{parse_iso_datetime, parse_unix_timestamp};

/// Telegram export wrapper.
#[derive(Debug, Deserialize)]
pub struct TelegramExport {
    pub messages: Vec<TelegramRawMessage>,
}

/// One entry of the `messages` array.
#[derive(Debug, Default, Deserialize)]
pub struct TelegramRawMessage {
    pub id: Option<i64>,
    /// "message" or "service"
    #[serde(rename = "type")]
    pub msg_type: Option<String>,
    /// Local date-time, e.g. "2024-01-15T10:30:00"
    pub date: Option<String>,
    /// Unix timestamp as string
    pub date_unixtime: Option<String>,
    /// Sender name (regular messages)
    pub from: Option<String>,
    /// Actor name (service messages)
    pub actor: Option<String>,
    #[serde(default)]
    pub text: Option<MessageContent>,
    pub location_information: Option<LocationInformation>,
    pub photo: Option<String>,
    pub file: Option<String>,
    pub mime_type: Option<String>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct LocationInformation {
    pub latitude: f64,
    pub longitude: f64,
}

/// The `text` field: either a plain string or a list of rich-text segments.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    PlainText(String),
    Segments(Vec<Segment>),
}

/// One element of a segmented `text` field.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Segment {
    /// Unformatted run of text
    Plain(String),
    /// Typed entity: link, bold, mention, ...
    Entity {
        #[serde(rename = "type")]
        kind: String,
        #[serde(default)]
        text: String,
    },
    /// Anything else the exporter may emit
    Other(Value),
}

impl MessageContent {
    /// Returns the text used as message content.
    ///
    /// Plain text is taken as is. For segmented text only `link` entities
    /// contribute, and the last link wins.
    pub fn extract(&self) -> String {
        match self {
            MessageContent::PlainText(text) => text.clone(),
            MessageContent::Segments(segments) => segments
                .iter()
                .filter_map(|segment| match segment {
                    Segment::Entity { kind, text } if kind == "link" => Some(text.as_str()),
                    Segment::Entity { .. } | Segment::Plain(_) | Segment::Other(_) => None,
                })
                .last()
                .unwrap_or_default()
                .to_string(),
        }
    }
}

/// Converts a raw Telegram entry into a message record.
///
/// Unreadable dates leave the record without a time.
pub fn parse_telegram_message(raw: &TelegramRawMessage) -> MessageRecord {
    let username = raw
        .from
        .as_deref()
        .or(raw.actor.as_deref())
        .unwrap_or_default();
    let text = raw.text.as_ref().map(MessageContent::extract).unwrap_or_default();

    let mut record = MessageRecord::new(username, text).with_optional_time(telegram_time(raw));

    if raw.msg_type.as_deref() == Some("service") {
        record = record.as_system();
    }
    if let Some(info) = raw.location_information {
        record = record.with_location(Location::new(info.latitude, info.longitude));
    }
    if let Some(photo) = raw.photo.as_deref() {
        record = record.with_file(photo);
    }
    if let Some(file) = raw.file.as_deref() {
        if raw.mime_type.as_deref() == Some("video/mp4") {
            record = record.with_file(file);
        }
    }
    record
}

/// Prefers `date_unixtime`, which is zone-independent, over `date`.
fn telegram_time(raw: &TelegramRawMessage) -> Option<chrono::DateTime<chrono::Utc>> {
    if let Some(Ok(time)) = raw.date_unixtime.as_deref().map(parse_unix_timestamp) {
        return Some(time);
    }

    match raw.date.as_deref().map(parse_iso_datetime)? {
        Ok(time) => Some(time),
        Err(err) => {
            tracing::debug!(id = ?raw.id, error = %err, "keeping Telegram message without time");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(value: Value) -> TelegramRawMessage {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_extract_plain_text() {
        let content: MessageContent = serde_json::from_value(json!("Hello world")).unwrap();
        assert_eq!(content, MessageContent::PlainText("Hello world".into()));
        assert_eq!(content.extract(), "Hello world");
    }

    #[test]
    fn test_extract_only_links_contribute() {
        let content: MessageContent = serde_json::from_value(json!([
            "Check this: ",
            {"type": "bold", "text": "important"},
            {"type": "link", "text": "https://example.com"}
        ]))
        .unwrap();
        assert_eq!(content.extract(), "https://example.com");
    }

    #[test]
    fn test_extract_last_link_wins() {
        let content: MessageContent = serde_json::from_value(json!([
            {"type": "link", "text": "first"},
            " and ",
            {"type": "link", "text": "second"}
        ]))
        .unwrap();
        assert_eq!(content.extract(), "second");
    }

    #[test]
    fn test_extract_segments_without_link() {
        let content: MessageContent =
            serde_json::from_value(json!(["plain", {"type": "italic", "text": "x"}, 5])).unwrap();
        assert_eq!(content.extract(), "");
    }

    #[test]
    fn test_parse_location_message() {
        let msg = parse_telegram_message(&raw(json!({
            "id": 2, "type": "message", "date": "2024-01-15T10:30:01", "from": "Alice",
            "text": "", "location_information": {"latitude": 1.0, "longitude": 2.0}
        })));
        assert_eq!(msg.location, Some(Location::new(1.0, 2.0)));
        assert_eq!(msg.username, "Alice");
        assert!(msg.time.is_some());
    }

    #[test]
    fn test_parse_media() {
        let photo = parse_telegram_message(&raw(json!({
            "type": "message", "from": "A", "text": "", "photo": "photos/photo_1.jpg"
        })));
        assert_eq!(photo.file.as_deref(), Some("photo_1.jpg"));

        let video = parse_telegram_message(&raw(json!({
            "type": "message", "from": "A", "text": "",
            "file": "video_files/clip.mp4", "mime_type": "video/mp4"
        })));
        assert_eq!(video.file.as_deref(), Some("clip.mp4"));

        let voice = parse_telegram_message(&raw(json!({
            "type": "message", "from": "A", "text": "",
            "file": "voice_messages/audio.ogg", "mime_type": "audio/ogg"
        })));
        assert!(voice.file.is_none());
    }

    #[test]
    fn test_unixtime_preferred_then_date() {
        let msg = parse_telegram_message(&raw(json!({
            "type": "message", "from": "A", "text": "x",
            "date": "2000-01-01T00:00:00", "date_unixtime": "1705314600"
        })));
        assert_eq!(msg.time.unwrap().timestamp(), 1705314600);

        let msg = parse_telegram_message(&raw(json!({
            "type": "message", "from": "A", "text": "x",
            "date": "2024-01-15T10:30:00", "date_unixtime": "garbage"
        })));
        assert_eq!(msg.time.unwrap().timestamp(), 1705314600);
    }

    #[test]
    fn test_malformed_date_keeps_record() {
        let msg = parse_telegram_message(&raw(json!({
            "type": "message", "from": "A", "text": "still here", "date": "yesterday"
        })));
        assert!(msg.time.is_none());
        assert_eq!(msg.message, "still here");
    }

    #[test]
    fn test_service_message_uses_actor() {
        let msg = parse_telegram_message(&raw(json!({
            "type": "service", "actor": "Bob", "action": "pin_message", "text": ""
        })));
        assert_eq!(msg.username, "Bob");
        assert!(msg.system);
    }
}
