//! Telegram JSON export parser.

use serde_json::Value;

use crate::config::ParseConfig;
use crate::error::ChatmapError;
use crate::index::MessageIndex;
use crate::parser::{Parser, Platform};
use crate::parsing::strip_bom;
use crate::parsing::telegram::{TelegramExport, parse_telegram_message};

/// Parser for Telegram Desktop JSON exports.
///
/// Every entry of the `messages` array becomes a record, service entries
/// included, so ids match the array positions. Entries with
/// `location_information` become features.
///
/// # Example
///
/// ```rust
/// use chatmap::config::{MsgPosition, ParseConfig};
/// use chatmap::parser::Parser;
/// use chatmap::parsers::TelegramParser;
///
/// let export = r#"{"messages": [
///   {"id": 1, "type": "message", "date": "2024-01-15T10:30:00", "from": "Alice",
///    "text": [{"type": "link", "text": "hello"}]},
///   {"id": 2, "type": "message", "date": "2024-01-15T10:30:01", "from": "Alice",
///    "text": "", "location_information": {"latitude": 1.0, "longitude": 2.0}}
/// ]}"#;
///
/// let config = ParseConfig::new().with_msg_position(MsgPosition::Before);
/// let output = TelegramParser::new().parse_str(export, &config)?.unwrap();
/// let feature = &output.geojson.features[0];
/// assert_eq!(feature.geometry.coordinates, [2.0, 1.0]);
/// assert_eq!(feature.properties.message.as_deref(), Some("hello"));
/// assert_eq!(feature.properties.related, Some(0));
/// # Ok::<(), chatmap::ChatmapError>(())
/// ```
pub struct TelegramParser;

impl TelegramParser {
    pub fn new() -> Self {
        Self
    }
}

impl Default for TelegramParser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser for TelegramParser {
    fn name(&self) -> &'static str {
        "Telegram"
    }

    fn platform(&self) -> Platform {
        Platform::Telegram
    }

    /// Accepts JSON with a top-level `messages` array. Broken JSON that
    /// still mentions `"messages"` is accepted too, so that it is reported
    /// as a Telegram parse failure instead of an unknown format.
    fn detect(&self, content: &str) -> bool {
        let content = strip_bom(content);
        if !content.trim_start().starts_with('{') {
            return false;
        }
        match serde_json::from_str::<Value>(content) {
            Ok(value) => value.get("messages").is_some_and(Value::is_array),
            Err(_) => content.contains("\"messages\""),
        }
    }

    fn parse_index(
        &self,
        content: &str,
        _config: &ParseConfig,
    ) -> Result<MessageIndex, ChatmapError> {
        let export: TelegramExport = serde_json::from_str(strip_bom(content))
            .map_err(|e| ChatmapError::telegram_parse(e, None))?;

        let mut index = MessageIndex::with_capacity(export.messages.len());
        for raw in &export.messages {
            index.push(parse_telegram_message(raw));
        }
        Ok(index)
    }
}
