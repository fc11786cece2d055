//! Signal export parser.
//!
//! Signal has no built-in chat export; the de-facto tool is
//! `signal-export`, which writes one markdown file per conversation:
//!
//! ```text
//! [2024-03-02 09:05] Alice: On my way
//! [2024-03-02 09:06] Alice: https://maps.google.com/maps?q=-34.9%2C-56.16
//! [2024-03-02 09:07] Bob: ![image.jpg](./media/2024-03-02_09-07.jpg)
//! ```
//!
//! Lines not starting with a timestamp continue the previous message.

use std::sync::LazyLock;

use regex::Regex;

use crate::config::ParseConfig;
use crate::error::ChatmapError;
use crate::index::MessageIndex;
use crate::message::MessageRecord;
use crate::parser::{Parser, Platform};
use crate::parsing::location::{parse_location, parse_markdown_attachment};
use crate::parsing::strip_bom;
use crate::time::parse_signal_datetime;

/// `[YYYY-MM-DD HH:MM(:SS)] Sender: text`
static LINE_PATTERN: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"^\[(\d{4}-\d{2}-\d{2} \d{2}:\d{2}(?::\d{2})?)\]\s([^:]+):\s?(.*)$").ok()
});

/// Parser for Signal markdown exports.
///
/// # Example
///
/// ```rust
/// use chatmap::config::{MsgPosition, ParseConfig};
/// use chatmap::parser::Parser;
/// use chatmap::parsers::SignalParser;
///
/// let chat = "\
/// [2024-03-02 09:05] Alice: https://maps.google.com/maps?q=-34.9%2C-56.16
/// [2024-03-02 09:07] Bob: ![image.jpg](./media/2024-03-02_09-07.jpg)
/// ";
///
/// let config = ParseConfig::new().with_msg_position(MsgPosition::After);
/// let output = SignalParser::new().parse_str(chat, &config)?.unwrap();
/// let props = &output.geojson.features[0].properties;
/// assert_eq!(props.file.as_deref(), Some("2024-03-02_09-07.jpg"));
/// assert_eq!(props.related, Some(1));
/// # Ok::<(), chatmap::ChatmapError>(())
/// ```
pub struct SignalParser;

impl SignalParser {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SignalParser {
    fn default() -> Self {
        Self::new()
    }
}

fn line_pattern() -> Result<&'static Regex, ChatmapError> {
    LINE_PATTERN
        .as_ref()
        .ok_or_else(|| ChatmapError::signal_parse("invalid line pattern", None))
}

impl Parser for SignalParser {
    fn name(&self) -> &'static str {
        "Signal"
    }

    fn platform(&self) -> Platform {
        Platform::Signal
    }

    /// Accepts content where at least half of the sampled lines, and at
    /// least one, are timestamped Signal lines.
    fn detect(&self, content: &str) -> bool {
        let Ok(pattern) = line_pattern() else {
            return false;
        };
        let sample: Vec<&str> = strip_bom(content)
            .lines()
            .filter(|line| !line.trim().is_empty())
            .take(ParseConfig::default().detect_sample_lines)
            .collect();
        let hits = sample.iter().filter(|line| pattern.is_match(line)).count();
        hits > 0 && hits * 2 >= sample.len()
    }

    fn parse_index(
        &self,
        content: &str,
        _config: &ParseConfig,
    ) -> Result<MessageIndex, ChatmapError> {
        let pattern = line_pattern()?;
        let mut index = MessageIndex::new();

        for line in strip_bom(content).lines() {
            let line = line.trim_end();
            if line.trim().is_empty() {
                continue;
            }

            let Some(caps) = pattern.captures(line) else {
                if let Some(last) = index.last_mut() {
                    last.message.push('\n');
                    last.message.push_str(line);
                    if last.location.is_none() {
                        last.location = parse_location(line);
                    }
                    if last.file.is_none() {
                        last.file = parse_markdown_attachment(line);
                    }
                }
                continue;
            };

            let stamp = caps.get(1).map_or("", |m| m.as_str());
            let sender = caps.get(2).map_or("", |m| m.as_str().trim());
            let text = caps.get(3).map_or("", |m| m.as_str());

            let time = match parse_signal_datetime(stamp) {
                Ok(time) => Some(time),
                Err(err) => {
                    tracing::debug!(stamp, error = %err, "keeping Signal line without time");
                    None
                }
            };

            let mut record = MessageRecord::new(sender, text).with_optional_time(time);
            if let Some(location) = parse_location(text) {
                record = record.with_location(location);
            }
            if let Some(file) = parse_markdown_attachment(text) {
                record = record.with_file(&file);
            }
            index.push(record);
        }

        Ok(index)
    }
}
