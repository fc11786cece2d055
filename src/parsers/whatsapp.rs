//! `WhatsApp` TXT export parser.
//!
//! `WhatsApp` exports vary by locale. This parser auto-detects the format
//! by analyzing the first lines of the file
//! ([`ParseConfig::detect_sample_lines`]).
//!
//! Supported formats:
//! - US: `[1/15/24, 10:30:45 AM] Sender: Message`
//! - US Android: `1/15/24, 9:05 PM - Sender: Message`
//! - EU: `[15.01.24, 10:30:45] Sender: Message`
//! - EU2: `15/01/2024, 10:30 - Sender: Message`
//! - RU: `15.01.2024, 10:30 - Sender: Message`
//!
//! Shared locations appear as map links (`location: https://maps.google.com/?q=lat,lon`)
//! and attachments as `<attached: X>` or `X (file attached)`.

use chrono::{DateTime, Utc};

use crate::config::ParseConfig;
use crate::error::ChatmapError;
use crate::index::MessageIndex;
use crate::message::MessageRecord;
use crate::parser::{Parser, Platform};
use crate::parsing::location::{parse_location, parse_whatsapp_attachment};
use crate::parsing::whatsapp::{
    DateFormat, LinePatterns, clean_line, detect_whatsapp_format, is_whatsapp_system_message,
    parse_whatsapp_timestamp,
};

/// Parser for `WhatsApp` TXT exports.
///
/// # Example
///
/// ```rust
/// use chatmap::config::ParseConfig;
/// use chatmap::parser::Parser;
/// use chatmap::parsers::WhatsAppParser;
///
/// let chat = "\
/// [1/15/24, 10:30:00 AM] Alice: I'm at the station
/// [1/15/24, 10:30:05 AM] Alice: location: https://maps.google.com/?q=51.5074,-0.1278
/// ";
///
/// let output = WhatsAppParser::new().parse_str(chat, &ParseConfig::default())?.unwrap();
/// let feature = &output.geojson.features[0];
/// assert_eq!(feature.geometry.coordinates, [-0.1278, 51.5074]);
/// assert_eq!(feature.properties.message.as_deref(), Some("I'm at the station"));
/// # Ok::<(), chatmap::ChatmapError>(())
/// ```
pub struct WhatsAppParser;

impl WhatsAppParser {
    pub fn new() -> Self {
        Self
    }
}

impl Default for WhatsAppParser {
    fn default() -> Self {
        Self::new()
    }
}

fn sample_lines(content: &str, limit: usize) -> Vec<&str> {
    content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .take(limit)
        .collect()
}

impl Parser for WhatsAppParser {
    fn name(&self) -> &'static str {
        "WhatsApp"
    }

    fn platform(&self) -> Platform {
        Platform::WhatsApp
    }

    fn detect(&self, content: &str) -> bool {
        let sample = sample_lines(content, ParseConfig::default().detect_sample_lines);
        detect_whatsapp_format(&sample).is_some()
    }

    fn parse_index(
        &self,
        content: &str,
        config: &ParseConfig,
    ) -> Result<MessageIndex, ChatmapError> {
        // Step 1: Auto-detect format from the first non-empty lines
        let sample = sample_lines(content, config.detect_sample_lines);
        let format = detect_whatsapp_format(&sample).ok_or_else(|| {
            ChatmapError::invalid_format(
                "WhatsApp",
                "Could not detect WhatsApp export format. \
                 Make sure the file is a valid WhatsApp chat export.",
            )
        })?;

        // Step 2: Compile patterns for detected format
        let patterns = LinePatterns::new(format).ok_or_else(|| {
            ChatmapError::whatsapp_parse(format!("invalid line pattern for {format:?}"), None)
        })?;

        // Step 3: Parse all lines
        let mut index = MessageIndex::new();

        for raw_line in content.lines() {
            let line = clean_line(raw_line);
            if line.trim().is_empty() {
                continue;
            }

            if let Some(caps) = patterns.message.captures(&line) {
                let date_str = caps.get(1).map_or("", |m| m.as_str());
                let time_str = caps.get(2).map_or("", |m| m.as_str());
                let sender = caps.get(3).map_or("", |m| m.as_str().trim());
                let text = caps.get(4).map_or("", |m| m.as_str());

                let mut record = MessageRecord::new(sender, text)
                    .with_optional_time(line_time(date_str, time_str, format));
                if let Some(location) = parse_location(text) {
                    record = record.with_location(location);
                }
                if let Some(file) = parse_whatsapp_attachment(text) {
                    record = record.with_file(&file);
                }
                if config.skip_system_messages && is_whatsapp_system_message(sender, text) {
                    record = record.as_system();
                }
                index.push(record);
            } else if let Some(caps) = patterns.notice.captures(&line) {
                // Notice without a sender: "Alice created group ..."
                let date_str = caps.get(1).map_or("", |m| m.as_str());
                let time_str = caps.get(2).map_or("", |m| m.as_str());
                let text = caps.get(3).map_or("", |m| m.as_str());

                let mut record = MessageRecord::new("", text)
                    .with_optional_time(line_time(date_str, time_str, format));
                if config.skip_system_messages {
                    record = record.as_system();
                }
                index.push(record);
            } else if let Some(last) = index.last_mut() {
                // Continuation of previous message (multiline)
                last.message.push('\n');
                last.message.push_str(&line);
                if last.location.is_none() {
                    last.location = parse_location(&line);
                }
            }
            // If no previous message, skip orphan line
        }

        Ok(index)
    }
}

fn line_time(
    date_str: &str,
    time_str: &str,
    format: DateFormat,
) -> Option<DateTime<Utc>> {
    match parse_whatsapp_timestamp(date_str, time_str, format) {
        Ok(time) => Some(time),
        Err(err) => {
            tracing::debug!(date = date_str, time = time_str, error = %err, "keeping WhatsApp line without time");
            None
        }
    }
}
