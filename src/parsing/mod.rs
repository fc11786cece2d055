//! Shared parsing utilities for all platforms.

pub mod location;

#[cfg(feature = "telegram")]
pub mod telegram;

#[cfg(feature = "whatsapp")]
pub mod whatsapp;

/// Drops a leading UTF-8 byte order mark, which editors on Windows add
/// when re-saving an export.
pub fn strip_bom(content: &str) -> &str {
    content.strip_prefix('\u{feff}').unwrap_or(content)
}

pub use location::{
    is_media_file, parse_location, parse_markdown_attachment, parse_whatsapp_attachment,
};

#[cfg(feature = "telegram")]
pub use telegram::{MessageContent, Segment, TelegramRawMessage, parse_telegram_message};

#[cfg(feature = "whatsapp")]
pub use whatsapp::{
    DateFormat as WhatsAppDateFormat, detect_whatsapp_format, is_whatsapp_system_message,
    parse_whatsapp_timestamp,
};
