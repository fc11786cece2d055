//! Platform-specific chat export parsers.
//!
//! Each parser implements the [`Parser`](crate::parser::Parser) trait.
//! Use [`create_parser`](crate::parser::create_parser) to pick one by
//! [`Platform`](crate::parser::Platform), or
//! [`detect_parser`](crate::detect::detect_parser) to choose by content.

#[cfg(feature = "telegram")]
mod telegram;

#[cfg(feature = "whatsapp")]
mod whatsapp;

#[cfg(feature = "signal")]
mod signal;

#[cfg(feature = "telegram")]
pub use telegram::TelegramParser;

#[cfg(feature = "whatsapp")]
pub use whatsapp::WhatsAppParser;

#[cfg(feature = "signal")]
pub use signal::SignalParser;
