//! Format detection.
//!
//! Picks the parser for a raw export by asking every enabled parser, in
//! [`Platform::all`] order, whether it recognises the content. Detection
//! never panics and never fails on malformed input; content nobody
//! claims yields [`ChatmapError::UnrecognizedFormat`].
//!
//! # Example
//!
//! ```rust
//! use chatmap::detect::detect_platform;
//! use chatmap::parser::Platform;
//!
//! assert_eq!(detect_platform(r#"{"messages": []}"#)?, Platform::Telegram);
//! assert_eq!(detect_platform("[2024-03-02 09:05] Alice: hi")?, Platform::Signal);
//! assert_eq!(detect_platform("15/01/2024, 10:30 - Alice: hi")?, Platform::WhatsApp);
//! assert!(detect_platform("plain notes").is_err());
//! # Ok::<(), chatmap::ChatmapError>(())
//! ```

use crate::error::{ChatmapError, Result};
use crate::parser::{Parser, Platform, enabled_parsers};

/// Returns the parser whose format matches `content`.
pub fn detect_parser(content: &str) -> Result<Box<dyn Parser>> {
    enabled_parsers()
        .into_iter()
        .find(|parser| parser.detect(content))
        .ok_or_else(|| ChatmapError::unrecognized_format(None))
}

/// Returns the platform whose format matches `content`.
pub fn detect_platform(content: &str) -> Result<Platform> {
    detect_parser(content).map(|parser| parser.platform())
}
