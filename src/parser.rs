//! Unified parser trait for chat exports.
//!
//! Every supported application implements [`Parser`]. A parser both
//! recognises its own export ([`Parser::detect`]) and turns it into a
//! [`ParseOutput`]: the GeoJSON features plus the full message index.
//!
//! # Example
//!
//! ```rust
//! use chatmap::config::ParseConfig;
//! use chatmap::parser::{Platform, create_parser};
//!
//! let parser = create_parser(Platform::Telegram);
//! let export = r#"{"messages": [
//!     {"id": 1, "type": "message", "date": "2024-01-15T10:30:00", "from": "Alice", "text": "hi"}
//! ]}"#;
//!
//! assert!(parser.detect(export));
//! let output = parser.parse_str(export, &ParseConfig::default())?.unwrap();
//! assert_eq!(output.messages.len(), 1);
//! assert!(output.geojson.is_empty());
//! # Ok::<(), chatmap::ChatmapError>(())
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::ParseConfig;
use crate::error::ChatmapError;
use crate::geojson::FeatureCollection;
use crate::index::MessageIndex;
use crate::matcher::resolve_features;
use crate::message::MessageRecord;

/// Supported messaging applications.
///
/// ```rust
/// use chatmap::parser::Platform;
/// use std::str::FromStr;
///
/// assert_eq!(Platform::from_str("wa").unwrap(), Platform::WhatsApp);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum Platform {
    /// Telegram Desktop JSON exports
    #[serde(alias = "tg")]
    Telegram,

    /// WhatsApp TXT exports (iOS and Android)
    #[serde(alias = "wa")]
    WhatsApp,

    /// Signal exports produced by signal-export
    #[serde(alias = "sg")]
    Signal,
}

impl Platform {
    /// Returns the default file extension for exports from this platform.
    pub fn default_extension(&self) -> &'static str {
        match self {
            Platform::Telegram => "json",
            Platform::WhatsApp => "txt",
            Platform::Signal => "md",
        }
    }

    /// Returns all platform names including aliases.
    pub fn all_names() -> &'static [&'static str] {
        &["telegram", "tg", "whatsapp", "wa", "signal", "sg"]
    }

    /// Returns all platforms in detection priority order.
    ///
    /// Telegram comes first because JSON is unambiguous. Signal precedes
    /// WhatsApp since its ISO-dated lines are the stricter pattern.
    pub fn all() -> &'static [Platform] {
        &[Platform::Telegram, Platform::Signal, Platform::WhatsApp]
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Platform::Telegram => write!(f, "Telegram"),
            Platform::WhatsApp => write!(f, "WhatsApp"),
            Platform::Signal => write!(f, "Signal"),
        }
    }
}

impl std::str::FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "telegram" | "tg" => Ok(Platform::Telegram),
            "whatsapp" | "wa" => Ok(Platform::WhatsApp),
            "signal" | "sg" => Ok(Platform::Signal),
            _ => Err(format!(
                "Unknown platform: '{}'. Expected one of: {}",
                s,
                Platform::all_names().join(", ")
            )),
        }
    }
}

/// Result of parsing one export.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParseOutput {
    /// One feature per location-bearing record
    pub geojson: FeatureCollection,
    /// Every record of the export, addressable by id
    pub messages: MessageIndex,
}

impl ParseOutput {
    /// Resolves the locations of a fully built index into features.
    ///
    /// The index must be complete: matching looks both backward and
    /// forward from each location.
    pub fn resolve(
        mut messages: MessageIndex,
        config: &ParseConfig,
        predicate: impl Fn(&MessageRecord) -> bool,
    ) -> Self {
        let geojson = resolve_features(&mut messages, config.msg_position, predicate);
        Self { geojson, messages }
    }
}

/// Unified trait for chat export parsers.
///
/// Implementors provide [`detect`](Parser::detect),
/// [`parse_index`](Parser::parse_index) and the identifiers; feature
/// resolution and file handling come from the default methods.
pub trait Parser: Send + Sync {
    /// Returns the human-readable name of this parser.
    fn name(&self) -> &'static str;

    /// Returns the platform this parser handles.
    fn platform(&self) -> Platform;

    /// Returns `true` if `content` looks like an export of this platform.
    ///
    /// Must be side-effect free and must not panic on any input.
    fn detect(&self, content: &str) -> bool;

    /// Reads every entry of `content` into a message index.
    ///
    /// Called with non-blank content only.
    fn parse_index(&self, content: &str, config: &ParseConfig) -> Result<MessageIndex, ChatmapError>;

    /// Whether `record` may be attached to a location as its context.
    fn is_context_candidate(&self, record: &MessageRecord, _config: &ParseConfig) -> bool {
        record.is_context_candidate()
    }

    /// Parses an export held in memory.
    ///
    /// Returns `Ok(None)` for empty or blank input, which callers should
    /// treat as "no features" rather than as a failure.
    fn parse_str(
        &self,
        content: &str,
        config: &ParseConfig,
    ) -> Result<Option<ParseOutput>, ChatmapError> {
        if content.trim().is_empty() {
            return Ok(None);
        }
        let messages = self.parse_index(content, config)?;
        Ok(Some(ParseOutput::resolve(messages, config, |r| {
            self.is_context_candidate(r, config)
        })))
    }

    /// Parses an export file.
    fn parse(
        &self,
        path: &Path,
        config: &ParseConfig,
    ) -> Result<Option<ParseOutput>, ChatmapError> {
        let content = std::fs::read_to_string(path)?;
        self.parse_str(&content, config).map_err(|e| e.with_path(path))
    }
}

/// Creates a parser for the specified platform.
///
/// # Panics
///
/// Panics if the corresponding parser feature is not enabled.
pub fn create_parser(platform: Platform) -> Box<dyn Parser> {
    match platform {
        #[cfg(feature = "telegram")]
        Platform::Telegram => Box::new(crate::parsers::TelegramParser::new()),
        #[cfg(feature = "whatsapp")]
        Platform::WhatsApp => Box::new(crate::parsers::WhatsAppParser::new()),
        #[cfg(feature = "signal")]
        Platform::Signal => Box::new(crate::parsers::SignalParser::new()),
        #[allow(unreachable_patterns)]
        _ => panic!(
            "Parser for {:?} is not enabled. Enable the corresponding feature.",
            platform
        ),
    }
}

/// Returns the parsers compiled into this build, in detection order.
pub fn enabled_parsers() -> Vec<Box<dyn Parser>> {
    Platform::all()
        .iter()
        .filter(|platform| is_enabled(**platform))
        .map(|platform| create_parser(*platform))
        .collect()
}

fn is_enabled(platform: Platform) -> bool {
    match platform {
        Platform::Telegram => cfg!(feature = "telegram"),
        Platform::WhatsApp => cfg!(feature = "whatsapp"),
        Platform::Signal => cfg!(feature = "signal"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_platform_from_str() {
        assert_eq!(Platform::from_str("telegram").unwrap(), Platform::Telegram);
        assert_eq!(Platform::from_str("TG").unwrap(), Platform::Telegram);
        assert_eq!(Platform::from_str("whatsapp").unwrap(), Platform::WhatsApp);
        assert_eq!(Platform::from_str("signal").unwrap(), Platform::Signal);
        assert_eq!(Platform::from_str("sg").unwrap(), Platform::Signal);
        assert!(Platform::from_str("instagram").is_err());
    }

    #[test]
    fn test_platform_display() {
        assert_eq!(Platform::Telegram.to_string(), "Telegram");
        assert_eq!(Platform::WhatsApp.to_string(), "WhatsApp");
        assert_eq!(Platform::Signal.to_string(), "Signal");
    }

    #[test]
    fn test_platform_serde_alias() {
        let platform: Platform = serde_json::from_str("\"wa\"").unwrap();
        assert_eq!(platform, Platform::WhatsApp);
        assert_eq!(serde_json::to_string(&Platform::Signal).unwrap(), "\"signal\"");
    }

    #[test]
    fn test_platform_all_order() {
        assert_eq!(
            Platform::all(),
            &[Platform::Telegram, Platform::Signal, Platform::WhatsApp]
        );
    }

    #[cfg(feature = "full")]
    #[test]
    fn test_create_parser() {
        for platform in Platform::all() {
            let parser = create_parser(*platform);
            assert_eq!(parser.platform(), *platform);
            assert_eq!(parser.name(), platform.to_string());
        }
        assert_eq!(enabled_parsers().len(), 3);
    }

    #[cfg(feature = "telegram")]
    #[test]
    fn test_blank_input_is_none() {
        let parser = create_parser(Platform::Telegram);
        assert!(parser.parse_str("", &ParseConfig::default()).unwrap().is_none());
        assert!(parser.parse_str("  \n ", &ParseConfig::default()).unwrap().is_none());
    }
}
