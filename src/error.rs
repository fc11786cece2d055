//! Unified error types for chatmap.
//!
//! All fallible operations return [`ChatmapError`]. Most variants never
//! escape a single file: the merger is the isolation boundary and turns a
//! failed file into a skipped entry of its report instead of failing the
//! whole merge.
//!
//! | Condition | Variant | Handled by |
//! |-----------|---------|------------|
//! | No parser recognises the content | [`ChatmapError::UnrecognizedFormat`] | merger skips the file |
//! | Content does not decode as the detected format | [`ChatmapError::Parse`] | merger skips the file |
//! | A single timestamp cannot be read | [`ChatmapError::MalformedTimestamp`] | parser keeps the record without a time |
//! | Empty input | not an error | parser returns `Ok(None)` |

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// A specialized [`Result`] type for chatmap operations.
///
/// # Example
///
/// ```rust
/// use chatmap::error::Result;
/// use chatmap::FeatureCollection;
///
/// fn build() -> Result<FeatureCollection> {
///     Ok(FeatureCollection::new())
/// }
/// ```
pub type Result<T> = std::result::Result<T, ChatmapError>;

/// The error type for all chatmap operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ChatmapError {
    /// An I/O error occurred while reading an export.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// No supported application matches the content.
    #[error("Unrecognized chat export format{}", file.as_ref().map(|f| format!(" (file: {f})")).unwrap_or_default())]
    UnrecognizedFormat {
        /// The file name, if known
        file: Option<String>,
    },

    /// The content could not be decoded as the detected format.
    #[error("Failed to parse {format} export{}: {source}", path.as_ref().map(|p| format!(" (file: {})", p.display())).unwrap_or_default())]
    Parse {
        /// The format being parsed (e.g., "Telegram JSON", "WhatsApp TXT")
        format: &'static str,
        /// The underlying parse error
        #[source]
        source: ParseErrorKind,
        /// The file path, if available
        path: Option<PathBuf>,
    },

    /// The file format doesn't match the expected structure.
    #[error("Invalid {format} format: {message}")]
    InvalidFormat {
        /// The format that was expected
        format: &'static str,
        /// Description of what's wrong
        message: String,
    },

    /// A timestamp could not be normalized.
    ///
    /// Parsers never fail a file because of this; the record keeps an
    /// absent time instead.
    #[error("Malformed timestamp '{input}'")]
    MalformedTimestamp {
        /// The raw timestamp text
        input: String,
    },

    /// Unknown message position policy.
    #[error("Invalid message position '{input}'. Expected one of: closest, before, after")]
    InvalidPosition {
        /// The value that was provided
        input: String,
    },

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Input bytes are not valid UTF-8.
    #[error("UTF-8 encoding error in {context}: {source}")]
    Utf8 {
        /// Description of where the error occurred
        context: String,
        /// The underlying UTF-8 error
        #[source]
        source: std::string::FromUtf8Error,
    },
}

/// Kinds of parse errors that can occur.
#[derive(Debug, Error)]
pub enum ParseErrorKind {
    /// JSON decoding error
    #[error("{0}")]
    Json(#[from] serde_json::Error),
    /// Line pattern mismatch
    #[error("{0}")]
    Pattern(String),
    /// Generic parsing error
    #[error("{0}")]
    Other(String),
}

impl From<std::string::FromUtf8Error> for ChatmapError {
    fn from(err: std::string::FromUtf8Error) -> Self {
        ChatmapError::Utf8 {
            context: "input decoding".to_string(),
            source: err,
        }
    }
}

// ============================================================================
// Convenience constructors
// ============================================================================

impl ChatmapError {
    /// Creates a parse error for Telegram format.
    pub fn telegram_parse(source: serde_json::Error, path: Option<PathBuf>) -> Self {
        ChatmapError::Parse {
            format: "Telegram JSON",
            source: ParseErrorKind::Json(source),
            path,
        }
    }

    /// Creates a parse error for WhatsApp format.
    pub fn whatsapp_parse(message: impl Into<String>, path: Option<PathBuf>) -> Self {
        ChatmapError::Parse {
            format: "WhatsApp TXT",
            source: ParseErrorKind::Pattern(message.into()),
            path,
        }
    }

    /// Creates a parse error for Signal format.
    pub fn signal_parse(message: impl Into<String>, path: Option<PathBuf>) -> Self {
        ChatmapError::Parse {
            format: "Signal Markdown",
            source: ParseErrorKind::Pattern(message.into()),
            path,
        }
    }

    /// Creates an unrecognized format error.
    pub fn unrecognized_format(file: Option<String>) -> Self {
        ChatmapError::UnrecognizedFormat { file }
    }

    /// Creates an invalid format error.
    pub fn invalid_format(format: &'static str, message: impl Into<String>) -> Self {
        ChatmapError::InvalidFormat {
            format,
            message: message.into(),
        }
    }

    /// Creates a malformed timestamp error.
    pub fn malformed_timestamp(input: impl Into<String>) -> Self {
        ChatmapError::MalformedTimestamp {
            input: input.into(),
        }
    }

    /// Creates an invalid position error.
    pub fn invalid_position(input: impl Into<String>) -> Self {
        ChatmapError::InvalidPosition {
            input: input.into(),
        }
    }

    /// Attaches a file path to a parse error. Other variants pass through.
    #[must_use]
    pub fn with_path(self, file: impl Into<PathBuf>) -> Self {
        match self {
            ChatmapError::Parse { format, source, .. } => ChatmapError::Parse {
                format,
                source,
                path: Some(file.into()),
            },
            other => other,
        }
    }

    /// Returns `true` if this is an IO error.
    pub fn is_io(&self) -> bool {
        matches!(self, ChatmapError::Io(_))
    }

    /// Returns `true` if this is a structural parse error.
    pub fn is_parse(&self) -> bool {
        matches!(self, ChatmapError::Parse { .. })
    }

    /// Returns `true` if the detector could not recognise the content.
    pub fn is_unrecognized_format(&self) -> bool {
        matches!(self, ChatmapError::UnrecognizedFormat { .. })
    }

    /// Returns `true` if this is an invalid format error.
    pub fn is_invalid_format(&self) -> bool {
        matches!(self, ChatmapError::InvalidFormat { .. })
    }

    /// Returns `true` if this is a timestamp error.
    pub fn is_malformed_timestamp(&self) -> bool {
        matches!(self, ChatmapError::MalformedTimestamp { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_display() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err = ChatmapError::from(io_err);
        let display = err.to_string();
        assert!(display.contains("IO error"));
        assert!(display.contains("file not found"));
        assert!(err.is_io());
    }

    #[test]
    fn test_unrecognized_format_display() {
        let err = ChatmapError::unrecognized_format(Some("notes.txt".into()));
        assert!(err.to_string().contains("notes.txt"));
        assert!(err.is_unrecognized_format());

        let err = ChatmapError::unrecognized_format(None);
        assert!(!err.to_string().contains("file:"));
    }

    #[test]
    fn test_parse_error_with_path() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid").unwrap_err();
        let err = ChatmapError::telegram_parse(json_err, Some(PathBuf::from("/path/to/result.json")));
        let display = err.to_string();
        assert!(display.contains("Telegram JSON"));
        assert!(display.contains("/path/to/result.json"));
        assert!(err.is_parse());
    }

    #[test]
    fn test_with_path_only_touches_parse_errors() {
        let err = ChatmapError::whatsapp_parse("no lines", None).with_path("chat.txt");
        assert!(err.to_string().contains("chat.txt"));

        let err = ChatmapError::malformed_timestamp("yesterday").with_path("chat.txt");
        assert!(err.is_malformed_timestamp());
        assert!(!err.to_string().contains("chat.txt"));
    }

    #[test]
    fn test_signal_parse_constructor() {
        let err = ChatmapError::signal_parse("bad header", None);
        assert!(err.is_parse());
        assert!(err.to_string().contains("Signal Markdown"));
    }

    #[test]
    fn test_invalid_position_display() {
        let err = ChatmapError::invalid_position("sideways");
        let display = err.to_string();
        assert!(display.contains("sideways"));
        assert!(display.contains("closest"));
    }

    #[test]
    fn test_invalid_format_display() {
        let err = ChatmapError::invalid_format("WhatsApp", "could not detect date format");
        assert!(err.is_invalid_format());
        assert!(err.to_string().contains("WhatsApp"));
    }

    #[test]
    fn test_from_utf8_error() {
        let utf8_err = String::from_utf8(vec![0xff, 0xfe]).unwrap_err();
        let err: ChatmapError = utf8_err.into();
        assert!(err.to_string().contains("UTF-8"));
    }

    #[test]
    fn test_error_source_chain() {
        use std::error::Error;
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = ChatmapError::telegram_parse(json_err, None);
        assert!(err.source().is_some());
    }
}
