//! Configuration types for parsing and merging.
//!
//! This module provides plain configuration structs for library usage,
//! without any CLI framework dependencies.
//!
//! # Example
//!
//! ```rust
//! use chatmap::config::{MsgPosition, ParseConfig};
//!
//! let config = ParseConfig::new()
//!     .with_msg_position(MsgPosition::Before)
//!     .with_skip_system_messages(true);
//!
//! assert_eq!(config.msg_position, MsgPosition::Before);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::ChatmapError;

/// Which neighbouring message is attached to a shared location.
///
/// # Example
///
/// ```rust
/// use chatmap::config::MsgPosition;
///
/// let position: MsgPosition = "after".parse().unwrap();
/// assert_eq!(position, MsgPosition::After);
/// assert_eq!(MsgPosition::default(), MsgPosition::Closest);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MsgPosition {
    /// Nearest message in time, on either side
    #[default]
    Closest,
    /// Nearest preceding message only
    Before,
    /// Nearest following message only
    After,
}

impl MsgPosition {
    /// Returns all policy names.
    pub fn all_names() -> &'static [&'static str] {
        &["closest", "before", "after"]
    }
}

impl std::fmt::Display for MsgPosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MsgPosition::Closest => write!(f, "closest"),
            MsgPosition::Before => write!(f, "before"),
            MsgPosition::After => write!(f, "after"),
        }
    }
}

impl std::str::FromStr for MsgPosition {
    type Err = ChatmapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "closest" => Ok(MsgPosition::Closest),
            "before" => Ok(MsgPosition::Before),
            "after" => Ok(MsgPosition::After),
            _ => Err(ChatmapError::invalid_position(s)),
        }
    }
}

/// Configuration shared by all parsers and the merger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseConfig {
    /// Context message search policy (default: closest)
    pub msg_position: MsgPosition,

    /// Treat system notices (group created, encryption banner, ...) as
    /// ineligible context messages (default: true)
    pub skip_system_messages: bool,

    /// Number of non-empty lines sampled by text format detection (default: 20)
    pub detect_sample_lines: usize,
}

impl Default for ParseConfig {
    fn default() -> Self {
        Self {
            msg_position: MsgPosition::Closest,
            skip_system_messages: true,
            detect_sample_lines: 20,
        }
    }
}

impl ParseConfig {
    /// Creates a new config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the context message search policy.
    #[must_use]
    pub fn with_msg_position(mut self, position: MsgPosition) -> Self {
        self.msg_position = position;
        self
    }

    /// Sets whether system notices are excluded from context matching.
    #[must_use]
    pub fn with_skip_system_messages(mut self, skip: bool) -> Self {
        self.skip_system_messages = skip;
        self
    }

    /// Sets how many lines text detection samples. Zero is raised to one.
    #[must_use]
    pub fn with_detect_sample_lines(mut self, lines: usize) -> Self {
        self.detect_sample_lines = lines.max(1);
        self
    }
}
