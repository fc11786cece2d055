//! # Chatmap
//!
//! A Rust library for turning exported chat logs into a map: every shared
//! location becomes a GeoJSON point, annotated with the message sent
//! closest to it.
//!
//! ## Overview
//!
//! Chatmap reads exports from:
//! - **Telegram**: JSON exports from Telegram Desktop
//! - **WhatsApp**: Text exports (both iOS and Android formats)
//! - **Signal**: Markdown exports from `signal-export`
//!
//! The format of each file is detected from its content. Each file is
//! parsed into a [`MessageIndex`]; every record with a location is then
//! paired with a nearby text or media message according to a
//! [`MsgPosition`] policy.
//!
//! ## Quick Start
//!
//! ```rust
//! use chatmap::prelude::*;
//!
//! let telegram = r#"{"messages": [
//!   {"id": 1, "type": "message", "date": "2024-01-15T10:30:00", "from": "Alice",
//!    "text": [{"type": "link", "text": "hello"}]},
//!   {"id": 2, "type": "message", "date": "2024-01-15T10:30:01", "from": "Alice",
//!    "text": "", "location_information": {"latitude": 1.0, "longitude": 2.0}}
//! ]}"#;
//!
//! let config = ParseConfig::new().with_msg_position(MsgPosition::Before);
//! let output = merge([("result.json", telegram)], &config);
//!
//! let geojson = to_geojson(&output.geojson, false)?;
//! assert!(geojson.contains(r#""coordinates":[2.0,1.0]"#));
//! # Ok::<(), ChatmapError>(())
//! ```
//!
//! ## Module Structure
//!
//! - [`parser`]: [`Parser`](parser::Parser) trait, [`Platform`](parser::Platform), [`create_parser`](parser::create_parser)
//! - [`parsers`]: Telegram, WhatsApp and Signal implementations
//! - [`parsing`]: Shared helpers: map links, attachments, locale date formats
//! - [`detect`]: Format detection
//! - [`matcher`]: Context message search
//! - [`merger`]: Multi-file merging with per-file reports
//! - [`message`], [`index`]: [`MessageRecord`], [`MessageIndex`]
//! - [`geojson`]: Output model and serializer
//! - [`media`]: Attachment correlation
//! - [`time`]: Timestamp normalization
//! - [`config`]: [`ParseConfig`], [`MsgPosition`]
//! - [`error`]: Unified error types ([`ChatmapError`], [`Result`])
//! - [`prelude`]: Convenient re-exports

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod detect;
pub mod error;
pub mod geojson;
pub mod index;
pub mod matcher;
pub mod media;
pub mod merger;
pub mod message;
pub mod parser;
pub mod parsers;
pub mod parsing;
pub mod time;

// Re-export the main types at the crate root for convenience
pub use config::{MsgPosition, ParseConfig};
pub use error::{ChatmapError, Result};
pub use geojson::FeatureCollection;
pub use index::MessageIndex;
pub use message::{Location, MessageRecord};

/// Convenient re-exports for common usage.
///
/// ```rust
/// use chatmap::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::{MsgPosition, ParseConfig};
    pub use crate::error::{ChatmapError, Result};

    pub use crate::index::MessageIndex;
    pub use crate::message::{Location, MessageRecord};

    pub use crate::parser::{ParseOutput, Parser, Platform, create_parser};

    pub use crate::detect::{detect_parser, detect_platform};
    pub use crate::geojson::{Feature, FeatureCollection, FeatureProperties, to_geojson};
    pub use crate::matcher::{find_closest, resolve_features};
    pub use crate::media::MediaCatalog;
    pub use crate::merger::{FileReport, FileStatus, MergeOutput, merge, merge_bytes, merge_paths};
    #[cfg(feature = "parallel")]
    pub use crate::merger::merge_parallel;
}
