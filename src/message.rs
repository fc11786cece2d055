//! Message records produced by every parser.
//!
//! A [`MessageRecord`] is one entry of an export: a line of a WhatsApp or
//! Signal log, or one object of a Telegram `messages` array. Records that
//! carry a [`Location`] become map features; the others are candidates for
//! the text attached to those features.
//!
//! # Example
//!
//! ```
//! use chatmap::message::{Location, MessageRecord};
//!
//! let msg = MessageRecord::new("Alice", "Meet here")
//!     .with_location(Location::new(-34.9, -56.16))
//!     .with_file("photos/IMG_001.jpg");
//!
//! assert!(msg.has_location());
//! assert_eq!(msg.file.as_deref(), Some("IMG_001.jpg"));
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A WGS84 coordinate pair in `(latitude, longitude)` order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

impl Location {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Builds a location from decimal strings, rejecting values outside the
    /// valid latitude/longitude ranges.
    pub fn parse(latitude: &str, longitude: &str) -> Option<Self> {
        let latitude: f64 = latitude.trim().parse().ok()?;
        let longitude: f64 = longitude.trim().parse().ok()?;
        let valid = latitude.is_finite()
            && longitude.is_finite()
            && (-90.0..=90.0).contains(&latitude)
            && (-180.0..=180.0).contains(&longitude);
        valid.then_some(Self::new(latitude, longitude))
    }

    /// Returns GeoJSON position order: `[longitude, latitude]`.
    pub fn to_lon_lat(self) -> [f64; 2] {
        [self.longitude, self.latitude]
    }
}

/// A single parsed entry of a chat export.
///
/// | Field | Meaning |
/// |-------|---------|
/// | `id` | Dense, 0-based position in the file; assigned by [`MessageIndex`](crate::index::MessageIndex) |
/// | `time` | Normalized instant, `None` when the source timestamp is unreadable |
/// | `username` | Sender as written in the export, may be empty |
/// | `message` | Text content, may be empty |
/// | `location` | Shared location, if any |
/// | `file` | Basename of an attached photo or video |
/// | `mapped` | Already consumed by a feature, as anchor or as context |
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageRecord {
    #[serde(default)]
    pub id: usize,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub time: Option<DateTime<Utc>>,

    #[serde(default)]
    pub username: String,

    #[serde(default)]
    pub message: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub location: Option<Location>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub file: Option<String>,

    #[serde(default)]
    pub mapped: bool,

    /// Application-level notice (group created, pinned message, ...).
    #[serde(skip)]
    pub system: bool,
}

impl MessageRecord {
    /// Creates a record with sender and text only.
    pub fn new(username: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            id: 0,
            time: None,
            username: username.into(),
            message: message.into(),
            location: None,
            file: None,
            mapped: false,
            system: false,
        }
    }

    #[must_use]
    pub fn with_time(mut self, time: DateTime<Utc>) -> Self {
        self.time = Some(time);
        self
    }

    #[must_use]
    pub fn with_optional_time(mut self, time: Option<DateTime<Utc>>) -> Self {
        self.time = time;
        self
    }

    #[must_use]
    pub fn with_location(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }

    /// Attaches a media file. Directory components are stripped.
    #[must_use]
    pub fn with_file(mut self, path: &str) -> Self {
        self.file = Some(strip_path(path).to_string());
        self
    }

    #[must_use]
    pub fn as_system(mut self) -> Self {
        self.system = true;
        self
    }

    pub fn has_location(&self) -> bool {
        self.location.is_some()
    }

    /// Returns `true` if the record has neither text nor an attachment.
    pub fn is_empty(&self) -> bool {
        self.message.trim().is_empty() && self.file.is_none()
    }

    /// Default context eligibility: a non-system record without its own
    /// location that carries text or media.
    pub fn is_context_candidate(&self) -> bool {
        !self.system && !self.has_location() && !self.is_empty()
    }
}

impl Default for MessageRecord {
    fn default() -> Self {
        Self::new("", "")
    }
}

/// Returns the final path component of `path`.
///
/// Both `/` and `\` separate directories, so Windows-style paths found in
/// some exports are handled too. Stripping a bare filename is a no-op.
///
/// ```
/// use chatmap::message::strip_path;
///
/// assert_eq!(strip_path("photos/photo_1@15-01-2024.jpg"), "photo_1@15-01-2024.jpg");
/// assert_eq!(strip_path("photo.jpg"), "photo.jpg");
/// ```
pub fn strip_path(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}
