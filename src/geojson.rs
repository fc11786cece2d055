//! GeoJSON output model.
//!
//! Only the subset chatmap produces is modelled: a `FeatureCollection` of
//! `Point` features. Positions follow the GeoJSON `[longitude, latitude]`
//! order, the reverse of [`Location`].
//!
//! ```
//! use chatmap::geojson::{Feature, FeatureCollection, FeatureProperties, to_geojson};
//! use chatmap::message::Location;
//!
//! let mut collection = FeatureCollection::new();
//! collection.push(Feature::point(Location::new(1.0, 2.0), FeatureProperties::anchor_only(0, "Alice", None)));
//!
//! let json = to_geojson(&collection, false)?;
//! assert!(json.contains(r#""coordinates":[2.0,1.0]"#));
//! # Ok::<(), chatmap::ChatmapError>(())
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::message::{Location, MessageRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CollectionType {
    #[default]
    FeatureCollection,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FeatureType {
    #[default]
    Feature,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GeometryType {
    #[default]
    Point,
}

/// A `Point` geometry with `[longitude, latitude]` coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    #[serde(rename = "type")]
    pub kind: GeometryType,
    pub coordinates: [f64; 2],
}

impl Geometry {
    pub fn point(location: Location) -> Self {
        Self {
            kind: GeometryType::Point,
            coordinates: location.to_lon_lat(),
        }
    }
}

/// Properties of one located feature.
///
/// `id` always names the location-bearing record. `related` is present only
/// when a context message was attached, in which case `username`, `time`,
/// `message` and `file` are copied from that message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureProperties {
    #[serde(default)]
    pub username: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub time: Option<DateTime<Utc>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub message: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub file: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub related: Option<usize>,

    pub id: usize,

    /// Source file name, set by the merger. Together with `id` and
    /// `related` it forms a key that is unique across merged files.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub source: Option<String>,
}

impl FeatureProperties {
    /// Properties copied from a matched context message.
    pub fn from_context(anchor_id: usize, context: &MessageRecord) -> Self {
        Self {
            username: context.username.clone(),
            time: context.time,
            message: Some(context.message.clone()),
            file: context.file.clone(),
            related: Some(context.id),
            id: anchor_id,
            source: None,
        }
    }

    /// Properties of an anchor with no context message.
    pub fn anchor_only(
        anchor_id: usize,
        username: impl Into<String>,
        time: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            username: username.into(),
            time,
            message: None,
            file: None,
            related: None,
            id: anchor_id,
            source: None,
        }
    }
}

/// One located point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    #[serde(rename = "type")]
    pub kind: FeatureType,
    pub properties: FeatureProperties,
    pub geometry: Geometry,
}

impl Feature {
    pub fn point(location: Location, properties: FeatureProperties) -> Self {
        Self {
            kind: FeatureType::Feature,
            properties,
            geometry: Geometry::point(location),
        }
    }
}

/// Ordered list of located features.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureCollection {
    #[serde(rename = "type")]
    pub kind: CollectionType,
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, feature: Feature) {
        self.features.push(feature);
    }

    /// Appends every feature of `other`, keeping their order.
    pub fn extend(&mut self, other: FeatureCollection) {
        self.features.extend(other.features);
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

/// Serializes a collection to a GeoJSON string.
pub fn to_geojson(collection: &FeatureCollection, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(collection)?
    } else {
        serde_json::to_string(collection)?
    };
    Ok(json)
}
