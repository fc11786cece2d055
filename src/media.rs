//! Media attachment correlation.
//!
//! Chat exports keep photos and videos next to the log. Parsers only
//! record the basename of an attachment in [`FeatureProperties::file`];
//! a [`MediaCatalog`] holds the names of the files the caller actually has
//! and matches the two up.
//!
//! ```rust
//! use chatmap::media::MediaCatalog;
//!
//! let catalog = MediaCatalog::from_names(["export/photos/photo_1.jpg", "clip.mp4"]);
//! assert!(catalog.contains("photo_1.jpg"));
//! assert_eq!(catalog.len(), 2);
//! ```
//!
//! [`FeatureProperties::file`]: crate::geojson::FeatureProperties::file

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use crate::error::Result;
use crate::geojson::{Feature, FeatureCollection};
use crate::message::strip_path;

/// Set of attachment basenames available to the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MediaCatalog {
    names: BTreeSet<String>,
}

impl MediaCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a catalog from file names or paths. Directories are stripped.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut catalog = Self::new();
        for name in names {
            catalog.insert(name.as_ref());
        }
        catalog
    }

    /// Lists the regular files of `dir` (not recursive).
    pub fn from_dir(dir: &Path) -> Result<Self> {
        let mut catalog = Self::new();
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            if entry.file_type()?.is_file() {
                catalog.insert(&entry.file_name().to_string_lossy());
            }
        }
        tracing::debug!(dir = %dir.display(), files = catalog.len(), "loaded media catalog");
        Ok(catalog)
    }

    pub fn insert(&mut self, name: &str) {
        let name = strip_path(name);
        if !name.is_empty() {
            self.names.insert(name.to_string());
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(strip_path(name))
    }

    /// Returns the catalog entry for the feature's attachment, if held.
    pub fn resolve<'a>(&'a self, feature: &Feature) -> Option<&'a str> {
        let file = feature.properties.file.as_deref()?;
        self.names.get(strip_path(file)).map(String::as_str)
    }

    /// Attachments referenced by `collection` that the catalog lacks,
    /// sorted and without duplicates.
    pub fn missing<'a>(&self, collection: &'a FeatureCollection) -> Vec<&'a str> {
        let missing: BTreeSet<&str> = collection
            .features
            .iter()
            .filter_map(|feature| feature.properties.file.as_deref())
            .filter(|file| !self.contains(file))
            .collect();
        missing.into_iter().collect()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geojson::FeatureProperties;
    use crate::message::{Location, MessageRecord};

    fn feature_with_file(file: Option<&str>) -> Feature {
        let mut record = MessageRecord::new("Alice", "");
        if let Some(file) = file {
            record = record.with_file(file);
        }
        Feature::point(
            Location::new(1.0, 2.0),
            FeatureProperties::from_context(0, &record),
        )
    }

    #[test]
    fn test_from_names_strips_dirs() {
        let catalog = MediaCatalog::from_names(["a/b/photo.jpg", "C:\\x\\clip.mp4", ""]);
        assert_eq!(catalog.iter().collect::<Vec<_>>(), ["clip.mp4", "photo.jpg"]);
    }

    #[test]
    fn test_resolve() {
        let catalog = MediaCatalog::from_names(["photo.jpg"]);
        assert_eq!(catalog.resolve(&feature_with_file(Some("photo.jpg"))), Some("photo.jpg"));
        assert_eq!(catalog.resolve(&feature_with_file(Some("other.jpg"))), None);
        assert_eq!(catalog.resolve(&feature_with_file(None)), None);
    }

    #[test]
    fn test_missing() {
        let catalog = MediaCatalog::from_names(["have.jpg"]);
        let mut collection = FeatureCollection::new();
        collection.push(feature_with_file(Some("have.jpg")));
        collection.push(feature_with_file(Some("lost.mp4")));
        collection.push(feature_with_file(Some("lost.mp4")));
        collection.push(feature_with_file(None));
        assert_eq!(catalog.missing(&collection), ["lost.mp4"]);
    }

    #[test]
    fn test_from_dir() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("photo_1.jpg"), b"jpg").unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        let catalog = MediaCatalog::from_dir(dir.path()).unwrap();
        assert_eq!(catalog.len(), 1);
        assert!(catalog.contains("photo_1.jpg"));
    }

    #[test]
    fn test_from_missing_dir_is_io_error() {
        let err = MediaCatalog::from_dir(Path::new("/definitely/not/here")).unwrap_err();
        assert!(err.is_io());
    }
}
