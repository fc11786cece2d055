//! Per-file message index.
//!
//! Each parse call owns exactly one [`MessageIndex`]. Ids are dense and
//! follow the order records were pushed, which is the order they appear in
//! the export. The only mutable state, the `mapped` flag, lives here and is
//! never shared across files.

use serde::{Deserialize, Serialize};

use crate::message::MessageRecord;

/// Ordered, id-addressable collection of [`MessageRecord`]s.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageIndex {
    records: Vec<MessageRecord>,
}

impl MessageIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            records: Vec::with_capacity(capacity),
        }
    }

    /// Appends a record, overwriting its id with the next dense id.
    pub fn push(&mut self, mut record: MessageRecord) -> usize {
        let id = self.records.len();
        record.id = id;
        self.records.push(record);
        id
    }

    pub fn get(&self, id: usize) -> Option<&MessageRecord> {
        self.records.get(id)
    }

    pub fn get_mut(&mut self, id: usize) -> Option<&mut MessageRecord> {
        self.records.get_mut(id)
    }

    /// Returns the most recently pushed record, used to fold continuation
    /// lines into the message they belong to.
    pub fn last_mut(&mut self) -> Option<&mut MessageRecord> {
        self.records.last_mut()
    }

    /// Flags a record as consumed. Unknown ids are ignored.
    pub fn mark_mapped(&mut self, id: usize) {
        if let Some(record) = self.records.get_mut(id) {
            record.mapped = true;
        }
    }

    pub fn is_mapped(&self, id: usize) -> bool {
        self.records.get(id).is_some_and(|r| r.mapped)
    }

    /// Ids of all location-bearing records, in index order.
    pub fn anchors(&self) -> Vec<usize> {
        self.records
            .iter()
            .filter(|r| r.has_location())
            .map(|r| r.id)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MessageRecord> {
        self.records.iter()
    }

    pub fn as_slice(&self) -> &[MessageRecord] {
        &self.records
    }
}

impl FromIterator<MessageRecord> for MessageIndex {
    fn from_iter<I: IntoIterator<Item = MessageRecord>>(iter: I) -> Self {
        let mut index = MessageIndex::new();
        for record in iter {
            index.push(record);
        }
        index
    }
}

impl<'a> IntoIterator for &'a MessageIndex {
    type Item = &'a MessageRecord;
    type IntoIter = std::slice::Iter<'a, MessageRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
