//! Closest-message matching.
//!
//! A shared location rarely carries text of its own; the useful context is
//! usually a message sent just before or after it. [`find_closest`] picks
//! that message and [`resolve_features`] turns every location of an index
//! into a GeoJSON feature.
//!
//! Matching is a linear scan over one file's index. A record that has been
//! consumed (`mapped`) is never offered again, so two locations never share
//! the same context message.

use crate::config::MsgPosition;
use crate::geojson::{Feature, FeatureCollection, FeatureProperties};
use crate::index::MessageIndex;
use crate::message::MessageRecord;
use crate::time::distance_millis;

/// Finds the best context message for the record at `anchor`.
///
/// Candidates exclude the anchor itself, mapped records and any record
/// rejected by `predicate`.
///
/// - [`MsgPosition::Before`]: nearest candidate with a lower id
/// - [`MsgPosition::After`]: nearest candidate with a higher id
/// - [`MsgPosition::Closest`]: candidate with the smallest absolute time
///   difference to the anchor. Records without a time rank behind timed
///   ones and are compared by id distance. Ties go to the lower id.
///
/// Returns the id of the match, or `None` when no candidate qualifies.
///
/// # Example
///
/// ```
/// use chatmap::config::MsgPosition;
/// use chatmap::index::MessageIndex;
/// use chatmap::matcher::find_closest;
/// use chatmap::message::{Location, MessageRecord};
///
/// let index: MessageIndex = vec![
///     MessageRecord::new("Alice", "I'm here"),
///     MessageRecord::new("Alice", "").with_location(Location::new(1.0, 2.0)),
/// ]
/// .into_iter()
/// .collect();
///
/// let found = find_closest(&index, 1, MsgPosition::Before, MessageRecord::is_context_candidate);
/// assert_eq!(found, Some(0));
/// assert_eq!(find_closest(&index, 1, MsgPosition::After, MessageRecord::is_context_candidate), None);
/// ```
pub fn find_closest<P>(
    index: &MessageIndex,
    anchor: usize,
    position: MsgPosition,
    predicate: P,
) -> Option<usize>
where
    P: Fn(&MessageRecord) -> bool,
{
    let records = index.as_slice();
    let anchor_record = records.get(anchor)?;
    let eligible = |r: &&MessageRecord| r.id != anchor && !r.mapped && predicate(r);

    match position {
        MsgPosition::Before => records[..anchor].iter().rev().find(eligible).map(|r| r.id),
        MsgPosition::After => records[anchor + 1..].iter().find(eligible).map(|r| r.id),
        MsgPosition::Closest => {
            let anchor_time = anchor_record.time;
            records
                .iter()
                .filter(eligible)
                .min_by_key(|r| {
                    let rank = match (anchor_time, r.time) {
                        (Some(a), Some(b)) => (0u8, distance_millis(a, b)),
                        _ => (1u8, anchor.abs_diff(r.id) as u64),
                    };
                    (rank, r.id)
                })
                .map(|r| r.id)
        }
    }
}

/// Builds one feature per location-bearing record of `index`.
///
/// Anchors are resolved in id order. Both the anchor and its matched
/// context message are marked as mapped.
pub fn resolve_features<P>(
    index: &mut MessageIndex,
    position: MsgPosition,
    predicate: P,
) -> FeatureCollection
where
    P: Fn(&MessageRecord) -> bool,
{
    let mut collection = FeatureCollection::new();

    for anchor in index.anchors() {
        let Some(record) = index.get(anchor) else {
            continue;
        };
        let Some(location) = record.location else {
            continue;
        };

        let properties = match find_closest(index, anchor, position, &predicate)
            .and_then(|id| index.get(id))
        {
            Some(context) => FeatureProperties::from_context(anchor, context),
            None => FeatureProperties::anchor_only(anchor, record.username.clone(), record.time),
        };

        if let Some(related) = properties.related {
            index.mark_mapped(related);
        }
        index.mark_mapped(anchor);
        collection.push(Feature::point(location, properties));
    }

    tracing::debug!(
        features = collection.len(),
        messages = index.len(),
        position = %position,
        "resolved locations"
    );

    collection
}
