//! Grouping of ordered storage rows into subject/key hierarchies

use std::collections::BTreeMap;

/// Group `(subject, key, value)` rows into `subject -> key -> values`.
///
/// Values keep the order they were first seen in and duplicates are dropped,
/// so rows must already be sorted by priority.
pub fn bulk_group<S, K, V, I>(rows: I) -> BTreeMap<S, BTreeMap<K, Vec<V>>>
where
    S: Ord,
    K: Ord,
    V: PartialEq,
    I: IntoIterator<Item = (S, K, V)>,
{
    let mut grouped: BTreeMap<S, BTreeMap<K, Vec<V>>> = BTreeMap::new();

    for (subject, key, value) in rows {
        let values = grouped.entry(subject).or_default().entry(key).or_default();
        if !values.contains(&value) {
            values.push(value);
        }
    }

    grouped
}
