use std::cmp::Ordering;

use crate::model::ID_SEP;

/// One segment of a composite identifier. Numeric segments order before
/// text and compare by value, which puts `x-2` before `x-10`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Num(u64),
    Text(String),
}

impl Ord for Segment {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Segment::Num(a), Segment::Num(b)) => a.cmp(b),
            (Segment::Text(a), Segment::Text(b)) => a.cmp(b),
            (Segment::Num(_), Segment::Text(_)) => Ordering::Less,
            (Segment::Text(_), Segment::Num(_)) => Ordering::Greater,
        }
    }
}

impl PartialOrd for Segment {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Composite natural key for an identifier: split on the id separator,
/// parse each segment as an integer where possible.
pub fn sort_key(id: &str) -> Vec<Segment> {
    id.split(ID_SEP)
        .map(|part| match part.parse::<u64>() {
            Ok(n) => Segment::Num(n),
            Err(_) => Segment::Text(part.to_string()),
        })
        .collect()
}

/// Sort records in place by the natural key of their id. Ties (impossible
/// for unique ids) fall back to the raw string so the order stays total.
pub fn sort_by_id<T, F>(records: &mut [T], id_of: F)
where
    F: Fn(&T) -> &str,
{
    records.sort_by(|a, b| {
        sort_key(id_of(a))
            .cmp(&sort_key(id_of(b)))
            .then_with(|| id_of(a).cmp(id_of(b)))
    });
}
