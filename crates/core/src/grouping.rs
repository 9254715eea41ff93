//! Itemized grouping: raw field values to ordered count buckets.
//!
//! Every flavour of "no value" (absent key, JSON `null`, empty or
//! whitespace-only string) is normalized here into [`BucketLabel::Missing`],
//! so nothing downstream branches on raw falsiness.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Display text of the missing bucket.
///
/// A recorded value that is literally "Missing" displays the same way but
/// stays a separate bucket: it compares unequal to [`BucketLabel::Missing`],
/// sorts with the other labels, and serializes as a string, not `null`.
pub const MISSING_LABEL: &str = "Missing";

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Label of one bucket. Serializes as the label string, or `null` for the
/// missing bucket.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BucketLabel {
    Text(String),
    Missing,
}

impl BucketLabel {
    pub fn is_missing(&self) -> bool {
        matches!(self, BucketLabel::Missing)
    }

    /// Normalize one raw value. `None` means the record has no such key.
    pub fn from_raw(value: Option<&Value>) -> Self {
        match value {
            None | Some(Value::Null) => BucketLabel::Missing,
            Some(Value::String(s)) if s.trim().is_empty() => BucketLabel::Missing,
            Some(Value::String(s)) => BucketLabel::Text(s.clone()),
            Some(Value::Number(n)) => BucketLabel::Text(n.to_string()),
            Some(Value::Bool(b)) => BucketLabel::Text(b.to_string()),
            Some(other) => BucketLabel::Text(other.to_string()),
        }
    }
}

impl fmt::Display for BucketLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BucketLabel::Text(s) => f.write_str(s),
            BucketLabel::Missing => f.write_str(MISSING_LABEL),
        }
    }
}

/// One row of an itemized count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bucket {
    pub label: BucketLabel,
    pub count: usize,
}

impl Bucket {
    pub fn new(label: BucketLabel, count: usize) -> Self {
        Self { label, count }
    }
}

// ---------------------------------------------------------------------------
// Grouping
// ---------------------------------------------------------------------------

/// Total order of buckets: missing last, then count descending, then label
/// ascending.
fn compare_buckets(a: &Bucket, b: &Bucket) -> Ordering {
    match (&a.label, &b.label) {
        (BucketLabel::Missing, BucketLabel::Missing) => Ordering::Equal,
        (BucketLabel::Missing, _) => Ordering::Greater,
        (_, BucketLabel::Missing) => Ordering::Less,
        (BucketLabel::Text(la), BucketLabel::Text(lb)) => {
            b.count.cmp(&a.count).then_with(|| la.cmp(lb))
        }
    }
}

/// Count occurrences of each distinct value and order the buckets.
///
/// Each item is the raw value of one record; `None` stands for a record that
/// lacks the field entirely. Values that stringify to the same text share a
/// bucket (the number `42` and the string `"42"` are counted together).
pub fn group_and_count<'a, I>(values: I) -> Vec<Bucket>
where
    I: IntoIterator<Item = Option<&'a Value>>,
{
    let mut counts: HashMap<BucketLabel, usize> = HashMap::new();
    for value in values {
        *counts.entry(BucketLabel::from_raw(value)).or_insert(0) += 1;
    }

    let mut buckets: Vec<Bucket> = counts
        .into_iter()
        .map(|(label, count)| Bucket::new(label, count))
        .collect();
    buckets.sort_by(compare_buckets);
    buckets
}
