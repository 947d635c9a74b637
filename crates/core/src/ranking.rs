use std::cmp::Ordering;
use std::collections::HashSet;

use itertools::Itertools;

use crate::entry::Entry;
use crate::usage::{UsageHistory, UsageRecord};

/// Entries split into the most used head and the remaining tail.
#[derive(Debug, PartialEq)]
pub struct Ranking<'a> {
    pub top: Vec<&'a Entry>,
    pub rest: Vec<&'a Entry>,
}

fn by_usage(a: &UsageRecord, b: &UsageRecord) -> Ordering {
    b.count.cmp(&a.count).then(b.last.total_cmp(&a.last))
}

/// Ranks `entries` by their usage.
///
/// Only entries with a usage record compete for `top`, ordered by count then
/// recency, both descending. Ties keep listing order. `rest` keeps the listing
/// order of everything else.
pub fn rank<'a>(entries: &'a [Entry], history: &UsageHistory, top_n: usize) -> Ranking<'a> {
    let top: Vec<&Entry> = entries
        .iter()
        .filter_map(|entry| history.get(&entry.id).map(|record| (entry, record)))
        .sorted_by(|(_, a), (_, b)| by_usage(a, b))
        .take(top_n)
        .map(|(entry, _)| entry)
        .collect();

    let top_ids: HashSet<&str> = top.iter().map(|entry| entry.id.as_str()).collect();
    let rest = entries
        .iter()
        .filter(|entry| !top_ids.contains(entry.id.as_str()))
        .collect();

    Ranking { top, rest }
}
