//! Client-side feed ordering.
//!
//! After posting a reply the clients bump the note's activity timestamp
//! locally and re-sort, instead of refetching the whole list.

use corkboard_core::types::Timestamp;

/// Sort feed entries by activity, newest first.
///
/// `activity_of` extracts the note's `lastActivityAt`; ties keep their
/// relative order (stable sort) so optimistic updates do not shuffle
/// unrelated cards.
pub fn sort_by_last_activity<T>(items: &mut [T], activity_of: impl Fn(&T) -> Timestamp) {
    items.sort_by(|a, b| activity_of(b).cmp(&activity_of(a)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    #[test]
    fn test_newest_activity_first() {
        let now = Utc::now();
        let mut items = vec![
            ("stale", now - Duration::hours(2)),
            ("fresh", now),
            ("middle", now - Duration::hours(1)),
        ];
        sort_by_last_activity(&mut items, |i| i.1);
        let order: Vec<&str> = items.iter().map(|i| i.0).collect();
        assert_eq!(order, vec!["fresh", "middle", "stale"]);
    }

    #[test]
    fn test_ties_keep_relative_order() {
        let now = Utc::now();
        let mut items = vec![("a", now), ("b", now), ("c", now)];
        sort_by_last_activity(&mut items, |i| i.1);
        let order: Vec<&str> = items.iter().map(|i| i.0).collect();
        assert_eq!(order, vec!["a", "b", "c"]);
    }
}
