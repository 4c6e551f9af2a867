//! Groups raw log entries into the session listing.
//!
//! A session is not stored anywhere; it is the set of entries sharing a
//! `session_id`. Listing groups by `(session_id, user_id)` so the same
//! session reported by two users shows up twice.

use std::collections::HashMap;

use crate::models::{LogEntry, SessionSummary};

/// One summary per distinct `(session_id, user_id)` pair, carrying the
/// earliest timestamp of that pair, most recent session first. Pairs with the
/// same start time keep the order in which they were first seen.
pub fn summarize<'a, I>(entries: I) -> Vec<SessionSummary>
where
    I: IntoIterator<Item = &'a LogEntry>,
{
    let mut index: HashMap<(&str, &str), usize> = HashMap::new();
    let mut summaries: Vec<SessionSummary> = Vec::new();

    for entry in entries {
        let key = (entry.session_id.as_str(), entry.user_id.as_str());
        match index.get(&key).copied() {
            Some(i) => {
                let summary = &mut summaries[i];
                if entry.timestamp < summary.start_time {
                    summary.start_time = entry.timestamp;
                }
            }
            None => {
                index.insert(key, summaries.len());
                summaries.push(SessionSummary {
                    session_id: entry.session_id.clone(),
                    user_id: entry.user_id.clone(),
                    start_time: entry.timestamp,
                });
            }
        }
    }

    // stable, so ties stay in first-seen order
    summaries.sort_by(|a, b| b.start_time.cmp(&a.start_time));
    summaries
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000, 0).unwrap() + Duration::seconds(secs)
    }

    fn entry(id: i64, session_id: &str, user_id: &str, secs: i64) -> LogEntry {
        LogEntry {
            id,
            session_id: session_id.to_string(),
            user_id: user_id.to_string(),
            latitude: 1.0,
            longitude: 2.0,
            elevation: 10.0,
            timestamp: at(secs),
        }
    }

    #[test]
    fn pairs_are_deduplicated_with_minimum_start() {
        let entries = vec![
            entry(1, "s1", "u1", 30),
            entry(2, "s1", "u1", 10),
            entry(3, "s1", "u1", 20),
        ];
        let summaries = summarize(&entries);
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].session_id, "s1");
        assert_eq!(summaries[0].start_time, at(10));
    }

    #[test]
    fn most_recent_session_comes_first() {
        let entries = vec![
            entry(1, "old", "u1", 0),
            entry(2, "new", "u2", 100),
            entry(3, "mid", "u1", 50),
            entry(4, "old", "u1", 200),
        ];
        let ids: Vec<_> = summarize(&entries)
            .into_iter()
            .map(|s| s.session_id)
            .collect();
        assert_eq!(ids, vec!["new", "mid", "old"]);
    }

    #[test]
    fn same_session_under_two_users_is_listed_twice() {
        let entries = vec![entry(1, "s1", "u1", 0), entry(2, "s1", "u2", 5)];
        let summaries = summarize(&entries);
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].user_id, "u2");
        assert_eq!(summaries[1].user_id, "u1");
    }

    #[test]
    fn ties_keep_first_seen_order() {
        let entries = vec![entry(1, "a", "u", 7), entry(2, "b", "u", 7)];
        let ids: Vec<_> = summarize(&entries)
            .into_iter()
            .map(|s| s.session_id)
            .collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn no_entries_no_sessions() {
        assert!(summarize(&Vec::<LogEntry>::new()).is_empty());
    }
}
