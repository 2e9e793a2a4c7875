/// Transcript timestamp index
///
/// Fallback text-to-timestamp lookup built fresh per video from its
/// transcript entries. Used by the merge step when a summary line carries no
/// inline timestamp, or one that fails duration validation.
use std::collections::HashMap;
use tracing::debug;

use crate::summary::TranscriptEntry;
use crate::timestamp::{self, TimestampToken};

/// Lookup from normalized transcript text to its true timestamp
#[derive(Debug, Clone, Default)]
pub struct TranscriptIndex {
    entries: HashMap<String, TimestampToken>,
}

impl TranscriptIndex {
    /// Build the index from transcript entries in chronological order.
    ///
    /// Entries whose timestamp is absent or unparseable are skipped. When two
    /// entries share identical text the later one wins: transcript order is
    /// chronological, and a repeated line is assumed closest in time to its
    /// most recent occurrence.
    pub fn build<'a>(transcript: impl IntoIterator<Item = &'a TranscriptEntry>) -> Self {
        let mut entries = HashMap::new();
        let mut skipped = 0usize;

        for entry in transcript {
            let Some(raw) = entry.true_video_timestamp.as_deref() else {
                skipped += 1;
                continue;
            };
            match timestamp::normalize(raw) {
                Ok(ts) => {
                    entries.insert(Self::key(&entry.text), ts);
                }
                Err(_) => skipped += 1,
            }
        }

        if skipped > 0 {
            debug!("Transcript index skipped {} entries without usable timestamps", skipped);
        }

        Self { entries }
    }

    /// Look up the true timestamp for a line of text
    pub fn lookup(&self, text: &str) -> Option<&TimestampToken> {
        self.entries.get(&Self::key(text))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn key(text: &str) -> String {
        text.trim().to_lowercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(text: &str, ts: Option<&str>) -> TranscriptEntry {
        TranscriptEntry {
            text: text.to_string(),
            true_video_timestamp: ts.map(|s| s.to_string()),
        }
    }

    #[test]
    fn test_builds_from_entries() {
        let transcript = vec![
            entry("big bluff", Some("95")),
            entry("hero folds", Some("00:03:20")),
        ];
        let index = TranscriptIndex::build(&transcript);

        assert_eq!(index.len(), 2);
        assert_eq!(index.lookup("big bluff").unwrap().canonical(), "00:01:35");
        assert_eq!(index.lookup("hero folds").unwrap().canonical(), "00:03:20");
    }

    #[test]
    fn test_lookup_is_case_and_whitespace_insensitive() {
        let transcript = vec![entry("Big Bluff", Some("95"))];
        let index = TranscriptIndex::build(&transcript);

        assert!(index.lookup("  big bluff ").is_some());
        assert!(index.lookup("BIG BLUFF").is_some());
        assert!(index.lookup("small bluff").is_none());
    }

    #[test]
    fn test_last_write_wins_on_duplicate_text() {
        let transcript = vec![
            entry("all in", Some("00:01:00")),
            entry("all in", Some("00:20:00")),
        ];
        let index = TranscriptIndex::build(&transcript);

        assert_eq!(index.len(), 1);
        assert_eq!(index.lookup("all in").unwrap().canonical(), "00:20:00");
    }

    #[test]
    fn test_skips_missing_and_bad_timestamps() {
        let transcript = vec![
            entry("no timestamp", None),
            entry("bad timestamp", Some("not-a-time")),
            entry("good", Some("10")),
        ];
        let index = TranscriptIndex::build(&transcript);

        assert_eq!(index.len(), 1);
        assert!(index.lookup("good").is_some());
    }
}
