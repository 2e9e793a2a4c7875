/// Section splitting and merge accumulation
///
/// Summary chunks arrive as free text with labeled section headers. The
/// merger splits each chunk into the three report sections, resolves one
/// timestamp per line (inline token first, transcript index as fallback),
/// cleans the text and accumulates deduplicated rendered entries per video
/// across all chunks and documents.
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cleaner::TextCleaner;
use crate::report::escape_html;
use crate::summary::SummaryDocument;
use crate::timestamp::{self, TimestampToken};
use crate::transcript::TranscriptIndex;

/// The three labeled groupings of extracted insights per video
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionKind {
    KeyMoments,
    StandoutPlayers,
    StrategicInsights,
}

impl SectionKind {
    /// Classify a line as a section header.
    ///
    /// Matching is case-insensitive and tolerates bold markup around the
    /// label. Returns the new section plus any content trailing the label on
    /// the same line. Lines that are not headers return `None`; content
    /// before the first header belongs to `KeyMoments`.
    pub fn classify_header(line: &str) -> Option<(SectionKind, &str)> {
        let stripped = line.trim().trim_matches('*').trim();
        let lower = stripped.to_lowercase();

        for (label, kind) in [
            ("key moments:", SectionKind::KeyMoments),
            ("standout players:", SectionKind::StandoutPlayers),
            ("strategic insights:", SectionKind::StrategicInsights),
        ] {
            if lower.starts_with(label) {
                return Some((kind, stripped[label.len()..].trim_start()));
            }
        }
        None
    }

    /// Section title as rendered in the report
    pub fn title(&self) -> &'static str {
        match self {
            SectionKind::KeyMoments => "Key Moments",
            SectionKind::StandoutPlayers => "Standout Players",
            SectionKind::StrategicInsights => "Strategic Insights",
        }
    }
}

/// Accumulated, deduplicated entries for one video
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MergedVideoRecord {
    pub key_moments: Vec<String>,
    pub standout_players: Vec<String>,
    pub strategic_insights: Vec<String>,
}

impl MergedVideoRecord {
    pub fn section(&self, kind: SectionKind) -> &[String] {
        match kind {
            SectionKind::KeyMoments => &self.key_moments,
            SectionKind::StandoutPlayers => &self.standout_players,
            SectionKind::StrategicInsights => &self.strategic_insights,
        }
    }

    fn section_mut(&mut self, kind: SectionKind) -> &mut Vec<String> {
        match kind {
            SectionKind::KeyMoments => &mut self.key_moments,
            SectionKind::StandoutPlayers => &mut self.standout_players,
            SectionKind::StrategicInsights => &mut self.strategic_insights,
        }
    }

    /// Append an entry unless an identical one is already present in the
    /// section (exact-match dedup, not fuzzy)
    pub fn push_unique(&mut self, kind: SectionKind, entry: String) -> bool {
        let section = self.section_mut(kind);
        if section.iter().any(|existing| existing == &entry) {
            return false;
        }
        section.push(entry);
        true
    }

    pub fn is_empty(&self) -> bool {
        self.key_moments.is_empty()
            && self.standout_players.is_empty()
            && self.strategic_insights.is_empty()
    }

    pub fn entry_count(&self) -> usize {
        self.key_moments.len() + self.standout_players.len() + self.strategic_insights.len()
    }
}

/// Merges summary chunks into per-video section records
pub struct SectionMerger {
    cleaner: TextCleaner,
    inline_timestamp: Regex,
}

impl SectionMerger {
    pub fn new() -> Self {
        Self {
            cleaner: TextCleaner::new(),
            inline_timestamp: Regex::new(r"\[(\d{1,2}:\d{2}(?::\d{2})?)\]").unwrap(),
        }
    }

    /// Fold one document's summary chunks into the video's record.
    ///
    /// Chunks are processed in document order; entries keep their source line
    /// order within a section and are never re-sorted.
    pub fn merge_document(
        &self,
        doc: &SummaryDocument,
        duration: &TimestampToken,
        index: &TranscriptIndex,
        record: &mut MergedVideoRecord,
    ) {
        for chunk in &doc.summaries {
            self.merge_chunk(&doc.video_id, &chunk.summary, duration, index, record);
        }
    }

    fn merge_chunk(
        &self,
        video_id: &str,
        chunk_text: &str,
        duration: &TimestampToken,
        index: &TranscriptIndex,
        record: &mut MergedVideoRecord,
    ) {
        let mut current = SectionKind::KeyMoments;

        for raw_line in chunk_text.lines() {
            let line = raw_line.trim();
            if line.is_empty() {
                continue;
            }

            let line = match SectionKind::classify_header(line) {
                Some((kind, rest)) => {
                    current = kind;
                    if rest.is_empty() {
                        continue;
                    }
                    rest
                }
                None => line,
            };

            if let Some(entry) = self.render_line(video_id, line, duration, index) {
                if !record.push_unique(current, entry) {
                    debug!("Dropped duplicate entry for {}", video_id);
                }
            }
        }
    }

    /// Resolve one line to a rendered entry string, or `None` when nothing
    /// survives cleaning
    fn render_line(
        &self,
        video_id: &str,
        line: &str,
        duration: &TimestampToken,
        index: &TranscriptIndex,
    ) -> Option<String> {
        // Extract the first inline bracketed timestamp and strip every
        // occurrence of that token, duplicate-wrapped spans included
        let (inline, stripped) = match self.inline_timestamp.captures(line) {
            Some(caps) => {
                let token = caps.get(0).unwrap().as_str().to_string();
                let inline = timestamp::normalize(&caps[1]).ok();
                (inline, line.replace(&token, " "))
            }
            None => (None, line.to_string()),
        };

        let text = self.cleaner.clean(&stripped);
        if text.is_empty() {
            return None;
        }

        let resolved = inline
            .filter(|ts| timestamp::validate(ts, duration))
            .or_else(|| index.lookup(&text).cloned());

        Some(format_entry(video_id, resolved.as_ref(), &text))
    }
}

impl Default for SectionMerger {
    fn default() -> Self {
        Self::new()
    }
}

/// Render one entry: a clickable time-coded link (when a timestamp resolved)
/// followed by the cleaned text
fn format_entry(video_id: &str, ts: Option<&TimestampToken>, text: &str) -> String {
    match ts {
        Some(ts) => format!(
            r#"<a href="{}">[{}]</a> {}"#,
            watch_url(video_id, ts.seconds()),
            ts.canonical(),
            escape_html(text)
        ),
        None => escape_html(text),
    }
}

/// Time-coded deep link into the video
fn watch_url(video_id: &str, seconds: u64) -> String {
    format!(
        "https://www.youtube.com/watch?v={}&t={}s",
        urlencoding::encode(video_id),
        seconds
    )
}
