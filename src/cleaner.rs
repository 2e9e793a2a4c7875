/// Summary text cleanup
///
/// LLM-produced summary lines arrive with markdown bold markers, duplicated
/// bracketed timestamps, prose restatements of timestamps and stray section
/// labels. The cleaner is a chain of small, independently testable rules
/// applied in a fixed order; it is total and never fails.
use regex::Regex;

use crate::timestamp;

/// Applies the cleanup rule chain to raw summary lines
#[derive(Debug, Clone)]
pub struct TextCleaner {
    bold: Regex,
    wrapped_span: Regex,
    prose_timestamp: Regex,
    decimal_token: Regex,
    adjacent_tags: Regex,
    whitespace: Regex,
    leading_label: Regex,
    enum_prefix: Regex,
}

impl TextCleaner {
    pub fn new() -> Self {
        Self {
            bold: Regex::new(r"\*\*(.*?)\*\*").unwrap(),
            wrapped_span: Regex::new(r"\[(\d[\d:.]*)\]\s*(.*?)\s*\[(\d[\d:.]*)\]").unwrap(),
            prose_timestamp: Regex::new(r"(?i)\b(?:at|timestamp)\s+\d{1,2}:\d{2}(?::\d{2})?")
                .unwrap(),
            decimal_token: Regex::new(r"\[(\d+\.\d+)\]").unwrap(),
            adjacent_tags: Regex::new(r"(\[[^\]]+\])\s*(\[[^\]]+\])").unwrap(),
            whitespace: Regex::new(r"\s+").unwrap(),
            leading_label: Regex::new(
                r"(?i)^(?:key moments|standout players|strategic insights|summary)\s*:\s*",
            )
            .unwrap(),
            enum_prefix: Regex::new(r"^\d+\.\s+").unwrap(),
        }
    }

    /// Run the full rule chain over one line of summary text
    pub fn clean(&self, raw: &str) -> String {
        let text = self.strip_bold(raw);
        let text = self.collapse_wrapped_timestamps(&text);
        let text = self.strip_prose_timestamps(&text);
        let text = self.renormalize_decimal_tokens(&text);
        let text = self.collapse_adjacent_tags(&text);
        let text = self.collapse_whitespace(&text);
        let text = self.strip_leading_labels(&text);
        text.trim().to_string()
    }

    /// `**text**` -> `text`
    fn strip_bold(&self, text: &str) -> String {
        self.bold.replace_all(text, "$1").into_owned()
    }

    /// `[T1]span[T2]` -> `span`; both timestamps are discarded because the
    /// caller re-attaches a single resolved timestamp separately
    fn collapse_wrapped_timestamps(&self, text: &str) -> String {
        self.wrapped_span.replace_all(text, " $2 ").into_owned()
    }

    /// Remove inline phrases restating a timestamp in prose
    /// (`at 00:01:00`, `timestamp 12:34`)
    fn strip_prose_timestamps(&self, text: &str) -> String {
        self.prose_timestamp.replace_all(text, "").into_owned()
    }

    /// Rewrite any remaining bracketed decimal token (`[10.88]`) to its
    /// canonical bracketed form
    fn renormalize_decimal_tokens(&self, text: &str) -> String {
        self.decimal_token
            .replace_all(text, |caps: &regex::Captures<'_>| {
                match timestamp::normalize(&caps[1]) {
                    Ok(ts) => format!("[{}]", ts.canonical()),
                    Err(_) => caps[0].to_string(),
                }
            })
            .into_owned()
    }

    /// `[ALL-IN] [ALL-IN]` -> `[ALL-IN]` (the regex crate has no
    /// backreferences, so equality of the two tags is checked in the closure)
    fn collapse_adjacent_tags(&self, text: &str) -> String {
        let mut current = text.to_string();
        loop {
            let next = self
                .adjacent_tags
                .replace_all(&current, |caps: &regex::Captures<'_>| {
                    if caps[1] == caps[2] {
                        caps[1].to_string()
                    } else {
                        format!("{} {}", &caps[1], &caps[2])
                    }
                })
                .into_owned();
            if next == current {
                return current;
            }
            current = next;
        }
    }

    /// Collapse whitespace runs to a single space
    fn collapse_whitespace(&self, text: &str) -> String {
        self.whitespace.replace_all(text, " ").into_owned()
    }

    /// Strip leading boilerplate labels and enumeration prefixes
    fn strip_leading_labels(&self, text: &str) -> String {
        let text = text.trim_start();
        let text = self.leading_label.replace(text, "");
        self.enum_prefix.replace(&text, "").into_owned()
    }
}

impl Default for TextCleaner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_bold_markup() {
        let cleaner = TextCleaner::new();
        assert_eq!(cleaner.clean("**Big Pot** on the river"), "Big Pot on the river");
    }

    #[test]
    fn test_collapses_duplicate_wrapped_timestamp() {
        let cleaner = TextCleaner::new();
        let cleaned = cleaner.clean("**Big Pot** [00:01:00]...[00:01:00] happened");
        assert!(!cleaned.contains('['));
        assert!(!cleaned.contains("**"));
        assert!(cleaned.starts_with("Big Pot"));
        assert!(cleaned.ends_with("happened"));
    }

    #[test]
    fn test_wrapped_span_keeps_inner_text() {
        let cleaner = TextCleaner::new();
        assert_eq!(
            cleaner.clean("[10.88]hero calls the shove[10.88]"),
            "hero calls the shove"
        );
    }

    #[test]
    fn test_strips_prose_timestamps() {
        let cleaner = TextCleaner::new();
        assert_eq!(
            cleaner.clean("Villain folds at 00:01:00 to the 3-bet"),
            "Villain folds to the 3-bet"
        );
        assert_eq!(
            cleaner.clean("Key hand, timestamp 12:34, huge bluff"),
            "Key hand, , huge bluff"
        );
    }

    #[test]
    fn test_renormalizes_decimal_tokens() {
        let cleaner = TextCleaner::new();
        assert_eq!(cleaner.clean("crazy hand [10.88] develops"), "crazy hand [00:10:53] develops");
    }

    #[test]
    fn test_collapses_adjacent_duplicate_tags() {
        let cleaner = TextCleaner::new();
        assert_eq!(
            cleaner.clean("[ALL-IN] [ALL-IN] hero shoves the turn"),
            "[ALL-IN] hero shoves the turn"
        );
        // Distinct tags are preserved
        assert_eq!(
            cleaner.clean("[RAISE] [CALL] action on the flop"),
            "[RAISE] [CALL] action on the flop"
        );
    }

    #[test]
    fn test_collapses_whitespace() {
        let cleaner = TextCleaner::new();
        assert_eq!(cleaner.clean("too   many\t spaces\n here"), "too many spaces here");
    }

    #[test]
    fn test_strips_leading_labels() {
        let cleaner = TextCleaner::new();
        assert_eq!(cleaner.clean("Key Moments: big bluff"), "big bluff");
        assert_eq!(cleaner.clean("Summary: the final table"), "the final table");
        assert_eq!(cleaner.clean("1. hero opens the button"), "hero opens the button");
    }

    #[test]
    fn test_clean_is_total_on_odd_input() {
        let cleaner = TextCleaner::new();
        assert_eq!(cleaner.clean(""), "");
        assert_eq!(cleaner.clean("   "), "");
        assert_eq!(cleaner.clean("[unclosed"), "[unclosed");
    }
}
