//! Keyword scanner — counts whole-word focus-keyword occurrences across
//! accumulated article text and section headings, then applies a fixed
//! decision table to budget occurrences for the next generated section.
//!
//! All functions are pure and recomputed from scratch per call; the budget
//! thresholds below are the single source of truth for keyword limits
//! everywhere in the service (scoring reuses them).

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::content::html::{count_words, strip_tags};

/// Hard cap on focus-keyword occurrences per article.
pub const MAX_KEYWORD_OCCURRENCES: u32 = 6;
/// Target density band, in percent of total words.
pub const MIN_DENSITY_PERCENT: f64 = 0.5;
pub const MAX_DENSITY_PERCENT: f64 = 1.5;
/// Below this accumulated word count the budget tightens early.
const SHORT_CONTENT_WORDS: u32 = 300;
/// Most occurrences ever allowed into a single new section.
const MAX_PER_SECTION: u32 = 2;

/// Snapshot of keyword usage across the accumulated article.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordScan {
    pub body_occurrences: u32,
    pub heading_occurrences: u32,
    pub total_keywords: u32,
    pub total_words: u32,
    /// `total_keywords / total_words * 100`; 0 when there are no words.
    pub density: f64,
}

/// Budget for the next section, with a natural-language directive to embed
/// in the generation prompt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordBudget {
    pub max_in_next_section: u32,
    pub directive: String,
}

/// Result of checking a freshly generated section against its budget.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordValidation {
    pub new_occurrences: u32,
    pub max_allowed: u32,
    pub violation: bool,
}

/// Case-insensitive whole-word matcher for the (escaped) focus keyword.
/// `\b` only anchors against word characters, so each anchor is added only
/// when the keyword's edge character is itself a word character.
fn keyword_regex(keyword: &str) -> Option<Regex> {
    let keyword = keyword.trim();
    let escaped = regex::escape(keyword);
    if escaped.is_empty() {
        return None;
    }
    let lead = if keyword.starts_with(is_word_char) { r"\b" } else { "" };
    let trail = if keyword.ends_with(is_word_char) { r"\b" } else { "" };
    Regex::new(&format!(r"(?i){lead}{escaped}{trail}")).ok()
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Counts whole-word, case-insensitive occurrences of `keyword` in `text`.
pub fn count_occurrences(text: &str, keyword: &str) -> u32 {
    match keyword_regex(keyword) {
        Some(re) => re.find_iter(text).count() as u32,
        None => 0,
    }
}

/// Scans accumulated body HTML and section headings in a single pass.
/// Each heading occurrence counts once, on top of body occurrences.
pub fn scan_keywords(content_html: &str, headings: &[String], keyword: &str) -> KeywordScan {
    let body_text = strip_tags(content_html);
    let body_occurrences = count_occurrences(&body_text, keyword);

    let mut heading_occurrences = 0;
    let mut heading_words = 0;
    for heading in headings {
        heading_occurrences += count_occurrences(heading, keyword);
        heading_words += count_words(heading);
    }

    let total_keywords = body_occurrences + heading_occurrences;
    let total_words = count_words(&body_text) + heading_words;
    let density = if total_words > 0 {
        total_keywords as f64 / total_words as f64 * 100.0
    } else {
        0.0
    };

    KeywordScan {
        body_occurrences,
        heading_occurrences,
        total_keywords,
        total_words,
        density,
    }
}

/// Fixed decision table: occurrence count x total words x density decide how
/// many more occurrences the next section may add.
pub fn keyword_budget(scan: &KeywordScan, keyword: &str) -> KeywordBudget {
    if scan.total_keywords >= MAX_KEYWORD_OCCURRENCES {
        return KeywordBudget {
            max_in_next_section: 0,
            directive: format!(
                "Do NOT use the focus keyword \"{keyword}\" in this section. \
                It already appears {} times, which is the maximum for this article. \
                Use synonyms and related phrases instead.",
                scan.total_keywords
            ),
        };
    }

    if scan.total_words > 0 && scan.density >= MAX_DENSITY_PERCENT {
        return KeywordBudget {
            max_in_next_section: 0,
            directive: format!(
                "Do NOT use the focus keyword \"{keyword}\" in this section. \
                Keyword density is already {:.2}% (target below {MAX_DENSITY_PERCENT}%). \
                Use synonyms and related phrases instead.",
                scan.density
            ),
        };
    }

    let remaining = MAX_KEYWORD_OCCURRENCES - scan.total_keywords;
    let max_in_next_section =
        if scan.total_words < SHORT_CONTENT_WORDS && scan.total_keywords >= 2 {
            1
        } else {
            remaining.min(MAX_PER_SECTION)
        };

    let directive = if scan.total_keywords == 0 || scan.density < MIN_DENSITY_PERCENT {
        format!(
            "Use the focus keyword \"{keyword}\" naturally, at most {max_in_next_section} \
            time(s) in this section. It currently appears {} times across the article.",
            scan.total_keywords
        )
    } else {
        format!(
            "You MAY use the focus keyword \"{keyword}\" at most {max_in_next_section} \
            time(s) in this section, but only where it reads naturally. \
            Current density is {:.2}%.",
            scan.density
        )
    };

    KeywordBudget {
        max_in_next_section,
        directive,
    }
}

/// Checks a freshly generated section against the budget it was given.
/// Flags a violation when the new occurrence count exceeds `max_allowed`.
pub fn validate_generated_content(
    section_html: &str,
    keyword: &str,
    max_allowed: u32,
) -> KeywordValidation {
    let text = strip_tags(section_html);
    let new_occurrences = count_occurrences(&text, keyword);
    KeywordValidation {
        new_occurrences,
        max_allowed,
        violation: new_occurrences > max_allowed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_exact_occurrences_body_and_headings() {
        let content = "<p>Coffee beans make great coffee. I love coffee.</p>";
        let headings = vec!["Why Coffee Matters".to_string(), "Brewing".to_string()];
        let scan = scan_keywords(content, &headings, "coffee");
        assert_eq!(scan.body_occurrences, 3);
        assert_eq!(scan.heading_occurrences, 1);
        assert_eq!(scan.total_keywords, 4);
    }

    #[test]
    fn test_whole_word_only() {
        // "coffees" must not match the whole-word pattern for "coffee"
        let scan = scan_keywords("<p>coffees coffeehouse coffee</p>", &[], "coffee");
        assert_eq!(scan.total_keywords, 1);
    }

    #[test]
    fn test_case_insensitive() {
        let scan = scan_keywords("<p>Coffee COFFEE coffee</p>", &[], "coffee");
        assert_eq!(scan.total_keywords, 3);
    }

    #[test]
    fn test_multi_word_keyword_with_regex_metachars() {
        let scan = scan_keywords("<p>best coffee (beans) here: best coffee (beans)</p>", &[], "coffee (beans)");
        assert_eq!(scan.total_keywords, 2);
    }

    #[test]
    fn test_density_formula() {
        // 10 words, 1 occurrence -> 10.0%
        let scan = scan_keywords(
            "<p>coffee one two three four five six seven eight nine</p>",
            &[],
            "coffee",
        );
        assert_eq!(scan.total_words, 10);
        assert!((scan.density - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_content_zero_density() {
        let scan = scan_keywords("", &[], "coffee");
        assert_eq!(scan.total_words, 0);
        assert_eq!(scan.density, 0.0);
    }

    #[test]
    fn test_empty_keyword_counts_nothing() {
        let scan = scan_keywords("<p>some words here</p>", &[], "   ");
        assert_eq!(scan.total_keywords, 0);
    }

    #[test]
    fn test_budget_forbids_at_occurrence_cap() {
        let scan = KeywordScan {
            body_occurrences: 6,
            heading_occurrences: 0,
            total_keywords: 6,
            total_words: 2000,
            density: 0.3,
        };
        let budget = keyword_budget(&scan, "coffee");
        assert_eq!(budget.max_in_next_section, 0);
        assert!(budget.directive.contains("Do NOT"));
    }

    #[test]
    fn test_budget_forbids_at_density_cap() {
        let scan = KeywordScan {
            body_occurrences: 3,
            heading_occurrences: 0,
            total_keywords: 3,
            total_words: 150,
            density: 2.0,
        };
        let budget = keyword_budget(&scan, "coffee");
        assert_eq!(budget.max_in_next_section, 0);
    }

    #[test]
    fn test_budget_tightens_on_short_content() {
        let scan = KeywordScan {
            body_occurrences: 2,
            heading_occurrences: 0,
            total_keywords: 2,
            total_words: 200,
            density: 1.0,
        };
        let budget = keyword_budget(&scan, "coffee");
        assert_eq!(budget.max_in_next_section, 1);
    }

    #[test]
    fn test_budget_allows_two_on_fresh_article() {
        let scan = scan_keywords("", &[], "coffee");
        let budget = keyword_budget(&scan, "coffee");
        assert_eq!(budget.max_in_next_section, 2);
        assert!(budget.directive.contains("coffee"));
    }

    #[test]
    fn test_budget_never_exceeds_remaining_cap() {
        let scan = KeywordScan {
            body_occurrences: 5,
            heading_occurrences: 0,
            total_keywords: 5,
            total_words: 2000,
            density: 0.25,
        };
        let budget = keyword_budget(&scan, "coffee");
        assert_eq!(budget.max_in_next_section, 1);
    }

    #[test]
    fn test_validate_flags_violation_above_budget() {
        let validation =
            validate_generated_content("<p>coffee coffee coffee</p>", "coffee", 2);
        assert_eq!(validation.new_occurrences, 3);
        assert!(validation.violation);
    }

    #[test]
    fn test_validate_passes_at_budget() {
        let validation = validate_generated_content("<p>coffee coffee</p>", "coffee", 2);
        assert!(!validation.violation);
    }
}
