//! Yoast-style readability checks: sentence length, transition-word share,
//! and passive-voice markers over tag-stripped text.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::content::html::strip_tags;

/// Sentences longer than this count as "long".
const LONG_SENTENCE_WORDS: usize = 20;

static PASSIVE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:was|were|is|are|been|being|be)\s+\w+ed\b").expect("valid passive regex")
});

const TRANSITION_WORDS: &[&str] = &[
    "additionally",
    "also",
    "besides",
    "consequently",
    "finally",
    "first",
    "furthermore",
    "however",
    "instead",
    "meanwhile",
    "moreover",
    "nevertheless",
    "next",
    "second",
    "similarly",
    "therefore",
    "third",
    "thus",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadabilityStatus {
    Good,
    Ok,
    Poor,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadabilityCheck {
    pub id: String,
    pub status: ReadabilityStatus,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadabilityReport {
    pub sentence_count: u32,
    pub checks: Vec<ReadabilityCheck>,
}

/// Splits tag-stripped text into sentences on `.`, `!`, `?`.
fn sentences(text: &str) -> Vec<&str> {
    text.split(['.', '!', '?'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Runs all readability checks over an HTML fragment.
pub fn analyze(content_html: &str) -> ReadabilityReport {
    let text = strip_tags(content_html);
    let sents = sentences(&text);
    let sentence_count = sents.len() as u32;

    if sents.is_empty() {
        return ReadabilityReport {
            sentence_count: 0,
            checks: vec![],
        };
    }

    let word_counts: Vec<usize> = sents.iter().map(|s| s.split_whitespace().count()).collect();
    let total_words: usize = word_counts.iter().sum();
    let avg_len = total_words as f64 / sents.len() as f64;

    let long_share = word_counts
        .iter()
        .filter(|&&w| w > LONG_SENTENCE_WORDS)
        .count() as f64
        / sents.len() as f64
        * 100.0;

    let transition_share = sents
        .iter()
        .filter(|s| {
            s.split_whitespace()
                .next()
                .map(|first| {
                    let first = first.trim_matches(|c: char| !c.is_alphanumeric());
                    TRANSITION_WORDS
                        .iter()
                        .any(|t| first.eq_ignore_ascii_case(t))
                })
                .unwrap_or(false)
        })
        .count() as f64
        / sents.len() as f64
        * 100.0;

    let passive_share =
        PASSIVE_RE.find_iter(&text).count() as f64 / sents.len() as f64 * 100.0;

    let checks = vec![
        bucket(
            "average_sentence_length",
            avg_len,
            20.0,
            25.0,
            format!("Average sentence length is {avg_len:.1} words."),
        ),
        bucket(
            "long_sentences",
            long_share,
            25.0,
            35.0,
            format!("{long_share:.0}% of sentences exceed {LONG_SENTENCE_WORDS} words."),
        ),
        // Higher is better for transitions, so invert around the thresholds
        ReadabilityCheck {
            id: "transition_words".to_string(),
            status: if transition_share >= 30.0 {
                ReadabilityStatus::Good
            } else if transition_share >= 20.0 {
                ReadabilityStatus::Ok
            } else {
                ReadabilityStatus::Poor
            },
            message: format!("{transition_share:.0}% of sentences open with a transition word."),
        },
        bucket(
            "passive_voice",
            passive_share,
            10.0,
            15.0,
            format!("Passive voice markers in {passive_share:.0}% of sentences."),
        ),
    ];

    ReadabilityReport {
        sentence_count,
        checks,
    }
}

/// Lower-is-better bucketing: `good_max` then `ok_max` then poor.
fn bucket(id: &str, value: f64, good_max: f64, ok_max: f64, message: String) -> ReadabilityCheck {
    ReadabilityCheck {
        id: id.to_string(),
        status: if value <= good_max {
            ReadabilityStatus::Good
        } else if value <= ok_max {
            ReadabilityStatus::Ok
        } else {
            ReadabilityStatus::Poor
        },
        message,
    }
}
