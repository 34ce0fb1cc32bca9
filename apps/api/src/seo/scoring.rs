//! SEO scoring — weighted point accumulation over regex-detected features,
//! normalized to 0–100. Deterministic and stateless.

use serde::{Deserialize, Serialize};

use crate::content::html::{count_h2, count_links, count_words_in_html};
use crate::seo::keyword_scanner::{count_occurrences, MAX_KEYWORD_OCCURRENCES};

/// Total achievable score. Weights below sum to this.
pub const MAX_SCORE: u32 = 100;

const TITLE_KEYWORD_POINTS: u32 = 25;
const KEYWORD_COUNT_POINTS: u32 = 25;
const WORD_COUNT_POINTS: u32 = 20;
const HEADING_POINTS: u32 = 15;
const LINK_POINTS: u32 = 15;

/// Optimal title length band (characters), shared with title generation.
pub const TITLE_MIN_CHARS: usize = 50;
pub const TITLE_MAX_CHARS: usize = 60;

/// One scored feature with its contribution and a human-readable message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeoCheck {
    pub id: String,
    pub points: u32,
    pub max_points: u32,
    pub message: String,
}

/// Full SEO report for an article. Persisted as `articles.seo_data`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeoReport {
    pub score: u32,
    pub checks: Vec<SeoCheck>,
    pub word_count: u32,
    pub keyword_count: u32,
    pub density: f64,
    /// Advisory only — title length does not contribute to `score`.
    pub title_length_ok: bool,
}

/// Scores an article against its focus keyword.
pub fn analyze(title: &str, content_html: &str, keyword: &str) -> SeoReport {
    let mut checks = Vec::with_capacity(5);

    let keyword_in_title = count_occurrences(title, keyword) > 0;
    checks.push(SeoCheck {
        id: "keyword_in_title".to_string(),
        points: if keyword_in_title { TITLE_KEYWORD_POINTS } else { 0 },
        max_points: TITLE_KEYWORD_POINTS,
        message: if keyword_in_title {
            format!("Focus keyword \"{keyword}\" appears in the title.")
        } else {
            format!("Focus keyword \"{keyword}\" is missing from the title.")
        },
    });

    let text = crate::content::html::strip_tags(content_html);
    let keyword_count = count_occurrences(&text, keyword);
    let keyword_points = match keyword_count {
        0 => 0,
        1..=2 => 15,
        c if c <= MAX_KEYWORD_OCCURRENCES => KEYWORD_COUNT_POINTS,
        _ => 10, // over-optimized
    };
    checks.push(SeoCheck {
        id: "keyword_count".to_string(),
        points: keyword_points,
        max_points: KEYWORD_COUNT_POINTS,
        message: format!("Focus keyword appears {keyword_count} time(s) in the content."),
    });

    let word_count = count_words_in_html(content_html);
    let word_points = match word_count {
        w if w >= 1500 => WORD_COUNT_POINTS,
        w if w >= 1000 => 15,
        w if w >= 600 => 10,
        w if w >= 300 => 5,
        _ => 0,
    };
    checks.push(SeoCheck {
        id: "word_count".to_string(),
        points: word_points,
        max_points: WORD_COUNT_POINTS,
        message: format!("Content length is {word_count} words."),
    });

    let h2_count = count_h2(content_html);
    let heading_points = match h2_count {
        h if h >= 4 => HEADING_POINTS,
        h if h >= 2 => 10,
        1 => 5,
        _ => 0,
    };
    checks.push(SeoCheck {
        id: "headings".to_string(),
        points: heading_points,
        max_points: HEADING_POINTS,
        message: format!("Content has {h2_count} H2 section heading(s)."),
    });

    let link_count = count_links(content_html);
    let link_points = match link_count {
        l if l >= 3 => LINK_POINTS,
        l if l >= 1 => 8,
        _ => 0,
    };
    checks.push(SeoCheck {
        id: "links".to_string(),
        points: link_points,
        max_points: LINK_POINTS,
        message: format!("Content has {link_count} link(s)."),
    });

    let score: u32 = checks.iter().map(|c| c.points).sum();
    let density = if word_count > 0 {
        keyword_count as f64 / word_count as f64 * 100.0
    } else {
        0.0
    };

    SeoReport {
        score: score.min(MAX_SCORE),
        checks,
        word_count,
        keyword_count,
        density,
        title_length_ok: title_length_ok(title),
    }
}

/// True when the title falls in the 50–60 character band.
pub fn title_length_ok(title: &str) -> bool {
    let len = title.chars().count();
    (TITLE_MIN_CHARS..=TITLE_MAX_CHARS).contains(&len)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Builds content with exactly `words` words, `keyword_count` keyword
    /// occurrences, `h2s` H2 headings, and `links` links.
    fn fixture_content(keyword_count: u32, words: u32, h2s: u32, links: u32) -> String {
        let mut out = String::new();
        for i in 0..h2s {
            out.push_str(&format!("<h2>Section {i}</h2>"));
        }
        for i in 0..links {
            out.push_str(&format!("<a href=\"/p{i}\">link</a>"));
        }
        out.push_str("<p>");
        for _ in 0..keyword_count {
            out.push_str("espresso ");
        }
        // filler words; headings and links already contributed words above
        let used = keyword_count + h2s * 2 + links;
        for i in 0..words.saturating_sub(used) {
            out.push_str(&format!("w{i} "));
        }
        out.push_str("</p>");
        out
    }

    #[test]
    fn test_well_optimized_article_scores_exactly_100() {
        // keyword in title + 3 occurrences + 1800 words + 5 H2 + 5 links -> 100
        let content = fixture_content(3, 1800, 5, 5);
        let report = analyze("The Best Espresso Guide", &content, "espresso");
        assert_eq!(report.score, 100);
        assert_eq!(report.keyword_count, 3);
        assert_eq!(report.word_count, 1800);
    }

    #[test]
    fn test_empty_content_scores_zero_body_checks() {
        let report = analyze("No keyword here", "", "espresso");
        assert_eq!(report.score, 0);
        assert_eq!(report.word_count, 0);
        assert_eq!(report.density, 0.0);
    }

    #[test]
    fn test_missing_title_keyword_loses_25() {
        let content = fixture_content(3, 1800, 5, 5);
        let report = analyze("A title without it", &content, "espresso");
        assert_eq!(report.score, 75);
    }

    #[test]
    fn test_over_optimized_keyword_count_is_penalized() {
        let content = fixture_content(12, 1800, 5, 5);
        let report = analyze("Espresso", &content, "espresso");
        let check = report
            .checks
            .iter()
            .find(|c| c.id == "keyword_count")
            .unwrap();
        assert_eq!(check.points, 10);
    }

    #[test]
    fn test_word_count_buckets() {
        for (words, expected) in [(200, 0), (400, 5), (800, 10), (1200, 15), (1600, 20)] {
            let content = fixture_content(0, words, 0, 0);
            let report = analyze("t", &content, "espresso");
            let check = report.checks.iter().find(|c| c.id == "word_count").unwrap();
            assert_eq!(check.points, expected, "words={words}");
        }
    }

    #[test]
    fn test_title_length_band() {
        assert!(!title_length_ok("Short"));
        assert!(title_length_ok(&"x".repeat(50)));
        assert!(title_length_ok(&"x".repeat(60)));
        assert!(!title_length_ok(&"x".repeat(61)));
    }
}
