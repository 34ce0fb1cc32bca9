//! Splits article HTML on `<h2>` boundaries into ordered sections.
//!
//! Invariant: concatenating the `original` field of every section, in order,
//! reconstructs the input byte-for-byte. The translation driver and the
//! generation pipeline both rely on this.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::content::html::strip_tags;

static H2_OPEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)<h2[^>]*>").expect("valid h2 regex"));
static H2_BLOCK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<h2[^>]*>(.*?)</h2>").expect("valid h2 block regex"));

/// One ordered slice of an article, delimited by `<h2>` boundaries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Section {
    pub index: usize,
    /// Tag-stripped inner text of the section's `<h2>`; empty for the intro.
    pub title: String,
    /// The exact byte slice of the input covered by this section.
    pub original: String,
}

/// Splits `html` into sections. A non-empty intro before the first `<h2>`
/// becomes section 0 with an empty title; whitespace-only intros are folded
/// into the first heading section so no bytes are lost.
pub fn split_into_sections(html: &str) -> Vec<Section> {
    if html.is_empty() {
        return Vec::new();
    }

    let boundaries: Vec<usize> = H2_OPEN_RE.find_iter(html).map(|m| m.start()).collect();

    if boundaries.is_empty() {
        return vec![Section {
            index: 0,
            title: String::new(),
            original: html.to_string(),
        }];
    }

    let mut sections = Vec::with_capacity(boundaries.len() + 1);
    let intro = &html[..boundaries[0]];
    let mut fold_intro = "";

    if intro.is_empty() || intro.trim().is_empty() {
        fold_intro = intro;
    } else {
        sections.push(Section {
            index: 0,
            title: String::new(),
            original: intro.to_string(),
        });
    }

    for (i, &start) in boundaries.iter().enumerate() {
        let end = boundaries.get(i + 1).copied().unwrap_or(html.len());
        let body = &html[start..end];
        let original = if i == 0 {
            format!("{fold_intro}{body}")
        } else {
            body.to_string()
        };
        sections.push(Section {
            index: sections.len(),
            title: heading_text(body),
            original,
        });
    }

    sections
}

/// Extracts and tag-strips the inner text of the first `<h2>…</h2>` block.
fn heading_text(section_html: &str) -> String {
    H2_BLOCK_RE
        .captures(section_html)
        .and_then(|c| c.get(1))
        .map(|m| {
            strip_tags(m.as_str())
                .split_whitespace()
                .collect::<Vec<_>>()
                .join(" ")
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reconstruct(sections: &[Section]) -> String {
        sections.iter().map(|s| s.original.as_str()).collect()
    }

    #[test]
    fn test_k_headings_with_intro_yield_k_plus_one_sections() {
        let html = "<p>intro</p><h2>A</h2><p>one</p><h2>B</h2><p>two</p><h2>C</h2><p>three</p>";
        let sections = split_into_sections(html);
        assert_eq!(sections.len(), 4);
        assert_eq!(sections[0].title, "");
        assert_eq!(sections[1].title, "A");
        assert_eq!(sections[3].title, "C");
    }

    #[test]
    fn test_reconstruction_is_byte_exact() {
        let html = "<p>intro</p><h2 class=\"x\">A</h2><p>one</p><H2>B</H2><p>two</p>";
        let sections = split_into_sections(html);
        assert_eq!(reconstruct(&sections), html);
    }

    #[test]
    fn test_whitespace_intro_is_folded_not_dropped() {
        let html = "\n  <h2>A</h2><p>one</p>";
        let sections = split_into_sections(html);
        assert_eq!(sections.len(), 1);
        assert_eq!(reconstruct(&sections), html);
        assert_eq!(sections[0].title, "A");
    }

    #[test]
    fn test_no_headings_is_single_untitled_section() {
        let html = "<p>just a body</p>";
        let sections = split_into_sections(html);
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].title, "");
        assert_eq!(reconstruct(&sections), html);
    }

    #[test]
    fn test_empty_input_yields_no_sections() {
        assert!(split_into_sections("").is_empty());
    }

    #[test]
    fn test_heading_text_strips_inner_tags() {
        let html = "<h2>The <em>Best</em> Part</h2><p>x</p>";
        let sections = split_into_sections(html);
        assert_eq!(sections[0].title, "The Best Part");
    }

    #[test]
    fn test_indices_are_sequential() {
        let html = "<p>i</p><h2>A</h2><h2>B</h2>";
        let sections = split_into_sections(html);
        let indices: Vec<usize> = sections.iter().map(|s| s.index).collect();
        assert_eq!(indices, vec![0, 1, 2]);
    }
}
