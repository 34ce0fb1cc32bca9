//! Small regex helpers over article HTML. Everything here is a single pass
//! over the input — no DOM, no incremental state.

use once_cell::sync::Lazy;
use regex::Regex;

static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("valid tag regex"));
static H2_OPEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)<h2[^>]*>").expect("valid h2 regex"));
static LINK_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<a\s[^>]*>").expect("valid link regex"));

/// Replaces every HTML tag with a single space so adjacent words don't fuse.
pub fn strip_tags(html: &str) -> String {
    TAG_RE.replace_all(html, " ").into_owned()
}

/// Whitespace-delimited word count over tag-stripped text.
pub fn count_words(text: &str) -> u32 {
    text.split_whitespace().count() as u32
}

/// Word count of an HTML fragment after stripping tags.
pub fn count_words_in_html(html: &str) -> u32 {
    count_words(&strip_tags(html))
}

/// Number of `<h2>` opening tags in the fragment.
pub fn count_h2(html: &str) -> u32 {
    H2_OPEN_RE.find_iter(html).count() as u32
}

/// Number of `<a>` tags in the fragment.
pub fn count_links(html: &str) -> u32 {
    LINK_RE.find_iter(html).count() as u32
}
