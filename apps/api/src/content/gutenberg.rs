//! HTML → Gutenberg block markup. WordPress stores block posts as HTML
//! bracketed by `<!-- wp:* -->` serialization comments; this converter wraps
//! recognized top-level elements and passes everything else through as
//! `<!-- wp:html -->` so no content is lost.

use once_cell::sync::Lazy;
use regex::Regex;

static BLOCK_OPEN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)<(p|h[1-6]|ul|ol|blockquote|pre|figure|img)\b[^>]*>")
        .expect("valid block-open regex")
});

/// Converts an HTML fragment to Gutenberg block markup.
pub fn html_to_gutenberg(html: &str) -> String {
    let mut out = String::with_capacity(html.len() * 2);
    let mut cursor = 0;

    while cursor < html.len() {
        let Some(m) = BLOCK_OPEN_RE.find_at(html, cursor) else {
            push_raw(&mut out, &html[cursor..]);
            break;
        };

        push_raw(&mut out, &html[cursor..m.start()]);

        let tag = tag_name(m.as_str());
        let block_end = if tag == "img" {
            m.end()
        } else {
            find_close(html, m.end(), &tag).unwrap_or(html.len())
        };
        let block = &html[m.start()..block_end];

        let (open_comment, close_comment) = block_comments(&tag);
        out.push_str(&open_comment);
        out.push('\n');
        out.push_str(block);
        out.push('\n');
        out.push_str(close_comment);
        out.push('\n');

        cursor = block_end;
    }

    out.trim_end().to_string()
}

/// Wraps unrecognized non-whitespace content in a wp:html block.
fn push_raw(out: &mut String, raw: &str) {
    if raw.trim().is_empty() {
        return;
    }
    out.push_str("<!-- wp:html -->\n");
    out.push_str(raw.trim());
    out.push_str("\n<!-- /wp:html -->\n");
}

/// Lowercased element name from an opening tag like `<H2 class="x">`.
fn tag_name(open_tag: &str) -> String {
    open_tag
        .trim_start_matches('<')
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_ascii_lowercase()
}

/// Byte offset just past the first matching close tag, case-insensitive.
/// Same-tag nesting is not tracked; article content doesn't nest these blocks.
fn find_close(html: &str, from: usize, tag: &str) -> Option<usize> {
    let re = Regex::new(&format!(r"(?i)</{tag}\s*>")).ok()?;
    re.find_at(html, from).map(|m| m.end())
}

/// Gutenberg serialization comments for a recognized element.
fn block_comments(tag: &str) -> (String, &'static str) {
    match tag {
        "p" => ("<!-- wp:paragraph -->".to_string(), "<!-- /wp:paragraph -->"),
        "ul" => ("<!-- wp:list -->".to_string(), "<!-- /wp:list -->"),
        "ol" => (
            "<!-- wp:list {\"ordered\":true} -->".to_string(),
            "<!-- /wp:list -->",
        ),
        "blockquote" => ("<!-- wp:quote -->".to_string(), "<!-- /wp:quote -->"),
        "pre" => ("<!-- wp:code -->".to_string(), "<!-- /wp:code -->"),
        "figure" | "img" => ("<!-- wp:image -->".to_string(), "<!-- /wp:image -->"),
        t if t.starts_with('h') => {
            // Gutenberg omits the level attribute for the default h2
            let level: u8 = t[1..].parse().unwrap_or(2);
            if level == 2 {
                ("<!-- wp:heading -->".to_string(), "<!-- /wp:heading -->")
            } else {
                (
                    format!("<!-- wp:heading {{\"level\":{level}}} -->"),
                    "<!-- /wp:heading -->",
                )
            }
        }
        _ => ("<!-- wp:html -->".to_string(), "<!-- /wp:html -->"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paragraph_wrapped() {
        let out = html_to_gutenberg("<p>Hello</p>");
        assert_eq!(
            out,
            "<!-- wp:paragraph -->\n<p>Hello</p>\n<!-- /wp:paragraph -->"
        );
    }

    #[test]
    fn test_h2_uses_default_heading_block() {
        let out = html_to_gutenberg("<h2>Title</h2>");
        assert!(out.starts_with("<!-- wp:heading -->"));
        assert!(!out.contains("level"));
    }

    #[test]
    fn test_h3_carries_level_attribute() {
        let out = html_to_gutenberg("<h3>Sub</h3>");
        assert!(out.contains("<!-- wp:heading {\"level\":3} -->"));
    }

    #[test]
    fn test_ordered_list_attribute() {
        let out = html_to_gutenberg("<ol><li>a</li></ol>");
        assert!(out.contains("{\"ordered\":true}"));
    }

    #[test]
    fn test_image_tag_is_self_contained() {
        let out = html_to_gutenberg("<img src=\"/x.png\" alt=\"\"><p>after</p>");
        assert!(out.contains("<!-- wp:image -->\n<img src=\"/x.png\" alt=\"\">\n<!-- /wp:image -->"));
        assert!(out.contains("<!-- wp:paragraph -->"));
    }

    #[test]
    fn test_unrecognized_content_passes_through_as_html_block() {
        let out = html_to_gutenberg("<table><tr><td>x</td></tr></table>");
        assert!(out.starts_with("<!-- wp:html -->"));
        assert!(out.contains("<table>"));
    }

    #[test]
    fn test_full_article_block_order_preserved() {
        let out = html_to_gutenberg("<p>intro</p><h2>A</h2><p>body</p>");
        let intro = out.find("<p>intro</p>").unwrap();
        let heading = out.find("<h2>A</h2>").unwrap();
        let body = out.find("<p>body</p>").unwrap();
        assert!(intro < heading && heading < body);
    }
}
