//! Markdown → HTML via pulldown-cmark. The generation LLM is asked for HTML,
//! but imported drafts and some model outputs arrive as Markdown.

use pulldown_cmark::{html, Options, Parser};

/// Renders Markdown to HTML with tables and strikethrough enabled.
pub fn markdown_to_html(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);

    let parser = Parser::new_ext(markdown, options);
    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}

/// True when the content looks like Markdown rather than HTML — used to decide
/// whether an incoming draft needs conversion before scoring or publishing.
pub fn looks_like_markdown(content: &str) -> bool {
    let trimmed = content.trim_start();
    if trimmed.starts_with('<') {
        return false;
    }
    content
        .lines()
        .any(|l| l.starts_with("# ") || l.starts_with("## ") || l.starts_with("- ") || l.starts_with("* "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading_and_paragraph() {
        let html = markdown_to_html("## Brewing\n\nGrind the beans.");
        assert!(html.contains("<h2>Brewing</h2>"));
        assert!(html.contains("<p>Grind the beans.</p>"));
    }

    #[test]
    fn test_list_rendering() {
        let html = markdown_to_html("- one\n- two\n");
        assert!(html.contains("<ul>"));
        assert!(html.contains("<li>one</li>"));
    }

    #[test]
    fn test_looks_like_markdown() {
        assert!(looks_like_markdown("## Title\n\nBody"));
        assert!(!looks_like_markdown("<p>already html</p>"));
        assert!(!looks_like_markdown("plain prose with no markers"));
    }
}
