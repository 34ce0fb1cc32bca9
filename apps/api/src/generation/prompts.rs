// All LLM prompt constants for the Generation module.
// Reuses cross-cutting fragments from llm_client::prompts.

/// System prompt for outline planning — enforces JSON-only output.
pub const OUTLINE_SYSTEM: &str = "You are an expert SEO content strategist planning \
    a long-form article. You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Outline prompt template. Replace `{topic}`, `{keyword}`, `{language}`,
/// `{section_count}` before sending.
pub const OUTLINE_PROMPT_TEMPLATE: &str = r#"Plan a long-form article about the topic below, written in {language}.

Return a JSON object with this EXACT schema (no extra fields):
{
  "title": "An engaging, SEO-friendly article title",
  "meta_description": "A meta description under 160 characters",
  "sections": [
    {
      "heading": "Section heading text (no HTML tags)",
      "talking_points": ["point one", "point two"]
    }
  ]
}

Rules:
- Produce exactly {section_count} sections.
- The title SHOULD contain the focus keyword and be 50-60 characters long.
- Headings must not repeat each other and must not all contain the focus keyword.
- Talking points are short phrases, 2-4 per section.

TOPIC: {topic}
FOCUS KEYWORD: {keyword}"#;

/// System prompt for section writing — output is an HTML fragment, not JSON.
pub const SECTION_SYSTEM: &str = "You are an expert long-form content writer. \
    You write clean HTML fragments: <h2> for the section heading, <p> for \
    paragraphs, <ul>/<li> for lists. No <html>, <head>, or <body> tags. \
    No markdown. No code fences. No commentary outside the HTML.";

/// Section prompt template. Replace `{article_title}`, `{heading}`,
/// `{talking_points}`, `{keyword_directive}`, `{language}`, `{prior_headings}`.
pub const SECTION_PROMPT_TEMPLATE: &str = r#"Write the next section of the article "{article_title}" in {language}.

Section heading: {heading}
Talking points to cover:
{talking_points}

Sections already written (do not repeat their content):
{prior_headings}

KEYWORD RULE for this section:
{keyword_directive}

Requirements:
- Start with exactly one <h2> containing the section heading.
- 150-300 words of body text in <p> paragraphs (a short <ul> list is allowed).
- Write naturally for readers first; never keyword-stuff."#;

/// Intro prompt template. Replace `{article_title}`, `{keyword_directive}`,
/// `{language}`.
pub const INTRO_PROMPT_TEMPLATE: &str = r#"Write the opening of the article "{article_title}" in {language}.

KEYWORD RULE for this section:
{keyword_directive}

Requirements:
- 2 short <p> paragraphs, no heading.
- Hook the reader and state what the article covers."#;

/// System prompt for title generation — enforces JSON-only output.
pub const TITLE_SYSTEM: &str = "You are an expert SEO copywriter generating article \
    title candidates. You MUST respond with a valid JSON array of strings only. \
    Do NOT include any text outside the JSON array. \
    Do NOT use markdown code fences.";

/// Title prompt template. Replace `{topic}`, `{keyword}`, `{count}`.
pub const TITLE_PROMPT_TEMPLATE: &str = r#"Generate {count} article title candidates for the topic below.

Rules:
- Each title SHOULD contain the focus keyword.
- Aim for 50-60 characters per title.
- Vary the angle: how-to, listicle, question, statement.

Return a JSON array of strings, nothing else:
["Title one", "Title two"]

TOPIC: {topic}
FOCUS KEYWORD: {keyword}"#;
