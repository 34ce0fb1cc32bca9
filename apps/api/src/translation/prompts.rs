// All LLM prompt constants for the Translation module.
// Reuses cross-cutting fragments from llm_client::prompts.

/// System prompt for metadata translation — enforces JSON-only output.
pub const METADATA_SYSTEM: &str = "You are a professional translator for web content. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences.";

/// Metadata prompt template. Replace `{title}`, `{meta_description}`,
/// `{source_language}`, `{target_language}`.
pub const METADATA_PROMPT_TEMPLATE: &str = r#"Translate this article metadata from {source_language} to {target_language}.

Return a JSON object with this EXACT schema:
{
  "title": "translated title",
  "meta_description": "translated meta description, or null if the input was empty"
}

Keep the title natural and idiomatic in {target_language}; do not translate word-for-word.

TITLE: {title}
META DESCRIPTION: {meta_description}"#;

/// System prompt for section translation — output is the translated HTML fragment.
pub const SECTION_SYSTEM: &str = "You are a professional translator for web content. \
    You translate HTML fragments. Respond with the translated fragment only: \
    no commentary, no markdown, no code fences.";

/// Section prompt template. Replace `{html_preserve_instruction}`, `{heading}`,
/// `{html}`, `{source_language}`, `{target_language}`.
pub const SECTION_PROMPT_TEMPLATE: &str = r#"Translate the following article section from {source_language} to {target_language}.

{html_preserve_instruction}

Section heading (for context): {heading}

SECTION HTML:
{html}"#;
