#![allow(dead_code)]

// Cross-cutting prompt fragments shared by every module that builds prompts.
// Module-specific templates live next to their callers (generation::prompts,
// translation::prompts).

/// Instructs the model to return raw JSON with no surrounding prose.
/// Appended to every system prompt that expects `call_json`.
pub const JSON_ONLY_INSTRUCTION: &str = "You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Instructs the model to preserve HTML structure when rewriting or translating.
pub const HTML_PRESERVE_INSTRUCTION: &str = "Preserve ALL HTML tags and attributes \
    exactly as given. Only change the human-readable text between tags. \
    Never add, remove, or reorder tags.";
