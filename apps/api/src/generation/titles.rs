//! Title generation — LLM candidates annotated against the 50–60 character
//! rule and the focus-keyword check shared with SEO scoring.

use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::generation::prompts::{TITLE_PROMPT_TEMPLATE, TITLE_SYSTEM};
use crate::llm_client::LlmClient;
use crate::seo::keyword_scanner::count_occurrences;
use crate::seo::scoring::title_length_ok;

/// How many candidates to request when the caller doesn't say.
pub const DEFAULT_TITLE_COUNT: u32 = 5;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TitleCandidate {
    pub title: String,
    pub length: usize,
    /// True when the title falls in the 50–60 character band.
    pub length_ok: bool,
    pub has_keyword: bool,
}

/// Requests title candidates from the LLM and annotates each one.
pub async fn generate_titles(
    llm: &LlmClient,
    topic: &str,
    keyword: &str,
    count: u32,
) -> Result<Vec<TitleCandidate>, AppError> {
    let prompt = TITLE_PROMPT_TEMPLATE
        .replace("{count}", &count.to_string())
        .replace("{topic}", topic)
        .replace("{keyword}", keyword);

    let raw: Vec<String> = llm
        .call_json(&prompt, TITLE_SYSTEM)
        .await
        .map_err(|e| AppError::Llm(format!("Title generation failed: {e}")))?;

    if raw.is_empty() {
        return Err(AppError::Llm("Title generation returned no candidates".to_string()));
    }

    Ok(annotate_titles(raw, keyword))
}

/// Pure annotation step, separated from the LLM call for testability.
pub fn annotate_titles(raw: Vec<String>, keyword: &str) -> Vec<TitleCandidate> {
    raw.into_iter()
        .map(|title| {
            let title = title.trim().to_string();
            let length = title.chars().count();
            TitleCandidate {
                length,
                length_ok: title_length_ok(&title),
                has_keyword: count_occurrences(&title, keyword) > 0,
                title,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_annotation_flags_length_and_keyword() {
        let titles = vec![
            "Espresso at Home: The Complete Beginner Brewing Guide".to_string(), // 53 chars
            "Short".to_string(),
        ];
        let annotated = annotate_titles(titles, "espresso");

        assert_eq!(annotated[0].length, 53);
        assert!(annotated[0].length_ok);
        assert!(annotated[0].has_keyword);

        assert!(!annotated[1].length_ok);
        assert!(!annotated[1].has_keyword);
    }

    #[test]
    fn test_annotation_trims_whitespace() {
        let annotated = annotate_titles(vec!["  padded title  ".to_string()], "padded");
        assert_eq!(annotated[0].title, "padded title");
        assert!(annotated[0].has_keyword);
    }
}
