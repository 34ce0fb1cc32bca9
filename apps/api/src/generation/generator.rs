//! Article generation — orchestrates the full writing pipeline.
//!
//! Flow: plan outline → write intro → write sections one at a time, each
//! prompt carrying a keyword budget computed from everything accumulated so
//! far → validate each section against its budget → assemble → SEO score →
//! persist as a draft article.

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tracing::{info, warn};
use uuid::Uuid;

use crate::content::html::count_words_in_html;
use crate::errors::AppError;
use crate::generation::prompts::{
    INTRO_PROMPT_TEMPLATE, OUTLINE_PROMPT_TEMPLATE, OUTLINE_SYSTEM, SECTION_PROMPT_TEMPLATE,
    SECTION_SYSTEM,
};
use crate::llm_client::{strip_json_fences, LlmClient};
use crate::seo::keyword_scanner::{
    keyword_budget, scan_keywords, validate_generated_content, KeywordBudget,
};
use crate::seo::scoring::{self, SeoReport};

/// Section count bounds for a single generation run.
const MIN_SECTIONS: u32 = 2;
const MAX_SECTIONS: u32 = 10;
const DEFAULT_SECTIONS: u32 = 5;

// ────────────────────────────────────────────────────────────────────────────
// Data models
// ────────────────────────────────────────────────────────────────────────────

/// Outline returned by the planning LLM call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Outline {
    pub title: String,
    pub meta_description: String,
    pub sections: Vec<OutlineSection>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutlineSection {
    pub heading: String,
    pub talking_points: Vec<String>,
}

/// Request body for article generation.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateArticleRequest {
    pub topic: String,
    pub keyword: String,
    pub language: Option<String>,
    pub section_count: Option<u32>,
    pub website_id: Option<Uuid>,
}

/// Response from the generation pipeline.
#[derive(Debug, Clone, Serialize)]
pub struct GenerateArticleResponse {
    pub article_id: Uuid,
    pub title: String,
    pub word_count: u32,
    pub seo: SeoReport,
    pub sections_generated: usize,
    /// Sections that exceeded their keyword budget even after a retry.
    pub keyword_warnings: Vec<String>,
    pub status: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Generation pipeline
// ────────────────────────────────────────────────────────────────────────────

/// Runs the full article generation pipeline and persists the draft.
pub async fn generate_article(
    pool: &PgPool,
    llm: &LlmClient,
    request: GenerateArticleRequest,
) -> Result<GenerateArticleResponse, AppError> {
    let topic = request.topic.trim();
    let keyword = request.keyword.trim();
    if topic.is_empty() {
        return Err(AppError::Validation("topic cannot be empty".to_string()));
    }
    if keyword.is_empty() {
        return Err(AppError::Validation("keyword cannot be empty".to_string()));
    }

    let language = request
        .language
        .clone()
        .unwrap_or_else(|| "English".to_string());
    let section_count = request
        .section_count
        .unwrap_or(DEFAULT_SECTIONS)
        .clamp(MIN_SECTIONS, MAX_SECTIONS);

    // Step 1: Plan the outline
    info!("Planning outline for topic \"{topic}\" (keyword \"{keyword}\")");
    let outline = plan_outline(llm, topic, keyword, &language, section_count).await?;
    info!(
        "Outline planned: \"{}\" with {} sections",
        outline.title,
        outline.sections.len()
    );

    // Step 2: Write the intro, then each section with a fresh keyword budget
    let mut content = String::new();
    let mut headings: Vec<String> = Vec::new();
    let mut keyword_warnings = Vec::new();

    let budget = next_section_budget(&content, keyword);
    let intro = write_intro(llm, &outline.title, &budget, &language).await?;
    content.push_str(&intro);

    for section in &outline.sections {
        let budget = next_section_budget(&content, keyword);

        let html = write_section(llm, &outline, section, &headings, &budget, &language).await?;

        let validation = validate_generated_content(&html, keyword, budget.max_in_next_section);
        let html = if validation.violation {
            warn!(
                "Section \"{}\" used the keyword {} time(s) (budget {}), regenerating",
                section.heading, validation.new_occurrences, validation.max_allowed
            );
            let strict = KeywordBudget {
                max_in_next_section: 0,
                directive: format!(
                    "Do NOT use the focus keyword \"{keyword}\" anywhere in this section. \
                    Use synonyms and related phrases only."
                ),
            };
            let retry = write_section(llm, &outline, section, &headings, &strict, &language).await?;
            let recheck =
                validate_generated_content(&retry, keyword, budget.max_in_next_section);
            if recheck.violation {
                warn!(
                    "Section \"{}\" still over budget after retry, accepting as-is",
                    section.heading
                );
                keyword_warnings.push(section.heading.clone());
            }
            retry
        } else {
            html
        };

        content.push_str(&html);
        headings.push(section.heading.clone());
    }

    // Step 3: Score and persist the draft
    let seo = scoring::analyze(&outline.title, &content, keyword);
    let word_count = count_words_in_html(&content);
    let article_id = Uuid::new_v4();

    let seo_data = serde_json::to_value(&seo)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to serialize SEO report: {e}")))?;

    sqlx::query(
        r#"
        INSERT INTO articles
            (id, title, focus_keyword, content, status, language, word_count, seo_score, seo_data, website_id)
        VALUES ($1, $2, $3, $4, 'draft', $5, $6, $7, $8, $9)
        "#,
    )
    .bind(article_id)
    .bind(&outline.title)
    .bind(keyword)
    .bind(&content)
    .bind(&language)
    .bind(word_count as i32)
    .bind(seo.score as i32)
    .bind(&seo_data)
    .bind(request.website_id)
    .execute(pool)
    .await?;

    info!(
        "Generated article {article_id}: {} words, SEO {}/100, {} keyword warning(s)",
        word_count,
        seo.score,
        keyword_warnings.len()
    );

    Ok(GenerateArticleResponse {
        article_id,
        title: outline.title,
        word_count,
        seo,
        sections_generated: headings.len(),
        keyword_warnings,
        status: "draft".to_string(),
    })
}

/// Budget for the next section, scanned over the HTML accumulated so far.
/// Section `<h2>`s are already embedded in that HTML, so no separate heading
/// list is passed — the scanner would count each heading twice.
fn next_section_budget(content: &str, keyword: &str) -> KeywordBudget {
    let scan = scan_keywords(content, &[], keyword);
    keyword_budget(&scan, keyword)
}

/// Plans the article outline via a JSON LLM call.
pub async fn plan_outline(
    llm: &LlmClient,
    topic: &str,
    keyword: &str,
    language: &str,
    section_count: u32,
) -> Result<Outline, AppError> {
    let prompt = OUTLINE_PROMPT_TEMPLATE
        .replace("{topic}", topic)
        .replace("{keyword}", keyword)
        .replace("{language}", language)
        .replace("{section_count}", &section_count.to_string());

    let outline: Outline = llm
        .call_json(&prompt, OUTLINE_SYSTEM)
        .await
        .map_err(|e| AppError::Llm(format!("Outline planning failed: {e}")))?;

    if outline.sections.is_empty() {
        return Err(AppError::Llm(
            "Outline planning returned no sections".to_string(),
        ));
    }

    Ok(outline)
}

async fn write_intro(
    llm: &LlmClient,
    article_title: &str,
    budget: &KeywordBudget,
    language: &str,
) -> Result<String, AppError> {
    let prompt = INTRO_PROMPT_TEMPLATE
        .replace("{article_title}", article_title)
        .replace("{keyword_directive}", &budget.directive)
        .replace("{language}", language);

    let html = llm
        .call_text(&prompt, SECTION_SYSTEM)
        .await
        .map_err(|e| AppError::Llm(format!("Intro generation failed: {e}")))?;

    Ok(strip_json_fences(&html).to_string())
}

async fn write_section(
    llm: &LlmClient,
    outline: &Outline,
    section: &OutlineSection,
    prior_headings: &[String],
    budget: &KeywordBudget,
    language: &str,
) -> Result<String, AppError> {
    let talking_points = section
        .talking_points
        .iter()
        .map(|p| format!("- {p}"))
        .collect::<Vec<_>>()
        .join("\n");

    let prior = if prior_headings.is_empty() {
        "(none yet)".to_string()
    } else {
        prior_headings.join("; ")
    };

    let prompt = SECTION_PROMPT_TEMPLATE
        .replace("{article_title}", &outline.title)
        .replace("{heading}", &section.heading)
        .replace("{talking_points}", &talking_points)
        .replace("{keyword_directive}", &budget.directive)
        .replace("{language}", language)
        .replace("{prior_headings}", &prior);

    let html = llm
        .call_text(&prompt, SECTION_SYSTEM)
        .await
        .map_err(|e| AppError::Llm(format!("Section generation failed: {e}")))?;

    Ok(strip_json_fences(&html).to_string())
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outline_deserializes() {
        let json = r#"{
            "title": "Espresso at Home: The Complete Beginner Brewing Guide",
            "meta_description": "Learn to pull great shots at home.",
            "sections": [
                {"heading": "Choosing a Machine", "talking_points": ["budget", "pressure"]},
                {"heading": "Dialing In", "talking_points": ["grind size", "dose"]}
            ]
        }"#;
        let outline: Outline = serde_json::from_str(json).unwrap();
        assert_eq!(outline.sections.len(), 2);
        assert_eq!(outline.sections[0].heading, "Choosing a Machine");
    }

    #[test]
    fn test_generate_request_defaults_are_optional() {
        let json = serde_json::json!({
            "topic": "home espresso",
            "keyword": "espresso"
        });
        let request: GenerateArticleRequest = serde_json::from_value(json).unwrap();
        assert!(request.language.is_none());
        assert!(request.section_count.is_none());
        assert!(request.website_id.is_none());
    }

    #[test]
    fn test_next_section_budget_counts_embedded_headings_once() {
        // One occurrence lives in the <h2>, four in the body, 2000 filler
        // words. 5 of 6 allowed occurrences used -> exactly one left. Counting
        // the heading again would hit the cap and wrongly forbid the keyword.
        let filler = "word ".repeat(2000);
        let content = format!(
            "<h2>Coffee Brewing</h2><p>coffee coffee coffee coffee {filler}</p>"
        );
        let budget = next_section_budget(&content, "coffee");
        assert_eq!(budget.max_in_next_section, 1);
    }

    #[test]
    fn test_next_section_budget_counts_heading_words_once() {
        // 2 heading words + 3 body words; a double count would report 7.
        let content = "<h2>Coffee Guide</h2><p>Beans and water.</p>";
        let scan = scan_keywords(content, &[], "coffee");
        assert_eq!(scan.total_words, 5);
        assert_eq!(scan.total_keywords, 1);
    }

    #[test]
    fn test_section_count_clamping() {
        assert_eq!(0_u32.clamp(MIN_SECTIONS, MAX_SECTIONS), MIN_SECTIONS);
        assert_eq!(50_u32.clamp(MIN_SECTIONS, MAX_SECTIONS), MAX_SECTIONS);
        assert_eq!(DEFAULT_SECTIONS.clamp(MIN_SECTIONS, MAX_SECTIONS), DEFAULT_SECTIONS);
    }
}
