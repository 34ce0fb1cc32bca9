//! Section-by-section article translation.
//!
//! The driver splits an article on `<h2>` boundaries, translates metadata
//! once, then walks the sections sequentially with a fixed pause between LLM
//! calls. A shared continue flag gates the loop so jobs can be paused before
//! the next section and resumed from the first pending one. Per-section
//! failures are recorded and skipped, never fatal to the job.

pub mod driver;
pub mod handlers;
pub mod jobs;
pub mod prompts;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::llm_client::prompts::HTML_PRESERVE_INSTRUCTION;
use crate::llm_client::{strip_json_fences, LlmClient};
use crate::translation::prompts::{
    METADATA_PROMPT_TEMPLATE, METADATA_SYSTEM, SECTION_PROMPT_TEMPLATE, SECTION_SYSTEM,
};

/// Translated article metadata, produced once per job before the section loop.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslatedMetadata {
    pub title: String,
    pub meta_description: Option<String>,
}

/// Pluggable translation backend. Carried in `AppState` as `Arc<dyn Translator>`
/// so the driver can be exercised without a live LLM.
#[async_trait]
pub trait Translator: Send + Sync {
    async fn translate_metadata(
        &self,
        title: &str,
        meta_description: Option<&str>,
        source_language: &str,
        target_language: &str,
    ) -> Result<TranslatedMetadata, AppError>;

    async fn translate_section(
        &self,
        heading: &str,
        html: &str,
        source_language: &str,
        target_language: &str,
    ) -> Result<String, AppError>;
}

/// Default backend: one Gemini call per section through the shared LLM client.
pub struct LlmTranslator {
    llm: LlmClient,
}

impl LlmTranslator {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl Translator for LlmTranslator {
    async fn translate_metadata(
        &self,
        title: &str,
        meta_description: Option<&str>,
        source_language: &str,
        target_language: &str,
    ) -> Result<TranslatedMetadata, AppError> {
        let prompt = METADATA_PROMPT_TEMPLATE
            .replace("{title}", title)
            .replace("{meta_description}", meta_description.unwrap_or(""))
            .replace("{source_language}", source_language)
            .replace("{target_language}", target_language);

        self.llm
            .call_json(&prompt, METADATA_SYSTEM)
            .await
            .map_err(|e| AppError::Llm(format!("Metadata translation failed: {e}")))
    }

    async fn translate_section(
        &self,
        heading: &str,
        html: &str,
        source_language: &str,
        target_language: &str,
    ) -> Result<String, AppError> {
        let prompt = SECTION_PROMPT_TEMPLATE
            .replace("{html_preserve_instruction}", HTML_PRESERVE_INSTRUCTION)
            .replace("{heading}", heading)
            .replace("{html}", html)
            .replace("{source_language}", source_language)
            .replace("{target_language}", target_language);

        let translated = self
            .llm
            .call_text(&prompt, SECTION_SYSTEM)
            .await
            .map_err(|e| AppError::Llm(format!("Section translation failed: {e}")))?;

        Ok(strip_json_fences(&translated).to_string())
    }
}
