//! Translation driver — the sequential section loop.
//!
//! Flow: split article on `<h2>` boundaries → translate metadata once →
//! translate sections one at a time with a fixed 500 ms pause between calls.
//! The continue flag is checked before every section; pausing stops the loop
//! there and resuming re-enters it at the first pending section. A failed
//! section is marked `error` and skipped, the loop moves on.

use std::sync::Arc;

use sqlx::PgPool;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::content::sections::split_into_sections;
use crate::errors::AppError;
use crate::models::article::ArticleRow;
use crate::translation::jobs::{
    JobHandle, JobRegistry, JobState, JobStatus, SectionState, SectionStatus, SECTION_PAUSE_MS,
};
use crate::translation::Translator;

/// Splits the article, registers a new job, and spawns the driver task.
/// Returns the job id and the number of sections.
pub async fn start_job(
    db: PgPool,
    translator: Arc<dyn Translator>,
    jobs: &JobRegistry,
    article: &ArticleRow,
    source_language: String,
    target_language: String,
) -> Result<(Uuid, usize), AppError> {
    let sections: Vec<SectionState> = split_into_sections(&article.content)
        .into_iter()
        .map(|s| SectionState {
            index: s.index,
            title: s.title,
            original: s.original,
            translated: None,
            status: SectionStatus::Pending,
            error: None,
        })
        .collect();

    if sections.is_empty() {
        return Err(AppError::Validation(
            "Article has no content to translate".to_string(),
        ));
    }

    let job_id = Uuid::new_v4();
    let total = sections.len();
    let state = JobState {
        id: job_id,
        article_id: article.id,
        source_language,
        target_language,
        status: JobStatus::Running,
        original_title: article.title.clone(),
        original_meta: None,
        translated_title: None,
        translated_meta: None,
        metadata_error: None,
        sections,
    };

    let handle = JobHandle::new(state);
    jobs.insert(job_id, handle.clone()).await;

    info!("Starting translation job {job_id} ({total} sections)");
    tokio::spawn(run_job(db, translator, handle));

    Ok((job_id, total))
}

/// Resumes a paused job by re-entering the loop at the first pending section.
pub async fn resume_job(
    db: PgPool,
    translator: Arc<dyn Translator>,
    handle: JobHandle,
) -> Result<(), AppError> {
    {
        let mut state = handle.state.write().await;
        if state.status != JobStatus::Paused {
            return Err(AppError::Conflict(format!(
                "Job {} is not paused",
                state.id
            )));
        }
        state.status = JobStatus::Running;
    }
    handle.clear_pause();

    info!("Resuming translation job");
    tokio::spawn(run_job(db, translator, handle));
    Ok(())
}

/// Runs the loop to completion or pause, then persists the finished result.
async fn run_job(db: PgPool, translator: Arc<dyn Translator>, handle: JobHandle) {
    let finished = run_translation(translator.as_ref(), &handle).await;
    if !finished {
        return; // paused — resume will spawn another run
    }

    if let Err(e) = persist_result(&db, &handle).await {
        error!("Failed to persist translation result: {e}");
    }
}

/// The sequential section loop. Returns true when every section has been
/// visited, false when the job was paused first.
pub(crate) async fn run_translation(translator: &dyn Translator, handle: &JobHandle) -> bool {
    // Metadata is translated once, before any section work.
    let needs_metadata = {
        let state = handle.state.read().await;
        state.translated_title.is_none() && state.metadata_error.is_none()
    };

    if needs_metadata {
        let (title, meta, source, target) = {
            let state = handle.state.read().await;
            (
                state.original_title.clone(),
                state.original_meta.clone(),
                state.source_language.clone(),
                state.target_language.clone(),
            )
        };

        match translator
            .translate_metadata(&title, meta.as_deref(), &source, &target)
            .await
        {
            Ok(translated) => {
                let mut state = handle.state.write().await;
                state.translated_title = Some(translated.title);
                state.translated_meta = translated.meta_description;
            }
            Err(e) => {
                warn!("Metadata translation failed, keeping original title: {e}");
                let mut state = handle.state.write().await;
                state.metadata_error = Some(e.to_string());
            }
        }
    }

    loop {
        if !handle.should_continue() {
            let mut state = handle.state.write().await;
            state.status = JobStatus::Paused;
            info!("Translation job {} paused", state.id);
            return false;
        }

        // Claim the next pending section and snapshot what the call needs.
        let (index, title, original, source, target) = {
            let mut state = handle.state.write().await;
            let Some(index) = state.next_pending() else {
                state.status = if state.has_errors() {
                    JobStatus::CompletedWithErrors
                } else {
                    JobStatus::Completed
                };
                let progress = state.progress();
                info!(
                    "Translation job {} finished: {}/{} sections, {} error(s)",
                    state.id, progress.completed, progress.total, progress.errored
                );
                return true;
            };
            state.sections[index].status = SectionStatus::Translating;
            (
                index,
                state.sections[index].title.clone(),
                state.sections[index].original.clone(),
                state.source_language.clone(),
                state.target_language.clone(),
            )
        };

        match translator
            .translate_section(&title, &original, &source, &target)
            .await
        {
            Ok(translated) => {
                let mut state = handle.state.write().await;
                state.sections[index].translated = Some(translated);
                state.sections[index].status = SectionStatus::Completed;
            }
            Err(e) => {
                warn!("Section {index} failed, continuing with the next one: {e}");
                let mut state = handle.state.write().await;
                state.sections[index].status = SectionStatus::Error;
                state.sections[index].error = Some(e.to_string());
            }
        }

        tokio::time::sleep(std::time::Duration::from_millis(SECTION_PAUSE_MS)).await;
    }
}

/// Upserts the finished translation as a `translations` row.
async fn persist_result(db: &PgPool, handle: &JobHandle) -> Result<(), AppError> {
    let state = handle.state.read().await;
    let title = state
        .translated_title
        .clone()
        .unwrap_or_else(|| state.original_title.clone());
    let content = state.assemble_content();
    let status = match state.status {
        JobStatus::Completed => "completed",
        _ => "partial",
    };

    sqlx::query(
        r#"
        INSERT INTO translations (id, article_id, language, title, content, meta_description, status)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        ON CONFLICT (article_id, language) DO UPDATE
            SET title = EXCLUDED.title,
                content = EXCLUDED.content,
                meta_description = EXCLUDED.meta_description,
                status = EXCLUDED.status,
                updated_at = now()
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(state.article_id)
    .bind(&state.target_language)
    .bind(&title)
    .bind(&content)
    .bind(&state.translated_meta)
    .bind(status)
    .execute(db)
    .await?;

    Ok(())
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::translation::TranslatedMetadata;

    /// Test backend: uppercases text, fails on configured section titles,
    /// optionally pauses the job after its first section call.
    struct MockTranslator {
        fail_titles: HashSet<String>,
        fail_metadata: bool,
        pause_after_first: Option<JobHandle>,
        calls: Mutex<u32>,
    }

    impl MockTranslator {
        fn new() -> Self {
            Self {
                fail_titles: HashSet::new(),
                fail_metadata: false,
                pause_after_first: None,
                calls: Mutex::new(0),
            }
        }
    }

    #[async_trait]
    impl Translator for MockTranslator {
        async fn translate_metadata(
            &self,
            title: &str,
            _meta: Option<&str>,
            _source: &str,
            _target: &str,
        ) -> Result<TranslatedMetadata, AppError> {
            if self.fail_metadata {
                return Err(AppError::Llm("metadata boom".to_string()));
            }
            Ok(TranslatedMetadata {
                title: title.to_uppercase(),
                meta_description: None,
            })
        }

        async fn translate_section(
            &self,
            heading: &str,
            html: &str,
            _source: &str,
            _target: &str,
        ) -> Result<String, AppError> {
            *self.calls.lock().unwrap() += 1;
            if let Some(handle) = &self.pause_after_first {
                handle.request_pause();
            }
            if self.fail_titles.contains(heading) {
                return Err(AppError::Llm(format!("boom on {heading}")));
            }
            Ok(html.to_uppercase())
        }
    }

    fn make_handle(section_count: usize) -> JobHandle {
        let sections = (0..section_count)
            .map(|i| SectionState {
                index: i,
                title: format!("S{i}"),
                original: format!("<h2>S{i}</h2><p>body {i}</p>"),
                translated: None,
                status: SectionStatus::Pending,
                error: None,
            })
            .collect();
        JobHandle::new(JobState {
            id: Uuid::new_v4(),
            article_id: Uuid::new_v4(),
            source_language: "English".to_string(),
            target_language: "German".to_string(),
            status: JobStatus::Running,
            original_title: "Original Title".to_string(),
            original_meta: Some("meta".to_string()),
            translated_title: None,
            translated_meta: None,
            metadata_error: None,
            sections,
        })
    }

    #[tokio::test(start_paused = true)]
    async fn test_happy_path_translates_all_sections_in_order() {
        let translator = MockTranslator::new();
        let handle = make_handle(3);

        let finished = run_translation(&translator, &handle).await;
        assert!(finished);

        let state = handle.state.read().await;
        assert_eq!(state.status, JobStatus::Completed);
        assert_eq!(state.translated_title.as_deref(), Some("ORIGINAL TITLE"));
        for (i, section) in state.sections.iter().enumerate() {
            assert_eq!(section.status, SectionStatus::Completed);
            assert!(section.translated.as_ref().unwrap().contains(&format!("BODY {i}")));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_section_is_isolated_and_loop_continues() {
        let mut translator = MockTranslator::new();
        translator.fail_titles.insert("S1".to_string());
        let handle = make_handle(3);

        let finished = run_translation(&translator, &handle).await;
        assert!(finished);

        let state = handle.state.read().await;
        assert_eq!(state.status, JobStatus::CompletedWithErrors);
        assert_eq!(state.sections[0].status, SectionStatus::Completed);
        assert_eq!(state.sections[1].status, SectionStatus::Error);
        assert!(state.sections[1].error.as_ref().unwrap().contains("boom"));
        assert_eq!(state.sections[2].status, SectionStatus::Completed);

        // assembled content falls back to the original for the failed section
        let content = state.assemble_content();
        assert!(content.contains("BODY 0"));
        assert!(content.contains("body 1"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_pause_stops_before_next_section() {
        let mut translator = MockTranslator::new();
        let handle = make_handle(3);
        translator.pause_after_first = Some(handle.clone());

        let finished = run_translation(&translator, &handle).await;
        assert!(!finished);

        let state = handle.state.read().await;
        assert_eq!(state.status, JobStatus::Paused);
        assert_eq!(state.sections[0].status, SectionStatus::Completed);
        assert_eq!(state.sections[1].status, SectionStatus::Pending);
        assert_eq!(state.sections[2].status, SectionStatus::Pending);
    }

    #[tokio::test(start_paused = true)]
    async fn test_resume_continues_from_first_pending_section() {
        let mut paused = MockTranslator::new();
        let handle = make_handle(3);
        paused.pause_after_first = Some(handle.clone());

        assert!(!run_translation(&paused, &handle).await);

        // clear the flag and run again with a non-pausing translator
        handle.clear_pause();
        {
            let mut state = handle.state.write().await;
            state.status = JobStatus::Running;
        }
        let translator = MockTranslator::new();
        let finished = run_translation(&translator, &handle).await;
        assert!(finished);

        let state = handle.state.read().await;
        assert_eq!(state.status, JobStatus::Completed);
        // metadata was already translated in the first run, not redone
        assert_eq!(state.translated_title.as_deref(), Some("ORIGINAL TITLE"));
        // second run only had the two remaining sections to do
        assert_eq!(*translator.calls.lock().unwrap(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_metadata_failure_does_not_stop_sections() {
        let mut translator = MockTranslator::new();
        translator.fail_metadata = true;
        let handle = make_handle(2);

        let finished = run_translation(&translator, &handle).await;
        assert!(finished);

        let state = handle.state.read().await;
        assert!(state.translated_title.is_none());
        assert!(state.metadata_error.is_some());
        assert_eq!(state.status, JobStatus::Completed);
        assert_eq!(state.progress().completed, 2);
    }
}
