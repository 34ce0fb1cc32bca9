//! In-memory translation job state and registry.
//!
//! Job progress is transient by design — only the finished translation is
//! persisted (as a `translations` row). Restarting the service drops
//! in-flight jobs, which callers simply restart.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use uuid::Uuid;

/// Fixed pause between per-section LLM calls.
pub const SECTION_PAUSE_MS: u64 = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionStatus {
    Pending,
    Translating,
    Completed,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Running,
    Paused,
    Completed,
    CompletedWithErrors,
}

/// Per-section translation state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionState {
    pub index: usize,
    pub title: String,
    pub original: String,
    pub translated: Option<String>,
    pub status: SectionStatus,
    pub error: Option<String>,
}

/// Progress counters derived from section states.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct JobProgress {
    pub total: usize,
    pub completed: usize,
    pub errored: usize,
}

/// Full state of one translation job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobState {
    pub id: Uuid,
    pub article_id: Uuid,
    pub source_language: String,
    pub target_language: String,
    pub status: JobStatus,
    pub original_title: String,
    pub original_meta: Option<String>,
    pub translated_title: Option<String>,
    pub translated_meta: Option<String>,
    /// Set when metadata translation failed; the job still runs its sections.
    pub metadata_error: Option<String>,
    pub sections: Vec<SectionState>,
}

impl JobState {
    pub fn progress(&self) -> JobProgress {
        JobProgress {
            total: self.sections.len(),
            completed: self
                .sections
                .iter()
                .filter(|s| s.status == SectionStatus::Completed)
                .count(),
            errored: self
                .sections
                .iter()
                .filter(|s| s.status == SectionStatus::Error)
                .count(),
        }
    }

    /// Index of the next section the loop should work on.
    pub fn next_pending(&self) -> Option<usize> {
        self.sections
            .iter()
            .position(|s| s.status == SectionStatus::Pending)
    }

    pub fn has_errors(&self) -> bool {
        self.sections.iter().any(|s| s.status == SectionStatus::Error)
    }

    /// Assembles the translated article in section order. Sections that failed
    /// keep their original content so the output stays whole.
    pub fn assemble_content(&self) -> String {
        self.sections
            .iter()
            .map(|s| s.translated.as_deref().unwrap_or(s.original.as_str()))
            .collect()
    }
}

/// Shared handle to one job: its state plus the continue flag the driver
/// checks before every section.
#[derive(Clone)]
pub struct JobHandle {
    pub state: Arc<RwLock<JobState>>,
    should_continue: Arc<AtomicBool>,
}

impl JobHandle {
    pub fn new(state: JobState) -> Self {
        Self {
            state: Arc::new(RwLock::new(state)),
            should_continue: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn should_continue(&self) -> bool {
        self.should_continue.load(Ordering::SeqCst)
    }

    /// Stops the driver before it starts the next section. The in-flight
    /// request, if any, is not aborted.
    pub fn request_pause(&self) {
        self.should_continue.store(false, Ordering::SeqCst);
    }

    pub fn clear_pause(&self) {
        self.should_continue.store(true, Ordering::SeqCst);
    }
}

/// Registry of live translation jobs, keyed by job id.
#[derive(Clone, Default)]
pub struct JobRegistry {
    inner: Arc<RwLock<HashMap<Uuid, JobHandle>>>,
}

impl JobRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, id: Uuid, handle: JobHandle) {
        self.inner.write().await.insert(id, handle);
    }

    pub async fn get(&self, id: Uuid) -> Option<JobHandle> {
        self.inner.read().await.get(&id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn section(index: usize, status: SectionStatus) -> SectionState {
        SectionState {
            index,
            title: format!("S{index}"),
            original: format!("<h2>S{index}</h2><p>body {index}</p>"),
            translated: if status == SectionStatus::Completed {
                Some(format!("<h2>T{index}</h2><p>translated {index}</p>"))
            } else {
                None
            },
            status,
            error: None,
        }
    }

    fn job(sections: Vec<SectionState>) -> JobState {
        JobState {
            id: Uuid::new_v4(),
            article_id: Uuid::new_v4(),
            source_language: "English".to_string(),
            target_language: "German".to_string(),
            status: JobStatus::Running,
            original_title: "Title".to_string(),
            original_meta: None,
            translated_title: None,
            translated_meta: None,
            metadata_error: None,
            sections,
        }
    }

    #[test]
    fn test_progress_counts() {
        let state = job(vec![
            section(0, SectionStatus::Completed),
            section(1, SectionStatus::Error),
            section(2, SectionStatus::Pending),
        ]);
        let progress = state.progress();
        assert_eq!(progress.total, 3);
        assert_eq!(progress.completed, 1);
        assert_eq!(progress.errored, 1);
    }

    #[test]
    fn test_next_pending_skips_completed_and_errored() {
        let state = job(vec![
            section(0, SectionStatus::Completed),
            section(1, SectionStatus::Error),
            section(2, SectionStatus::Pending),
        ]);
        assert_eq!(state.next_pending(), Some(2));
    }

    #[test]
    fn test_assemble_falls_back_to_original_on_error() {
        let state = job(vec![
            section(0, SectionStatus::Completed),
            section(1, SectionStatus::Error),
        ]);
        let content = state.assemble_content();
        assert!(content.contains("translated 0"));
        assert!(content.contains("body 1"));
    }

    #[test]
    fn test_pause_flag_round_trip() {
        let handle = JobHandle::new(job(vec![section(0, SectionStatus::Pending)]));
        assert!(handle.should_continue());
        handle.request_pause();
        assert!(!handle.should_continue());
        handle.clear_pause();
        assert!(handle.should_continue());
    }
}
