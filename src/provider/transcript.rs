use super::Analyst;
use crate::error::ProviderError;
use crate::pipeline::{AnalysisKind, ReviewState};
use async_trait::async_trait;
use std::path::PathBuf;
use tracing::debug;

/// Replays pre-recorded agent output from `<dir>/<category>.md`.
///
/// Used for offline runs and debugging: record the transcripts once, then
/// re-run aggregation against them without touching any model.
pub struct TranscriptAnalyst {
    dir: PathBuf,
}

impl TranscriptAnalyst {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }
}

#[async_trait]
impl Analyst for TranscriptAnalyst {
    fn name(&self) -> &'static str {
        "transcript"
    }

    async fn analyze(
        &self,
        kind: AnalysisKind,
        _state: &ReviewState,
    ) -> Result<String, ProviderError> {
        let path = self.dir.join(format!("{}.md", kind.slug()));
        debug!("Replaying {} transcript from {:?}", kind.display_name(), path);

        tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| ProviderError::Transcript { path, source: e })
    }
}
