//! Collaborator seams for the stages that talk to the outside world.
//!
//! The pipeline itself never retrieves context or calls a model; it invokes
//! these traits and structures whatever text comes back. Shipped
//! implementations serve caller-supplied data so runs can be replayed
//! offline.

mod transcript;

pub use transcript::TranscriptAnalyst;

use crate::error::ProviderError;
use crate::pipeline::{AnalysisKind, ReviewState};
use async_trait::async_trait;

/// Historical code context for the changed files.
#[derive(Debug, Clone, Default)]
pub struct ContextBundle {
    pub snippets: Vec<String>,
    pub summary: String,
}

/// The retrieval collaborator behind the context stage.
#[async_trait]
pub trait ContextSource: Send + Sync {
    async fn fetch(&self, changed_files: &[String]) -> Result<ContextBundle, ProviderError>;
}

/// The analysis collaborator behind each analysis stage. One call per
/// category; the returned text is parsed downstream by the aggregation
/// stage.
#[async_trait]
pub trait Analyst: Send + Sync {
    fn name(&self) -> &'static str;

    async fn analyze(
        &self,
        kind: AnalysisKind,
        state: &ReviewState,
    ) -> Result<String, ProviderError>;
}

/// Serves the comprehensive-context string the caller pre-built (the
/// transport layer owns actual retrieval).
pub struct InputContext {
    context: String,
}

impl InputContext {
    pub fn new(context: impl Into<String>) -> Self {
        Self {
            context: context.into(),
        }
    }
}

#[async_trait]
impl ContextSource for InputContext {
    async fn fetch(&self, _changed_files: &[String]) -> Result<ContextBundle, ProviderError> {
        Ok(ContextBundle {
            snippets: Vec::new(),
            summary: self.context.clone(),
        })
    }
}
