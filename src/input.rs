//! Per-run input and output records exchanged with the orchestration caller.
//!
//! The caller (webhook transport, CI job, replay harness) assembles a
//! `RunInput` from whatever sources it owns; the pipeline hands back a
//! `RunOutput` that is always postable, even on partial failure.

use crate::error::InputError;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Everything the pipeline consumes for one review run.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct RunInput {
    /// Change metadata from the hosting platform, opaque to the pipeline
    #[serde(default)]
    pub metadata: serde_json::Value,

    pub pr_title: String,

    #[serde(default)]
    pub pr_description: String,

    /// Paths touched by the change; the allow-list for extracted issues
    #[serde(default)]
    pub changed_files: Vec<String>,

    /// Full unified diff text
    #[serde(default)]
    pub diff: String,

    /// Pre-built context string from the retrieval collaborator
    #[serde(default)]
    pub comprehensive_context: String,
}

impl RunInput {
    /// Load a run input from a JSON file
    pub fn load(path: &Path) -> Result<Self, InputError> {
        let content = std::fs::read_to_string(path).map_err(|e| InputError::ReadFile {
            path: path.to_path_buf(),
            source: e,
        })?;

        let input: RunInput = serde_json::from_str(&content)?;
        Ok(input)
    }
}

/// What the delivery collaborator receives back.
///
/// `inline_comments` is always empty in the current design: every finding is
/// folded into `summary`, and delivery falls back to posting it as a single
/// review comment. The posture (request changes vs comment) is chosen
/// downstream from `total_issues`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunOutput {
    pub summary: String,
    pub inline_comments: Vec<InlineComment>,
    pub total_issues: usize,
}

/// A per-line review comment record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InlineComment {
    pub path: String,
    pub line: u32,
    pub body: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}
