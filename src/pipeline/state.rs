//! Shared state threaded through every stage of a review run.
//!
//! One `ReviewState` exists per run. Stages never touch it directly: each
//! stage body returns a partial update (`ContextUpdate`, `AnalysisUpdate` or
//! `AggregateUpdate`) covering only the fields it owns, and the orchestrator
//! applies updates one at a time. Owned fields are overwritten; the `errors`
//! and `warnings` accumulators are append-only, so updates from concurrent
//! stages can never clobber each other.

use crate::input::{InlineComment, RunInput};

/// Lifecycle of a single stage. `Completed` and `Failed` are terminal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StageStatus {
    #[default]
    Pending,
    Processing,
    Completed,
    Failed,
}

impl StageStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, StageStatus::Completed | StageStatus::Failed)
    }
}

impl std::fmt::Display for StageStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StageStatus::Pending => write!(f, "pending"),
            StageStatus::Processing => write!(f, "processing"),
            StageStatus::Completed => write!(f, "completed"),
            StageStatus::Failed => write!(f, "failed"),
        }
    }
}

/// Every stage of the pipeline, in topology order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageId {
    Context,
    Security,
    Quality,
    Performance,
    Aggregator,
}

/// The three independent analysis categories run between context and
/// aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisKind {
    Security,
    Quality,
    Performance,
}

impl AnalysisKind {
    pub const ALL: [AnalysisKind; 3] = [
        AnalysisKind::Security,
        AnalysisKind::Quality,
        AnalysisKind::Performance,
    ];

    /// Name used in report disclosures and log lines
    pub fn display_name(&self) -> &'static str {
        match self {
            AnalysisKind::Security => "Security",
            AnalysisKind::Quality => "Code Quality",
            AnalysisKind::Performance => "Performance",
        }
    }

    /// Stable identifier used for transcript file names
    pub fn slug(&self) -> &'static str {
        match self {
            AnalysisKind::Security => "security",
            AnalysisKind::Quality => "code_quality",
            AnalysisKind::Performance => "performance",
        }
    }

    pub fn stage(&self) -> StageId {
        match self {
            AnalysisKind::Security => StageId::Security,
            AnalysisKind::Quality => StageId::Quality,
            AnalysisKind::Performance => StageId::Performance,
        }
    }
}

/// The shared record for one review run.
#[derive(Debug, Clone)]
pub struct ReviewState {
    // Input fields, written once at initialization
    pub metadata: serde_json::Value,
    pub pr_title: String,
    pub pr_description: String,
    pub changed_files: Vec<String>,
    pub diff: String,

    // Context fields, written once by the context stage
    pub snippets: Vec<String>,
    pub context_summary: String,

    // Per-stage status, each owned by its stage
    pub context_status: StageStatus,
    pub security_status: StageStatus,
    pub quality_status: StageStatus,
    pub performance_status: StageStatus,
    pub aggregator_status: StageStatus,

    // Per-stage output text, each owned by its analysis stage
    pub security_analysis: String,
    pub quality_analysis: String,
    pub performance_analysis: String,

    // Aggregate outputs, written once by the aggregation stage
    pub final_report: String,
    pub inline_comments: Vec<InlineComment>,
    pub total_issues: usize,

    // Accumulators: append-only, any stage may contribute
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ReviewState {
    pub fn new(input: RunInput) -> Self {
        Self {
            metadata: input.metadata,
            pr_title: input.pr_title,
            pr_description: input.pr_description,
            changed_files: input.changed_files,
            diff: input.diff,
            snippets: Vec::new(),
            context_summary: String::new(),
            context_status: StageStatus::Pending,
            security_status: StageStatus::Pending,
            quality_status: StageStatus::Pending,
            performance_status: StageStatus::Pending,
            aggregator_status: StageStatus::Pending,
            security_analysis: String::new(),
            quality_analysis: String::new(),
            performance_analysis: String::new(),
            final_report: String::new(),
            inline_comments: Vec::new(),
            total_issues: 0,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn status(&self, stage: StageId) -> StageStatus {
        match stage {
            StageId::Context => self.context_status,
            StageId::Security => self.security_status,
            StageId::Quality => self.quality_status,
            StageId::Performance => self.performance_status,
            StageId::Aggregator => self.aggregator_status,
        }
    }

    fn status_slot(&mut self, stage: StageId) -> &mut StageStatus {
        match stage {
            StageId::Context => &mut self.context_status,
            StageId::Security => &mut self.security_status,
            StageId::Quality => &mut self.quality_status,
            StageId::Performance => &mut self.performance_status,
            StageId::Aggregator => &mut self.aggregator_status,
        }
    }

    /// Record that a stage body has been launched.
    pub fn mark_processing(&mut self, stage: StageId) {
        *self.status_slot(stage) = StageStatus::Processing;
    }

    pub fn analysis_text(&self, kind: AnalysisKind) -> &str {
        match kind {
            AnalysisKind::Security => &self.security_analysis,
            AnalysisKind::Quality => &self.quality_analysis,
            AnalysisKind::Performance => &self.performance_analysis,
        }
    }

    /// Display names of analysis stages that did not complete, in fixed
    /// category order. Consumed by the aggregation stage for the report's
    /// partial-coverage disclosure.
    pub fn failed_analysis_stages(&self) -> Vec<&'static str> {
        AnalysisKind::ALL
            .iter()
            .filter(|kind| self.status(kind.stage()) != StageStatus::Completed)
            .map(|kind| kind.display_name())
            .collect()
    }

    /// Merge a stage's partial update. Owned fields overwrite; accumulators
    /// append.
    pub fn apply(&mut self, update: StageUpdate) {
        match update {
            StageUpdate::Context(u) => {
                self.context_status = u.status;
                self.snippets = u.snippets;
                self.context_summary = u.summary;
                self.errors.extend(u.errors);
                self.warnings.extend(u.warnings);
            }
            StageUpdate::Analysis(u) => {
                *self.status_slot(u.kind.stage()) = u.status;
                match u.kind {
                    AnalysisKind::Security => self.security_analysis = u.text,
                    AnalysisKind::Quality => self.quality_analysis = u.text,
                    AnalysisKind::Performance => self.performance_analysis = u.text,
                }
                self.errors.extend(u.errors);
                self.warnings.extend(u.warnings);
            }
            StageUpdate::Aggregate(u) => {
                self.aggregator_status = u.status;
                self.final_report = u.final_report;
                self.inline_comments = u.inline_comments;
                self.total_issues = u.total_issues;
                self.errors.extend(u.errors);
                self.warnings.extend(u.warnings);
            }
        }
    }

    pub fn to_output(&self) -> crate::input::RunOutput {
        crate::input::RunOutput {
            summary: self.final_report.clone(),
            inline_comments: self.inline_comments.clone(),
            total_issues: self.total_issues,
        }
    }
}

/// A stage's result: the disjoint set of fields it owns, plus accumulator
/// contributions.
#[derive(Debug, Clone)]
pub enum StageUpdate {
    Context(ContextUpdate),
    Analysis(AnalysisUpdate),
    Aggregate(AggregateUpdate),
}

#[derive(Debug, Clone)]
pub struct ContextUpdate {
    pub status: StageStatus,
    pub snippets: Vec<String>,
    pub summary: String,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ContextUpdate {
    pub fn completed(snippets: Vec<String>, summary: String) -> Self {
        Self {
            status: StageStatus::Completed,
            snippets,
            summary,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn failed(error: String) -> Self {
        Self {
            status: StageStatus::Failed,
            snippets: Vec::new(),
            summary: String::new(),
            errors: vec![error],
            warnings: Vec::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AnalysisUpdate {
    pub kind: AnalysisKind,
    pub status: StageStatus,
    pub text: String,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl AnalysisUpdate {
    pub fn completed(kind: AnalysisKind, text: String) -> Self {
        Self {
            kind,
            status: StageStatus::Completed,
            text,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn failed(kind: AnalysisKind, error: String) -> Self {
        Self {
            kind,
            status: StageStatus::Failed,
            text: String::new(),
            errors: vec![error],
            warnings: Vec::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AggregateUpdate {
    pub status: StageStatus,
    pub final_report: String,
    pub inline_comments: Vec<InlineComment>,
    pub total_issues: usize,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl AggregateUpdate {
    /// Fallback when the aggregation stage itself fails: the run still
    /// yields a postable report stating the error.
    pub fn degraded(error: impl std::fmt::Display) -> Self {
        Self {
            status: StageStatus::Failed,
            final_report: format!("Review aggregation failed: {}", error),
            inline_comments: Vec::new(),
            total_issues: 0,
            errors: vec![format!("Aggregator failed: {}", error)],
            warnings: Vec::new(),
        }
    }
}
