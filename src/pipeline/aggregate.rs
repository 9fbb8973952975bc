use crate::error::ExtractError;
use crate::extract::parse_issues;
use crate::pipeline::state::{AggregateUpdate, AnalysisKind, ReviewState, StageStatus};
use crate::report::synthesize;
use tracing::debug;

/// The aggregation stage body: structure each analysis text, merge the
/// results into one report, and return the aggregate fields.
///
/// Runs after the analysis barrier, so every analysis status is terminal
/// here; whichever stages did not complete are disclosed in the report
/// rather than failing the run.
pub(crate) fn aggregate(state: &ReviewState) -> Result<AggregateUpdate, ExtractError> {
    let failed_stages = state.failed_analysis_stages();

    let security_issues =
        parse_issues(state.analysis_text(AnalysisKind::Security), &state.changed_files)?;
    let quality_issues =
        parse_issues(state.analysis_text(AnalysisKind::Quality), &state.changed_files)?;
    let performance_issues = parse_issues(
        state.analysis_text(AnalysisKind::Performance),
        &state.changed_files,
    )?;

    let total_issues = security_issues.len() + quality_issues.len() + performance_issues.len();
    debug!(
        "Aggregating {} issues ({} security, {} quality, {} performance)",
        total_issues,
        security_issues.len(),
        quality_issues.len(),
        performance_issues.len()
    );

    let (final_report, inline_comments) = synthesize(
        &state.quality_analysis,
        &security_issues,
        &performance_issues,
        &quality_issues,
        &failed_stages,
    );

    Ok(AggregateUpdate {
        status: StageStatus::Completed,
        final_report,
        inline_comments,
        total_issues,
        errors: Vec::new(),
        warnings: Vec::new(),
    })
}
