use crate::error::OutputError;
use crate::pipeline::ReviewState;
use std::fs;
use std::path::{Path, PathBuf};

/// Write the run artifacts: the rendered report and the JSON output record
/// consumed by the delivery side. Returns the report path.
pub fn write_run_artifacts(report_dir: &Path, state: &ReviewState) -> Result<PathBuf, OutputError> {
    fs::create_dir_all(report_dir).map_err(OutputError::CreateDir)?;

    let report_path = report_dir.join("report.md");
    fs::write(&report_path, &state.final_report).map_err(OutputError::WriteReport)?;

    let output = state.to_output();
    let json = serde_json::to_string_pretty(&output)?;
    fs::write(report_dir.join("output.json"), json).map_err(OutputError::WriteReport)?;

    Ok(report_path)
}
