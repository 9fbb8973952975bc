use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::defaults::*;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default = "default_version")]
    pub version: u32,

    /// Directory holding pre-recorded analysis transcripts for replay runs
    #[serde(default = "default_transcript_dir")]
    pub transcript_dir: PathBuf,

    /// Where run artifacts (report.md, output.json) are written
    #[serde(default = "default_report_dir")]
    pub report_dir: PathBuf,
}
