//! Recovers structured issues from free-text analysis output.
//!
//! Agents loosely follow a convention where each finding starts on an anchor
//! line: a backtick-quoted `path:line` token, a dash, then a description.
//! Within the next few lines the agent may attach a "Current code:" and/or a
//! "Fix:"/"Optimization:" fragment. The accepted phrasings are a closed list
//! mirrored from the agent prompts; each is tried in order and the first
//! match wins. Anything that doesn't match is dropped silently — malformed
//! output yields fewer issues, never a failed run.

use crate::error::ExtractError;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// How many lines below an anchor are searched for code annotations.
const LOOKAHEAD_LINES: usize = 9;

/// Severity inferred from keywords on the anchor line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
}

impl Severity {
    /// Keyword scan over one anchor line, case-insensitive, checked in
    /// priority order: critical beats high beats low; default medium.
    pub fn infer(line: &str) -> Severity {
        let lower = line.to_lowercase();
        if lower.contains("critical") {
            Severity::Critical
        } else if lower.contains("high") {
            Severity::High
        } else if lower.contains("low") {
            Severity::Low
        } else {
            Severity::Medium
        }
    }

    /// Collapse to the two buckets used for report layout. Idempotent:
    /// already-normalized values map to themselves.
    pub fn normalize(self) -> Severity {
        match self {
            Severity::Critical | Severity::High => Severity::Critical,
            Severity::Medium | Severity::Low => Severity::Medium,
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Critical => write!(f, "CRITICAL"),
            Severity::High => write!(f, "HIGH"),
            Severity::Medium => write!(f, "MEDIUM"),
            Severity::Low => write!(f, "LOW"),
        }
    }
}

/// One finding anchored to a file and line. Immutable once created; lives
/// only for the duration of aggregation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParsedIssue {
    pub file: String,
    pub line: u32,
    pub severity: Severity,
    pub description: String,
    pub current_code: Option<String>,
    pub suggestion: Option<String>,
}

/// Parse one agent's free-text report into structured issues.
///
/// Issues are returned in source order. An issue is kept only if its path
/// is a substring of (or equal to) an entry in `changed_files` and at least
/// one of current-code/suggestion was captured; findings with neither carry
/// no actionable content. Duplicate anchors for the same `path:line` are
/// kept as independent issues.
pub fn parse_issues(text: &str, changed_files: &[String]) -> Result<Vec<ParsedIssue>, ExtractError> {
    let anchor = Regex::new(r"`([^`]+):(\d+)`\s*-\s*(.+)")?;
    let any_anchor = Regex::new(r"`[^`]+:\d+`")?;

    let current_patterns = compile_all(&[
        r"\*\*Current code:\*\*\s*`(.+?)`",
        r"- \*\*Current code:\*\*\s*`(.+?)`",
        r"Current code:\s*`(.+?)`",
    ])?;
    let fix_patterns = compile_all(&[
        r"\*\*Fix:\*\*\s*`(.+?)`",
        r"\*\*Optimization:\*\*\s*`(.+?)`",
        r"- \*\*Fix:\*\*\s*`(.+?)`",
        r"Fix:\s*`(.+?)`",
    ])?;

    let lines: Vec<&str> = text.lines().collect();
    let mut issues = Vec::new();

    for (i, raw) in lines.iter().enumerate() {
        let line = raw.trim();

        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some(caps) = anchor.captures(line) else {
            continue;
        };

        let file = caps[1].to_string();
        let line_num: u32 = match caps[2].parse() {
            Ok(n) => n,
            Err(_) => continue,
        };
        let description = caps[3].trim().to_string();
        let severity = Severity::infer(line);

        let mut current_code: Option<String> = None;
        let mut suggestion: Option<String> = None;

        // Bounded lookahead for code annotations; a new anchor line starts
        // the next issue and must not contribute fields to this one.
        let window_end = (i + 1 + LOOKAHEAD_LINES).min(lines.len());
        for next_raw in &lines[i + 1..window_end] {
            let next = next_raw.trim();

            if any_anchor.is_match(next) {
                break;
            }

            if current_code.is_none() {
                current_code = first_capture(&current_patterns, next);
            }
            if suggestion.is_none() {
                suggestion = first_capture(&fix_patterns, next);
            }
        }

        let in_changed = changed_files.iter().any(|changed| changed.contains(file.as_str()));
        if in_changed && (current_code.is_some() || suggestion.is_some()) {
            issues.push(ParsedIssue {
                file,
                line: line_num,
                severity,
                description,
                current_code,
                suggestion,
            });
        }
    }

    Ok(issues)
}

fn compile_all(patterns: &[&str]) -> Result<Vec<Regex>, ExtractError> {
    patterns
        .iter()
        .map(|p| Regex::new(p).map_err(ExtractError::from))
        .collect()
}

fn first_capture(patterns: &[Regex], line: &str) -> Option<String> {
    for pattern in patterns {
        if let Some(caps) = pattern.captures(line) {
            return Some(caps[1].trim().to_string());
        }
    }
    None
}
