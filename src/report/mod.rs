//! Synthesizes the consolidated review report from structured issues.

mod section;

use section::{group_by_file, severity_grouped_section};

use crate::extract::ParsedIssue;
use crate::input::InlineComment;

const FOOTER: &str = "*Generated by revmerge*";

/// Build the consolidated review.
///
/// Returns the report body plus the inline-comment list. The list is always
/// empty: findings are folded into the body, and the delivery side posts it
/// as one review comment instead of many per-line ones.
pub fn synthesize(
    quality_text: &str,
    security_issues: &[ParsedIssue],
    performance_issues: &[ParsedIssue],
    quality_issues: &[ParsedIssue],
    failed_stages: &[&str],
) -> (String, Vec<InlineComment>) {
    let quality_by_file = group_by_file(quality_issues.iter());
    let report = build_summary(
        quality_text,
        security_issues,
        performance_issues,
        &quality_by_file,
        failed_stages,
    );
    (report, Vec::new())
}

fn build_summary(
    quality_text: &str,
    security_issues: &[ParsedIssue],
    performance_issues: &[ParsedIssue],
    quality_by_file: &[(&str, Vec<&ParsedIssue>)],
    failed_stages: &[&str],
) -> String {
    let mut parts: Vec<String> = Vec::new();

    let total_issues =
        security_issues.len() + performance_issues.len() + quality_by_file.len();

    parts.push("## Code Review\n".to_string());

    if !failed_stages.is_empty() {
        parts.push(format!(
            "*Note: {} analysis failed*\n",
            failed_stages.join(", ")
        ));
    }

    if total_issues == 0 {
        parts.push("**No critical issues found!** Code looks good.\n".to_string());
        parts.push("---".to_string());
        parts.push(FOOTER.to_string());
        return parts.join("\n");
    }

    if !quality_text.is_empty() && !quality_text.contains("No major quality") {
        parts.push("<details>".to_string());
        parts.push("<summary><strong>🔍 Potential Issues Found</strong></summary>\n".to_string());
        parts.push(quality_text.to_string());
        parts.push("\n</details>\n".to_string());
    }

    if !security_issues.is_empty() {
        parts.push("<details>".to_string());
        parts.push("<summary><strong>🔒 Security Issues</strong></summary>\n".to_string());
        parts.push(severity_grouped_section(security_issues, "security"));
        parts.push("\n</details>\n".to_string());
    }

    if !performance_issues.is_empty() {
        parts.push("<details>".to_string());
        parts.push("<summary><strong>⚡ Performance Optimization</strong></summary>\n".to_string());
        parts.push(severity_grouped_section(performance_issues, "performance"));
        parts.push("\n</details>\n".to_string());
    }

    if !quality_by_file.is_empty() {
        parts.push("<details>".to_string());
        parts.push("<summary><strong>💡 Code Suggestions</strong></summary>\n".to_string());

        for (file, issues) in quality_by_file {
            let with_fixes: Vec<&&ParsedIssue> =
                issues.iter().filter(|i| i.suggestion.is_some()).collect();

            // Nothing actionable for this file; no label, no empty block
            if with_fixes.is_empty() {
                continue;
            }

            parts.push(format!("\n`{}`\n", file));
            parts.push("```diff".to_string());
            for issue in with_fixes {
                match (&issue.current_code, &issue.suggestion) {
                    (Some(current), Some(fix)) => {
                        parts.push(format!("- {:>4}  {}", issue.line, current.trim()));
                        parts.push(format!("+ {:>4}  {}", issue.line, fix.trim()));
                    }
                    (None, Some(fix)) => {
                        parts.push(format!("+ {:>4}  {}", issue.line, fix.trim()));
                    }
                    _ => {}
                }
            }
            parts.push("```\n".to_string());
        }

        parts.push("</details>\n".to_string());
    }

    parts.push("---".to_string());
    parts.push(FOOTER.to_string());

    parts.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::Severity;

    fn issue(
        file: &str,
        line: u32,
        severity: Severity,
        current_code: Option<&str>,
        suggestion: Option<&str>,
    ) -> ParsedIssue {
        ParsedIssue {
            file: file.to_string(),
            line,
            severity,
            description: format!("issue at {}:{}", file, line),
            current_code: current_code.map(|s| s.to_string()),
            suggestion: suggestion.map(|s| s.to_string()),
        }
    }

    #[test]
    fn test_no_issues_short_report() {
        let (report, inline) = synthesize("", &[], &[], &[], &[]);

        assert!(report.contains("## Code Review"));
        assert!(report.contains("**No critical issues found!** Code looks good."));
        assert!(report.contains(FOOTER));
        assert!(!report.contains("<details>"));
        assert!(inline.is_empty());
    }

    #[test]
    fn test_no_issues_with_sentinel_quality_text() {
        let (report, _) = synthesize("No major quality issues detected.", &[], &[], &[], &[]);

        assert!(report.contains("**No critical issues found!** Code looks good."));
        assert!(!report.contains("Potential Issues Found"));
    }

    #[test]
    fn test_failed_stage_disclosure() {
        let security = vec![issue("src/a.py", 1, Severity::Critical, Some("x"), None)];
        let (report, _) = synthesize("", &security, &[], &[], &["Code Quality", "Performance"]);

        assert!(report.contains("*Note: Code Quality, Performance analysis failed*"));
        // Surviving stage output still incorporated
        assert!(report.contains("🔒 Security Issues"));
    }

    #[test]
    fn test_disclosure_present_even_with_no_issues() {
        let (report, _) = synthesize("", &[], &[], &[], &["Security"]);

        assert!(report.contains("*Note: Security analysis failed*"));
        assert!(report.contains("**No critical issues found!**"));
    }

    #[test]
    fn test_quality_text_rendered_verbatim_in_collapsible() {
        let quality = vec![issue("src/a.py", 1, Severity::Medium, None, Some("fix()"))];
        let text = "Long-form analysis with `markdown` intact.";
        let (report, _) = synthesize(text, &[], &[], &quality, &[]);

        assert!(report.contains("🔍 Potential Issues Found"));
        assert!(report.contains(text));
    }

    #[test]
    fn test_sentinel_quality_text_suppressed_when_issues_exist() {
        let security = vec![issue("src/a.py", 1, Severity::Medium, Some("x"), None)];
        let (report, _) = synthesize("No major quality issues.", &security, &[], &[], &[]);

        assert!(!report.contains("Potential Issues Found"));
        assert!(report.contains("🔒 Security Issues"));
    }

    #[test]
    fn test_diff_block_with_both_sides() {
        let quality = vec![issue(
            "src/a.py",
            42,
            Severity::Medium,
            Some("query(f\"{x}\")"),
            Some("query(q, (x,))"),
        )];
        let (report, _) = synthesize("analysis", &[], &[], &quality, &[]);

        assert!(report.contains("💡 Code Suggestions"));
        assert!(report.contains("```diff"));
        assert!(report.contains("-   42  query(f\"{x}\")"));
        assert!(report.contains("+   42  query(q, (x,))"));
    }

    #[test]
    fn test_diff_block_with_suggestion_only() {
        let quality = vec![issue("src/a.py", 7, Severity::Medium, None, Some("guard()"))];
        let (report, _) = synthesize("analysis", &[], &[], &quality, &[]);

        assert!(report.contains("+    7  guard()"));
        assert!(!report.contains("-    7"));
    }

    #[test]
    fn test_file_without_suggestions_skipped_entirely() {
        let quality = vec![
            issue("src/bare.py", 3, Severity::Medium, Some("snippet"), None),
            issue("src/fixed.py", 9, Severity::Medium, None, Some("fix()")),
        ];
        let (report, _) = synthesize("analysis", &[], &[], &quality, &[]);

        assert!(!report.contains("src/bare.py"));
        assert!(report.contains("`src/fixed.py`"));
    }

    #[test]
    fn test_total_counts_distinct_quality_files() {
        // Two issues in one file count once toward the early-exit total;
        // with no other issues the report still has content, not the
        // no-issues body.
        let quality = vec![
            issue("src/a.py", 1, Severity::Medium, None, Some("f()")),
            issue("src/a.py", 2, Severity::Medium, None, Some("g()")),
        ];
        let (report, _) = synthesize("analysis", &[], &[], &quality, &[]);

        assert!(!report.contains("No critical issues found"));
        assert!(report.contains("💡 Code Suggestions"));
    }

    #[test]
    fn test_inline_comments_always_empty() {
        let security = vec![issue("src/a.py", 1, Severity::Critical, Some("x"), Some("y"))];
        let (_, inline) = synthesize("text", &security, &security, &security, &[]);
        assert!(inline.is_empty());
    }

    #[test]
    fn test_sections_in_fixed_order() {
        let sec = vec![issue("src/s.py", 1, Severity::Critical, Some("s"), None)];
        let perf = vec![issue("src/p.py", 2, Severity::Medium, Some("p"), None)];
        let qual = vec![issue("src/q.py", 3, Severity::Medium, None, Some("q()"))];
        let (report, _) = synthesize("quality prose", &sec, &perf, &qual, &[]);

        let quality_pos = report.find("Potential Issues Found").unwrap();
        let security_pos = report.find("Security Issues").unwrap();
        let perf_pos = report.find("Performance Optimization").unwrap();
        let suggestions_pos = report.find("Code Suggestions").unwrap();
        assert!(quality_pos < security_pos);
        assert!(security_pos < perf_pos);
        assert!(perf_pos < suggestions_pos);
        assert!(report.ends_with(FOOTER));
    }
}
