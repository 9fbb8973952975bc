use crate::extract::{ParsedIssue, Severity};

/// Group issues by file path, preserving first-seen file order.
pub(crate) fn group_by_file<'a, I>(issues: I) -> Vec<(&'a str, Vec<&'a ParsedIssue>)>
where
    I: IntoIterator<Item = &'a ParsedIssue>,
{
    let mut groups: Vec<(&str, Vec<&ParsedIssue>)> = Vec::new();
    for issue in issues {
        match groups.iter_mut().find(|(file, _)| *file == issue.file) {
            Some((_, group)) => group.push(issue),
            None => groups.push((issue.file.as_str(), vec![issue])),
        }
    }
    groups
}

fn plural(count: usize) -> &'static str {
    if count == 1 {
        ""
    } else {
        "s"
    }
}

/// Render one severity-grouped section (security or performance).
///
/// Issues are collapsed into the two report buckets, CRITICAL then MEDIUM,
/// with an alert on top and a closing tip when criticals are present.
pub(crate) fn severity_grouped_section(issues: &[ParsedIssue], section_label: &str) -> String {
    if issues.is_empty() {
        return String::new();
    }

    let mut critical: Vec<&ParsedIssue> = Vec::new();
    let mut medium: Vec<&ParsedIssue> = Vec::new();
    for issue in issues {
        match issue.severity.normalize() {
            Severity::Critical => critical.push(issue),
            _ => medium.push(issue),
        }
    }

    let mut parts: Vec<String> = Vec::new();
    let total = issues.len();
    let critical_count = critical.len();

    if critical_count > 0 {
        parts.push("\n> [!WARNING]".to_string());
        parts.push(format!(
            "> Found {} {} issue{} that need attention before merging.\n",
            total,
            section_label,
            plural(total)
        ));
    } else {
        parts.push("\n> [!CAUTION]".to_string());
        parts.push(format!(
            "> Found {} {} issue{} to review.\n",
            total,
            section_label,
            plural(total)
        ));
    }

    let mut first_bucket = true;
    for (severity, bucket) in [
        (Severity::Critical, &critical),
        (Severity::Medium, &medium),
    ] {
        if bucket.is_empty() {
            continue;
        }

        if !first_bucket {
            parts.push("\n---\n".to_string());
        }
        first_bucket = false;

        let marker = if severity == Severity::Critical {
            "🔴"
        } else {
            "⚠️"
        };
        parts.push(format!(
            "### {} {} ({} issue{})\n",
            marker,
            severity,
            bucket.len(),
            plural(bucket.len())
        ));

        // Impact summary over the first two descriptions
        let mut impact = bucket
            .iter()
            .take(2)
            .map(|issue| issue.description.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        if bucket.len() > 2 {
            impact.push_str(&format!(" (and {} more)", bucket.len() - 2));
        }
        parts.push(format!("> **Impact:** {}\n", impact));

        // One code block per file; issues without a captured snippet
        // contribute no line.
        for (file, file_issues) in group_by_file(bucket.iter().copied()) {
            parts.push(format!("\n📄 **{}**\n```", file));
            for issue in file_issues {
                if let Some(code) = &issue.current_code {
                    parts.push(format!("line {}: {}", issue.line, code.trim()));
                }
            }
            parts.push("```\n".to_string());
        }
    }

    if critical_count > 0 {
        parts.push("\n> [!TIP]".to_string());
        parts.push("> Fix CRITICAL issues before merging to production.\n".to_string());
    }

    parts.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issue(file: &str, line: u32, severity: Severity, description: &str) -> ParsedIssue {
        ParsedIssue {
            file: file.to_string(),
            line,
            severity,
            description: description.to_string(),
            current_code: Some(format!("code_at_{}", line)),
            suggestion: None,
        }
    }

    #[test]
    fn test_empty_issues_render_nothing() {
        assert!(severity_grouped_section(&[], "security").is_empty());
    }

    #[test]
    fn test_warning_alert_and_tip_with_criticals() {
        let issues = vec![
            issue("src/a.py", 1, Severity::Critical, "SQL injection"),
            issue("src/a.py", 2, Severity::Medium, "weak hash"),
        ];
        let section = severity_grouped_section(&issues, "security");

        assert!(section.contains("> [!WARNING]"));
        assert!(section.contains("> Found 2 security issues that need attention before merging."));
        assert!(section.contains("### 🔴 CRITICAL (1 issue)"));
        assert!(section.contains("### ⚠️ MEDIUM (1 issue)"));
        assert!(section.contains("> [!TIP]"));
        // Divider between the two non-empty buckets
        assert!(section.contains("\n---\n"));
    }

    #[test]
    fn test_caution_alert_without_criticals() {
        let issues = vec![issue("src/a.py", 1, Severity::Low, "n+1 query")];
        let section = severity_grouped_section(&issues, "performance");

        assert!(section.contains("> [!CAUTION]"));
        assert!(section.contains("> Found 1 performance issue to review."));
        assert!(!section.contains("> [!TIP]"));
        assert!(!section.contains("---"));
    }

    #[test]
    fn test_high_normalizes_into_critical_bucket() {
        let issues = vec![issue("src/a.py", 1, Severity::High, "race condition")];
        let section = severity_grouped_section(&issues, "security");

        assert!(section.contains("### 🔴 CRITICAL (1 issue)"));
        assert!(!section.contains("MEDIUM"));
    }

    #[test]
    fn test_impact_line_truncates_to_two_descriptions() {
        let issues = vec![
            issue("src/a.py", 1, Severity::Medium, "first."),
            issue("src/a.py", 2, Severity::Medium, "second."),
            issue("src/b.py", 3, Severity::Medium, "third."),
            issue("src/b.py", 4, Severity::Medium, "fourth."),
        ];
        let section = severity_grouped_section(&issues, "performance");

        assert!(section.contains("> **Impact:** first. second. (and 2 more)"));
        assert!(!section.contains("third."));
    }

    #[test]
    fn test_code_blocks_grouped_by_file_in_first_seen_order() {
        let issues = vec![
            issue("src/b.py", 10, Severity::Medium, "one"),
            issue("src/a.py", 20, Severity::Medium, "two"),
            issue("src/b.py", 30, Severity::Medium, "three"),
        ];
        let section = severity_grouped_section(&issues, "performance");

        let b_pos = section.find("📄 **src/b.py**").unwrap();
        let a_pos = section.find("📄 **src/a.py**").unwrap();
        assert!(b_pos < a_pos);
        assert!(section.contains("line 10: code_at_10"));
        assert!(section.contains("line 30: code_at_30"));
    }

    #[test]
    fn test_issue_without_snippet_contributes_no_code_line() {
        let mut bare = issue("src/a.py", 5, Severity::Medium, "no snippet");
        bare.current_code = None;
        bare.suggestion = Some("the fix".to_string());

        let section = severity_grouped_section(&[bare], "security");
        assert!(section.contains("📄 **src/a.py**"));
        assert!(!section.contains("line 5:"));
    }

    #[test]
    fn test_group_by_file_preserves_order() {
        let issues = vec![
            issue("z.py", 1, Severity::Medium, "a"),
            issue("a.py", 2, Severity::Medium, "b"),
            issue("z.py", 3, Severity::Medium, "c"),
        ];
        let groups = group_by_file(issues.iter());

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].0, "z.py");
        assert_eq!(groups[0].1.len(), 2);
        assert_eq!(groups[1].0, "a.py");
    }
}
