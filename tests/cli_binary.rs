use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;

#[allow(deprecated)]
fn cmd() -> Command {
    Command::cargo_bin("revmerge").unwrap()
}

fn write_fixture(dir: &std::path::Path) {
    let transcripts = dir.join("transcripts");
    fs::create_dir_all(&transcripts).unwrap();
    fs::write(
        transcripts.join("security.md"),
        "`src/a.py:10` - CRITICAL: SQL injection\n\
         **Current code:** `query(f\"..{x}\")`\n\
         **Fix:** `query(q, (x,))`\n",
    )
    .unwrap();
    fs::write(
        transcripts.join("code_quality.md"),
        "`src/a.py:20` - unclear variable name\n**Fix:** `user_count = len(users)`\n",
    )
    .unwrap();
    fs::write(transcripts.join("performance.md"), "No concerns.\n").unwrap();

    fs::write(
        dir.join("input.json"),
        r#"{
            "pr_title": "Add login endpoint",
            "changed_files": ["src/a.py"],
            "comprehensive_context": "related code"
        }"#,
    )
    .unwrap();
}

#[test]
fn help_flag() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("review"));
}

#[test]
fn schema_prints_run_input() {
    cmd()
        .arg("schema")
        .assert()
        .success()
        .stdout(predicate::str::contains("RunInput"))
        .stdout(predicate::str::contains("changed_files"));
}

#[test]
fn run_produces_report() {
    let tmp = tempfile::tempdir().unwrap();
    write_fixture(tmp.path());

    cmd()
        .current_dir(&tmp)
        .args(["run", "--input", "input.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("## Code Review"))
        .stdout(predicate::str::contains("Security Issues"))
        .stdout(predicate::str::contains("Code Suggestions"));
}

#[test]
fn run_json_output_has_contract_fields() {
    let tmp = tempfile::tempdir().unwrap();
    write_fixture(tmp.path());

    cmd()
        .current_dir(&tmp)
        .args(["run", "--input", "input.json", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"summary\""))
        .stdout(predicate::str::contains("\"inline_comments\": []"))
        .stdout(predicate::str::contains("\"total_issues\": 2"));
}

#[test]
fn run_fail_on_issues_exits_nonzero() {
    let tmp = tempfile::tempdir().unwrap();
    write_fixture(tmp.path());

    cmd()
        .current_dir(&tmp)
        .args(["run", "--input", "input.json", "--fail-on-issues"])
        .assert()
        .failure()
        .code(1);
}

#[test]
fn run_with_missing_transcripts_still_succeeds() {
    // Failed analysis stages degrade the report, they don't fail the run
    let tmp = tempfile::tempdir().unwrap();
    write_fixture(tmp.path());
    fs::remove_file(tmp.path().join("transcripts/security.md")).unwrap();

    cmd()
        .current_dir(&tmp)
        .args(["run", "--input", "input.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("*Note: Security analysis failed*"));
}

#[test]
fn extract_prints_issues_json() {
    let tmp = tempfile::tempdir().unwrap();
    fs::write(
        tmp.path().join("transcript.md"),
        "`src/a.py:10` - HIGH: race condition\n**Fix:** `lock()`\n",
    )
    .unwrap();

    cmd()
        .current_dir(&tmp)
        .args([
            "extract",
            "transcript.md",
            "--changed-files",
            "src/a.py,src/b.py",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"severity\": \"HIGH\""))
        .stdout(predicate::str::contains("\"line\": 10"));
}

#[test]
fn extract_outside_changed_files_is_empty() {
    let tmp = tempfile::tempdir().unwrap();
    fs::write(
        tmp.path().join("transcript.md"),
        "`src/a.py:10` - HIGH: race condition\n**Fix:** `lock()`\n",
    )
    .unwrap();

    cmd()
        .current_dir(&tmp)
        .args(["extract", "transcript.md", "--changed-files", "src/other.py"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[]"));
}
