use camino::Utf8PathBuf;
use headerfix_types::report::{
    FileError, FileErrorKind, FileOutcome, FileStatus, PatchReport, PatchSummary, ToolInfo,
};
use headerfix_types::rule::{RewriteRule, RuleHit};
use pretty_assertions::assert_eq;

fn tool_info() -> ToolInfo {
    ToolInfo {
        name: "headerfix".to_string(),
        version: Some("0.0.0".to_string()),
    }
}

#[test]
fn file_status_serializes_snake_case() {
    let fixed = serde_json::to_value(FileStatus::Fixed).expect("serialize");
    let unchanged = serde_json::to_value(FileStatus::Unchanged).expect("serialize");
    let not_found = serde_json::to_value(FileStatus::NotFound).expect("serialize");
    let failed = serde_json::to_value(FileStatus::Failed).expect("serialize");

    assert_eq!(fixed, serde_json::json!("fixed"));
    assert_eq!(unchanged, serde_json::json!("unchanged"));
    assert_eq!(not_found, serde_json::json!("not_found"));
    assert_eq!(failed, serde_json::json!("failed"));
}

#[test]
fn error_kind_serializes_snake_case() {
    let kind = serde_json::to_value(FileErrorKind::PermissionDenied).expect("serialize");
    assert_eq!(kind, serde_json::json!("permission_denied"));
    let kind = serde_json::to_value(FileErrorKind::WriteFailed).expect("serialize");
    assert_eq!(kind, serde_json::json!("write_failed"));
}

#[test]
fn new_report_carries_schema_and_empty_summary() {
    let report = PatchReport::new(tool_info(), true);
    assert_eq!(report.schema, "headerfix.report.v1");
    assert!(report.dry_run);
    assert!(report.files.is_empty());
    assert_eq!(report.summary, PatchSummary::default());
    assert!(report.run.ended_at.is_none());
}

#[test]
fn push_updates_summary_counts() {
    let mut report = PatchReport::new(tool_info(), false);
    report.push(FileOutcome::new(Utf8PathBuf::from("a.h"), FileStatus::Fixed));
    report.push(FileOutcome::new(Utf8PathBuf::from("b.h"), FileStatus::NotFound));
    report.push(FileOutcome::new(Utf8PathBuf::from("c.h"), FileStatus::Unchanged));
    report.push(FileOutcome::new(Utf8PathBuf::from("d.h"), FileStatus::Failed));

    assert_eq!(
        report.summary,
        PatchSummary {
            targets: 4,
            fixed: 1,
            unchanged: 1,
            not_found: 1,
            failed: 1,
        }
    );
    assert!(report.has_failures());
}

#[test]
fn outcome_omits_empty_optional_fields() {
    let outcome = FileOutcome::new(Utf8PathBuf::from("missing.h"), FileStatus::NotFound);
    let value = serde_json::to_value(&outcome).expect("serialize outcome");

    assert_eq!(
        value,
        serde_json::json!({ "path": "missing.h", "status": "not_found" })
    );
}

#[test]
fn outcome_with_error_roundtrips() {
    let mut outcome = FileOutcome::new(Utf8PathBuf::from("locked.h"), FileStatus::Failed);
    outcome.error = Some(FileError {
        kind: FileErrorKind::PermissionDenied,
        message: "permission denied".to_string(),
    });
    outcome.rule_hits.push(RuleHit {
        rule_id: "auth-quoted".to_string(),
        count: 2,
    });

    let json = serde_json::to_string(&outcome).expect("serialize");
    let back: FileOutcome = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(back.status, FileStatus::Failed);
    assert_eq!(back.error, outcome.error);
    assert_eq!(back.replacements(), 2);
}

#[test]
fn rewrite_rule_serializes_fields() {
    let rule = RewriteRule {
        id: "drop-x",
        pattern: "#import <X/X.h>",
        replacement: "",
        rationale: "x is not importable",
    };
    assert!(rule.is_deletion());

    let value = serde_json::to_value(rule).expect("serialize rule");
    assert_eq!(value["id"], "drop-x");
    assert_eq!(value["replacement"], "");
}
