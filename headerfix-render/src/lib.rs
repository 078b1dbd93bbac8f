//! Rendering helpers (markdown) for human-readable artifacts.

use headerfix_types::report::{FileErrorKind, FileStatus, PatchReport};

pub fn render_report_md(report: &PatchReport) -> String {
    let mut out = String::new();
    out.push_str("# headerfix run\n\n");
    if report.dry_run {
        out.push_str("_Dry run: no files were written._\n\n");
    }
    out.push_str(&format!(
        "- Targets: {}\n- Fixed: {}\n- Unchanged: {}\n- Not found: {}\n- Failed: {}\n",
        report.summary.targets,
        report.summary.fixed,
        report.summary.unchanged,
        report.summary.not_found,
        report.summary.failed
    ));
    if report.rules.is_empty() {
        out.push_str("- Rules: none\n\n");
    } else {
        out.push_str(&format!("- Rules: {}\n\n", report.rules.join(", ")));
    }

    out.push_str("## Files\n\n");
    if report.files.is_empty() {
        out.push_str("_No targets._\n");
        return out;
    }

    for (i, f) in report.files.iter().enumerate() {
        out.push_str(&format!("### {}. `{}`\n\n", i + 1, f.path));
        out.push_str(&format!("- Status: `{}`\n", status_label(f.status)));
        if !f.rule_hits.is_empty() {
            let hits: Vec<String> = f
                .rule_hits
                .iter()
                .map(|h| format!("{} ×{}", h.rule_id, h.count))
                .collect();
            out.push_str(&format!("- Rules applied: {}\n", hits.join(", ")));
        }
        if f.status == FileStatus::Fixed {
            let before = f.sha256_before.as_deref().unwrap_or("-");
            let after = f.sha256_after.as_deref().unwrap_or("-");
            out.push_str(&format!("- sha256: {} → {}\n", before, after));
        }
        if let Some(backup) = &f.backup_path {
            out.push_str(&format!("- Backup: `{}`\n", backup));
        }
        if let Some(err) = &f.error {
            out.push_str(&format!(
                "- Error ({}): {}\n",
                error_kind_label(err.kind),
                err.message
            ));
        }
        out.push('\n');
    }

    out
}

fn status_label(s: FileStatus) -> &'static str {
    match s {
        FileStatus::Fixed => "fixed",
        FileStatus::Unchanged => "unchanged",
        FileStatus::NotFound => "not_found",
        FileStatus::Failed => "failed",
    }
}

fn error_kind_label(k: FileErrorKind) -> &'static str {
    match k {
        FileErrorKind::Missing => "missing",
        FileErrorKind::PermissionDenied => "permission_denied",
        FileErrorKind::ReadFailed => "read_failed",
        FileErrorKind::WriteFailed => "write_failed",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use headerfix_types::report::{FileError, FileOutcome, ToolInfo};
    use headerfix_types::rule::RuleHit;

    fn report(dry_run: bool) -> PatchReport {
        PatchReport::new(
            ToolInfo {
                name: "headerfix".to_string(),
                version: None,
            },
            dry_run,
        )
    }

    #[test]
    fn empty_report_says_no_targets() {
        let md = render_report_md(&report(false));
        assert!(md.starts_with("# headerfix run\n"));
        assert!(md.contains("- Targets: 0"));
        assert!(md.contains("- Rules: none"));
        assert!(md.contains("_No targets._"));
        assert!(!md.contains("Dry run"));
    }

    #[test]
    fn renders_each_file_with_details() {
        let mut r = report(true);
        r.rules = vec!["auth-quoted".to_string()];

        let mut fixed = FileOutcome::new(Utf8PathBuf::from("/p/A.h"), FileStatus::Fixed);
        fixed.rule_hits.push(RuleHit {
            rule_id: "auth-quoted".to_string(),
            count: 2,
        });
        fixed.sha256_before = Some("aa".to_string());
        fixed.sha256_after = Some("bb".to_string());
        r.push(fixed);

        r.push(FileOutcome::new(Utf8PathBuf::from("/p/B.h"), FileStatus::NotFound));

        let mut failed = FileOutcome::new(Utf8PathBuf::from("/p/C.h"), FileStatus::Failed);
        failed.error = Some(FileError {
            kind: FileErrorKind::WriteFailed,
            message: "write failed: disk full".to_string(),
        });
        r.push(failed);

        let md = render_report_md(&r);
        assert!(md.contains("_Dry run: no files were written._"));
        assert!(md.contains("- Rules: auth-quoted"));
        assert!(md.contains("### 1. `/p/A.h`"));
        assert!(md.contains("- Rules applied: auth-quoted ×2"));
        assert!(md.contains("- sha256: aa → bb"));
        assert!(md.contains("### 2. `/p/B.h`\n\n- Status: `not_found`"));
        assert!(md.contains("- Error (write_failed): write failed: disk full"));
        assert!(md.contains("- Failed: 1"));
    }
}
