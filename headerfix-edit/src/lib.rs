//! Rewrite engine for headerfix.
//!
//! Responsibilities:
//! - Apply the ordered rewrite rules to header text (pure, no I/O).
//! - Patch one file: read, rewrite, atomically replace.
//! - Drive a whole target list, reporting progress per file.
//! - Generate a unified diff preview.

mod error;
pub mod rules;
pub mod targets;
mod write;

pub use error::PatchError;
pub use rules::{builtin_rules, lookup_rule, select_rules};
pub use targets::{dedup_targets, default_targets};

use camino::{Utf8Path, Utf8PathBuf};
use chrono::Utc;
use diffy::PatchFormatter;
use fs_err as fs;
use headerfix_types::report::{FileOutcome, FileStatus, PatchReport, ToolInfo};
use headerfix_types::rule::{RewriteRule, RuleHit};
use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};

pub const DEFAULT_BACKUP_SUFFIX: &str = ".headerfix.bak";

#[derive(Debug, Clone)]
pub struct PatchOptions {
    pub dry_run: bool,
    pub backup_enabled: bool,
    pub backup_suffix: String,
}

impl Default for PatchOptions {
    fn default() -> Self {
        Self {
            dry_run: false,
            backup_enabled: false,
            backup_suffix: DEFAULT_BACKUP_SUFFIX.to_string(),
        }
    }
}

/// Result of running the rules over one piece of text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewrite {
    pub content: String,
    /// Rules that matched, in application order.
    pub hits: Vec<RuleHit>,
}

/// Apply `rules` to `content` in order, replacing every literal occurrence.
///
/// Each rule sees the output of the previous one.
pub fn rewrite_content(content: &str, rules: &[RewriteRule]) -> Rewrite {
    let mut current = content.to_string();
    let mut hits = Vec::new();

    for rule in rules {
        let count = current.matches(rule.pattern).count() as u64;
        if count == 0 {
            continue;
        }
        current = current.replace(rule.pattern, rule.replacement);
        hits.push(RuleHit {
            rule_id: rule.id.to_string(),
            count,
        });
    }

    Rewrite {
        content: current,
        hits,
    }
}

/// Before/after text of a file the rules changed.
#[derive(Debug, Clone)]
pub struct ContentChange {
    pub path: Utf8PathBuf,
    pub before: String,
    pub after: String,
}

#[derive(Debug, Clone)]
pub struct PatchedFile {
    pub outcome: FileOutcome,
    pub change: Option<ContentChange>,
}

/// Read, rewrite and (unless dry-running) atomically replace one file.
///
/// The caller is expected to have checked that `path` exists; a file that
/// vanishes in between surfaces as [`PatchError::Missing`]. Unchanged
/// content is never rewritten.
pub fn patch_file(
    path: &Utf8Path,
    rules: &[RewriteRule],
    opts: &PatchOptions,
) -> Result<PatchedFile, PatchError> {
    let before = fs::read_to_string(path).map_err(|e| PatchError::read(path.to_owned(), e))?;
    let rewrite = rewrite_content(&before, rules);

    let mut outcome = FileOutcome::new(path.to_owned(), FileStatus::Unchanged);
    outcome.sha256_before = Some(sha256_hex(before.as_bytes()));
    outcome.sha256_after = Some(sha256_hex(rewrite.content.as_bytes()));
    outcome.rule_hits = rewrite.hits;

    if rewrite.content == before {
        debug!(path = %path, "no rule matched");
        return Ok(PatchedFile {
            outcome,
            change: None,
        });
    }

    outcome.status = FileStatus::Fixed;
    if !opts.dry_run {
        if opts.backup_enabled {
            let backup = write::write_backup(path, &opts.backup_suffix)
                .map_err(|e| PatchError::write(path.to_owned(), e))?;
            outcome.backup_path = Some(backup);
        }
        write::replace_atomic(path, &rewrite.content)
            .map_err(|e| PatchError::write(path.to_owned(), e))?;
    }

    Ok(PatchedFile {
        outcome,
        change: Some(ContentChange {
            path: path.to_owned(),
            before,
            after: rewrite.content,
        }),
    })
}

/// Something happening to one target during [`patch_all`].
#[derive(Debug)]
pub enum PatchEvent<'a> {
    NotFound(&'a Utf8Path),
    Fixing(&'a Utf8Path),
    Fixed(&'a FileOutcome),
    Failed(&'a PatchError),
}

/// Receives progress events in target order.
pub trait Progress {
    fn event(&mut self, event: PatchEvent<'_>);
}

/// Discards all events.
#[derive(Debug, Clone, Copy, Default)]
pub struct Silent;

impl Progress for Silent {
    fn event(&mut self, _event: PatchEvent<'_>) {}
}

#[derive(Debug, Clone)]
pub struct PatchRun {
    pub report: PatchReport,
    /// Files whose content changed, in target order.
    pub changes: Vec<ContentChange>,
}

impl PatchRun {
    pub fn patch(&self) -> String {
        render_patch(&self.changes)
    }
}

/// Patch every target in order.
///
/// Missing files are reported and skipped without being read or created.
/// A path whose existence cannot be determined counts as failed, not
/// missing. A failure on one file is recorded in the report and does not stop the
/// run.
pub fn patch_all(
    targets: &[Utf8PathBuf],
    rules: &[RewriteRule],
    opts: &PatchOptions,
    tool: ToolInfo,
    progress: &mut dyn Progress,
) -> PatchRun {
    let mut report = PatchReport::new(tool, opts.dry_run);
    report.rules = rules.iter().map(|r| r.id.to_string()).collect();
    let mut changes = Vec::new();

    debug!(
        targets = targets.len(),
        rules = rules.len(),
        dry_run = opts.dry_run,
        "starting patch run"
    );

    for path in targets {
        let result = match path.try_exists() {
            Ok(false) => {
                progress.event(PatchEvent::NotFound(path));
                report.push(FileOutcome::new(path.clone(), FileStatus::NotFound));
                continue;
            }
            Ok(true) => {
                progress.event(PatchEvent::Fixing(path));
                patch_file(path, rules, opts)
            }
            Err(e) => Err(PatchError::read(path.clone(), e)),
        };

        match result {
            Ok(patched) => {
                debug!(
                    path = %path,
                    replacements = patched.outcome.replacements(),
                    "patched"
                );
                progress.event(PatchEvent::Fixed(&patched.outcome));
                changes.extend(patched.change);
                report.push(patched.outcome);
            }
            Err(err) => {
                warn!(path = %path, error = %err, "patch failed");
                progress.event(PatchEvent::Failed(&err));
                let mut outcome = FileOutcome::new(path.clone(), FileStatus::Failed);
                outcome.error = Some(err.to_file_error());
                report.push(outcome);
            }
        }
    }

    report.run.ended_at = Some(Utc::now());
    info!(
        fixed = report.summary.fixed,
        unchanged = report.summary.unchanged,
        not_found = report.summary.not_found,
        failed = report.summary.failed,
        "patch run finished"
    );

    PatchRun { report, changes }
}

/// Render a git-style unified diff for the changed files.
pub fn render_patch(changes: &[ContentChange]) -> String {
    let mut out = String::new();
    let formatter = PatchFormatter::new();

    for change in changes {
        if change.before == change.after {
            continue;
        }
        let display = change.path.as_str().trim_start_matches('/');

        out.push_str(&format!("diff --git a/{0} b/{0}\n", display));
        out.push_str(&format!("--- a/{0}\n+++ b/{0}\n", display));

        let patch = diffy::create_patch(&change.before, &change.after);
        out.push_str(&formatter.fmt_patch(&patch).to_string());
        if !out.ends_with('\n') {
            out.push('\n');
        }
    }

    out
}

fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}
