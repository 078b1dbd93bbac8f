use crate::rule::RuleHit;
use camino::Utf8PathBuf;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Machine-readable record of one patch run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatchReport {
    pub schema: String,
    pub tool: ToolInfo,
    pub run: RunInfo,
    pub dry_run: bool,

    /// Rule ids that were active, in application order.
    #[serde(default)]
    pub rules: Vec<String>,

    #[serde(default)]
    pub files: Vec<FileOutcome>,

    pub summary: PatchSummary,
}

impl PatchReport {
    pub fn new(tool: ToolInfo, dry_run: bool) -> Self {
        Self {
            schema: crate::schema::HEADERFIX_REPORT_V1.to_string(),
            tool,
            run: RunInfo::start(),
            dry_run,
            rules: vec![],
            files: vec![],
            summary: PatchSummary::default(),
        }
    }

    /// Append an outcome and keep the summary counts in step.
    pub fn push(&mut self, outcome: FileOutcome) {
        self.summary.record(outcome.status);
        self.files.push(outcome);
    }

    pub fn has_failures(&self) -> bool {
        self.summary.failed > 0
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInfo {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunInfo {
    pub id: Uuid,
    pub started_at: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ended_at: Option<DateTime<Utc>>,
}

impl RunInfo {
    pub fn start() -> Self {
        Self {
            id: Uuid::new_v4(),
            started_at: Utc::now(),
            ended_at: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileOutcome {
    pub path: Utf8PathBuf,
    pub status: FileStatus,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rule_hits: Vec<RuleHit>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sha256_before: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sha256_after: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backup_path: Option<Utf8PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<FileError>,
}

impl FileOutcome {
    pub fn new(path: Utf8PathBuf, status: FileStatus) -> Self {
        Self {
            path,
            status,
            rule_hits: vec![],
            sha256_before: None,
            sha256_after: None,
            backup_path: None,
            error: None,
        }
    }

    pub fn replacements(&self) -> u64 {
        self.rule_hits.iter().map(|h| h.count).sum()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileStatus {
    /// Content changed and was written (or would be, in a dry run).
    Fixed,
    /// No rule matched; nothing written.
    Unchanged,
    NotFound,
    Failed,
}

/// Structured per-file failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileError {
    pub kind: FileErrorKind,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileErrorKind {
    /// The file disappeared between the existence check and the read.
    Missing,
    PermissionDenied,
    ReadFailed,
    WriteFailed,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatchSummary {
    pub targets: u64,
    pub fixed: u64,
    pub unchanged: u64,
    pub not_found: u64,
    pub failed: u64,
}

impl PatchSummary {
    pub fn record(&mut self, status: FileStatus) {
        self.targets += 1;
        match status {
            FileStatus::Fixed => self.fixed += 1,
            FileStatus::Unchanged => self.unchanged += 1,
            FileStatus::NotFound => self.not_found += 1,
            FileStatus::Failed => self.failed += 1,
        }
    }
}
