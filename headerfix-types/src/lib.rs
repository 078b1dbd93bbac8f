//! Shared DTOs (schemas-as-code) for the headerfix workspace.
//!
//! # Design constraints
//! - Report types are serialized to disk.
//! - Prefer adding optional fields over changing semantics.

pub mod report;
pub mod rule;

/// Schema identifiers.
pub mod schema {
    pub const HEADERFIX_REPORT_V1: &str = "headerfix.report.v1";
}
