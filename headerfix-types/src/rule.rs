use serde::{Deserialize, Serialize};

/// One literal find/replace applied to header text.
///
/// An empty `replacement` deletes the matched import.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RewriteRule {
    /// Stable, user-facing id (e.g. "firebase-umbrella").
    pub id: &'static str,
    /// Exact import statement text to match.
    pub pattern: &'static str,
    pub replacement: &'static str,
    /// Why the rewrite exists.
    pub rationale: &'static str,
}

impl RewriteRule {
    pub fn is_deletion(&self) -> bool {
        self.replacement.is_empty()
    }
}

/// Number of replacements a rule made in one file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RuleHit {
    pub rule_id: String,
    pub count: u64,
}
