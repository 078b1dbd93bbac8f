//! Built-in rewrite rules and id-based selection.

use headerfix_types::rule::RewriteRule;

/// The rule catalog, in application order.
///
/// Order matters: `drop-storage-quoted` also removes a quoted storage import
/// produced by an earlier run or another tool.
pub static FIREBASE_RULES: &[RewriteRule] = &[
    RewriteRule {
        id: "firebase-umbrella",
        pattern: "#import <Firebase/Firebase.h>",
        replacement: "#import \"Firebase.h\"",
        rationale: "The Firebase pod is not exposed as a module; import the umbrella header \
                    that sits on the header search path instead.",
    },
    RewriteRule {
        id: "drop-storage-modular",
        pattern: "#import <FirebaseStorage/FirebaseStorage.h>",
        replacement: "",
        rationale: "FirebaseStorage ships as a Swift framework with no Objective-C umbrella \
                    header; the import cannot resolve and is removed.",
    },
    RewriteRule {
        id: "drop-storage-quoted",
        pattern: "#import \"FirebaseStorage.h\"",
        replacement: "",
        rationale: "Quoted form of the FirebaseStorage import, left behind by earlier \
                    rewrites; removed for the same reason.",
    },
    RewriteRule {
        id: "core-quoted",
        pattern: "#import <FirebaseCore/FirebaseCore.h>",
        replacement: "#import \"FirebaseCore.h\"",
        rationale: "FirebaseCore is linked as a static library; use the quoted umbrella \
                    header instead of the modular import.",
    },
    RewriteRule {
        id: "auth-quoted",
        pattern: "#import <FirebaseAuth/FirebaseAuth.h>",
        replacement: "#import \"FirebaseAuth.h\"",
        rationale: "FirebaseAuth is linked as a static library; use the quoted umbrella \
                    header instead of the modular import.",
    },
];

pub fn builtin_rules() -> &'static [RewriteRule] {
    FIREBASE_RULES
}

/// Find a built-in rule by id.
pub fn lookup_rule(id: &str) -> Option<&'static RewriteRule> {
    FIREBASE_RULES.iter().find(|r| r.id == id)
}

/// Filter the catalog by id patterns, keeping catalog order.
///
/// An empty allowlist admits every rule; the denylist always wins.
pub fn select_rules(allow: &[String], deny: &[String]) -> Vec<RewriteRule> {
    FIREBASE_RULES
        .iter()
        .filter(|r| allowed_by_id(allow, deny, r.id))
        .copied()
        .collect()
}

fn allowed_by_id(allow: &[String], deny: &[String], id: &str) -> bool {
    if !allow.is_empty() && !allow.iter().any(|p| glob_match(p, id)) {
        return false;
    }
    !deny.iter().any(|p| glob_match(p, id))
}

fn glob_match(pat: &str, text: &str) -> bool {
    // Simple wildcard matcher: '*' and '?'.
    let p = pat.as_bytes();
    let t = text.as_bytes();
    let mut dp = vec![vec![false; t.len() + 1]; p.len() + 1];
    dp[0][0] = true;

    for i in 1..=p.len() {
        if p[i - 1] == b'*' {
            dp[i][0] = dp[i - 1][0];
        }
    }

    for i in 1..=p.len() {
        for j in 1..=t.len() {
            dp[i][j] = match p[i - 1] {
                b'*' => dp[i - 1][j] || dp[i][j - 1],
                b'?' => dp[i - 1][j - 1],
                c => dp[i - 1][j - 1] && c == t[j - 1],
            };
        }
    }

    dp[p.len()][t.len()]
}
