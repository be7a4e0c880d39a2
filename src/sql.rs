//! Lenient SQL surface: tokenize and re-emit, never parse, never fail.
//!
//! Every operation here is total. Malformed SQL still produces a best-effort
//! output string; correctness concerns surface only through [`validate`]'s
//! advisory issue list. This is the opposite contract from the strict JSON
//! surface in [`crate::json`], and it is intentional: a formatting tool must
//! never block the user from seeing output.

pub mod reflow;
pub mod stats;
pub mod token;

pub use reflow::reflow;
pub use stats::{SqlStats, StatementType, analyze_stats};

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::sql::token::scan_quoted;

/// The fixed keyword vocabulary used by [`stats::analyze_stats`]. Compound
/// entries overlap their parts (`INNER JOIN` also matches `JOIN`); the
/// keyword count is defined against this list as-is.
pub const SQL_KEYWORDS: &[&str] = &[
    "SELECT",
    "FROM",
    "WHERE",
    "JOIN",
    "INNER JOIN",
    "LEFT JOIN",
    "RIGHT JOIN",
    "FULL JOIN",
    "ON",
    "AND",
    "OR",
    "NOT",
    "IN",
    "EXISTS",
    "LIKE",
    "BETWEEN",
    "IS NULL",
    "IS NOT NULL",
    "GROUP BY",
    "HAVING",
    "ORDER BY",
    "ASC",
    "DESC",
    "LIMIT",
    "OFFSET",
    "INSERT",
    "INTO",
    "VALUES",
    "UPDATE",
    "SET",
    "DELETE",
    "CREATE",
    "TABLE",
    "ALTER",
    "DROP",
    "INDEX",
    "DATABASE",
    "SCHEMA",
    "VIEW",
    "PROCEDURE",
    "FUNCTION",
    "AS",
    "DISTINCT",
    "COUNT",
    "SUM",
    "AVG",
    "MIN",
    "MAX",
    "CASE",
    "WHEN",
    "THEN",
    "ELSE",
    "END",
    "UNION",
    "UNION ALL",
    "INTERSECT",
    "EXCEPT",
    "WITH",
];

static STATEMENT_OPENER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(SELECT|INSERT|UPDATE|DELETE|CREATE|ALTER|DROP|WITH)\b")
        .expect("opener pattern is valid")
});

/// Outcome of [`validate`]: the issue list is empty exactly when `valid`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub issues: Vec<String>,
}

/// Collapse `sql` onto a single line: whitespace runs become one space and
/// whitespace touching `,`, `(`, `)`, `;` disappears entirely. Quoted text
/// passes through verbatim, so a literal like `'a , b'` is never rewritten.
pub fn minify(sql: &str) -> String {
    let mut out = String::new();
    let mut chars = sql.char_indices().peekable();
    let mut pending_space = false;

    while let Some(&(start, ch)) = chars.peek() {
        if ch.is_whitespace() {
            chars.next();
            pending_space = !out.is_empty();
            continue;
        }
        let tight = matches!(ch, ',' | '(' | ')' | ';');
        if pending_space && !tight && !out.ends_with([',', '(', ')', ';']) {
            out.push(' ');
        }
        pending_space = false;
        if ch == '\'' || ch == '"' {
            chars.next();
            let end = scan_quoted(sql, &mut chars, ch);
            out.push_str(&sql[start..end]);
        } else {
            chars.next();
            out.push(ch);
        }
    }

    out
}

/// Advisory sanity checks, not a parser. Reports whether the input starts
/// with a recognized statement keyword, whether paren counts balance, and
/// whether single quotes pair up. All three are character-level and
/// knowingly unsound: quoted parentheses or quotes inside literals can
/// produce false positives, and passing all checks proves nothing about the
/// SQL being well formed. Never fails.
pub fn validate(sql: &str) -> ValidationResult {
    let trimmed = sql.trim();
    let mut issues = Vec::new();

    if !STATEMENT_OPENER.is_match(trimmed) {
        issues.push("statement does not start with a recognized SQL keyword".to_string());
    }

    let opening = trimmed.matches('(').count();
    let closing = trimmed.matches(')').count();
    if opening != closing {
        issues.push(format!(
            "unbalanced parentheses: {opening} opening, {closing} closing"
        ));
    }

    if trimmed.matches('\'').count() % 2 != 0 {
        issues.push("unpaired single quote".to_string());
    }

    ValidationResult {
        valid: issues.is_empty(),
        issues,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minify_collapses_whitespace_and_tightens_punctuation() {
        let out = minify("SELECT  id ,  name\n  FROM users\twhere ( age > 21 ) ;");
        assert_eq!(out, "SELECT id,name FROM users where(age > 21);");
    }

    #[test]
    fn minify_leaves_string_literals_alone() {
        let out = minify("SELECT 'a ,  ( b )' FROM t");
        assert_eq!(out, "SELECT 'a ,  ( b )' FROM t");
    }

    #[test]
    fn minify_never_inserts_whitespace() {
        assert_eq!(minify("a=1"), "a=1");
        assert_eq!(minify("COUNT(id)"), "COUNT(id)");
    }

    #[test]
    fn minify_trims_the_result() {
        assert_eq!(minify("  SELECT 1  "), "SELECT 1");
        assert_eq!(minify(""), "");
        assert_eq!(minify("   "), "");
    }

    #[test]
    fn validate_accepts_a_plain_select() {
        let result = validate("SELECT * FROM t WHERE a = 1");
        assert!(result.valid);
        assert!(result.issues.is_empty());
    }

    #[test]
    fn validate_reports_unbalanced_parens_without_panicking() {
        let result = validate("SELECT * FROM t WHERE (a=1");
        assert!(!result.valid);
        assert!(result.issues.iter().any(|i| i.contains("parentheses")));
    }

    #[test]
    fn validate_reports_every_violated_check() {
        let result = validate("garbage ( 'unterminated");
        assert_eq!(result.issues.len(), 3);
    }

    #[test]
    fn validate_accepts_leading_whitespace_and_any_case() {
        assert!(validate("   select 1").valid);
        assert!(validate("with x as (select 1) select * from x").valid);
    }
}
