//! Heuristic query statistics.
//!
//! Deliberately independent of the lexer: counts and name extraction run as
//! case-insensitive whole-word scans over the raw text, matching the
//! advisory contract of the surface they serve. The numbers describe the
//! text, not a parse of it.

use std::fmt;

use indexmap::IndexSet;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::sql::SQL_KEYWORDS;

/// Functions recognized by the `<name>(` scan.
const KNOWN_FUNCTIONS: &[&str] = &[
    "COUNT", "SUM", "AVG", "MIN", "MAX", "UPPER", "LOWER", "LENGTH", "SUBSTRING", "NOW", "DATE",
];

/// Coarse statement category, detected heuristically rather than by grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum StatementType {
    Select,
    Insert,
    Update,
    Delete,
    Create,
    Alter,
    Drop,
    Unknown,
}

impl fmt::Display for StatementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatementType::Select => write!(f, "SELECT"),
            StatementType::Insert => write!(f, "INSERT"),
            StatementType::Update => write!(f, "UPDATE"),
            StatementType::Delete => write!(f, "DELETE"),
            StatementType::Create => write!(f, "CREATE"),
            StatementType::Alter => write!(f, "ALTER"),
            StatementType::Drop => write!(f, "DROP"),
            StatementType::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

/// Aggregate statistics for one SQL string. A pure function of the input:
/// identical text always produces an identical record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SqlStats {
    pub line_count: usize,
    pub word_count: usize,
    pub character_count: usize,
    /// Whole-word matches summed over the fixed keyword list. The list
    /// contains both `JOIN` and `INNER JOIN`, so compound keywords count
    /// their parts as well; the count is defined against the list, not
    /// against a grammar.
    pub keyword_count: usize,
    pub statement_type: StatementType,
    /// Identifiers seen after `FROM`/`JOIN`, lowercased, first-seen order.
    pub tables: IndexSet<String>,
    /// Recognized function names seen before `(`, uppercased.
    pub functions: IndexSet<String>,
}

static KEYWORD_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    SQL_KEYWORDS
        .iter()
        .map(|kw| {
            let words = kw.replace(' ', r"\s+");
            Regex::new(&format!(r"(?i)\b{words}\b")).expect("keyword pattern is valid")
        })
        .collect()
});

static STATEMENT_PATTERNS: Lazy<Vec<(StatementType, Regex)>> = Lazy::new(|| {
    [
        (StatementType::Select, "SELECT"),
        (StatementType::Insert, "INSERT"),
        (StatementType::Update, "UPDATE"),
        (StatementType::Delete, "DELETE"),
        (StatementType::Create, "CREATE"),
        (StatementType::Alter, "ALTER"),
        (StatementType::Drop, "DROP"),
    ]
    .into_iter()
    .map(|(ty, kw)| {
        let re = Regex::new(&format!(r"(?i)\b{kw}\b")).expect("statement pattern is valid");
        (ty, re)
    })
    .collect()
});

static TABLE_REF: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:FROM|JOIN)\s+([A-Za-z_][A-Za-z0-9_]*)").expect("table pattern is valid")
});

static FUNCTION_CALL: Lazy<Regex> = Lazy::new(|| {
    let names = KNOWN_FUNCTIONS.join("|");
    Regex::new(&format!(r"(?i)\b({names})\s*\(")).expect("function pattern is valid")
});

/// Derive [`SqlStats`] from raw SQL. Never fails; nonsense input simply
/// produces small numbers and `StatementType::Unknown`.
pub fn analyze_stats(sql: &str) -> SqlStats {
    SqlStats {
        line_count: sql.split('\n').count(),
        word_count: sql.split_whitespace().count(),
        character_count: sql.chars().count(),
        keyword_count: KEYWORD_PATTERNS
            .iter()
            .map(|re| re.find_iter(sql).count())
            .sum(),
        statement_type: statement_type_of(sql),
        tables: TABLE_REF
            .captures_iter(sql)
            .map(|c| c[1].to_ascii_lowercase())
            .collect(),
        functions: FUNCTION_CALL
            .captures_iter(sql)
            .map(|c| c[1].to_ascii_uppercase())
            .collect(),
    }
}

/// First match wins, in the fixed priority order SELECT, INSERT, UPDATE,
/// DELETE, CREATE, ALTER, DROP.
fn statement_type_of(sql: &str) -> StatementType {
    for (ty, re) in STATEMENT_PATTERNS.iter() {
        if re.is_match(sql) {
            return *ty;
        }
    }
    StatementType::Unknown
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn analyze_stats_classifies_and_extracts_names() {
        let stats = analyze_stats("SELECT COUNT(id) FROM users");
        assert_eq!(stats.statement_type, StatementType::Select);
        assert!(stats.tables.contains("users"));
        assert_eq!(stats.tables.len(), 1);
        assert!(stats.functions.contains("COUNT"));
        assert_eq!(stats.functions.len(), 1);
    }

    #[test]
    fn analyze_stats_collects_join_tables_case_insensitively() {
        let stats = analyze_stats("select * from Users u inner join Posts p on u.id = p.user_id");
        assert!(stats.tables.contains("users"));
        assert!(stats.tables.contains("posts"));
    }

    #[test]
    fn statement_priority_prefers_select_over_later_keywords() {
        // Both SELECT and CREATE appear; SELECT is scanned first.
        assert_eq!(
            analyze_stats("CREATE TABLE t AS SELECT 1").statement_type,
            StatementType::Select,
        );
        assert_eq!(
            analyze_stats("DROP TABLE t").statement_type,
            StatementType::Drop,
        );
        assert_eq!(analyze_stats("nonsense").statement_type, StatementType::Unknown);
    }

    #[test]
    fn line_and_word_counts_use_split_conventions() {
        let stats = analyze_stats("SELECT a\nFROM t");
        assert_eq!(stats.line_count, 2);
        assert_eq!(stats.word_count, 4);
        assert_eq!(stats.character_count, 15);
        // Empty input still counts one (empty) line.
        assert_eq!(analyze_stats("").line_count, 1);
        assert_eq!(analyze_stats("").word_count, 0);
    }

    #[test]
    fn keyword_count_is_defined_against_the_fixed_list() {
        // INNER JOIN matches both the compound entry and the bare JOIN entry.
        let stats = analyze_stats("INNER JOIN t");
        assert_eq!(stats.keyword_count, 2);
    }

    #[test]
    fn analyze_stats_is_deterministic() {
        let sql = "SELECT id, MAX(score) FROM games GROUP BY id";
        assert_eq!(analyze_stats(sql), analyze_stats(sql));
    }
}
