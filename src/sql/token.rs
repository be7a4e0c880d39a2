//! SQL lexer: a flat token stream shared by the reflow and minify paths.
//!
//! This is deliberately not a parser. The only job is to split raw SQL into
//! units the renderers can reason about without re-scanning quoted text, so
//! a keyword inside a string literal can never trigger a line break.

use std::fmt;
use std::iter::Peekable;
use std::str::CharIndices;

/// One lexical unit of a SQL string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlToken {
    /// Identifier, number, or keyword candidate. Keyword-ness is decided by
    /// table lookup at the use site, never stored in the token.
    Word(String),
    /// Quoted text held verbatim, quotes included: single-quoted string
    /// literals (with `''` escapes) and double-quoted identifiers.
    Literal(String),
    /// Structural punctuation: `,`, `(`, `)`, `;`.
    Punct(char),
    /// Any other operator run (`=`, `<>`, `||`, `.`, ...). Preserved so
    /// tokenization never drops input.
    Symbol(String),
}

impl SqlToken {
    /// Case-insensitive match against a single keyword. Only bare words
    /// participate; literals and quoted identifiers never match.
    pub fn is_word(&self, keyword: &str) -> bool {
        matches!(self, SqlToken::Word(w) if w.eq_ignore_ascii_case(keyword))
    }
}

impl fmt::Display for SqlToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqlToken::Word(w) => f.write_str(w),
            SqlToken::Literal(l) => f.write_str(l),
            SqlToken::Punct(c) => write!(f, "{c}"),
            SqlToken::Symbol(s) => f.write_str(s),
        }
    }
}

/// Split `sql` into tokens. Total over arbitrary input: an unterminated
/// quote takes the rest of the string as one literal, and characters the
/// lexer has no opinion about come back as [`SqlToken::Symbol`] runs.
/// Whitespace is consumed here and re-introduced only by the renderers.
pub fn tokenize(sql: &str) -> Vec<SqlToken> {
    let mut tokens = Vec::new();
    let mut chars = sql.char_indices().peekable();

    while let Some(&(start, ch)) = chars.peek() {
        if ch.is_whitespace() {
            chars.next();
            continue;
        }
        if ch == '\'' || ch == '"' {
            chars.next();
            let end = scan_quoted(sql, &mut chars, ch);
            tokens.push(SqlToken::Literal(sql[start..end].to_string()));
            continue;
        }
        if is_word_start(ch) {
            let end = scan_while(&mut chars, start, is_word_char);
            tokens.push(SqlToken::Word(sql[start..end].to_string()));
            continue;
        }
        if ch.is_ascii_digit() {
            // Numbers keep their decimal point so `1.5` stays one token.
            let end = scan_while(&mut chars, start, |c| c.is_ascii_digit() || c == '.');
            tokens.push(SqlToken::Word(sql[start..end].to_string()));
            continue;
        }
        if matches!(ch, ',' | '(' | ')' | ';') {
            chars.next();
            tokens.push(SqlToken::Punct(ch));
            continue;
        }
        if ch == '.' {
            // Qualification dot stands alone; the renderers bind it tight.
            chars.next();
            tokens.push(SqlToken::Symbol(".".to_string()));
            continue;
        }
        let end = scan_while(&mut chars, start, is_symbol_char);
        tokens.push(SqlToken::Symbol(sql[start..end].to_string()));
    }

    tokens
}

/// Advance past the body of a quoted region opened with `quote` (the opening
/// quote has already been consumed) and return the end byte offset, one past
/// the closing quote. A doubled quote is the SQL escape for the quote itself.
/// Unterminated regions run to the end of input.
pub(crate) fn scan_quoted(
    sql: &str,
    chars: &mut Peekable<CharIndices<'_>>,
    quote: char,
) -> usize {
    while let Some((idx, c)) = chars.next() {
        if c == quote {
            match chars.peek() {
                Some(&(_, next)) if next == quote => {
                    chars.next();
                }
                _ => return idx + c.len_utf8(),
            }
        }
    }
    sql.len()
}

fn scan_while(
    chars: &mut Peekable<CharIndices<'_>>,
    start: usize,
    keep: impl Fn(char) -> bool,
) -> usize {
    let mut end = start;
    while let Some(&(idx, c)) = chars.peek() {
        if !keep(c) {
            break;
        }
        chars.next();
        end = idx + c.len_utf8();
    }
    end
}

fn is_word_start(ch: char) -> bool {
    ch.is_alphabetic() || ch == '_'
}

fn is_word_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}

fn is_symbol_char(ch: char) -> bool {
    !ch.is_whitespace()
        && !ch.is_alphanumeric()
        && !matches!(ch, '_' | '\'' | '"' | ',' | '(' | ')' | ';' | '.')
}
