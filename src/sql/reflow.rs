//! Keyword-driven SQL re-formatter.
//!
//! The token stream is regrouped into logical lines (one per major clause,
//! join, condition, or list item) and re-serialized with paren-depth
//! indentation. Output depends only on the token sequence, so re-formatting
//! already-formatted SQL is a fixed point.

use crate::sql::token::{SqlToken, tokenize};

const INDENT: &str = "    ";

/// Keywords that keep a space before an opening paren. Anything else
/// (identifiers, function names) binds tight: `COUNT(id)`, `users(a, b)`.
const SPACED_BEFORE_PAREN: &[&str] = &[
    "AND", "OR", "NOT", "IN", "ON", "WHERE", "SELECT", "FROM", "EXISTS", "THEN", "ELSE", "WHEN",
    "IS", "LIKE", "BETWEEN", "AS", "SET", "HAVING", "DISTINCT", "ALL", "UNION", "JOIN", "INTO",
    "TABLE", "CHECK", "DEFAULT",
];

/// Clause context of one paren scope; decides which commas start new lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scope {
    Select,
    Values,
    Other,
}

/// The kind of line break a keyword phrase forces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Break {
    Clause(Scope),
    Join,
    Cond,
    Union,
    Case,
    When,
    Else,
    End,
}

/// Pretty-print `sql`. Best-effort and total: malformed input (unbalanced
/// parens, stray keywords) still renders, with indentation degrading
/// gracefully instead of failing.
pub fn reflow(sql: &str) -> String {
    Renderer::new().render(&tokenize(sql))
}

struct Renderer {
    lines: Vec<(usize, String)>,
    line: String,
    line_indent: usize,
    line_extra: usize,
    pending_extra: usize,
    depth: usize,
    scopes: Vec<Scope>,
    multiline: Vec<bool>,
    paren_extra: Vec<usize>,
    case_stack: Vec<usize>,
    no_space: bool,
    after_values: bool,
    prev_word: Option<String>,
}

impl Renderer {
    fn new() -> Self {
        Renderer {
            lines: Vec::new(),
            line: String::new(),
            line_indent: 0,
            line_extra: 0,
            pending_extra: 0,
            depth: 0,
            scopes: vec![Scope::Other],
            multiline: Vec::new(),
            paren_extra: Vec::new(),
            case_stack: Vec::new(),
            no_space: false,
            after_values: false,
            prev_word: None,
        }
    }

    fn render(mut self, tokens: &[SqlToken]) -> String {
        let mut i = 0;
        while i < tokens.len() {
            let values_head = self.after_values;
            self.after_values = false;
            match &tokens[i] {
                SqlToken::Word(_) => {
                    let (brk, len) = classify(tokens, i);
                    self.apply_break(brk);
                    for tok in &tokens[i..i + len] {
                        self.emit(tok);
                    }
                    if matches!(brk, Some(Break::Clause(Scope::Values))) {
                        self.after_values = true;
                    }
                    i += len;
                    continue;
                }
                SqlToken::Punct('(') => self.open_paren(values_head),
                SqlToken::Punct(')') => self.close_paren(),
                SqlToken::Punct(',') => self.comma(),
                SqlToken::Punct(';') => self.semicolon(),
                tok => self.emit(tok),
            }
            i += 1;
        }
        self.finish()
    }

    /// Extra indent of the line the next token would land on.
    fn current_extra(&self) -> usize {
        if self.line.is_empty() {
            self.pending_extra
        } else {
            self.line_extra
        }
    }

    fn apply_break(&mut self, brk: Option<Break>) {
        let Some(brk) = brk else { return };
        match brk {
            Break::Clause(scope) => {
                self.break_line(0);
                if let Some(slot) = self.scopes.last_mut() {
                    *slot = scope;
                }
            }
            Break::Join => self.break_line(0),
            Break::Cond => {
                let extra = self.current_extra().max(1);
                self.break_line(extra);
            }
            Break::Union => {
                self.break_line(0);
                self.lines.push((0, String::new()));
            }
            Break::Case => {
                let mut extra = self.current_extra();
                if extra == 0 && matches!(self.scopes.last(), Some(Scope::Select)) {
                    // A CASE opening a select item sits at item level.
                    extra = 1;
                }
                self.break_line(extra);
                self.case_stack.push(extra);
            }
            Break::When | Break::Else => {
                let extra = match self.case_stack.last() {
                    Some(case_extra) => case_extra + 1,
                    None => self.current_extra().max(1),
                };
                self.break_line(extra);
            }
            Break::End => {
                let extra = self
                    .case_stack
                    .pop()
                    .unwrap_or_else(|| self.current_extra().saturating_sub(1));
                self.break_line(extra);
            }
        }
    }

    fn open_paren(&mut self, values_head: bool) {
        let values_row = values_head
            || (self.line.is_empty() && matches!(self.scopes.last(), Some(Scope::Values)));
        if values_head {
            self.break_line(1);
        }
        let open_extra = self.current_extra();
        self.emit(&SqlToken::Punct('('));
        self.depth += 1;
        self.scopes
            .push(if values_row { Scope::Values } else { Scope::Other });
        self.multiline.push(false);
        self.paren_extra.push(open_extra);
    }

    fn close_paren(&mut self) {
        let was_multiline = self.multiline.pop().unwrap_or(false);
        let open_extra = self.paren_extra.pop().unwrap_or(0);
        self.depth = self.depth.saturating_sub(1);
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
        if was_multiline && !self.line.is_empty() {
            self.break_line(open_extra);
        }
        if self.line.is_empty() {
            // A closing paren re-aligns with the line that opened the group,
            // one level below the paren body.
            self.pending_extra = open_extra;
        }
        self.emit(&SqlToken::Punct(')'));
    }

    fn comma(&mut self) {
        self.emit(&SqlToken::Punct(','));
        match self.scopes.last() {
            Some(Scope::Select) => self.break_line(1),
            Some(Scope::Values) => {
                let in_row = self.scopes.len() >= 2
                    && matches!(self.scopes[self.scopes.len() - 2], Scope::Values);
                self.break_line(if in_row { 0 } else { 1 });
            }
            _ => {}
        }
    }

    fn semicolon(&mut self) {
        self.emit(&SqlToken::Punct(';'));
        self.break_line(0);
        self.depth = 0;
        self.scopes.clear();
        self.scopes.push(Scope::Other);
        self.multiline.clear();
        self.paren_extra.clear();
        self.case_stack.clear();
    }

    fn break_line(&mut self, extra: usize) {
        if !self.line.is_empty() {
            self.lines
                .push((self.line_indent, std::mem::take(&mut self.line)));
            if let Some(flag) = self.multiline.last_mut() {
                *flag = true;
            }
        }
        self.pending_extra = extra;
        self.no_space = false;
    }

    fn emit(&mut self, tok: &SqlToken) {
        if self.line.is_empty() {
            self.line_indent = self.depth + self.pending_extra;
            self.line_extra = self.pending_extra;
        } else {
            let tight = self.no_space
                || match tok {
                    SqlToken::Punct(',' | ')' | ';') => true,
                    SqlToken::Punct('(') => self.tight_paren(),
                    SqlToken::Symbol(s) => s.starts_with('.'),
                    _ => false,
                };
            if !tight {
                self.line.push(' ');
            }
        }
        match tok {
            SqlToken::Word(w) => self.line.push_str(w),
            SqlToken::Literal(l) => self.line.push_str(l),
            SqlToken::Symbol(s) => self.line.push_str(s),
            SqlToken::Punct(c) => self.line.push(*c),
        }
        self.no_space = matches!(tok, SqlToken::Punct('('))
            || matches!(tok, SqlToken::Symbol(s) if s.starts_with('.'));
        self.prev_word = match tok {
            SqlToken::Word(w) => Some(w.clone()),
            _ => None,
        };
    }

    fn tight_paren(&self) -> bool {
        match &self.prev_word {
            Some(word) => !SPACED_BEFORE_PAREN
                .iter()
                .any(|kw| word.eq_ignore_ascii_case(kw)),
            None => false,
        }
    }

    fn finish(mut self) -> String {
        if !self.line.is_empty() {
            self.lines
                .push((self.line_indent, std::mem::take(&mut self.line)));
        }
        let mut rendered: Vec<String> = Vec::new();
        let mut prev_blank = true;
        for (indent, text) in self.lines {
            if text.is_empty() {
                if !prev_blank {
                    rendered.push(String::new());
                    prev_blank = true;
                }
            } else {
                rendered.push(format!("{}{}", INDENT.repeat(indent), text));
                prev_blank = false;
            }
        }
        while rendered.last().is_some_and(|l| l.is_empty()) {
            rendered.pop();
        }
        rendered.join("\n")
    }
}

fn word_eq(tokens: &[SqlToken], i: usize, keyword: &str) -> bool {
    tokens.get(i).is_some_and(|t| t.is_word(keyword))
}

/// Decide whether the word phrase at `i` forces a line break, and how many
/// tokens the phrase spans (`GROUP BY` and friends are emitted as one unit).
fn classify(tokens: &[SqlToken], i: usize) -> (Option<Break>, usize) {
    if word_eq(tokens, i, "GROUP") && word_eq(tokens, i + 1, "BY") {
        return (Some(Break::Clause(Scope::Other)), 2);
    }
    if word_eq(tokens, i, "ORDER") && word_eq(tokens, i + 1, "BY") {
        return (Some(Break::Clause(Scope::Other)), 2);
    }
    if word_eq(tokens, i, "UNION") {
        let len = if word_eq(tokens, i + 1, "ALL") { 2 } else { 1 };
        return (Some(Break::Union), len);
    }
    for lead in ["INNER", "LEFT", "RIGHT", "FULL", "CROSS"] {
        if word_eq(tokens, i, lead) {
            if word_eq(tokens, i + 1, "OUTER") && word_eq(tokens, i + 2, "JOIN") {
                return (Some(Break::Join), 3);
            }
            if word_eq(tokens, i + 1, "JOIN") {
                return (Some(Break::Join), 2);
            }
        }
    }
    if word_eq(tokens, i, "JOIN") {
        return (Some(Break::Join), 1);
    }
    if word_eq(tokens, i, "SELECT") {
        return (Some(Break::Clause(Scope::Select)), 1);
    }
    if word_eq(tokens, i, "VALUES") {
        return (Some(Break::Clause(Scope::Values)), 1);
    }
    for kw in ["FROM", "WHERE", "HAVING", "LIMIT", "OFFSET", "SET"] {
        if word_eq(tokens, i, kw) {
            return (Some(Break::Clause(Scope::Other)), 1);
        }
    }
    for kw in ["ON", "AND", "OR"] {
        if word_eq(tokens, i, kw) {
            return (Some(Break::Cond), 1);
        }
    }
    if word_eq(tokens, i, "CASE") {
        return (Some(Break::Case), 1);
    }
    if word_eq(tokens, i, "WHEN") {
        return (Some(Break::When), 1);
    }
    if word_eq(tokens, i, "ELSE") {
        return (Some(Break::Else), 1);
    }
    if word_eq(tokens, i, "END") {
        return (Some(Break::End), 1);
    }
    (None, 1)
}
