//! Formatting and structural analysis for SQL and JSON text.
//!
//! Two independent components behind plain function signatures, both pure
//! `text → derived text | statistics`:
//!
//! - [`json`] — strict: decode or fail with a positioned [`json::ParseError`],
//!   then analyze structure or re-emit (pretty / compact).
//! - [`sql`] — lenient: tokenize (never parse) and reflow, minify, lint, or
//!   summarize; every operation is total and malformed input degrades to
//!   best-effort output.
//!
//! The [`cli`] module is the only place that touches I/O; the core stays
//! host-independent and safe to call on every keystroke.

pub mod cli;
pub mod json;
pub mod sql;
