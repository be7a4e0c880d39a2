//! Strict JSON surface: decode or error, then analyze or re-emit.
//!
//! Unlike the SQL side, failures here are real errors: JSON has an
//! unambiguous grammar, so a document either decodes or it does not. The
//! decoder keeps object member order (`preserve_order`), which makes
//! [`reflow`] a faithful re-indentation rather than a re-sorting.

pub mod stats;

pub use stats::AnalysisStats;

use serde_json::Value;
use thiserror::Error;

/// A structural decode failure, surfaced verbatim from the decoder with the
/// position mapped back to a byte offset into the input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ParseError {
    pub message: String,
    /// Byte offset of the failure, when the decoder's line/column report
    /// maps back into the input.
    pub offset: Option<usize>,
}

fn decode(text: &str) -> Result<Value, ParseError> {
    serde_json::from_str(text).map_err(|e| ParseError {
        offset: offset_of(text, e.line(), e.column()),
        message: e.to_string(),
    })
}

/// Translate the decoder's 1-based line/column into a byte offset.
fn offset_of(text: &str, line: usize, column: usize) -> Option<usize> {
    if line == 0 {
        return None;
    }
    let mut line_start = 0;
    let mut remaining = line - 1;
    if remaining > 0 {
        for (idx, byte) in text.bytes().enumerate() {
            if byte == b'\n' {
                remaining -= 1;
                if remaining == 0 {
                    line_start = idx + 1;
                    break;
                }
            }
        }
        if remaining > 0 {
            return None;
        }
    }
    let offset = line_start + column.saturating_sub(1);
    (offset <= text.len()).then_some(offset)
}

/// Decode `text` and tally structure statistics.
pub fn analyze(text: &str) -> Result<AnalysisStats, ParseError> {
    Ok(stats::collect(&decode(text)?))
}

/// Decode `text` and re-emit it pretty-printed (2-space indent), member
/// order preserved.
pub fn reflow(text: &str) -> Result<String, ParseError> {
    let value = decode(text)?;
    Ok(serde_json::to_string_pretty(&value).expect("re-serializing a decoded value cannot fail"))
}

/// Decode `text` and re-emit it with all insignificant whitespace removed.
pub fn minify(text: &str) -> Result<String, ParseError> {
    let value = decode(text)?;
    Ok(serde_json::to_string(&value).expect("re-serializing a decoded value cannot fail"))
}

/// Decode-only check: `Ok` exactly when `text` is syntactically valid JSON.
pub fn validate(text: &str) -> Result<(), ParseError> {
    decode(text).map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn analyze_rejects_invalid_json_with_an_offset() {
        let err = analyze("{\"a\": 1,}").expect_err("trailing comma is invalid");
        assert!(!err.message.is_empty());
        assert_eq!(err.offset, Some(8));
    }

    #[test]
    fn offset_lands_on_the_right_line() {
        let err = validate("{\n  \"a\": oops\n}").expect_err("bare word is invalid");
        // Line 2, column 8 -> after the `{\n` prefix.
        assert_eq!(err.offset, Some(9));
    }

    #[test]
    fn reflow_pretty_prints_and_keeps_member_order() {
        let out = reflow("{\"z\": 1, \"a\": [true, null]}").expect("valid JSON");
        assert_eq!(out, "{\n  \"z\": 1,\n  \"a\": [\n    true,\n    null\n  ]\n}");
    }

    #[test]
    fn minify_strips_whitespace() {
        let out = minify("{ \"a\" : [ 1 , 2 ] }").expect("valid JSON");
        assert_eq!(out, "{\"a\":[1,2]}");
    }

    #[test]
    fn reflow_then_minify_round_trips() {
        let src = "{\"a\":{\"b\":[1,2,3]},\"c\":\"x\"}";
        let pretty = reflow(src).expect("valid JSON");
        assert_eq!(minify(&pretty).expect("reflow output is valid"), src);
    }

    #[test]
    fn validate_accepts_scalars_and_rejects_garbage() {
        assert!(validate("42").is_ok());
        assert!(validate("\"hi\"").is_ok());
        assert!(validate("not json").is_err());
        assert!(validate("").is_err());
    }
}
