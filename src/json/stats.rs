//! Structure statistics over a decoded JSON value.

use serde::Serialize;
use serde_json::Value;

/// Aggregate counts for one JSON document. Containers count once each, not
/// per member; every value node lands in exactly one counter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AnalysisStats {
    pub key_count: usize,
    pub object_count: usize,
    pub array_count: usize,
    pub string_count: usize,
    pub number_count: usize,
    pub boolean_count: usize,
    pub null_count: usize,
    /// Deepest level reached, with the root at depth 0: `{}` is 0, the `1`
    /// in `{"a": 1}` is 1.
    pub max_depth: usize,
}

impl AnalysisStats {
    /// Total number of value nodes visited.
    pub fn node_count(&self) -> usize {
        self.object_count
            + self.array_count
            + self.string_count
            + self.number_count
            + self.boolean_count
            + self.null_count
    }
}

/// Walk `value` and tally [`AnalysisStats`]. The traversal is iterative over
/// an explicit stack: hostile nesting depth costs heap, never native stack.
pub fn collect(value: &Value) -> AnalysisStats {
    let mut stats = AnalysisStats::default();
    let mut stack: Vec<(&Value, usize)> = vec![(value, 0)];

    while let Some((node, depth)) = stack.pop() {
        if depth > stats.max_depth {
            stats.max_depth = depth;
        }
        match node {
            Value::Null => stats.null_count += 1,
            Value::Bool(_) => stats.boolean_count += 1,
            Value::Number(_) => stats.number_count += 1,
            Value::String(_) => stats.string_count += 1,
            Value::Array(items) => {
                stats.array_count += 1;
                for item in items {
                    stack.push((item, depth + 1));
                }
            }
            Value::Object(members) => {
                stats.object_count += 1;
                for (_key, member) in members {
                    stats.key_count += 1;
                    stack.push((member, depth + 1));
                }
            }
        }
    }

    stats
}
