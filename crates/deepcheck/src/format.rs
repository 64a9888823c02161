//! Human-readable assertion messages.

use deepcheck_values::{format_number, Value};
use std::collections::HashSet;
use std::fmt::Write;

use crate::options::CompareType;
use crate::result::{
    ComparisonResult, ContainmentResult, PredicateResult, ValueCompareResult, ValueComparison,
};

/// Default maximum number of characters shown for a single value.
pub const DEFAULT_MAX_LENGTH: usize = 200;

const PASSED: &str = "Assertion passed:";
const FAILED: &str = "Assertion FAILED:";

/// Turns comparison results into messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageFormatter {
    max_length: usize,
}

impl Default for MessageFormatter {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_LENGTH)
    }
}

impl MessageFormatter {
    pub fn new(max_length: usize) -> Self {
        Self { max_length }
    }

    pub fn max_length(&self) -> usize {
        self.max_length
    }

    /// Format a result as a multi-line message.
    ///
    /// The first line is a prefix and a one-line summary; the following lines
    /// show the values involved. Failed structural comparisons report the
    /// first point of divergence rather than the top-level values.
    pub fn format(&self, result: &ComparisonResult) -> String {
        match result {
            ComparisonResult::Value(r) => self.format_value(r),
            ComparisonResult::Containment(r) => self.format_containment(r),
            ComparisonResult::Predicate(r) => self.format_predicate(r),
        }
    }

    /// The comparison to report for a structural result.
    ///
    /// For a failed affirmative check this is the first failing comparison, in
    /// depth-first order, that has no children or was made without ignoring
    /// references. Otherwise it is the root.
    pub fn first_divergence<'r>(&self, result: &'r ValueCompareResult) -> &'r ValueComparison {
        let root = result.root();
        if root.success() || !result.options().affirmative_check {
            return root;
        }

        let mut visited = HashSet::new();
        find_divergence(result, root, &mut visited).unwrap_or(root)
    }

    /// Render a value for display, truncated to `max_length` characters.
    pub fn render(&self, value: &Value) -> String {
        let rendered = match value {
            Value::Undefined => "undefined".to_string(),
            Value::Null => "null".to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Number(n) => format_number(*n),
            Value::BigInt(n) => format!("{}n", n),
            Value::String(s) => serde_json::to_string(&**s).unwrap_or_else(|_| s.to_string()),
            Value::Array(_) | Value::Object(_) => match value.to_json() {
                Ok(json) => json.to_string(),
                Err(err) => format!("[serialization failed: {}]", err),
            },
            Value::Function(f) => match f.source() {
                Some(source) => source.to_string(),
                None => format!("function {}()", f.name()),
            },
            Value::Node(n) => n.to_string(),
        };
        truncate(&rendered, self.max_length)
    }

    fn format_value(&self, result: &ValueCompareResult) -> String {
        let node = self.first_divergence(result);
        let (a, b) = (self.render(node.a()), self.render(node.b()));

        let mut message = format!(
            "{} `{}` {} `{}`",
            prefix(result.is_success()),
            a,
            relation(result.compare_type(), node.values_equal()),
            b
        );
        if let Some(path) = node.path() {
            let _ = write!(message, " at path `{}`", path);
        }
        if let Some(comparer) = node.resolved_by() {
            let _ = write!(message, " (resolved by comparer '{}')", comparer);
        }
        message.push('.');
        if !result.is_success() && !result.options().affirmative_check {
            message.push_str(" They were expected to differ.");
        }

        let _ = write!(message, "\nExpected: {}\nActual: {}", a, b);
        message
    }

    fn format_containment(&self, result: &ContainmentResult) -> String {
        let (container, value) = (self.render(result.container()), self.render(result.value()));
        let verb = if result.contains() {
            "did contain"
        } else {
            "did NOT contain"
        };

        let mut message = format!(
            "{} `{}` {} `{}`.",
            prefix(result.success()),
            container,
            verb,
            value
        );
        let _ = write!(message, "\nSearched In: {}\nSearched For: {}", container, value);
        message
    }

    fn format_predicate(&self, result: &PredicateResult) -> String {
        let value = self.render(result.value());
        let verb = if result.return_value().is_truthy() {
            "did satisfy"
        } else {
            "did NOT satisfy"
        };
        let name = match result.predicate() {
            Value::Function(f) => f.name().to_string(),
            other => self.render(other),
        };

        let mut message = format!(
            "{} `{}` {} predicate `{}` (returned `{}`).",
            prefix(result.success()),
            value,
            verb,
            name,
            self.render(result.return_value())
        );
        let _ = write!(
            message,
            "\nExecuted: {}\nWith: {}",
            self.render(result.predicate()),
            value
        );
        message
    }
}

fn find_divergence<'r>(
    result: &'r ValueCompareResult,
    node: &'r ValueComparison,
    visited: &mut HashSet<(usize, usize)>,
) -> Option<&'r ValueComparison> {
    if node.success() {
        return None;
    }
    if !node.has_children() || !result.options().ignore_references {
        return Some(node);
    }
    if let (Some(x), Some(y)) = (node.a().identity(), node.b().identity()) {
        if !visited.insert((x, y)) {
            return None;
        }
    }

    result
        .children(node)
        .find_map(|child| find_divergence(result, child, visited))
        .or(Some(node))
}

fn prefix(success: bool) -> &'static str {
    if success {
        PASSED
    } else {
        FAILED
    }
}

fn relation(compare_type: CompareType, equal: bool) -> &'static str {
    match (compare_type, equal) {
        (CompareType::Equivalency, true) => "was equivalent to",
        (CompareType::Equivalency, false) => "was NOT equivalent to",
        (CompareType::Roughly, true) => "was roughly equal to",
        (CompareType::Roughly, false) => "was NOT roughly equal to",
        (_, true) => "did equal",
        (_, false) => "did NOT equal",
    }
}

/// Truncate to at most `max_len` characters, marking the cut with `...`.
fn truncate(s: &str, max_len: usize) -> String {
    match s.char_indices().nth(max_len) {
        Some((index, _)) => format!("{}...", &s[..index]),
        None => s.to_string(),
    }
}
