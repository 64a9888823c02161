//! Comparison results.
//!
//! Results are built once by the engine and only read afterwards; every field is
//! exposed through accessors.

use deepcheck_values::{Value, ValueKind};
use serde::Serialize;

use crate::options::{CompareType, ComparisonOptions};

/// Index of a [`ValueComparison`] inside its [`ValueCompareResult`].
pub type ComparisonId = usize;

/// Discriminant of a [`ComparisonResult`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ResultType {
    ValueComparison,
    Containment,
    Predicate,
}

/// The outcome of a comparison of any type.
#[derive(Debug)]
pub enum ComparisonResult {
    Value(ValueCompareResult),
    Containment(ContainmentResult),
    Predicate(PredicateResult),
}

impl ComparisonResult {
    pub fn result_type(&self) -> ResultType {
        match self {
            ComparisonResult::Value(_) => ResultType::ValueComparison,
            ComparisonResult::Containment(_) => ResultType::Containment,
            ComparisonResult::Predicate(_) => ResultType::Predicate,
        }
    }

    pub fn is_success(&self) -> bool {
        match self {
            ComparisonResult::Value(r) => r.is_success(),
            ComparisonResult::Containment(r) => r.success,
            ComparisonResult::Predicate(r) => r.success,
        }
    }

    pub fn as_value(&self) -> Option<&ValueCompareResult> {
        match self {
            ComparisonResult::Value(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_containment(&self) -> Option<&ContainmentResult> {
        match self {
            ComparisonResult::Containment(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_predicate(&self) -> Option<&PredicateResult> {
        match self {
            ComparisonResult::Predicate(r) => Some(r),
            _ => None,
        }
    }
}

/// One node of a structural comparison tree.
#[derive(Debug, Clone)]
pub struct ValueComparison {
    pub(crate) id: ComparisonId,
    pub(crate) a: Value,
    pub(crate) b: Value,
    pub(crate) a_kind: ValueKind,
    pub(crate) b_kind: ValueKind,
    pub(crate) key: Option<String>,
    pub(crate) path: Option<String>,
    pub(crate) parent: Option<ComparisonId>,
    pub(crate) children: Vec<ComparisonId>,
    pub(crate) values_equal: bool,
    pub(crate) success: bool,
    pub(crate) resolved_by: Option<String>,
}

impl ValueComparison {
    pub fn id(&self) -> ComparisonId {
        self.id
    }

    pub fn a(&self) -> &Value {
        &self.a
    }

    pub fn b(&self) -> &Value {
        &self.b
    }

    pub fn a_kind(&self) -> ValueKind {
        self.a_kind
    }

    pub fn b_kind(&self) -> ValueKind {
        self.b_kind
    }

    /// Property name or array index within the parent, `None` for the root.
    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    /// Dotted path from the root, e.g. `b.c` or `items.2.id`.
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    pub fn parent(&self) -> Option<ComparisonId> {
        self.parent
    }

    pub fn child_ids(&self) -> &[ComparisonId] {
        &self.children
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// The raw structural verdict, before the affirmative check is applied.
    pub fn values_equal(&self) -> bool {
        self.values_equal
    }

    pub fn success(&self) -> bool {
        self.success
    }

    /// Name of the custom comparer that declared the values equal, if any.
    pub fn resolved_by(&self) -> Option<&str> {
        self.resolved_by.as_deref()
    }
}

/// A structural comparison tree rooted at the top-level pair.
#[derive(Debug)]
pub struct ValueCompareResult {
    pub(crate) nodes: Vec<ValueComparison>,
    pub(crate) options: ComparisonOptions,
}

impl ValueCompareResult {
    pub fn root(&self) -> &ValueComparison {
        &self.nodes[0]
    }

    pub fn get(&self, id: ComparisonId) -> Option<&ValueComparison> {
        self.nodes.get(id)
    }

    pub fn children<'s>(
        &'s self,
        node: &'s ValueComparison,
    ) -> impl Iterator<Item = &'s ValueComparison> {
        node.children.iter().filter_map(move |id| self.nodes.get(*id))
    }

    pub fn parent(&self, node: &ValueComparison) -> Option<&ValueComparison> {
        node.parent.and_then(|id| self.nodes.get(id))
    }

    /// Find the comparison recorded at `path`.
    pub fn find_path(&self, path: &str) -> Option<&ValueComparison> {
        self.nodes.iter().find(|n| n.path.as_deref() == Some(path))
    }

    /// Total number of recorded comparisons, root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn options(&self) -> &ComparisonOptions {
        &self.options
    }

    pub fn compare_type(&self) -> CompareType {
        self.options.compare_type
    }

    pub fn values_equal(&self) -> bool {
        self.root().values_equal
    }

    pub fn is_success(&self) -> bool {
        self.root().success
    }
}

/// Outcome of a containment check.
#[derive(Debug, Clone)]
pub struct ContainmentResult {
    pub(crate) container: Value,
    pub(crate) value: Value,
    pub(crate) contains: bool,
    pub(crate) affirmative_check: bool,
    pub(crate) success: bool,
}

impl ContainmentResult {
    pub fn container(&self) -> &Value {
        &self.container
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn contains(&self) -> bool {
        self.contains
    }

    pub fn affirmative_check(&self) -> bool {
        self.affirmative_check
    }

    pub fn success(&self) -> bool {
        self.success
    }
}

/// Outcome of a predicate check.
#[derive(Debug, Clone)]
pub struct PredicateResult {
    pub(crate) predicate: Value,
    pub(crate) value: Value,
    pub(crate) return_value: Value,
    pub(crate) affirmative_check: bool,
    pub(crate) success: bool,
}

impl PredicateResult {
    pub fn predicate(&self) -> &Value {
        &self.predicate
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn return_value(&self) -> &Value {
        &self.return_value
    }

    pub fn affirmative_check(&self) -> bool {
        self.affirmative_check
    }

    pub fn success(&self) -> bool {
        self.success
    }
}
