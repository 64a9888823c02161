//! Per-call comparison state.

use deepcheck_values::Value;
use std::rc::Rc;

use crate::comparer::EqualityComparer;
use crate::options::ComparisonOptions;
use crate::registry::ComparerRegistry;
use crate::result::{ComparisonId, ValueCompareResult, ValueComparison};

/// Identities of a pair of references currently being descended into.
pub(crate) type GuardPair = (usize, usize);

/// State for one top-level comparison.
///
/// Holds the options, the root values for path reporting, the circular-reference
/// guard stack, the comparers that may override a verdict, and the comparison
/// tree under construction.
pub(crate) struct ComparisonContext<'a> {
    options: &'a ComparisonOptions,
    root_a: Value,
    root_b: Value,
    guard: Vec<GuardPair>,
    comparers: Vec<Rc<EqualityComparer>>,
    nodes: Vec<ValueComparison>,
}

impl<'a> ComparisonContext<'a> {
    pub(crate) fn new(
        a: &Value,
        b: &Value,
        options: &'a ComparisonOptions,
        registry: &ComparerRegistry,
    ) -> Self {
        let comparers = registry
            .iter()
            .chain(options.equality_comparers.iter())
            .cloned()
            .collect();

        Self {
            options,
            root_a: a.clone(),
            root_b: b.clone(),
            guard: Vec::new(),
            comparers,
            nodes: Vec::new(),
        }
    }

    pub(crate) fn options(&self) -> &'a ComparisonOptions {
        self.options
    }

    pub(crate) fn root_a(&self) -> &Value {
        &self.root_a
    }

    pub(crate) fn root_b(&self) -> &Value {
        &self.root_b
    }

    /// Whether no pair is being descended into, i.e. the next comparison is a root.
    pub(crate) fn is_top_level(&self) -> bool {
        self.guard.is_empty()
    }

    pub(crate) fn is_guarded(&self, pair: GuardPair) -> bool {
        self.guard.contains(&pair)
    }

    /// Mark a pair as being descended into. Every call must be matched by [`Self::leave`].
    pub(crate) fn enter(&mut self, pair: GuardPair) {
        debug_assert!(!self.is_guarded(pair));
        self.guard.push(pair);
    }

    pub(crate) fn leave(&mut self) {
        self.guard.pop();
    }

    #[cfg(test)]
    pub(crate) fn guard_depth(&self) -> usize {
        self.guard.len()
    }

    /// Comparers whose filters accept the pair, in consultation order.
    pub(crate) fn applicable_comparers(&self, a: &Value, b: &Value) -> Vec<Rc<EqualityComparer>> {
        self.comparers
            .iter()
            .filter(|c| c.applies_to(a, b))
            .cloned()
            .collect()
    }

    /// Record a new, not yet decided comparison.
    pub(crate) fn open(
        &mut self,
        a: &Value,
        b: &Value,
        key: Option<String>,
        parent: Option<ComparisonId>,
    ) -> ComparisonId {
        let parent_path = parent.and_then(|p| self.nodes[p].path.as_deref());
        let path = match (parent_path, key.as_deref()) {
            (Some(prefix), Some(key)) => Some(format!("{}.{}", prefix, key)),
            (None, Some(key)) => Some(key.to_string()),
            (prefix, None) => prefix.map(str::to_string),
        };

        self.push(a, b, key, path, parent)
    }

    /// Record a comparison outside the tree, reported at `path`. Used for trial
    /// comparisons that are rolled back afterwards.
    pub(crate) fn open_detached(
        &mut self,
        a: &Value,
        b: &Value,
        path: Option<String>,
    ) -> ComparisonId {
        self.push(a, b, None, path, None)
    }

    fn push(
        &mut self,
        a: &Value,
        b: &Value,
        key: Option<String>,
        path: Option<String>,
        parent: Option<ComparisonId>,
    ) -> ComparisonId {
        let id = self.nodes.len();
        self.nodes.push(ValueComparison {
            id,
            a: a.clone(),
            b: b.clone(),
            a_kind: a.kind(),
            b_kind: b.kind(),
            key,
            path,
            parent,
            children: Vec::new(),
            values_equal: false,
            success: false,
            resolved_by: None,
        });
        id
    }

    /// Record the verdict of a comparison and link it under its parent.
    pub(crate) fn close(
        &mut self,
        id: ComparisonId,
        values_equal: bool,
        resolved_by: Option<String>,
    ) {
        let affirmative = self.options.affirmative_check;
        let node = &mut self.nodes[id];
        node.values_equal = values_equal;
        node.success = values_equal == affirmative;
        node.resolved_by = resolved_by;

        let parent = node.parent;
        if let Some(parent) = parent {
            self.nodes[parent].children.push(id);
        }
    }

    pub(crate) fn node(&self, id: ComparisonId) -> &ValueComparison {
        &self.nodes[id]
    }

    /// Position to roll back to after a trial comparison.
    pub(crate) fn mark(&self) -> usize {
        self.nodes.len()
    }

    /// Discard every comparison recorded since `mark`.
    pub(crate) fn rollback(&mut self, mark: usize) {
        self.nodes.truncate(mark);
    }

    pub(crate) fn into_result(self) -> ValueCompareResult {
        ValueCompareResult {
            nodes: self.nodes,
            options: self.options.clone(),
        }
    }
}
