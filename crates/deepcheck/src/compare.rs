//! Structural value comparison.

use deepcheck_values::{ObjectRef, Value};
use indexmap::IndexSet;

use crate::comparer::ComparerContext;
use crate::context::ComparisonContext;
use crate::error::{CompareError, CompareResult};
use crate::multiset::multiset_equal;
use crate::options::{CompareType, ComparisonOptions, CyclePolicy};
use crate::registry::ComparerRegistry;
use crate::result::{
    ComparisonId, ComparisonResult, ContainmentResult, PredicateResult, ValueCompareResult,
};

/// Compare two values.
///
/// # Arguments
/// * `a` - The expected value, or the container for containment checks
/// * `b` - The actual value, the searched-for value, or the predicate
/// * `options` - Fully resolved comparison options
/// * `registry` - Custom comparers consulted before the per-call ones
///
/// # Returns
/// The comparison result, whose shape depends on `options.compare_type`.
/// Fails with a usage error for malformed input or when a custom comparer or
/// predicate fails.
pub fn compare(
    a: &Value,
    b: &Value,
    options: &ComparisonOptions,
    registry: &ComparerRegistry,
) -> CompareResult<ComparisonResult> {
    log::trace!("Comparing {:?} and {:?} by {}", a, b, options.compare_type);

    match options.compare_type {
        CompareType::Equality | CompareType::Equivalency | CompareType::Roughly => {
            compare_structure(a, b, options, registry).map(ComparisonResult::Value)
        }
        CompareType::Containment => {
            containment(a, b, options, registry).map(ComparisonResult::Containment)
        }
        CompareType::Predicate => predicate(a, b, options).map(ComparisonResult::Predicate),
    }
}

/// Compare two values using only the built-in comparers.
pub fn compare_standard(
    a: &Value,
    b: &Value,
    options: &ComparisonOptions,
) -> CompareResult<ComparisonResult> {
    compare(a, b, options, &ComparerRegistry::standard())
}

/// Build the full comparison tree for `a` and `b`, regardless of
/// `options.compare_type`.
pub fn compare_structure(
    a: &Value,
    b: &Value,
    options: &ComparisonOptions,
    registry: &ComparerRegistry,
) -> CompareResult<ValueCompareResult> {
    let mut engine = Engine::new(a, b, options, registry);
    engine.compare_values(a, b, None, None)?;
    Ok(engine.finish())
}

fn containment(
    a: &Value,
    b: &Value,
    options: &ComparisonOptions,
    registry: &ComparerRegistry,
) -> CompareResult<ContainmentResult> {
    let Some(items) = a.as_array() else {
        return Err(CompareError::ArrayExpected { kind: a.kind() });
    };

    // Elements are matched as an affirmative equality even for `does_not_contain`.
    let element_options = ComparisonOptions {
        affirmative_check: true,
        ..options.clone()
    };
    let mut engine = Engine::new(a, b, &element_options, registry);

    let mut contains = false;
    for (index, item) in items.items().iter().enumerate() {
        if engine.trial(item, b, Some(index.to_string().as_str()))? {
            contains = true;
            break;
        }
    }

    Ok(ContainmentResult {
        container: a.clone(),
        value: b.clone(),
        contains,
        affirmative_check: options.affirmative_check,
        success: contains == options.affirmative_check,
    })
}

fn predicate(a: &Value, b: &Value, options: &ComparisonOptions) -> CompareResult<PredicateResult> {
    let Some(function) = b.as_function() else {
        return Err(CompareError::FunctionExpected { kind: b.kind() });
    };

    let return_value = function
        .call(a)
        .map_err(|source| CompareError::Predicate {
            name: function.name().to_string(),
            source,
        })?;
    let passed = return_value.is_truthy();

    Ok(PredicateResult {
        predicate: b.clone(),
        value: a.clone(),
        return_value,
        affirmative_check: options.affirmative_check,
        success: passed == options.affirmative_check,
    })
}

/// The recursive comparison core. One engine serves one top-level call.
pub(crate) struct Engine<'a> {
    ctx: ComparisonContext<'a>,
}

impl<'a> Engine<'a> {
    fn new(
        a: &Value,
        b: &Value,
        options: &'a ComparisonOptions,
        registry: &ComparerRegistry,
    ) -> Self {
        Self {
            ctx: ComparisonContext::new(a, b, options, registry),
        }
    }

    pub(crate) fn options(&self) -> &'a ComparisonOptions {
        self.ctx.options()
    }

    fn finish(self) -> ValueCompareResult {
        self.ctx.into_result()
    }

    /// Compare a pair and record it in the tree, under `parent` if given.
    fn compare_values(
        &mut self,
        a: &Value,
        b: &Value,
        key: Option<String>,
        parent: Option<ComparisonId>,
    ) -> CompareResult<ComparisonId> {
        let id = self.ctx.open(a, b, key, parent);
        self.decide(id, a, b)?;
        Ok(id)
    }

    /// Work out the verdict for an opened comparison and close it.
    fn decide(&mut self, id: ComparisonId, a: &Value, b: &Value) -> CompareResult<()> {
        let options = self.options();
        let descend = a.is_container()
            && b.is_container()
            && (options.recursive || self.ctx.is_top_level());
        let mut values_equal = if descend {
            self.objects_equal(id, a, b)?
        } else {
            values_equal(a, b, options)
        };

        let mut resolved_by = None;
        if values_equal != options.affirmative_check {
            if let Some(name) = self.consult_comparers(id, a, b)? {
                values_equal = true;
                resolved_by = Some(name);
            }
        }

        self.ctx.close(id, values_equal, resolved_by);
        Ok(())
    }

    /// Compare a pair at `path` without keeping any of the recorded comparisons.
    pub(crate) fn trial(
        &mut self,
        a: &Value,
        b: &Value,
        path: Option<&str>,
    ) -> CompareResult<bool> {
        let mark = self.ctx.mark();
        let id = self.ctx.open_detached(a, b, path.map(str::to_string));
        self.decide(id, a, b)?;
        let equal = self.ctx.node(id).values_equal();
        self.ctx.rollback(mark);
        Ok(equal)
    }

    fn consult_comparers(
        &self,
        id: ComparisonId,
        a: &Value,
        b: &Value,
    ) -> CompareResult<Option<String>> {
        let comparers = self.ctx.applicable_comparers(a, b);
        if comparers.is_empty() {
            return Ok(None);
        }

        let node = self.ctx.node(id);
        let context = ComparerContext {
            a,
            b,
            key: node.key(),
            path: node.path(),
            options: self.options(),
            root_a: self.ctx.root_a(),
            root_b: self.ctx.root_b(),
        };

        for comparer in &comparers {
            let equal = comparer
                .equals(&context)
                .map_err(|source| CompareError::Comparer {
                    name: comparer.name().to_string(),
                    source,
                })?;
            if equal {
                log::debug!(
                    "Equality comparer '{}' resolved {}",
                    comparer.name(),
                    node.path().unwrap_or("<root>")
                );
                return Ok(Some(comparer.name().to_string()));
            }
        }

        Ok(None)
    }

    fn objects_equal(&mut self, id: ComparisonId, a: &Value, b: &Value) -> CompareResult<bool> {
        let options = self.options();
        if !options.ignore_references || a.same_reference(b) {
            return Ok(values_equal(a, b, options));
        }

        let (Some(id_a), Some(id_b)) = (a.identity(), b.identity()) else {
            return Ok(values_equal(a, b, options));
        };
        let pair = (id_a, id_b);
        if self.ctx.is_guarded(pair) {
            log::debug!(
                "Cyclic pair at {} resolved by {:?}",
                self.ctx.node(id).path().unwrap_or("<root>"),
                options.cycle_policy
            );
            return Ok(options.cycle_policy == CyclePolicy::AssumeEqual);
        }

        self.ctx.enter(pair);
        let outcome = match (a, b) {
            (Value::Array(x), Value::Array(y)) => self.arrays_equal(id, &x.items(), &y.items()),
            (Value::Object(x), Value::Object(y)) => self.properties_equal(id, x, y),
            _ => Ok(false),
        };
        self.ctx.leave();

        outcome
    }

    fn properties_equal(
        &mut self,
        id: ComparisonId,
        a: &ObjectRef,
        b: &ObjectRef,
    ) -> CompareResult<bool> {
        let mut keys: IndexSet<String> = a.keys().into_iter().collect();
        keys.extend(b.keys());

        let short_circuit = self.options().short_circuit;
        let mut equal = true;
        for key in keys {
            let x = a.get(&key).unwrap_or(Value::Undefined);
            let y = b.get(&key).unwrap_or(Value::Undefined);
            let child = self.compare_values(&x, &y, Some(key), Some(id))?;
            if !self.ctx.node(child).values_equal() {
                equal = false;
                if short_circuit {
                    break;
                }
            }
        }

        Ok(equal)
    }

    fn arrays_equal(&mut self, id: ComparisonId, a: &[Value], b: &[Value]) -> CompareResult<bool> {
        if a.len() != b.len() {
            return Ok(false);
        }
        if self.options().ignore_order {
            let path = self.ctx.node(id).path().map(str::to_string);
            return multiset_equal(self, a, b, path.as_deref());
        }

        let short_circuit = self.options().short_circuit;
        let mut equal = true;
        for (index, (x, y)) in a.iter().zip(b).enumerate() {
            let child = self.compare_values(x, y, Some(index.to_string()), Some(id))?;
            if !self.ctx.node(child).values_equal() {
                equal = false;
                if short_circuit {
                    break;
                }
            }
        }

        Ok(equal)
    }
}

/// Primitive comparison, or identity for references.
pub(crate) fn values_equal(a: &Value, b: &Value, options: &ComparisonOptions) -> bool {
    if a.same_reference(b) {
        return true;
    }

    let a = normalize(a, options);
    let b = normalize(b, options);
    if options.strict_equals {
        strict_equals(&a, &b)
    } else {
        loose_equals(&a, &b)
    }
}

fn normalize(value: &Value, options: &ComparisonOptions) -> Value {
    match value {
        Value::Undefined if options.null_check_only => Value::Null,
        Value::String(s) if options.ignore_case => Value::string(s.to_lowercase()),
        other => other.clone(),
    }
}

fn strict_equals(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::Number(x), Value::Number(y)) => x == y || (x.is_nan() && y.is_nan()),
        (Value::BigInt(x), Value::BigInt(y)) => x == y,
        (Value::String(x), Value::String(y)) => x == y,
        _ => a.same_reference(b),
    }
}

fn loose_equals(a: &Value, b: &Value) -> bool {
    if a.kind() == b.kind() {
        return strict_equals(a, b);
    }

    match (a, b) {
        (Value::Undefined | Value::Null, Value::Undefined | Value::Null) => true,
        (Value::Undefined | Value::Null, _) | (_, Value::Undefined | Value::Null) => false,
        (Value::Bool(x), other) => loose_equals(&Value::Number(bool_to_number(*x)), other),
        (other, Value::Bool(y)) => loose_equals(other, &Value::Number(bool_to_number(*y))),
        (Value::Number(n), Value::String(s)) | (Value::String(s), Value::Number(n)) => {
            *n == string_to_number(s)
        }
        (Value::BigInt(i), Value::Number(n)) | (Value::Number(n), Value::BigInt(i)) => {
            number_equals_bigint(*n, *i)
        }
        (Value::BigInt(i), Value::String(s)) | (Value::String(s), Value::BigInt(i)) => {
            s.trim().parse::<i128>().is_ok_and(|parsed| parsed == *i)
        }
        _ => false,
    }
}

/// Exact comparison of a number with a big integer, without rounding either.
fn number_equals_bigint(n: f64, i: i128) -> bool {
    // 2^127 as f64; every integral f64 below it in magnitude fits in an i128.
    const LIMIT: f64 = 170_141_183_460_469_231_731_687_303_715_884_105_728.0;
    n.is_finite() && n.fract() == 0.0 && n.abs() < LIMIT && n as i128 == i
}

fn bool_to_number(b: bool) -> f64 {
    if b {
        1.0
    } else {
        0.0
    }
}

/// Numeric reading of a string for loose comparison. Blank strings are zero.
fn string_to_number(s: &str) -> f64 {
    let trimmed = s.trim();
    match trimmed {
        "" => 0.0,
        "Infinity" | "+Infinity" => f64::INFINITY,
        "-Infinity" => f64::NEG_INFINITY,
        _ if trimmed.chars().any(|c| c.is_ascii_alphabetic() && c != 'e' && c != 'E') => f64::NAN,
        _ => trimmed.parse().unwrap_or(f64::NAN),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comparer::EqualityComparer;
    use crate::comparers::unicode_equivalence_comparer;
    use crate::options::AssertOptions;
    use deepcheck_values::ValueKind;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn options(compare_type: CompareType) -> ComparisonOptions {
        ComparisonOptions::for_type(compare_type)
    }

    fn structure(a: &Value, b: &Value, options: &ComparisonOptions) -> ValueCompareResult {
        compare_structure(a, b, options, &ComparerRegistry::new()).unwrap()
    }

    #[test]
    fn test_strict_primitives() {
        let opts = options(CompareType::Equality);
        assert!(values_equal(&Value::from(1), &Value::from(1.0), &opts));
        assert!(values_equal(&Value::from(f64::NAN), &Value::from(f64::NAN), &opts));
        assert!(values_equal(&Value::from(0.0), &Value::from(-0.0), &opts));
        assert!(!values_equal(&Value::from(1), &Value::from("1"), &opts));
        assert!(!values_equal(&Value::Null, &Value::Undefined, &opts));
        assert!(!values_equal(&Value::from("a"), &Value::from("A"), &opts));
    }

    #[test]
    fn test_loose_primitives() {
        let mut opts = options(CompareType::Equality);
        opts.strict_equals = false;
        assert!(values_equal(&Value::from(1), &Value::from("1"), &opts));
        assert!(values_equal(&Value::from(1), &Value::from(true), &opts));
        assert!(values_equal(&Value::from("0"), &Value::from(false), &opts));
        assert!(values_equal(&Value::from(""), &Value::from(0), &opts));
        assert!(values_equal(&Value::Null, &Value::Undefined, &opts));
        assert!(values_equal(&Value::bigint(5), &Value::from(5), &opts));
        assert!(values_equal(&Value::bigint(5), &Value::from("5"), &opts));
        assert!(!values_equal(&Value::Null, &Value::from(0), &opts));
        assert!(!values_equal(&Value::from("abc"), &Value::from(0), &opts));
        assert!(!values_equal(&Value::from("0x"), &Value::from(0), &opts));
    }

    #[test]
    fn test_loose_bigint_comparison_is_exact() {
        let mut opts = options(CompareType::Equality);
        opts.strict_equals = false;
        let above_f64_precision = Value::bigint(9_007_199_254_740_993);
        assert!(!values_equal(&above_f64_precision, &Value::from(9_007_199_254_740_992.0), &opts));
        assert!(values_equal(&Value::bigint(1 << 60), &Value::from(2f64.powi(60)), &opts));
        assert!(!values_equal(&Value::bigint(2), &Value::from(2.5), &opts));
        assert!(!values_equal(&Value::bigint(i128::MAX), &Value::from(f64::MAX), &opts));
    }

    #[test]
    fn test_null_check_only_and_ignore_case() {
        let mut opts = options(CompareType::Equality);
        opts.null_check_only = true;
        opts.ignore_case = true;
        assert!(values_equal(&Value::Undefined, &Value::Null, &opts));
        assert!(values_equal(&Value::from("Hello"), &Value::from("hELLO"), &opts));
    }

    #[test]
    fn test_identical_reference_has_no_children() {
        let obj = Value::object([("a", Value::from(1)), ("b", Value::array([Value::from(2)]))]);
        let result = structure(&obj, &obj, &options(CompareType::Equivalency));
        assert!(result.is_success());
        assert!(!result.root().has_children());
        assert_eq!(result.len(), 1);
    }

    #[test]
    fn test_equality_does_not_descend() {
        let a = Value::object([("a", Value::from(1))]);
        let b = Value::object([("a", Value::from(1))]);
        let result = structure(&a, &b, &options(CompareType::Equality));
        assert!(!result.values_equal());
        assert!(!result.root().has_children());
    }

    #[test]
    fn test_equivalency_records_paths() {
        let a = Value::object([
            ("a", Value::from(1)),
            ("b", Value::object([("c", Value::from(2))])),
        ]);
        let b = Value::object([
            ("a", Value::from(1)),
            ("b", Value::object([("c", Value::from(3))])),
        ]);
        let result = structure(&a, &b, &options(CompareType::Equivalency));
        assert!(!result.is_success());

        let leaf = result.find_path("b.c").unwrap();
        assert_eq!(leaf.key(), Some("c"));
        assert_eq!(leaf.a().as_f64(), Some(2.0));
        assert_eq!(leaf.b().as_f64(), Some(3.0));
        assert!(!leaf.values_equal());
        assert!(result.find_path("a").unwrap().values_equal());
    }

    #[test]
    fn test_missing_keys_compare_against_undefined() {
        let a = Value::object([("a", Value::from(1))]);
        let b = Value::object([("a", Value::from(1)), ("extra", Value::Null)]);
        let result = structure(&a, &b, &options(CompareType::Equivalency));
        assert!(!result.values_equal());
        assert_eq!(result.find_path("extra").unwrap().a_kind(), ValueKind::Undefined);
    }

    #[test]
    fn test_array_against_object_is_unequal() {
        let a = Value::array([Value::from(1)]);
        let b = Value::object([("0", Value::from(1))]);
        let result = structure(&a, &b, &options(CompareType::Equivalency));
        assert!(!result.values_equal());
    }

    #[test]
    fn test_array_length_mismatch() {
        let a = Value::array([Value::from(1), Value::from(2)]);
        let b = Value::array([Value::from(1)]);
        assert!(!structure(&a, &b, &options(CompareType::Equivalency)).values_equal());
    }

    #[test]
    fn test_short_circuit_stops_at_first_mismatch() {
        let a = Value::object([
            ("x", Value::from(1)),
            ("y", Value::from(2)),
            ("z", Value::from(3)),
        ]);
        let b = Value::object([
            ("x", Value::from(9)),
            ("y", Value::from(9)),
            ("z", Value::from(3)),
        ]);

        let mut opts = options(CompareType::Equivalency);
        opts.short_circuit = true;
        let result = structure(&a, &b, &opts);
        assert_eq!(result.root().child_ids().len(), 1);

        opts.short_circuit = false;
        let result = structure(&a, &b, &opts);
        let mismatches = result
            .children(result.root())
            .filter(|c| !c.values_equal())
            .count();
        assert_eq!(result.root().child_ids().len(), 3);
        assert_eq!(mismatches, 2);
    }

    #[test]
    fn test_non_recursive_compares_nested_by_identity() {
        let shared = Value::object([("c", Value::from(1))]);
        let a = Value::object([("b", shared.clone())]);
        let b = Value::object([("b", shared)]);
        let c = Value::object([("b", Value::object([("c", Value::from(1))]))]);

        let mut opts = options(CompareType::Equivalency);
        opts.recursive = false;
        assert!(structure(&a, &b, &opts).values_equal());
        assert!(!structure(&a, &c, &opts).values_equal());
    }

    #[test]
    fn test_cycles_follow_policy() {
        let make = || {
            let value = Value::object([("a", Value::from(1))]);
            if let Value::Object(obj) = &value {
                obj.insert("self", value.clone());
            }
            value
        };
        let a = make();
        let b = make();

        let mut opts = options(CompareType::Equivalency);
        let result = structure(&a, &b, &opts);
        assert!(result.values_equal());
        assert!(result.find_path("self").unwrap().values_equal());

        opts.cycle_policy = CyclePolicy::AssumeUnequal;
        assert!(!structure(&a, &b, &opts).values_equal());
    }

    #[test]
    fn test_shared_pair_is_revisited_by_siblings() {
        // The same pair of shared objects appears under two siblings; the second
        // visit must descend again rather than hit a stale guard entry.
        let shared_a = Value::object([("v", Value::from(1)), ("w", Value::from(2))]);
        let shared_b = Value::object([("v", Value::from(1)), ("w", Value::from(3))]);
        let a = Value::array([shared_a.clone(), shared_a]);
        let b = Value::array([shared_b.clone(), shared_b]);

        let mut opts = options(CompareType::Equivalency);
        opts.short_circuit = false;
        let result = structure(&a, &b, &opts);
        assert!(!result.find_path("0").unwrap().values_equal());
        assert!(!result.find_path("1").unwrap().values_equal());
        assert!(result.find_path("1.w").is_some());
    }

    #[test]
    fn test_guard_is_released_after_short_circuit() {
        let shared_a = Value::object([("v", Value::from(1)), ("w", Value::from(2))]);
        let shared_b = Value::object([("v", Value::from(1)), ("w", Value::from(3))]);
        let a = Value::object([("x", shared_a.clone()), ("y", shared_a)]);
        let b = Value::object([("x", shared_b.clone()), ("y", shared_b)]);

        let mut registry = ComparerRegistry::new();
        registry
            .register(EqualityComparer::new("only-x", |ctx| Ok(ctx.path == Some("x"))))
            .unwrap();
        let mut opts = options(CompareType::Equivalency);
        opts.short_circuit = true;
        let result = compare_structure(&a, &b, &opts, &registry).unwrap();

        let x = result.find_path("x").unwrap();
        assert!(x.values_equal());
        assert_eq!(x.resolved_by(), Some("only-x"));
        assert_eq!(result.children(x).count(), 2);

        assert!(!result.find_path("y").unwrap().values_equal());
        assert!(!result.find_path("y.w").unwrap().values_equal());
        assert!(!result.values_equal());
    }

    #[test]
    fn test_trial_comparisons_see_enclosing_path() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let recorder = {
            let seen = Rc::clone(&seen);
            EqualityComparer::new("recorder", move |ctx| {
                seen.borrow_mut().push(ctx.path.unwrap_or_default().to_string());
                Ok(false)
            })
        };
        let mut registry = ComparerRegistry::new();
        registry.register(recorder).unwrap();

        let item = |id: i32| Value::object([("id", Value::from(id))]);
        let a = Value::object([("items", Value::array([item(1), item(2)]))]);
        let b = Value::object([("items", Value::array([item(2), item(1)]))]);
        let opts = options(CompareType::Roughly);
        assert!(compare_structure(&a, &b, &opts, &registry).unwrap().values_equal());
        assert!(seen.borrow().contains(&"items.id".to_string()));
        assert!(seen.borrow().iter().all(|path| path.starts_with("items")));

        seen.borrow_mut().clear();
        let haystack = Value::array([item(1), item(2)]);
        let opts = options(CompareType::Containment);
        assert!(compare(&haystack, &item(2), &opts, &registry).unwrap().is_success());
        assert_eq!(*seen.borrow(), vec!["0.id".to_string(), "0".to_string()]);
    }

    #[test]
    fn test_roughly_ignores_order() {
        let a = Value::array([Value::from(1), Value::from(2), Value::from(2), Value::from("x")]);
        let b = Value::array([Value::from("x"), Value::from(2), Value::from(1), Value::from(2)]);
        assert!(structure(&a, &b, &options(CompareType::Roughly)).values_equal());
        assert!(!structure(&a, &b, &options(CompareType::Equivalency)).values_equal());
    }

    #[test]
    fn test_custom_comparer_resolves_mismatch() {
        let a = Value::object([("name", Value::from("caf\u{e9}"))]);
        let b = Value::object([("name", Value::from("cafe\u{301}"))]);
        let opts = options(CompareType::Equivalency);
        assert!(!structure(&a, &b, &opts).values_equal());

        let mut registry = ComparerRegistry::new();
        registry.register(unicode_equivalence_comparer()).unwrap();
        let result = compare_structure(&a, &b, &opts, &registry).unwrap();
        assert!(result.is_success());
        assert_eq!(
            result.find_path("name").unwrap().resolved_by(),
            Some("unicode-equivalence")
        );
    }

    #[test]
    fn test_comparer_errors_propagate() {
        let opts = AssertOptions::new()
            .compare_type(CompareType::Equality)
            .with_comparer(EqualityComparer::new("broken", |_| anyhow::bail!("boom")))
            .resolve()
            .unwrap();
        let registry = ComparerRegistry::new();
        let err =
            compare_structure(&Value::from(1), &Value::from(2), &opts, &registry).unwrap_err();
        assert!(matches!(err, CompareError::Comparer { ref name, .. } if name == "broken"));
    }

    #[test]
    fn test_containment() {
        let registry = ComparerRegistry::new();
        let haystack = Value::array([Value::from(1), Value::object([("id", Value::from(2))])]);
        let opts = options(CompareType::Containment);

        let needle = Value::object([("id", Value::from(2))]);
        let found = compare(&haystack, &needle, &opts, &registry).unwrap();
        assert!(found.is_success());
        assert!(found.as_containment().unwrap().contains());

        let negated = opts.clone().negated();
        let missing = compare(&haystack, &Value::from(5), &negated, &registry).unwrap();
        assert!(missing.is_success());
        assert!(!missing.as_containment().unwrap().contains());

        let err =
            compare(&Value::from("not an array"), &Value::from(1), &opts, &registry).unwrap_err();
        assert!(matches!(err, CompareError::ArrayExpected { kind: ValueKind::String }));
    }

    #[test]
    fn test_predicate() {
        let registry = ComparerRegistry::new();
        let opts = options(CompareType::Predicate);
        let positive = Value::function("isPositive", |v| {
            Ok(Value::from(v.as_f64().is_some_and(|n| n > 0.0)))
        });

        let result = compare(&Value::from(3), &positive, &opts, &registry).unwrap();
        assert!(result.is_success());
        assert_eq!(result.as_predicate().unwrap().return_value().as_bool(), Some(true));

        let negated = opts.clone().negated();
        let result = compare(&Value::from(-3), &positive, &negated, &registry).unwrap();
        assert!(result.is_success());

        let err = compare(&Value::from(3), &Value::from(1), &opts, &registry).unwrap_err();
        assert!(matches!(err, CompareError::FunctionExpected { kind: ValueKind::Number }));

        let failing = Value::function("failing", |_| anyhow::bail!("nope"));
        let err = compare(&Value::from(3), &failing, &opts, &registry).unwrap_err();
        assert!(matches!(err, CompareError::Predicate { ref name, .. } if name == "failing"));
    }

    #[test]
    fn test_functions_compare_by_identity() {
        let f = Value::function("f", |_| Ok(Value::Undefined));
        let g = Value::function("f", |_| Ok(Value::Undefined));
        let opts = options(CompareType::Roughly);
        assert!(structure(&f, &f, &opts).values_equal());
        assert!(!structure(&f, &g, &opts).values_equal());
    }
}
