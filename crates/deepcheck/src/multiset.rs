//! Order-insensitive array comparison.
//!
//! Primitives are counted by an equivalency key and must occur equally often in
//! both arrays. References are keyed by identity through a side table owned by
//! the call; references without an identical counterpart are then matched
//! structurally, each counterpart at most once.

use deepcheck_values::{format_number, Value};
use indexmap::{IndexMap, IndexSet};
use std::collections::HashMap;

use crate::compare::Engine;
use crate::error::CompareResult;
use crate::options::ComparisonOptions;

const UNDEFINED_KEY: &str = "\u{0}undefined";
const NULL_KEY: &str = "\u{0}null";

/// Canonical bucket for an array element.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) enum EquivalencyKey {
    Value(String),
    Reference(usize),
}

/// Maps reference identities to dense keys for the duration of one comparison.
#[derive(Debug, Default)]
struct IdentityTable {
    keys: HashMap<usize, usize>,
}

impl IdentityTable {
    fn key_for(&mut self, identity: usize) -> EquivalencyKey {
        let next = self.keys.len();
        EquivalencyKey::Reference(*self.keys.entry(identity).or_insert(next))
    }
}

fn equivalency_key(
    value: &Value,
    options: &ComparisonOptions,
    table: &mut IdentityTable,
) -> EquivalencyKey {
    let strict = options.strict_equals;
    let key = match value {
        Value::Undefined if strict && !options.null_check_only => UNDEFINED_KEY.to_string(),
        Value::Undefined | Value::Null => NULL_KEY.to_string(),
        Value::Bool(b) if strict => format!("boolean:{}", b),
        Value::Bool(b) => format_number(if *b { 1.0 } else { 0.0 }),
        Value::Number(n) if strict => format!("number:{}", format_number(*n)),
        Value::Number(n) => format_number(*n),
        Value::BigInt(n) if strict => format!("bigint:{}", n),
        Value::BigInt(n) => n.to_string(),
        Value::String(s) => {
            let folded = if options.ignore_case {
                s.to_lowercase()
            } else {
                s.to_string()
            };
            if strict {
                format!("string:{}", folded)
            } else {
                folded
            }
        }
        reference => match reference.identity() {
            Some(identity) => return table.key_for(identity),
            None => format!("{:?}", reference),
        },
    };
    EquivalencyKey::Value(key)
}

fn histogram(
    items: &[Value],
    options: &ComparisonOptions,
    table: &mut IdentityTable,
) -> IndexMap<EquivalencyKey, Vec<Value>> {
    let mut buckets: IndexMap<EquivalencyKey, Vec<Value>> = IndexMap::new();
    for item in items {
        buckets
            .entry(equivalency_key(item, options, table))
            .or_default()
            .push(item.clone());
    }
    buckets
}

/// Compare two arrays of equal length as multisets.
///
/// `path` is where the arrays sit; reference elements are matched up by trial
/// comparisons reported at that path.
pub(crate) fn multiset_equal(
    engine: &mut Engine<'_>,
    a: &[Value],
    b: &[Value],
    path: Option<&str>,
) -> CompareResult<bool> {
    let options = engine.options();
    let mut table = IdentityTable::default();
    let buckets_a = histogram(a, options, &mut table);
    let buckets_b = histogram(b, options, &mut table);

    let mut pool_a = Vec::new();
    let mut pool_b = Vec::new();
    let keys: IndexSet<&EquivalencyKey> = buckets_a.keys().chain(buckets_b.keys()).collect();
    for key in keys {
        let left = buckets_a.get(key).map(Vec::as_slice).unwrap_or_default();
        let right = buckets_b.get(key).map(Vec::as_slice).unwrap_or_default();
        match key {
            EquivalencyKey::Value(_) => {
                if left.len() != right.len() {
                    return Ok(false);
                }
            }
            EquivalencyKey::Reference(_) => {
                let common = left.len().min(right.len());
                pool_a.extend_from_slice(&left[common..]);
                pool_b.extend_from_slice(&right[common..]);
            }
        }
    }

    reconcile(engine, &pool_a, &pool_b, path)
}

/// Match every element of `pool_a` with a distinct, structurally equal element of `pool_b`.
fn reconcile(
    engine: &mut Engine<'_>,
    pool_a: &[Value],
    pool_b: &[Value],
    path: Option<&str>,
) -> CompareResult<bool> {
    if pool_a.len() != pool_b.len() {
        return Ok(false);
    }

    let mut used = vec![false; pool_b.len()];
    for x in pool_a {
        let mut matched = false;
        for (index, y) in pool_b.iter().enumerate() {
            if used[index] {
                continue;
            }
            if engine.trial(x, y, path)? {
                used[index] = true;
                matched = true;
                break;
            }
        }
        if !matched {
            return Ok(false);
        }
    }

    Ok(true)
}
