//! Comparison options and their per-call overrides.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

use crate::comparer::EqualityComparer;
use crate::error::{CompareError, CompareResult};

/// The kind of comparison to perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompareType {
    /// Strict, ordered, reference-sensitive.
    Equality,
    /// Structural but order-sensitive.
    Equivalency,
    /// Structural, order-insensitive, loose primitives.
    Roughly,
    /// Membership of a value in an array.
    Containment,
    /// A predicate function applied to the value.
    Predicate,
}

impl CompareType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Equality => "equality",
            Self::Equivalency => "equivalency",
            Self::Roughly => "roughly",
            Self::Containment => "containment",
            Self::Predicate => "predicate",
        }
    }
}

impl FromStr for CompareType {
    type Err = CompareError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "equality" => Ok(Self::Equality),
            "equivalency" => Ok(Self::Equivalency),
            "roughly" => Ok(Self::Roughly),
            "containment" => Ok(Self::Containment),
            "predicate" => Ok(Self::Predicate),
            _ => Err(CompareError::InvalidCompareType(s.to_string())),
        }
    }
}

impl fmt::Display for CompareType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What to conclude when a pair of references is met again while it is still
/// being compared further up the stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CyclePolicy {
    /// Treat the repeated pair as equal and stop descending.
    #[default]
    AssumeEqual,
    /// Treat the repeated pair as unequal.
    AssumeUnequal,
}

/// Fully resolved options for a single comparison.
#[derive(Debug, Clone)]
pub struct ComparisonOptions {
    pub compare_type: CompareType,
    pub affirmative_check: bool,
    pub strict_equals: bool,
    pub null_check_only: bool,
    pub ignore_case: bool,
    pub ignore_references: bool,
    pub ignore_order: bool,
    pub recursive: bool,
    pub short_circuit: bool,
    pub cycle_policy: CyclePolicy,
    /// Extra comparers consulted after the registry's, for this call only.
    pub equality_comparers: Vec<Rc<EqualityComparer>>,
}

impl ComparisonOptions {
    /// Default options for the given comparison type.
    pub fn for_type(compare_type: CompareType) -> Self {
        let (strict_equals, ignore_references, ignore_order) = match compare_type {
            CompareType::Equality | CompareType::Predicate => (true, false, false),
            CompareType::Equivalency | CompareType::Containment => (true, true, false),
            CompareType::Roughly => (false, true, true),
        };

        Self {
            compare_type,
            affirmative_check: true,
            strict_equals,
            null_check_only: false,
            ignore_case: false,
            ignore_references,
            ignore_order,
            recursive: true,
            short_circuit: false,
            cycle_policy: CyclePolicy::default(),
            equality_comparers: Vec::new(),
        }
    }

    /// The same options asserting the opposite outcome.
    pub fn negated(mut self) -> Self {
        self.affirmative_check = !self.affirmative_check;
        self
    }
}

impl Default for ComparisonOptions {
    fn default() -> Self {
        Self::for_type(CompareType::Equality)
    }
}

/// A partial set of options.
///
/// Used for per-call options, per-assertion defaults and verb requirements.
/// Unset fields fall through to the next layer when merged with [`AssertOptions::or`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AssertOptions {
    pub compare_type: Option<CompareType>,
    pub affirmative_check: Option<bool>,
    pub strict_equals: Option<bool>,
    pub null_check_only: Option<bool>,
    pub ignore_case: Option<bool>,
    pub ignore_references: Option<bool>,
    pub ignore_order: Option<bool>,
    pub recursive: Option<bool>,
    pub short_circuit: Option<bool>,
    pub cycle_policy: Option<CyclePolicy>,
    pub throw_on_failure: Option<bool>,
    pub log_on_success: Option<bool>,
    #[serde(skip)]
    pub equality_comparers: Vec<Rc<EqualityComparer>>,
}

impl AssertOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse options from a camelCase JSON document.
    pub fn from_json(json: &str) -> CompareResult<Self> {
        serde_json::from_str(json).map_err(|e| CompareError::InvalidOptions(e.to_string()))
    }

    pub fn compare_type(mut self, compare_type: CompareType) -> Self {
        self.compare_type = Some(compare_type);
        self
    }

    pub fn affirmative_check(mut self, value: bool) -> Self {
        self.affirmative_check = Some(value);
        self
    }

    pub fn strict_equals(mut self, value: bool) -> Self {
        self.strict_equals = Some(value);
        self
    }

    pub fn null_check_only(mut self, value: bool) -> Self {
        self.null_check_only = Some(value);
        self
    }

    pub fn ignore_case(mut self, value: bool) -> Self {
        self.ignore_case = Some(value);
        self
    }

    pub fn ignore_references(mut self, value: bool) -> Self {
        self.ignore_references = Some(value);
        self
    }

    pub fn ignore_order(mut self, value: bool) -> Self {
        self.ignore_order = Some(value);
        self
    }

    pub fn recursive(mut self, value: bool) -> Self {
        self.recursive = Some(value);
        self
    }

    pub fn short_circuit(mut self, value: bool) -> Self {
        self.short_circuit = Some(value);
        self
    }

    pub fn cycle_policy(mut self, policy: CyclePolicy) -> Self {
        self.cycle_policy = Some(policy);
        self
    }

    pub fn throw_on_failure(mut self, value: bool) -> Self {
        self.throw_on_failure = Some(value);
        self
    }

    pub fn log_on_success(mut self, value: bool) -> Self {
        self.log_on_success = Some(value);
        self
    }

    pub fn with_comparer(mut self, comparer: EqualityComparer) -> Self {
        self.equality_comparers.push(Rc::new(comparer));
        self
    }

    /// Fill every unset field from `fallback`. Comparers from both layers are
    /// kept, this layer's first.
    pub fn or(mut self, fallback: &AssertOptions) -> Self {
        self.compare_type = self.compare_type.or(fallback.compare_type);
        self.affirmative_check = self.affirmative_check.or(fallback.affirmative_check);
        self.strict_equals = self.strict_equals.or(fallback.strict_equals);
        self.null_check_only = self.null_check_only.or(fallback.null_check_only);
        self.ignore_case = self.ignore_case.or(fallback.ignore_case);
        self.ignore_references = self.ignore_references.or(fallback.ignore_references);
        self.ignore_order = self.ignore_order.or(fallback.ignore_order);
        self.recursive = self.recursive.or(fallback.recursive);
        self.short_circuit = self.short_circuit.or(fallback.short_circuit);
        self.cycle_policy = self.cycle_policy.or(fallback.cycle_policy);
        self.throw_on_failure = self.throw_on_failure.or(fallback.throw_on_failure);
        self.log_on_success = self.log_on_success.or(fallback.log_on_success);
        self.equality_comparers
            .extend(fallback.equality_comparers.iter().cloned());
        self
    }

    /// Build full comparison options. A comparison type must be set.
    pub fn resolve(&self) -> CompareResult<ComparisonOptions> {
        let compare_type = self.compare_type.ok_or_else(|| {
            CompareError::InvalidOptions("a compareType must be specified".to_string())
        })?;

        let mut options = ComparisonOptions::for_type(compare_type);
        if let Some(v) = self.affirmative_check {
            options.affirmative_check = v;
        }
        if let Some(v) = self.strict_equals {
            options.strict_equals = v;
        }
        if let Some(v) = self.null_check_only {
            options.null_check_only = v;
        }
        if let Some(v) = self.ignore_case {
            options.ignore_case = v;
        }
        if let Some(v) = self.ignore_references {
            options.ignore_references = v;
        }
        if let Some(v) = self.ignore_order {
            options.ignore_order = v;
        }
        if let Some(v) = self.recursive {
            options.recursive = v;
        }
        if let Some(v) = self.short_circuit {
            options.short_circuit = v;
        }
        if let Some(v) = self.cycle_policy {
            options.cycle_policy = v;
        }
        options.equality_comparers = self.equality_comparers.clone();
        Ok(options)
    }
}
