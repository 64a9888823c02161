//! Custom equality comparers and the filters that decide where they apply.

use deepcheck_values::{Value, ValueKind};
use std::fmt;
use std::ops::{BitOr, BitOrAssign};

use crate::options::ComparisonOptions;

/// Bit flags selecting which filters of an [`EqualityComparer`] are active and
/// how their verdicts combine.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct FilterFlags(u8);

impl FilterFlags {
    pub const NONE: FilterFlags = FilterFlags(0);
    /// The `type_of` filter is active.
    pub const TYPE_OF: FilterFlags = FilterFlags(1);
    /// The `prototype` filter is active.
    pub const PROTOTYPE: FilterFlags = FilterFlags(1 << 1);
    /// The `predicate` filter is active.
    pub const PREDICATE: FilterFlags = FilterFlags(1 << 2);
    /// A value passes when any active filter passes instead of all of them.
    pub const MATCH_ANY: FilterFlags = FilterFlags(1 << 3);
    /// The comparer applies when either value passes instead of both.
    pub const EITHER_VALUE: FilterFlags = FilterFlags(1 << 4);

    pub fn contains(&self, other: FilterFlags) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn bits(&self) -> u8 {
        self.0
    }
}

impl BitOr for FilterFlags {
    type Output = FilterFlags;

    fn bitor(self, rhs: FilterFlags) -> FilterFlags {
        FilterFlags(self.0 | rhs.0)
    }
}

impl BitOrAssign for FilterFlags {
    fn bitor_assign(&mut self, rhs: FilterFlags) {
        self.0 |= rhs.0;
    }
}

impl fmt::Debug for FilterFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = [
            (FilterFlags::TYPE_OF, "TYPE_OF"),
            (FilterFlags::PROTOTYPE, "PROTOTYPE"),
            (FilterFlags::PREDICATE, "PREDICATE"),
            (FilterFlags::MATCH_ANY, "MATCH_ANY"),
            (FilterFlags::EITHER_VALUE, "EITHER_VALUE"),
        ]
        .into_iter()
        .filter(|(flag, _)| self.contains(*flag))
        .map(|(_, name)| name)
        .collect();
        write!(f, "FilterFlags({})", names.join(" | "))
    }
}

/// What a comparer sees about the pair it is asked to judge.
pub struct ComparerContext<'a> {
    pub a: &'a Value,
    pub b: &'a Value,
    pub key: Option<&'a str>,
    pub path: Option<&'a str>,
    pub options: &'a ComparisonOptions,
    pub root_a: &'a Value,
    pub root_b: &'a Value,
}

type EqualsFn = dyn Fn(&ComparerContext<'_>) -> anyhow::Result<bool>;
type ValueFilterFn = dyn Fn(&Value) -> bool;

/// A named rule that can declare two values equal when the default
/// comparison says they are not.
pub struct EqualityComparer {
    name: String,
    equals: Box<EqualsFn>,
    type_of: Option<ValueKind>,
    prototype: Option<String>,
    predicate: Option<Box<ValueFilterFn>>,
    flags: FilterFlags,
}

impl EqualityComparer {
    /// Create a comparer that applies to every pair until filters are added.
    pub fn new<F>(name: impl Into<String>, equals: F) -> Self
    where
        F: Fn(&ComparerContext<'_>) -> anyhow::Result<bool> + 'static,
    {
        Self {
            name: name.into(),
            equals: Box::new(equals),
            type_of: None,
            prototype: None,
            predicate: None,
            flags: FilterFlags::NONE,
        }
    }

    /// Only apply to values of the given kind.
    pub fn type_of(mut self, kind: ValueKind) -> Self {
        self.type_of = Some(kind);
        self.flags |= FilterFlags::TYPE_OF;
        self
    }

    /// Only apply to values whose prototype chain includes `class`.
    pub fn prototype(mut self, class: impl Into<String>) -> Self {
        self.prototype = Some(class.into());
        self.flags |= FilterFlags::PROTOTYPE;
        self
    }

    /// Only apply to values accepted by `filter`.
    pub fn predicate<F>(mut self, filter: F) -> Self
    where
        F: Fn(&Value) -> bool + 'static,
    {
        self.predicate = Some(Box::new(filter));
        self.flags |= FilterFlags::PREDICATE;
        self
    }

    /// Accept a value when any active filter accepts it.
    pub fn match_any(mut self) -> Self {
        self.flags |= FilterFlags::MATCH_ANY;
        self
    }

    /// Apply when either value passes the filters.
    pub fn either_value(mut self) -> Self {
        self.flags |= FilterFlags::EITHER_VALUE;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn flags(&self) -> FilterFlags {
        self.flags
    }

    /// Decide whether this comparer should be consulted for the pair.
    pub fn applies_to(&self, a: &Value, b: &Value) -> bool {
        let active = [
            FilterFlags::TYPE_OF,
            FilterFlags::PROTOTYPE,
            FilterFlags::PREDICATE,
        ]
        .into_iter()
        .any(|flag| self.flags.contains(flag));

        if !active {
            return true;
        }

        if self.flags.contains(FilterFlags::EITHER_VALUE) {
            self.accepts(a) || self.accepts(b)
        } else {
            self.accepts(a) && self.accepts(b)
        }
    }

    fn accepts(&self, value: &Value) -> bool {
        let mut verdicts = Vec::with_capacity(3);
        if self.flags.contains(FilterFlags::TYPE_OF) {
            verdicts.push(self.type_of.is_some_and(|kind| value.kind() == kind));
        }
        if self.flags.contains(FilterFlags::PROTOTYPE) {
            verdicts.push(
                self.prototype
                    .as_deref()
                    .is_some_and(|class| value.is_instance_of(class)),
            );
        }
        if self.flags.contains(FilterFlags::PREDICATE) {
            verdicts.push(self.predicate.as_ref().is_some_and(|filter| filter(value)));
        }

        if self.flags.contains(FilterFlags::MATCH_ANY) {
            verdicts.into_iter().any(|v| v)
        } else {
            verdicts.into_iter().all(|v| v)
        }
    }

    /// Run the comparer.
    pub fn equals(&self, context: &ComparerContext<'_>) -> anyhow::Result<bool> {
        (self.equals)(context)
    }
}

impl fmt::Debug for EqualityComparer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EqualityComparer")
            .field("name", &self.name)
            .field("type_of", &self.type_of)
            .field("prototype", &self.prototype)
            .field("flags", &self.flags)
            .finish()
    }
}
