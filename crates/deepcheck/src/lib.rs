//! Deep value comparison and assertions.
//!
//! Values are compared by one of five comparison types: strict equality,
//! structural equivalency, rough (order-insensitive, loosely typed)
//! equivalency, containment and predicate checks. Structural comparisons
//! produce a tree of per-property results, which the formatter walks to
//! report the first point of divergence.
//!
//! # Example
//!
//! ```
//! use deepcheck::{assert_that, Value};
//!
//! let actual = Value::array([Value::from(3), Value::from(1), Value::from(2)]);
//! assert_that(actual.clone())
//!     .is_roughly(Value::array([Value::from(1), Value::from(2), Value::from(3)]))
//!     .unwrap();
//!
//! let err = assert_that(actual)
//!     .is_equivalent_to(Value::array([Value::from(1), Value::from(2), Value::from(3)]))
//!     .unwrap_err();
//! assert!(err.to_string().contains("at path `0`"));
//! ```
//!
//! # Custom comparers
//!
//! ```
//! use deepcheck::comparers::unicode_equivalence_comparer;
//! use deepcheck::{Asserter, AssertionSettings, ComparerRegistry};
//!
//! let mut registry = ComparerRegistry::standard();
//! registry.register(unicode_equivalence_comparer()).unwrap();
//!
//! let asserter = Asserter::new(registry, AssertionSettings::default());
//! asserter.that("caf\u{e9}").equals("cafe\u{301}").unwrap();
//! ```

pub mod assertion;
pub mod compare;
pub mod comparer;
pub mod comparers;
pub mod config;
mod context;
pub mod error;
pub mod format;
mod multiset;
pub mod options;
pub mod output;
pub mod registry;
pub mod result;

pub use assertion::{assert_that, Asserter, Assertion};
pub use compare::{compare, compare_standard, compare_structure};
pub use comparer::{ComparerContext, EqualityComparer, FilterFlags};
pub use config::{AssertionSettings, SinkKind};
pub use error::{AssertError, AssertResult, CompareError, CompareResult, ConfigError};
pub use format::MessageFormatter;
pub use options::{AssertOptions, CompareType, ComparisonOptions, CyclePolicy};
pub use output::{ConsoleSink, LogSink, MemorySink, OutputSink, SilentSink};
pub use registry::ComparerRegistry;
pub use result::{
    ComparisonId, ComparisonResult, ContainmentResult, PredicateResult, ResultType,
    ValueCompareResult, ValueComparison,
};

pub use deepcheck_values::{Value, ValueKind};
