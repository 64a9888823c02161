//! Error types for comparisons and assertions.

use deepcheck_values::ValueKind;
use thiserror::Error;

/// Usage errors raised before or during a comparison.
///
/// These are never retried: they indicate that the comparison itself was
/// malformed, not that the compared values differ.
#[derive(Error, Debug)]
pub enum CompareError {
    /// Unknown comparison type name
    #[error("Invalid comparison type: '{0}'. Valid options are: equality, equivalency, roughly, containment, predicate")]
    InvalidCompareType(String),

    /// Containment check against something that is not an array
    #[error("Array expected: cannot search for a value inside a {kind}")]
    ArrayExpected { kind: ValueKind },

    /// Predicate check given something that is not callable
    #[error("Function expected: cannot use a {kind} as a predicate")]
    FunctionExpected { kind: ValueKind },

    /// A comparer with the same name is already registered
    #[error("An equality comparer named '{0}' is already registered")]
    DuplicateComparer(String),

    /// Options could not be parsed or are incomplete
    #[error("Invalid comparison options: {0}")]
    InvalidOptions(String),

    /// A custom equality comparer returned an error
    #[error("Equality comparer '{name}' failed: {source}")]
    Comparer {
        name: String,
        #[source]
        source: anyhow::Error,
    },

    /// A predicate function returned an error
    #[error("Predicate '{name}' failed: {source}")]
    Predicate {
        name: String,
        #[source]
        source: anyhow::Error,
    },
}

/// Result type for comparison operations.
pub type CompareResult<T> = Result<T, CompareError>;

/// Errors returned by assertion verbs.
#[derive(Error, Debug)]
pub enum AssertError {
    /// The assertion could not be evaluated
    #[error(transparent)]
    Usage(#[from] CompareError),

    /// The comparison completed and did not hold
    #[error("{message}")]
    Failed { message: String },
}

impl AssertError {
    /// Whether this error is a completed-but-failed assertion.
    pub fn is_failure(&self) -> bool {
        matches!(self, AssertError::Failed { .. })
    }
}

/// Result type for assertion verbs.
pub type AssertResult<T> = Result<T, AssertError>;

/// Errors raised while loading assertion settings.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Settings document is not valid JSON for the settings schema
    #[error("Failed to parse assertion settings: {0}")]
    Parse(#[from] serde_json::Error),

    /// An environment variable holds an unusable value
    #[error("Invalid value '{value}' for environment variable {variable}: {message}")]
    InvalidEnv {
        variable: String,
        value: String,
        message: String,
    },
}
