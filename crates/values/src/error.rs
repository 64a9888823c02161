//! Error types for value conversion.

use thiserror::Error;

/// Errors that can occur while converting values.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValueError {
    /// A value graph contains a reference to one of its ancestors
    #[error("Converting circular structure to JSON")]
    CircularStructure,

    /// Big integers have no JSON representation
    #[error("Do not know how to serialize a BigInt")]
    BigIntNotSerializable,
}

/// Result type for value operations.
pub type ValueResult<T> = Result<T, ValueError>;
