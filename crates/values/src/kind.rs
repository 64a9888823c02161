//! Run-time type tags for dynamic values.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The run-time kind of a [`Value`](crate::Value).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    /// An absent value
    Undefined,
    /// The null value
    Null,
    /// `true` or `false`
    Boolean,
    /// A double-precision number
    Number,
    /// An arbitrary-size integer
    BigInt,
    /// A string
    String,
    /// An ordered list of values
    Array,
    /// A keyed collection of values
    Object,
    /// A callable value
    Function,
    /// A DOM-like tree node
    Node,
}

impl ValueKind {
    /// Returns the tag name of the kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueKind::Undefined => "undefined",
            ValueKind::Null => "null",
            ValueKind::Boolean => "boolean",
            ValueKind::Number => "number",
            ValueKind::BigInt => "bigint",
            ValueKind::String => "string",
            ValueKind::Array => "array",
            ValueKind::Object => "object",
            ValueKind::Function => "function",
            ValueKind::Node => "node",
        }
    }

    /// Whether values of this kind are shared by reference.
    pub fn is_reference(&self) -> bool {
        matches!(
            self,
            ValueKind::Array | ValueKind::Object | ValueKind::Function | ValueKind::Node
        )
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ValueKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "undefined" => Ok(Self::Undefined),
            "null" => Ok(Self::Null),
            "boolean" => Ok(Self::Boolean),
            "number" => Ok(Self::Number),
            "bigint" => Ok(Self::BigInt),
            "string" => Ok(Self::String),
            "array" => Ok(Self::Array),
            "object" => Ok(Self::Object),
            "function" => Ok(Self::Function),
            "node" => Ok(Self::Node),
            _ => Err(format!(
                "Invalid value kind: '{}'. Valid options are: undefined, null, boolean, number, bigint, string, array, object, function, node",
                s
            )),
        }
    }
}
