//! Dynamic value model for the deepcheck comparison engine.
//!
//! Values are either primitives compared by value or shared handles
//! (arrays, objects, functions and DOM-like nodes) that carry an identity.

mod error;
mod kind;
mod node;
mod value;

pub use error::{ValueError, ValueResult};
pub use kind::ValueKind;
pub use node::{Attribute, Node, NodeRef, NodeType};
pub use value::{format_number, ArrayRef, FunctionRef, NativeFn, ObjectRef, PropertyMap, Value};
