//! The dynamic value type compared by the engine.

use indexmap::IndexMap;
use serde_json::Value as JsonValue;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::error::{ValueError, ValueResult};
use crate::kind::ValueKind;
use crate::node::{Node, NodeRef};

/// Ordered property storage for objects.
pub type PropertyMap = IndexMap<String, Value>;

/// Signature of a native function value.
pub type NativeFn = dyn Fn(&Value) -> anyhow::Result<Value>;

/// A dynamically typed value.
///
/// Primitive variants are compared by value. `Array`, `Object`, `Function` and
/// `Node` are shared handles: cloning one yields a second handle to the same
/// underlying data, and [`Value::identity`] reports the same address for both.
#[derive(Clone)]
pub enum Value {
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    BigInt(i128),
    String(Rc<str>),
    Array(ArrayRef),
    Object(ObjectRef),
    Function(FunctionRef),
    Node(NodeRef),
}

impl Value {
    pub fn string(s: impl AsRef<str>) -> Self {
        Value::String(Rc::from(s.as_ref()))
    }

    pub fn bigint(n: i128) -> Self {
        Value::BigInt(n)
    }

    /// Create a new array from the given items.
    pub fn array<I>(items: I) -> Self
    where
        I: IntoIterator<Item = Value>,
    {
        Value::Array(ArrayRef::new(items.into_iter().collect()))
    }

    /// Create a new plain object from `(key, value)` pairs, keeping their order.
    pub fn object<I, K>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        Value::Object(ObjectRef::new(None, entries))
    }

    /// Create a new object whose prototype is the named class.
    pub fn object_with_class<I, K>(class: impl Into<String>, entries: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        Value::Object(ObjectRef::new(Some(class.into()), entries))
    }

    /// Create a native function value.
    pub fn function<F>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&Value) -> anyhow::Result<Value> + 'static,
    {
        Value::Function(FunctionRef::new(name, None, f))
    }

    /// Create a native function value that renders as the given source text.
    pub fn function_with_source<F>(name: impl Into<String>, source: impl Into<String>, f: F) -> Self
    where
        F: Fn(&Value) -> anyhow::Result<Value> + 'static,
    {
        Value::Function(FunctionRef::new(name, Some(source.into()), f))
    }

    pub fn node(node: Node) -> Self {
        Value::Node(NodeRef::new(node))
    }

    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Undefined => ValueKind::Undefined,
            Value::Null => ValueKind::Null,
            Value::Bool(_) => ValueKind::Boolean,
            Value::Number(_) => ValueKind::Number,
            Value::BigInt(_) => ValueKind::BigInt,
            Value::String(_) => ValueKind::String,
            Value::Array(_) => ValueKind::Array,
            Value::Object(_) => ValueKind::Object,
            Value::Function(_) => ValueKind::Function,
            Value::Node(_) => ValueKind::Node,
        }
    }

    /// The coarse `typeof` name of the value.
    pub fn type_of(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::BigInt(_) => "bigint",
            Value::String(_) => "string",
            Value::Function(_) => "function",
            Value::Null | Value::Array(_) | Value::Object(_) | Value::Node(_) => "object",
        }
    }

    /// Address of the shared data for reference values, `None` for primitives.
    pub fn identity(&self) -> Option<usize> {
        match self {
            Value::Array(a) => Some(a.identity()),
            Value::Object(o) => Some(o.identity()),
            Value::Function(f) => Some(f.identity()),
            Value::Node(n) => Some(n.identity()),
            _ => None,
        }
    }

    /// Whether both values are handles to the same reference.
    pub fn same_reference(&self, other: &Value) -> bool {
        match (self.identity(), other.identity()) {
            (Some(a), Some(b)) => a == b && self.kind() == other.kind(),
            _ => false,
        }
    }

    /// Arrays and plain objects, the values whose properties can be descended into.
    pub fn is_container(&self) -> bool {
        matches!(self, Value::Array(_) | Value::Object(_))
    }

    pub fn is_nullish(&self) -> bool {
        matches!(self, Value::Undefined | Value::Null)
    }

    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Undefined | Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => *n != 0.0 && !n.is_nan(),
            Value::BigInt(n) => *n != 0,
            Value::String(s) => !s.is_empty(),
            Value::Array(_) | Value::Object(_) | Value::Function(_) | Value::Node(_) => true,
        }
    }

    /// Check whether the value's prototype chain includes the named class.
    pub fn is_instance_of(&self, class: &str) -> bool {
        match self {
            Value::Object(o) => class == "Object" || o.class_name() == class,
            Value::Array(_) => class == "Array" || class == "Object",
            Value::Function(_) => class == "Function" || class == "Object",
            Value::Node(n) => n.is_instance_of(class),
            _ => false,
        }
    }

    /// Property access. Missing properties read as `Undefined`.
    pub fn get(&self, key: &str) -> Value {
        match self {
            Value::Object(o) => o.get(key).unwrap_or(Value::Undefined),
            Value::Array(a) => key
                .parse::<usize>()
                .ok()
                .and_then(|i| a.get(i))
                .unwrap_or(Value::Undefined),
            _ => Value::Undefined,
        }
    }

    /// Own enumerable property names, in order.
    pub fn own_keys(&self) -> Vec<String> {
        match self {
            Value::Object(o) => o.keys(),
            Value::Array(a) => (0..a.len()).map(|i| i.to_string()).collect(),
            _ => Vec::new(),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&ArrayRef> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&ObjectRef> {
        match self {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }

    pub fn as_function(&self) -> Option<&FunctionRef> {
        match self {
            Value::Function(f) => Some(f),
            _ => None,
        }
    }

    pub fn as_node(&self) -> Option<&NodeRef> {
        match self {
            Value::Node(n) => Some(n),
            _ => None,
        }
    }

    /// Convert to JSON the way a JSON serializer would.
    ///
    /// `undefined` and functions are dropped from objects and written as `null`
    /// inside arrays. Cycles and big integers are errors.
    pub fn to_json(&self) -> ValueResult<JsonValue> {
        let mut ancestors = Vec::new();
        self.to_json_inner(&mut ancestors)
    }

    fn to_json_inner(&self, ancestors: &mut Vec<usize>) -> ValueResult<JsonValue> {
        match self {
            Value::Undefined | Value::Null | Value::Function(_) => Ok(JsonValue::Null),
            Value::Bool(b) => Ok(JsonValue::Bool(*b)),
            Value::Number(n) => Ok(number_to_json(*n)),
            Value::BigInt(_) => Err(ValueError::BigIntNotSerializable),
            Value::String(s) => Ok(JsonValue::String(s.to_string())),
            Value::Node(_) => Ok(JsonValue::Object(serde_json::Map::new())),
            Value::Array(a) => {
                enter(ancestors, a.identity())?;
                let converted = a
                    .items()
                    .iter()
                    .map(|item| match item {
                        Value::Undefined | Value::Function(_) => Ok(JsonValue::Null),
                        other => other.to_json_inner(ancestors),
                    })
                    .collect::<ValueResult<Vec<_>>>();
                ancestors.pop();
                converted.map(JsonValue::Array)
            }
            Value::Object(o) => {
                enter(ancestors, o.identity())?;
                let mut map = serde_json::Map::new();
                let mut outcome = Ok(());
                for (key, value) in o.entries() {
                    if matches!(value, Value::Undefined | Value::Function(_)) {
                        continue;
                    }
                    match value.to_json_inner(ancestors) {
                        Ok(json) => {
                            map.insert(key, json);
                        }
                        Err(e) => {
                            outcome = Err(e);
                            break;
                        }
                    }
                }
                ancestors.pop();
                outcome.map(|_| JsonValue::Object(map))
            }
        }
    }
}

fn enter(ancestors: &mut Vec<usize>, id: usize) -> ValueResult<()> {
    if ancestors.contains(&id) {
        return Err(ValueError::CircularStructure);
    }
    ancestors.push(id);
    Ok(())
}

fn number_to_json(n: f64) -> JsonValue {
    const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;
    if n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER {
        return JsonValue::from(n as i64);
    }
    serde_json::Number::from_f64(n)
        .map(JsonValue::Number)
        .unwrap_or(JsonValue::Null)
}

/// Format a number the way dynamic languages print it (`1`, `1.5`, `NaN`, `Infinity`).
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        let name = if n > 0.0 { "Infinity" } else { "-Infinity" };
        name.to_string()
    } else if n == 0.0 {
        "0".to_string()
    } else {
        n.to_string()
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => f.write_str("undefined"),
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Number(n) => f.write_str(&format_number(*n)),
            Value::BigInt(n) => write!(f, "{}n", n),
            Value::String(s) => write!(f, "{:?}", s),
            Value::Array(a) => write!(f, "Array(len={})", a.len()),
            Value::Object(o) => write!(f, "{}{:?}", o.class_name(), o.keys()),
            Value::Function(func) => write!(f, "Function({})", func.name()),
            Value::Node(n) => write!(f, "Node({})", n.name()),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(n as f64)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::Number(n as f64)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::string(s)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(Rc::from(s))
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(ArrayRef::new(items))
    }
}

impl From<Node> for Value {
    fn from(node: Node) -> Self {
        Value::node(node)
    }
}

impl From<NodeRef> for Value {
    fn from(node: NodeRef) -> Self {
        Value::Node(node)
    }
}

impl From<JsonValue> for Value {
    fn from(json: JsonValue) -> Self {
        match json {
            JsonValue::Null => Value::Null,
            JsonValue::Bool(b) => Value::Bool(b),
            JsonValue::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
            JsonValue::String(s) => Value::from(s),
            JsonValue::Array(items) => Value::array(items.into_iter().map(Value::from)),
            JsonValue::Object(map) => {
                Value::object(map.into_iter().map(|(k, v)| (k, Value::from(v))))
            }
        }
    }
}

/// Shared, mutable array storage.
#[derive(Clone)]
pub struct ArrayRef(Rc<RefCell<Vec<Value>>>);

impl ArrayRef {
    pub fn new(items: Vec<Value>) -> Self {
        Self(Rc::new(RefCell::new(items)))
    }

    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }

    pub fn get(&self, index: usize) -> Option<Value> {
        self.0.borrow().get(index).cloned()
    }

    pub fn push(&self, value: Value) {
        self.0.borrow_mut().push(value);
    }

    /// Replace the item at `index`. Returns `false` when out of bounds.
    pub fn set(&self, index: usize, value: Value) -> bool {
        match self.0.borrow_mut().get_mut(index) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    /// Snapshot of the current items.
    pub fn items(&self) -> Vec<Value> {
        self.0.borrow().clone()
    }

    pub fn identity(&self) -> usize {
        Rc::as_ptr(&self.0) as *const u8 as usize
    }

    pub fn ptr_eq(&self, other: &ArrayRef) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

struct ObjectData {
    class: Option<String>,
    properties: RefCell<PropertyMap>,
}

/// Shared, mutable object storage with insertion-ordered keys.
#[derive(Clone)]
pub struct ObjectRef(Rc<ObjectData>);

impl ObjectRef {
    pub fn new<I, K>(class: Option<String>, entries: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        let properties = entries.into_iter().map(|(k, v)| (k.into(), v)).collect();
        Self(Rc::new(ObjectData {
            class,
            properties: RefCell::new(properties),
        }))
    }

    /// Name of the object's class, `Object` for plain objects.
    pub fn class_name(&self) -> &str {
        self.0.class.as_deref().unwrap_or("Object")
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        self.0.properties.borrow().get(key).cloned()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.properties.borrow().contains_key(key)
    }

    pub fn insert(&self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.0.properties.borrow_mut().insert(key.into(), value)
    }

    pub fn remove(&self, key: &str) -> Option<Value> {
        self.0.properties.borrow_mut().shift_remove(key)
    }

    pub fn keys(&self) -> Vec<String> {
        self.0.properties.borrow().keys().cloned().collect()
    }

    /// Snapshot of the current `(key, value)` pairs.
    pub fn entries(&self) -> Vec<(String, Value)> {
        self.0
            .properties
            .borrow()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.0.properties.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.properties.borrow().is_empty()
    }

    pub fn identity(&self) -> usize {
        Rc::as_ptr(&self.0) as *const u8 as usize
    }

    pub fn ptr_eq(&self, other: &ObjectRef) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

struct FunctionData {
    name: String,
    source: Option<String>,
    call: Box<NativeFn>,
}

/// Shared handle to a native function.
#[derive(Clone)]
pub struct FunctionRef(Rc<FunctionData>);

impl FunctionRef {
    pub fn new<F>(name: impl Into<String>, source: Option<String>, f: F) -> Self
    where
        F: Fn(&Value) -> anyhow::Result<Value> + 'static,
    {
        Self(Rc::new(FunctionData {
            name: name.into(),
            source,
            call: Box::new(f),
        }))
    }

    pub fn name(&self) -> &str {
        &self.0.name
    }

    pub fn source(&self) -> Option<&str> {
        self.0.source.as_deref()
    }

    pub fn call(&self, argument: &Value) -> anyhow::Result<Value> {
        (self.0.call)(argument)
    }

    pub fn identity(&self) -> usize {
        Rc::as_ptr(&self.0) as *const u8 as usize
    }

    pub fn ptr_eq(&self, other: &FunctionRef) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_kinds_and_type_of() {
        assert_eq!(Value::Null.kind(), ValueKind::Null);
        assert_eq!(Value::Null.type_of(), "object");
        assert_eq!(Value::array(Vec::new()).type_of(), "object");
        assert_eq!(Value::array(Vec::new()).kind(), ValueKind::Array);
        assert_eq!(Value::function("f", |v| Ok(v.clone())).type_of(), "function");
        assert_eq!(Value::bigint(3).type_of(), "bigint");
    }

    #[test]
    fn test_truthiness() {
        assert!(!Value::Undefined.is_truthy());
        assert!(!Value::from(0).is_truthy());
        assert!(!Value::Number(f64::NAN).is_truthy());
        assert!(!Value::from("").is_truthy());
        assert!(Value::from("0").is_truthy());
        assert!(Value::array(Vec::new()).is_truthy());
        assert!(!Value::bigint(0).is_truthy());
    }

    #[test]
    fn test_clone_preserves_identity() {
        let a = Value::object([("x", Value::from(1))]);
        let b = a.clone();
        let c = Value::object([("x", Value::from(1))]);
        assert!(a.same_reference(&b));
        assert!(!a.same_reference(&c));
        assert!(!Value::from(1).same_reference(&Value::from(1)));
    }

    #[test]
    fn test_property_access() {
        let obj = Value::object([("a", Value::from(1)), ("b", Value::from("x"))]);
        assert_eq!(obj.get("a").as_f64(), Some(1.0));
        assert!(matches!(obj.get("missing"), Value::Undefined));
        assert_eq!(obj.own_keys(), vec!["a", "b"]);

        let arr = Value::array([Value::from(10), Value::from(20)]);
        assert_eq!(arr.get("1").as_f64(), Some(20.0));
        assert!(matches!(arr.get("2"), Value::Undefined));
        assert_eq!(arr.own_keys(), vec!["0", "1"]);
    }

    #[test]
    fn test_instance_of() {
        let point = Value::object_with_class("Point", [("x", Value::from(1))]);
        assert!(point.is_instance_of("Point"));
        assert!(point.is_instance_of("Object"));
        assert!(!point.is_instance_of("Array"));
        assert!(Value::array(Vec::new()).is_instance_of("Array"));
        assert!(Value::node(Node::element("p")).is_instance_of("Element"));
        assert!(!Value::from("s").is_instance_of("Object"));
    }

    #[test]
    fn test_json_round_trip_preserves_order() {
        let json = json!({"b": 1, "a": [true, null, "s"], "c": {"d": 1.5}});
        let value = Value::from(json.clone());
        assert_eq!(value.own_keys(), vec!["b", "a", "c"]);
        assert_eq!(value.to_json().unwrap(), json);
    }

    #[test]
    fn test_json_drops_functions_and_undefined() {
        let value = Value::object([
            ("f", Value::function("f", |v| Ok(v.clone()))),
            ("u", Value::Undefined),
            ("list", Value::array([Value::Undefined, Value::from(1)])),
        ]);
        assert_eq!(value.to_json().unwrap(), json!({"list": [null, 1]}));
    }

    #[test]
    fn test_json_detects_cycles() {
        let obj = ObjectRef::new(None, [("a", Value::from(1))]);
        obj.insert("self", Value::Object(obj.clone()));
        assert_eq!(
            Value::Object(obj).to_json(),
            Err(ValueError::CircularStructure)
        );
    }

    #[test]
    fn test_json_allows_shared_non_cyclic_references() {
        let shared = Value::object([("k", Value::from(1))]);
        let value = Value::array([shared.clone(), shared]);
        assert_eq!(value.to_json().unwrap(), json!([{"k": 1}, {"k": 1}]));
    }

    #[test]
    fn test_json_rejects_bigint() {
        let value = Value::array([Value::bigint(1)]);
        assert_eq!(value.to_json(), Err(ValueError::BigIntNotSerializable));
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(1.0), "1");
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(1.5), "1.5");
        assert_eq!(format_number(f64::NAN), "NaN");
        assert_eq!(format_number(f64::NEG_INFINITY), "-Infinity");
    }

    #[test]
    fn test_function_call() {
        let double = Value::function("double", |v| {
            Ok(Value::from(v.as_f64().unwrap_or_default() * 2.0))
        });
        let result = double.as_function().unwrap().call(&Value::from(4)).unwrap();
        assert_eq!(result.as_f64(), Some(8.0));
    }

    #[test]
    fn test_array_mutation_is_shared() {
        let arr = ArrayRef::new(vec![Value::from(1)]);
        let alias = Value::Array(arr.clone());
        arr.push(Value::from(2));
        assert!(arr.set(0, Value::from(5)));
        assert!(!arr.set(9, Value::from(5)));
        assert_eq!(alias.as_array().unwrap().len(), 2);
        assert_eq!(alias.get("0").as_f64(), Some(5.0));
    }
}
