//! Resolved values passed to constructors and returned to callers.

use std::any::{Any, type_name};
use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

/// Ordered map of resolved values, keyed by parameter or entry name.
pub type ValueMap = IndexMap<String, Value>;

/// Handle to an object built by a registered factory.
///
/// Cloning an instance clones the handle, never the object: every clone
/// refers to the same allocation, and [`Instance::ptr_eq`] compares identity.
#[derive(Clone)]
pub struct Instance {
	factory: Arc<str>,
	type_name: &'static str,
	object: Arc<dyn Any + Send + Sync>,
}

impl Instance {
	/// Wraps a freshly built object.
	pub fn new<T: Any + Send + Sync>(object: T) -> Self {
		Self::from_arc(Arc::new(object))
	}

	/// Wraps an object that is already shared.
	pub fn from_arc<T: Any + Send + Sync>(object: Arc<T>) -> Self {
		Self {
			factory: Arc::from(""),
			type_name: type_name::<T>(),
			object,
		}
	}

	pub(crate) fn with_factory(mut self, factory: &Arc<str>) -> Self {
		self.factory = Arc::clone(factory);
		self
	}

	/// Name of the factory that built this object, empty for hand-made instances.
	pub fn factory(&self) -> &str {
		&self.factory
	}

	/// Rust type name of the wrapped object.
	pub fn type_name(&self) -> &'static str {
		self.type_name
	}

	/// Returns a typed handle if the object is a `T`.
	pub fn downcast<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
		Arc::clone(&self.object).downcast::<T>().ok()
	}

	/// Borrows the object as a `T`.
	pub fn downcast_ref<T: Any + Send + Sync>(&self) -> Option<&T> {
		self.object.downcast_ref::<T>()
	}

	/// Returns true if both handles point at the same object.
	pub fn ptr_eq(&self, other: &Instance) -> bool {
		Arc::ptr_eq(&self.object, &other.object)
	}
}

impl fmt::Debug for Instance {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "Instance({} @ {:p}", self.type_name, Arc::as_ptr(&self.object))?;
		if !self.factory.is_empty() {
			write!(f, ", factory={}", self.factory)?;
		}
		f.write_str(")")
	}
}

/// A fully resolved configuration value.
///
/// Equality is structural for data and by identity for [`Value::Object`].
#[derive(Clone, Debug)]
pub enum Value {
	Null,
	Bool(bool),
	Int(i64),
	/// An integer above `i64::MAX`.
	UInt(u64),
	Float(f64),
	String(String),
	List(Vec<Value>),
	Map(ValueMap),
	Object(Instance),
}

impl Value {
	/// Short name of the value's kind, used in error messages.
	pub fn type_name(&self) -> &'static str {
		match self {
			Self::Null => "null",
			Self::Bool(_) => "bool",
			Self::Int(_) => "int",
			Self::UInt(_) => "uint",
			Self::Float(_) => "float",
			Self::String(_) => "string",
			Self::List(_) => "list",
			Self::Map(_) => "map",
			Self::Object(_) => "object",
		}
	}

	pub fn is_null(&self) -> bool {
		matches!(self, Self::Null)
	}

	pub fn as_bool(&self) -> Option<bool> {
		match self {
			Self::Bool(b) => Some(*b),
			_ => None,
		}
	}

	pub fn as_int(&self) -> Option<i64> {
		match self {
			Self::Int(i) => Some(*i),
			_ => None,
		}
	}

	/// Returns the value as an unsigned integer, accepting non-negative ints.
	pub fn as_uint(&self) -> Option<u64> {
		match self {
			Self::UInt(u) => Some(*u),
			Self::Int(i) => u64::try_from(*i).ok(),
			_ => None,
		}
	}

	/// Returns the value as a float, widening integers.
	pub fn as_float(&self) -> Option<f64> {
		match self {
			Self::Float(f) => Some(*f),
			Self::Int(i) => Some(*i as f64),
			Self::UInt(u) => Some(*u as f64),
			_ => None,
		}
	}

	pub fn as_str(&self) -> Option<&str> {
		match self {
			Self::String(s) => Some(s),
			_ => None,
		}
	}

	pub fn as_list(&self) -> Option<&[Value]> {
		match self {
			Self::List(items) => Some(items),
			_ => None,
		}
	}

	pub fn as_map(&self) -> Option<&ValueMap> {
		match self {
			Self::Map(map) => Some(map),
			_ => None,
		}
	}

	pub fn as_object(&self) -> Option<&Instance> {
		match self {
			Self::Object(instance) => Some(instance),
			_ => None,
		}
	}

	/// Downcasts an object value to a typed handle.
	pub fn downcast<T: std::any::Any + Send + Sync>(&self) -> Option<Arc<T>> {
		self.as_object().and_then(Instance::downcast::<T>)
	}

	/// Returns true if both values are objects sharing one instance.
	pub fn same_instance(&self, other: &Value) -> bool {
		match (self, other) {
			(Self::Object(a), Self::Object(b)) => a.ptr_eq(b),
			_ => false,
		}
	}
}

impl PartialEq for Value {
	fn eq(&self, other: &Self) -> bool {
		match (self, other) {
			(Self::Null, Self::Null) => true,
			(Self::Bool(a), Self::Bool(b)) => a == b,
			(Self::Int(a), Self::Int(b)) => a == b,
			(Self::UInt(a), Self::UInt(b)) => a == b,
			(Self::Float(a), Self::Float(b)) => a == b,
			(Self::String(a), Self::String(b)) => a == b,
			(Self::List(a), Self::List(b)) => a == b,
			(Self::Map(a), Self::Map(b)) => a == b,
			(Self::Object(a), Self::Object(b)) => a.ptr_eq(b),
			_ => false,
		}
	}
}

impl From<&serde_json::Value> for Value {
	fn from(json: &serde_json::Value) -> Self {
		match json {
			serde_json::Value::Null => Self::Null,
			serde_json::Value::Bool(b) => Self::Bool(*b),
			serde_json::Value::Number(n) => match (n.as_i64(), n.as_u64()) {
				(Some(i), _) => Self::Int(i),
				(None, Some(u)) => Self::UInt(u),
				(None, None) => Self::Float(n.as_f64().unwrap_or(f64::NAN)),
			},
			serde_json::Value::String(s) => Self::String(s.clone()),
			serde_json::Value::Array(items) => Self::List(items.iter().map(Self::from).collect()),
			serde_json::Value::Object(map) => Self::Map(map.iter().map(|(k, v)| (k.clone(), Self::from(v))).collect()),
		}
	}
}

impl From<bool> for Value {
	fn from(b: bool) -> Self {
		Self::Bool(b)
	}
}

impl From<i64> for Value {
	fn from(i: i64) -> Self {
		Self::Int(i)
	}
}

impl From<f64> for Value {
	fn from(f: f64) -> Self {
		Self::Float(f)
	}
}

impl From<&str> for Value {
	fn from(s: &str) -> Self {
		Self::String(s.to_string())
	}
}

impl From<String> for Value {
	fn from(s: String) -> Self {
		Self::String(s)
	}
}

impl From<Instance> for Value {
	fn from(instance: Instance) -> Self {
		Self::Object(instance)
	}
}
