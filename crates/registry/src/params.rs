//! Constructor parameters.

use std::any::{Any, type_name};
use std::sync::Arc;

use thiserror::Error;

use crate::value::{Instance, Value, ValueMap};

/// Errors a constructor raises while reading its parameters.
///
/// These convert into [`crate::BoxError`] with `?`, so the engine reports them
/// with the config path of the failing object.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParamError {
	#[error("missing parameter '{name}'")]
	Missing { name: String },

	#[error("parameter '{name}' must be {expected}, got {got}")]
	Type {
		name: String,
		expected: &'static str,
		got: &'static str,
	},
}

/// Resolved parameters handed to a factory, in document order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Params {
	values: ValueMap,
}

impl Params {
	pub fn new(values: ValueMap) -> Self {
		Self { values }
	}

	pub fn len(&self) -> usize {
		self.values.len()
	}

	pub fn is_empty(&self) -> bool {
		self.values.is_empty()
	}

	pub fn contains(&self, name: &str) -> bool {
		self.values.contains_key(name)
	}

	pub fn get(&self, name: &str) -> Option<&Value> {
		self.values.get(name)
	}

	/// Removes a parameter, keeping the order of the rest.
	pub fn take(&mut self, name: &str) -> Option<Value> {
		self.values.shift_remove(name)
	}

	pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
		self.values.iter().map(|(k, v)| (k.as_str(), v))
	}

	pub fn into_inner(self) -> ValueMap {
		self.values
	}

	pub fn require(&self, name: &str) -> Result<&Value, ParamError> {
		self.values.get(name).ok_or_else(|| ParamError::Missing { name: name.to_string() })
	}

	pub fn bool(&self, name: &str) -> Result<bool, ParamError> {
		let value = self.require(name)?;
		value.as_bool().ok_or_else(|| type_error(name, "a bool", value))
	}

	pub fn int(&self, name: &str) -> Result<i64, ParamError> {
		let value = self.require(name)?;
		value.as_int().ok_or_else(|| type_error(name, "an int", value))
	}

	/// A non-negative integer, including values above `i64::MAX`.
	pub fn uint(&self, name: &str) -> Result<u64, ParamError> {
		let value = self.require(name)?;
		value.as_uint().ok_or_else(|| type_error(name, "a non-negative int", value))
	}

	pub fn float(&self, name: &str) -> Result<f64, ParamError> {
		let value = self.require(name)?;
		value.as_float().ok_or_else(|| type_error(name, "a number", value))
	}

	pub fn str(&self, name: &str) -> Result<&str, ParamError> {
		let value = self.require(name)?;
		value.as_str().ok_or_else(|| type_error(name, "a string", value))
	}

	pub fn list(&self, name: &str) -> Result<&[Value], ParamError> {
		let value = self.require(name)?;
		value.as_list().ok_or_else(|| type_error(name, "a list", value))
	}

	pub fn map(&self, name: &str) -> Result<&ValueMap, ParamError> {
		let value = self.require(name)?;
		value.as_map().ok_or_else(|| type_error(name, "a map", value))
	}

	pub fn instance(&self, name: &str) -> Result<&Instance, ParamError> {
		let value = self.require(name)?;
		value.as_object().ok_or_else(|| type_error(name, "an object", value))
	}

	/// Returns the shared object behind `name` as a `T`.
	pub fn object<T: Any + Send + Sync>(&self, name: &str) -> Result<Arc<T>, ParamError> {
		let instance = self.instance(name)?;
		instance.downcast::<T>().ok_or_else(|| ParamError::Type {
			name: name.to_string(),
			expected: type_name::<T>(),
			got: instance.type_name(),
		})
	}

	pub fn bool_or(&self, name: &str, default: bool) -> Result<bool, ParamError> {
		self.or_default(name, default, Self::bool)
	}

	pub fn int_or(&self, name: &str, default: i64) -> Result<i64, ParamError> {
		self.or_default(name, default, Self::int)
	}

	pub fn float_or(&self, name: &str, default: f64) -> Result<f64, ParamError> {
		self.or_default(name, default, Self::float)
	}

	fn or_default<T>(&self, name: &str, default: T, read: impl Fn(&Self, &str) -> Result<T, ParamError>) -> Result<T, ParamError> {
		match self.values.get(name) {
			None | Some(Value::Null) => Ok(default),
			Some(_) => read(self, name),
		}
	}
}

impl FromIterator<(String, Value)> for Params {
	fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
		Self::new(iter.into_iter().collect())
	}
}

fn type_error(name: &str, expected: &'static str, got: &Value) -> ParamError {
	ParamError::Type {
		name: name.to_string(),
		expected,
		got: got.type_name(),
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;

	fn params() -> Params {
		[
			("lr".to_string(), Value::Float(0.01)),
			("epochs".to_string(), Value::Int(3)),
			("name".to_string(), Value::from("run")),
			("momentum".to_string(), Value::Null),
		]
		.into_iter()
		.collect()
	}

	#[test]
	fn typed_getters() {
		let p = params();
		assert_eq!(p.float("lr"), Ok(0.01));
		assert_eq!(p.float("epochs"), Ok(3.0));
		assert_eq!(p.int("epochs"), Ok(3));
		assert_eq!(p.uint("epochs"), Ok(3));
		assert_eq!(p.str("name"), Ok("run"));
	}

	#[test]
	fn type_mismatch_names_parameter() {
		let p = params();
		assert_eq!(
			p.int("name"),
			Err(ParamError::Type {
				name: "name".to_string(),
				expected: "an int",
				got: "string",
			})
		);
		assert_eq!(p.bool("missing"), Err(ParamError::Missing { name: "missing".to_string() }));
	}

	#[test]
	fn defaults_apply_to_absent_and_null() {
		let p = params();
		assert_eq!(p.float_or("momentum", 0.9), Ok(0.9));
		assert_eq!(p.int_or("batch_size", 32), Ok(32));
		assert_eq!(p.int_or("epochs", 10), Ok(3));
	}

	#[test]
	fn object_downcasts_shared_instance() {
		struct Model;
		let model = Instance::new(Model);
		let p: Params = [("model".to_string(), Value::Object(model.clone()))].into_iter().collect();

		assert!(p.object::<Model>("model").is_ok());
		assert!(matches!(p.object::<String>("model"), Err(ParamError::Type { .. })));
	}

	#[test]
	fn take_preserves_order() {
		let mut p = params();
		assert_eq!(p.take("epochs"), Some(Value::Int(3)));
		assert_eq!(p.iter().map(|(k, _)| k).collect::<Vec<_>>(), vec!["lr", "name", "momentum"]);
	}
}
