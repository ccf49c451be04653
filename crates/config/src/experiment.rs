//! Read-only view over a resolved experiment.

use std::any::Any;
use std::ops::Index;
use std::path::Path;
use std::sync::Arc;

use serde_json::Value as Json;
use trellis_registry::{Value, ValueMap, global};

use crate::error::{ConfigError, Result};
use crate::resolver::{ResolvedGraph, Resolver};

/// A resolved experiment: top-level entries, constructed and cross-wired.
///
/// Entries are looked up by their key in the document. Nothing here mutates
/// the graph or resolves anything again.
#[derive(Clone, Debug)]
pub struct Experiment {
	graph: ResolvedGraph,
}

impl Experiment {
	pub fn new(graph: ResolvedGraph) -> Self {
		Self { graph }
	}

	/// Resolves `document` against the process-wide registry and environment.
	pub fn resolve(document: &Json) -> Result<Self> {
		Resolver::new(global()?).load(document)
	}

	/// Reads and resolves a JSON experiment file against the process-wide
	/// registry and environment.
	pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
		Resolver::new(global()?).load_path(path)
	}

	/// The resolved root. For a document whose root is itself an object spec
	/// this is the one constructed instance, and the map methods see no entries.
	pub fn root(&self) -> &Value {
		self.graph.root()
	}

	pub fn graph(&self) -> &ResolvedGraph {
		&self.graph
	}

	fn entries(&self) -> Option<&ValueMap> {
		self.graph.root().as_map()
	}

	/// The entry under `key`.
	///
	/// Fails with [`ConfigError::MissingEntry`] for a key the document never
	/// had, and with [`ConfigError::RootIsObject`] when the root is an object spec.
	pub fn get(&self, key: &str) -> Result<&Value> {
		match self.graph.root() {
			Value::Object(instance) => Err(ConfigError::RootIsObject {
				key: key.to_string(),
				factory: instance.factory().to_string(),
			}),
			root => root
				.as_map()
				.and_then(|entries| entries.get(key))
				.ok_or_else(|| ConfigError::MissingEntry(key.to_string())),
		}
	}

	/// The object instance under `key`, downcast to `T`.
	pub fn get_as<T: Any + Send + Sync>(&self, key: &str) -> Result<Arc<T>> {
		let value = self.get(key)?;
		value.downcast::<T>().ok_or_else(|| ConfigError::EntryType {
			key: key.to_string(),
			expected: std::any::type_name::<T>(),
			got: match value.as_object() {
				Some(instance) => instance.type_name().to_string(),
				None => value.type_name().to_string(),
			},
		})
	}

	pub fn contains_key(&self, key: &str) -> bool {
		self.entries().is_some_and(|entries| entries.contains_key(key))
	}

	/// Top-level keys in document order.
	pub fn keys(&self) -> impl Iterator<Item = &str> {
		self.entries().into_iter().flat_map(|entries| entries.keys().map(String::as_str))
	}

	pub fn values(&self) -> impl Iterator<Item = &Value> {
		self.entries().into_iter().flat_map(ValueMap::values)
	}

	pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
		self.entries()
			.into_iter()
			.flat_map(|entries| entries.iter().map(|(k, v)| (k.as_str(), v)))
	}

	pub fn len(&self) -> usize {
		self.entries().map_or(0, ValueMap::len)
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}
}

impl Index<&str> for Experiment {
	type Output = Value;

	/// # Panics
	///
	/// Panics if the experiment has no entry `key`. Use [`Experiment::get`]
	/// to handle missing entries.
	fn index(&self, key: &str) -> &Value {
		match self.get(key) {
			Ok(value) => value,
			Err(err) => panic!("{err}"),
		}
	}
}
