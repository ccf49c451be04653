//! Registry construction and lookup.
//!
//! # Role
//!
//! [`RegistryBuilder`] is the only mutable surface. [`RegistryBuilder::build`]
//! consumes it into a frozen [`Registry`], so registration can never happen
//! while a resolution pass is reading the table.
//!
//! # Duplicate policy
//!
//! [`RegistryBuilder::register`] and [`RegistryBuilder::insert`] reject a name
//! that is already taken. Replacing a factory requires the explicit
//! [`RegistryBuilder::register_override`] entry point.

use std::sync::Arc;

use rustc_hash::FxHashMap as HashMap;

use crate::error::{RegistryError, Result};
use crate::factory::{BoxError, Factory, FactoryReg};
use crate::params::Params;
use crate::value::Instance;

#[cfg(test)]
mod tests;

/// Largest edit distance for which an unknown name gets a suggestion.
const SUGGESTION_DISTANCE: usize = 3;

/// Result of a successful override registration.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum InsertAction {
	/// Name was new; factory inserted.
	InsertedNew,
	/// Name existed; replaced with the new factory.
	ReplacedExisting,
}

/// Mutable registry used during the initialization phase.
#[derive(Default)]
pub struct RegistryBuilder {
	factories: HashMap<Arc<str>, Factory>,
}

impl RegistryBuilder {
	pub fn new() -> Self {
		Self::default()
	}

	/// Returns the number of factories registered so far.
	pub fn len(&self) -> usize {
		self.factories.len()
	}

	/// Returns true if nothing has been registered yet.
	pub fn is_empty(&self) -> bool {
		self.factories.is_empty()
	}

	pub fn contains(&self, name: &str) -> bool {
		self.factories.contains_key(name)
	}

	/// Registers a constructor under `name`.
	pub fn register<F>(&mut self, name: &str, constructor: F) -> Result<()>
	where
		F: Fn(Params) -> std::result::Result<Instance, BoxError> + Send + Sync + 'static,
	{
		self.insert(Factory::new(name, constructor))
	}

	/// Registers a prepared factory, rejecting duplicate names.
	pub fn insert(&mut self, factory: Factory) -> Result<()> {
		if self.factories.contains_key(factory.name()) {
			return Err(RegistryError::DuplicateName {
				name: factory.name().to_string(),
			});
		}
		tracing::trace!(factory = factory.name(), "registered factory");
		self.factories.insert(Arc::clone(factory.shared_name()), factory);
		Ok(())
	}

	/// Registers a factory, replacing any existing one with the same name.
	pub fn register_override(&mut self, factory: Factory) -> InsertAction {
		match self.factories.insert(Arc::clone(factory.shared_name()), factory) {
			Some(previous) => {
				tracing::warn!(factory = previous.name(), "factory registration overridden");
				InsertAction::ReplacedExisting
			}
			None => InsertAction::InsertedNew,
		}
	}

	/// Registers every [`FactoryReg`] submitted through `inventory`.
	pub fn extend_inventory(&mut self) -> Result<()> {
		for reg in inventory::iter::<FactoryReg> {
			self.insert(reg.to_factory())?;
		}
		Ok(())
	}

	/// Freezes the builder into a read-only registry.
	pub fn build(self) -> Registry {
		Registry { factories: self.factories }
	}
}

/// Frozen, read-only factory table.
///
/// `Send + Sync`: concurrent resolvers may share one registry.
#[derive(Debug, Default)]
pub struct Registry {
	factories: HashMap<Arc<str>, Factory>,
}

impl Registry {
	pub fn builder() -> RegistryBuilder {
		RegistryBuilder::new()
	}

	pub fn len(&self) -> usize {
		self.factories.len()
	}

	pub fn is_empty(&self) -> bool {
		self.factories.is_empty()
	}

	pub fn contains(&self, name: &str) -> bool {
		self.factories.contains_key(name)
	}

	pub fn get(&self, name: &str) -> Option<&Factory> {
		self.factories.get(name)
	}

	/// Looks up a factory, suggesting a close name when it is missing.
	pub fn lookup(&self, name: &str) -> Result<&Factory> {
		self.factories.get(name).ok_or_else(|| RegistryError::UnknownFactory {
			name: name.to_string(),
			suggestion: self.suggest(name).map(str::to_string),
		})
	}

	/// Registered names in sorted order.
	pub fn names(&self) -> Vec<&str> {
		let mut names: Vec<&str> = self.factories.keys().map(|k| &**k).collect();
		names.sort_unstable();
		names
	}

	/// Suggests a registered name similar to `name`.
	pub fn suggest(&self, name: &str) -> Option<&str> {
		self.factories
			.keys()
			.map(|k| (strsim::levenshtein(name, k), &**k))
			.filter(|(distance, _)| *distance <= SUGGESTION_DISTANCE)
			.min()
			.map(|(_, k)| k)
	}
}
