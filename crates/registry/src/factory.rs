//! Factory descriptors.

use std::fmt;
use std::sync::Arc;

use crate::params::Params;
use crate::value::{Instance, Value};

/// Error type returned by collaborator constructors.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Uniform constructor interface: resolved parameters in, object out.
pub type Constructor = Arc<dyn Fn(Params) -> Result<Instance, BoxError> + Send + Sync>;

/// One declared constructor parameter.
#[derive(Clone, Copy, Debug)]
pub struct ParamSpec {
	pub name: &'static str,
	/// Produces the value used when the document leaves the parameter out.
	pub default: Option<fn() -> Value>,
}

impl ParamSpec {
	pub const fn required(name: &'static str) -> Self {
		Self { name, default: None }
	}

	pub const fn with_default(name: &'static str, default: fn() -> Value) -> Self {
		Self { name, default: Some(default) }
	}

	pub fn is_required(&self) -> bool {
		self.default.is_none()
	}
}

/// A named constructor, optionally with a declared signature.
///
/// Factories without a signature receive exactly the parameters written in the
/// document. With a signature, the resolver fills absent parameters (by name
/// from the document's top level, then from defaults) and rejects undeclared ones.
#[derive(Clone)]
pub struct Factory {
	name: Arc<str>,
	constructor: Constructor,
	signature: Option<Arc<[ParamSpec]>>,
}

impl Factory {
	pub fn new<F>(name: impl Into<Arc<str>>, constructor: F) -> Self
	where
		F: Fn(Params) -> Result<Instance, BoxError> + Send + Sync + 'static,
	{
		Self {
			name: name.into(),
			constructor: Arc::new(constructor),
			signature: None,
		}
	}

	pub fn with_signature(mut self, signature: &[ParamSpec]) -> Self {
		self.signature = Some(Arc::from(signature));
		self
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn signature(&self) -> Option<&[ParamSpec]> {
		self.signature.as_deref()
	}

	pub(crate) fn shared_name(&self) -> &Arc<str> {
		&self.name
	}

	/// Invokes the constructor and tags the result with this factory's name.
	pub fn construct(&self, params: Params) -> Result<Instance, BoxError> {
		(self.constructor)(params).map(|instance| instance.with_factory(&self.name))
	}
}

impl fmt::Debug for Factory {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Factory")
			.field("name", &self.name)
			.field("signature", &self.signature)
			.finish_non_exhaustive()
	}
}

/// Static registration record, submitted with [`crate::submit_factory!`].
pub struct FactoryReg {
	pub name: &'static str,
	pub construct: fn(Params) -> Result<Instance, BoxError>,
	pub signature: Option<&'static [ParamSpec]>,
}

inventory::collect!(FactoryReg);

impl FactoryReg {
	pub fn to_factory(&self) -> Factory {
		let factory = Factory::new(self.name, self.construct);
		match self.signature {
			Some(signature) => factory.with_signature(signature),
			None => factory,
		}
	}
}
