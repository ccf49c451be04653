//! Process-wide registry.
//!
//! The global registry is frozen exactly once: either by [`install_global`] or,
//! failing that, on the first call to [`global`], from every factory submitted
//! with [`crate::submit_factory!`]. It is read-only afterwards.

use std::sync::OnceLock;

use crate::error::{RegistryError, Result};
use crate::registry::{Registry, RegistryBuilder};

static GLOBAL: OnceLock<Result<Registry>> = OnceLock::new();

/// Returns the process-wide registry, freezing it on first access.
///
/// A duplicate name among the inventory submissions is reported on every call.
pub fn global() -> Result<&'static Registry> {
	GLOBAL
		.get_or_init(|| {
			let mut builder = RegistryBuilder::new();
			builder.extend_inventory().inspect_err(|e| tracing::error!("factory registration failed: {e}"))?;
			let registry = builder.build();
			tracing::debug!(factories = registry.len(), "global registry frozen");
			Ok(registry)
		})
		.as_ref()
		.map_err(Clone::clone)
}

/// Freezes the process-wide registry from `builder` plus all inventory submissions.
///
/// Fails with [`RegistryError::AlreadyInitialized`] once the registry is frozen.
pub fn install_global(mut builder: RegistryBuilder) -> Result<&'static Registry> {
	if GLOBAL.get().is_some() {
		return Err(RegistryError::AlreadyInitialized);
	}
	builder.extend_inventory()?;
	GLOBAL.set(Ok(builder.build())).map_err(|_| RegistryError::AlreadyInitialized)?;
	global()
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::factory::{BoxError, ParamSpec};
	use crate::params::Params;
	use crate::value::{Instance, Value};

	struct Embedding {
		dim: i64,
	}

	fn build_embedding(params: Params) -> std::result::Result<Instance, BoxError> {
		Ok(Instance::new(Embedding { dim: params.int("dim")? }))
	}

	fn default_dim() -> Value {
		Value::Int(8)
	}

	static EMBEDDING_SIGNATURE: [ParamSpec; 1] = [ParamSpec::with_default("dim", default_dim)];

	crate::submit_factory!("GlobalTestEmbedding", build_embedding, signature: &EMBEDDING_SIGNATURE);

	#[test]
	fn global_collects_inventory() {
		let registry = global().unwrap();
		let factory = registry.lookup("GlobalTestEmbedding").unwrap();
		assert_eq!(factory.signature().map(<[ParamSpec]>::len), Some(1));

		let params: Params = [("dim".to_string(), Value::Int(16))].into_iter().collect();
		let instance = factory.construct(params).unwrap();
		assert_eq!(instance.downcast_ref::<Embedding>().map(|e| e.dim), Some(16));
	}

	#[test]
	fn install_after_freeze_fails() {
		global().unwrap();
		assert_eq!(install_global(RegistryBuilder::new()).unwrap_err(), RegistryError::AlreadyInitialized);
	}
}
