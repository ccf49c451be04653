//! Named factory registry for trellis experiments.
//!
//! Collaborator crates (datasets, models, optimizers, trainers) expose their
//! buildable components to the configuration engine by registering a
//! [`Factory`] under a string name. The engine looks factories up by the
//! `_name` field of an experiment document and hands each one a [`Params`]
//! map of already resolved [`Value`]s.
//!
//! # Initialization phase
//!
//! Registration happens on a [`RegistryBuilder`]. Building it yields a frozen
//! [`Registry`] that is read-only and can be shared across threads. The
//! process-wide registry returned by [`global`] is frozen on first access from
//! every [`FactoryReg`] submitted through [`submit_factory!`], or from a builder
//! passed to [`install_global`] before that first access.
//!
//! ```ignore
//! fn build_adam(params: Params) -> Result<Instance, BoxError> {
//!     Ok(Instance::new(Adam { lr: params.float_or("lr", 1e-3)? }))
//! }
//!
//! trellis_registry::submit_factory!("Adam", build_adam);
//! ```

mod error;
mod factory;
mod global;
mod params;
mod registry;
mod value;

pub use error::{RegistryError, Result};
pub use factory::{BoxError, Constructor, Factory, FactoryReg, ParamSpec};
pub use global::{global, install_global};
#[doc(hidden)]
pub use inventory;
pub use params::{ParamError, Params};
pub use registry::{InsertAction, Registry, RegistryBuilder};
pub use value::{Instance, Value, ValueMap};

/// Submits a static factory registration collected by [`global`].
///
/// The constructor must be a plain function `fn(Params) -> Result<Instance, BoxError>`.
/// An optional signature declares parameters and their defaults.
#[macro_export]
macro_rules! submit_factory {
	($name:literal, $construct:path $(,)?) => {
		$crate::inventory::submit! {
			$crate::FactoryReg { name: $name, construct: $construct, signature: None }
		}
	};
	($name:literal, $construct:path, signature: $signature:expr $(,)?) => {
		$crate::inventory::submit! {
			$crate::FactoryReg { name: $name, construct: $construct, signature: Some($signature) }
		}
	};
}
