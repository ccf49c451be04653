//! Registry error types.

use thiserror::Error;

/// Errors raised while populating or querying a registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
	/// A factory with this name was already registered and override was not requested.
	#[error("factory '{name}' is already registered; use register_override to replace it")]
	DuplicateName {
		/// The contested factory name.
		name: String,
	},

	/// No factory is registered under this name.
	#[error("unknown factory '{name}'{}", did_you_mean(.suggestion))]
	UnknownFactory {
		/// The name that was looked up.
		name: String,
		/// Closest registered name, if any is similar enough.
		suggestion: Option<String>,
	},

	/// The process-wide registry was already frozen.
	#[error("global registry is already initialized; register factories before the first resolution")]
	AlreadyInitialized,
}

fn did_you_mean(suggestion: &Option<String>) -> String {
	match suggestion {
		Some(name) => format!(" (did you mean '{name}'?)"),
		None => String::new(),
	}
}

/// Result type for registry operations.
pub type Result<T> = std::result::Result<T, RegistryError>;
