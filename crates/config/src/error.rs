//! Error types for experiment parsing and resolution.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;
use trellis_registry::{BoxError, RegistryError};

use crate::path::{ConfigPath, Reference};

/// Errors that abort parsing, interpolation or resolution of an experiment.
///
/// Every variant carries enough path context to find the offending key
/// without re-running the pass.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error reading an experiment file.
	#[error("I/O error reading {path}: {error}")]
	Io {
		/// Path to the file that failed to read.
		path: PathBuf,
		/// The underlying I/O error.
		error: std::io::Error,
	},

	/// Error parsing JSON syntax.
	#[error("JSON parse error: {0}")]
	Json(#[from] serde_json::Error),

	/// The document violates the configuration grammar.
	#[error("malformed config at `{path}`: {reason}")]
	MalformedConfig { path: ConfigPath, reason: String },

	/// A `$VAR` token names an unset variable and has no default.
	#[error("environment variable `{var}` is not set (referenced at `{path}`)")]
	MissingEnvironmentVariable { var: String, path: ConfigPath },

	/// `_name` selects a factory nobody registered.
	#[error("at `{path}`: {source}")]
	UnknownFactory {
		path: ConfigPath,
		#[source]
		source: RegistryError,
	},

	/// A reference points at a key that does not exist.
	#[error("unresolved reference `{reference}` at `{path}`{}", via(.chain))]
	UnresolvedReference {
		reference: Reference,
		path: ConfigPath,
		/// Paths being resolved when the reference was reached, outermost first.
		chain: Vec<ConfigPath>,
	},

	/// The reference graph contains a cycle.
	#[error("cyclic reference: {}", Chain(.cycle))]
	CyclicReference {
		/// The cycle, starting and ending at the same path.
		cycle: Vec<ConfigPath>,
	},

	/// Declared parameters that the document, the top level and the defaults all left unset.
	#[error("`{path}` ({factory}) is missing parameters: {}", join(.missing))]
	MissingParameters {
		path: ConfigPath,
		factory: String,
		missing: Vec<String>,
	},

	/// A parameter that the factory's signature does not declare.
	#[error("`{path}` ({factory}) does not accept parameter `{param}`")]
	UnexpectedParameter { path: ConfigPath, factory: String, param: String },

	/// A collaborator constructor failed.
	#[error("failed to construct `{path}` ({factory}): {source}")]
	Constructor {
		path: ConfigPath,
		factory: String,
		#[source]
		source: BoxError,
	},

	/// The process-wide registry could not be frozen.
	#[error("registry error: {0}")]
	Registry(#[from] RegistryError),

	/// A key that was never present in the experiment document.
	#[error("experiment has no entry `{0}`")]
	MissingEntry(String),

	/// An entry lookup on an experiment whose document root is an object spec.
	/// Such a root has parameters, not entries; it is reached through
	/// [`crate::Experiment::root`].
	#[error("experiment root is a `{factory}` object, not a mapping of entries; use `root()` instead of looking up `{key}`")]
	RootIsObject { key: String, factory: String },

	/// An entry exists but is not the requested kind.
	#[error("experiment entry `{key}` is {got}, expected {expected}")]
	EntryType {
		key: String,
		expected: &'static str,
		got: String,
	},
}

impl ConfigError {
	pub(crate) fn malformed(path: &ConfigPath, reason: impl Into<String>) -> Self {
		Self::MalformedConfig {
			path: path.clone(),
			reason: reason.into(),
		}
	}

	/// The config path the error points at, if it has one.
	pub fn path(&self) -> Option<&ConfigPath> {
		match self {
			Self::MalformedConfig { path, .. }
			| Self::MissingEnvironmentVariable { path, .. }
			| Self::UnknownFactory { path, .. }
			| Self::UnresolvedReference { path, .. }
			| Self::MissingParameters { path, .. }
			| Self::UnexpectedParameter { path, .. }
			| Self::Constructor { path, .. } => Some(path),
			Self::CyclicReference { cycle } => cycle.first(),
			_ => None,
		}
	}
}

struct Chain<'a>(&'a [ConfigPath]);

impl fmt::Display for Chain<'_> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		for (i, path) in self.0.iter().enumerate() {
			if i > 0 {
				f.write_str(" -> ")?;
			}
			write!(f, "{path}")?;
		}
		Ok(())
	}
}

fn join(names: &[String]) -> String {
	names.join(", ")
}

fn via(chain: &[ConfigPath]) -> String {
	if chain.is_empty() {
		String::new()
	} else {
		format!(" (via {})", Chain(chain))
	}
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;
