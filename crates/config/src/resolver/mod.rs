//! Turns a config tree into constructed, cross-wired instances.
//!
//! Resolution is a recursive descent over the tree. Each object spec and each
//! reference target is resolved once and memoized by canonical path, so every
//! reference to `$model` yields the same instance the top-level `model` entry
//! holds. A stack of in-progress paths turns reference cycles into errors
//! instead of unbounded recursion.
//!
//! [`Resolver::resolve`] first runs the same descent as a dry run
//! ([`Resolver::plan`]). Only when the whole graph is valid does the build pass
//! invoke constructors, so a typo in one factory name never leaves half of the
//! collaborators constructed.

mod pass;
mod plan;

use std::path::Path;

use serde_json::Value as Json;
use trellis_registry::{Registry, Value};

use self::pass::{Mode, Pass};
pub use self::plan::{Plan, PlanStep};
use crate::env::{Environment, ProcessEnv};
use crate::error::{ConfigError, Result};
use crate::experiment::Experiment;
use crate::interpolate::interpolate;
use crate::node::ConfigNode;
use crate::parser::parse;


/// The outcome of one resolution pass.
#[derive(Clone, Debug)]
pub struct ResolvedGraph {
	root: Value,
}

impl ResolvedGraph {
	/// The resolved root: a map of top-level entries, or a single instance
	/// when the document root is an object spec.
	pub fn root(&self) -> &Value {
		&self.root
	}

	pub fn into_root(self) -> Value {
		self.root
	}
}

/// Resolves config trees against a [`Registry`].
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use trellis_config::{EnvMap, Resolver};
/// use trellis_registry::{Instance, Registry};
///
/// struct Encoder {
/// 	width: i64,
/// }
///
/// let mut builder = Registry::builder();
/// builder
/// 	.register("Encoder", |params| Ok(Instance::new(Encoder { width: params.int("width")? })))
/// 	.unwrap();
/// let registry = builder.build();
///
/// let env = EnvMap::new();
/// let experiment = Resolver::new(&registry)
/// 	.with_env(&env)
/// 	.load(&json!({"encoder": {"_name": "Encoder", "width": 64}}))
/// 	.unwrap();
/// assert_eq!(experiment.get_as::<Encoder>("encoder").unwrap().width, 64);
/// ```
#[derive(Clone, Copy)]
pub struct Resolver<'r> {
	registry: &'r Registry,
	env: &'r dyn Environment,
	autowire: bool,
}

impl<'r> Resolver<'r> {
	/// A resolver reading `$VAR` tokens from the process environment, with
	/// wiring by name enabled.
	pub fn new(registry: &'r Registry) -> Self {
		Self {
			registry,
			env: &ProcessEnv,
			autowire: true,
		}
	}

	/// Uses `env` for `$VAR` lookups.
	pub fn with_env(mut self, env: &'r dyn Environment) -> Self {
		self.env = env;
		self
	}

	/// Enables or disables filling declared parameters from same-named top-level entries.
	pub fn autowire(mut self, autowire: bool) -> Self {
		self.autowire = autowire;
		self
	}

	pub fn registry(&self) -> &'r Registry {
		self.registry
	}

	/// Parses and interpolates `document` without resolving it.
	pub fn prepare(&self, document: &Json) -> Result<ConfigNode> {
		interpolate(parse(document)?, self.env)
	}

	/// Dry run: validates the graph and returns its construction order
	/// without invoking any constructor.
	///
	/// Factories must be registered; see [`Resolver::plan_lenient`] for a
	/// check that reports unregistered factories instead of failing on them.
	pub fn plan(&self, root: &ConfigNode) -> Result<Plan> {
		self.plan_with(root, true)
	}

	/// Like [`Resolver::plan`], but records unregistered factories in the
	/// plan instead of failing. Their parameters are still validated.
	pub fn plan_lenient(&self, root: &ConfigNode) -> Result<Plan> {
		self.plan_with(root, false)
	}

	fn plan_with(&self, root: &ConfigNode, require_factories: bool) -> Result<Plan> {
		let mode = Mode::Plan {
			steps: Vec::new(),
			require_factories,
		};
		match Pass::new(root, self.registry, self.autowire, mode).run()? {
			(_, Mode::Plan { steps, .. }) => Ok(Plan::new(steps)),
			(_, Mode::Build) => Ok(Plan::default()),
		}
	}

	/// Constructs every object in `root`, sharing one instance per reference target.
	pub fn resolve(&self, root: &ConfigNode) -> Result<ResolvedGraph> {
		let _span = tracing::info_span!("resolve").entered();

		let plan = self.plan(root)?;
		tracing::debug!(objects = plan.len(), "plan validated");

		let (root, _) = Pass::new(root, self.registry, self.autowire, Mode::Build).run()?;
		Ok(ResolvedGraph { root })
	}

	/// Parses, interpolates and resolves `document`.
	pub fn load(&self, document: &Json) -> Result<Experiment> {
		let tree = self.prepare(document)?;
		Ok(Experiment::new(self.resolve(&tree)?))
	}

	/// Loads an experiment from JSON text.
	pub fn load_str(&self, text: &str) -> Result<Experiment> {
		let document: Json = serde_json::from_str(text)?;
		self.load(&document)
	}

	/// Loads an experiment from a JSON file.
	pub fn load_path(&self, path: impl AsRef<Path>) -> Result<Experiment> {
		let path = path.as_ref();
		let text = std::fs::read_to_string(path).map_err(|error| ConfigError::Io {
			path: path.to_path_buf(),
			error,
		})?;
		tracing::debug!(path = %path.display(), "loading experiment");
		self.load_str(&text)
	}
}

impl std::fmt::Debug for Resolver<'_> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Resolver")
			.field("factories", &self.registry.len())
			.field("autowire", &self.autowire)
			.finish_non_exhaustive()
	}
}
