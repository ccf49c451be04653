//! `trellis check`: validate an experiment without constructing it.

use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;
use trellis_config::{ConfigError, EnvMap, Plan, Resolver};
use trellis_registry::Registry;


/// How a document is checked.
#[derive(Debug, Clone)]
pub struct CheckOptions {
	pub env: EnvMap,
	/// Unregistered factories are errors instead of report entries.
	pub strict: bool,
	pub autowire: bool,
}

impl Default for CheckOptions {
	fn default() -> Self {
		Self {
			env: EnvMap::new().inherit_process(true),
			strict: false,
			autowire: true,
		}
	}
}

/// Result of checking one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckReport {
	pub file: PathBuf,
	/// Objects in construction order.
	pub objects: Vec<ObjectReport>,
	/// Factory names this binary does not register, sorted.
	pub unregistered: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ObjectReport {
	pub path: String,
	pub factory: String,
	pub registered: bool,
}

impl CheckReport {
	fn new(file: &Path, plan: &Plan) -> Self {
		let unregistered: BTreeSet<&str> = plan.unregistered().map(|step| step.factory.as_str()).collect();
		Self {
			file: file.to_path_buf(),
			objects: plan
				.steps()
				.iter()
				.map(|step| ObjectReport {
					path: step.path.to_string(),
					factory: step.factory.clone(),
					registered: step.registered,
				})
				.collect(),
			unregistered: unregistered.into_iter().map(str::to_string).collect(),
		}
	}

	pub fn is_clean(&self) -> bool {
		self.unregistered.is_empty()
	}

	pub fn render_text(&self) -> String {
		self.to_string()
	}
}

impl fmt::Display for CheckReport {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		writeln!(f, "{}: {} object(s) in construction order", self.file.display(), self.objects.len())?;
		for (i, object) in self.objects.iter().enumerate() {
			let marker = if object.registered { "" } else { "  [unregistered]" };
			writeln!(f, "{:>4}. {} <- {}{marker}", i + 1, object.path, object.factory)?;
		}
		if !self.unregistered.is_empty() {
			writeln!(f, "unregistered factories: {}", self.unregistered.join(", "))?;
		}
		Ok(())
	}
}

/// Reads, interpolates and plans the document at `file`.
pub fn check(file: &Path, options: &CheckOptions, registry: &Registry) -> trellis_config::Result<CheckReport> {
	let text = std::fs::read_to_string(file).map_err(|error| ConfigError::Io {
		path: file.to_path_buf(),
		error,
	})?;
	let document: serde_json::Value = serde_json::from_str(&text)?;

	let resolver = Resolver::new(registry).with_env(&options.env).autowire(options.autowire);
	let tree = resolver.prepare(&document)?;
	let plan = if options.strict {
		resolver.plan(&tree)?
	} else {
		resolver.plan_lenient(&tree)?
	};

	tracing::debug!(file = %file.display(), objects = plan.len(), "checked experiment");
	Ok(CheckReport::new(file, &plan))
}
