use std::fmt;

use crate::path::ConfigPath;

/// One constructor invocation, recorded by a dry run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlanStep {
	/// Canonical path of the object spec.
	pub path: ConfigPath,
	/// Factory name from `_name`.
	pub factory: String,
	/// Whether the registry knows the factory.
	pub registered: bool,
}

/// Construction order of a configuration, dependencies first.
///
/// Each object spec appears once, however many references point at it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Plan {
	steps: Vec<PlanStep>,
}

impl Plan {
	pub(crate) fn new(steps: Vec<PlanStep>) -> Self {
		Self { steps }
	}

	pub fn steps(&self) -> &[PlanStep] {
		&self.steps
	}

	pub fn len(&self) -> usize {
		self.steps.len()
	}

	pub fn is_empty(&self) -> bool {
		self.steps.is_empty()
	}

	/// Factories the registry does not know, in first-use order.
	pub fn unregistered(&self) -> impl Iterator<Item = &PlanStep> {
		self.steps.iter().filter(|step| !step.registered)
	}

	/// Position of the step constructing `path`, if any.
	pub fn position(&self, path: &ConfigPath) -> Option<usize> {
		self.steps.iter().position(|step| step.path == *path)
	}
}

impl fmt::Display for Plan {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		for (i, step) in self.steps.iter().enumerate() {
			let marker = if step.registered { "" } else { " (unregistered)" };
			writeln!(f, "{:>3}. {} <- {}{marker}", i + 1, step.path, step.factory)?;
		}
		Ok(())
	}
}
