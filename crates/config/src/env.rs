//! Environment sources for `$VAR` interpolation.

use rustc_hash::FxHashMap as HashMap;

/// Where `$VAR` tokens are looked up.
pub trait Environment {
	/// The value of `name`, or `None` when it is unset.
	fn var(&self, name: &str) -> Option<String>;
}

impl<E: Environment + ?Sized> Environment for &E {
	fn var(&self, name: &str) -> Option<String> {
		(**self).var(name)
	}
}

/// The process environment. Non-unicode values count as unset.
#[derive(Clone, Copy, Debug, Default)]
pub struct ProcessEnv;

impl Environment for ProcessEnv {
	fn var(&self, name: &str) -> Option<String> {
		std::env::var(name).ok()
	}
}

/// Explicit substitution variables, optionally layered over the process environment.
#[derive(Clone, Debug, Default)]
pub struct EnvMap {
	vars: HashMap<String, String>,
	inherit: bool,
}

impl EnvMap {
	/// An empty map that does not consult the process environment.
	pub fn new() -> Self {
		Self::default()
	}

	/// Falls back to the process environment for names not set here.
	pub fn inherit_process(mut self, inherit: bool) -> Self {
		self.inherit = inherit;
		self
	}

	pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.set(name, value);
		self
	}

	pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
		self.vars.insert(name.into(), value.into());
	}

	pub fn len(&self) -> usize {
		self.vars.len()
	}

	pub fn is_empty(&self) -> bool {
		self.vars.is_empty()
	}
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for EnvMap {
	fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
		let mut env = Self::new();
		for (k, v) in iter {
			env.set(k, v);
		}
		env
	}
}

impl Environment for EnvMap {
	fn var(&self, name: &str) -> Option<String> {
		match self.vars.get(name) {
			Some(value) => Some(value.clone()),
			None if self.inherit => ProcessEnv.var(name),
			None => None,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn map_shadows_and_isolates() {
		let env = EnvMap::new().with("DATA_DIR", "/data");
		assert_eq!(env.var("DATA_DIR").as_deref(), Some("/data"));
		assert_eq!(env.var("TRELLIS_SURELY_UNSET_VARIABLE"), None);
	}

	#[test]
	fn inherit_falls_back_to_process() {
		let Some((name, value)) = std::env::vars().next() else {
			return;
		};
		assert_eq!(EnvMap::new().var(&name), None);
		assert_eq!(EnvMap::new().inherit_process(true).var(&name), Some(value.clone()));
		assert_eq!(EnvMap::new().with(name.clone(), "override").inherit_process(true).var(&name).as_deref(), Some("override"));
	}
}
