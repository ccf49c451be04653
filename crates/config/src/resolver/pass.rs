//! One resolution pass: memoized recursive descent with a cycle guard.
//!
//! # Invariants
//!
//! - Every composite node (object, reference, sequence, mapping) is resolved at
//!   most once per pass and memoized under its canonical path. A reference to
//!   an already resolved path returns the memoized value, so all consumers of
//!   one object share one instance.
//! - A path is on `stack` exactly while it is being resolved. Reaching a path
//!   that is on the stack is a cycle.
//! - An object's parameters are fully resolved before its constructor runs.

use rustc_hash::FxHashMap as HashMap;
use trellis_registry::{ParamSpec, Params, Registry, Value, ValueMap};

use super::plan::PlanStep;
use crate::error::{ConfigError, Result};
use crate::node::{ConfigNode, ObjectSpec};
use crate::path::{ConfigPath, Reference, Segment};

/// What the pass does when it reaches an object spec.
pub(crate) enum Mode {
	/// Record the construction order without invoking constructors.
	Plan { steps: Vec<PlanStep>, require_factories: bool },
	/// Invoke constructors.
	Build,
}

pub(crate) struct Pass<'a> {
	root: &'a ConfigNode,
	registry: &'a Registry,
	autowire: bool,
	mode: Mode,
	memo: HashMap<ConfigPath, Value>,
	stack: Vec<ConfigPath>,
}

/// Outcome of walking a dotted path through the tree.
enum Walk<'a> {
	Found(ConfigPath, &'a ConfigNode),
	/// The walk crossed a reference node at `via` before the path ended.
	Redirect { via: ConfigPath, target: ConfigPath },
	Missing,
}

impl<'a> Pass<'a> {
	pub(crate) fn new(root: &'a ConfigNode, registry: &'a Registry, autowire: bool, mode: Mode) -> Self {
		Self {
			root,
			registry,
			autowire,
			mode,
			memo: HashMap::default(),
			stack: Vec::new(),
		}
	}

	/// Resolves the whole tree.
	pub(crate) fn run(mut self) -> Result<(Value, Mode)> {
		let root = self.root;
		let value = self.resolve_node(root, ConfigPath::root())?;
		tracing::debug!(memoized = self.memo.len(), "pass complete");
		Ok((value, self.mode))
	}

	fn resolve_node(&mut self, node: &'a ConfigNode, path: ConfigPath) -> Result<Value> {
		match node {
			ConfigNode::Scalar(scalar) => Ok(Value::from(scalar)),
			ConfigNode::Literal(json) => Ok(Value::from(json)),
			ConfigNode::Template(template) => Err(ConfigError::malformed(&path, format!("environment template `{template}` was not interpolated"))),
			ConfigNode::Reference(reference) => self.memoized(path, |pass, path| pass.resolve_reference(reference, path)),
			ConfigNode::Object(spec) => self.memoized(path, |pass, path| pass.build_object(spec, path)),
			ConfigNode::Sequence(items) => self.memoized(path, |pass, path| {
				let mut values = Vec::with_capacity(items.len());
				for (i, item) in items.iter().enumerate() {
					values.push(pass.resolve_node(item, path.index(i))?);
				}
				Ok(Value::List(values))
			}),
			ConfigNode::Mapping(entries) => self.memoized(path, |pass, path| {
				let mut values = ValueMap::with_capacity(entries.len());
				for (key, entry) in entries {
					values.insert(key.clone(), pass.resolve_node(entry, path.child(key))?);
				}
				Ok(Value::Map(values))
			}),
		}
	}

	fn memoized(&mut self, path: ConfigPath, build: impl FnOnce(&mut Self, &ConfigPath) -> Result<Value>) -> Result<Value> {
		if let Some(value) = self.memo.get(&path) {
			return Ok(value.clone());
		}
		if let Some(start) = self.stack.iter().position(|p| *p == path) {
			let mut cycle = self.stack[start..].to_vec();
			cycle.push(path);
			return Err(ConfigError::CyclicReference { cycle });
		}

		self.stack.push(path.clone());
		let result = build(self, &path);
		self.stack.pop();

		let value = result?;
		self.memo.insert(path, value.clone());
		Ok(value)
	}

	fn resolve_reference(&mut self, reference: &Reference, from: &ConfigPath) -> Result<Value> {
		let (target, node) = self.locate(reference, from)?;
		tracing::trace!(from = %from, target = %target, "following reference");
		self.resolve_node(node, target)
	}

	/// Finds the node a reference points at, following references crossed on the way.
	fn locate(&self, reference: &Reference, from: &ConfigPath) -> Result<(ConfigPath, &'a ConfigNode)> {
		let mut target = reference.target().clone();
		let mut crossed: Vec<ConfigPath> = Vec::new();
		loop {
			match walk(self.root, &target) {
				Walk::Found(path, node) => return Ok((path, node)),
				Walk::Missing => {
					return Err(ConfigError::UnresolvedReference {
						reference: reference.clone(),
						path: from.clone(),
						chain: self.stack.iter().filter(|p| !p.is_root()).cloned().collect(),
					});
				}
				Walk::Redirect { via, target: next } => {
					if crossed.contains(&via) {
						crossed.push(via);
						return Err(ConfigError::CyclicReference { cycle: crossed });
					}
					crossed.push(via);
					target = next;
				}
			}
		}
	}

	fn build_object(&mut self, spec: &'a ObjectSpec, path: &ConfigPath) -> Result<Value> {
		let registry = self.registry;
		let factory = match registry.lookup(&spec.factory) {
			Ok(factory) => Some(factory),
			Err(source) if self.requires_factories() => {
				return Err(ConfigError::UnknownFactory { path: path.clone(), source });
			}
			Err(_) => None,
		};
		let signature = factory.and_then(|f| f.signature());

		if let Some(signature) = signature
			&& let Some(param) = spec.params.keys().find(|name| !signature.iter().any(|p| p.name == name.as_str()))
		{
			return Err(ConfigError::UnexpectedParameter {
				path: path.clone(),
				factory: spec.factory.clone(),
				param: param.clone(),
			});
		}

		let mut values = ValueMap::with_capacity(spec.params.len());
		for (name, node) in &spec.params {
			values.insert(name.clone(), self.resolve_node(node, path.child(name))?);
		}
		if let Some(signature) = signature {
			self.fill_declared(signature, spec, path, &mut values)?;
		}

		match &mut self.mode {
			Mode::Plan { steps, .. } => {
				steps.push(PlanStep {
					path: path.clone(),
					factory: spec.factory.clone(),
					registered: factory.is_some(),
				});
				Ok(Value::Null)
			}
			Mode::Build => {
				let factory = registry.lookup(&spec.factory).map_err(|source| ConfigError::UnknownFactory { path: path.clone(), source })?;
				tracing::debug!(%path, factory = %spec.factory, "constructing");
				let instance = factory.construct(Params::new(values)).map_err(|source| ConfigError::Constructor {
					path: path.clone(),
					factory: spec.factory.clone(),
					source,
				})?;
				Ok(Value::Object(instance))
			}
		}
	}

	/// Fills declared parameters the document left out: by name from the top
	/// level, then from defaults. Reports every remaining required parameter.
	fn fill_declared(&mut self, signature: &[ParamSpec], spec: &ObjectSpec, path: &ConfigPath, values: &mut ValueMap) -> Result<()> {
		let mut missing = Vec::new();
		for param in signature {
			if values.contains_key(param.name) {
				continue;
			}
			if self.autowire
				&& let Some(value) = self.autowired(param.name, path)?
			{
				values.insert(param.name.to_string(), value);
				continue;
			}
			match param.default {
				Some(default) => {
					values.insert(param.name.to_string(), default());
				}
				None => missing.push(param.name.to_string()),
			}
		}

		if missing.is_empty() {
			Ok(())
		} else {
			Err(ConfigError::MissingParameters {
				path: path.clone(),
				factory: spec.factory.clone(),
				missing,
			})
		}
	}

	/// Resolves the top-level entry named `name`, unless wiring it would
	/// reference the object itself or something still under construction.
	fn autowired(&mut self, name: &str, path: &ConfigPath) -> Result<Option<Value>> {
		let target = ConfigPath::from_segments(vec![Segment::Key(name.to_string())]);
		if self.root.child(&target.segments()[0]).is_none() || path.starts_with(&target) || self.stack.contains(&target) {
			return Ok(None);
		}
		tracing::debug!(%path, param = name, "wiring parameter from top-level entry");
		self.resolve_reference(&Reference(target), &path.child(name)).map(Some)
	}

	fn requires_factories(&self) -> bool {
		match self.mode {
			Mode::Plan { require_factories, .. } => require_factories,
			Mode::Build => true,
		}
	}
}

fn walk<'a>(root: &'a ConfigNode, target: &ConfigPath) -> Walk<'a> {
	let segments = target.segments();
	let mut node = root;
	let mut canonical = Vec::with_capacity(segments.len());
	for (i, seg) in segments.iter().enumerate() {
		if let ConfigNode::Reference(inner) = node {
			return Walk::Redirect {
				via: ConfigPath::from_segments(canonical),
				target: inner.target().join(&segments[i..]),
			};
		}
		let Some(child) = node.child(seg) else {
			return Walk::Missing;
		};
		canonical.push(node.canonical_segment(seg));
		node = child;
	}
	Walk::Found(ConfigPath::from_segments(canonical), node)
}
