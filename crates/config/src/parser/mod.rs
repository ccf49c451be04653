//! Document -> [`ConfigNode`] classification.
//!
//! # Rules
//!
//! - A mapping with `_name` is an object spec; its other keys are parameters.
//! - Parameter keys: `x_` passes the value of parameter `x` verbatim
//!   ([`ConfigNode::Literal`]); `__x` names parameter `_x`; any other key with a
//!   leading `_` is reserved.
//! - A mapping without `_name` is a plain mapping; its keys are taken as written.
//! - Strings follow the [`crate::grammar`] rules.

use indexmap::IndexMap;
use indexmap::map::Entry;
use serde_json::Value as Json;

use crate::error::{ConfigError, Result};
use crate::grammar::{parse_reference, parse_template};
use crate::node::{ConfigNode, FACTORY_KEY, ObjectSpec, Scalar};
use crate::path::ConfigPath;


/// Parses a whole experiment document.
///
/// The root must be a mapping or an object spec.
pub fn parse(document: &Json) -> Result<ConfigNode> {
	let root = ConfigPath::root();
	match document {
		Json::Object(_) => parse_node(document, &root),
		other => Err(ConfigError::malformed(&root, format!("document root must be a mapping, found {}", json_kind(other)))),
	}
}

/// Parses any sub-document located at `path`.
pub fn parse_node(value: &Json, path: &ConfigPath) -> Result<ConfigNode> {
	Ok(match value {
		Json::Null => ConfigNode::Scalar(Scalar::Null),
		Json::Bool(b) => ConfigNode::Scalar(Scalar::Bool(*b)),
		Json::Number(n) => ConfigNode::Scalar(match (n.as_i64(), n.as_u64()) {
			(Some(i), _) => Scalar::Int(i),
			(None, Some(u)) => Scalar::UInt(u),
			(None, None) => Scalar::Float(n.as_f64().unwrap_or(f64::NAN)),
		}),
		Json::String(s) => parse_string(s),
		Json::Array(items) => ConfigNode::Sequence(items.iter().enumerate().map(|(i, item)| parse_node(item, &path.index(i))).collect::<Result<_>>()?),
		Json::Object(map) => match map.get(FACTORY_KEY) {
			Some(Json::String(factory)) => ConfigNode::Object(parse_object(factory, map, path)?),
			Some(other) => {
				return Err(ConfigError::malformed(
					&path.child(FACTORY_KEY),
					format!("`{FACTORY_KEY}` must be a string, found {}", json_kind(other)),
				));
			}
			None => ConfigNode::Mapping(map.iter().map(|(k, v)| parse_node(v, &path.child(k)).map(|node| (k.clone(), node))).collect::<Result<_>>()?),
		},
	})
}

fn parse_string(s: &str) -> ConfigNode {
	if let Some(reference) = parse_reference(s) {
		return ConfigNode::Reference(reference);
	}
	let template = parse_template(s);
	if template.has_vars() {
		ConfigNode::Template(template)
	} else {
		ConfigNode::Scalar(Scalar::String(template.text()))
	}
}

fn parse_object(factory: &str, map: &serde_json::Map<String, Json>, path: &ConfigPath) -> Result<ObjectSpec> {
	let mut params: IndexMap<String, ConfigNode> = IndexMap::with_capacity(map.len().saturating_sub(1));
	let mut spelled: IndexMap<String, &str> = IndexMap::new();

	for (key, value) in map {
		if key == FACTORY_KEY {
			continue;
		}
		let (name, literal) = param_name(key).map_err(|reason| ConfigError::malformed(&path.child(key), reason))?;
		let node = if literal {
			ConfigNode::Literal(value.clone())
		} else {
			parse_node(value, &path.child(&name))?
		};

		match spelled.entry(name.clone()) {
			Entry::Occupied(first) => {
				return Err(ConfigError::malformed(
					&path.child(&name),
					format!("parameter `{name}` is given twice (as `{}` and `{key}`)", first.get()),
				));
			}
			Entry::Vacant(slot) => {
				slot.insert(key);
			}
		}
		params.insert(name, node);
	}

	Ok(ObjectSpec {
		factory: factory.to_string(),
		params,
	})
}

/// Maps a raw object key to `(parameter name, is_literal)`.
fn param_name(key: &str) -> std::result::Result<(String, bool), String> {
	let unescaped = match key.strip_prefix("__") {
		Some(rest) => format!("_{rest}"),
		None if key.starts_with('_') => {
			return Err(format!("`{key}` is a reserved key; write `_{key}` for a parameter named `{key}`"));
		}
		None => key.to_string(),
	};
	match unescaped.strip_suffix('_') {
		Some(name) if !name.is_empty() => Ok((name.to_string(), true)),
		_ => Ok((unescaped, false)),
	}
}

fn json_kind(value: &Json) -> &'static str {
	match value {
		Json::Null => "null",
		Json::Bool(_) => "a bool",
		Json::Number(_) => "a number",
		Json::String(_) => "a string",
		Json::Array(_) => "a list",
		Json::Object(_) => "a mapping",
	}
}
