//! Environment-variable interpolation.
//!
//! Turns every [`ConfigNode::Template`] into a string [`Scalar`]. References,
//! literals and other scalars pass through untouched, so interpolating an
//! interpolated tree is a no-op.

use crate::env::Environment;
use crate::error::{ConfigError, Result};
use crate::node::{ConfigNode, ObjectSpec, Scalar, Template, TemplatePart};
use crate::path::ConfigPath;


/// Substitutes environment variables throughout `node`.
pub fn interpolate(node: ConfigNode, env: &dyn Environment) -> Result<ConfigNode> {
	interpolate_at(node, &ConfigPath::root(), env)
}

fn interpolate_at(node: ConfigNode, path: &ConfigPath, env: &dyn Environment) -> Result<ConfigNode> {
	Ok(match node {
		ConfigNode::Template(template) => {
			let rendered = render(&template, path, env)?;
			tracing::info!(%path, from = %template, to = %rendered, "updating parameter from environment");
			ConfigNode::Scalar(Scalar::String(rendered))
		}
		ConfigNode::Object(ObjectSpec { factory, params }) => ConfigNode::Object(ObjectSpec {
			factory,
			params: params
				.into_iter()
				.map(|(k, v)| interpolate_at(v, &path.child(&k), env).map(|v| (k, v)))
				.collect::<Result<_>>()?,
		}),
		ConfigNode::Mapping(entries) => ConfigNode::Mapping(
			entries
				.into_iter()
				.map(|(k, v)| interpolate_at(v, &path.child(&k), env).map(|v| (k, v)))
				.collect::<Result<_>>()?,
		),
		ConfigNode::Sequence(items) => ConfigNode::Sequence(
			items
				.into_iter()
				.enumerate()
				.map(|(i, item)| interpolate_at(item, &path.index(i), env))
				.collect::<Result<_>>()?,
		),
		leaf @ (ConfigNode::Reference(_) | ConfigNode::Scalar(_) | ConfigNode::Literal(_)) => leaf,
	})
}

/// Renders a template to its final string.
pub fn render(template: &Template, path: &ConfigPath, env: &dyn Environment) -> Result<String> {
	let mut out = String::new();
	for part in &template.segments {
		match part {
			TemplatePart::Text(text) => out.push_str(text),
			TemplatePart::Var { name, default } => match env.var(name).or_else(|| default.clone()) {
				Some(value) => out.push_str(&value),
				None => {
					return Err(ConfigError::MissingEnvironmentVariable {
						var: name.clone(),
						path: path.clone(),
					});
				}
			},
		}
	}
	Ok(out)
}
