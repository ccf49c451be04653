//! In-memory config tree.

use std::fmt;

use indexmap::IndexMap;
use trellis_registry::Value;

use crate::path::{Reference, Segment};

/// Reserved key selecting the factory of an object spec.
pub const FACTORY_KEY: &str = "_name";

/// A parsed configuration node.
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigNode {
	/// "Construct `factory` with these parameters."
	Object(ObjectSpec),
	/// Substituted with the resolved value of another node.
	Reference(Reference),
	Sequence(Vec<ConfigNode>),
	/// Plain nested mapping; resolves to a map of resolved values.
	Mapping(IndexMap<String, ConfigNode>),
	Scalar(Scalar),
	/// String still carrying environment tokens. Removed by interpolation.
	Template(Template),
	/// Verbatim data from a `key_` parameter.
	Literal(serde_json::Value),
}

impl ConfigNode {
	pub fn kind(&self) -> &'static str {
		match self {
			Self::Object(_) => "object",
			Self::Reference(_) => "reference",
			Self::Sequence(_) => "sequence",
			Self::Mapping(_) => "mapping",
			Self::Scalar(_) => "scalar",
			Self::Template(_) => "template",
			Self::Literal(_) => "literal",
		}
	}

	/// The direct child addressed by `segment`, if any.
	///
	/// Keys address mapping entries and object params exactly as spelled, so
	/// `007` and `7` are different keys. On a sequence, a digit key is an item
	/// index (`01` is item 1).
	pub fn child(&self, segment: &Segment) -> Option<&ConfigNode> {
		match (self, segment) {
			(Self::Mapping(entries), Segment::Key(key)) => entries.get(key),
			(Self::Object(spec), Segment::Key(key)) => spec.params.get(key),
			(Self::Mapping(entries), Segment::Index(i)) => entries.get(&i.to_string()),
			(Self::Object(spec), Segment::Index(i)) => spec.params.get(&i.to_string()),
			(Self::Sequence(items), Segment::Index(i)) => items.get(*i),
			(Self::Sequence(items), Segment::Key(key)) => items.get(sequence_index(key)?),
			_ => None,
		}
	}

	/// The canonical form of `segment` for this node: sequence children are
	/// addressed by index, everything else by key.
	pub(crate) fn canonical_segment(&self, segment: &Segment) -> Segment {
		match (self, segment) {
			(Self::Sequence(_), Segment::Key(key)) => sequence_index(key).map_or_else(|| segment.clone(), Segment::Index),
			(Self::Sequence(_), seg) => seg.clone(),
			(_, Segment::Index(i)) => Segment::Key(i.to_string()),
			(_, seg) => seg.clone(),
		}
	}
}

fn sequence_index(key: &str) -> Option<usize> {
	if key.is_empty() || !key.bytes().all(|b| b.is_ascii_digit()) {
		return None;
	}
	key.parse().ok()
}

/// Instantiate `factory` with `params`.
#[derive(Clone, Debug, PartialEq)]
pub struct ObjectSpec {
	pub factory: String,
	pub params: IndexMap<String, ConfigNode>,
}

/// A primitive leaf.
#[derive(Clone, Debug, PartialEq)]
pub enum Scalar {
	Null,
	Bool(bool),
	Int(i64),
	/// An integer above `i64::MAX`.
	UInt(u64),
	Float(f64),
	String(String),
}

impl From<&Scalar> for Value {
	fn from(scalar: &Scalar) -> Self {
		match scalar {
			Scalar::Null => Value::Null,
			Scalar::Bool(b) => Value::Bool(*b),
			Scalar::Int(i) => Value::Int(*i),
			Scalar::UInt(u) => Value::UInt(*u),
			Scalar::Float(f) => Value::Float(*f),
			Scalar::String(s) => Value::String(s.clone()),
		}
	}
}

/// A string split into literal text and environment-variable tokens.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Template {
	pub segments: Vec<TemplatePart>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TemplatePart {
	Text(String),
	Var { name: String, default: Option<String> },
}

impl Template {
	/// Returns true if the template has at least one variable.
	pub fn has_vars(&self) -> bool {
		self.segments.iter().any(|s| matches!(s, TemplatePart::Var { .. }))
	}

	/// Concatenates the text parts, ignoring variables.
	pub fn text(&self) -> String {
		self.segments
			.iter()
			.filter_map(|s| match s {
				TemplatePart::Text(t) => Some(t.as_str()),
				TemplatePart::Var { .. } => None,
			})
			.collect()
	}
}

/// Renders the template back in its braced source form.
impl fmt::Display for Template {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		for part in &self.segments {
			match part {
				TemplatePart::Text(t) => f.write_str(&t.replace('$', "$$"))?,
				TemplatePart::Var { name, default: None } => write!(f, "${{{name}}}")?,
				TemplatePart::Var { name, default: Some(d) } => write!(f, "${{{name}:-{d}}}")?,
			}
		}
		Ok(())
	}
}
