//! Canonical paths into a config tree.

use std::fmt;

/// One step into a config node: a mapping/param key or a sequence index.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Segment {
	Key(String),
	Index(usize),
}

impl fmt::Display for Segment {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Key(key) => f.write_str(key),
			Self::Index(i) => write!(f, "{i}"),
		}
	}
}

/// Location of a node, from the document root.
///
/// Displayed dotted (`trainer.optimizer.0`), the same form a reference uses.
/// The root itself displays as `<root>`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct ConfigPath(Vec<Segment>);

impl ConfigPath {
	pub fn root() -> Self {
		Self::default()
	}

	pub fn from_segments(segments: Vec<Segment>) -> Self {
		Self(segments)
	}

	/// Splits a dotted path into keys, spelled as written.
	///
	/// A digit key addresses a sequence item once it meets a sequence, see
	/// [`crate::node::ConfigNode::child`].
	pub fn parse_dotted(dotted: &str) -> Self {
		Self(dotted.split('.').map(|seg| Segment::Key(seg.to_string())).collect())
	}

	pub fn is_root(&self) -> bool {
		self.0.is_empty()
	}

	pub fn segments(&self) -> &[Segment] {
		&self.0
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	pub fn child(&self, key: &str) -> Self {
		let mut segments = self.0.clone();
		segments.push(Segment::Key(key.to_string()));
		Self(segments)
	}

	pub fn index(&self, i: usize) -> Self {
		let mut segments = self.0.clone();
		segments.push(Segment::Index(i));
		Self(segments)
	}

	/// Returns a new path with `rest` appended.
	pub fn join(&self, rest: &[Segment]) -> Self {
		let mut segments = self.0.clone();
		segments.extend_from_slice(rest);
		Self(segments)
	}

	/// True if `self` is `other` or lies underneath it.
	pub fn starts_with(&self, other: &ConfigPath) -> bool {
		self.0.starts_with(&other.0)
	}
}

impl fmt::Display for ConfigPath {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		if self.0.is_empty() {
			return f.write_str("<root>");
		}
		for (i, seg) in self.0.iter().enumerate() {
			if i > 0 {
				f.write_str(".")?;
			}
			write!(f, "{seg}")?;
		}
		Ok(())
	}
}

/// A reference token as written in the document, e.g. `$model.encoder`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Reference(pub ConfigPath);

impl Reference {
	pub fn target(&self) -> &ConfigPath {
		&self.0
	}
}

impl fmt::Display for Reference {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "${}", self.0)
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;

	#[test]
	fn dotted_round_trip_display() {
		let path = ConfigPath::parse_dotted("trainer.layers.0.weight");
		assert_eq!(
			path.segments(),
			&[
				Segment::Key("trainer".into()),
				Segment::Key("layers".into()),
				Segment::Key("0".into()),
				Segment::Key("weight".into()),
			]
		);
		assert_eq!(path.to_string(), "trainer.layers.0.weight");
		assert_eq!(ConfigPath::root().to_string(), "<root>");
	}

	#[test]
	fn starts_with_ancestors() {
		let model = ConfigPath::root().child("model");
		let encoder = model.child("encoder");
		assert!(encoder.starts_with(&model));
		assert!(model.starts_with(&model));
		assert!(!model.starts_with(&encoder));
	}
}
