//! Sigil grammar for string leaves.
//!
//! A single `$` sigil serves both graph references and environment variables;
//! case tells them apart.
//!
//! - **Reference**: the whole string is `$` + an identifier starting with a
//!   lower-case letter or `_`, followed by any number of `.segment` parts
//!   (identifiers or decimal indices): `$model`, `$model.encoder`, `$layers.0`.
//! - **Environment variable**: anywhere in a string, `$NAME` where `NAME` is
//!   the maximal `[A-Za-z0-9_]` run and matches `[A-Z][A-Z0-9_]*`, or `${NAME}`.
//!   A fallback follows `:-`: in `${NAME:-default}` it runs to the closing
//!   brace, in `$NAME:-default` to the next whitespace or the end of the string.
//! - `$$` is a literal `$`. Every other `$` is literal text.

use crate::node::{Template, TemplatePart};
use crate::path::{ConfigPath, Reference};

#[cfg(test)]
mod tests;

/// Parses `s` as a reference if the whole string matches the reference grammar.
pub fn parse_reference(s: &str) -> Option<Reference> {
	let body = s.strip_prefix('$')?;
	let mut segments = body.split('.');
	let head = segments.next()?;
	if !is_reference_head(head) {
		return None;
	}
	if !segments.all(|seg| is_identifier(seg) || is_index(seg)) {
		return None;
	}
	Some(Reference(ConfigPath::parse_dotted(body)))
}

/// Splits `s` into literal text and environment-variable tokens.
pub fn parse_template(s: &str) -> Template {
	let mut parts = Vec::new();
	let mut text = String::new();
	let mut pos = 0;

	while let Some(offset) = s[pos..].find('$') {
		let at = pos + offset;
		text.push_str(&s[pos..at]);
		let after = &s[at + 1..];

		if after.starts_with('$') {
			text.push('$');
			pos = at + 2;
			continue;
		}

		if let Some((name, default, consumed)) = braced_var(after).or_else(|| bare_var(after)) {
			if !text.is_empty() {
				parts.push(TemplatePart::Text(std::mem::take(&mut text)));
			}
			parts.push(TemplatePart::Var {
				name: name.to_string(),
				default: default.map(str::to_string),
			});
			pos = at + 1 + consumed;
			continue;
		}

		text.push('$');
		pos = at + 1;
	}

	text.push_str(&s[pos..]);
	if !text.is_empty() {
		parts.push(TemplatePart::Text(text));
	}
	Template { segments: parts }
}

/// True for names that follow the environment-variable convention.
pub fn is_env_name(name: &str) -> bool {
	let mut bytes = name.bytes();
	matches!(bytes.next(), Some(b'A'..=b'Z')) && bytes.all(|b| matches!(b, b'A'..=b'Z' | b'0'..=b'9' | b'_'))
}

/// `{NAME}` or `{NAME:-default}` following the sigil. Returns the bytes consumed after `$`.
fn braced_var(after: &str) -> Option<(&str, Option<&str>, usize)> {
	let inner = after.strip_prefix('{')?;
	let close = inner.find('}')?;
	let inner = &inner[..close];
	let (name, default) = match inner.split_once(":-") {
		Some((name, default)) => (name, Some(default)),
		None => (inner, None),
	};
	is_env_name(name).then_some((name, default, close + 2))
}

/// `NAME` or `NAME:-default` following the sigil.
fn bare_var(after: &str) -> Option<(&str, Option<&str>, usize)> {
	let len = after.bytes().take_while(|b| b.is_ascii_alphanumeric() || *b == b'_').count();
	let name = &after[..len];
	if !is_env_name(name) {
		return None;
	}
	match after[len..].strip_prefix(":-") {
		Some(rest) => {
			let default_len = rest.find(char::is_whitespace).unwrap_or(rest.len());
			Some((name, Some(&rest[..default_len]), len + 2 + default_len))
		}
		None => Some((name, None, len)),
	}
}

fn is_reference_head(seg: &str) -> bool {
	let mut bytes = seg.bytes();
	matches!(bytes.next(), Some(b'a'..=b'z' | b'_')) && bytes.all(is_ident_byte)
}

fn is_identifier(seg: &str) -> bool {
	let mut bytes = seg.bytes();
	matches!(bytes.next(), Some(b) if b.is_ascii_alphabetic() || b == b'_') && bytes.all(is_ident_byte)
}

fn is_index(seg: &str) -> bool {
	!seg.is_empty() && seg.bytes().all(|b| b.is_ascii_digit())
}

fn is_ident_byte(b: u8) -> bool {
	b.is_ascii_alphanumeric() || b == b'_'
}
