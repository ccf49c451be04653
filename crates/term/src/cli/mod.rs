//! CLI schema for the trellis binary.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use trellis_config::grammar::is_env_name;

#[cfg(test)]
mod tests;

#[derive(Parser, Debug)]
#[command(name = "trellis")]
#[command(about = "Validate declarative experiment configurations")]
#[command(version)]
/// Command-line arguments.
pub struct Cli {
	/// Verbose logging
	#[arg(short, long, global = true)]
	pub verbose: bool,

	/// Subcommand to execute.
	#[command(subcommand)]
	pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
	/// Parse, interpolate and plan an experiment without constructing anything
	Check(CheckArgs),
	/// List factories registered in this binary
	Factories,
}

/// Arguments of `trellis check`.
#[derive(clap::Args, Debug)]
pub struct CheckArgs {
	/// Experiment document (JSON)
	#[arg(value_name = "FILE")]
	pub file: PathBuf,

	/// Substitution variable, overriding the process environment
	#[arg(short, long = "env", value_name = "NAME=VALUE", value_parser = parse_env_pair)]
	pub env: Vec<(String, String)>,

	/// Ignore the process environment; only `--env` values are visible
	#[arg(long)]
	pub isolated: bool,

	/// Fail on factories this binary does not register
	#[arg(long)]
	pub strict: bool,

	/// Do not fill declared parameters from same-named top-level entries
	#[arg(long)]
	pub no_autowire: bool,

	/// Output format
	#[arg(long, value_enum, default_value_t = Format::Text)]
	pub format: Format,
}

/// Report formats.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
	Text,
	Json,
}

/// Parses `NAME=VALUE`. The value may be empty or contain `=`.
pub fn parse_env_pair(s: &str) -> Result<(String, String), String> {
	let (name, value) = s.split_once('=').ok_or_else(|| format!("expected NAME=VALUE, got `{s}`"))?;
	if !is_env_name(name) {
		return Err(format!("`{name}` is not an environment variable name (expected [A-Z][A-Z0-9_]*)"));
	}
	Ok((name.to_string(), value.to_string()))
}
