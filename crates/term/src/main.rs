//! trellis command-line tool.
//!
//! Checks experiment documents: parses them, substitutes environment
//! variables and plans construction without invoking any constructor.

#[allow(dead_code, reason = "fields are read by callers downcasting the built objects")]
mod builtin;
mod check;
mod cli;

use anyhow::Context;
use clap::Parser;
use trellis_config::EnvMap;

use crate::check::CheckOptions;
use crate::cli::{CheckArgs, Cli, Command, Format};

fn main() -> anyhow::Result<()> {
	let cli = Cli::parse();

	setup_tracing(cli.verbose);

	match cli.command {
		Command::Check(args) => run_check(args),
		Command::Factories => {
			for name in trellis_registry::global()?.names() {
				println!("{name}");
			}
			Ok(())
		}
	}
}

fn run_check(args: CheckArgs) -> anyhow::Result<()> {
	let env: EnvMap = args.env.into_iter().collect();
	let options = CheckOptions {
		env: env.inherit_process(!args.isolated),
		strict: args.strict,
		autowire: !args.no_autowire,
	};

	let registry = trellis_registry::global()?;
	let report = check::check(&args.file, &options, registry).with_context(|| format!("checking {}", args.file.display()))?;

	match args.format {
		Format::Text => print!("{}", report.render_text()),
		Format::Json => println!("{}", serde_json::to_string_pretty(&report)?),
	}
	if !report.is_clean() {
		tracing::warn!(count = report.unregistered.len(), "experiment uses factories this binary does not register");
	}
	Ok(())
}

fn setup_tracing(verbose: bool) {
	use tracing_subscriber::EnvFilter;

	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
		if verbose {
			EnvFilter::new("trellis=debug,trellis_config=debug,trellis_registry=debug,info")
		} else {
			EnvFilter::new("trellis_config=info,warn")
		}
	});

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.with_target(verbose)
		.init();
}
