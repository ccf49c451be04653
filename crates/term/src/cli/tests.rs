use pretty_assertions::assert_eq;

use super::*;

fn check_args(args: &[&str]) -> CheckArgs {
	let cli = Cli::try_parse_from(std::iter::once("trellis").chain(args.iter().copied())).unwrap();
	match cli.command {
		Command::Check(args) => args,
		other => panic!("expected check, got {other:?}"),
	}
}

#[test]
fn parse_env_pairs() {
	assert_eq!(parse_env_pair("DATA_DIR=/data"), Ok(("DATA_DIR".to_string(), "/data".to_string())));
	assert_eq!(parse_env_pair("QUERY=a=b"), Ok(("QUERY".to_string(), "a=b".to_string())));
	assert_eq!(parse_env_pair("EMPTY="), Ok(("EMPTY".to_string(), String::new())));
}

#[test]
fn reject_bad_env_pairs() {
	assert!(parse_env_pair("DATA_DIR").is_err());
	assert!(parse_env_pair("data_dir=/x").is_err());
	assert!(parse_env_pair("=x").is_err());
}

#[test]
fn check_defaults() {
	let args = check_args(&["check", "exp.json"]);
	assert_eq!(args.file, PathBuf::from("exp.json"));
	assert!(args.env.is_empty());
	assert!(!args.isolated && !args.strict && !args.no_autowire);
	assert_eq!(args.format, Format::Text);
}

#[test]
fn check_with_options() {
	let args = check_args(&["check", "exp.json", "-e", "A=1", "--env", "B=2", "--strict", "--format", "json", "--isolated"]);
	assert_eq!(args.env, vec![("A".to_string(), "1".to_string()), ("B".to_string(), "2".to_string())]);
	assert!(args.strict && args.isolated);
	assert_eq!(args.format, Format::Json);
}

#[test]
fn verbose_is_global() {
	let cli = Cli::try_parse_from(["trellis", "check", "exp.json", "-v"]).unwrap();
	assert!(cli.verbose);
}

#[test]
fn bad_env_fails_to_parse() {
	assert!(Cli::try_parse_from(["trellis", "check", "exp.json", "--env", "lower=1"]).is_err());
}
