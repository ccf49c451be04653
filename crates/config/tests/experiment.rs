#![allow(unused_crate_dependencies)]

//! End-to-end loading through the process-wide registry.

use std::io::Write;
use std::sync::Arc;

use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::json;
use trellis_config::{ConfigError, EnvMap, Experiment, Resolver};
use trellis_registry::{BoxError, Instance, ParamSpec, Params, Value, global};

#[derive(Debug)]
struct Mlp {
	hidden: Vec<i64>,
}

struct Adam {
	model: Arc<Mlp>,
	lr: f64,
}

struct Trainer {
	model: Arc<Mlp>,
	optimizer: Arc<Adam>,
	data: String,
	epochs: i64,
}

fn build_mlp(params: Params) -> Result<Instance, BoxError> {
	let hidden = params
		.list("hidden")?
		.iter()
		.map(|v| v.as_int().ok_or("hidden sizes must be integers"))
		.collect::<Result<_, _>>()?;
	Ok(Instance::new(Mlp { hidden }))
}

fn build_adam(params: Params) -> Result<Instance, BoxError> {
	Ok(Instance::new(Adam {
		model: params.object("params")?,
		lr: params.float("lr")?,
	}))
}

fn build_trainer(params: Params) -> Result<Instance, BoxError> {
	Ok(Instance::new(Trainer {
		model: params.object("model")?,
		optimizer: params.object("optimizer")?,
		data: params.str("data")?.to_string(),
		epochs: params.int("epochs")?,
	}))
}

fn default_lr() -> Value {
	Value::Float(1e-3)
}

static ADAM: [ParamSpec; 2] = [ParamSpec::required("params"), ParamSpec::with_default("lr", default_lr)];

trellis_registry::submit_factory!("MLP", build_mlp);
trellis_registry::submit_factory!("Adam", build_adam, signature: &ADAM);
trellis_registry::submit_factory!("Trainer", build_trainer);

fn document() -> serde_json::Value {
	json!({
		"epochs": 5,
		"model": {"_name": "MLP", "hidden": [64, 32]},
		"optimizer": {"_name": "Adam", "params": "$model"},
		"trainer": {
			"_name": "Trainer",
			"model": "$model",
			"optimizer": "$optimizer",
			"data": "${DATA_DIR:-./data}/train.csv",
			"epochs": "$epochs",
		},
	})
}

#[test]
fn resolves_with_global_registry() {
	let env = EnvMap::new().with("DATA_DIR", "/srv/data");
	let exp = Resolver::new(global().unwrap()).with_env(&env).load(&document()).unwrap();

	let model = exp.get_as::<Mlp>("model").unwrap();
	let optimizer = exp.get_as::<Adam>("optimizer").unwrap();
	let trainer = exp.get_as::<Trainer>("trainer").unwrap();

	assert_eq!(model.hidden, vec![64, 32]);
	assert_eq!(optimizer.lr, 1e-3);
	assert!(Arc::ptr_eq(&optimizer.model, &model));
	assert!(Arc::ptr_eq(&trainer.model, &model));
	assert!(Arc::ptr_eq(&trainer.optimizer, &optimizer));
	assert_eq!(trainer.data, "/srv/data/train.csv");
	assert_eq!(trainer.epochs, 5);
	assert_eq!(exp.keys().collect::<Vec<_>>(), vec!["epochs", "model", "optimizer", "trainer"]);
}

#[test]
fn env_default_applies_when_unset() {
	let env = EnvMap::new();
	let exp = Resolver::new(global().unwrap()).with_env(&env).load(&document()).unwrap();
	assert_eq!(exp.get_as::<Trainer>("trainer").unwrap().data, "./data/train.csv");
}

#[test]
fn loads_from_path() {
	let mut file = tempfile::NamedTempFile::new().unwrap();
	write!(file, "{}", json!({"model": {"_name": "MLP", "hidden": [8]}})).unwrap();

	let exp = Experiment::from_path(file.path()).unwrap();
	assert_eq!(exp.get_as::<Mlp>("model").unwrap().hidden, vec![8]);
}

#[test]
fn missing_file_is_io_error() {
	let dir = tempfile::tempdir().unwrap();
	let path = dir.path().join("absent.json");
	match Experiment::from_path(&path) {
		Err(ConfigError::Io { path: reported, .. }) => assert_eq!(reported, path),
		other => panic!("expected I/O error, got {:?}", other.map(|exp| exp.len())),
	}
}

#[test]
fn invalid_json_is_json_error() {
	let env = EnvMap::new();
	let err = Resolver::new(global().unwrap()).with_env(&env).load_str("{\"model\": ").unwrap_err();
	assert!(matches!(err, ConfigError::Json(_)), "{err}");
}

#[rstest]
#[case::unknown_factory(json!({"m": {"_name": "Mlp"}}), "at `m`: unknown factory 'Mlp' (did you mean 'MLP'?)")]
#[case::unresolved(json!({"o": {"_name": "Adam", "params": "$model"}}), "unresolved reference `$model` at `o.params` (via o -> o.params)")]
#[case::missing_env(json!({"m": {"_name": "MLP", "hidden": "$HIDDEN"}}), "environment variable `HIDDEN` is not set (referenced at `m.hidden`)")]
#[case::constructor(json!({"m": {"_name": "MLP", "hidden": ["wide"]}}), "failed to construct `m` (MLP): hidden sizes must be integers")]
#[case::param_type(json!({"m": {"_name": "MLP", "hidden": 3}}), "failed to construct `m` (MLP): parameter 'hidden' must be a list, got int")]
#[case::reserved(json!({"m": {"_name": "MLP", "_hidden": []}}), "malformed config at `m._hidden`: `_hidden` is a reserved key; write `__hidden` for a parameter named `_hidden`")]
fn reports_errors(#[case] document: serde_json::Value, #[case] message: &str) {
	let env = EnvMap::new();
	let err = Resolver::new(global().unwrap()).with_env(&env).load(&document).unwrap_err();
	assert_eq!(err.to_string(), message);
}
