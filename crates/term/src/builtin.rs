//! Factories linked into the `trellis` binary.
//!
//! A small training stack so documents can be checked with `--strict` and
//! `trellis factories` has something to list. Applications embedding the
//! engine register their own components the same way.

use std::sync::Arc;

use trellis_registry::{BoxError, Instance, ParamSpec, Params, Value, submit_factory};

#[derive(Debug)]
pub struct Dataset {
	pub path: String,
	pub batch_size: i64,
}

#[derive(Debug)]
pub struct Linear {
	pub inputs: i64,
	pub outputs: i64,
}

#[derive(Debug)]
pub struct Sgd {
	pub params: Instance,
	pub lr: f64,
}

#[derive(Debug)]
pub struct Trainer {
	pub model: Instance,
	pub optimizer: Arc<Sgd>,
	pub data: Arc<Dataset>,
	pub epochs: i64,
}

fn build_dataset(params: Params) -> Result<Instance, BoxError> {
	Ok(Instance::new(Dataset {
		path: params.str("path")?.to_string(),
		batch_size: params.int("batch_size")?,
	}))
}

fn build_linear(params: Params) -> Result<Instance, BoxError> {
	Ok(Instance::new(Linear {
		inputs: params.int("inputs")?,
		outputs: params.int("outputs")?,
	}))
}

fn build_sgd(params: Params) -> Result<Instance, BoxError> {
	Ok(Instance::new(Sgd {
		params: params.instance("params")?.clone(),
		lr: params.float("lr")?,
	}))
}

fn build_trainer(params: Params) -> Result<Instance, BoxError> {
	Ok(Instance::new(Trainer {
		model: params.instance("model")?.clone(),
		optimizer: params.object("optimizer")?,
		data: params.object("data")?,
		epochs: params.int("epochs")?,
	}))
}

fn default_batch_size() -> Value {
	Value::Int(32)
}

fn default_lr() -> Value {
	Value::Float(0.01)
}

fn default_epochs() -> Value {
	Value::Int(1)
}

static DATASET_SIGNATURE: [ParamSpec; 2] = [
	ParamSpec::required("path"),
	ParamSpec::with_default("batch_size", default_batch_size),
];
static LINEAR_SIGNATURE: [ParamSpec; 2] = [ParamSpec::required("inputs"), ParamSpec::required("outputs")];
static SGD_SIGNATURE: [ParamSpec; 2] = [ParamSpec::required("params"), ParamSpec::with_default("lr", default_lr)];
static TRAINER_SIGNATURE: [ParamSpec; 4] = [
	ParamSpec::required("model"),
	ParamSpec::required("optimizer"),
	ParamSpec::required("data"),
	ParamSpec::with_default("epochs", default_epochs),
];

submit_factory!("Dataset", build_dataset, signature: &DATASET_SIGNATURE);
submit_factory!("Linear", build_linear, signature: &LINEAR_SIGNATURE);
submit_factory!("SGD", build_sgd, signature: &SGD_SIGNATURE);
submit_factory!("Trainer", build_trainer, signature: &TRAINER_SIGNATURE);

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;
	use serde_json::json;
	use trellis_config::{EnvMap, Resolver};

	use super::*;

	#[test]
	fn builtins_are_registered() {
		let names = trellis_registry::global().unwrap().names();
		for name in ["Dataset", "Linear", "SGD", "Trainer"] {
			assert!(names.contains(&name), "{name} missing from {names:?}");
		}
	}

	#[test]
	fn builtins_wire_a_training_run() {
		let document = json!({
			"data": {"_name": "Dataset", "path": "$DATA/train.csv"},
			"model": {"_name": "Linear", "inputs": 4, "outputs": 2},
			"optimizer": {"_name": "SGD", "params": "$model", "lr": 0.1},
			"trainer": {"_name": "Trainer", "epochs": 3},
		});
		let env = EnvMap::new().with("DATA", "/data");
		let exp = Resolver::new(trellis_registry::global().unwrap())
			.with_env(&env)
			.load(&document)
			.unwrap();

		let trainer = exp.get_as::<Trainer>("trainer").unwrap();
		assert_eq!(trainer.epochs, 3);
		assert_eq!(trainer.data.path, "/data/train.csv");
		assert_eq!(trainer.data.batch_size, 32);
		assert!(Arc::ptr_eq(&trainer.optimizer, &exp.get_as::<Sgd>("optimizer").unwrap()));
		assert!(trainer.model.ptr_eq(&trainer.optimizer.params));
	}
}
