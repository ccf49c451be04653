use pretty_assertions::assert_eq;

use super::*;
use crate::factory::ParamSpec;
use crate::value::Value;

struct Adam {
	lr: f64,
}

fn build_adam(params: Params) -> std::result::Result<Instance, BoxError> {
	Ok(Instance::new(Adam {
		lr: params.float_or("lr", 1e-3)?,
	}))
}

fn build_sgd(_: Params) -> std::result::Result<Instance, BoxError> {
	Ok(Instance::new("sgd"))
}

#[test]
fn test_register_and_lookup() {
	let mut builder = RegistryBuilder::new();
	builder.register("Adam", build_adam).unwrap();
	let registry = builder.build();

	let factory = registry.lookup("Adam").unwrap();
	let params: Params = [("lr".to_string(), Value::Float(0.1))].into_iter().collect();
	let instance = factory.construct(params).unwrap();

	assert_eq!(instance.factory(), "Adam");
	assert_eq!(instance.downcast_ref::<Adam>().map(|a| a.lr), Some(0.1));
}

#[test]
fn test_duplicate_name_rejected() {
	let mut builder = RegistryBuilder::new();
	builder.register("Adam", build_adam).unwrap();

	let err = builder.register("Adam", build_sgd).unwrap_err();
	assert_eq!(err, RegistryError::DuplicateName { name: "Adam".to_string() });

	// The first registration is untouched.
	let registry = builder.build();
	let instance = registry.lookup("Adam").unwrap().construct(Params::default()).unwrap();
	assert!(instance.downcast_ref::<Adam>().is_some());
}

#[test]
fn test_override_replaces() {
	let mut builder = RegistryBuilder::new();
	assert_eq!(builder.register_override(Factory::new("Opt", build_adam)), InsertAction::InsertedNew);
	assert_eq!(builder.register_override(Factory::new("Opt", build_sgd)), InsertAction::ReplacedExisting);
	assert_eq!(builder.len(), 1);

	let registry = builder.build();
	let instance = registry.lookup("Opt").unwrap().construct(Params::default()).unwrap();
	assert_eq!(instance.downcast_ref::<&str>(), Some(&"sgd"));
}

#[test]
fn test_unknown_factory_suggests_close_name() {
	let mut builder = RegistryBuilder::new();
	builder.register("Adam", build_adam).unwrap();
	builder.register("SGD", build_sgd).unwrap();
	let registry = builder.build();

	let err = registry.lookup("Adma").unwrap_err();
	assert_eq!(
		err,
		RegistryError::UnknownFactory {
			name: "Adma".to_string(),
			suggestion: Some("Adam".to_string()),
		}
	);
	assert_eq!(err.to_string(), "unknown factory 'Adma' (did you mean 'Adam'?)");

	let err = registry.lookup("CosineAnnealingLR").unwrap_err();
	assert_eq!(err.to_string(), "unknown factory 'CosineAnnealingLR'");
}

#[test]
fn test_names_sorted() {
	let mut builder = Registry::builder();
	builder.register("SGD", build_sgd).unwrap();
	builder.register("Adam", build_adam).unwrap();
	assert_eq!(builder.build().names(), vec!["Adam", "SGD"]);
}

#[test]
fn test_signature_kept() {
	let mut builder = RegistryBuilder::new();
	builder
		.insert(Factory::new("Adam", build_adam).with_signature(&[ParamSpec::required("params"), ParamSpec::with_default("lr", || Value::Float(1e-3))]))
		.unwrap();
	let registry = builder.build();

	let signature = registry.lookup("Adam").unwrap().signature().unwrap();
	assert_eq!(signature.iter().map(|p| p.name).collect::<Vec<_>>(), vec!["params", "lr"]);
	assert!(signature[0].is_required());
	assert_eq!(signature[1].default.map(|f| f()), Some(Value::Float(1e-3)));
}

#[test]
fn test_registry_is_shareable() {
	fn assert_send_sync<T: Send + Sync>() {}
	assert_send_sync::<Registry>();
}
