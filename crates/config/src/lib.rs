//! Declarative experiment configuration for trellis.
//!
//! An experiment is a JSON document whose entries describe the collaborators
//! of a run (datasets, models, optimizers, trainers) and how they are wired
//! together. Loading one goes through three stages:
//!
//! 1. **Parse** ([`parse`]): classify every node of the document into a
//!    [`ConfigNode`]. A mapping with a `_name` key is an object spec, a string
//!    like `$model.encoder` is a reference, a string containing `$VAR` or
//!    `${VAR:-default}` tokens is an environment template.
//! 2. **Interpolate** ([`interpolate`]): substitute environment variables so
//!    that no template survives into resolution.
//! 3. **Resolve** ([`Resolver`]): construct each object spec through its
//!    registered factory, dependencies first, sharing one instance per
//!    reference target.
//!
//! The result is an [`Experiment`], a read-only view of the top-level entries.
//!
//! ```json
//! {
//!     "model": {"_name": "MLP", "hidden": [64, 32]},
//!     "optimizer": {"_name": "Adam", "params": "$model", "lr": 0.001},
//!     "trainer": {
//!         "_name": "Trainer",
//!         "model": "$model",
//!         "optimizer": "$optimizer",
//!         "data": "${DATA_DIR:-./data}/train.csv"
//!     }
//! }
//! ```
//!
//! Here `trainer.model` and `optimizer.params` receive the very instance
//! stored under `model`.
//!
//! # Parameter keys
//!
//! Inside an object spec, a key ending in `_` passes its value through as raw
//! data (`"vocab_": {"_name": "x"}` gives parameter `vocab` a map, not an
//! object). Keys starting with a single `_` other than `_name` are reserved;
//! `__seed` spells a parameter named `_seed`.

pub mod env;
pub mod error;
pub mod experiment;
pub mod grammar;
pub mod interpolate;
pub mod node;
pub mod parser;
pub mod path;
pub mod resolver;

pub use env::{EnvMap, Environment, ProcessEnv};
pub use error::{ConfigError, Result};
pub use experiment::Experiment;
pub use interpolate::interpolate;
pub use node::{ConfigNode, FACTORY_KEY, ObjectSpec, Scalar, Template, TemplatePart};
pub use parser::parse;
pub use path::{ConfigPath, Reference, Segment};
pub use resolver::{Plan, PlanStep, ResolvedGraph, Resolver};
