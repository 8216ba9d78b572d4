//! upg - Universal Project Generator
//!
//! Turns an integer seed into a complete, internally consistent software
//! project. Generation is a pure function of `(seed, options)`: the same
//! inputs yield byte-identical files on every run and every machine.
//!
//! # Core Concepts
//!
//! - **Tech stack**: twelve dimensions (archetype, language, runtime,
//!   framework, database, orm, transport, packaging, cicd, build tool,
//!   styling, testing), each a closed enum.
//! - **Pass 1 (generate)**: resolve a valid stack dimension by dimension with
//!   a [`SeededRng`], then let [`GenerationStrategy`] plugins write files.
//! - **Pass 2 (enrich)**: introspect a project and layer production concerns
//!   (CI, tests, linting, env files, docs, domain logic) on top.
//! - **Inference**: read an existing file set back into a stack.
//!
//! # Example Usage
//!
//! ```no_run
//! use upg::{GenerateOptions, ProjectAssembler};
//!
//! # async fn run() -> upg::Result<()> {
//! let assembler = ProjectAssembler::standard();
//! let project = assembler.generate(82910, &GenerateOptions::default()).await?;
//! println!("{} ({} files)", project.id, project.files.len());
//! # Ok(())
//! # }
//! ```
//!
//! # Project Structure
//!
//! - [`stack`]: dimension enums and the Universal Matrix
//! - [`constraints`]: rule tables and the [`ConstraintSolver`]
//! - [`assembler`]: Pass 1 orchestration
//! - [`enrich`]: Pass 2 orchestration and built-in enrichments
//! - [`inference`] and [`introspect`]: reading projects back
//! - [`registry`]: the seed registry manifest

pub mod assembler;
pub mod cli;
pub mod config;
pub mod constraints;
pub mod enrich;
pub mod error;
pub mod inference;
pub mod introspect;
pub mod manifest;
pub mod registry;
pub mod rng;
pub mod stack;
pub mod strategies;
pub mod strategy;
pub mod util;

pub use assembler::{GenerateOptions, GeneratedProject, ProjectAssembler, ProjectMetadata};
pub use config::{ConfigError, UpgConfig};
pub use constraints::{ConstraintSolver, ValidationResult, Violation};
pub use enrich::{
    EnrichDepth, EnrichedProject, EnrichmentFlag, EnrichmentFlags, EnrichmentStrategy,
    ProjectEnricher,
};
pub use error::{Result, UpgError};
pub use inference::{InferredStack, StackInferrer};
pub use introspect::FileIntrospector;
pub use registry::{RegistryEntry, RegistryManifest};
pub use rng::{RngError, SeededRng};
pub use stack::{Dimension, DimensionValue, PartialStack, TechStack, UniversalMatrix};
pub use strategy::{GenerationContext, GenerationStrategy, ProjectFiles, StrategyRegistry};
pub use util::{init_default, init_from_env, init_logging, LoggingConfig};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
