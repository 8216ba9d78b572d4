//! Pass 1: seed to generated project.

pub mod naming;
pub mod orchestrator;
pub mod project;
pub mod resolver;

pub use orchestrator::{GenerateOptions, ProjectAssembler};
pub use project::{fingerprint, GeneratedProject, ProjectMetadata};
pub use resolver::{Resolution, StackResolver};
