pub mod commands;
pub mod files;
pub mod handlers;
pub mod output;

pub use commands::{CliArgs, Commands, EnrichArgs, GenerateArgs, InferArgs, SweepArgs};
pub use files::{load_project, write_project};
pub use output::{OutputFormat, OutputFormatter};
