//! Pluggable file generators applied by the assembler.

pub mod registry;

pub use registry::StrategyRegistry;

use crate::rng::SeededRng;
use crate::stack::TechStack;
use anyhow::Result;
use async_trait::async_trait;
use std::collections::BTreeMap;

/// Generated files keyed by relative path. Ordered so output is stable.
pub type ProjectFiles = BTreeMap<String, String>;

/// Mutable state handed to each strategy in turn.
pub struct GenerationContext<'a> {
    pub seed: u64,
    pub project_name: &'a str,
    pub stack: &'a TechStack,
    pub files: &'a mut ProjectFiles,
    pub rng: &'a mut SeededRng,
}

impl GenerationContext<'_> {
    pub fn write(&mut self, path: impl Into<String>, content: impl Into<String>) {
        self.files.insert(path.into(), content.into());
    }

    pub fn has_file(&self, path: &str) -> bool {
        self.files.contains_key(path)
    }

    /// Appends to an existing file or creates it.
    pub fn append(&mut self, path: &str, content: &str) {
        self.files
            .entry(path.to_string())
            .or_default()
            .push_str(content);
    }
}

/// A file generator for stacks it matches.
///
/// All matching strategies run in ascending priority; later ones may overwrite
/// files written by earlier ones.
#[async_trait]
pub trait GenerationStrategy: Send + Sync {
    fn id(&self) -> &str;

    fn name(&self) -> &str;

    fn priority(&self) -> i32 {
        0
    }

    fn matches(&self, stack: &TechStack) -> bool;

    async fn apply(&self, ctx: &mut GenerationContext<'_>) -> Result<()>;
}
