use super::flags::EnrichmentFlags;
use crate::introspect::FileIntrospector;
use crate::rng::SeededRng;
use crate::stack::TechStack;
use crate::strategy::ProjectFiles;
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// State handed to each enrichment strategy.
///
/// `source` views the project as it was before Pass 2 started; `files` is the
/// working copy strategies write into.
pub struct EnrichmentContext<'a> {
    pub seed: u64,
    pub project_name: &'a str,
    pub stack: &'a TechStack,
    pub flags: &'a EnrichmentFlags,
    pub source: &'a FileIntrospector<'a>,
    pub files: &'a mut ProjectFiles,
    pub rng: &'a mut SeededRng,
}

impl EnrichmentContext<'_> {
    pub fn write(&mut self, path: impl Into<String>, content: impl Into<String>) {
        self.files.insert(path.into(), content.into());
    }

    /// Writes only when nothing exists at `path` yet.
    pub fn write_if_absent(&mut self, path: &str, content: impl Into<String>) {
        if !self.files.contains_key(path) {
            self.files.insert(path.to_string(), content.into());
        }
    }

    pub fn has_file(&self, path: &str) -> bool {
        self.files.contains_key(path)
    }

    pub fn read(&self, path: &str) -> Option<&str> {
        self.files.get(path).map(String::as_str)
    }

    pub fn append(&mut self, path: &str, content: &str) {
        self.files
            .entry(path.to_string())
            .or_default()
            .push_str(content);
    }
}

/// A Pass-2 augmentation selected by stack and flags.
#[async_trait]
pub trait EnrichmentStrategy: Send + Sync {
    fn id(&self) -> &str;

    fn name(&self) -> &str;

    fn priority(&self) -> i32 {
        0
    }

    fn matches(&self, stack: &TechStack, flags: &EnrichmentFlags) -> bool;

    async fn apply(&self, ctx: &mut EnrichmentContext<'_>) -> Result<()>;
}

/// Enrichment strategies sorted by ascending priority, ties in registration
/// order.
#[derive(Clone, Default)]
pub struct EnrichmentRegistry {
    strategies: Vec<Arc<dyn EnrichmentStrategy>>,
}

impl EnrichmentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, strategy: Arc<dyn EnrichmentStrategy>) {
        self.strategies.push(strategy);
        self.strategies.sort_by_key(|s| s.priority());
    }

    pub fn with(mut self, strategy: impl EnrichmentStrategy + 'static) -> Self {
        self.register(Arc::new(strategy));
        self
    }

    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }

    pub fn ids(&self) -> Vec<&str> {
        self.strategies.iter().map(|s| s.id()).collect()
    }

    pub fn matching(
        &self,
        stack: &TechStack,
        flags: &EnrichmentFlags,
    ) -> Vec<Arc<dyn EnrichmentStrategy>> {
        self.strategies
            .iter()
            .filter(|s| s.matches(stack, flags))
            .cloned()
            .collect()
    }
}

impl std::fmt::Debug for EnrichmentRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnrichmentRegistry")
            .field("strategies", &self.ids())
            .finish()
    }
}
