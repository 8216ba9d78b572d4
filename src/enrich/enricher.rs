use super::flags::EnrichmentFlags;
use super::strategies::default_enrichment_registry;
use super::strategy::{EnrichmentContext, EnrichmentRegistry};
use crate::assembler::{fingerprint, GeneratedProject};
use crate::error::{Result, UpgError};
use crate::introspect::FileIntrospector;
use crate::rng::SeededRng;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// A project after Pass 2, with the diff against its source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedProject {
    #[serde(flatten)]
    pub project: GeneratedProject,
    pub enriched: bool,
    /// Enrichment strategy ids in application order.
    pub strategies_applied: Vec<String>,
    pub flags: EnrichmentFlags,
    /// Paths absent from the source project.
    pub files_added: Vec<String>,
    /// Paths present in the source whose content changed.
    pub files_modified: Vec<String>,
    pub duration_ms: u64,
}

/// Pass 2: runs matching enrichment strategies over a copy of a project.
///
/// Randomness comes from `SeededRng::new(seed).fork()`, so the same seed and
/// flags reproduce the same output without replaying Pass 1's sequence.
#[derive(Clone)]
pub struct ProjectEnricher {
    registry: Arc<EnrichmentRegistry>,
}

impl ProjectEnricher {
    pub fn new(registry: Arc<EnrichmentRegistry>) -> Self {
        Self { registry }
    }

    /// Built-in enrichment strategies.
    pub fn standard() -> Self {
        Self::new(Arc::new(default_enrichment_registry()))
    }

    pub fn registry(&self) -> &EnrichmentRegistry {
        &self.registry
    }

    pub async fn enrich(
        &self,
        project: &GeneratedProject,
        flags: &EnrichmentFlags,
    ) -> Result<EnrichedProject> {
        let start = Instant::now();
        let seed = project.seed;
        let stack = project.stack;
        debug!(seed, flags = %flags, "Starting enrichment");

        let source = FileIntrospector::for_build_tool(&project.files, stack.build_tool);
        let mut rng = SeededRng::new(seed).fork();
        let mut files = project.files.clone();
        let mut strategies_applied = Vec::new();

        for strategy in self.registry.matching(&stack, flags) {
            let strategy_id = strategy.id().to_string();
            debug!(seed, strategy = %strategy_id, "Applying enrichment");

            let mut ctx = EnrichmentContext {
                seed,
                project_name: &project.name,
                stack: &stack,
                flags,
                source: &source,
                files: &mut files,
                rng: &mut rng,
            };
            strategy
                .apply(&mut ctx)
                .await
                .map_err(|source| UpgError::Enrichment {
                    seed,
                    strategy_id: strategy_id.clone(),
                    stack: stack.to_partial(),
                    source,
                })?;
            strategies_applied.push(strategy_id);
        }

        let mut files_added = Vec::new();
        let mut files_modified = Vec::new();
        for (path, content) in &files {
            match project.files.get(path) {
                None => files_added.push(path.clone()),
                Some(before) if before != content => files_modified.push(path.clone()),
                Some(_) => {}
            }
        }

        let mut enriched = project.clone();
        enriched
            .metadata
            .constraints_applied
            .extend(strategies_applied.iter().map(|id| format!("enrich:{id}")));
        enriched.metadata.fingerprint = fingerprint(&files);
        enriched.files = files;

        let duration_ms = start.elapsed().as_millis() as u64;
        info!(
            seed,
            id = %enriched.id,
            strategies = strategies_applied.len(),
            added = files_added.len(),
            modified = files_modified.len(),
            elapsed_ms = duration_ms,
            "Enriched project"
        );

        Ok(EnrichedProject {
            project: enriched,
            enriched: true,
            strategies_applied,
            flags: *flags,
            files_added,
            files_modified,
            duration_ms,
        })
    }
}

impl Default for ProjectEnricher {
    fn default() -> Self {
        Self::standard()
    }
}

impl std::fmt::Debug for ProjectEnricher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProjectEnricher")
            .field("registry", &self.registry)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assembler::{GenerateOptions, ProjectAssembler};
    use crate::enrich::{EnrichmentFlag, EnrichmentStrategy};
    use crate::stack::{CicdId, DimensionValue, PartialStack, TechStack};
    use async_trait::async_trait;

    struct Touch {
        id: &'static str,
        path: &'static str,
        fail: bool,
    }

    #[async_trait]
    impl EnrichmentStrategy for Touch {
        fn id(&self) -> &str {
            self.id
        }

        fn name(&self) -> &str {
            self.id
        }

        fn matches(&self, _stack: &TechStack, _flags: &EnrichmentFlags) -> bool {
            true
        }

        async fn apply(&self, ctx: &mut EnrichmentContext<'_>) -> anyhow::Result<()> {
            let token = ctx.rng.string(8);
            ctx.write(self.path, token);
            if self.fail {
                anyhow::bail!("cannot enrich");
            }
            Ok(())
        }
    }

    async fn project(seed: u64) -> GeneratedProject {
        let overrides = PartialStack::from_values([DimensionValue::Cicd(CicdId::GithubActions)]);
        ProjectAssembler::standard()
            .generate(seed, &GenerateOptions::with_overrides(overrides))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_diff_partitions_added_and_modified() {
        let source = project(31).await;
        let registry = EnrichmentRegistry::new()
            .with(Touch { id: "add", path: "NEW.md", fail: false })
            .with(Touch { id: "modify", path: "README.md", fail: false });
        let enricher = ProjectEnricher::new(Arc::new(registry));

        let result = enricher.enrich(&source, &EnrichmentFlags::none()).await.unwrap();
        assert_eq!(result.files_added, vec!["NEW.md".to_string()]);
        assert_eq!(result.files_modified, vec!["README.md".to_string()]);
        assert_eq!(result.strategies_applied, vec!["add", "modify"]);
        assert!(result
            .project
            .metadata
            .constraints_applied
            .ends_with(&["enrich:add".to_string(), "enrich:modify".to_string()]));
        assert_ne!(result.project.metadata.fingerprint, source.metadata.fingerprint);
        assert_ne!(source.file("README.md"), result.project.file("README.md"));
    }

    #[tokio::test]
    async fn test_failure_aborts_without_partial_output() {
        let source = project(32).await;
        let registry = EnrichmentRegistry::new()
            .with(Touch { id: "ok", path: "A.md", fail: false })
            .with(Touch { id: "broken", path: "B.md", fail: true });
        let enricher = ProjectEnricher::new(Arc::new(registry));

        let err = enricher.enrich(&source, &EnrichmentFlags::none()).await.unwrap_err();
        match err {
            UpgError::Enrichment { seed, strategy_id, .. } => {
                assert_eq!(seed, 32);
                assert_eq!(strategy_id, "broken");
            }
            other => panic!("unexpected error {other}"),
        }
        assert!(source.file("A.md").is_none());
    }

    #[tokio::test]
    async fn test_forked_rng_is_reproducible_and_distinct_from_pass_one() {
        let source = project(33).await;
        let registry = EnrichmentRegistry::new().with(Touch { id: "add", path: "token.txt", fail: false });
        let enricher = ProjectEnricher::new(Arc::new(registry));

        let a = enricher.enrich(&source, &EnrichmentFlags::none()).await.unwrap();
        let b = enricher.enrich(&source, &EnrichmentFlags::none()).await.unwrap();
        assert_eq!(a.project.files, b.project.files);

        let pass_one = SeededRng::new(33).string(8);
        assert_ne!(a.project.file("token.txt"), Some(pass_one.as_str()));
    }

    #[tokio::test]
    async fn test_cicd_only_adds_workflow() {
        let source = project(34).await;
        let result = ProjectEnricher::standard()
            .enrich(&source, &EnrichmentFlags::only(EnrichmentFlag::Cicd))
            .await
            .unwrap();
        assert_eq!(result.files_added, vec![".github/workflows/ci.yml".to_string()]);
        assert!(result.files_modified.is_empty());
        assert_eq!(result.strategies_applied, vec!["ci"]);
    }
}
