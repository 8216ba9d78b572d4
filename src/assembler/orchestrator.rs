use super::naming::project_name;
use super::project::{fingerprint, GeneratedProject, ProjectMetadata};
use super::resolver::StackResolver;
use crate::constraints::ConstraintSolver;
use crate::error::{Result, UpgError};
use crate::rng::SeededRng;
use crate::stack::{PartialStack, UniversalMatrix};
use crate::strategies::default_registry;
use crate::strategy::{GenerationContext, ProjectFiles, StrategyRegistry};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Caller-supplied inputs besides the seed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GenerateOptions {
    /// Dimensions forced by the caller. They skip the draw but are still
    /// validated.
    pub overrides: PartialStack,
}

impl GenerateOptions {
    pub fn with_overrides(overrides: PartialStack) -> Self {
        Self { overrides }
    }
}

/// Seed to [`GeneratedProject`]: resolve, validate, name, dispatch strategies,
/// emit metadata.
///
/// Holds only shared read-only state, so one assembler can serve many seeds
/// concurrently.
#[derive(Clone)]
pub struct ProjectAssembler {
    solver: Arc<ConstraintSolver>,
    registry: Arc<StrategyRegistry>,
}

impl ProjectAssembler {
    pub fn new(solver: Arc<ConstraintSolver>, registry: Arc<StrategyRegistry>) -> Self {
        Self { solver, registry }
    }

    /// Standard matrix, rules and built-in strategies.
    pub fn standard() -> Self {
        let solver = ConstraintSolver::new(Arc::new(UniversalMatrix::standard()));
        Self::new(Arc::new(solver), Arc::new(default_registry()))
    }

    pub fn solver(&self) -> &ConstraintSolver {
        &self.solver
    }

    pub fn registry(&self) -> &StrategyRegistry {
        &self.registry
    }

    pub async fn generate(&self, seed: u64, options: &GenerateOptions) -> Result<GeneratedProject> {
        let start = Instant::now();
        debug!(seed, overrides = %options.overrides, "Starting generation");

        let mut rng = SeededRng::new(seed);
        let resolution = StackResolver::new(&self.solver).resolve(seed, &options.overrides, &mut rng)?;
        let stack = resolution.stack;
        let mut constraints_applied = resolution.constraints_applied;

        let name = project_name(&mut rng);
        let id = format!("{}-{}-{}", stack.language, stack.framework, seed);

        let mut files = ProjectFiles::new();
        let mut strategies_applied = Vec::new();
        for strategy in self.registry.matching(&stack) {
            let strategy_id = strategy.id().to_string();
            debug!(seed, strategy = %strategy_id, "Applying strategy");

            let mut ctx = GenerationContext {
                seed,
                project_name: &name,
                stack: &stack,
                files: &mut files,
                rng: &mut rng,
            };
            strategy
                .apply(&mut ctx)
                .await
                .map_err(|source| UpgError::Strategy {
                    seed,
                    strategy_id: strategy_id.clone(),
                    stack: stack.to_partial(),
                    source,
                })?;

            constraints_applied.push(format!("strategy:{strategy_id}"));
            strategies_applied.push(strategy_id);
        }

        let metadata = ProjectMetadata {
            upg_version: crate::VERSION.to_string(),
            strategies_applied,
            constraints_applied,
            fingerprint: fingerprint(&files),
        };

        info!(
            seed,
            id = %id,
            name = %name,
            files = files.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Generated project"
        );

        Ok(GeneratedProject {
            id,
            seed,
            name,
            files,
            stack,
            metadata,
        })
    }
}

impl std::fmt::Debug for ProjectAssembler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProjectAssembler")
            .field("registry", &self.registry)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stack::{ArchetypeId, DimensionValue, FrameworkId, LanguageId, TechStack};
    use crate::strategy::GenerationStrategy;
    use async_trait::async_trait;

    struct Failing;

    #[async_trait]
    impl GenerationStrategy for Failing {
        fn id(&self) -> &str {
            "failing"
        }

        fn name(&self) -> &str {
            "Always fails"
        }

        fn matches(&self, _stack: &TechStack) -> bool {
            true
        }

        async fn apply(&self, ctx: &mut GenerationContext<'_>) -> anyhow::Result<()> {
            ctx.write("partial.txt", "half");
            anyhow::bail!("boom")
        }
    }

    #[tokio::test]
    async fn test_generate_is_deterministic() {
        let assembler = ProjectAssembler::standard();
        let a = assembler.generate(1234, &GenerateOptions::default()).await.unwrap();
        let b = assembler.generate(1234, &GenerateOptions::default()).await.unwrap();
        assert_eq!(a, b);
        assert_eq!(a.metadata.fingerprint, b.metadata.fingerprint);
    }

    #[tokio::test]
    async fn test_id_and_metadata() {
        let assembler = ProjectAssembler::standard();
        let options = GenerateOptions::with_overrides(PartialStack::from_values([
            DimensionValue::Archetype(ArchetypeId::Backend),
            DimensionValue::Language(LanguageId::Rust),
        ]));
        let project = assembler.generate(82910, &options).await.unwrap();
        assert!(matches!(
            project.stack.framework,
            FrameworkId::Axum | FrameworkId::Actix
        ));
        assert_eq!(
            project.id,
            format!("rust-{}-82910", project.stack.framework)
        );
        assert_eq!(project.metadata.strategies_applied.first().map(String::as_str), Some("base"));
        assert!(project.metadata.strategies_applied.contains(&"rust".to_string()));
        assert!(project.files.contains_key("Cargo.toml"));
        assert!(project
            .metadata
            .constraints_applied
            .contains(&"strategy:rust".to_string()));
    }

    #[tokio::test]
    async fn test_strategy_failure_aborts_generation() {
        let registry = StrategyRegistry::new().with(Failing);
        let solver = ConstraintSolver::new(Arc::new(UniversalMatrix::standard()));
        let assembler = ProjectAssembler::new(Arc::new(solver), Arc::new(registry));

        let err = assembler
            .generate(9, &GenerateOptions::default())
            .await
            .unwrap_err();
        match err {
            UpgError::Strategy { seed, strategy_id, .. } => {
                assert_eq!(seed, 9);
                assert_eq!(strategy_id, "failing");
            }
            other => panic!("unexpected error {other}"),
        }
    }
}
