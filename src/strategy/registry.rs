use super::GenerationStrategy;
use crate::stack::TechStack;
use std::sync::Arc;

/// Ordered collection of generation strategies.
///
/// Strategies are kept sorted by ascending priority. Ties keep registration
/// order.
#[derive(Clone, Default)]
pub struct StrategyRegistry {
    strategies: Vec<Arc<dyn GenerationStrategy>>,
}

impl StrategyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, strategy: Arc<dyn GenerationStrategy>) {
        self.strategies.push(strategy);
        self.strategies.sort_by_key(|s| s.priority());
    }

    pub fn with(mut self, strategy: impl GenerationStrategy + 'static) -> Self {
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

    /// Strategies matching `stack`, in application order.
    pub fn matching(&self, stack: &TechStack) -> Vec<Arc<dyn GenerationStrategy>> {
        self.strategies
            .iter()
            .filter(|s| s.matches(stack))
            .cloned()
            .collect()
    }
}

impl std::fmt::Debug for StrategyRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StrategyRegistry")
            .field("strategies", &self.ids())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::GenerationContext;
    use async_trait::async_trait;

    struct Fixed {
        id: &'static str,
        priority: i32,
        matches: bool,
    }

    #[async_trait]
    impl GenerationStrategy for Fixed {
        fn id(&self) -> &str {
            self.id
        }

        fn name(&self) -> &str {
            self.id
        }

        fn priority(&self) -> i32 {
            self.priority
        }

        fn matches(&self, _stack: &TechStack) -> bool {
            self.matches
        }

        async fn apply(&self, _ctx: &mut GenerationContext<'_>) -> anyhow::Result<()> {
            Ok(())
        }
    }

    fn fixed(id: &'static str, priority: i32, matches: bool) -> Fixed {
        Fixed {
            id,
            priority,
            matches,
        }
    }

    #[test]
    fn test_sorted_by_priority_with_stable_ties() {
        let registry = StrategyRegistry::new()
            .with(fixed("late", 50, true))
            .with(fixed("first-tie", 10, true))
            .with(fixed("second-tie", 10, true))
            .with(fixed("early", 0, true));
        assert_eq!(registry.ids(), vec!["early", "first-tie", "second-tie", "late"]);
    }

    #[test]
    fn test_matching_filters() {
        use crate::stack::*;
        let registry = StrategyRegistry::new()
            .with(fixed("yes", 0, true))
            .with(fixed("no", 0, false));
        let stack = TechStack {
            archetype: ArchetypeId::Cli,
            language: LanguageId::Go,
            runtime: RuntimeId::Go,
            framework: FrameworkId::Cobra,
            database: DatabaseId::None,
            orm: OrmId::None,
            transport: TransportId::None,
            packaging: PackagingId::None,
            cicd: CicdId::None,
            build_tool: BuildToolId::GoModules,
            styling: StylingId::None,
            testing: TestingId::GoTest,
        };
        let matching = registry.matching(&stack);
        assert_eq!(matching.len(), 1);
        assert_eq!(matching[0].id(), "yes");
    }
}
