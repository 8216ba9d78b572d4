//! Built-in enrichment strategies, applied in this order:
//!
//! | priority | id | flag |
//! |---|---|---|
//! | 10 | logic | fillLogic |
//! | 20 | tests | tests |
//! | 30 | lint | linting |
//! | 40 | env | envFiles |
//! | 50 | docker-prod | dockerProd |
//! | 60 | ci | cicd |
//! | 70 | release | release |
//! | 90 | docs | docs |

pub mod ci;
pub mod docker;
pub mod docs;
pub mod env;
pub mod lint;
pub mod logic;
pub mod release;
pub mod test_suite;

pub use ci::CiStrategy;
pub use docker::DockerProductionStrategy;
pub use docs::DocsStrategy;
pub use env::EnvFileStrategy;
pub use lint::LintStrategy;
pub use logic::DomainLogicStrategy;
pub use release::ReleaseStrategy;
pub use test_suite::TestSuiteStrategy;

use super::strategy::EnrichmentRegistry;

pub fn default_enrichment_registry() -> EnrichmentRegistry {
    EnrichmentRegistry::new()
        .with(DomainLogicStrategy)
        .with(TestSuiteStrategy)
        .with(LintStrategy)
        .with(EnvFileStrategy)
        .with(DockerProductionStrategy)
        .with(CiStrategy)
        .with(ReleaseStrategy)
        .with(DocsStrategy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enrich::{EnrichmentFlag, EnrichmentFlags};
    use crate::stack::*;

    fn stack(packaging: PackagingId, cicd: CicdId) -> TechStack {
        TechStack {
            archetype: ArchetypeId::Backend,
            language: LanguageId::Python,
            runtime: RuntimeId::CPython,
            framework: FrameworkId::FastApi,
            database: DatabaseId::None,
            orm: OrmId::None,
            transport: TransportId::Rest,
            packaging,
            cicd,
            build_tool: BuildToolId::Uv,
            styling: StylingId::None,
            testing: TestingId::Pytest,
        }
    }

    #[test]
    fn test_registry_order() {
        let registry = default_enrichment_registry();
        assert_eq!(
            registry.ids(),
            vec!["logic", "tests", "lint", "env", "docker-prod", "ci", "release", "docs"]
        );
    }

    #[test]
    fn test_each_flag_selects_its_strategy() {
        let registry = default_enrichment_registry();
        let s = stack(PackagingId::Docker, CicdId::GitlabCi);
        for (flag, id) in [
            (EnrichmentFlag::FillLogic, "logic"),
            (EnrichmentFlag::Tests, "tests"),
            (EnrichmentFlag::Linting, "lint"),
            (EnrichmentFlag::EnvFiles, "env"),
            (EnrichmentFlag::DockerProd, "docker-prod"),
            (EnrichmentFlag::Cicd, "ci"),
            (EnrichmentFlag::Release, "release"),
            (EnrichmentFlag::Docs, "docs"),
        ] {
            let ids: Vec<String> = registry
                .matching(&s, &EnrichmentFlags::only(flag))
                .iter()
                .map(|strategy| strategy.id().to_string())
                .collect();
            assert_eq!(ids, vec![id.to_string()], "{flag}");
        }
    }

    #[test]
    fn test_stack_gates() {
        let registry = default_enrichment_registry();
        let s = stack(PackagingId::Serverless, CicdId::None);
        let flags = EnrichmentFlags::with_overrides(crate::enrich::EnrichDepth::Full, &[]);
        let ids: Vec<String> = registry
            .matching(&s, &flags)
            .iter()
            .map(|strategy| strategy.id().to_string())
            .collect();
        assert!(!ids.contains(&"ci".to_string()));
        assert!(!ids.contains(&"docker-prod".to_string()));
        assert!(ids.contains(&"release".to_string()));
    }
}
