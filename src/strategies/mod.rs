//! Built-in Pass-1 generation strategies.
//!
//! Application order by priority:
//!
//! | priority | strategies |
//! |---|---|
//! | 0 | base files |
//! | 10 | one skeleton per language family |
//! | 30 | data layer |
//! | 50 | packaging |

pub mod common;
pub mod data;
pub mod dotnet;
pub mod elixir;
pub mod go;
pub mod jvm;
pub mod native;
pub mod node;
pub mod packaging;
pub mod php;
pub mod python;
pub mod ruby;
pub mod rust;
pub mod toolchain;

pub use common::BaseProjectStrategy;
pub use data::DataLayerStrategy;
pub use dotnet::DotnetStrategy;
pub use elixir::ElixirStrategy;
pub use go::GoStrategy;
pub use jvm::JvmStrategy;
pub use native::{CppStrategy, DartStrategy, SwiftStrategy};
pub use node::NodeStrategy;
pub use packaging::PackagingStrategy;
pub use php::PhpStrategy;
pub use python::PythonStrategy;
pub use ruby::RubyStrategy;
pub use rust::RustStrategy;
pub use toolchain::Toolchain;

use crate::strategy::StrategyRegistry;

/// Registry holding every built-in strategy.
pub fn default_registry() -> StrategyRegistry {
    StrategyRegistry::new()
        .with(BaseProjectStrategy)
        .with(NodeStrategy)
        .with(PythonStrategy)
        .with(RustStrategy)
        .with(GoStrategy)
        .with(JvmStrategy)
        .with(DotnetStrategy)
        .with(RubyStrategy)
        .with(PhpStrategy)
        .with(ElixirStrategy)
        .with(SwiftStrategy)
        .with(DartStrategy)
        .with(CppStrategy)
        .with(DataLayerStrategy)
        .with(PackagingStrategy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stack::{LanguageId, TechStack};

    #[test]
    fn test_default_registry_order() {
        let registry = default_registry();
        let ids = registry.ids();
        assert_eq!(ids.first(), Some(&"base"));
        assert_eq!(ids.last(), Some(&"packaging"));
        assert_eq!(ids.len(), 15);
    }

    #[test]
    fn test_every_language_has_exactly_one_skeleton() {
        let registry = default_registry();
        for language in LanguageId::all_variants() {
            let skeletons: Vec<String> = registry
                .matching(&probe_stack(*language))
                .iter()
                .map(|s| s.id().to_string())
                .filter(|id| !matches!(id.as_str(), "base" | "data" | "packaging"))
                .collect();
            assert_eq!(skeletons.len(), 1, "{language}: {skeletons:?}");
        }
    }

    fn probe_stack(language: LanguageId) -> TechStack {
        use crate::stack::*;
        TechStack {
            archetype: ArchetypeId::Cli,
            language,
            runtime: RuntimeId::Native,
            framework: FrameworkId::Stdlib,
            database: DatabaseId::None,
            orm: OrmId::None,
            transport: TransportId::None,
            packaging: PackagingId::None,
            cicd: CicdId::None,
            build_tool: BuildToolId::Cargo,
            styling: StylingId::None,
            testing: TestingId::CargoTest,
        }
    }
}
