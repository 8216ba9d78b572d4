//! Conventional pairings used to backfill unset dimensions.
//!
//! A default is a suggestion, never a constraint: the assembler only takes it
//! when the value survives validation against everything resolved so far.

use crate::stack::{
    BuildToolId, DatabaseId, DimensionValue, FrameworkId, LanguageId, OrmId, PartialStack,
    RuntimeId, StylingId, TestingId,
};

use DimensionValue as V;

#[derive(Debug, Clone, PartialEq)]
pub struct DefaultPairing {
    pub trigger: DimensionValue,
    pub suggestions: Vec<DimensionValue>,
}

/// Ordered pairing table. Earlier pairings win when two suggest the same
/// dimension, so framework pairings precede runtime and language ones.
#[derive(Debug, Clone, Default)]
pub struct DefaultPairings {
    pairings: Vec<DefaultPairing>,
}

impl DefaultPairings {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn standard() -> Self {
        let table: Vec<(DimensionValue, Vec<DimensionValue>)> = vec![
            (
                V::Framework(FrameworkId::Django),
                vec![V::Orm(OrmId::DjangoOrm), V::Testing(TestingId::Pytest)],
            ),
            (
                V::Framework(FrameworkId::Rails),
                vec![
                    V::Database(DatabaseId::Postgres),
                    V::Orm(OrmId::ActiveRecord),
                    V::Testing(TestingId::Rspec),
                ],
            ),
            (
                V::Framework(FrameworkId::Laravel),
                vec![V::Orm(OrmId::Eloquent), V::Testing(TestingId::Phpunit)],
            ),
            (
                V::Framework(FrameworkId::Symfony),
                vec![V::Orm(OrmId::Doctrine), V::Testing(TestingId::Phpunit)],
            ),
            (
                V::Framework(FrameworkId::Phoenix),
                vec![
                    V::Database(DatabaseId::Postgres),
                    V::Orm(OrmId::Ecto),
                    V::Testing(TestingId::ExUnit),
                ],
            ),
            (
                V::Framework(FrameworkId::SpringBoot),
                vec![
                    V::Database(DatabaseId::Postgres),
                    V::Orm(OrmId::Hibernate),
                    V::BuildTool(BuildToolId::Maven),
                    V::Testing(TestingId::Junit),
                ],
            ),
            (
                V::Framework(FrameworkId::Ktor),
                vec![V::Orm(OrmId::Exposed), V::BuildTool(BuildToolId::Gradle)],
            ),
            (
                V::Framework(FrameworkId::AspNetCore),
                vec![V::Orm(OrmId::EfCore), V::Testing(TestingId::Xunit)],
            ),
            (
                V::Framework(FrameworkId::NestJs),
                vec![V::Orm(OrmId::TypeOrm), V::Testing(TestingId::Jest)],
            ),
            (
                V::Framework(FrameworkId::NextJs),
                vec![V::Orm(OrmId::Prisma), V::Styling(StylingId::Tailwind)],
            ),
            (
                V::Framework(FrameworkId::JetpackCompose),
                vec![V::BuildTool(BuildToolId::Gradle)],
            ),
            (
                V::Framework(FrameworkId::Flutter),
                vec![V::Orm(OrmId::Drift)],
            ),
            (
                V::Framework(FrameworkId::Vapor),
                vec![V::Orm(OrmId::Fluent)],
            ),
            (
                V::Runtime(RuntimeId::Bun),
                vec![V::BuildTool(BuildToolId::Bun)],
            ),
            (
                V::Runtime(RuntimeId::Deno),
                vec![V::BuildTool(BuildToolId::Deno), V::Testing(TestingId::Vitest)],
            ),
            (
                V::Language(LanguageId::Rust),
                vec![
                    V::BuildTool(BuildToolId::Cargo),
                    V::Testing(TestingId::CargoTest),
                ],
            ),
            (
                V::Language(LanguageId::Go),
                vec![
                    V::BuildTool(BuildToolId::GoModules),
                    V::Testing(TestingId::GoTest),
                ],
            ),
            (
                V::Language(LanguageId::Elixir),
                vec![V::BuildTool(BuildToolId::Mix), V::Testing(TestingId::ExUnit)],
            ),
            (
                V::Language(LanguageId::Ruby),
                vec![V::BuildTool(BuildToolId::Bundler)],
            ),
            (
                V::Language(LanguageId::Php),
                vec![V::BuildTool(BuildToolId::Composer)],
            ),
            (
                V::Language(LanguageId::CSharp),
                vec![V::BuildTool(BuildToolId::DotnetCli)],
            ),
            (
                V::Language(LanguageId::Dart),
                vec![V::BuildTool(BuildToolId::Pub), V::Testing(TestingId::DartTest)],
            ),
            (
                V::Language(LanguageId::Swift),
                vec![
                    V::BuildTool(BuildToolId::SwiftPm),
                    V::Testing(TestingId::XcTest),
                ],
            ),
            (
                V::Language(LanguageId::Python),
                vec![V::Testing(TestingId::Pytest)],
            ),
        ];

        Self {
            pairings: table
                .into_iter()
                .map(|(trigger, suggestions)| DefaultPairing {
                    trigger,
                    suggestions,
                })
                .collect(),
        }
    }

    pub fn with_pairing(
        mut self,
        trigger: DimensionValue,
        suggestions: impl IntoIterator<Item = DimensionValue>,
    ) -> Self {
        self.pairings.push(DefaultPairing {
            trigger,
            suggestions: suggestions.into_iter().collect(),
        });
        self
    }

    pub fn pairings(&self) -> &[DefaultPairing] {
        &self.pairings
    }

    /// Backfills unset dimensions of `partial`. Set dimensions are never
    /// touched; only values already present in `partial` act as triggers.
    pub fn apply(&self, partial: &PartialStack) -> PartialStack {
        let mut filled = *partial;
        for pairing in &self.pairings {
            if !partial.has(pairing.trigger) {
                continue;
            }
            for suggestion in &pairing.suggestions {
                if !filled.is_set(suggestion.dimension()) {
                    filled.set(*suggestion);
                }
            }
        }
        filled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_backfills_unset_only() {
        let defaults = DefaultPairings::standard();
        let partial = PartialStack::from_values([
            V::Framework(FrameworkId::Rails),
            V::Database(DatabaseId::Mysql),
        ]);
        let filled = defaults.apply(&partial);
        assert_eq!(filled.database, Some(DatabaseId::Mysql));
        assert_eq!(filled.orm, Some(OrmId::ActiveRecord));
        assert_eq!(filled.testing, Some(TestingId::Rspec));
    }

    #[test]
    fn test_framework_pairing_beats_language_pairing() {
        let defaults = DefaultPairings::standard();
        let partial = PartialStack::from_values([
            V::Language(LanguageId::Python),
            V::Framework(FrameworkId::Django),
        ]);
        let filled = defaults.apply(&partial);
        assert_eq!(filled.orm, Some(OrmId::DjangoOrm));
        assert_eq!(filled.testing, Some(TestingId::Pytest));
    }

    #[test]
    fn test_empty_partial_gets_nothing() {
        let filled = DefaultPairings::standard().apply(&PartialStack::new());
        assert!(filled.is_empty());
    }
}
