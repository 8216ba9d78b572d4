//! Constraint rules.
//!
//! Explicit rules are plain data: an [`Incompatibility`] forbids values next to
//! a trigger, a [`Requirement`] pins one dimension when a trigger is present.
//! Most of them are generated from the matrix tables; a handful of
//! ecosystem-specific ones are written out by hand in [`RuleSet::standard`].
//!
//! Structural checks implement [`StructuralCheck`] and read the matrix
//! directly.

use super::violation::{Violation, ViolationKind};
use crate::stack::{
    ArchetypeId, BuildToolId, Dimension, DimensionValue, FrameworkId, LanguageId, OrmId,
    PackagingId, PartialStack, RuntimeId, StylingId, TestingId, TransportId, UniversalMatrix,
};

use DimensionValue as V;

/// When `when` is present, none of `incompatible` may be.
#[derive(Debug, Clone, PartialEq)]
pub struct Incompatibility {
    pub when: DimensionValue,
    pub incompatible: Vec<DimensionValue>,
    pub reason: String,
}

impl Incompatibility {
    pub fn new(
        when: DimensionValue,
        incompatible: impl IntoIterator<Item = DimensionValue>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            when,
            incompatible: incompatible.into_iter().collect(),
            reason: reason.into(),
        }
    }

    pub fn check(&self, stack: &PartialStack, out: &mut Vec<Violation>) {
        if !stack.has(self.when) {
            return;
        }
        for value in &self.incompatible {
            if stack.has(*value) {
                out.push(Violation {
                    kind: ViolationKind::Incompatible,
                    dimension: value.dimension(),
                    value: *value,
                    conflicts_with: self.when,
                    reason: self.reason.clone(),
                });
            }
        }
    }
}

/// When `when` is present and `requires`' dimension is set, it must equal
/// `requires`.
#[derive(Debug, Clone, PartialEq)]
pub struct Requirement {
    pub when: DimensionValue,
    pub requires: DimensionValue,
    pub reason: String,
}

impl Requirement {
    pub fn new(when: DimensionValue, requires: DimensionValue, reason: impl Into<String>) -> Self {
        Self {
            when,
            requires,
            reason: reason.into(),
        }
    }

    pub fn check(&self, stack: &PartialStack, matrix: &UniversalMatrix, out: &mut Vec<Violation>) {
        if !stack.has(self.when) {
            return;
        }
        let Some(actual) = stack.get(self.requires.dimension()) else {
            return;
        };
        if actual == self.requires {
            return;
        }
        // Language requirements honor equivalence classes such as TS/JS on
        // Node frameworks.
        if let (V::Language(required), V::Language(language)) = (self.requires, actual) {
            if matrix.languages_equivalent(required, language, stack.framework) {
                return;
            }
        }
        out.push(Violation {
            kind: ViolationKind::Requirement,
            dimension: actual.dimension(),
            value: actual,
            conflicts_with: self.when,
            reason: self.reason.clone(),
        });
    }
}

/// The explicit rule tables.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    pub incompatibilities: Vec<Incompatibility>,
    pub requirements: Vec<Requirement>,
}

impl RuleSet {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Rules generated from `matrix` followed by the hand-written ones.
    pub fn standard(matrix: &UniversalMatrix) -> Self {
        let mut rules = Self::generate(matrix);
        rules.incompatibilities.extend(hand_written_incompatibilities());
        rules.requirements.extend(hand_written_requirements());
        rules
    }

    /// Derives archetype, language and framework rules from the matrix.
    pub fn generate(matrix: &UniversalMatrix) -> Self {
        let mut incompatibilities = Vec::new();

        for profile in matrix.archetypes() {
            let archetype = V::Archetype(profile.archetype);
            let label = profile.archetype.name();

            let mut push = |dimension: Dimension, allowed: Vec<DimensionValue>| {
                let forbidden: Vec<DimensionValue> = dimension
                    .values()
                    .into_iter()
                    .filter(|v| !allowed.contains(v))
                    .collect();
                if !forbidden.is_empty() {
                    let names: Vec<&str> = allowed.iter().map(|v| v.as_str()).collect();
                    incompatibilities.push(Incompatibility::new(
                        archetype,
                        forbidden,
                        format!("{label} projects support {dimension} {}", names.join(", ")),
                    ));
                }
            };

            push(
                Dimension::Framework,
                profile.frameworks.iter().map(|v| V::Framework(*v)).collect(),
            );
            push(
                Dimension::Database,
                profile.databases.iter().map(|v| V::Database(*v)).collect(),
            );
            push(
                Dimension::Transport,
                profile.transports.iter().map(|v| V::Transport(*v)).collect(),
            );
            push(
                Dimension::Packaging,
                profile.packaging.iter().map(|v| V::Packaging(*v)).collect(),
            );
            push(
                Dimension::Styling,
                profile.styling.iter().map(|v| V::Styling(*v)).collect(),
            );
        }

        for language in LanguageId::all_variants() {
            let when = V::Language(*language);
            let label = language.name();

            let supported = matrix.orms_for_language(*language);
            let forbidden: Vec<DimensionValue> = OrmId::all_variants()
                .iter()
                .filter(|o| **o != OrmId::None && !supported.contains(o))
                .map(|o| V::Orm(*o))
                .collect();
            let supported_names: Vec<&str> = supported
                .iter()
                .filter(|o| **o != OrmId::None)
                .map(|o| o.as_str())
                .collect();
            let reason = if supported_names.is_empty() {
                format!("{label} projects have no supported ORM")
            } else {
                format!(
                    "{label} projects are restricted to {label} ORMs ({})",
                    supported_names.join(", ")
                )
            };
            incompatibilities.push(Incompatibility::new(when, forbidden, reason));

            let tools = matrix.build_tools_for(*language);
            let forbidden: Vec<DimensionValue> = BuildToolId::all_variants()
                .iter()
                .filter(|t| !tools.contains(t))
                .map(|t| V::BuildTool(*t))
                .collect();
            let names: Vec<&str> = tools.iter().map(|t| t.as_str()).collect();
            incompatibilities.push(Incompatibility::new(
                when,
                forbidden,
                format!("{label} projects build with {}", names.join(", ")),
            ));

            let testing = matrix.testing_for(*language);
            let forbidden: Vec<DimensionValue> = TestingId::all_variants()
                .iter()
                .filter(|t| !testing.contains(t))
                .map(|t| V::Testing(*t))
                .collect();
            let names: Vec<&str> = testing.iter().map(|t| t.as_str()).collect();
            incompatibilities.push(Incompatibility::new(
                when,
                forbidden,
                format!("{label} projects test with {}", names.join(", ")),
            ));
        }

        let requirements = matrix
            .frameworks()
            .filter(|(fw, _)| **fw != FrameworkId::Stdlib)
            .filter_map(|(fw, langs)| {
                let primary = langs.first()?;
                Some(Requirement::new(
                    V::Framework(*fw),
                    V::Language(*primary),
                    format!(
                        "{} is a {} framework and requires language={}",
                        fw.name(),
                        primary.name(),
                        primary.as_str()
                    ),
                ))
            })
            .collect();

        Self {
            incompatibilities,
            requirements,
        }
    }

    pub fn with_incompatibility(mut self, rule: Incompatibility) -> Self {
        self.incompatibilities.push(rule);
        self
    }

    pub fn with_requirement(mut self, rule: Requirement) -> Self {
        self.requirements.push(rule);
        self
    }

    pub fn len(&self) -> usize {
        self.incompatibilities.len() + self.requirements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn hand_written_incompatibilities() -> Vec<Incompatibility> {
    let non_react = [
        FrameworkId::Vue,
        FrameworkId::Svelte,
        FrameworkId::Angular,
        FrameworkId::Solid,
        FrameworkId::Nuxt,
        FrameworkId::SvelteKit,
    ];

    let mut rules = vec![
        Incompatibility::new(
            V::Runtime(RuntimeId::Deno),
            [
                V::BuildTool(BuildToolId::Npm),
                V::BuildTool(BuildToolId::Pnpm),
                V::BuildTool(BuildToolId::Yarn),
                V::BuildTool(BuildToolId::Bun),
            ],
            "Deno projects are managed by the deno CLI",
        ),
        Incompatibility::new(
            V::Runtime(RuntimeId::Deno),
            [V::Testing(TestingId::Jest), V::Testing(TestingId::Mocha)],
            "Deno projects test with vitest",
        ),
        Incompatibility::new(
            V::Runtime(RuntimeId::Deno),
            [
                V::Framework(FrameworkId::NestJs),
                V::Framework(FrameworkId::NextJs),
                V::Framework(FrameworkId::Nuxt),
                V::Framework(FrameworkId::Remix),
                V::Framework(FrameworkId::Angular),
                V::Framework(FrameworkId::ReactNative),
                V::Framework(FrameworkId::Electron),
            ],
            "this framework's toolchain does not run on Deno",
        ),
        Incompatibility::new(
            V::Runtime(RuntimeId::Bun),
            [
                V::Framework(FrameworkId::ReactNative),
                V::Framework(FrameworkId::Electron),
                V::BuildTool(BuildToolId::Deno),
            ],
            "Bun projects cannot use the Node-only or Deno toolchains",
        ),
        Incompatibility::new(
            V::Archetype(ArchetypeId::Mobile),
            [V::Runtime(RuntimeId::Deno), V::Runtime(RuntimeId::Bun)],
            "Mobile JavaScript toolchains run on Node.js",
        ),
        Incompatibility::new(
            V::Archetype(ArchetypeId::Desktop),
            [V::Runtime(RuntimeId::Deno), V::Runtime(RuntimeId::Bun)],
            "Desktop JavaScript toolchains run on Node.js",
        ),
        Incompatibility::new(
            V::Runtime(RuntimeId::Node),
            [V::BuildTool(BuildToolId::Deno), V::BuildTool(BuildToolId::Bun)],
            "Node.js projects are managed by npm, pnpm or yarn",
        ),
        Incompatibility::new(
            V::Language(LanguageId::Elixir),
            [V::Packaging(PackagingId::Serverless)],
            "BEAM releases are not deployable as serverless functions",
        ),
        Incompatibility::new(
            V::Framework(FrameworkId::JetpackCompose),
            [V::BuildTool(BuildToolId::Maven)],
            "Android builds require Gradle",
        ),
        Incompatibility::new(
            V::Framework(FrameworkId::Django),
            [V::Orm(OrmId::SqlAlchemy)],
            "Django projects use the built-in Django ORM",
        ),
        Incompatibility::new(
            V::Framework(FrameworkId::Flask),
            [V::Transport(TransportId::Grpc)],
            "Flask has no gRPC server integration",
        ),
        Incompatibility::new(
            V::Archetype(ArchetypeId::Frontend),
            [V::Transport(TransportId::Trpc)],
            "tRPC needs a server in the same project",
        ),
    ];

    for fw in non_react {
        rules.push(Incompatibility::new(
            V::Framework(fw),
            [V::Styling(StylingId::StyledComponents)],
            "styled-components is a React library",
        ));
    }
    rules
}

fn hand_written_requirements() -> Vec<Requirement> {
    vec![
        Requirement::new(
            V::Transport(TransportId::Trpc),
            V::Language(LanguageId::TypeScript),
            "tRPC relies on end-to-end TypeScript types and requires language=typescript",
        ),
        Requirement::new(
            V::Orm(OrmId::DjangoOrm),
            V::Framework(FrameworkId::Django),
            "Django ORM is only available inside Django and requires framework=django",
        ),
    ]
}

/// A check derived from matrix structure rather than an explicit rule.
pub trait StructuralCheck: Send + Sync {
    fn name(&self) -> &'static str;
    fn check(&self, stack: &PartialStack, matrix: &UniversalMatrix, out: &mut Vec<Violation>);
}

pub struct ArchetypeLanguageCheck;

impl StructuralCheck for ArchetypeLanguageCheck {
    fn name(&self) -> &'static str {
        "ArchetypeLanguage"
    }

    fn check(&self, stack: &PartialStack, matrix: &UniversalMatrix, out: &mut Vec<Violation>) {
        let (Some(archetype), Some(language)) = (stack.archetype, stack.language) else {
            return;
        };
        if !matrix.languages_for_archetype(archetype).contains(&language) {
            out.push(Violation {
                kind: ViolationKind::ArchetypeLanguage,
                dimension: Dimension::Language,
                value: V::Language(language),
                conflicts_with: V::Archetype(archetype),
                reason: format!(
                    "{} is not a supported language for {} projects",
                    language.name(),
                    archetype.name()
                ),
            });
        }
    }
}

pub struct LanguageRuntimeCheck;

impl StructuralCheck for LanguageRuntimeCheck {
    fn name(&self) -> &'static str {
        "LanguageRuntime"
    }

    fn check(&self, stack: &PartialStack, matrix: &UniversalMatrix, out: &mut Vec<Violation>) {
        let (Some(language), Some(runtime)) = (stack.language, stack.runtime) else {
            return;
        };
        if !matrix.runtimes_for(language).contains(&runtime) {
            out.push(Violation {
                kind: ViolationKind::LanguageRuntime,
                dimension: Dimension::Runtime,
                value: V::Runtime(runtime),
                conflicts_with: V::Language(language),
                reason: format!("{} does not run {}", runtime.name(), language.name()),
            });
        }
    }
}

pub struct FrameworkLanguageCheck;

impl StructuralCheck for FrameworkLanguageCheck {
    fn name(&self) -> &'static str {
        "FrameworkLanguage"
    }

    fn check(&self, stack: &PartialStack, matrix: &UniversalMatrix, out: &mut Vec<Violation>) {
        let (Some(framework), Some(language)) = (stack.framework, stack.language) else {
            return;
        };
        let supported = matrix.framework_languages(framework);
        let ok = supported
            .iter()
            .any(|l| matrix.languages_equivalent(*l, language, Some(framework)));
        if !ok {
            out.push(Violation {
                kind: ViolationKind::FrameworkLanguage,
                dimension: Dimension::Language,
                value: V::Language(language),
                conflicts_with: V::Framework(framework),
                reason: format!("{} does not support {}", framework.name(), language.name()),
            });
        }
    }
}

pub struct OrmSupportCheck;

impl StructuralCheck for OrmSupportCheck {
    fn name(&self) -> &'static str {
        "OrmSupport"
    }

    fn check(&self, stack: &PartialStack, matrix: &UniversalMatrix, out: &mut Vec<Violation>) {
        let (Some(orm), Some(database), Some(language)) =
            (stack.orm, stack.database, stack.language)
        else {
            return;
        };
        if orm == OrmId::None {
            return;
        }

        let violation = |conflicts_with: DimensionValue, reason: String| Violation {
            kind: ViolationKind::OrmSupport,
            dimension: Dimension::Orm,
            value: V::Orm(orm),
            conflicts_with,
            reason,
        };

        let Some(profile) = matrix.orm(orm) else {
            out.push(violation(
                V::Language(language),
                format!("{} is not a known ORM", orm.name()),
            ));
            return;
        };

        if database == crate::stack::DatabaseId::None {
            out.push(violation(
                V::Database(database),
                format!("{} needs a database", orm.name()),
            ));
        } else if !profile.databases.contains(&database) {
            out.push(violation(
                V::Database(database),
                format!("{} does not support {}", orm.name(), database.name()),
            ));
        }
        if !profile.languages.contains(&language) {
            out.push(violation(
                V::Language(language),
                format!("{} is not available for {}", orm.name(), language.name()),
            ));
        }
    }
}

/// Structural checks in evaluation order.
pub fn standard_checks() -> Vec<Box<dyn StructuralCheck>> {
    vec![
        Box::new(ArchetypeLanguageCheck),
        Box::new(LanguageRuntimeCheck),
        Box::new(FrameworkLanguageCheck),
        Box::new(OrmSupportCheck),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stack::DatabaseId;

    fn matrix() -> UniversalMatrix {
        UniversalMatrix::standard()
    }

    #[test]
    fn test_incompatibility_only_fires_with_trigger() {
        let rule = Incompatibility::new(
            V::Framework(FrameworkId::Django),
            [V::Orm(OrmId::SqlAlchemy)],
            "nope",
        );
        let mut out = Vec::new();
        rule.check(&PartialStack::from_values([V::Orm(OrmId::SqlAlchemy)]), &mut out);
        assert!(out.is_empty());

        rule.check(
            &PartialStack::from_values([
                V::Framework(FrameworkId::Django),
                V::Orm(OrmId::SqlAlchemy),
            ]),
            &mut out,
        );
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].dimension, Dimension::Orm);
        assert_eq!(out[0].conflicts_with, V::Framework(FrameworkId::Django));
    }

    #[test]
    fn test_requirement_skips_unset_dimension() {
        let rule = Requirement::new(
            V::Framework(FrameworkId::Django),
            V::Language(LanguageId::Python),
            "needs python",
        );
        let mut out = Vec::new();
        rule.check(
            &PartialStack::from_values([V::Framework(FrameworkId::Django)]),
            &matrix(),
            &mut out,
        );
        assert!(out.is_empty());
    }

    #[test]
    fn test_requirement_honors_language_equivalence() {
        let rule = Requirement::new(
            V::Framework(FrameworkId::Express),
            V::Language(LanguageId::TypeScript),
            "needs ts",
        );
        let mut out = Vec::new();
        rule.check(
            &PartialStack::from_values([
                V::Framework(FrameworkId::Express),
                V::Language(LanguageId::JavaScript),
            ]),
            &matrix(),
            &mut out,
        );
        assert!(out.is_empty());

        rule.check(
            &PartialStack::from_values([
                V::Framework(FrameworkId::Express),
                V::Language(LanguageId::Python),
            ]),
            &matrix(),
            &mut out,
        );
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn test_generated_requirement_reason() {
        let rules = RuleSet::generate(&matrix());
        let django = rules
            .requirements
            .iter()
            .find(|r| r.when == V::Framework(FrameworkId::Django))
            .unwrap();
        assert_eq!(
            django.reason,
            "Django is a Python framework and requires language=python"
        );
        assert!(rules
            .requirements
            .iter()
            .all(|r| r.when != V::Framework(FrameworkId::Stdlib)));
    }

    #[test]
    fn test_generated_orm_rule_names_language_orms() {
        let rules = RuleSet::generate(&matrix());
        let go = rules
            .incompatibilities
            .iter()
            .find(|r| {
                r.when == V::Language(LanguageId::Go)
                    && r.incompatible.contains(&V::Orm(OrmId::Prisma))
            })
            .unwrap();
        assert_eq!(go.reason, "Go projects are restricted to Go ORMs (gorm, ent)");
        assert!(!go.incompatible.contains(&V::Orm(OrmId::None)));
    }

    #[test]
    fn test_orm_check_requires_all_three_dimensions() {
        let mut out = Vec::new();
        OrmSupportCheck.check(
            &PartialStack::from_values([V::Language(LanguageId::Go), V::Orm(OrmId::Prisma)]),
            &matrix(),
            &mut out,
        );
        assert!(out.is_empty());

        OrmSupportCheck.check(
            &PartialStack::from_values([
                V::Language(LanguageId::TypeScript),
                V::Database(DatabaseId::None),
                V::Orm(OrmId::Prisma),
            ]),
            &matrix(),
            &mut out,
        );
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].conflicts_with, V::Database(DatabaseId::None));
    }

    #[test]
    fn test_orm_none_always_passes() {
        let mut out = Vec::new();
        OrmSupportCheck.check(
            &PartialStack::from_values([
                V::Language(LanguageId::Cpp),
                V::Database(DatabaseId::Redis),
                V::Orm(OrmId::None),
            ]),
            &matrix(),
            &mut out,
        );
        assert!(out.is_empty());
    }

    #[test]
    fn test_language_runtime_check() {
        let mut out = Vec::new();
        LanguageRuntimeCheck.check(
            &PartialStack::from_values([
                V::Language(LanguageId::Python),
                V::Runtime(RuntimeId::Jvm),
            ]),
            &matrix(),
            &mut out,
        );
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].kind, ViolationKind::LanguageRuntime);
    }
}
