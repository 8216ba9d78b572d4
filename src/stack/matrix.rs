//! The Universal Matrix: every dimension's valid values plus the compatibility
//! tables the constraint solver derives its rules from.
//!
//! Adding a language or framework is a table edit here. Nothing in this module
//! is global state; callers build a [`UniversalMatrix`] and hand it to the
//! solver and assembler explicitly.

use super::{
    ArchetypeId, BuildToolId, CicdId, DatabaseId, Dimension, DimensionValue, FrameworkId,
    LanguageId, OrmId, PackagingId, PartialStack, RuntimeId, StylingId, TestingId, TransportId,
};
use std::collections::BTreeMap;

use ArchetypeId as A;
use FrameworkId as F;
use LanguageId as L;

/// Per-archetype allowed values.
#[derive(Debug, Clone)]
pub struct ArchetypeProfile {
    pub archetype: ArchetypeId,
    pub languages: Vec<LanguageId>,
    pub frameworks: Vec<FrameworkId>,
    pub databases: Vec<DatabaseId>,
    pub transports: Vec<TransportId>,
    pub packaging: Vec<PackagingId>,
    pub styling: Vec<StylingId>,
}

/// Languages and databases an ORM supports.
#[derive(Debug, Clone)]
pub struct OrmProfile {
    pub orm: OrmId,
    pub languages: Vec<LanguageId>,
    pub databases: Vec<DatabaseId>,
}

/// A set of languages treated as interchangeable, but only for stacks whose
/// framework is one of `frameworks`.
#[derive(Debug, Clone)]
pub struct LanguageEquivalence {
    pub languages: Vec<LanguageId>,
    pub frameworks: Vec<FrameworkId>,
}

impl LanguageEquivalence {
    pub fn exempts(
        &self,
        required: LanguageId,
        actual: LanguageId,
        framework: Option<FrameworkId>,
    ) -> bool {
        match framework {
            Some(fw) => {
                self.frameworks.contains(&fw)
                    && self.languages.contains(&required)
                    && self.languages.contains(&actual)
            }
            None => false,
        }
    }
}

const NODE_FRAMEWORKS: &[FrameworkId] = &[
    F::Express,
    F::Fastify,
    F::NestJs,
    F::Hono,
    F::React,
    F::Vue,
    F::Svelte,
    F::Angular,
    F::Solid,
    F::NextJs,
    F::Nuxt,
    F::SvelteKit,
    F::Remix,
    F::Commander,
    F::ReactNative,
    F::Electron,
    F::Phaser,
];

const JVM_FRAMEWORKS: &[FrameworkId] = &[F::SpringBoot, F::Quarkus];

const ALL_LANGUAGES: &[LanguageId] = &[
    L::TypeScript,
    L::JavaScript,
    L::Python,
    L::Rust,
    L::Go,
    L::Java,
    L::Kotlin,
    L::CSharp,
    L::Ruby,
    L::Php,
    L::Elixir,
    L::Swift,
    L::Dart,
    L::Cpp,
];

const ALL_STYLING: &[StylingId] = &[
    StylingId::Tailwind,
    StylingId::CssModules,
    StylingId::StyledComponents,
    StylingId::Sass,
    StylingId::None,
];

const NO_STYLING: &[StylingId] = &[StylingId::None];

#[allow(clippy::type_complexity)]
const ARCHETYPES: &[(
    ArchetypeId,
    &[LanguageId],
    &[FrameworkId],
    &[DatabaseId],
    &[TransportId],
    &[PackagingId],
    &[StylingId],
)] = &[
    (
        A::Backend,
        &[
            L::TypeScript,
            L::JavaScript,
            L::Python,
            L::Rust,
            L::Go,
            L::Java,
            L::Kotlin,
            L::CSharp,
            L::Ruby,
            L::Php,
            L::Elixir,
            L::Swift,
        ],
        &[
            F::Express,
            F::Fastify,
            F::NestJs,
            F::Hono,
            F::Django,
            F::FastApi,
            F::Flask,
            F::Axum,
            F::Actix,
            F::Gin,
            F::Echo,
            F::Fiber,
            F::SpringBoot,
            F::Quarkus,
            F::Ktor,
            F::AspNetCore,
            F::Rails,
            F::Sinatra,
            F::Laravel,
            F::Symfony,
            F::Phoenix,
            F::Vapor,
        ],
        &[
            DatabaseId::Postgres,
            DatabaseId::Mysql,
            DatabaseId::Sqlite,
            DatabaseId::Mongodb,
            DatabaseId::Redis,
            DatabaseId::None,
        ],
        &[
            TransportId::Rest,
            TransportId::Graphql,
            TransportId::Grpc,
            TransportId::Websocket,
            TransportId::Trpc,
        ],
        &[
            PackagingId::Docker,
            PackagingId::DockerCompose,
            PackagingId::Kubernetes,
            PackagingId::Serverless,
            PackagingId::None,
        ],
        NO_STYLING,
    ),
    (
        A::Frontend,
        &[L::TypeScript, L::JavaScript],
        &[F::React, F::Vue, F::Svelte, F::Angular, F::Solid],
        &[DatabaseId::None],
        &[TransportId::Rest, TransportId::Graphql],
        &[PackagingId::Docker, PackagingId::Serverless, PackagingId::None],
        ALL_STYLING,
    ),
    (
        A::Fullstack,
        &[L::TypeScript, L::JavaScript],
        &[F::NextJs, F::Nuxt, F::SvelteKit, F::Remix],
        &[
            DatabaseId::Postgres,
            DatabaseId::Mysql,
            DatabaseId::Sqlite,
            DatabaseId::Mongodb,
            DatabaseId::None,
        ],
        &[
            TransportId::Rest,
            TransportId::Graphql,
            TransportId::Trpc,
            TransportId::Websocket,
        ],
        &[
            PackagingId::Docker,
            PackagingId::DockerCompose,
            PackagingId::Kubernetes,
            PackagingId::Serverless,
            PackagingId::None,
        ],
        ALL_STYLING,
    ),
    (
        A::Cli,
        &[L::TypeScript, L::JavaScript, L::Python, L::Rust, L::Go],
        &[F::Commander, F::Typer, F::Click, F::Clap, F::Cobra],
        &[DatabaseId::Sqlite, DatabaseId::None],
        &[TransportId::None],
        &[PackagingId::Docker, PackagingId::None],
        NO_STYLING,
    ),
    (
        A::Library,
        ALL_LANGUAGES,
        &[F::Stdlib],
        &[DatabaseId::None],
        &[TransportId::None],
        &[PackagingId::None],
        NO_STYLING,
    ),
    (
        A::Mobile,
        &[L::TypeScript, L::JavaScript, L::Dart, L::Swift, L::Kotlin],
        &[F::ReactNative, F::Flutter, F::SwiftUi, F::JetpackCompose],
        &[DatabaseId::Sqlite, DatabaseId::None],
        &[TransportId::Rest, TransportId::Graphql],
        &[PackagingId::None],
        NO_STYLING,
    ),
    (
        A::Desktop,
        &[L::TypeScript, L::JavaScript, L::Rust],
        &[F::Electron, F::Tauri],
        &[DatabaseId::Sqlite, DatabaseId::None],
        &[TransportId::None],
        &[PackagingId::None],
        ALL_STYLING,
    ),
    (
        A::Game,
        &[
            L::Rust,
            L::Python,
            L::TypeScript,
            L::JavaScript,
            L::CSharp,
            L::Cpp,
            L::Go,
        ],
        &[
            F::Bevy,
            F::Pygame,
            F::Phaser,
            F::MonoGame,
            F::Raylib,
            F::Ebiten,
        ],
        &[DatabaseId::Sqlite, DatabaseId::None],
        &[TransportId::None, TransportId::Websocket],
        &[PackagingId::None],
        NO_STYLING,
    ),
];

const LANGUAGE_RUNTIMES: &[(LanguageId, &[RuntimeId])] = &[
    (L::TypeScript, &[RuntimeId::Node, RuntimeId::Bun, RuntimeId::Deno]),
    (L::JavaScript, &[RuntimeId::Node, RuntimeId::Bun, RuntimeId::Deno]),
    (L::Python, &[RuntimeId::CPython]),
    (L::Rust, &[RuntimeId::Native]),
    (L::Go, &[RuntimeId::Go]),
    (L::Java, &[RuntimeId::Jvm]),
    (L::Kotlin, &[RuntimeId::Jvm]),
    (L::CSharp, &[RuntimeId::DotNet]),
    (L::Ruby, &[RuntimeId::Ruby]),
    (L::Php, &[RuntimeId::Php]),
    (L::Elixir, &[RuntimeId::Beam]),
    (L::Swift, &[RuntimeId::Native]),
    (L::Dart, &[RuntimeId::DartVm]),
    (L::Cpp, &[RuntimeId::Native]),
];

const TS_JS: &[LanguageId] = &[L::TypeScript, L::JavaScript];

/// Compatible languages per framework, primary language first.
const FRAMEWORK_LANGUAGES: &[(FrameworkId, &[LanguageId])] = &[
    (F::Express, TS_JS),
    (F::Fastify, TS_JS),
    (F::NestJs, &[L::TypeScript]),
    (F::Hono, TS_JS),
    (F::Django, &[L::Python]),
    (F::FastApi, &[L::Python]),
    (F::Flask, &[L::Python]),
    (F::Axum, &[L::Rust]),
    (F::Actix, &[L::Rust]),
    (F::Gin, &[L::Go]),
    (F::Echo, &[L::Go]),
    (F::Fiber, &[L::Go]),
    (F::SpringBoot, &[L::Java, L::Kotlin]),
    (F::Quarkus, &[L::Java, L::Kotlin]),
    (F::Ktor, &[L::Kotlin]),
    (F::AspNetCore, &[L::CSharp]),
    (F::Rails, &[L::Ruby]),
    (F::Sinatra, &[L::Ruby]),
    (F::Laravel, &[L::Php]),
    (F::Symfony, &[L::Php]),
    (F::Phoenix, &[L::Elixir]),
    (F::Vapor, &[L::Swift]),
    (F::React, TS_JS),
    (F::Vue, TS_JS),
    (F::Svelte, TS_JS),
    (F::Angular, &[L::TypeScript]),
    (F::Solid, TS_JS),
    (F::NextJs, TS_JS),
    (F::Nuxt, TS_JS),
    (F::SvelteKit, TS_JS),
    (F::Remix, TS_JS),
    (F::Commander, TS_JS),
    (F::Typer, &[L::Python]),
    (F::Click, &[L::Python]),
    (F::Clap, &[L::Rust]),
    (F::Cobra, &[L::Go]),
    (F::ReactNative, TS_JS),
    (F::Flutter, &[L::Dart]),
    (F::SwiftUi, &[L::Swift]),
    (F::JetpackCompose, &[L::Kotlin]),
    (F::Electron, TS_JS),
    (F::Tauri, &[L::Rust]),
    (F::Bevy, &[L::Rust]),
    (F::Pygame, &[L::Python]),
    (F::Phaser, TS_JS),
    (F::MonoGame, &[L::CSharp]),
    (F::Raylib, &[L::Cpp]),
    (F::Ebiten, &[L::Go]),
    (F::Stdlib, ALL_LANGUAGES),
];

const SQL: &[DatabaseId] = &[DatabaseId::Postgres, DatabaseId::Mysql, DatabaseId::Sqlite];

const ORMS: &[(OrmId, &[LanguageId], &[DatabaseId])] = &[
    (
        OrmId::Prisma,
        TS_JS,
        &[
            DatabaseId::Postgres,
            DatabaseId::Mysql,
            DatabaseId::Sqlite,
            DatabaseId::Mongodb,
        ],
    ),
    (OrmId::Drizzle, TS_JS, SQL),
    (OrmId::TypeOrm, TS_JS, SQL),
    (OrmId::Sequelize, TS_JS, SQL),
    (OrmId::Mongoose, TS_JS, &[DatabaseId::Mongodb]),
    (OrmId::SqlAlchemy, &[L::Python], SQL),
    (OrmId::DjangoOrm, &[L::Python], SQL),
    (OrmId::Diesel, &[L::Rust], SQL),
    (OrmId::SeaOrm, &[L::Rust], SQL),
    (OrmId::Sqlx, &[L::Rust], SQL),
    (OrmId::Gorm, &[L::Go], SQL),
    (OrmId::Ent, &[L::Go], SQL),
    (
        OrmId::Hibernate,
        &[L::Java, L::Kotlin],
        &[DatabaseId::Postgres, DatabaseId::Mysql],
    ),
    (OrmId::Exposed, &[L::Kotlin], SQL),
    (OrmId::EfCore, &[L::CSharp], SQL),
    (OrmId::ActiveRecord, &[L::Ruby], SQL),
    (OrmId::Eloquent, &[L::Php], SQL),
    (OrmId::Doctrine, &[L::Php], SQL),
    (
        OrmId::Ecto,
        &[L::Elixir],
        &[DatabaseId::Postgres, DatabaseId::Mysql],
    ),
    (OrmId::Fluent, &[L::Swift], SQL),
    (OrmId::Drift, &[L::Dart], &[DatabaseId::Sqlite]),
];

const NODE_BUILD_TOOLS: &[BuildToolId] = &[
    BuildToolId::Npm,
    BuildToolId::Pnpm,
    BuildToolId::Yarn,
    BuildToolId::Bun,
    BuildToolId::Deno,
];

const LANGUAGE_BUILD_TOOLS: &[(LanguageId, &[BuildToolId])] = &[
    (L::TypeScript, NODE_BUILD_TOOLS),
    (L::JavaScript, NODE_BUILD_TOOLS),
    (L::Python, &[BuildToolId::Pip, BuildToolId::Poetry, BuildToolId::Uv]),
    (L::Rust, &[BuildToolId::Cargo]),
    (L::Go, &[BuildToolId::GoModules]),
    (L::Java, &[BuildToolId::Maven, BuildToolId::Gradle]),
    (L::Kotlin, &[BuildToolId::Gradle, BuildToolId::Maven]),
    (L::CSharp, &[BuildToolId::DotnetCli]),
    (L::Ruby, &[BuildToolId::Bundler]),
    (L::Php, &[BuildToolId::Composer]),
    (L::Elixir, &[BuildToolId::Mix]),
    (L::Swift, &[BuildToolId::SwiftPm]),
    (L::Dart, &[BuildToolId::Pub]),
    (L::Cpp, &[BuildToolId::CMake, BuildToolId::Meson]),
];

const NODE_TESTING: &[TestingId] = &[TestingId::Jest, TestingId::Vitest, TestingId::Mocha];

const LANGUAGE_TESTING: &[(LanguageId, &[TestingId])] = &[
    (L::TypeScript, NODE_TESTING),
    (L::JavaScript, NODE_TESTING),
    (L::Python, &[TestingId::Pytest, TestingId::Unittest]),
    (L::Rust, &[TestingId::CargoTest]),
    (L::Go, &[TestingId::GoTest]),
    (L::Java, &[TestingId::Junit]),
    (L::Kotlin, &[TestingId::Junit, TestingId::Kotest]),
    (L::CSharp, &[TestingId::Xunit, TestingId::Nunit]),
    (L::Ruby, &[TestingId::Rspec, TestingId::Minitest]),
    (L::Php, &[TestingId::Phpunit, TestingId::Pest]),
    (L::Elixir, &[TestingId::ExUnit]),
    (L::Swift, &[TestingId::XcTest]),
    (L::Dart, &[TestingId::DartTest]),
    (L::Cpp, &[TestingId::GoogleTest, TestingId::Catch2]),
];

/// Framework substituted for archetypes that have no natural framework.
const FALLBACK_FRAMEWORKS: &[(ArchetypeId, LanguageId, FrameworkId)] = &[
    (A::Game, L::Rust, F::Bevy),
    (A::Game, L::Python, F::Pygame),
    (A::Game, L::TypeScript, F::Phaser),
    (A::Game, L::JavaScript, F::Phaser),
    (A::Game, L::CSharp, F::MonoGame),
    (A::Game, L::Cpp, F::Raylib),
    (A::Game, L::Go, F::Ebiten),
];

/// Popularity bias. Weights never encode validity.
const WEIGHTS: &[(DimensionValue, f64)] = &[
    (DimensionValue::Archetype(A::Backend), 10.0),
    (DimensionValue::Archetype(A::Frontend), 7.0),
    (DimensionValue::Archetype(A::Fullstack), 6.0),
    (DimensionValue::Archetype(A::Cli), 4.0),
    (DimensionValue::Archetype(A::Library), 4.0),
    (DimensionValue::Archetype(A::Mobile), 3.0),
    (DimensionValue::Archetype(A::Desktop), 2.0),
    (DimensionValue::Language(L::TypeScript), 10.0),
    (DimensionValue::Language(L::JavaScript), 6.0),
    (DimensionValue::Language(L::Python), 9.0),
    (DimensionValue::Language(L::Rust), 6.0),
    (DimensionValue::Language(L::Go), 6.0),
    (DimensionValue::Language(L::Java), 5.0),
    (DimensionValue::Language(L::Kotlin), 3.0),
    (DimensionValue::Language(L::CSharp), 4.0),
    (DimensionValue::Language(L::Ruby), 2.0),
    (DimensionValue::Language(L::Php), 3.0),
    (DimensionValue::Language(L::Swift), 2.0),
    (DimensionValue::Language(L::Dart), 2.0),
    (DimensionValue::Language(L::Cpp), 2.0),
    (DimensionValue::Runtime(RuntimeId::Node), 10.0),
    (DimensionValue::Runtime(RuntimeId::Bun), 2.0),
    (DimensionValue::Framework(F::Express), 8.0),
    (DimensionValue::Framework(F::Fastify), 4.0),
    (DimensionValue::Framework(F::NestJs), 5.0),
    (DimensionValue::Framework(F::Hono), 2.0),
    (DimensionValue::Framework(F::Django), 6.0),
    (DimensionValue::Framework(F::FastApi), 7.0),
    (DimensionValue::Framework(F::Flask), 4.0),
    (DimensionValue::Framework(F::Axum), 6.0),
    (DimensionValue::Framework(F::Actix), 4.0),
    (DimensionValue::Framework(F::Gin), 6.0),
    (DimensionValue::Framework(F::Echo), 3.0),
    (DimensionValue::Framework(F::Fiber), 3.0),
    (DimensionValue::Framework(F::SpringBoot), 9.0),
    (DimensionValue::Framework(F::Quarkus), 2.0),
    (DimensionValue::Framework(F::Ktor), 3.0),
    (DimensionValue::Framework(F::Rails), 4.0),
    (DimensionValue::Framework(F::Laravel), 5.0),
    (DimensionValue::Framework(F::Symfony), 2.0),
    (DimensionValue::Framework(F::React), 9.0),
    (DimensionValue::Framework(F::Vue), 6.0),
    (DimensionValue::Framework(F::Svelte), 4.0),
    (DimensionValue::Framework(F::Angular), 4.0),
    (DimensionValue::Framework(F::NextJs), 9.0),
    (DimensionValue::Framework(F::Nuxt), 3.0),
    (DimensionValue::Framework(F::SvelteKit), 3.0),
    (DimensionValue::Framework(F::Remix), 2.0),
    (DimensionValue::Framework(F::Typer), 3.0),
    (DimensionValue::Framework(F::Click), 2.0),
    (DimensionValue::Framework(F::ReactNative), 4.0),
    (DimensionValue::Framework(F::Flutter), 4.0),
    (DimensionValue::Database(DatabaseId::Postgres), 10.0),
    (DimensionValue::Database(DatabaseId::Mysql), 5.0),
    (DimensionValue::Database(DatabaseId::Sqlite), 4.0),
    (DimensionValue::Database(DatabaseId::Mongodb), 4.0),
    (DimensionValue::Database(DatabaseId::Redis), 2.0),
    (DimensionValue::Database(DatabaseId::None), 3.0),
    (DimensionValue::Orm(OrmId::Prisma), 8.0),
    (DimensionValue::Orm(OrmId::Drizzle), 5.0),
    (DimensionValue::Orm(OrmId::TypeOrm), 3.0),
    (DimensionValue::Orm(OrmId::Sequelize), 2.0),
    (DimensionValue::Orm(OrmId::Mongoose), 5.0),
    (DimensionValue::Orm(OrmId::SqlAlchemy), 7.0),
    (DimensionValue::Orm(OrmId::DjangoOrm), 6.0),
    (DimensionValue::Orm(OrmId::Sqlx), 5.0),
    (DimensionValue::Orm(OrmId::Diesel), 4.0),
    (DimensionValue::Orm(OrmId::SeaOrm), 3.0),
    (DimensionValue::Orm(OrmId::Gorm), 6.0),
    (DimensionValue::Orm(OrmId::Hibernate), 7.0),
    (DimensionValue::Orm(OrmId::EfCore), 6.0),
    (DimensionValue::Orm(OrmId::ActiveRecord), 6.0),
    (DimensionValue::Orm(OrmId::Eloquent), 5.0),
    (DimensionValue::Orm(OrmId::Ecto), 5.0),
    (DimensionValue::Orm(OrmId::None), 3.0),
    (DimensionValue::Transport(TransportId::Rest), 10.0),
    (DimensionValue::Transport(TransportId::Graphql), 3.0),
    (DimensionValue::Transport(TransportId::Grpc), 2.0),
    (DimensionValue::Transport(TransportId::Websocket), 2.0),
    (DimensionValue::Transport(TransportId::Trpc), 2.0),
    (DimensionValue::Packaging(PackagingId::Docker), 8.0),
    (DimensionValue::Packaging(PackagingId::DockerCompose), 6.0),
    (DimensionValue::Packaging(PackagingId::Kubernetes), 3.0),
    (DimensionValue::Packaging(PackagingId::Serverless), 2.0),
    (DimensionValue::Packaging(PackagingId::None), 2.0),
    (DimensionValue::Cicd(CicdId::GithubActions), 10.0),
    (DimensionValue::Cicd(CicdId::GitlabCi), 4.0),
    (DimensionValue::Cicd(CicdId::CircleCi), 2.0),
    (DimensionValue::BuildTool(BuildToolId::Npm), 6.0),
    (DimensionValue::BuildTool(BuildToolId::Pnpm), 5.0),
    (DimensionValue::BuildTool(BuildToolId::Yarn), 3.0),
    (DimensionValue::BuildTool(BuildToolId::Pip), 3.0),
    (DimensionValue::BuildTool(BuildToolId::Poetry), 4.0),
    (DimensionValue::BuildTool(BuildToolId::Uv), 4.0),
    (DimensionValue::BuildTool(BuildToolId::Maven), 5.0),
    (DimensionValue::BuildTool(BuildToolId::Gradle), 5.0),
    (DimensionValue::BuildTool(BuildToolId::CMake), 4.0),
    (DimensionValue::Styling(StylingId::Tailwind), 8.0),
    (DimensionValue::Styling(StylingId::CssModules), 3.0),
    (DimensionValue::Styling(StylingId::StyledComponents), 3.0),
    (DimensionValue::Styling(StylingId::Sass), 2.0),
    (DimensionValue::Styling(StylingId::None), 2.0),
    (DimensionValue::Testing(TestingId::Jest), 6.0),
    (DimensionValue::Testing(TestingId::Vitest), 6.0),
    (DimensionValue::Testing(TestingId::Pytest), 8.0),
    (DimensionValue::Testing(TestingId::Junit), 6.0),
    (DimensionValue::Testing(TestingId::Xunit), 3.0),
    (DimensionValue::Testing(TestingId::Rspec), 4.0),
    (DimensionValue::Testing(TestingId::Phpunit), 4.0),
    (DimensionValue::Testing(TestingId::GoogleTest), 3.0),
];

const DEFAULT_WEIGHT: f64 = 1.0;

/// Dimension × value space plus compatibility metadata.
#[derive(Debug, Clone)]
pub struct UniversalMatrix {
    archetypes: BTreeMap<ArchetypeId, ArchetypeProfile>,
    language_runtimes: BTreeMap<LanguageId, Vec<RuntimeId>>,
    framework_languages: BTreeMap<FrameworkId, Vec<LanguageId>>,
    orms: BTreeMap<OrmId, OrmProfile>,
    language_build_tools: BTreeMap<LanguageId, Vec<BuildToolId>>,
    language_testing: BTreeMap<LanguageId, Vec<TestingId>>,
    fallback_frameworks: BTreeMap<(ArchetypeId, LanguageId), FrameworkId>,
    equivalences: Vec<LanguageEquivalence>,
    weights: BTreeMap<DimensionValue, f64>,
}

impl UniversalMatrix {
    /// The built-in matrix.
    pub fn standard() -> Self {
        let archetypes = ARCHETYPES
            .iter()
            .map(|(a, langs, fws, dbs, transports, packaging, styling)| {
                (
                    *a,
                    ArchetypeProfile {
                        archetype: *a,
                        languages: langs.to_vec(),
                        frameworks: fws.to_vec(),
                        databases: dbs.to_vec(),
                        transports: transports.to_vec(),
                        packaging: packaging.to_vec(),
                        styling: styling.to_vec(),
                    },
                )
            })
            .collect();

        let orms = ORMS
            .iter()
            .map(|(orm, langs, dbs)| {
                (
                    *orm,
                    OrmProfile {
                        orm: *orm,
                        languages: langs.to_vec(),
                        databases: dbs.to_vec(),
                    },
                )
            })
            .collect();

        Self {
            archetypes,
            language_runtimes: to_map(LANGUAGE_RUNTIMES),
            framework_languages: to_map(FRAMEWORK_LANGUAGES),
            orms,
            language_build_tools: to_map(LANGUAGE_BUILD_TOOLS),
            language_testing: to_map(LANGUAGE_TESTING),
            fallback_frameworks: FALLBACK_FRAMEWORKS
                .iter()
                .map(|(a, l, f)| ((*a, *l), *f))
                .collect(),
            equivalences: vec![
                LanguageEquivalence {
                    languages: vec![L::TypeScript, L::JavaScript],
                    frameworks: NODE_FRAMEWORKS.to_vec(),
                },
                LanguageEquivalence {
                    languages: vec![L::Java, L::Kotlin],
                    frameworks: JVM_FRAMEWORKS.to_vec(),
                },
            ],
            weights: WEIGHTS.iter().copied().collect(),
        }
    }

    /// Overrides the popularity weight of one value.
    pub fn with_weight(mut self, value: DimensionValue, weight: f64) -> Self {
        self.weights.insert(value, weight);
        self
    }

    pub fn archetypes(&self) -> impl Iterator<Item = &ArchetypeProfile> {
        self.archetypes.values()
    }

    pub fn archetype(&self, archetype: ArchetypeId) -> Option<&ArchetypeProfile> {
        self.archetypes.get(&archetype)
    }

    pub fn languages_for_archetype(&self, archetype: ArchetypeId) -> &[LanguageId] {
        self.archetypes
            .get(&archetype)
            .map(|p| p.languages.as_slice())
            .unwrap_or(&[])
    }

    pub fn runtimes_for(&self, language: LanguageId) -> &[RuntimeId] {
        self.language_runtimes
            .get(&language)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn framework_languages(&self, framework: FrameworkId) -> &[LanguageId] {
        self.framework_languages
            .get(&framework)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn frameworks(&self) -> impl Iterator<Item = (&FrameworkId, &Vec<LanguageId>)> {
        self.framework_languages.iter()
    }

    /// The first archetype whose framework list contains `framework`.
    pub fn archetype_of_framework(&self, framework: FrameworkId) -> Option<ArchetypeId> {
        self.archetypes
            .values()
            .find(|p| p.frameworks.contains(&framework))
            .map(|p| p.archetype)
    }

    pub fn orm(&self, orm: OrmId) -> Option<&OrmProfile> {
        self.orms.get(&orm)
    }

    pub fn orms(&self) -> impl Iterator<Item = &OrmProfile> {
        self.orms.values()
    }

    pub fn orms_for_language(&self, language: LanguageId) -> Vec<OrmId> {
        self.orms
            .values()
            .filter(|p| p.languages.contains(&language))
            .map(|p| p.orm)
            .collect()
    }

    pub fn build_tools_for(&self, language: LanguageId) -> &[BuildToolId] {
        self.language_build_tools
            .get(&language)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn testing_for(&self, language: LanguageId) -> &[TestingId] {
        self.language_testing
            .get(&language)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn fallback_framework(
        &self,
        archetype: ArchetypeId,
        language: LanguageId,
    ) -> Option<FrameworkId> {
        if let Some(fw) = self.fallback_frameworks.get(&(archetype, language)) {
            return Some(*fw);
        }
        match self.archetypes.get(&archetype) {
            Some(profile) if profile.frameworks == [F::Stdlib] => Some(F::Stdlib),
            _ => None,
        }
    }

    pub fn equivalences(&self) -> &[LanguageEquivalence] {
        &self.equivalences
    }

    /// Whether `actual` satisfies a requirement for `required` given the
    /// stack's framework.
    pub fn languages_equivalent(
        &self,
        required: LanguageId,
        actual: LanguageId,
        framework: Option<FrameworkId>,
    ) -> bool {
        required == actual
            || self
                .equivalences
                .iter()
                .any(|eq| eq.exempts(required, actual, framework))
    }

    pub fn weight(&self, value: DimensionValue) -> f64 {
        self.weights.get(&value).copied().unwrap_or(DEFAULT_WEIGHT)
    }

    /// Candidate values for `dimension` before constraint filtering.
    ///
    /// Frameworks are scoped to the archetype when one is chosen; every other
    /// dimension offers its full value list.
    pub fn candidates(&self, dimension: Dimension, partial: &PartialStack) -> Vec<DimensionValue> {
        match (dimension, partial.archetype) {
            (Dimension::Framework, Some(archetype)) => self
                .archetypes
                .get(&archetype)
                .map(|p| {
                    p.frameworks
                        .iter()
                        .map(|f| DimensionValue::Framework(*f))
                        .collect()
                })
                .unwrap_or_default(),
            (Dimension::Language, Some(archetype)) => self
                .languages_for_archetype(archetype)
                .iter()
                .map(|l| DimensionValue::Language(*l))
                .collect(),
            _ => dimension.values(),
        }
    }
}

impl Default for UniversalMatrix {
    fn default() -> Self {
        Self::standard()
    }
}

fn to_map<K: Ord + Copy, V: Copy>(table: &[(K, &[V])]) -> BTreeMap<K, Vec<V>> {
    table.iter().map(|(k, v)| (*k, v.to_vec())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_archetype_has_a_profile() {
        let matrix = UniversalMatrix::standard();
        for archetype in ArchetypeId::all_variants() {
            let profile = matrix.archetype(*archetype).expect("profile");
            assert!(!profile.languages.is_empty(), "{archetype} has no languages");
            assert!(!profile.frameworks.is_empty(), "{archetype} has no frameworks");
        }
    }

    #[test]
    fn test_every_language_has_runtime_build_tool_and_testing() {
        let matrix = UniversalMatrix::standard();
        for language in LanguageId::all_variants() {
            assert!(!matrix.runtimes_for(*language).is_empty(), "{language}");
            assert!(!matrix.build_tools_for(*language).is_empty(), "{language}");
            assert!(!matrix.testing_for(*language).is_empty(), "{language}");
        }
    }

    #[test]
    fn test_every_framework_lists_languages() {
        let matrix = UniversalMatrix::standard();
        for framework in FrameworkId::all_variants() {
            assert!(
                !matrix.framework_languages(*framework).is_empty(),
                "{framework} has no languages"
            );
        }
    }

    #[test]
    fn test_frameworkless_archetypes_have_fallbacks() {
        let matrix = UniversalMatrix::standard();
        for archetype in [A::Library, A::Game] {
            for language in matrix.languages_for_archetype(archetype) {
                let fw = matrix.fallback_framework(archetype, *language);
                assert!(fw.is_some(), "{archetype}/{language} has no fallback");
                assert!(matrix
                    .archetype(archetype)
                    .unwrap()
                    .frameworks
                    .contains(&fw.unwrap()));
            }
        }
        assert_eq!(matrix.fallback_framework(A::Backend, L::Rust), None);
    }

    #[test]
    fn test_language_equivalence_is_framework_scoped() {
        let matrix = UniversalMatrix::standard();
        assert!(matrix.languages_equivalent(L::TypeScript, L::JavaScript, Some(F::Express)));
        assert!(matrix.languages_equivalent(L::Java, L::Kotlin, Some(F::SpringBoot)));
        assert!(!matrix.languages_equivalent(L::Java, L::Kotlin, Some(F::Ktor)));
        assert!(!matrix.languages_equivalent(L::TypeScript, L::JavaScript, None));
        assert!(!matrix.languages_equivalent(L::TypeScript, L::Python, Some(F::Express)));
    }

    #[test]
    fn test_weights_default_to_one() {
        let matrix = UniversalMatrix::standard();
        assert_eq!(matrix.weight(DimensionValue::Language(L::TypeScript)), 10.0);
        assert_eq!(matrix.weight(DimensionValue::Language(L::Elixir)), 1.0);

        let tuned = matrix.with_weight(DimensionValue::Language(L::Elixir), 4.0);
        assert_eq!(tuned.weight(DimensionValue::Language(L::Elixir)), 4.0);
    }

    #[test]
    fn test_framework_candidates_scoped_to_archetype() {
        let matrix = UniversalMatrix::standard();
        let partial = PartialStack::new().with(DimensionValue::Archetype(A::Cli));
        let candidates = matrix.candidates(Dimension::Framework, &partial);
        assert_eq!(candidates.len(), 5);
        assert!(candidates.contains(&DimensionValue::Framework(F::Clap)));
        assert_eq!(
            matrix.candidates(Dimension::Framework, &PartialStack::new()).len(),
            FrameworkId::all_variants().len()
        );
    }

    #[test]
    fn test_orms_for_language() {
        let matrix = UniversalMatrix::standard();
        assert_eq!(matrix.orms_for_language(L::Go), vec![OrmId::Gorm, OrmId::Ent]);
        assert!(matrix.orms_for_language(L::Cpp).is_empty());
    }

    #[test]
    fn test_archetype_of_framework() {
        let matrix = UniversalMatrix::standard();
        assert_eq!(matrix.archetype_of_framework(F::Axum), Some(A::Backend));
        assert_eq!(matrix.archetype_of_framework(F::NextJs), Some(A::Fullstack));
        assert_eq!(matrix.archetype_of_framework(F::Bevy), Some(A::Game));
    }
}
