//! Signal tables consulted by the stack inferrer.
//!
//! Each dimension is decided by the first signal kind that fires, in
//! [`Signal`] order. Tables are data so new ecosystems are a row edit.

use crate::manifest::{ManifestKind, ParsedManifest};
use crate::stack::{
    BuildToolId as B, CicdId as C, DatabaseId as D, DimensionValue as V, FrameworkId as F,
    OrmId as O, PackagingId as P, StylingId as S, TestingId as T, TransportId as Tr,
};
use serde::{Deserialize, Serialize};

/// Where an inferred value came from, strongest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Signal {
    /// A build manifest or lockfile is present.
    Manifest,
    /// A manifest names a known dependency.
    Dependency,
    /// Source file extensions.
    Extension,
    /// Conventional paths or marker content.
    PathConvention,
    /// Read off another inferred dimension.
    Derived,
    /// Nothing matched.
    Fallback,
}

impl Signal {
    pub fn confidence(&self) -> f64 {
        match self {
            Signal::Manifest => 0.95,
            Signal::Dependency => 0.9,
            Signal::Extension => 0.7,
            Signal::PathConvention => 0.6,
            Signal::Derived => 0.5,
            Signal::Fallback => 0.1,
        }
    }
}

/// Matches a dependency name across ecosystems.
#[derive(Debug, Clone, Copy)]
pub enum DependencyPattern {
    /// Exact name, or the last `:`/`/` segment for Maven and Go paths.
    Name(&'static str),
    Prefix(&'static str),
}

impl DependencyPattern {
    pub fn matches(&self, manifest: &ParsedManifest) -> bool {
        match self {
            DependencyPattern::Name(name) => manifest.has_dependency(name),
            DependencyPattern::Prefix(prefix) => manifest.has_dependency_prefix(prefix),
        }
    }

    /// Scans raw manifest text, for manifests that failed to parse.
    ///
    /// A name must stand alone: `react` does not match `react-native`.
    pub fn matches_text(&self, text: &str) -> bool {
        match self {
            DependencyPattern::Name(name) => text.match_indices(name).any(|(start, _)| {
                let before = text[..start].chars().next_back();
                let after = text[start + name.len()..].chars().next();
                !before.is_some_and(is_name_char) && !after.is_some_and(is_name_char)
            }),
            DependencyPattern::Prefix(prefix) => text.match_indices(prefix).any(|(start, _)| {
                !text[..start].chars().next_back().is_some_and(is_name_char)
            }),
        }
    }
}

fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '-' | '_' | '@' | '/' | ':')
}

use DependencyPattern::{Name as N, Prefix as Pre};

/// Ordered so that meta-frameworks win over the libraries they bundle.
pub const FRAMEWORK_DEPENDENCIES: &[(F, &[DependencyPattern])] = &[
    (F::NextJs, &[N("next")]),
    (F::Nuxt, &[N("nuxt")]),
    (F::SvelteKit, &[N("@sveltejs/kit")]),
    (F::Remix, &[Pre("@remix-run/")]),
    (F::NestJs, &[N("@nestjs/core")]),
    (F::Fastify, &[N("fastify")]),
    (F::Hono, &[N("hono")]),
    (F::Express, &[N("express")]),
    (F::ReactNative, &[N("react-native")]),
    (F::Electron, &[N("electron")]),
    (F::Tauri, &[N("@tauri-apps/api"), N("tauri")]),
    (F::Angular, &[N("@angular/core")]),
    (F::Phaser, &[N("phaser")]),
    (F::Svelte, &[N("svelte")]),
    (F::Vue, &[N("vue")]),
    (F::Solid, &[N("solid-js")]),
    (F::React, &[N("react")]),
    (F::Commander, &[N("commander")]),
    (F::Django, &[N("django"), N("Django")]),
    (F::FastApi, &[N("fastapi")]),
    (F::Flask, &[N("flask"), N("Flask")]),
    (F::Typer, &[N("typer")]),
    (F::Click, &[N("click")]),
    (F::Pygame, &[N("pygame")]),
    (F::Axum, &[N("axum")]),
    (F::Actix, &[N("actix-web")]),
    (F::Bevy, &[N("bevy")]),
    (F::Clap, &[N("clap")]),
    (F::Gin, &[N("github.com/gin-gonic/gin")]),
    (F::Echo, &[Pre("github.com/labstack/echo")]),
    (F::Fiber, &[Pre("github.com/gofiber/fiber")]),
    (F::Ebiten, &[Pre("github.com/hajimehoshi/ebiten")]),
    (F::Cobra, &[N("github.com/spf13/cobra")]),
    (F::SpringBoot, &[Pre("org.springframework.boot:")]),
    (F::Quarkus, &[Pre("io.quarkus:")]),
    (F::Ktor, &[Pre("io.ktor:")]),
    (F::JetpackCompose, &[Pre("androidx.compose"), Pre("androidx.activity:activity-compose")]),
    (F::AspNetCore, &[Pre("Microsoft.AspNetCore"), Pre("Swashbuckle.AspNetCore")]),
    (F::MonoGame, &[Pre("MonoGame.Framework")]),
    (F::Rails, &[N("rails")]),
    (F::Sinatra, &[N("sinatra")]),
    (F::Laravel, &[N("laravel/framework")]),
    (F::Symfony, &[N("symfony/framework-bundle")]),
    (F::Phoenix, &[N("phoenix")]),
    (F::Vapor, &[N("vapor")]),
    (F::Flutter, &[N("flutter")]),
    (F::Raylib, &[N("raylib")]),
];

/// Where a conventional file lives.
#[derive(Debug, Clone, Copy)]
pub enum PathMatch {
    Exact(&'static str),
    /// File name at any depth.
    FileName(&'static str),
    Prefix(&'static str),
    Suffix(&'static str),
}

impl PathMatch {
    pub fn matches(&self, path: &str) -> bool {
        match self {
            PathMatch::Exact(p) => path == *p,
            PathMatch::FileName(name) => path.rsplit('/').next() == Some(*name),
            PathMatch::Prefix(prefix) => path.starts_with(prefix),
            PathMatch::Suffix(suffix) => path.ends_with(suffix),
        }
    }
}

/// A value implied by a path, optionally only when the file contains a marker.
#[derive(Debug, Clone, Copy)]
pub struct PathConvention {
    pub value: V,
    pub path: PathMatch,
    pub marker: Option<&'static str>,
}

const fn at(value: V, path: PathMatch) -> PathConvention {
    PathConvention {
        value,
        path,
        marker: None,
    }
}

const fn containing(value: V, path: PathMatch, marker: &'static str) -> PathConvention {
    PathConvention {
        value,
        path,
        marker: Some(marker),
    }
}

use PathMatch::{Exact as E, FileName as Fname, Prefix as Dir, Suffix as Ext};

pub const FRAMEWORK_PATHS: &[PathConvention] = &[
    at(V::Framework(F::Django), Fname("manage.py")),
    at(V::Framework(F::Rails), E("config/routes.rb")),
    at(V::Framework(F::Laravel), E("artisan")),
    at(V::Framework(F::Angular), E("angular.json")),
    at(V::Framework(F::NextJs), Dir("next.config.")),
    at(V::Framework(F::Nuxt), Dir("nuxt.config.")),
    at(V::Framework(F::SvelteKit), E("svelte.config.js")),
    at(V::Framework(F::Symfony), E("src/Kernel.php")),
    containing(V::Framework(F::AspNetCore), Ext(".csproj"), "Microsoft.NET.Sdk.Web"),
    containing(V::Framework(F::SwiftUi), Ext(".swift"), "import SwiftUI"),
    containing(V::Framework(F::Vapor), Ext(".swift"), "import Vapor"),
    containing(V::Framework(F::Phoenix), Ext("_web/router.ex"), "Phoenix.Router"),
];

pub const DATABASE_DEPENDENCIES: &[(D, &[DependencyPattern])] = &[
    (
        D::Postgres,
        &[
            N("pg"),
            N("postgres"),
            N("postgrex"),
            N("psycopg"),
            N("psycopg2"),
            N("psycopg2-binary"),
            N("asyncpg"),
            N("tokio-postgres"),
            N("github.com/lib/pq"),
            Pre("github.com/jackc/pgx"),
            N("gorm.io/driver/postgres"),
            N("org.postgresql:postgresql"),
            Pre("Npgsql"),
            N("fluent-postgres-driver"),
        ],
    ),
    (
        D::Mysql,
        &[
            N("mysql"),
            N("mysql2"),
            N("pymysql"),
            N("mysqlclient"),
            N("myxql"),
            N("github.com/go-sql-driver/mysql"),
            N("gorm.io/driver/mysql"),
            N("com.mysql:mysql-connector-j"),
            Pre("Pomelo.EntityFrameworkCore.MySql"),
            N("fluent-mysql-driver"),
        ],
    ),
    (
        D::Mongodb,
        &[
            N("mongodb"),
            N("mongoose"),
            N("pymongo"),
            N("motor"),
            N("mongo"),
            N("go.mongodb.org/mongo-driver"),
            Pre("MongoDB.Driver"),
            Pre("org.springframework.boot:spring-boot-starter-data-mongodb"),
        ],
    ),
    (
        D::Redis,
        &[
            N("redis"),
            N("ioredis"),
            N("github.com/redis/go-redis/v9"),
            Pre("StackExchange.Redis"),
            N("redix"),
        ],
    ),
    (
        D::Sqlite,
        &[
            N("sqlite3"),
            N("better-sqlite3"),
            N("rusqlite"),
            N("aiosqlite"),
            N("gorm.io/driver/sqlite"),
            N("github.com/mattn/go-sqlite3"),
            Pre("Microsoft.EntityFrameworkCore.Sqlite"),
            N("ecto_sqlite3"),
            N("sqlite3_flutter_libs"),
            N("fluent-sqlite-driver"),
        ],
    ),
];

/// Connection-string schemes found in env and compose files.
pub const DATABASE_MARKERS: &[(D, &str)] = &[
    (D::Postgres, "postgres://"),
    (D::Postgres, "postgresql://"),
    (D::Postgres, "image: postgres"),
    (D::Mysql, "mysql://"),
    (D::Mysql, "image: mysql"),
    (D::Mongodb, "mongodb://"),
    (D::Mongodb, "image: mongo"),
    (D::Redis, "redis://"),
    (D::Redis, "image: redis"),
    (D::Sqlite, "sqlite:"),
];

pub const ORM_DEPENDENCIES: &[(O, &[DependencyPattern])] = &[
    (O::Prisma, &[N("prisma"), N("@prisma/client")]),
    (O::Drizzle, &[N("drizzle-orm")]),
    (O::TypeOrm, &[N("typeorm")]),
    (O::Sequelize, &[N("sequelize")]),
    (O::Mongoose, &[N("mongoose")]),
    (O::SqlAlchemy, &[N("sqlalchemy"), N("SQLAlchemy")]),
    (O::Diesel, &[N("diesel")]),
    (O::SeaOrm, &[N("sea-orm")]),
    (O::Sqlx, &[N("sqlx")]),
    (O::Gorm, &[N("gorm.io/gorm")]),
    (O::Ent, &[N("entgo.io/ent")]),
    (O::Hibernate, &[Pre("org.hibernate"), N("spring-boot-starter-data-jpa"), N("quarkus-hibernate-orm-panache")]),
    (O::Exposed, &[Pre("org.jetbrains.exposed:")]),
    (O::EfCore, &[Pre("Microsoft.EntityFrameworkCore"), Pre("Npgsql.EntityFrameworkCore"), Pre("Pomelo.EntityFrameworkCore")]),
    (O::Eloquent, &[N("illuminate/database")]),
    (O::Doctrine, &[N("doctrine/orm"), N("doctrine/doctrine-bundle")]),
    (O::Ecto, &[N("ecto_sql"), N("ecto")]),
    (O::Fluent, &[N("fluent")]),
    (O::Drift, &[N("drift")]),
];

pub const ORM_PATHS: &[PathConvention] = &[
    at(V::Orm(O::Prisma), E("prisma/schema.prisma")),
    at(V::Orm(O::Drizzle), Dir("drizzle.config.")),
    at(V::Orm(O::Diesel), E("diesel.toml")),
    at(V::Orm(O::ActiveRecord), Dir("db/migrate/")),
    at(V::Orm(O::ActiveRecord), Fname("database.yml")),
    at(V::Orm(O::DjangoOrm), Fname("models.py")),
    at(V::Orm(O::Ent), Dir("ent/schema/")),
];

pub const TRANSPORT_DEPENDENCIES: &[(Tr, &[DependencyPattern])] = &[
    (Tr::Trpc, &[Pre("@trpc/")]),
    (
        Tr::Graphql,
        &[
            N("graphql"),
            Pre("@apollo/"),
            N("strawberry-graphql"),
            N("graphene"),
            N("async-graphql"),
            N("github.com/99designs/gqlgen"),
            N("absinthe"),
            N("graphql-ruby"),
            Pre("HotChocolate"),
        ],
    ),
    (
        Tr::Grpc,
        &[
            N("@grpc/grpc-js"),
            N("grpcio"),
            N("tonic"),
            N("google.golang.org/grpc"),
            Pre("io.grpc:"),
            Pre("Grpc."),
            N("grpc"),
        ],
    ),
    (
        Tr::Websocket,
        &[
            N("ws"),
            N("socket.io"),
            N("websockets"),
            N("tokio-tungstenite"),
            N("github.com/gorilla/websocket"),
        ],
    ),
];

pub const TRANSPORT_PATHS: &[PathConvention] = &[
    at(V::Transport(Tr::Grpc), Ext(".proto")),
    at(V::Transport(Tr::Graphql), Ext(".graphql")),
    at(V::Transport(Tr::Graphql), Ext(".gql")),
];

pub const PACKAGING_PATHS: &[PathConvention] = &[
    at(V::Packaging(P::Serverless), Fname("serverless.yml")),
    at(V::Packaging(P::Serverless), Fname("template.yaml")),
    at(V::Packaging(P::Kubernetes), Dir("k8s/")),
    at(V::Packaging(P::Kubernetes), Dir("kubernetes/")),
    at(V::Packaging(P::Kubernetes), Dir("helm/")),
    at(V::Packaging(P::DockerCompose), Fname("docker-compose.yml")),
    at(V::Packaging(P::DockerCompose), Fname("docker-compose.yaml")),
    at(V::Packaging(P::DockerCompose), Fname("compose.yaml")),
    at(V::Packaging(P::Docker), Fname("Dockerfile")),
];

pub const CICD_PATHS: &[PathConvention] = &[
    at(V::Cicd(C::GithubActions), Dir(".github/workflows/")),
    at(V::Cicd(C::GitlabCi), E(".gitlab-ci.yml")),
    at(V::Cicd(C::CircleCi), Dir(".circleci/")),
    at(V::Cicd(C::Jenkins), E("Jenkinsfile")),
    at(V::Cicd(C::AzurePipelines), E("azure-pipelines.yml")),
];

/// Lockfiles and tool-specific manifests, checked before the manifest kind.
pub const BUILD_TOOL_PATHS: &[PathConvention] = &[
    at(V::BuildTool(B::Pnpm), Fname("pnpm-lock.yaml")),
    at(V::BuildTool(B::Yarn), Fname("yarn.lock")),
    at(V::BuildTool(B::Bun), Fname("bun.lockb")),
    at(V::BuildTool(B::Bun), Fname("bun.lock")),
    at(V::BuildTool(B::Deno), Fname("deno.json")),
    at(V::BuildTool(B::Deno), Fname("deno.jsonc")),
    at(V::BuildTool(B::Npm), Fname("package-lock.json")),
    at(V::BuildTool(B::Poetry), Fname("poetry.lock")),
    containing(V::BuildTool(B::Poetry), Fname("pyproject.toml"), "[tool.poetry"),
    at(V::BuildTool(B::Uv), Fname("uv.lock")),
    at(V::BuildTool(B::Meson), Fname("meson.build")),
];

/// Build tool implied by a manifest when no lockfile decided it.
pub fn build_tool_for_manifest(kind: ManifestKind) -> Option<B> {
    let tool = match kind {
        ManifestKind::PackageJson => B::Npm,
        ManifestKind::DenoJson => B::Deno,
        ManifestKind::CargoToml => B::Cargo,
        ManifestKind::PyProject => B::Uv,
        ManifestKind::Requirements => B::Pip,
        ManifestKind::GoMod => B::GoModules,
        ManifestKind::PomXml => B::Maven,
        ManifestKind::Gradle => B::Gradle,
        ManifestKind::Csproj => B::DotnetCli,
        ManifestKind::Gemfile => B::Bundler,
        ManifestKind::ComposerJson => B::Composer,
        ManifestKind::MixExs => B::Mix,
        ManifestKind::PackageSwift => B::SwiftPm,
        ManifestKind::Pubspec => B::Pub,
        ManifestKind::CMakeLists => B::CMake,
        ManifestKind::MesonBuild => B::Meson,
        ManifestKind::Unknown => return None,
    };
    Some(tool)
}

pub const STYLING_DEPENDENCIES: &[(S, &[DependencyPattern])] = &[
    (S::Tailwind, &[N("tailwindcss"), N("@tailwindcss/vite")]),
    (S::StyledComponents, &[N("styled-components")]),
    (S::Sass, &[N("sass"), N("node-sass")]),
];

pub const STYLING_PATHS: &[PathConvention] = &[
    at(V::Styling(S::Tailwind), Dir("tailwind.config.")),
    at(V::Styling(S::CssModules), Ext(".module.css")),
    at(V::Styling(S::Sass), Ext(".scss")),
];

pub const TESTING_DEPENDENCIES: &[(T, &[DependencyPattern])] = &[
    (T::Vitest, &[N("vitest")]),
    (T::Jest, &[N("jest"), N("ts-jest")]),
    (T::Mocha, &[N("mocha")]),
    (T::Pytest, &[N("pytest")]),
    (T::Kotest, &[Pre("io.kotest:")]),
    (T::Junit, &[Pre("org.junit"), N("junit"), N("spring-boot-starter-test")]),
    (T::Xunit, &[N("xunit")]),
    (T::Nunit, &[N("NUnit"), N("nunit")]),
    (T::Rspec, &[N("rspec"), N("rspec-rails")]),
    (T::Minitest, &[N("minitest")]),
    (T::Pest, &[N("pestphp/pest")]),
    (T::Phpunit, &[N("phpunit/phpunit")]),
    (T::DartTest, &[N("test"), N("flutter_test")]),
    (T::GoogleTest, &[N("googletest"), N("GTest")]),
    (T::Catch2, &[N("Catch2"), N("catch2")]),
];

pub const TESTING_PATHS: &[PathConvention] = &[
    at(V::Testing(T::Pytest), Fname("conftest.py")),
    at(V::Testing(T::Pytest), Fname("pytest.ini")),
    at(V::Testing(T::Rspec), E(".rspec")),
    at(V::Testing(T::Rspec), Ext("_spec.rb")),
    at(V::Testing(T::Minitest), Ext("_test.rb")),
    at(V::Testing(T::GoTest), Ext("_test.go")),
    at(V::Testing(T::ExUnit), Ext("_test.exs")),
    at(V::Testing(T::XcTest), Ext("Tests.swift")),
    at(V::Testing(T::Unittest), Dir("tests/test_")),
    at(V::Testing(T::Phpunit), Fname("phpunit.xml")),
    at(V::Testing(T::Vitest), Dir("vitest.config.")),
    at(V::Testing(T::Jest), Dir("jest.config.")),
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::Dependency;

    fn manifest(names: &[&str]) -> ParsedManifest {
        let mut manifest = ParsedManifest::empty(ManifestKind::PackageJson);
        manifest.dependencies = names.iter().map(|n| Dependency::new(*n, None)).collect();
        manifest
    }

    #[test]
    fn test_signal_confidence_is_ordered() {
        let signals = [
            Signal::Manifest,
            Signal::Dependency,
            Signal::Extension,
            Signal::PathConvention,
            Signal::Derived,
            Signal::Fallback,
        ];
        for pair in signals.windows(2) {
            assert!(pair[0].confidence() > pair[1].confidence());
        }
        assert!(Signal::Fallback.confidence() > 0.0);
    }

    #[test]
    fn test_dependency_patterns() {
        let m = manifest(&["@remix-run/node", "github.com/labstack/echo/v4"]);
        assert!(DependencyPattern::Prefix("@remix-run/").matches(&m));
        assert!(DependencyPattern::Prefix("github.com/labstack/echo").matches(&m));
        assert!(!DependencyPattern::Name("echo").matches(&m));
    }

    #[test]
    fn test_dependency_patterns_on_raw_text() {
        let text = "[dependencies\naxum = { version = \"0.7\"\n\"react-native\": \"0.74\"";
        assert!(DependencyPattern::Name("axum").matches_text(text));
        assert!(DependencyPattern::Name("axum").matches_text("...axum..."));
        assert!(!DependencyPattern::Name("react").matches_text(text));
        assert!(DependencyPattern::Name("react-native").matches_text(text));
        assert!(DependencyPattern::Prefix("@remix-run/").matches_text("\"@remix-run/node\""));
        assert!(!DependencyPattern::Prefix("io.ktor:").matches_text("xio.ktor:core"));
    }

    #[test]
    fn test_path_match() {
        assert!(PathMatch::FileName("manage.py").matches("app/manage.py"));
        assert!(PathMatch::Prefix(".github/workflows/").matches(".github/workflows/ci.yml"));
        assert!(PathMatch::Suffix("_test.go").matches("pkg/handler_test.go"));
        assert!(!PathMatch::Exact("artisan").matches("bin/artisan"));
    }
}
