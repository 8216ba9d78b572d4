//! Per-stack build and run commands shared by the packaging strategies and
//! the enrichment layer.

use super::common::{module_name, pascal_case};
use crate::stack::{
    ArchetypeId, BuildToolId, FrameworkId, LanguageId, TechStack, TestingId,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toolchain {
    pub build_image: String,
    /// Separate runtime image for multi-stage builds; `None` reuses the build image.
    pub runtime_image: Option<String>,
    /// Files copied before the install step so dependency layers cache.
    pub manifests: Vec<String>,
    pub install: Vec<String>,
    pub build: Vec<String>,
    pub test: String,
    pub run: String,
    pub artifacts: Vec<String>,
    pub port: Option<u16>,
    /// Static bundle served by a web server instead of a process.
    pub static_site: bool,
}

impl Toolchain {
    pub fn for_stack(stack: &TechStack, project_name: &str) -> Self {
        let mut chain = match stack.build_tool {
            BuildToolId::Npm | BuildToolId::Pnpm | BuildToolId::Yarn | BuildToolId::Bun => {
                node(stack)
            }
            BuildToolId::Deno => deno(stack),
            BuildToolId::Pip | BuildToolId::Poetry | BuildToolId::Uv => python(stack, project_name),
            BuildToolId::Cargo => Self {
                build_image: "rust:1.83".into(),
                runtime_image: Some("debian:bookworm-slim".into()),
                manifests: vec!["Cargo.toml".into()],
                install: vec!["cargo fetch".into()],
                build: vec!["cargo build --release".into()],
                test: "cargo test".into(),
                run: format!("./target/release/{project_name}"),
                artifacts: vec![format!("target/release/{project_name}")],
                ..Self::empty()
            },
            BuildToolId::GoModules => Self {
                build_image: "golang:1.23".into(),
                runtime_image: Some("gcr.io/distroless/base-debian12".into()),
                manifests: vec!["go.mod".into()],
                install: vec!["go mod download".into()],
                build: vec![format!("go build -o bin/{project_name} .")],
                test: "go test ./...".into(),
                run: format!("./bin/{project_name}"),
                artifacts: vec![format!("bin/{project_name}")],
                ..Self::empty()
            },
            BuildToolId::Maven => Self {
                build_image: "maven:3.9-eclipse-temurin-21".into(),
                runtime_image: Some("eclipse-temurin:21-jre".into()),
                manifests: vec!["pom.xml".into()],
                install: vec!["mvn -B dependency:go-offline".into()],
                build: vec!["mvn -B package -DskipTests".into()],
                test: "mvn -B test".into(),
                run: format!("java -jar target/{project_name}.jar"),
                artifacts: vec![format!("target/{project_name}.jar")],
                ..Self::empty()
            },
            BuildToolId::Gradle => Self {
                build_image: "gradle:8-jdk21".into(),
                runtime_image: Some("eclipse-temurin:21-jre".into()),
                manifests: vec!["build.gradle.kts".into(), "settings.gradle.kts".into()],
                install: vec!["gradle dependencies --no-daemon".into()],
                build: vec!["gradle build -x test --no-daemon".into()],
                test: "gradle test --no-daemon".into(),
                run: format!("java -jar build/libs/{project_name}.jar"),
                artifacts: vec![format!("build/libs/{project_name}.jar")],
                ..Self::empty()
            },
            BuildToolId::DotnetCli => {
                let assembly = pascal_case(project_name);
                Self {
                    build_image: "mcr.microsoft.com/dotnet/sdk:8.0".into(),
                    runtime_image: Some(if stack.framework == FrameworkId::AspNetCore {
                        "mcr.microsoft.com/dotnet/aspnet:8.0".into()
                    } else {
                        "mcr.microsoft.com/dotnet/runtime:8.0".into()
                    }),
                    manifests: vec![format!("{assembly}.csproj")],
                    install: vec!["dotnet restore".into()],
                    build: vec!["dotnet publish -c Release -o out".into()],
                    test: "dotnet test".into(),
                    run: format!("dotnet out/{assembly}.dll"),
                    artifacts: vec!["out/".into()],
                    ..Self::empty()
                }
            }
            BuildToolId::Bundler => Self {
                build_image: "ruby:3.3".into(),
                manifests: vec!["Gemfile".into()],
                install: vec!["bundle install".into()],
                test: match stack.testing {
                    TestingId::Rspec => "bundle exec rspec".into(),
                    _ => "bundle exec rake test".into(),
                },
                run: match stack.framework {
                    FrameworkId::Rails => "bundle exec rails server -b 0.0.0.0".into(),
                    FrameworkId::Sinatra => "bundle exec ruby app.rb -o 0.0.0.0".into(),
                    _ => format!("bundle exec ruby lib/{}.rb", module_name(project_name)),
                },
                ..Self::empty()
            },
            BuildToolId::Composer => Self {
                build_image: "php:8.3-cli".into(),
                manifests: vec!["composer.json".into()],
                install: vec!["composer install --no-interaction".into()],
                test: match stack.testing {
                    TestingId::Pest => "vendor/bin/pest".into(),
                    _ => "vendor/bin/phpunit".into(),
                },
                run: match stack.framework {
                    FrameworkId::Laravel => "php artisan serve --host=0.0.0.0 --port=8000".into(),
                    _ => "php -S 0.0.0.0:8000 -t public".into(),
                },
                ..Self::empty()
            },
            BuildToolId::Mix => Self {
                build_image: "elixir:1.17".into(),
                manifests: vec!["mix.exs".into()],
                install: vec!["mix local.hex --force".into(), "mix deps.get".into()],
                build: vec!["mix compile".into()],
                test: "mix test".into(),
                run: match stack.framework {
                    FrameworkId::Phoenix => "mix phx.server".into(),
                    _ => "mix run --no-halt".into(),
                },
                ..Self::empty()
            },
            BuildToolId::SwiftPm => {
                let product = pascal_case(project_name);
                Self {
                    build_image: "swift:5.10".into(),
                    runtime_image: Some("swift:5.10-slim".into()),
                    manifests: vec!["Package.swift".into()],
                    install: vec!["swift package resolve".into()],
                    build: vec!["swift build -c release".into()],
                    test: "swift test".into(),
                    run: format!(".build/release/{product}"),
                    artifacts: vec![format!(".build/release/{product}")],
                    ..Self::empty()
                }
            }
            BuildToolId::Pub => {
                let flutter = stack.framework == FrameworkId::Flutter;
                let tool = if flutter { "flutter" } else { "dart" };
                Self {
                    build_image: if flutter {
                        "ghcr.io/cirruslabs/flutter:stable".into()
                    } else {
                        "dart:stable".into()
                    },
                    manifests: vec!["pubspec.yaml".into()],
                    install: vec![format!("{tool} pub get")],
                    build: if flutter {
                        vec!["flutter build apk".into()]
                    } else {
                        vec![]
                    },
                    test: format!("{tool} test"),
                    run: format!("{tool} run"),
                    ..Self::empty()
                }
            }
            BuildToolId::CMake => Self {
                build_image: "gcc:14".into(),
                runtime_image: Some("debian:bookworm-slim".into()),
                manifests: vec!["CMakeLists.txt".into()],
                install: vec!["apt-get update && apt-get install -y cmake".into()],
                build: vec![
                    "cmake -S . -B build -DCMAKE_BUILD_TYPE=Release".into(),
                    "cmake --build build".into(),
                ],
                test: "ctest --test-dir build".into(),
                run: format!("./build/{project_name}"),
                artifacts: vec![format!("build/{project_name}")],
                ..Self::empty()
            },
            BuildToolId::Meson => Self {
                build_image: "gcc:14".into(),
                runtime_image: Some("debian:bookworm-slim".into()),
                manifests: vec!["meson.build".into()],
                install: vec!["apt-get update && apt-get install -y meson ninja-build".into()],
                build: vec!["meson setup build".into(), "meson compile -C build".into()],
                test: "meson test -C build".into(),
                run: format!("./build/{project_name}"),
                artifacts: vec![format!("build/{project_name}")],
                ..Self::empty()
            },
        };
        chain.port = default_port(stack);
        if chain.static_site {
            chain.port = Some(80);
        }
        chain
    }

    fn empty() -> Self {
        Self {
            build_image: String::new(),
            runtime_image: None,
            manifests: Vec::new(),
            install: Vec::new(),
            build: Vec::new(),
            test: String::new(),
            run: String::new(),
            artifacts: Vec::new(),
            port: None,
            static_site: false,
        }
    }

    pub fn build_command(&self) -> Option<String> {
        if self.build.is_empty() {
            None
        } else {
            Some(self.build.join(" && "))
        }
    }
}

/// Listening port for server-style frameworks.
pub fn default_port(stack: &TechStack) -> Option<u16> {
    use FrameworkId as F;
    let port = match stack.framework {
        F::Express | F::Fastify | F::NestJs | F::Hono => 3000,
        F::NextJs | F::Nuxt | F::SvelteKit | F::Remix => 3000,
        F::Django | F::FastApi | F::Flask => 8000,
        F::Axum | F::Actix | F::Gin | F::Echo | F::Fiber => 8080,
        F::SpringBoot | F::Quarkus | F::Ktor | F::AspNetCore | F::Vapor => 8080,
        F::Rails => 3000,
        F::Sinatra => 4567,
        F::Laravel | F::Symfony => 8000,
        F::Phoenix => 4000,
        _ => return None,
    };
    Some(port)
}

fn node(stack: &TechStack) -> Toolchain {
    let (image, install, runner) = match stack.build_tool {
        BuildToolId::Pnpm => ("node:20-alpine", "corepack enable && pnpm install", "pnpm"),
        BuildToolId::Yarn => ("node:20-alpine", "yarn install", "yarn"),
        BuildToolId::Bun => ("oven/bun:1", "bun install", "bun run"),
        _ => ("node:20-alpine", "npm install", "npm run"),
    };
    let lockfile_manifests = vec!["package.json".to_string()];
    let ts = stack.language == LanguageId::TypeScript;
    let is_frontend = stack.archetype == ArchetypeId::Frontend;

    let build = if ts || is_frontend || is_meta_framework(stack.framework) {
        vec![format!("{runner} build")]
    } else {
        vec![]
    };

    let run = if is_meta_framework(stack.framework) {
        format!("{runner} start")
    } else if stack.build_tool == BuildToolId::Bun {
        format!("bun {}", node_entry(stack))
    } else if ts {
        "node dist/index.js".to_string()
    } else {
        format!("node {}", node_entry(stack))
    };

    Toolchain {
        build_image: image.into(),
        runtime_image: if is_frontend {
            Some("nginx:alpine".into())
        } else {
            None
        },
        manifests: lockfile_manifests,
        install: vec![install.into()],
        build,
        test: format!("{runner} test"),
        run,
        artifacts: if is_frontend {
            vec!["dist/".into()]
        } else {
            vec![]
        },
        static_site: is_frontend,
        ..Toolchain::empty()
    }
}

fn deno(stack: &TechStack) -> Toolchain {
    let entry = node_entry(stack);
    Toolchain {
        build_image: "denoland/deno:2.1.4".into(),
        manifests: vec!["deno.json".into()],
        install: vec![format!("deno cache {entry}")],
        build: vec![],
        test: "deno task test".into(),
        run: format!("deno run -A {entry}"),
        ..Toolchain::empty()
    }
}

fn python(stack: &TechStack, project_name: &str) -> Toolchain {
    let module = module_name(project_name);
    let (manifests, install, prefix) = match stack.build_tool {
        BuildToolId::Poetry => (
            vec!["pyproject.toml".to_string()],
            "pip install poetry && poetry install --no-root",
            "poetry run ",
        ),
        BuildToolId::Uv => (
            vec!["pyproject.toml".to_string()],
            "pip install uv && uv sync",
            "uv run ",
        ),
        _ => (
            vec!["requirements.txt".to_string()],
            "pip install -r requirements.txt",
            "",
        ),
    };
    let test = match stack.testing {
        TestingId::Unittest => format!("{prefix}python -m unittest discover -s tests"),
        _ => format!("{prefix}pytest"),
    };
    let run = match stack.framework {
        FrameworkId::FastApi => {
            format!("{prefix}uvicorn {module}.main:app --host 0.0.0.0 --port 8000")
        }
        FrameworkId::Django => format!("{prefix}python manage.py runserver 0.0.0.0:8000"),
        FrameworkId::Flask => {
            format!("{prefix}flask --app {module}.main run --host 0.0.0.0 --port 8000")
        }
        _ => format!("{prefix}python -m {module}"),
    };
    Toolchain {
        build_image: "python:3.12-slim".into(),
        manifests,
        install: vec![install.into()],
        test,
        run,
        ..Toolchain::empty()
    }
}

/// Meta-frameworks that ship their own server.
pub fn is_meta_framework(framework: FrameworkId) -> bool {
    matches!(
        framework,
        FrameworkId::NextJs | FrameworkId::Nuxt | FrameworkId::SvelteKit | FrameworkId::Remix
    )
}

/// Entry source file for JavaScript-family stacks.
pub fn node_entry(stack: &TechStack) -> String {
    let ext = if stack.language == LanguageId::TypeScript {
        "ts"
    } else {
        "js"
    };
    match stack.framework {
        FrameworkId::React | FrameworkId::Solid => format!("src/main.{ext}x"),
        FrameworkId::Vue | FrameworkId::Svelte | FrameworkId::Angular => format!("src/main.{ext}"),
        FrameworkId::ReactNative => format!("App.{ext}x"),
        FrameworkId::Electron => format!("src/main.{ext}"),
        _ => format!("src/index.{ext}"),
    }
}
