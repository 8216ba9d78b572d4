//! Rust projects built with Cargo.

use super::common::module_name;
use crate::stack::{
    ArchetypeId, DatabaseId, FrameworkId, LanguageId, OrmId, TechStack, TransportId,
};
use crate::strategy::{GenerationContext, GenerationStrategy};
use anyhow::Result;
use async_trait::async_trait;

pub struct RustStrategy;

#[async_trait]
impl GenerationStrategy for RustStrategy {
    fn id(&self) -> &str {
        "rust"
    }

    fn name(&self) -> &str {
        "Rust crate"
    }

    fn priority(&self) -> i32 {
        10
    }

    fn matches(&self, stack: &TechStack) -> bool {
        stack.language == LanguageId::Rust
    }

    async fn apply(&self, ctx: &mut GenerationContext<'_>) -> Result<()> {
        let stack = *ctx.stack;
        ctx.write("Cargo.toml", cargo_toml(ctx.project_name, &stack));

        if stack.archetype == ArchetypeId::Library {
            ctx.write("src/lib.rs", lib_rs(ctx.project_name));
        } else {
            ctx.write("src/main.rs", main_rs(ctx.project_name, &stack));
        }

        if stack.framework == FrameworkId::Tauri {
            ctx.write(
                "tauri.conf.json",
                format!(
                    "{{\n  \"productName\": \"{}\",\n  \"version\": \"0.1.0\",\n  \"identifier\": \"dev.upg.{}\",\n  \"app\": {{ \"windows\": [{{ \"title\": \"{}\", \"width\": 1024, \"height\": 768 }}] }}\n}}\n",
                    ctx.project_name,
                    module_name(ctx.project_name),
                    ctx.project_name
                ),
            );
            ctx.write("build.rs", "fn main() {\n    tauri_build::build()\n}\n");
        }

        if stack.archetype != ArchetypeId::Library {
            ctx.write(
                "tests/smoke.rs",
                "#[test]\nfn smoke() {\n    assert_eq!(2 + 2, 4);\n}\n",
            );
        }
        Ok(())
    }
}

fn cargo_toml(name: &str, stack: &TechStack) -> String {
    let mut deps: Vec<String> = Vec::new();
    let mut build_deps: Vec<String> = Vec::new();
    let async_runtime = matches!(stack.framework, FrameworkId::Axum | FrameworkId::Actix)
        || stack.orm == OrmId::Sqlx
        || stack.orm == OrmId::SeaOrm;

    match stack.framework {
        FrameworkId::Axum => {
            deps.push("axum = \"0.7\"".into());
            deps.push("serde = { version = \"1\", features = [\"derive\"] }".into());
            deps.push("serde_json = \"1\"".into());
            deps.push("tracing = \"0.1\"".into());
            deps.push("tracing-subscriber = \"0.3\"".into());
        }
        FrameworkId::Actix => {
            deps.push("actix-web = \"4\"".into());
            deps.push("serde = { version = \"1\", features = [\"derive\"] }".into());
            deps.push("env_logger = \"0.11\"".into());
        }
        FrameworkId::Clap => {
            deps.push("clap = { version = \"4\", features = [\"derive\"] }".into());
            deps.push("anyhow = \"1\"".into());
        }
        FrameworkId::Bevy => deps.push("bevy = \"0.14\"".into()),
        FrameworkId::Tauri => {
            deps.push("tauri = { version = \"2\", features = [] }".into());
            deps.push("serde = { version = \"1\", features = [\"derive\"] }".into());
            build_deps.push("tauri-build = { version = \"2\", features = [] }".into());
        }
        _ => {}
    }

    if async_runtime {
        let features = if stack.framework == FrameworkId::Actix {
            "[\"macros\"]"
        } else {
            "[\"full\"]"
        };
        deps.push(format!("tokio = {{ version = \"1\", features = {features} }}"));
    }

    let db_feature = match stack.database {
        DatabaseId::Postgres => "postgres",
        DatabaseId::Mysql => "mysql",
        _ => "sqlite",
    };
    match stack.orm {
        OrmId::Sqlx => deps.push(format!(
            "sqlx = {{ version = \"0.8\", features = [\"runtime-tokio\", \"{db_feature}\"] }}"
        )),
        OrmId::Diesel => deps.push(format!(
            "diesel = {{ version = \"2.2\", features = [\"{db_feature}\"] }}"
        )),
        OrmId::SeaOrm => deps.push(format!(
            "sea-orm = {{ version = \"1\", features = [\"runtime-tokio-rustls\", \"sqlx-{db_feature}\"] }}"
        )),
        _ => {}
    }
    match stack.database {
        DatabaseId::Redis => deps.push("redis = \"0.27\"".into()),
        DatabaseId::Mongodb => deps.push("mongodb = \"3\"".into()),
        _ => {}
    }
    match stack.transport {
        TransportId::Grpc => {
            deps.push("tonic = \"0.12\"".into());
            deps.push("prost = \"0.13\"".into());
        }
        TransportId::Graphql => deps.push("async-graphql = \"7\"".into()),
        _ => {}
    }

    let mut out = format!(
        "[package]\nname = \"{name}\"\nversion = \"0.1.0\"\nedition = \"2021\"\nlicense = \"MIT\"\n\n[dependencies]\n"
    );
    for dep in deps {
        out.push_str(&dep);
        out.push('\n');
    }
    if !build_deps.is_empty() {
        out.push_str("\n[build-dependencies]\n");
        for dep in build_deps {
            out.push_str(&dep);
            out.push('\n');
        }
    }
    out
}

fn lib_rs(name: &str) -> String {
    format!(
        "//! {name}\n\npub fn greet(who: &str) -> String {{\n    format!(\"Hello, {{who}}!\")\n}}\n\n#[cfg(test)]\nmod tests {{\n    use super::*;\n\n    #[test]\n    fn test_greet() {{\n        assert_eq!(greet(\"world\"), \"Hello, world!\");\n    }}\n}}\n"
    )
}

fn main_rs(name: &str, stack: &TechStack) -> String {
    match stack.framework {
        FrameworkId::Axum => format!(
            "use axum::{{routing::get, Json, Router}};\nuse serde_json::{{json, Value}};\n\nasync fn health() -> Json<Value> {{\n    Json(json!({{ \"status\": \"ok\", \"service\": \"{name}\" }}))\n}}\n\n#[tokio::main]\nasync fn main() {{\n    tracing_subscriber::fmt::init();\n    let app = Router::new().route(\"/health\", get(health));\n    let listener = tokio::net::TcpListener::bind(\"0.0.0.0:8080\").await.unwrap();\n    tracing::info!(\"listening on {{}}\", listener.local_addr().unwrap());\n    axum::serve(listener, app).await.unwrap();\n}}\n"
        ),
        FrameworkId::Actix => format!(
            "use actix_web::{{get, App, HttpResponse, HttpServer, Responder}};\n\n#[get(\"/health\")]\nasync fn health() -> impl Responder {{\n    HttpResponse::Ok().json(health_body())\n}}\n\nfn health_body() -> std::collections::HashMap<&'static str, &'static str> {{\n    [(\"status\", \"ok\"), (\"service\", \"{name}\")].into_iter().collect()\n}}\n\n#[actix_web::main]\nasync fn main() -> std::io::Result<()> {{\n    env_logger::init();\n    HttpServer::new(|| App::new().service(health))\n        .bind((\"0.0.0.0\", 8080))?\n        .run()\n        .await\n}}\n"
        ),
        FrameworkId::Clap => format!(
            "use clap::Parser;\n\n/// {name}\n#[derive(Parser)]\n#[command(version)]\nstruct Cli {{\n    /// Who to greet\n    #[arg(default_value = \"world\")]\n    name: String,\n}}\n\nfn main() -> anyhow::Result<()> {{\n    let cli = Cli::parse();\n    println!(\"Hello, {{}}!\", cli.name);\n    Ok(())\n}}\n"
        ),
        FrameworkId::Bevy => format!(
            "use bevy::prelude::*;\n\nfn main() {{\n    App::new()\n        .add_plugins(DefaultPlugins.set(WindowPlugin {{\n            primary_window: Some(Window {{\n                title: \"{name}\".into(),\n                ..default()\n            }}),\n            ..default()\n        }}))\n        .add_systems(Startup, setup)\n        .run();\n}}\n\nfn setup(mut commands: Commands) {{\n    commands.spawn(Camera2dBundle::default());\n}}\n"
        ),
        FrameworkId::Tauri => "#[tauri::command]\nfn greet(name: &str) -> String {\n    format!(\"Hello, {name}!\")\n}\n\nfn main() {\n    tauri::Builder::default()\n        .invoke_handler(tauri::generate_handler![greet])\n        .run(tauri::generate_context!())\n        .expect(\"error while running tauri application\");\n}\n".to_string(),
        _ => format!("fn main() {{\n    println!(\"Hello from {name}!\");\n}}\n"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stack::*;

    fn axum_stack() -> TechStack {
        TechStack {
            archetype: ArchetypeId::Backend,
            language: LanguageId::Rust,
            runtime: RuntimeId::Native,
            framework: FrameworkId::Axum,
            database: DatabaseId::Postgres,
            orm: OrmId::Sqlx,
            transport: TransportId::Rest,
            packaging: PackagingId::Docker,
            cicd: CicdId::GithubActions,
            build_tool: BuildToolId::Cargo,
            styling: StylingId::None,
            testing: TestingId::CargoTest,
        }
    }

    #[test]
    fn test_cargo_toml_is_valid_toml() {
        let manifest = cargo_toml("calm-heron-ab12", &axum_stack());
        let parsed: toml::Value = toml::from_str(&manifest).unwrap();
        assert_eq!(parsed["package"]["name"].as_str(), Some("calm-heron-ab12"));
        assert!(parsed["dependencies"].get("axum").is_some());
        assert!(parsed["dependencies"].get("tokio").is_some());
        assert!(parsed["dependencies"]["sqlx"]["features"]
            .as_array()
            .unwrap()
            .iter()
            .any(|f| f.as_str() == Some("postgres")));
    }

    #[test]
    fn test_tauri_has_build_dependencies() {
        let mut stack = axum_stack();
        stack.archetype = ArchetypeId::Desktop;
        stack.framework = FrameworkId::Tauri;
        stack.orm = OrmId::None;
        let manifest = cargo_toml("x", &stack);
        let parsed: toml::Value = toml::from_str(&manifest).unwrap();
        assert!(parsed["build-dependencies"].get("tauri-build").is_some());
    }
}
