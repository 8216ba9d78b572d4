//! Deployment packaging: Dockerfile, compose, Kubernetes and serverless
//! manifests. Runs last so it can see the complete skeleton.

use super::common::module_name;
use super::data::database_url;
use super::toolchain::Toolchain;
use crate::stack::{DatabaseId, LanguageId, PackagingId, TechStack};
use crate::strategy::{GenerationContext, GenerationStrategy};
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::{json, Value};

pub struct PackagingStrategy;

#[async_trait]
impl GenerationStrategy for PackagingStrategy {
    fn id(&self) -> &str {
        "packaging"
    }

    fn name(&self) -> &str {
        "Deployment packaging"
    }

    fn priority(&self) -> i32 {
        50
    }

    fn matches(&self, stack: &TechStack) -> bool {
        stack.packaging != PackagingId::None
    }

    async fn apply(&self, ctx: &mut GenerationContext<'_>) -> Result<()> {
        let stack = *ctx.stack;
        let chain = Toolchain::for_stack(&stack, ctx.project_name);

        if stack.packaging.uses_container() {
            ctx.write("Dockerfile", render_dockerfile(&chain, false));
            ctx.write(".dockerignore", dockerignore(stack.language));
        }

        match stack.packaging {
            PackagingId::DockerCompose => {
                let compose = compose_file(ctx.project_name, &stack, &chain);
                ctx.write(
                    "docker-compose.yml",
                    serde_yaml::to_string(&compose).context("rendering docker-compose.yml")?,
                );
            }
            PackagingId::Kubernetes => {
                let deployment = k8s_deployment(ctx.project_name, &chain);
                ctx.write(
                    "k8s/deployment.yaml",
                    serde_yaml::to_string(&deployment).context("rendering deployment")?,
                );
                if let Some(service) = k8s_service(ctx.project_name, &chain) {
                    ctx.write(
                        "k8s/service.yaml",
                        serde_yaml::to_string(&service).context("rendering service")?,
                    );
                }
            }
            PackagingId::Serverless => {
                let config = serverless_config(ctx.project_name, &stack);
                ctx.write(
                    "serverless.yml",
                    serde_yaml::to_string(&config).context("rendering serverless.yml")?,
                );
            }
            _ => {}
        }
        Ok(())
    }
}

/// Renders a Dockerfile from a toolchain.
///
/// Production builds use a multi-stage layout with a non-root user whenever a
/// runtime image is known. Static sites always build in one stage and serve
/// the bundle from nginx.
pub fn render_dockerfile(chain: &Toolchain, production: bool) -> String {
    let mut out = String::new();
    let multi_stage = chain.static_site || (production && chain.runtime_image.is_some());

    if multi_stage {
        out.push_str(&format!("FROM {} AS build\n", chain.build_image));
    } else {
        out.push_str(&format!("FROM {}\n", chain.build_image));
    }
    out.push_str("WORKDIR /app\n");
    if !chain.manifests.is_empty() {
        out.push_str(&format!("COPY {} ./\n", chain.manifests.join(" ")));
    }
    for step in &chain.install {
        out.push_str(&format!("RUN {step}\n"));
    }
    out.push_str("COPY . .\n");
    for step in &chain.build {
        out.push_str(&format!("RUN {step}\n"));
    }

    if chain.static_site {
        let runtime = chain.runtime_image.as_deref().unwrap_or("nginx:alpine");
        out.push_str(&format!("\nFROM {runtime}\n"));
        for artifact in &chain.artifacts {
            out.push_str(&format!(
                "COPY --from=build /app/{artifact} /usr/share/nginx/html/\n"
            ));
        }
        out.push_str("EXPOSE 80\n");
        return out;
    }

    if multi_stage {
        if let Some(runtime) = &chain.runtime_image {
            out.push_str(&format!("\nFROM {runtime}\nWORKDIR /app\n"));
            if chain.artifacts.is_empty() {
                out.push_str("COPY --from=build /app /app\n");
            }
            for artifact in &chain.artifacts {
                out.push_str(&format!("COPY --from=build /app/{artifact} /app/{artifact}\n"));
            }
            if !runtime.contains("distroless") {
                out.push_str("RUN useradd --system --uid 10001 app || adduser -S -u 10001 app\n");
            }
            out.push_str("USER 10001\n");
        }
    }

    if let Some(port) = chain.port {
        out.push_str(&format!("ENV PORT={port}\nEXPOSE {port}\n"));
        if production {
            out.push_str(&format!(
                "HEALTHCHECK --interval=30s --timeout=3s CMD wget -qO- http://localhost:{port}/health || exit 1\n"
            ));
        }
    }
    out.push_str(&format!("CMD {}\n", exec_form(&chain.run)));
    out
}

fn exec_form(command: &str) -> String {
    let parts = if command.contains(' ') {
        vec!["sh", "-c", command]
    } else {
        vec![command]
    };
    serde_json::to_string(&parts).unwrap_or_else(|_| format!("[\"{command}\"]"))
}

/// `.dockerignore` listing VCS files and per-language build output.
pub fn dockerignore(language: LanguageId) -> String {
    let mut out = String::from(".git\n.env\nDockerfile\n.dockerignore\n");
    let extra = match language {
        LanguageId::TypeScript | LanguageId::JavaScript => "node_modules\ndist\n",
        LanguageId::Python => "__pycache__\n.venv\n",
        LanguageId::Rust => "target\n",
        LanguageId::Java | LanguageId::Kotlin => "target\nbuild\n.gradle\n",
        LanguageId::CSharp => "bin\nobj\nout\n",
        LanguageId::Elixir => "_build\ndeps\n",
        LanguageId::Swift => ".build\n",
        LanguageId::Dart => ".dart_tool\nbuild\n",
        LanguageId::Cpp => "build\nbuilddir\n",
        LanguageId::Go | LanguageId::Ruby | LanguageId::Php => "",
    };
    out.push_str(extra);
    out
}

fn database_service(database: DatabaseId) -> Option<Value> {
    let service = match database {
        DatabaseId::Postgres => json!({
            "image": "postgres:16-alpine",
            "environment": {
                "POSTGRES_USER": "app",
                "POSTGRES_PASSWORD": "app",
            },
            "ports": ["5432:5432"],
            "volumes": ["db-data:/var/lib/postgresql/data"],
        }),
        DatabaseId::Mysql => json!({
            "image": "mysql:8.4",
            "environment": {
                "MYSQL_USER": "app",
                "MYSQL_PASSWORD": "app",
                "MYSQL_ROOT_PASSWORD": "root",
            },
            "ports": ["3306:3306"],
            "volumes": ["db-data:/var/lib/mysql"],
        }),
        DatabaseId::Mongodb => json!({
            "image": "mongo:7",
            "ports": ["27017:27017"],
            "volumes": ["db-data:/data/db"],
        }),
        DatabaseId::Redis => json!({
            "image": "redis:7-alpine",
            "ports": ["6379:6379"],
        }),
        DatabaseId::Sqlite | DatabaseId::None => return None,
    };
    Some(service)
}

fn compose_file(name: &str, stack: &TechStack, chain: &Toolchain) -> Value {
    let mut app = json!({ "build": "." });
    if let Some(port) = chain.port {
        app["ports"] = json!([format!("{port}:{port}")]);
    }

    let mut services = serde_json::Map::new();
    let mut compose = json!({});
    if let Some(db) = database_service(stack.database) {
        if let Some(url) = database_url(stack.database, name) {
            app["environment"] = json!({ "DATABASE_URL": url });
        }
        app["depends_on"] = json!(["db"]);
        services.insert("db".into(), db);
        if stack.database != DatabaseId::Redis {
            compose["volumes"] = json!({ "db-data": {} });
        }
    }
    services.insert(module_name(name), app);
    compose["services"] = Value::Object(services);
    compose
}

fn labels(name: &str) -> Value {
    json!({ "app.kubernetes.io/name": name })
}

fn k8s_deployment(name: &str, chain: &Toolchain) -> Value {
    let mut container = json!({
        "name": name,
        "image": format!("{name}:latest"),
    });
    if let Some(port) = chain.port {
        container["ports"] = json!([{ "containerPort": port }]);
        container["readinessProbe"] = json!({
            "httpGet": { "path": if chain.static_site { "/" } else { "/health" }, "port": port },
        });
    }
    json!({
        "apiVersion": "apps/v1",
        "kind": "Deployment",
        "metadata": { "name": name, "labels": labels(name) },
        "spec": {
            "replicas": 2,
            "selector": { "matchLabels": labels(name) },
            "template": {
                "metadata": { "labels": labels(name) },
                "spec": { "containers": [container] },
            },
        },
    })
}

fn k8s_service(name: &str, chain: &Toolchain) -> Option<Value> {
    let port = chain.port?;
    Some(json!({
        "apiVersion": "v1",
        "kind": "Service",
        "metadata": { "name": name, "labels": labels(name) },
        "spec": {
            "selector": labels(name),
            "ports": [{ "port": 80, "targetPort": port }],
        },
    }))
}

fn lambda_runtime(language: LanguageId) -> &'static str {
    match language {
        LanguageId::TypeScript | LanguageId::JavaScript => "nodejs20.x",
        LanguageId::Python => "python3.12",
        LanguageId::Java | LanguageId::Kotlin => "java21",
        LanguageId::CSharp => "dotnet8",
        LanguageId::Ruby => "ruby3.3",
        _ => "provided.al2023",
    }
}

fn serverless_config(name: &str, stack: &TechStack) -> Value {
    let handler = match stack.language {
        LanguageId::TypeScript | LanguageId::JavaScript => "dist/handler.handler".to_string(),
        LanguageId::Python => format!("{}.main.handler", module_name(name)),
        _ => "bootstrap".to_string(),
    };
    json!({
        "service": name,
        "frameworkVersion": "3",
        "provider": {
            "name": "aws",
            "runtime": lambda_runtime(stack.language),
            "region": "us-east-1",
        },
        "functions": {
            "api": {
                "handler": handler,
                "events": [{ "httpApi": "*" }],
            },
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stack::*;

    fn stack(packaging: PackagingId, database: DatabaseId) -> TechStack {
        TechStack {
            archetype: ArchetypeId::Backend,
            language: LanguageId::Go,
            runtime: RuntimeId::Go,
            framework: FrameworkId::Gin,
            database,
            orm: OrmId::None,
            transport: TransportId::Rest,
            packaging,
            cicd: CicdId::GithubActions,
            build_tool: BuildToolId::GoModules,
            styling: StylingId::None,
            testing: TestingId::GoTest,
        }
    }

    #[test]
    fn test_dev_dockerfile_is_single_stage() {
        let chain = Toolchain::for_stack(&stack(PackagingId::Docker, DatabaseId::None), "svc");
        let dockerfile = render_dockerfile(&chain, false);
        assert_eq!(dockerfile.matches("FROM ").count(), 1);
        assert!(dockerfile.contains("EXPOSE 8080"));
        assert!(dockerfile.ends_with("CMD [\"./bin/svc\"]\n"));
    }

    #[test]
    fn test_production_dockerfile_is_multi_stage() {
        let chain = Toolchain::for_stack(&stack(PackagingId::Docker, DatabaseId::None), "svc");
        let dockerfile = render_dockerfile(&chain, true);
        assert!(dockerfile.contains("AS build"));
        assert!(dockerfile.contains("COPY --from=build /app/bin/svc /app/bin/svc"));
        assert!(dockerfile.contains("USER 10001"));
        assert!(dockerfile.contains("HEALTHCHECK"));
    }

    #[test]
    fn test_compose_has_database_service() {
        let s = stack(PackagingId::DockerCompose, DatabaseId::Postgres);
        let chain = Toolchain::for_stack(&s, "calm-heron");
        let compose = compose_file("calm-heron", &s, &chain);
        assert_eq!(compose["services"]["db"]["image"], "postgres:16-alpine");
        assert_eq!(compose["services"]["calm_heron"]["depends_on"][0], "db");
        assert_eq!(
            compose["services"]["calm_heron"]["environment"]["DATABASE_URL"],
            "postgres://app:app@db:5432/calm_heron"
        );

        let rendered = serde_yaml::to_string(&compose).unwrap();
        let reparsed: serde_yaml::Value = serde_yaml::from_str(&rendered).unwrap();
        assert!(reparsed["volumes"].get("db-data").is_some());
    }

    #[test]
    fn test_service_requires_port() {
        let mut s = stack(PackagingId::Kubernetes, DatabaseId::None);
        s.archetype = ArchetypeId::Cli;
        s.framework = FrameworkId::Cobra;
        let chain = Toolchain::for_stack(&s, "tool");
        assert!(k8s_service("tool", &chain).is_none());
    }
}
