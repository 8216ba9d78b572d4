//! Python projects built with pip, Poetry or uv.

use super::common::module_name;
use crate::stack::{
    BuildToolId, DatabaseId, FrameworkId, LanguageId, OrmId, TechStack, TestingId, TransportId,
};
use crate::strategy::{GenerationContext, GenerationStrategy};
use anyhow::Result;
use async_trait::async_trait;

pub struct PythonStrategy;

#[async_trait]
impl GenerationStrategy for PythonStrategy {
    fn id(&self) -> &str {
        "python"
    }

    fn name(&self) -> &str {
        "Python project"
    }

    fn priority(&self) -> i32 {
        10
    }

    fn matches(&self, stack: &TechStack) -> bool {
        stack.language == LanguageId::Python
    }

    async fn apply(&self, ctx: &mut GenerationContext<'_>) -> Result<()> {
        let stack = *ctx.stack;
        let module = module_name(ctx.project_name);
        let deps = dependencies(&stack);

        match stack.build_tool {
            BuildToolId::Pip => {
                ctx.write("requirements.txt", requirements(&deps));
                ctx.write(
                    "requirements-dev.txt",
                    format!("-r requirements.txt\n{}\n", dev_dependencies(&stack).join("\n")),
                );
            }
            _ => ctx.write(
                "pyproject.toml",
                pyproject(ctx.project_name, &module, &stack, &deps),
            ),
        }

        ctx.write(format!("{module}/__init__.py"), "__version__ = \"0.1.0\"\n");
        if stack.framework == FrameworkId::Django {
            ctx.write("manage.py", manage_py(&module));
            ctx.write(format!("{module}/settings.py"), django_settings(&module, &stack));
            ctx.write(format!("{module}/urls.py"), django_urls());
            ctx.write(format!("{module}/wsgi.py"), django_wsgi(&module));
        } else {
            ctx.write(format!("{module}/main.py"), main_py(ctx.project_name, &stack));
            ctx.write(
                format!("{module}/__main__.py"),
                format!("from {module}.main import main\n\nif __name__ == \"__main__\":\n    main()\n"),
            );
        }

        ctx.write("tests/__init__.py", "");
        ctx.write("tests/test_main.py", test_py(&module, &stack));
        Ok(())
    }
}

fn dependencies(stack: &TechStack) -> Vec<&'static str> {
    let mut deps = Vec::new();
    match stack.framework {
        FrameworkId::FastApi => deps.extend(["fastapi>=0.115", "uvicorn[standard]>=0.31"]),
        FrameworkId::Django => deps.push("django>=5.1"),
        FrameworkId::Flask => deps.push("flask>=3.0"),
        FrameworkId::Typer => deps.push("typer>=0.12"),
        FrameworkId::Click => deps.push("click>=8.1"),
        FrameworkId::Pygame => deps.push("pygame>=2.6"),
        _ => {}
    }
    if stack.orm == OrmId::SqlAlchemy {
        deps.push("sqlalchemy>=2.0");
    }
    match stack.database {
        DatabaseId::Postgres => deps.push("psycopg[binary]>=3.2"),
        DatabaseId::Mysql => deps.push("pymysql>=1.1"),
        DatabaseId::Mongodb => deps.push("pymongo>=4.10"),
        DatabaseId::Redis => deps.push("redis>=5.1"),
        _ => {}
    }
    match stack.transport {
        TransportId::Graphql => deps.push("strawberry-graphql>=0.243"),
        TransportId::Grpc => deps.extend(["grpcio>=1.66", "protobuf>=5.28"]),
        TransportId::Websocket if stack.framework != FrameworkId::FastApi => {
            deps.push("websockets>=13.1")
        }
        _ => {}
    }
    deps
}

fn dev_dependencies(stack: &TechStack) -> Vec<&'static str> {
    let mut dev = Vec::new();
    if stack.testing == TestingId::Pytest {
        dev.push("pytest>=8.3");
    }
    if stack.framework == FrameworkId::FastApi {
        dev.push("httpx>=0.27");
    }
    dev
}

fn requirements(deps: &[&str]) -> String {
    let mut out = deps.join("\n");
    out.push('\n');
    out
}

fn pyproject(name: &str, module: &str, stack: &TechStack, deps: &[&str]) -> String {
    let quoted = |items: &[&str]| -> String {
        items
            .iter()
            .map(|d| format!("    \"{d}\",\n"))
            .collect::<String>()
    };
    let dev = dev_dependencies(stack);

    match stack.build_tool {
        BuildToolId::Poetry => {
            let mut out = format!(
                "[tool.poetry]\nname = \"{name}\"\nversion = \"0.1.0\"\ndescription = \"\"\nauthors = []\npackages = [{{ include = \"{module}\" }}]\n\n[tool.poetry.dependencies]\npython = \"^3.11\"\n"
            );
            for dep in deps {
                let (pkg, version) = split_requirement(dep);
                out.push_str(&format!("{pkg} = \"{version}\"\n"));
            }
            out.push_str("\n[tool.poetry.group.dev.dependencies]\n");
            for dep in &dev {
                let (pkg, version) = split_requirement(dep);
                out.push_str(&format!("{pkg} = \"{version}\"\n"));
            }
            out.push_str(
                "\n[build-system]\nrequires = [\"poetry-core\"]\nbuild-backend = \"poetry.core.masonry.api\"\n",
            );
            out.push_str(&pytest_section(stack));
            out
        }
        _ => {
            let mut out = format!(
                "[project]\nname = \"{name}\"\nversion = \"0.1.0\"\nrequires-python = \">=3.11\"\ndependencies = [\n{}]\n\n[dependency-groups]\ndev = [\n{}]\n",
                quoted(deps),
                quoted(&dev)
            );
            if matches!(stack.framework, FrameworkId::Typer | FrameworkId::Click) {
                out.push_str(&format!(
                    "\n[project.scripts]\n{name} = \"{module}.main:main\"\n"
                ));
            }
            out.push_str(
                "\n[build-system]\nrequires = [\"hatchling\"]\nbuild-backend = \"hatchling.build\"\n",
            );
            out.push_str(&pytest_section(stack));
            out
        }
    }
}

fn pytest_section(stack: &TechStack) -> String {
    if stack.testing == TestingId::Pytest {
        "\n[tool.pytest.ini_options]\ntestpaths = [\"tests\"]\n".to_string()
    } else {
        String::new()
    }
}

/// `fastapi>=0.115` -> (`fastapi`, `>=0.115`); extras are dropped from the name.
fn split_requirement(req: &str) -> (String, String) {
    match req.find(|c: char| c == '>' || c == '=' || c == '<' || c == '~') {
        Some(idx) => {
            let name = req[..idx].split('[').next().unwrap_or(&req[..idx]);
            (name.to_string(), req[idx..].to_string())
        }
        None => (req.to_string(), "*".to_string()),
    }
}

fn main_py(name: &str, stack: &TechStack) -> String {
    match stack.framework {
        FrameworkId::FastApi => format!(
            "from fastapi import FastAPI\n\napp = FastAPI(title=\"{name}\")\n\n\n@app.get(\"/health\")\ndef health() -> dict:\n    return {{\"status\": \"ok\", \"service\": \"{name}\"}}\n\n\ndef main() -> None:\n    import uvicorn\n\n    uvicorn.run(app, host=\"0.0.0.0\", port=8000)\n"
        ),
        FrameworkId::Flask => format!(
            "from flask import Flask, jsonify\n\napp = Flask(__name__)\n\n\n@app.get(\"/health\")\ndef health():\n    return jsonify(status=\"ok\", service=\"{name}\")\n\n\ndef main() -> None:\n    app.run(host=\"0.0.0.0\", port=8000)\n"
        ),
        FrameworkId::Typer => format!(
            "import typer\n\napp = typer.Typer(help=\"{name}\")\n\n\ndef greet(name: str) -> str:\n    return f\"Hello, {{name}}!\"\n\n\n@app.command()\ndef hello(name: str = \"world\") -> None:\n    typer.echo(greet(name))\n\n\ndef main() -> None:\n    app()\n"
        ),
        FrameworkId::Click => format!(
            "import click\n\n\ndef greet(name: str) -> str:\n    return f\"Hello, {{name}}!\"\n\n\n@click.command(help=\"{name}\")\n@click.option(\"--name\", default=\"world\")\ndef cli(name: str) -> None:\n    click.echo(greet(name))\n\n\ndef main() -> None:\n    cli()\n"
        ),
        FrameworkId::Pygame => format!(
            "import pygame\n\nTITLE = \"{name}\"\n\n\ndef main() -> None:\n    pygame.init()\n    screen = pygame.display.set_mode((800, 600))\n    pygame.display.set_caption(TITLE)\n    clock = pygame.time.Clock()\n    running = True\n    while running:\n        for event in pygame.event.get():\n            if event.type == pygame.QUIT:\n                running = False\n        screen.fill((20, 20, 30))\n        pygame.display.flip()\n        clock.tick(60)\n    pygame.quit()\n"
        ),
        _ => format!(
            "def greet(name: str) -> str:\n    return f\"Hello from {name}, {{name}}!\"\n\n\ndef main() -> None:\n    print(greet(\"world\"))\n"
        ),
    }
}

fn manage_py(module: &str) -> String {
    format!(
        "#!/usr/bin/env python\nimport os\nimport sys\n\n\ndef main() -> None:\n    os.environ.setdefault(\"DJANGO_SETTINGS_MODULE\", \"{module}.settings\")\n    from django.core.management import execute_from_command_line\n\n    execute_from_command_line(sys.argv)\n\n\nif __name__ == \"__main__\":\n    main()\n"
    )
}

fn django_settings(module: &str, stack: &TechStack) -> String {
    let database = match stack.database {
        DatabaseId::Postgres => "{\n        \"ENGINE\": \"django.db.backends.postgresql\",\n        \"NAME\": os.environ.get(\"DB_NAME\", \"app\"),\n        \"USER\": os.environ.get(\"DB_USER\", \"app\"),\n        \"PASSWORD\": os.environ.get(\"DB_PASSWORD\", \"\"),\n        \"HOST\": os.environ.get(\"DB_HOST\", \"localhost\"),\n    }",
        DatabaseId::Mysql => "{\n        \"ENGINE\": \"django.db.backends.mysql\",\n        \"NAME\": os.environ.get(\"DB_NAME\", \"app\"),\n        \"HOST\": os.environ.get(\"DB_HOST\", \"localhost\"),\n    }",
        _ => "{\n        \"ENGINE\": \"django.db.backends.sqlite3\",\n        \"NAME\": BASE_DIR / \"db.sqlite3\",\n    }",
    };
    format!(
        "import os\nfrom pathlib import Path\n\nBASE_DIR = Path(__file__).resolve().parent.parent\nSECRET_KEY = os.environ.get(\"SECRET_KEY\", \"dev-only\")\nDEBUG = os.environ.get(\"DEBUG\", \"0\") == \"1\"\nALLOWED_HOSTS = [\"*\"]\nROOT_URLCONF = \"{module}.urls\"\nWSGI_APPLICATION = \"{module}.wsgi.application\"\nINSTALLED_APPS = [\n    \"django.contrib.contenttypes\",\n    \"django.contrib.auth\",\n]\nDATABASES = {{\n    \"default\": {database}\n}}\nUSE_TZ = True\n"
    )
}

fn django_urls() -> &'static str {
    "from django.http import JsonResponse\nfrom django.urls import path\n\n\ndef health(request):\n    return JsonResponse({\"status\": \"ok\"})\n\n\nurlpatterns = [path(\"health\", health)]\n"
}

fn django_wsgi(module: &str) -> String {
    format!(
        "import os\n\nfrom django.core.wsgi import get_wsgi_application\n\nos.environ.setdefault(\"DJANGO_SETTINGS_MODULE\", \"{module}.settings\")\napplication = get_wsgi_application()\n"
    )
}

fn test_py(module: &str, stack: &TechStack) -> String {
    let pytest = stack.testing == TestingId::Pytest;
    match (stack.framework, pytest) {
        (FrameworkId::FastApi, true) => format!(
            "from fastapi.testclient import TestClient\n\nfrom {module}.main import app\n\n\ndef test_health():\n    client = TestClient(app)\n    response = client.get(\"/health\")\n    assert response.status_code == 200\n    assert response.json()[\"status\"] == \"ok\"\n"
        ),
        (FrameworkId::Flask, true) => format!(
            "from {module}.main import app\n\n\ndef test_health():\n    client = app.test_client()\n    response = client.get(\"/health\")\n    assert response.status_code == 200\n"
        ),
        (_, true) => format!(
            "import {module}\n\n\ndef test_version():\n    assert {module}.__version__ == \"0.1.0\"\n"
        ),
        (_, false) => format!(
            "import unittest\n\nimport {module}\n\n\nclass VersionTest(unittest.TestCase):\n    def test_version(self):\n        self.assertEqual({module}.__version__, \"0.1.0\")\n\n\nif __name__ == \"__main__\":\n    unittest.main()\n"
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_requirement() {
        assert_eq!(
            split_requirement("uvicorn[standard]>=0.31"),
            ("uvicorn".to_string(), ">=0.31".to_string())
        );
        assert_eq!(
            split_requirement("pytest"),
            ("pytest".to_string(), "*".to_string())
        );
    }

    #[test]
    fn test_requirements_file_ends_with_newline() {
        assert_eq!(requirements(&["flask>=3.0"]), "flask>=3.0\n");
    }
}
