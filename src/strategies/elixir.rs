//! Elixir projects built with Mix.

use super::common::{module_name, pascal_case};
use crate::stack::{DatabaseId, FrameworkId, LanguageId, OrmId, TechStack};
use crate::strategy::{GenerationContext, GenerationStrategy};
use anyhow::Result;
use async_trait::async_trait;

pub struct ElixirStrategy;

#[async_trait]
impl GenerationStrategy for ElixirStrategy {
    fn id(&self) -> &str {
        "elixir"
    }

    fn name(&self) -> &str {
        "Mix project"
    }

    fn priority(&self) -> i32 {
        10
    }

    fn matches(&self, stack: &TechStack) -> bool {
        stack.language == LanguageId::Elixir
    }

    async fn apply(&self, ctx: &mut GenerationContext<'_>) -> Result<()> {
        let stack = *ctx.stack;
        let app = module_name(ctx.project_name);
        let module = pascal_case(ctx.project_name);

        ctx.write("mix.exs", mix_exs(&app, &module, &stack));
        ctx.write(
            ".formatter.exs",
            "[\n  inputs: [\"{mix,.formatter}.exs\", \"{config,lib,test}/**/*.{ex,exs}\"]\n]\n",
        );

        if stack.framework == FrameworkId::Phoenix {
            ctx.write("config/config.exs", phoenix_config(&app, &module));
            ctx.write(
                format!("lib/{app}/application.ex"),
                format!(
                    "defmodule {module}.Application do\n  use Application\n\n  @impl true\n  def start(_type, _args) do\n    children = [{module}Web.Endpoint]\n    Supervisor.start_link(children, strategy: :one_for_one, name: {module}.Supervisor)\n  end\nend\n"
                ),
            );
            ctx.write(
                format!("lib/{app}_web/endpoint.ex"),
                format!(
                    "defmodule {module}Web.Endpoint do\n  use Phoenix.Endpoint, otp_app: :{app}\n\n  plug Plug.Parsers, parsers: [:json], json_decoder: Jason\n  plug {module}Web.Router\nend\n"
                ),
            );
            ctx.write(
                format!("lib/{app}_web/router.ex"),
                format!(
                    "defmodule {module}Web.Router do\n  use Phoenix.Router\n\n  pipeline :api do\n    plug :accepts, [\"json\"]\n  end\n\n  scope \"/\", {module}Web do\n    pipe_through :api\n    get \"/health\", HealthController, :show\n  end\nend\n"
                ),
            );
            ctx.write(
                format!("lib/{app}_web/controllers/health_controller.ex"),
                format!(
                    "defmodule {module}Web.HealthController do\n  use Phoenix.Controller, formats: [:json]\n\n  def show(conn, _params) do\n    json(conn, %{{status: \"ok\", service: \"{}\"}})\n  end\nend\n",
                    ctx.project_name
                ),
            );
        } else {
            ctx.write(
                format!("lib/{app}.ex"),
                format!(
                    "defmodule {module} do\n  @moduledoc \"\"\"\n  Entry point for {}.\n  \"\"\"\n\n  def greet(who), do: \"Hello, #{{who}}!\"\nend\n",
                    ctx.project_name
                ),
            );
        }

        if stack.orm == OrmId::Ecto {
            ctx.write(
                format!("lib/{app}/repo.ex"),
                format!(
                    "defmodule {module}.Repo do\n  use Ecto.Repo,\n    otp_app: :{app},\n    adapter: {}\nend\n",
                    ecto_adapter(stack.database)
                ),
            );
        }

        ctx.write("test/test_helper.exs", "ExUnit.start()\n");
        ctx.write(
            format!("test/{app}_test.exs"),
            format!(
                "defmodule {module}Test do\n  use ExUnit.Case\n\n  test \"arithmetic\" do\n    assert 1 + 1 == 2\n  end\nend\n"
            ),
        );
        Ok(())
    }
}

fn ecto_adapter(database: DatabaseId) -> &'static str {
    match database {
        DatabaseId::Mysql => "Ecto.Adapters.MyXQL",
        DatabaseId::Sqlite => "Ecto.Adapters.SQLite3",
        _ => "Ecto.Adapters.Postgres",
    }
}

fn mix_exs(app: &str, module: &str, stack: &TechStack) -> String {
    let mut deps: Vec<&str> = Vec::new();
    if stack.framework == FrameworkId::Phoenix {
        deps.push("{:phoenix, \"~> 1.7\"}");
        deps.push("{:jason, \"~> 1.4\"}");
        deps.push("{:bandit, \"~> 1.5\"}");
    }
    if stack.orm == OrmId::Ecto {
        deps.push("{:ecto_sql, \"~> 3.12\"}");
        deps.push(match stack.database {
            DatabaseId::Mysql => "{:myxql, \"~> 0.7\"}",
            DatabaseId::Sqlite => "{:ecto_sqlite3, \"~> 0.17\"}",
            _ => "{:postgrex, \"~> 0.19\"}",
        });
    }
    match stack.database {
        DatabaseId::Redis => deps.push("{:redix, \"~> 1.5\"}"),
        DatabaseId::Mongodb => deps.push("{:mongodb_driver, \"~> 1.5\"}"),
        _ => {}
    }

    let application = if stack.framework == FrameworkId::Phoenix {
        format!("[\n      mod: {{{module}.Application, []}},\n      extra_applications: [:logger]\n    ]")
    } else {
        "[\n      extra_applications: [:logger]\n    ]".to_string()
    };

    let deps_body = deps
        .iter()
        .map(|d| format!("      {d}"))
        .collect::<Vec<_>>()
        .join(",\n");

    format!(
        "defmodule {module}.MixProject do\n  use Mix.Project\n\n  def project do\n    [\n      app: :{app},\n      version: \"0.1.0\",\n      elixir: \"~> 1.17\",\n      start_permanent: Mix.env() == :prod,\n      deps: deps()\n    ]\n  end\n\n  def application do\n    {application}\n  end\n\n  defp deps do\n    [\n{deps_body}\n    ]\n  end\nend\n"
    )
}

fn phoenix_config(app: &str, module: &str) -> String {
    format!(
        "import Config\n\nconfig :{app}, {module}Web.Endpoint,\n  adapter: Bandit.PhoenixAdapter,\n  http: [ip: {{0, 0, 0, 0}}, port: 4000],\n  server: true\n\nconfig :phoenix, :json_library, Jason\n"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stack::*;

    #[test]
    fn test_mix_exs_includes_ecto_driver() {
        let stack = TechStack {
            archetype: ArchetypeId::Backend,
            language: LanguageId::Elixir,
            runtime: RuntimeId::Beam,
            framework: FrameworkId::Phoenix,
            database: DatabaseId::Postgres,
            orm: OrmId::Ecto,
            transport: TransportId::Rest,
            packaging: PackagingId::Docker,
            cicd: CicdId::GithubActions,
            build_tool: BuildToolId::Mix,
            styling: StylingId::None,
            testing: TestingId::ExUnit,
        };
        let mix = mix_exs("calm_heron", "CalmHeron", &stack);
        assert!(mix.contains("app: :calm_heron"));
        assert!(mix.contains("{:phoenix, \"~> 1.7\"}"));
        assert!(mix.contains("{:postgrex, \"~> 0.19\"}"));
        assert!(mix.contains("mod: {CalmHeron.Application, []}"));
    }

    #[test]
    fn test_ecto_adapter() {
        assert_eq!(ecto_adapter(DatabaseId::Sqlite), "Ecto.Adapters.SQLite3");
        assert_eq!(ecto_adapter(DatabaseId::Postgres), "Ecto.Adapters.Postgres");
    }
}
