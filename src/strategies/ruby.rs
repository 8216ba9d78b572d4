//! Ruby projects managed by Bundler.

use super::common::{module_name, pascal_case};
use crate::stack::{DatabaseId, FrameworkId, LanguageId, OrmId, TechStack, TestingId};
use crate::strategy::{GenerationContext, GenerationStrategy};
use anyhow::Result;
use async_trait::async_trait;

pub struct RubyStrategy;

#[async_trait]
impl GenerationStrategy for RubyStrategy {
    fn id(&self) -> &str {
        "ruby"
    }

    fn name(&self) -> &str {
        "Ruby project"
    }

    fn priority(&self) -> i32 {
        10
    }

    fn matches(&self, stack: &TechStack) -> bool {
        stack.language == LanguageId::Ruby
    }

    async fn apply(&self, ctx: &mut GenerationContext<'_>) -> Result<()> {
        let stack = *ctx.stack;
        let module = module_name(ctx.project_name);
        let constant = pascal_case(ctx.project_name);

        ctx.write("Gemfile", gemfile(&stack));
        ctx.write("Rakefile", rakefile(&stack));

        match stack.framework {
            FrameworkId::Rails => {
                ctx.write("config.ru", "require_relative \"config/environment\"\n\nrun Rails.application\n");
                ctx.write(
                    "config/application.rb",
                    format!(
                        "require_relative \"boot\"\n\nrequire \"rails\"\nrequire \"action_controller/railtie\"\n\nmodule {constant}\n  class Application < Rails::Application\n    config.load_defaults 7.2\n    config.api_only = true\n  end\nend\n"
                    ),
                );
                ctx.write(
                    "config/boot.rb",
                    "ENV[\"BUNDLE_GEMFILE\"] ||= File.expand_path(\"../Gemfile\", __dir__)\n\nrequire \"bundler/setup\"\n",
                );
                ctx.write(
                    "config/environment.rb",
                    "require_relative \"application\"\n\nRails.application.initialize!\n",
                );
                ctx.write(
                    "config/routes.rb",
                    "Rails.application.routes.draw do\n  get \"/health\", to: \"health#show\"\nend\n",
                );
                ctx.write(
                    "app/controllers/health_controller.rb",
                    format!(
                        "class HealthController < ActionController::API\n  def show\n    render json: {{ status: \"ok\", service: \"{}\" }}\n  end\nend\n",
                        ctx.project_name
                    ),
                );
                if stack.database != DatabaseId::None && stack.orm == OrmId::ActiveRecord {
                    ctx.write("config/database.yml", database_yml(&stack));
                }
            }
            FrameworkId::Sinatra => {
                ctx.write(
                    "app.rb",
                    format!(
                        "require \"sinatra\"\nrequire \"json\"\n\nset :port, 4567\n\nget \"/health\" do\n  content_type :json\n  {{ status: \"ok\", service: \"{}\" }}.to_json\nend\n",
                        ctx.project_name
                    ),
                );
                ctx.write("config.ru", "require_relative \"app\"\n\nrun Sinatra::Application\n");
            }
            _ => {
                ctx.write(
                    format!("lib/{module}.rb"),
                    format!(
                        "module {constant}\n  VERSION = \"0.1.0\"\n\n  def self.greet(who)\n    \"Hello, #{{who}}!\"\n  end\nend\n"
                    ),
                );
            }
        }

        match stack.testing {
            TestingId::Rspec => {
                ctx.write(".rspec", "--require spec_helper\n");
                ctx.write(
                    "spec/spec_helper.rb",
                    "RSpec.configure do |config|\n  config.disable_monkey_patching!\nend\n",
                );
                ctx.write(
                    "spec/smoke_spec.rb",
                    "RSpec.describe \"smoke\" do\n  it \"adds numbers\" do\n    expect(1 + 1).to eq(2)\n  end\nend\n",
                );
            }
            _ => {
                ctx.write(
                    "test/smoke_test.rb",
                    "require \"minitest/autorun\"\n\nclass SmokeTest < Minitest::Test\n  def test_arithmetic\n    assert_equal 2, 1 + 1\n  end\nend\n",
                );
            }
        }
        Ok(())
    }
}

fn gemfile(stack: &TechStack) -> String {
    let mut gems: Vec<&str> = Vec::new();
    match stack.framework {
        FrameworkId::Rails => gems.push("gem \"rails\", \"~> 7.2\""),
        FrameworkId::Sinatra => {
            gems.push("gem \"sinatra\", \"~> 4.0\"");
            gems.push("gem \"puma\", \"~> 6.4\"");
        }
        _ => {}
    }
    if stack.orm == OrmId::ActiveRecord && stack.framework != FrameworkId::Rails {
        gems.push("gem \"activerecord\", \"~> 7.2\"");
    }
    match stack.database {
        DatabaseId::Postgres => gems.push("gem \"pg\", \"~> 1.5\""),
        DatabaseId::Mysql => gems.push("gem \"mysql2\", \"~> 0.5\""),
        DatabaseId::Sqlite => gems.push("gem \"sqlite3\", \"~> 2.1\""),
        DatabaseId::Redis => gems.push("gem \"redis\", \"~> 5.3\""),
        DatabaseId::Mongodb => gems.push("gem \"mongo\", \"~> 2.20\""),
        DatabaseId::None => {}
    }
    gems.push("gem \"rake\", \"~> 13.2\"");

    let test_gem = match stack.testing {
        TestingId::Rspec => "gem \"rspec\", \"~> 3.13\"",
        _ => "gem \"minitest\", \"~> 5.25\"",
    };

    let mut out = String::from("source \"https://rubygems.org\"\n\nruby \">= 3.2\"\n\n");
    for gem in gems {
        out.push_str(gem);
        out.push('\n');
    }
    out.push_str(&format!("\ngroup :development, :test do\n  {test_gem}\nend\n"));
    out
}

fn rakefile(stack: &TechStack) -> String {
    match stack.testing {
        TestingId::Rspec => {
            "require \"rspec/core/rake_task\"\n\nRSpec::Core::RakeTask.new(:spec)\n\ntask default: :spec\n".to_string()
        }
        _ => "require \"rake/testtask\"\n\nRake::TestTask.new(:test) do |t|\n  t.libs << \"test\"\n  t.pattern = \"test/**/*_test.rb\"\nend\n\ntask default: :test\n".to_string(),
    }
}

fn database_yml(stack: &TechStack) -> String {
    let adapter = match stack.database {
        DatabaseId::Postgres => "postgresql",
        DatabaseId::Mysql => "mysql2",
        _ => "sqlite3",
    };
    format!(
        "default: &default\n  adapter: {adapter}\n  url: <%= ENV[\"DATABASE_URL\"] %>\n\ndevelopment:\n  <<: *default\n\ntest:\n  <<: *default\n\nproduction:\n  <<: *default\n"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stack::*;

    fn rails_stack() -> TechStack {
        TechStack {
            archetype: ArchetypeId::Backend,
            language: LanguageId::Ruby,
            runtime: RuntimeId::Ruby,
            framework: FrameworkId::Rails,
            database: DatabaseId::Postgres,
            orm: OrmId::ActiveRecord,
            transport: TransportId::Rest,
            packaging: PackagingId::Docker,
            cicd: CicdId::GithubActions,
            build_tool: BuildToolId::Bundler,
            styling: StylingId::None,
            testing: TestingId::Rspec,
        }
    }

    #[test]
    fn test_gemfile_for_rails() {
        let gemfile = gemfile(&rails_stack());
        assert!(gemfile.contains("gem \"rails\""));
        assert!(gemfile.contains("gem \"pg\""));
        assert!(!gemfile.contains("gem \"activerecord\""));
        assert!(gemfile.contains("gem \"rspec\""));
    }

    #[test]
    fn test_database_yml_is_yaml() {
        let yml = database_yml(&rails_stack());
        let parsed: serde_yaml::Value = serde_yaml::from_str(&yml).unwrap();
        assert_eq!(parsed["default"]["adapter"].as_str(), Some("postgresql"));
    }
}
