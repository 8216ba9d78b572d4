//! PHP projects managed by Composer.

use super::common::pascal_case;
use crate::stack::{DatabaseId, FrameworkId, LanguageId, OrmId, TechStack, TestingId};
use crate::strategy::{GenerationContext, GenerationStrategy};
use anyhow::Result;
use async_trait::async_trait;
use serde_json::{json, Map, Value};

pub struct PhpStrategy;

#[async_trait]
impl GenerationStrategy for PhpStrategy {
    fn id(&self) -> &str {
        "php"
    }

    fn name(&self) -> &str {
        "PHP project"
    }

    fn priority(&self) -> i32 {
        10
    }

    fn matches(&self, stack: &TechStack) -> bool {
        stack.language == LanguageId::Php
    }

    async fn apply(&self, ctx: &mut GenerationContext<'_>) -> Result<()> {
        let stack = *ctx.stack;
        let namespace = pascal_case(ctx.project_name);

        let composer = composer_json(ctx.project_name, &namespace, &stack);
        ctx.write("composer.json", format!("{}\n", serde_json::to_string_pretty(&composer)?));

        match stack.framework {
            FrameworkId::Laravel => {
                ctx.write(
                    "artisan",
                    "#!/usr/bin/env php\n<?php\n\ndefine('LARAVEL_START', microtime(true));\n\nrequire __DIR__.'/vendor/autoload.php';\n\n$status = (require_once __DIR__.'/bootstrap/app.php')\n    ->handleCommand(new Symfony\\Component\\Console\\Input\\ArgvInput);\n\nexit($status);\n",
                );
                ctx.write(
                    "bootstrap/app.php",
                    "<?php\n\nuse Illuminate\\Foundation\\Application;\n\nreturn Application::configure(basePath: dirname(__DIR__))\n    ->withRouting(web: __DIR__.'/../routes/web.php')\n    ->create();\n",
                );
                ctx.write(
                    "routes/web.php",
                    format!(
                        "<?php\n\nuse Illuminate\\Support\\Facades\\Route;\n\nRoute::get('/health', fn () => ['status' => 'ok', 'service' => '{}']);\n",
                        ctx.project_name
                    ),
                );
                ctx.write(
                    "public/index.php",
                    "<?php\n\nuse Illuminate\\Http\\Request;\n\nrequire __DIR__.'/../vendor/autoload.php';\n\n(require_once __DIR__.'/../bootstrap/app.php')\n    ->handleRequest(Request::capture());\n",
                );
            }
            FrameworkId::Symfony => {
                ctx.write(
                    "src/Kernel.php",
                    format!(
                        "<?php\n\nnamespace {namespace};\n\nuse Symfony\\Bundle\\FrameworkBundle\\Kernel\\MicroKernelTrait;\nuse Symfony\\Component\\HttpKernel\\Kernel as BaseKernel;\n\nclass Kernel extends BaseKernel\n{{\n    use MicroKernelTrait;\n}}\n"
                    ),
                );
                ctx.write(
                    "src/Controller/HealthController.php",
                    format!(
                        "<?php\n\nnamespace {namespace}\\Controller;\n\nuse Symfony\\Component\\HttpFoundation\\JsonResponse;\nuse Symfony\\Component\\Routing\\Attribute\\Route;\n\nclass HealthController\n{{\n    #[Route('/health')]\n    public function __invoke(): JsonResponse\n    {{\n        return new JsonResponse(['status' => 'ok', 'service' => '{}']);\n    }}\n}}\n",
                        ctx.project_name
                    ),
                );
                ctx.write(
                    "public/index.php",
                    format!(
                        "<?php\n\nuse {namespace}\\Kernel;\n\nrequire_once dirname(__DIR__).'/vendor/autoload_runtime.php';\n\nreturn fn (array $context) => new Kernel($context['APP_ENV'], (bool) $context['APP_DEBUG']);\n"
                    ),
                );
            }
            _ => {
                ctx.write(
                    "src/Greeter.php",
                    format!(
                        "<?php\n\ndeclare(strict_types=1);\n\nnamespace {namespace};\n\nfinal class Greeter\n{{\n    public static function greet(string $who): string\n    {{\n        return \"Hello, {{$who}}!\";\n    }}\n}}\n"
                    ),
                );
            }
        }

        match stack.testing {
            TestingId::Pest => {
                ctx.write("tests/Pest.php", "<?php\n");
                ctx.write(
                    "tests/SmokeTest.php",
                    "<?php\n\ntest('arithmetic', function () {\n    expect(1 + 1)->toBe(2);\n});\n",
                );
            }
            _ => {
                ctx.write(
                    "phpunit.xml",
                    "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<phpunit bootstrap=\"vendor/autoload.php\" colors=\"true\">\n  <testsuites>\n    <testsuite name=\"default\">\n      <directory>tests</directory>\n    </testsuite>\n  </testsuites>\n</phpunit>\n",
                );
                ctx.write(
                    "tests/SmokeTest.php",
                    "<?php\n\nuse PHPUnit\\Framework\\TestCase;\n\nfinal class SmokeTest extends TestCase\n{\n    public function testArithmetic(): void\n    {\n        $this->assertSame(2, 1 + 1);\n    }\n}\n",
                );
            }
        }
        Ok(())
    }
}

fn composer_json(name: &str, namespace: &str, stack: &TechStack) -> Value {
    let mut require = Map::new();
    require.insert("php".into(), json!(">=8.2"));
    match stack.framework {
        FrameworkId::Laravel => {
            require.insert("laravel/framework".into(), json!("^11.0"));
        }
        FrameworkId::Symfony => {
            require.insert("symfony/framework-bundle".into(), json!("^7.1"));
            require.insert("symfony/runtime".into(), json!("^7.1"));
        }
        _ => {}
    }
    match stack.orm {
        OrmId::Doctrine => {
            require.insert("doctrine/orm".into(), json!("^3.2"));
        }
        OrmId::Eloquent if stack.framework != FrameworkId::Laravel => {
            require.insert("illuminate/database".into(), json!("^11.0"));
        }
        _ => {}
    }
    match stack.database {
        DatabaseId::Redis => {
            require.insert("predis/predis".into(), json!("^2.2"));
        }
        DatabaseId::Mongodb => {
            require.insert("mongodb/mongodb".into(), json!("^1.19"));
        }
        _ => {}
    }

    let mut require_dev = Map::new();
    match stack.testing {
        TestingId::Pest => require_dev.insert("pestphp/pest".into(), json!("^3.0")),
        _ => require_dev.insert("phpunit/phpunit".into(), json!("^11.0")),
    };

    let mut psr4 = Map::new();
    psr4.insert(format!("{namespace}\\"), json!("src/"));

    json!({
        "name": format!("example/{name}"),
        "type": "project",
        "license": "MIT",
        "require": require,
        "require-dev": require_dev,
        "autoload": { "psr-4": psr4 },
        "config": { "sort-packages": true },
        "minimum-stability": "stable",
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stack::*;

    #[test]
    fn test_composer_json_for_laravel() {
        let stack = TechStack {
            archetype: ArchetypeId::Backend,
            language: LanguageId::Php,
            runtime: RuntimeId::Php,
            framework: FrameworkId::Laravel,
            database: DatabaseId::Mysql,
            orm: OrmId::Eloquent,
            transport: TransportId::Rest,
            packaging: PackagingId::Docker,
            cicd: CicdId::GitlabCi,
            build_tool: BuildToolId::Composer,
            styling: StylingId::None,
            testing: TestingId::Pest,
        };
        let composer = composer_json("calm-heron-ab12", "CalmHeronAb12", &stack);
        assert_eq!(composer["name"], "example/calm-heron-ab12");
        assert_eq!(composer["require"]["laravel/framework"], "^11.0");
        assert!(composer["require"].get("illuminate/database").is_none());
        assert_eq!(composer["require-dev"]["pestphp/pest"], "^3.0");
        assert_eq!(composer["autoload"]["psr-4"]["CalmHeronAb12\\"], "src/");
    }
}
