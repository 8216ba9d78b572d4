//! Go modules.

use crate::stack::{DatabaseId, FrameworkId, LanguageId, OrmId, TechStack, TransportId};
use crate::strategy::{GenerationContext, GenerationStrategy};
use anyhow::Result;
use async_trait::async_trait;

pub struct GoStrategy;

#[async_trait]
impl GenerationStrategy for GoStrategy {
    fn id(&self) -> &str {
        "go"
    }

    fn name(&self) -> &str {
        "Go module"
    }

    fn priority(&self) -> i32 {
        10
    }

    fn matches(&self, stack: &TechStack) -> bool {
        stack.language == LanguageId::Go
    }

    async fn apply(&self, ctx: &mut GenerationContext<'_>) -> Result<()> {
        let stack = *ctx.stack;
        let module = format!("github.com/example/{}", ctx.project_name);
        ctx.write("go.mod", go_mod(&module, &stack));

        if stack.framework == FrameworkId::Stdlib {
            ctx.write(
                "greet.go",
                "package greet\n\nimport \"fmt\"\n\n// Greet returns a greeting for name.\nfunc Greet(name string) string {\n\treturn fmt.Sprintf(\"Hello, %s!\", name)\n}\n",
            );
            ctx.write(
                "greet_test.go",
                "package greet\n\nimport \"testing\"\n\nfunc TestGreet(t *testing.T) {\n\tif got := Greet(\"world\"); got != \"Hello, world!\" {\n\t\tt.Fatalf(\"unexpected greeting %q\", got)\n\t}\n}\n",
            );
            return Ok(());
        }

        ctx.write("main.go", main_go(ctx.project_name, &stack));
        ctx.write(
            "main_test.go",
            "package main\n\nimport \"testing\"\n\nfunc TestServiceName(t *testing.T) {\n\tif serviceName == \"\" {\n\t\tt.Fatal(\"service name must not be empty\")\n\t}\n}\n",
        );
        Ok(())
    }
}

fn go_mod(module: &str, stack: &TechStack) -> String {
    let mut requires: Vec<&str> = Vec::new();
    match stack.framework {
        FrameworkId::Gin => requires.push("github.com/gin-gonic/gin v1.10.0"),
        FrameworkId::Echo => requires.push("github.com/labstack/echo/v4 v4.12.0"),
        FrameworkId::Fiber => requires.push("github.com/gofiber/fiber/v2 v2.52.5"),
        FrameworkId::Cobra => requires.push("github.com/spf13/cobra v1.8.1"),
        FrameworkId::Ebiten => requires.push("github.com/hajimehoshi/ebiten/v2 v2.8.0"),
        _ => {}
    }
    match stack.orm {
        OrmId::Gorm => {
            requires.push("gorm.io/gorm v1.25.12");
            requires.push(match stack.database {
                DatabaseId::Mysql => "gorm.io/driver/mysql v1.5.7",
                DatabaseId::Sqlite => "gorm.io/driver/sqlite v1.5.6",
                _ => "gorm.io/driver/postgres v1.5.9",
            });
        }
        OrmId::Ent => requires.push("entgo.io/ent v0.14.1"),
        _ => {}
    }
    match stack.database {
        DatabaseId::Redis => requires.push("github.com/redis/go-redis/v9 v9.6.1"),
        DatabaseId::Mongodb => requires.push("go.mongodb.org/mongo-driver v1.17.1"),
        _ => {}
    }
    if stack.transport == TransportId::Grpc {
        requires.push("google.golang.org/grpc v1.67.1");
    }

    let mut out = format!("module {module}\n\ngo 1.23\n");
    if !requires.is_empty() {
        out.push_str("\nrequire (\n");
        for req in requires {
            out.push('\t');
            out.push_str(req);
            out.push('\n');
        }
        out.push_str(")\n");
    }
    out
}

fn main_go(name: &str, stack: &TechStack) -> String {
    let body = match stack.framework {
        FrameworkId::Gin => "import (\n\t\"net/http\"\n\n\t\"github.com/gin-gonic/gin\"\n)\n\nfunc main() {\n\tr := gin.Default()\n\tr.GET(\"/health\", func(c *gin.Context) {\n\t\tc.JSON(http.StatusOK, gin.H{\"status\": \"ok\", \"service\": serviceName})\n\t})\n\t_ = r.Run(\":8080\")\n}\n",
        FrameworkId::Echo => "import (\n\t\"net/http\"\n\n\t\"github.com/labstack/echo/v4\"\n)\n\nfunc main() {\n\te := echo.New()\n\te.GET(\"/health\", func(c echo.Context) error {\n\t\treturn c.JSON(http.StatusOK, map[string]string{\"status\": \"ok\", \"service\": serviceName})\n\t})\n\te.Logger.Fatal(e.Start(\":8080\"))\n}\n",
        FrameworkId::Fiber => "import \"github.com/gofiber/fiber/v2\"\n\nfunc main() {\n\tapp := fiber.New()\n\tapp.Get(\"/health\", func(c *fiber.Ctx) error {\n\t\treturn c.JSON(fiber.Map{\"status\": \"ok\", \"service\": serviceName})\n\t})\n\t_ = app.Listen(\":8080\")\n}\n",
        FrameworkId::Cobra => "import (\n\t\"fmt\"\n\t\"os\"\n\n\t\"github.com/spf13/cobra\"\n)\n\nfunc main() {\n\troot := &cobra.Command{\n\t\tUse:   serviceName,\n\t\tShort: \"Generated command-line tool\",\n\t\tRun: func(cmd *cobra.Command, args []string) {\n\t\t\tfmt.Println(\"Hello from\", serviceName)\n\t\t},\n\t}\n\tif err := root.Execute(); err != nil {\n\t\tos.Exit(1)\n\t}\n}\n",
        FrameworkId::Ebiten => "import (\n\t\"log\"\n\n\t\"github.com/hajimehoshi/ebiten/v2\"\n\t\"github.com/hajimehoshi/ebiten/v2/ebitenutil\"\n)\n\ntype Game struct{}\n\nfunc (g *Game) Update() error { return nil }\n\nfunc (g *Game) Draw(screen *ebiten.Image) {\n\tebitenutil.DebugPrint(screen, serviceName)\n}\n\nfunc (g *Game) Layout(w, h int) (int, int) { return 320, 240 }\n\nfunc main() {\n\tebiten.SetWindowTitle(serviceName)\n\tif err := ebiten.RunGame(&Game{}); err != nil {\n\t\tlog.Fatal(err)\n\t}\n}\n",
        _ => "import \"fmt\"\n\nfunc main() {\n\tfmt.Println(\"Hello from\", serviceName)\n}\n",
    };
    format!("package main\n\n{body}\nconst serviceName = \"{name}\"\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stack::*;

    #[test]
    fn test_go_mod_requires_framework_and_driver() {
        let stack = TechStack {
            archetype: ArchetypeId::Backend,
            language: LanguageId::Go,
            runtime: RuntimeId::Go,
            framework: FrameworkId::Gin,
            database: DatabaseId::Mysql,
            orm: OrmId::Gorm,
            transport: TransportId::Rest,
            packaging: PackagingId::Docker,
            cicd: CicdId::GithubActions,
            build_tool: BuildToolId::GoModules,
            styling: StylingId::None,
            testing: TestingId::GoTest,
        };
        let gomod = go_mod("github.com/example/x", &stack);
        assert!(gomod.starts_with("module github.com/example/x\n"));
        assert!(gomod.contains("github.com/gin-gonic/gin"));
        assert!(gomod.contains("gorm.io/driver/mysql"));
    }
}
