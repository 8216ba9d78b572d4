//! C# projects driven by the dotnet CLI.

use super::common::pascal_case;
use crate::stack::{ArchetypeId, DatabaseId, FrameworkId, LanguageId, OrmId, TechStack, TestingId};
use crate::strategy::{GenerationContext, GenerationStrategy};
use anyhow::Result;
use async_trait::async_trait;

pub struct DotnetStrategy;

#[async_trait]
impl GenerationStrategy for DotnetStrategy {
    fn id(&self) -> &str {
        "dotnet"
    }

    fn name(&self) -> &str {
        ".NET project"
    }

    fn priority(&self) -> i32 {
        10
    }

    fn matches(&self, stack: &TechStack) -> bool {
        stack.language == LanguageId::CSharp
    }

    async fn apply(&self, ctx: &mut GenerationContext<'_>) -> Result<()> {
        let stack = *ctx.stack;
        let assembly = pascal_case(ctx.project_name);

        ctx.write(format!("{assembly}.csproj"), csproj(&assembly, &stack));
        if stack.archetype == ArchetypeId::Library {
            ctx.write(
                "Greeter.cs",
                format!(
                    "namespace {assembly};\n\npublic static class Greeter\n{{\n    public static string Greet(string who) => $\"Hello, {{who}}!\";\n}}\n"
                ),
            );
        } else {
            ctx.write("Program.cs", program_cs(&assembly, ctx.project_name, &stack));
        }
        if stack.framework == FrameworkId::AspNetCore {
            ctx.write(
                "appsettings.json",
                "{\n  \"Logging\": {\n    \"LogLevel\": {\n      \"Default\": \"Information\"\n    }\n  },\n  \"AllowedHosts\": \"*\"\n}\n",
            );
        }

        ctx.write(
            format!("tests/{assembly}.Tests/{assembly}.Tests.csproj"),
            test_csproj(&assembly, &stack),
        );
        ctx.write(
            format!("tests/{assembly}.Tests/SmokeTests.cs"),
            test_source(&assembly, &stack),
        );
        Ok(())
    }
}

fn csproj(assembly: &str, stack: &TechStack) -> String {
    let sdk = if stack.framework == FrameworkId::AspNetCore {
        "Microsoft.NET.Sdk.Web"
    } else {
        "Microsoft.NET.Sdk"
    };
    let output_type = match stack.archetype {
        ArchetypeId::Library => "Library",
        _ => "Exe",
    };

    let mut packages: Vec<(&str, &str)> = Vec::new();
    if stack.framework == FrameworkId::MonoGame {
        packages.push(("MonoGame.Framework.DesktopGL", "3.8.2.1105"));
    }
    if stack.orm == OrmId::EfCore {
        packages.push(match stack.database {
            DatabaseId::Mysql => ("Pomelo.EntityFrameworkCore.MySql", "8.0.2"),
            DatabaseId::Sqlite => ("Microsoft.EntityFrameworkCore.Sqlite", "8.0.10"),
            _ => ("Npgsql.EntityFrameworkCore.PostgreSQL", "8.0.10"),
        });
    }
    match stack.database {
        DatabaseId::Redis => packages.push(("StackExchange.Redis", "2.8.16")),
        DatabaseId::Mongodb => packages.push(("MongoDB.Driver", "2.29.0")),
        _ => {}
    }

    let mut out = format!(
        "<Project Sdk=\"{sdk}\">\n\n  <PropertyGroup>\n    <OutputType>{output_type}</OutputType>\n    <TargetFramework>net8.0</TargetFramework>\n    <Nullable>enable</Nullable>\n    <ImplicitUsings>enable</ImplicitUsings>\n    <AssemblyName>{assembly}</AssemblyName>\n    <RootNamespace>{assembly}</RootNamespace>\n  </PropertyGroup>\n\n  <ItemGroup>\n    <Compile Remove=\"tests/**\" />\n  </ItemGroup>\n"
    );
    if !packages.is_empty() {
        out.push_str("\n  <ItemGroup>\n");
        for (name, version) in packages {
            out.push_str(&format!(
                "    <PackageReference Include=\"{name}\" Version=\"{version}\" />\n"
            ));
        }
        out.push_str("  </ItemGroup>\n");
    }
    out.push_str("\n</Project>\n");
    out
}

fn program_cs(assembly: &str, name: &str, stack: &TechStack) -> String {
    match stack.framework {
        FrameworkId::AspNetCore => format!(
            "var builder = WebApplication.CreateBuilder(args);\nvar app = builder.Build();\n\napp.MapGet(\"/health\", () => Results.Ok(new {{ status = \"ok\", service = \"{name}\" }}));\n\napp.Run(\"http://0.0.0.0:8080\");\n"
        ),
        FrameworkId::MonoGame => format!(
            "using Microsoft.Xna.Framework;\n\nnamespace {assembly};\n\npublic class Game1 : Game\n{{\n    private readonly GraphicsDeviceManager _graphics;\n\n    public Game1()\n    {{\n        _graphics = new GraphicsDeviceManager(this);\n        Window.Title = \"{name}\";\n    }}\n\n    protected override void Draw(GameTime gameTime)\n    {{\n        GraphicsDevice.Clear(Color.CornflowerBlue);\n        base.Draw(gameTime);\n    }}\n}}\n\npublic static class Program\n{{\n    public static void Main()\n    {{\n        using var game = new Game1();\n        game.Run();\n    }}\n}}\n"
        ),
        _ => format!(
            "namespace {assembly};\n\npublic static class Program\n{{\n    public static int Main(string[] args)\n    {{\n        var who = args.Length > 0 ? args[0] : \"world\";\n        Console.WriteLine($\"Hello, {{who}}! from {name}\");\n        return 0;\n    }}\n}}\n"
        ),
    }
}

fn test_csproj(assembly: &str, stack: &TechStack) -> String {
    let framework_packages = match stack.testing {
        TestingId::Nunit => {
            "    <PackageReference Include=\"NUnit\" Version=\"4.2.2\" />\n    <PackageReference Include=\"NUnit3TestAdapter\" Version=\"4.6.0\" />\n"
        }
        _ => {
            "    <PackageReference Include=\"xunit\" Version=\"2.9.2\" />\n    <PackageReference Include=\"xunit.runner.visualstudio\" Version=\"2.8.2\" />\n"
        }
    };
    format!(
        "<Project Sdk=\"Microsoft.NET.Sdk\">\n\n  <PropertyGroup>\n    <TargetFramework>net8.0</TargetFramework>\n    <IsPackable>false</IsPackable>\n    <ImplicitUsings>enable</ImplicitUsings>\n  </PropertyGroup>\n\n  <ItemGroup>\n    <PackageReference Include=\"Microsoft.NET.Test.Sdk\" Version=\"17.11.1\" />\n{framework_packages}  </ItemGroup>\n\n  <ItemGroup>\n    <ProjectReference Include=\"../../{assembly}.csproj\" />\n  </ItemGroup>\n\n</Project>\n"
    )
}

fn test_source(assembly: &str, stack: &TechStack) -> String {
    match stack.testing {
        TestingId::Nunit => format!(
            "using NUnit.Framework;\n\nnamespace {assembly}.Tests;\n\npublic class SmokeTests\n{{\n    [Test]\n    public void Arithmetic() => Assert.That(1 + 1, Is.EqualTo(2));\n}}\n"
        ),
        _ => format!(
            "using Xunit;\n\nnamespace {assembly}.Tests;\n\npublic class SmokeTests\n{{\n    [Fact]\n    public void Arithmetic() => Assert.Equal(2, 1 + 1);\n}}\n"
        ),
    }
}
