//! Linter and formatter configuration per language. Existing configs are kept.

use crate::enrich::{EnrichmentContext, EnrichmentFlags, EnrichmentStrategy};
use crate::stack::{LanguageId, TechStack};
use anyhow::Result;
use async_trait::async_trait;

pub struct LintStrategy;

#[async_trait]
impl EnrichmentStrategy for LintStrategy {
    fn id(&self) -> &str {
        "lint"
    }

    fn name(&self) -> &str {
        "Lint configuration"
    }

    fn priority(&self) -> i32 {
        30
    }

    fn matches(&self, _stack: &TechStack, flags: &EnrichmentFlags) -> bool {
        flags.linting
    }

    async fn apply(&self, ctx: &mut EnrichmentContext<'_>) -> Result<()> {
        for (path, content) in lint_files(ctx.stack.language) {
            ctx.write_if_absent(path, content);
        }
        Ok(())
    }
}

fn lint_files(language: LanguageId) -> Vec<(&'static str, &'static str)> {
    match language {
        LanguageId::TypeScript => vec![
            (
                "eslint.config.js",
                "import js from '@eslint/js';\nimport tseslint from 'typescript-eslint';\n\nexport default tseslint.config(\n  js.configs.recommended,\n  ...tseslint.configs.recommended,\n  { ignores: ['dist/', 'build/', 'coverage/'] },\n);\n",
            ),
            (".prettierrc", "{\n  \"singleQuote\": true,\n  \"trailingComma\": \"all\"\n}\n"),
        ],
        LanguageId::JavaScript => vec![
            (
                "eslint.config.js",
                "import js from '@eslint/js';\n\nexport default [\n  js.configs.recommended,\n  { ignores: ['dist/', 'build/', 'coverage/'] },\n];\n",
            ),
            (".prettierrc", "{\n  \"singleQuote\": true,\n  \"trailingComma\": \"all\"\n}\n"),
        ],
        LanguageId::Python => vec![(
            "ruff.toml",
            "line-length = 100\ntarget-version = \"py312\"\n\n[lint]\nselect = [\"E\", \"F\", \"I\", \"B\", \"UP\"]\n",
        )],
        LanguageId::Rust => vec![
            ("rustfmt.toml", "edition = \"2021\"\nmax_width = 100\n"),
            ("clippy.toml", "msrv = \"1.75\"\n"),
        ],
        LanguageId::Go => vec![(
            ".golangci.yml",
            "run:\n  timeout: 5m\nlinters:\n  enable:\n    - errcheck\n    - govet\n    - staticcheck\n    - gofmt\n",
        )],
        LanguageId::Java => vec![(
            "config/checkstyle/checkstyle.xml",
            "<?xml version=\"1.0\"?>\n<!DOCTYPE module PUBLIC \"-//Checkstyle//DTD Checkstyle Configuration 1.3//EN\" \"https://checkstyle.org/dtds/configuration_1_3.dtd\">\n<module name=\"Checker\">\n  <module name=\"TreeWalker\">\n    <module name=\"UnusedImports\"/>\n    <module name=\"NeedBraces\"/>\n  </module>\n</module>\n",
        )],
        LanguageId::Kotlin => vec![(
            "detekt.yml",
            "build:\n  maxIssues: 0\nstyle:\n  MagicNumber:\n    active: false\n",
        )],
        LanguageId::CSharp => vec![(
            "Directory.Build.props",
            "<Project>\n  <PropertyGroup>\n    <Nullable>enable</Nullable>\n    <TreatWarningsAsErrors>true</TreatWarningsAsErrors>\n    <EnforceCodeStyleInBuild>true</EnforceCodeStyleInBuild>\n    <AnalysisLevel>latest-recommended</AnalysisLevel>\n  </PropertyGroup>\n</Project>\n",
        )],
        LanguageId::Ruby => vec![(
            ".rubocop.yml",
            "AllCops:\n  NewCops: enable\n  SuggestExtensions: false\nStyle/Documentation:\n  Enabled: false\n",
        )],
        LanguageId::Php => vec![(
            "phpstan.neon",
            "parameters:\n  level: 6\n  paths:\n    - src\n",
        )],
        LanguageId::Elixir => vec![(
            ".credo.exs",
            "%{\n  configs: [\n    %{\n      name: \"default\",\n      files: %{included: [\"lib/\", \"test/\"]},\n      strict: true\n    }\n  ]\n}\n",
        )],
        LanguageId::Swift => vec![(
            ".swiftlint.yml",
            "included:\n  - Sources\n  - Tests\nline_length: 120\n",
        )],
        LanguageId::Dart => vec![(
            "analysis_options.yaml",
            "include: package:lints/recommended.yaml\n",
        )],
        LanguageId::Cpp => vec![
            (".clang-format", "BasedOnStyle: LLVM\nIndentWidth: 4\nColumnLimit: 100\n"),
            (
                ".clang-tidy",
                "Checks: 'clang-analyzer-*,bugprone-*,modernize-*,-modernize-use-trailing-return-type'\nWarningsAsErrors: ''\n",
            ),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_language_has_config() {
        for language in LanguageId::all_variants() {
            assert!(!lint_files(*language).is_empty(), "{language}");
        }
    }

    #[test]
    fn test_editorconfig_left_to_base_files() {
        for language in LanguageId::all_variants() {
            assert!(lint_files(*language).iter().all(|(path, _)| *path != ".editorconfig"));
        }
    }
}
