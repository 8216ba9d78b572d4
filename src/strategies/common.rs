//! Files every generated project gets, plus naming helpers.

use super::toolchain::Toolchain;
use crate::stack::{Dimension, LanguageId, TechStack};
use crate::strategy::{GenerationContext, GenerationStrategy};
use anyhow::Result;
use async_trait::async_trait;

/// `brave-otter-x7k2` -> `brave_otter_x7k2`
pub fn module_name(project_name: &str) -> String {
    project_name.replace('-', "_")
}

/// `brave-otter-x7k2` -> `BraveOtterX7k2`
pub fn pascal_case(project_name: &str) -> String {
    project_name
        .split(|c: char| c == '-' || c == '_')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect()
}

pub fn gitignore(language: LanguageId) -> &'static str {
    match language {
        LanguageId::TypeScript | LanguageId::JavaScript => {
            "node_modules/\ndist/\nbuild/\n.next/\ncoverage/\n.env\n"
        }
        LanguageId::Python => "__pycache__/\n*.py[cod]\n.venv/\n.pytest_cache/\ndist/\n.env\n",
        LanguageId::Rust => "/target\n.env\n",
        LanguageId::Go => "/bin\n*.test\ncoverage.out\n.env\n",
        LanguageId::Java | LanguageId::Kotlin => "target/\nbuild/\n.gradle/\n*.class\n.idea/\n.env\n",
        LanguageId::CSharp => "bin/\nobj/\nout/\n*.user\n.env\n",
        LanguageId::Ruby => "/vendor/bundle\n/log/*\n/tmp/*\n.env\n",
        LanguageId::Php => "/vendor/\n.phpunit.result.cache\n.env\n",
        LanguageId::Elixir => "/_build/\n/deps/\n*.ez\n.env\n",
        LanguageId::Swift => ".build/\n.swiftpm/\nPackages/\n.env\n",
        LanguageId::Dart => ".dart_tool/\nbuild/\n.packages\n.env\n",
        LanguageId::Cpp => "build/\nbuilddir/\n*.o\n.env\n",
    }
}

/// README, .gitignore, LICENSE and .editorconfig.
pub struct BaseProjectStrategy;

#[async_trait]
impl GenerationStrategy for BaseProjectStrategy {
    fn id(&self) -> &str {
        "base"
    }

    fn name(&self) -> &str {
        "Base project files"
    }

    fn priority(&self) -> i32 {
        0
    }

    fn matches(&self, _stack: &TechStack) -> bool {
        true
    }

    async fn apply(&self, ctx: &mut GenerationContext<'_>) -> Result<()> {
        let stack = *ctx.stack;
        let chain = Toolchain::for_stack(&stack, ctx.project_name);

        ctx.write("README.md", readme(ctx.project_name, &stack, &chain));
        ctx.write(".gitignore", gitignore(stack.language));
        ctx.write("LICENSE", mit_license(ctx.project_name));
        ctx.write(
            ".editorconfig",
            "root = true\n\n[*]\nend_of_line = lf\ninsert_final_newline = true\nindent_style = space\nindent_size = 4\n\n[*.{js,ts,tsx,jsx,json,yml,yaml}]\nindent_size = 2\n",
        );
        Ok(())
    }
}

fn readme(name: &str, stack: &TechStack, chain: &Toolchain) -> String {
    let mut out = format!(
        "# {name}\n\nA {} {} project built with {}.\n\n## Stack\n\n| Dimension | Value |\n| --- | --- |\n",
        stack.archetype.name().to_lowercase(),
        stack.language.name(),
        stack.framework.name(),
    );
    for dimension in Dimension::RESOLUTION_ORDER {
        let value = stack.get(dimension);
        out.push_str(&format!("| {} | {} |\n", dimension, value.name()));
    }

    out.push_str("\n## Getting started\n\n```sh\n");
    for step in &chain.install {
        out.push_str(step);
        out.push('\n');
    }
    for step in &chain.build {
        out.push_str(step);
        out.push('\n');
    }
    if !chain.run.is_empty() {
        out.push_str(&chain.run);
        out.push('\n');
    }
    out.push_str("```\n");

    if !chain.test.is_empty() {
        out.push_str(&format!("\n## Tests\n\n```sh\n{}\n```\n", chain.test));
    }
    out
}

fn mit_license(name: &str) -> String {
    format!(
        "MIT License\n\nCopyright (c) {name} contributors\n\n\
Permission is hereby granted, free of charge, to any person obtaining a copy \
of this software and associated documentation files (the \"Software\"), to deal \
in the Software without restriction, including without limitation the rights \
to use, copy, modify, merge, publish, distribute, sublicense, and/or sell \
copies of the Software, and to permit persons to whom the Software is \
furnished to do so, subject to the following conditions:\n\n\
The above copyright notice and this permission notice shall be included in all \
copies or substantial portions of the Software.\n\n\
THE SOFTWARE IS PROVIDED \"AS IS\", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR \
IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY, \
FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE \
AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER \
LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, \
OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE \
SOFTWARE.\n"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_name() {
        assert_eq!(module_name("brave-otter-x7k2"), "brave_otter_x7k2");
    }

    #[test]
    fn test_pascal_case() {
        assert_eq!(pascal_case("brave-otter-x7k2"), "BraveOtterX7k2");
        assert_eq!(pascal_case("a__b"), "AB");
    }

    #[test]
    fn test_gitignore_per_language() {
        assert!(gitignore(LanguageId::Rust).contains("/target"));
        assert!(gitignore(LanguageId::TypeScript).contains("node_modules/"));
    }
}
