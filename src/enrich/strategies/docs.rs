//! Contributor guide and architecture notes built from what the project
//! actually contains.

use crate::enrich::{EnrichmentContext, EnrichmentFlags, EnrichmentStrategy};
use crate::introspect::FileIntrospector;
use crate::stack::{Dimension, TechStack};
use anyhow::Result;
use async_trait::async_trait;
use std::collections::BTreeMap;

pub struct DocsStrategy;

#[async_trait]
impl EnrichmentStrategy for DocsStrategy {
    fn id(&self) -> &str {
        "docs"
    }

    fn name(&self) -> &str {
        "Project documentation"
    }

    fn priority(&self) -> i32 {
        90
    }

    fn matches(&self, _stack: &TechStack, flags: &EnrichmentFlags) -> bool {
        flags.docs
    }

    async fn apply(&self, ctx: &mut EnrichmentContext<'_>) -> Result<()> {
        let contributing = contributing(ctx.project_name, ctx.source);
        let architecture = architecture(ctx.project_name, ctx.stack, ctx.source);
        ctx.write_if_absent("CONTRIBUTING.md", contributing);
        ctx.write("docs/ARCHITECTURE.md", architecture);
        Ok(())
    }
}

fn contributing(name: &str, source: &FileIntrospector<'_>) -> String {
    let mut out = format!("# Contributing to {name}\n\n## Workflow\n\n1. Fork and create a topic branch.\n2. Keep commits focused and describe what changed.\n3. Open a pull request once the checks pass locally.\n\n## Local checks\n\n");
    let commands: Vec<(&str, String)> = [
        ("Build", source.get_build_command()),
        ("Test", source.get_test_command()),
    ]
    .into_iter()
    .filter_map(|(label, cmd)| cmd.map(|cmd| (label, cmd)))
    .collect();

    if commands.is_empty() {
        out.push_str("See the README for build instructions.\n");
    } else {
        out.push_str("```sh\n");
        for (label, cmd) in commands {
            out.push_str(&format!("# {label}\n{cmd}\n"));
        }
        out.push_str("```\n");
    }
    out
}

fn architecture(name: &str, stack: &TechStack, source: &FileIntrospector<'_>) -> String {
    let mut out = format!("# {name} architecture\n\n## Stack\n\n");
    for dimension in Dimension::RESOLUTION_ORDER {
        out.push_str(&format!("- **{}**: {}\n", dimension, stack.get(dimension).name()));
    }

    out.push_str("\n## Layout\n\n");
    for (dir, count) in top_level(source) {
        let noun = if count == 1 { "file" } else { "files" };
        out.push_str(&format!("- `{dir}` ({count} {noun})\n"));
    }

    if let Some(entry) = source.get_entry_point() {
        out.push_str(&format!("\nExecution starts in `{entry}`.\n"));
    }

    let ports = source.get_exposed_ports();
    if !ports.is_empty() {
        out.push_str("\n## Network\n\n");
        for info in ports {
            out.push_str(&format!("- port {} ({})\n", info.port, info.source));
        }
    }

    let manifest = source.get_manifest();
    if let Some(path) = source.manifest_path() {
        out.push_str(&format!("\n## Dependencies\n\nDeclared in `{path}`.\n\n"));
        if manifest.dependencies.is_empty() {
            out.push_str("No runtime dependencies.\n");
        }
        for dep in &manifest.dependencies {
            match &dep.version {
                Some(version) => out.push_str(&format!("- {} {}\n", dep.name, version)),
                None => out.push_str(&format!("- {}\n", dep.name)),
            }
        }
    }
    out
}

/// File counts per top-level directory; root files are grouped under `/`.
fn top_level<'a>(source: &FileIntrospector<'a>) -> BTreeMap<&'a str, usize> {
    let mut dirs = BTreeMap::new();
    for path in source.get_all_paths() {
        let key = match path.split_once('/') {
            Some((dir, _)) => dir,
            None => "/",
        };
        *dirs.entry(key).or_insert(0) += 1;
    }
    dirs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::ProjectFiles;

    fn files() -> ProjectFiles {
        let mut files = ProjectFiles::new();
        files.insert(
            "Cargo.toml".into(),
            "[package]\nname = \"calm\"\n\n[dependencies]\naxum = \"0.7\"\n".into(),
        );
        files.insert("src/main.rs".into(), "fn main() {}\n".into());
        files.insert("src/routes.rs".into(), String::new());
        files.insert("Dockerfile".into(), "FROM rust\nEXPOSE 8080\n".into());
        files
    }

    #[test]
    fn test_top_level_counts() {
        let files = files();
        let source = FileIntrospector::new(&files);
        let dirs = top_level(&source);
        assert_eq!(dirs.get("src"), Some(&2));
        assert_eq!(dirs.get("/"), Some(&2));
    }

    #[test]
    fn test_contributing_uses_detected_commands() {
        let files = files();
        let source = FileIntrospector::new(&files);
        let doc = contributing("calm", &source);
        assert!(doc.contains("cargo test"));
        assert!(doc.contains("cargo build"));
    }
}
