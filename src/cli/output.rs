//! Rendering command results as JSON, YAML or human-readable text.

use anyhow::{Context, Result};
use serde::Serialize;

use crate::assembler::GeneratedProject;
use crate::enrich::EnrichedProject;
use crate::inference::InferredStack;
use crate::registry::RegistryManifest;
use crate::stack::{Dimension, TechStack};

const RULE: &str = "\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Yaml,
    Human,
}

pub struct OutputFormatter {
    format: OutputFormat,
}

impl OutputFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn format_project(&self, project: &GeneratedProject) -> Result<String> {
        match self.format {
            OutputFormat::Human => Ok(human_project(project, "Generated Project")),
            _ => self.structured(&Summary::from(project)),
        }
    }

    pub fn format_enriched(&self, enriched: &EnrichedProject) -> Result<String> {
        match self.format {
            OutputFormat::Human => Ok(human_enriched(enriched)),
            _ => self.structured(&EnrichedSummary::from(enriched)),
        }
    }

    pub fn format_inferred(&self, inferred: &InferredStack) -> Result<String> {
        match self.format {
            OutputFormat::Human => Ok(human_inferred(inferred)),
            _ => self.structured(inferred),
        }
    }

    pub fn format_manifest(&self, manifest: &RegistryManifest) -> Result<String> {
        match self.format {
            OutputFormat::Human => Ok(human_manifest(manifest)),
            _ => self.structured(manifest),
        }
    }

    fn structured<T: Serialize>(&self, value: &T) -> Result<String> {
        match self.format {
            OutputFormat::Yaml => serde_yaml::to_string(value).context("Failed to serialize output to YAML"),
            _ => serde_json::to_string_pretty(value).context("Failed to serialize output to JSON"),
        }
    }
}

/// Project metadata without file contents.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Summary<'a> {
    id: &'a str,
    seed: u64,
    name: &'a str,
    stack: &'a TechStack,
    files: Vec<&'a str>,
    metadata: &'a crate::assembler::ProjectMetadata,
}

impl<'a> From<&'a GeneratedProject> for Summary<'a> {
    fn from(project: &'a GeneratedProject) -> Self {
        Self {
            id: &project.id,
            seed: project.seed,
            name: &project.name,
            stack: &project.stack,
            files: project.files.keys().map(String::as_str).collect(),
            metadata: &project.metadata,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EnrichedSummary<'a> {
    #[serde(flatten)]
    project: Summary<'a>,
    strategies_applied: &'a [String],
    flags: &'a crate::enrich::EnrichmentFlags,
    files_added: &'a [String],
    files_modified: &'a [String],
    duration_ms: u64,
}

impl<'a> From<&'a EnrichedProject> for EnrichedSummary<'a> {
    fn from(enriched: &'a EnrichedProject) -> Self {
        Self {
            project: Summary::from(&enriched.project),
            strategies_applied: &enriched.strategies_applied,
            flags: &enriched.flags,
            files_added: &enriched.files_added,
            files_modified: &enriched.files_modified,
            duration_ms: enriched.duration_ms,
        }
    }
}

fn stack_table(output: &mut String, stack: &TechStack, confidence: Option<&InferredStack>) {
    let last = Dimension::RESOLUTION_ORDER.len() - 1;
    for (i, dimension) in Dimension::RESOLUTION_ORDER.iter().enumerate() {
        let connector = if i == last { "\u{2514}" } else { "\u{251C}" };
        let label = format!("{dimension}:");
        output.push_str(&format!(
            "{connector}\u{2500} {label:<12} {}",
            stack.get(*dimension).name()
        ));
        if let Some(inferred) = confidence {
            let pct = (inferred.confidence(*dimension) * 100.0).round() as u32;
            output.push_str(&format!("  ({pct}%)"));
        }
        output.push('\n');
    }
}

fn human_project(project: &GeneratedProject, title: &str) -> String {
    let mut output = format!("\u{2713} {title}\n{RULE}\n\n");
    output.push_str(&format!("Name:         {}\n", project.name));
    output.push_str(&format!("Id:           {}\n", project.id));
    output.push_str(&format!("Seed:         {}\n\n", project.seed));

    output.push_str("Stack:\n");
    stack_table(&mut output, &project.stack, None);

    output.push_str(&format!("\nFiles ({}):\n", project.files.len()));
    for path in project.files.keys() {
        output.push_str(&format!("  {path}\n"));
    }
    output.push_str(&format!(
        "\nStrategies:   {}\n",
        project.metadata.strategies_applied.join(", ")
    ));
    output.push_str(&format!("Fingerprint:  {}\n", project.metadata.fingerprint));
    output
}

fn human_enriched(enriched: &EnrichedProject) -> String {
    let mut output = human_project(&enriched.project, "Enriched Project");
    output.push_str(&format!("\nFlags:        {}\n", enriched.flags));
    output.push_str(&format!(
        "Enrichments:  {}\n",
        if enriched.strategies_applied.is_empty() {
            "(none)".to_string()
        } else {
            enriched.strategies_applied.join(", ")
        }
    ));
    for path in &enriched.files_added {
        output.push_str(&format!("  + {path}\n"));
    }
    for path in &enriched.files_modified {
        output.push_str(&format!("  ~ {path}\n"));
    }
    output.push_str(&format!("\nProcessed in {}ms\n", enriched.duration_ms));
    output
}

fn human_inferred(inferred: &InferredStack) -> String {
    let mut output = format!("\u{2713} Inferred Stack\n{RULE}\n\n");
    stack_table(&mut output, &inferred.stack, Some(inferred));
    output
}

fn human_manifest(manifest: &RegistryManifest) -> String {
    let mut output = format!(
        "\u{2713} Registry ({} entries, v{})\n{RULE}\n\n",
        manifest.total_entries, manifest.version
    );
    for entry in &manifest.entries {
        output.push_str(&format!(
            "{:>8}  {:<40} {} files\n",
            entry.seed,
            entry.id,
            entry.files.len()
        ));
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assembler::{GenerateOptions, ProjectAssembler};

    async fn project() -> GeneratedProject {
        ProjectAssembler::standard()
            .generate(12, &GenerateOptions::default())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_json_omits_file_contents() {
        let project = project().await;
        let out = OutputFormatter::new(OutputFormat::Json)
            .format_project(&project)
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["seed"], 12);
        assert!(value["files"].is_array());
        assert!(value["metadata"]["fingerprint"].is_string());
    }

    #[tokio::test]
    async fn test_yaml_format() {
        let project = project().await;
        let out = OutputFormatter::new(OutputFormat::Yaml)
            .format_project(&project)
            .unwrap();
        let value: serde_yaml::Value = serde_yaml::from_str(&out).unwrap();
        assert_eq!(value["id"].as_str(), Some(project.id.as_str()));
    }

    #[tokio::test]
    async fn test_human_format() {
        let project = project().await;
        let out = OutputFormatter::new(OutputFormat::Human)
            .format_project(&project)
            .unwrap();
        assert!(out.contains("Generated Project"));
        assert!(out.contains("README.md"));
        assert!(out.contains("framework:"));
    }
}
