use crate::assembler::GeneratedProject;
use crate::stack::TechStack;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, warn};

pub const MANIFEST_VERSION: &str = "1.0.0";

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("failed to read registry {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write registry {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize registry: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// One generated seed as recorded in the registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistryEntry {
    pub seed: u64,
    pub id: String,
    pub license: String,
    pub stack: TechStack,
    /// Generated file paths, sorted.
    pub files: Vec<String>,
    pub validated_at: DateTime<Utc>,
    pub upg_version: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl RegistryEntry {
    pub fn from_project(project: &GeneratedProject, validated_at: DateTime<Utc>) -> Self {
        let stack = project.stack;
        Self {
            seed: project.seed,
            id: project.id.clone(),
            license: "MIT".to_string(),
            stack,
            files: project.file_paths(),
            validated_at,
            upg_version: project.metadata.upg_version.clone(),
            tags: vec![
                stack.language.to_string(),
                stack.framework.to_string(),
                stack.archetype.to_string(),
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistryManifest {
    pub version: String,
    pub generated_at: DateTime<Utc>,
    pub total_entries: usize,
    pub entries: Vec<RegistryEntry>,
}

impl RegistryManifest {
    pub fn new(generated_at: DateTime<Utc>) -> Self {
        Self {
            version: MANIFEST_VERSION.to_string(),
            generated_at,
            total_entries: 0,
            entries: Vec::new(),
        }
    }

    /// Adds `entries`, replacing existing ones with the same seed. Entries
    /// end up sorted by ascending seed.
    pub fn merge(&mut self, entries: impl IntoIterator<Item = RegistryEntry>, now: DateTime<Utc>) {
        let mut by_seed: BTreeMap<u64, RegistryEntry> = self
            .entries
            .drain(..)
            .map(|entry| (entry.seed, entry))
            .collect();
        for entry in entries {
            if by_seed.insert(entry.seed, entry).is_some() {
                debug!("Replaced existing registry entry");
            }
        }

        self.entries = by_seed.into_values().collect();
        self.total_entries = self.entries.len();
        self.generated_at = now;
    }

    pub fn find(&self, seed: u64) -> Option<&RegistryEntry> {
        self.entries
            .binary_search_by_key(&seed, |entry| entry.seed)
            .ok()
            .map(|index| &self.entries[index])
    }

    pub fn to_json(&self) -> Result<String, RegistryError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Loads a manifest, or starts an empty one when the file is missing or
    /// unreadable as a manifest.
    pub fn load_or_new(path: &Path, now: DateTime<Utc>) -> Result<Self, RegistryError> {
        if !path.exists() {
            return Ok(Self::new(now));
        }
        let content = std::fs::read_to_string(path).map_err(|source| RegistryError::Read {
            path: path.display().to_string(),
            source,
        })?;
        match serde_json::from_str::<Self>(&content) {
            Ok(mut manifest) => {
                manifest.entries.sort_by_key(|entry| entry.seed);
                Ok(manifest)
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Ignoring unparsable registry manifest");
                Ok(Self::new(now))
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), RegistryError> {
        let write_err = |source| RegistryError::Write {
            path: path.display().to_string(),
            source,
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(write_err)?;
        }
        std::fs::write(path, self.to_json()?).map_err(write_err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stack::*;
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    fn entry(seed: u64, validated_at: DateTime<Utc>) -> RegistryEntry {
        let stack = TechStack {
            archetype: ArchetypeId::Backend,
            language: LanguageId::Go,
            runtime: RuntimeId::Go,
            framework: FrameworkId::Gin,
            database: DatabaseId::None,
            orm: OrmId::None,
            transport: TransportId::Rest,
            packaging: PackagingId::Docker,
            cicd: CicdId::GithubActions,
            build_tool: BuildToolId::GoModules,
            styling: StylingId::None,
            testing: TestingId::GoTest,
        };
        RegistryEntry {
            seed,
            id: format!("go-gin-{seed}"),
            license: "MIT".into(),
            stack,
            files: vec!["go.mod".into(), "main.go".into()],
            validated_at,
            upg_version: "0.4.0".into(),
            tags: vec!["go".into(), "gin".into(), "backend".into()],
        }
    }

    #[test]
    fn test_merge_dedups_and_sorts() {
        let mut manifest = RegistryManifest::new(at(0));
        manifest.merge([entry(9, at(1)), entry(3, at(1))], at(1));
        manifest.merge([entry(5, at(2)), entry(9, at(2))], at(2));

        let seeds: Vec<u64> = manifest.entries.iter().map(|e| e.seed).collect();
        assert_eq!(seeds, vec![3, 5, 9]);
        assert_eq!(manifest.total_entries, 3);
        assert_eq!(manifest.find(9).unwrap().validated_at, at(2));
        assert_eq!(manifest.generated_at, at(2));
        assert!(manifest.find(4).is_none());
    }

    #[test]
    fn test_camel_case_json() {
        let mut manifest = RegistryManifest::new(at(0));
        manifest.merge([entry(1, at(0))], at(0));
        let json = manifest.to_json().unwrap();
        assert!(json.contains("\"generatedAt\""));
        assert!(json.contains("\"totalEntries\": 1"));
        assert!(json.contains("\"validatedAt\""));
        assert!(json.contains("\"upgVersion\": \"0.4.0\""));
        assert!(json.contains("\"buildTool\": \"go-modules\""));

        let back: RegistryManifest = serde_json::from_str(&json).unwrap();
        assert_eq!(back, manifest);
    }

    #[test]
    fn test_load_missing_and_save() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("manifests/generated.json");
        let mut manifest = RegistryManifest::load_or_new(&path, at(0)).unwrap();
        assert!(manifest.entries.is_empty());

        manifest.merge([entry(7, at(3))], at(3));
        manifest.save(&path).unwrap();

        let loaded = RegistryManifest::load_or_new(&path, at(4)).unwrap();
        assert_eq!(loaded.find(7).map(|e| e.id.as_str()), Some("go-gin-7"));
    }

    #[test]
    fn test_load_garbage_starts_fresh() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("generated.json");
        std::fs::write(&path, "not json").unwrap();
        let manifest = RegistryManifest::load_or_new(&path, at(5)).unwrap();
        assert_eq!(manifest.total_entries, 0);
        assert_eq!(manifest.generated_at, at(5));
    }
}
