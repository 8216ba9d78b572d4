use crate::stack::TechStack;
use crate::strategy::ProjectFiles;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Output of one `generate` call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedProject {
    /// `{language}-{framework}-{seed}`
    pub id: String,
    pub seed: u64,
    pub name: String,
    pub files: ProjectFiles,
    pub stack: TechStack,
    pub metadata: ProjectMetadata,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectMetadata {
    pub upg_version: String,
    /// Strategy ids in application order.
    pub strategies_applied: Vec<String>,
    /// Audit trail: `forced:<dim>`, `default:<dim>=<v>`,
    /// `fallback:framework=<v>`, `strategy:<id>` and, after enrichment,
    /// `enrich:<id>`.
    pub constraints_applied: Vec<String>,
    /// SHA-256 over the sorted file map.
    pub fingerprint: String,
}

impl GeneratedProject {
    /// Wraps files that were not produced by Pass 1, such as a project loaded
    /// from disk, so they can be enriched. `stack` is usually inferred.
    pub fn from_existing(
        seed: u64,
        name: impl Into<String>,
        files: ProjectFiles,
        stack: TechStack,
    ) -> Self {
        let metadata = ProjectMetadata {
            upg_version: crate::VERSION.to_string(),
            strategies_applied: Vec::new(),
            constraints_applied: vec!["inferred".to_string()],
            fingerprint: fingerprint(&files),
        };
        Self {
            id: format!("{}-{}-{}", stack.language, stack.framework, seed),
            seed,
            name: name.into(),
            files,
            stack,
            metadata,
        }
    }

    pub fn file_paths(&self) -> Vec<String> {
        self.files.keys().cloned().collect()
    }

    pub fn file(&self, path: &str) -> Option<&str> {
        self.files.get(path).map(String::as_str)
    }
}

/// Hex SHA-256 over `(path, content)` pairs in path order.
pub fn fingerprint(files: &ProjectFiles) -> String {
    let mut hasher = Sha256::new();
    for (path, content) in files {
        hasher.update(path.as_bytes());
        hasher.update([0u8]);
        hasher.update(content.as_bytes());
        hasher.update([0u8]);
    }
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fingerprint_depends_on_paths_and_content() {
        let mut a = ProjectFiles::new();
        a.insert("a.txt".into(), "x".into());
        let mut b = ProjectFiles::new();
        b.insert("a.txt".into(), "y".into());
        let mut c = ProjectFiles::new();
        c.insert("b.txt".into(), "x".into());

        assert_eq!(fingerprint(&a), fingerprint(&a.clone()));
        assert_ne!(fingerprint(&a), fingerprint(&b));
        assert_ne!(fingerprint(&a), fingerprint(&c));
        assert_eq!(fingerprint(&a).len(), 64);
    }

    #[test]
    fn test_boundary_between_path_and_content() {
        let mut a = ProjectFiles::new();
        a.insert("ab".into(), "c".into());
        let mut b = ProjectFiles::new();
        b.insert("a".into(), "bc".into());
        assert_ne!(fingerprint(&a), fingerprint(&b));
    }
}
