//! Moving project file maps between disk and memory.

use crate::strategy::ProjectFiles;
use anyhow::{Context, Result};
use ignore::{overrides::OverrideBuilder, WalkBuilder};
use std::path::{Component, Path};
use tracing::{debug, info, warn};

const EXCLUDED_DIRS: &[&str] = &[
    ".git",
    "node_modules",
    "target",
    "build",
    "dist",
    "vendor",
    "__pycache__",
    ".venv",
    "_build",
    "deps",
    ".dart_tool",
    ".gradle",
    "bin",
    "obj",
];

/// Files above this size are skipped on load.
const MAX_FILE_BYTES: u64 = 1024 * 1024;

/// Reads every UTF-8 text file under `root` into a map keyed by
/// `/`-separated relative path. Honours `.gitignore` and skips build output.
pub fn load_project(root: &Path) -> Result<ProjectFiles> {
    if !root.is_dir() {
        anyhow::bail!("{} is not a directory", root.display());
    }

    let mut overrides = OverrideBuilder::new(root);
    for excluded in EXCLUDED_DIRS {
        overrides
            .add(&format!("!{excluded}/"))
            .with_context(|| format!("Invalid exclude pattern for {excluded}"))?;
    }
    let overrides = overrides.build().context("Failed to build exclude set")?;

    let mut files = ProjectFiles::new();
    for result in WalkBuilder::new(root)
        .hidden(false)
        .git_ignore(true)
        .require_git(false)
        .overrides(overrides)
        .build()
    {
        let entry = match result {
            Ok(e) => e,
            Err(err) => {
                warn!(error = %err, "Failed to read directory entry");
                continue;
            }
        };
        let path = entry.path();
        if !entry.file_type().is_some_and(|t| t.is_file()) {
            continue;
        }

        let size = entry.metadata().map(|m| m.len()).unwrap_or(0);
        if size > MAX_FILE_BYTES {
            debug!(path = %path.display(), size, "Skipping large file");
            continue;
        }

        let Some(key) = relative_key(root, path) else {
            continue;
        };
        match std::fs::read(path) {
            Ok(bytes) => match String::from_utf8(bytes) {
                Ok(content) => {
                    files.insert(key, content);
                }
                Err(_) => debug!(path = %key, "Skipping binary file"),
            },
            Err(err) => warn!(path = %key, error = %err, "Failed to read file"),
        }
    }

    info!(root = %root.display(), files = files.len(), "Loaded project");
    Ok(files)
}

fn relative_key(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let parts: Vec<&str> = relative
        .components()
        .map(|c| match c {
            Component::Normal(part) => part.to_str(),
            _ => None,
        })
        .collect::<Option<_>>()?;
    (!parts.is_empty()).then(|| parts.join("/"))
}

/// Writes `files` under `dir`, creating parent directories. Paths that would
/// escape `dir` are rejected.
pub fn write_project(dir: &Path, files: &ProjectFiles) -> Result<()> {
    for (path, content) in files {
        let relative = Path::new(path);
        if relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_)))
        {
            anyhow::bail!("Refusing to write outside the output directory: {path}");
        }

        let target = dir.join(relative);
        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        std::fs::write(&target, content)
            .with_context(|| format!("Failed to write {}", target.display()))?;
    }

    info!(dir = %dir.display(), files = files.len(), "Wrote project");
    Ok(())
}
