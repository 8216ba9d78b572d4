use super::glob::Glob;
use super::ports::{self, PortInfo};
use crate::manifest::{parse_manifest, ManifestKind, ParsedManifest};
use crate::stack::BuildToolId;
use crate::strategy::ProjectFiles;
use std::collections::HashSet;
use tracing::{debug, warn};

/// Entry points by convention, most specific first.
const ENTRY_POINT_GLOBS: &[&str] = &[
    "src/main.rs",
    "main.go",
    "cmd/*/main.go",
    "src/main.ts",
    "src/index.ts",
    "src/main.tsx",
    "src/index.js",
    "src/main.js",
    "index.ts",
    "index.js",
    "main.ts",
    "manage.py",
    "main.py",
    "app/main.py",
    "*/__main__.py",
    "*/main.py",
    "src/main/**/*Application.java",
    "src/main/**/Application.kt",
    "src/main/**/Main.java",
    "src/main/**/Main.kt",
    "Program.cs",
    "config.ru",
    "app.rb",
    "public/index.php",
    "lib/*/application.ex",
    "lib/*.ex",
    "Sources/*/main.swift",
    "Sources/*/App.swift",
    "lib/main.dart",
    "bin/main.dart",
    "src/main.cpp",
    "src/lib.rs",
];

/// Read-only structured view over a project's files.
///
/// The dominant manifest is parsed once at construction. A manifest that
/// fails to parse degrades to [`ManifestKind::Unknown`] with empty dependency
/// lists rather than failing the caller.
#[derive(Debug)]
pub struct FileIntrospector<'a> {
    files: &'a ProjectFiles,
    manifest_path: Option<String>,
    manifest: ParsedManifest,
    degraded: bool,
}

impl<'a> FileIntrospector<'a> {
    /// Picks the shallowest manifest, breaking ties by [`ManifestKind::PRIORITY`].
    pub fn new(files: &'a ProjectFiles) -> Self {
        Self::with_preferred(files, None)
    }

    /// Prefers the manifest that belongs to `build_tool` when one exists.
    pub fn for_build_tool(files: &'a ProjectFiles, build_tool: BuildToolId) -> Self {
        Self::with_preferred(files, Some(manifest_kind_for(build_tool)))
    }

    fn with_preferred(files: &'a ProjectFiles, preferred: Option<ManifestKind>) -> Self {
        let mut candidates: Vec<(&String, ManifestKind)> = files
            .keys()
            .filter_map(|path| ManifestKind::from_path(path).map(|kind| (path, kind)))
            .collect();
        candidates.sort_by_key(|(path, kind)| {
            let preferred_rank = usize::from(Some(*kind) != preferred);
            let depth = path.matches('/').count();
            let rank = ManifestKind::PRIORITY
                .iter()
                .position(|k| k == kind)
                .unwrap_or(ManifestKind::PRIORITY.len());
            (preferred_rank, depth, rank)
        });

        let Some((path, kind)) = candidates.first().copied() else {
            debug!("no manifest found");
            return Self {
                files,
                manifest_path: None,
                manifest: ParsedManifest::unknown(),
                degraded: false,
            };
        };

        let content = files.get(path).map(String::as_str).unwrap_or_default();
        let (manifest, degraded) = match parse_manifest(kind, content) {
            Ok(manifest) => (manifest, false),
            Err(err) => {
                warn!(path = %path, kind = %kind, error = %err, "Manifest unparsable, treating project as unknown");
                (ParsedManifest::unknown(), true)
            }
        };

        Self {
            files,
            manifest_path: Some(path.clone()),
            manifest,
            degraded,
        }
    }

    pub fn get_manifest(&self) -> &ParsedManifest {
        &self.manifest
    }

    pub fn manifest_path(&self) -> Option<&str> {
        self.manifest_path.as_deref()
    }

    /// Whether the dominant manifest failed to parse.
    pub fn is_degraded(&self) -> bool {
        self.degraded
    }

    pub fn has_file(&self, path: &str) -> bool {
        self.files.contains_key(path)
    }

    pub fn get_content(&self, path: &str) -> Option<&'a str> {
        self.files.get(path).map(String::as_str)
    }

    /// Paths matching a glob-lite pattern, sorted.
    pub fn find_files(&self, pattern: &str) -> Vec<&'a str> {
        let glob = Glob::new(pattern);
        self.files
            .keys()
            .filter(|path| glob.is_match(path))
            .map(String::as_str)
            .collect()
    }

    /// `None` when the file is missing or not valid JSON.
    pub fn parse_json(&self, path: &str) -> Option<serde_json::Value> {
        let content = self.get_content(path)?;
        match serde_json::from_str(content) {
            Ok(value) => Some(value),
            Err(err) => {
                warn!(path, error = %err, "Invalid JSON");
                None
            }
        }
    }

    pub fn get_entry_point(&self) -> Option<String> {
        if matches!(
            self.manifest.kind,
            ManifestKind::PackageJson | ManifestKind::DenoJson
        ) {
            let declared = self
                .manifest_path
                .as_deref()
                .and_then(|p| self.parse_json(p))
                .and_then(|json| {
                    ["main", "module"]
                        .iter()
                        .find_map(|k| json.get(k).and_then(|v| v.as_str()).map(String::from))
                });
            if let Some(entry) = declared {
                return Some(entry);
            }
        }

        ENTRY_POINT_GLOBS
            .iter()
            .find_map(|pattern| self.find_files(pattern).first().map(|p| p.to_string()))
    }

    fn node_runner(&self) -> &'static str {
        if self.has_file("pnpm-lock.yaml") {
            "pnpm"
        } else if self.has_file("yarn.lock") {
            "yarn"
        } else if self.has_file("bun.lockb") || self.has_file("bun.lock") {
            "bun"
        } else {
            "npm"
        }
    }

    fn script(&self, name: &str) -> Option<&str> {
        self.manifest.scripts.get(name).map(String::as_str)
    }

    fn gradle(&self) -> &'static str {
        if self.has_file("gradlew") {
            "./gradlew"
        } else {
            "gradle"
        }
    }

    pub fn get_test_command(&self) -> Option<String> {
        let m = &self.manifest;
        let command = match m.kind {
            ManifestKind::PackageJson => {
                self.script("test")?;
                let runner = self.node_runner();
                if runner == "bun" {
                    "bun run test".to_string()
                } else {
                    format!("{runner} test")
                }
            }
            ManifestKind::DenoJson => {
                if self.script("test").is_some() {
                    "deno task test".to_string()
                } else {
                    "deno test".to_string()
                }
            }
            ManifestKind::CargoToml => "cargo test".to_string(),
            ManifestKind::GoMod => "go test ./...".to_string(),
            ManifestKind::PyProject | ManifestKind::Requirements => {
                let pytest = m.has_dependency("pytest") || self.has_file("conftest.py");
                let prefix = if self.has_file("poetry.lock")
                    || self
                        .get_content("pyproject.toml")
                        .map_or(false, |c| c.contains("[tool.poetry"))
                {
                    "poetry run "
                } else if self.has_file("uv.lock") {
                    "uv run "
                } else {
                    ""
                };
                if pytest {
                    format!("{prefix}pytest")
                } else {
                    format!("{prefix}python -m unittest discover")
                }
            }
            ManifestKind::PomXml => "mvn -B test".to_string(),
            ManifestKind::Gradle => format!("{} test", self.gradle()),
            ManifestKind::Csproj => "dotnet test".to_string(),
            ManifestKind::Gemfile => {
                if m.has_dependency("rspec") || m.has_dependency("rspec-rails") {
                    "bundle exec rspec".to_string()
                } else {
                    "bundle exec rake test".to_string()
                }
            }
            ManifestKind::ComposerJson => {
                if self.script("test").is_some() {
                    "composer test".to_string()
                } else if m.has_dependency("pestphp/pest") {
                    "vendor/bin/pest".to_string()
                } else {
                    "vendor/bin/phpunit".to_string()
                }
            }
            ManifestKind::MixExs => "mix test".to_string(),
            ManifestKind::PackageSwift => "swift test".to_string(),
            ManifestKind::Pubspec => {
                if m.has_dependency("flutter") {
                    "flutter test".to_string()
                } else {
                    "dart test".to_string()
                }
            }
            ManifestKind::CMakeLists => "ctest --test-dir build --output-on-failure".to_string(),
            ManifestKind::MesonBuild => "meson test -C build".to_string(),
            ManifestKind::Unknown => return None,
        };
        Some(command)
    }

    pub fn get_build_command(&self) -> Option<String> {
        let m = &self.manifest;
        let command = match m.kind {
            ManifestKind::PackageJson => {
                self.script("build")?;
                format!("{} run build", self.node_runner())
            }
            ManifestKind::DenoJson => {
                self.script("build")?;
                "deno task build".to_string()
            }
            ManifestKind::CargoToml => "cargo build --release".to_string(),
            ManifestKind::GoMod => "go build ./...".to_string(),
            ManifestKind::PyProject => {
                if self.has_file("poetry.lock")
                    || self
                        .get_content("pyproject.toml")
                        .map_or(false, |c| c.contains("[tool.poetry"))
                {
                    "poetry build".to_string()
                } else {
                    "uv build".to_string()
                }
            }
            ManifestKind::PomXml => "mvn -B package -DskipTests".to_string(),
            ManifestKind::Gradle => format!("{} build -x test", self.gradle()),
            ManifestKind::Csproj => "dotnet build -c Release".to_string(),
            ManifestKind::ComposerJson => "composer install --no-dev --optimize-autoloader".to_string(),
            ManifestKind::MixExs => "mix compile".to_string(),
            ManifestKind::PackageSwift => "swift build -c release".to_string(),
            ManifestKind::Pubspec => {
                if m.has_dependency("flutter") {
                    "flutter build web".to_string()
                } else {
                    "dart compile exe bin/main.dart".to_string()
                }
            }
            ManifestKind::CMakeLists => {
                "cmake -S . -B build && cmake --build build".to_string()
            }
            ManifestKind::MesonBuild => "meson setup build && meson compile -C build".to_string(),
            ManifestKind::Requirements | ManifestKind::Gemfile | ManifestKind::Unknown => {
                return None
            }
        };
        Some(command)
    }

    /// Ports from Dockerfiles, env files, compose files and listen patterns
    /// in source, in that order, deduplicated.
    pub fn get_exposed_ports(&self) -> Vec<PortInfo> {
        let mut seen = HashSet::new();
        let mut found = Vec::new();

        for path in self.find_files("**/Dockerfile*") {
            if let Some(content) = self.get_content(path) {
                found.extend(ports::parse_expose(content, &mut seen));
            }
        }
        for path in self.find_files("**/.env*") {
            if let Some(content) = self.get_content(path) {
                found.extend(ports::parse_env_ports(content, &mut seen));
            }
        }
        for path in self
            .find_files("**/docker-compose*.y*ml")
            .into_iter()
            .chain(self.find_files("**/compose.y*ml"))
        {
            if let Some(content) = self.get_content(path) {
                found.extend(ports::parse_compose_ports(content, &mut seen));
            }
        }
        for (path, content) in self.files.iter() {
            if is_source_or_config(path) {
                found.extend(ports::parse_listen_patterns(content, &mut seen));
            }
        }

        found
    }

    /// Every path in the snapshot, sorted.
    pub fn get_all_paths(&self) -> Vec<&'a str> {
        self.files.keys().map(String::as_str).collect()
    }
}

fn is_source_or_config(path: &str) -> bool {
    const EXTENSIONS: &[&str] = &[
        "ts", "tsx", "js", "mjs", "cjs", "py", "rs", "go", "java", "kt", "cs", "rb", "php", "ex",
        "exs", "swift", "dart", "cpp", "properties", "yml", "yaml", "json", "toml",
    ];
    let file_name = path.rsplit('/').next().unwrap_or(path);
    if file_name.starts_with("docker-compose") || file_name.ends_with("-lock.json") {
        return false;
    }
    file_name
        .rsplit_once('.')
        .map_or(false, |(_, ext)| EXTENSIONS.contains(&ext))
}

fn manifest_kind_for(build_tool: BuildToolId) -> ManifestKind {
    match build_tool {
        BuildToolId::Npm | BuildToolId::Pnpm | BuildToolId::Yarn | BuildToolId::Bun => {
            ManifestKind::PackageJson
        }
        BuildToolId::Deno => ManifestKind::DenoJson,
        BuildToolId::Pip => ManifestKind::Requirements,
        BuildToolId::Poetry | BuildToolId::Uv => ManifestKind::PyProject,
        BuildToolId::Cargo => ManifestKind::CargoToml,
        BuildToolId::GoModules => ManifestKind::GoMod,
        BuildToolId::Maven => ManifestKind::PomXml,
        BuildToolId::Gradle => ManifestKind::Gradle,
        BuildToolId::DotnetCli => ManifestKind::Csproj,
        BuildToolId::Bundler => ManifestKind::Gemfile,
        BuildToolId::Composer => ManifestKind::ComposerJson,
        BuildToolId::Mix => ManifestKind::MixExs,
        BuildToolId::SwiftPm => ManifestKind::PackageSwift,
        BuildToolId::Pub => ManifestKind::Pubspec,
        BuildToolId::CMake => ManifestKind::CMakeLists,
        BuildToolId::Meson => ManifestKind::MesonBuild,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::introspect::PortSource;

    fn files(entries: &[(&str, &str)]) -> ProjectFiles {
        entries
            .iter()
            .map(|(p, c)| (p.to_string(), c.to_string()))
            .collect()
    }

    #[test]
    fn test_node_project() {
        let files = files(&[
            (
                "package.json",
                r#"{"name":"web","main":"dist/server.js","scripts":{"test":"vitest run","build":"tsc"},"dependencies":{"express":"^4.21.0"}}"#,
            ),
            ("pnpm-lock.yaml", ""),
            ("src/server.ts", "app.listen(Number(process.env.PORT ?? 3000));\n"),
            ("Dockerfile", "FROM node:22\nEXPOSE 3000\n"),
        ]);
        let view = FileIntrospector::new(&files);

        assert_eq!(view.get_manifest().kind, ManifestKind::PackageJson);
        assert!(view.get_manifest().has_dependency("express"));
        assert_eq!(view.get_entry_point().as_deref(), Some("dist/server.js"));
        assert_eq!(view.get_test_command().as_deref(), Some("pnpm test"));
        assert_eq!(view.get_build_command().as_deref(), Some("pnpm run build"));

        let ports = view.get_exposed_ports();
        assert_eq!(ports.len(), 1);
        assert_eq!(ports[0].port, 3000);
        assert_eq!(ports[0].source, PortSource::Dockerfile);
    }

    #[test]
    fn test_unparsable_manifest_degrades_to_unknown() {
        let files = files(&[("Cargo.toml", "[package\nname = "), ("src/main.rs", "fn main() {}")]);
        let view = FileIntrospector::new(&files);

        assert!(view.is_degraded());
        assert_eq!(view.get_manifest().kind, ManifestKind::Unknown);
        assert!(view.get_manifest().dependencies.is_empty());
        assert_eq!(view.manifest_path(), Some("Cargo.toml"));
        assert_eq!(view.get_test_command(), None);
        assert_eq!(view.get_entry_point().as_deref(), Some("src/main.rs"));
    }

    #[test]
    fn test_prefers_build_tool_manifest() {
        let files = files(&[
            ("package.json", r#"{"name":"assets"}"#),
            ("pyproject.toml", "[project]\nname = \"svc\"\ndependencies = [\"pytest>=8\"]\n"),
        ]);
        assert_eq!(
            FileIntrospector::new(&files).get_manifest().kind,
            ManifestKind::PyProject
        );
        let view = FileIntrospector::for_build_tool(&files, BuildToolId::Npm);
        assert_eq!(view.get_manifest().kind, ManifestKind::PackageJson);
        assert_eq!(view.get_test_command(), None);
    }

    #[test]
    fn test_find_files_and_paths() {
        let files = files(&[
            ("src/a.rs", ""),
            ("src/bin/b.rs", ""),
            ("README.md", ""),
        ]);
        let view = FileIntrospector::new(&files);
        assert_eq!(view.find_files("src/*.rs"), vec!["src/a.rs"]);
        assert_eq!(view.find_files("**/*.rs"), vec!["src/a.rs", "src/bin/b.rs"]);
        assert_eq!(view.get_all_paths(), vec!["README.md", "src/a.rs", "src/bin/b.rs"]);
        assert!(view.has_file("README.md"));
        assert_eq!(view.get_manifest().kind, ManifestKind::Unknown);
        assert!(!view.is_degraded());
    }

    #[test]
    fn test_parse_json_invalid_is_none() {
        let files = files(&[("tsconfig.json", "{ oops")]);
        let view = FileIntrospector::new(&files);
        assert!(view.parse_json("tsconfig.json").is_none());
        assert!(view.parse_json("missing.json").is_none());
    }
}
