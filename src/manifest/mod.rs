//! Build manifest recognition and dependency extraction shared by stack
//! inference and file introspection.

pub mod parsers;

pub use parsers::{
    JsonManifestParser, ManifestParser, RegexManifestParser, TomlManifestParser,
    XmlManifestParser, YamlManifestParser,
};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ManifestKind {
    PackageJson,
    DenoJson,
    CargoToml,
    PyProject,
    Requirements,
    GoMod,
    PomXml,
    Gradle,
    Csproj,
    Gemfile,
    ComposerJson,
    MixExs,
    PackageSwift,
    Pubspec,
    CMakeLists,
    MesonBuild,
    Unknown,
}

impl ManifestKind {
    /// Manifests in the order they are preferred when several are present.
    pub const PRIORITY: [ManifestKind; 16] = [
        ManifestKind::CargoToml,
        ManifestKind::GoMod,
        ManifestKind::PomXml,
        ManifestKind::Gradle,
        ManifestKind::Csproj,
        ManifestKind::MixExs,
        ManifestKind::PackageSwift,
        ManifestKind::Pubspec,
        ManifestKind::ComposerJson,
        ManifestKind::Gemfile,
        ManifestKind::PyProject,
        ManifestKind::Requirements,
        ManifestKind::DenoJson,
        ManifestKind::PackageJson,
        ManifestKind::CMakeLists,
        ManifestKind::MesonBuild,
    ];

    /// Recognizes a manifest by file name, ignoring directories.
    pub fn from_path(path: &str) -> Option<Self> {
        let file_name = path.rsplit('/').next().unwrap_or(path);
        let kind = match file_name {
            "package.json" => ManifestKind::PackageJson,
            "deno.json" | "deno.jsonc" => ManifestKind::DenoJson,
            "Cargo.toml" => ManifestKind::CargoToml,
            "pyproject.toml" => ManifestKind::PyProject,
            "requirements.txt" => ManifestKind::Requirements,
            "go.mod" => ManifestKind::GoMod,
            "pom.xml" => ManifestKind::PomXml,
            "build.gradle" | "build.gradle.kts" => ManifestKind::Gradle,
            "Gemfile" => ManifestKind::Gemfile,
            "composer.json" => ManifestKind::ComposerJson,
            "mix.exs" => ManifestKind::MixExs,
            "Package.swift" => ManifestKind::PackageSwift,
            "pubspec.yaml" => ManifestKind::Pubspec,
            "CMakeLists.txt" => ManifestKind::CMakeLists,
            "meson.build" => ManifestKind::MesonBuild,
            name if name.ends_with(".csproj") => ManifestKind::Csproj,
            _ => return None,
        };
        Some(kind)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ManifestKind::PackageJson => "package.json",
            ManifestKind::DenoJson => "deno.json",
            ManifestKind::CargoToml => "Cargo.toml",
            ManifestKind::PyProject => "pyproject.toml",
            ManifestKind::Requirements => "requirements.txt",
            ManifestKind::GoMod => "go.mod",
            ManifestKind::PomXml => "pom.xml",
            ManifestKind::Gradle => "build.gradle.kts",
            ManifestKind::Csproj => "*.csproj",
            ManifestKind::Gemfile => "Gemfile",
            ManifestKind::ComposerJson => "composer.json",
            ManifestKind::MixExs => "mix.exs",
            ManifestKind::PackageSwift => "Package.swift",
            ManifestKind::Pubspec => "pubspec.yaml",
            ManifestKind::CMakeLists => "CMakeLists.txt",
            ManifestKind::MesonBuild => "meson.build",
            ManifestKind::Unknown => "unknown",
        }
    }

    fn parser(&self) -> Option<Box<dyn ManifestParser>> {
        let parser: Box<dyn ManifestParser> = match self {
            ManifestKind::PackageJson => Box::new(JsonManifestParser {
                dependency_keys: &["dependencies", "peerDependencies"],
                dev_keys: &["devDependencies"],
                script_key: Some("scripts"),
            }),
            ManifestKind::DenoJson => Box::new(JsonManifestParser {
                dependency_keys: &["imports"],
                dev_keys: &[],
                script_key: Some("tasks"),
            }),
            ManifestKind::ComposerJson => Box::new(JsonManifestParser {
                dependency_keys: &["require"],
                dev_keys: &["require-dev"],
                script_key: Some("scripts"),
            }),
            ManifestKind::CargoToml => Box::new(TomlManifestParser {
                dependency_keys: &["dependencies", "build-dependencies"],
                dev_keys: &["dev-dependencies"],
                name_keys: &["package.name"],
            }),
            ManifestKind::PyProject => Box::new(TomlManifestParser {
                dependency_keys: &["project.dependencies", "tool.poetry.dependencies"],
                dev_keys: &[
                    "project.optional-dependencies.dev",
                    "tool.poetry.group.dev.dependencies",
                    "dependency-groups.dev",
                ],
                name_keys: &["project.name", "tool.poetry.name"],
            }),
            ManifestKind::Pubspec => Box::new(YamlManifestParser {
                dependency_key: "dependencies",
                dev_key: "dev_dependencies",
            }),
            ManifestKind::PomXml => Box::new(XmlManifestParser::Maven),
            ManifestKind::Csproj => Box::new(XmlManifestParser::MsBuild),
            ManifestKind::Requirements => Box::new(RegexManifestParser::requirements()),
            ManifestKind::GoMod => Box::new(RegexManifestParser::go_mod()),
            ManifestKind::Gradle => Box::new(RegexManifestParser::gradle()),
            ManifestKind::Gemfile => Box::new(RegexManifestParser::gemfile()),
            ManifestKind::MixExs => Box::new(RegexManifestParser::mix()),
            ManifestKind::PackageSwift => Box::new(RegexManifestParser::swift_package()),
            ManifestKind::CMakeLists => Box::new(RegexManifestParser::cmake()),
            ManifestKind::MesonBuild => Box::new(RegexManifestParser::meson()),
            ManifestKind::Unknown => return None,
        };
        Some(parser)
    }
}

impl std::fmt::Display for ManifestKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependency {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl Dependency {
    pub fn new(name: impl Into<String>, version: Option<String>) -> Self {
        Self {
            name: name.into(),
            version,
        }
    }
}

/// Structured content of one manifest file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedManifest {
    pub kind: ManifestKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub dependencies: Vec<Dependency>,
    pub dev_dependencies: Vec<Dependency>,
    /// Named scripts or tasks (package.json `scripts`, deno.json `tasks`).
    pub scripts: BTreeMap<String, String>,
}

impl ParsedManifest {
    pub fn empty(kind: ManifestKind) -> Self {
        Self {
            kind,
            name: None,
            dependencies: Vec::new(),
            dev_dependencies: Vec::new(),
            scripts: BTreeMap::new(),
        }
    }

    pub fn unknown() -> Self {
        Self::empty(ManifestKind::Unknown)
    }

    /// Runtime and development dependencies.
    pub fn all_dependencies(&self) -> impl Iterator<Item = &Dependency> {
        self.dependencies.iter().chain(self.dev_dependencies.iter())
    }

    /// Whether any dependency name equals `name` or ends with `:name` / `/name`.
    pub fn has_dependency(&self, name: &str) -> bool {
        self.all_dependencies().any(|d| {
            d.name == name
                || d.name.ends_with(&format!(":{name}"))
                || d.name.ends_with(&format!("/{name}"))
        })
    }

    pub fn has_dependency_prefix(&self, prefix: &str) -> bool {
        self.all_dependencies().any(|d| d.name.starts_with(prefix))
    }
}

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid XML: {0}")]
    Xml(#[from] roxmltree::Error),
}

/// Parses `content` as a manifest of `kind`.
pub fn parse_manifest(kind: ManifestKind, content: &str) -> Result<ParsedManifest, ManifestError> {
    match kind.parser() {
        Some(parser) => parser.parse(kind, content),
        None => Ok(ParsedManifest::unknown()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use yare::parameterized;

    #[parameterized(
        cargo = { "Cargo.toml", Some(ManifestKind::CargoToml) },
        nested_pkg = { "web/package.json", Some(ManifestKind::PackageJson) },
        gradle_kts = { "build.gradle.kts", Some(ManifestKind::Gradle) },
        csproj = { "CalmHeron.csproj", Some(ManifestKind::Csproj) },
        readme = { "README.md", None },
    )]
    fn test_from_path(path: &str, expected: Option<ManifestKind>) {
        assert_eq!(ManifestKind::from_path(path), expected);
    }

    #[test]
    fn test_has_dependency_suffix_forms() {
        let mut manifest = ParsedManifest::empty(ManifestKind::PomXml);
        manifest.dependencies.push(Dependency::new(
            "org.springframework.boot:spring-boot-starter-web",
            None,
        ));
        manifest
            .dev_dependencies
            .push(Dependency::new("github.com/gin-gonic/gin", None));
        assert!(manifest.has_dependency("spring-boot-starter-web"));
        assert!(manifest.has_dependency("gin"));
        assert!(!manifest.has_dependency("spring"));
        assert!(manifest.has_dependency_prefix("org.springframework"));
    }

    #[test]
    fn test_unknown_kind_parses_to_empty() {
        let parsed = parse_manifest(ManifestKind::Unknown, "anything").unwrap();
        assert_eq!(parsed, ParsedManifest::unknown());
    }
}
