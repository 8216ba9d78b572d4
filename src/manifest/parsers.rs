use super::{Dependency, ManifestError, ManifestKind, ParsedManifest};
use regex::Regex;
use std::collections::HashSet;

pub trait ManifestParser: Send + Sync {
    fn parse(&self, kind: ManifestKind, content: &str) -> Result<ParsedManifest, ManifestError>;
}

/// Collects dependencies while skipping names already seen in an earlier
/// section.
struct Collector {
    manifest: ParsedManifest,
    seen: HashSet<String>,
}

impl Collector {
    fn new(kind: ManifestKind) -> Self {
        Self {
            manifest: ParsedManifest::empty(kind),
            seen: HashSet::new(),
        }
    }

    fn push(&mut self, name: &str, version: Option<String>, dev: bool) {
        if name.is_empty() || !self.seen.insert(name.to_string()) {
            return;
        }
        let dep = Dependency::new(name, version);
        if dev {
            self.manifest.dev_dependencies.push(dep);
        } else {
            self.manifest.dependencies.push(dep);
        }
    }

    fn finish(self) -> ParsedManifest {
        self.manifest
    }
}

/// `requests>=2.31; python_version>'3.8'` -> (`requests`, `>=2.31`)
pub fn split_requirement(spec: &str) -> (String, Option<String>) {
    let spec = spec.split(';').next().unwrap_or(spec).trim();
    let end = spec
        .find(|c: char| matches!(c, '<' | '>' | '=' | '!' | '~' | '[' | ' ' | '@'))
        .unwrap_or(spec.len());
    let name = spec[..end].trim().to_string();
    let rest = spec[end..].trim();
    let rest = if rest.starts_with('[') {
        rest.split_once(']').map(|(_, r)| r.trim()).unwrap_or("")
    } else {
        rest
    };
    let version = if rest.is_empty() {
        None
    } else {
        Some(rest.to_string())
    };
    (name, version)
}

pub struct TomlManifestParser {
    /// Dotted paths to dependency sections.
    pub dependency_keys: &'static [&'static str],
    pub dev_keys: &'static [&'static str],
    pub name_keys: &'static [&'static str],
}

fn toml_lookup<'a>(root: &'a toml::Value, path: &str) -> Option<&'a toml::Value> {
    path.split('.').try_fold(root, |value, key| value.get(key))
}

impl TomlManifestParser {
    fn collect(&self, section: &toml::Value, dev: bool, out: &mut Collector) {
        if let Some(table) = section.as_table() {
            for (name, value) in table {
                if name == "python" {
                    continue;
                }
                let version = if let Some(v) = value.as_str() {
                    Some(v.to_string())
                } else {
                    value
                        .get("version")
                        .and_then(|v| v.as_str())
                        .map(String::from)
                };
                out.push(name, version, dev);
            }
        } else if let Some(array) = section.as_array() {
            for spec in array.iter().filter_map(|v| v.as_str()) {
                let (name, version) = split_requirement(spec);
                out.push(&name, version, dev);
            }
        }
    }
}

impl ManifestParser for TomlManifestParser {
    fn parse(&self, kind: ManifestKind, content: &str) -> Result<ParsedManifest, ManifestError> {
        let parsed: toml::Value = toml::from_str(content)?;
        let mut out = Collector::new(kind);

        for key in self.dependency_keys {
            if let Some(section) = toml_lookup(&parsed, key) {
                self.collect(section, false, &mut out);
            }
        }
        for key in self.dev_keys {
            if let Some(section) = toml_lookup(&parsed, key) {
                self.collect(section, true, &mut out);
            }
        }

        let mut manifest = out.finish();
        manifest.name = self
            .name_keys
            .iter()
            .find_map(|key| toml_lookup(&parsed, key).and_then(|v| v.as_str()))
            .map(String::from);
        Ok(manifest)
    }
}

pub struct JsonManifestParser {
    pub dependency_keys: &'static [&'static str],
    pub dev_keys: &'static [&'static str],
    pub script_key: Option<&'static str>,
}

impl ManifestParser for JsonManifestParser {
    fn parse(&self, kind: ManifestKind, content: &str) -> Result<ParsedManifest, ManifestError> {
        let parsed: serde_json::Value = serde_json::from_str(content)?;
        let mut out = Collector::new(kind);

        let sections = self
            .dependency_keys
            .iter()
            .map(|k| (k, false))
            .chain(self.dev_keys.iter().map(|k| (k, true)));
        for (key, dev) in sections {
            if let Some(deps) = parsed.get(key).and_then(|v| v.as_object()) {
                for (name, version) in deps {
                    out.push(name, version.as_str().map(String::from), dev);
                }
            }
        }

        let mut manifest = out.finish();
        manifest.name = parsed
            .get("name")
            .and_then(|v| v.as_str())
            .map(String::from);
        if let Some(scripts) = self
            .script_key
            .and_then(|key| parsed.get(key))
            .and_then(|v| v.as_object())
        {
            for (name, command) in scripts {
                if let Some(command) = command.as_str() {
                    manifest.scripts.insert(name.clone(), command.to_string());
                }
            }
        }
        Ok(manifest)
    }
}

pub struct YamlManifestParser {
    pub dependency_key: &'static str,
    pub dev_key: &'static str,
}

impl ManifestParser for YamlManifestParser {
    fn parse(&self, kind: ManifestKind, content: &str) -> Result<ParsedManifest, ManifestError> {
        let parsed: serde_yaml::Value = serde_yaml::from_str(content)?;
        let mut out = Collector::new(kind);

        for (key, dev) in [(self.dependency_key, false), (self.dev_key, true)] {
            if let Some(deps) = parsed.get(key).and_then(|v| v.as_mapping()) {
                for (name, version) in deps {
                    if let Some(name) = name.as_str() {
                        out.push(name, version.as_str().map(String::from), dev);
                    }
                }
            }
        }

        let mut manifest = out.finish();
        manifest.name = parsed
            .get("name")
            .and_then(|v| v.as_str())
            .map(String::from);
        Ok(manifest)
    }
}

pub enum XmlManifestParser {
    /// `pom.xml` `<dependency>` elements, `groupId:artifactId`.
    Maven,
    /// `.csproj` `<PackageReference>` elements.
    MsBuild,
}

fn child_text<'a>(node: roxmltree::Node<'a, 'a>, tag: &str) -> Option<&'a str> {
    node.children()
        .find(|c| c.has_tag_name(tag))
        .and_then(|c| c.text())
        .map(str::trim)
}

impl ManifestParser for XmlManifestParser {
    fn parse(&self, kind: ManifestKind, content: &str) -> Result<ParsedManifest, ManifestError> {
        let doc = roxmltree::Document::parse(content)?;
        let mut out = Collector::new(kind);

        match self {
            XmlManifestParser::Maven => {
                for dep in doc.descendants().filter(|n| n.has_tag_name("dependency")) {
                    let (Some(group), Some(artifact)) =
                        (child_text(dep, "groupId"), child_text(dep, "artifactId"))
                    else {
                        continue;
                    };
                    let version = child_text(dep, "version").map(String::from);
                    let dev = child_text(dep, "scope") == Some("test");
                    out.push(&format!("{group}:{artifact}"), version, dev);
                }
                let mut manifest = out.finish();
                manifest.name = child_text(doc.root_element(), "artifactId").map(String::from);
                Ok(manifest)
            }
            XmlManifestParser::MsBuild => {
                for dep in doc
                    .descendants()
                    .filter(|n| n.has_tag_name("PackageReference"))
                {
                    if let Some(name) = dep.attribute("Include") {
                        let dev = name.contains("Test") || name.starts_with("xunit") || name.starts_with("NUnit");
                        out.push(name, dep.attribute("Version").map(String::from), dev);
                    }
                }
                let mut manifest = out.finish();
                manifest.name = doc
                    .descendants()
                    .find(|n| n.has_tag_name("AssemblyName"))
                    .and_then(|n| n.text())
                    .map(String::from);
                Ok(manifest)
            }
        }
    }
}

/// Line-oriented manifests matched with a pattern exposing `name` and
/// optionally `version` and `dev` capture groups.
pub struct RegexManifestParser {
    pub dependency_pattern: &'static str,
    /// Pattern whose first group is the project name.
    pub name_pattern: Option<&'static str>,
}

impl RegexManifestParser {
    pub fn requirements() -> Self {
        Self {
            dependency_pattern: r"(?m)^[ \t]*(?P<name>[A-Za-z0-9][A-Za-z0-9._-]*)(?:\[[^\]]*\])?[ \t]*(?P<version>[=<>!~]=?[ \t]*[^\s;#]+)?",
            name_pattern: None,
        }
    }

    pub fn go_mod() -> Self {
        Self {
            dependency_pattern: r"(?m)^[ \t]*(?:require[ \t]+)?(?P<name>[a-z0-9.-]+\.[a-z]{2,}/[^\s]+)[ \t]+(?P<version>v[^\s]+)",
            name_pattern: Some(r"(?m)^module[ \t]+(\S+)"),
        }
    }

    pub fn gradle() -> Self {
        Self {
            dependency_pattern: r#"(?m)^[ \t]*(?:(?P<dev>test\w+)|implementation|api|compileOnly|runtimeOnly|kapt|ksp)[ \t]*\(?[ \t]*["'](?P<name>[^"':]+:[^"':]+)(?::(?P<version>[^"']+))?["']"#,
            name_pattern: None,
        }
    }

    pub fn gemfile() -> Self {
        Self {
            dependency_pattern: r#"(?m)^[ \t]*gem[ \t]+["'](?P<name>[^"']+)["'](?:[ \t]*,[ \t]*["'](?P<version>[^"']+)["'])?"#,
            name_pattern: None,
        }
    }

    pub fn mix() -> Self {
        Self {
            dependency_pattern: r#"\{:(?P<name>\w+),\s*"(?P<version>[^"]+)"(?:[^}]*?(?P<dev>only:\s*\[?:test))?"#,
            name_pattern: Some(r"app:\s*:(\w+)"),
        }
    }

    pub fn swift_package() -> Self {
        Self {
            dependency_pattern: r#"\.package\(\s*url:\s*"[^"]*/(?P<name>[^/"]+?)(?:\.git)?"\s*,\s*(?:from:\s*)?"(?P<version>[^"]+)""#,
            name_pattern: Some(r#"name:\s*"([^"]+)""#),
        }
    }

    pub fn cmake() -> Self {
        Self {
            dependency_pattern: r"(?:find_package|FetchContent_Declare)\(\s*(?P<name>[A-Za-z0-9_]+)",
            name_pattern: Some(r"project\(\s*([A-Za-z0-9_.-]+)"),
        }
    }

    pub fn meson() -> Self {
        Self {
            dependency_pattern: r"dependency\(\s*'(?P<name>[^']+)'",
            name_pattern: Some(r"project\(\s*'([^']+)'"),
        }
    }
}

impl ManifestParser for RegexManifestParser {
    fn parse(&self, kind: ManifestKind, content: &str) -> Result<ParsedManifest, ManifestError> {
        let mut out = Collector::new(kind);

        if let Ok(re) = Regex::new(self.dependency_pattern) {
            for caps in re.captures_iter(content) {
                if let Some(name) = caps.name("name") {
                    let version = caps
                        .name("version")
                        .map(|m| m.as_str().trim().to_string());
                    out.push(name.as_str(), version, caps.name("dev").is_some());
                }
            }
        }

        let mut manifest = out.finish();
        if let Some(pattern) = self.name_pattern {
            if let Ok(re) = Regex::new(pattern) {
                manifest.name = re
                    .captures(content)
                    .and_then(|c| c.get(1))
                    .map(|m| m.as_str().to_string());
            }
        }
        Ok(manifest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::parse_manifest;

    #[test]
    fn test_cargo_toml() {
        let content = r#"
[package]
name = "svc"

[dependencies]
axum = "0.7"
tokio = { version = "1", features = ["full"] }

[dev-dependencies]
tempfile = "3"
"#;
        let parsed = parse_manifest(ManifestKind::CargoToml, content).unwrap();
        assert_eq!(parsed.name.as_deref(), Some("svc"));
        assert_eq!(parsed.dependencies.len(), 2);
        assert_eq!(parsed.dependencies[1].version.as_deref(), Some("1"));
        assert_eq!(parsed.dev_dependencies[0].name, "tempfile");
    }

    #[test]
    fn test_pyproject_pep621_and_poetry() {
        let pep621 = r#"
[project]
name = "svc"
dependencies = ["fastapi>=0.115", "uvicorn[standard]>=0.30"]

[project.optional-dependencies]
dev = ["pytest>=8"]
"#;
        let parsed = parse_manifest(ManifestKind::PyProject, pep621).unwrap();
        assert!(parsed.has_dependency("fastapi"));
        assert!(parsed.has_dependency("uvicorn"));
        assert_eq!(parsed.dev_dependencies[0].name, "pytest");

        let poetry = "[tool.poetry]\nname = \"svc\"\n\n[tool.poetry.dependencies]\npython = \"^3.12\"\ndjango = \"^5.1\"\n";
        let parsed = parse_manifest(ManifestKind::PyProject, poetry).unwrap();
        assert_eq!(parsed.name.as_deref(), Some("svc"));
        assert_eq!(parsed.dependencies.len(), 1);
        assert!(parsed.has_dependency("django"));
    }

    #[test]
    fn test_package_json() {
        let content = r#"{
  "name": "web",
  "scripts": { "test": "vitest run", "build": "vite build" },
  "dependencies": { "react": "^18.3.1" },
  "devDependencies": { "vitest": "^2.1.0", "react": "^18.3.1" }
}"#;
        let parsed = parse_manifest(ManifestKind::PackageJson, content).unwrap();
        assert_eq!(parsed.dependencies.len(), 1);
        assert_eq!(parsed.dev_dependencies.len(), 1);
        assert_eq!(parsed.scripts.get("test").map(String::as_str), Some("vitest run"));
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        assert!(matches!(
            parse_manifest(ManifestKind::PackageJson, "{ nope"),
            Err(ManifestError::Json(_))
        ));
    }

    #[test]
    fn test_pom_xml() {
        let content = r#"<project xmlns="http://maven.apache.org/POM/4.0.0">
  <artifactId>svc</artifactId>
  <dependencies>
    <dependency>
      <groupId>org.springframework.boot</groupId>
      <artifactId>spring-boot-starter-web</artifactId>
    </dependency>
    <dependency>
      <groupId>org.junit.jupiter</groupId>
      <artifactId>junit-jupiter</artifactId>
      <version>5.11.2</version>
      <scope>test</scope>
    </dependency>
  </dependencies>
</project>"#;
        let parsed = parse_manifest(ManifestKind::PomXml, content).unwrap();
        assert_eq!(parsed.name.as_deref(), Some("svc"));
        assert!(parsed.has_dependency("spring-boot-starter-web"));
        assert_eq!(parsed.dev_dependencies[0].name, "org.junit.jupiter:junit-jupiter");
    }

    #[test]
    fn test_go_mod() {
        let content = "module github.com/example/svc\n\ngo 1.23\n\nrequire (\n\tgithub.com/gin-gonic/gin v1.10.0\n\tgorm.io/gorm v1.25.12\n)\n";
        let parsed = parse_manifest(ManifestKind::GoMod, content).unwrap();
        assert_eq!(parsed.name.as_deref(), Some("github.com/example/svc"));
        assert!(parsed.has_dependency("github.com/gin-gonic/gin"));
        assert_eq!(parsed.dependencies[1].version.as_deref(), Some("v1.25.12"));
    }

    #[test]
    fn test_gradle_dev_configurations() {
        let content = "dependencies {\n    implementation(\"io.ktor:ktor-server-netty-jvm:2.3.12\")\n    testImplementation(\"io.kotest:kotest-runner-junit5:5.9.1\")\n}\n";
        let parsed = parse_manifest(ManifestKind::Gradle, content).unwrap();
        assert!(parsed.has_dependency("ktor-server-netty-jvm"));
        assert_eq!(parsed.dev_dependencies[0].name, "io.kotest:kotest-runner-junit5");
    }

    #[test]
    fn test_gemfile_and_mix() {
        let gemfile = "source \"https://rubygems.org\"\ngem \"rails\", \"~> 7.2\"\ngem 'pg'\n";
        let parsed = parse_manifest(ManifestKind::Gemfile, gemfile).unwrap();
        assert_eq!(parsed.dependencies.len(), 2);
        assert_eq!(parsed.dependencies[0].version.as_deref(), Some("~> 7.2"));

        let mix = "  def project do\n    [app: :svc]\n  end\n  defp deps do\n    [{:phoenix, \"~> 1.7\"}, {:floki, \"~> 0.36\", only: :test}]\n  end\n";
        let parsed = parse_manifest(ManifestKind::MixExs, mix).unwrap();
        assert_eq!(parsed.name.as_deref(), Some("svc"));
        assert!(parsed.has_dependency("phoenix"));
        assert_eq!(parsed.dev_dependencies[0].name, "floki");
    }

    #[test]
    fn test_split_requirement() {
        assert_eq!(
            split_requirement("requests>=2.31; python_version>'3.8'"),
            ("requests".to_string(), Some(">=2.31".to_string()))
        );
        assert_eq!(split_requirement("black"), ("black".to_string(), None));
        assert_eq!(
            split_requirement("uvicorn[standard]>=0.30"),
            ("uvicorn".to_string(), Some(">=0.30".to_string()))
        );
    }
}
