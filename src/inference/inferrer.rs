use super::signals::{self, DependencyPattern, PathConvention, PathMatch, Signal};
use crate::manifest::{parse_manifest, ManifestKind, ParsedManifest};
use crate::stack::{
    ArchetypeId, BuildToolId, CicdId, DatabaseId, Dimension, DimensionValue, FrameworkId,
    LanguageId, OrmId, PackagingId, RuntimeId, StylingId, TechStack, TestingId, TransportId,
    UniversalMatrix,
};
use crate::strategy::ProjectFiles;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

/// Best-effort stack read off a file set, with per-dimension confidence.
///
/// Dimensions are inferred independently. Run [`InferredStack::stack`]
/// through the constraint solver when consistency matters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InferredStack {
    pub stack: TechStack,
    pub confidence: BTreeMap<Dimension, f64>,
    pub signals: BTreeMap<Dimension, Signal>,
}

impl InferredStack {
    pub fn confidence(&self, dimension: Dimension) -> f64 {
        self.confidence.get(&dimension).copied().unwrap_or(0.0)
    }

    pub fn signal(&self, dimension: Dimension) -> Signal {
        self.signals
            .get(&dimension)
            .copied()
            .unwrap_or(Signal::Fallback)
    }
}

pub struct StackInferrer {
    matrix: Arc<UniversalMatrix>,
}

impl StackInferrer {
    pub fn new(matrix: Arc<UniversalMatrix>) -> Self {
        Self { matrix }
    }

    pub fn infer(&self, files: &ProjectFiles) -> InferredStack {
        let evidence = Evidence::collect(files);
        let mut decisions = Decisions::default();

        let language = self.language(&evidence, &mut decisions);
        let framework = self.framework(&evidence, language, &mut decisions);
        let archetype = self.archetype(&evidence, framework, &mut decisions);
        let runtime = self.runtime(&evidence, language, &mut decisions);

        let database = evidence
            .dependency(signals::DATABASE_DEPENDENCIES)
            .map(|db| (db, Signal::Dependency))
            .or_else(|| evidence.marker(signals::DATABASE_MARKERS).map(|db| (db, Signal::PathConvention)))
            .unwrap_or((DatabaseId::None, Signal::Fallback));
        decisions.record(Dimension::Database, database.1);

        let orm = evidence
            .dependency(signals::ORM_DEPENDENCIES)
            .map(|orm| (orm, Signal::Dependency))
            .or_else(|| {
                evidence
                    .path_value(signals::ORM_PATHS)
                    .and_then(|v| match v {
                        DimensionValue::Orm(orm) => Some((orm, Signal::PathConvention)),
                        _ => None,
                    })
            })
            .unwrap_or((OrmId::None, Signal::Fallback));
        decisions.record(Dimension::Orm, orm.1);

        let transport = self.transport(&evidence, archetype, &mut decisions);
        let packaging = evidence
            .path_value(signals::PACKAGING_PATHS)
            .and_then(|v| match v {
                DimensionValue::Packaging(p) => Some(p),
                _ => None,
            })
            .map(|p| (p, Signal::PathConvention))
            .unwrap_or((PackagingId::None, Signal::Fallback));
        decisions.record(Dimension::Packaging, packaging.1);

        let cicd = evidence
            .path_value(signals::CICD_PATHS)
            .and_then(|v| match v {
                DimensionValue::Cicd(c) => Some(c),
                _ => None,
            })
            .map(|c| (c, Signal::PathConvention))
            .unwrap_or((CicdId::None, Signal::Fallback));
        decisions.record(Dimension::Cicd, cicd.1);

        let build_tool = self.build_tool(&evidence, language, &mut decisions);

        let styling = evidence
            .dependency(signals::STYLING_DEPENDENCIES)
            .map(|s| (s, Signal::Dependency))
            .or_else(|| {
                evidence
                    .path_value(signals::STYLING_PATHS)
                    .and_then(|v| match v {
                        DimensionValue::Styling(s) => Some((s, Signal::PathConvention)),
                        _ => None,
                    })
            })
            .unwrap_or((StylingId::None, Signal::Fallback));
        decisions.record(Dimension::Styling, styling.1);

        let testing = self.testing(&evidence, language, &mut decisions);

        let stack = TechStack {
            archetype,
            language,
            runtime,
            framework,
            database: database.0,
            orm: orm.0,
            transport,
            packaging: packaging.0,
            cicd: cicd.0,
            build_tool,
            styling: styling.0,
            testing,
        };
        debug!(stack = %stack.to_partial(), "inferred stack");

        InferredStack {
            stack,
            confidence: decisions
                .signals
                .iter()
                .map(|(d, s)| (*d, s.confidence()))
                .collect(),
            signals: decisions.signals,
        }
    }

    fn language(&self, evidence: &Evidence<'_>, decisions: &mut Decisions) -> LanguageId {
        if let Some(found) = evidence.manifests.first() {
            if let Some(language) = evidence.language_for_manifest(&found.manifest) {
                decisions.record(Dimension::Language, Signal::Manifest);
                return language;
            }
        }
        if let Some(language) = evidence.dominant_extension() {
            decisions.record(Dimension::Language, Signal::Extension);
            return language;
        }
        decisions.record(Dimension::Language, Signal::Fallback);
        LanguageId::all_variants()
            .iter()
            .copied()
            .fold(LanguageId::TypeScript, |best, l| {
                let weight = |l: LanguageId| self.matrix.weight(DimensionValue::Language(l));
                if weight(l) > weight(best) {
                    l
                } else {
                    best
                }
            })
    }

    fn framework(
        &self,
        evidence: &Evidence<'_>,
        language: LanguageId,
        decisions: &mut Decisions,
    ) -> FrameworkId {
        if let Some(framework) = evidence.dependency(signals::FRAMEWORK_DEPENDENCIES) {
            decisions.record(Dimension::Framework, Signal::Dependency);
            return framework;
        }
        if let Some(DimensionValue::Framework(framework)) =
            evidence.path_value(signals::FRAMEWORK_PATHS)
        {
            decisions.record(Dimension::Framework, Signal::PathConvention);
            return framework;
        }
        decisions.record(Dimension::Framework, Signal::Fallback);
        self.matrix
            .fallback_framework(ArchetypeId::Library, language)
            .unwrap_or(FrameworkId::Stdlib)
    }

    fn archetype(
        &self,
        evidence: &Evidence<'_>,
        framework: FrameworkId,
        decisions: &mut Decisions,
    ) -> ArchetypeId {
        let framework_known = decisions.signals.get(&Dimension::Framework) != Some(&Signal::Fallback);
        if framework_known {
            if let Some(archetype) = self.matrix.archetype_of_framework(framework) {
                decisions.record(Dimension::Archetype, Signal::Derived);
                return archetype;
            }
        }
        if let Some(DimensionValue::Archetype(archetype)) = evidence.path_value(ARCHETYPE_PATHS) {
            decisions.record(Dimension::Archetype, Signal::PathConvention);
            return archetype;
        }
        decisions.record(Dimension::Archetype, Signal::Fallback);
        ArchetypeId::Backend
    }

    fn runtime(
        &self,
        evidence: &Evidence<'_>,
        language: LanguageId,
        decisions: &mut Decisions,
    ) -> RuntimeId {
        if language.is_node() {
            let runtime = if evidence.has_file_named("deno.json") || evidence.has_file_named("deno.jsonc") {
                Some(RuntimeId::Deno)
            } else if evidence.has_file_named("bun.lockb") || evidence.has_file_named("bun.lock") {
                Some(RuntimeId::Bun)
            } else {
                None
            };
            if let Some(runtime) = runtime {
                decisions.record(Dimension::Runtime, Signal::Manifest);
                return runtime;
            }
        }
        match self.matrix.runtimes_for(language).first() {
            Some(runtime) => {
                decisions.record(Dimension::Runtime, Signal::Derived);
                *runtime
            }
            None => {
                decisions.record(Dimension::Runtime, Signal::Fallback);
                RuntimeId::Node
            }
        }
    }

    fn transport(
        &self,
        evidence: &Evidence<'_>,
        archetype: ArchetypeId,
        decisions: &mut Decisions,
    ) -> TransportId {
        if let Some(transport) = evidence.dependency(signals::TRANSPORT_DEPENDENCIES) {
            decisions.record(Dimension::Transport, Signal::Dependency);
            return transport;
        }
        if let Some(DimensionValue::Transport(transport)) =
            evidence.path_value(signals::TRANSPORT_PATHS)
        {
            decisions.record(Dimension::Transport, Signal::PathConvention);
            return transport;
        }
        if matches!(archetype, ArchetypeId::Backend | ArchetypeId::Fullstack) {
            decisions.record(Dimension::Transport, Signal::Derived);
            return TransportId::Rest;
        }
        decisions.record(Dimension::Transport, Signal::Fallback);
        TransportId::None
    }

    fn build_tool(
        &self,
        evidence: &Evidence<'_>,
        language: LanguageId,
        decisions: &mut Decisions,
    ) -> BuildToolId {
        if let Some(DimensionValue::BuildTool(tool)) =
            evidence.path_value(signals::BUILD_TOOL_PATHS)
        {
            decisions.record(Dimension::BuildTool, Signal::Manifest);
            return tool;
        }
        if let Some(tool) = evidence
            .manifests
            .first()
            .and_then(|found| signals::build_tool_for_manifest(found.manifest.kind))
        {
            decisions.record(Dimension::BuildTool, Signal::Manifest);
            return tool;
        }
        match self.matrix.build_tools_for(language).first() {
            Some(tool) => {
                decisions.record(Dimension::BuildTool, Signal::Derived);
                *tool
            }
            None => {
                decisions.record(Dimension::BuildTool, Signal::Fallback);
                BuildToolId::Npm
            }
        }
    }

    fn testing(
        &self,
        evidence: &Evidence<'_>,
        language: LanguageId,
        decisions: &mut Decisions,
    ) -> TestingId {
        if let Some(testing) = evidence.dependency(signals::TESTING_DEPENDENCIES) {
            decisions.record(Dimension::Testing, Signal::Dependency);
            return testing;
        }
        if let Some(DimensionValue::Testing(testing)) =
            evidence.path_value(signals::TESTING_PATHS)
        {
            decisions.record(Dimension::Testing, Signal::PathConvention);
            return testing;
        }
        match self.matrix.testing_for(language).first() {
            Some(testing) => {
                decisions.record(Dimension::Testing, Signal::Derived);
                *testing
            }
            None => {
                decisions.record(Dimension::Testing, Signal::Fallback);
                TestingId::Jest
            }
        }
    }
}

impl Default for StackInferrer {
    fn default() -> Self {
        Self::new(Arc::new(UniversalMatrix::standard()))
    }
}

const ARCHETYPE_PATHS: &[PathConvention] = &[
    PathConvention {
        value: DimensionValue::Archetype(ArchetypeId::Cli),
        path: PathMatch::Prefix("cmd/"),
        marker: None,
    },
    PathConvention {
        value: DimensionValue::Archetype(ArchetypeId::Cli),
        path: PathMatch::Exact("src/main.rs"),
        marker: None,
    },
    PathConvention {
        value: DimensionValue::Archetype(ArchetypeId::Library),
        path: PathMatch::Exact("src/lib.rs"),
        marker: None,
    },
    PathConvention {
        value: DimensionValue::Archetype(ArchetypeId::Frontend),
        path: PathMatch::Exact("index.html"),
        marker: None,
    },
];

#[derive(Default)]
struct Decisions {
    signals: BTreeMap<Dimension, Signal>,
}

impl Decisions {
    fn record(&mut self, dimension: Dimension, signal: Signal) {
        self.signals.insert(dimension, signal);
    }
}

/// A manifest found in the file set.
///
/// `raw` holds the original text when parsing failed. The manifest is then
/// empty but still counts as present.
struct FoundManifest<'a> {
    path: &'a str,
    manifest: ParsedManifest,
    raw: Option<&'a str>,
}

impl FoundManifest<'_> {
    fn matches(&self, pattern: &DependencyPattern) -> bool {
        pattern.matches(&self.manifest) || self.raw.is_some_and(|raw| pattern.matches_text(raw))
    }
}

/// Manifests sorted shallowest and highest-priority first.
struct Evidence<'a> {
    files: &'a ProjectFiles,
    manifests: Vec<FoundManifest<'a>>,
}

impl<'a> Evidence<'a> {
    fn collect(files: &'a ProjectFiles) -> Self {
        let mut manifests: Vec<FoundManifest<'a>> = files
            .iter()
            .filter_map(|(path, content)| {
                let kind = ManifestKind::from_path(path)?;
                let found = match parse_manifest(kind, content) {
                    Ok(manifest) => FoundManifest {
                        path: path.as_str(),
                        manifest,
                        raw: None,
                    },
                    Err(err) => {
                        debug!(path = %path, error = %err, "manifest unparsable, matching raw text");
                        FoundManifest {
                            path: path.as_str(),
                            manifest: ParsedManifest::empty(kind),
                            raw: Some(content.as_str()),
                        }
                    }
                };
                Some(found)
            })
            .collect();
        manifests.sort_by_key(|found| {
            let depth = found.path.matches('/').count();
            let rank = ManifestKind::PRIORITY
                .iter()
                .position(|k| *k == found.manifest.kind)
                .unwrap_or(ManifestKind::PRIORITY.len());
            (depth, rank)
        });
        Self { files, manifests }
    }

    fn dependency<T: Copy>(&self, table: &[(T, &[DependencyPattern])]) -> Option<T> {
        table.iter().find_map(|(value, patterns)| {
            let hit = self
                .manifests
                .iter()
                .any(|found| patterns.iter().any(|p| found.matches(p)));
            hit.then_some(*value)
        })
    }

    fn path_value(&self, table: &[PathConvention]) -> Option<DimensionValue> {
        table.iter().find_map(|convention| {
            let hit = self.files.iter().any(|(path, content)| {
                convention.path.matches(path)
                    && convention.marker.map_or(true, |m| content.contains(m))
            });
            hit.then_some(convention.value)
        })
    }

    fn marker<T: Copy>(&self, table: &[(T, &str)]) -> Option<T> {
        table
            .iter()
            .find(|(_, needle)| self.files.values().any(|content| content.contains(needle)))
            .map(|(value, _)| *value)
    }

    fn has_file_named(&self, name: &str) -> bool {
        self.files
            .keys()
            .any(|path| path.rsplit('/').next() == Some(name))
    }

    fn count_extension(&self, language: LanguageId) -> usize {
        self.files
            .keys()
            .filter(|path| {
                path.rsplit_once('.')
                    .map_or(false, |(_, ext)| language.extensions().contains(&ext))
            })
            .count()
    }

    fn dominant_extension(&self) -> Option<LanguageId> {
        let mut best: Option<(LanguageId, usize)> = None;
        for language in LanguageId::all_variants() {
            let count = self.count_extension(*language);
            if count > 0 && best.map_or(true, |(_, n)| count > n) {
                best = Some((*language, count));
            }
        }
        best.map(|(language, _)| language)
    }

    fn language_for_manifest(&self, manifest: &ParsedManifest) -> Option<LanguageId> {
        let language = match manifest.kind {
            ManifestKind::PackageJson | ManifestKind::DenoJson => {
                let typed = self.has_file_named("tsconfig.json")
                    || manifest.has_dependency("typescript")
                    || self.count_extension(LanguageId::TypeScript) > 0;
                if typed {
                    LanguageId::TypeScript
                } else {
                    LanguageId::JavaScript
                }
            }
            ManifestKind::PomXml | ManifestKind::Gradle => {
                let java = self.count_extension(LanguageId::Java);
                let kotlin = self
                    .count_extension(LanguageId::Kotlin)
                    .saturating_sub(self.gradle_scripts());
                if kotlin > java || (java == 0 && manifest.has_dependency_prefix("org.jetbrains.kotlin")) {
                    LanguageId::Kotlin
                } else {
                    LanguageId::Java
                }
            }
            ManifestKind::CargoToml => LanguageId::Rust,
            ManifestKind::PyProject | ManifestKind::Requirements => LanguageId::Python,
            ManifestKind::GoMod => LanguageId::Go,
            ManifestKind::Csproj => LanguageId::CSharp,
            ManifestKind::Gemfile => LanguageId::Ruby,
            ManifestKind::ComposerJson => LanguageId::Php,
            ManifestKind::MixExs => LanguageId::Elixir,
            ManifestKind::PackageSwift => LanguageId::Swift,
            ManifestKind::Pubspec => LanguageId::Dart,
            ManifestKind::CMakeLists | ManifestKind::MesonBuild => LanguageId::Cpp,
            ManifestKind::Unknown => return None,
        };
        Some(language)
    }

    /// `.kts` build scripts count as Kotlin files but say nothing about the
    /// project's source language.
    fn gradle_scripts(&self) -> usize {
        self.files.keys().filter(|p| p.ends_with(".gradle.kts")).count()
    }
}
