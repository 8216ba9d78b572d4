//! Full and partial stack assignments.

use super::{
    ArchetypeId, BuildToolId, CicdId, DatabaseId, Dimension, DimensionValue, FrameworkId,
    LanguageId, OrmId, PackagingId, RuntimeId, StylingId, TestingId, TransportId,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One concrete assignment across all twelve dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TechStack {
    pub archetype: ArchetypeId,
    pub language: LanguageId,
    pub runtime: RuntimeId,
    pub framework: FrameworkId,
    pub database: DatabaseId,
    pub orm: OrmId,
    pub transport: TransportId,
    pub packaging: PackagingId,
    pub cicd: CicdId,
    pub build_tool: BuildToolId,
    pub styling: StylingId,
    pub testing: TestingId,
}

impl TechStack {
    pub fn get(&self, dimension: Dimension) -> DimensionValue {
        match dimension {
            Dimension::Archetype => DimensionValue::Archetype(self.archetype),
            Dimension::Language => DimensionValue::Language(self.language),
            Dimension::Runtime => DimensionValue::Runtime(self.runtime),
            Dimension::Framework => DimensionValue::Framework(self.framework),
            Dimension::Database => DimensionValue::Database(self.database),
            Dimension::Orm => DimensionValue::Orm(self.orm),
            Dimension::Transport => DimensionValue::Transport(self.transport),
            Dimension::Packaging => DimensionValue::Packaging(self.packaging),
            Dimension::Cicd => DimensionValue::Cicd(self.cicd),
            Dimension::BuildTool => DimensionValue::BuildTool(self.build_tool),
            Dimension::Styling => DimensionValue::Styling(self.styling),
            Dimension::Testing => DimensionValue::Testing(self.testing),
        }
    }

    pub fn has(&self, value: DimensionValue) -> bool {
        self.get(value.dimension()) == value
    }

    pub fn to_partial(&self) -> PartialStack {
        PartialStack::from(self)
    }
}

impl fmt::Display for TechStack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.to_partial(), f)
    }
}

/// A stack with any subset of dimensions assigned.
///
/// Used for caller overrides, for the assembler's in-progress state and as
/// the input to constraint validation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PartialStack {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub archetype: Option<ArchetypeId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<LanguageId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub runtime: Option<RuntimeId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub framework: Option<FrameworkId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<DatabaseId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub orm: Option<OrmId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transport: Option<TransportId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub packaging: Option<PackagingId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cicd: Option<CicdId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub build_tool: Option<BuildToolId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub styling: Option<StylingId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub testing: Option<TestingId>,
}

impl PartialStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_values(values: impl IntoIterator<Item = DimensionValue>) -> Self {
        let mut stack = Self::new();
        for value in values {
            stack.set(value);
        }
        stack
    }

    pub fn get(&self, dimension: Dimension) -> Option<DimensionValue> {
        match dimension {
            Dimension::Archetype => self.archetype.map(DimensionValue::Archetype),
            Dimension::Language => self.language.map(DimensionValue::Language),
            Dimension::Runtime => self.runtime.map(DimensionValue::Runtime),
            Dimension::Framework => self.framework.map(DimensionValue::Framework),
            Dimension::Database => self.database.map(DimensionValue::Database),
            Dimension::Orm => self.orm.map(DimensionValue::Orm),
            Dimension::Transport => self.transport.map(DimensionValue::Transport),
            Dimension::Packaging => self.packaging.map(DimensionValue::Packaging),
            Dimension::Cicd => self.cicd.map(DimensionValue::Cicd),
            Dimension::BuildTool => self.build_tool.map(DimensionValue::BuildTool),
            Dimension::Styling => self.styling.map(DimensionValue::Styling),
            Dimension::Testing => self.testing.map(DimensionValue::Testing),
        }
    }

    pub fn set(&mut self, value: DimensionValue) {
        match value {
            DimensionValue::Archetype(v) => self.archetype = Some(v),
            DimensionValue::Language(v) => self.language = Some(v),
            DimensionValue::Runtime(v) => self.runtime = Some(v),
            DimensionValue::Framework(v) => self.framework = Some(v),
            DimensionValue::Database(v) => self.database = Some(v),
            DimensionValue::Orm(v) => self.orm = Some(v),
            DimensionValue::Transport(v) => self.transport = Some(v),
            DimensionValue::Packaging(v) => self.packaging = Some(v),
            DimensionValue::Cicd(v) => self.cicd = Some(v),
            DimensionValue::BuildTool(v) => self.build_tool = Some(v),
            DimensionValue::Styling(v) => self.styling = Some(v),
            DimensionValue::Testing(v) => self.testing = Some(v),
        }
    }

    pub fn clear(&mut self, dimension: Dimension) {
        match dimension {
            Dimension::Archetype => self.archetype = None,
            Dimension::Language => self.language = None,
            Dimension::Runtime => self.runtime = None,
            Dimension::Framework => self.framework = None,
            Dimension::Database => self.database = None,
            Dimension::Orm => self.orm = None,
            Dimension::Transport => self.transport = None,
            Dimension::Packaging => self.packaging = None,
            Dimension::Cicd => self.cicd = None,
            Dimension::BuildTool => self.build_tool = None,
            Dimension::Styling => self.styling = None,
            Dimension::Testing => self.testing = None,
        }
    }

    /// Returns a copy with `value` assigned, replacing whatever was there.
    pub fn with(&self, value: DimensionValue) -> Self {
        let mut next = *self;
        next.set(value);
        next
    }

    pub fn is_set(&self, dimension: Dimension) -> bool {
        self.get(dimension).is_some()
    }

    pub fn has(&self, value: DimensionValue) -> bool {
        self.get(value.dimension()) == Some(value)
    }

    pub fn is_empty(&self) -> bool {
        self.values().is_empty()
    }

    /// Assigned values in resolution order.
    pub fn values(&self) -> Vec<DimensionValue> {
        Dimension::RESOLUTION_ORDER
            .iter()
            .filter_map(|d| self.get(*d))
            .collect()
    }

    /// Overlays every assigned value of `other` onto a copy of `self`.
    pub fn overlay(&self, other: &PartialStack) -> Self {
        let mut merged = *self;
        for value in other.values() {
            merged.set(value);
        }
        merged
    }

    /// Converts into a full stack when every dimension is assigned.
    pub fn complete(&self) -> Option<TechStack> {
        Some(TechStack {
            archetype: self.archetype?,
            language: self.language?,
            runtime: self.runtime?,
            framework: self.framework?,
            database: self.database?,
            orm: self.orm?,
            transport: self.transport?,
            packaging: self.packaging?,
            cicd: self.cicd?,
            build_tool: self.build_tool?,
            styling: self.styling?,
            testing: self.testing?,
        })
    }

    pub fn missing(&self) -> Vec<Dimension> {
        Dimension::RESOLUTION_ORDER
            .iter()
            .copied()
            .filter(|d| !self.is_set(*d))
            .collect()
    }
}

impl From<&TechStack> for PartialStack {
    fn from(stack: &TechStack) -> Self {
        PartialStack::from_values(
            Dimension::RESOLUTION_ORDER
                .iter()
                .map(|d| stack.get(*d)),
        )
    }
}

impl From<TechStack> for PartialStack {
    fn from(stack: TechStack) -> Self {
        PartialStack::from(&stack)
    }
}

impl fmt::Display for PartialStack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let values = self.values();
        if values.is_empty() {
            return f.write_str("{}");
        }
        let rendered: Vec<String> = values.iter().map(|v| v.to_string()).collect();
        write!(f, "{{{}}}", rendered.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_stack() -> TechStack {
        TechStack {
            archetype: ArchetypeId::Backend,
            language: LanguageId::Rust,
            runtime: RuntimeId::Native,
            framework: FrameworkId::Axum,
            database: DatabaseId::Postgres,
            orm: OrmId::Sqlx,
            transport: TransportId::Rest,
            packaging: PackagingId::Docker,
            cicd: CicdId::GithubActions,
            build_tool: BuildToolId::Cargo,
            styling: StylingId::None,
            testing: TestingId::CargoTest,
        }
    }

    #[test]
    fn test_partial_round_trip_to_complete() {
        let stack = sample_stack();
        let partial = stack.to_partial();
        assert!(partial.missing().is_empty());
        assert_eq!(partial.complete(), Some(stack));
    }

    #[test]
    fn test_incomplete_partial_has_no_complete_form() {
        let partial = PartialStack::new().with(DimensionValue::Language(LanguageId::Go));
        assert!(partial.complete().is_none());
        assert_eq!(partial.missing().len(), 11);
    }

    #[test]
    fn test_overlay_prefers_other() {
        let base = PartialStack::from_values([
            DimensionValue::Language(LanguageId::Go),
            DimensionValue::Database(DatabaseId::Sqlite),
        ]);
        let top = PartialStack::new().with(DimensionValue::Language(LanguageId::Rust));
        let merged = base.overlay(&top);
        assert_eq!(merged.language, Some(LanguageId::Rust));
        assert_eq!(merged.database, Some(DatabaseId::Sqlite));
    }

    #[test]
    fn test_partial_serializes_only_set_fields() {
        let partial = PartialStack::from_values([
            DimensionValue::Framework(FrameworkId::Django),
            DimensionValue::BuildTool(BuildToolId::Poetry),
        ]);
        let json = serde_json::to_string(&partial).unwrap();
        assert_eq!(json, r#"{"framework":"django","buildTool":"poetry"}"#);

        let parsed: PartialStack = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, partial);
    }

    #[test]
    fn test_display() {
        let partial = PartialStack::from_values([
            DimensionValue::Language(LanguageId::Go),
            DimensionValue::Orm(OrmId::Prisma),
        ]);
        assert_eq!(partial.to_string(), "{language=go, orm=prisma}");
        assert_eq!(PartialStack::new().to_string(), "{}");
    }

    #[test]
    fn test_full_stack_serializes_camel_case() {
        let json = serde_json::to_value(sample_stack()).unwrap();
        assert_eq!(json["buildTool"], "cargo");
        assert_eq!(json["database"], "postgresql");
    }
}
