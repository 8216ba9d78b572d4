//! The twelve stack dimensions and a tagged value type spanning all of them.
//!
//! Rule tables address values through [`DimensionValue`] so that a single rule
//! can mention any dimension without a nested match per dimension.

use super::{
    ArchetypeId, BuildToolId, CicdId, DatabaseId, FrameworkId, LanguageId, OrmId, PackagingId,
    RuntimeId, StylingId, TestingId, TransportId,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One axis of the Universal Matrix, in resolution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Dimension {
    Archetype,
    Language,
    Runtime,
    Framework,
    Database,
    Orm,
    Transport,
    Packaging,
    Cicd,
    BuildTool,
    Styling,
    Testing,
}

impl Dimension {
    /// Resolution order used by the assembler. Earlier picks constrain later ones.
    pub const RESOLUTION_ORDER: [Dimension; 12] = [
        Dimension::Archetype,
        Dimension::Language,
        Dimension::Runtime,
        Dimension::Framework,
        Dimension::Database,
        Dimension::Orm,
        Dimension::Transport,
        Dimension::Packaging,
        Dimension::Cicd,
        Dimension::BuildTool,
        Dimension::Styling,
        Dimension::Testing,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Dimension::Archetype => "archetype",
            Dimension::Language => "language",
            Dimension::Runtime => "runtime",
            Dimension::Framework => "framework",
            Dimension::Database => "database",
            Dimension::Orm => "orm",
            Dimension::Transport => "transport",
            Dimension::Packaging => "packaging",
            Dimension::Cicd => "cicd",
            Dimension::BuildTool => "buildTool",
            Dimension::Styling => "styling",
            Dimension::Testing => "testing",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        let lowered = name.trim().to_lowercase();
        Self::RESOLUTION_ORDER
            .iter()
            .copied()
            .find(|d| d.as_str().to_lowercase() == lowered)
            .or(match lowered.as_str() {
                "build-tool" | "build_tool" => Some(Dimension::BuildTool),
                "ci" | "ci-cd" => Some(Dimension::Cicd),
                _ => None,
            })
    }

    /// Every value this dimension can take.
    pub fn values(&self) -> Vec<DimensionValue> {
        match self {
            Dimension::Archetype => map_all(ArchetypeId::all_variants(), DimensionValue::Archetype),
            Dimension::Language => map_all(LanguageId::all_variants(), DimensionValue::Language),
            Dimension::Runtime => map_all(RuntimeId::all_variants(), DimensionValue::Runtime),
            Dimension::Framework => map_all(FrameworkId::all_variants(), DimensionValue::Framework),
            Dimension::Database => map_all(DatabaseId::all_variants(), DimensionValue::Database),
            Dimension::Orm => map_all(OrmId::all_variants(), DimensionValue::Orm),
            Dimension::Transport => map_all(TransportId::all_variants(), DimensionValue::Transport),
            Dimension::Packaging => map_all(PackagingId::all_variants(), DimensionValue::Packaging),
            Dimension::Cicd => map_all(CicdId::all_variants(), DimensionValue::Cicd),
            Dimension::BuildTool => map_all(BuildToolId::all_variants(), DimensionValue::BuildTool),
            Dimension::Styling => map_all(StylingId::all_variants(), DimensionValue::Styling),
            Dimension::Testing => map_all(TestingId::all_variants(), DimensionValue::Testing),
        }
    }

    /// Parses a wire name or alias into a value of this dimension.
    pub fn parse_value(&self, name: &str) -> Option<DimensionValue> {
        Some(match self {
            Dimension::Archetype => DimensionValue::Archetype(ArchetypeId::from_name(name)?),
            Dimension::Language => DimensionValue::Language(LanguageId::from_name(name)?),
            Dimension::Runtime => DimensionValue::Runtime(RuntimeId::from_name(name)?),
            Dimension::Framework => DimensionValue::Framework(FrameworkId::from_name(name)?),
            Dimension::Database => DimensionValue::Database(DatabaseId::from_name(name)?),
            Dimension::Orm => DimensionValue::Orm(OrmId::from_name(name)?),
            Dimension::Transport => DimensionValue::Transport(TransportId::from_name(name)?),
            Dimension::Packaging => DimensionValue::Packaging(PackagingId::from_name(name)?),
            Dimension::Cicd => DimensionValue::Cicd(CicdId::from_name(name)?),
            Dimension::BuildTool => DimensionValue::BuildTool(BuildToolId::from_name(name)?),
            Dimension::Styling => DimensionValue::Styling(StylingId::from_name(name)?),
            Dimension::Testing => DimensionValue::Testing(TestingId::from_name(name)?),
        })
    }
}

fn map_all<T: Copy>(values: &[T], wrap: fn(T) -> DimensionValue) -> Vec<DimensionValue> {
    values.iter().copied().map(wrap).collect()
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A concrete value on one dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DimensionValue {
    Archetype(ArchetypeId),
    Language(LanguageId),
    Runtime(RuntimeId),
    Framework(FrameworkId),
    Database(DatabaseId),
    Orm(OrmId),
    Transport(TransportId),
    Packaging(PackagingId),
    Cicd(CicdId),
    BuildTool(BuildToolId),
    Styling(StylingId),
    Testing(TestingId),
}

impl DimensionValue {
    pub fn dimension(&self) -> Dimension {
        match self {
            DimensionValue::Archetype(_) => Dimension::Archetype,
            DimensionValue::Language(_) => Dimension::Language,
            DimensionValue::Runtime(_) => Dimension::Runtime,
            DimensionValue::Framework(_) => Dimension::Framework,
            DimensionValue::Database(_) => Dimension::Database,
            DimensionValue::Orm(_) => Dimension::Orm,
            DimensionValue::Transport(_) => Dimension::Transport,
            DimensionValue::Packaging(_) => Dimension::Packaging,
            DimensionValue::Cicd(_) => Dimension::Cicd,
            DimensionValue::BuildTool(_) => Dimension::BuildTool,
            DimensionValue::Styling(_) => Dimension::Styling,
            DimensionValue::Testing(_) => Dimension::Testing,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DimensionValue::Archetype(v) => v.as_str(),
            DimensionValue::Language(v) => v.as_str(),
            DimensionValue::Runtime(v) => v.as_str(),
            DimensionValue::Framework(v) => v.as_str(),
            DimensionValue::Database(v) => v.as_str(),
            DimensionValue::Orm(v) => v.as_str(),
            DimensionValue::Transport(v) => v.as_str(),
            DimensionValue::Packaging(v) => v.as_str(),
            DimensionValue::Cicd(v) => v.as_str(),
            DimensionValue::BuildTool(v) => v.as_str(),
            DimensionValue::Styling(v) => v.as_str(),
            DimensionValue::Testing(v) => v.as_str(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            DimensionValue::Archetype(v) => v.name(),
            DimensionValue::Language(v) => v.name(),
            DimensionValue::Runtime(v) => v.name(),
            DimensionValue::Framework(v) => v.name(),
            DimensionValue::Database(v) => v.name(),
            DimensionValue::Orm(v) => v.name(),
            DimensionValue::Transport(v) => v.name(),
            DimensionValue::Packaging(v) => v.name(),
            DimensionValue::Cicd(v) => v.name(),
            DimensionValue::BuildTool(v) => v.name(),
            DimensionValue::Styling(v) => v.name(),
            DimensionValue::Testing(v) => v.name(),
        }
    }
}

impl fmt::Display for DimensionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.dimension(), self.as_str())
    }
}

impl Serialize for DimensionValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolution_order_covers_every_dimension() {
        let mut dims = Dimension::RESOLUTION_ORDER.to_vec();
        dims.sort();
        dims.dedup();
        assert_eq!(dims.len(), 12);
        assert_eq!(Dimension::RESOLUTION_ORDER[0], Dimension::Archetype);
        assert_eq!(Dimension::RESOLUTION_ORDER[11], Dimension::Testing);
    }

    #[test]
    fn test_values_are_tagged_with_their_dimension() {
        for dim in Dimension::RESOLUTION_ORDER {
            let values = dim.values();
            assert!(!values.is_empty());
            assert!(values.iter().all(|v| v.dimension() == dim));
        }
    }

    #[test]
    fn test_parse_value() {
        assert_eq!(
            Dimension::Orm.parse_value("prisma"),
            Some(DimensionValue::Orm(OrmId::Prisma))
        );
        assert_eq!(Dimension::Language.parse_value("cobol"), None);
    }

    #[test]
    fn test_dimension_from_name() {
        assert_eq!(Dimension::from_name("buildTool"), Some(Dimension::BuildTool));
        assert_eq!(Dimension::from_name("build-tool"), Some(Dimension::BuildTool));
        assert_eq!(Dimension::from_name("ORM"), Some(Dimension::Orm));
        assert_eq!(Dimension::from_name("color"), None);
    }

    #[test]
    fn test_value_display() {
        let value = DimensionValue::Framework(FrameworkId::Django);
        assert_eq!(value.to_string(), "framework=django");
        assert_eq!(value.name(), "Django");
    }
}
