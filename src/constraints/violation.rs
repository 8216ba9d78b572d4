use crate::stack::{Dimension, DimensionValue};
use serde::Serialize;
use std::fmt;

/// Which family of check produced a violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ViolationKind {
    Incompatible,
    Requirement,
    ArchetypeLanguage,
    LanguageRuntime,
    FrameworkLanguage,
    OrmSupport,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Violation {
    pub kind: ViolationKind,
    /// Dimension holding the offending value.
    pub dimension: Dimension,
    pub value: DimensionValue,
    pub conflicts_with: DimensionValue,
    pub reason: String,
}

impl Violation {
    /// Unordered dimension pair used to report each conflict once.
    pub(crate) fn pair_key(&self) -> (Dimension, Dimension) {
        let a = self.value.dimension();
        let b = self.conflicts_with.dimension();
        if a <= b {
            (a, b)
        } else {
            (b, a)
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} conflicts with {}: {}", self.value, self.conflicts_with, self.reason)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub violations: Vec<Violation>,
}

impl ValidationResult {
    pub fn from_violations(violations: Vec<Violation>) -> Self {
        Self {
            valid: violations.is_empty(),
            violations,
        }
    }

    pub fn first_reason(&self) -> Option<&str> {
        self.violations.first().map(|v| v.reason.as_str())
    }
}
