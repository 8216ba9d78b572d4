use crate::constraints::Violation;
use crate::stack::{Dimension, PartialStack};
use thiserror::Error;

/// Failures surfaced by generation and enrichment.
///
/// Every variant carries the seed and the partial stack at the point of
/// failure so a sweep can log it and move on.
#[derive(Debug, Error)]
pub enum UpgError {
    #[error("seed {seed}: stack {stack} is invalid: {reason}")]
    Validation {
        seed: u64,
        stack: PartialStack,
        violations: Vec<Violation>,
        reason: String,
    },

    #[error("seed {seed}: no valid {dimension} for {stack}: {reason}")]
    EmptySelection {
        seed: u64,
        dimension: Dimension,
        stack: PartialStack,
        reason: String,
    },

    #[error("seed {seed}: strategy '{strategy_id}' failed for {stack}: {source:#}")]
    Strategy {
        seed: u64,
        strategy_id: String,
        stack: PartialStack,
        #[source]
        source: anyhow::Error,
    },

    #[error("seed {seed}: enrichment '{strategy_id}' failed for {stack}: {source:#}")]
    Enrichment {
        seed: u64,
        strategy_id: String,
        stack: PartialStack,
        #[source]
        source: anyhow::Error,
    },
}

impl UpgError {
    pub fn seed(&self) -> u64 {
        match self {
            UpgError::Validation { seed, .. }
            | UpgError::EmptySelection { seed, .. }
            | UpgError::Strategy { seed, .. }
            | UpgError::Enrichment { seed, .. } => *seed,
        }
    }

    pub fn violations(&self) -> &[Violation] {
        match self {
            UpgError::Validation { violations, .. } => violations,
            _ => &[],
        }
    }
}

pub type Result<T> = std::result::Result<T, UpgError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stack::{DimensionValue, LanguageId};

    #[test]
    fn test_display_includes_seed_and_stack() {
        let err = UpgError::EmptySelection {
            seed: 7,
            dimension: Dimension::Framework,
            stack: PartialStack::from_values([DimensionValue::Language(LanguageId::Cpp)]),
            reason: "nothing fits".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "seed 7: no valid framework for {language=cpp}: nothing fits"
        );
        assert_eq!(err.seed(), 7);
        assert!(err.violations().is_empty());
    }

    #[test]
    fn test_strategy_error_keeps_source() {
        let err = UpgError::Strategy {
            seed: 1,
            strategy_id: "rust".to_string(),
            stack: PartialStack::new(),
            source: anyhow::anyhow!("template missing"),
        };
        assert!(err.to_string().contains("template missing"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
