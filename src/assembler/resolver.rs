//! Seed-driven stack resolution.

use crate::constraints::ConstraintSolver;
use crate::error::{Result, UpgError};
use crate::rng::SeededRng;
use crate::stack::{Dimension, DimensionValue, PartialStack, TechStack};
use tracing::debug;

/// A resolved stack plus the audit trail of how each dimension was decided.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub stack: TechStack,
    pub constraints_applied: Vec<String>,
}

pub struct StackResolver<'a> {
    solver: &'a ConstraintSolver,
}

impl<'a> StackResolver<'a> {
    pub fn new(solver: &'a ConstraintSolver) -> Self {
        Self { solver }
    }

    /// Resolves every dimension not fixed by `overrides`, in
    /// [`Dimension::RESOLUTION_ORDER`].
    ///
    /// Forced values skip the draw. A default proposal is taken without
    /// drawing when it is among the valid options. Archetypes without a
    /// natural framework take the matrix fallback. Everything else is a
    /// weighted draw over the valid options.
    pub fn resolve(
        &self,
        seed: u64,
        overrides: &PartialStack,
        rng: &mut SeededRng,
    ) -> Result<Resolution> {
        let forced = self.solver.validate(overrides);
        if !forced.valid {
            let reason = forced.first_reason().unwrap_or_default().to_string();
            return Err(UpgError::Validation {
                seed,
                stack: *overrides,
                violations: forced.violations,
                reason,
            });
        }

        let mut partial = *overrides;
        let mut applied: Vec<String> = overrides
            .values()
            .iter()
            .map(|v| format!("forced:{}", v.dimension()))
            .collect();

        for dimension in Dimension::RESOLUTION_ORDER {
            if partial.is_set(dimension) {
                continue;
            }
            let value = self.resolve_dimension(seed, dimension, &partial, rng, &mut applied)?;
            debug!(seed, dimension = %dimension, value = %value, "resolved dimension");
            partial.set(value);
        }

        let stack = partial.complete().ok_or_else(|| UpgError::EmptySelection {
            seed,
            dimension: partial
                .missing()
                .first()
                .copied()
                .unwrap_or(Dimension::Archetype),
            stack: partial,
            reason: "resolution left a dimension unset".to_string(),
        })?;

        let result = self.solver.validate(&partial);
        if !result.valid {
            let reason = result.first_reason().unwrap_or_default().to_string();
            return Err(UpgError::Validation {
                seed,
                stack: partial,
                violations: result.violations,
                reason,
            });
        }

        Ok(Resolution {
            stack,
            constraints_applied: applied,
        })
    }

    fn resolve_dimension(
        &self,
        seed: u64,
        dimension: Dimension,
        partial: &PartialStack,
        rng: &mut SeededRng,
        applied: &mut Vec<String>,
    ) -> Result<DimensionValue> {
        let matrix = self.solver.matrix();
        let options = self.solver.valid_options(dimension, partial);
        if options.is_empty() {
            return Err(self.empty_selection(seed, dimension, partial));
        }

        if dimension == Dimension::Framework {
            if let (Some(archetype), Some(language)) = (partial.archetype, partial.language) {
                if !archetype.has_natural_framework() {
                    if let Some(fallback) = matrix.fallback_framework(archetype, language) {
                        let value = DimensionValue::Framework(fallback);
                        if options.contains(&value) {
                            applied.push(format!("fallback:{value}"));
                            return Ok(value);
                        }
                    }
                }
            }
        }

        if let Some(proposal) = self.solver.apply_defaults(partial).get(dimension) {
            if options.contains(&proposal) {
                applied.push(format!("default:{proposal}"));
                return Ok(proposal);
            }
        }

        let weighted: Vec<(DimensionValue, f64)> = options
            .iter()
            .map(|v| (*v, matrix.weight(*v)))
            .collect();
        rng.pick_weighted(&weighted)
            .copied()
            .map_err(|err| UpgError::EmptySelection {
                seed,
                dimension,
                stack: *partial,
                reason: err.to_string(),
            })
    }

    fn empty_selection(
        &self,
        seed: u64,
        dimension: Dimension,
        partial: &PartialStack,
    ) -> UpgError {
        let candidates = self.solver.matrix().candidates(dimension, partial);
        let reason = candidates
            .iter()
            .find_map(|c| self.solver.explain(partial, *c))
            .map(|v| v.reason)
            .unwrap_or_else(|| format!("the matrix offers no {dimension} candidates"));
        UpgError::EmptySelection {
            seed,
            dimension,
            stack: *partial,
            reason,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stack::{
        ArchetypeId, FrameworkId, LanguageId, OrmId, UniversalMatrix,
    };
    use std::sync::Arc;

    fn solver() -> ConstraintSolver {
        ConstraintSolver::new(Arc::new(UniversalMatrix::standard()))
    }

    #[test]
    fn test_resolution_is_deterministic() {
        let solver = solver();
        let resolver = StackResolver::new(&solver);
        let a = resolver
            .resolve(4242, &PartialStack::new(), &mut SeededRng::new(4242))
            .unwrap();
        let b = resolver
            .resolve(4242, &PartialStack::new(), &mut SeededRng::new(4242))
            .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_every_resolved_stack_is_valid() {
        let solver = solver();
        let resolver = StackResolver::new(&solver);
        for seed in 0..300 {
            let resolution = resolver
                .resolve(seed, &PartialStack::new(), &mut SeededRng::new(seed))
                .unwrap();
            let result = solver.validate(&resolution.stack.to_partial());
            assert!(result.valid, "seed {seed}: {:?}", result.violations);
        }
    }

    #[test]
    fn test_forced_values_are_kept_and_recorded() {
        let solver = solver();
        let resolver = StackResolver::new(&solver);
        let overrides = PartialStack::from_values([
            DimensionValue::Archetype(ArchetypeId::Backend),
            DimensionValue::Language(LanguageId::Rust),
        ]);
        let resolution = resolver
            .resolve(82910, &overrides, &mut SeededRng::new(82910))
            .unwrap();
        assert_eq!(resolution.stack.language, LanguageId::Rust);
        assert!(matches!(
            resolution.stack.framework,
            FrameworkId::Axum | FrameworkId::Actix
        ));
        assert_eq!(
            &resolution.constraints_applied[..2],
            &["forced:archetype".to_string(), "forced:language".to_string()]
        );
    }

    #[test]
    fn test_invalid_override_fails_up_front() {
        let solver = solver();
        let resolver = StackResolver::new(&solver);
        let overrides = PartialStack::from_values([
            DimensionValue::Language(LanguageId::Go),
            DimensionValue::Orm(OrmId::Prisma),
        ]);
        let err = resolver
            .resolve(1, &overrides, &mut SeededRng::new(1))
            .unwrap_err();
        assert!(matches!(err, UpgError::Validation { .. }));
        assert_eq!(err.violations().len(), 1);
        assert_eq!(err.seed(), 1);
    }

    #[test]
    fn test_library_falls_back_to_stdlib() {
        let solver = solver();
        let resolver = StackResolver::new(&solver);
        let overrides = PartialStack::from_values([
            DimensionValue::Archetype(ArchetypeId::Library),
            DimensionValue::Language(LanguageId::Go),
        ]);
        let resolution = resolver
            .resolve(5, &overrides, &mut SeededRng::new(5))
            .unwrap();
        assert_eq!(resolution.stack.framework, FrameworkId::Stdlib);
        assert!(resolution
            .constraints_applied
            .contains(&"fallback:framework=stdlib".to_string()));
    }
}
