use super::defaults::DefaultPairings;
use super::rules::{standard_checks, RuleSet, StructuralCheck};
use super::violation::{ValidationResult, Violation};
use crate::stack::{Dimension, DimensionValue, PartialStack, UniversalMatrix};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::trace;

/// Validates partial stacks and filters candidate values.
///
/// Evaluation order is fixed: incompatibility rules, requirement rules, then
/// the structural checks (archetype/language, language/runtime,
/// framework/language, ORM support). Each conflicting dimension pair is
/// reported once, by the first check that caught it.
pub struct ConstraintSolver {
    matrix: Arc<UniversalMatrix>,
    rules: RuleSet,
    checks: Vec<Box<dyn StructuralCheck>>,
    defaults: DefaultPairings,
}

impl ConstraintSolver {
    pub fn new(matrix: Arc<UniversalMatrix>) -> Self {
        let rules = RuleSet::standard(&matrix);
        Self::with_rules(matrix, rules, DefaultPairings::standard())
    }

    pub fn with_rules(
        matrix: Arc<UniversalMatrix>,
        rules: RuleSet,
        defaults: DefaultPairings,
    ) -> Self {
        Self {
            matrix,
            rules,
            checks: standard_checks(),
            defaults,
        }
    }

    pub fn matrix(&self) -> &UniversalMatrix {
        &self.matrix
    }

    pub fn shared_matrix(&self) -> Arc<UniversalMatrix> {
        Arc::clone(&self.matrix)
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn validate(&self, stack: &PartialStack) -> ValidationResult {
        let mut raw = Vec::new();

        for rule in &self.rules.incompatibilities {
            rule.check(stack, &mut raw);
        }
        for rule in &self.rules.requirements {
            rule.check(stack, &self.matrix, &mut raw);
        }
        for check in &self.checks {
            let before = raw.len();
            check.check(stack, &self.matrix, &mut raw);
            if raw.len() > before {
                trace!(check = check.name(), stack = %stack, "structural check failed");
            }
        }

        ValidationResult::from_violations(dedupe(raw))
    }

    /// Candidates of `dimension` that keep `partial` valid when assigned.
    pub fn get_valid_options(
        &self,
        dimension: Dimension,
        partial: &PartialStack,
        candidates: &[DimensionValue],
    ) -> Vec<DimensionValue> {
        candidates
            .iter()
            .copied()
            .filter(|c| c.dimension() == dimension)
            .filter(|c| self.validate(&partial.with(*c)).valid)
            .collect()
    }

    /// [`get_valid_options`](Self::get_valid_options) over the matrix's own
    /// candidate list.
    pub fn valid_options(&self, dimension: Dimension, partial: &PartialStack) -> Vec<DimensionValue> {
        let candidates = self.matrix.candidates(dimension, partial);
        self.get_valid_options(dimension, partial, &candidates)
    }

    /// First violation produced by assigning `value` to `partial`, if any.
    pub fn explain(&self, partial: &PartialStack, value: DimensionValue) -> Option<Violation> {
        self.validate(&partial.with(value)).violations.into_iter().next()
    }

    pub fn apply_defaults(&self, partial: &PartialStack) -> PartialStack {
        self.defaults.apply(partial)
    }
}

fn dedupe(violations: Vec<Violation>) -> Vec<Violation> {
    let mut seen = HashSet::new();
    violations
        .into_iter()
        .filter(|v| seen.insert(v.pair_key()))
        .collect()
}
