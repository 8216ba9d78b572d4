//! Constraint solver and RNG integration tests

use std::sync::Arc;
use upg::constraints::ViolationKind;
use upg::stack::{
    DatabaseId, Dimension, DimensionValue as V, FrameworkId, LanguageId, OrmId, PartialStack,
    TestingId, UniversalMatrix,
};
use upg::{ConstraintSolver, SeededRng};

fn solver() -> ConstraintSolver {
    ConstraintSolver::new(Arc::new(UniversalMatrix::standard()))
}

#[test]
fn test_django_on_go_is_one_requirement_violation() {
    let result = solver().validate(&PartialStack::from_values([
        V::Framework(FrameworkId::Django),
        V::Language(LanguageId::Go),
    ]));

    assert!(!result.valid);
    assert_eq!(result.violations.len(), 1);
    assert_eq!(result.violations[0].kind, ViolationKind::Requirement);
    assert!(result.violations[0]
        .reason
        .contains("Django is a Python framework"));
}

#[test]
fn test_go_with_prisma_is_one_incompatibility() {
    let result = solver().validate(&PartialStack::from_values([
        V::Language(LanguageId::Go),
        V::Orm(OrmId::Prisma),
    ]));

    assert!(!result.valid);
    assert_eq!(result.violations.len(), 1);
    assert!(result.violations[0].reason.contains("Go ORMs"));
    assert_eq!(
        result.first_reason(),
        Some(result.violations[0].reason.as_str())
    );
}

#[test]
fn test_valid_options_respect_partial() {
    let s = solver();
    let partial = PartialStack::from_values([V::Language(LanguageId::Go)]);
    let orms = s.valid_options(Dimension::Orm, &partial);

    assert!(!orms.contains(&V::Orm(OrmId::Prisma)));
    for orm in &orms {
        assert!(s.validate(&partial.with(*orm)).valid, "{orm} should fit go");
    }
}

#[test]
fn test_defaults_never_clobber() {
    let partial = PartialStack::from_values([
        V::Framework(FrameworkId::Rails),
        V::Database(DatabaseId::Mysql),
        V::Testing(TestingId::Minitest),
    ]);
    let filled = solver().apply_defaults(&partial);

    for value in partial.values() {
        assert_eq!(filled.get(value.dimension()), Some(value));
    }
    assert!(filled.is_set(Dimension::Orm));
}

#[test]
fn test_weighted_pick_converges() {
    let items = [("rare", 1.0), ("common", 3.0)];
    let mut rng = SeededRng::new(2024);
    let draws = 20_000;
    let common = (0..draws)
        .filter(|_| *rng.pick_weighted(&items).unwrap() == "common")
        .count();

    let observed = common as f64 / draws as f64;
    assert!((observed - 0.75).abs() < 0.02, "observed {observed}");
}

#[test]
fn test_rng_reproducible_and_fork_diverges() {
    let mut a = SeededRng::new(99);
    let mut b = SeededRng::new(99);
    let seq_a: Vec<i64> = (0..16).map(|_| a.int(0, 1000)).collect();
    let seq_b: Vec<i64> = (0..16).map(|_| b.int(0, 1000)).collect();
    assert_eq!(seq_a, seq_b);

    let mut parent = SeededRng::new(99);
    let mut fork = parent.fork();
    let parent_seq: Vec<i64> = (0..16).map(|_| parent.int(0, 1000)).collect();
    let fork_seq: Vec<i64> = (0..16).map(|_| fork.int(0, 1000)).collect();
    assert_ne!(parent_seq, fork_seq);
}

#[test]
fn test_empty_pick_is_an_error() {
    let mut rng = SeededRng::new(1);
    let empty: [u8; 0] = [];
    assert!(rng.pick(&empty).is_err());
    assert!(rng.pick_weighted(&[("zero", 0.0)]).is_err());
}
