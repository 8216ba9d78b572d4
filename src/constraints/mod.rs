//! Constraint solving over partial stacks.

pub mod defaults;
pub mod rules;
pub mod solver;
pub mod violation;

pub use defaults::{DefaultPairing, DefaultPairings};
pub use rules::{Incompatibility, Requirement, RuleSet, StructuralCheck};
pub use solver::ConstraintSolver;
pub use violation::{ValidationResult, Violation, ViolationKind};
