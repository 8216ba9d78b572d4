//! Heuristic stack detection over an arbitrary file set.
//!
//! Unlike the assembler this draws no randomness: the same files always
//! infer the same stack.

pub mod inferrer;
pub mod signals;

pub use inferrer::{InferredStack, StackInferrer};
pub use signals::Signal;
