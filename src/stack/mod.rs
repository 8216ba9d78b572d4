//! Stack vocabulary: the twelve dimensions, their closed value enums and the
//! Universal Matrix describing which values fit together.
//!
//! Every id enum is declared through [`define_id_enum!`] and carries a stable
//! wire name (`as_str`) plus a human display name (`name`).
//!
//! # Example
//!
//! ```
//! use upg::stack::{Dimension, DimensionValue, LanguageId, PartialStack, UniversalMatrix};
//!
//! let matrix = UniversalMatrix::standard();
//! let partial = PartialStack::new().with(DimensionValue::Language(LanguageId::Rust));
//! assert_eq!(partial.to_string(), "{language=rust}");
//! assert!(!matrix.build_tools_for(LanguageId::Rust).is_empty());
//! assert_eq!(Dimension::RESOLUTION_ORDER.len(), 12);
//! ```

#[macro_use]
pub mod id_enum_macro;

pub mod archetype_id;
pub mod data_id;
pub mod delivery_id;
pub mod dimension;
pub mod framework_id;
pub mod language_id;
pub mod matrix;
pub mod runtime_id;
pub mod tech_stack;
pub mod tooling_id;

pub use archetype_id::ArchetypeId;
pub use data_id::{DatabaseId, OrmId};
pub use delivery_id::{CicdId, PackagingId, TransportId};
pub use dimension::{Dimension, DimensionValue};
pub use framework_id::FrameworkId;
pub use language_id::LanguageId;
pub use matrix::{ArchetypeProfile, LanguageEquivalence, OrmProfile, UniversalMatrix};
pub use runtime_id::RuntimeId;
pub use tech_stack::{PartialStack, TechStack};
pub use tooling_id::{BuildToolId, StylingId, TestingId};
