//! Pass 2: augment an existing project without re-resolving its stack.

pub mod enricher;
pub mod flags;
pub mod strategies;
pub mod strategy;

pub use enricher::{EnrichedProject, ProjectEnricher};
pub use flags::{EnrichDepth, EnrichmentFlag, EnrichmentFlags};
pub use strategies::default_enrichment_registry;
pub use strategy::{EnrichmentContext, EnrichmentRegistry, EnrichmentStrategy};
