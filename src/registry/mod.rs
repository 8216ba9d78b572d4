//! Registry manifest: the persisted index of generated seeds.

pub mod manifest;

pub use manifest::{RegistryEntry, RegistryError, RegistryManifest, MANIFEST_VERSION};
