//! Read-only inspection of an existing file set.

pub mod glob;
pub mod introspector;
pub mod ports;

pub use glob::Glob;
pub use introspector::FileIntrospector;
pub use ports::{PortInfo, PortSource};
