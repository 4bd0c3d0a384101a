pub mod error;
pub mod harvest;
pub mod layout;
pub mod logging;
pub mod model;

// Re-export common types for convenience
pub use error::{HarvestError, Result};
pub use layout::{Flavor, PluginSpec, SdkLayout};
pub use model::*;
