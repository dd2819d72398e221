pub mod emit;
pub mod errors;
pub mod events;
pub mod settings;
pub mod types;

// Re-export BridgeError for convenience
pub use errors::{BridgeError, BridgeResult};
