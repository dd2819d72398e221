pub mod bridge;
pub mod capability;
pub mod executor;
pub mod gesture;
pub mod injection;

pub use bridge::AutomationBridge;
pub use capability::{CapabilityRegistry, Connection};
pub use executor::{AutomationExecutor, AutomationThread, InlineExecutor};
pub use injection::TextInjector;
