//! Assistive automation bridge
//!
//! Drives other applications through an OS-granted accessibility capability:
//! launch them, synthesize taps and swipes inside them, and inject text into
//! whatever field holds focus.

pub mod core;
pub mod shared;
pub mod system;

#[cfg(test)]
mod testing;

pub use crate::core::gesture::{CommandToken, GestureCallback};
pub use crate::core::{AutomationBridge, AutomationExecutor, AutomationThread, CapabilityRegistry, InlineExecutor};
pub use crate::shared::events::BridgeEvent;
pub use crate::shared::settings::BridgeSettings;
pub use crate::shared::types::{
    BridgeStatus, CommandOutcome, CommandReply, GestureKind, GestureRequest, InjectionVia, Point, StrokePath,
};
pub use crate::shared::{BridgeError, BridgeResult};
pub use crate::system::{AutomationService, ClipboardWriter, FocusKind, NodeRef, PlatformShell};

use tracing_subscriber::EnvFilter;

use crate::shared::settings::LoggingSettings;

/// Install the process-wide tracing subscriber.
///
/// `RUST_LOG` wins over the configured level. Calling this twice only warns.
pub fn init_logging(settings: &LoggingSettings) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&settings.level));

    let result = if settings.json {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .json()
            .with_target(false)
            .try_init()
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).try_init()
    };

    if let Err(err) = result {
        tracing::warn!("Tracing already initialised, skipping duplicate subscriber: {err}");
    }
}
