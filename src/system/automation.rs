//! Host-facing automation surfaces
//!
//! The concrete OS bindings (accessibility service, launcher, clipboard)
//! live outside this crate and plug in through these traits.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::core::gesture::GestureCallback;
use crate::shared::errors::BridgeResult;
use crate::shared::types::StrokePath;

/// Which notion of "currently selected element" a lookup uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FocusKind {
    Input,
    Accessibility,
}

/// Opaque reference to a node in the target application's UI tree
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeRef {
    pub id: u64,
    pub focus: FocusKind,
}

/// The live, OS-granted automation capability.
///
/// Every method must be called on the automation execution context.
pub trait AutomationService: Send + Sync {
    /// Start a synthetic stroke. `Err` means the capability refused to start
    /// it; otherwise the host settles `callback` once the stroke finishes or
    /// is cancelled, from whichever context it likes. Dropping `callback`
    /// unreported, or panicking, settles the command as cancelled.
    ///
    /// Once the capability is gone the host must refuse new strokes with
    /// `Err`; a disconnect can land between the bridge's last liveness check
    /// and this call.
    fn dispatch_gesture(&self, path: &StrokePath, callback: GestureCallback) -> Result<(), String>;

    fn find_focused_node(&self, focus: FocusKind) -> Option<NodeRef>;

    /// Replace the node's text. `false` when the node refuses the action.
    fn try_set_text(&self, node: &NodeRef, text: &str) -> bool;

    /// Paste the clipboard into the node. `false` when the node refuses.
    fn try_paste(&self, node: &NodeRef) -> bool;
}

/// Device-wide clipboard, overwritten without save/restore
pub trait ClipboardWriter: Send + Sync {
    fn write_text(&self, text: &str) -> BridgeResult<()>;
}

/// Launcher and settings surfaces, independent of the capability
#[async_trait]
pub trait PlatformShell: Send + Sync {
    /// `Ok(false)` when the package is not installed or cannot be resolved
    async fn launch_app(&self, package_id: &str) -> BridgeResult<bool>;

    async fn open_automation_settings(&self) -> BridgeResult<()>;
}
