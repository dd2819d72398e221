pub mod automation;
pub mod clipboard;
pub mod shell;

pub use automation::{AutomationService, ClipboardWriter, FocusKind, NodeRef, PlatformShell};
pub use clipboard::SystemClipboard;
pub use shell::DesktopShell;
