//! Focus-based text injection
//!
//! Resolution order for one call, against a single target node:
//! 1. input focus, else accessibility focus, else `NoFocusedTarget`
//! 2. direct set-text
//! 3. clipboard write followed by paste, else `InjectionRejected`
//!
//! The accessibility-focus fallback does not check that the node is editable;
//! a non-editable node simply refuses both actions.

use std::sync::Arc;

use crate::shared::errors::BridgeError;
use crate::shared::types::{text_preview, InjectionOutcome, InjectionVia};
use crate::system::automation::{AutomationService, ClipboardWriter, FocusKind, NodeRef};

#[derive(Clone)]
pub struct TextInjector {
    clipboard: Arc<dyn ClipboardWriter>,
}

impl TextInjector {
    pub fn new(clipboard: Arc<dyn ClipboardWriter>) -> Self {
        Self { clipboard }
    }

    /// Looked up fresh on every call; focus moves between calls
    pub fn focused_target(service: &dyn AutomationService) -> Option<NodeRef> {
        service
            .find_focused_node(FocusKind::Input)
            .or_else(|| service.find_focused_node(FocusKind::Accessibility))
    }

    /// Must run on the automation execution context
    pub fn inject(&self, service: &dyn AutomationService, text: &str) -> InjectionOutcome {
        let target = Self::focused_target(service).ok_or(BridgeError::NoFocusedTarget)?;
        tracing::debug!(node = target.id, focus = ?target.focus, "injecting {}", text_preview(text));

        if service.try_set_text(&target, text) {
            return Ok(InjectionVia::DirectSet);
        }

        tracing::debug!(node = target.id, "set-text refused, falling back to clipboard paste");
        self.clipboard.write_text(text)?;

        if service.try_paste(&target) {
            Ok(InjectionVia::ClipboardPaste)
        } else {
            Err(BridgeError::InjectionRejected)
        }
    }
}
