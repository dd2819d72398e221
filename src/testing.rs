//! Scriptable host doubles for unit tests

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::core::gesture::GestureCallback;
use crate::shared::errors::{BridgeError, BridgeResult};
use crate::shared::types::StrokePath;
use crate::system::automation::{AutomationService, ClipboardWriter, FocusKind, NodeRef, PlatformShell};

/// How the fake capability answers a stroke submission
#[derive(Debug, Clone)]
pub enum GestureReply {
    Complete,
    Cancel,
    Reject(String),
    /// Keep the callback until `complete_held`
    Hold,
    /// Report cancellation through the callback and also refuse synchronously
    CancelThenReject(String),
    /// Accept the stroke and drop the callback without reporting
    Drop,
    /// Panic inside the submit call
    Panic,
}

struct HostState {
    gesture_reply: GestureReply,
    input_focus: Option<NodeRef>,
    accessibility_focus: Option<NodeRef>,
    accept_set_text: bool,
    accept_paste: bool,
    dispatched: Vec<StrokePath>,
    held: Vec<GestureCallback>,
    set_text_calls: Vec<(NodeRef, String)>,
    paste_calls: Vec<NodeRef>,
    focus_lookups: usize,
    threads: Vec<Option<String>>,
}

pub struct FakeHost {
    state: Mutex<HostState>,
}

impl FakeHost {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(HostState {
                gesture_reply: GestureReply::Complete,
                input_focus: None,
                accessibility_focus: None,
                accept_set_text: true,
                accept_paste: true,
                dispatched: Vec::new(),
                held: Vec::new(),
                set_text_calls: Vec::new(),
                paste_calls: Vec::new(),
                focus_lookups: 0,
                threads: Vec::new(),
            }),
        })
    }

    pub fn into_service(self: Arc<Self>) -> Arc<dyn AutomationService> {
        self
    }

    pub fn set_gesture_reply(&self, reply: GestureReply) {
        self.state.lock().unwrap().gesture_reply = reply;
    }

    pub fn set_focus(&self, input: Option<NodeRef>, accessibility: Option<NodeRef>) {
        let mut state = self.state.lock().unwrap();
        state.input_focus = input;
        state.accessibility_focus = accessibility;
    }

    pub fn set_node_actions(&self, accept_set_text: bool, accept_paste: bool) {
        let mut state = self.state.lock().unwrap();
        state.accept_set_text = accept_set_text;
        state.accept_paste = accept_paste;
    }

    pub fn complete_held(&self) {
        let held: Vec<GestureCallback> = self.state.lock().unwrap().held.drain(..).collect();
        for callback in held {
            callback.completed();
        }
    }

    /// Release held callbacks without reporting through them
    pub fn drop_held(&self) {
        let held: Vec<GestureCallback> = self.state.lock().unwrap().held.drain(..).collect();
        drop(held);
    }

    pub fn dispatched(&self) -> Vec<StrokePath> {
        self.state.lock().unwrap().dispatched.clone()
    }

    pub fn set_text_calls(&self) -> Vec<(NodeRef, String)> {
        self.state.lock().unwrap().set_text_calls.clone()
    }

    pub fn paste_calls(&self) -> Vec<NodeRef> {
        self.state.lock().unwrap().paste_calls.clone()
    }

    pub fn focus_lookups(&self) -> usize {
        self.state.lock().unwrap().focus_lookups
    }

    /// Names of the threads capability calls ran on
    pub fn threads(&self) -> Vec<Option<String>> {
        self.state.lock().unwrap().threads.clone()
    }

    fn record_thread(state: &mut HostState) {
        state.threads.push(std::thread::current().name().map(str::to_string));
    }
}

impl AutomationService for FakeHost {
    fn dispatch_gesture(&self, path: &StrokePath, callback: GestureCallback) -> Result<(), String> {
        let reply = {
            let mut state = self.state.lock().unwrap();
            Self::record_thread(&mut state);
            state.dispatched.push(path.clone());
            state.gesture_reply.clone()
        };

        // Callbacks settle outside the lock, like a host reporting from its own context
        match reply {
            GestureReply::Complete => {
                callback.completed();
                Ok(())
            }
            GestureReply::Cancel => {
                callback.cancelled();
                Ok(())
            }
            GestureReply::Reject(reason) => Err(reason),
            GestureReply::Hold => {
                self.state.lock().unwrap().held.push(callback);
                Ok(())
            }
            GestureReply::CancelThenReject(reason) => {
                callback.cancelled();
                Err(reason)
            }
            GestureReply::Drop => {
                drop(callback);
                Ok(())
            }
            GestureReply::Panic => panic!("host binding failed mid-submit"),
        }
    }

    fn find_focused_node(&self, focus: FocusKind) -> Option<NodeRef> {
        let mut state = self.state.lock().unwrap();
        Self::record_thread(&mut state);
        state.focus_lookups += 1;
        match focus {
            FocusKind::Input => state.input_focus.clone(),
            FocusKind::Accessibility => state.accessibility_focus.clone(),
        }
    }

    fn try_set_text(&self, node: &NodeRef, text: &str) -> bool {
        let mut state = self.state.lock().unwrap();
        state.set_text_calls.push((node.clone(), text.to_string()));
        state.accept_set_text
    }

    fn try_paste(&self, node: &NodeRef) -> bool {
        let mut state = self.state.lock().unwrap();
        state.paste_calls.push(node.clone());
        state.accept_paste
    }
}

pub struct FakeClipboard {
    contents: Mutex<Option<String>>,
    fail: bool,
}

impl FakeClipboard {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            contents: Mutex::new(None),
            fail: false,
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            contents: Mutex::new(None),
            fail: true,
        })
    }

    pub fn contents(&self) -> Option<String> {
        self.contents.lock().unwrap().clone()
    }
}

impl ClipboardWriter for FakeClipboard {
    fn write_text(&self, text: &str) -> BridgeResult<()> {
        if self.fail {
            return Err(BridgeError::Clipboard("clipboard unavailable".to_string()));
        }
        *self.contents.lock().unwrap() = Some(text.to_string());
        Ok(())
    }
}

pub struct FakeShell {
    installed: Vec<String>,
    settings_available: bool,
}

impl FakeShell {
    pub fn new(installed: &[&str], settings_available: bool) -> Arc<Self> {
        Arc::new(Self {
            installed: installed.iter().map(|id| id.to_string()).collect(),
            settings_available,
        })
    }
}

#[async_trait]
impl PlatformShell for FakeShell {
    async fn launch_app(&self, package_id: &str) -> BridgeResult<bool> {
        Ok(self.installed.iter().any(|id| id == package_id))
    }

    async fn open_automation_settings(&self) -> BridgeResult<()> {
        if self.settings_available {
            Ok(())
        } else {
            Err(BridgeError::PlatformError("settings activity not found".to_string()))
        }
    }
}
