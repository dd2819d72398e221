//! Command façade
//!
//! The operation set collaborators call: status, settings, launch, tap,
//! swipe and paste. Gesture commands capture the live connection once and
//! run against it until their token settles.

use std::sync::Arc;

use tokio::sync::broadcast;

use super::capability::CapabilityRegistry;
use super::executor::{run_on_automation_context, AutomationExecutor, AutomationThread};
use super::gesture::{CommandToken, GestureBuilder, GestureDispatcher};
use super::injection::TextInjector;
use crate::shared::emit::EventBus;
use crate::shared::errors::{BridgeError, BridgeResult};
use crate::shared::events::BridgeEvent;
use crate::shared::settings::BridgeSettings;
use crate::shared::types::{
    text_preview, BridgeStatus, GestureRequest, InjectionOutcome, Point,
};
use crate::system::automation::{ClipboardWriter, PlatformShell};
use crate::system::{DesktopShell, SystemClipboard};

pub struct AutomationBridge {
    registry: Arc<CapabilityRegistry>,
    executor: Arc<dyn AutomationExecutor>,
    builder: GestureBuilder,
    dispatcher: GestureDispatcher,
    injector: TextInjector,
    shell: Arc<dyn PlatformShell>,
    default_tap_duration_ms: u64,
}

impl AutomationBridge {
    pub fn new(
        registry: Arc<CapabilityRegistry>,
        executor: Arc<dyn AutomationExecutor>,
        clipboard: Arc<dyn ClipboardWriter>,
        shell: Arc<dyn PlatformShell>,
        settings: &BridgeSettings,
    ) -> Self {
        Self {
            registry,
            dispatcher: GestureDispatcher::new(executor.clone()),
            executor,
            builder: GestureBuilder::new(settings.gestures.max_duration_ms),
            injector: TextInjector::new(clipboard),
            shell,
            default_tap_duration_ms: settings.gestures.default_tap_duration_ms,
        }
    }

    /// Wire the bridge to the process-wide registry, a dedicated automation
    /// thread, the system clipboard and the desktop shell
    pub fn with_system_defaults(settings: &BridgeSettings) -> BridgeResult<Self> {
        let executor = AutomationThread::spawn(&settings.automation.thread_name)?;
        Ok(Self::new(
            CapabilityRegistry::global(),
            Arc::new(executor),
            Arc::new(SystemClipboard),
            Arc::new(DesktopShell::new(&settings.shell)),
            settings,
        ))
    }

    pub fn registry(&self) -> &Arc<CapabilityRegistry> {
        &self.registry
    }

    fn events(&self) -> &EventBus {
        self.registry.events()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<BridgeEvent> {
        self.events().subscribe()
    }

    /// Synchronous, never blocks
    pub fn query_running(&self) -> bool {
        self.registry.is_present()
    }

    pub fn status(&self) -> BridgeStatus {
        self.registry.status()
    }

    pub async fn open_automation_settings(&self) -> BridgeResult<bool> {
        self.shell.open_automation_settings().await?;
        Ok(true)
    }

    /// `Ok(false)` when the package is not installed or resolvable
    pub async fn launch_app(&self, package_id: &str) -> BridgeResult<bool> {
        let launched = self.shell.launch_app(package_id).await?;
        tracing::info!("[Bridge] launch {} -> {}", package_id, launched);
        Ok(launched)
    }

    /// Build and submit a gesture, returning its token without waiting.
    ///
    /// Callers that need two gestures in order must await the first token
    /// before dispatching the second.
    pub fn dispatch(&self, request: &GestureRequest) -> BridgeResult<CommandToken> {
        let connection = self.registry.current().ok_or(BridgeError::CapabilityUnavailable)?;
        let path = self.builder.build(request);
        tracing::debug!(
            kind = ?request.kind,
            generation = connection.generation(),
            points = path.points.len(),
            duration_ms = path.duration_ms,
            "command issued"
        );
        Ok(self.dispatcher.dispatch(path, connection))
    }

    async fn run_gesture(&self, request: GestureRequest) -> BridgeResult<bool> {
        let token = self.dispatch(&request)?;
        let command_id = token.id();
        let outcome = token.await;

        self.events().emit(BridgeEvent::CommandResolved {
            command_id,
            kind: request.kind,
            outcome: outcome.clone(),
        });
        outcome.into_result()
    }

    pub async fn tap(&self, x: f64, y: f64, duration_ms: i64) -> BridgeResult<bool> {
        self.run_gesture(GestureRequest::tap(Point::new(x, y), duration_ms))
            .await
    }

    /// Tap using the configured default press duration
    pub async fn tap_default(&self, x: f64, y: f64) -> BridgeResult<bool> {
        let duration = i64::try_from(self.default_tap_duration_ms).unwrap_or(i64::MAX);
        self.tap(x, y, duration).await
    }

    pub async fn swipe(&self, x0: f64, y0: f64, x1: f64, y1: f64, duration_ms: i64) -> BridgeResult<bool> {
        self.run_gesture(GestureRequest::swipe(
            Point::new(x0, y0),
            Point::new(x1, y1),
            duration_ms,
        ))
        .await
    }

    /// Inject `text` into the focused element, reporting which strategy landed it
    pub async fn inject_text(&self, text: &str) -> InjectionOutcome {
        let connection = self.registry.current().ok_or(BridgeError::CapabilityUnavailable)?;
        let injector = self.injector.clone();
        let owned = text.to_string();

        let outcome = run_on_automation_context(self.executor.as_ref(), move || {
            injector.inject(connection.service().as_ref(), &owned)
        })
        .await?;

        match &outcome {
            Ok(via) => {
                tracing::info!("[Bridge] injected {} via {:?}", text_preview(text), via);
                self.events().emit(BridgeEvent::TextInjected { via: *via });
            }
            Err(e) => {
                tracing::warn!("[Bridge] injection failed: {}", e);
                self.events().emit(BridgeEvent::InjectionFailed { reason: e.to_string() });
            }
        }
        outcome
    }

    pub async fn paste_text(&self, text: &str) -> BridgeResult<bool> {
        self.inject_text(text).await.map(|_| true)
    }
}
