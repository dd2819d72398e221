//! Capability handle lifecycle
//!
//! The OS grants and revokes the automation capability at any time. The
//! registry holds at most one live `Connection`, swapped by the connect and
//! disconnect hooks and read concurrently by every bridge operation.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};
use once_cell::sync::OnceCell;
use uuid::Uuid;

use super::gesture::TokenResolver;
use crate::shared::emit::EventBus;
use crate::shared::events::BridgeEvent;
use crate::shared::types::{BridgeStatus, CommandOutcome};
use crate::system::automation::AutomationService;

static GLOBAL_REGISTRY: OnceCell<Arc<CapabilityRegistry>> = OnceCell::new();

#[derive(Default)]
struct PendingSet {
    closed: bool,
    commands: HashMap<Uuid, TokenResolver>,
}

/// One granted lifetime of the capability
pub struct Connection {
    generation: u64,
    connected_at: DateTime<Utc>,
    service: Arc<dyn AutomationService>,
    pending: Mutex<PendingSet>,
}

impl Connection {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn connected_at(&self) -> DateTime<Utc> {
        self.connected_at
    }

    pub fn service(&self) -> &Arc<dyn AutomationService> {
        &self.service
    }

    fn pending(&self) -> MutexGuard<'_, PendingSet> {
        match self.pending.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                tracing::warn!("[Capability] Pending set mutex poisoned, recovering...");
                poisoned.into_inner()
            }
        }
    }

    /// Register an in-flight command. `false` once this connection has been
    /// torn down, in which case the caller must cancel the command itself.
    pub fn track(&self, resolver: TokenResolver) -> bool {
        let mut pending = self.pending();
        if pending.closed {
            return false;
        }
        pending.commands.insert(resolver.id(), resolver);
        true
    }

    pub fn untrack(&self, command_id: Uuid) {
        self.pending().commands.remove(&command_id);
    }

    pub fn pending_count(&self) -> usize {
        self.pending().commands.len()
    }

    pub fn is_closed(&self) -> bool {
        self.pending().closed
    }

    /// Close the connection and cancel everything still in flight
    fn close(&self) -> usize {
        let drained: Vec<TokenResolver> = {
            let mut pending = self.pending();
            pending.closed = true;
            pending.commands.drain().map(|(_, resolver)| resolver).collect()
        };

        drained
            .into_iter()
            .filter(|resolver| resolver.resolve(CommandOutcome::Cancelled))
            .count()
    }
}

/// Process-wide slot for the live capability handle
pub struct CapabilityRegistry {
    slot: RwLock<Option<Arc<Connection>>>,
    present: AtomicBool,
    next_generation: AtomicU64,
    events: EventBus,
}

impl CapabilityRegistry {
    pub fn new(events: EventBus) -> Self {
        Self {
            slot: RwLock::new(None),
            present: AtomicBool::new(false),
            next_generation: AtomicU64::new(1),
            events,
        }
    }

    /// Registry the OS connect/disconnect hooks report into
    pub fn global() -> Arc<CapabilityRegistry> {
        GLOBAL_REGISTRY
            .get_or_init(|| Arc::new(CapabilityRegistry::new(EventBus::new())))
            .clone()
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    fn read_slot(&self) -> RwLockReadGuard<'_, Option<Arc<Connection>>> {
        match self.slot.read() {
            Ok(guard) => guard,
            Err(poisoned) => {
                tracing::warn!("[Capability] Slot lock poisoned, recovering...");
                poisoned.into_inner()
            }
        }
    }

    fn write_slot(&self) -> RwLockWriteGuard<'_, Option<Arc<Connection>>> {
        match self.slot.write() {
            Ok(guard) => guard,
            Err(poisoned) => {
                tracing::warn!("[Capability] Slot lock poisoned, recovering...");
                poisoned.into_inner()
            }
        }
    }

    /// OS-driven "connected" signal. Replaces any previous connection, whose
    /// in-flight commands are cancelled. Returns the new generation.
    pub fn connect(&self, service: Arc<dyn AutomationService>) -> u64 {
        let generation = self.next_generation.fetch_add(1, Ordering::SeqCst);
        let connection = Arc::new(Connection {
            generation,
            connected_at: Utc::now(),
            service,
            pending: Mutex::new(PendingSet::default()),
        });

        let previous = {
            let mut slot = self.write_slot();
            let previous = slot.replace(connection);
            self.present.store(true, Ordering::SeqCst);
            previous
        };

        if let Some(previous) = previous {
            tracing::warn!(
                "[Capability] generation {} replaced by {} without a disconnect",
                previous.generation,
                generation
            );
            self.retire(&previous);
        }

        tracing::info!("[Capability] connected, generation {}", generation);
        self.events.emit(BridgeEvent::CapabilityConnected { generation });
        generation
    }

    /// OS-driven "disconnected" signal. Returns `false` when nothing was connected.
    pub fn disconnect(&self) -> bool {
        let previous = {
            let mut slot = self.write_slot();
            let previous = slot.take();
            self.present.store(false, Ordering::SeqCst);
            previous
        };

        match previous {
            Some(connection) => {
                self.retire(&connection);
                true
            }
            None => {
                tracing::debug!("[Capability] disconnect with no live connection");
                false
            }
        }
    }

    fn retire(&self, connection: &Connection) {
        let cancelled = connection.close();
        tracing::info!(
            "[Capability] generation {} disconnected, {} command(s) cancelled",
            connection.generation,
            cancelled
        );
        self.events.emit(BridgeEvent::CapabilityDisconnected {
            generation: connection.generation,
            cancelled,
        });
    }

    /// Lock-free liveness query
    pub fn is_present(&self) -> bool {
        self.present.load(Ordering::SeqCst)
    }

    /// Capture the live connection for the remainder of one operation
    pub fn current(&self) -> Option<Arc<Connection>> {
        self.read_slot().clone()
    }

    pub fn status(&self) -> BridgeStatus {
        match self.current() {
            Some(connection) => BridgeStatus {
                running: true,
                generation: Some(connection.generation),
                connected_at: Some(connection.connected_at),
                pending_commands: connection.pending_count(),
            },
            None => BridgeStatus {
                running: false,
                generation: None,
                connected_at: None,
                pending_commands: 0,
            },
        }
    }
}
