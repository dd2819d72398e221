use tokio::sync::broadcast;

use super::events::BridgeEvent;

const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Fan-out of bridge events to any number of listeners
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<BridgeEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<BridgeEvent> {
        self.sender.subscribe()
    }

    /// Emit an event to all current subscribers
    pub fn emit(&self, event: BridgeEvent) {
        // No receivers is the normal state when nothing renders status
        if let Err(e) = self.sender.send(event) {
            tracing::trace!("bridge event dropped, no subscribers: {:?}", e.0);
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_subscriber_receives_event() {
        let bus = EventBus::new();
        let mut rx = bus.subscribe();
        bus.emit(BridgeEvent::CapabilityConnected { generation: 3 });
        assert_eq!(rx.recv().await.unwrap(), BridgeEvent::CapabilityConnected { generation: 3 });
    }

    #[test]
    fn test_emit_without_subscribers_is_silent() {
        let bus = EventBus::new();
        bus.emit(BridgeEvent::InjectionFailed { reason: "none".into() });
    }

    #[test]
    fn test_event_wire_name() {
        let json = serde_json::to_value(BridgeEvent::CapabilityDisconnected {
            generation: 1,
            cancelled: 2,
        })
        .unwrap();
        assert_eq!(json["event"], "capability://disconnected");
        assert_eq!(json["payload"]["cancelled"], 2);
    }
}
