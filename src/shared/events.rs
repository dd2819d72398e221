use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::types::{CommandOutcome, GestureKind, InjectionVia};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "payload")] // Tagged enum for easier frontend parsing
pub enum BridgeEvent {
    #[serde(rename = "capability://connected")]
    CapabilityConnected { generation: u64 },

    #[serde(rename = "capability://disconnected")]
    CapabilityDisconnected { generation: u64, cancelled: usize },

    #[serde(rename = "command://resolved")]
    CommandResolved {
        command_id: Uuid,
        kind: GestureKind,
        outcome: CommandOutcome,
    },

    #[serde(rename = "text://injected")]
    TextInjected { via: InjectionVia },

    #[serde(rename = "text://failed")]
    InjectionFailed { reason: String },
}
