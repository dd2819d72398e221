use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::errors::{BridgeError, BridgeResult};

/// Screen coordinate in the target display's pixel space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GestureKind {
    Tap,
    Swipe,
}

/// A logical gesture as requested by a caller, before any coercion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GestureRequest {
    pub kind: GestureKind,
    pub start: Point,
    pub end: Point,
    /// Raw duration as supplied; zero or negative values are coerced by the builder
    pub duration_ticks: i64,
}

impl GestureRequest {
    pub fn tap(at: Point, duration_ticks: i64) -> Self {
        Self {
            kind: GestureKind::Tap,
            start: at,
            end: at,
            duration_ticks,
        }
    }

    pub fn swipe(from: Point, to: Point, duration_ticks: i64) -> Self {
        Self {
            kind: GestureKind::Swipe,
            start: from,
            end: to,
            duration_ticks,
        }
    }
}

/// Geometric stroke handed to the capability as a synthetic touch.
///
/// A single point is a press-and-release at that point; two points describe a
/// straight drag from the first to the second.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrokePath {
    pub points: Vec<Point>,
    pub duration_ms: u64,
}

impl StrokePath {
    pub fn start(&self) -> Option<Point> {
        self.points.first().copied()
    }

    pub fn is_point(&self) -> bool {
        self.points.len() == 1
    }
}

/// Final outcome delivered through a command token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "reason")]
pub enum CommandOutcome {
    /// The capability ran the gesture to completion
    Accepted,
    /// The capability refused to start the gesture
    Rejected(String),
    /// The capability cancelled the gesture or disconnected mid-flight
    Cancelled,
}

impl CommandOutcome {
    pub fn into_result(self) -> BridgeResult<bool> {
        match self {
            CommandOutcome::Accepted => Ok(true),
            CommandOutcome::Rejected(reason) => Err(BridgeError::SubmissionRejected(reason)),
            CommandOutcome::Cancelled => Err(BridgeError::Cancelled),
        }
    }
}

/// Strategy that delivered injected text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InjectionVia {
    DirectSet,
    ClipboardPaste,
}

pub type InjectionOutcome = BridgeResult<InjectionVia>;

/// Reply envelope handed to collaborators: a boolean plus an error code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandReply {
    pub success: bool,
    pub error_code: Option<String>,
    pub message: Option<String>,
}

impl From<BridgeResult<bool>> for CommandReply {
    fn from(result: BridgeResult<bool>) -> Self {
        match result {
            Ok(success) => Self {
                success,
                error_code: None,
                message: None,
            },
            Err(err) => Self {
                success: false,
                error_code: Some(err.code().to_string()),
                message: Some(err.to_string()),
            },
        }
    }
}

/// Point-in-time view of the bridge for status rendering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BridgeStatus {
    pub running: bool,
    pub generation: Option<u64>,
    pub connected_at: Option<DateTime<Utc>>,
    pub pending_commands: usize,
}

/// Short, log-safe preview of injected text
pub fn text_preview(text: &str) -> String {
    let count = text.chars().count();
    if count > 20 {
        let head: String = text.chars().take(20).collect();
        format!("{}... ({} chars)", head, count)
    } else {
        format!("{} ({} chars)", text, count)
    }
}
