//! One-shot command tokens
//!
//! A `CommandToken` is awaited by the caller; any number of `TokenResolver`
//! clones may race to settle it, and only the first one wins.

use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard};
use std::task::{Context, Poll};

use tokio::sync::oneshot;
use uuid::Uuid;

use super::lifecycle::{CommandLifecycle, CommandState};
use crate::shared::types::CommandOutcome;

struct Slot {
    sender: Option<oneshot::Sender<CommandOutcome>>,
    lifecycle: CommandLifecycle,
}

/// Caller side of a dispatched command. Resolves to exactly one outcome.
///
/// If every resolver is dropped without settling, the token resolves to
/// `Cancelled` rather than hanging.
#[derive(Debug)]
pub struct CommandToken {
    id: Uuid,
    receiver: oneshot::Receiver<CommandOutcome>,
}

impl CommandToken {
    pub fn id(&self) -> Uuid {
        self.id
    }
}

impl Future for CommandToken {
    type Output = CommandOutcome;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.receiver)
            .poll(cx)
            .map(|received| received.unwrap_or(CommandOutcome::Cancelled))
    }
}

/// Settling side of a command token, first write wins
#[derive(Clone)]
pub struct TokenResolver {
    id: Uuid,
    slot: Arc<Mutex<Slot>>,
}

pub fn command_token() -> (CommandToken, TokenResolver) {
    let id = Uuid::new_v4();
    let (sender, receiver) = oneshot::channel();
    let slot = Slot {
        sender: Some(sender),
        lifecycle: CommandLifecycle::new(),
    };
    (
        CommandToken { id, receiver },
        TokenResolver {
            id,
            slot: Arc::new(Mutex::new(slot)),
        },
    )
}

impl TokenResolver {
    pub fn id(&self) -> Uuid {
        self.id
    }

    fn lock(&self) -> MutexGuard<'_, Slot> {
        match self.slot.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                tracing::warn!("[CommandToken] Slot mutex poisoned, recovering...");
                poisoned.into_inner()
            }
        }
    }

    pub fn state(&self) -> CommandState {
        self.lock().lifecycle.state()
    }

    pub fn is_resolved(&self) -> bool {
        self.state().is_terminal()
    }

    /// Record that the capability accepted the stroke for execution.
    ///
    /// A no-op when the command already settled, which happens when the
    /// host finishes the gesture inside the submit call itself.
    pub fn mark_submitted(&self) {
        let mut slot = self.lock();
        if slot.lifecycle.state() == CommandState::Issued {
            // Issued -> Submitted is always legal
            let _ = slot.lifecycle.advance(CommandState::Submitted);
            tracing::debug!(command_id = %self.id, "command submitted");
        }
    }

    /// Settle the token. Returns `false` when it was already settled.
    pub fn resolve(&self, outcome: CommandOutcome) -> bool {
        let mut slot = self.lock();
        if slot.lifecycle.state().is_terminal() {
            tracing::debug!(
                command_id = %self.id,
                ignored = ?outcome,
                "command already resolved, ignoring late outcome"
            );
            return false;
        }

        if let Err(e) = slot.lifecycle.settle(&outcome) {
            tracing::warn!(
                command_id = %self.id,
                "illegal command transition {:?} -> {:?}",
                e.from,
                e.to
            );
            return false;
        }

        if let Some(sender) = slot.sender.take() {
            // The caller may have stopped waiting; the outcome still counts as delivered
            let _ = sender.send(outcome);
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_resolves_once() {
        let (token, resolver) = command_token();
        assert!(resolver.resolve(CommandOutcome::Accepted));
        assert!(!resolver.resolve(CommandOutcome::Cancelled));
        assert_eq!(token.await, CommandOutcome::Accepted);
    }

    #[tokio::test]
    async fn test_rejection_and_cancellation_race() {
        let (token, resolver) = command_token();
        let host_side = resolver.clone();

        let reject = std::thread::spawn(move || resolver.resolve(CommandOutcome::Rejected("busy".into())));
        let cancel = std::thread::spawn(move || host_side.resolve(CommandOutcome::Cancelled));

        let winners = [reject.join().unwrap(), cancel.join().unwrap()];
        assert_eq!(winners.iter().filter(|won| **won).count(), 1);

        let outcome = token.await;
        assert!(matches!(outcome, CommandOutcome::Rejected(_) | CommandOutcome::Cancelled));
    }

    #[tokio::test]
    async fn test_dropped_resolvers_cancel() {
        let (token, resolver) = command_token();
        drop(resolver);
        assert_eq!(token.await, CommandOutcome::Cancelled);
    }

    #[test]
    fn test_submitted_then_late_rejection_ignored() {
        let (_token, resolver) = command_token();
        resolver.mark_submitted();
        assert_eq!(resolver.state(), CommandState::Submitted);
        assert!(!resolver.resolve(CommandOutcome::Rejected("late".into())));
        assert!(resolver.resolve(CommandOutcome::Cancelled));
        assert_eq!(resolver.state(), CommandState::Cancelled);
    }

    #[test]
    fn test_mark_submitted_after_settle_is_noop() {
        let (_token, resolver) = command_token();
        assert!(resolver.resolve(CommandOutcome::Accepted));
        resolver.mark_submitted();
        assert_eq!(resolver.state(), CommandState::Completed);
    }
}
