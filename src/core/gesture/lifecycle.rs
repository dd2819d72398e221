//! Per-command state machine
//!
//! `Issued -> {Rejected, Submitted, Cancelled}` and
//! `Submitted -> {Completed, Cancelled}`. Terminal states never move again.

use serde::{Deserialize, Serialize};

use crate::shared::types::CommandOutcome;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandState {
    Issued,
    Submitted,
    Rejected,
    Completed,
    Cancelled,
}

impl CommandState {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            CommandState::Rejected | CommandState::Completed | CommandState::Cancelled
        )
    }

    pub fn can_transition_to(self, next: CommandState) -> bool {
        use CommandState::*;
        matches!(
            (self, next),
            (Issued, Submitted)
                | (Issued, Rejected)
                // disconnect before the command reached the automation context
                | (Issued, Cancelled)
                | (Submitted, Completed)
                | (Submitted, Cancelled)
        )
    }

    /// Terminal state an outcome settles into
    pub fn for_outcome(outcome: &CommandOutcome) -> CommandState {
        match outcome {
            CommandOutcome::Accepted => CommandState::Completed,
            CommandOutcome::Rejected(_) => CommandState::Rejected,
            CommandOutcome::Cancelled => CommandState::Cancelled,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidTransition {
    pub from: CommandState,
    pub to: CommandState,
}

/// Tracks one command through its states, refusing illegal moves
#[derive(Debug, Clone)]
pub struct CommandLifecycle {
    state: CommandState,
}

impl CommandLifecycle {
    pub fn new() -> Self {
        Self {
            state: CommandState::Issued,
        }
    }

    pub fn state(&self) -> CommandState {
        self.state
    }

    pub fn advance(&mut self, next: CommandState) -> Result<(), InvalidTransition> {
        if !self.state.can_transition_to(next) {
            return Err(InvalidTransition {
                from: self.state,
                to: next,
            });
        }
        self.state = next;
        Ok(())
    }

    /// Settle into the terminal state for `outcome`.
    ///
    /// A completion reported before submission was acknowledged passes
    /// through `Submitted` first, since the host may finish a gesture
    /// synchronously inside the submit call.
    pub fn settle(&mut self, outcome: &CommandOutcome) -> Result<CommandState, InvalidTransition> {
        let target = CommandState::for_outcome(outcome);
        if self.state == CommandState::Issued && target == CommandState::Completed {
            self.advance(CommandState::Submitted)?;
        }
        self.advance(target)?;
        Ok(target)
    }
}

impl Default for CommandLifecycle {
    fn default() -> Self {
        Self::new()
    }
}
