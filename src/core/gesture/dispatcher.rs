use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, Mutex, MutexGuard};

use uuid::Uuid;

use super::token::{command_token, CommandToken, TokenResolver};
use crate::core::capability::Connection;
use crate::core::executor::AutomationExecutor;
use crate::shared::types::{CommandOutcome, StrokePath};

/// Where the submit call stands for one callback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SubmitPhase {
    /// Still inside `dispatch_gesture`
    Submitting,
    /// Dropped unreported while still inside `dispatch_gesture`
    Abandoned,
    /// `dispatch_gesture` has returned
    Returned,
}

struct PhaseCell(Mutex<SubmitPhase>);

impl PhaseCell {
    fn lock(&self) -> MutexGuard<'_, SubmitPhase> {
        match self.0.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

/// One-shot completion sink handed to the host with each stroke.
///
/// Consumed by value, so the host can report at most once through it.
/// Dropping it unreported counts as a cancellation.
pub struct GestureCallback {
    resolver: Option<TokenResolver>,
    connection: Arc<Connection>,
    phase: Arc<PhaseCell>,
}

impl GestureCallback {
    pub fn command_id(&self) -> Option<Uuid> {
        self.resolver.as_ref().map(TokenResolver::id)
    }

    /// The stroke ran to completion
    pub fn completed(mut self) {
        self.finish(CommandOutcome::Accepted);
    }

    /// The capability abandoned the stroke
    pub fn cancelled(mut self) {
        self.finish(CommandOutcome::Cancelled);
    }

    fn finish(&mut self, outcome: CommandOutcome) {
        if let Some(resolver) = self.resolver.take() {
            settle(&resolver, &self.connection, outcome);
        }
    }
}

impl Drop for GestureCallback {
    fn drop(&mut self) {
        if self.resolver.is_none() {
            return;
        }

        {
            let mut phase = self.phase.lock();
            if *phase == SubmitPhase::Submitting {
                // A refusal drops the callback too; `submit` decides once the call returns
                *phase = SubmitPhase::Abandoned;
                return;
            }
        }

        tracing::debug!("gesture callback dropped without a report, cancelling");
        self.finish(CommandOutcome::Cancelled);
    }
}

fn settle(resolver: &TokenResolver, connection: &Connection, outcome: CommandOutcome) {
    if resolver.resolve(outcome.clone()) {
        tracing::debug!(command_id = %resolver.id(), ?outcome, "command resolved");
    }
    connection.untrack(resolver.id());
}

/// Submits strokes to the capability on the automation context.
///
/// Dispatches are independent: no queueing or ordering between two strokes
/// beyond the order the automation context happens to run their submissions.
#[derive(Clone)]
pub struct GestureDispatcher {
    executor: Arc<dyn AutomationExecutor>,
}

impl GestureDispatcher {
    pub fn new(executor: Arc<dyn AutomationExecutor>) -> Self {
        Self { executor }
    }

    /// Submit `path` against a captured connection and return its token
    /// immediately. A synchronous refusal settles the token to `Rejected`
    /// before the caller awaits it.
    pub fn dispatch(&self, path: StrokePath, connection: Arc<Connection>) -> CommandToken {
        let (token, resolver) = command_token();

        if !connection.track(resolver.clone()) {
            tracing::debug!(command_id = %resolver.id(), "connection already closed, cancelling");
            resolver.resolve(CommandOutcome::Cancelled);
            return token;
        }

        let job_resolver = resolver.clone();
        let job_connection = connection.clone();
        let job = Box::new(move || submit(path, job_resolver, job_connection));

        if self.executor.execute(job).is_err() {
            settle(&resolver, &connection, CommandOutcome::Cancelled);
        }
        token
    }
}

/// Runs on the automation context
fn submit(path: StrokePath, resolver: TokenResolver, connection: Arc<Connection>) {
    // A disconnect between this check and the host call still reaches the
    // host, which refuses strokes once its capability is gone
    if resolver.is_resolved() || connection.is_closed() {
        settle(&resolver, &connection, CommandOutcome::Cancelled);
        return;
    }

    let phase = Arc::new(PhaseCell(Mutex::new(SubmitPhase::Submitting)));
    let callback = GestureCallback {
        resolver: Some(resolver.clone()),
        connection: connection.clone(),
        phase: phase.clone(),
    };

    let service = connection.service();
    let result = catch_unwind(AssertUnwindSafe(|| service.dispatch_gesture(&path, callback)));

    let abandoned = {
        let mut phase = phase.lock();
        let abandoned = *phase == SubmitPhase::Abandoned;
        *phase = SubmitPhase::Returned;
        abandoned
    };

    match result {
        Ok(Ok(())) if abandoned => {
            tracing::warn!(command_id = %resolver.id(), "host accepted the stroke but dropped its callback");
            settle(&resolver, &connection, CommandOutcome::Cancelled);
        }
        Ok(Ok(())) => resolver.mark_submitted(),
        Ok(Err(reason)) => {
            tracing::warn!(
                command_id = %resolver.id(),
                generation = connection.generation(),
                "gesture submission rejected: {}",
                reason
            );
            settle(&resolver, &connection, CommandOutcome::Rejected(reason));
        }
        Err(_) => {
            tracing::error!(command_id = %resolver.id(), "host panicked while submitting a stroke");
            settle(&resolver, &connection, CommandOutcome::Cancelled);
        }
    }
}
