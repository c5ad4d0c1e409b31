//! Per-call cancellation and deadlines.
//!
//! A `Context` is passed to every client call. Children derived with
//! `with_timeout`, `with_deadline`, or `with_cancel` inherit the parent's
//! deadline and cancellation, and can only tighten them. Cancellation rides
//! on a `CancellationToken`: cancelling a token cancels every context built
//! from it or from one of its child tokens.

use std::time::{Duration, Instant};

use thiserror::Error;
use tokio_util::sync::CancellationToken;

/// Why a context is done.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ContextError {
    #[error("context canceled")]
    Canceled,

    #[error("context deadline exceeded")]
    DeadlineExceeded,
}

#[derive(Debug, Clone, Default)]
pub struct Context {
    deadline: Option<Instant>,
    cancel: Option<CancellationToken>,
}

impl Context {
    /// A context that is never canceled and has no deadline.
    pub fn background() -> Self {
        Self::default()
    }

    /// A context canceled together with `token`.
    pub fn with_token(token: CancellationToken) -> Self {
        Self {
            deadline: None,
            cancel: Some(token),
        }
    }

    pub fn with_timeout(&self, timeout: Duration) -> Self {
        match Instant::now().checked_add(timeout) {
            Some(deadline) => self.with_deadline(deadline),
            None => self.clone(),
        }
    }

    pub fn with_deadline(&self, deadline: Instant) -> Self {
        let deadline = match self.deadline {
            Some(parent) if parent < deadline => parent,
            _ => deadline,
        };
        Self {
            deadline: Some(deadline),
            cancel: self.cancel.clone(),
        }
    }

    /// Derive a child that is canceled when the returned token fires.
    ///
    /// The token is a child of this context's token, so cancelling the
    /// parent still reaches it while cancelling it leaves the parent alone.
    pub fn with_cancel(&self) -> (Self, CancellationToken) {
        let token = match &self.cancel {
            Some(parent) => parent.child_token(),
            None => CancellationToken::new(),
        };
        let child = Self {
            deadline: self.deadline,
            cancel: Some(token.clone()),
        };
        (child, token)
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// `None` for contexts that can never be canceled.
    pub fn cancellation(&self) -> Option<&CancellationToken> {
        self.cancel.as_ref()
    }

    /// Time left before the deadline, zero once it has passed.
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|d| d.saturating_duration_since(Instant::now()))
    }

    /// `Some` once the context is canceled or past its deadline.
    /// Cancellation wins when both apply.
    pub fn err(&self) -> Option<ContextError> {
        if self.cancel.as_ref().is_some_and(CancellationToken::is_cancelled) {
            return Some(ContextError::Canceled);
        }
        match self.deadline {
            Some(d) if Instant::now() >= d => Some(ContextError::DeadlineExceeded),
            _ => None,
        }
    }
}
