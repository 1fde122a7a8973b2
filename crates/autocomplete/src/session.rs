use std::time::{Duration, Instant};

use tokio_util::sync::CancellationToken;

use crate::word::MatchBounds;

/// Cooperative cancellation flag, optionally chained to a parent.
///
/// A child reports cancelled as soon as any ancestor is cancelled, while
/// cancelling the child never touches the parent.
#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    inner: CancellationToken,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn child(&self) -> Self {
        Self {
            inner: self.inner.child_token(),
        }
    }

    pub fn cancel(&self) {
        self.inner.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.inner.is_cancelled()
    }

    /// Resolves once this token or one of its ancestors is cancelled.
    pub async fn cancelled(&self) {
        self.inner.cancelled().await;
    }
}

/// Where a searcher runs relative to the host's event loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Dispatch {
    /// The searcher runs on the calling thread before `autocomplete` returns.
    #[default]
    Inline,
    /// The searcher runs on smol's blocking pool; results come back through
    /// `Autocompleter::poll` or `Autocompleter::settle`.
    Background,
}

/// Everything a searcher gets to know about one lookup.
#[derive(Debug, Clone)]
pub struct SearchContext {
    token: CancelToken,
    deadline: Instant,
    bounds: MatchBounds,
}

impl SearchContext {
    pub fn new(token: CancelToken, timeout: Duration, bounds: MatchBounds) -> Self {
        Self {
            token,
            deadline: Instant::now() + timeout,
            bounds,
        }
    }

    /// True once the session was superseded, torn down, or ran out of time.
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled() || Instant::now() >= self.deadline
    }

    pub fn deadline(&self) -> Instant {
        self.deadline
    }

    pub fn remaining(&self) -> Duration {
        self.deadline.saturating_duration_since(Instant::now())
    }

    /// Buffer offsets of the matched word, trigger character included.
    pub fn bounds(&self) -> MatchBounds {
        self.bounds
    }

    pub(crate) fn token(&self) -> &CancelToken {
        &self.token
    }
}

/// One in-flight lookup owned by the controller.
///
/// Dropping the session cancels the token it owns. A session borrowing the
/// controller's long-lived token leaves it alone.
#[derive(Debug)]
pub(crate) struct Session {
    pub(crate) epoch: u64,
    pub(crate) ctx: SearchContext,
    owns_token: bool,
}

impl Session {
    pub(crate) fn start(
        epoch: u64,
        parent: &CancelToken,
        cancel_on_change: bool,
        timeout: Duration,
        bounds: MatchBounds,
    ) -> Self {
        let token = if cancel_on_change {
            parent.child()
        } else {
            parent.clone()
        };
        Self {
            epoch,
            ctx: SearchContext::new(token, timeout, bounds),
            owns_token: cancel_on_change,
        }
    }

    pub(crate) fn is_live(&self) -> bool {
        !self.ctx.is_cancelled()
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if self.owns_token {
            self.ctx.token().cancel();
        }
    }
}
