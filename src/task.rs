//! Cancellable task tokens for work that suspends across browser promises.
//!
//! A [`TaskSlot`] holds at most one pending task. Issuing a new token, or
//! cancelling the slot, makes every earlier token stale; the host presents
//! the token again when the promise settles and the owner drops the result
//! if [`TaskSlot::resolve`] says it is no longer wanted.

/// Which asynchronous concern a token belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TaskKind {
    /// Device-orientation permission prompt.
    OrientationPermission,
    /// Clipboard text read.
    ClipboardRead,
    /// Background audio `play()` promise.
    AudioPlayback,
}

/// Proof that a particular asynchronous request was issued.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TaskToken {
    kind: TaskKind,
    generation: u64,
}

/// Single-occupancy slot handing out [`TaskToken`]s.
#[derive(Debug)]
pub struct TaskSlot {
    kind: TaskKind,
    generation: u64,
    pending: Option<u64>,
}

impl TaskSlot {
    /// Empty slot for `kind`.
    #[must_use]
    pub fn new(kind: TaskKind) -> Self {
        Self {
            kind,
            generation: 0,
            pending: None,
        }
    }

    /// Issue a fresh token, superseding any pending one.
    pub fn issue(&mut self) -> TaskToken {
        self.generation += 1;
        self.pending = Some(self.generation);
        TaskToken {
            kind: self.kind,
            generation: self.generation,
        }
    }

    /// Drop the pending task, if any. Its token becomes stale.
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    /// Consume `token`. Returns `true` only for the current pending task;
    /// after that the slot is empty again.
    pub fn resolve(&mut self, token: TaskToken) -> bool {
        if token.kind != self.kind || self.pending != Some(token.generation) {
            return false;
        }
        self.pending = None;
        true
    }
}
