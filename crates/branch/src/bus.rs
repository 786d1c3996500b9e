//! Cross-component broadcast for branch switches.
//!
//! Parts of the UI that cannot reach the registry directly (non-descendant
//! widgets, legacy screens) announce a branch switch on this bus instead; the
//! registry drains its subscription and re-runs the switch itself. The bus is
//! for distribution only — it persists nothing and the registry stays the
//! single writer of the current-branch pointer.

use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::{Mutex, PoisonError};

use sentryops_core::BranchId;

/// Payload of the `branch-changed` broadcast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchChanged {
    pub branch_id: BranchId,
}

/// A subscription to the broadcast stream.
///
/// Each subscription gets a copy of every message published after it was
/// taken. Designed for single-consumer draining from the event loop.
#[derive(Debug)]
pub struct Subscription<M> {
    receiver: Receiver<M>,
}

impl<M> Subscription<M> {
    pub fn new(receiver: Receiver<M>) -> Self {
        Self { receiver }
    }

    /// Take the next pending message without blocking.
    pub fn try_recv(&self) -> Option<M> {
        self.receiver.try_recv().ok()
    }

    /// Drain every pending message.
    pub fn drain(&self) -> Vec<M> {
        let mut out = Vec::new();
        while let Some(m) = self.try_recv() {
            out.push(m);
        }
        out
    }
}

/// In-memory broadcast bus for [`BranchChanged`] messages.
///
/// Broadcast semantics: every subscriber receives every publish. Subscribers
/// whose receiving end has been dropped are pruned on the next publish.
#[derive(Debug, Default)]
pub struct BranchBus {
    senders: Mutex<Vec<Sender<BranchChanged>>>,
}

impl BranchBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn publish(&self, message: BranchChanged) {
        let mut senders = self.senders.lock().unwrap_or_else(PoisonError::into_inner);
        senders.retain(|s| s.send(message.clone()).is_ok());
    }

    pub fn subscribe(&self) -> Subscription<BranchChanged> {
        let (tx, rx) = channel();
        self.senders.lock().unwrap_or_else(PoisonError::into_inner).push(tx);
        Subscription::new(rx)
    }
}
