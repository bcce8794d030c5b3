//! One-shot start gate between the vendor and the customer.

use std::sync::Arc;

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GateState {
    Closed,
    Open,
    Abandoned,
}

/// How a wait on the gate ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateSignal {
    /// The vendor released its first ticket.
    Opened,
    /// The vendor finished without releasing anything.
    Abandoned,
    /// The waiter's own token fired first.
    Cancelled,
}

/// Single-use broadcast signal marking that the vendor has started.
///
/// Leaves the closed state at most once, either by [`open`](Self::open) or by
/// [`abandon`](Self::abandon). Every waiter is released by that transition,
/// including waiters that arrive after it.
#[derive(Debug, Clone)]
pub struct StartGate {
    tx: Arc<watch::Sender<GateState>>,
}

impl Default for StartGate {
    fn default() -> Self {
        Self::new()
    }
}

impl StartGate {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(GateState::Closed);
        Self { tx: Arc::new(tx) }
    }

    /// Open the gate. Returns true only for the call that opened it.
    pub fn open(&self) -> bool {
        self.transition(GateState::Open)
    }

    /// Release waiters without opening. Returns false if the gate had already left the closed state.
    pub fn abandon(&self) -> bool {
        self.transition(GateState::Abandoned)
    }

    pub fn is_open(&self) -> bool {
        *self.tx.borrow() == GateState::Open
    }

    /// Wait until the gate opens or is abandoned, or until `cancel` fires.
    pub async fn wait(&self, cancel: &CancellationToken) -> GateSignal {
        let mut rx = self.tx.subscribe();
        tokio::select! {
            biased;
            _ = cancel.cancelled() => GateSignal::Cancelled,
            state = rx.wait_for(|state| *state != GateState::Closed) => match state.map(|s| *s) {
                Ok(GateState::Open) => GateSignal::Opened,
                // The sender lives in `self`, so `wait_for` cannot see a closed channel.
                _ => GateSignal::Abandoned,
            },
        }
    }

    fn transition(&self, to: GateState) -> bool {
        self.tx.send_if_modified(|state| {
            if *state == GateState::Closed {
                *state = to;
                true
            } else {
                false
            }
        })
    }
}
