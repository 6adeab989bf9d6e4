//! Single-flight coordination for token refresh.
//!
//! At most one refresh request is in flight per client. Every 401 observed
//! while that refresh is pending parks itself on the gate and is woken with
//! the shared outcome instead of re-authenticating independently.

use std::sync::Mutex;

use tokio::sync::oneshot;

/// Outcome of a refresh cycle, delivered to every parked waiter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RefreshOutcome {
    /// A new access token was persisted; retry once.
    Refreshed,
    /// The refresh failed; the session is gone.
    Failed,
}

/// What a 401 handler gets back from [`RefreshGate::join`].
pub(crate) enum GateTicket {
    /// This call initiates the refresh and must settle the gate.
    Initiator,
    /// A refresh is already in flight; await its outcome.
    Waiter(oneshot::Receiver<RefreshOutcome>),
}

#[derive(Default)]
struct GateState {
    in_flight: bool,
    // FIFO: waiters are woken in enqueue order.
    waiters: Vec<oneshot::Sender<RefreshOutcome>>,
}

/// Owns the "is a refresh in flight" flag and the pending-request queue.
///
/// The flag flips inside a synchronous critical section, before the
/// initiator reaches any await point, so two concurrent 401s can never
/// both believe they are the initiator.
#[derive(Default)]
pub(crate) struct RefreshGate {
    state: Mutex<GateState>,
}

impl RefreshGate {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Claim the initiator role, or enqueue as a waiter if a refresh is
    /// already running.
    pub(crate) fn join(&self) -> GateTicket {
        let mut state = self
            .state
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);

        if state.in_flight {
            let (tx, rx) = oneshot::channel();
            state.waiters.push(tx);
            GateTicket::Waiter(rx)
        } else {
            state.in_flight = true;
            GateTicket::Initiator
        }
    }

    /// End the refresh cycle: clear the flag and drain every waiter with
    /// `outcome`, in enqueue order. The queue is never left non-empty.
    pub(crate) fn settle(&self, outcome: RefreshOutcome) {
        let waiters = {
            let mut state = self
                .state
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner);
            state.in_flight = false;
            std::mem::take(&mut state.waiters)
        };

        for waiter in waiters {
            // A waiter that gave up (dropped its receiver) is fine to skip.
            let _ = waiter.send(outcome);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn second_joiner_becomes_waiter() {
        let gate = RefreshGate::new();

        let GateTicket::Initiator = gate.join() else {
            panic!("first join must initiate");
        };
        let GateTicket::Waiter(rx) = gate.join() else {
            panic!("second join must wait");
        };

        gate.settle(RefreshOutcome::Refreshed);
        assert_eq!(rx.await.unwrap(), RefreshOutcome::Refreshed);
    }

    #[tokio::test]
    async fn settle_reopens_the_gate() {
        let gate = RefreshGate::new();

        assert!(matches!(gate.join(), GateTicket::Initiator));
        gate.settle(RefreshOutcome::Failed);

        // The cycle ended, so the next 401 initiates a fresh refresh.
        assert!(matches!(gate.join(), GateTicket::Initiator));
        gate.settle(RefreshOutcome::Refreshed);
    }

    #[tokio::test]
    async fn all_waiters_observe_the_same_failure() {
        let gate = RefreshGate::new();
        assert!(matches!(gate.join(), GateTicket::Initiator));

        let receivers: Vec<_> = (0..4)
            .map(|_| match gate.join() {
                GateTicket::Waiter(rx) => rx,
                GateTicket::Initiator => panic!("refresh already in flight"),
            })
            .collect();

        gate.settle(RefreshOutcome::Failed);

        for rx in receivers {
            assert_eq!(rx.await.unwrap(), RefreshOutcome::Failed);
        }
    }
}
