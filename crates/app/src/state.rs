//! Observable per-surface state.
//!
//! Each surface keeps its fields in a `watch` channel: the orchestrator
//! mutates them and any number of UI subscribers see every change. The busy
//! flag is claimed atomically and released by a guard, so a surface can never
//! be left busy after a request ends, whatever the outcome.

use tokio::sync::watch;

pub trait SurfaceState: Clone + Send + Sync + 'static {
    fn is_busy(&self) -> bool;
    fn set_busy(&mut self, busy: bool);
}

pub struct SurfaceCell<S> {
    tx: watch::Sender<S>,
}

impl<S: SurfaceState> SurfaceCell<S> {
    pub fn new(initial: S) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx }
    }

    /// Receive a notification after every state change
    pub fn subscribe(&self) -> watch::Receiver<S> {
        self.tx.subscribe()
    }

    pub fn snapshot(&self) -> S {
        self.tx.borrow().clone()
    }

    pub fn read<R>(&self, f: impl FnOnce(&S) -> R) -> R {
        f(&self.tx.borrow())
    }

    pub fn update(&self, f: impl FnOnce(&mut S)) {
        self.tx.send_modify(f);
    }

    /// Claim the busy flag if the surface is idle and `accept` agrees.
    ///
    /// `start` runs under the same lock as the check, so no other submission
    /// can slip in between. Returns `None` (and changes nothing) on rejection.
    pub fn try_begin(
        &self,
        accept: impl FnOnce(&S) -> bool,
        start: impl FnOnce(&mut S),
    ) -> Option<BusyGuard<'_, S>> {
        let claimed = self.tx.send_if_modified(|s| {
            if s.is_busy() || !accept(s) {
                return false;
            }
            s.set_busy(true);
            start(s);
            true
        });
        claimed.then(|| BusyGuard { cell: self })
    }
}

/// Clears the busy flag when dropped
pub struct BusyGuard<'a, S: SurfaceState> {
    cell: &'a SurfaceCell<S>,
}

impl<S: SurfaceState> BusyGuard<'_, S> {
    /// Apply the outcome of the request while still holding the flag
    pub fn finish(&self, f: impl FnOnce(&mut S)) {
        self.cell.update(f);
    }
}

impl<S: SurfaceState> Drop for BusyGuard<'_, S> {
    fn drop(&mut self) {
        self.cell.update(|s| s.set_busy(false));
    }
}
