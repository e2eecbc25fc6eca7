//! Change notification with reentrant batching.

use std::collections::BTreeSet;
use std::sync::Arc;

use charsmith_domain::CharacterEvent;
use tracing::debug;

/// Receives the three change channels of a character builder.
#[cfg_attr(test, mockall::automock)]
pub trait CharacterObserver: Send + Sync {
    fn on_event(&self, event: CharacterEvent);
}

/// Delivers events to observers, or holds them while suspended.
///
/// Suspensions nest: only the outermost `resume` delivers, and each pending
/// event kind is delivered once no matter how often it was emitted.
#[derive(Default)]
pub struct Notifier {
    observers: Vec<Arc<dyn CharacterObserver>>,
    suspended: u32,
    pending: BTreeSet<CharacterEvent>,
}

impl Notifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, observer: Arc<dyn CharacterObserver>) {
        self.observers.push(observer);
    }

    pub fn is_suspended(&self) -> bool {
        self.suspended > 0
    }

    pub fn suspend(&mut self) {
        self.suspended += 1;
    }

    /// Ends one suspension; the outermost one flushes pending events.
    pub fn resume(&mut self) {
        self.suspended = self.suspended.saturating_sub(1);
        if self.suspended == 0 {
            self.flush();
        }
    }

    pub fn emit(&mut self, event: CharacterEvent) {
        self.pending.insert(event);
        if !self.is_suspended() {
            self.flush();
        }
    }

    /// Emits several events as one delivery cycle.
    pub fn emit_all(&mut self, events: impl IntoIterator<Item = CharacterEvent>) {
        self.suspend();
        for event in events {
            self.pending.insert(event);
        }
        self.resume();
    }

    fn flush(&mut self) {
        let pending = std::mem::take(&mut self.pending);
        for event in pending {
            debug!(?event, observers = self.observers.len(), "Delivering character event");
            for observer in &self.observers {
                observer.on_event(event);
            }
        }
    }
}
