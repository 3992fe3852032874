//! Payload-less refresh notifications between independent screens.
//!
//! A mutating screen publishes; every subscribed screen re-fetches its own
//! state. The bus carries no delta — it signals "shared state changed", not
//! "what changed". It is an explicitly constructed object handed down from
//! the app context, never ambient global state, so tests construct a fresh
//! instance each.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::{Arc, Mutex, PoisonError, Weak};

type RefreshCallback = Arc<dyn Fn() + Send + Sync>;

#[derive(Default)]
struct BusInner {
    next_id: u64,
    subscribers: Vec<(u64, RefreshCallback)>,
}

/// Publish/subscribe registry for refresh events.
///
/// Cloning yields another handle onto the same registry.
#[derive(Clone, Default)]
pub struct RefreshBus {
    inner: Arc<Mutex<BusInner>>,
}

impl RefreshBus {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // Registry mutations are single statements, so a poisoned lock cannot
    // hold a half-applied update; recover the guard instead of propagating.
    fn lock(&self) -> std::sync::MutexGuard<'_, BusInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Registers a callback and returns its subscription handle.
    ///
    /// The callback stays registered until the handle is dropped or
    /// [`RefreshSubscription::unsubscribe`] is called; owners must
    /// deregister when the owning screen unmounts, or the bus keeps firing
    /// into stale handlers.
    #[must_use]
    pub fn subscribe(&self, callback: impl Fn() + Send + Sync + 'static) -> RefreshSubscription {
        let mut guard = self.lock();
        let id = guard.next_id;
        guard.next_id += 1;
        guard.subscribers.push((id, Arc::new(callback)));
        RefreshSubscription {
            id,
            inner: Arc::downgrade(&self.inner),
        }
    }

    /// Invokes every currently subscribed callback synchronously, in
    /// subscription order, on the calling thread.
    ///
    /// Each callback runs inside its own panic boundary: a panicking
    /// subscriber is logged and delivery continues to the rest. Callbacks
    /// are invoked outside the registry lock, so a subscriber may
    /// subscribe or unsubscribe reentrantly; registrations made while a
    /// publish is in flight are first invoked on the next publish.
    pub fn publish(&self) {
        let snapshot: Vec<RefreshCallback> = {
            let guard = self.lock();
            guard
                .subscribers
                .iter()
                .map(|(_, callback)| Arc::clone(callback))
                .collect()
        };

        for callback in snapshot {
            if catch_unwind(AssertUnwindSafe(|| callback())).is_err() {
                tracing::error!("refresh subscriber panicked; continuing delivery");
            }
        }
    }

    /// Number of currently registered callbacks.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.lock().subscribers.len()
    }
}

/// Handle to one registered callback.
///
/// Dropping the handle deregisters the callback; `unsubscribe` does the
/// same eagerly and is a safe no-op when called more than once.
pub struct RefreshSubscription {
    id: u64,
    inner: Weak<Mutex<BusInner>>,
}

impl RefreshSubscription {
    /// Removes exactly the callback this handle was created for.
    pub fn unsubscribe(&self) {
        if let Some(inner) = self.inner.upgrade() {
            let mut guard = inner.lock().unwrap_or_else(PoisonError::into_inner);
            guard.subscribers.retain(|(id, _)| *id != self.id);
        }
    }
}

impl Drop for RefreshSubscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn subscribe_then_publish_invokes_callback_once() {
        let bus = RefreshBus::new();
        let calls = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&calls);
        let subscription = bus.subscribe(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        bus.publish();
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        subscription.unsubscribe();
        bus.publish();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn unsubscribe_twice_is_a_no_op() {
        let bus = RefreshBus::new();
        let subscription = bus.subscribe(|| {});

        subscription.unsubscribe();
        subscription.unsubscribe();
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[test]
    fn unsubscribe_removes_only_its_own_callback() {
        let bus = RefreshBus::new();
        let calls = Arc::new(AtomicUsize::new(0));

        let first = bus.subscribe(|| {});
        let counter = Arc::clone(&calls);
        let _second = bus.subscribe(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        first.unsubscribe();
        bus.publish();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(bus.subscriber_count(), 1);
    }

    #[test]
    fn publish_delivers_in_subscription_order() {
        let bus = RefreshBus::new();
        let order = Arc::new(Mutex::new(Vec::new()));

        let first = Arc::clone(&order);
        let _a = bus.subscribe(move || first.lock().unwrap().push(1));
        let second = Arc::clone(&order);
        let _b = bus.subscribe(move || second.lock().unwrap().push(2));
        let third = Arc::clone(&order);
        let _c = bus.subscribe(move || third.lock().unwrap().push(3));

        bus.publish();
        assert_eq!(*order.lock().unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn panicking_subscriber_does_not_block_later_subscribers() {
        let bus = RefreshBus::new();
        let calls = Arc::new(AtomicUsize::new(0));

        let _bad = bus.subscribe(|| panic!("subscriber failure"));
        let counter = Arc::clone(&calls);
        let _good = bus.subscribe(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        bus.publish();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn dropping_subscription_deregisters() {
        let bus = RefreshBus::new();
        let calls = Arc::new(AtomicUsize::new(0));

        {
            let counter = Arc::clone(&calls);
            let _subscription = bus.subscribe(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            });
        }

        bus.publish();
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[test]
    fn publish_with_no_subscribers_is_harmless() {
        let bus = RefreshBus::new();
        bus.publish();
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[test]
    fn cloned_handles_share_one_registry() {
        let bus = RefreshBus::new();
        let other = bus.clone();
        let calls = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&calls);
        let _subscription = bus.subscribe(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        other.publish();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
