//! Single-slot focus broadcast
//!
//! [`FocusBroker`] carries "this element wants keyboard focus" between the
//! widgets of one window. It holds at most one pending request: publishing
//! overwrites whatever was there, and there is no queue or history.
//!
//! The broker is a cheap handle (`Clone` shares the slot). Create one per
//! focus chain and pass it to every coordinator that takes part in it.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use tokio::sync::watch;

/// Identifies a subscription for [`FocusBroker::unsubscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Subscriber<I> = Rc<dyn Fn(&I)>;

struct BrokerInner<I> {
    slot: watch::Sender<Option<I>>,
    subscribers: Vec<(SubscriptionId, Subscriber<I>)>,
    next_id: u64,
}

/// Publish/subscribe channel for focus requests with single-latest-value semantics
pub struct FocusBroker<I> {
    inner: Rc<RefCell<BrokerInner<I>>>,
}

impl<I> Clone for FocusBroker<I> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<I: Clone + 'static> Default for FocusBroker<I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: fmt::Debug> fmt::Debug for FocusBroker<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("FocusBroker")
            .field("pending", &*inner.slot.borrow())
            .field("subscribers", &inner.subscribers.len())
            .finish()
    }
}

impl<I: Clone + 'static> FocusBroker<I> {
    /// Creates a broker with an empty slot
    #[must_use]
    pub fn new() -> Self {
        let (slot, _) = watch::channel(None);
        Self {
            inner: Rc::new(RefCell::new(BrokerInner {
                slot,
                subscribers: Vec::new(),
                next_id: 0,
            })),
        }
    }

    /// Publishes a focus request.
    ///
    /// Overwrites the pending value, then notifies subscribers synchronously.
    /// Subscribers may publish again from inside their callback.
    pub fn publish(&self, id: I) {
        let subscribers: Vec<Subscriber<I>> = {
            let inner = self.inner.borrow();
            inner.slot.send_replace(Some(id.clone()));
            inner
                .subscribers
                .iter()
                .map(|(_, subscriber)| Rc::clone(subscriber))
                .collect()
        };

        tracing::trace!(subscribers = subscribers.len(), "Focus request published");
        for subscriber in subscribers {
            subscriber(&id);
        }
    }

    /// Registers a callback invoked on every publish.
    pub fn subscribe(&self, callback: impl Fn(&I) + 'static) -> SubscriptionId {
        let mut inner = self.inner.borrow_mut();
        let id = SubscriptionId(inner.next_id);
        inner.next_id += 1;
        inner.subscribers.push((id, Rc::new(callback)));
        id
    }

    /// Registers a callback invoked only when the broadcast id equals `own_id`.
    pub fn subscribe_for(&self, own_id: I, on_claim: impl Fn() + 'static) -> SubscriptionId
    where
        I: PartialEq,
    {
        self.subscribe(move |requested| {
            if *requested == own_id {
                on_claim();
            }
        })
    }

    /// Removes a subscription. Returns false if it was already gone.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut inner = self.inner.borrow_mut();
        let before = inner.subscribers.len();
        inner.subscribers.retain(|(sub_id, _)| *sub_id != id);
        inner.subscribers.len() != before
    }

    /// Returns the pending request without consuming it
    #[must_use]
    pub fn pending(&self) -> Option<I> {
        self.inner.borrow().slot.borrow().clone()
    }

    /// Consumes the pending request
    pub fn take(&self) -> Option<I> {
        self.inner.borrow().slot.send_replace(None)
    }

    /// Returns a receiver observing the slot, for async consumers
    #[must_use]
    pub fn watch(&self) -> watch::Receiver<Option<I>> {
        self.inner.borrow().slot.subscribe()
    }

    /// Number of registered callbacks
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.inner.borrow().subscribers.len()
    }
}
