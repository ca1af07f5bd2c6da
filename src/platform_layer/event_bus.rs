/*
 * A single-threaded observer registry used to broadcast process-wide display
 * notifications (such as a DPI change) to every interested widget.
 *
 * Subscribers receive a `Subscription` guard. Dropping the guard removes the
 * callback, so a widget that owns its guard can never be called after it has
 * been destroyed. Callbacks are cloned out of the registry before they run,
 * which lets a callback subscribe or unsubscribe while an event is being
 * published.
 */

use super::types::DisplayEvent;

use std::cell::RefCell;
use std::hash::Hash;
use std::rc::{Rc, Weak};

type Callback<E> = Rc<dyn Fn(E)>;

struct Subscriber<E> {
    id: u64,
    events: Vec<E>,
    callback: Callback<E>,
}

struct BusInner<E> {
    next_id: u64,
    subscribers: Vec<Subscriber<E>>,
}

impl<E> BusInner<E> {
    // Returns the removed entries so the caller can drop them after the
    // borrow is released; their callbacks may own further subscriptions.
    fn remove(&mut self, id: u64) -> Vec<Subscriber<E>> {
        let (removed, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.subscribers)
            .into_iter()
            .partition(|s| s.id == id);
        self.subscribers = kept;
        removed
    }
}

pub struct EventBus<E> {
    inner: Rc<RefCell<BusInner<E>>>,
}

impl<E> Clone for EventBus<E> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<E: Copy + Eq + Hash + std::fmt::Debug + 'static> Default for EventBus<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Copy + Eq + Hash + std::fmt::Debug + 'static> EventBus<E> {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(BusInner {
                next_id: 1,
                subscribers: Vec::new(),
            })),
        }
    }

    /*
     * Registers `callback` for every event in `events`. The callback stays
     * registered for as long as the returned guard is alive.
     */
    pub fn subscribe<F>(&self, events: &[E], callback: F) -> Subscription<E>
    where
        F: Fn(E) + 'static,
    {
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_id;
        inner.next_id += 1;
        inner.subscribers.push(Subscriber {
            id,
            events: events.to_vec(),
            callback: Rc::new(callback),
        });
        log::trace!("EventBus: Subscriber {id} registered for {events:?}");
        Subscription {
            id,
            bus: Rc::downgrade(&self.inner),
        }
    }

    /// Calls every callback subscribed to `event`, in subscription order.
    pub fn publish(&self, event: E) {
        let callbacks: Vec<Callback<E>> = self
            .inner
            .borrow()
            .subscribers
            .iter()
            .filter(|s| s.events.contains(&event))
            .map(|s| Rc::clone(&s.callback))
            .collect();
        log::debug!(
            "EventBus: Publishing {event:?} to {} subscriber(s)",
            callbacks.len()
        );
        for callback in callbacks {
            callback(event);
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.borrow().subscribers.len()
    }
}

/*
 * RAII guard for a bus registration. Unsubscribes on drop; if the bus itself
 * is already gone this is a no-op.
 */
pub struct Subscription<E> {
    id: u64,
    bus: Weak<RefCell<BusInner<E>>>,
}

impl<E> Subscription<E> {
    pub fn id(&self) -> u64 {
        self.id
    }
}

impl<E> std::fmt::Debug for Subscription<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

impl<E> Drop for Subscription<E> {
    fn drop(&mut self) {
        if let Some(bus) = self.bus.upgrade() {
            // A callback may drop its own subscription while the bus is publishing;
            // publish only holds a shared borrow while collecting callbacks.
            let removed = match bus.try_borrow_mut() {
                Ok(mut inner) => inner.remove(self.id),
                Err(_) => {
                    log::warn!(
                        "EventBus: Could not unregister subscriber {}; bus is busy",
                        self.id
                    );
                    Vec::new()
                }
            };
            if !removed.is_empty() {
                log::trace!("EventBus: Subscriber {} unregistered", self.id);
            }
            drop(removed);
        }
    }
}

thread_local! {
    static PROCESS_BUS: EventBus<DisplayEvent> = EventBus::new();
}

/// The process-wide display event bus of the current UI thread.
pub fn process_bus() -> EventBus<DisplayEvent> {
    PROCESS_BUS.with(|bus| bus.clone())
}
