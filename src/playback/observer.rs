//! Change subscribers.
//!
//! A plain observer list: callbacks receive each new [`PlaybackState`] and
//! [`Subscription::unsubscribe`] removes them again. Unsubscribing is allowed
//! from inside a callback; removals requested during a notification take
//! effect before the next callback runs.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use super::types::{EngineEvent, PlaybackState};

type Callback = Box<dyn FnMut(&PlaybackState)>;

/// Optional hook receiving every engine transition
pub type TraceHook = Box<dyn FnMut(&EngineEvent)>;

#[derive(Default)]
struct Shared {
    entries: RefCell<Vec<(u64, Callback)>>,
    removed: RefCell<Vec<u64>>,
    next_id: RefCell<u64>,
}

impl Shared {
    fn is_removed(&self, id: u64) -> bool {
        self.removed.borrow().contains(&id)
    }

    fn purge(&self) {
        let removed: Vec<u64> = self.removed.borrow_mut().drain(..).collect();
        if !removed.is_empty() {
            self.entries
                .borrow_mut()
                .retain(|(id, _)| !removed.contains(id));
        }
    }
}

/// Subscriber list owned by an engine
#[derive(Default)]
pub(crate) struct Subscribers {
    shared: Rc<Shared>,
}

impl Subscribers {
    pub fn subscribe(&self, callback: Callback) -> Subscription {
        let id = {
            let mut next = self.shared.next_id.borrow_mut();
            *next += 1;
            *next
        };
        self.shared.entries.borrow_mut().push((id, callback));
        Subscription {
            id,
            shared: Rc::downgrade(&self.shared),
        }
    }

    pub fn notify(&self, state: &PlaybackState) {
        self.shared.purge();
        {
            let mut entries = self.shared.entries.borrow_mut();
            for (id, callback) in entries.iter_mut() {
                if !self.shared.is_removed(*id) {
                    callback(state);
                }
            }
        }
        self.shared.purge();
    }

    pub fn len(&self) -> usize {
        self.shared.purge();
        self.shared.entries.borrow().len()
    }
}

/// Handle returned by `subscribe`; call [`unsubscribe`](Self::unsubscribe)
/// to stop receiving updates. Dropping the handle keeps the callback alive.
#[derive(Debug, Clone)]
pub struct Subscription {
    id: u64,
    shared: Weak<Shared>,
}

impl Subscription {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn unsubscribe(self) {
        if let Some(shared) = self.shared.upgrade() {
            shared.removed.borrow_mut().push(self.id);
        }
    }
}
