//! Work-status broadcast between the clock and whoever displays it
//! (status line, sidebar, ...).
//!
//! Subscribers are called in subscription order on the publishing thread.
//! A subscriber may subscribe, unsubscribe or publish from inside its
//! callback. An unsubscription takes effect immediately, including for the
//! remainder of every publish in progress; a subscription made during a
//! publish receives the next one. A callback is never re-entered: a nested
//! publish skips the subscriber that triggered it.

use crate::models::status::WorkStatus;
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Callback = Rc<RefCell<dyn FnMut(&WorkStatus)>>;

#[derive(Default)]
struct Inner {
    next_id: u64,
    subscribers: Vec<(SubscriptionId, Callback)>,
    last: Option<WorkStatus>,
}

impl Inner {
    fn contains(&self, id: SubscriptionId) -> bool {
        self.subscribers.iter().any(|(sid, _)| *sid == id)
    }
}

/// Cheap to clone: every clone talks to the same subscriber list.
#[derive(Clone, Default)]
pub struct StatusBus {
    inner: Rc<RefCell<Inner>>,
}

impl StatusBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&self, callback: F) -> SubscriptionId
    where
        F: FnMut(&WorkStatus) + 'static,
    {
        let mut inner = self.inner.borrow_mut();
        inner.next_id += 1;
        let id = SubscriptionId(inner.next_id);
        let callback: Callback = Rc::new(RefCell::new(callback));
        inner.subscribers.push((id, callback));
        id
    }

    /// Returns `false` if the id was unknown (already removed).
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut inner = self.inner.borrow_mut();
        let before = inner.subscribers.len();
        inner.subscribers.retain(|(sid, _)| *sid != id);
        inner.subscribers.len() != before
    }

    pub fn publish(&self, status: WorkStatus) {
        let snapshot: Vec<(SubscriptionId, Callback)> = {
            let mut inner = self.inner.borrow_mut();
            inner.last = Some(status);
            inner.subscribers.clone()
        };

        for (id, callback) in snapshot {
            if !self.inner.borrow().contains(id) {
                continue;
            }
            // already running further up the stack
            let Ok(mut callback) = callback.try_borrow_mut() else {
                continue;
            };
            (&mut *callback)(&status);
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.borrow().subscribers.len()
    }

    /// Most recently published status.
    pub fn last(&self) -> Option<WorkStatus> {
        self.inner.borrow().last
    }
}
