#![forbid(unsafe_code)]

//! Observer registry for slide notifications.
//!
//! A [`ListenerRegistry`] is a cheap, cloneable handle to a shared set of
//! callbacks. Notification iterates over a snapshot of the set, so a callback
//! may add or remove listeners (including itself) through its own clone of the
//! handle while it is being invoked.
//!
//! Single-threaded by construction: the registry is `Rc`-based and `!Send`.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::state::PanelState;

/// Callback invoked with the current slide value and state.
pub type SlideListener = Rc<dyn Fn(f32, PanelState)>;

/// Handle returned on registration, used for removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

#[derive(Default)]
struct Entries {
    next_id: u64,
    listeners: Vec<(ListenerId, SlideListener)>,
}

#[derive(Clone, Default)]
pub struct ListenerRegistry {
    inner: Rc<RefCell<Entries>>,
}

impl fmt::Debug for ListenerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerRegistry")
            .field("len", &self.len())
            .finish()
    }
}

fn same_callback(a: &SlideListener, b: &SlideListener) -> bool {
    // Compare allocation addresses only; vtable pointers are not stable.
    std::ptr::eq(Rc::as_ptr(a).cast::<()>(), Rc::as_ptr(b).cast::<()>())
}

impl ListenerRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a shared callback.
    ///
    /// Registering a callback that is already present returns its existing id.
    pub fn add(&self, listener: SlideListener) -> ListenerId {
        let mut entries = self.inner.borrow_mut();
        if let Some((id, _)) = entries
            .listeners
            .iter()
            .find(|(_, existing)| same_callback(existing, &listener))
        {
            return *id;
        }
        let id = ListenerId(entries.next_id);
        entries.next_id += 1;
        entries.listeners.push((id, listener));
        id
    }

    /// Register a closure.
    pub fn subscribe(&self, f: impl Fn(f32, PanelState) + 'static) -> ListenerId {
        self.add(Rc::new(f))
    }

    /// Remove a listener. Returns `false` if it was not registered.
    pub fn remove(&self, id: ListenerId) -> bool {
        let mut entries = self.inner.borrow_mut();
        let before = entries.listeners.len();
        entries.listeners.retain(|(existing, _)| *existing != id);
        entries.listeners.len() != before
    }

    #[must_use]
    pub fn contains(&self, id: ListenerId) -> bool {
        self.inner
            .borrow()
            .listeners
            .iter()
            .any(|(existing, _)| *existing == id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.borrow().listeners.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.inner.borrow_mut().listeners.clear();
    }

    /// Invoke every listener registered at the time of the call.
    pub(crate) fn notify(&self, value: f32, state: PanelState) {
        let snapshot: Vec<SlideListener> = self
            .inner
            .borrow()
            .listeners
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect();
        for listener in snapshot {
            listener(value, state);
        }
    }
}
