// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Style change events and listener lists.

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::{Cell, RefCell};
use core::fmt;

use smallvec::SmallVec;

use crate::kind::Invalidation;
use crate::name::StyleName;
use crate::value::StyleValue;

/// Where a [`StyleChange`] originated.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ChangeOrigin {
    /// An instance override was set or cleared.
    Instance,
    /// An attached [`StyleDefinition`](crate::StyleDefinition) changed.
    Definition,
    /// A definition was attached or detached, or a definition list was
    /// replaced.
    Attachment,
}

/// A change to a style value.
///
/// For [`ChangeOrigin::Instance`] and [`ChangeOrigin::Definition`], `old`
/// and `new` are the values stored at the layer named by `origin`: `None`
/// means the layer did not define the style. For
/// [`ChangeOrigin::Attachment`] they are the object's locally resolved
/// values before and after the list changed.
#[derive(Clone, Debug, PartialEq)]
pub struct StyleChange {
    /// The style that changed.
    pub name: StyleName,
    /// The previously stored value.
    pub old: Option<StyleValue>,
    /// The newly stored value.
    pub new: Option<StyleValue>,
    /// The layer the change happened in.
    pub origin: ChangeOrigin,
    /// Passes affected by the style, as declared by the widget type.
    ///
    /// Always empty for events raised by a bare definition, which has no
    /// widget type.
    pub invalidation: Invalidation,
}

/// Handle returned when registering a change listener.
///
/// Handles are unique within the list that issued them.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Callback = Rc<dyn Fn(&StyleChange)>;

/// An ordered list of change listeners.
///
/// Dispatch iterates a snapshot, so listeners may add or remove listeners
/// (or trigger further changes) while being called.
pub(crate) struct Listeners {
    next_id: Cell<u64>,
    entries: RefCell<Vec<(ListenerId, Callback)>>,
}

impl Listeners {
    pub(crate) fn new() -> Self {
        Self {
            next_id: Cell::new(0),
            entries: RefCell::new(Vec::new()),
        }
    }

    pub(crate) fn add<F>(&self, callback: F) -> ListenerId
    where
        F: Fn(&StyleChange) + 'static,
    {
        let id = ListenerId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        let callback: Callback = Rc::new(callback);
        self.entries.borrow_mut().push((id, callback));
        id
    }

    pub(crate) fn remove(&self, id: ListenerId) -> bool {
        let mut entries = self.entries.borrow_mut();
        match entries.iter().position(|(entry, _)| *entry == id) {
            Some(idx) => {
                entries.remove(idx);
                true
            }
            None => false,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    pub(crate) fn dispatch(&self, change: &StyleChange) {
        let snapshot: SmallVec<[Callback; 4]> = self
            .entries
            .borrow()
            .iter()
            .map(|(_, callback)| callback.clone())
            .collect();
        for callback in snapshot {
            callback(change);
        }
    }
}

impl Default for Listeners {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Listeners {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listeners")
            .field("count", &self.len())
            .finish_non_exhaustive()
    }
}
