// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared, mutable style definitions.
//!
//! This module provides [`StyleDefinition`], an ordered bag of style values
//! that many objects can attach at once.

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::RefCell;
use core::fmt;

use crate::kind::Invalidation;
use crate::listener::{ChangeOrigin, ListenerId, Listeners, StyleChange};
use crate::name::StyleName;
use crate::value::StyleValue;

/// A shared, ordered collection of style values.
///
/// A definition is a handle: clones refer to the same underlying storage,
/// and a mutation is visible to every holder on its next resolution.
/// Equality is identity, not content.
///
/// Every mutation that changes a stored value notifies the definition's
/// change listeners synchronously, before the mutating call returns. Objects
/// with the definition attached use this to invalidate their caches.
///
/// # Example
///
/// ```rust
/// use trellis_style::{StyleDefinition, StyleValue};
///
/// let red_text = StyleDefinition::new().with("TextColor", StyleValue::new("#FF0000"));
/// let same = red_text.clone();
///
/// same.set_style("FontSize", StyleValue::new(14_u32));
/// assert_eq!(red_text.get_style("FontSize"), Some(StyleValue::new(14_u32)));
/// assert_eq!(red_text, same);
/// assert_ne!(red_text, StyleDefinition::new());
/// ```
#[derive(Clone, Default)]
pub struct StyleDefinition {
    inner: Rc<DefinitionData>,
}

#[derive(Default)]
struct DefinitionData {
    /// Kept in insertion order.
    entries: RefCell<Vec<(StyleName, StyleValue)>>,
    listeners: Listeners,
}

impl StyleDefinition {
    /// Creates an empty definition.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a style and returns the definition, for building in one expression.
    #[must_use]
    pub fn with(self, name: impl Into<StyleName>, value: StyleValue) -> Self {
        self.set_style(name, value);
        self
    }

    /// Returns the value stored for `name`, if this definition defines it.
    #[must_use]
    pub fn get_style(&self, name: &str) -> Option<StyleValue> {
        self.inner
            .entries
            .borrow()
            .iter()
            .find(|(n, _)| n.as_str() == name)
            .map(|(_, v)| v.clone())
    }

    /// Returns `true` if this definition defines `name`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.inner
            .entries
            .borrow()
            .iter()
            .any(|(n, _)| n.as_str() == name)
    }

    /// Stores a value for `name`.
    ///
    /// Returns `false` without notifying if the stored value is already equal
    /// to `value`.
    pub fn set_style(&self, name: impl Into<StyleName>, value: StyleValue) -> bool {
        let name = name.into();
        let old = {
            let mut entries = self.inner.entries.borrow_mut();
            match entries.iter_mut().find(|(n, _)| *n == name) {
                Some((_, stored)) if *stored == value => return false,
                Some((_, stored)) => Some(core::mem::replace(stored, value.clone())),
                None => {
                    entries.push((name.clone(), value.clone()));
                    None
                }
            }
        };
        self.notify(name, old, Some(value));
        true
    }

    /// Removes `name` from this definition.
    ///
    /// Returns `false` without notifying if it was not defined.
    pub fn clear_style(&self, name: &str) -> bool {
        let removed = {
            let mut entries = self.inner.entries.borrow_mut();
            entries
                .iter()
                .position(|(n, _)| n.as_str() == name)
                .map(|idx| entries.remove(idx))
        };
        match removed {
            Some((name, old)) => {
                self.notify(name, Some(old), None);
                true
            }
            None => false,
        }
    }

    /// Returns the number of styles defined.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.entries.borrow().len()
    }

    /// Returns `true` if no styles are defined.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.entries.borrow().is_empty()
    }

    /// Returns the defined names, in insertion order.
    #[must_use]
    pub fn names(&self) -> Vec<StyleName> {
        self.inner
            .entries
            .borrow()
            .iter()
            .map(|(n, _)| n.clone())
            .collect()
    }

    /// Returns a snapshot of the defined entries, in insertion order.
    #[must_use]
    pub fn entries(&self) -> Vec<(StyleName, StyleValue)> {
        self.inner.entries.borrow().clone()
    }

    /// Registers a listener called after every change to this definition.
    pub fn add_change_listener<F>(&self, listener: F) -> ListenerId
    where
        F: Fn(&StyleChange) + 'static,
    {
        self.inner.listeners.add(listener)
    }

    /// Removes a listener. Returns `false` if it was not registered.
    pub fn remove_change_listener(&self, id: ListenerId) -> bool {
        self.inner.listeners.remove(id)
    }

    /// Returns `true` if both handles refer to the same definition.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    fn notify(&self, name: StyleName, old: Option<StyleValue>, new: Option<StyleValue>) {
        if self.inner.listeners.is_empty() {
            return;
        }
        self.inner.listeners.dispatch(&StyleChange {
            name,
            old,
            new,
            origin: ChangeOrigin::Definition,
            invalidation: Invalidation::empty(),
        });
    }
}

impl PartialEq for StyleDefinition {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for StyleDefinition {}

impl fmt::Debug for StyleDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let entries = self.inner.entries.borrow();
        f.debug_struct("StyleDefinition")
            .field("entries", &*entries)
            .field("listeners", &self.inner.listeners.len())
            .finish()
    }
}

/// Collects the definitions held by a sub-style value into `out`.
///
/// Accepts a single [`StyleDefinition`] or a `Vec` of them; null contributes
/// nothing. Returns `false` for any other kind of value.
pub(crate) fn collect_definitions(value: &StyleValue, out: &mut Vec<StyleDefinition>) -> bool {
    if value.is_null() {
        true
    } else if let Some(definition) = value.downcast_ref::<StyleDefinition>() {
        out.push(definition.clone());
        true
    } else if let Some(list) = value.downcast_ref::<Vec<StyleDefinition>>() {
        out.extend(list.iter().cloned());
        true
    } else {
        false
    }
}
