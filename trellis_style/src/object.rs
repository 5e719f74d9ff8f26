// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Styled object traits.
//!
//! The containment tree belongs to the host toolkit. This module provides
//! the two seams through which resolution reaches it: [`StyledObject`] for
//! the object being resolved, and [`ParentLookup`] for everything reachable
//! from it by key.

use crate::styleable::Styleable;

/// Looks up an object's style state and its container by key.
///
/// Used by [`ResolveCx`](crate::ResolveCx) to walk the container chain for
/// inheritable styles and to reach proxy sources. Returning `None` ends the
/// walk as if the object had no container.
///
/// Any `Fn(K) -> Option<(&Styleable<K>, Option<K>)>` closure implements this.
pub trait ParentLookup<'a, K: Copy + Eq + 'a> {
    /// Looks up the style state and container key for `key`.
    fn lookup(&self, key: K) -> Option<(&'a Styleable<K>, Option<K>)>;
}

impl<'a, K, F> ParentLookup<'a, K> for F
where
    K: Copy + Eq + 'a,
    F: Fn(K) -> Option<(&'a Styleable<K>, Option<K>)>,
{
    #[inline]
    fn lookup(&self, key: K) -> Option<(&'a Styleable<K>, Option<K>)> {
        self(key)
    }
}

/// An object that carries style state.
///
/// # Example
///
/// ```rust
/// use trellis_style::{StyledObject, Styleable};
///
/// struct Widget {
///     key: u32,
///     parent: Option<u32>,
///     style: Styleable<u32>,
/// }
///
/// impl StyledObject<u32> for Widget {
///     fn styleable(&self) -> &Styleable<u32> {
///         &self.style
///     }
///
///     fn styleable_mut(&mut self) -> &mut Styleable<u32> {
///         &mut self.style
///     }
///
///     fn key(&self) -> u32 {
///         self.key
///     }
///
///     fn parent_key(&self) -> Option<u32> {
///         self.parent
///     }
/// }
/// ```
pub trait StyledObject<K: Copy + Eq> {
    /// Returns the object's style state.
    fn styleable(&self) -> &Styleable<K>;

    /// Returns the object's style state mutably.
    fn styleable_mut(&mut self) -> &mut Styleable<K>;

    /// Returns the key that identifies this object.
    fn key(&self) -> K;

    /// Returns the container's key, if the object is contained.
    fn parent_key(&self) -> Option<K>;
}
