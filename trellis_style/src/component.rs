// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Named component factories.
//!
//! Composite widgets let users pick the class of a nested part (a skin, an
//! icon, a header renderer) through a style. The style holds a
//! [`ComponentKind`] tag; the host registers one factory per tag in a
//! [`ComponentFactories`] table, and
//! [`ResolveCx::create_component`](crate::ResolveCx::create_component)
//! resolves the tag through the cascade and calls the matching factory.

use alloc::boxed::Box;
use core::fmt;

use hashbrown::HashMap;

/// A tag naming a kind of component.
///
/// Stored as an ordinary [`StyleValue`](crate::StyleValue), so it takes
/// part in the cascade like any other style.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ComponentKind(pub &'static str);

impl ComponentKind {
    /// Returns the tag.
    #[must_use]
    #[inline]
    pub const fn name(self) -> &'static str {
        self.0
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

type Factory<C> = Box<dyn Fn() -> C>;

/// A table of constructors keyed by [`ComponentKind`].
///
/// `C` is whatever the host builds components as, typically a boxed trait
/// object.
///
/// # Example
///
/// ```rust
/// use trellis_style::{ComponentFactories, ComponentKind};
///
/// const ROUND: ComponentKind = ComponentKind("RoundSkin");
///
/// let mut factories: ComponentFactories<&'static str> = ComponentFactories::new();
/// factories.register(ROUND, || "round");
///
/// assert_eq!(factories.create(ROUND), Some("round"));
/// assert_eq!(factories.create(ComponentKind("SquareSkin")), None);
/// ```
pub struct ComponentFactories<C> {
    factories: HashMap<ComponentKind, Factory<C>>,
}

impl<C> ComponentFactories<C> {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Registers the constructor for `kind`, replacing any previous one.
    pub fn register<F>(&mut self, kind: ComponentKind, factory: F)
    where
        F: Fn() -> C + 'static,
    {
        if self.factories.insert(kind, Box::new(factory)).is_some() {
            log::debug!("replaced component factory for `{kind}`");
        }
    }

    /// Returns `true` if `kind` has a constructor.
    #[must_use]
    pub fn contains(&self, kind: ComponentKind) -> bool {
        self.factories.contains_key(&kind)
    }

    /// Builds a component of the given kind.
    ///
    /// Returns `None` if no constructor is registered for `kind`.
    #[must_use]
    pub fn create(&self, kind: ComponentKind) -> Option<C> {
        self.factories.get(&kind).map(|factory| factory())
    }

    /// Returns the number of registered kinds.
    #[must_use]
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    /// Returns `true` if no kinds are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

impl<C> Default for ComponentFactories<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> fmt::Debug for ComponentFactories<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.factories.keys()).finish()
    }
}
