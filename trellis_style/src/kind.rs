// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Style kinds and declarations.

use bitflags::bitflags;

/// How a style participates in resolution.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum StyleKind {
    /// Resolved from the object's own instance, definitions and class.
    #[default]
    Normal,
    /// Like [`StyleKind::Normal`], but a contained object with no local value
    /// takes its container's resolved value.
    ///
    /// The container resolves the name according to its own type. If that
    /// type does not declare the name inheritable, the walk stops there and
    /// anything set further up is not seen.
    Inheritable,
    /// The value is a [`StyleDefinition`](crate::StyleDefinition) (or a
    /// `Vec` of them) applied wholesale to a sub-component. Class defaults
    /// accumulate across the whole type chain.
    SubStyle,
}

bitflags! {
    /// Passes that must be redone when a style changes.
    ///
    /// The engine never acts on these itself; they are handed to listeners so
    /// that widgets invalidate only what a style touches.
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Invalidation: u8 {
        /// The widget's measured size may change.
        const MEASURE = 1;
        /// The widget's children must be laid out again.
        const LAYOUT = 1 << 1;
        /// The widget must be redrawn.
        const RENDER = 1 << 2;
        /// Sub-components built from the style must be rebuilt.
        const CHILDREN = 1 << 3;
    }
}

/// The declaration of one style on a widget type.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct StyleDeclaration {
    /// How the style resolves.
    pub kind: StyleKind,
    /// Passes affected by a change to the style.
    pub invalidation: Invalidation,
}

impl StyleDeclaration {
    /// Creates a declaration of the given kind with no invalidation hints.
    #[must_use]
    pub const fn new(kind: StyleKind) -> Self {
        Self {
            kind,
            invalidation: Invalidation::empty(),
        }
    }

    /// Sets the passes affected by a change to the style.
    #[must_use]
    pub const fn invalidates(mut self, invalidation: Invalidation) -> Self {
        self.invalidation = invalidation;
        self
    }
}

impl From<StyleKind> for StyleDeclaration {
    fn from(kind: StyleKind) -> Self {
        Self::new(kind)
    }
}
