// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Resolved style records and cascade priorities.

use core::cmp::Ordering;
use core::fmt;

use smallvec::SmallVec;

use crate::name::StyleName;
use crate::value::StyleValue;

/// Cascade levels, the first element of every [`Priority`].
///
/// Smaller levels are stronger.
pub mod level {
    /// Set directly on the instance.
    pub const INSTANCE: u16 = 0;
    /// Found in a user-attached definition; followed by the slot counted
    /// from the most recently attached.
    pub const DEFINITION: u16 = 1;
    /// Found in a definition pushed by an owning composite; followed by the
    /// slot counted from the most recently attached.
    pub const DEFAULT_DEFINITION: u16 = 2;
    /// Class-level default, or not set anywhere.
    pub const CLASS: u16 = 3;
    /// Taken from the container; followed by the container's own priority.
    pub const INHERITED: u16 = 4;
}

/// Where in the cascade a resolved value was found.
///
/// A priority is a short vector of levels, most significant first. It orders
/// two independently resolved values without resolving anything again; see
/// [`Priority::compare`].
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct Priority(SmallVec<[u16; 4]>);

impl Priority {
    /// Creates a priority from its levels.
    #[must_use]
    pub fn from_levels(levels: &[u16]) -> Self {
        Self(SmallVec::from_slice(levels))
    }

    /// Returns the levels, most significant first.
    #[must_use]
    #[inline]
    pub fn levels(&self) -> &[u16] {
        &self.0
    }

    /// Returns the cascade level (the first element), if any.
    #[must_use]
    #[inline]
    pub fn level(&self) -> Option<u16> {
        self.0.first().copied()
    }

    /// Compares two priorities by cascade precedence.
    ///
    /// Returns [`Ordering::Greater`] if `self` takes precedence over `other`.
    /// The vectors are compared from the front; at the first differing
    /// position the numerically smaller element wins. When one vector is a
    /// prefix of the other, the shorter one wins. Equal vectors tie.
    ///
    /// ```rust
    /// use core::cmp::Ordering;
    /// use trellis_style::Priority;
    ///
    /// let instance = Priority::from_levels(&[0]);
    /// let definition = Priority::from_levels(&[1, 2]);
    /// assert_eq!(instance.compare(&definition), Ordering::Greater);
    /// assert_eq!(definition.compare(&instance), Ordering::Less);
    /// assert_eq!(definition.compare(&definition.clone()), Ordering::Equal);
    /// ```
    #[must_use]
    pub fn compare(&self, other: &Self) -> Ordering {
        for (a, b) in self.0.iter().zip(other.0.iter()) {
            if a != b {
                return b.cmp(a);
            }
        }
        other.0.len().cmp(&self.0.len())
    }

    /// Returns `true` if `self` takes strictly higher precedence than `other`.
    #[must_use]
    #[inline]
    pub fn outranks(&self, other: &Self) -> bool {
        self.compare(other) == Ordering::Greater
    }

    pub(crate) fn set(&mut self, levels: &[u16]) {
        self.0.clear();
        self.0.extend_from_slice(levels);
    }

    pub(crate) fn inherited_from(parent: &Self) -> Self {
        let mut levels = SmallVec::with_capacity(parent.0.len() + 1);
        levels.push(level::INHERITED);
        levels.extend_from_slice(&parent.0);
        Self(levels)
    }
}

impl fmt::Debug for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.0.iter()).finish()
    }
}

/// The resolved value of one style on one object, with its [`Priority`].
///
/// `value` is `None` when the style is not set anywhere in the cascade.
#[derive(Clone, Debug, PartialEq)]
pub struct StyleData {
    name: StyleName,
    /// The resolved value.
    pub value: Option<StyleValue>,
    /// Where the value was found.
    pub priority: Priority,
}

impl StyleData {
    /// Creates a record for `name` with no value at class level.
    #[must_use]
    pub fn new(name: impl Into<StyleName>) -> Self {
        Self {
            name: name.into(),
            value: None,
            priority: Priority::from_levels(&[level::CLASS]),
        }
    }

    /// Returns the style name.
    #[must_use]
    #[inline]
    pub fn name(&self) -> &StyleName {
        &self.name
    }

    /// Returns the value downcast to `T`.
    ///
    /// Returns `None` when unset, null, or of another type.
    #[must_use]
    pub fn value_as<T: 'static>(&self) -> Option<&T> {
        self.value.as_ref().and_then(StyleValue::downcast_ref::<T>)
    }

    /// Returns `true` if a value was found.
    #[must_use]
    #[inline]
    pub fn is_set(&self) -> bool {
        self.value.is_some()
    }

    pub(crate) fn assign(&mut self, value: Option<StyleValue>, levels: &[u16]) {
        self.value = value;
        self.priority.set(levels);
    }
}

/// Compares two resolved styles by cascade precedence.
///
/// Returns [`Ordering::Greater`] if `a` takes precedence over `b`. This only
/// orders the two records; it never resolves anything.
#[must_use]
pub fn compare_priority(a: &StyleData, b: &StyleData) -> Ordering {
    a.priority.compare(&b.priority)
}
