// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Type-erased style values.
//!
//! This module provides [`StyleValue`] for storing style values of any type
//! in a heterogeneous collection.

use alloc::rc::Rc;
use core::any::{Any, TypeId};
use core::fmt;

/// A type-erased, shared style value.
///
/// Any `'static` type with [`PartialEq`] and [`Debug`](fmt::Debug) can be
/// stored. Cloning a `StyleValue` only bumps a reference count, so resolved
/// values can be handed out freely on every layout and render pass.
///
/// [`StyleValue::NULL`] is an explicit "no value" that still counts as set.
/// Absence of a value ("undefined") is expressed as `Option::<StyleValue>::None`
/// throughout the crate, which keeps the two distinguishable.
///
/// Two values are equal when both are null, when they share the same
/// allocation, or when they hold the same type and compare equal.
///
/// # Example
///
/// ```rust
/// use trellis_style::StyleValue;
///
/// let width = StyleValue::new(40.0_f64);
/// assert!(width.is::<f64>());
/// assert_eq!(width.downcast_ref::<f64>(), Some(&40.0));
/// assert_eq!(width.downcast_ref::<i32>(), None);
///
/// assert_eq!(width, StyleValue::new(40.0_f64));
/// assert!(StyleValue::NULL.is_null());
/// assert_ne!(StyleValue::NULL, width);
/// ```
#[derive(Clone)]
pub struct StyleValue {
    inner: Option<Rc<dyn AnyValue>>,
}

impl StyleValue {
    /// The explicit null value.
    pub const NULL: Self = Self { inner: None };

    /// Creates a new value from a concrete value.
    #[must_use]
    pub fn new<T: PartialEq + fmt::Debug + 'static>(value: T) -> Self {
        Self {
            inner: Some(Rc::new(value)),
        }
    }

    /// Returns `true` if this is [`StyleValue::NULL`].
    #[must_use]
    #[inline]
    pub fn is_null(&self) -> bool {
        self.inner.is_none()
    }

    /// Returns the [`TypeId`] of the contained value, or `None` for null.
    #[must_use]
    pub fn value_type_id(&self) -> Option<TypeId> {
        self.inner.as_deref().map(|v| v.as_any().type_id())
    }

    /// Returns `true` if the contained value is of type `T`.
    #[must_use]
    #[inline]
    pub fn is<T: 'static>(&self) -> bool {
        self.inner.as_deref().is_some_and(|v| v.as_any().is::<T>())
    }

    /// Attempts to downcast to a reference of type `T`.
    ///
    /// Returns `None` for null or if the contained value is not of type `T`.
    #[must_use]
    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        self.inner.as_deref().and_then(|v| v.as_any().downcast_ref())
    }

    /// Returns `true` if both values share one allocation (or are both null).
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        match (&self.inner, &other.inner) {
            (None, None) => true,
            (Some(a), Some(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl PartialEq for StyleValue {
    fn eq(&self, other: &Self) -> bool {
        match (&self.inner, &other.inner) {
            (None, None) => true,
            (Some(a), Some(b)) => Rc::ptr_eq(a, b) || a.dyn_eq(b.as_any()),
            _ => false,
        }
    }
}

impl fmt::Debug for StyleValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.inner {
            None => f.write_str("StyleValue::NULL"),
            Some(v) => {
                f.write_str("StyleValue(")?;
                v.dyn_debug(f)?;
                f.write_str(")")
            }
        }
    }
}

/// Trait object for type-erased values that can be compared and printed.
trait AnyValue: Any {
    fn as_any(&self) -> &dyn Any;
    fn dyn_eq(&self, other: &dyn Any) -> bool;
    fn dyn_debug(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result;
}

impl<T: PartialEq + fmt::Debug + 'static> AnyValue for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn dyn_eq(&self, other: &dyn Any) -> bool {
        other.downcast_ref::<T>().is_some_and(|other| self == other)
    }

    fn dyn_debug(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}
