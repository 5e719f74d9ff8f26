// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Registration errors.

use crate::registry::WidgetType;

/// An error returned by [`TypeRegistry::register`](crate::TypeRegistry::register).
#[derive(Copy, Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// A type with this name is already registered.
    #[error("widget type `{0}` is already registered")]
    DuplicateType(&'static str),
    /// The declared base type was not issued by this registry.
    #[error("widget type `{name}` extends {base:?}, which this registry did not issue")]
    UnknownBase {
        /// The type being registered.
        name: &'static str,
        /// The unknown base handle.
        base: WidgetType,
    },
    /// The registry cannot hold any more types.
    #[error("too many widget types registered (max {})", u16::MAX)]
    TooManyTypes,
}
