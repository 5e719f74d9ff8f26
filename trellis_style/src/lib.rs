// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trellis Style: the style cascade of a retained-mode widget toolkit.
//!
//! Every visual property ("style") of every widget is computed from, in
//! order of precedence:
//!
//! 1. an instance-level override,
//! 2. zero or more attached, possibly shared [`StyleDefinition`]s, most
//!    recently attached first,
//! 3. definitions pushed onto a sub-component by its owning composite,
//! 4. class-level defaults flattened across the widget's type hierarchy,
//! 5. for [`StyleKind::Inheritable`] styles, the container's resolved value.
//!
//! Styles are queried on every layout and render pass, so each object caches
//! its resolutions and invalidates them precisely when something they depend
//! on changes.
//!
//! ## Core Concepts
//!
//! ### Types
//!
//! Widget types are registered once with a [`TypeRegistry`]. Each
//! [`TypeDeclaration`] lists the styles the type declares, with their
//! [`StyleKind`] and [`Invalidation`] hints, and its class defaults. The
//! registry flattens the base chain into a [`TypeStyles`] table at
//! registration time; instances never walk the chain.
//!
//! ### Objects
//!
//! [`Styleable`] is the per-object state: overrides, attached definitions,
//! an optional [`StyleProxy`], change listeners and the cache. Hosts embed
//! it in their widgets and implement [`StyledObject`].
//!
//! ### Resolution
//!
//! [`ResolveCx`] resolves through the full cascade, following proxies and
//! container links through a [`ParentLookup`]. Results are [`StyleData`]
//! records: the value plus a [`Priority`] saying where it was found, which
//! [`compare_priority`] orders without resolving anything again.
//!
//! ## Quick Start
//!
//! ```rust
//! use trellis_style::{
//!     ResolveCx, StyleDefinition, StyleKind, StyleValue, StyledObject, Styleable,
//!     TypeDeclaration, TypeRegistry,
//! };
//!
//! struct Widget {
//!     key: u32,
//!     style: Styleable<u32>,
//! }
//!
//! impl StyledObject<u32> for Widget {
//!     fn styleable(&self) -> &Styleable<u32> { &self.style }
//!     fn styleable_mut(&mut self) -> &mut Styleable<u32> { &mut self.style }
//!     fn key(&self) -> u32 { self.key }
//!     fn parent_key(&self) -> Option<u32> { None }
//! }
//!
//! let mut registry = TypeRegistry::new();
//! let base = registry
//!     .register(
//!         TypeDeclaration::new("Base")
//!             .style("Color", StyleKind::Normal)
//!             .default("Color", StyleValue::new("#000000")),
//!     )
//!     .unwrap();
//! let derived = registry
//!     .register(TypeDeclaration::new("Derived").extends(base))
//!     .unwrap();
//!
//! let mut widget = Widget { key: 1, style: Styleable::new(1, registry.styles(derived)) };
//! let cx = ResolveCx::new(|_: u32| None);
//! assert_eq!(cx.get_style(&widget, "Color"), Some(StyleValue::new("#000000")));
//!
//! // Attached definitions beat class defaults.
//! let red = StyleDefinition::new().with("Color", StyleValue::new("#FF0000"));
//! widget.style.add_style_definition(red);
//! assert_eq!(cx.get_style(&widget, "Color"), Some(StyleValue::new("#FF0000")));
//!
//! // Instance overrides beat definitions, and clearing one reverts.
//! widget.style.set_style("Color", StyleValue::new("#00FF00"));
//! assert_eq!(cx.get_style(&widget, "Color"), Some(StyleValue::new("#00FF00")));
//! widget.style.clear_style("Color");
//! assert_eq!(cx.get_style(&widget, "Color"), Some(StyleValue::new("#FF0000")));
//! ```
//!
//! ## Sharing
//!
//! A [`StyleDefinition`] can be attached to any number of objects. Mutating
//! it through any handle is visible to every holder on its next resolution;
//! holders listen for its changes and invalidate the affected names before
//! the mutating call returns. Listeners are dispatched from a snapshot, so a
//! listener may mutate styles again within the same call.
//!
//! ## Sub-components
//!
//! A [`StyleKind::SubStyle`] style holds definitions for a nested part.
//! [`ResolveCx::apply_sub_styles`] pushes the class-level and instance-level
//! definitions of a slot onto the part. A style holding a [`ComponentKind`]
//! picks the part's class; [`ResolveCx::create_component`] builds it from a
//! [`ComponentFactories`] table.
//!
//! ## Logging
//!
//! The crate logs through the [`log`] facade: `trace` on cache misses and
//! proxy forwarding, `debug` on registration and definition changes, `warn`
//! when a style holds a value of the wrong shape.
//!
//! ## `no_std` Support
//!
//! This crate is `no_std` and uses `alloc`. It does not depend on `std`.

#![no_std]

extern crate alloc;

mod component;
mod data;
mod definition;
mod error;
mod kind;
mod listener;
mod name;
mod object;
mod proxy;
mod registry;
mod resolve;
mod styleable;
mod value;

pub use component::{ComponentFactories, ComponentKind};
pub use data::{Priority, StyleData, compare_priority, level};
pub use definition::StyleDefinition;
pub use error::RegistryError;
pub use kind::{Invalidation, StyleDeclaration, StyleKind};
pub use listener::{ChangeOrigin, ListenerId, StyleChange};
pub use name::StyleName;
pub use object::{ParentLookup, StyledObject};
pub use proxy::StyleProxy;
pub use registry::{TypeDeclaration, TypeRegistry, TypeStyles, WidgetType};
pub use resolve::ResolveCx;
pub use styleable::Styleable;
pub use value::StyleValue;
