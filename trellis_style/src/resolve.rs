// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Resolution context for the full cascade.
//!
//! This module provides [`ResolveCx`], which layers proxy forwarding and
//! container inheritance on top of each object's own [`Styleable`] state.

use alloc::vec::Vec;
use core::cmp::Ordering;
use core::marker::PhantomData;

use crate::component::{ComponentFactories, ComponentKind};
use crate::data::{Priority, StyleData, compare_priority, level};
use crate::definition::{StyleDefinition, collect_definitions};
use crate::object::{ParentLookup, StyledObject};
use crate::styleable::Styleable;
use crate::value::StyleValue;

/// Proxy hops followed before a name is resolved locally instead.
///
/// Containment is a tree, but proxies can be pointed at each other.
const MAX_PROXY_HOPS: u8 = 16;

/// Resolution context bundling the object lookup.
///
/// Precedence, strongest first:
///
/// **Proxy → Instance → Definitions → Default definitions → Class default →
/// Container (inheritable styles only)**
///
/// A proxied name is answered entirely by the proxy's source, including the
/// source's own [`StyleData`]. An inheritable name that no instance or
/// definition layer sets takes the container's resolved value; the object's
/// own class default is used only when the container chain yields nothing.
///
/// Each container answers with its own full resolution. A container whose
/// type treats the name as [`StyleKind::Normal`](crate::StyleKind::Normal)
/// does not defer to its own container, so it ends the walk: with its local
/// value if it has one, otherwise with nothing, and the object falls back to
/// its class default.
///
/// # Type Parameters
///
/// * `K` - The key type for objects (e.g., `u32`, `NodeId`)
/// * `F` - The lookup function type
///
/// # Example
///
/// ```rust
/// use std::collections::BTreeMap;
/// use trellis_style::{
///     ResolveCx, StyleKind, StyleValue, StyledObject, Styleable, TypeDeclaration,
///     TypeRegistry, level,
/// };
///
/// struct Widget {
///     key: u32,
///     parent: Option<u32>,
///     style: Styleable<u32>,
/// }
///
/// impl StyledObject<u32> for Widget {
///     fn styleable(&self) -> &Styleable<u32> { &self.style }
///     fn styleable_mut(&mut self) -> &mut Styleable<u32> { &mut self.style }
///     fn key(&self) -> u32 { self.key }
///     fn parent_key(&self) -> Option<u32> { self.parent }
/// }
///
/// let mut registry = TypeRegistry::new();
/// let panel = registry
///     .register(
///         TypeDeclaration::new("Panel")
///             .style("FontSize", StyleKind::Inheritable)
///             .default("FontSize", StyleValue::new(12_u32)),
///     )
///     .unwrap();
///
/// let mut outer = Widget { key: 1, parent: None, style: Styleable::new(1, registry.styles(panel)) };
/// let inner = Widget { key: 2, parent: Some(1), style: Styleable::new(2, registry.styles(panel)) };
/// outer.style.set_style("FontSize", StyleValue::new(16_u32));
///
/// let widgets: BTreeMap<u32, &Widget> = [(1, &outer), (2, &inner)].into_iter().collect();
/// let cx = ResolveCx::new(|key: u32| widgets.get(&key).map(|w| (w.styleable(), w.parent_key())));
///
/// let data = cx.get_style_data(&inner, "FontSize");
/// assert_eq!(data.value, Some(StyleValue::new(16_u32)));
/// assert_eq!(data.priority.levels(), &[level::INHERITED, level::INSTANCE]);
/// assert_eq!(cx.get_style_as::<u32, _>(&inner, "FontSize"), Some(16));
/// ```
pub struct ResolveCx<'a, K, F>
where
    K: Copy + Eq + 'a,
    F: ParentLookup<'a, K>,
{
    /// Returns (styleable, `parent_key`) for a given key.
    lookup: F,
    _marker: PhantomData<&'a K>,
}

impl<'a, K, F> core::fmt::Debug for ResolveCx<'a, K, F>
where
    K: Copy + Eq + 'a,
    F: ParentLookup<'a, K>,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ResolveCx")
            .field("lookup", &core::any::type_name::<F>())
            .finish()
    }
}

impl<'a, K, F> ResolveCx<'a, K, F>
where
    K: Copy + Eq + 'a,
    F: ParentLookup<'a, K>,
{
    /// Creates a new resolution context.
    pub fn new(lookup: F) -> Self {
        Self {
            lookup,
            _marker: PhantomData,
        }
    }

    /// Resolves `name` on `object` through the full cascade.
    pub fn get_style_data<O>(&self, object: &O, name: &str) -> StyleData
    where
        O: StyledObject<K>,
    {
        self.resolve(object.styleable(), object.parent_key(), name, 0)
    }

    /// Resolves `name` on the object with the given key.
    ///
    /// Returns `None` if the lookup does not know `key`.
    pub fn get_style_data_for_key(&self, key: K, name: &str) -> Option<StyleData> {
        let (styleable, parent) = self.lookup.lookup(key)?;
        Some(self.resolve(styleable, parent, name, 0))
    }

    /// Resolves the value of `name` on `object`.
    ///
    /// `None` means the style is not set anywhere; an explicit null is
    /// `Some(StyleValue::NULL)`.
    pub fn get_style<O>(&self, object: &O, name: &str) -> Option<StyleValue>
    where
        O: StyledObject<K>,
    {
        self.get_style_data(object, name).value
    }

    /// Resolves `name` on `object` and reads it as a `T`.
    ///
    /// Returns `None` when unset, null, or of another type.
    pub fn get_style_as<T, O>(&self, object: &O, name: &str) -> Option<T>
    where
        T: Clone + 'static,
        O: StyledObject<K>,
    {
        self.get_style_data(object, name).value_as::<T>().cloned()
    }

    /// Picks between a state-specific style and its generic counterpart.
    ///
    /// The state-specific style (say `UpTextColor`) wins only if it is set
    /// and was resolved at equal or higher precedence than the generic one
    /// (say `TextColor`). A generic color set on the instance therefore
    /// beats a state color that only comes from the class defaults.
    pub fn state_style<O>(&self, object: &O, specific: &str, generic: &str) -> StyleData
    where
        O: StyledObject<K>,
    {
        let specific = self.get_style_data(object, specific);
        let generic = self.get_style_data(object, generic);
        if specific.is_set() && compare_priority(&specific, &generic) != Ordering::Less {
            specific
        } else {
            generic
        }
    }

    /// Collects the definitions a composite pushes onto the part in `slot`.
    ///
    /// The list holds every class-level definition for the slot across the
    /// owner's type chain, base type first, followed by the definitions the
    /// owner resolves for the slot from its instance or attached
    /// definitions. Later entries win once attached.
    pub fn sub_style_definitions<O>(&self, owner: &O, slot: &str) -> Vec<StyleDefinition>
    where
        O: StyledObject<K>,
    {
        let styleable = owner.styleable();
        let mut definitions = styleable.styles().sub_style_definitions(slot);
        let data = self.get_style_data(owner, slot);
        if let Some(value) = &data.value
            && data.priority.level().is_some_and(|l| l < level::CLASS)
            && !collect_definitions(value, &mut definitions)
        {
            log::warn!(
                "{}: sub-style `{slot}` holds a value that is not a style definition: {value:?}",
                styleable.styles().name()
            );
        }
        definitions
    }

    /// Replaces the default definitions of `target` with the sub-style
    /// definitions `owner` resolves for `slot`.
    ///
    /// Call again whenever the owner's slot value or attached definitions
    /// change; the previous list is detached.
    pub fn apply_sub_styles<O>(&self, owner: &O, slot: &str, target: &mut Styleable<K>)
    where
        O: StyledObject<K>,
    {
        let definitions = self.sub_style_definitions(owner, slot);
        log::debug!(
            "{}: applying {} definitions from sub-style `{slot}` to {}",
            owner.styleable().styles().name(),
            definitions.len(),
            target.styles().name()
        );
        target.set_default_style_definitions(definitions);
    }

    /// Builds the component named by style `name` on `object`.
    ///
    /// Returns `None` if the style is unset or null, does not hold a
    /// [`ComponentKind`], or names a kind with no registered factory.
    pub fn create_component<O, C>(
        &self,
        object: &O,
        name: &str,
        factories: &ComponentFactories<C>,
    ) -> Option<C>
    where
        O: StyledObject<K>,
    {
        let value = self.get_style(object, name)?;
        if value.is_null() {
            return None;
        }
        let Some(kind) = value.downcast_ref::<ComponentKind>().copied() else {
            log::warn!("style `{name}` is not a component kind: {value:?}");
            return None;
        };
        let component = factories.create(kind);
        if component.is_none() {
            log::warn!("no component factory registered for `{kind}` (style `{name}`)");
        }
        component
    }

    fn resolve(
        &self,
        styleable: &Styleable<K>,
        parent: Option<K>,
        name: &str,
        proxy_hops: u8,
    ) -> StyleData {
        if let Some(proxy) = styleable.style_proxy()
            && proxy.forwards(name)
        {
            if proxy_hops >= MAX_PROXY_HOPS {
                log::warn!(
                    "{}: proxy chain for `{name}` exceeds {MAX_PROXY_HOPS} hops; resolving locally",
                    styleable.styles().name()
                );
            } else if let Some((source, source_parent)) = self.lookup.lookup(proxy.source()) {
                log::trace!(
                    "{}: forwarding `{name}` to {}",
                    styleable.styles().name(),
                    source.styles().name()
                );
                return self.resolve(source, source_parent, name, proxy_hops + 1);
            } else {
                log::warn!(
                    "{}: proxy source for `{name}` not found; resolving locally",
                    styleable.styles().name()
                );
            }
        }

        let local = styleable.resolve_local(name);
        if !local.defers_to_parent {
            return local.data;
        }

        if let Some(parent_key) = parent
            && let Some((container, grandparent)) = self.lookup.lookup(parent_key)
        {
            let inherited = self.resolve(container, grandparent, name, proxy_hops);
            if inherited.value.is_some() {
                let mut data = local.data;
                data.priority = Priority::inherited_from(&inherited.priority);
                data.value = inherited.value;
                return data;
            }
        }
        local.data
    }
}
