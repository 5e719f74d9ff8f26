// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-object style state.
//!
//! This module provides [`Styleable`], the part of a widget that holds its
//! instance overrides, its attached definitions, an optional proxy, and the
//! cache of locally resolved styles.
//!
//! # Layers
//!
//! Local resolution consults, strongest first:
//!
//! 1. instance overrides set with [`Styleable::set_style`],
//! 2. user definitions, most recently attached first,
//! 3. default definitions pushed by an owning composite,
//! 4. the widget type's class default.
//!
//! Inheritance from the container and proxy forwarding need the object tree
//! and are layered on top by [`ResolveCx`](crate::ResolveCx).
//!
//! # Caching
//!
//! Each resolved name is cached with its [`StyleData`]. Entries are marked
//! stale, never dropped, so a name's record is allocated once per object.
//! Every mutation that can change a name's resolution marks it stale before
//! the mutating call returns, including changes made to an attached
//! definition through any other handle.

use alloc::rc::{Rc, Weak};
use alloc::string::String;
use alloc::vec::Vec;
use core::cell::RefCell;
use core::fmt;

use hashbrown::HashMap;
use smallvec::SmallVec;

use crate::data::{StyleData, level};
use crate::definition::StyleDefinition;
use crate::kind::StyleKind;
use crate::listener::{ChangeOrigin, ListenerId, Listeners, StyleChange};
use crate::name::StyleName;
use crate::proxy::StyleProxy;
use crate::registry::{TypeStyles, WidgetType};
use crate::value::StyleValue;

/// Inline capacity for instance overrides.
///
/// Most widgets override only a handful of styles directly.
const INLINE_CAPACITY: usize = 4;

/// Style state of one object.
///
/// `K` is the key type the host uses to identify objects; it is only stored
/// and handed back, never interpreted here.
///
/// # Example
///
/// ```rust
/// use trellis_style::{
///     StyleDefinition, StyleKind, StyleValue, Styleable, TypeDeclaration, TypeRegistry, level,
/// };
///
/// let mut registry = TypeRegistry::new();
/// let label = registry
///     .register(
///         TypeDeclaration::new("Label")
///             .style("Color", StyleKind::Normal)
///             .default("Color", StyleValue::new("#000000")),
///     )
///     .unwrap();
///
/// let mut node = Styleable::new(1_u32, registry.styles(label));
/// assert_eq!(node.get_local_style_data("Color").value, Some(StyleValue::new("#000000")));
///
/// let red = StyleDefinition::new().with("Color", StyleValue::new("#FF0000"));
/// node.add_style_definition(red);
/// let data = node.get_local_style_data("Color");
/// assert_eq!(data.value, Some(StyleValue::new("#FF0000")));
/// assert_eq!(data.priority.levels(), &[level::DEFINITION, 0]);
///
/// node.set_style("Color", StyleValue::new("#00FF00"));
/// assert_eq!(node.get_local_style_data("Color").value, Some(StyleValue::new("#00FF00")));
///
/// node.clear_style("Color");
/// assert_eq!(node.get_local_style_data("Color").value, Some(StyleValue::new("#FF0000")));
/// ```
pub struct Styleable<K> {
    owner: K,
    /// Sorted by name for binary search.
    overrides: SmallVec<[(StyleName, StyleValue); INLINE_CAPACITY]>,
    /// Oldest first.
    definitions: Vec<Attached>,
    /// Oldest first.
    default_definitions: Vec<Attached>,
    proxy: Option<StyleProxy<K>>,
    shared: Rc<Shared>,
}

/// State reachable from definition listeners.
struct Shared {
    styles: Rc<TypeStyles>,
    cache: RefCell<HashMap<StyleName, CacheEntry>>,
    listeners: Listeners,
}

struct CacheEntry {
    data: StyleData,
    valid: bool,
    defers_to_parent: bool,
}

/// A definition in one of the lists.
///
/// A definition present in both lists is subscribed to once; `listener` is
/// `None` on the entry that does not hold the subscription.
struct Attached {
    definition: StyleDefinition,
    listener: Option<ListenerId>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Layer {
    Definitions,
    Defaults,
}

impl Layer {
    fn other(self) -> Self {
        match self {
            Self::Definitions => Self::Defaults,
            Self::Defaults => Self::Definitions,
        }
    }
}

/// The result of resolving a name against one object's own layers.
#[derive(Clone, Debug)]
pub(crate) struct LocalResolution {
    pub(crate) data: StyleData,
    /// The name is inheritable and no instance or definition layer set it.
    pub(crate) defers_to_parent: bool,
}

impl Shared {
    fn invalidate(&self, name: &str) {
        if let Some(entry) = self.cache.borrow_mut().get_mut(name) {
            entry.valid = false;
        }
    }

    fn invalidate_where(&self, mut stale: impl FnMut(&StyleName, &CacheEntry) -> bool) {
        for (name, entry) in self.cache.borrow_mut().iter_mut() {
            if entry.valid && stale(name, entry) {
                entry.valid = false;
            }
        }
    }

    fn notify(
        &self,
        name: StyleName,
        old: Option<StyleValue>,
        new: Option<StyleValue>,
        origin: ChangeOrigin,
    ) {
        if self.listeners.is_empty() {
            return;
        }
        let invalidation = self.styles.invalidation(name.as_str());
        self.listeners.dispatch(&StyleChange {
            name,
            old,
            new,
            origin,
            invalidation,
        });
    }

    fn definition_changed(&self, change: &StyleChange) {
        log::trace!(
            "{}: attached definition changed `{}`",
            self.styles.name(),
            change.name
        );
        self.invalidate(change.name.as_str());
        self.notify(
            change.name.clone(),
            change.old.clone(),
            change.new.clone(),
            ChangeOrigin::Definition,
        );
    }
}

fn subscribe(shared: &Rc<Shared>, definition: &StyleDefinition) -> ListenerId {
    let weak: Weak<Shared> = Rc::downgrade(shared);
    definition.add_change_listener(move |change| {
        if let Some(shared) = weak.upgrade() {
            shared.definition_changed(change);
        }
    })
}

fn unsubscribe(attached: &Attached) {
    if let Some(listener) = attached.listener {
        attached.definition.remove_change_listener(listener);
    }
}

/// Names defined by any of `definitions`, without repeats.
fn defined_names(definitions: &[StyleDefinition]) -> Vec<StyleName> {
    let mut names: Vec<StyleName> = Vec::new();
    for name in definitions.iter().flat_map(StyleDefinition::names) {
        if !names.contains(&name) {
            names.push(name);
        }
    }
    names
}

fn find_in(list: &[Attached], name: &str) -> Option<(u16, StyleValue)> {
    list.iter()
        .rev()
        .enumerate()
        .find_map(|(slot, attached)| {
            attached
                .definition
                .get_style(name)
                .map(|value| (u16::try_from(slot).unwrap_or(u16::MAX), value))
        })
}

impl<K: Copy + Eq> Styleable<K> {
    /// Creates style state for `owner`, an instance of the type described by
    /// `styles`.
    #[must_use]
    pub fn new(owner: K, styles: Rc<TypeStyles>) -> Self {
        Self {
            owner,
            overrides: SmallVec::new(),
            definitions: Vec::new(),
            default_definitions: Vec::new(),
            proxy: None,
            shared: Rc::new(Shared {
                styles,
                cache: RefCell::new(HashMap::new()),
                listeners: Listeners::new(),
            }),
        }
    }

    /// Returns the owner key.
    #[must_use]
    #[inline]
    pub fn owner(&self) -> K {
        self.owner
    }

    /// Returns the owner's widget type.
    #[must_use]
    #[inline]
    pub fn widget_type(&self) -> WidgetType {
        self.shared.styles.widget_type()
    }

    /// Returns the owner type's flattened style table.
    #[must_use]
    #[inline]
    pub fn styles(&self) -> &Rc<TypeStyles> {
        &self.shared.styles
    }

    // =========================================================================
    // Instance overrides
    // =========================================================================

    #[inline]
    fn find_override(&self, name: &str) -> Result<usize, usize> {
        self.overrides
            .binary_search_by(|(n, _)| n.as_str().cmp(name))
    }

    /// Sets an instance override, the strongest layer.
    ///
    /// [`StyleValue::NULL`] is a real override that hides every weaker layer.
    /// Returns `false` without invalidating or notifying if the same value is
    /// already set.
    pub fn set_style(&mut self, name: impl Into<StyleName>, value: StyleValue) -> bool {
        let name = name.into();
        let old = match self.find_override(name.as_str()) {
            Ok(idx) if self.overrides[idx].1 == value => return false,
            Ok(idx) => Some(core::mem::replace(&mut self.overrides[idx].1, value.clone())),
            Err(idx) => {
                self.overrides.insert(idx, (name.clone(), value.clone()));
                None
            }
        };
        self.shared.invalidate(name.as_str());
        self.shared
            .notify(name, old, Some(value), ChangeOrigin::Instance);
        true
    }

    /// Removes an instance override.
    ///
    /// Returns `false` if `name` had no override.
    pub fn clear_style(&mut self, name: &str) -> bool {
        let Ok(idx) = self.find_override(name) else {
            return false;
        };
        let (name, old) = self.overrides.remove(idx);
        self.shared.invalidate(name.as_str());
        self.shared
            .notify(name, Some(old), None, ChangeOrigin::Instance);
        true
    }

    /// Returns the instance override for `name`, if any.
    #[must_use]
    pub fn get_override(&self, name: &str) -> Option<&StyleValue> {
        self.find_override(name)
            .ok()
            .map(|idx| &self.overrides[idx].1)
    }

    /// Returns the instance overrides, sorted by name.
    pub fn overrides(&self) -> impl Iterator<Item = (&StyleName, &StyleValue)> + '_ {
        self.overrides.iter().map(|(n, v)| (n, v))
    }

    // =========================================================================
    // Definitions
    // =========================================================================

    fn list(&self, layer: Layer) -> &Vec<Attached> {
        match layer {
            Layer::Definitions => &self.definitions,
            Layer::Defaults => &self.default_definitions,
        }
    }

    fn list_mut(&mut self, layer: Layer) -> &mut Vec<Attached> {
        match layer {
            Layer::Definitions => &mut self.definitions,
            Layer::Defaults => &mut self.default_definitions,
        }
    }

    /// Wraps `definition` for insertion into `layer`, subscribing to it
    /// unless the other list already does.
    fn attach(&self, layer: Layer, definition: StyleDefinition) -> Attached {
        let subscribed = self
            .list(layer.other())
            .iter()
            .any(|a| a.definition == definition);
        let listener = (!subscribed).then(|| subscribe(&self.shared, &definition));
        Attached {
            definition,
            listener,
        }
    }

    /// Drops an entry taken out of `layer`, handing its subscription to the
    /// other list if that list still holds the definition.
    fn release(&mut self, layer: Layer, attached: Attached) {
        if attached.listener.is_none() {
            return;
        }
        unsubscribe(&attached);
        let shared = self.shared.clone();
        if let Some(other) = self
            .list_mut(layer.other())
            .iter_mut()
            .find(|a| a.definition == attached.definition)
        {
            other.listener = Some(subscribe(&shared, &other.definition));
        }
    }

    /// Resolves `names` locally, or returns nothing if no one is listening.
    fn resolved_values(&self, names: &[StyleName]) -> Vec<(StyleName, Option<StyleValue>)> {
        if self.shared.listeners.is_empty() {
            return Vec::new();
        }
        names
            .iter()
            .map(|name| (name.clone(), self.get_local_style_data(name.as_str()).value))
            .collect()
    }

    /// Marks every entry that a change to the definition lists could affect
    /// as stale, then reports each name in `before` whose value changed.
    ///
    /// Stale entries are anything resolved at a definition level plus every
    /// name in `names`.
    fn definitions_changed(
        &self,
        names: &[StyleName],
        before: Vec<(StyleName, Option<StyleValue>)>,
    ) {
        self.shared.invalidate_where(|name, entry| {
            matches!(
                entry.data.priority.level(),
                Some(level::DEFINITION | level::DEFAULT_DEFINITION)
            ) || names.contains(name)
        });
        for (name, old) in before {
            let new = self.get_local_style_data(name.as_str()).value;
            if old != new {
                self.shared.notify(name, old, new, ChangeOrigin::Attachment);
            }
        }
    }

    fn push_definition(&mut self, layer: Layer, definition: StyleDefinition) {
        let names = defined_names(core::slice::from_ref(&definition));
        let before = self.resolved_values(&names);
        if let Some(idx) = self
            .list(layer)
            .iter()
            .position(|a| a.definition == definition)
        {
            let list = self.list_mut(layer);
            let existing = list.remove(idx);
            list.push(existing);
        } else {
            let attached = self.attach(layer, definition);
            self.list_mut(layer).push(attached);
        }
        self.definitions_changed(&names, before);
    }

    fn remove_definition(&mut self, layer: Layer, definition: &StyleDefinition) -> bool {
        let Some(idx) = self
            .list(layer)
            .iter()
            .position(|a| a.definition == *definition)
        else {
            return false;
        };
        let names = defined_names(core::slice::from_ref(definition));
        let before = self.resolved_values(&names);
        let removed = self.list_mut(layer).remove(idx);
        self.release(layer, removed);
        self.definitions_changed(&names, before);
        true
    }

    fn replace_definitions(
        &mut self,
        layer: Layer,
        definitions: impl IntoIterator<Item = StyleDefinition>,
    ) {
        let mut incoming: Vec<StyleDefinition> = Vec::new();
        for definition in definitions {
            // A repeated definition takes its last position.
            incoming.retain(|d| *d != definition);
            incoming.push(definition);
        }

        let mut changed: Vec<StyleDefinition> = self
            .list(layer)
            .iter()
            .map(|a| a.definition.clone())
            .collect();
        changed.extend(incoming.iter().cloned());
        let names = defined_names(&changed);
        let before = self.resolved_values(&names);

        for attached in core::mem::take(self.list_mut(layer)) {
            self.release(layer, attached);
        }
        let attached: Vec<Attached> = incoming
            .into_iter()
            .map(|definition| self.attach(layer, definition))
            .collect();
        *self.list_mut(layer) = attached;
        self.definitions_changed(&names, before);
    }

    /// Attaches a definition on top of the user definitions.
    ///
    /// Attaching a definition that is already attached moves it to the top.
    pub fn add_style_definition(&mut self, definition: StyleDefinition) {
        log::debug!("{}: attaching {definition:?}", self.shared.styles.name());
        self.push_definition(Layer::Definitions, definition);
    }

    /// Detaches a user definition. Returns `false` if it was not attached.
    pub fn remove_style_definition(&mut self, definition: &StyleDefinition) -> bool {
        let removed = self.remove_definition(Layer::Definitions, definition);
        if removed {
            log::debug!("{}: detached {definition:?}", self.shared.styles.name());
        }
        removed
    }

    /// Replaces all user definitions, oldest first.
    pub fn set_style_definitions(&mut self, definitions: impl IntoIterator<Item = StyleDefinition>) {
        self.replace_definitions(Layer::Definitions, definitions);
        log::debug!(
            "{}: {} user definitions attached",
            self.shared.styles.name(),
            self.definitions.len()
        );
    }

    /// Returns the user definitions, oldest first.
    pub fn style_definitions(&self) -> impl Iterator<Item = &StyleDefinition> + '_ {
        self.list(Layer::Definitions).iter().map(|a| &a.definition)
    }

    /// Replaces the default definitions, oldest first.
    ///
    /// Default definitions rank below every user definition. They are
    /// normally pushed by an owning composite through
    /// [`ResolveCx::apply_sub_styles`](crate::ResolveCx::apply_sub_styles).
    pub fn set_default_style_definitions(
        &mut self,
        definitions: impl IntoIterator<Item = StyleDefinition>,
    ) {
        self.replace_definitions(Layer::Defaults, definitions);
        log::debug!(
            "{}: {} default definitions attached",
            self.shared.styles.name(),
            self.default_definitions.len()
        );
    }

    /// Returns the default definitions, oldest first.
    pub fn default_style_definitions(&self) -> impl Iterator<Item = &StyleDefinition> + '_ {
        self.list(Layer::Defaults).iter().map(|a| &a.definition)
    }

    // =========================================================================
    // Proxy
    // =========================================================================

    /// Installs or removes a proxy, returning the previous one.
    pub fn set_style_proxy(&mut self, proxy: Option<StyleProxy<K>>) -> Option<StyleProxy<K>> {
        log::debug!(
            "{}: style proxy {}",
            self.shared.styles.name(),
            if proxy.is_some() { "installed" } else { "removed" }
        );
        core::mem::replace(&mut self.proxy, proxy)
    }

    /// Returns the installed proxy, if any.
    #[must_use]
    #[inline]
    pub fn style_proxy(&self) -> Option<&StyleProxy<K>> {
        self.proxy.as_ref()
    }

    // =========================================================================
    // Change listeners
    // =========================================================================

    /// Registers a listener for changes to this object's overrides and
    /// attached definitions.
    ///
    /// Events carry the invalidation hints declared for the style by the
    /// owner's widget type.
    pub fn add_style_listener<F>(&self, listener: F) -> ListenerId
    where
        F: Fn(&StyleChange) + 'static,
    {
        self.shared.listeners.add(listener)
    }

    /// Removes a listener. Returns `false` if it was not registered.
    pub fn remove_style_listener(&self, id: ListenerId) -> bool {
        self.shared.listeners.remove(id)
    }

    // =========================================================================
    // Invalidation
    // =========================================================================

    /// Marks inheritable styles stale after the object moved in the tree.
    pub fn hierarchy_changed(&self) {
        let styles = &self.shared.styles;
        self.shared
            .invalidate_where(|name, _| styles.kind(name.as_str()) == StyleKind::Inheritable);
    }

    /// Marks every cached style stale.
    pub fn invalidate_all(&self) {
        self.shared.invalidate_where(|_, _| true);
    }

    // =========================================================================
    // Resolution
    // =========================================================================

    /// Resolves `name` against this object's own layers only.
    ///
    /// No proxy forwarding and no inheritance from a container take place;
    /// use [`ResolveCx`](crate::ResolveCx) for the full cascade.
    #[must_use]
    pub fn get_local_style_data(&self, name: &str) -> StyleData {
        self.resolve_local(name).data
    }

    pub(crate) fn resolve_local(&self, name: &str) -> LocalResolution {
        if let Some(entry) = self.shared.cache.borrow().get(name)
            && entry.valid
        {
            return LocalResolution {
                data: entry.data.clone(),
                defers_to_parent: entry.defers_to_parent,
            };
        }

        log::trace!("{}: resolving `{name}`", self.shared.styles.name());
        let (value, levels, defers_to_parent) = self.compute_local(name);

        let mut cache = self.shared.cache.borrow_mut();
        if let Some(entry) = cache.get_mut(name) {
            entry.data.assign(value, &levels);
            entry.valid = true;
            entry.defers_to_parent = defers_to_parent;
            return LocalResolution {
                data: entry.data.clone(),
                defers_to_parent,
            };
        }

        let key = self
            .shared
            .styles
            .canonical_name(name)
            .unwrap_or_else(|| StyleName::from(String::from(name)));
        let mut data = StyleData::new(key.clone());
        data.assign(value, &levels);
        cache.insert(
            key,
            CacheEntry {
                data: data.clone(),
                valid: true,
                defers_to_parent,
            },
        );
        LocalResolution {
            data,
            defers_to_parent,
        }
    }

    fn compute_local(&self, name: &str) -> (Option<StyleValue>, SmallVec<[u16; 2]>, bool) {
        if let Some(value) = self.get_override(name) {
            return (Some(value.clone()), SmallVec::from_slice(&[level::INSTANCE]), false);
        }
        if let Some((slot, value)) = find_in(&self.definitions, name) {
            return (Some(value), SmallVec::from_slice(&[level::DEFINITION, slot]), false);
        }
        if let Some((slot, value)) = find_in(&self.default_definitions, name) {
            return (
                Some(value),
                SmallVec::from_slice(&[level::DEFAULT_DEFINITION, slot]),
                false,
            );
        }
        let styles = &self.shared.styles;
        (
            styles.default_value(name).cloned(),
            SmallVec::from_slice(&[level::CLASS]),
            styles.kind(name) == StyleKind::Inheritable,
        )
    }
}

impl<K> Drop for Styleable<K> {
    fn drop(&mut self) {
        for attached in self.definitions.iter().chain(&self.default_definitions) {
            unsubscribe(attached);
        }
    }
}

impl<K: fmt::Debug> fmt::Debug for Styleable<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Styleable")
            .field("owner", &self.owner)
            .field("widget_type", &self.shared.styles.widget_type())
            .field("overrides", &self.overrides)
            .field("definitions", &self.definitions.len())
            .field("default_definitions", &self.default_definitions.len())
            .field("proxy", &self.proxy)
            .field("cached", &self.shared.cache.borrow().len())
            .finish_non_exhaustive()
    }
}
