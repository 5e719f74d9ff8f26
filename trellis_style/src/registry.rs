// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Widget type registry.
//!
//! This module provides [`TypeRegistry`], which flattens each widget type's
//! style declarations and class defaults across its ancestor chain once, at
//! registration time, into a [`TypeStyles`] table.

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::fmt;
use core::sync::atomic::{AtomicU32, Ordering};

use hashbrown::HashMap;
use smallvec::SmallVec;

use crate::definition::{StyleDefinition, collect_definitions};
use crate::error::RegistryError;
use crate::kind::{Invalidation, StyleDeclaration, StyleKind};
use crate::name::StyleName;
use crate::value::StyleValue;

/// Source of per-registry stamps.
static NEXT_REGISTRY: AtomicU32 = AtomicU32::new(0);

/// A handle to a widget type registered in a [`TypeRegistry`].
///
/// Handles are stamped with the registry that issued them, so a registry
/// never mistakes another registry's handle for one of its own.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WidgetType {
    registry: u32,
    index: u16,
}

impl WidgetType {
    /// Returns the index of this handle within its registry.
    #[must_use]
    #[inline]
    pub const fn index(self) -> u16 {
        self.index
    }
}

impl fmt::Debug for WidgetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("WidgetType").field(&self.index).finish()
    }
}

/// The style declarations a widget type makes locally.
///
/// Only the type's own additions go here; everything its base type declares
/// is inherited when the declaration is registered.
///
/// # Example
///
/// ```rust
/// use trellis_style::{Invalidation, StyleKind, StyleValue, TypeDeclaration, TypeRegistry};
///
/// let mut registry = TypeRegistry::new();
/// let element = registry
///     .register(
///         TypeDeclaration::new("Element")
///             .style("TextColor", StyleKind::Inheritable)
///             .default("TextColor", StyleValue::new("#000000")),
///     )
///     .unwrap();
/// let button = registry
///     .register(
///         TypeDeclaration::new("Button")
///             .extends(element)
///             .style_invalidating("Padding", StyleKind::Normal, Invalidation::MEASURE)
///             .default("Padding", StyleValue::new(4_u32)),
///     )
///     .unwrap();
///
/// let styles = registry.styles(button);
/// assert_eq!(styles.kind("TextColor"), StyleKind::Inheritable);
/// assert_eq!(styles.default_value("TextColor"), Some(&StyleValue::new("#000000")));
/// assert!(registry.is_a(button, element));
/// ```
#[derive(Debug)]
pub struct TypeDeclaration {
    name: &'static str,
    base: Option<WidgetType>,
    styles: Vec<(StyleName, StyleDeclaration)>,
    defaults: Vec<(StyleName, StyleValue)>,
}

impl TypeDeclaration {
    /// Starts a declaration for a type with the given name.
    #[must_use]
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            base: None,
            styles: Vec::new(),
            defaults: Vec::new(),
        }
    }

    /// Sets the base type.
    #[must_use]
    pub fn extends(mut self, base: WidgetType) -> Self {
        self.base = Some(base);
        self
    }

    /// Declares a style of the given kind.
    #[must_use]
    pub fn style(self, name: impl Into<StyleName>, kind: StyleKind) -> Self {
        self.declare(name, StyleDeclaration::new(kind))
    }

    /// Declares a style of the given kind with invalidation hints.
    #[must_use]
    pub fn style_invalidating(
        self,
        name: impl Into<StyleName>,
        kind: StyleKind,
        invalidation: Invalidation,
    ) -> Self {
        self.declare(name, StyleDeclaration::new(kind).invalidates(invalidation))
    }

    /// Declares a style from a full [`StyleDeclaration`].
    ///
    /// Declaring the same name twice keeps the last declaration.
    #[must_use]
    pub fn declare(mut self, name: impl Into<StyleName>, declaration: StyleDeclaration) -> Self {
        let name = name.into();
        match self.styles.iter_mut().find(|(n, _)| *n == name) {
            Some((_, decl)) => *decl = declaration,
            None => self.styles.push((name, declaration)),
        }
        self
    }

    /// Sets the class-level default for a style.
    ///
    /// Setting the same name twice keeps the last value.
    #[must_use]
    pub fn default(mut self, name: impl Into<StyleName>, value: StyleValue) -> Self {
        let name = name.into();
        match self.defaults.iter_mut().find(|(n, _)| *n == name) {
            Some((_, v)) => *v = value,
            None => self.defaults.push((name, value)),
        }
        self
    }
}

/// The flattened style table of one widget type.
///
/// Built once by [`TypeRegistry::register`] from the type's declaration and
/// its base type's table, then shared by every instance of the type.
pub struct TypeStyles {
    widget_type: WidgetType,
    name: &'static str,
    /// This type first, then its base, and so on up to the root.
    ancestors: SmallVec<[WidgetType; 4]>,
    declarations: HashMap<StyleName, StyleDeclaration>,
    /// Per name, defaults from the root-most contributor to this type.
    defaults: HashMap<StyleName, SmallVec<[StyleValue; 2]>>,
}

impl TypeStyles {
    /// Returns the handle of the type this table belongs to.
    #[must_use]
    #[inline]
    pub fn widget_type(&self) -> WidgetType {
        self.widget_type
    }

    /// Returns the type's name.
    #[must_use]
    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the type followed by its ancestors, most derived first.
    #[must_use]
    pub fn ancestors(&self) -> &[WidgetType] {
        &self.ancestors
    }

    /// Returns the declaration for `name`.
    ///
    /// Names never declared anywhere in the chain resolve as
    /// [`StyleKind::Normal`] with no invalidation hints.
    #[must_use]
    pub fn declaration(&self, name: &str) -> StyleDeclaration {
        self.declarations.get(name).copied().unwrap_or_default()
    }

    /// Returns the kind of `name`.
    #[must_use]
    #[inline]
    pub fn kind(&self, name: &str) -> StyleKind {
        self.declaration(name).kind
    }

    /// Returns the invalidation hints of `name`.
    #[must_use]
    #[inline]
    pub fn invalidation(&self, name: &str) -> Invalidation {
        self.declaration(name).invalidation
    }

    /// Returns every class default contributed for `name`, base type first.
    #[must_use]
    pub fn defaults(&self, name: &str) -> &[StyleValue] {
        self.defaults.get(name).map(|v| v.as_slice()).unwrap_or(&[])
    }

    /// Returns the most specific class default for `name`.
    #[must_use]
    pub fn default_value(&self, name: &str) -> Option<&StyleValue> {
        self.defaults(name).last()
    }

    /// Returns the class-level definitions for a sub-style slot.
    ///
    /// Every contribution across the chain is concatenated, base type first,
    /// so the most derived type's definitions come last and win when the list
    /// is attached.
    #[must_use]
    pub fn sub_style_definitions(&self, name: &str) -> Vec<StyleDefinition> {
        let mut out = Vec::new();
        for value in self.defaults(name) {
            if !collect_definitions(value, &mut out) {
                log::warn!(
                    "{}: class default for sub-style `{name}` is not a style definition: {value:?}",
                    self.name
                );
            }
        }
        out
    }

    /// Returns the canonical stored name for `name`, if the chain knows it.
    pub(crate) fn canonical_name(&self, name: &str) -> Option<StyleName> {
        self.declarations
            .get_key_value(name)
            .map(|(k, _)| k.clone())
            .or_else(|| self.defaults.get_key_value(name).map(|(k, _)| k.clone()))
    }

    /// Returns every name declared or defaulted anywhere in the chain.
    pub fn names(&self) -> impl Iterator<Item = &StyleName> + '_ {
        self.declarations.keys().chain(
            self.defaults
                .keys()
                .filter(|name| !self.declarations.contains_key(name.as_str())),
        )
    }
}

impl fmt::Debug for TypeStyles {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeStyles")
            .field("widget_type", &self.widget_type)
            .field("name", &self.name)
            .field("ancestors", &self.ancestors)
            .field("declarations", &self.declarations.len())
            .field("defaults", &self.defaults.len())
            .finish()
    }
}

/// A registry of widget types and their flattened style tables.
///
/// Types are registered once, base types before derived ones, and never
/// change afterwards. Each registration walks the declared chain exactly once;
/// instances then share the resulting [`TypeStyles`] and never walk it again.
pub struct TypeRegistry {
    id: u32,
    types: Vec<Rc<TypeStyles>>,
    by_name: HashMap<&'static str, WidgetType>,
}

impl TypeRegistry {
    /// Creates a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: NEXT_REGISTRY.fetch_add(1, Ordering::Relaxed),
            types: Vec::new(),
            by_name: HashMap::new(),
        }
    }

    /// Registers a widget type and flattens its styles.
    ///
    /// Kinds declared by the new type shadow those of its ancestors. Defaults
    /// are appended after the ancestors' defaults for the same name.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError`] if the name is taken, the base type is not
    /// from this registry, or the registry is full.
    pub fn register(&mut self, declaration: TypeDeclaration) -> Result<WidgetType, RegistryError> {
        let TypeDeclaration {
            name,
            base,
            styles,
            defaults,
        } = declaration;

        if self.by_name.contains_key(name) {
            return Err(RegistryError::DuplicateType(name));
        }
        let base = match base {
            Some(base) => Some(
                self.get(base)
                    .ok_or(RegistryError::UnknownBase { name, base })?
                    .clone(),
            ),
            None => None,
        };
        let widget_type = u16::try_from(self.types.len())
            .ok()
            .filter(|idx| *idx < u16::MAX)
            .map(|index| WidgetType {
                registry: self.id,
                index,
            })
            .ok_or(RegistryError::TooManyTypes)?;

        let (mut ancestors, mut flat_declarations, mut flat_defaults) = match &base {
            Some(base) => (
                base.ancestors.clone(),
                base.declarations.clone(),
                base.defaults.clone(),
            ),
            None => Default::default(),
        };
        ancestors.insert(0, widget_type);
        for (style, declaration) in styles {
            flat_declarations.insert(style, declaration);
        }
        for (style, value) in defaults {
            flat_defaults.entry(style).or_default().push(value);
        }

        log::debug!(
            "registered widget type `{name}` as {widget_type:?} ({} styles, {} ancestors)",
            flat_declarations.len(),
            ancestors.len() - 1
        );

        self.types.push(Rc::new(TypeStyles {
            widget_type,
            name,
            ancestors,
            declarations: flat_declarations,
            defaults: flat_defaults,
        }));
        self.by_name.insert(name, widget_type);
        Ok(widget_type)
    }

    /// Returns the number of registered types.
    #[must_use]
    #[inline]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Returns `true` if no types are registered.
    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Looks up a type by name.
    #[must_use]
    pub fn by_name(&self, name: &str) -> Option<WidgetType> {
        self.by_name.get(name).copied()
    }

    /// Returns the name of a type.
    #[must_use]
    pub fn name(&self, widget_type: WidgetType) -> Option<&'static str> {
        self.get(widget_type).map(|styles| styles.name)
    }

    /// Returns the style table of a type, if this registry issued it.
    #[must_use]
    pub fn get(&self, widget_type: WidgetType) -> Option<&Rc<TypeStyles>> {
        if widget_type.registry != self.id {
            return None;
        }
        self.types.get(usize::from(widget_type.index))
    }

    /// Returns the style table of a type.
    ///
    /// # Panics
    ///
    /// Panics if the type was not issued by this registry.
    #[must_use]
    pub fn styles(&self, widget_type: WidgetType) -> Rc<TypeStyles> {
        match self.get(widget_type) {
            Some(styles) => styles.clone(),
            None => panic!("{widget_type:?} not found in registry"),
        }
    }

    /// Returns the type followed by its ancestors, most derived first.
    #[must_use]
    pub fn ancestors(&self, widget_type: WidgetType) -> &[WidgetType] {
        self.get(widget_type)
            .map(|styles| styles.ancestors())
            .unwrap_or(&[])
    }

    /// Returns `true` if `widget_type` is `base` or derives from it.
    #[must_use]
    pub fn is_a(&self, widget_type: WidgetType, base: WidgetType) -> bool {
        self.ancestors(widget_type).contains(&base)
    }

    /// Returns an iterator over all registered types.
    pub fn iter(&self) -> impl Iterator<Item = &Rc<TypeStyles>> {
        self.types.iter()
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeRegistry")
            .field("count", &self.types.len())
            .field("types", &self.types.iter().map(|t| t.name).collect::<Vec<_>>())
            .finish()
    }
}
