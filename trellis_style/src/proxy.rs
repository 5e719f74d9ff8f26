// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Style redirection to another object.

use hashbrown::HashSet;

use crate::name::StyleName;

/// Redirects a whitelisted set of style names to a source object.
///
/// Installed on a delegate with
/// [`Styleable::set_style_proxy`](crate::Styleable::set_style_proxy). When
/// the delegate is resolved through a [`ResolveCx`](crate::ResolveCx), a
/// forwarded name is answered by resolving the source object instead; every
/// other name resolves against the delegate's own cascade. The proxy keeps no
/// cache of its own, so the delegate always sees the source's current value.
///
/// A name is forwarded if it was added with [`StyleProxy::forward`], or if
/// the proxy forwards all names ([`StyleProxy::forward_all`]) and the name
/// was not excluded with [`StyleProxy::except`].
///
/// # Example
///
/// ```rust
/// use trellis_style::StyleProxy;
///
/// // An icon inside button 7 follows the button's interactive state.
/// let proxy = StyleProxy::new(7_u32).forward("State");
/// assert!(proxy.forwards("State"));
/// assert!(!proxy.forwards("Color"));
///
/// let all_but_size = StyleProxy::new(7_u32).forward_all().except("Width");
/// assert!(all_but_size.forwards("Color"));
/// assert!(!all_but_size.forwards("Width"));
/// ```
#[derive(Clone, Debug)]
pub struct StyleProxy<K> {
    source: K,
    forwarded: HashSet<StyleName>,
    excluded: HashSet<StyleName>,
    forward_all: bool,
}

impl<K: Copy + Eq> StyleProxy<K> {
    /// Creates a proxy to `source` that forwards nothing yet.
    #[must_use]
    pub fn new(source: K) -> Self {
        Self {
            source,
            forwarded: HashSet::new(),
            excluded: HashSet::new(),
            forward_all: false,
        }
    }

    /// Forwards `name` to the source.
    #[must_use]
    pub fn forward(mut self, name: impl Into<StyleName>) -> Self {
        let name = name.into();
        self.excluded.remove(name.as_str());
        self.forwarded.insert(name);
        self
    }

    /// Forwards every name not excluded with [`StyleProxy::except`].
    #[must_use]
    pub fn forward_all(mut self) -> Self {
        self.forward_all = true;
        self
    }

    /// Keeps `name` local even when forwarding all names.
    #[must_use]
    pub fn except(mut self, name: impl Into<StyleName>) -> Self {
        let name = name.into();
        self.forwarded.remove(name.as_str());
        self.excluded.insert(name);
        self
    }

    /// Returns the source object's key.
    #[must_use]
    #[inline]
    pub fn source(&self) -> K {
        self.source
    }

    /// Points the proxy at a different source.
    pub fn set_source(&mut self, source: K) {
        self.source = source;
    }

    /// Returns `true` if `name` is answered by the source.
    #[must_use]
    pub fn forwards(&self, name: &str) -> bool {
        if self.forwarded.contains(name) {
            true
        } else {
            self.forward_all && !self.excluded.contains(name)
        }
    }
}
