// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Style name identification.
//!
//! This module provides [`StyleName`], the key every style is stored and
//! resolved under.

use alloc::borrow::Cow;
use alloc::string::String;
use core::borrow::Borrow;
use core::fmt;

/// The name of a style, such as `"TextColor"` or `"SkinStyle"`.
///
/// Names declared statically (the common case) borrow their `&'static str`
/// and are free to clone. Names built at runtime own their text.
///
/// `StyleName` borrows as `str`, so every map keyed by it can be queried with
/// a plain `&str`.
///
/// # Example
///
/// ```rust
/// use trellis_style::StyleName;
///
/// const TEXT_COLOR: StyleName = StyleName::from_static("TextColor");
///
/// let runtime = StyleName::from(String::from("TextColor"));
/// assert_eq!(TEXT_COLOR, runtime);
/// assert_eq!(TEXT_COLOR.as_str(), "TextColor");
/// ```
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StyleName(Cow<'static, str>);

impl StyleName {
    /// Creates a name borrowing a static string.
    #[must_use]
    #[inline]
    pub const fn from_static(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }

    /// Returns the name as a string slice.
    #[must_use]
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&'static str> for StyleName {
    #[inline]
    fn from(name: &'static str) -> Self {
        Self::from_static(name)
    }
}

impl From<String> for StyleName {
    #[inline]
    fn from(name: String) -> Self {
        Self(Cow::Owned(name))
    }
}

impl From<&StyleName> for StyleName {
    #[inline]
    fn from(name: &StyleName) -> Self {
        name.clone()
    }
}

impl Borrow<str> for StyleName {
    #[inline]
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for StyleName {
    #[inline]
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for StyleName {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl PartialEq<&str> for StyleName {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

impl fmt::Debug for StyleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("StyleName").field(&self.as_str()).finish()
    }
}

impl fmt::Display for StyleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
