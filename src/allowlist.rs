// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Tag and attribute allowlist for rendered markup.

use crate::error::ConfigError;
use std::collections::HashMap;
use std::sync::OnceLock;

/// Tags kept by the sanitizer and the attributes permitted on each.
pub const DEFAULT_TAGS: &[(&str, &[&str])] = &[
    ("b", &[]),
    ("i", &[]),
    ("u", &[]),
    ("strong", &[]),
    ("em", &[]),
    ("br", &[]),
    ("p", &[]),
    ("div", &[]),
    ("span", &[]),
    ("a", &["href", "title", "target", "rel"]),
    ("ul", &[]),
    ("ol", &[]),
    ("li", &[]),
    ("h1", &[]),
    ("h2", &[]),
    ("h3", &[]),
    ("h4", &[]),
    ("h5", &[]),
    ("h6", &[]),
    ("blockquote", &[]),
    ("code", &[]),
    ("pre", &[]),
    ("img", &["src", "alt", "title", "width", "height", "class", "style"]),
    (
        "video",
        &["src", "controls", "width", "height", "poster", "class", "style"],
    ),
    ("audio", &["src", "controls", "class"]),
];

/// Immutable mapping from lower-cased tag name to its permitted attributes.
///
/// Attribute lists keep their declaration order, which is also the order the
/// sanitizer emits them in.
#[derive(Debug, Clone)]
pub struct AllowlistRule {
    tags: HashMap<String, Vec<String>>,
}

impl AllowlistRule {
    /// Build a rule from `(tag, attributes)` pairs.
    ///
    /// An empty table is a configuration defect and is rejected.
    pub fn new<'a, I, A>(entries: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (&'a str, A)>,
        A: IntoIterator<Item = &'a str>,
    {
        let rule = Self::from_entries(entries);
        if rule.tags.is_empty() {
            return Err(ConfigError::EmptyAllowlist);
        }
        Ok(rule)
    }

    /// The built-in rich-text allowlist, built once per process.
    pub fn standard() -> &'static AllowlistRule {
        static STANDARD: OnceLock<AllowlistRule> = OnceLock::new();
        STANDARD.get_or_init(|| {
            let rule = Self::from_entries(
                DEFAULT_TAGS
                    .iter()
                    .map(|(tag, attrs)| (*tag, attrs.iter().copied())),
            );
            assert!(!rule.tags.is_empty(), "built-in tag allowlist is empty");
            rule
        })
    }

    fn from_entries<'a, I, A>(entries: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, A)>,
        A: IntoIterator<Item = &'a str>,
    {
        let tags = entries
            .into_iter()
            .map(|(tag, attrs)| {
                (
                    tag.to_ascii_lowercase(),
                    attrs.into_iter().map(str::to_ascii_lowercase).collect(),
                )
            })
            .collect();
        Self { tags }
    }

    /// Whether `tag` may appear in sanitized output.
    pub fn allows_tag(&self, tag: &str) -> bool {
        self.tags.contains_key(tag)
    }

    /// Attributes permitted on `tag`, or `None` if the tag is not allowed.
    pub fn attributes_for(&self, tag: &str) -> Option<&[String]> {
        self.tags.get(tag).map(Vec::as_slice)
    }

    /// Whether `attribute` may appear on `tag`.
    pub fn allows_attribute(&self, tag: &str, attribute: &str) -> bool {
        self.attributes_for(tag)
            .is_some_and(|attrs| attrs.iter().any(|a| a == attribute))
    }

    /// Number of allowed tags.
    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}
