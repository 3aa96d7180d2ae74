// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Allowlist HTML sanitizer.
//!
//! Parses untrusted markup, rebuilds a new tree that keeps only allowlisted
//! tags and attributes, and serializes the result. Sanitization is total:
//! disallowed markup degrades to its text content instead of producing an
//! error.
//!
//! Attribute rules on allowed elements:
//! - `href`/`src` must pass [`is_safe_url`], otherwise the attribute is dropped
//! - external `href`s get `target="_blank"` and `rel="noopener noreferrer"`
//! - `target="_blank"` is only kept together with `rel="noopener noreferrer"`
//! - any other attribute whose value mentions a script-capable scheme is dropped

use crate::allowlist::AllowlistRule;
use crate::markup::{self, MarkupNode};
use crate::url_policy::{is_external_url, is_safe_url};
use tracing::{debug, warn};

/// Substrings that disqualify a non-URL attribute value.
const SCRIPT_SCHEME_MARKERS: &[&str] = &["javascript:", "data:", "vbscript:"];

const SAFE_REL: &str = "noopener noreferrer";
const BLANK_TARGET: &str = "_blank";

/// Counts of what a sanitization pass removed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SanitizeReport {
    /// Elements replaced by their text content
    pub elements_stripped: usize,
    /// Attributes dropped from allowed elements
    pub attributes_dropped: usize,
}

impl SanitizeReport {
    /// True when the input needed no changes beyond re-serialization.
    pub fn is_clean(&self) -> bool {
        self.elements_stripped == 0 && self.attributes_dropped == 0
    }
}

/// Markup sanitizer bound to an allowlist.
#[derive(Debug, Clone, Copy)]
pub struct Sanitizer<'r> {
    rule: &'r AllowlistRule,
}

impl Default for Sanitizer<'static> {
    fn default() -> Self {
        Self::new(AllowlistRule::standard())
    }
}

impl<'r> Sanitizer<'r> {
    /// Create a sanitizer using the given allowlist.
    pub fn new(rule: &'r AllowlistRule) -> Self {
        Self { rule }
    }

    /// Sanitize `raw_html` into safe markup.
    pub fn sanitize(&self, raw_html: &str) -> String {
        self.sanitize_with_report(raw_html).0
    }

    /// Sanitize `raw_html`, also reporting what was removed.
    pub fn sanitize_with_report(&self, raw_html: &str) -> (String, SanitizeReport) {
        let mut report = SanitizeReport::default();
        let forest = markup::parse_fragment(raw_html);
        let cleaned = self.clean_forest(&forest, &mut report);
        let output = markup::serialize(&cleaned);

        if !report.is_clean() {
            debug!(
                elements_stripped = report.elements_stripped,
                attributes_dropped = report.attributes_dropped,
                "Sanitized markup"
            );
        }
        (output, report)
    }

    /// Rebuild a forest, keeping only allowlisted markup.
    pub fn clean_forest(&self, nodes: &[MarkupNode], report: &mut SanitizeReport) -> Vec<MarkupNode> {
        let mut cleaned = Vec::with_capacity(nodes.len());
        for node in nodes {
            match self.clean_node(node, report) {
                MarkupNode::Text(text) if text.is_empty() => {}
                // Stripped elements leave text beside text; keep one run so a
                // `<pre>` sees its real leading newline when serialized.
                MarkupNode::Text(text) => match cleaned.last_mut() {
                    Some(MarkupNode::Text(previous)) => previous.push_str(&text),
                    _ => cleaned.push(MarkupNode::Text(text)),
                },
                other => cleaned.push(other),
            }
        }
        cleaned
    }

    fn clean_node(&self, node: &MarkupNode, report: &mut SanitizeReport) -> MarkupNode {
        match node {
            MarkupNode::Text(text) => MarkupNode::Text(text.clone()),
            MarkupNode::Element {
                tag,
                attributes,
                children,
            } => match self.rule.attributes_for(tag) {
                None => {
                    debug!(%tag, "Stripping disallowed element");
                    report.elements_stripped += 1;
                    MarkupNode::Text(node.text_content())
                }
                Some(allowed) => MarkupNode::Element {
                    tag: tag.clone(),
                    attributes: clean_attributes(tag, attributes, allowed, report),
                    children: self.clean_forest(children, report),
                },
            },
        }
    }
}

fn clean_attributes(
    tag: &str,
    attributes: &[(String, String)],
    allowed: &[String],
    report: &mut SanitizeReport,
) -> Vec<(String, String)> {
    let mut kept: Vec<(String, String)> = Vec::with_capacity(attributes.len());
    let mut force_target = false;
    let mut force_rel = false;

    for (name, value) in attributes {
        if !allowed.iter().any(|a| a == name) {
            debug!(%tag, attribute = %name, "Dropping attribute not in allowlist");
            report.attributes_dropped += 1;
            continue;
        }

        match name.as_str() {
            "href" | "src" => {
                if !is_safe_url(value) {
                    warn!(%tag, attribute = %name, "Dropping unsafe URL");
                    report.attributes_dropped += 1;
                    continue;
                }
                if name == "href" && is_external_url(value) {
                    force_target = true;
                    force_rel = true;
                }
            }
            _ => {
                if has_script_scheme(value) {
                    warn!(%tag, attribute = %name, "Dropping attribute with script scheme");
                    report.attributes_dropped += 1;
                    continue;
                }
                if name == "target" && value.trim().eq_ignore_ascii_case(BLANK_TARGET) {
                    force_rel = true;
                }
            }
        }

        kept.push((name.clone(), value.clone()));
    }

    if force_target {
        set_attribute(&mut kept, "target", BLANK_TARGET);
    }
    if force_rel {
        set_attribute(&mut kept, "rel", SAFE_REL);
    }

    // Emit in allowlist order so re-sanitizing produces identical output.
    kept.sort_by_key(|(name, _)| allowed.iter().position(|a| a == name));
    kept
}

fn set_attribute(attributes: &mut Vec<(String, String)>, name: &str, value: &str) {
    match attributes.iter_mut().find(|(key, _)| key == name) {
        Some((_, existing)) => *existing = value.to_string(),
        None => attributes.push((name.to_string(), value.to_string())),
    }
}

fn has_script_scheme(value: &str) -> bool {
    let lowered = value.to_lowercase();
    SCRIPT_SCHEME_MARKERS
        .iter()
        .any(|marker| lowered.contains(marker))
}

/// Sanitize untrusted markup with the built-in allowlist.
pub fn sanitize(raw_html: &str) -> String {
    Sanitizer::default().sanitize(raw_html)
}
