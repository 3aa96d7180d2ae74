// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Autolinking of bare `http://` and `https://` URLs.
//!
//! A single forward scan, linear in the input length. The output is still
//! untrusted markup and must go through [`crate::sanitizer::sanitize`] before
//! rendering.

use crate::markup::escape_text;

const SCHEMES: &[&str] = &["https://", "http://"];

/// Sentence punctuation that is never treated as the end of a URL.
const TRAILING_PUNCTUATION: &[char] = &['.', ',', '!', '?', ';', ':', ')', ']'];

const LINK_ATTRIBUTES: &str =
    r#"target="_blank" rel="noopener noreferrer" style="color: inherit; text-decoration: underline;""#;

/// Wrap every bare URL in `text` in an anchor.
///
/// URLs inside tags or inside an existing `<a>` element are left alone.
pub fn linkify(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut inside_anchor = false;
    // Once past the last `>`, no tag can start; keeps the scan linear.
    let last_close = text.rfind('>');
    let mut i = 0;

    while i < text.len() {
        let rest = &text[i..];

        let tag_len = match last_close {
            Some(end) if i < end => tag_length(rest),
            _ => None,
        };
        if let Some(tag_len) = tag_len {
            let tag = &rest[..tag_len];
            if is_tag_named(tag, "<a") {
                inside_anchor = true;
            } else if is_tag_named(tag, "</a") {
                inside_anchor = false;
            }
            out.push_str(tag);
            i += tag_len;
            continue;
        }

        if !inside_anchor {
            if let Some(url_len) = url_length(rest) {
                push_link(&mut out, &rest[..url_len], false);
                i += url_len;
                continue;
            }
        }

        // `rest` is non-empty, so there is always a next char.
        let c = rest.chars().next().unwrap_or_default();
        out.push(c);
        i += c.len_utf8();
    }

    out
}

/// Escape plain `text` for display and wrap every bare URL in an anchor.
///
/// Unlike [`linkify`], the input is not markup: `<b>` stays visible text.
/// URLs are found in the raw text and each piece is escaped on its own, so
/// quotes and ampersands around a URL never end up inside its `href`.
pub fn linkify_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut plain_start = 0;
    let mut i = 0;

    while i < text.len() {
        let rest = &text[i..];
        if let Some(url_len) = url_length(rest) {
            out.push_str(&escape_text(&text[plain_start..i]));
            push_link(&mut out, &rest[..url_len], true);
            i += url_len;
            plain_start = i;
            continue;
        }
        i += rest.chars().next().map_or(1, char::len_utf8);
    }

    out.push_str(&escape_text(&text[plain_start..]));
    out
}

/// Write a URL match as an anchor, leaving trailing punctuation outside.
fn push_link(out: &mut String, matched: &str, escape: bool) {
    let render = |s: &str| if escape { escape_text(s) } else { s.to_string() };
    let url = matched.trim_end_matches(TRAILING_PUNCTUATION);
    if !has_host_part(url) {
        out.push_str(&render(matched));
        return;
    }

    let url_markup = render(url);
    out.push_str("<a href=\"");
    out.push_str(&url_markup);
    out.push_str("\" ");
    out.push_str(LINK_ATTRIBUTES);
    out.push('>');
    out.push_str(&url_markup);
    out.push_str("</a>");
    out.push_str(&matched[url.len()..]);
}

/// Length of the URL match at the start of `s`, if any.
fn url_length(s: &str) -> Option<usize> {
    let scheme = SCHEMES.iter().find(|scheme| s.starts_with(*scheme))?;
    let body_len: usize = s[scheme.len()..]
        .chars()
        .take_while(|c| is_url_char(*c))
        .map(char::len_utf8)
        .sum();
    (body_len > 0).then_some(scheme.len() + body_len)
}

fn is_url_char(c: char) -> bool {
    !c.is_whitespace() && !matches!(c, '<' | '>' | '"' | '\'')
}

fn has_host_part(url: &str) -> bool {
    SCHEMES
        .iter()
        .any(|scheme| url.len() > scheme.len() && url.starts_with(scheme))
}

/// Length of a markup tag at the start of `s`, if `s` starts with one.
///
/// A lone `<` (as in `1 < 2`) is text, not a tag.
fn tag_length(s: &str) -> Option<usize> {
    let mut chars = s.chars();
    if chars.next() != Some('<') {
        return None;
    }
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '/' || c == '!' => {}
        _ => return None,
    }
    s.find('>').map(|end| end + 1)
}

fn is_tag_named(tag: &str, prefix: &str) -> bool {
    tag.len() > prefix.len()
        && tag
            .get(..prefix.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
        && tag[prefix.len()..]
            .chars()
            .next()
            .is_some_and(|c| c.is_whitespace() || c == '>' || c == '/')
}
