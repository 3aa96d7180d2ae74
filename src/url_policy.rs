// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! URL safety classification for `href` and `src` attributes.

/// Schemes that are never allowed, checked before any allowed prefix.
pub const FORBIDDEN_SCHEMES: &[&str] = &[
    "javascript:",
    "data:",
    "vbscript:",
    "file:",
    "about:",
    "ws:",
    "wss:",
];

/// Prefixes a URL must start with to be usable as a link or media source.
pub const ALLOWED_PREFIXES: &[&str] = &["http://", "https://", "blob:", "/", "#"];

/// Decide whether `raw` may be used as an `href`/`src` value.
///
/// Classification works on the trimmed, lower-cased string; callers keep the
/// original value for output.
pub fn is_safe_url(raw: &str) -> bool {
    let normalized = raw.trim().to_lowercase();
    if normalized.is_empty() {
        return false;
    }

    if FORBIDDEN_SCHEMES
        .iter()
        .any(|scheme| normalized.starts_with(scheme))
    {
        return false;
    }

    ALLOWED_PREFIXES
        .iter()
        .any(|prefix| normalized.starts_with(prefix))
}

/// True for absolute `http://` or `https://` URLs.
pub fn is_external_url(raw: &str) -> bool {
    let normalized = raw.trim().to_lowercase();
    normalized.starts_with("http://") || normalized.starts_with("https://")
}
