use reqwest::Url;
use serde::{Deserialize, Serialize};

/// Whether a destination URL points at a site root or somewhere deeper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageType {
    Homepage,
    InnerPage,
    EmptyLink,
    InvalidLink,
}

impl PageType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Homepage => "homepage",
            Self::InnerPage => "inner_page",
            Self::EmptyLink => "empty_link",
            Self::InvalidLink => "invalid_link",
        }
    }
}

impl std::fmt::Display for PageType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Base used only to check that a relative reference is well formed.
const REFERENCE_BASE: &str = "http://reference.invalid/";

/// Classify `link` as homepage or inner page.
///
/// Relative and scheme-less references (`/`, `/news/1.html`, `www.a.com`) are
/// classified like absolute ones. A link is a homepage when its path is
/// exactly `/`, or when both path and query are empty. A query on an empty
/// path (`https://a.com?x=1`) is an inner page while the same query on `/` is
/// a homepage; results depend on this asymmetry so it is kept.
pub fn classify(link: &str) -> PageType {
    if link.is_empty() {
        return PageType::EmptyLink;
    }
    if !is_valid_reference(link) {
        return PageType::InvalidLink;
    }

    // `Url` normalizes an empty http(s) path to "/", so inspect the text as written.
    let (path, query) = raw_path_and_query(link.trim());
    if (query.is_empty() && path.is_empty()) || path == "/" {
        PageType::Homepage
    } else {
        PageType::InnerPage
    }
}

/// Whether `link` is an absolute URL or a well-formed relative reference.
///
/// Control characters and malformed percent-escapes outside the query are
/// rejected even where `Url` would repair them.
fn is_valid_reference(link: &str) -> bool {
    if link.chars().any(|c| c.is_ascii_control()) {
        return false;
    }

    let (without_fragment, fragment) = link.split_once('#').unwrap_or((link, ""));
    let before_query = without_fragment
        .split_once('?')
        .map_or(without_fragment, |(head, _)| head);
    if !has_valid_escapes(before_query) || !has_valid_escapes(fragment) {
        return false;
    }

    match split_scheme(link) {
        Some(_) => Url::parse(link).is_ok(),
        None => {
            // "a:b" without a valid scheme reads as a path whose first segment has a colon.
            let first_segment = before_query.split('/').next().unwrap_or("");
            if first_segment.contains(':') {
                return false;
            }
            Url::parse(REFERENCE_BASE)
                .and_then(|base| base.join(link))
                .is_ok()
        }
    }
}

/// Every `%` must start a two-digit hex escape.
fn has_valid_escapes(text: &str) -> bool {
    let bytes = text.as_bytes();
    let mut idx = 0;
    while idx < bytes.len() {
        if bytes[idx] == b'%' {
            let escape = bytes.get(idx + 1..idx + 3);
            if !matches!(escape, Some([hi, lo]) if hi.is_ascii_hexdigit() && lo.is_ascii_hexdigit()) {
                return false;
            }
            idx += 3;
        } else {
            idx += 1;
        }
    }
    true
}

/// Split `scheme:rest` when the text before the first `:` is a valid scheme.
fn split_scheme(link: &str) -> Option<(&str, &str)> {
    let (scheme, rest) = link.split_once(':')?;
    let mut chars = scheme.chars();
    let starts_with_letter = chars.next().map_or(false, |c| c.is_ascii_alphabetic());
    let valid = starts_with_letter
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
    valid.then_some((scheme, rest))
}

/// Path and query of a link exactly as written.
///
/// Opaque forms such as `mailto:a@b.c` have an empty path. Without a scheme
/// or `//` authority, everything before the query is path.
fn raw_path_and_query(link: &str) -> (&str, &str) {
    let without_fragment = link.split_once('#').map_or(link, |(head, _)| head);
    let (head, query) = without_fragment
        .split_once('?')
        .unwrap_or((without_fragment, ""));

    let path = match split_scheme(head) {
        Some((_, rest)) => {
            if let Some(hierarchical) = rest.strip_prefix("//") {
                hierarchical.find('/').map_or("", |idx| &hierarchical[idx..])
            } else if rest.starts_with('/') {
                rest
            } else {
                ""
            }
        }
        None => match head.strip_prefix("//") {
            Some(hierarchical) => hierarchical.find('/').map_or("", |idx| &hierarchical[idx..]),
            None => head,
        },
    };
    (path, query)
}
