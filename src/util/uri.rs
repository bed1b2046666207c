//! URL normalization and classification helpers shared by the reference
//! resolver (`C9`) and the container/OPF loaders.

use std::borrow::Cow;

pub(crate) const SEPARATOR: char = '/';
const SEPARATOR_STR: &str = "/";
const CURRENT_DIR: &str = ".";
const PARENT_DIR: &str = "..";
const EMPTY: &str = "";

pub(crate) fn into_absolute(mut path: String) -> String {
    if !path.starts_with(SEPARATOR) {
        path.insert(0, SEPARATOR);
    }
    path
}

/// The directory portion of `href` (no trailing separator).
pub(crate) fn parent(href: &str) -> &str {
    href.rfind(SEPARATOR).map_or(EMPTY, |index| {
        if index == 0 { SEPARATOR_STR } else { &href[..index] }
    })
}

/// `href` with any `#fragment` or `?query` suffix stripped.
pub(crate) fn path(href: &str) -> &str {
    href.find(['#', '?']).map_or(href, |index| &href[..index])
}

/// Splits `href` into `(path, fragment)`, where `fragment` includes no
/// leading `#` and is empty when absent.
pub(crate) fn split_fragment(href: &str) -> (&str, &str) {
    match href.find('#') {
        Some(index) => (&href[..index], &href[index + 1..]),
        None => (href, EMPTY),
    }
}

pub(crate) fn filename(href: &str) -> &str {
    path(href)
        .rsplit(SEPARATOR)
        .next()
        .expect("`rsplit` guarantees at least one entry")
}

pub(crate) fn file_extension(href: &str) -> Option<&str> {
    filename(href).rsplit_once('.').map(|(_, ext)| ext)
}

/// `true` for `http://` / `https://` prefixed strings (`§4.8`).
pub(crate) fn is_remote(s: &str) -> bool {
    s.starts_with("http://") || s.starts_with("https://")
}

/// `true` for `file:`-scheme strings (`§4.8`).
pub(crate) fn is_file_scheme(s: &str) -> bool {
    s.starts_with("file:")
}

/// `true` when `s` begins with a container-root-relative `/` (`§4.8`).
pub(crate) fn is_absolute_path(s: &str) -> bool {
    s.starts_with(SEPARATOR)
}

/// `true` for `data:` URIs.
pub(crate) fn is_data_uri(s: &str) -> bool {
    s.starts_with("data:")
}

/// Extracts the media type from a `data:` URI, e.g. `data:image/png;base64,…`
/// → `Some("image/png")`. Returns `None` when no media type is present
/// (`data:,...` is legal and defaults to `text/plain`).
pub(crate) fn data_uri_media_type(s: &str) -> Option<&str> {
    let rest = s.strip_prefix("data:")?;
    let header = rest.split(',').next().unwrap_or("");
    let media_type = header.split(';').next().unwrap_or("");
    (!media_type.is_empty()).then_some(media_type)
}

// This given href is assumed to be well-formed.
pub(crate) fn has_scheme(href: &str) -> bool {
    // The scheme must be ASCII
    let ascii = href.as_bytes();

    // Check if a colon exists
    let Some(colon_pos) = ascii.iter().position(|&c| c == b':') else {
        return false;
    };

    // The first byte must be an ASCII letter
    if !ascii[0].is_ascii_alphabetic() {
        return false;
    }

    ascii[1..colon_pos]
        .iter()
        // Return early if invalid characters are encountered
        .all(|c| c.is_ascii_alphanumeric() || matches!(*c, b'+' | b'.' | b'-'))
}

pub(crate) fn decode(encoded: &str) -> Cow<'_, str> {
    percent_encoding::percent_decode_str(encoded).decode_utf8_lossy()
}

/// Resolve a child path against its parent directory, normalizing if
/// necessary (`§4.8` relative resolution).
pub(crate) fn resolve<'a>(parent_dir: &str, relative: &'a str) -> Cow<'a, str> {
    let (main_href, ext) = relative
        .find(['?', '#'])
        .map_or((relative, EMPTY), |position| {
            (&relative[..position], &relative[position..])
        });

    if main_href.starts_with(SEPARATOR) || has_scheme(main_href) {
        // If the path is absolute or has a scheme,
        // it is most likely resolved already.
        return Cow::Borrowed(relative);
    }

    let resolved_href = String::from(parent_dir) + SEPARATOR_STR + main_href + ext;
    let normalized = normalize(&resolved_href).into_owned();

    Cow::Owned(normalized)
}

pub(crate) fn normalize(original: &str) -> Cow<'_, str> {
    // First check if normalization is required
    let mut components = original.split(SEPARATOR);
    // If absolute (`/a/b/c`), the first split is always empty.
    if original.starts_with(SEPARATOR) {
        components.next();
    }
    // Normalization is not required if the following are not found:
    // "."  => Current dir
    // ".." => Parent dir
    // ""   => Empty component (e.g., double slashes)
    if !components.any(|c| matches!(c, EMPTY | CURRENT_DIR | PARENT_DIR)) {
        return Cow::Borrowed(original);
    }

    // Normalize
    let mut stack: Vec<&str> = Vec::new();

    for component in original.split(SEPARATOR) {
        match component {
            EMPTY | CURRENT_DIR => {}
            PARENT_DIR => {
                stack.pop();
            }
            _ => stack.push(component),
        }
    }

    // Calculate `capacity` to avoid reallocations when appending to `path`
    let capacity = stack.iter().map(|s| s.len()).sum::<usize>() + stack.len();
    let mut path = String::with_capacity(capacity);
    let mut components = stack.into_iter();

    // Re-add the root directory if there was one originally
    if original.starts_with(SEPARATOR) {
        path.push(SEPARATOR);
    }
    if let Some(component) = components.next() {
        path.push_str(component);
    }
    for component in components {
        path.push(SEPARATOR);
        path.push_str(component);
    }
    Cow::Owned(path)
}
