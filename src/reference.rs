//! The reference/URL resolver (`C9`, `§4.8`).

use crate::publication::{ManifestIndex, Publication};
use crate::util::uri;
use std::collections::HashSet;

/// Classification of a URL candidate (`§4.8`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum UrlKind {
    Local,
    Remote,
    File,
    Data,
}

pub(crate) fn classify(url: &str) -> UrlKind {
    if uri::is_remote(url) {
        UrlKind::Remote
    } else if uri::is_file_scheme(url) {
        UrlKind::File
    } else if uri::is_data_uri(url) {
        UrlKind::Data
    } else {
        UrlKind::Local
    }
}

/// Resolves `href` (found inside the document at `base_dir`) into a
/// container path, per `§4.8`'s relative-resolution algorithm: split into
/// `path + fragment`; percent-decode the path (archive entry names are
/// never percent-encoded, `§3`); absolute paths are stripped of their
/// leading slash; otherwise the path is lexically normalised against
/// `base_dir`.
pub(crate) fn resolve(base_dir: &str, href: &str) -> String {
    let (path, _fragment) = uri::split_fragment(href);
    let decoded = uri::decode(path);

    if uri::is_absolute_path(&decoded) {
        uri::normalize(decoded.trim_start_matches('/')).into_owned()
    } else {
        uri::resolve(base_dir, &decoded).into_owned()
    }
}

/// Collects every `id` attribute value appearing in `tokens`, used for
/// same-document and cross-document fragment resolution (`§4.8`, `§3`
/// invariant 2).
pub(crate) fn collect_ids(tokens: &[crate::xml::Token]) -> HashSet<String> {
    tokens
        .iter()
        .filter_map(|t| match t {
            crate::xml::Token::Start(el) => el.attr("id").map(str::to_owned),
            _ => None,
        })
        .collect()
}

/// Media-fragment prefixes that are skipped rather than resolved against a
/// document's id set (`§4.8`).
fn is_media_fragment_or_cfi(fragment: &str) -> bool {
    fragment.starts_with("xywh=")
        || fragment.starts_with("xyn=")
        || fragment.starts_with("t=")
        || fragment.starts_with("epubcfi(")
}

/// Resolves a fragment found on a content href, per `§4.8`:
/// - `path == ""`: checked against the current document's own id set.
/// - `path != ""`: checked against the target file's id set (read fresh).
/// - Media-fragment / `epubcfi(...)` forms are skipped (always resolved).
///
/// Returns `true` when the fragment resolves (or is exempt from checking).
pub(crate) fn resolve_fragment(
    publication: &Publication,
    base_dir: &str,
    href: &str,
    own_ids: &HashSet<String>,
) -> bool {
    let (path, fragment) = uri::split_fragment(href);
    if fragment.is_empty() {
        return true;
    }
    if is_media_fragment_or_cfi(fragment) {
        return true;
    }

    if path.is_empty() {
        return own_ids.contains(fragment);
    }

    let resolved_path = resolve(base_dir, path);
    match publication.read_file(&resolved_path) {
        Some(bytes) => collect_ids(&crate::xml::Document::parse(bytes).tokens).contains(fragment),
        // Target file missing is reported separately by RSC-007/008; a
        // missing file can't satisfy a fragment either way.
        None => false,
    }
}

/// `§4.8` hyperlink spine-membership (`RSC-011`): when a non-remote
/// `<a href>` resolves to a manifest item of a content-document media type,
/// the resolved path must be a spine item.
pub(crate) fn requires_spine_membership(media_type: &str) -> bool {
    media_type.eq_ignore_ascii_case("application/xhtml+xml")
        || media_type.eq_ignore_ascii_case("image/svg+xml")
}

pub(crate) fn is_in_spine(index: &ManifestIndex, resolved_path: &str) -> bool {
    index.is_spine_path(resolved_path)
}
