//! The content rule sets (`C3`–`C7`), `§4`.
//!
//! Every rule is a pure function over an already-tokenized [`crate::xml::Document`]
//! (or, for foreign-resource resolution, a fresh walk of the raw bytes) plus
//! a [`RuleContext`] describing the manifest item being validated. Rules
//! never mutate the publication or observe each other's output — their only
//! side effect is appending to the shared [`crate::diagnostic::DiagnosticSink`]
//! (`§5`, `§7`).

#[cfg(test)]
pub(crate) mod test_support;

pub(crate) mod fallback;
pub(crate) mod ncx;
pub(crate) mod smil;
pub(crate) mod svg;
pub(crate) mod viewport;
pub(crate) mod xhtml;

use crate::publication::{ManifestIndex, Publication};
use crate::settings::ValidatorSettings;

/// Shared read-only context every rule function receives.
pub(crate) struct RuleContext<'a> {
    pub(crate) publication: &'a Publication,
    pub(crate) index: &'a ManifestIndex,
    pub(crate) settings: ValidatorSettings,
    /// Container path of the document under validation.
    pub(crate) path: &'a str,
    /// Directory portion of `path`, used as the base for relative hrefs.
    pub(crate) base_dir: &'a str,
    pub(crate) is_nav: bool,
    pub(crate) is_fxl: bool,
    pub(crate) in_spine: bool,
    pub(crate) version_major: u32,
    /// Whether this document is reachable via a manifest `fallback` chain
    /// from a non-core-media-type item in an EPUB ≥ 3.0 package (`§4.2`'s
    /// "EPUB 3 fallback document").
    pub(crate) is_epub3_fallback: bool,
}

impl<'a> RuleContext<'a> {
    pub(crate) fn is_epub3(&self) -> bool {
        self.version_major >= 3
    }
}
