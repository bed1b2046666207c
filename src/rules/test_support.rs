//! Shared test fixtures for the rule-set unit tests.

#![cfg(test)]

use super::RuleContext;
use crate::publication::{ManifestIndex, Publication};
use crate::settings::ValidatorSettings;

pub(crate) fn empty_publication() -> Publication {
    Publication::new(Default::default(), "OPS/package.opf".to_owned())
}

pub(crate) fn ctx<'a>(publication: &'a Publication, index: &'a ManifestIndex) -> RuleContext<'a> {
    RuleContext {
        publication,
        index,
        settings: ValidatorSettings::default(),
        path: "OPS/c1.xhtml",
        base_dir: "OPS",
        is_nav: false,
        is_fxl: false,
        in_spine: true,
        version_major: 3,
        is_epub3_fallback: false,
    }
}

pub(crate) fn fxl_ctx<'a>(publication: &'a Publication, index: &'a ManifestIndex) -> RuleContext<'a> {
    RuleContext { is_fxl: true, ..ctx(publication, index) }
}
