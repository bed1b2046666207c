//! The rule driver (`C2`, `§4.1`).
//!
//! Dispatches every manifest item to its applicable rule sets, in the fixed
//! phase order `§5` mandates, and establishes the per-item context
//! (`is_nav`, `is_fxl`, `in_spine`) rules read from [`RuleContext`].

use crate::diagnostic::DiagnosticSink;
use crate::publication::{ManifestIndex, ManifestItem, Publication, has_property};
use crate::rules::{self, RuleContext};

/// Runs every applicable rule set over `publication`, in the fixed
/// phase → manifest-item → rule order of `§5`, and returns the finished
/// diagnostic list (`§4.9` post-processing already applied).
pub fn validate(publication: &Publication, settings: crate::settings::ValidatorSettings) -> Vec<crate::diagnostic::Diagnostic> {
    let mut sink = DiagnosticSink::new();
    let index = publication.package.as_ref().map(ManifestIndex::build).unwrap_or_default();
    let version_major = publication.package.as_ref().map(|p| if p.version_at_least(3) { 3 } else { 2 }).unwrap_or(2);

    if let Some(package) = &publication.package {
        crate::rules::ncx::check_guide_refs(package, &mut sink);
    }

    for item in manifest_items(publication) {
        dispatch(publication, &index, item, version_major, settings, &mut sink);
    }

    crate::rules::smil::check_cross_references(publication, &index, &mut sink);

    sink.finish(settings.single_file(), settings.strict())
}

fn manifest_items(publication: &Publication) -> impl Iterator<Item = &ManifestItem> {
    publication.package.iter().flat_map(|p| p.manifest.iter()).filter(|item| !item.href_is_missing())
}

fn dispatch(
    publication: &Publication,
    index: &ManifestIndex,
    item: &ManifestItem,
    version_major: u32,
    settings: crate::settings::ValidatorSettings,
    sink: &mut DiagnosticSink,
) {
    if publication.encoding_error_paths.contains(&item.href) {
        log::trace!("skipping \"{}\": excluded by the encoding-error set", item.href);
        return;
    }
    let Some(bytes) = publication.read_file(&item.href) else {
        log::trace!("skipping \"{}\": not present in the container", item.href);
        return;
    };

    let is_xhtml = item.media_type.eq_ignore_ascii_case("application/xhtml+xml");
    let is_svg = item.media_type.eq_ignore_ascii_case("image/svg+xml");
    let is_smil = item.media_type.eq_ignore_ascii_case("application/smil+xml");
    let is_ncx = item.media_type.eq_ignore_ascii_case("application/x-dtbncx+xml");

    if !is_xhtml && !is_svg && !is_smil && !is_ncx {
        log::trace!("skipping \"{}\": media type \"{}\" has no applicable rule set", item.href, item.media_type);
        return;
    }
    if (is_svg || is_smil) && version_major < 3 {
        log::trace!("skipping \"{}\": requires EPUB >= 3.0", item.href);
        return;
    }

    let base_dir = crate::util::uri::parent(&item.href);
    let in_spine = index.is_spine_path(&item.href);
    let is_nav = has_property(&item.properties, "nav");
    let rendition_layout = publication.package.as_ref().map(|p| p.rendition_layout.as_str()).unwrap_or_default();
    let is_fxl = index.is_fxl(&item.id, rendition_layout);
    let is_epub3_fallback = version_major >= 3 && index.is_fallback_target(&item.href);

    let ctx = RuleContext { publication, index, settings, path: &item.href, base_dir, is_nav, is_fxl, in_spine, version_major, is_epub3_fallback };

    if is_xhtml {
        rules::xhtml::run(&ctx, bytes, sink);
        if in_spine {
            let doc = crate::xml::Document::parse(bytes);
            if doc.error.is_none() {
                rules::viewport::run(&ctx, &doc, sink);
            }
        }
        // `§4.1`: object/embed reference checks are skipped for nav documents.
        if !is_nav {
            rules::fallback::run(&ctx, bytes, sink);
        }
    } else if is_svg {
        rules::svg::run(&ctx, bytes, sink);
    } else if is_smil {
        rules::smil::run(&ctx, bytes, sink);
    } else if is_ncx {
        rules::ncx::run(&ctx, bytes, sink);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::publication::ManifestItem;
    use crate::settings::ValidatorSettings;
    use std::collections::HashMap;

    fn manifest_item(id: &str, href: &str, media_type: &str, properties: &str) -> ManifestItem {
        ManifestItem { id: id.to_owned(), href: href.to_owned(), media_type: media_type.to_owned(), properties: properties.to_owned(), fallback: None, media_overlay: None }
    }

    #[test]
    fn test_dispatches_xhtml_and_finds_missing_title() {
        let mut files = HashMap::new();
        files.insert(
            "OPS/c1.xhtml".to_owned(),
            br#"<html xmlns="http://www.w3.org/1999/xhtml"><head></head><body></body></html>"#.to_vec(),
        );
        let mut publication = Publication::new(files, "OPS/package.opf".to_owned());
        let mut package = crate::publication::Package { version: "3.0".to_owned(), ..Default::default() };
        package.manifest.push(manifest_item("c1", "OPS/c1.xhtml", "application/xhtml+xml", ""));
        package.spine.push(crate::publication::SpineItemref { idref: "c1".to_owned(), properties: String::new() });
        publication.package = Some(package);

        let diagnostics = validate(&publication, ValidatorSettings::default());
        assert!(diagnostics.iter().any(|d| d.check_id == "HTM-002"));
    }

    #[test]
    fn test_skips_svg_on_epub2() {
        let mut files = HashMap::new();
        files.insert("OPS/a.svg".to_owned(), br#"<svg xmlns="http://www.w3.org/2000/svg"></svg>"#.to_vec());
        let mut publication = Publication::new(files, "OPS/package.opf".to_owned());
        let mut package = crate::publication::Package { version: "2.0".to_owned(), ..Default::default() };
        package.manifest.push(manifest_item("a", "OPS/a.svg", "image/svg+xml", ""));
        publication.package = Some(package);

        let diagnostics = validate(&publication, ValidatorSettings::default());
        assert!(diagnostics.is_empty());
    }
}
