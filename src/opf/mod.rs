//! The OPF package parser (`C1`), producing the [`Package`] model of `§3`.
//!
//! Grounded on `rbook`'s `ebook::epub::parser::package` module family, but
//! trimmed to the read-only subset `§3` names: no write-back, no TOC
//! preference resolution, no multi-rendition handling.

mod guide;
mod manifest;
mod metadata;
mod spine;

use crate::publication::{Package, MISSING_HREF};
use crate::util::uri;
use crate::xml::{Document, Element, Token};

/// Parses an `.opf` package document into a [`Package`] (`§3`).
///
/// Unlike the content rule sets, a malformed package document is not
/// something this parser can gracefully diagnose per-rule (`§6.1`'s
/// contract is a hard `Package` or `None`); callers should treat a `None`
/// as "validate what's left without package-derived checks", which the
/// rule driver already does (`§4.1`: `package` may be absent).
pub fn parse_package(bytes: &[u8], package_dir: &str) -> Option<Package> {
    let doc = Document::parse(bytes);
    let root = doc.root()?;
    if !root.is_local("package") {
        return None;
    }

    let mut package = Package {
        version: root.attr("version").unwrap_or_default().to_owned(),
        unique_identifier: root.attr("unique-identifier").unwrap_or_default().to_owned(),
        ..Package::default()
    };

    // `element_order`: the observed sequence of child element names of the
    // package root (`§3`, used by the EPUB-2 ordering check).
    package.element_order = direct_children(&doc.tokens, "package")
        .map(|el| el.local.clone())
        .collect();

    package.metadata = metadata::parse_metadata(&doc.tokens, &package.unique_identifier);
    package.manifest = manifest::parse_manifest(&doc.tokens, package_dir);
    let (spine, spine_toc) = spine::parse_spine(&doc.tokens);
    package.spine = spine;
    package.spine_toc = spine_toc;
    package.guide = guide::parse_guide(&doc.tokens, package_dir);
    package.rendition_layout = root
        .attr_qualified("rendition", "layout")
        .unwrap_or_default()
        .to_owned();
    package.bindings_types = parse_bindings(&doc.tokens);

    Some(package)
}

/// Resolve a manifest/guide `href` attribute against the package directory,
/// using the sentinel on failure (`§3`). `href_raw` is percent-decoded
/// first: archive entry names (`Publication.files` keys, `§3`) are the raw
/// bytes of the zip entry name, never percent-encoded, so an encoded OPF
/// href must be decoded before it can match one.
pub(crate) fn resolve_href(package_dir: &str, href_raw: &str) -> String {
    if href_raw.is_empty() {
        return MISSING_HREF.to_owned();
    }
    let decoded = uri::decode(href_raw);
    uri::resolve(package_dir, &decoded).into_owned()
}

/// Iterate the direct children of the first element named `parent_local`,
/// using a depth counter over the flat token stream. Self-closing elements
/// don't push a matching [`Token::End`]; depth only advances for elements
/// that do.
pub(crate) fn direct_children<'a>(tokens: &'a [Token], parent_local: &str) -> Vec<&'a Element> {
    let mut result = Vec::new();
    let mut depth: usize = 0;
    let mut target_depth: Option<usize> = None;

    for token in tokens {
        match token {
            Token::Start(el) => {
                match target_depth {
                    None if el.is_local(parent_local) => target_depth = Some(depth),
                    Some(d) if depth == d + 1 => result.push(el),
                    _ => {}
                }
                if !el.self_closing {
                    depth += 1;
                }
            }
            Token::End { .. } => {
                depth = depth.saturating_sub(1);
                if target_depth == Some(depth) {
                    break; // closed the target element itself
                }
            }
            _ => {}
        }
    }
    result
}

fn parse_bindings(tokens: &[Token]) -> std::collections::HashSet<String> {
    let mut types = std::collections::HashSet::new();
    let mut in_bindings = false;
    for token in tokens {
        match token {
            Token::Start(el) if el.is_local("bindings") => in_bindings = true,
            Token::End { local } if local == "bindings" => in_bindings = false,
            Token::Start(el) if in_bindings && el.is_local("mediaType") => {
                if let Some(handler_type) = el.attr("media-type") {
                    types.insert(handler_type.to_owned());
                }
            }
            _ => {}
        }
    }
    types
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_OPF: &str = r#"<?xml version="1.0"?>
    <package xmlns="http://www.idpf.org/2007/opf" version="3.0" unique-identifier="bid">
      <metadata xmlns:dc="http://purl.org/dc/elements/1.1/">
        <dc:identifier id="bid">urn:uuid:1</dc:identifier>
        <dc:title>Example</dc:title>
        <dc:language>en</dc:language>
      </metadata>
      <manifest>
        <item id="c1" href="c1.xhtml" media-type="application/xhtml+xml"/>
        <item id="nav" href="nav.xhtml" media-type="application/xhtml+xml" properties="nav"/>
      </manifest>
      <spine>
        <itemref idref="c1"/>
      </spine>
    </package>"#;

    #[test]
    fn test_parse_package_basic() {
        let package = parse_package(SAMPLE_OPF.as_bytes(), "EPUB").unwrap();
        assert_eq!("3.0", package.version);
        assert_eq!("bid", package.unique_identifier);
        assert_eq!(2, package.manifest.len());
        assert_eq!("EPUB/c1.xhtml", package.manifest[0].href);
        assert_eq!(1, package.spine.len());
        assert_eq!(vec!["metadata", "manifest", "spine"], package.element_order);
    }
}
