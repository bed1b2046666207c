//! The SVG content rule set (`C4`, `§4.3`).

use super::RuleContext;
use crate::diagnostic::DiagnosticSink;
use crate::xml::{Document, MATHML_NS, SVG_NS, Token, XHTML_NS};

/// A representative slice of the SVG element vocabulary; anything else
/// encountered directly in the SVG namespace is foreign (`RSC-025`).
const SVG_VOCABULARY: &[&str] = &[
    "svg", "g", "a", "symbol", "use", "defs", "title", "desc", "path", "rect", "circle", "ellipse",
    "line", "polyline", "polygon", "text", "tspan", "textPath", "image", "foreignObject", "switch",
    "clipPath", "mask", "pattern", "marker", "linearGradient", "radialGradient", "stop", "filter",
    "animate", "animateTransform", "animateMotion", "set", "style", "metadata", "view",
];

/// SVG `epub:type` vocabulary is restricted to shape/text/structural
/// grouping terms (`§4.3`); a representative allow-list.
const SVG_EPUB_TYPE_VOCABULARY: &[&str] = &["cover", "figure", "table", "list", "list-item", "title"];

const FOREIGN_OBJECT_DISALLOWED: &[&str] = &["title", "meta", "link", "style", "base", "head", "body"];

fn has_fragment_target(href: &str) -> bool {
    href.contains('#')
}

pub(crate) fn run(ctx: &RuleContext, bytes: &[u8], sink: &mut DiagnosticSink) {
    let doc = Document::parse(bytes);
    if let Some(error) = &doc.error {
        sink.fatal(error.classify(), format!("document is not well-formed: {error}"), Some(ctx.path));
        return;
    }

    check_root_viewbox(ctx, &doc, sink);
    let symbol_ids = collect_symbol_ids(&doc);
    check_symbol_links(ctx, &doc, sink, &symbol_ids);
    check_foreign_object(ctx, &doc, sink);
    check_title_content(ctx, &doc, sink);
    check_use_href(ctx, &doc, sink);
    check_epub_type(ctx, &doc, sink);
    check_vocabulary(ctx, &doc, sink);
}

fn check_root_viewbox(ctx: &RuleContext, doc: &Document, sink: &mut DiagnosticSink) {
    let Some(root) = doc.root() else { return };
    if root.is_ns(SVG_NS, "svg") && ctx.is_fxl && ctx.in_spine && root.attr("viewBox").is_none() {
        sink.error("HTM-048", "the root \"svg\" element of a fixed-layout document must have \"viewBox\"", Some(ctx.path));
    }
}

fn collect_symbol_ids(doc: &Document) -> std::collections::HashSet<String> {
    let mut ids = std::collections::HashSet::new();
    let mut symbol_depth = 0u32;
    for token in &doc.tokens {
        match token {
            Token::Start(el) if el.is_ns(SVG_NS, "symbol") => {
                symbol_depth += 1;
                if let Some(id) = el.attr("id") {
                    ids.insert(id.to_owned());
                }
            }
            Token::Start(el) if symbol_depth > 0 => {
                if let Some(id) = el.attr("id") {
                    ids.insert(id.to_owned());
                }
            }
            Token::End { local } if local == "symbol" && symbol_depth > 0 => symbol_depth -= 1,
            _ => {}
        }
    }
    ids
}

fn check_symbol_links(ctx: &RuleContext, doc: &Document, sink: &mut DiagnosticSink, symbol_ids: &std::collections::HashSet<String>) {
    for token in &doc.tokens {
        let Token::Start(el) = token else { continue };
        if !el.is_local("a") {
            continue;
        }
        let href = el.attr("href").or_else(|| el.attr_qualified("xlink", "href"));
        if let Some(href) = href
            && let Some(id) = href.strip_prefix('#')
            && symbol_ids.contains(id)
        {
            sink.error("RSC-014", format!("\"a\" links to \"#{id}\", which belongs to a \"symbol\""), Some(ctx.path));
        }
    }
}

fn check_foreign_object(ctx: &RuleContext, doc: &Document, sink: &mut DiagnosticSink) {
    let mut depth_in_foreign_object: Option<u32> = None;
    for token in &doc.tokens {
        match token {
            Token::Start(el) if el.is_ns(SVG_NS, "foreignObject") => {
                depth_in_foreign_object = Some(0);
            }
            Token::Start(el) if depth_in_foreign_object == Some(0) => {
                if FOREIGN_OBJECT_DISALLOWED.contains(&el.local.as_str()) {
                    sink.error("RSC-005", format!("\"{}\" is not permitted as a direct child of \"foreignObject\"", el.local), Some(ctx.path));
                }
                if !el.self_closing {
                    depth_in_foreign_object = Some(1);
                }
            }
            Token::Start(_) if depth_in_foreign_object.is_some() => {
                if let Some(d) = depth_in_foreign_object {
                    depth_in_foreign_object = Some(d + 1);
                }
            }
            Token::End { local } if local == "foreignObject" => depth_in_foreign_object = None,
            Token::End { .. } if depth_in_foreign_object.is_some() => {
                depth_in_foreign_object = depth_in_foreign_object.map(|d| d.saturating_sub(1));
            }
            _ => {}
        }
    }
}

fn check_title_content(ctx: &RuleContext, doc: &Document, sink: &mut DiagnosticSink) {
    let mut in_title_depth: Option<u32> = None;
    for token in &doc.tokens {
        match token {
            Token::Start(el) if el.is_ns(SVG_NS, "title") => in_title_depth = Some(0),
            Token::Start(el) if in_title_depth.is_some() => {
                if el.ns.as_deref() == Some(XHTML_NS) && el.attr("xmlns").is_some() && !crate::consts::is_phrasing_only_container(&el.local) {
                    sink.error("RSC-005", format!("\"{}\" is not HTML phrasing content inside \"title\"", el.local), Some(ctx.path));
                }
                in_title_depth = in_title_depth.map(|d| d + if el.self_closing { 0 } else { 1 });
            }
            Token::End { local } if local == "title" => in_title_depth = None,
            Token::End { .. } if in_title_depth.is_some() => {
                in_title_depth = in_title_depth.map(|d| d.saturating_sub(1));
            }
            _ => {}
        }
    }
}

fn check_use_href(ctx: &RuleContext, doc: &Document, sink: &mut DiagnosticSink) {
    for token in &doc.tokens {
        let Token::Start(el) = token else { continue };
        if !el.is_ns(SVG_NS, "use") {
            continue;
        }
        let href = el.attr("href").or_else(|| el.attr_qualified("xlink", "href"));
        if let Some(href) = href
            && !has_fragment_target(href)
        {
            sink.error("RSC-005", "\"use\" href must contain a fragment identifier", Some(ctx.path));
        }
    }
}

fn check_epub_type(ctx: &RuleContext, doc: &Document, sink: &mut DiagnosticSink) {
    for token in &doc.tokens {
        let Token::Start(el) = token else { continue };
        let Some(value) = el.attr_qualified("epub", "type") else { continue };
        for token in value.split_ascii_whitespace() {
            if token.contains(':') {
                continue;
            }
            if !SVG_EPUB_TYPE_VOCABULARY.contains(&token) {
                sink.warning("OPF-087", format!("\"{token}\" is not permitted on SVG elements"), Some(ctx.path));
            }
        }
    }
}

fn check_vocabulary(ctx: &RuleContext, doc: &Document, sink: &mut DiagnosticSink) {
    let mut foreign_object_depth = 0u32;
    for token in &doc.tokens {
        match token {
            Token::Start(el) if el.is_ns(SVG_NS, "foreignObject") => foreign_object_depth += 1,
            Token::End { local } if local == "foreignObject" && foreign_object_depth > 0 => foreign_object_depth -= 1,
            Token::Start(el) if foreign_object_depth == 0 => {
                let is_mathml = el.ns.as_deref() == Some(MATHML_NS);
                let is_svg_vocab = el.ns.as_deref() == Some(SVG_NS) && SVG_VOCABULARY.contains(&el.local.as_str());
                if !is_mathml && !is_svg_vocab {
                    sink.usage("RSC-025", format!("\"{}\" is not part of the SVG vocabulary", el.local), Some(ctx.path));
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::publication::ManifestIndex;
    use crate::rules::test_support::{empty_publication, fxl_ctx};

    #[test]
    fn test_fxl_svg_without_viewbox_fires_htm048() {
        let publication = empty_publication();
        let index = ManifestIndex::default();
        let mut sink = DiagnosticSink::new();
        run(&fxl_ctx(&publication, &index), br#"<svg xmlns="http://www.w3.org/2000/svg"></svg>"#, &mut sink);
        assert!(sink.diagnostics().iter().any(|d| d.check_id == "HTM-048"));
    }

    #[test]
    fn test_use_href_without_fragment_fires_rsc005() {
        let publication = empty_publication();
        let index = ManifestIndex::default();
        let doc_bytes: &[u8] = br#"<svg xmlns="http://www.w3.org/2000/svg"><use href="icons.svg"></use></svg>"#;
        let mut sink = DiagnosticSink::new();
        run(&fxl_ctx(&publication, &index), doc_bytes, &mut sink);
        assert!(sink.diagnostics().iter().any(|d| d.check_id == "RSC-005"));
    }

    #[test]
    fn test_symbol_link_fires_rsc014() {
        let publication = empty_publication();
        let index = ManifestIndex::default();
        let doc_bytes: &[u8] = br#"<svg xmlns="http://www.w3.org/2000/svg">
            <symbol id="icon-a"></symbol>
            <a href="#icon-a"><text>x</text></a>
        </svg>"#;
        let mut sink = DiagnosticSink::new();
        run(&fxl_ctx(&publication, &index), doc_bytes, &mut sink);
        assert!(sink.diagnostics().iter().any(|d| d.check_id == "RSC-014"));
    }
}
