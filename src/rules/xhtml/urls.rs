//! `§4.8`/`§4.2` URL, fragment and hyperlink-spine-membership rules
//! (`HTM-008`/`022`/`023`/`025`/`027`/`028`, `RSC-006`/`007`/`008`/`011`/
//! `012`/`013`).

use super::super::RuleContext;
use crate::diagnostic::DiagnosticSink;
use crate::reference::{self, UrlKind};
use crate::xml::{Document, Token};

fn external_base(doc: &Document) -> bool {
    if let Some(root) = doc.root()
        && let Some(xml_base) = root.attr_qualified("xml", "base")
        && crate::util::uri::is_remote(xml_base)
    {
        return true;
    }
    doc.tokens.iter().any(|t| matches!(t, Token::Start(el) if el.is_local("base") && el.attr("href").is_some_and(crate::util::uri::is_remote)))
}

pub(super) fn run(ctx: &RuleContext, doc: &Document, sink: &mut DiagnosticSink) {
    let own_ids = reference::collect_ids(&doc.tokens);
    let suppress_fragment_checks = external_base(doc);

    for token in &doc.tokens {
        let Token::Start(el) = token else { continue };

        if el.is_local("a") {
            check_hyperlink(ctx, el, sink, &own_ids, suppress_fragment_checks);
        }
        if el.is_local("link") && el.attr("rel").is_some_and(|r| r.split_ascii_whitespace().any(|t| t.eq_ignore_ascii_case("stylesheet"))) {
            check_stylesheet(ctx, el, sink, suppress_fragment_checks);
        }
    }
}

fn check_hyperlink(
    ctx: &RuleContext,
    el: &crate::xml::Element,
    sink: &mut DiagnosticSink,
    own_ids: &std::collections::HashSet<String>,
    suppress_fragment_checks: bool,
) {
    let Some(href) = el.attr("href") else { return };
    if href.is_empty() {
        sink.error("HTM-008", "\"a\" must carry a non-empty \"href\"", Some(ctx.path));
        return;
    }
    if href.contains(' ') || href.contains('\t') {
        sink.warning("HTM-022", "href contains unescaped whitespace", Some(ctx.path));
    }

    match reference::classify(href) {
        UrlKind::Remote | UrlKind::File | UrlKind::Data => {}
        UrlKind::Local => {
            let resolved = reference::resolve(ctx.base_dir, href);
            if resolved.starts_with("..") || resolved.starts_with('/') {
                sink.error("HTM-023", format!("resolved href \"{resolved}\" escapes the container root"), Some(ctx.path));
                return;
            }

            // `§4.1`/`§9`: RSC-011/RSC-012 skip nav documents, replicating a
            // known divergence in the source implementation (see DESIGN.md).
            if !ctx.is_nav
                && !suppress_fragment_checks
                && !reference::resolve_fragment(ctx.publication, ctx.base_dir, href, own_ids)
            {
                let (_, fragment) = crate::util::uri::split_fragment(href);
                sink.error("RSC-012", format!("\"{fragment}\" could not be found in \"{resolved}\""), Some(ctx.path));
            }

            let (path, _) = crate::util::uri::split_fragment(href);
            if path.is_empty() {
                // Same-document fragment only; nothing further resolves.
                return;
            }

            let exists = ctx.publication.read_file(&resolved).is_some();
            if !exists {
                sink.error("RSC-007", format!("\"{resolved}\" could not be found in the container"), Some(ctx.path));
                return;
            }

            if !ctx.is_nav
                && let Some(item) = ctx.index.manifest_by_path.get(&resolved)
                && reference::requires_spine_membership(&item.media_type)
                && !reference::is_in_spine(ctx.index, &resolved)
            {
                sink.error("RSC-011", format!("\"{resolved}\" is not in the spine"), Some(ctx.path));
            }
        }
    }
}

fn check_stylesheet(ctx: &RuleContext, el: &crate::xml::Element, sink: &mut DiagnosticSink, suppress_fragment_checks: bool) {
    let Some(href) = el.attr("href") else { return };
    if href.is_empty() {
        return;
    }

    match reference::classify(href) {
        UrlKind::Remote => {}
        UrlKind::File | UrlKind::Data => {}
        UrlKind::Local => {
            if suppress_fragment_checks {
                sink.warning("RSC-006", "relative stylesheet reference resolves against an external base URL", Some(ctx.path));
                return;
            }
            let resolved = reference::resolve(ctx.base_dir, href);
            if ctx.publication.read_file(&resolved).is_none() {
                sink.error("RSC-008", format!("\"{resolved}\" could not be found in the container"), Some(ctx.path));
            } else if let Some(item) = ctx.index.manifest_by_path.get(&resolved)
                && !item.media_type.eq_ignore_ascii_case("text/css")
            {
                sink.error("RSC-013", format!("\"{resolved}\" is not declared as \"text/css\""), Some(ctx.path));
            }
        }
    }
}
