//! The NCX / EPUB 2 navigation rule set (`C6`, `§4.5`).

use super::RuleContext;
use crate::consts::is_core_media_type;
use crate::diagnostic::DiagnosticSink;
use crate::reference;
use crate::xml::{Document, Token};
use std::collections::HashSet;

const GUIDE_REFERENCE_TYPES: &[&str] = &[
    "cover", "title-page", "toc", "index", "glossary", "acknowledgements", "bibliography",
    "colophon", "copyright-page", "dedication", "epigraph", "foreword", "loi", "lot", "notes",
    "preface", "text",
];

const PAGE_TARGET_TYPES: &[&str] = &["front", "normal", "special"];

pub(crate) fn run(ctx: &RuleContext, bytes: &[u8], sink: &mut DiagnosticSink) {
    let doc = Document::parse(bytes);
    if let Some(error) = &doc.error {
        sink.fatal("E2-002", format!("NCX document is not well-formed: {error}"), Some(ctx.path));
        return;
    }

    check_nav_map(ctx, &doc, sink);
    check_content_refs(ctx, &doc, sink);
    check_dtb_uid(ctx, &doc, sink);
    check_ids(ctx, &doc, sink);
    check_page_targets(ctx, &doc, sink);
}

fn check_nav_map(ctx: &RuleContext, doc: &Document, sink: &mut DiagnosticSink) {
    let has_nav_map = doc.tokens.iter().any(|t| matches!(t, Token::Start(el) if el.is_local("navMap")));
    if !has_nav_map {
        sink.error("E2-003", "NCX document must contain a \"navMap\"", Some(ctx.path));
        return;
    }

    // Each navPoint must have a direct "content" child; a stack of
    // per-navPoint "seen content" flags distinguishes nesting depth.
    let mut stack: Vec<bool> = Vec::new();
    for token in &doc.tokens {
        match token {
            Token::Start(el) if el.is_local("navPoint") => {
                stack.push(false);
                if el.self_closing {
                    sink.error("E2-007", "\"navPoint\" must have a \"content\" child", Some(ctx.path));
                    stack.pop();
                }
            }
            Token::Start(el) if el.is_local("content") => {
                if let Some(seen) = stack.last_mut() {
                    *seen = true;
                }
            }
            Token::End { local } if local == "navPoint" => {
                if let Some(seen) = stack.pop()
                    && !seen
                {
                    sink.error("E2-007", "\"navPoint\" must have a \"content\" child", Some(ctx.path));
                }
            }
            _ => {}
        }
    }
}

fn check_content_refs(ctx: &RuleContext, doc: &Document, sink: &mut DiagnosticSink) {
    for token in &doc.tokens {
        let Token::Start(el) = token else { continue };
        if !el.is_local("content") {
            continue;
        }
        let Some(src) = el.attr("src") else { continue };
        if src.is_empty() {
            continue;
        }
        let (path, _) = crate::util::uri::split_fragment(src);
        if path.is_empty() {
            continue;
        }
        let resolved = reference::resolve(ctx.base_dir, src);
        if ctx.publication.read_file(&resolved).is_none() {
            sink.error("RSC-007", format!("\"{resolved}\" could not be found in the container"), Some(ctx.path));
            continue;
        }
        if let Some(item) = ctx.index.manifest_by_path.get(&resolved)
            && !item.media_type.eq_ignore_ascii_case("application/xhtml+xml")
            && !is_core_media_type(&item.media_type)
        {
            sink.error("RSC-010", format!("\"{resolved}\" is not an OPS-compatible media type"), Some(ctx.path));
        }
    }
}

fn check_dtb_uid(ctx: &RuleContext, doc: &Document, sink: &mut DiagnosticSink) {
    let dtb_uid = doc.tokens.iter().find_map(|t| match t {
        Token::Start(el) if el.is_local("meta") && el.attr("name") == Some("dtb:uid") => el.attr("content"),
        _ => None,
    });
    let Some(dtb_uid) = dtb_uid else { return };

    let Some(package) = &ctx.publication.package else { return };
    let opf_identifier = package
        .metadata
        .identifiers
        .iter()
        .find(|id| id.id.as_deref() == Some(package.unique_identifier.as_str()))
        .map(|id| id.value.as_str());

    if let Some(opf_identifier) = opf_identifier
        && dtb_uid.trim() != opf_identifier.trim()
    {
        sink.error("NCX-001", format!("\"dtb:uid\" (\"{}\") does not match the OPF unique identifier (\"{}\")", dtb_uid.trim(), opf_identifier.trim()), Some(ctx.path));
    }
}

fn check_ids(ctx: &RuleContext, doc: &Document, sink: &mut DiagnosticSink) {
    let mut seen: HashSet<String> = HashSet::new();
    for token in &doc.tokens {
        let Token::Start(el) = token else { continue };
        let Some(id) = el.attr("id") else { continue };

        if !is_valid_ncname(id) {
            sink.error("RSC-005", format!("\"{id}\" is not a valid XML NCName"), Some(ctx.path));
        }
        if !seen.insert(id.to_owned()) {
            sink.error("RSC-005", format!("duplicate \"id\" value \"{id}\""), Some(ctx.path));
        }
    }
}

fn check_page_targets(ctx: &RuleContext, doc: &Document, sink: &mut DiagnosticSink) {
    for token in &doc.tokens {
        let Token::Start(el) = token else { continue };
        if !el.is_local("pageTarget") {
            continue;
        }
        if let Some(ty) = el.attr("type")
            && !PAGE_TARGET_TYPES.contains(&ty)
        {
            sink.error("RSC-005", format!("\"pageTarget\" type \"{ty}\" is not one of {{front, normal, special}}"), Some(ctx.path));
        }
    }
}

/// Guide refs (EPUB 2): reference types checked against a fixed allow-list
/// plus an `other.*` prefix (`§4.5`). Run once per publication from the
/// package-level pass, not per-NCX-document.
pub(crate) fn check_guide_refs(package: &crate::publication::Package, sink: &mut DiagnosticSink) {
    for guide_ref in &package.guide {
        let ty = guide_ref.r#type.as_str();
        if !GUIDE_REFERENCE_TYPES.contains(&ty) && !ty.starts_with("other.") {
            sink.warning("RSC-005", format!("guide reference type \"{ty}\" is not recognized"), Some(guide_ref.href.as_str()));
        }
    }
}

fn is_valid_ncname(s: &str) -> bool {
    let mut chars = s.chars();
    let Some(first) = chars.next() else { return false };
    if !(first.is_alphabetic() || first == '_') || first == ':' {
        return false;
    }
    chars.all(|c| c.is_alphanumeric() || c == '_' || c == '-' || c == '.') && !s.contains(':')
}
