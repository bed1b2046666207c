//! The foreign-resource fallback resolver (`C8`, `§4.7`).

use super::RuleContext;
use crate::consts::{is_core_media_type, is_font_media_type, is_video_media_type};
use crate::diagnostic::DiagnosticSink;
use crate::publication::{ManifestIndex, ManifestItem};
use crate::reference::{self, UrlKind};
use crate::xml::{Document, Element, Token};

fn lookup<'a>(ctx: &RuleContext, index: &'a ManifestIndex, src: &str) -> Option<&'a ManifestItem> {
    if !matches!(reference::classify(src), UrlKind::Local) {
        return None;
    }
    let resolved = reference::resolve(ctx.base_dir, src);
    index.manifest_by_path.get(&resolved)
}

fn is_foreign(item: &ManifestItem) -> bool {
    !is_core_media_type(&item.media_type)
}

fn is_exempt(item: &ManifestItem, context: &str) -> bool {
    is_font_media_type(&item.media_type) || (is_video_media_type(&item.media_type) && matches!(context, "video" | "source" | "img" | "object"))
}

struct MediaGroup {
    satisfied: bool,
    foreign_sources: Vec<String>,
}

struct ObjectFrame {
    has_fallback: bool,
    type_attr: Option<String>,
}

pub(crate) fn run(ctx: &RuleContext, bytes: &[u8], sink: &mut DiagnosticSink) {
    let doc = Document::parse(bytes);
    if doc.error.is_some() {
        return;
    }

    let mut picture_depth: u32 = 0;
    let mut media_stack: Vec<MediaGroup> = Vec::new();
    let mut object_stack: Vec<ObjectFrame> = Vec::new();

    for token in &doc.tokens {
        match token {
            Token::Start(el) if el.is_local("picture") => {
                picture_depth += if el.self_closing { 0 } else { 1 };
            }
            Token::End { local } if local == "picture" && picture_depth > 0 => picture_depth -= 1,

            Token::Start(el) if picture_depth > 0 && el.is_local("img") => check_picture_img(ctx, el, sink),
            Token::Start(el) if picture_depth > 0 && el.is_local("source") => check_picture_source(ctx, el, sink),

            Token::Start(el) if matches!(el.local.as_str(), "audio" | "video") => {
                check_direct_attribute(ctx, el, el.local.as_str(), sink);
                if !el.self_closing {
                    media_stack.push(MediaGroup { satisfied: false, foreign_sources: Vec::new() });
                }
            }
            Token::Start(el) if el.is_local("source") && !media_stack.is_empty() => {
                record_media_source(ctx, el, media_stack.last_mut().unwrap());
            }
            Token::End { local } if matches!(local.as_str(), "audio" | "video") && !media_stack.is_empty() => {
                let group = media_stack.pop().unwrap();
                if !group.satisfied {
                    for src in &group.foreign_sources {
                        sink.error("RSC-032", format!("\"{src}\" is a foreign media source with no core-type sibling"), Some(ctx.path));
                    }
                }
            }

            Token::Start(el) if el.is_local("object") => {
                check_direct_attribute(ctx, el, "object", sink);
                let frame = ObjectFrame { has_fallback: false, type_attr: el.attr("type").map(str::to_owned) };
                if el.self_closing {
                    finish_object(ctx, &frame, sink);
                } else {
                    object_stack.push(frame);
                }
            }
            Token::Start(el) if !object_stack.is_empty() && !el.is_local("param") && !el.is_local("object") => {
                object_stack.last_mut().unwrap().has_fallback = true;
            }
            Token::End { local } if local == "object" && !object_stack.is_empty() => {
                let frame = object_stack.pop().unwrap();
                finish_object(ctx, &frame, sink);
            }

            Token::Start(el) if matches!(el.local.as_str(), "embed" | "track") => {
                check_direct_attribute(ctx, el, el.local.as_str(), sink);
            }
            Token::Start(el) if el.is_local("img") && picture_depth == 0 => {
                check_direct_attribute(ctx, el, "img", sink);
            }
            Token::Start(el) if el.is_local("input") && el.attr("type") == Some("image") => {
                check_direct_attribute(ctx, el, "input", sink);
            }
            Token::Start(el) if el.ns.as_deref() == Some(crate::xml::MATHML_NS) && el.is_local("math") => {
                check_direct_attribute(ctx, el, "math", sink);
            }
            _ => {}
        }
    }
}

fn record_media_source(ctx: &RuleContext, el: &Element, group: &mut MediaGroup) {
    let is_core = if let Some(ty) = el.attr("type") {
        Some(is_core_media_type(ty))
    } else {
        el.attr("src").and_then(|src| lookup(ctx, ctx.index, src)).map(|item| !is_foreign(item))
    };

    match is_core {
        Some(true) => group.satisfied = true,
        Some(false) => {
            if let Some(src) = el.attr("src") {
                group.foreign_sources.push(src.to_owned());
            }
        }
        None => {}
    }
}

fn check_picture_img(ctx: &RuleContext, el: &Element, sink: &mut DiagnosticSink) {
    if let Some(src) = el.attr("src")
        && let Some(item) = lookup(ctx, ctx.index, src)
        && is_foreign(item)
    {
        sink.error("MED-003", format!("\"{src}\" is a foreign resource inside \"picture\""), Some(ctx.path));
    }
    for url in srcset_urls(el.attr("srcset")) {
        if let Some(item) = lookup(ctx, ctx.index, url)
            && is_foreign(item)
        {
            sink.error("MED-003", format!("\"{url}\" is a foreign srcset target inside \"picture\""), Some(ctx.path));
        }
    }
}

fn check_picture_source(ctx: &RuleContext, el: &Element, sink: &mut DiagnosticSink) {
    if let Some(ty) = el.attr("type") {
        if let Some(url) = srcset_urls(el.attr("srcset")).next()
            && let Some(item) = lookup(ctx, ctx.index, url)
            && !item.media_type.eq_ignore_ascii_case(ty)
        {
            sink.error("OPF-013", format!("\"{url}\" manifest media type does not match declared \"type\" \"{ty}\""), Some(ctx.path));
        }
        return;
    }

    for url in srcset_urls(el.attr("srcset")) {
        if let Some(item) = lookup(ctx, ctx.index, url)
            && is_foreign(item)
        {
            sink.error("MED-007", format!("\"{url}\" is a foreign srcset target"), Some(ctx.path));
            return;
        }
    }
}

fn srcset_urls(srcset: Option<&str>) -> impl Iterator<Item = &str> {
    srcset.into_iter().flat_map(|s| s.split(',')).filter_map(|candidate| candidate.trim().split_ascii_whitespace().next())
}

fn check_direct_attribute(ctx: &RuleContext, el: &Element, context: &str, sink: &mut DiagnosticSink) {
    let attr_name = match context {
        "math" => "altimg",
        "object" => "data",
        _ => "src",
    };
    let Some(src) = el.attr(attr_name) else { return };

    if crate::util::uri::is_data_uri(src) {
        if let Some(ty) = crate::util::uri::data_uri_media_type(src)
            && !is_core_media_type(ty)
        {
            sink.error("RSC-032", format!("data URI of type \"{ty}\" is a foreign resource with no fallback"), Some(ctx.path));
        }
        return;
    }

    let Some(item) = lookup(ctx, ctx.index, src) else { return };
    if !is_foreign(item) || is_exempt(item, context) {
        return;
    }
    if item.fallback.is_none() {
        sink.error("RSC-032", format!("\"{src}\" is a foreign resource with no fallback"), Some(ctx.path));
    }
}

fn finish_object(ctx: &RuleContext, frame: &ObjectFrame, sink: &mut DiagnosticSink) {
    if frame.has_fallback {
        return;
    }
    let handled_by_binding = frame
        .type_attr
        .as_deref()
        .is_some_and(|ty| ctx.publication.package.as_ref().is_some_and(|p| p.bindings_types.contains(ty)));
    if !handled_by_binding {
        sink.error("RSC-032", "\"object\" has no HTML fallback and no matching binding handler", Some(ctx.path));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::publication::{ManifestIndex, Publication};
    use crate::rules::test_support::ctx;

    fn manifest_item(href: &str, media_type: &str) -> ManifestItem {
        ManifestItem { id: "x".to_owned(), href: href.to_owned(), media_type: media_type.to_owned(), properties: String::new(), fallback: None, media_overlay: None }
    }

    #[test]
    fn test_foreign_img_without_fallback_fires_rsc032() {
        let publication = Publication::new(Default::default(), "OPS/package.opf".to_owned());
        let mut index = ManifestIndex::default();
        index.manifest_by_path.insert("OPS/pic.jxl".to_owned(), manifest_item("OPS/pic.jxl", "image/jxl"));
        let doc = br#"<html xmlns="http://www.w3.org/1999/xhtml"><body><img src="pic.jxl"/></body></html>"#;
        let mut sink = DiagnosticSink::new();
        run(&ctx(&publication, &index), doc, &mut sink);
        assert!(sink.diagnostics().iter().any(|d| d.check_id == "RSC-032"));
    }

    #[test]
    fn test_picture_with_fallback_source_is_clean() {
        let publication = Publication::new(Default::default(), "OPS/package.opf".to_owned());
        let mut index = ManifestIndex::default();
        index.manifest_by_path.insert("OPS/pic.jxl".to_owned(), manifest_item("OPS/pic.jxl", "image/jxl"));
        index.manifest_by_path.insert("OPS/pic.png".to_owned(), manifest_item("OPS/pic.png", "image/png"));
        let doc = br#"<html xmlns="http://www.w3.org/1999/xhtml"><body>
            <picture><source srcset="pic.jxl" type="image/jxl"/><img src="pic.png"/></picture>
        </body></html>"#;
        let mut sink = DiagnosticSink::new();
        run(&ctx(&publication, &index), doc, &mut sink);
        assert!(!sink.diagnostics().iter().any(|d| d.check_id == "MED-003"));
    }

    #[test]
    fn test_object_without_fallback_fires_rsc032() {
        let publication = Publication::new(Default::default(), "OPS/package.opf".to_owned());
        let index = ManifestIndex::default();
        let doc = br#"<html xmlns="http://www.w3.org/1999/xhtml"><body><object data="a.swf" type="application/x-shockwave-flash"></object></body></html>"#;
        let mut sink = DiagnosticSink::new();
        run(&ctx(&publication, &index), doc, &mut sink);
        assert!(sink.diagnostics().iter().any(|d| d.check_id == "RSC-032"));
    }
}
