//! `§4.2` property-declaration consistency (`OPF-014`, `OPF-015`,
//! `OPF-018`, `OPF-018b` + `RSC-006b`).

use super::super::RuleContext;
use crate::diagnostic::DiagnosticSink;
use crate::publication::has_property;
use crate::util::uri::is_remote;
use crate::xml::{EPUB_NS, Document, MATHML_NS, SVG_NS, Token};

const MEDIA_SRC_ELEMENTS: &[&str] = &["img", "audio", "video", "source", "track", "embed", "iframe"];

#[derive(Default)]
struct Capabilities {
    scripted: bool,
    svg: bool,
    mathml: bool,
    switch: bool,
    remote_resources: bool,
}

fn is_executable_script(el: &crate::xml::Element) -> bool {
    match el.attr("type") {
        None => true,
        Some(t) if t.trim().is_empty() => true,
        Some(t) => {
            let t = t.trim().to_ascii_lowercase();
            t == "text/javascript" || t == "application/javascript" || t == "module"
        }
    }
}

fn scan(doc: &Document) -> Capabilities {
    let mut caps = Capabilities::default();

    for token in &doc.tokens {
        match token {
            Token::Start(el) => {
                if el.is_local("script") && is_executable_script(el) {
                    caps.scripted = true;
                }
                if el.is_local("form") {
                    caps.scripted = true;
                }
                if el.ns.as_deref() == Some(SVG_NS) {
                    caps.svg = true;
                }
                if el.ns.as_deref() == Some(MATHML_NS) {
                    caps.mathml = true;
                }
                if el.ns.as_deref() == Some(EPUB_NS) && el.is_local("switch") {
                    caps.switch = true;
                }

                if MEDIA_SRC_ELEMENTS.contains(&el.local.as_str())
                    && el.attr("src").is_some_and(is_remote)
                {
                    caps.remote_resources = true;
                }
                if el.is_local("video") && el.attr("poster").is_some_and(is_remote) {
                    caps.remote_resources = true;
                }
                if el.is_local("object") && el.attr("data").is_some_and(is_remote) {
                    caps.remote_resources = true;
                }
                if el.is_local("link")
                    && el.attr("rel").is_some_and(|r| r.eq_ignore_ascii_case("stylesheet"))
                    && el.attr("href").is_some_and(is_remote)
                {
                    caps.remote_resources = true;
                }
            }
            Token::Text(text) if text.contains("@import") || text.contains("url(") => {
                if text.contains("http://") || text.contains("https://") {
                    caps.remote_resources = true;
                }
            }
            _ => {}
        }
    }

    caps
}

pub(super) fn run(ctx: &RuleContext, doc: &Document, sink: &mut DiagnosticSink) {
    let properties = ctx
        .index
        .manifest_by_path
        .get(ctx.path)
        .map(|item| item.properties.as_str())
        .unwrap_or_default();
    let caps = scan(doc);

    check_token(ctx, sink, properties, "scripted", caps.scripted);
    check_token(ctx, sink, properties, "svg", caps.svg);
    check_token(ctx, sink, properties, "mathml", caps.mathml);
    check_token(ctx, sink, properties, "switch", caps.switch);

    let remote_declared = has_property(properties, "remote-resources");
    if caps.remote_resources && !remote_declared {
        sink.error("OPF-014", "property \"remote-resources\" is required but not declared", Some(ctx.path));
    } else if remote_declared && !caps.remote_resources {
        if caps.scripted {
            sink.usage("OPF-018b", "property \"remote-resources\" is declared but not used", Some(ctx.path));
            sink.usage("RSC-006b", "property \"remote-resources\" is declared but not used", Some(ctx.path));
        } else {
            sink.usage("OPF-018", "property \"remote-resources\" is declared but not used", Some(ctx.path));
        }
    }
}

fn check_token(ctx: &RuleContext, sink: &mut DiagnosticSink, properties: &str, token: &'static str, present: bool) {
    let declared = has_property(properties, token);
    if present && !declared {
        sink.error("OPF-014", format!("property \"{token}\" is required but not declared"), Some(ctx.path));
    } else if declared && !present {
        sink.warning("OPF-015", format!("property \"{token}\" is declared but not needed"), Some(ctx.path));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::publication::ManifestIndex;
    use crate::rules::test_support::{ctx, empty_publication};

    #[test]
    fn test_script_without_property_fires_opf014() {
        let publication = empty_publication();
        let index = ManifestIndex::default();
        let doc = Document::parse(
            br#"<html xmlns="http://www.w3.org/1999/xhtml"><body><script>1;</script></body></html>"#,
        );
        let mut sink = DiagnosticSink::new();
        run(&ctx(&publication, &index), &doc, &mut sink);
        assert!(sink.diagnostics().iter().any(|d| d.check_id == "OPF-014"));
    }

    #[test]
    fn test_unneeded_property_fires_opf015() {
        let publication = empty_publication();
        let mut index = ManifestIndex::default();
        index.manifest_by_path.insert(
            "OPS/c1.xhtml".to_owned(),
            crate::publication::ManifestItem {
                id: "c1".to_owned(),
                href: "OPS/c1.xhtml".to_owned(),
                media_type: "application/xhtml+xml".to_owned(),
                properties: "scripted svg".to_owned(),
                fallback: None,
                media_overlay: None,
            },
        );
        let doc = Document::parse(br#"<html xmlns="http://www.w3.org/1999/xhtml"><body></body></html>"#);
        let mut sink = DiagnosticSink::new();
        run(&ctx(&publication, &index), &doc, &mut sink);
        let opf015: Vec<_> = sink.diagnostics().iter().filter(|d| d.check_id == "OPF-015").collect();
        assert_eq!(2, opf015.len());
    }

    #[test]
    fn test_remote_resources_unused_non_scripted_fires_opf018() {
        let publication = empty_publication();
        let mut index = ManifestIndex::default();
        index.manifest_by_path.insert(
            "OPS/c1.xhtml".to_owned(),
            crate::publication::ManifestItem {
                id: "c1".to_owned(),
                href: "OPS/c1.xhtml".to_owned(),
                media_type: "application/xhtml+xml".to_owned(),
                properties: "remote-resources".to_owned(),
                fallback: None,
                media_overlay: None,
            },
        );
        let doc = Document::parse(br#"<html xmlns="http://www.w3.org/1999/xhtml"><body></body></html>"#);
        let mut sink = DiagnosticSink::new();
        run(&ctx(&publication, &index), &doc, &mut sink);
        assert!(sink.diagnostics().iter().any(|d| d.check_id == "OPF-018"));
    }
}
