//! `§4.2` shape rules: head/title/body/html cardinality and the DOCTYPE
//! form check (`HTM-002`, `HTM-010`, `HTM-011`, `HTM-018`, `HTM-019`,
//! `HTM-024`).

use super::super::RuleContext;
use crate::diagnostic::DiagnosticSink;
use crate::xml::{Document, Token};

pub(super) fn run(ctx: &RuleContext, doc: &Document, sink: &mut DiagnosticSink) {
    check_doctype(ctx, doc, sink);
    check_elements(ctx, doc, sink);
}

fn check_doctype(ctx: &RuleContext, doc: &Document, sink: &mut DiagnosticSink) {
    for token in &doc.tokens {
        let Token::Doctype(text) = token else { continue };

        let is_legacy_form = ["PUBLIC", "SYSTEM", "XHTML", "DTD"]
            .iter()
            .any(|needle| text.contains(needle));
        if !is_legacy_form {
            continue;
        }

        if !ctx.is_epub3() {
            // A legacy DOCTYPE is the ordinary, conformant form for EPUB 2;
            // nothing to report.
            continue;
        }

        if ctx.is_epub3_fallback {
            sink.warning("HTM-011", "legacy DOCTYPE retained in an EPUB 3 fallback document", Some(ctx.path));
        } else {
            sink.error("HTM-010", "the DOCTYPE must be the HTML5 form \"<!DOCTYPE html>\"", Some(ctx.path));
        }
    }
}

fn check_elements(ctx: &RuleContext, doc: &Document, sink: &mut DiagnosticSink) {
    let mut html_count = 0;
    let mut body_count = 0;
    let mut head_count = 0;
    let mut title_count = 0;

    for token in &doc.tokens {
        let Token::Start(el) = token else { continue };
        match el.local.as_str() {
            "html" => html_count += 1,
            "body" => body_count += 1,
            "head" => head_count += 1,
            "title" => title_count += 1,
            _ => {}
        }
    }

    match doc.root() {
        Some(root) if root.local == "html" => {}
        _ => sink.error("HTM-019", "the document element must be \"html\"", Some(ctx.path)),
    }

    if html_count > 0 {
        if head_count == 0 {
            sink.error("HTM-024", "\"head\" is missing", Some(ctx.path));
        }
        if title_count == 0 {
            sink.warning("HTM-002", "\"head\" must contain a \"title\" element", Some(ctx.path));
        }
    }

    if body_count != 1 {
        sink.error("HTM-018", "the document must contain exactly one \"body\" element", Some(ctx.path));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostic::Severity;
    use crate::rules::test_support::{ctx, empty_publication};
    use crate::publication::ManifestIndex;

    #[test]
    fn test_missing_title_warns() {
        let publication = empty_publication();
        let index = ManifestIndex::default();
        let doc = Document::parse(br#"<html><head></head><body><p>x</p></body></html>"#);
        let mut sink = DiagnosticSink::new();
        run(&ctx(&publication, &index), &doc, &mut sink);
        assert_eq!(1, sink.diagnostics().len());
        assert_eq!("HTM-002", sink.diagnostics()[0].check_id);
        assert_eq!(Severity::Warning, sink.diagnostics()[0].severity);
    }

    #[test]
    fn test_duplicate_body_errors() {
        let publication = empty_publication();
        let index = ManifestIndex::default();
        let doc = Document::parse(
            br#"<html><head><title>t</title></head><body></body><body></body></html>"#,
        );
        let mut sink = DiagnosticSink::new();
        run(&ctx(&publication, &index), &doc, &mut sink);
        assert!(sink.diagnostics().iter().any(|d| d.check_id == "HTM-018"));
    }

    #[test]
    fn test_legacy_doctype_fires_htm010_on_epub3() {
        let publication = empty_publication();
        let index = ManifestIndex::default();
        let doc = Document::parse(
            b"<!DOCTYPE html PUBLIC \"-//W3C//DTD XHTML 1.1//EN\" \"xhtml11.dtd\"><html><head><title>t</title></head><body></body></html>",
        );
        let mut sink = DiagnosticSink::new();
        run(&ctx(&publication, &index), &doc, &mut sink);
        assert!(sink.diagnostics().iter().any(|d| d.check_id == "HTM-010"));
    }

    #[test]
    fn test_legacy_doctype_fires_nothing_on_true_epub2() {
        let publication = empty_publication();
        let index = ManifestIndex::default();
        let doc = Document::parse(
            b"<!DOCTYPE html PUBLIC \"-//NISO//DTD OEBPS Document 1.2//EN\" \"oebps.dtd\"><html><head><title>t</title></head><body></body></html>",
        );
        let mut sink = DiagnosticSink::new();
        let ctx = RuleContext { version_major: 2, ..ctx(&publication, &index) };
        run(&ctx, &doc, &mut sink);
        assert!(!sink.diagnostics().iter().any(|d| d.check_id == "HTM-010" || d.check_id == "HTM-011"));
    }

    #[test]
    fn test_legacy_doctype_fires_htm011_on_epub3_fallback_document() {
        let publication = empty_publication();
        let index = ManifestIndex::default();
        let doc = Document::parse(
            b"<!DOCTYPE html PUBLIC \"-//W3C//DTD XHTML 1.1//EN\" \"xhtml11.dtd\"><html><head><title>t</title></head><body></body></html>",
        );
        let mut sink = DiagnosticSink::new();
        let ctx = RuleContext { is_epub3_fallback: true, ..ctx(&publication, &index) };
        run(&ctx, &doc, &mut sink);
        assert!(sink.diagnostics().iter().any(|d| d.check_id == "HTM-011"));
        assert!(!sink.diagnostics().iter().any(|d| d.check_id == "HTM-010"));
    }

    #[test]
    fn test_wrong_root_errors() {
        let publication = empty_publication();
        let index = ManifestIndex::default();
        let doc = Document::parse(br#"<svg xmlns="http://www.w3.org/2000/svg"></svg>"#);
        let mut sink = DiagnosticSink::new();
        run(&ctx(&publication, &index), &doc, &mut sink);
        assert!(sink.diagnostics().iter().any(|d| d.check_id == "HTM-019"));
    }
}
