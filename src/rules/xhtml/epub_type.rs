//! `§4.2` `epub:type` vocabulary rules (`HTM-015`, `OPF-028`, `OPF-086b`,
//! `OPF-087`, `OPF-088`).

use super::super::RuleContext;
use crate::consts::{RESERVED_EPUB_TYPE_PREFIXES, is_deprecated_epub_type, is_known_epub_type};
use crate::diagnostic::DiagnosticSink;
use crate::xml::{Document, EPUB_NS, Token};

/// Vocabulary tokens valid only on specific structural elements; any token
/// not listed here is considered usable anywhere (`§4.2`).
fn structural_home(token: &str) -> Option<&'static [&'static str]> {
    match token {
        "cover" => Some(&["img", "a", "section", "div"]),
        "toc" => Some(&["nav", "ol", "ul"]),
        "landmarks" => Some(&["nav"]),
        "page-list" => Some(&["nav", "ol", "ul"]),
        "list-item" => Some(&["li"]),
        "table-row" => Some(&["tr"]),
        "table-cell" => Some(&["td", "th"]),
        _ => None,
    }
}

fn declared_prefixes(doc: &Document) -> Vec<String> {
    let mut prefixes = Vec::new();
    for token in &doc.tokens {
        let Token::Start(el) = token else { continue };
        let Some(value) = el.attr_qualified("epub", "prefix").or_else(|| {
            (el.ns.as_deref() == Some(EPUB_NS)).then(|| el.attr("prefix")).flatten()
        }) else {
            continue;
        };
        for entry in value.split(',') {
            if let Some((name, _uri)) = entry.trim().split_once(':') {
                prefixes.push(name.trim().to_owned());
            }
        }
    }
    prefixes
}

pub(super) fn run(ctx: &RuleContext, doc: &Document, sink: &mut DiagnosticSink) {
    let declared = declared_prefixes(doc);
    let single_file = ctx.settings.single_file();

    for token in &doc.tokens {
        let Token::Start(el) = token else { continue };
        let Some(value) = el.attr_qualified("epub", "type") else { continue };

        for raw in value.split_ascii_whitespace() {
            match raw.split_once(':') {
                Some((prefix, _local)) => {
                    if RESERVED_EPUB_TYPE_PREFIXES.contains(&prefix) || declared.iter().any(|p| p == prefix) {
                        continue;
                    }
                    sink.error(
                        "OPF-028",
                        format!("\"{raw}\" uses an undeclared epub:type prefix \"{prefix}\""),
                        Some(ctx.path),
                    );
                }
                None => {
                    if is_deprecated_epub_type(raw) {
                        sink.warning("OPF-086b", format!("\"{raw}\" is a deprecated epub:type value"), Some(ctx.path));
                    } else if !is_known_epub_type(raw) {
                        sink.info("HTM-015", format!("\"{raw}\" is not a recognized epub:type value"), Some(ctx.path));
                        if single_file {
                            sink.info("OPF-088", format!("\"{raw}\" is not a recognized epub:type value"), Some(ctx.path));
                        }
                    } else if let Some(allowed) = structural_home(raw)
                        && !allowed.contains(&el.local.as_str())
                    {
                        sink.warning(
                            "OPF-087",
                            format!("\"{raw}\" is attached to a structurally-inappropriate element \"{}\"", el.local),
                            Some(ctx.path),
                        );
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::publication::ManifestIndex;
    use crate::rules::test_support::{ctx, empty_publication};

    #[test]
    fn test_unknown_token_fires_htm015() {
        let publication = empty_publication();
        let index = ManifestIndex::default();
        let doc = Document::parse(
            br#"<html xmlns="http://www.w3.org/1999/xhtml" xmlns:epub="http://www.idpf.org/2007/ops">
                <body><section epub:type="not-a-real-term"></section></body></html>"#,
        );
        let mut sink = DiagnosticSink::new();
        run(&ctx(&publication, &index), &doc, &mut sink);
        assert!(sink.diagnostics().iter().any(|d| d.check_id == "HTM-015"));
    }

    #[test]
    fn test_deprecated_token_fires_opf086b() {
        let publication = empty_publication();
        let index = ManifestIndex::default();
        let doc = Document::parse(
            br#"<html xmlns="http://www.w3.org/1999/xhtml" xmlns:epub="http://www.idpf.org/2007/ops">
                <body><span epub:type="noteref"></span></body></html>"#,
        );
        let mut sink = DiagnosticSink::new();
        run(&ctx(&publication, &index), &doc, &mut sink);
        assert!(sink.diagnostics().iter().any(|d| d.check_id == "OPF-086b"));
    }

    #[test]
    fn test_undeclared_prefix_fires_opf028() {
        let publication = empty_publication();
        let index = ManifestIndex::default();
        let doc = Document::parse(
            br#"<html xmlns="http://www.w3.org/1999/xhtml" xmlns:epub="http://www.idpf.org/2007/ops">
                <body><span epub:type="foo:bar"></span></body></html>"#,
        );
        let mut sink = DiagnosticSink::new();
        run(&ctx(&publication, &index), &doc, &mut sink);
        assert!(sink.diagnostics().iter().any(|d| d.check_id == "OPF-028"));
    }

    #[test]
    fn test_declared_prefix_is_accepted() {
        let publication = empty_publication();
        let index = ManifestIndex::default();
        let doc = Document::parse(
            br#"<html xmlns="http://www.w3.org/1999/xhtml" xmlns:epub="http://www.idpf.org/2007/ops"
                epub:prefix="foo: http://example.com/vocab/">
                <body><span epub:type="foo:bar"></span></body></html>"#,
        );
        let mut sink = DiagnosticSink::new();
        run(&ctx(&publication, &index), &doc, &mut sink);
        assert!(!sink.diagnostics().iter().any(|d| d.check_id == "OPF-028"));
    }
}
