//! `§4.2` id rules: duplicate `id` values (`HTM-016`) and IDREF attributes
//! that don't resolve within the same document (`RSC-005`).

use super::super::RuleContext;
use crate::consts::{IDREF_ATTRIBUTES, MULTI_VALUED_IDREF_ATTRIBUTES};
use crate::diagnostic::DiagnosticSink;
use crate::xml::{Document, Token};
use std::collections::HashMap;

pub(super) fn run(ctx: &RuleContext, doc: &Document, sink: &mut DiagnosticSink) {
    let mut counts: HashMap<&str, u32> = HashMap::new();
    for token in &doc.tokens {
        if let Token::Start(el) = token
            && let Some(id) = el.attr("id")
        {
            *counts.entry(id).or_insert(0) += 1;
        }
    }

    // Every occurrence of a duplicate id fires its own diagnostic
    // (`§4.2`: "the dup ID is reported N times when count = N").
    for token in &doc.tokens {
        if let Token::Start(el) = token
            && let Some(id) = el.attr("id")
            && counts.get(id).copied().unwrap_or(0) > 1
        {
            sink.error("HTM-016", format!("Duplicate ID \"{id}\"."), Some(ctx.path));
        }
    }

    let ids: std::collections::HashSet<&str> = counts.keys().copied().collect();
    for token in &doc.tokens {
        let Token::Start(el) = token else { continue };
        for name in IDREF_ATTRIBUTES {
            let Some(value) = el.attr(name) else { continue };
            if MULTI_VALUED_IDREF_ATTRIBUTES.contains(name) {
                for part in value.split_ascii_whitespace() {
                    if !ids.contains(part) {
                        sink.error(
                            "RSC-005",
                            format!("\"{name}\" references an id \"{part}\" that does not exist"),
                            Some(ctx.path),
                        );
                    }
                }
            } else if !value.is_empty() && !ids.contains(value) {
                sink.error(
                    "RSC-005",
                    format!("\"{name}\" references an id \"{value}\" that does not exist"),
                    Some(ctx.path),
                );
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
    fn test_duplicate_id_reports_once_per_occurrence() {
        let publication = empty_publication();
        let index = ManifestIndex::default();
        let doc = Document::parse(
            br#"<html xmlns="http://www.w3.org/1999/xhtml"><body><p id="x"></p><p id="x"></p></body></html>"#,
        );
        let mut sink = DiagnosticSink::new();
        run(&ctx(&publication, &index), &doc, &mut sink);
        let dups: Vec<_> = sink.diagnostics().iter().filter(|d| d.check_id == "HTM-016").collect();
        assert_eq!(2, dups.len());
    }

    #[test]
    fn test_dangling_idref_fires_rsc005() {
        let publication = empty_publication();
        let index = ManifestIndex::default();
        let doc = Document::parse(
            br#"<html xmlns="http://www.w3.org/1999/xhtml"><body><label for="missing"></label></body></html>"#,
        );
        let mut sink = DiagnosticSink::new();
        run(&ctx(&publication, &index), &doc, &mut sink);
        assert!(sink.diagnostics().iter().any(|d| d.check_id == "RSC-005"));
    }

    #[test]
    fn test_multi_valued_idref_each_token_checked() {
        let publication = empty_publication();
        let index = ManifestIndex::default();
        let doc = Document::parse(
            br#"<html xmlns="http://www.w3.org/1999/xhtml"><body>
                <td id="a"></td><td headers="a missing"></td>
            </body></html>"#,
        );
        let mut sink = DiagnosticSink::new();
        run(&ctx(&publication, &index), &doc, &mut sink);
        assert_eq!(1, sink.diagnostics().iter().filter(|d| d.check_id == "RSC-005").count());
    }
}
