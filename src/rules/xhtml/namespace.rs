//! `§4.2` namespace rules: the `<html>` root namespace (`HTM-012`), the
//! custom-attribute namespace allow-list (`HTM-031`), and reserved-host
//! URLs outside that allow-list (`HTM-054`).

use super::super::RuleContext;
use crate::consts::ALLOWED_ATTRIBUTE_NAMESPACES;
use crate::diagnostic::DiagnosticSink;
use crate::xml::{Document, Token, XHTML_NS};

const RESERVED_HOSTS: &[&str] = &["w3.org", "idpf.org"];

pub(super) fn run(ctx: &RuleContext, doc: &Document, sink: &mut DiagnosticSink) {
    if let Some(root) = doc.root()
        && root.local == "html"
        && root.ns.as_deref() != Some(XHTML_NS)
    {
        sink.error("HTM-012", "the root \"html\" element must be in the XHTML namespace", Some(ctx.path));
    }

    for token in &doc.tokens {
        let Token::Start(el) = token else { continue };
        for attr in &el.attrs {
            let Some(ns) = &attr.ns else { continue };
            if ALLOWED_ATTRIBUTE_NAMESPACES.contains(&ns.as_str()) {
                continue;
            }

            if RESERVED_HOSTS.iter().any(|host| ns.contains(host)) {
                sink.error(
                    "HTM-054",
                    format!("attribute \"{}\" uses a reserved-host namespace not on the allow-list", attr.raw_name),
                    Some(ctx.path),
                );
            } else {
                sink.error(
                    "HTM-031",
                    format!("attribute \"{}\" uses a namespace not on the allow-list", attr.raw_name),
                    Some(ctx.path),
                );
            }
        }
    }
}
