//! The XHTML content rule set (`C3`, `§4.2`).

mod content_model;
mod epub_type;
mod ids;
mod namespace;
mod properties;
mod shape;
mod urls;
mod wellformed;

use super::RuleContext;
use crate::diagnostic::DiagnosticSink;
use crate::xml::Document;

/// Runs every XHTML rule over one document, in the fixed order `§4.2`/`§5`
/// require. A well-formedness failure stops content-rule processing for
/// this document entirely (`§4.2`); the driver moves on to the next
/// manifest item regardless (`§5`).
pub(crate) fn run(ctx: &RuleContext, bytes: &[u8], sink: &mut DiagnosticSink) {
    let doc = Document::parse(bytes);

    if let Some(error) = &doc.error {
        wellformed::report(ctx, error, sink);
        return;
    }

    shape::run(ctx, &doc, sink);
    namespace::run(ctx, &doc, sink);
    ids::run(ctx, &doc, sink);
    epub_type::run(ctx, &doc, sink);
    properties::run(ctx, &doc, sink);
    content_model::run(ctx, &doc, sink);
    urls::run(ctx, &doc, sink);
}
