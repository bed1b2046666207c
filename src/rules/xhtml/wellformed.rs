//! `§4.2` well-formedness: `HTM-001` / `HTM-017` / `HTM-029`, all `fatal`.

use super::super::RuleContext;
use crate::diagnostic::DiagnosticSink;
use crate::xml::XmlError;

pub(super) fn report(ctx: &RuleContext, error: &XmlError, sink: &mut DiagnosticSink) {
    let check_id = error.classify();
    sink.fatal(check_id, format!("document is not well-formed: {error}"), Some(ctx.path));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostic::Severity;
    use crate::publication::ManifestIndex;
    use crate::rules::test_support::{ctx, empty_publication};

    #[test]
    fn test_malformed_is_fatal() {
        let publication = empty_publication();
        let index = ManifestIndex::default();
        let mut sink = DiagnosticSink::new();
        super::super::run(&ctx(&publication, &index), b"<html><body><p></body></html>", &mut sink);
        assert_eq!(1, sink.diagnostics().len());
        assert_eq!(Severity::Fatal, sink.diagnostics()[0].severity);
    }
}
