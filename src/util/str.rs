pub(crate) trait StringExt {
    fn trim_in_place(&mut self);
}

impl StringExt for String {
    fn trim_in_place(&mut self) {
        self.truncate(self.trim_end().len());

        let start = self.len() - self.trim_start().len();
        if start > 0 {
            self.drain(..start);
        }
    }
}

pub(crate) trait StrExt {
    fn starts_with_ignore_case(&self, start: &str) -> bool;

    /// Splits on ASCII whitespace, discarding empty tokens.
    ///
    /// This is the shape every property-list / IDREFS attribute in the
    /// EPUB/HTML5 vocabularies uses (`properties`, multi-valued `aria-*`, …).
    fn whitespace_tokens(&self) -> std::str::SplitAsciiWhitespace<'_>;
}

impl StrExt for str {
    fn starts_with_ignore_case(&self, start: &str) -> bool {
        self.len() >= start.len() && self[..start.len()].eq_ignore_ascii_case(start)
    }

    fn whitespace_tokens(&self) -> std::str::SplitAsciiWhitespace<'_> {
        self.split_ascii_whitespace()
    }
}
