//! Validator configuration (`§2.3` of `SPEC_FULL.md`, `§6.3`).

/// Builder-style settings controlling validator behavior, in the shape of
/// `rbook`'s `EpubOpenOptions`.
///
/// # Examples
/// ```
/// use epub_conform::ValidatorSettings;
///
/// let settings = ValidatorSettings::default()
///     .with_strict(false)
///     .with_single_file(true);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidatorSettings {
    strict: bool,
    single_file: bool,
}

impl Default for ValidatorSettings {
    fn default() -> Self {
        Self { strict: true, single_file: false }
    }
}

impl ValidatorSettings {
    /// Toggle the non-strict downgrade-to-info post-processing pass
    /// (`§4.9`). Enabled (`true`) by default.
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Toggle single-file mode: disables cross-publication checks, enables
    /// the small set of single-file-only checks, and activates the
    /// `RSC-005` remap (`§6.3`). Disabled by default.
    pub fn with_single_file(mut self, single_file: bool) -> Self {
        self.single_file = single_file;
        self
    }

    pub fn strict(&self) -> bool {
        self.strict
    }

    pub fn single_file(&self) -> bool {
        self.single_file
    }
}
