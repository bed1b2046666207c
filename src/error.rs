//! Error hierarchy for the ambient container/OPF loading path (`§2.1` of
//! `SPEC_FULL.md`). The rule engine proper (`C2`–`C10`) is infallible — see
//! [`crate::diagnostic`] — these errors exist only for the small amount of
//! "external collaborator" functionality this crate implements to stay
//! runnable end-to-end.

/// Alias for `Result<T, ValidatorError>`.
pub type ValidatorResult<T> = Result<T, ValidatorError>;

/// Top-level error for [`crate::container::open`].
#[non_exhaustive]
#[derive(thiserror::Error, Debug)]
pub enum ValidatorError {
    /// The container itself (the `.epub` archive) could not be opened.
    #[error(transparent)]
    Container(#[from] ContainerError),

    /// I/O failure reading the archive.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// OCF container-level failures, corresponding to the fatal `PKG-*`
/// diagnostics named in `§6.1`.
#[non_exhaustive]
#[derive(thiserror::Error, Debug)]
pub enum ContainerError {
    /// `PKG-003`: the file is empty.
    #[error("[PKG-003]: input file is empty")]
    Empty,

    /// `PKG-004`: the first four bytes are not the ZIP local-file-header
    /// magic `50 4B 03 04`.
    #[error("[PKG-004]: input file is not a zip archive (bad magic number)")]
    BadMagic,

    /// `PKG-008`: the zip archive is otherwise unreadable (truncated,
    /// unsupported compression, central directory damage, …).
    #[error("[PKG-008]: unable to read zip archive: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// `PKG-008`: `META-INF/container.xml` has no `<rootfile>` referencing
    /// an `.opf` file. `§6.1` makes `PKG-008` the catch-all for every
    /// container-open failure other than empty-file/bad-magic.
    #[error("[PKG-008]: no <rootfile> referencing an .opf package document in META-INF/container.xml")]
    NoOpfReference,
}
