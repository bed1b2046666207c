//! A conformance validator for the EPUB electronic-book format (2.x and
//! 3.x): given a parsed publication, emits a structured list of
//! [`Diagnostic`]s identifying every rule violation found (`§1`–`§2`).
//!
//! ```no_run
//! use epub_conform::ValidatorSettings;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let bytes = std::fs::read("book.epub")?;
//! let mut publication = epub_conform::container::open(&bytes)?;
//!
//! let rootfile = publication.rootfile_path.clone();
//! let package_dir = rootfile.rsplit_once('/').map(|(dir, _)| dir).unwrap_or("").to_owned();
//! if let Some(opf_bytes) = publication.read_file(&rootfile).map(<[u8]>::to_vec) {
//!     publication.package = epub_conform::opf::parse_package(&opf_bytes, &package_dir);
//! }
//!
//! let diagnostics = epub_conform::validate(&publication, ValidatorSettings::default());
//! for diagnostic in &diagnostics {
//!     println!("[{}] {}: {}", diagnostic.severity, diagnostic.check_id, diagnostic.message);
//! }
//! # Ok(())
//! # }
//! ```

pub mod container;
pub mod diagnostic;
pub mod error;
pub mod opf;
pub mod publication;
pub mod settings;

mod consts;
mod driver;
mod reference;
mod rules;
mod util;
mod xml;

pub use diagnostic::{Diagnostic, DiagnosticSink, Severity};
pub use driver::validate;
pub use error::{ContainerError, ValidatorError, ValidatorResult};
pub use publication::Publication;
pub use settings::ValidatorSettings;
