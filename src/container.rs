//! The OCF (container) reader (`C1`, `§6.1`).
//!
//! Grounded on `rbook`'s `ebook::archive::zip` + `ebook::epub::parser::container`:
//! unzip into an in-memory path → bytes map, then locate the package
//! document via `META-INF/container.xml`. Kept deliberately small — `§1`
//! scopes this out as "not re-specified"; it exists only so the crate runs
//! end-to-end.

use crate::error::{ContainerError, ValidatorResult};
use crate::publication::Publication;
use crate::xml::{Document, Token};
use std::collections::HashMap;
use std::io::Read;

const CONTAINER_PATH: &str = "META-INF/container.xml";
const ZIP_MAGIC: [u8; 4] = [0x50, 0x4B, 0x03, 0x04];

/// Opens an `.epub` file from raw bytes, yielding a [`Publication`] with its
/// `files` map and `rootfile_path` populated (`§6.1`).
///
/// Package (OPF) parsing is a separate step; see [`crate::opf::parse_package`].
pub fn open(bytes: &[u8]) -> ValidatorResult<Publication> {
    if bytes.is_empty() {
        return Err(ContainerError::Empty.into());
    }
    if bytes.len() < 4 || bytes[..4] != ZIP_MAGIC {
        return Err(ContainerError::BadMagic.into());
    }

    let cursor = std::io::Cursor::new(bytes);
    let mut archive = zip::ZipArchive::new(cursor).map_err(ContainerError::Zip)?;

    let mut files: HashMap<String, Vec<u8>> = HashMap::with_capacity(archive.len());
    for index in 0..archive.len() {
        let mut entry = archive.by_index(index).map_err(ContainerError::Zip)?;
        if entry.is_dir() {
            continue;
        }
        let name = entry.name().replace('\\', "/");
        let mut data = Vec::with_capacity(entry.size() as usize);
        entry.read_to_end(&mut data)?;
        files.insert(name, data);
    }

    let rootfile_path = locate_rootfile(&files)?;
    let mut publication = Publication::new(files, rootfile_path);
    publication.is_legacy_oebps_12 = false;
    Ok(publication)
}

fn locate_rootfile(files: &HashMap<String, Vec<u8>>) -> ValidatorResult<String> {
    let container_bytes = files
        .get(CONTAINER_PATH)
        .ok_or(ContainerError::NoOpfReference)?;

    let doc = Document::parse(container_bytes);
    for token in &doc.tokens {
        let Token::Start(el) = token else { continue };
        if !el.is_local("rootfile") {
            continue;
        }
        let is_opf = el
            .attr("media-type")
            .is_some_and(|m| m.eq_ignore_ascii_case("application/oebps-package+xml"));
        if let (true, Some(full_path)) = (is_opf, el.attr("full-path")) {
            return Ok(full_path.trim_start_matches('/').to_owned());
        }
    }
    Err(ContainerError::NoOpfReference.into())
}
