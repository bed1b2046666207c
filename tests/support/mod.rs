//! Shared black-box test fixtures: build a tiny in-memory [`Publication`]
//! from a manifest/spine description plus one or more file bodies, and run
//! it through [`epub_conform::validate`].

use epub_conform::publication::{ManifestItem, Package, Publication, SpineItemref};
use epub_conform::{Diagnostic, ValidatorSettings};
use std::collections::HashMap;

pub struct FileSpec {
    pub id: &'static str,
    pub href: &'static str,
    pub media_type: &'static str,
    pub properties: &'static str,
    pub body: &'static [u8],
    pub in_spine: bool,
    pub fallback: Option<&'static str>,
}

pub fn file(id: &'static str, href: &'static str, media_type: &'static str, body: &'static [u8]) -> FileSpec {
    FileSpec { id, href, media_type, properties: "", body, in_spine: false, fallback: None }
}

impl FileSpec {
    pub fn spine(mut self) -> Self {
        self.in_spine = true;
        self
    }

    pub fn with_properties(mut self, properties: &'static str) -> Self {
        self.properties = properties;
        self
    }

    pub fn with_fallback(mut self, fallback_id: &'static str) -> Self {
        self.fallback = Some(fallback_id);
        self
    }
}

pub fn validate(version: &str, rendition_layout: &str, files: Vec<FileSpec>) -> Vec<Diagnostic> {
    validate_with(version, rendition_layout, files, ValidatorSettings::default())
}

pub fn validate_with(version: &str, rendition_layout: &str, files: Vec<FileSpec>, settings: ValidatorSettings) -> Vec<Diagnostic> {
    let mut file_map = HashMap::new();
    let mut manifest = Vec::new();
    let mut spine = Vec::new();

    for spec in &files {
        file_map.insert(spec.href.to_owned(), spec.body.to_vec());
        manifest.push(ManifestItem {
            id: spec.id.to_owned(),
            href: spec.href.to_owned(),
            media_type: spec.media_type.to_owned(),
            properties: spec.properties.to_owned(),
            fallback: spec.fallback.map(str::to_owned),
            media_overlay: None,
        });
        if spec.in_spine {
            spine.push(SpineItemref { idref: spec.id.to_owned(), properties: String::new() });
        }
    }

    let mut publication = Publication::new(file_map, "OPS/package.opf".to_owned());
    publication.package = Some(Package {
        version: version.to_owned(),
        manifest,
        spine,
        rendition_layout: rendition_layout.to_owned(),
        ..Default::default()
    });

    epub_conform::validate(&publication, settings)
}

pub fn has(diagnostics: &[Diagnostic], check_id: &str) -> bool {
    diagnostics.iter().any(|d| d.check_id == check_id)
}

pub fn count(diagnostics: &[Diagnostic], check_id: &str) -> usize {
    diagnostics.iter().filter(|d| d.check_id == check_id).count()
}
