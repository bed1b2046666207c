//! The publication data model (`§3`).
//!
//! A [`Publication`] is constructed once (by [`crate::container::open`] +
//! [`crate::opf::parse_package`]) and is immutable thereafter; every rule
//! set holds only shared, read-only references into it (`§5`).

use std::collections::{HashMap, HashSet};

/// Sentinel href for manifest items whose `href` attribute failed to parse
/// (`§3`). Content passes skip these entirely.
pub(crate) const MISSING_HREF: &str = "\x00MISSING";

/// A bundle of container-path → bytes, plus the parsed package, forming the
/// complete in-memory view of one EPUB (`§3`).
#[derive(Debug)]
pub struct Publication {
    pub files: HashMap<String, Vec<u8>>,
    pub rootfile_path: String,
    pub package: Option<Package>,
    pub is_legacy_oebps_12: bool,
    /// Manifest paths known (from the encoding detector, `§6.1`) to have
    /// encoding errors; content rules skip these entirely.
    pub encoding_error_paths: HashSet<String>,
}

impl Publication {
    pub fn new(files: HashMap<String, Vec<u8>>, rootfile_path: String) -> Self {
        Self {
            files,
            rootfile_path,
            package: None,
            is_legacy_oebps_12: false,
            encoding_error_paths: HashSet::new(),
        }
    }

    /// `Publication.read_file(path) → bytes | error` (`§6.1`).
    pub fn read_file(&self, path: &str) -> Option<&[u8]> {
        self.files.get(path).map(Vec::as_slice)
    }

    /// Turns a manifest href (already resolved to a container path by
    /// [`crate::reference`]) into `true`/`false` for "does this exist or is
    /// it remote" (`§3` invariant 1).
    pub fn exists_or_remote(&self, resolved_path: &str, indices: &ManifestIndex) -> bool {
        self.files.contains_key(resolved_path) || indices.remote_manifest_urls.contains(resolved_path)
    }
}

/// A parsed OPF view (`§3`).
#[derive(Debug, Clone, Default)]
pub struct Package {
    pub version: String,
    pub unique_identifier: String,
    pub metadata: PackageMetadata,
    pub manifest: Vec<ManifestItem>,
    pub spine: Vec<SpineItemref>,
    pub spine_toc: String,
    pub guide: Vec<GuideRef>,
    pub rendition_layout: String,
    pub element_order: Vec<String>,
    pub bindings_types: HashSet<String>,
}

impl Package {
    /// Lexicographic comparison on the `"N.M"` form (`§3`): `"3.0" >
    /// "2.0.1"`.
    pub fn version_at_least(&self, major: u32) -> bool {
        self.version
            .split('.')
            .next()
            .and_then(|n| n.parse::<u32>().ok())
            .is_some_and(|v| v >= major)
    }
}

#[derive(Debug, Clone, Default)]
pub struct PackageMetadata {
    pub identifiers: Vec<Identifier>,
    pub creators: Vec<Creator>,
    pub modified_count: usize,
    pub has_media_active_class: bool,
}

#[derive(Debug, Clone)]
pub struct Identifier {
    pub id: Option<String>,
    pub value: String,
}

#[derive(Debug, Clone)]
pub struct Creator {
    pub value: String,
    /// Optional MARC relator code (`§3`).
    pub role: Option<String>,
}

/// `§3`: `ManifestItem { id, href, media_type, properties, fallback,
/// media_overlay }`.
#[derive(Debug, Clone)]
pub struct ManifestItem {
    pub id: String,
    pub href: String,
    pub media_type: String,
    pub properties: String,
    pub fallback: Option<String>,
    pub media_overlay: Option<String>,
}

impl ManifestItem {
    pub fn href_is_missing(&self) -> bool {
        self.href == MISSING_HREF
    }
}

/// Case-sensitive whitespace-token membership test on a manifest item's
/// (or spine itemref's) `properties` attribute (`§3`).
pub fn has_property(properties: &str, token: &str) -> bool {
    properties.split_ascii_whitespace().any(|t| t == token)
}

#[derive(Debug, Clone)]
pub struct SpineItemref {
    pub idref: String,
    pub properties: String,
}

#[derive(Debug, Clone)]
pub struct GuideRef {
    pub r#type: String,
    pub href: String,
}

/// Manifest-derived indices, built once per publication (`§3`).
#[derive(Debug, Default)]
pub struct ManifestIndex {
    pub manifest_paths: HashSet<String>,
    pub manifest_by_path: HashMap<String, ManifestItem>,
    pub remote_manifest_urls: HashSet<String>,
    pub spine_item_ids: HashSet<String>,
    pub spine_props: HashMap<String, String>,
    pub spine_path_set: HashSet<String>,
    /// Hrefs reachable by following one or more `fallback` links from a
    /// non-core-media-type manifest item (`§4.2`'s "EPUB 3 fallback
    /// document" used to gate `HTM-010` vs `HTM-011`).
    pub fallback_targets: HashSet<String>,
}

impl ManifestIndex {
    pub fn build(package: &Package) -> Self {
        let mut index = ManifestIndex::default();

        for item in &package.manifest {
            if item.href_is_missing() {
                continue;
            }
            if crate::util::uri::is_remote(&item.href) {
                index.remote_manifest_urls.insert(item.href.clone());
            } else {
                index.manifest_paths.insert(item.href.clone());
            }
            index.manifest_by_path.insert(item.href.clone(), item.clone());
        }

        let by_id: HashMap<&str, &ManifestItem> =
            package.manifest.iter().map(|item| (item.id.as_str(), item)).collect();

        for item in &package.manifest {
            if item.href_is_missing() || crate::consts::is_core_media_type(&item.media_type) {
                continue;
            }
            let mut current = item.fallback.as_deref();
            let mut visited: HashSet<&str> = HashSet::new();
            while let Some(fallback_id) = current {
                if !visited.insert(fallback_id) {
                    break; // fallback cycle; stop rather than loop forever.
                }
                let Some(target) = by_id.get(fallback_id) else { break };
                if !target.href_is_missing() {
                    index.fallback_targets.insert(target.href.clone());
                }
                current = target.fallback.as_deref();
            }
        }

        for itemref in &package.spine {
            index.spine_item_ids.insert(itemref.idref.clone());
            index.spine_props.insert(itemref.idref.clone(), itemref.properties.clone());

            if let Some(item) = by_id.get(itemref.idref.as_str())
                && !item.href_is_missing()
            {
                index.spine_path_set.insert(item.href.clone());
            }
        }

        index
    }

    pub fn is_spine_path(&self, path: &str) -> bool {
        self.spine_path_set.contains(path)
    }

    /// Whether `href` is reachable via a `fallback` chain from a
    /// non-core-media-type manifest item — i.e. it is a designated EPUB 3
    /// fallback document, not an ordinary content document (`§4.2`).
    pub fn is_fallback_target(&self, href: &str) -> bool {
        self.fallback_targets.contains(href)
    }

    /// Whether `idref` is overridden by a `rendition:layout-*` spine
    /// property (`§4.1`).
    pub fn is_fxl(&self, idref: &str, package_rendition_layout: &str) -> bool {
        match self.spine_props.get(idref).map(String::as_str) {
            Some(props) if has_property(props, "rendition:layout-pre-paginated") => true,
            Some(props) if has_property(props, "rendition:layout-reflowable") => false,
            _ => package_rendition_layout == "pre-paginated",
        }
    }
}
