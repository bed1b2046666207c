//! Compile-time vocabulary and classification tables (`§9`: "Global state …
//! model them as compile-time static tables").

/// `§Glossary` "Core media types".
pub(crate) const CORE_MEDIA_TYPES: &[&str] = &[
    "image/gif",
    "image/jpeg",
    "image/png",
    "image/svg+xml",
    "image/webp",
    "application/xhtml+xml",
    "application/x-dtbncx+xml",
    "text/css",
    "application/javascript",
    "text/javascript",
    "font/woff",
    "font/woff2",
    "font/otf",
    "font/ttf",
    "application/font-woff",
    "application/font-sfnt",
    "application/vnd.ms-opentype",
    "audio/mpeg",
    "audio/mp4",
    "audio/ogg",
    "video/mp4",
    "video/h264",
    "application/smil+xml",
    "application/pls+xml",
];

pub(crate) fn is_core_media_type(media_type: &str) -> bool {
    CORE_MEDIA_TYPES.iter().any(|m| m.eq_ignore_ascii_case(media_type))
}

/// `§Glossary` "OPS media types" — content-document types recognised as
/// spine/guide targets.
pub(crate) const OPS_MEDIA_TYPES: &[&str] = &["application/xhtml+xml", "application/x-dtbook+xml"];

pub(crate) fn is_ops_media_type(media_type: &str) -> bool {
    OPS_MEDIA_TYPES.iter().any(|m| m.eq_ignore_ascii_case(media_type))
}

pub(crate) fn is_font_media_type(media_type: &str) -> bool {
    matches!(
        media_type,
        "font/woff" | "font/woff2" | "font/otf" | "font/ttf"
            | "application/font-woff" | "application/font-sfnt" | "application/vnd.ms-opentype"
    )
}

pub(crate) fn is_video_media_type(media_type: &str) -> bool {
    media_type.starts_with("video/")
}

/// `§Glossary` "Flow-only elements".
pub(crate) const FLOW_ONLY_ELEMENTS: &[&str] = &[
    "div", "p", "hr", "blockquote", "section", "nav", "article", "aside", "header", "footer",
    "main", "search", "address", "hgroup", "h1", "h2", "h3", "h4", "h5", "h6", "ul", "ol", "dl",
    "menu", "figure", "table", "form", "fieldset", "details", "dialog", "pre",
];

pub(crate) fn is_flow_only(local: &str) -> bool {
    FLOW_ONLY_ELEMENTS.contains(&local)
}

/// `§Glossary` "Phrasing-only containers".
pub(crate) const PHRASING_ONLY_CONTAINERS: &[&str] = &[
    "p", "h1", "h2", "h3", "h4", "h5", "h6", "pre", "span", "em", "strong", "small", "mark",
    "abbr", "dfn", "i", "b", "s", "u", "code", "var", "samp", "kbd", "sup", "sub", "q", "cite",
    "bdo", "bdi", "label", "legend", "dt", "summary", "output", "data", "time",
];

pub(crate) fn is_phrasing_only_container(local: &str) -> bool {
    PHRASING_ONLY_CONTAINERS.contains(&local)
}

/// Void elements (`§4.2` HTML5 content model rule 3: `void-children`).
pub(crate) const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param",
    "source", "track", "wbr",
];

pub(crate) fn is_void_element(local: &str) -> bool {
    VOID_ELEMENTS.contains(&local)
}

/// Interactive elements (`§4.2` content model rule 5: `interactive-nesting`).
pub(crate) const INTERACTIVE_ELEMENTS: &[&str] = &[
    "a", "button", "input", "select", "textarea", "label", "embed", "iframe", "audio", "video",
    "details", "summary",
];

pub(crate) fn is_interactive(local: &str) -> bool {
    INTERACTIVE_ELEMENTS.contains(&local)
}

/// Transparent-content elements (`§4.2` content model rule 6).
pub(crate) const TRANSPARENT_ELEMENTS: &[&str] = &["a", "ins", "del", "object", "video", "audio", "map", "canvas"];

pub(crate) fn is_transparent(local: &str) -> bool {
    TRANSPARENT_ELEMENTS.contains(&local)
}

/// Script-supporting elements, always permitted as children regardless of
/// `restricted-children` / `picture-content` rules.
pub(crate) const SCRIPT_SUPPORTING_ELEMENTS: &[&str] = &["script", "template", "noscript"];

pub(crate) fn is_script_supporting(local: &str) -> bool {
    SCRIPT_SUPPORTING_ELEMENTS.contains(&local)
}

/// Reserved `epub:type` prefixes that don't require an explicit
/// `epub:prefix` declaration (`§4.2`).
pub(crate) const RESERVED_EPUB_TYPE_PREFIXES: &[&str] = &[
    "dc", "dcterms", "a11y", "epub", "marc", "media", "onix", "rendition", "schema", "xsd",
    "msv", "prism",
];

/// A representative slice of the EPUB structural-semantics vocabulary
/// (unprefixed tokens). Not exhaustive of the full specification's ~80
/// terms, but covers every section/navigation/semantic grouping category.
pub(crate) const EPUB_TYPE_VOCABULARY: &[&str] = &[
    "abstract", "acknowledgments", "afterword", "appendix", "backmatter", "bibliography",
    "biblioentry", "bodymatter", "chapter", "colophon", "conclusion", "contributors", "copyright-page",
    "cover", "dedication", "division", "endnote", "endnotes", "epigraph", "epilogue", "errata",
    "footnote", "footnotes", "foreword", "frontmatter", "glossary", "glossdef", "glossterm",
    "glossary-term", "index", "introduction", "landmarks", "list", "list-item", "noteref",
    "notice", "page-list", "pagebreak", "part", "preface", "prologue", "pullquote", "qna",
    "rearnote", "rearnotes", "subtitle", "table", "table-cell", "table-row", "title", "toc",
    "toc-brief", "volume", "warning",
];

/// Tokens in [`EPUB_TYPE_VOCABULARY`] that are deprecated (`OPF-086b`).
pub(crate) const DEPRECATED_EPUB_TYPES: &[&str] = &["glossdef", "glossterm", "noteref", "rearnote", "rearnotes"];

pub(crate) fn is_known_epub_type(token: &str) -> bool {
    EPUB_TYPE_VOCABULARY.contains(&token)
}

pub(crate) fn is_deprecated_epub_type(token: &str) -> bool {
    DEPRECATED_EPUB_TYPES.contains(&token)
}

/// Namespace allow-list for custom attributes on XHTML content (`HTM-031`).
pub(crate) const ALLOWED_ATTRIBUTE_NAMESPACES: &[&str] = &[
    crate::xml::XHTML_NS,
    crate::xml::XML_NS,
    crate::xml::XMLNS_NS,
    crate::xml::EPUB_NS,
    crate::xml::SSML_NS,
    crate::xml::SVG_NS,
    crate::xml::MATHML_NS,
    crate::xml::XLINK_NS,
];

/// IDREF / IDREFS attributes whose values must resolve to an existing `id`
/// within the same document (`§4.2`).
pub(crate) const IDREF_ATTRIBUTES: &[&str] = &[
    "for", "list", "form", "aria-activedescendant", "headers", "aria-controls",
    "aria-describedby", "aria-flowto", "aria-labelledby", "aria-owns",
];

/// IDREF attributes whose value is a whitespace-separated token list rather
/// than a single id (IDREFS).
pub(crate) const MULTI_VALUED_IDREF_ATTRIBUTES: &[&str] = &[
    "headers", "aria-controls", "aria-describedby", "aria-flowto", "aria-labelledby", "aria-owns",
];

/// Parents with a restricted, fixed set of permitted direct children
/// (`§4.2` content model rule 2: `restricted-children`).
pub(crate) fn restricted_children(parent: &str) -> Option<&'static [&'static str]> {
    match parent {
        "ul" | "ol" => Some(&["li"]),
        "dl" => Some(&["dt", "dd", "div"]),
        "hgroup" => Some(&["h1", "h2", "h3", "h4", "h5", "h6", "p"]),
        "select" => Some(&["option", "optgroup"]),
        "optgroup" => Some(&["option"]),
        "tr" => Some(&["td", "th"]),
        "thead" | "tbody" | "tfoot" => Some(&["tr"]),
        "colgroup" => Some(&["col"]),
        "datalist" => Some(&["option"]),
        _ => None,
    }
}

/// Disallowed-descendant pairs (`§4.2` content model rule 9).
pub(crate) fn disallowed_descendants(ancestor: &str) -> &'static [&'static str] {
    match ancestor {
        "address" => &["address", "header", "footer"],
        "form" => &["form"],
        "progress" => &["progress"],
        "meter" => &["meter"],
        "caption" => &["table"],
        "header" => &["header", "footer"],
        "footer" => &["footer", "header"],
        "label" => &["label"],
        _ => &[],
    }
}

/// `<table>` direct children (`§4.2` content model rule 4).
pub(crate) const TABLE_CHILDREN: &[&str] = &["caption", "colgroup", "thead", "tbody", "tfoot", "tr"];

/// CSS length units that make a viewport `width`/`height` value invalid
/// (`§4.6`, `HTM-057`).
pub(crate) const CSS_UNIT_SUFFIXES: &[&str] = &[
    "px", "em", "ex", "rem", "%", "vw", "vh", "pt", "pc", "cm", "mm", "in",
];
