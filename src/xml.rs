//! A single streaming tokenization pass shared by every content rule set.
//!
//! `§4.2`/`§9`: every HTML/SVG/SMIL/NCX rule shares the same skeleton (a
//! namespace-scoped element stack). Rather than re-tokenize the document
//! once per rule, [`Document::parse`] tokenizes it exactly once into a flat
//! [`Token`] stream; each rule then does its own independent walk over that
//! (already-owned) stream. This preserves rule isolation — no rule observes
//! another rule's state — while avoiding the cost of re-running quick-xml
//! per rule.

use quick_xml::events::{BytesStart, Event};
use std::collections::HashMap;

/// A tokenizer failure, classified the way `§4.2` requires for `HTM-001`/
/// `HTM-017`/`HTM-029`.
#[derive(Debug, Clone)]
pub(crate) struct XmlError {
    pub(crate) message: String,
}

impl XmlError {
    /// Classify by substring of the underlying message, per `§4.2`:
    /// "entity" → `HTM-017`; "attribute" → `HTM-029`; otherwise `HTM-001`.
    pub(crate) fn classify(&self) -> &'static str {
        let lower = self.message.to_ascii_lowercase();
        if lower.contains("entity") {
            "HTM-017"
        } else if lower.contains("attribute") {
            "HTM-029"
        } else {
            "HTM-001"
        }
    }
}

impl std::fmt::Display for XmlError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

/// One resolved XML/HTML attribute.
#[derive(Debug, Clone)]
pub(crate) struct Attr {
    pub(crate) raw_name: String,
    pub(crate) prefix: Option<String>,
    pub(crate) local: String,
    pub(crate) ns: Option<String>,
    pub(crate) value: String,
}

impl Attr {
    pub(crate) fn is(&self, local: &str) -> bool {
        self.prefix.is_none() && self.local.eq_ignore_ascii_case(local)
    }

    pub(crate) fn is_qualified(&self, prefix: &str, local: &str) -> bool {
        self.prefix.as_deref() == Some(prefix) && self.local == local
    }
}

/// A resolved start-tag, namespace included.
#[derive(Debug, Clone)]
pub(crate) struct Element {
    pub(crate) raw_name: String,
    pub(crate) prefix: Option<String>,
    pub(crate) local: String,
    pub(crate) ns: Option<String>,
    pub(crate) attrs: Vec<Attr>,
    pub(crate) self_closing: bool,
}

impl Element {
    pub(crate) fn attr(&self, local: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|a| a.is(local))
            .map(|a| a.value.as_str())
    }

    pub(crate) fn attr_qualified(&self, prefix: &str, local: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|a| a.is_qualified(prefix, local))
            .map(|a| a.value.as_str())
    }

    pub(crate) fn is_local(&self, local: &str) -> bool {
        self.local.eq_ignore_ascii_case(local)
    }

    pub(crate) fn is_ns(&self, ns: &str, local: &str) -> bool {
        self.ns.as_deref() == Some(ns) && self.local == local
    }
}

/// A single event in the flattened token stream.
#[derive(Debug, Clone)]
pub(crate) enum Token {
    Start(Element),
    End { local: String },
    Text(String),
    Comment,
    Doctype(String),
    ProcessingInstruction,
}

/// The result of tokenizing one document: either the flat stream, or the
/// error that truncated it along with everything successfully read up to
/// that point (rules that only care about document shape up to the failure
/// point, e.g. root-element detection, can still run on `tokens`).
pub(crate) struct Document {
    pub(crate) tokens: Vec<Token>,
    pub(crate) error: Option<XmlError>,
}

pub(crate) const XHTML_NS: &str = "http://www.w3.org/1999/xhtml";
pub(crate) const SVG_NS: &str = "http://www.w3.org/2000/svg";
pub(crate) const MATHML_NS: &str = "http://www.w3.org/1998/Math/MathML";
pub(crate) const EPUB_NS: &str = "http://www.idpf.org/2007/ops";
pub(crate) const XML_NS: &str = "http://www.w3.org/XML/1998/namespace";
pub(crate) const XMLNS_NS: &str = "http://www.w3.org/2000/xmlns/";
pub(crate) const XLINK_NS: &str = "http://www.w3.org/1999/xlink";
pub(crate) const SSML_NS: &str = "http://www.w3.org/2001/10/synthesis";

#[derive(Default, Clone)]
struct NsScope {
    default_ns: Option<String>,
    prefixes: HashMap<String, String>,
}

struct NsStack {
    scopes: Vec<NsScope>,
}

impl NsStack {
    fn new() -> Self {
        Self { scopes: vec![NsScope::default()] }
    }

    fn push_scope(&mut self, el: &BytesStart) -> NsScope {
        let mut scope = self.scopes.last().cloned().unwrap_or_default();

        for attr in el.attributes().flatten() {
            let key = attr.key.as_ref();
            let Ok(value) = std::str::from_utf8(&attr.value) else {
                continue;
            };
            if key == b"xmlns" {
                scope.default_ns = Some(value.to_owned());
            } else if let Some(prefix) = key.strip_prefix(b"xmlns:") {
                if let Ok(prefix) = std::str::from_utf8(prefix) {
                    scope.prefixes.insert(prefix.to_owned(), value.to_owned());
                }
            }
        }
        self.scopes.push(scope.clone());
        scope
    }

    fn pop_scope(&mut self) {
        self.scopes.pop();
    }

    fn resolve(&self, prefix: Option<&str>) -> Option<String> {
        let scope = self.scopes.last()?;
        match prefix {
            None => scope.default_ns.clone(),
            Some("xml") => Some(XML_NS.to_owned()),
            Some("xmlns") => Some(XMLNS_NS.to_owned()),
            Some(p) => scope.prefixes.get(p).cloned(),
        }
    }
}

fn split_name(raw: &str) -> (Option<String>, String) {
    match raw.split_once(':') {
        Some((prefix, local)) => (Some(prefix.to_owned()), local.to_owned()),
        None => (None, raw.to_owned()),
    }
}

impl Document {
    /// Tokenize `bytes` into a flat stream of resolved [`Token`]s.
    ///
    /// Malformed XML stops the stream; `Document::error` carries the
    /// classification the caller uses to raise `HTM-001`/`HTM-017`/
    /// `HTM-029` (`§4.2`). Whatever tokenized cleanly before the failure
    /// is still returned so structural rules can salvage partial info.
    pub(crate) fn parse(bytes: &[u8]) -> Self {
        let mut reader = quick_xml::Reader::from_reader(bytes);
        reader.config_mut().trim_text(false);

        let mut tokens = Vec::new();
        let mut ns_stack = NsStack::new();
        let mut error = None;

        loop {
            match reader.read_event() {
                Ok(Event::Eof) => break,
                Ok(Event::Start(el)) => {
                    let scope = ns_stack.push_scope(&el);
                    tokens.push(Token::Start(resolve_element(&el, &scope, false)));
                }
                Ok(Event::Empty(el)) => {
                    let scope = ns_stack.push_scope(&el);
                    tokens.push(Token::Start(resolve_element(&el, &scope, true)));
                    ns_stack.pop_scope();
                }
                Ok(Event::End(end)) => {
                    ns_stack.pop_scope();
                    let local = match std::str::from_utf8(end.name().as_ref()) {
                        Ok(raw) => split_name(raw).1,
                        Err(_) => String::new(),
                    };
                    tokens.push(Token::End { local });
                }
                Ok(Event::Text(text)) => {
                    let decoded = text.unescape().map(|c| c.into_owned()).unwrap_or_else(|_| {
                        String::from_utf8_lossy(text.as_ref()).into_owned()
                    });
                    tokens.push(Token::Text(decoded));
                }
                Ok(Event::CData(cdata)) => {
                    tokens.push(Token::Text(String::from_utf8_lossy(cdata.as_ref()).into_owned()));
                }
                Ok(Event::Comment(_)) => tokens.push(Token::Comment),
                Ok(Event::PI(_)) => tokens.push(Token::ProcessingInstruction),
                Ok(Event::DocType(doctype)) => {
                    let text = String::from_utf8_lossy(doctype.as_ref()).into_owned();
                    tokens.push(Token::Doctype(text));
                }
                Ok(Event::Decl(_)) => {}
                Ok(Event::GeneralRef(_)) => {}
                Err(err) => {
                    error = Some(XmlError { message: err.to_string() });
                    break;
                }
            }
        }

        Self { tokens, error }
    }

    /// The root element's resolved name, if any start tag was seen.
    pub(crate) fn root(&self) -> Option<&Element> {
        self.tokens.iter().find_map(|t| match t {
            Token::Start(el) => Some(el),
            _ => None,
        })
    }
}

fn resolve_element(el: &BytesStart, scope: &NsScope, self_closing: bool) -> Element {
    let raw_name = String::from_utf8_lossy(el.name().as_ref()).into_owned();
    let (prefix, local) = split_name(&raw_name);
    let ns = match &prefix {
        Some(p) if p == "xml" => Some(XML_NS.to_owned()),
        Some(p) => scope.prefixes.get(p).cloned(),
        None => scope.default_ns.clone(),
    };

    let attrs = el
        .attributes()
        .flatten()
        .filter_map(|attr| {
            let raw = std::str::from_utf8(attr.key.as_ref()).ok()?.to_owned();
            if raw == "xmlns" || raw.starts_with("xmlns:") {
                return None;
            }
            let value = attr
                .unescape_value()
                .map(|c| c.into_owned())
                .unwrap_or_else(|_| String::from_utf8_lossy(&attr.value).into_owned());
            let (prefix, local) = split_name(&raw);
            let ns = match &prefix {
                Some(p) if p == "xml" => Some(XML_NS.to_owned()),
                Some(p) => scope.prefixes.get(p).cloned(),
                // Unprefixed attributes are never in the default namespace.
                None => None,
            };
            Some(Attr { raw_name: raw, prefix, local, ns, value })
        })
        .collect();

    Element { raw_name, prefix, local, ns, attrs, self_closing }
}
