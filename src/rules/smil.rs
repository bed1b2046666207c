//! The SMIL media-overlay rule set (`C5`, `§4.4`).

use super::RuleContext;
use crate::consts::is_core_media_type;
use crate::diagnostic::DiagnosticSink;
use crate::publication::{ManifestIndex, Publication};
use crate::reference;
use crate::xml::{Document, Token};
use std::collections::{HashMap, HashSet};

pub(crate) fn run(ctx: &RuleContext, bytes: &[u8], sink: &mut DiagnosticSink) {
    let doc = Document::parse(bytes);
    if let Some(error) = &doc.error {
        sink.fatal("MED-006", format!("document is not well-formed: {error}"), Some(ctx.path));
        return;
    }

    check_structure(ctx, &doc, sink);
    check_audio(ctx, &doc, sink);
    check_text(ctx, &doc, sink);
}

fn check_structure(ctx: &RuleContext, doc: &Document, sink: &mut DiagnosticSink) {
    let mut body_count = 0;
    let mut par_depth = 0u32;

    for token in &doc.tokens {
        match token {
            Token::Start(el) if el.is_local("body") => body_count += 1,
            Token::Start(el) if el.is_local("par") => {
                if !el.self_closing {
                    par_depth += 1;
                }
            }
            Token::Start(el) if matches!(el.local.as_str(), "audio" | "text") && par_depth == 0 => {
                sink.error("MED-011", format!("\"{}\" must be inside a \"par\"", el.local), Some(ctx.path));
            }
            Token::End { local } if local == "par" && par_depth > 0 => par_depth -= 1,
            _ => {}
        }
    }

    if body_count > 1 {
        sink.error("MED-011", "a SMIL document must contain at most one \"body\"", Some(ctx.path));
    }
}

fn check_audio(ctx: &RuleContext, doc: &Document, sink: &mut DiagnosticSink) {
    for token in &doc.tokens {
        let Token::Start(el) = token else { continue };
        if !el.is_local("audio") {
            continue;
        }

        if let Some(src) = el.attr("src") {
            let resolved = reference::resolve(ctx.base_dir, src);
            match ctx.index.manifest_by_path.get(&resolved) {
                Some(item) if !is_core_media_type(&item.media_type) => {
                    sink.error("MED-005", format!("\"{resolved}\" is not a core media type"), Some(ctx.path));
                }
                None if ctx.publication.read_file(&resolved).is_none() => {
                    sink.error("MED-007", format!("\"{resolved}\" could not be found in the container"), Some(ctx.path));
                }
                _ => {}
            }
        }

        check_clip_values(ctx, el, sink);
    }
}

fn check_clip_values(ctx: &RuleContext, el: &crate::xml::Element, sink: &mut DiagnosticSink) {
    let begin = el.attr("clipBegin");
    let end = el.attr("clipEnd");

    let begin_ms = begin.and_then(parse_clock_value);
    let end_ms = end.and_then(parse_clock_value);

    if let Some(value) = begin
        && begin_ms.is_none()
    {
        sink.error("MED-010", format!("\"clipBegin\" value \"{value}\" is not a valid SMIL clock value"), Some(ctx.path));
    }
    if let Some(value) = end
        && end_ms.is_none()
    {
        sink.error("MED-010", format!("\"clipEnd\" value \"{value}\" is not a valid SMIL clock value"), Some(ctx.path));
    }

    if let (Some(b), Some(e)) = (begin_ms, end_ms) {
        if b > e {
            sink.error(
                "MED-008",
                format!("clipBegin ({}) is after clipEnd ({})", begin.unwrap_or_default(), end.unwrap_or_default()),
                Some(ctx.path),
            );
        } else if b == e {
            sink.error(
                "MED-009",
                format!("clipBegin ({}) equals clipEnd ({})", begin.unwrap_or_default(), end.unwrap_or_default()),
                Some(ctx.path),
            );
        }
    }
}

/// Parses a SMIL 3 clock value into milliseconds (`§4.4`).
fn parse_clock_value(raw: &str) -> Option<f64> {
    let s = raw.trim();
    if s.contains(':') {
        let parts: Vec<&str> = s.split(':').collect();
        return match parts.as_slice() {
            [hours, minutes, seconds] => {
                let h: f64 = hours.parse().ok()?;
                let m: f64 = minutes.parse().ok()?;
                let sec: f64 = seconds.parse().ok()?;
                (m < 60.0 && sec < 60.0).then(|| h * 3_600_000.0 + m * 60_000.0 + sec * 1_000.0)
            }
            [minutes, seconds] if minutes.len() <= 2 => {
                let m: f64 = minutes.parse().ok()?;
                let sec: f64 = seconds.parse().ok()?;
                (m < 60.0 && sec < 60.0).then(|| m * 60_000.0 + sec * 1_000.0)
            }
            _ => None,
        };
    }

    let (number, unit) = split_unit(s);
    let value: f64 = number.parse().ok()?;
    let multiplier = match unit {
        "h" => 3_600_000.0,
        "min" => 60_000.0,
        "ms" => 1.0,
        "s" | "" => 1_000.0,
        _ => return None,
    };
    Some(value * multiplier)
}

fn split_unit(s: &str) -> (&str, &str) {
    for unit in ["ms", "min", "h", "s"] {
        if let Some(stripped) = s.strip_suffix(unit) {
            return (stripped, unit);
        }
    }
    (s, "")
}

fn check_text(ctx: &RuleContext, doc: &Document, sink: &mut DiagnosticSink) {
    for token in &doc.tokens {
        let Token::Start(el) = token else { continue };
        if !el.is_local("text") {
            continue;
        }
        let Some(src) = el.attr("src") else { continue };
        let (path, fragment) = crate::util::uri::split_fragment(src);
        if fragment.is_empty() {
            continue;
        }

        if fragment.contains('(') {
            if fragment.starts_with("svgView(") && path.ends_with(".svg") {
                continue;
            }
            sink.error("MED-017", format!("\"{fragment}\" is not a recognized scheme-based fragment"), Some(ctx.path));
        } else if fragment.contains('=') {
            sink.error("MED-018", format!("\"{fragment}\" is an SVG media-fragment, not permitted here"), Some(ctx.path));
        } else {
            let own_ids = reference::collect_ids(&doc.tokens);
            if !reference::resolve_fragment(ctx.publication, ctx.base_dir, src, &own_ids) {
                sink.error("RSC-012", format!("\"{fragment}\" could not be found in \"{path}\""), Some(ctx.path));
            }
        }
    }
}

fn collect_content_targets(doc: &Document, base_dir: &str) -> HashSet<String> {
    let mut targets = HashSet::new();
    for token in &doc.tokens {
        let Token::Start(el) = token else { continue };
        if !matches!(el.local.as_str(), "audio" | "text") {
            continue;
        }
        if let Some(src) = el.attr("src") {
            let (path, _) = crate::util::uri::split_fragment(src);
            targets.insert(reference::resolve(base_dir, path));
        }
    }
    targets
}

/// Cross-references every media overlay against the manifest's
/// `media-overlay` declarations (`§4.4`); run once per publication, after
/// every SMIL document has been tokenized by [`run`].
pub(crate) fn check_cross_references(publication: &Publication, index: &ManifestIndex, sink: &mut DiagnosticSink) {
    let mut referenced_by: HashMap<String, Vec<String>> = HashMap::new();

    for item in publication.package.iter().flat_map(|p| p.manifest.iter()) {
        if !item.media_type.eq_ignore_ascii_case("application/smil+xml") || item.href_is_missing() {
            continue;
        }
        let Some(bytes) = publication.read_file(&item.href) else { continue };
        let doc = Document::parse(bytes);
        let base_dir = crate::util::uri::parent(&item.href);
        for target in collect_content_targets(&doc, base_dir) {
            referenced_by.entry(target).or_default().push(item.id.clone());
        }
    }

    for item in publication.package.iter().flat_map(|p| p.manifest.iter()) {
        if item.href_is_missing() || !index.manifest_paths.contains(&item.href) {
            continue;
        }
        let refs = referenced_by.get(&item.href);

        match (item.media_overlay.as_deref(), refs) {
            (Some(overlay_id), Some(ids)) if !ids.iter().any(|id| id == overlay_id) => {
                sink.error(
                    "MED-012",
                    format!("\"{}\" declares media-overlay \"{overlay_id}\" but is referenced by a different overlay", item.href),
                    Some(item.href.as_str()),
                );
            }
            (Some(_), None) => {
                sink.error("MED-013", format!("\"{}\" declares a media-overlay but no overlay references it", item.href), Some(item.href.as_str()));
            }
            (None, Some(_)) => {
                sink.error("MED-010", format!("\"{}\" is referenced by a media overlay but lacks \"media-overlay\"", item.href), Some(item.href.as_str()));
            }
            _ => {}
        }

        if let Some(ids) = refs
            && ids.len() > 1
        {
            sink.error("MED-011", format!("\"{}\" is referenced by more than one media overlay", item.href), Some(item.href.as_str()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_value_forms() {
        assert_eq!(Some(1500.0), parse_clock_value("1.5s"));
        assert_eq!(Some(90_000.0), parse_clock_value("1:30"));
        assert_eq!(Some(3_661_000.0), parse_clock_value("01:01:01"));
        assert_eq!(Some(2.0), parse_clock_value("2ms"));
        assert!(parse_clock_value("1:70").is_none());
        assert!(parse_clock_value("bogus").is_none());
    }

    #[test]
    fn test_clip_begin_after_end_fires_med008() {
        let publication = Publication::new(Default::default(), "OPS/package.opf".to_owned());
        let index = ManifestIndex::default();
        let ctx = crate::rules::test_support::ctx(&publication, &index);
        let doc = Document::parse(
            br#"<smil><body><par><audio src="a.mp3" clipBegin="5s" clipEnd="3s"/></par></body></smil>"#,
        );
        let mut sink = DiagnosticSink::new();
        check_audio(&ctx, &doc, &mut sink);
        assert!(sink.diagnostics().iter().any(|d| d.check_id == "MED-008"));
    }

    #[test]
    fn test_audio_outside_par_fires_med011() {
        let publication = Publication::new(Default::default(), "OPS/package.opf".to_owned());
        let index = ManifestIndex::default();
        let ctx = crate::rules::test_support::ctx(&publication, &index);
        let doc = Document::parse(br#"<smil><body><audio src="a.mp3"/></body></smil>"#);
        let mut sink = DiagnosticSink::new();
        check_structure(&ctx, &doc, &mut sink);
        assert!(sink.diagnostics().iter().any(|d| d.check_id == "MED-011"));
    }
}
