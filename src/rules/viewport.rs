//! The fixed-layout viewport rule (`C7`, `§4.6`).

use super::RuleContext;
use crate::diagnostic::DiagnosticSink;
use crate::xml::{Document, Token};
use std::collections::HashSet;

const UNIT_SUFFIXES: &[&str] = &["px", "em", "ex", "rem", "%", "vw", "vh", "pt", "pc", "cm", "mm", "in"];

struct Entry<'a> {
    key: &'a str,
    value: Option<&'a str>,
}

/// Parses `content` as a comma-separated list of `key` or `key=value`
/// entries; whitespace around `key`, `=` and `value` is stripped for `key`,
/// preserved for `value` (`§4.6`).
fn parse_entries(content: &str) -> Vec<Entry<'_>> {
    content
        .split(',')
        .map(|raw| match raw.split_once('=') {
            Some((key, value)) => Entry { key: key.trim(), value: Some(value) },
            None => Entry { key: raw.trim(), value: None },
        })
        .collect()
}

fn has_unit_suffix(value: &str) -> bool {
    let trimmed = value.trim();
    UNIT_SUFFIXES.iter().any(|suffix| trimmed.len() > suffix.len() && trimmed.to_ascii_lowercase().ends_with(suffix))
}

pub(crate) fn run(ctx: &RuleContext, doc: &Document, sink: &mut DiagnosticSink) {
    let viewport_metas: Vec<&str> = doc
        .tokens
        .iter()
        .filter_map(|t| match t {
            Token::Start(el) if el.is_local("meta") && el.attr("name") == Some("viewport") => el.attr("content"),
            _ => None,
        })
        .collect();

    if viewport_metas.is_empty() {
        if ctx.is_fxl {
            sink.error("HTM-046", "fixed-layout document has no \"viewport\" meta", Some(ctx.path));
        }
        return;
    }

    if !ctx.is_fxl {
        sink.usage("HTM-060b", "\"viewport\" meta present on a non-fixed-layout document", Some(ctx.path));
    }

    if viewport_metas.len() > 1 {
        sink.usage("HTM-060a", "more than one \"viewport\" meta", Some(ctx.path));
    }

    check_content(ctx, viewport_metas[0], sink);
}

fn check_content(ctx: &RuleContext, content: &str, sink: &mut DiagnosticSink) {
    let entries = parse_entries(content);
    let mut seen_keys: HashSet<String> = HashSet::new();
    let mut has_width = false;
    let mut has_height = false;

    for entry in &entries {
        match entry.value {
            Some(value) if value.trim().is_empty() => {
                sink.error("HTM-047", format!("\"{}\" has an empty value", entry.key), Some(ctx.path));
            }
            Some(value) => {
                if matches!(entry.key, "width" | "height") && has_unit_suffix(value) {
                    sink.error("HTM-057", format!("\"{}\" must not carry a CSS unit suffix", entry.key), Some(ctx.path));
                }
            }
            None if matches!(entry.key, "width" | "height") => {
                sink.error("HTM-057", format!("\"{}\" requires a value", entry.key), Some(ctx.path));
            }
            None => {}
        }

        if entry.key == "width" {
            has_width = true;
        }
        if entry.key == "height" {
            has_height = true;
        }

        if !seen_keys.insert(entry.key.to_owned())
            && matches!(entry.key, "width" | "height")
        {
            sink.error("HTM-059", format!("duplicate \"{}\" key", entry.key), Some(ctx.path));
        }
    }

    if !has_width || !has_height {
        sink.error("HTM-056", "viewport must declare both \"width\" and \"height\"", Some(ctx.path));
    }
}
