//! `§4.2` HTML5 content model family, all surfaced as `RSC-005`. Every
//! sub-rule raises at most one diagnostic per document.
//!
//! Every sub-rule shares the same skeleton: a stack of open elements with a
//! `foreign_depth` counter incremented on SVG/MathML start and decremented
//! on their end. While `foreign_depth > 0` elements are opaque to every
//! other sub-rule — this is the load-bearing invariant of the whole
//! ruleset (`§4.2`).

use super::super::RuleContext;
use crate::consts::{
    TABLE_CHILDREN, disallowed_descendants, is_flow_only, is_interactive, is_phrasing_only_container,
    is_script_supporting, is_transparent, is_void_element, restricted_children,
};
use crate::diagnostic::DiagnosticSink;
use crate::xml::{Document, MATHML_NS, SVG_NS, Token};

struct Frame {
    local: String,
    is_foreign: bool,
    is_phrasing_only: bool,
    is_transparent: bool,
    is_interactive: bool,
    is_anchor: bool,
    restricted: Option<&'static [&'static str]>,
    /// Snapshot, taken when this frame was pushed, of whether a
    /// phrasing-only ancestor was already open (`transparent-inheritance`).
    had_phrasing_ancestor: bool,
}

#[derive(Default)]
struct Fired {
    block_in_phrasing: bool,
    restricted_children: bool,
    void_children: bool,
    table_children: bool,
    interactive_nesting: bool,
    nested_anchor: bool,
    transparent_inheritance: bool,
    figcaption_position: bool,
    picture_content: bool,
    disallowed_descendants: bool,
    required_ancestor: bool,
    nested_dfn: bool,
    nested_time: bool,
    nested_ssml_ph: bool,
    bdo_dir: bool,
    select_multiple: bool,
    duplicate_map_name: bool,
    meta_charset_once: bool,
    link_sizes_only_on_icon: bool,
    img_src_nonempty: bool,
    a_href_nonempty: bool,
}

struct Walker {
    stack: Vec<Frame>,
    foreign_depth: u32,
    phrasing_ancestor_count: u32,
    fired: Fired,
    dfn_depth: u32,
    time_depth: u32,
    ssml_ph_depth: u32,
    meta_charset_count: u32,
    map_names: Vec<String>,
    /// `(has_multiple, selected_count)` per currently-open `<select>`.
    select_stack: Vec<(bool, u32)>,
}

fn emit(sink: &mut DiagnosticSink, path: &str, fired: &mut bool, message: &str) {
    if *fired {
        return;
    }
    *fired = true;
    sink.error("RSC-005", message.to_owned(), Some(path));
}

impl Walker {
    fn new() -> Self {
        Self {
            stack: Vec::new(),
            foreign_depth: 0,
            phrasing_ancestor_count: 0,
            fired: Fired::default(),
            dfn_depth: 0,
            time_depth: 0,
            ssml_ph_depth: 0,
            meta_charset_count: 0,
            map_names: Vec::new(),
            select_stack: Vec::new(),
        }
    }

    fn start(&mut self, ctx: &RuleContext, el: &crate::xml::Element, sink: &mut DiagnosticSink) {
        let local = el.local.as_str();
        let is_foreign_self = el.ns.as_deref() == Some(SVG_NS) || el.ns.as_deref() == Some(MATHML_NS);
        let opaque = self.foreign_depth > 0;

        if !opaque {
            self.check_start(ctx, el, sink);
        }

        if is_foreign_self {
            self.foreign_depth += 1;
        }
        if local == "dfn" {
            self.dfn_depth += 1;
        }
        if local == "time" {
            self.time_depth += 1;
        }
        if el.ns.as_deref() == Some(crate::xml::SSML_NS) && local == "ph" {
            self.ssml_ph_depth += 1;
        }

        let is_phrasing_only = is_phrasing_only_container(local);
        let frame = Frame {
            local: local.to_owned(),
            is_foreign: is_foreign_self,
            is_phrasing_only,
            is_transparent: is_transparent(local),
            is_interactive: is_interactive(local),
            is_anchor: local == "a",
            restricted: if local == "table" { Some(TABLE_CHILDREN) } else { restricted_children(local) },
            had_phrasing_ancestor: self.phrasing_ancestor_count > 0,
        };
        if is_phrasing_only {
            self.phrasing_ancestor_count += 1;
        }

        if !el.self_closing {
            self.stack.push(frame);
        } else {
            self.close_bookkeeping(&frame);
            if local == "select" {
                self.end("select", sink, ctx.path);
            }
        }
    }

    fn check_start(&mut self, ctx: &RuleContext, el: &crate::xml::Element, sink: &mut DiagnosticSink) {
        let local = el.local.as_str();
        let path = ctx.path;

        // 1. block-in-phrasing.
        if is_flow_only(local) && self.phrasing_ancestor_count > 0 {
            emit(sink, path, &mut self.fired.block_in_phrasing, &format!("\"{local}\" is a block element inside phrasing-only content"));
        }

        // 2/4. restricted-children / table-children on the direct parent.
        if let Some(parent) = self.stack.last()
            && let Some(allowed) = parent.restricted
            && !allowed.contains(&local)
            && !is_script_supporting(local)
        {
            let check = if parent.local == "table" { &mut self.fired.table_children } else { &mut self.fired.restricted_children };
            emit(sink, path, check, &format!("\"{local}\" is not a permitted child of \"{}\"", parent.local));
        }

        // 3. void-children: parent is a void element and got a child.
        if let Some(parent) = self.stack.last()
            && is_void_element(&parent.local)
        {
            emit(sink, path, &mut self.fired.void_children, &format!("\"{}\" must be empty but contains \"{local}\"", parent.local));
        }

        // 5. interactive-nesting (the a-in-a case is reported separately).
        let interactive_ancestor = self.stack.iter().any(|f| f.is_interactive);
        if is_interactive(local) && interactive_ancestor {
            if local == "a" && self.stack.iter().any(|f| f.is_anchor) {
                emit(sink, path, &mut self.fired.nested_anchor, "\"a\" is nested inside another \"a\"");
            } else {
                emit(sink, path, &mut self.fired.interactive_nesting, &format!("\"{local}\" is nested inside another interactive element"));
            }
        }

        // 6. transparent-inheritance.
        if is_flow_only(local)
            && let Some(transparent) = self.stack.iter().rev().find(|f| f.is_transparent)
            && transparent.had_phrasing_ancestor
        {
            emit(sink, path, &mut self.fired.transparent_inheritance, &format!("\"{local}\" is a block child of a transparent element inside phrasing-only content"));
        }

        // 8. picture-content.
        if let Some(parent) = self.stack.last()
            && parent.local == "picture"
            && !is_script_supporting(local)
            && local != "source"
            && local != "img"
        {
            emit(sink, path, &mut self.fired.picture_content, &format!("\"{local}\" is not permitted inside \"picture\""));
        }
        // 9. disallowed-descendants.
        for ancestor in &self.stack {
            if disallowed_descendants(&ancestor.local).contains(&local) {
                emit(sink, path, &mut self.fired.disallowed_descendants, &format!("\"{local}\" must not appear inside \"{}\"", ancestor.local));
                break;
            }
        }

        // 10. required-ancestor.
        if local == "area" && !self.stack.iter().any(|f| f.local == "map") {
            emit(sink, path, &mut self.fired.required_ancestor, "\"area\" must be inside \"map\"");
        }
        if local == "img" && el.attr("ismap").is_some() && !self.stack.iter().any(|f| f.is_anchor) {
            emit(sink, path, &mut self.fired.required_ancestor, "\"img ismap\" must be inside \"a href\"");
        }

        // 11. nested-dfn / nested-time / nested-ssml-ph.
        if local == "dfn" && self.dfn_depth > 0 {
            emit(sink, path, &mut self.fired.nested_dfn, "\"dfn\" must not be nested inside another \"dfn\"");
        }
        if local == "time" && self.time_depth > 0 {
            emit(sink, path, &mut self.fired.nested_time, "\"time\" must not be nested inside another \"time\"");
        }
        if el.ns.as_deref() == Some(crate::xml::SSML_NS) && local == "ph" && self.ssml_ph_depth > 0 {
            emit(sink, path, &mut self.fired.nested_ssml_ph, "\"ssml:ph\" must not be nested inside another \"ssml:ph\"");
        }

        // 12. assorted smaller rules.
        if local == "bdo" && el.attr("dir").is_none() {
            emit(sink, path, &mut self.fired.bdo_dir, "\"bdo\" must carry a \"dir\" attribute");
        }
        if local == "select" {
            self.select_stack.push((el.attr("multiple").is_some(), 0));
        }
        if local == "option" && el.attr("selected").is_some()
            && let Some((_, count)) = self.select_stack.last_mut()
        {
            *count += 1;
        }
        if local == "map" {
            if let Some(name) = el.attr("name") {
                if self.map_names.iter().any(|n| n == name) {
                    emit(sink, path, &mut self.fired.duplicate_map_name, &format!("\"map name\" \"{name}\" is declared more than once"));
                }
                self.map_names.push(name.to_owned());
            }
        }
        if local == "meta" && el.attr("charset").is_some() {
            self.meta_charset_count += 1;
            if self.meta_charset_count > 1 {
                emit(sink, path, &mut self.fired.meta_charset_once, "only one \"meta charset\" is permitted");
            }
        }
        if local == "link" && el.attr("sizes").is_some() {
            let is_icon = el.attr("rel").is_some_and(|r| r.split_ascii_whitespace().any(|t| t.eq_ignore_ascii_case("icon")));
            if !is_icon {
                emit(sink, path, &mut self.fired.link_sizes_only_on_icon, "\"sizes\" is only permitted on \"link rel=icon\"");
            }
        }
        if local == "img" && el.attr("src").is_some_and(str::is_empty) {
            emit(sink, path, &mut self.fired.img_src_nonempty, "\"img src\" must not be empty");
        }
        if local == "a" && el.attr("href").is_some_and(str::is_empty) {
            emit(sink, path, &mut self.fired.a_href_nonempty, "\"a href\" must not be empty");
        }
    }

    fn end(&mut self, local: &str, sink: &mut DiagnosticSink, path: &str) {
        if local == "select"
            && let Some((has_multiple, selected_count)) = self.select_stack.pop()
            && selected_count > 1
            && !has_multiple
        {
            emit(sink, path, &mut self.fired.select_multiple, "more than one \"option\" is \"selected\" without \"select multiple\"");
        }

        let Some(frame) = self.stack.last() else { return };
        if frame.local != local {
            // Tokenizer-level well-formedness already guarantees matching
            // tags; a mismatch here means malformed input slipped through,
            // in which case there's nothing safe left to pop.
            return;
        }
        let frame = self.stack.pop().expect("checked above");
        self.close_bookkeeping(&frame);
    }

    fn close_bookkeeping(&mut self, frame: &Frame) {
        if frame.is_foreign {
            self.foreign_depth = self.foreign_depth.saturating_sub(1);
        }
        if frame.is_phrasing_only {
            self.phrasing_ancestor_count = self.phrasing_ancestor_count.saturating_sub(1);
        }
        if frame.local == "dfn" {
            self.dfn_depth = self.dfn_depth.saturating_sub(1);
        }
        if frame.local == "ph" {
            self.ssml_ph_depth = self.ssml_ph_depth.saturating_sub(1);
        }
        if frame.local == "time" {
            self.time_depth = self.time_depth.saturating_sub(1);
        }
    }
}

pub(super) fn run(ctx: &RuleContext, doc: &Document, sink: &mut DiagnosticSink) {
    let mut walker = Walker::new();
    check_figcaption_and_picture(ctx, doc, sink, &mut walker.fired);

    for token in &doc.tokens {
        match token {
            Token::Start(el) => walker.start(ctx, el, sink),
            Token::End { local } => walker.end(local, sink, ctx.path),
            _ => {}
        }
    }
}

/// `figcaption-position` and the stricter half of `picture-content` need
/// the fully materialised child list of `<figure>`/`<picture>`, which the
/// incremental walker above doesn't retain; handled as small dedicated
/// passes over direct-children groups instead.
fn check_figcaption_and_picture(ctx: &RuleContext, doc: &Document, sink: &mut DiagnosticSink, fired: &mut Fired) {
    let mut stack: Vec<(&str, Vec<&str>)> = Vec::new();

    for token in &doc.tokens {
        match token {
            Token::Start(el) => {
                if let Some((_, children)) = stack.last_mut() {
                    children.push(el.local.as_str());
                }
                if el.local == "figure" || el.local == "picture" {
                    stack.push((el.local.as_str(), Vec::new()));
                }
                if el.self_closing && matches!(el.local.as_str(), "figure" | "picture") {
                    finish_group(ctx, sink, fired, &stack.pop().unwrap());
                }
            }
            Token::End { local } => {
                if matches!(local.as_str(), "figure" | "picture") && stack.last().is_some_and(|(l, _)| *l == local) {
                    finish_group(ctx, sink, fired, &stack.pop().unwrap());
                }
            }
            _ => {}
        }
    }
}

fn finish_group(ctx: &RuleContext, sink: &mut DiagnosticSink, fired: &mut Fired, group: &(&str, Vec<&str>)) {
    let (kind, children) = group;
    let children: Vec<&str> = children.iter().filter(|c| !is_script_supporting(c)).copied().collect();

    if *kind == "figure" {
        if let Some(pos) = children.iter().position(|c| *c == "figcaption") {
            if pos != 0 && pos != children.len() - 1 {
                emit(sink, ctx.path, &mut fired.figcaption_position, "\"figcaption\" must be the first or last child of \"figure\"");
            }
        }
    } else {
        let img_count = children.iter().filter(|c| **c == "img").count();
        let all_sources_then_img = children.iter().enumerate().all(|(i, c)| {
            if i + 1 == children.len() { *c == "img" } else { *c == "source" }
        });
        if img_count != 1 || !all_sources_then_img {
            emit(sink, ctx.path, &mut fired.picture_content, "\"picture\" must contain zero or more \"source\" followed by exactly one \"img\"");
        }
    }
}
