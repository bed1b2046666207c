//! Black-box coverage of the XHTML content rule set (`C3`).

mod support;

use support::{file, has, validate};

#[test]
fn div_inside_p_fires_rsc005() {
    let body = br#"<html xmlns="http://www.w3.org/1999/xhtml"><head><title>t</title></head><body><p><div>x</div></p></body></html>"#;
    let diagnostics = validate("3.0", "", vec![file("c1", "OPS/c1.xhtml", "application/xhtml+xml", body).spine()]);
    assert!(has(&diagnostics, "RSC-005"));
}

#[test]
fn duplicate_ids_fire_one_diagnostic_per_occurrence() {
    let body = br#"<html xmlns="http://www.w3.org/1999/xhtml"><head><title>t</title></head><body><img src="a.png" id="x"/><img src="b.png" id="x"/></body></html>"#;
    let diagnostics = validate("3.0", "", vec![file("c1", "OPS/c1.xhtml", "application/xhtml+xml", body).spine()]);
    assert_eq!(2, support::count(&diagnostics, "HTM-016"));
}

#[test]
fn missing_title_warns_htm002() {
    let body = br#"<html xmlns="http://www.w3.org/1999/xhtml"><head></head><body></body></html>"#;
    let diagnostics = validate("3.0", "", vec![file("c1", "OPS/c1.xhtml", "application/xhtml+xml", body).spine()]);
    assert!(has(&diagnostics, "HTM-002"));
}

#[test]
fn unneeded_scripted_and_svg_properties_fire_opf015_twice() {
    let body = br#"<html xmlns="http://www.w3.org/1999/xhtml"><head><title>t</title></head><body></body></html>"#;
    let diagnostics = validate(
        "3.0",
        "",
        vec![file("chapter", "OPS/chapter.xhtml", "application/xhtml+xml", body).with_properties("scripted svg").spine()],
    );
    assert_eq!(2, support::count(&diagnostics, "OPF-015"));
}

#[test]
fn only_manifest_items_of_applicable_media_type_get_content_diagnostics() {
    let body = b"not xml at all, just bytes";
    let diagnostics = validate("3.0", "", vec![file("cover", "OPS/cover.jpg", "image/jpeg", body)]);
    assert!(diagnostics.is_empty());
}
