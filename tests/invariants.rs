//! Universal invariants and round-trip/closure laws that must hold across
//! every rule set, not just one.

mod support;

use support::{file, has, validate};

#[test]
fn validation_is_idempotent() {
    let body = br#"<html xmlns="http://www.w3.org/1999/xhtml"><head></head><body><p><div>x</div></p></body></html>"#;
    let files = || vec![file("c1", "OPS/c1.xhtml", "application/xhtml+xml", body).spine()];
    let first = validate("3.0", "", files());
    let second = validate("3.0", "", files());
    assert_eq!(first, second);
}

#[test]
fn manifest_items_outside_the_four_content_media_types_get_no_content_diagnostics() {
    let diagnostics = validate(
        "3.0",
        "",
        vec![
            file("css", "OPS/style.css", "text/css", b"body { color: red }"),
            file("cover", "OPS/cover.jpg", "image/jpeg", b"\xFF\xD8\xFF"),
            file("font", "OPS/font.otf", "application/font-sfnt", b""),
        ],
    );
    assert!(diagnostics.is_empty());
}

#[test]
fn downgrade_to_info_never_changes_error_or_fatal_counts() {
    let body = br#"<html xmlns="http://www.w3.org/1999/xhtml"><head><title>t</title></head><body><img src="a.png" id="x"/><img src="b.png" id="x"/></body></html>"#;
    let strict = validate("3.0", "", vec![file("c1", "OPS/c1.xhtml", "application/xhtml+xml", body).spine()]);
    let non_strict = support::validate_with(
        "3.0",
        "",
        vec![file("c1", "OPS/c1.xhtml", "application/xhtml+xml", body).spine()],
        epub_conform::ValidatorSettings::default().with_strict(false),
    );

    let error_count = |ds: &[epub_conform::Diagnostic]| {
        ds.iter().filter(|d| matches!(d.severity, epub_conform::Severity::Error | epub_conform::Severity::Fatal)).count()
    };
    assert_eq!(error_count(&strict), error_count(&non_strict));
}

#[test]
fn rsc032_never_fires_when_fallback_names_an_existing_manifest_item() {
    let body = br#"<html xmlns="http://www.w3.org/1999/xhtml"><head><title>t</title></head><body>
        <img src="a.jxl"/>
    </body></html>"#;
    let diagnostics = validate(
        "3.0",
        "",
        vec![
            file("c1", "OPS/c1.xhtml", "application/xhtml+xml", body).spine(),
            file("jxl", "OPS/a.jxl", "image/jxl", b"").with_fallback("png"),
            file("png", "OPS/fallback.png", "image/png", b""),
        ],
    );
    assert!(!has(&diagnostics, "RSC-032"));
}

#[test]
fn picture_with_source_then_img_in_order_never_fires_picture_content_rsc005() {
    let body = br#"<html xmlns="http://www.w3.org/1999/xhtml"><head><title>t</title></head><body>
        <picture><source srcset="a.jxl" type="image/jxl"/><img src="b.png"/></picture>
    </body></html>"#;
    let diagnostics = validate(
        "3.0",
        "",
        vec![
            file("c1", "OPS/c1.xhtml", "application/xhtml+xml", body).spine(),
            file("jxl", "OPS/a.jxl", "image/jxl", b""),
            file("png", "OPS/b.png", "image/png", b""),
        ],
    );
    assert!(!has(&diagnostics, "RSC-005"));
}

#[test]
fn fragment_round_trip_same_document_id_never_fires_rsc012() {
    let body = br#"<html xmlns="http://www.w3.org/1999/xhtml"><head><title>t</title></head><body>
        <p id="target">x</p><a href="#target">link</a>
    </body></html>"#;
    let diagnostics = validate("3.0", "", vec![file("c1", "OPS/c1.xhtml", "application/xhtml+xml", body).spine()]);
    assert!(!has(&diagnostics, "RSC-012"));
}
