//! Black-box coverage of the foreign-resource fallback resolver (`C8`).

mod support;

use support::{file, has, validate};

#[test]
fn picture_with_matching_type_source_and_core_img_fallback_is_clean() {
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
    assert!(!has(&diagnostics, "MED-003"));
    assert!(!has(&diagnostics, "OPF-013"));
}

#[test]
fn object_without_fallback_or_binding_fires_rsc032() {
    let body = br#"<html xmlns="http://www.w3.org/1999/xhtml"><head><title>t</title></head><body>
        <object data="a.swf" type="application/x-shockwave-flash"></object>
    </body></html>"#;
    let diagnostics = validate("3.0", "", vec![file("c1", "OPS/c1.xhtml", "application/xhtml+xml", body).spine()]);
    assert!(has(&diagnostics, "RSC-032"));
}

#[test]
fn audio_with_one_core_sibling_source_never_fires_rsc032() {
    let body = br#"<html xmlns="http://www.w3.org/1999/xhtml"><head><title>t</title></head><body>
        <audio><source src="a.jxl" type="image/jxl"/><source src="b.mp3" type="audio/mpeg"/></audio>
    </body></html>"#;
    let diagnostics = validate(
        "3.0",
        "",
        vec![
            file("c1", "OPS/c1.xhtml", "application/xhtml+xml", body).spine(),
            file("jxl", "OPS/a.jxl", "image/jxl", b""),
            file("mp3", "OPS/b.mp3", "audio/mpeg", b""),
        ],
    );
    assert!(!has(&diagnostics, "RSC-032"));
}
