use super::{direct_children, resolve_href};
use crate::publication::ManifestItem;
use crate::xml::Token;

pub(super) fn parse_manifest(tokens: &[Token], package_dir: &str) -> Vec<ManifestItem> {
    direct_children(tokens, "manifest")
        .into_iter()
        .filter(|el| el.is_local("item"))
        .map(|el| {
            let href_raw = el.attr("href").unwrap_or_default();
            ManifestItem {
                id: el.attr("id").unwrap_or_default().to_owned(),
                href: resolve_href(package_dir, href_raw),
                media_type: el.attr("media-type").unwrap_or_default().to_ascii_lowercase(),
                properties: el.attr("properties").unwrap_or_default().to_owned(),
                fallback: el.attr("fallback").map(str::to_owned),
                media_overlay: el.attr("media-overlay").map(str::to_owned),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::Document;

    #[test]
    fn test_parse_manifest_items() {
        let doc = Document::parse(
            br#"<package><manifest>
                <item id="c1" href="c1.xhtml" media-type="application/xhtml+xml" properties="nav"/>
                <item id="im" href="im%20g.png" media-type="image/png" fallback="c1"/>
            </manifest></package>"#,
        );
        let items = parse_manifest(&doc.tokens, "OPS");
        assert_eq!(2, items.len());
        assert_eq!("OPS/c1.xhtml", items[0].href);
        assert_eq!("nav", items[0].properties);
        assert_eq!("OPS/im g.png", items[1].href);
        assert_eq!(Some("c1".to_owned()), items[1].fallback);
    }
}
