use super::direct_children;
use crate::publication::SpineItemref;
use crate::xml::Token;

/// Returns `(spine_itemrefs, spine_toc_attribute)` (`§3`).
pub(super) fn parse_spine(tokens: &[Token]) -> (Vec<SpineItemref>, String) {
    let spine_toc = find_spine_element(tokens)
        .and_then(|el| el.attr("toc"))
        .unwrap_or_default()
        .to_owned();

    let itemrefs = direct_children(tokens, "spine")
        .into_iter()
        .filter(|el| el.is_local("itemref"))
        .map(|el| SpineItemref {
            idref: el.attr("idref").unwrap_or_default().to_owned(),
            properties: el.attr("properties").unwrap_or_default().to_owned(),
        })
        .collect();

    (itemrefs, spine_toc)
}

fn find_spine_element(tokens: &[Token]) -> Option<&crate::xml::Element> {
    tokens.iter().find_map(|t| match t {
        Token::Start(el) if el.is_local("spine") => Some(el),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::Document;

    #[test]
    fn test_parse_spine() {
        let doc = Document::parse(
            br#"<package><spine toc="ncx">
                <itemref idref="c1"/>
                <itemref idref="c2" properties="rendition:layout-pre-paginated"/>
            </spine></package>"#,
        );
        let (itemrefs, toc) = parse_spine(&doc.tokens);
        assert_eq!("ncx", toc);
        assert_eq!(2, itemrefs.len());
        assert_eq!("rendition:layout-pre-paginated", itemrefs[1].properties);
    }
}
