use super::direct_children;
use crate::publication::{Creator, Identifier, PackageMetadata};
use crate::xml::Token;

pub(super) fn parse_metadata(tokens: &[Token], _unique_identifier: &str) -> PackageMetadata {
    let mut metadata = PackageMetadata::default();
    let children = direct_children(tokens, "metadata");

    for el in &children {
        if el.is_local("identifier") {
            metadata.identifiers.push(Identifier {
                id: el.attr("id").map(str::to_owned),
                value: String::new(), // text content is collected via the element-text pass below
            });
        } else if el.is_local("creator") {
            metadata.creators.push(Creator {
                value: String::new(),
                role: el.attr("role").or_else(|| el.attr_qualified("opf", "role")).map(str::to_owned),
            });
        } else if el.is_local("meta") {
            let property = el.attr("property").unwrap_or_default();
            if property == "dcterms:modified" || el.attr("name") == Some("dcterms:modified") {
                metadata.modified_count += 1;
            }
            if property == "media:active-class" || property == "media:playback-active-class" {
                metadata.has_media_active_class = true;
            }
        }
    }

    // Element text (dc:identifier / dc:creator values) requires following
    // each Start token to its matching Text tokens; done as a second, small
    // pass so the child-collection above stays a simple filter.
    fill_text_values(tokens, &mut metadata);
    metadata
}

fn fill_text_values(tokens: &[Token], metadata: &mut PackageMetadata) {
    let mut identifier_idx = 0;
    let mut creator_idx = 0;
    let mut capturing: Option<&'static str> = None;
    let mut buffer = String::new();

    for token in tokens {
        match token {
            Token::Start(el) if el.is_local("identifier") => {
                capturing = Some("identifier");
                buffer.clear();
            }
            Token::Start(el) if el.is_local("creator") => {
                capturing = Some("creator");
                buffer.clear();
            }
            Token::Text(text) if capturing.is_some() => buffer.push_str(text),
            Token::End { local } if local == "identifier" && capturing == Some("identifier") => {
                if let Some(entry) = metadata.identifiers.get_mut(identifier_idx) {
                    entry.value = buffer.trim().to_owned();
                }
                identifier_idx += 1;
                capturing = None;
            }
            Token::End { local } if local == "creator" && capturing == Some("creator") => {
                if let Some(entry) = metadata.creators.get_mut(creator_idx) {
                    entry.value = buffer.trim().to_owned();
                }
                creator_idx += 1;
                capturing = None;
            }
            _ => {}
        }
    }
}
