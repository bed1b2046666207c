use super::{direct_children, resolve_href};
use crate::publication::GuideRef;
use crate::xml::Token;

pub(super) fn parse_guide(tokens: &[Token], package_dir: &str) -> Vec<GuideRef> {
    direct_children(tokens, "guide")
        .into_iter()
        .filter(|el| el.is_local("reference"))
        .map(|el| GuideRef {
            r#type: el.attr("type").unwrap_or_default().to_owned(),
            href: resolve_href(package_dir, el.attr("href").unwrap_or_default()),
        })
        .collect()
}
