use crate::error::ExtractorError;
use scraper::Selector;

/// Every selector the strategies use, compiled once.
#[derive(Debug)]
pub(crate) struct Selectors {
    pub cover_in_container: Selector,
    pub cover_by_id: Selector,
    pub title: Selector,
    pub label_positional: Selector,
    pub label_link: Selector,
    pub label_name: Selector,
    pub label_cover: Selector,
    pub img: Selector,
    pub comment: Selector,
    pub promo_link: Selector,
}

impl Selectors {
    pub fn new() -> Result<Self, ExtractorError> {
        Ok(Self {
            cover_in_container: parse("#cover img")?,
            cover_by_id: parse("img#cover")?,
            title: parse("h1")?,
            label_positional: parse(r#"#disc-info > div:nth-of-type(2) > a[href*="/l/"]"#)?,
            label_link: parse("a.label-link")?,
            label_name: parse(".label-name")?,
            label_cover: parse("img.label-cover")?,
            img: parse("img")?,
            comment: parse(".disc-comment")?,
            promo_link: parse("a.promo-link")?,
        })
    }
}

fn parse(selector: &'static str) -> Result<Selector, ExtractorError> {
    Selector::parse(selector).map_err(|err| ExtractorError::InvalidSelector {
        selector,
        reason: err.to_string(),
    })
}
