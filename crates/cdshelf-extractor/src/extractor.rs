use crate::error::ExtractorError;
use crate::selectors::Selectors;
use cdshelf_core::DiscRecord;
use scraper::{ElementRef, Html};
use tracing::trace;

/// A named way of reading one field from a parsed page.
struct Strategy<T> {
    name: &'static str,
    run: fn(&Selectors, &Html) -> Option<T>,
}

/// Label fields read together from a single anchor.
#[derive(Debug, Default, PartialEq)]
struct LabelInfo {
    name: String,
    id: u64,
    cover: String,
}

const COVER: &[Strategy<String>] = &[
    Strategy {
        name: "cover-container",
        run: cover_in_container,
    },
    Strategy {
        name: "cover-id",
        run: cover_by_id,
    },
];

const TITLE: &[Strategy<String>] = &[Strategy {
    name: "first-h1",
    run: first_heading,
}];

// Positional first: it matches the layout the site currently serves.
const LABEL: &[Strategy<LabelInfo>] = &[
    Strategy {
        name: "positional",
        run: label_positional,
    },
    Strategy {
        name: "class",
        run: label_by_class,
    },
];

const COMMENT: &[Strategy<String>] = &[Strategy {
    name: "comment-block",
    run: comment_block,
}];

const PROMO_LINK: &[Strategy<String>] = &[Strategy {
    name: "promo-anchor",
    run: promo_anchor,
}];

/// Recovers a [`DiscRecord`] from the HTML of a disc detail page.
///
/// The extractor is cheap to share; selectors are compiled in [`new`]
/// and reused by every call.
///
/// [`new`]: DiscExtractor::new
#[derive(Debug)]
pub struct DiscExtractor {
    selectors: Selectors,
}

impl DiscExtractor {
    pub fn new() -> Result<Self, ExtractorError> {
        Ok(Self {
            selectors: Selectors::new()?,
        })
    }

    /// Extracts whatever metadata the page offers.
    ///
    /// Missing nodes leave the matching field at its default: empty
    /// strings, a label id of `0`, no promo link. The returned `id` is
    /// always empty; callers know which item they asked for.
    pub fn extract(&self, html: &str) -> DiscRecord {
        let document = Html::parse_document(html);
        let label = self.first_match("label", LABEL, &document).unwrap_or_default();

        DiscRecord {
            title: self.first_match("title", TITLE, &document).unwrap_or_default(),
            cover: self.first_match("cover", COVER, &document).unwrap_or_default(),
            label: label.name,
            label_id: label.id,
            label_cover: label.cover,
            comment: self.first_match("comment", COMMENT, &document).unwrap_or_default(),
            promo_link: self.first_match("promo_link", PROMO_LINK, &document),
            ..Default::default()
        }
    }

    fn first_match<T: Emptiness>(
        &self,
        field: &'static str,
        strategies: &[Strategy<T>],
        document: &Html,
    ) -> Option<T> {
        for strategy in strategies {
            match (strategy.run)(&self.selectors, document) {
                Some(value) if !value.is_blank() => {
                    trace!(field, strategy = strategy.name, "Extraction strategy matched");
                    return Some(value);
                }
                _ => trace!(field, strategy = strategy.name, "Extraction strategy found nothing"),
            }
        }
        trace!(field, "No extraction strategy matched, using default");
        None
    }
}

trait Emptiness {
    fn is_blank(&self) -> bool;
}

impl Emptiness for String {
    fn is_blank(&self) -> bool {
        self.is_empty()
    }
}

impl Emptiness for LabelInfo {
    fn is_blank(&self) -> bool {
        self.name.is_empty() && self.id == 0 && self.cover.is_empty()
    }
}

fn cover_in_container(s: &Selectors, doc: &Html) -> Option<String> {
    image_source(doc.select(&s.cover_in_container).next()?)
}

fn cover_by_id(s: &Selectors, doc: &Html) -> Option<String> {
    image_source(doc.select(&s.cover_by_id).next()?)
}

fn first_heading(s: &Selectors, doc: &Html) -> Option<String> {
    non_empty(text_content(&doc.select(&s.title).next()?))
}

fn comment_block(s: &Selectors, doc: &Html) -> Option<String> {
    non_empty(text_content(&doc.select(&s.comment).next()?))
}

fn promo_anchor(s: &Selectors, doc: &Html) -> Option<String> {
    non_empty(attr(&doc.select(&s.promo_link).next()?, "href"))
}

fn label_positional(s: &Selectors, doc: &Html) -> Option<LabelInfo> {
    let anchor = doc.select(&s.label_positional).next()?;

    let name = preceding_element(&anchor)
        .filter(|el| el.value().name() == "span")
        .map(|span| text_content(&span))
        .and_then(non_empty)
        .unwrap_or_else(|| text_content(&anchor));

    let cover = anchor
        .select(&s.img)
        .next()
        .and_then(image_source)
        .unwrap_or_default();

    Some(LabelInfo {
        name,
        id: label_id(&attr(&anchor, "href")),
        cover,
    })
}

fn label_by_class(s: &Selectors, doc: &Html) -> Option<LabelInfo> {
    let anchor = doc.select(&s.label_link).next()?;

    let name = anchor
        .select(&s.label_name)
        .next()
        .or_else(|| doc.select(&s.label_name).next())
        .map(|el| text_content(&el))
        .and_then(non_empty)
        .unwrap_or_else(|| text_content(&anchor));

    let cover = anchor
        .select(&s.label_cover)
        .next()
        .or_else(|| doc.select(&s.label_cover).next())
        .and_then(image_source)
        .unwrap_or_default();

    Some(LabelInfo {
        name,
        id: label_id(&attr(&anchor, "href")),
        cover,
    })
}

/// The closest element sibling before `element`, skipping text nodes.
fn preceding_element<'a>(element: &ElementRef<'a>) -> Option<ElementRef<'a>> {
    element.prev_siblings().find_map(ElementRef::wrap)
}

/// Lazy-loaded images keep the real URL in `data-src`.
fn image_source(img: ElementRef<'_>) -> Option<String> {
    non_empty(attr(&img, "data-src")).or_else(|| non_empty(attr(&img, "src")))
}

/// Parses the trailing path segment of a label href such as `/l/123/`.
fn label_id(href: &str) -> u64 {
    let path = href.split(['?', '#']).next().unwrap_or_default();
    path.rsplit('/')
        .find(|segment| !segment.is_empty())
        .and_then(|segment| segment.parse().ok())
        .unwrap_or(0)
}

fn attr(element: &ElementRef<'_>, name: &str) -> String {
    element
        .value()
        .attr(name)
        .map(|v| v.trim().to_string())
        .unwrap_or_default()
}

fn text_content(element: &ElementRef<'_>) -> String {
    element
        .text()
        .collect::<Vec<_>>()
        .join("")
        .trim()
        .to_string()
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}
