//! Minimal HTML rendering of a disc collection.

use cdshelf_core::DiscRecord;
use html_escape::{encode_double_quoted_attribute, encode_text};

const PAGE_HEAD: &str = r#"<!DOCTYPE html>
<html>
  <head>
    <meta charset="UTF-8" />
    <title>My CD Collection</title>
    <style>
      body { font-family: Arial, sans-serif; margin: 0; padding: 20px; }
      h1 { text-align: center; margin-bottom: 20px; }
      #discs { display: grid; grid-template-columns: repeat(auto-fit, minmax(200px, 1fr)); grid-gap: 20px; }
      .disc { border: 1px solid #ccc; padding: 10px; text-align: center; }
      .disc a { color: inherit; text-decoration: none; }
      .disc img { width: 100%; height: auto; margin-bottom: 10px; }
      .disc h2 { font-size: 18px; margin-bottom: 5px; }
      .disc p { font-size: 14px; color: #666; }
    </style>
  </head>
  <body>
    <h1>My CD Collection</h1>
    <div id="discs">
"#;

const PAGE_TAIL: &str = r#"    </div>
  </body>
</html>
"#;

/// Renders `discs` as a grid of cover, title and label, in the given
/// order. Each card links to [`DiscRecord::link`] under `base_url`.
pub fn render_collection(discs: &[DiscRecord], base_url: &str) -> String {
    let mut page = String::from(PAGE_HEAD);
    for disc in discs {
        page.push_str(&render_card(disc, base_url));
    }
    page.push_str(PAGE_TAIL);
    page
}

fn render_card(disc: &DiscRecord, base_url: &str) -> String {
    let link = disc.link(base_url);
    let image = if disc.cover.is_empty() {
        String::new()
    } else {
        format!(
            r#"<img src="{}" alt="{}" />"#,
            encode_double_quoted_attribute(&disc.cover),
            encode_double_quoted_attribute(&disc.title),
        )
    };

    format!(
        r#"      <div class="disc">
        <a href="{link}">
          {image}
          <h2>{title}</h2>
        </a>
        <p>{label}</p>
      </div>
"#,
        link = encode_double_quoted_attribute(&link),
        title = encode_text(&disc.title),
        label = encode_text(&disc.label),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://www.dizzylab.net";

    fn disc(id: &str, title: &str) -> DiscRecord {
        DiscRecord {
            id: id.to_string(),
            title: title.to_string(),
            cover: format!("http://x/{id}.jpg"),
            label: "Label A".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn escapes_quotes_in_attributes() {
        let mut record = disc("1", r#"Say "hi" & <wave>"#);
        record.cover = r#"http://x/"a".jpg"#.to_string();
        let page = render_collection(&[record], BASE);

        assert!(page.contains(
            r#"<img src="http://x/&quot;a&quot;.jpg" alt="Say &quot;hi&quot; &amp; &lt;wave&gt;" />"#
        ));
        assert!(page.contains(r#"<h2>Say "hi" &amp; &lt;wave&gt;</h2>"#));
    }

    #[test]
    fn renders_cards_in_order() {
        let page = render_collection(&[disc("2", "Second"), disc("1", "First")], BASE);

        let second = page.find("<h2>Second</h2>").unwrap();
        let first = page.find("<h2>First</h2>").unwrap();
        assert!(second < first);
        assert!(page.contains(r#"<img src="http://x/2.jpg" alt="Second" />"#));
        assert!(page.contains("<p>Label A</p>"));
        assert!(page.contains(r#"href="https://www.dizzylab.net/d/2/""#));
    }

    #[test]
    fn escapes_interpolated_fields() {
        let mut record = disc("1", "<script>alert(1)</script>");
        record.label = "A & B".to_string();
        let page = render_collection(&[record], BASE);

        assert!(!page.contains("<script>"));
        assert!(page.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(page.contains("<p>A &amp; B</p>"));
    }

    #[test]
    fn omits_image_without_cover() {
        let mut record = disc("1", "No Cover");
        record.cover.clear();
        let page = render_collection(&[record], BASE);

        assert!(!page.contains("<img"));
        assert!(page.contains("<h2>No Cover</h2>"));
    }

    #[test]
    fn uses_promo_link_when_present() {
        let mut record = disc("1", "Promo");
        record.promo_link = Some("https://promo.example/1?a=1&b=2".to_string());
        let page = render_collection(&[record], BASE);

        assert!(page.contains(r#"href="https://promo.example/1?a=1&amp;b=2""#));
    }

    #[test]
    fn empty_collection_renders_empty_grid() {
        let page = render_collection(&[], BASE);
        assert!(page.contains(r#"<div id="discs">"#));
        assert!(!page.contains(r#"class="disc""#));
    }
}
