use crate::result::MissingSignals;
use scraper::{Html, Selector};

const TITLE_SELECTOR: &str = "title";
const DESCRIPTION_SELECTOR: &str = r#"meta[name="description"]"#;
const H1_SELECTOR: &str = "h1";

/// Parse an HTML document and report which metadata signals are missing.
///
/// A signal counts as missing when its element is absent or its value is the
/// empty string. Whitespace-only values count as present.
pub fn extract_signals(html: &str) -> MissingSignals {
    let document = Html::parse_document(html);

    let title = first_text(&document, TITLE_SELECTOR);
    let description = first_attr(&document, DESCRIPTION_SELECTOR, "content");
    let h1 = first_text(&document, H1_SELECTOR);

    MissingSignals {
        title: is_blank(title.as_deref()),
        description: is_blank(description.as_deref()),
        h1: is_blank(h1.as_deref()),
    }
}

fn first_text(document: &Html, css: &str) -> Option<String> {
    let selector = Selector::parse(css).ok()?;
    document
        .select(&selector)
        .next()
        .map(|element| element.text().collect::<String>())
}

fn first_attr(document: &Html, css: &str, attr: &str) -> Option<String> {
    let selector = Selector::parse(css).ok()?;
    document
        .select(&selector)
        .next()
        .and_then(|element| element.value().attr(attr))
        .map(str::to_string)
}

fn is_blank(value: Option<&str>) -> bool {
    value.is_none_or(str::is_empty)
}
