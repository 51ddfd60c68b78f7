//! Text and attribute extraction primitives over parsed HTML.
//!
//! Every mirror adapter is built from the same handful of operations:
//! compile a selector, select elements, flatten their text nodes or read an
//! attribute. Parsing itself never fails: html5ever recovers from malformed
//! markup silently, and the recovered tree is what gets scanned.

use scraper::{ElementRef, Html, Selector};
use tracing::trace;

use super::ParseError;

/// Compiles a user-supplied CSS selector.
///
/// # Errors
///
/// Returns [`ParseError::InvalidSelector`] if the selector does not parse.
pub fn compile_selector(selector: &str) -> Result<Selector, ParseError> {
    Selector::parse(selector)
        .map_err(|err| ParseError::invalid_selector(selector, &format!("{err:?}")))
}

/// Compiles a selector at static init; panics on invalid pattern.
pub fn compile_static_selector(selector: &str) -> Selector {
    Selector::parse(selector)
        .unwrap_or_else(|e| panic!("invalid static selector '{selector}': {e:?}"))
}

/// Parses a complete HTML document.
#[must_use]
pub fn parse_document(payload: &str) -> Html {
    let document = Html::parse_document(payload);
    if !document.errors.is_empty() {
        trace!(
            recovered_errors = document.errors.len(),
            "HTML parser recovered from malformed markup"
        );
    }
    document
}

/// Parses a flat run of sibling elements by wrapping it in a synthetic `<div>` root.
///
/// Returns the parsed fragment; use [`fragment_root`] to reach the wrapper.
#[must_use]
pub fn parse_fragment(fragment: &str) -> Html {
    Html::parse_fragment(&format!("<div>{fragment}</div>"))
}

/// Returns the synthetic wrapper element created by [`parse_fragment`].
#[must_use]
pub fn fragment_root(fragment: &Html) -> Option<ElementRef<'_>> {
    fragment
        .root_element()
        .children()
        .filter_map(ElementRef::wrap)
        .find(|element| element.value().name() == "div")
}

/// Flattens every descendant text node into stripped, non-empty strings, in document order.
#[must_use]
pub fn flatten_text(element: ElementRef<'_>) -> Vec<String> {
    element
        .text()
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(ToString::to_string)
        .collect()
}

/// Returns the concatenated text content of `element`, trimmed.
#[must_use]
pub fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Returns the trimmed value of `attribute` on `element`, if present and non-empty.
#[must_use]
pub fn element_attribute(element: ElementRef<'_>, attribute: &str) -> Option<String> {
    element
        .value()
        .attr(attribute)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(ToString::to_string)
}

/// Extracts the text content of every element matching `selector`.
///
/// Elements whose trimmed text is empty are skipped.
#[must_use]
pub fn scrape_text(document: &Html, selector: &Selector) -> Vec<String> {
    document
        .select(selector)
        .map(element_text)
        .filter(|text| !text.is_empty())
        .collect()
}

/// Extracts `attribute` from every element matching `selector`.
///
/// Elements without the attribute are skipped. Values are trimmed but an
/// attribute that is present with an empty value is kept, as an empty line.
#[must_use]
pub fn scrape_attribute(document: &Html, selector: &Selector, attribute: &str) -> Vec<String> {
    document
        .select(selector)
        .filter_map(|element| element.value().attr(attribute))
        .map(|value| value.trim().to_string())
        .collect()
}

/// Returns the first element matching `selector`, in document order.
#[must_use]
pub fn select_first<'a>(document: &'a Html, selector: &Selector) -> Option<ElementRef<'a>> {
    document.select(selector).next()
}

/// Returns `element` itself if it matches `selector`, else its first matching descendant.
#[must_use]
pub fn select_self_or_descendant<'a>(
    element: ElementRef<'a>,
    selector: &Selector,
) -> Option<ElementRef<'a>> {
    if selector.matches(&element) {
        return Some(element);
    }
    element.select(selector).next()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const FIXTURE: &str = r#"
        <html>
            <body>
                <div class="content">
                    <p>Paragraph 1</p>
                    <p class="special">Paragraph 2</p>
                </div>
                <a href="https://example.com" class="link">Link 1</a>
                <a href="https://test.com" class="link" id="link2">Link 2</a>
                <div id="empty"></div>
                <div class="nested">
                    <span>Nested Text</span>
                </div>
            </body>
        </html>
    "#;

    #[test]
    fn test_compile_selector_rejects_invalid_syntax() {
        let err = compile_selector("div[").unwrap_err();
        assert!(matches!(err, ParseError::InvalidSelector { .. }));
    }

    #[test]
    fn test_scrape_text_single_match() {
        let doc = parse_document(FIXTURE);
        let selector = compile_selector("p.special").unwrap();
        assert_eq!(scrape_text(&doc, &selector), vec!["Paragraph 2"]);
    }

    #[test]
    fn test_scrape_text_multiple_matches_in_document_order() {
        let doc = parse_document(FIXTURE);
        let selector = compile_selector("p").unwrap();
        assert_eq!(
            scrape_text(&doc, &selector),
            vec!["Paragraph 1", "Paragraph 2"]
        );
    }

    #[test]
    fn test_scrape_text_nested_and_empty() {
        let doc = parse_document(FIXTURE);
        let nested = compile_selector("div.nested").unwrap();
        assert_eq!(scrape_text(&doc, &nested), vec!["Nested Text"]);

        let empty = compile_selector("div#empty").unwrap();
        assert!(scrape_text(&doc, &empty).is_empty());

        let missing = compile_selector("div.nonexistent").unwrap();
        assert!(scrape_text(&doc, &missing).is_empty());
    }

    #[test]
    fn test_scrape_attribute_matches_and_missing_attr() {
        let doc = parse_document(FIXTURE);
        let links = compile_selector("a.link").unwrap();
        assert_eq!(
            scrape_attribute(&doc, &links, "href"),
            vec!["https://example.com", "https://test.com"]
        );
        assert_eq!(scrape_attribute(&doc, &links, "id"), vec!["link2"]);

        let by_id = compile_selector("a#link2").unwrap();
        assert_eq!(
            scrape_attribute(&doc, &by_id, "href"),
            vec!["https://test.com"]
        );
    }

    #[test]
    fn test_flatten_text_strips_and_drops_whitespace_nodes() {
        let doc = parse_document("<div id='r'> <span> a </span>\n<b>b</b>   <i> </i>c</div>");
        let selector = compile_selector("div#r").unwrap();
        let row = select_first(&doc, &selector).unwrap();
        assert_eq!(flatten_text(row), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_element_attribute_empty_value_is_absent() {
        let doc = parse_document(r#"<a id="x" href="  ">x</a>"#);
        let selector = compile_selector("a#x").unwrap();
        let anchor = select_first(&doc, &selector).unwrap();
        assert_eq!(element_attribute(anchor, "href"), None);
        assert_eq!(element_attribute(anchor, "id").as_deref(), Some("x"));
    }

    #[test]
    fn test_parse_fragment_wraps_siblings_under_single_root() {
        let fragment = parse_fragment("<p>one</p><div>two</div><p>three</p>");
        let root = fragment_root(&fragment).unwrap();
        let names: Vec<_> = root
            .children()
            .filter_map(ElementRef::wrap)
            .map(|el| el.value().name().to_string())
            .collect();
        assert_eq!(names, vec!["p", "div", "p"]);
    }

    #[test]
    fn test_select_self_or_descendant_prefers_self() {
        let doc = parse_document(
            r#"<div id="outer" class="v-report" data-file-id="1"><span class="v-report" data-file-id="2"></span></div>"#,
        );
        let outer = select_first(&doc, &compile_selector("div#outer").unwrap()).unwrap();
        let report = compile_selector(".v-report").unwrap();
        let hit = select_self_or_descendant(outer, &report).unwrap();
        assert_eq!(hit.value().attr("data-file-id"), Some("1"));
    }

    #[test]
    fn test_parse_document_tolerates_malformed_markup() {
        let doc = parse_document("<div class='a'><span>unclosed<div class='b'>x</p>");
        let selector = compile_selector("div.b").unwrap();
        assert_eq!(scrape_text(&doc, &selector), vec!["x"]);
    }
}
