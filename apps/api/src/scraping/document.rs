//! HTML normalizer — a parsed page plus its plain-text renderings.
//!
//! `scraper::Html` is not `Send`, so a `PageDocument` must be built and
//! dropped between await points. Callers reduce it to owned data first.

use ego_tree::NodeRef;
use scraper::{ElementRef, Html, Node, Selector};
use url::Url;

/// Subtrees that never contribute text.
const SKIPPED_TAGS: &[&str] = &["script", "style", "noscript", "template", "head"];

/// Elements that start a new paragraph-like chunk.
const BLOCK_TAGS: &[&str] = &[
    "p", "div", "section", "article", "header", "footer", "aside", "nav", "main", "ul", "ol",
    "li", "dl", "dt", "dd", "table", "tr", "td", "th", "h1", "h2", "h3", "h4", "h5", "h6",
    "blockquote", "pre", "br", "hr", "address", "figure", "form",
];

pub struct PageDocument {
    pub url: Url,
    html: Html,
}

impl PageDocument {
    pub fn parse(url: Url, raw_html: &str) -> Self {
        Self {
            url,
            html: Html::parse_document(raw_html),
        }
    }

    /// Whitespace-collapsed text of the page, scripts and styles excluded.
    pub fn text(&self) -> String {
        let mut out = String::new();
        collect_text(*self.html.root_element(), &mut out, false);
        collapse_whitespace(&out)
    }

    /// Block-delimited text chunks, each whitespace-collapsed and non-empty.
    pub fn paragraphs(&self) -> Vec<String> {
        let mut out = String::new();
        collect_text(*self.html.root_element(), &mut out, true);
        out.split("\n\n")
            .map(collapse_whitespace)
            .filter(|chunk| !chunk.is_empty())
            .collect()
    }

    pub fn select_first(&self, selector: &Selector) -> Option<ElementRef<'_>> {
        self.html.select(selector).next()
    }

    /// First element with one of `tags` whose text contains `needle` (case-sensitive).
    pub fn find_containing(&self, tags: &[&str], needle: &str) -> Option<ElementRef<'_>> {
        self.html
            .root_element()
            .descendants()
            .filter_map(ElementRef::wrap)
            .filter(|el| tags.iter().any(|t| el.value().name().eq_ignore_ascii_case(t)))
            .find(|el| element_text(*el).contains(needle))
    }

    /// Values of every `href` attribute on anchors, in document order.
    pub fn hrefs(&self) -> Vec<String> {
        self.html
            .select(anchor_selector())
            .filter_map(|a| a.value().attr("href"))
            .map(|h| h.trim().to_string())
            .filter(|h| !h.is_empty())
            .collect()
    }
}

/// The element directly following `element` among its siblings, if it is one of `kinds`.
pub fn next_sibling_of_kind<'a>(element: ElementRef<'a>, kinds: &[&str]) -> Option<ElementRef<'a>> {
    element
        .next_siblings()
        .find_map(ElementRef::wrap)
        .filter(|el| kinds.iter().any(|k| el.value().name().eq_ignore_ascii_case(k)))
}

pub fn parent_element(element: ElementRef<'_>) -> Option<ElementRef<'_>> {
    element.parent().and_then(ElementRef::wrap)
}

/// Trimmed, whitespace-collapsed text of an element, scripts and styles excluded.
pub fn element_text(element: ElementRef<'_>) -> String {
    let mut out = String::new();
    collect_text(*element, &mut out, false);
    collapse_whitespace(&out)
}

pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn anchor_selector() -> &'static Selector {
    static ANCHOR: std::sync::LazyLock<Selector> = std::sync::LazyLock::new(|| {
        Selector::parse("a[href]").expect("anchor selector should compile")
    });
    &ANCHOR
}

fn collect_text(node: NodeRef<'_, Node>, out: &mut String, mark_blocks: bool) {
    match node.value() {
        Node::Text(text) => {
            out.push_str(text);
        }
        Node::Element(el) => {
            let name = el.name();
            if SKIPPED_TAGS.iter().any(|t| name.eq_ignore_ascii_case(t)) {
                return;
            }
            let separator = if !BLOCK_TAGS.iter().any(|t| name.eq_ignore_ascii_case(t)) {
                ""
            } else if mark_blocks {
                "\n\n"
            } else {
                " "
            };
            out.push_str(separator);
            for child in node.children() {
                collect_text(child, out, mark_blocks);
            }
            out.push_str(separator);
        }
        Node::Document | Node::Fragment => {
            for child in node.children() {
                collect_text(child, out, mark_blocks);
            }
        }
        _ => {}
    }
}
