// src/fetch/html.rs
// =============================================================================
// This module extracts the title and links from HTML pages.
//
// We use the `scraper` crate which:
// - Parses HTML into a DOM (Document Object Model)
// - Never fails: broken markup is repaired the same way a browser does it
// - Is built on html5ever (Mozilla's HTML parser)
//
// Instead of running two CSS selectors we walk the tree once with
// descendants(). That iterator keeps its own position in the tree, so a page
// with thousands of nested tags can't overflow the call stack.
//
// Rust concepts:
// - Iterators: walking the DOM without recursion
// - let-else: bail out of a loop iteration when a pattern doesn't match
// - Pattern matching with `match` on string slices
// =============================================================================

use scraper::{ElementRef, Html};

use super::FetchedPage;

// Parses an HTML document into a FetchedPage
//
// Parameters:
//   html: the HTML content to parse (borrowed as &str)
//
// Returns: the first <title> text (trimmed) and every <a href> value, in the
// order they appear. Links are returned exactly as written; the crawler
// resolves them against the page URL later.
//
// Example:
//   html = "<title>Docs</title><a href='/docs'>Docs</a>"
//   result = FetchedPage { title: "Docs", links: ["/docs"] }
pub fn parse_page(html: &str) -> FetchedPage {
    let document = Html::parse_document(html);
    let mut page = FetchedPage::default();
    let mut found_title = false;

    for node in document.tree.root().descendants() {
        let Some(element) = node.value().as_element() else {
            continue;
        };

        match element.name() {
            "title" if !found_title => {
                found_title = true;
                if let Some(title) = ElementRef::wrap(node) {
                    page.title = title.text().collect::<String>().trim().to_string();
                }
            }
            "a" => {
                if let Some(href) = element.attr("href") {
                    page.links.push(href.to_string());
                }
            }
            _ => {}
        }
    }

    page
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. What is `let ... else`?
//    - let Some(x) = value else { continue; };
//    - If the pattern matches, x is bound for the rest of the loop body
//    - If it doesn't, the else block runs (it must leave the scope)
//    - Here: skip every node that isn't an element (text, comments, ...)
//
// 2. What is ElementRef::wrap?
//    - descendants() gives us raw tree nodes
//    - ElementRef is scraper's "element with helpers" view, e.g. .text()
//    - wrap() returns None for non-element nodes, Some for elements
//
// 3. Why collect::<String>()?
//    - .text() yields every text fragment inside the element
//    - collect joins them into one owned String
// -----------------------------------------------------------------------------
