use crate::parsers::text::{element_text, non_empty};
use crate::results::ContentBlock;
use scraper::{ElementRef, Selector};

/// Extracts the content blocks of one container, in document order.
///
/// `selector` picks the candidate elements at any depth; each candidate is
/// classified by its tag and dropped when it carries no content.
pub fn extract_blocks(container: ElementRef<'_>, selector: &Selector) -> Vec<ContentBlock> {
    container.select(selector).filter_map(classify_element).collect()
}

/// Maps a single element to a block, if it has one
pub fn classify_element(element: ElementRef<'_>) -> Option<ContentBlock> {
    match element.value().name() {
        "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
            non_empty(element_text(element)).map(ContentBlock::Heading)
        }
        "p" => {
            // Table cells are reported with the table
            if inside_table(element) {
                return None;
            }
            non_empty(element_text(element)).map(ContentBlock::Paragraph)
        }
        "ul" => list_block(element),
        "table" => table_block(element),
        "iframe" => {
            let value = element.value();
            value
                .attr("src")
                .or_else(|| value.attr("data-original"))
                .map(str::trim)
                .filter(|src| !src.is_empty())
                .map(|src| ContentBlock::Embed(src.to_string()))
        }
        other => {
            ::log::trace!("No block type for <{}>", other);
            None
        }
    }
}

fn inside_table(element: ElementRef<'_>) -> bool {
    element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .any(|ancestor| ancestor.value().name() == "table")
}

/// Direct `<li>` children only; nested lists produce their own block.
/// Empty items keep their position; a list of only empty items is dropped.
fn list_block(list: ElementRef<'_>) -> Option<ContentBlock> {
    let items = list
        .children()
        .filter_map(ElementRef::wrap)
        .filter(|child| child.value().name() == "li")
        .map(element_text)
        .collect::<Vec<_>>();

    if items.iter().all(String::is_empty) {
        None
    } else {
        Some(ContentBlock::List(items))
    }
}

fn table_block(table: ElementRef<'_>) -> Option<ContentBlock> {
    let rows = table
        .descendants()
        .filter_map(ElementRef::wrap)
        .filter(|el| el.value().name() == "tr")
        .map(|row| {
            row.descendants()
                .filter_map(ElementRef::wrap)
                .filter(|el| matches!(el.value().name(), "th" | "td"))
                .map(element_text)
                .collect::<Vec<_>>()
        })
        .filter(|cells| !cells.is_empty())
        .collect::<Vec<_>>();

    if rows.is_empty() {
        None
    } else {
        Some(ContentBlock::Table(rows))
    }
}
