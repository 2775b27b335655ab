pub mod blocks;
pub mod listing;
pub mod text;

#[cfg(test)]
mod tests;

use crate::config::PageLayout;
use crate::error::CrawlError;
use crate::results::{Author, Faq, PageExtraction, Poll, Section};
use scraper::{ElementRef, Html, Selector};
use text::{element_text, non_empty, own_text, strip_marker};

/// Parses a CSS selector from the layout
pub(crate) fn compile(selector: &str) -> Result<Selector, CrawlError> {
    Selector::parse(selector).map_err(|e| CrawlError::Selector(format!("'{}': {:?}", selector, e)))
}

/// Turns a rendered exam sub-page into a [`PageExtraction`].
///
/// Classification is a pure function of the markup: missing elements
/// degrade to `None` or empty collections and never fail the page.
#[derive(Debug, Clone)]
pub struct Classifier {
    title: Selector,
    updated: Selector,
    updated_marker: String,
    author: Selector,
    author_link: Selector,
    author_image: Selector,
    author_role: Selector,
    content_container: Selector,
    blocks: Selector,
    faq_question: Selector,
    faq_answer_wrapper: Selector,
    faq_answer: Selector,
    poll: Selector,
    poll_question: Selector,
    poll_option: Selector,
    poll_votes: Selector,
    votes_marker: String,
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(&PageLayout::default()).expect("default page layout selectors are valid")
    }
}

impl Classifier {
    /// Compiles the selectors of a page layout
    pub fn new(layout: &PageLayout) -> Result<Self, CrawlError> {
        Ok(Self {
            title: compile(&layout.title)?,
            updated: compile(&layout.updated)?,
            updated_marker: layout.updated_marker.clone(),
            author: compile(&layout.author)?,
            author_link: compile(&layout.author_link)?,
            author_image: compile(&layout.author_image)?,
            author_role: compile(&layout.author_role)?,
            content_container: compile(&layout.content_container)?,
            blocks: compile(&layout.blocks)?,
            faq_question: compile(&layout.faq_question)?,
            faq_answer_wrapper: compile(&layout.faq_answer_wrapper)?,
            faq_answer: compile(&layout.faq_answer)?,
            poll: compile(&layout.poll)?,
            poll_question: compile(&layout.poll_question)?,
            poll_option: compile(&layout.poll_option)?,
            poll_votes: compile(&layout.poll_votes)?,
            votes_marker: layout.votes_marker.clone(),
        })
    }

    /// Classifies a full HTML document
    pub fn classify(&self, html: &str) -> PageExtraction {
        let doc = Html::parse_document(html);

        let page = PageExtraction {
            title: doc
                .select(&self.title)
                .next()
                .and_then(|h| non_empty(element_text(h))),
            updated_on: self.updated_on(&doc),
            author: self.author(&doc),
            sections: self.sections(&doc),
            faqs: self.faqs(&doc),
            polls: self.polls(&doc),
        };

        ::log::debug!(
            "Classified page {:?}: {} sections, {} faqs, {} polls",
            page.title,
            page.sections.len(),
            page.faqs.len(),
            page.polls.len()
        );
        page
    }

    /// First marker-bearing element anywhere in the document
    fn updated_on(&self, doc: &Html) -> Option<String> {
        doc.select(&self.updated)
            .find(|el| own_text(*el).contains(&self.updated_marker))
            .map(element_text)
    }

    fn author(&self, doc: &Html) -> Option<Author> {
        let block = doc.select(&self.author).next()?;
        let link = block.select(&self.author_link).next();

        Some(Author {
            name: link.and_then(|a| non_empty(element_text(a))),
            profile_url: link.and_then(|a| a.value().attr("href")).map(str::to_string),
            role: block
                .select(&self.author_role)
                .next()
                .and_then(|p| non_empty(element_text(p))),
            image_url: block
                .select(&self.author_image)
                .next()
                .and_then(|img| img.value().attr("src"))
                .map(str::to_string),
        })
    }

    fn sections(&self, doc: &Html) -> Vec<Section> {
        doc.select(&self.content_container)
            .map(|container| blocks::extract_blocks(container, &self.blocks))
            .filter(|blocks| !blocks.is_empty())
            .map(|blocks| Section { blocks })
            .collect()
    }

    /// Question markers whose parent is followed by an answer wrapper
    fn faqs(&self, doc: &Html) -> Vec<Faq> {
        let mut faqs = Vec::new();

        for marker in doc.select(&self.faq_question) {
            let question = strip_marker(&element_text(marker), "Q:");

            let Some(wrapper) = marker
                .parent()
                .and_then(ElementRef::wrap)
                .and_then(|parent| {
                    parent
                        .next_siblings()
                        .filter_map(ElementRef::wrap)
                        .find(|sibling| self.faq_answer_wrapper.matches(sibling))
                })
            else {
                ::log::trace!("FAQ without answer wrapper: {}", question);
                continue;
            };

            let Some(answer) = wrapper.select(&self.faq_answer).next() else {
                ::log::trace!("FAQ without answer: {}", question);
                continue;
            };

            faqs.push(Faq {
                question,
                answer: strip_marker(&element_text(answer), "A:"),
            });
        }

        faqs
    }

    fn polls(&self, doc: &Html) -> Vec<Poll> {
        doc.select(&self.poll)
            .filter_map(|poll| {
                let question = poll.select(&self.poll_question).next()?;

                Some(Poll {
                    question: element_text(question),
                    options: poll.select(&self.poll_option).map(element_text).collect(),
                    // Scoped to this poll so a neighbour's count is never picked up
                    votes: poll
                        .select(&self.poll_votes)
                        .find(|el| own_text(*el).contains(&self.votes_marker))
                        .map(element_text),
                })
            })
            .collect()
    }
}

/// Classifies a page with the default layout
pub fn classify(html: &str) -> PageExtraction {
    Classifier::default().classify(html)
}
