use crate::config::PageLayout;
use crate::error::CrawlError;
use crate::parsers::compile;
use crate::parsers::text::{element_text, non_empty};
use crate::results::{ExamSummary, ImportantDate};
use scraper::{Html, Selector};
use url::Url;

/// Reads the exam cards of one listing page
#[derive(Debug, Clone)]
pub struct ListingParser {
    card: Selector,
    title: Selector,
    full_name: Selector,
    date_rows: Selector,
    date: Selector,
    event: Selector,
}

impl ListingParser {
    pub fn new(layout: &PageLayout) -> Result<Self, CrawlError> {
        Ok(Self {
            card: compile(&layout.exam_card)?,
            title: compile(&layout.card_title)?,
            full_name: compile(&layout.card_full_name)?,
            date_rows: compile(&layout.card_date_rows)?,
            date: compile(&layout.card_date)?,
            event: compile(&layout.card_event)?,
        })
    }

    /// Parses every card on the page. Links are resolved against `page_url`.
    ///
    /// Cards without a title link are skipped.
    pub fn parse(&self, html: &str, page_url: &Url) -> Vec<ExamSummary> {
        let doc = Html::parse_document(html);
        let mut exams = Vec::new();

        for card in doc.select(&self.card) {
            let Some(title) = card.select(&self.title).next() else {
                ::log::debug!("Skipping exam card without a title");
                continue;
            };
            let Some(href) = title.value().attr("href").map(str::trim) else {
                ::log::debug!("Skipping exam card without a link: {}", element_text(title));
                continue;
            };

            let canonical = match page_url.join(href) {
                Ok(url) => url,
                Err(e) => {
                    ::log::warn!("Skipping exam card with bad link {}: {}", href, e);
                    continue;
                }
            };

            let mut summary = ExamSummary::new(element_text(title), canonical.as_str());
            summary.relative_url = Some(href.to_string());
            summary.full_url = Some(canonical.to_string());
            summary.full_name = card
                .select(&self.full_name)
                .next()
                .and_then(|el| non_empty(element_text(el)));

            for row in card.select(&self.date_rows) {
                let date = row.select(&self.date).next();
                let event = row.select(&self.event).next();
                if let (Some(date), Some(event)) = (date, event) {
                    summary.important_dates.push(ImportantDate {
                        date: element_text(date),
                        event: element_text(event),
                    });
                }
            }

            exams.push(summary);
        }

        ::log::debug!("Listing parser found {} exam cards", exams.len());
        exams
    }
}
