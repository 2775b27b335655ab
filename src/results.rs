use crate::kinds::SubPageKind;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One row of the important-dates table shown on a listing card
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportantDate {
    pub date: String,
    pub event: String,
}

/// An exam as discovered on a listing page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExamSummary {
    /// Short name taken from the card's title link
    pub short_name: String,

    /// Full exam name (if the card shows one)
    pub full_name: Option<String>,

    /// The card link as written in the page
    #[serde(default)]
    pub relative_url: Option<String>,

    /// The card link joined against the listing page, as resolved
    #[serde(default)]
    pub full_url: Option<String>,

    /// Absolute URL of the exam page, without a trailing slash.
    /// Every sub-page URL is derived from it.
    pub canonical_url: String,

    /// Important dates in document order
    #[serde(default)]
    pub important_dates: Vec<ImportantDate>,
}

impl ExamSummary {
    /// Create a summary, stripping any trailing slash from the canonical URL
    pub fn new(short_name: impl Into<String>, canonical_url: &str) -> Self {
        Self {
            short_name: short_name.into(),
            full_name: None,
            relative_url: None,
            full_url: None,
            canonical_url: canonical_url.trim_end_matches('/').to_string(),
            important_dates: Vec::new(),
        }
    }
}

/// A classified unit of page content
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum ContentBlock {
    Heading(String),
    Paragraph(String),
    List(Vec<String>),
    Table(Vec<Vec<String>>),
    /// Source URL of an embedded frame
    #[serde(rename = "iframe")]
    Embed(String),
}

/// The blocks extracted from one content container
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Section {
    pub blocks: Vec<ContentBlock>,
}

/// Author box shown at the top of an article page
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Author {
    pub name: Option<String>,
    pub profile_url: Option<String>,
    pub role: Option<String>,
    #[serde(rename = "image")]
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Faq {
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Poll {
    pub question: String,
    pub options: Vec<String>,
    pub votes: Option<String>,
}

/// Everything extracted from a single rendered sub-page
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PageExtraction {
    pub title: Option<String>,
    pub updated_on: Option<String>,

    /// `None` when the page has no author box
    pub author: Option<Author>,

    /// Non-empty sections in container order
    #[serde(rename = "content_sections")]
    pub sections: Vec<Section>,

    pub faqs: Vec<Faq>,
    pub polls: Vec<Poll>,
}

/// The output unit: a summary plus one entry per sub-page kind.
///
/// A `None` entry means the sub-page could not be fetched or classified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExamRecord {
    #[serde(flatten)]
    pub summary: ExamSummary,

    #[serde(flatten)]
    pub pages: BTreeMap<SubPageKind, Option<PageExtraction>>,
}

impl ExamRecord {
    /// Start a record with no sub-page attempted yet
    pub fn new(summary: ExamSummary) -> Self {
        Self {
            summary,
            pages: BTreeMap::new(),
        }
    }

    /// Store the outcome for one kind
    pub fn set(&mut self, kind: SubPageKind, page: Option<PageExtraction>) {
        self.pages.insert(kind, page);
    }

    pub fn page(&self, kind: SubPageKind) -> Option<&PageExtraction> {
        self.pages.get(&kind).and_then(|p| p.as_ref())
    }

    /// Number of kinds whose sub-page failed
    pub fn failed_count(&self) -> usize {
        self.pages.values().filter(|p| p.is_none()).count()
    }
}
