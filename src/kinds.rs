use serde::{Deserialize, Serialize};
use std::fmt;

/// How a sub-page URL is built from an exam's canonical URL
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrlRule {
    /// The canonical URL itself
    Base,
    /// `{canonical}-{suffix}`
    Suffix(&'static str),
    /// `{canonical}/{segment}`, used by programme-scoped pages
    Segment(&'static str),
}

/// The fixed set of per-topic sub-pages visited for every exam
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubPageKind {
    Overview,
    Dates,
    AnswerKey,
    Results,
    QuestionPapers,
    Pattern,
    Cutoff,
    Counselling,
    ApplicationForm,
    Syllabus,
    Books,
    Preparation,
    AdmitCard,
    News,
    Analysis,
    MockTest,
    Registration,
    College,
    Centre,
    Notification,
    Mca,
    LateralEntry,
    Architecture,
}

impl SubPageKind {
    /// Every kind, in visiting order
    pub const ALL: [SubPageKind; 23] = [
        SubPageKind::Overview,
        SubPageKind::Dates,
        SubPageKind::AnswerKey,
        SubPageKind::Results,
        SubPageKind::QuestionPapers,
        SubPageKind::Pattern,
        SubPageKind::Cutoff,
        SubPageKind::Counselling,
        SubPageKind::ApplicationForm,
        SubPageKind::Syllabus,
        SubPageKind::Books,
        SubPageKind::Preparation,
        SubPageKind::AdmitCard,
        SubPageKind::News,
        SubPageKind::Analysis,
        SubPageKind::MockTest,
        SubPageKind::Registration,
        SubPageKind::College,
        SubPageKind::Centre,
        SubPageKind::Notification,
        SubPageKind::Mca,
        SubPageKind::LateralEntry,
        SubPageKind::Architecture,
    ];

    pub fn url_rule(self) -> UrlRule {
        match self {
            SubPageKind::Overview => UrlRule::Base,
            SubPageKind::Dates => UrlRule::Suffix("dates"),
            SubPageKind::AnswerKey => UrlRule::Suffix("answer-key"),
            SubPageKind::Results => UrlRule::Suffix("results"),
            SubPageKind::QuestionPapers => UrlRule::Suffix("question-papers"),
            SubPageKind::Pattern => UrlRule::Suffix("pattern"),
            SubPageKind::Cutoff => UrlRule::Suffix("cutoff"),
            SubPageKind::Counselling => UrlRule::Suffix("counselling"),
            SubPageKind::ApplicationForm => UrlRule::Suffix("application-form"),
            SubPageKind::Syllabus => UrlRule::Suffix("syllabus"),
            SubPageKind::Books => UrlRule::Suffix("books"),
            SubPageKind::Preparation => UrlRule::Suffix("preparation"),
            SubPageKind::AdmitCard => UrlRule::Suffix("admit-card"),
            SubPageKind::News => UrlRule::Suffix("news"),
            SubPageKind::Analysis => UrlRule::Suffix("analysis"),
            SubPageKind::MockTest => UrlRule::Suffix("mocktest"),
            SubPageKind::Registration => UrlRule::Suffix("registration"),
            SubPageKind::College => UrlRule::Suffix("college"),
            SubPageKind::Centre => UrlRule::Suffix("centre"),
            SubPageKind::Notification => UrlRule::Suffix("notification"),
            SubPageKind::Mca => UrlRule::Segment("mca-984"),
            SubPageKind::LateralEntry => UrlRule::Segment("me-mtech-mtech-lateral-entry-985"),
            SubPageKind::Architecture => UrlRule::Segment("march-986"),
        }
    }

    /// Derive this kind's URL from an exam's canonical URL
    pub fn url_for(self, canonical_url: &str) -> String {
        let base = canonical_url.trim_end_matches('/');
        match self.url_rule() {
            UrlRule::Base => base.to_string(),
            UrlRule::Suffix(suffix) => format!("{}-{}", base, suffix),
            UrlRule::Segment(segment) => format!("{}/{}", base, segment),
        }
    }

    /// The key used for this kind in the JSON output
    pub fn as_str(self) -> &'static str {
        match self {
            SubPageKind::Overview => "overview",
            SubPageKind::Dates => "dates",
            SubPageKind::AnswerKey => "answer_key",
            SubPageKind::Results => "results",
            SubPageKind::QuestionPapers => "question_papers",
            SubPageKind::Pattern => "pattern",
            SubPageKind::Cutoff => "cutoff",
            SubPageKind::Counselling => "counselling",
            SubPageKind::ApplicationForm => "application_form",
            SubPageKind::Syllabus => "syllabus",
            SubPageKind::Books => "books",
            SubPageKind::Preparation => "preparation",
            SubPageKind::AdmitCard => "admit_card",
            SubPageKind::News => "news",
            SubPageKind::Analysis => "analysis",
            SubPageKind::MockTest => "mock_test",
            SubPageKind::Registration => "registration",
            SubPageKind::College => "college",
            SubPageKind::Centre => "centre",
            SubPageKind::Notification => "notification",
            SubPageKind::Mca => "mca",
            SubPageKind::LateralEntry => "lateral_entry",
            SubPageKind::Architecture => "architecture",
        }
    }
}

impl fmt::Display for SubPageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    const BASE: &str = "https://example.com/cat-25";

    #[test]
    fn test_suffix_and_segment_rules() {
        assert_eq!(
            SubPageKind::Dates.url_for(BASE),
            "https://example.com/cat-25-dates"
        );
        assert_eq!(
            SubPageKind::Mca.url_for(BASE),
            "https://example.com/cat-25/mca-984"
        );
        assert_eq!(SubPageKind::Overview.url_for(BASE), BASE);
        assert_eq!(
            SubPageKind::MockTest.url_for(BASE),
            "https://example.com/cat-25-mocktest"
        );
    }

    #[test]
    fn test_trailing_slash_ignored() {
        assert_eq!(
            SubPageKind::Cutoff.url_for("https://example.com/cat-25/"),
            "https://example.com/cat-25-cutoff"
        );
    }

    #[test]
    fn test_urls_are_distinct() {
        let urls: HashSet<String> = SubPageKind::ALL.iter().map(|k| k.url_for(BASE)).collect();
        assert_eq!(urls.len(), 23);
    }

    #[test]
    fn test_json_key_matches_as_str() {
        for kind in SubPageKind::ALL {
            let json = serde_json::to_value(kind).unwrap();
            assert_eq!(json, serde_json::Value::String(kind.as_str().to_string()));
        }
    }
}
