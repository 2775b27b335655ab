use crate::config::ScrapeConfig;
use crate::results::ExamSummary;
use regex::Regex;
use serde::{Deserialize, Serialize};
use url::Url;

/// Rules deciding which discovered exams are aggregated
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExamFilterConfig {
    /// Whether exams hosted outside the listing's domain are kept
    #[serde(default)]
    pub allow_external: bool,

    /// Domain every exam URL must be on (unless allow_external is set)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required_domain: Option<String>,

    /// Regex patterns for exam URLs to include (if empty, all are included unless excluded)
    #[serde(default)]
    pub include_patterns: Vec<String>,

    /// Regex patterns for exam URLs to exclude (these take precedence over include patterns)
    #[serde(default)]
    pub exclude_patterns: Vec<String>,
}

impl ExamFilterConfig {
    /// Filter settings of a run; the required domain is the listing's own
    pub fn from_scrape_config(config: &ScrapeConfig, listing_url: &Url) -> Self {
        Self {
            allow_external: config.allow_external,
            required_domain: listing_url.domain().map(|d| d.to_string()),
            include_patterns: config.include_patterns.clone(),
            exclude_patterns: config.exclude_patterns.clone(),
        }
    }
}

/// Filter over exam canonical URLs
#[derive(Debug)]
pub struct ExamFilter {
    config: ExamFilterConfig,
    include_regexes: Vec<Regex>,
    exclude_regexes: Vec<Regex>,
}

impl ExamFilter {
    pub fn new(config: ExamFilterConfig) -> Result<Self, regex::Error> {
        let include_regexes = config
            .include_patterns
            .iter()
            .map(|p| Regex::new(p))
            .collect::<Result<Vec<_>, _>>()?;
        let exclude_regexes = config
            .exclude_patterns
            .iter()
            .map(|p| Regex::new(p))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            config,
            include_regexes,
            exclude_regexes,
        })
    }

    /// Determine if an exam should be aggregated
    pub fn should_aggregate(&self, exam: &ExamSummary) -> bool {
        let url = match Url::parse(&exam.canonical_url) {
            Ok(url) => url,
            Err(e) => {
                ::log::warn!("Dropping exam with bad URL {}: {}", exam.canonical_url, e);
                return false;
            }
        };

        if !self.is_in_domain_scope(&url) {
            ::log::debug!("Exam filter rejected external URL: {}", url);
            return false;
        }

        let url_str = exam.canonical_url.as_str();
        if self.exclude_regexes.iter().any(|re| re.is_match(url_str)) {
            ::log::debug!("Exam filter excluded: {}", url_str);
            return false;
        }

        if !self.include_regexes.is_empty()
            && !self.include_regexes.iter().any(|re| re.is_match(url_str))
        {
            ::log::debug!("Exam filter did not include: {}", url_str);
            return false;
        }

        true
    }

    /// Keep the exams that pass, in their original order
    pub fn apply(&self, exams: Vec<ExamSummary>) -> Vec<ExamSummary> {
        let before = exams.len();
        let kept = exams
            .into_iter()
            .filter(|exam| self.should_aggregate(exam))
            .collect::<Vec<_>>();
        if kept.len() < before {
            ::log::info!("Exam filter kept {} of {} exams", kept.len(), before);
        }
        kept
    }

    fn is_in_domain_scope(&self, url: &Url) -> bool {
        if self.config.allow_external {
            return true;
        }

        match (&self.config.required_domain, url.domain()) {
            (Some(required), Some(domain)) => domain == required,
            (None, _) => true,
            (Some(_), None) => false,
        }
    }
}
