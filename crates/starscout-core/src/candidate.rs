//! Candidate repository records flowing through the filtering pipeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Unique identifier for a candidate: the host platform's full name
/// (e.g. `"rust-lang/rust"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CandidateId(pub String);

impl CandidateId {
    pub fn new(full_name: impl Into<String>) -> Self {
        CandidateId(full_name.into())
    }
}

impl std::fmt::Display for CandidateId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A repository record subjected to multi-stage evaluation.
///
/// Immutable for the duration of one pipeline run. Counts reported as
/// `None` are unknown to the search API; checks treat them as zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candidate {
    pub id: CandidateId,

    /// Star count (None when the API omitted it).
    #[serde(default)]
    pub stars: Option<u64>,

    /// Fork count (None when the API omitted it).
    #[serde(default)]
    pub forks: Option<u64>,

    /// Whether the repository is archived.
    #[serde(default)]
    pub archived: bool,

    /// Whether the repository is disabled by the host.
    #[serde(default)]
    pub disabled: bool,

    /// Last push timestamp.
    #[serde(default)]
    pub pushed_at: Option<DateTime<Utc>>,

    /// Last metadata update timestamp.
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,

    /// Open issue count, used as an activity-volume proxy.
    #[serde(default)]
    pub open_issues: u64,

    /// SPDX identifier or license name, if any.
    #[serde(default)]
    pub license: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub homepage: Option<String>,

    /// Number of topics attached to the repository.
    #[serde(default)]
    pub topic_count: u64,

    #[serde(default)]
    pub has_issues: bool,

    #[serde(default)]
    pub has_wiki: bool,

    #[serde(default)]
    pub has_projects: bool,
}

impl Candidate {
    /// Create an empty candidate with only an identifier set.
    ///
    /// Every count is unknown and every flag false; useful as a test
    /// baseline and for sources that fill fields incrementally.
    pub fn named(full_name: impl Into<String>) -> Self {
        Self {
            id: CandidateId::new(full_name),
            stars: None,
            forks: None,
            archived: false,
            disabled: false,
            pushed_at: None,
            updated_at: None,
            open_issues: 0,
            license: None,
            description: None,
            homepage: None,
            topic_count: 0,
            has_issues: false,
            has_wiki: false,
            has_projects: false,
        }
    }
}
