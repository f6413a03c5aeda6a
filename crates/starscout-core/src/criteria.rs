//! Externally supplied thresholds the filter stages evaluate against.
//!
//! One criteria record per stage, bundled into `FilterCriteria` for a
//! collection run. Criteria are configuration: the pipeline never mutates
//! them, and they serialize to/from JSON so runs are reproducible.

use serde::{Deserialize, Serialize};

/// A threshold carrying an enforcement capability flag.
///
/// Some criteria are declared by collection policy but cannot be verified
/// from search metadata alone (contributor counts, README contents). Those
/// ship with `enforced = false`: the stage records them in its details as
/// unverified but never lets them gate pass/fail. Turning enforcement on
/// later is additive, not a breaking change.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Criterion<T> {
    pub value: T,

    /// Whether the stage may fail a candidate on this criterion.
    pub enforced: bool,
}

impl<T> Criterion<T> {
    /// A criterion the stage actively enforces.
    pub fn required(value: T) -> Self {
        Self {
            value,
            enforced: true,
        }
    }

    /// A declared-but-unenforced criterion (recorded, never gating).
    pub fn advisory(value: T) -> Self {
        Self {
            value,
            enforced: false,
        }
    }
}

/// Thresholds for the popularity stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PopularityCriteria {
    /// Minimum star count (inclusive).
    pub min_stars: u64,

    /// Minimum fork count (inclusive).
    pub min_forks: u64,

    /// Fail archived repositories.
    pub require_not_archived: bool,

    /// Fail repositories disabled by the host.
    pub require_not_disabled: bool,
}

impl Default for PopularityCriteria {
    fn default() -> Self {
        Self {
            min_stars: 1000,
            min_forks: 100,
            require_not_archived: true,
            require_not_disabled: true,
        }
    }
}

/// Thresholds for the activity stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityCriteria {
    /// Maximum days since the last metadata update.
    pub recent_activity_days: i64,

    /// Maximum days since the last push.
    pub min_push_activity_days: i64,

    /// Minimum contributor count. Advisory: contributor counts are not
    /// available from search metadata, so this never gates today.
    pub min_contributors: Criterion<u64>,
}

impl Default for ActivityCriteria {
    fn default() -> Self {
        Self {
            recent_activity_days: 365,
            min_push_activity_days: 180,
            min_contributors: Criterion::advisory(5),
        }
    }
}

/// Thresholds for the quality stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualityCriteria {
    /// Fail candidates without a license.
    pub require_license: bool,

    /// Placeholder README quality score. Advisory until file contents are
    /// fetched; the value is surfaced in stage details as-is.
    pub readme_quality: Criterion<f64>,

    /// Description must be present and longer than this many characters.
    pub min_description_len: usize,
}

impl Default for QualityCriteria {
    fn default() -> Self {
        Self {
            require_license: true,
            readme_quality: Criterion::advisory(0.8),
            min_description_len: 10,
        }
    }
}

/// Thresholds for the final selection stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectionCriteria {
    /// Minimum aggregate overall score (inclusive).
    pub min_overall_score: f64,

    /// Keep candidates ranked within this top percentile of the assessed
    /// set (e.g. 25.0 keeps the top quarter).
    pub top_percentile: f64,
}

impl Default for SelectionCriteria {
    fn default() -> Self {
        Self {
            min_overall_score: 0.6,
            top_percentile: 25.0,
        }
    }
}

/// Complete criteria bundle for one collection run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilterCriteria {
    pub popularity: PopularityCriteria,
    pub activity: ActivityCriteria,
    pub quality: QualityCriteria,
    pub selection: SelectionCriteria,
}

impl FilterCriteria {
    /// Tight thresholds for small, high-confidence collections.
    pub fn strict() -> Self {
        Self {
            popularity: PopularityCriteria {
                min_stars: 5000,
                min_forks: 500,
                ..Default::default()
            },
            activity: ActivityCriteria {
                recent_activity_days: 180,
                min_push_activity_days: 90,
                ..Default::default()
            },
            selection: SelectionCriteria {
                min_overall_score: 0.75,
                top_percentile: 10.0,
            },
            ..Default::default()
        }
    }

    /// Relaxed thresholds for broad discovery passes.
    pub fn lenient() -> Self {
        Self {
            popularity: PopularityCriteria {
                min_stars: 250,
                min_forks: 25,
                ..Default::default()
            },
            activity: ActivityCriteria {
                recent_activity_days: 730,
                min_push_activity_days: 365,
                ..Default::default()
            },
            quality: QualityCriteria {
                require_license: false,
                ..Default::default()
            },
            selection: SelectionCriteria {
                min_overall_score: 0.4,
                top_percentile: 50.0,
            },
        }
    }
}
