//! Tier definitions: quota bands keyed by star range.

use serde::{Deserialize, Serialize};

/// A quota band: a star range with a collection target, the count observed
/// in the last round, and the search predicate that fills it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierDefinition {
    /// Stable identifier (e.g. "elite").
    pub id: String,

    pub display_name: String,

    /// Inclusive lower star bound.
    pub min_stars: u64,

    /// Inclusive upper star bound; open-ended when absent.
    pub max_stars: Option<u64>,

    /// Candidates this tier should contribute to the global target.
    pub target_count: u64,

    /// Candidates actually collected in the last round.
    pub observed_count: u64,

    /// Search predicate issued to the candidate source for this band.
    pub search_predicate: String,
}

impl TierDefinition {
    /// New tier with zero observations and a rendered predicate.
    pub fn new(
        id: impl Into<String>,
        display_name: impl Into<String>,
        min_stars: u64,
        max_stars: Option<u64>,
        target_count: u64,
    ) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            min_stars,
            max_stars,
            target_count,
            observed_count: 0,
            search_predicate: Self::render_predicate(min_stars, max_stars),
        }
    }

    /// Collection deficit for this tier, floored at zero.
    pub fn shortfall(&self) -> u64 {
        self.target_count.saturating_sub(self.observed_count)
    }

    /// Search predicate text for a star band.
    pub fn render_predicate(min_stars: u64, max_stars: Option<u64>) -> String {
        match max_stars {
            Some(max) => format!("stars:{min_stars}..{max}"),
            None => format!("stars:>={min_stars}"),
        }
    }

    /// Re-render the predicate after a band boundary changed.
    pub fn refresh_predicate(&mut self) {
        self.search_predicate = Self::render_predicate(self.min_stars, self.max_stars);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shortfall_floors_at_zero() {
        let mut tier = TierDefinition::new("mid", "Mid", 5000, Some(9999), 100);
        tier.observed_count = 40;
        assert_eq!(tier.shortfall(), 60);
        tier.observed_count = 140;
        assert_eq!(tier.shortfall(), 0);
    }

    #[test]
    fn test_predicate_rendering() {
        assert_eq!(
            TierDefinition::render_predicate(20_000, None),
            "stars:>=20000"
        );
        assert_eq!(
            TierDefinition::render_predicate(5000, Some(9999)),
            "stars:5000..9999"
        );
    }

    #[test]
    fn test_refresh_predicate_tracks_bounds() {
        let mut tier = TierDefinition::new("elite", "Elite", 20_000, None, 50);
        tier.min_stars = 15_000;
        tier.refresh_predicate();
        assert_eq!(tier.search_predicate, "stars:>=15000");
    }
}
