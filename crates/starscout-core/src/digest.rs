//! Criteria digest computation for batch provenance.
//!
//! Every collection batch is stamped with the SHA-256 digest of the
//! criteria it ran under, so recorded outcomes can always be traced back
//! to the exact thresholds that produced them. Field order of the criteria
//! structs is fixed at compile time, so `serde_json` output is canonical
//! for our purposes.

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::criteria::FilterCriteria;
use crate::error::Result;

/// SHA-256 hex digest of a serializable value's JSON bytes.
pub fn json_digest<T: Serialize>(value: &T) -> Result<String> {
    let bytes = serde_json::to_vec(value)?;
    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    Ok(hex::encode(hasher.finalize()))
}

/// Digest identifying a criteria set.
pub fn criteria_digest(criteria: &FilterCriteria) -> Result<String> {
    json_digest(criteria)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digest_is_stable() {
        let criteria = FilterCriteria::default();
        let d1 = criteria_digest(&criteria).unwrap();
        let d2 = criteria_digest(&criteria).unwrap();
        assert_eq!(d1, d2);
        assert_eq!(d1.len(), 64);
        assert!(d1.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_digest_survives_serde_round_trip() {
        let criteria = FilterCriteria::strict();
        let json = serde_json::to_string(&criteria).unwrap();
        let back: FilterCriteria = serde_json::from_str(&json).unwrap();
        assert_eq!(
            criteria_digest(&criteria).unwrap(),
            criteria_digest(&back).unwrap()
        );
    }

    #[test]
    fn test_digest_changes_with_thresholds() {
        let a = FilterCriteria::default();
        let mut b = FilterCriteria::default();
        b.popularity.min_stars += 1;
        assert_ne!(criteria_digest(&a).unwrap(), criteria_digest(&b).unwrap());
    }
}
