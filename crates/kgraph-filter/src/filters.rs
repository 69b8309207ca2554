//! Name, confidence, provenance and chunk filters

use crate::error::FilterError;
use kgraph_domain::{normalize_name, Triple};
use std::collections::HashSet;
use tracing::debug;

fn name_set<S: AsRef<str>>(names: &[S]) -> HashSet<String> {
    names.iter().map(|n| normalize_name(n.as_ref())).collect()
}

fn select(triples: &[Triple], stage: &str, keep: impl Fn(&Triple) -> bool) -> Vec<Triple> {
    let kept: Vec<Triple> = triples.iter().filter(|t| keep(t)).cloned().collect();
    debug!(stage, before = triples.len(), after = kept.len(), "filter applied");
    kept
}

fn check_confidence(value: f64) -> Result<(), FilterError> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(FilterError::InvalidConfidence(value))
    }
}

/// Keep (`include = true`) or drop (`include = false`) triples whose subject or object is named
///
/// An empty name list keeps nothing when including and everything when excluding.
///
/// # Examples
///
/// ```
/// use kgraph_domain::Triple;
/// use kgraph_filter::filter_by_entities;
///
/// let triples = vec![Triple::new("James Watt", "improved", "steam engine")];
/// assert_eq!(filter_by_entities(&triples, &["james watt"], true).len(), 1);
/// assert!(filter_by_entities(&triples, &["JAMES WATT"], false).is_empty());
/// ```
pub fn filter_by_entities<S: AsRef<str>>(
    triples: &[Triple],
    names: &[S],
    include: bool,
) -> Vec<Triple> {
    let names = name_set(names);
    let stage = if include { "include entities" } else { "exclude entities" };
    select(triples, stage, |t| {
        let mentioned = names.contains(&t.subject_key()) || names.contains(&t.object_key());
        mentioned == include
    })
}

/// Keep (`include = true`) or drop (`include = false`) triples whose predicate is named
pub fn filter_by_relationships<S: AsRef<str>>(
    triples: &[Triple],
    names: &[S],
    include: bool,
) -> Vec<Triple> {
    let names = name_set(names);
    let stage = if include {
        "include relationships"
    } else {
        "exclude relationships"
    };
    select(triples, stage, |t| {
        names.contains(&normalize_name(&t.predicate)) == include
    })
}

/// Keep triples whose effective confidence is at least `min_confidence`
///
/// Originals without a confidence count as 1.0. Inferred triples without a
/// confidence have none and are always dropped.
///
/// # Errors
///
/// `FilterError::InvalidConfidence` if `min_confidence` is NaN or outside [0, 1].
pub fn filter_by_confidence(
    triples: &[Triple],
    min_confidence: f64,
) -> Result<Vec<Triple>, FilterError> {
    check_confidence(min_confidence)?;
    Ok(select(triples, "min confidence", |t| {
        t.effective_confidence()
            .is_some_and(|c| c >= min_confidence)
    }))
}

/// Keep triples whose effective confidence lies in `[min, max]`
///
/// Uses the same missing-value rule as [`filter_by_confidence`].
pub fn filter_by_confidence_range(
    triples: &[Triple],
    min: f64,
    max: f64,
) -> Result<Vec<Triple>, FilterError> {
    check_confidence(min)?;
    check_confidence(max)?;
    if min > max {
        return Err(FilterError::EmptyConfidenceRange { min, max });
    }
    Ok(select(triples, "confidence range", |t| {
        t.effective_confidence()
            .is_some_and(|c| (min..=max).contains(&c))
    }))
}

/// Keep only original or only inferred triples
///
/// With neither flag set the input is returned unchanged.
///
/// # Errors
///
/// `FilterError::ConflictingInferenceFlags` when both flags are set.
pub fn filter_by_inference_status(
    triples: &[Triple],
    only_original: bool,
    only_inferred: bool,
) -> Result<Vec<Triple>, FilterError> {
    match (only_original, only_inferred) {
        (true, true) => Err(FilterError::ConflictingInferenceFlags),
        (false, false) => Ok(triples.to_vec()),
        (true, false) => Ok(select(triples, "only original", |t| !t.inferred)),
        (false, true) => Ok(select(triples, "only inferred", |t| t.inferred)),
    }
}

/// Keep triples extracted from one of `chunks`; a missing chunk index counts as 0
pub fn filter_by_chunk(triples: &[Triple], chunks: &[usize]) -> Vec<Triple> {
    let chunks: HashSet<usize> = chunks.iter().copied().collect();
    select(triples, "chunk", |t| chunks.contains(&t.chunk.unwrap_or(0)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<Triple> {
        vec![
            Triple::new("A", "relates", "B").with_confidence(0.9),
            Triple::new("B", "relates", "C").with_confidence(0.4).inferred(),
        ]
    }

    #[test]
    fn test_confidence_scenario() {
        let kept = filter_by_confidence(&sample(), 0.5).unwrap();
        assert_eq!(kept, vec![sample()[0].clone()]);
    }

    #[test]
    fn test_missing_confidence_boundary() {
        let triples = vec![
            Triple::new("A", "p", "B"),
            Triple::new("B", "p", "C").inferred(),
        ];
        // Original without a value behaves as 1.0, even at the top threshold
        let kept = filter_by_confidence(&triples, 1.0).unwrap();
        assert_eq!(kept.len(), 1);
        assert!(!kept[0].inferred);

        // Inferred without a value never passes, even at 0.0
        let kept = filter_by_confidence(&triples, 0.0).unwrap();
        assert_eq!(kept.len(), 1);
        assert!(!kept[0].inferred);
    }

    #[test]
    fn test_invalid_threshold_rejected() {
        assert_eq!(
            filter_by_confidence(&sample(), 1.5),
            Err(FilterError::InvalidConfidence(1.5))
        );
        assert!(filter_by_confidence(&sample(), f64::NAN).is_err());
    }

    #[test]
    fn test_confidence_range() {
        let kept = filter_by_confidence_range(&sample(), 0.3, 0.5).unwrap();
        assert_eq!(kept.len(), 1);
        assert!(kept[0].inferred);
        assert!(matches!(
            filter_by_confidence_range(&sample(), 0.6, 0.5),
            Err(FilterError::EmptyConfidenceRange { .. })
        ));
    }

    #[test]
    fn test_entities_case_normalized() {
        let kept = filter_by_entities(&sample(), &["  c "], true);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].object, "C");
    }

    #[test]
    fn test_empty_names() {
        let none: [&str; 0] = [];
        assert!(filter_by_entities(&sample(), &none, true).is_empty());
        assert_eq!(filter_by_entities(&sample(), &none, false), sample());
        assert!(filter_by_relationships(&sample(), &none, true).is_empty());
        assert_eq!(filter_by_relationships(&sample(), &none, false), sample());
    }

    #[test]
    fn test_relationships() {
        let triples = vec![
            Triple::new("A", "Works At", "X"),
            Triple::new("B", "lives in", "Y"),
        ];
        let kept = filter_by_relationships(&triples, &["works at"], true);
        assert_eq!(kept, vec![triples[0].clone()]);
        let kept = filter_by_relationships(&triples, &["works at"], false);
        assert_eq!(kept, vec![triples[1].clone()]);
    }

    #[test]
    fn test_inference_status() {
        let original = filter_by_inference_status(&sample(), true, false).unwrap();
        assert_eq!(original.len(), 1);
        assert!(!original[0].inferred);

        let inferred = filter_by_inference_status(&sample(), false, true).unwrap();
        assert_eq!(inferred.len(), 1);
        assert!(inferred[0].inferred);

        assert_eq!(filter_by_inference_status(&sample(), false, false).unwrap(), sample());
    }

    #[test]
    fn test_conflicting_inference_flags_rejected() {
        assert_eq!(
            filter_by_inference_status(&sample(), true, true),
            Err(FilterError::ConflictingInferenceFlags)
        );
    }

    #[test]
    fn test_chunk_filter_missing_counts_as_zero() {
        let triples = vec![
            Triple::new("A", "p", "B"),
            Triple::new("A", "p", "C").with_chunk(2),
        ];
        assert_eq!(filter_by_chunk(&triples, &[0]).len(), 1);
        assert_eq!(filter_by_chunk(&triples, &[0, 2]).len(), 2);
        assert!(filter_by_chunk(&triples, &[]).is_empty());
    }
}
