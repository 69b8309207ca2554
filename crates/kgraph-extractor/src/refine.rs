//! Rule-based post-processing: entity standardization and transitive inference

use kgraph_domain::{normalize_name, Triple};
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Collapse entity spellings that differ only in case or spacing
///
/// Every subject and object is replaced by the first spelling seen for its
/// normalized key, with internal whitespace collapsed. Predicates are
/// lowercased with whitespace collapsed. Triple order and count are unchanged.
///
/// # Examples
///
/// ```
/// use kgraph_extractor::standardize;
/// use kgraph_domain::Triple;
///
/// let triples = standardize(vec![
///     Triple::new("James Watt", "Improved", "steam engine"),
///     Triple::new("james  watt", "born in", "Scotland"),
/// ]);
/// assert_eq!(triples[1].subject, "James Watt");
/// assert_eq!(triples[0].predicate, "improved");
/// ```
pub fn standardize(triples: Vec<Triple>) -> Vec<Triple> {
    let mut canonical: HashMap<String, String> = HashMap::new();
    let mut spelling = |name: &str| -> String {
        canonical
            .entry(normalize_name(name))
            .or_insert_with(|| name.split_whitespace().collect::<Vec<_>>().join(" "))
            .clone()
    };

    let standardized: Vec<Triple> = triples
        .into_iter()
        .map(|mut triple| {
            triple.subject = spelling(&triple.subject);
            triple.object = spelling(&triple.object);
            triple.predicate = normalize_name(&triple.predicate);
            triple
        })
        .collect();

    debug!(entities = canonical.len(), "Standardized entity names");
    standardized
}

/// Append inferred `A -p-> C` triples for every `A -p-> B`, `B -p-> C` pair
///
/// Matching uses normalized names. A pair only produces a triple when `A` and
/// `C` differ and `A -p-> C` is not already present. The new triple is marked
/// inferred, takes `A`'s and `C`'s spellings and the first premise's chunk, and
/// its confidence is the product of the premises' effective confidences.
/// Only triples present on input act as premises: the pass runs once.
pub fn infer_transitive(mut triples: Vec<Triple>) -> Vec<Triple> {
    let key = |t: &Triple| (t.subject_key(), normalize_name(&t.predicate), t.object_key());

    let mut known: HashSet<(String, String, String)> = triples.iter().map(key).collect();

    // (subject key, predicate key) -> indices of premises starting there
    let mut outgoing: HashMap<(String, String), Vec<usize>> = HashMap::new();
    for (idx, triple) in triples.iter().enumerate() {
        outgoing
            .entry((triple.subject_key(), normalize_name(&triple.predicate)))
            .or_default()
            .push(idx);
    }

    let mut inferred = Vec::new();
    for first in &triples {
        let predicate = normalize_name(&first.predicate);
        let Some(next) = outgoing.get(&(first.object_key(), predicate.clone())) else {
            continue;
        };

        for &idx in next {
            let second = &triples[idx];
            let subject_key = first.subject_key();
            let object_key = second.object_key();
            if subject_key == object_key {
                continue;
            }
            if !known.insert((subject_key, predicate.clone(), object_key)) {
                continue;
            }

            let confidence = first.effective_confidence().unwrap_or(0.0)
                * second.effective_confidence().unwrap_or(0.0);
            let mut triple = Triple::new(
                first.subject.clone(),
                first.predicate.clone(),
                second.object.clone(),
            )
            .with_confidence(confidence)
            .inferred();
            triple.chunk = first.chunk;
            inferred.push(triple);
        }
    }

    debug!(inferred = inferred.len(), "Applied transitive inference");
    triples.extend(inferred);
    triples
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standardize_first_spelling_wins() {
        let triples = standardize(vec![
            Triple::new("Steam Engine", "powers", "Factory"),
            Triple::new("factory", "located in", "MANCHESTER"),
            Triple::new("steam  engine", "invented by", "Newcomen"),
        ]);
        assert_eq!(triples[1].subject, "Factory");
        assert_eq!(triples[2].subject, "Steam Engine");
        assert_eq!(triples[1].object, "MANCHESTER");
        assert_eq!(triples.len(), 3);
    }

    #[test]
    fn test_transitive_inference() {
        let triples = infer_transitive(vec![
            Triple::new("A", "part of", "B").with_confidence(0.8).with_chunk(1),
            Triple::new("B", "part of", "C").with_confidence(0.5),
        ]);
        assert_eq!(triples.len(), 3);
        let added = &triples[2];
        assert_eq!((added.subject.as_str(), added.object.as_str()), ("A", "C"));
        assert!(added.inferred);
        assert!((added.confidence.unwrap() - 0.4).abs() < 1e-9);
        assert_eq!(added.chunk, Some(1));
    }

    #[test]
    fn test_inference_uses_default_confidence_for_originals() {
        let triples = infer_transitive(vec![
            Triple::new("A", "p", "B"),
            Triple::new("B", "p", "C"),
        ]);
        assert_eq!(triples[2].confidence, Some(1.0));
    }

    #[test]
    fn test_inference_skips_cycles_and_existing() {
        let base = vec![
            Triple::new("A", "p", "B"),
            Triple::new("B", "p", "A"),
            Triple::new("B", "p", "C"),
        ];

        // A->B->A and B->A->B are cycles; only A->C is new
        let triples = infer_transitive(base.clone());
        let added: Vec<_> = triples.iter().filter(|t| t.inferred).collect();
        assert_eq!(added.len(), 1);
        assert_eq!((added[0].subject.as_str(), added[0].object.as_str()), ("A", "C"));

        let mut with_existing = base;
        with_existing.push(Triple::new("a", "P", "c"));
        let triples = infer_transitive(with_existing);
        assert!(triples.iter().all(|t| !t.inferred));
    }

    #[test]
    fn test_inference_requires_same_predicate() {
        let triples = infer_transitive(vec![
            Triple::new("A", "p", "B"),
            Triple::new("B", "q", "C"),
        ]);
        assert_eq!(triples.len(), 2);
    }

    #[test]
    fn test_inference_matches_normalized_names() {
        let triples = infer_transitive(vec![
            Triple::new("A", "p", "Mid Point"),
            Triple::new("mid point", "P", "C"),
        ]);
        assert_eq!(triples.len(), 3);
    }
}
