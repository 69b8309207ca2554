//! Summary statistics over a triple sequence

use crate::Triple;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Counts describing a set of triples
///
/// Entities are the distinct non-blank subject and object strings; relationships
/// are the distinct non-blank predicates. Strings are compared exactly, as the
/// extractor emitted them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphStats {
    /// Number of triples
    pub total_triples: usize,

    /// Distinct subject/object names
    pub unique_entities: usize,

    /// Distinct predicate names
    pub unique_relationships: usize,

    /// Triples marked as inferred
    pub inferred_triples: usize,
}

impl GraphStats {
    /// Compute statistics for a slice of triples
    ///
    /// # Examples
    ///
    /// ```
    /// use kgraph_domain::{GraphStats, Triple};
    ///
    /// let triples = vec![
    ///     Triple::new("A", "relates", "B"),
    ///     Triple::new("B", "relates", "C").inferred(),
    /// ];
    /// let stats = GraphStats::from_triples(&triples);
    /// assert_eq!(stats.unique_entities, 3);
    /// assert_eq!(stats.unique_relationships, 1);
    /// assert_eq!(stats.inferred_triples, 1);
    /// ```
    pub fn from_triples(triples: &[Triple]) -> Self {
        let mut entities: HashSet<&str> = HashSet::new();
        let mut relationships: HashSet<&str> = HashSet::new();
        let mut inferred = 0;

        for triple in triples {
            for name in [triple.subject.as_str(), triple.object.as_str()] {
                if !name.trim().is_empty() {
                    entities.insert(name);
                }
            }
            if !triple.predicate.trim().is_empty() {
                relationships.insert(triple.predicate.as_str());
            }
            if triple.inferred {
                inferred += 1;
            }
        }

        Self {
            total_triples: triples.len(),
            unique_entities: entities.len(),
            unique_relationships: relationships.len(),
            inferred_triples: inferred,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty() {
        assert_eq!(GraphStats::from_triples(&[]), GraphStats::default());
    }

    #[test]
    fn test_blank_names_not_counted() {
        let triples = vec![Triple::new("A", "", " ")];
        let stats = GraphStats::from_triples(&triples);
        assert_eq!(stats.total_triples, 1);
        assert_eq!(stats.unique_entities, 1);
        assert_eq!(stats.unique_relationships, 0);
    }

    #[test]
    fn test_duplicates_counted_once() {
        let triples = vec![
            Triple::new("A", "relates", "B"),
            Triple::new("A", "relates", "B"),
        ];
        let stats = GraphStats::from_triples(&triples);
        assert_eq!(stats.total_triples, 2);
        assert_eq!(stats.unique_entities, 2);
        assert_eq!(stats.unique_relationships, 1);
    }
}
