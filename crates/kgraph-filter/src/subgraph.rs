//! Bounded-hop subgraph extraction

use kgraph_domain::{normalize_name, Triple};
use std::collections::{HashMap, HashSet, VecDeque};
use tracing::debug;

/// Triples within `max_hops` edges of `center`
///
/// Builds an undirected adjacency over normalized entity names and walks it
/// breadth-first from `center`. A triple is returned when at least one of its
/// endpoints was reached. `max_hops = 0` returns the triples mentioning the
/// center; an unknown center returns nothing.
///
/// # Examples
///
/// ```
/// use kgraph_domain::Triple;
/// use kgraph_filter::get_subgraph_around_entity;
///
/// let triples = vec![
///     Triple::new("A", "p", "B"),
///     Triple::new("B", "p", "C"),
///     Triple::new("C", "p", "D"),
/// ];
/// assert_eq!(get_subgraph_around_entity(&triples, "a", 0).len(), 1);
/// assert_eq!(get_subgraph_around_entity(&triples, "a", 1).len(), 2);
/// assert!(get_subgraph_around_entity(&triples, "Z", 5).is_empty());
/// ```
pub fn get_subgraph_around_entity(triples: &[Triple], center: &str, max_hops: usize) -> Vec<Triple> {
    let keys: Vec<(String, String)> = triples
        .iter()
        .map(|t| (t.subject_key(), t.object_key()))
        .collect();

    let mut adjacency: HashMap<&str, Vec<&str>> = HashMap::new();
    for (subject, object) in &keys {
        adjacency.entry(subject.as_str()).or_default().push(object.as_str());
        adjacency.entry(object.as_str()).or_default().push(subject.as_str());
    }

    let center = normalize_name(center);
    let mut visited: HashSet<&str> = HashSet::new();
    if let Some((&start, _)) = adjacency.get_key_value(center.as_str()) {
        let mut queue = VecDeque::from([(start, 0usize)]);
        visited.insert(start);

        while let Some((entity, depth)) = queue.pop_front() {
            if depth == max_hops {
                continue;
            }
            for &neighbor in adjacency.get(entity).into_iter().flatten() {
                if visited.insert(neighbor) {
                    queue.push_back((neighbor, depth + 1));
                }
            }
        }
    }

    let kept: Vec<Triple> = triples
        .iter()
        .zip(&keys)
        .filter(|(_, (s, o))| visited.contains(s.as_str()) || visited.contains(o.as_str()))
        .map(|(t, _)| t.clone())
        .collect();

    debug!(
        center = %center,
        max_hops,
        reached = visited.len(),
        before = triples.len(),
        after = kept.len(),
        "subgraph extracted"
    );
    kept
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain() -> Vec<Triple> {
        vec![
            Triple::new("A", "p", "B"),
            Triple::new("B", "p", "C"),
            Triple::new("C", "p", "D"),
            Triple::new("X", "p", "Y"),
        ]
    }

    #[test]
    fn test_scenario_center_b_one_hop() {
        let triples = vec![
            Triple::new("A", "relates", "B").with_confidence(0.9),
            Triple::new("B", "relates", "C").with_confidence(0.4).inferred(),
        ];
        assert_eq!(get_subgraph_around_entity(&triples, "B", 1), triples);
    }

    #[test]
    fn test_zero_hops_mentions_center_only() {
        let kept = get_subgraph_around_entity(&chain(), "B", 0);
        assert_eq!(kept.len(), 2);
    }

    #[test]
    fn test_hops_expand_along_edges_in_either_direction() {
        // D reaches C in one hop against edge direction
        let kept = get_subgraph_around_entity(&chain(), "D", 1);
        assert_eq!(kept, vec![chain()[1].clone(), chain()[2].clone()]);

        let kept = get_subgraph_around_entity(&chain(), "D", 3);
        assert_eq!(kept.len(), 3);
    }

    #[test]
    fn test_disconnected_component_excluded() {
        let kept = get_subgraph_around_entity(&chain(), "A", 10);
        assert!(kept.iter().all(|t| t.subject != "X"));
    }

    #[test]
    fn test_unknown_center_is_empty() {
        assert!(get_subgraph_around_entity(&chain(), "Nobody", 3).is_empty());
        assert!(get_subgraph_around_entity(&[], "A", 3).is_empty());
    }

    #[test]
    fn test_center_is_case_normalized() {
        assert_eq!(get_subgraph_around_entity(&chain(), " a ", 0).len(), 1);
    }

    #[test]
    fn test_order_preserved() {
        let kept = get_subgraph_around_entity(&chain(), "C", 2);
        assert_eq!(kept, chain()[..3].to_vec());
    }
}
