//! Combined filter pipeline driven by command-line options

use crate::error::FilterError;
use crate::filters::{
    filter_by_confidence, filter_by_entities, filter_by_inference_status,
    filter_by_relationships,
};
use crate::subgraph::get_subgraph_around_entity;
use kgraph_domain::Triple;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Center entity and hop limit for subgraph extraction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubgraphSpec {
    /// Entity to start from
    pub center: String,
    /// Maximum number of edges from the center
    pub max_hops: usize,
}

/// A set of filters applied in one pass
///
/// Stages run in a fixed order: entity include, entity exclude, relationship
/// include, relationship exclude, inference status, confidence, subgraph.
/// Empty name lists disable their stage. Because exclusion runs after
/// inclusion, a triple matching both an include and an exclude list is
/// dropped.
///
/// # Examples
///
/// ```
/// use kgraph_domain::Triple;
/// use kgraph_filter::FilterSpec;
///
/// let spec = FilterSpec {
///     include_entities: vec!["A".into()],
///     exclude_entities: vec!["A".into()],
///     ..FilterSpec::default()
/// };
/// let triples = vec![Triple::new("A", "p", "B")];
/// assert!(spec.apply(&triples).unwrap().is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterSpec {
    /// Keep triples mentioning one of these entities
    #[serde(default)]
    pub include_entities: Vec<String>,

    /// Drop triples mentioning one of these entities
    #[serde(default)]
    pub exclude_entities: Vec<String>,

    /// Keep triples with one of these predicates
    #[serde(default)]
    pub include_relationships: Vec<String>,

    /// Drop triples with one of these predicates
    #[serde(default)]
    pub exclude_relationships: Vec<String>,

    /// Keep only original triples
    #[serde(default)]
    pub only_original: bool,

    /// Keep only inferred triples
    #[serde(default)]
    pub only_inferred: bool,

    /// Minimum effective confidence
    #[serde(default)]
    pub min_confidence: Option<f64>,

    /// Restrict to a neighborhood of one entity
    #[serde(default)]
    pub subgraph: Option<SubgraphSpec>,
}

impl FilterSpec {
    /// Whether every stage is disabled
    pub fn is_empty(&self) -> bool {
        *self == FilterSpec::default()
    }

    /// Reject invalid parameter combinations
    pub fn validate(&self) -> Result<(), FilterError> {
        if self.only_original && self.only_inferred {
            return Err(FilterError::ConflictingInferenceFlags);
        }
        if let Some(min) = self.min_confidence {
            if !min.is_finite() || !(0.0..=1.0).contains(&min) {
                return Err(FilterError::InvalidConfidence(min));
            }
        }
        if let Some(subgraph) = &self.subgraph {
            if subgraph.center.trim().is_empty() {
                return Err(FilterError::BlankCenter);
            }
        }
        Ok(())
    }

    /// Validate, then run every enabled stage
    pub fn apply(&self, triples: &[Triple]) -> Result<Vec<Triple>, FilterError> {
        self.validate()?;

        let mut current = triples.to_vec();
        if !self.include_entities.is_empty() {
            current = filter_by_entities(&current, &self.include_entities, true);
        }
        if !self.exclude_entities.is_empty() {
            current = filter_by_entities(&current, &self.exclude_entities, false);
        }
        if !self.include_relationships.is_empty() {
            current = filter_by_relationships(&current, &self.include_relationships, true);
        }
        if !self.exclude_relationships.is_empty() {
            current = filter_by_relationships(&current, &self.exclude_relationships, false);
        }
        current = filter_by_inference_status(&current, self.only_original, self.only_inferred)?;
        if let Some(min) = self.min_confidence {
            current = filter_by_confidence(&current, min)?;
        }
        if let Some(subgraph) = &self.subgraph {
            current = get_subgraph_around_entity(&current, &subgraph.center, subgraph.max_hops);
        }

        info!(before = triples.len(), after = current.len(), "Filters applied");
        Ok(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<Triple> {
        vec![
            Triple::new("Watt", "improved", "engine").with_confidence(0.9),
            Triple::new("engine", "powered", "mill").with_confidence(0.6),
            Triple::new("Watt", "powered", "mill").inferred().with_confidence(0.54),
            Triple::new("Newcomen", "built", "engine"),
        ]
    }

    #[test]
    fn test_empty_spec_is_identity() {
        let spec = FilterSpec::default();
        assert!(spec.is_empty());
        assert_eq!(spec.apply(&sample()).unwrap(), sample());
    }

    #[test]
    fn test_exclusion_wins_over_inclusion() {
        let spec = FilterSpec {
            include_relationships: vec!["powered".into()],
            exclude_relationships: vec!["POWERED".into()],
            ..FilterSpec::default()
        };
        assert!(spec.apply(&sample()).unwrap().is_empty());
    }

    #[test]
    fn test_conflicting_flags_rejected_before_work() {
        let spec = FilterSpec {
            only_original: true,
            only_inferred: true,
            ..FilterSpec::default()
        };
        assert_eq!(
            spec.apply(&sample()),
            Err(FilterError::ConflictingInferenceFlags)
        );
    }

    #[test]
    fn test_stages_compose() {
        let spec = FilterSpec {
            include_entities: vec!["engine".into()],
            only_original: true,
            min_confidence: Some(0.7),
            ..FilterSpec::default()
        };
        let kept = spec.apply(&sample()).unwrap();
        // Newcomen's triple has no confidence and counts as 1.0
        assert_eq!(kept, vec![sample()[0].clone(), sample()[3].clone()]);
    }

    #[test]
    fn test_subgraph_runs_last() {
        let spec = FilterSpec {
            exclude_entities: vec!["engine".into()],
            subgraph: Some(SubgraphSpec {
                center: "Watt".into(),
                max_hops: 2,
            }),
            ..FilterSpec::default()
        };
        let kept = spec.apply(&sample()).unwrap();
        assert_eq!(kept, vec![sample()[2].clone()]);
    }

    #[test]
    fn test_blank_center_rejected() {
        let spec = FilterSpec {
            subgraph: Some(SubgraphSpec {
                center: " ".into(),
                max_hops: 1,
            }),
            ..FilterSpec::default()
        };
        assert_eq!(spec.validate(), Err(FilterError::BlankCenter));
    }
}
