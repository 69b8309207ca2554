//! Triple module - the fundamental unit of an extracted knowledge graph

use serde::{Deserialize, Serialize};
use std::fmt;

/// Confidence imputed to an original (non-inferred) triple that carries no value
pub const DEFAULT_ORIGINAL_CONFIDENCE: f64 = 1.0;

/// Normalize an entity or relationship name for comparison
///
/// Trims surrounding whitespace, collapses internal runs of whitespace to a
/// single space and lowercases the result.
///
/// # Examples
///
/// ```
/// use kgraph_domain::normalize_name;
///
/// assert_eq!(normalize_name("  Steam   Engine "), "steam engine");
/// ```
pub fn normalize_name(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Reasons a triple is considered malformed
#[derive(Debug, Clone, PartialEq)]
pub enum TripleError {
    /// A required field is empty or whitespace only
    BlankField(&'static str),

    /// The explicit confidence is NaN, infinite or outside [0, 1]
    ConfidenceOutOfRange(f64),
}

impl fmt::Display for TripleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TripleError::BlankField(field) => write!(f, "{} is blank", field),
            TripleError::ConfidenceOutOfRange(c) => {
                write!(f, "confidence {} out of range [0.0, 1.0]", c)
            }
        }
    }
}

impl std::error::Error for TripleError {}

/// A single extracted relationship
///
/// Identity is the ordered `(subject, predicate, object)` tuple. No uniqueness
/// is enforced: the same relationship may legitimately be extracted from
/// several chunks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Triple {
    /// Subject entity
    pub subject: String,

    /// Relationship name
    pub predicate: String,

    /// Object entity
    pub object: String,

    /// Confidence in [0.0, 1.0], if the extractor supplied one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,

    /// Whether the triple was inferred rather than read from the text
    #[serde(default)]
    pub inferred: bool,

    /// Index of the source chunk the triple came from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chunk: Option<usize>,
}

impl Triple {
    /// Create an original triple with no confidence or chunk information
    ///
    /// # Examples
    ///
    /// ```
    /// use kgraph_domain::Triple;
    ///
    /// let t = Triple::new("A", "relates", "B").with_confidence(0.9);
    /// assert_eq!(t.effective_confidence(), Some(0.9));
    /// assert!(!t.inferred);
    /// ```
    pub fn new(
        subject: impl Into<String>,
        predicate: impl Into<String>,
        object: impl Into<String>,
    ) -> Self {
        Self {
            subject: subject.into(),
            predicate: predicate.into(),
            object: object.into(),
            confidence: None,
            inferred: false,
            chunk: None,
        }
    }

    /// Set an explicit confidence
    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = Some(confidence);
        self
    }

    /// Mark the triple as inferred
    pub fn inferred(mut self) -> Self {
        self.inferred = true;
        self
    }

    /// Set the source chunk index
    pub fn with_chunk(mut self, chunk: usize) -> Self {
        self.chunk = Some(chunk);
        self
    }

    /// Confidence used for thresholding
    ///
    /// Explicit values win. Originals without a value count as
    /// [`DEFAULT_ORIGINAL_CONFIDENCE`]; inferred triples without a value have
    /// no effective confidence and never pass a threshold.
    pub fn effective_confidence(&self) -> Option<f64> {
        match (self.confidence, self.inferred) {
            (Some(c), _) => Some(c),
            (None, false) => Some(DEFAULT_ORIGINAL_CONFIDENCE),
            (None, true) => None,
        }
    }

    /// Normalized subject name
    pub fn subject_key(&self) -> String {
        normalize_name(&self.subject)
    }

    /// Normalized object name
    pub fn object_key(&self) -> String {
        normalize_name(&self.object)
    }

    /// Check that all required fields are present and the confidence is sane
    pub fn validate(&self) -> Result<(), TripleError> {
        if self.subject.trim().is_empty() {
            return Err(TripleError::BlankField("subject"));
        }
        if self.predicate.trim().is_empty() {
            return Err(TripleError::BlankField("predicate"));
        }
        if self.object.trim().is_empty() {
            return Err(TripleError::BlankField("object"));
        }
        if let Some(c) = self.confidence {
            if !c.is_finite() || !(0.0..=1.0).contains(&c) {
                return Err(TripleError::ConfidenceOutOfRange(c));
            }
        }
        Ok(())
    }

    /// Whether [`Triple::validate`] passes
    pub fn is_well_formed(&self) -> bool {
        self.validate().is_ok()
    }
}

impl fmt::Display for Triple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}) -[{}]-> ({})", self.subject, self.predicate, self.object)
    }
}
