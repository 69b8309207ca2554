//! Supported export formats

use crate::error::ExportError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// An export target format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Structured JSON record
    Json,
    /// Comma-separated values
    Csv,
    /// GraphML graph interchange
    Graphml,
    /// GEXF 1.2 visualization interchange
    Gexf,
    /// RDF Turtle
    Turtle,
}

impl ExportFormat {
    /// Every supported format, in documentation order
    pub const ALL: [ExportFormat; 5] = [
        ExportFormat::Json,
        ExportFormat::Csv,
        ExportFormat::Graphml,
        ExportFormat::Gexf,
        ExportFormat::Turtle,
    ];

    /// Canonical lowercase name
    pub fn name(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
            ExportFormat::Graphml => "graphml",
            ExportFormat::Gexf => "gexf",
            ExportFormat::Turtle => "turtle",
        }
    }

    /// File extension, without the dot
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Turtle => "ttl",
            other => other.name(),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "csv" => Ok(ExportFormat::Csv),
            "graphml" => Ok(ExportFormat::Graphml),
            "gexf" => Ok(ExportFormat::Gexf),
            "turtle" | "ttl" => Ok(ExportFormat::Turtle),
            _ => Err(ExportError::UnsupportedFormat(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_case_insensitive() {
        assert_eq!("JSON".parse::<ExportFormat>().unwrap(), ExportFormat::Json);
        assert_eq!(" GraphML ".parse::<ExportFormat>().unwrap(), ExportFormat::Graphml);
        assert_eq!("ttl".parse::<ExportFormat>().unwrap(), ExportFormat::Turtle);
    }

    #[test]
    fn test_parse_unknown() {
        let err = "xlsx".parse::<ExportFormat>().unwrap_err();
        assert!(matches!(err, ExportError::UnsupportedFormat(name) if name == "xlsx"));
    }

    #[test]
    fn test_name_round_trips() {
        for format in ExportFormat::ALL {
            assert_eq!(format.name().parse::<ExportFormat>().unwrap(), format);
        }
    }
}
