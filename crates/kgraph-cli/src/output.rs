//! Output formatting for the CLI.

use crate::cli::OutputFormat;
use crate::error::Result;
use crate::profiles::Profile;
use colored::*;
use kgraph_batch::{BatchSummary, PerformanceReport};
use kgraph_domain::GraphStats;
use kgraph_export::ExportOutcome;
use kgraph_neo4j::{EntityStatistics, GraphPath, ImportReport, Neighborhood, RelationshipStatistics};
use serde::Serialize;
use serde_json::json;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

fn table<R, S>(header: &[&str], rows: R) -> String
where
    R: IntoIterator<Item = Vec<S>>,
    S: Into<String>,
{
    let mut builder = Builder::default();
    builder.push_record(header.iter().map(|h| h.to_string()));
    for row in rows {
        builder.push_record(row.into_iter().map(Into::into));
    }

    let mut table = builder.build();
    table
        .with(Style::rounded())
        .with(Modify::new(Rows::first()).with(Alignment::center()));
    table.to_string()
}

fn seconds(value: f64) -> String {
    format!("{:.2}s", value)
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Whether results are printed as JSON.
    pub fn is_json(&self) -> bool {
        self.format == OutputFormat::Json
    }

    /// Pretty JSON for any serializable value.
    pub fn json<T: Serialize + ?Sized>(&self, value: &T) -> Result<String> {
        Ok(serde_json::to_string_pretty(value)?)
    }

    /// Graph statistics.
    pub fn graph_stats(&self, stats: &GraphStats) -> Result<String> {
        if self.is_json() {
            return self.json(stats);
        }
        Ok(table(
            &["Triples", "Entities", "Relationships", "Inferred"],
            [vec![
                stats.total_triples.to_string(),
                stats.unique_entities.to_string(),
                stats.unique_relationships.to_string(),
                stats.inferred_triples.to_string(),
            ]],
        ))
    }

    /// One row per requested export format.
    pub fn export_outcomes(&self, outcomes: &[ExportOutcome]) -> Result<String> {
        if self.is_json() {
            let rows: Vec<_> = outcomes.iter().map(outcome_json).collect();
            return self.json(&rows);
        }
        if outcomes.is_empty() {
            return Ok(self.colorize("No exports requested.", "yellow"));
        }

        let rows = outcomes.iter().map(|outcome| match &outcome.result {
            Ok(report) => vec![
                report.format.name().to_string(),
                report.path.display().to_string(),
                report.written.to_string(),
                self.colorize("written", "green"),
            ],
            Err(e) => vec![
                outcome.requested.clone(),
                "-".to_string(),
                "-".to_string(),
                self.colorize(&e.to_string(), "red"),
            ],
        });
        Ok(table(&["Format", "Path", "Triples", "Status"], rows))
    }

    /// Per-file batch results followed by the totals line.
    pub fn batch_summary(&self, summary: &BatchSummary) -> Result<String> {
        if self.is_json() {
            return self.json(summary);
        }
        if summary.results.is_empty() {
            return Ok(self.colorize("No files matched.", "yellow"));
        }

        let rows = summary.results.iter().map(|result| {
            let status = if result.is_success() {
                self.colorize("ok", "green")
            } else {
                self.colorize(result.error.as_deref().unwrap_or("failed"), "red")
            };
            vec![
                result.display_name(),
                result.triples.to_string(),
                seconds(result.duration_seconds),
                status,
            ]
        });
        Ok(format!(
            "{}\n{}",
            table(&["File", "Triples", "Time", "Status"], rows),
            summary.summary()
        ))
    }

    /// Batch performance analysis.
    pub fn performance(&self, report: &PerformanceReport) -> Result<String> {
        if self.is_json() {
            return self.json(report);
        }
        if !report.has_data() {
            return Ok(self.colorize("No successful files to analyze.", "yellow"));
        }

        let rows = [
            ("Success rate", format!("{:.1}%", report.success_rate * 100.0)),
            ("Mean time per file", seconds(report.timing.mean)),
            ("Fastest file", seconds(report.timing.min)),
            ("Slowest file", seconds(report.timing.max)),
            ("Mean triples per file", format!("{:.1}", report.quality.mean_triples)),
            ("Total triples", report.quality.total_triples.to_string()),
            ("Files per hour", format!("{:.1}", report.throughput.files_per_hour)),
            (
                "Triples per minute",
                format!("{:.1}", report.throughput.triples_per_minute),
            ),
        ];
        Ok(table(
            &["Metric", "Value"],
            rows.into_iter().map(|(name, value)| vec![name.to_string(), value]),
        ))
    }

    /// Neo4j import counts.
    pub fn import_report(&self, report: &ImportReport) -> Result<String> {
        if self.is_json() {
            return self.json(report);
        }
        let mut message = format!(
            "Imported {} entities and {} relationships into Neo4j",
            report.entities, report.relationships
        );
        if report.skipped > 0 {
            message.push_str(&format!(" ({} malformed triples skipped)", report.skipped));
        }
        Ok(self.success(&message))
    }

    /// Built-in profiles.
    pub fn profiles(&self, profiles: &[Profile]) -> Result<String> {
        if self.is_json() {
            let rows: Vec<_> = profiles
                .iter()
                .map(|p| {
                    json!({
                        "name": p.name,
                        "aliases": p.aliases,
                        "description": p.description,
                    })
                })
                .collect();
            return self.json(&rows);
        }
        let rows = profiles.iter().map(|p| {
            vec![
                p.name.to_string(),
                p.aliases.join(", "),
                p.description.to_string(),
            ]
        });
        Ok(table(&["Profile", "Aliases", "Description"], rows))
    }

    /// Database-wide statistics.
    pub fn database_stats(
        &self,
        entities: &EntityStatistics,
        relationships: &RelationshipStatistics,
    ) -> Result<String> {
        if self.is_json() {
            return self.json(&json!({
                "entities": entities,
                "relationships": relationships,
            }));
        }

        let optional = |v: Option<String>| v.unwrap_or_else(|| "n/a".to_string());
        let rows = [
            ("Entities", entities.total_entities.to_string()),
            ("Entity types", entities.entity_types.join(", ")),
            (
                "Relationships per entity (avg)",
                optional(entities.avg_relationships.map(|v| format!("{:.2}", v))),
            ),
            (
                "Relationships per entity (min/max)",
                format!(
                    "{}/{}",
                    optional(entities.min_relationships.map(|v| v.to_string())),
                    optional(entities.max_relationships.map(|v| v.to_string()))
                ),
            ),
            ("Relationships", relationships.total_relationships.to_string()),
            ("Original", relationships.original_relationships.to_string()),
            ("Inferred", relationships.inferred_relationships.to_string()),
            ("Sample predicates", relationships.sample_predicates.join(", ")),
        ];
        Ok(table(
            &["Statistic", "Value"],
            rows.into_iter().map(|(name, value)| vec![name.to_string(), value]),
        ))
    }

    /// A shortest path, or a notice that none exists.
    pub fn path(&self, from: &str, to: &str, path: Option<&GraphPath>) -> Result<String> {
        if self.is_json() {
            return self.json(&path);
        }
        let Some(path) = path else {
            return Ok(self.warning(&format!("No path between '{}' and '{}'", from, to)));
        };

        let mut rendered = String::new();
        for (i, node) in path.nodes.iter().enumerate() {
            if i > 0 {
                let predicate = path.predicates.get(i - 1).map(String::as_str).unwrap_or("?");
                rendered.push_str(&format!(" -[{}]-> ", self.colorize(predicate, "cyan")));
            }
            rendered.push_str(node);
        }
        Ok(format!("{}\n{}", rendered, self.info(&format!("{} hop(s)", path.length))))
    }

    /// Entities and relationships around an entity.
    pub fn neighborhood(&self, neighborhood: &Neighborhood) -> Result<String> {
        if self.is_json() {
            return self.json(neighborhood);
        }
        if neighborhood.entities.is_empty() && neighborhood.relationships.is_empty() {
            return Ok(self.colorize(
                &format!("Nothing found around '{}'.", neighborhood.center),
                "yellow",
            ));
        }

        let entities = table(
            &["Entity", "Type"],
            neighborhood.entities.iter().map(|e| {
                vec![
                    e.name.clone(),
                    e.entity_type.clone().unwrap_or_else(|| "-".to_string()),
                ]
            }),
        );
        let relationships = table(
            &["Subject", "Predicate", "Object", "Inferred"],
            neighborhood.relationships.iter().map(|r| {
                vec![
                    r.subject.clone(),
                    r.predicate.clone(),
                    r.object.clone(),
                    r.inferred.map(|b| b.to_string()).unwrap_or_default(),
                ]
            }),
        );
        Ok(format!("{}\n{}", entities, relationships))
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            "cyan" => text.cyan().to_string(),
            _ => text.to_string(),
        }
    }
}

/// JSON record for one export outcome.
pub fn outcome_json(outcome: &ExportOutcome) -> serde_json::Value {
    match &outcome.result {
        Ok(report) => json!({
            "format": report.format.name(),
            "path": report.path,
            "written": report.written,
            "skipped": report.skipped,
        }),
        Err(e) => json!({
            "format": outcome.requested,
            "error": e.to_string(),
        }),
    }
}
