//! High-level import and read operations with retry

use crate::client::{BoltClient, CypherClient, Record};
use crate::config::Neo4jConfig;
use crate::cypher::{self, Statement, MAX_HOPS};
use crate::error::DatabaseError;
use kgraph_domain::Triple;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::future::Future;
use tracing::{debug, info, warn};

/// Counts from [`Neo4jAdapter::import_triples`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    /// Distinct entities merged
    pub entities: usize,
    /// Relationship rows merged
    pub relationships: usize,
    /// Malformed triples left out
    pub skipped: usize,
    /// `UNWIND` statements sent
    pub batches: usize,
}

/// Entity counts as stored
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EntityStatistics {
    /// Entity nodes
    pub total_entities: i64,
    /// Distinct inferred types
    pub entity_types: Vec<String>,
    /// Mean relationship count, absent for an empty graph
    pub avg_relationships: Option<f64>,
    /// Largest relationship count
    pub max_relationships: Option<i64>,
    /// Smallest relationship count
    pub min_relationships: Option<i64>,
}

/// Relationship counts as stored
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RelationshipStatistics {
    /// `RELATES_TO` edges
    pub total_relationships: i64,
    /// Edges marked inferred
    pub inferred_relationships: i64,
    /// Edges from the text
    pub original_relationships: i64,
    /// Up to ten distinct predicates
    pub sample_predicates: Vec<String>,
}

/// A path between two entities
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphPath {
    /// Entity display names along the path
    pub nodes: Vec<String>,
    /// Predicates between consecutive nodes
    pub predicates: Vec<String>,
    /// Hops
    pub length: i64,
}

/// A neighboring entity
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Neighbor {
    /// Display name
    pub name: String,
    /// Inferred type
    #[serde(rename = "type")]
    pub entity_type: Option<String>,
}

/// A relationship touching the center entity
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NeighborRelationship {
    /// Subject display name
    pub subject: String,
    /// Predicate
    pub predicate: String,
    /// Object display name
    pub object: String,
    /// Inferred flag
    pub inferred: Option<bool>,
}

/// Entities around a center and its direct relationships
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Neighborhood {
    /// Center as requested
    pub center: String,
    /// Hop limit used
    pub depth: u32,
    /// Entities within `depth` hops
    pub entities: Vec<Neighbor>,
    /// Relationships touching the center
    pub relationships: Vec<NeighborRelationship>,
}

/// Run `call` until it succeeds, fails permanently, or attempts run out
///
/// Only transient errors are retried; the delay doubles from
/// `retry_delay_ms` after every failed attempt.
async fn with_retry<T, F, Fut>(
    config: &Neo4jConfig,
    operation: &str,
    mut call: F,
) -> Result<T, DatabaseError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, crate::error::ClientError>>,
{
    let target = config.target();
    let max_attempts = config.max_retry_attempts.max(1);
    let mut attempt = 1;
    loop {
        match call().await {
            Ok(value) => return Ok(value),
            Err(e) => {
                let error = DatabaseError::from_client(e, operation, &target, attempt);
                if !error.is_transient() || attempt >= max_attempts {
                    return Err(error);
                }
                let delay = config.retry_delay(attempt);
                warn!(
                    operation,
                    attempt,
                    max_attempts,
                    ?delay,
                    error = %error,
                    "Transient database error, retrying"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
        }
    }
}

fn decode<T: DeserializeOwned>(
    records: Vec<Record>,
    operation: &str,
    target: &str,
) -> Result<Vec<T>, DatabaseError> {
    records
        .into_iter()
        .map(|record| {
            serde_json::from_value(serde_json::Value::Object(record.into_iter().collect()))
                .map_err(|e| DatabaseError::Query {
                    operation: operation.to_string(),
                    target: target.to_string(),
                    message: format!("unexpected result shape: {}", e),
                })
        })
        .collect()
}

/// Writes triples to Neo4j and runs read helpers
///
/// Methods take `&mut self`; an adapter serves one task at a time.
///
/// # Examples
///
/// ```
/// use kgraph_domain::Triple;
/// use kgraph_neo4j::{MockClient, Neo4jAdapter, Neo4jConfig};
///
/// # tokio_test_block_on(async {
/// let client = MockClient::new();
/// let mut adapter = Neo4jAdapter::with_client(client.clone(), Neo4jConfig::default());
/// let report = adapter
///     .import_triples(&[Triple::new("A", "relates", "B")], false)
///     .await
///     .unwrap();
/// assert_eq!(report.entities, 2);
/// # });
/// # fn tokio_test_block_on<F: std::future::Future>(f: F) -> F::Output {
/// #     tokio::runtime::Runtime::new().unwrap().block_on(f)
/// # }
/// ```
pub struct Neo4jAdapter<C> {
    client: Option<C>,
    config: Neo4jConfig,
}

impl Neo4jAdapter<BoltClient> {
    /// Connect over Bolt and verify the connection with a ping
    ///
    /// Connection failures are retried like any transient error.
    pub async fn connect(config: Neo4jConfig) -> Result<Self, DatabaseError> {
        let client = with_retry(&config, "connect", || BoltClient::connect(&config)).await?;
        let mut adapter = Self::with_client(client, config);
        adapter.ping().await?;
        info!(db = %adapter.config.target(), "Connected to Neo4j");
        Ok(adapter)
    }
}

impl<C: CypherClient> Neo4jAdapter<C> {
    /// Wrap an existing client
    pub fn with_client(client: C, config: Neo4jConfig) -> Self {
        Self {
            client: Some(client),
            config,
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &Neo4jConfig {
        &self.config
    }

    /// Whether a client is open
    pub fn is_connected(&self) -> bool {
        self.client.is_some()
    }

    /// Drop the client; later calls fail with `NotConnected`
    pub fn close(&mut self) {
        if self.client.take().is_some() {
            debug!(db = %self.config.target(), "Neo4j connection closed");
        }
    }

    fn client(&self, operation: &str) -> Result<&C, DatabaseError> {
        self.client.as_ref().ok_or_else(|| DatabaseError::NotConnected {
            operation: operation.to_string(),
            target: self.config.target(),
        })
    }

    async fn run(&self, operation: &str, statement: &Statement) -> Result<(), DatabaseError> {
        let client = self.client(operation)?;
        with_retry(&self.config, operation, || client.run(statement)).await
    }

    async fn fetch(&self, operation: &str, statement: &Statement) -> Result<Vec<Record>, DatabaseError> {
        let client = self.client(operation)?;
        with_retry(&self.config, operation, || client.fetch(statement)).await
    }

    fn invalid(&self, operation: &str, message: String) -> DatabaseError {
        DatabaseError::Query {
            operation: operation.to_string(),
            target: self.config.target(),
            message,
        }
    }

    /// Round-trip a trivial statement
    pub async fn ping(&mut self) -> Result<(), DatabaseError> {
        self.fetch("ping", &cypher::ping()).await.map(|_| ())
    }

    /// Delete all relationships, then all nodes
    pub async fn clear_database(&mut self) -> Result<(), DatabaseError> {
        self.run("clear database", &cypher::clear_relationships()).await?;
        self.run("clear database", &cypher::clear_nodes()).await?;
        info!(db = %self.config.target(), "Database cleared");
        Ok(())
    }

    /// Create the entity constraint and indexes if missing
    pub async fn create_constraints(&mut self) -> Result<(), DatabaseError> {
        for statement in cypher::constraints() {
            self.run("create constraints", &statement).await?;
        }
        Ok(())
    }

    /// Import triples as `Entity` nodes and `RELATES_TO` edges
    ///
    /// Malformed triples are skipped and counted. Entities are merged before
    /// relationships, each in batches of `batch_size`.
    pub async fn import_triples(
        &mut self,
        triples: &[Triple],
        clear_first: bool,
    ) -> Result<ImportReport, DatabaseError> {
        self.client("import")?;
        let well_formed: Vec<Triple> = triples
            .iter()
            .filter(|t| {
                let ok = t.is_well_formed();
                if !ok {
                    warn!(triple = %t, "Skipping malformed triple");
                }
                ok
            })
            .cloned()
            .collect();
        let skipped = triples.len() - well_formed.len();

        if clear_first {
            self.clear_database().await?;
        }
        self.create_constraints().await?;

        let (entities, relationships) = cypher::rows_for(&well_formed);
        let batch_size = self.config.batch_size.max(1);
        let mut batches = 0;

        for batch in entities.chunks(batch_size) {
            self.run("import entities", &cypher::merge_entities(batch)).await?;
            batches += 1;
        }
        for batch in relationships.chunks(batch_size) {
            self.run("import relationships", &cypher::merge_relationships(batch))
                .await?;
            batches += 1;
        }

        let inferred = well_formed.iter().filter(|t| t.inferred).count();
        let metadata = cypher::store_metadata(
            &self.config.graph_name,
            entities.len(),
            relationships.len(),
            inferred,
        );
        self.run("store metadata", &metadata).await?;

        let report = ImportReport {
            entities: entities.len(),
            relationships: relationships.len(),
            skipped,
            batches,
        };
        info!(
            entities = report.entities,
            relationships = report.relationships,
            skipped = report.skipped,
            "Imported triples into Neo4j"
        );
        Ok(report)
    }

    /// Entity counts and types
    pub async fn entity_statistics(&mut self) -> Result<EntityStatistics, DatabaseError> {
        let operation = "entity statistics";
        let records = self.fetch(operation, &cypher::entity_statistics()).await?;
        let rows = decode(records, operation, &self.config.target())?;
        Ok(rows.into_iter().next().unwrap_or_default())
    }

    /// Relationship counts by provenance
    pub async fn relationship_statistics(&mut self) -> Result<RelationshipStatistics, DatabaseError> {
        let operation = "relationship statistics";
        let records = self.fetch(operation, &cypher::relationship_statistics()).await?;
        let rows = decode(records, operation, &self.config.target())?;
        Ok(rows.into_iter().next().unwrap_or_default())
    }

    /// Shortest path of at most `max_len` hops, `None` if there is none
    pub async fn shortest_path(
        &mut self,
        start: &str,
        end: &str,
        max_len: u32,
    ) -> Result<Option<GraphPath>, DatabaseError> {
        let operation = "shortest path";
        if !(1..=MAX_HOPS).contains(&max_len) {
            return Err(self.invalid(
                operation,
                format!("max length must be between 1 and {}, got {}", MAX_HOPS, max_len),
            ));
        }
        let records = self
            .fetch(operation, &cypher::shortest_path(start, end, max_len))
            .await?;
        let paths: Vec<GraphPath> = decode(records, operation, &self.config.target())?;
        Ok(paths.into_iter().next())
    }

    /// Entities within `depth` hops of `center` and its direct relationships
    pub async fn neighborhood(&mut self, center: &str, depth: u32) -> Result<Neighborhood, DatabaseError> {
        let operation = "neighborhood";
        if !(1..=MAX_HOPS).contains(&depth) {
            return Err(self.invalid(
                operation,
                format!("depth must be between 1 and {}, got {}", MAX_HOPS, depth),
            ));
        }
        let target = self.config.target();
        let entities = self
            .fetch(operation, &cypher::neighborhood_entities(center, depth))
            .await?;
        let relationships = self
            .fetch(operation, &cypher::neighborhood_relationships(center))
            .await?;
        Ok(Neighborhood {
            center: center.to_string(),
            depth,
            entities: decode(entities, operation, &target)?,
            relationships: decode(relationships, operation, &target)?,
        })
    }
}
