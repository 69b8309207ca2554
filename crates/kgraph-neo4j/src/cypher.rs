//! Parameterized Cypher statements
//!
//! Values taken from triples or user input only ever travel in
//! [`Statement::params`]. The only values formatted into statement text are
//! hop counts, which are clamped integers.

use kgraph_domain::{normalize_name, Triple};
use serde_json::{json, Value};
use std::collections::{BTreeMap, HashMap};

/// Longest variable-length pattern a statement may contain
pub const MAX_HOPS: u32 = 15;

/// A Cypher statement with its parameters and expected result columns
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    /// Cypher text
    pub text: String,
    /// Named parameters
    pub params: BTreeMap<String, Value>,
    /// Columns read from each returned record
    pub columns: Vec<String>,
}

impl Statement {
    fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            params: BTreeMap::new(),
            columns: Vec::new(),
        }
    }

    fn param(mut self, name: &str, value: Value) -> Self {
        self.params.insert(name.to_string(), value);
        self
    }

    fn columns(mut self, columns: &[&str]) -> Self {
        self.columns = columns.iter().map(|c| c.to_string()).collect();
        self
    }
}

/// Rule-based entity type from naming patterns
///
/// Keywords of four letters or more match anywhere in the lowercased name;
/// shorter ones (`ai`, `dr.`) must be a whole word.
pub fn infer_entity_type(name: &str) -> &'static str {
    const RULES: &[(&str, &[&str])] = &[
        ("Person", &["john", "mary", "james", "smith", "dr.", "mr.", "ms."]),
        ("Location", &["city", "country", "state", "street", "america", "europe", "asia"]),
        ("Technology", &["engine", "machine", "computer", "ai", "software", "technology"]),
        ("Organization", &["company", "corporation", "university", "institute", "organization"]),
        ("Concept", &["theory", "concept", "principle", "method", "process"]),
    ];

    let lower = name.to_lowercase();
    let words: Vec<&str> = lower.split_whitespace().collect();
    for (entity_type, keywords) in RULES {
        let hit = keywords.iter().any(|kw| {
            if kw.len() >= 4 {
                lower.contains(kw)
            } else {
                words.iter().any(|w| w == kw)
            }
        });
        if hit {
            return entity_type;
        }
    }
    "General"
}

/// A node row for [`merge_entities`]
#[derive(Debug, Clone, PartialEq)]
pub struct EntityRow {
    /// Normalized key
    pub name: String,
    /// First spelling seen
    pub display_name: String,
    /// Inferred type
    pub entity_type: &'static str,
    /// Triples touching the entity
    pub relationship_count: usize,
}

/// An edge row for [`merge_relationships`]
#[derive(Debug, Clone, PartialEq)]
pub struct RelationshipRow {
    /// Subject key
    pub subject: String,
    /// Predicate as extracted, trimmed
    pub predicate: String,
    /// Object key
    pub object: String,
    /// Inferred flag
    pub inferred: bool,
    /// Source chunk, 0 when unknown
    pub chunk: usize,
    /// Explicit confidence, if any
    pub confidence: Option<f64>,
}

/// Entity and relationship rows for well-formed triples, in first-seen order
pub fn rows_for(triples: &[Triple]) -> (Vec<EntityRow>, Vec<RelationshipRow>) {
    let mut entities: Vec<EntityRow> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut relationships = Vec::with_capacity(triples.len());

    for triple in triples {
        for name in [&triple.subject, &triple.object] {
            let key = normalize_name(name);
            let slot = *index.entry(key.clone()).or_insert_with(|| {
                let display_name = name.trim().to_string();
                entities.push(EntityRow {
                    entity_type: infer_entity_type(&display_name),
                    name: key,
                    display_name,
                    relationship_count: 0,
                });
                entities.len() - 1
            });
            entities[slot].relationship_count += 1;
        }
        relationships.push(RelationshipRow {
            subject: triple.subject_key(),
            predicate: triple.predicate.trim().to_string(),
            object: triple.object_key(),
            inferred: triple.inferred,
            chunk: triple.chunk.unwrap_or(0),
            confidence: triple.confidence,
        });
    }
    (entities, relationships)
}

/// Lowercased predicate with spaces as underscores
fn predicate_normalized(predicate: &str) -> String {
    predicate.to_lowercase().replace(' ', "_")
}

/// Connectivity check
pub fn ping() -> Statement {
    Statement::new("RETURN 1 AS ok").columns(&["ok"])
}

/// Delete every relationship
pub fn clear_relationships() -> Statement {
    Statement::new("MATCH ()-[r]-() DELETE r")
}

/// Delete every node
pub fn clear_nodes() -> Statement {
    Statement::new("MATCH (n) DELETE n")
}

/// Uniqueness constraint and indexes used by import and reads
pub fn constraints() -> Vec<Statement> {
    [
        "CREATE CONSTRAINT entity_name_unique IF NOT EXISTS FOR (e:Entity) REQUIRE e.name IS UNIQUE",
        "CREATE INDEX entity_type_index IF NOT EXISTS FOR (e:Entity) ON (e.type)",
        "CREATE INDEX relationship_predicate_index IF NOT EXISTS FOR ()-[r:RELATES_TO]-() ON (r.predicate)",
        "CREATE INDEX relationship_inferred_index IF NOT EXISTS FOR ()-[r:RELATES_TO]-() ON (r.inferred)",
    ]
    .into_iter()
    .map(Statement::new)
    .collect()
}

/// Upsert a batch of entities keyed by normalized name
pub fn merge_entities(batch: &[EntityRow]) -> Statement {
    let rows: Vec<Value> = batch
        .iter()
        .map(|e| {
            json!({
                "name": e.name,
                "display_name": e.display_name,
                "type": e.entity_type,
                "relationship_count": e.relationship_count,
            })
        })
        .collect();

    Statement::new(
        "UNWIND $entities AS entity \
         MERGE (e:Entity {name: entity.name}) \
         ON CREATE SET e.display_name = entity.display_name, e.created_at = datetime() \
         SET e.type = entity.type, \
             e.relationship_count = entity.relationship_count, \
             e.updated_at = datetime()",
    )
    .param("entities", Value::Array(rows))
}

/// Upsert a batch of relationships keyed by (subject, predicate, object)
pub fn merge_relationships(batch: &[RelationshipRow]) -> Statement {
    let rows: Vec<Value> = batch
        .iter()
        .map(|r| {
            json!({
                "subject": r.subject,
                "predicate": r.predicate,
                "object": r.object,
                "inferred": r.inferred,
                "chunk": r.chunk,
                "confidence": r.confidence,
                "predicate_normalized": predicate_normalized(&r.predicate),
            })
        })
        .collect();

    Statement::new(
        "UNWIND $triples AS triple \
         MATCH (s:Entity {name: triple.subject}) \
         MATCH (o:Entity {name: triple.object}) \
         MERGE (s)-[r:RELATES_TO {predicate: triple.predicate}]->(o) \
         SET r.inferred = triple.inferred, \
             r.chunk = triple.chunk, \
             r.confidence = triple.confidence, \
             r.predicate_normalized = triple.predicate_normalized",
    )
    .param("triples", Value::Array(rows))
}

/// Record the import on a single metadata node
pub fn store_metadata(graph_name: &str, nodes: usize, edges: usize, inferred_edges: usize) -> Statement {
    Statement::new(
        "MERGE (meta:Metadata {type: 'knowledge_graph'}) \
         SET meta.graph_name = $graph_name, \
             meta.nodes = $nodes, \
             meta.edges = $edges, \
             meta.original_edges = $original_edges, \
             meta.inferred_edges = $inferred_edges, \
             meta.import_date = datetime(), \
             meta.version = '1.0'",
    )
    .param("graph_name", json!(graph_name))
    .param("nodes", json!(nodes))
    .param("edges", json!(edges))
    .param("original_edges", json!(edges.saturating_sub(inferred_edges)))
    .param("inferred_edges", json!(inferred_edges))
}

/// Entity counts and types
pub fn entity_statistics() -> Statement {
    Statement::new(
        "MATCH (e:Entity) \
         RETURN count(e) AS total_entities, \
                collect(DISTINCT e.type) AS entity_types, \
                avg(e.relationship_count) AS avg_relationships, \
                max(e.relationship_count) AS max_relationships, \
                min(e.relationship_count) AS min_relationships",
    )
    .columns(&[
        "total_entities",
        "entity_types",
        "avg_relationships",
        "max_relationships",
        "min_relationships",
    ])
}

/// Relationship counts by provenance
pub fn relationship_statistics() -> Statement {
    Statement::new(
        "MATCH ()-[r:RELATES_TO]->() \
         RETURN count(r) AS total_relationships, \
                count(CASE WHEN r.inferred = true THEN 1 END) AS inferred_relationships, \
                count(CASE WHEN r.inferred = false THEN 1 END) AS original_relationships, \
                collect(DISTINCT r.predicate)[0..10] AS sample_predicates",
    )
    .columns(&[
        "total_relationships",
        "inferred_relationships",
        "original_relationships",
        "sample_predicates",
    ])
}

/// Shortest undirected path between two entities, at most `max_len` hops
pub fn shortest_path(start: &str, end: &str, max_len: u32) -> Statement {
    let hops = max_len.clamp(1, MAX_HOPS);
    Statement::new(format!(
        "MATCH (start:Entity {{name: $start}}), (end:Entity {{name: $end}}) \
         MATCH path = shortestPath((start)-[*..{}]-(end)) \
         RETURN [n IN nodes(path) | n.display_name] AS nodes, \
                [r IN relationships(path) | r.predicate] AS predicates, \
                length(path) AS length",
        hops
    ))
    .param("start", json!(normalize_name(start)))
    .param("end", json!(normalize_name(end)))
    .columns(&["nodes", "predicates", "length"])
}

/// Entities within `depth` hops of `center`
pub fn neighborhood_entities(center: &str, depth: u32) -> Statement {
    let hops = depth.clamp(1, MAX_HOPS);
    Statement::new(format!(
        "MATCH (center:Entity {{name: $center}})-[*1..{}]-(neighbor:Entity) \
         WHERE neighbor <> center \
         RETURN DISTINCT neighbor.display_name AS name, neighbor.type AS type \
         ORDER BY name",
        hops
    ))
    .param("center", json!(normalize_name(center)))
    .columns(&["name", "type"])
}

/// Relationships touching `center` directly
pub fn neighborhood_relationships(center: &str) -> Statement {
    Statement::new(
        "MATCH (center:Entity {name: $center})-[r:RELATES_TO]-(:Entity) \
         RETURN DISTINCT startNode(r).display_name AS subject, \
                r.predicate AS predicate, \
                endNode(r).display_name AS object, \
                r.inferred AS inferred \
         ORDER BY subject, predicate, object",
    )
    .param("center", json!(normalize_name(center)))
    .columns(&["subject", "predicate", "object", "inferred"])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_types() {
        assert_eq!(infer_entity_type("James Watt"), "Person");
        assert_eq!(infer_entity_type("steam engine"), "Technology");
        assert_eq!(infer_entity_type("AI"), "Technology");
        assert_eq!(infer_entity_type("Maine"), "General");
        assert_eq!(infer_entity_type("Glasgow University"), "Organization");
        assert_eq!(infer_entity_type("theory of heat"), "Concept");
    }

    #[test]
    fn test_rows_merge_by_normalized_name() {
        let triples = vec![
            Triple::new("James Watt", "improved", "Steam Engine"),
            Triple::new("steam engine", "powered", "mill").with_chunk(2),
        ];
        let (entities, relationships) = rows_for(&triples);

        assert_eq!(entities.len(), 3);
        assert_eq!(entities[1].name, "steam engine");
        assert_eq!(entities[1].display_name, "Steam Engine");
        assert_eq!(entities[1].relationship_count, 2);
        assert_eq!(relationships[0].object, "steam engine");
        assert_eq!(relationships[1].chunk, 2);
    }

    #[test]
    fn test_user_values_only_in_params() {
        let hostile = "x'}) DETACH DELETE n //";
        let statements = vec![
            shortest_path(hostile, "b", 5),
            neighborhood_entities(hostile, 2),
            neighborhood_relationships(hostile),
            merge_entities(&rows_for(&[Triple::new(hostile, hostile, "b")]).0),
            merge_relationships(&rows_for(&[Triple::new(hostile, hostile, "b")]).1),
            store_metadata(hostile, 1, 1, 0),
        ];
        for statement in statements {
            assert!(!statement.text.contains("DETACH"), "{}", statement.text);
            assert!(!statement.params.is_empty());
        }
    }

    #[test]
    fn test_hops_are_clamped() {
        assert!(shortest_path("a", "b", 0).text.contains("[*..1]"));
        assert!(shortest_path("a", "b", 99).text.contains("[*..15]"));
        assert!(neighborhood_entities("a", 3).text.contains("[*1..3]"));
    }

    #[test]
    fn test_relationship_row_params() {
        let (_, rows) = rows_for(&[Triple::new("A", "Worked With", "B").inferred()]);
        let statement = merge_relationships(&rows);
        let row = &statement.params["triples"][0];
        assert_eq!(row["predicate_normalized"], "worked_with");
        assert_eq!(row["inferred"], true);
        assert_eq!(row["confidence"], Value::Null);
    }
}
