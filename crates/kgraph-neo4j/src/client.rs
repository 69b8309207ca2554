//! Database client seam and its Bolt implementation

use crate::config::Neo4jConfig;
use crate::cypher::Statement;
use crate::error::{ClientError, ClientErrorKind};
use async_trait::async_trait;
use neo4rs::{BoltList, BoltMap, BoltNull, BoltString, BoltType, ConfigBuilder, Graph};
use serde_json::Value;
use std::collections::{BTreeMap, VecDeque};
use std::sync::{Arc, Mutex};

/// One returned row, keyed by column name
pub type Record = BTreeMap<String, Value>;

/// Executes Cypher statements
#[async_trait]
pub trait CypherClient: Send + Sync {
    /// Run a statement, discarding results
    async fn run(&self, statement: &Statement) -> Result<(), ClientError>;

    /// Run a statement and read `statement.columns` from every row
    async fn fetch(&self, statement: &Statement) -> Result<Vec<Record>, ClientError>;
}

/// [`CypherClient`] over a pooled `neo4rs` connection
pub struct BoltClient {
    graph: Graph,
    timeout: std::time::Duration,
}

/// Convert a JSON parameter to a Bolt value
fn to_bolt(value: &Value) -> BoltType {
    match value {
        Value::Null => BoltType::Null(BoltNull),
        Value::Bool(b) => BoltType::from(*b),
        Value::Number(n) => match n.as_i64() {
            Some(i) => BoltType::from(i),
            None => BoltType::from(n.as_f64().unwrap_or(0.0)),
        },
        Value::String(s) => BoltType::from(s.as_str()),
        Value::Array(items) => {
            let mut list = BoltList::with_capacity(items.len());
            for item in items {
                list.push(to_bolt(item));
            }
            BoltType::List(list)
        }
        Value::Object(fields) => {
            let mut map = BoltMap::with_capacity(fields.len());
            for (key, item) in fields {
                map.put(BoltString::from(key.as_str()), to_bolt(item));
            }
            BoltType::Map(map)
        }
    }
}

fn classify(error: neo4rs::Error) -> ClientError {
    let kind = match &error {
        neo4rs::Error::AuthenticationError(..) => ClientErrorKind::Authentication,
        neo4rs::Error::IOError { .. } | neo4rs::Error::ConnectionError => {
            ClientErrorKind::Connection
        }
        _ => ClientErrorKind::Query,
    };
    ClientError::new(kind, error.to_string())
}

impl BoltClient {
    /// Open a connection pool for `config`
    pub async fn connect(config: &Neo4jConfig) -> Result<Self, ClientError> {
        let bolt_config = ConfigBuilder::default()
            .uri(config.uri.as_str())
            .user(config.username.as_str())
            .password(config.password.as_str())
            .db(config.database.as_str())
            .build()
            .map_err(classify)?;
        let graph = Graph::connect(bolt_config).await.map_err(classify)?;
        Ok(Self {
            graph,
            timeout: config.query_timeout(),
        })
    }

    fn query(statement: &Statement) -> neo4rs::Query {
        statement
            .params
            .iter()
            .fold(neo4rs::query(&statement.text), |query, (name, value)| {
                query.param(name, to_bolt(value))
            })
    }

    fn timed_out(&self) -> ClientError {
        ClientError::new(
            ClientErrorKind::Timeout,
            format!("no response within {:?}", self.timeout),
        )
    }
}

#[async_trait]
impl CypherClient for BoltClient {
    async fn run(&self, statement: &Statement) -> Result<(), ClientError> {
        tokio::time::timeout(self.timeout, self.graph.run(Self::query(statement)))
            .await
            .map_err(|_| self.timed_out())?
            .map_err(classify)
    }

    async fn fetch(&self, statement: &Statement) -> Result<Vec<Record>, ClientError> {
        let read = async {
            let mut stream = self
                .graph
                .execute(Self::query(statement))
                .await
                .map_err(classify)?;
            let mut records = Vec::new();
            while let Some(row) = stream.next().await.map_err(classify)? {
                let mut record = Record::new();
                for column in &statement.columns {
                    let value = row.get::<Value>(column).map_err(|e| {
                        ClientError::new(
                            ClientErrorKind::Query,
                            format!("column '{}': {}", column, e),
                        )
                    })?;
                    record.insert(column.clone(), value);
                }
                records.push(record);
            }
            Ok(records)
        };

        tokio::time::timeout(self.timeout, read)
            .await
            .map_err(|_| self.timed_out())?
    }
}

/// Scripted in-memory client for tests
///
/// Answers are consumed in call order; once the script is exhausted every
/// `run` succeeds and every `fetch` returns no rows. Every statement is
/// recorded.
#[derive(Clone, Default)]
pub struct MockClient {
    script: Arc<Mutex<VecDeque<Result<Vec<Record>, ClientError>>>>,
    statements: Arc<Mutex<Vec<Statement>>>,
}

impl MockClient {
    /// Create a client with an empty script
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue rows for the next call
    pub fn push_records(&self, records: Vec<Record>) {
        if let Ok(mut script) = self.script.lock() {
            script.push_back(Ok(records));
        }
    }

    /// Queue a failure for the next call
    pub fn push_error(&self, kind: ClientErrorKind, message: &str) {
        if let Ok(mut script) = self.script.lock() {
            script.push_back(Err(ClientError::new(kind, message)));
        }
    }

    /// Statements received so far, including failed attempts
    pub fn statements(&self) -> Vec<Statement> {
        self.statements
            .lock()
            .map(|s| s.clone())
            .unwrap_or_default()
    }

    fn answer(&self, statement: &Statement) -> Result<Vec<Record>, ClientError> {
        if let Ok(mut seen) = self.statements.lock() {
            seen.push(statement.clone());
        }
        self.script
            .lock()
            .ok()
            .and_then(|mut script| script.pop_front())
            .unwrap_or_else(|| Ok(Vec::new()))
    }
}

#[async_trait]
impl CypherClient for MockClient {
    async fn run(&self, statement: &Statement) -> Result<(), ClientError> {
        self.answer(statement).map(|_| ())
    }

    async fn fetch(&self, statement: &Statement) -> Result<Vec<Record>, ClientError> {
        self.answer(statement)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cypher;
    use serde_json::json;

    #[test]
    fn test_json_params_convert_to_bolt() {
        let value = json!({"name": "a", "count": 2, "weight": 0.5, "tags": [true, null]});
        match to_bolt(&value) {
            BoltType::Map(map) => assert_eq!(map.value.len(), 4),
            other => panic!("expected map, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_mock_client_script_order() {
        let client = MockClient::new();
        client.push_error(ClientErrorKind::Timeout, "slow");
        let mut row = Record::new();
        row.insert("ok".into(), json!(1));
        client.push_records(vec![row]);

        assert!(client.run(&cypher::ping()).await.is_err());
        assert_eq!(client.fetch(&cypher::ping()).await.unwrap().len(), 1);
        assert!(client.fetch(&cypher::ping()).await.unwrap().is_empty());
        assert_eq!(client.statements().len(), 3);
    }
}
