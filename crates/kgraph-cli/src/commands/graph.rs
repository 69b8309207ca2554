//! Graph command implementation.

use crate::cli::{GraphAction, GraphArgs};
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use kgraph_neo4j::{CypherClient, Neo4jAdapter};
use tokio::runtime::Runtime;

/// Execute a graph query against Neo4j.
pub fn execute_graph(
    args: GraphArgs,
    mut config: Config,
    runtime: &Runtime,
    formatter: &Formatter,
) -> Result<usize> {
    args.neo4j.apply(&mut config);
    config.neo4j.validate().map_err(CliError::Config)?;

    let output = runtime.block_on(async {
        let mut adapter = Neo4jAdapter::connect(config.neo4j.clone()).await?;
        let output = query(&mut adapter, &args.action, formatter).await;
        adapter.close();
        output
    })?;
    println!("{}", output);
    Ok(0)
}

/// Run `action` and render its result.
pub async fn query<C: CypherClient>(
    adapter: &mut Neo4jAdapter<C>,
    action: &GraphAction,
    formatter: &Formatter,
) -> Result<String> {
    match action {
        GraphAction::Stats => {
            let entities = adapter.entity_statistics().await?;
            let relationships = adapter.relationship_statistics().await?;
            formatter.database_stats(&entities, &relationships)
        }
        GraphAction::Path {
            from,
            to,
            max_length,
        } => {
            let path = adapter.shortest_path(from, to, *max_length).await?;
            formatter.path(from, to, path.as_ref())
        }
        GraphAction::Neighborhood { entity, depth } => {
            let neighborhood = adapter.neighborhood(entity, *depth).await?;
            formatter.neighborhood(&neighborhood)
        }
    }
}
