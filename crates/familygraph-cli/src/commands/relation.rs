//! Explicit relation commands

use clap::{Args, Subcommand};

use crate::output::{table, to_json, OutputFormat};
use crate::{AppContext, Cli};
use familygraph_core::{EdgeId, EdgeStore, PersonId, RelationEdge, RelationType};

#[derive(Args)]
pub struct RelationArgs {
    #[command(subcommand)]
    pub command: RelationCommands,
}

#[derive(Subcommand)]
pub enum RelationCommands {
    /// Record that FROM is TYPE of TO; the reverse edge is added too
    Add {
        from: String,
        to: String,
        /// Relation type, e.g. FATHER, WIFE, YOUNGER_BROTHER
        #[arg(short = 't', long = "type")]
        r#type: String,
    },
    /// Delete an edge and its reverse
    Delete {
        edge_id: String,
    },
    /// List edges in the family, or those leaving one person
    List {
        #[arg(short, long)]
        person: Option<String>,
    },
}

fn edge_rows(edges: &[RelationEdge]) -> Vec<Vec<String>> {
    edges
        .iter()
        .map(|e| {
            vec![
                e.id.to_string(),
                e.from_id.to_string(),
                e.relation_type.to_string(),
                e.to_id.to_string(),
            ]
        })
        .collect()
}

const EDGE_HEADERS: [&str; 4] = ["ID", "FROM", "TYPE", "TO"];

pub async fn run(args: &RelationArgs, cli: &Cli, ctx: &AppContext) -> anyhow::Result<()> {
    let format = cli.output_format();
    let family = ctx.family()?;

    match &args.command {
        RelationCommands::Add { from, to, r#type } => {
            let from: PersonId = from.parse()?;
            let to: PersonId = to.parse()?;
            let relation_type: RelationType = r#type.to_uppercase().parse()?;

            let pair = ctx
                .engine
                .create_explicit_relationship(&family, &from, &to, relation_type)
                .await?;
            match format {
                OutputFormat::Json => println!("{}", to_json(&pair)?),
                OutputFormat::Table => {
                    let edges = [pair.forward, pair.reverse];
                    println!("{}", table(&EDGE_HEADERS, &edge_rows(&edges)));
                }
            }
        }
        RelationCommands::Delete { edge_id } => {
            let id: EdgeId = edge_id.parse()?;
            let deleted = ctx.engine.delete_explicit_relationship(&family, &id).await?;
            match format {
                OutputFormat::Json => println!("{}", to_json(&deleted)?),
                OutputFormat::Table => match deleted.deleted_reverse {
                    Some(reverse) => println!("Deleted edge {} and its reverse {}", id, reverse),
                    None => println!("Deleted edge {}", id),
                },
            }
        }
        RelationCommands::List { person } => {
            let edges = match person {
                Some(person) => {
                    let person: PersonId = person.parse()?;
                    ctx.engine.get_person(&person).await?;
                    ctx.engine.store().edges_from(&person, None).await?
                }
                None => ctx.engine.store().all_edges(&family).await?,
            };

            if format == OutputFormat::Json {
                println!("{}", to_json(&edges)?);
            } else if edges.is_empty() {
                println!("No relations found");
            } else {
                println!("{}", table(&EDGE_HEADERS, &edge_rows(&edges)));
            }
        }
    }

    Ok(())
}
