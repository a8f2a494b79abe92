//! Title commands

use clap::{Args, Subcommand};

use crate::output::{table, to_json, OutputFormat};
use crate::{AppContext, Cli};
use familygraph_core::{FamilyId, PathKey, PersonId, TitleMap};
use serde::Serialize;

#[derive(Args)]
pub struct TitleArgs {
    #[command(subcommand)]
    pub command: TitleCommands,
}

#[derive(Subcommand)]
pub enum TitleCommands {
    /// What VIEWER calls TARGET
    Get {
        viewer: String,
        target: String,
        /// Custom title map to apply
        #[arg(short = 'm', long)]
        title_map: Option<String>,
    },
    /// Titles of everyone in the family as seen by VIEWER
    Graph {
        viewer: String,
        #[arg(short = 'm', long)]
        title_map: Option<String>,
    },
    /// Look up a path key such as FATHER>OLDER_BROTHER|male in the standard catalog
    Lookup {
        path_key: String,
    },
}

#[derive(Serialize)]
struct GraphEntry<'a> {
    person_id: String,
    name: &'a str,
    title: &'a str,
    path_key: Option<&'a str>,
}

async fn load_title_map(
    ctx: &AppContext,
    family: &FamilyId,
    id: Option<&str>,
) -> anyhow::Result<Option<TitleMap>> {
    match id {
        Some(id) => Ok(Some(ctx.engine.title_map_in_family(family, &id.parse()?).await?)),
        None => Ok(None),
    }
}

pub async fn run(args: &TitleArgs, cli: &Cli, ctx: &AppContext) -> anyhow::Result<()> {
    let format = cli.output_format();

    match &args.command {
        TitleCommands::Get {
            viewer,
            target,
            title_map,
        } => {
            let family = ctx.family()?;
            let viewer: PersonId = viewer.parse()?;
            let target: PersonId = target.parse()?;
            let overrides = load_title_map(ctx, &family, title_map.as_deref()).await?;

            let resolution = ctx
                .engine
                .resolve_title_for(&family, &viewer, &target, &overrides)
                .await?;
            match format {
                OutputFormat::Json => println!("{}", to_json(&resolution)?),
                OutputFormat::Table => {
                    println!("{}", resolution.title);
                    if let Some(key) = &resolution.path_key {
                        println!("  path: {} ({} hops, {})", key, resolution.hops, resolution.source);
                    }
                }
            }
        }
        TitleCommands::Graph { viewer, title_map } => {
            let family = ctx.family()?;
            let viewer: PersonId = viewer.parse()?;
            let overrides = load_title_map(ctx, &family, title_map.as_deref()).await?;

            let graph = ctx
                .engine
                .resolve_graph_titles(&family, &viewer, &overrides)
                .await?;
            let persons = ctx.engine.list_persons(&family).await?;
            tracing::debug!(
                "Visited {} nodes over {} edges",
                graph.stats.nodes_visited,
                graph.stats.edges_traversed
            );

            let entries: Vec<GraphEntry> = persons
                .iter()
                .filter_map(|person| {
                    graph.titles.get(&person.id).map(|resolution| GraphEntry {
                        person_id: person.id.to_string(),
                        name: &person.name,
                        title: &resolution.title,
                        path_key: resolution.path_key.as_deref(),
                    })
                })
                .collect();

            match format {
                OutputFormat::Json => println!("{}", to_json(&entries)?),
                OutputFormat::Table => {
                    let rows: Vec<Vec<String>> = entries
                        .iter()
                        .map(|e| {
                            vec![
                                e.person_id.clone(),
                                e.name.to_string(),
                                e.title.to_string(),
                                e.path_key.unwrap_or("").to_string(),
                            ]
                        })
                        .collect();
                    println!("{}", table(&["ID", "NAME", "TITLE", "PATH"], &rows));
                }
            }
        }
        TitleCommands::Lookup { path_key } => {
            let key: PathKey = path_key.parse()?;
            let title = ctx.engine.title_catalog().lookup(&key.to_string());
            match (format, title) {
                (OutputFormat::Json, title) => println!(
                    "{}",
                    to_json(&serde_json::json!({ "path_key": key.to_string(), "title": title }))?
                ),
                (OutputFormat::Table, Some(title)) => println!("{}", title),
                (OutputFormat::Table, None) => {
                    anyhow::bail!("No standard title for path key: {}", key)
                }
            }
        }
    }

    Ok(())
}
