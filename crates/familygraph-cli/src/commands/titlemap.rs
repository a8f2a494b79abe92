//! Custom title map commands

use clap::{Args, Subcommand};

use crate::output::{table, to_json, OutputFormat};
use crate::{AppContext, Cli};
use familygraph_core::{PathKey, TitleMap, TitleMapId, TitleMapUpdate};

#[derive(Args)]
pub struct TitlemapArgs {
    #[command(subcommand)]
    pub command: TitlemapCommands,
}

#[derive(Subcommand)]
pub enum TitlemapCommands {
    /// Create a title map in the current family
    Create {
        name: String,
        #[arg(long)]
        description: Option<String>,
        /// Visible to every member of the family
        #[arg(long)]
        shared: bool,
        /// Override as PATH_KEY=TITLE (repeatable)
        #[arg(long = "set", value_name = "PATH_KEY=TITLE")]
        overrides: Vec<String>,
    },
    /// List title maps in the current family
    List,
    /// Show a title map with its overrides
    Show {
        id: String,
    },
    /// Add or replace one override
    Set {
        id: String,
        path_key: String,
        title: String,
    },
    /// Remove one override
    Unset {
        id: String,
        path_key: String,
    },
    /// Delete a title map
    Delete {
        id: String,
    },
}

fn parse_override(raw: &str) -> anyhow::Result<(String, String)> {
    let Some((key, title)) = raw.split_once('=') else {
        anyhow::bail!("Expected PATH_KEY=TITLE, got: {}", raw);
    };
    let key: PathKey = key.trim().parse()?;
    Ok((key.to_string(), title.trim().to_string()))
}

fn print_map(map: &TitleMap, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => println!("{}", to_json(map)?),
        OutputFormat::Table => {
            println!("Title map '{}' ({})", map.name, map.id);
            if let Some(description) = &map.description {
                println!("  {}", description);
            }
            println!("  Shared: {}", map.is_shared);
            if map.overrides.is_empty() {
                println!("  No overrides");
            } else {
                let rows: Vec<Vec<String>> = map
                    .overrides
                    .iter()
                    .map(|(key, title)| vec![key.clone(), title.clone()])
                    .collect();
                println!("{}", table(&["PATH KEY", "TITLE"], &rows));
            }
        }
    }
    Ok(())
}

pub async fn run(args: &TitlemapArgs, cli: &Cli, ctx: &AppContext) -> anyhow::Result<()> {
    let format = cli.output_format();

    match &args.command {
        TitlemapCommands::Create {
            name,
            description,
            shared,
            overrides,
        } => {
            let family = ctx.family()?;
            let mut map = TitleMap::new(family, name.as_str()).shared(*shared);
            if let Some(description) = description {
                map = map.with_description(description.as_str());
            }
            for raw in overrides {
                let (key, title) = parse_override(raw)?;
                map = map.with_override(key, title);
            }

            let map = ctx.engine.create_title_map(map).await?;
            match format {
                OutputFormat::Json => println!("{}", to_json(&map)?),
                OutputFormat::Table => println!("Created title map {} ({})", map.name, map.id),
            }
        }
        TitlemapCommands::List => {
            let family = ctx.family()?;
            let maps = ctx.engine.list_title_maps(&family).await?;
            if format == OutputFormat::Json {
                println!("{}", to_json(&maps)?);
            } else if maps.is_empty() {
                println!("No title maps in this family");
            } else {
                let rows: Vec<Vec<String>> = maps
                    .iter()
                    .map(|m| {
                        vec![
                            m.id.to_string(),
                            m.name.clone(),
                            m.overrides.len().to_string(),
                            if m.is_shared { "yes" } else { "no" }.to_string(),
                        ]
                    })
                    .collect();
                println!("{}", table(&["ID", "NAME", "OVERRIDES", "SHARED"], &rows));
            }
        }
        TitlemapCommands::Show { id } => {
            let map = ctx.engine.get_title_map(&id.parse()?).await?;
            print_map(&map, format)?;
        }
        TitlemapCommands::Set { id, path_key, title } => {
            let id: TitleMapId = id.parse()?;
            let key: PathKey = path_key.parse()?;
            let mut overrides = ctx.engine.get_title_map(&id).await?.overrides;
            overrides.insert(key.to_string(), title.trim().to_string());

            let update = TitleMapUpdate {
                overrides: Some(overrides),
                ..Default::default()
            };
            let map = ctx.engine.update_title_map(&id, update).await?;
            print_map(&map, format)?;
        }
        TitlemapCommands::Unset { id, path_key } => {
            let id: TitleMapId = id.parse()?;
            let mut overrides = ctx.engine.get_title_map(&id).await?.overrides;
            if overrides.remove(path_key.as_str()).is_none() {
                anyhow::bail!("Title map {} has no override for {}", id, path_key);
            }

            let update = TitleMapUpdate {
                overrides: Some(overrides),
                ..Default::default()
            };
            let map = ctx.engine.update_title_map(&id, update).await?;
            print_map(&map, format)?;
        }
        TitlemapCommands::Delete { id } => {
            let id: TitleMapId = id.parse()?;
            ctx.engine.delete_title_map(&id).await?;
            println!("Deleted title map {}", id);
        }
    }

    Ok(())
}
