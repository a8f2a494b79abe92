//! Family commands

use clap::{Args, Subcommand};

use crate::output::{table, to_json, OutputFormat};
use crate::{AppContext, Cli};
use familygraph_core::{EdgeStore, FamilyId};

#[derive(Args)]
pub struct FamilyArgs {
    #[command(subcommand)]
    pub command: FamilyCommands,
}

#[derive(Subcommand)]
pub enum FamilyCommands {
    /// Create a new family
    Create {
        /// Family name
        name: String,
        /// Also make it the default family
        #[arg(long)]
        r#use: bool,
    },
    /// List all families
    List,
    /// Show a family (default: current family)
    Show {
        id: Option<String>,
    },
    /// Set the default family
    Use {
        id: String,
    },
    /// Delete a family with all of its persons, relations and title maps
    Delete {
        id: String,
        /// Force deletion without confirmation
        #[arg(long)]
        force: bool,
    },
}

pub async fn run(args: &FamilyArgs, cli: &Cli, ctx: &AppContext) -> anyhow::Result<()> {
    tracing::debug!("Running family command");
    let format = cli.output_format();

    match &args.command {
        FamilyCommands::Create { name, r#use } => {
            let family = ctx.engine.create_family(name).await?;
            if *r#use {
                set_default_family(ctx, &family.id)?;
            }
            match format {
                OutputFormat::Json => println!("{}", to_json(&family)?),
                OutputFormat::Table => println!("Created family {} ({})", family.name, family.id),
            }
        }
        FamilyCommands::List => {
            let families = ctx.engine.list_families().await?;
            if format == OutputFormat::Json {
                println!("{}", to_json(&families)?);
            } else if families.is_empty() {
                println!("No families found. Create one with 'familygraph family create <name>'");
            } else {
                let current = ctx.config.default_family.as_deref();
                let rows: Vec<Vec<String>> = families
                    .iter()
                    .map(|f| {
                        let id = f.id.to_string();
                        let marker = if Some(id.as_str()) == current { "*" } else { "" };
                        vec![marker.to_string(), id, f.name.clone(), f.created_at.to_rfc3339()]
                    })
                    .collect();
                println!("{}", table(&["", "ID", "NAME", "CREATED"], &rows));
            }
        }
        FamilyCommands::Show { id } => {
            let id: FamilyId = match id {
                Some(id) => id.parse()?,
                None => ctx.family()?,
            };
            let family = ctx.engine.get_family(&id).await?;
            let persons = ctx.engine.list_persons(&id).await?;
            let edges = ctx.engine.store().all_edges(&id).await?;

            match format {
                OutputFormat::Json => println!(
                    "{}",
                    to_json(&serde_json::json!({
                        "family": family,
                        "persons": persons.len(),
                        "relations": edges.len(),
                    }))?
                ),
                OutputFormat::Table => {
                    println!("Family '{}' ({})", family.name, family.id);
                    println!("  Created: {}", family.created_at);
                    println!("  Persons: {}", persons.len());
                    println!("  Relations: {}", edges.len());
                }
            }
        }
        FamilyCommands::Use { id } => {
            let id: FamilyId = id.parse()?;
            let family = ctx.engine.get_family(&id).await?;
            set_default_family(ctx, &family.id)?;
            println!("Default family is now '{}' ({})", family.name, family.id);
        }
        FamilyCommands::Delete { id, force } => {
            let id: FamilyId = id.parse()?;
            let family = ctx.engine.get_family(&id).await?;

            if !force {
                let persons = ctx.engine.list_persons(&id).await?.len();
                println!("Family '{}' has {} persons", family.name, persons);
                println!("Use --force to confirm deletion");
                return Ok(());
            }

            ctx.engine.delete_family(&id).await?;
            println!("Deleted family '{}' ({})", family.name, family.id);
        }
    }

    Ok(())
}

fn set_default_family(ctx: &AppContext, id: &FamilyId) -> anyhow::Result<()> {
    let mut config = ctx.config.clone();
    config.default_family = Some(id.to_string());
    config.save()
}
