//! Person commands

use clap::{Args, Subcommand};

use crate::output::{table, to_json, OutputFormat};
use crate::{AppContext, Cli};
use familygraph_core::{Gender, NewPerson, Person, PersonId, RelationType};

#[derive(Args)]
pub struct PersonArgs {
    #[command(subcommand)]
    pub command: PersonCommands,
}

#[derive(Subcommand)]
pub enum PersonCommands {
    /// Add a person, optionally attached to someone already in the tree
    Add {
        /// Display name
        name: String,
        /// Gender: male or female
        #[arg(short, long)]
        gender: String,
        /// Birth year
        #[arg(long)]
        birth_year: Option<i32>,
        /// Existing person the new one is related to
        #[arg(long, requires = "relation")]
        of: Option<String>,
        /// The new person is RELATION of --of (e.g. FATHER, OLDER_SISTER)
        #[arg(long = "as", value_name = "RELATION", requires = "of")]
        relation: Option<String>,
    },
    /// List persons in the family
    List,
    /// Show a person
    Show {
        id: String,
    },
    /// Delete a person and all of their relations
    Delete {
        id: String,
    },
}

fn person_row(person: &Person) -> Vec<String> {
    vec![
        person.id.to_string(),
        person.name.clone(),
        person.gender.to_string(),
        person.generation.to_string(),
        person.birth_year.map(|y| y.to_string()).unwrap_or_default(),
    ]
}

const PERSON_HEADERS: [&str; 5] = ["ID", "NAME", "GENDER", "GENERATION", "BORN"];

pub async fn run(args: &PersonArgs, cli: &Cli, ctx: &AppContext) -> anyhow::Result<()> {
    let format = cli.output_format();
    let family = ctx.family()?;
    tracing::debug!("Running person command in family {}", family);

    match &args.command {
        PersonCommands::Add {
            name,
            gender,
            birth_year,
            of,
            relation,
        } => {
            let gender: Gender = gender.parse()?;
            let mut new = NewPerson::new(name.as_str(), gender);
            if let Some(year) = birth_year {
                new = new.with_birth_year(*year);
            }
            if let (Some(of), Some(relation)) = (of, relation) {
                let relation_type: RelationType = relation.to_uppercase().parse()?;
                let reference: PersonId = of.parse()?;
                new = new.related_to(reference, relation_type);
            }

            let created = ctx.engine.create_person(&family, new).await?;
            match format {
                OutputFormat::Json => println!("{}", to_json(&created)?),
                OutputFormat::Table => {
                    let person = &created.person;
                    println!("Created person {} ({})", person.name, person.id);
                    println!("  generation: {}", person.generation);
                    if let Some(link) = &created.link {
                        println!(
                            "  relations: {} explicit, {} inferred, {} skipped",
                            link.explicit.len(),
                            link.inference.created.len(),
                            link.inference.skipped
                        );
                        if link.inference.failed > 0 {
                            println!("  failed: {}", link.inference.failed);
                        }
                    }
                }
            }
        }
        PersonCommands::List => {
            let persons = ctx.engine.list_persons(&family).await?;
            if format == OutputFormat::Json {
                println!("{}", to_json(&persons)?);
            } else if persons.is_empty() {
                println!("No persons in this family yet");
            } else {
                let rows: Vec<Vec<String>> = persons.iter().map(person_row).collect();
                println!("{}", table(&PERSON_HEADERS, &rows));
            }
        }
        PersonCommands::Show { id } => {
            let person = ctx.engine.get_person(&id.parse()?).await?;
            match format {
                OutputFormat::Json => println!("{}", to_json(&person)?),
                OutputFormat::Table => println!("{}", table(&PERSON_HEADERS, &[person_row(&person)])),
            }
        }
        PersonCommands::Delete { id } => {
            let id: PersonId = id.parse()?;
            let removed = ctx.engine.delete_person(&family, &id).await?;
            println!("Deleted person {} and {} relations", id, removed);
        }
    }

    Ok(())
}
