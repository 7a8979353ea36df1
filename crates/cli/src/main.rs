//! Encounter CLI - fill encounters from candidate adversaries.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use encounter_core::{Candidate, Constraints, EncounterTemplate, Selection, TemplateId};
use encounter_selection::{EngineConfig, ErrorCategory, SelectionEngine, SelectionError};
use encounter_storage::{JsonStorage, Storage};

#[derive(Parser)]
#[command(name = "encounter")]
#[command(about = "Encounter selection and template management", long_about = None)]
struct Cli {
    /// Template store directory
    #[arg(long, global = true, default_value = ".encounter")]
    store: PathBuf,

    /// Reject budgets above this value
    #[arg(long, global = true)]
    max_budget: Option<i64>,

    /// Reject calls needing more working memory than this, in bytes
    #[arg(long, global = true)]
    max_table_bytes: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

/// Inputs to one engine run.
#[derive(Args)]
struct SelectArgs {
    /// JSON file holding an array of candidates
    #[arg(long)]
    candidates: PathBuf,
    /// Maximum total difficulty
    #[arg(long, allow_negative_numbers = true)]
    budget: i64,
    /// Maximum number of adversaries
    #[arg(long, allow_negative_numbers = true)]
    capacity: i64,
}

#[derive(Subcommand)]
enum Commands {
    /// Pick the most rewarding encounter within a budget
    Select {
        #[command(flatten)]
        args: SelectArgs,
        /// Save the result as a template with this name
        #[arg(long)]
        save: Option<String>,
        /// Print the selection as JSON
        #[arg(long)]
        json: bool,
    },
    /// Manage saved templates
    Templates {
        #[command(subcommand)]
        action: TemplateCommand,
    },
}

#[derive(Subcommand)]
enum TemplateCommand {
    /// List templates
    List,
    /// Show template details
    Show {
        /// Template ID
        id: String,
    },
    /// Rename a template
    Rename {
        /// Template ID
        id: String,
        /// New name
        name: String,
    },
    /// Recompute a template's selection from new candidates and limits
    Update {
        /// Template ID
        id: String,
        #[command(flatten)]
        args: SelectArgs,
    },
    /// Delete a template
    Delete {
        /// Template ID
        id: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let output = run(Cli::parse()).await?;
    print!("{}", output);
    Ok(())
}

/// Execute one command and return what it prints.
async fn run(cli: Cli) -> Result<String> {
    let engine = SelectionEngine::with_config(engine_config(&cli));
    let mut storage = JsonStorage::new(&cli.store)
        .await
        .with_context(|| format!("Failed to open store at {}", cli.store.display()))?;
    let mut out = String::new();

    match cli.command {
        Commands::Select { args, save, json } => {
            let (constraints, selection) = run_engine(&engine, &args).await?;

            if json {
                writeln!(out, "{}", serde_json::to_string_pretty(&selection)?)?;
            } else {
                out.push_str(&render_selection(&selection));
            }

            if let Some(name) = save {
                let template = EncounterTemplate::new(name, constraints, selection);
                storage.save_template(&template).await?;
                info!("Saved template {} - {}", template.id, template.name);
                writeln!(out, "Saved template: {}", template.id)?;
            }
        }
        Commands::Templates { action } => match action {
            TemplateCommand::List => {
                let templates = storage.list_templates().await?;

                writeln!(out, "Templates ({})", templates.len())?;
                for template in templates {
                    writeln!(out, "  {} | {} adversaries | weight {} | value {} - {}",
                        template.id,
                        template.selection.len(),
                        template.selection.total_weight,
                        template.selection.total_value,
                        template.name,
                    )?;
                }
            }
            TemplateCommand::Show { id } => {
                let template = storage.require_template(parse_id(&id)?).await?;

                writeln!(out, "Template: {}", template.id)?;
                writeln!(out, "  Name: {}", template.name)?;
                writeln!(out, "  Budget: {}", template.budget)?;
                writeln!(out, "  Capacity: {}", template.capacity)?;
                writeln!(out, "  Created: {}", template.created_at)?;
                writeln!(out, "  Updated: {}", template.updated_at)?;
                out.push_str(&render_selection(&template.selection));
            }
            TemplateCommand::Rename { id, name } => {
                let mut template = storage.require_template(parse_id(&id)?).await?;
                template.rename(name);
                storage.save_template(&template).await?;
                writeln!(out, "Renamed template {} to {}", template.id, template.name)?;
            }
            TemplateCommand::Update { id, args } => {
                let mut template = storage.require_template(parse_id(&id)?).await?;
                let (constraints, selection) = run_engine(&engine, &args).await?;
                template.replace_selection(constraints, selection);
                storage.save_template(&template).await?;
                writeln!(out, "Updated template {}", template.id)?;
                out.push_str(&render_selection(&template.selection));
            }
            TemplateCommand::Delete { id } => {
                let id = parse_id(&id)?;
                if storage.delete_template(id).await? {
                    writeln!(out, "Deleted template {}", id)?;
                } else {
                    writeln!(out, "Template not found")?;
                }
            }
        },
    }

    Ok(out)
}

async fn run_engine(engine: &SelectionEngine, args: &SelectArgs) -> Result<(Constraints, Selection)> {
    let pool = load_candidates(&args.candidates).await?;
    debug!("Loaded {} candidates from {}", pool.len(), args.candidates.display());

    let constraints = Constraints::new(args.budget, args.capacity);
    let selection = engine
        .select_with(&pool, &constraints)
        .map_err(|e| anyhow::anyhow!(describe(&e)))?;
    Ok((constraints, selection))
}

fn engine_config(cli: &Cli) -> EngineConfig {
    let mut config = EngineConfig::default();
    if let Some(max) = cli.max_budget {
        config = config.with_max_budget(max);
    }
    if let Some(max) = cli.max_table_bytes {
        config = config.with_max_table_bytes(max);
    }
    config
}

fn parse_id(s: &str) -> Result<TemplateId> {
    s.parse().map_err(|_| anyhow::anyhow!("Invalid template ID: {}", s))
}

async fn load_candidates(path: &Path) -> Result<Vec<Candidate>> {
    let json = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&json).with_context(|| format!("Invalid candidate list in {}", path.display()))
}

/// User-facing message for a rejected call.
fn describe(err: &SelectionError) -> String {
    let kind = match err.category() {
        ErrorCategory::InvalidInput => "Invalid input",
        ErrorCategory::ResourceLimit => "Limit exceeded",
    };
    format!("{}: {} ({})", kind, err, hint(err))
}

/// What the user can change to make a rejected call succeed.
fn hint(err: &SelectionError) -> &'static str {
    match err {
        SelectionError::InvalidBudget { .. } => "enter a difficulty budget of zero or more",
        SelectionError::InvalidCapacity { .. } => "allow at least one adversary",
        SelectionError::InvalidCandidateWeight { .. } => "fix the candidate's difficulty",
        SelectionError::InvalidCandidateValue { .. } => "fix the candidate's reward",
        SelectionError::DuplicateCandidate { .. } => "give every candidate a distinct id",
        SelectionError::BudgetTooLarge { .. } => "reduce budget",
        SelectionError::TableTooLarge { .. } => "reduce budget, capacity or the candidate list",
        SelectionError::ValueOverflow => "reduce candidate rewards",
    }
}

fn render_selection(selection: &Selection) -> String {
    let mut out = format!(
        "Selection ({} adversaries, weight {}, value {})\n",
        selection.len(),
        selection.total_weight,
        selection.total_value
    );
    for candidate in &selection.selected {
        out.push_str(&format!(
            "  {} | w {} | v {} - {}\n",
            candidate.id,
            candidate.weight,
            candidate.value,
            candidate.label()
        ));
    }
    out
}
