use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use contact_merge::{apply_resolutions, diff, MergeOutcome};
use extractors::BusinessCardExtractor;
use shared_types::{ContactField, ContactFields, Extractor, Resolution};
use std::path::{Path, PathBuf};

mod commands;
mod config;
mod store;

use commands::{
    add_contact, build_import, delete_contact, import_contact, parse_field_resolution,
    resolution_table, ImportOutcome,
};
use config::RolodexConfig;
use store::ContactStore;

#[derive(Parser, Debug)]
#[command(name = "rolodex", author, version, about = "Business card contact extraction and merging")]
struct Cli {
    /// Config file (defaults to the per-user rolodex/cli.toml)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Directory holding contacts.csv, overrides the config
    #[arg(long, global = true, value_name = "DIR")]
    working_dir: Option<PathBuf>,

    /// Log at debug level unless RUST_LOG is set
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract contact fields from an OCR text file and print them as JSON
    Extract {
        text_file: PathBuf,

        #[arg(long)]
        pretty: bool,
    },

    /// Extract a card and store it, optionally merging into an existing contact
    Import {
        text_file: PathBuf,

        /// Card image to attach (repeatable)
        #[arg(long = "image", value_name = "PATH")]
        images: Vec<PathBuf>,

        /// ID of the stored contact this card duplicates
        #[arg(long, value_name = "ID")]
        merge_into: Option<String>,

        #[command(flatten)]
        resolve: ResolveArgs,
    },

    /// Merge two ContactFields JSON files and print the result
    Merge {
        old_json: PathBuf,
        new_json: PathBuf,

        #[command(flatten)]
        resolve: ResolveArgs,
    },

    /// Add a contact by hand, blank or filled from a ContactFields JSON file
    Add {
        json: Option<PathBuf>,
    },

    /// Remove a stored contact
    Delete {
        id: String,
    },

    /// Print stored contacts, one JSON object per line
    List,
}

#[derive(Args, Debug)]
struct ResolveArgs {
    /// Settle one conflict, e.g. `email=new` (repeatable)
    #[arg(long = "resolve", value_name = "FIELD=old|new", value_parser = parse_field_resolution)]
    resolutions: Vec<(ContactField, Resolution)>,

    /// Side to take for every conflict not settled by --resolve
    #[arg(long, value_parser = parse_resolution)]
    prefer: Option<Resolution>,
}

impl ResolveArgs {
    fn table(&self) -> std::collections::HashMap<ContactField, Resolution> {
        resolution_table(&self.resolutions, self.prefer)
    }
}

fn parse_resolution(arg: &str) -> Result<Resolution, String> {
    arg.parse().map_err(|e| format!("{e}"))
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let (config, config_path) =
        RolodexConfig::load(cli.config.as_deref()).context("Failed to load rolodex config")?;
    tracing::debug!(path = %config_path.display(), "Loaded config");

    let working_dir = cli
        .working_dir
        .clone()
        .unwrap_or_else(|| config.storage.working_directory.clone());

    match cli.command {
        Command::Extract { text_file, pretty } => {
            let text = read_text(&text_file)?;
            let contact = BusinessCardExtractor::new().extract(&text);
            let json = if pretty {
                serde_json::to_string_pretty(&contact)?
            } else {
                serde_json::to_string(&contact)?
            };
            println!("{json}");
        }
        Command::Import {
            text_file,
            images,
            merge_into,
            resolve,
        } => {
            let text = read_text(&text_file)?;
            let contact = build_import(&BusinessCardExtractor::new(), &text, &images, &config.import);

            let mut store = open_store(&working_dir)?;

            match import_contact(&mut store, contact, merge_into.as_deref(), &resolve.table())? {
                ImportOutcome::Created(id) | ImportOutcome::Merged(id) => {
                    save_store(&store)?;
                    println!("{id}");
                }
                ImportOutcome::Pending(draft) => {
                    println!("{}", serde_json::to_string_pretty(&draft.conflicts)?);
                    anyhow::bail!(
                        "{} unresolved conflict(s); rerun with --resolve FIELD=old|new or --prefer old|new",
                        draft.conflicts.len()
                    );
                }
            }
        }
        Command::Merge {
            old_json,
            new_json,
            resolve,
        } => {
            let old = read_contact(&old_json)?;
            let new = read_contact(&new_json)?;

            match apply_resolutions(diff(&old, &new), &resolve.table()) {
                MergeOutcome::Merged(merged) => {
                    println!("{}", serde_json::to_string_pretty(&merged)?);
                }
                MergeOutcome::Pending(draft) => {
                    println!("{}", serde_json::to_string_pretty(&draft)?);
                    anyhow::bail!("{} unresolved conflict(s)", draft.conflicts.len());
                }
            }
        }
        Command::Add { json } => {
            let fields = match json {
                Some(path) => read_contact(&path)?,
                None => ContactFields::default(),
            };
            let mut store = open_store(&working_dir)?;
            let id = add_contact(&mut store, fields);
            save_store(&store)?;
            println!("{id}");
        }
        Command::Delete { id } => {
            let mut store = open_store(&working_dir)?;
            delete_contact(&mut store, &id)
                .with_context(|| format!("Failed to delete contact {id}"))?;
            save_store(&store)?;
        }
        Command::List => {
            let store = open_store(&working_dir)?;
            for record in store.records() {
                println!("{}", serde_json::to_string(record)?);
            }
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init();
}

fn open_store(working_dir: &Path) -> Result<ContactStore> {
    ContactStore::open(working_dir)
        .with_context(|| format!("Failed to open contacts in {:?}", working_dir))
}

fn save_store(store: &ContactStore) -> Result<()> {
    store
        .save()
        .with_context(|| format!("Failed to save {:?}", store.path()))
}

fn read_text(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read text file at {:?}", path))
}

fn read_contact(path: &Path) -> Result<ContactFields> {
    let raw = read_text(path)?;
    serde_json::from_str(&raw).with_context(|| format!("Failed to parse contact JSON at {:?}", path))
}
