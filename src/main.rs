//! gdd - edit a game design document from the terminal
//!
//! Every edit is saved immediately to the preference file.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gdd_tool::core::config::AppConfig;
use gdd_tool::{
    AssetHandle, AssetResolver, DirectoryResolver, Document, DocumentStore, Field, FileBackend,
    ReferenceField, Section, Session,
};

#[derive(Parser)]
#[command(name = "gdd")]
#[command(about = "Mini game design document with autosave")]
struct Cli {
    /// Preference file holding the document
    #[arg(long, global = true)]
    prefs: Option<PathBuf>,
    /// Preference key the document is stored under
    #[arg(long, global = true)]
    key: Option<String>,
    /// Directory image handles are resolved against
    #[arg(long, global = true)]
    assets: Option<PathBuf>,
    /// Log debug output
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the document
    Show {
        /// Only print one section (introduction, gameplay, art)
        #[arg(long)]
        section: Option<Section>,
    },
    /// List editable fields
    Fields,
    /// Set a text field
    Set {
        /// Field name, e.g. working-title
        field: Field,
        value: String,
    },
    /// Append an empty reference
    AddRef,
    /// Remove a reference (1-based)
    RemoveRef { index: usize },
    /// Set the URL or caption of a reference (1-based)
    SetRef {
        index: usize,
        /// url or caption
        field: ReferenceField,
        value: String,
    },
    /// Attach an image to a reference (1-based); omit the handle to clear it
    SetImage {
        index: usize,
        handle: Option<String>,
    },
    /// Print the stored blob as-is
    Export,
}

impl Commands {
    /// Commands that never write the preference file
    fn is_read_only(&self) -> bool {
        matches!(self, Commands::Show { .. } | Commands::Fields | Commands::Export)
    }
}

/// Run a command that only reads, leaving the stored blob as it is even if unreadable
fn run_read_only(
    command: Commands,
    store: DocumentStore<FileBackend>,
    assets: Option<PathBuf>,
) -> Result<()> {
    match command {
        Commands::Export => match store.raw_blob()? {
            Some(blob) => println!("{}", blob),
            None => eprintln!("No document stored yet"),
        },
        Commands::Fields => {
            for section in Section::ALL {
                for field in section.fields() {
                    println!("{:<26} {} ({})", field.key(), field.label(), section.title());
                }
            }
        }
        Commands::Show { section } => {
            let resolver = assets.map(DirectoryResolver::new);
            print_document(&store.load(), section, resolver.as_ref());
        }
        _ => bail!("Command modifies the document"),
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        tracing_subscriber::filter::LevelFilter::DEBUG
    } else {
        tracing_subscriber::filter::LevelFilter::INFO
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(level)
        .init();

    let config = AppConfig::load().unwrap_or_else(|e| {
        tracing::warn!("Failed to load config, using defaults: {}", e);
        AppConfig::default()
    });

    let prefs = cli.prefs.clone().unwrap_or_else(|| config.preferences_file());
    let key = cli.key.clone().unwrap_or_else(|| config.document_key.clone());
    let assets = cli.assets.clone().or_else(|| config.asset_root.clone());
    tracing::debug!("Using preference file {} (key {})", prefs.display(), key);

    let store = DocumentStore::with_key(FileBackend::new(prefs), key);

    if cli.command.is_read_only() {
        return run_read_only(cli.command, store, assets);
    }

    let mut session = Session::open(store);

    match cli.command {
        Commands::Set { field, value } => {
            session.set_field(field, value)?;
        }
        Commands::AddRef => {
            let idx = session.add_reference()?;
            println!("Added Reference {}", idx + 1);
        }
        Commands::RemoveRef { index } => {
            session.remove_reference(to_index(index)?)?;
        }
        Commands::SetRef { index, field, value } => {
            session.set_reference_field(to_index(index)?, field, value)?;
        }
        Commands::SetImage { index, handle } => {
            let handle = match (handle, assets) {
                (Some(raw), Some(root)) => {
                    // Accept a file path under the asset root as well as a raw handle
                    let resolver = DirectoryResolver::new(root);
                    let path = PathBuf::from(&raw);
                    Some(resolver.handle_for(&path).unwrap_or_else(|| AssetHandle::new(raw)))
                }
                (Some(raw), None) => Some(AssetHandle::new(raw)),
                (None, _) => None,
            };
            session.set_reference_image(to_index(index)?, handle)?;
        }
        Commands::Show { .. } | Commands::Fields | Commands::Export => {}
    }

    session.close().context("Failed to save document")?;
    Ok(())
}

/// Convert a 1-based index from the command line
fn to_index(index: usize) -> Result<usize> {
    match index.checked_sub(1) {
        Some(idx) => Ok(idx),
        None => bail!("Reference numbers start at 1"),
    }
}

fn print_document(doc: &Document, only: Option<Section>, resolver: Option<&DirectoryResolver>) {
    println!("{}", doc.display_title());
    println!("Mini Game Design Document \u{2022} Autosave");

    for section in Section::ALL {
        if only.is_some_and(|s| s != section) {
            continue;
        }

        println!();
        println!("== {} ==", section.title());
        println!("{}", section.subtitle());

        for field in section.fields() {
            let value = doc.field(*field);
            if field.is_multiline() && value.contains('\n') {
                println!("{}:", field.label());
                for line in value.lines() {
                    println!("    {}", line);
                }
            } else {
                println!("{}: {}", field.label(), value);
            }
        }

        if section == Section::ArtVisuals {
            if doc.references.is_empty() {
                println!("No references yet. Add at least one.");
            }
            for (i, item) in doc.references.iter().enumerate() {
                println!("-- Reference {} --", i + 1);
                println!("Reference URL: {}", item.reference_url);
                println!("Caption: {}", item.caption);
                if let Some(handle) = &item.image_handle {
                    let status = match resolver {
                        Some(r) => match r.resolve(handle) {
                            Some(path) => path.display().to_string(),
                            None => "missing".to_string(),
                        },
                        None => "unresolved".to_string(),
                    };
                    println!("Image: {} ({})", handle, status);
                }
            }
        }
    }
}
