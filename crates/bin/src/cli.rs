//! CLI argument definitions for the Folio binary.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use folio::content::{AboutField, ProjectStatus, Section};
use url::Url;

/// Storage backend type
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Backend {
    /// SQLite database (default)
    Sqlite,
    /// In-memory with JSON persistence (for development)
    Inmemory,
}

/// Backend configuration shared by all commands
#[derive(clap::Args, Debug, Clone)]
pub struct BackendConfig {
    /// Storage backend to use
    #[arg(short, long, default_value = "sqlite", env = "FOLIO_BACKEND", global = true)]
    pub backend: Backend,

    /// Data directory for storage files.
    /// For SQLite: stores folio.db
    /// For InMemory: stores folio.json
    #[arg(short = 'D', long, env = "FOLIO_DATA_DIR", global = true)]
    pub data_dir: Option<PathBuf>,
}

/// Folio portfolio admin
#[derive(Parser, Debug)]
#[command(name = "folio")]
#[command(about = "Folio: manage the About page and projects of a portfolio site")]
#[command(version)]
pub struct Cli {
    /// Print JSON instead of tables
    #[arg(long, global = true)]
    pub json: bool,

    #[command(flatten)]
    pub backend_config: BackendConfig,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Edit the About page
    About {
        #[command(subcommand)]
        command: AboutCommand,
    },
    /// Manage projects
    Projects {
        #[command(subcommand)]
        command: ProjectsCommand,
    },
    /// Upload an image and print its public URL
    Upload(UploadArgs),
    /// Show backend and content counts
    Info,
}

#[derive(Subcommand, Debug)]
pub enum AboutCommand {
    /// Print the About page
    Show,
    /// Set a text field (image_url, description, address, contact, social)
    Set { field: AboutField, value: String },
    /// Append an item to a list (experience, services, clients)
    Add { section: Section, text: String },
    /// Replace the text of a list item
    Edit {
        section: Section,
        id: String,
        text: String,
    },
    /// Remove a list item by id
    Remove { section: Section, id: String },
    /// Move a list item from one index to another (0-based)
    Move {
        section: Section,
        from: usize,
        to: usize,
    },
}

#[derive(Subcommand, Debug)]
pub enum ProjectsCommand {
    /// List all projects in display order
    List,
    /// List published projects, as the public site shows them
    Published,
    /// Create a project at the end of the list
    Add(ProjectArgs),
    /// Overwrite the fields of a project
    Update {
        id: i64,
        #[command(flatten)]
        project: ProjectArgs,
    },
    /// Move a project from one index to another (0-based) and save the order
    Move { from: usize, to: usize },
    /// Change the status of a project
    Status { id: i64, status: ProjectStatus },
    /// Delete a project
    Delete { id: i64 },
}

/// Project form fields
#[derive(clap::Args, Debug)]
pub struct ProjectArgs {
    #[arg(long)]
    pub title: String,

    /// URL slug: letters, digits, '-', '_', '.', '~'
    #[arg(long)]
    pub slug: String,

    #[arg(long)]
    pub description: String,

    #[arg(long, default_value = "ready")]
    pub status: ProjectStatus,

    /// Comma separated keywords
    #[arg(long)]
    pub keywords: Option<String>,

    #[arg(long)]
    pub year: Option<i32>,

    #[arg(long)]
    pub client: Option<String>,
}

/// Arguments for the upload command
#[derive(clap::Args, Debug)]
pub struct UploadArgs {
    /// Folder inside the image bucket, e.g. projects/thumbnails/4x3
    pub folder: String,

    /// Image file to upload
    pub file: PathBuf,

    /// Directory uploads are written to
    #[arg(long, env = "FOLIO_UPLOAD_DIR", default_value = "uploads")]
    pub upload_dir: PathBuf,

    /// Base URL the upload directory is served from
    #[arg(long, env = "FOLIO_PUBLIC_URL", default_value = "http://localhost:3000/uploads")]
    pub public_url: Url,
}
