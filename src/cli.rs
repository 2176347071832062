use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "petfriends")]
#[command(author, version, about = "Client for the PetFriends pet-management API")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Override the API base URL
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Account email (used to obtain an API key)
    #[arg(long, global = true)]
    pub email: Option<String>,

    /// Account password
    #[arg(long, global = true)]
    pub password: Option<String>,

    /// Output format
    #[arg(long, global = true, value_enum, env = "PETFRIENDS_FORMAT")]
    pub format: Option<OutputFormat>,

    /// Verbose output (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Obtain an API key for the configured account
    Key,

    /// List pets
    List {
        /// Only pets owned by the authenticated account
        #[arg(long)]
        mine: bool,
    },

    /// Create a pet, optionally with a photo
    Add(PetArgs),

    /// Attach a photo to an existing pet
    SetPhoto {
        /// Pet ID
        pet_id: String,

        /// Path to the image file
        photo: PathBuf,
    },

    /// Update an existing pet
    Update {
        /// Pet ID
        pet_id: String,

        #[command(flatten)]
        fields: PetFields,
    },

    /// Delete a pet
    Delete {
        /// Pet ID
        pet_id: String,
    },
}

#[derive(Args, Clone)]
pub struct PetFields {
    /// Pet name
    #[arg(long)]
    pub name: String,

    /// Species, e.g. "cat"
    #[arg(long)]
    pub animal_type: String,

    /// Age, sent as-is
    #[arg(long, allow_hyphen_values = true)]
    pub age: String,
}

#[derive(Args, Clone)]
pub struct PetArgs {
    #[command(flatten)]
    pub fields: PetFields,

    /// Photo to upload with the pet
    #[arg(long)]
    pub photo: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Yaml,
}
