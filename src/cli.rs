//! CLI argument parsing using clap v4
//!
//! Defines the command-line interface for the aiclone client.

use clap::{Args, Parser, Subcommand};

use crate::model::CommunicationStyle;

/// aiclone - create AI clones and watch them talk
///
/// Talks to the AI Clone Me directory and conversation service: register a
/// personality, browse other clones, and generate conversations between them.
#[derive(Parser, Debug)]
#[command(name = "aiclone")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(short, long, env = "AICLONE_CONFIG", global = true)]
    pub config: Option<String>,

    /// Service origin, overriding config and AICLONE_BACKEND_URL
    #[arg(long, global = true)]
    pub url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Interactive session (home, create, explore, conversations)
    Shell {
        /// Use a seeded in-memory service instead of the configured one
        #[arg(long)]
        demo: bool,
    },

    /// Create your AI clone in one step
    Create(CreateArgs),

    /// Browse the clone directory
    Users {
        #[command(subcommand)]
        subcommand: UsersSubcommand,
    },

    /// Generate a conversation between two clones
    Converse {
        /// User id of the first clone (speaks first)
        #[arg(long)]
        from: String,

        /// User id of the second clone
        #[arg(long)]
        to: String,

        /// Conversation topic
        #[arg(long)]
        topic: Option<String>,
    },

    /// List stored conversations
    Conversations {
        /// Only conversations this user id took part in
        #[arg(long)]
        user: Option<String>,

        /// Print raw JSON instead of transcripts
        #[arg(long)]
        json: bool,
    },

    /// Check that the service is up
    Health,

    /// Display version and build information
    Version,

    /// Configuration management
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },
}

/// Personality fields for `create`
#[derive(Args, Debug, Clone)]
pub struct CreateArgs {
    /// Display name of the clone
    #[arg(long)]
    pub name: String,

    /// Username to register under
    #[arg(long)]
    pub username: String,

    /// casual, professional, witty, enthusiastic, thoughtful, or warm
    #[arg(long)]
    pub style: Option<CommunicationStyle>,

    /// Interest (repeatable)
    #[arg(long = "interest")]
    pub interests: Vec<String>,

    /// Personality trait (repeatable)
    #[arg(long = "trait")]
    pub traits: Vec<String>,

    /// Favorite topic (repeatable)
    #[arg(long = "topic")]
    pub topics: Vec<String>,

    /// Speaking quirks
    #[arg(long)]
    pub quirks: Option<String>,

    /// Background
    #[arg(long)]
    pub background: Option<String>,
}

/// Directory subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum UsersSubcommand {
    /// List all clones
    List {
        /// Print raw JSON
        #[arg(long)]
        json: bool,
    },

    /// Show one clone by user id
    Show {
        user_id: String,

        /// Print raw JSON
        #[arg(long)]
        json: bool,
    },
}

/// Configuration subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum ConfigSubcommand {
    /// Display the current configuration
    Show,

    /// Initialize a new configuration file
    Init {
        /// Path where to create the config file
        #[arg(short, long)]
        path: Option<String>,

        /// Overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },

    /// Validate a configuration file
    Validate,
}
