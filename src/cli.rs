//! Command-line interface definitions and parsing
//!
//! # Commands
//!
//! - **select / deselect / set / show / reset**: narrow a record collection one
//!   tag at a time; the selection persists between runs (`show` is the default)
//! - **record**: create, inspect and edit stored records
//! - **tags**: manage stored tags
//! - **find**: records carrying every given tag
//! - **import / export**: move record collections between files and a store
//! - **db / config**: manage stores and settings
//! - **completions**: generate shell completion scripts
//!
//! ```
//! use tagnarrow::cli::{Cli, Commands};
//!
//! let cli = Cli::parse_from_iter(["tagnarrow", "select", "pwd"]);
//! assert!(matches!(cli.get_command(), Commands::Select { .. }));
//! ```

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// Where a session gets its records and keeps its snapshot
#[derive(Parser, Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionArgs {
    /// Read records from a JSON or CSV file instead of the store
    #[arg(short = 's', long = "source", value_name = "FILE")]
    pub source: Option<PathBuf>,

    /// Snapshot file to resume from and write to (overrides config)
    #[arg(long = "session", value_name = "FILE")]
    pub session: Option<PathBuf>,
}

/// Configuration management subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommands {
    /// Set a configuration value
    Set {
        /// Configuration key=value (e.g., quiet=true)
        #[arg(value_name = "KEY=VALUE")]
        setting: String,
    },

    /// Get a configuration value
    Get {
        /// Configuration key to retrieve (e.g., `session_file`)
        #[arg(value_name = "KEY")]
        key: String,
    },
}

/// Store management subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum DbCommands {
    /// Register a new store
    Add {
        /// Name of the store
        name: String,

        /// Path to the store directory (a bare name lands in the data directory)
        path: PathBuf,
    },

    /// List all stores
    List,

    /// Remove a store from configuration
    #[command(visible_alias = "rm")]
    Remove {
        /// Name of the store to remove
        name: String,

        /// Also delete store files from disk
        #[arg(short = 'd', long = "delete-files")]
        delete_files: bool,
    },

    /// Set the default store
    #[command(name = "set-default")]
    SetDefault {
        /// Name of the store to set as default
        name: String,
    },
}

/// Record management subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum RecordCommands {
    /// Create a record
    Add {
        /// Record title
        title: String,

        /// Tags to attach (created if missing)
        #[arg(short = 't', long = "tag", value_name = "TAG", num_args = 1..)]
        tags: Vec<String>,

        /// Payload as JSON: a list of strings or an object of strings
        #[arg(short = 'p', long = "payload", value_name = "JSON", default_value = "[]")]
        payload: String,
    },

    /// List records, newest first
    #[command(visible_alias = "ls")]
    List {
        /// Only records carrying any of these tags
        #[arg(short = 't', long = "tag", value_name = "TAG", num_args = 1..)]
        tags: Vec<String>,

        /// Only records whose title contains this text
        #[arg(long = "title", value_name = "TEXT")]
        title: Option<String>,
    },

    /// Show one record with its payload
    Show {
        /// Record id
        id: u64,
    },

    /// Change a record's title or payload
    Update {
        /// Record id
        id: u64,

        /// New title
        #[arg(long = "title", value_name = "TITLE")]
        title: Option<String>,

        /// New payload as JSON
        #[arg(short = 'p', long = "payload", value_name = "JSON")]
        payload: Option<String>,
    },

    /// Delete a record
    #[command(visible_alias = "rm")]
    Remove {
        /// Record id
        id: u64,
    },

    /// Attach tags to a record (created if missing)
    Tag {
        /// Record id
        id: u64,

        /// Tags to attach
        #[arg(required = true)]
        tags: Vec<String>,
    },

    /// Detach tags from a record
    Untag {
        /// Record id
        id: u64,

        /// Tags to detach
        #[arg(required = true)]
        tags: Vec<String>,
    },
}

/// Tag management subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum TagsCommands {
    /// List all tags with usage counts
    #[command(visible_alias = "ls")]
    List {
        /// Only tags whose name matches this regex
        #[arg(short = 'p', long = "pattern", value_name = "REGEX")]
        pattern: Option<String>,
    },

    /// Create a tag
    Add {
        /// Tag name
        name: String,

        /// Display color
        #[arg(short = 'c', long = "color", value_name = "COLOR")]
        color: Option<String>,
    },

    /// Rename a tag everywhere
    Rename {
        /// Current name
        old: String,

        /// New name
        new: String,
    },

    /// Delete a tag and detach it from every record
    #[command(visible_alias = "rm")]
    Remove {
        /// Tag to remove
        tag: String,
    },
}

/// Main CLI structure for parsing command-line arguments
#[derive(Parser, Debug)]
#[command(name = "tagnarrow")]
#[command(about = "Narrow tagged records one tag at a time", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Suppress informational output (only print results)
    #[arg(short = 'q', long = "quiet", global = true)]
    pub quiet: bool,

    /// Print debug diagnostics to stderr
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    /// Store name to use (overrides default)
    #[arg(long = "db", value_name = "NAME", global = true)]
    pub db: Option<String>,
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Add a tag to the selection
    #[command(visible_alias = "s")]
    Select {
        /// Tag to select
        tag: String,

        #[command(flatten)]
        session: SessionArgs,
    },

    /// Remove tags from the selection
    #[command(visible_alias = "d")]
    Deselect {
        /// Tags to remove
        #[arg(required = true)]
        tags: Vec<String>,

        #[command(flatten)]
        session: SessionArgs,
    },

    /// Replace the selection (no tags clears it)
    Set {
        /// New selection, in order
        tags: Vec<String>,

        #[command(flatten)]
        session: SessionArgs,
    },

    /// Show the current selection, matches and remaining tags (default)
    Show {
        #[command(flatten)]
        session: SessionArgs,
    },

    /// Clear the selection and delete the snapshot
    Reset {
        #[command(flatten)]
        session: SessionArgs,
    },

    /// Manage stored records
    #[command(visible_alias = "r")]
    Record {
        #[command(subcommand)]
        command: RecordCommands,
    },

    /// Manage stored tags
    Tags {
        #[command(subcommand)]
        command: TagsCommands,
    },

    /// Find stored records carrying all of the given tags
    #[command(visible_alias = "f")]
    Find {
        /// Required tags
        #[arg(required = true)]
        tags: Vec<String>,
    },

    /// Load a JSON or CSV record file into the store
    Import {
        /// Record file (.json or .csv)
        file: PathBuf,

        /// Delete existing records first (tags are kept)
        #[arg(long = "clear")]
        clear: bool,

        /// Title prefix for imported records
        #[arg(long = "title", value_name = "PREFIX")]
        title: Option<String>,
    },

    /// Write every stored record to a JSON or CSV file (`-` for JSON on stdout)
    Export {
        /// Output file, or `-`
        file: String,
    },

    /// Manage configuration settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Manage stores
    Db {
        #[command(subcommand)]
        command: DbCommands,
    },

    /// Generate shell completion scripts
    Completions {
        /// Target shell
        shell: Shell,
    },
}

impl Commands {
    /// Whether the command opens a store
    ///
    /// Session commands only need one when no `--source` file is given.
    #[must_use]
    pub const fn needs_database(&self) -> bool {
        match self {
            Self::Select { session, .. }
            | Self::Deselect { session, .. }
            | Self::Set { session, .. }
            | Self::Show { session }
            | Self::Reset { session } => session.source.is_none(),
            Self::Record { .. }
            | Self::Tags { .. }
            | Self::Find { .. }
            | Self::Import { .. }
            | Self::Export { .. } => true,
            Self::Config { .. } | Self::Db { .. } | Self::Completions { .. } => false,
        }
    }
}

impl Cli {
    /// Parse command line arguments
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Parse from an explicit argument list
    #[must_use]
    pub fn parse_from_iter<I, T>(args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::parse_from(args)
    }

    /// Get the command, defaulting to Show if none specified
    #[must_use]
    pub fn get_command(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Show {
            session: SessionArgs::default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_show() {
        let cli = Cli::parse_from(["tagnarrow"]);
        assert!(matches!(cli.get_command(), Commands::Show { .. }));
    }

    #[test]
    fn test_select_with_source() {
        let cli = Cli::parse_from(["tagnarrow", "select", "pwd", "--source", "data.json"]);
        match cli.get_command() {
            Commands::Select { tag, session } => {
                assert_eq!(tag, "pwd");
                assert_eq!(session.source, Some(PathBuf::from("data.json")));
                assert!(session.session.is_none());
            }
            other => panic!("Expected Select command, got {other:?}"),
        }
    }

    #[test]
    fn test_set_without_tags_clears() {
        let cli = Cli::parse_from(["tagnarrow", "set"]);
        match cli.get_command() {
            Commands::Set { tags, .. } => assert!(tags.is_empty()),
            other => panic!("Expected Set command, got {other:?}"),
        }
    }

    #[test]
    fn test_deselect_requires_tags() {
        assert!(Cli::try_parse_from(["tagnarrow", "deselect"]).is_err());
        let cli = Cli::parse_from(["tagnarrow", "d", "a", "b"]);
        match cli.get_command() {
            Commands::Deselect { tags, .. } => assert_eq!(tags, vec!["a", "b"]),
            other => panic!("Expected Deselect command, got {other:?}"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["tagnarrow", "find", "pwd", "-q", "--db", "work"]);
        assert!(cli.quiet);
        assert_eq!(cli.db.as_deref(), Some("work"));
    }

    #[test]
    fn test_record_add() {
        let cli = Cli::parse_from([
            "tagnarrow", "record", "add", "Bank", "-t", "pwd", "bank", "-p", r#"["123"]"#,
        ]);
        match cli.get_command() {
            Commands::Record {
                command: RecordCommands::Add { title, tags, payload },
            } => {
                assert_eq!(title, "Bank");
                assert_eq!(tags, vec!["pwd", "bank"]);
                assert_eq!(payload, r#"["123"]"#);
            }
            other => panic!("Expected record add, got {other:?}"),
        }
    }

    #[test]
    fn test_import_flags() {
        let cli = Cli::parse_from(["tagnarrow", "import", "data.csv", "--clear", "--title", "Migrated"]);
        match cli.get_command() {
            Commands::Import { file, clear, title } => {
                assert_eq!(file, PathBuf::from("data.csv"));
                assert!(clear);
                assert_eq!(title.as_deref(), Some("Migrated"));
            }
            other => panic!("Expected Import command, got {other:?}"),
        }
    }

    #[test]
    fn test_needs_database() {
        assert!(Cli::parse_from(["tagnarrow", "show"]).get_command().needs_database());
        assert!(
            !Cli::parse_from(["tagnarrow", "show", "-s", "x.json"])
                .get_command()
                .needs_database()
        );
        assert!(!Cli::parse_from(["tagnarrow", "db", "list"]).get_command().needs_database());
        assert!(!Cli::parse_from(["tagnarrow", "completions", "bash"]).get_command().needs_database());
    }

    #[test]
    fn test_db_set_default() {
        let cli = Cli::parse_from(["tagnarrow", "db", "set-default", "work"]);
        assert!(matches!(
            cli.get_command(),
            Commands::Db {
                command: DbCommands::SetDefault { .. }
            }
        ));
    }
}
