//! tagnarrow CLI entry point
//!
//! Narrow a tagged record collection one tag at a time. The selection is kept
//! in a snapshot file so each invocation picks up where the last one stopped.
//!
//! # Usage
//!
//! ```bash
//! # Narrow records from a file
//! tagnarrow select pwd --source passwords.json
//! tagnarrow select project --source passwords.json
//! tagnarrow deselect project --source passwords.json
//!
//! # Or from the configured store
//! tagnarrow import passwords.json --title Migrated
//! tagnarrow select pwd
//! tagnarrow show
//! tagnarrow reset
//!
//! # Store management
//! tagnarrow record add "Bank" -t pwd bank -p '["123456"]'
//! tagnarrow find pwd bank
//! tagnarrow export backup.csv
//!
//! # Quiet mode (only output results)
//! tagnarrow -q show
//! ```
//!
//! # Configuration
//!
//! On first run, tagnarrow prompts for initial setup. Configuration is stored in
//! the user's config directory (`~/.config/tagnarrow/config.toml` on Linux).

use tagnarrow::{
    TagnarrowError,
    adapters::ImportOptions,
    cli::{Cli, Commands},
    commands::{self, migrate, session::SessionCommand},
    completions,
    config::AppConfig,
    db::Database,
    logging::{self, Verbosity},
    session::SelectionOp,
};

type Result<T> = std::result::Result<T, TagnarrowError>;

/// Main entry point for the tagnarrow application
///
/// # Errors
///
/// Returns `TagnarrowError` if configuration loading fails, the store cannot be
/// opened, or any command handler returns an error.
fn main() -> Result<()> {
    let cli = Cli::parse_args();
    logging::init_subscriber(Verbosity::from_flags(cli.verbose, cli.quiet));

    let command = cli.get_command();

    if let Commands::Completions { shell } = &command {
        completions::generate_for_cli(*shell, &mut std::io::stdout());
        return Ok(());
    }

    let mut config = AppConfig::load_or_setup()?;
    let quiet = cli.quiet || config.quiet;

    let db = if command.needs_database() {
        let path = config.resolve_database(cli.db.as_deref())?;
        tracing::debug!(path = %path.display(), "opening store");
        Some(Database::open(path)?)
    } else {
        None
    };

    match command {
        Commands::Select { tag, session } => commands::session(
            SessionCommand::Apply(SelectionOp::Select(tag)),
            &session,
            db.as_ref(),
            &config,
            quiet,
        ),
        Commands::Deselect { tags, session } => commands::session(
            SessionCommand::Apply(SelectionOp::Remove(tags)),
            &session,
            db.as_ref(),
            &config,
            quiet,
        ),
        Commands::Set { tags, session } => commands::session(
            SessionCommand::Apply(SelectionOp::Override(tags)),
            &session,
            db.as_ref(),
            &config,
            quiet,
        ),
        Commands::Show { session } => {
            commands::session(SessionCommand::Show, &session, db.as_ref(), &config, quiet)
        }
        Commands::Reset { session } => {
            commands::session(SessionCommand::Reset, &session, db.as_ref(), &config, quiet)
        }
        Commands::Record { command } => commands::record(require_db(db.as_ref())?, &command, quiet),
        Commands::Tags { command } => commands::tags(require_db(db.as_ref())?, &command, quiet),
        Commands::Find { tags } => commands::find(require_db(db.as_ref())?, &tags, quiet),
        Commands::Import { file, clear, title } => {
            let options = ImportOptions {
                clear_existing: clear,
                title_prefix: title,
            };
            migrate::import(require_db(db.as_ref())?, &file, &options, quiet).map(|_| ())
        }
        Commands::Export { file } => migrate::export(require_db(db.as_ref())?, &file, quiet).map(|_| ()),
        Commands::Db { command } => commands::db(&mut config, &command, quiet),
        Commands::Config { command } => commands::config(&mut config, &command, quiet),
        Commands::Completions { .. } => Ok(()),
    }
}

fn require_db(db: Option<&Database>) -> Result<&Database> {
    db.ok_or_else(|| TagnarrowError::InvalidInput("No database available for this command".into()))
}
