//! Session commands - select, deselect, set, show and reset

use crate::{
    TagnarrowError,
    adapters::{FileSource, RecordSource, StoreAdapter},
    cli::SessionArgs,
    config::AppConfig,
    db::Database,
    engine::Record,
    output,
    session::{SelectionOp, Session, SnapshotFile},
};
use std::path::PathBuf;

type Result<T> = std::result::Result<T, TagnarrowError>;

/// What a session command does to the selection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    Apply(SelectionOp),
    Show,
    Reset,
}

/// Execute a session command
///
/// Records come from `--source` when given, otherwise from `db`.
///
/// # Errors
///
/// Returns an error if no record source is available, records cannot be
/// loaded, or the snapshot cannot be read or written.
pub fn execute(
    command: SessionCommand,
    args: &SessionArgs,
    db: Option<&Database>,
    config: &AppConfig,
    quiet: bool,
) -> Result<()> {
    let mut session = open_session(args, db, config)?;
    if session.is_resumed() {
        tracing::info!(path = %session.file().path().display(), "resumed selection");
    }

    match command {
        SessionCommand::Apply(op) => {
            session.apply(op);
            session.persist()?;
        }
        SessionCommand::Show => {}
        SessionCommand::Reset => {
            session.reset()?;
            if !quiet {
                println!("Selection cleared.");
            }
        }
    }

    println!("{}", output::selection_summary(session.state(), quiet));
    Ok(())
}

/// Open the session described by `args`
///
/// # Errors
///
/// Returns an error if records cannot be loaded or the snapshot cannot be read.
pub fn open_session(args: &SessionArgs, db: Option<&Database>, config: &AppConfig) -> Result<Session> {
    let records = load_records(args, db)?;
    let path = snapshot_path(args, config)?;
    Ok(Session::open(records, SnapshotFile::new(path))?)
}

fn load_records(args: &SessionArgs, db: Option<&Database>) -> Result<Vec<Record>> {
    let source: Box<dyn RecordSource + '_> = match (&args.source, db) {
        (Some(path), _) => Box::new(FileSource::new(path.clone())?),
        (None, Some(db)) => Box::new(StoreAdapter::new(db)),
        (None, None) => {
            return Err(TagnarrowError::InvalidInput(
                "No record source: pass --source <FILE> or configure a database".into(),
            ));
        }
    };
    let records = source.load_records()?;
    tracing::debug!(source = %source.describe(), records = records.len(), "loaded records");
    Ok(records)
}

fn snapshot_path(args: &SessionArgs, config: &AppConfig) -> Result<PathBuf> {
    match &args.session {
        Some(path) => Ok(path.clone()),
        None => Ok(config.session_path()?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::JsonAdapter;
    use crate::testing::{TestDb, sample_records};

    fn file_args(dir: &std::path::Path) -> SessionArgs {
        let source = dir.join("records.json");
        JsonAdapter::new().export_file(&sample_records(), &source).unwrap();
        SessionArgs {
            source: Some(source),
            session: Some(dir.join("session.json")),
        }
    }

    #[test]
    fn test_select_persists_between_invocations() {
        let dir = tempfile::tempdir().unwrap();
        let args = file_args(dir.path());
        let config = AppConfig::default();

        execute(SessionCommand::Apply(SelectionOp::Select("pwd".into())), &args, None, &config, true).unwrap();
        execute(SessionCommand::Apply(SelectionOp::Select("project".into())), &args, None, &config, true)
            .unwrap();

        let session = open_session(&args, None, &config).unwrap();
        assert!(session.is_resumed());
        assert_eq!(session.state().selected_tags, vec!["pwd", "project"]);
        assert_eq!(session.state().matched_records.len(), 1);
        assert!(session.state().remaining_tags.is_empty());
    }

    #[test]
    fn test_show_does_not_write() {
        let dir = tempfile::tempdir().unwrap();
        let args = file_args(dir.path());
        execute(SessionCommand::Show, &args, None, &AppConfig::default(), true).unwrap();
        assert!(!dir.path().join("session.json").exists());
    }

    #[test]
    fn test_reset_removes_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let args = file_args(dir.path());
        let config = AppConfig::default();

        execute(SessionCommand::Apply(SelectionOp::Select("pwd".into())), &args, None, &config, true).unwrap();
        assert!(dir.path().join("session.json").exists());
        execute(SessionCommand::Reset, &args, None, &config, true).unwrap();
        assert!(!dir.path().join("session.json").exists());
    }

    #[test]
    fn test_store_source() {
        let test_db = TestDb::new();
        StoreAdapter::new(test_db.db())
            .export_to_store(&sample_records(), &crate::adapters::ImportOptions::default())
            .unwrap();
        let args = SessionArgs {
            source: None,
            session: Some(test_db.dir().join("session.json")),
        };

        let session = open_session(&args, Some(test_db.db()), &AppConfig::default()).unwrap();
        assert_eq!(session.state().records().len(), 2);
    }

    #[test]
    fn test_no_source_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let args = SessionArgs {
            source: None,
            session: Some(dir.path().join("session.json")),
        };
        assert!(matches!(
            open_session(&args, None, &AppConfig::default()),
            Err(TagnarrowError::InvalidInput(_))
        ));
    }
}
