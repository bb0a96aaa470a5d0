//! Backup and restore of project metadata held by the project funding ledger.
//!
//! `export_projects` snapshots every project into [`ProjectRecord`]s, which
//! `write_backup` / `read_backup` keep on disk as a JSON array.
//! `import_projects` replays a snapshot into a fresh ledger through its public
//! interface, restoring project metadata and the paused/completed flags.

mod file;
mod record;
mod replay;

pub use file::{read_backup, write_backup, DEFAULT_BACKUP_PATH};
pub use record::ProjectRecord;
pub use replay::{export_projects, import_projects};
