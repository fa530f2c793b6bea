//! Schema registry and idempotent initializer.
//!
//! # Responsibility
//! - Create the catalog relations when absent.
//! - Record the applied schema version so repeated calls are no-ops.
//!
//! # Invariants
//! - `version` values must remain monotonic.
//! - Applied version is mirrored to `PRAGMA user_version`.
//! - Schema SQL only uses `CREATE ... IF NOT EXISTS`; there is no
//!   destructive migration path.

use crate::db::{DbError, DbResult};
use log::{debug, info};
use rusqlite::Connection;

#[derive(Debug, Clone, Copy)]
struct SchemaStep {
    version: u32,
    sql: &'static str,
}

const SCHEMA_STEPS: &[SchemaStep] = &[SchemaStep {
    version: 1,
    sql: include_str!("0001_init.sql"),
}];

/// Returns the latest schema version known by this binary.
pub fn latest_version() -> u32 {
    SCHEMA_STEPS.last().map_or(0, |step| step.version)
}

/// Ensures `users`, `books` and `ratings` exist on this connection.
///
/// Safe to call any number of times; after the first success it only reads
/// `PRAGMA user_version`. All pending steps run in one transaction.
///
/// # Errors
/// - `DbError::UnsupportedSchemaVersion` when the file was written by a newer
///   build.
/// - `DbError::Sqlite` when storage cannot be read or written.
pub fn ensure_schema(conn: &mut Connection) -> DbResult<()> {
    let current_version = current_user_version(conn)?;
    let latest = latest_version();

    if current_version > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: current_version,
            latest_supported: latest,
        });
    }

    if current_version == latest {
        debug!("event=schema_ensure module=db status=ok applied=0 version={latest}");
        return Ok(());
    }

    let tx = conn.transaction()?;
    let mut applied = 0;
    for step in SCHEMA_STEPS
        .iter()
        .filter(|step| step.version > current_version)
    {
        tx.execute_batch(step.sql)?;
        tx.execute_batch(&format!("PRAGMA user_version = {};", step.version))?;
        applied += 1;
    }
    tx.commit()?;

    info!(
        "event=schema_ensure module=db status=ok applied={applied} from_version={current_version} version={latest}"
    );
    Ok(())
}

fn current_user_version(conn: &Connection) -> DbResult<u32> {
    let version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    Ok(version)
}
