use std::path::Path;
use std::time::Duration;

use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, params};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::ledger::format_datetime;

/// Single-row table serializing migration runs across processes.
pub const LOCK_TABLE: &str = "__migrations_lock";

const CREATE_LOCK: &str = r#"
CREATE TABLE IF NOT EXISTS __migrations_lock (
    id          INTEGER PRIMARY KEY CHECK (id = 0),  -- at most one row
    token       TEXT NOT NULL,
    pid         INTEGER NOT NULL,
    acquired_at TEXT NOT NULL                        -- UTC, rfc3339
);
"#;

const LOCK_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

pub fn ensure(conn: &Connection) -> Result<()> {
    conn.execute_batch(CREATE_LOCK)?;
    Ok(())
}

/// Held advisory lock. Dropping it releases the lock best-effort; call
/// [`RunLock::release`] on the happy path to surface delete failures.
#[derive(Debug)]
pub struct RunLock {
    conn: Connection,
    token: String,
    released: bool,
}

impl RunLock {
    /// Tries to insert the lock row, backing off up to `attempts` times.
    ///
    /// Uses its own connection: the row must be committed and visible to
    /// other processes independently of any change-set transaction.
    pub fn acquire(db_path: &Path, attempts: u32, retry: Duration) -> Result<Self> {
        let conn = Connection::open(db_path).map_err(|source| Error::Connection {
            path: db_path.to_path_buf(),
            source,
        })?;
        conn.busy_timeout(LOCK_BUSY_TIMEOUT)?;
        ensure(&conn)?;

        let token = Uuid::new_v4().to_string();
        let attempts = attempts.max(1);
        for attempt in 1..=attempts {
            let inserted = conn.execute(
                "INSERT INTO __migrations_lock (id, token, pid, acquired_at)
                 VALUES (0, ?1, ?2, ?3)",
                params![token, std::process::id(), format_datetime(&Utc::now())],
            );
            match inserted {
                Ok(_) => {
                    return Ok(Self {
                        conn,
                        token,
                        released: false,
                    });
                }
                Err(rusqlite::Error::SqliteFailure(err, _))
                    if err.code == rusqlite::ErrorCode::ConstraintViolation =>
                {
                    if attempt < attempts {
                        tracing::warn!(
                            attempt,
                            attempts,
                            "migration lock busy, retrying in {:?}",
                            retry
                        );
                        std::thread::sleep(retry);
                    }
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(Error::LockContention(describe_holder(&conn)))
    }

    /// Deletes this runner's lock row.
    pub fn release(mut self) -> Result<()> {
        self.delete_row()?;
        self.released = true;
        Ok(())
    }

    fn delete_row(&self) -> rusqlite::Result<usize> {
        self.conn.execute(
            "DELETE FROM __migrations_lock WHERE id = 0 AND token = ?1",
            params![self.token],
        )
    }
}

impl Drop for RunLock {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        if let Err(e) = self.delete_row() {
            tracing::warn!("failed to release migration lock: {e}");
        }
    }
}

fn describe_holder(conn: &Connection) -> String {
    let holder = conn
        .query_row(
            "SELECT pid, acquired_at FROM __migrations_lock WHERE id = 0",
            [],
            |row| Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?)),
        )
        .optional();
    match holder {
        Ok(Some((pid, acquired_at))) => format!("pid {pid}, since {acquired_at}"),
        _ => "holder unknown".to_string(),
    }
}
