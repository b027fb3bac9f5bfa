use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use rusqlite::{Connection, TransactionBehavior};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::changeset::{ChangeSet, Operation, Rollback, validate_history};
use crate::config::Settings;
use crate::error::{Error, Result};
use crate::ledger::{self, AppliedChangeSet};
use crate::lock::{self, RunLock};
use crate::scripts;

/// Version stamped into the ledger for every change-set this build applies.
pub const PRODUCT_VERSION: &str = env!("CARGO_PKG_VERSION");

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Applies and rolls back a change-set history against one SQLite database.
///
/// The runner never inspects the live schema to decide what to do; the ledger
/// is the only authority on which change-sets have run.
pub struct Runner<'h> {
    conn: Connection,
    db_path: PathBuf,
    history: &'h [ChangeSet],
    settings: Settings,
}

/// What one `up` or `down` run executed, in execution order.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub changesets: Vec<String>,
}

impl RunSummary {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.changesets.is_empty()
    }
}

/// Per-change-set line of `status`.
#[derive(Debug, Clone, Serialize)]
pub struct ChangeSetStatus {
    pub id: String,
    pub applied: bool,
    pub reversible: bool,
    pub applied_at: Option<DateTime<Utc>>,
    pub product_version: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StatusReport {
    pub changesets: Vec<ChangeSetStatus>,
    /// Ledger ids the history does not know. A warning for `status`; runs
    /// refuse to proceed over them.
    pub orphaned: Vec<String>,
}

enum Direction {
    Up,
    Down,
}

impl<'h> Runner<'h> {
    /// Validates the history, opens (creating if missing) the database, and
    /// ensures the ledger and lock tables exist.
    pub fn open(db_path: impl AsRef<Path>, history: &'h [ChangeSet], settings: Settings) -> Result<Self> {
        validate_history(history)?;

        let db_path = db_path.as_ref().to_path_buf();
        let conn = Connection::open(&db_path).map_err(|source| Error::Connection {
            path: db_path.clone(),
            source,
        })?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        conn.pragma_update(None, "journal_mode", "WAL")?;

        ledger::ensure(&conn)?;
        lock::ensure(&conn)?;

        Ok(Self {
            conn,
            db_path,
            history,
            settings,
        })
    }

    /// Lock-free snapshot of applied/pending change-sets.
    pub fn status(&self) -> Result<StatusReport> {
        let applied = ledger::applied(&self.conn)?;

        let changesets = self
            .history
            .iter()
            .map(|cs| {
                let row = applied.iter().find(|r| r.id == cs.id);
                ChangeSetStatus {
                    id: cs.id.to_string(),
                    applied: row.is_some(),
                    reversible: cs.is_reversible(),
                    applied_at: row.map(|r| r.applied_at),
                    product_version: row.map(|r| r.product_version.clone()),
                }
            })
            .collect();

        let orphaned: Vec<String> = applied
            .iter()
            .filter(|r| !self.contains(&r.id))
            .map(|r| r.id.clone())
            .collect();
        for id in &orphaned {
            warn!(%id, "ledger records a change-set the history does not know");
        }

        Ok(StatusReport {
            changesets,
            orphaned,
        })
    }

    /// Applies pending change-sets in ascending order, through `target`
    /// (inclusive) when given. A target at or before the applied frontier
    /// yields an empty run.
    pub fn up(&mut self, target: Option<&str>) -> Result<RunSummary> {
        let lock = self.acquire_lock()?;

        let applied = ledger::applied(&self.conn)?;
        let frontier = self.check_consistency(&applied)?;
        let end = match target {
            Some(id) => self.index_of(id)? + 1,
            None => self.history.len(),
        };
        let end = end.max(frontier);
        debug!(frontier, end, "computed up plan");

        let history = self.history;
        let mut changesets = Vec::new();
        for cs in &history[frontier..end] {
            if self.run_one(cs, Direction::Up)? {
                changesets.push(cs.id.to_string());
            }
        }

        lock.release()?;
        Ok(RunSummary { changesets })
    }

    /// Rolls back applied change-sets in descending order. Without a target,
    /// one step; with one, until `target` is the newest applied change-set
    /// (the target itself stays applied). Plans containing a forward-only
    /// change-set are rejected before anything executes.
    pub fn down(&mut self, target: Option<&str>) -> Result<RunSummary> {
        let lock = self.acquire_lock()?;

        let applied = ledger::applied(&self.conn)?;
        let frontier = self.check_consistency(&applied)?;
        let keep = match target {
            Some(id) => {
                let idx = self.index_of(id)?;
                if idx >= frontier {
                    return Err(Error::OrderingConflict(format!(
                        "cannot roll back to {id}: it is not applied"
                    )));
                }
                idx + 1
            }
            None => frontier.saturating_sub(1),
        };
        let history = self.history;
        let plan = &history[keep..frontier];
        debug!(keep, frontier, "computed down plan");

        for cs in plan {
            if let Rollback::ForwardOnly = cs.down {
                return Err(Error::IrreversibleMigration {
                    id: cs.id.to_string(),
                });
            }
        }

        let mut changesets = Vec::new();
        for cs in plan.iter().rev() {
            if self.run_one(cs, Direction::Down)? {
                changesets.push(cs.id.to_string());
            }
        }

        lock.release()?;
        Ok(RunSummary { changesets })
    }

    fn acquire_lock(&self) -> Result<RunLock> {
        RunLock::acquire(
            &self.db_path,
            self.settings.lock_attempts,
            self.settings.lock_retry,
        )
    }

    fn contains(&self, id: &str) -> bool {
        self.history.iter().any(|cs| cs.id == id)
    }

    fn index_of(&self, id: &str) -> Result<usize> {
        self.history
            .iter()
            .position(|cs| cs.id == id)
            .ok_or_else(|| Error::UnknownTarget(id.to_string()))
    }

    /// The applied set must be exactly a prefix of the history; returns the
    /// frontier (count of applied change-sets). A pending change-set older
    /// than an applied one, or an applied id the history does not know, is a
    /// fatal ordering conflict before any DDL runs.
    fn check_consistency(&self, applied: &[AppliedChangeSet]) -> Result<usize> {
        for row in applied {
            if !self.contains(&row.id) {
                return Err(Error::OrderingConflict(format!(
                    "ledger records {} which is not in the history",
                    row.id
                )));
            }
        }
        for (i, row) in applied.iter().enumerate() {
            if self.history[i].id != row.id {
                return Err(Error::OrderingConflict(format!(
                    "{} is pending but the later {} is already applied",
                    self.history[i].id, row.id
                )));
            }
        }
        Ok(applied.len())
    }

    fn run_one(&mut self, cs: &ChangeSet, direction: Direction) -> Result<bool> {
        let sql = match &direction {
            Direction::Up => resolve(&cs.up)?,
            Direction::Down => match &cs.down {
                Rollback::Reversible(op) => resolve(op)?,
                // Plans are screened before execution; this is unreachable
                // through the public API.
                Rollback::ForwardOnly => {
                    return Err(Error::IrreversibleMigration {
                        id: cs.id.to_string(),
                    });
                }
            },
        };

        let started = Instant::now();
        if cs.suspend_foreign_keys {
            self.conn.pragma_update(None, "foreign_keys", "OFF")?;
        }
        let result = self.run_in_transaction(cs, sql, &direction);
        if cs.suspend_foreign_keys {
            let restored = self.conn.pragma_update(None, "foreign_keys", "ON");
            if result.is_ok() {
                restored?;
            }
        }

        let ran = result?;
        if ran {
            let elapsed_ms = started.elapsed().as_millis() as u64;
            match direction {
                Direction::Up => info!(id = cs.id, elapsed_ms, "applied change-set"),
                Direction::Down => info!(id = cs.id, elapsed_ms, "reverted change-set"),
            }
        }
        Ok(ran)
    }

    /// One change-set, one transaction; the ledger write is the last
    /// statement, so a failure anywhere rolls back both schema and ledger.
    fn run_in_transaction(&mut self, cs: &ChangeSet, sql: &str, direction: &Direction) -> Result<bool> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        // Re-check under the transaction: a concurrent runner may have won
        // the race despite the advisory lock (e.g. a stale lock row).
        let already = ledger::is_applied(&tx, cs.id)?;
        match direction {
            Direction::Up if already => return Ok(false),
            Direction::Down if !already => return Ok(false),
            _ => {}
        }

        tx.execute_batch(sql).map_err(|source| Error::SqlExecution {
            id: cs.id.to_string(),
            source,
        })?;

        if cs.suspend_foreign_keys {
            let violations: i64 =
                tx.query_row("SELECT count(*) FROM pragma_foreign_key_check", [], |row| {
                    row.get(0)
                })?;
            if violations > 0 {
                return Err(Error::ForeignKeyCheck {
                    id: cs.id.to_string(),
                    violations: violations as usize,
                });
            }
        }

        match direction {
            Direction::Up => ledger::record(&tx, cs.id, PRODUCT_VERSION, &Utc::now())?,
            Direction::Down => ledger::remove(&tx, cs.id)?,
        }

        tx.commit()?;
        Ok(true)
    }
}

fn resolve(op: &Operation) -> Result<&'static str> {
    match op {
        Operation::Sql(sql) => Ok(sql),
        Operation::Script(name) => scripts::load(name),
    }
}
