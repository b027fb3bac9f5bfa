use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, params};

use crate::error::{Error, Result};

/// Table recording which change-sets have been applied.
pub const LEDGER_TABLE: &str = "__migrations_history";

const CREATE_LEDGER: &str = r#"
CREATE TABLE IF NOT EXISTS __migrations_history (
    id              TEXT PRIMARY KEY,  -- change-set id
    product_version TEXT NOT NULL,     -- crate version that applied it
    applied_at      TEXT NOT NULL      -- UTC, rfc3339
);
"#;

/// One ledger row.
#[derive(Debug, Clone)]
pub struct AppliedChangeSet {
    pub id: String,
    pub product_version: String,
    pub applied_at: DateTime<Utc>,
}

pub fn ensure(conn: &Connection) -> Result<()> {
    conn.execute_batch(CREATE_LEDGER)?;
    Ok(())
}

/// All ledger rows, ordered by change-set id ascending.
pub fn applied(conn: &Connection) -> Result<Vec<AppliedChangeSet>> {
    let mut stmt = conn.prepare(
        "SELECT id, product_version, applied_at FROM __migrations_history ORDER BY id",
    )?;
    let rows = stmt.query_map([], |row| {
        Ok(AppliedChangeSet {
            id: row.get(0)?,
            product_version: row.get(1)?,
            applied_at: parse_datetime(&row.get::<_, String>(2)?),
        })
    })?;

    rows.collect::<std::result::Result<Vec<_>, _>>()
        .map_err(Error::from)
}

pub fn is_applied(conn: &Connection, id: &str) -> Result<bool> {
    let row = conn
        .query_row(
            "SELECT 1 FROM __migrations_history WHERE id = ?1",
            params![id],
            |_| Ok(()),
        )
        .optional()?;
    Ok(row.is_some())
}

/// Inserts the ledger row; the last statement of a change-set's transaction.
pub fn record(
    conn: &Connection,
    id: &str,
    product_version: &str,
    applied_at: &DateTime<Utc>,
) -> Result<()> {
    conn.execute(
        "INSERT INTO __migrations_history (id, product_version, applied_at)
         VALUES (?1, ?2, ?3)",
        params![id, product_version, format_datetime(applied_at)],
    )?;
    Ok(())
}

/// Deletes the ledger row; the last statement of a rollback transaction.
pub fn remove(conn: &Connection, id: &str) -> Result<()> {
    conn.execute(
        "DELETE FROM __migrations_history WHERE id = ?1",
        params![id],
    )?;
    Ok(())
}

pub(crate) fn parse_datetime(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|_| {
            // Handle SQLite's default datetime format: "YYYY-MM-DD HH:MM:SS"
            chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").map(|ndt| ndt.and_utc())
        })
        .unwrap_or_else(|e| {
            tracing::error!("Invalid datetime in database: '{}' - {}", s, e);
            Utc::now()
        })
}

pub(crate) fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_memory() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        ensure(&conn).unwrap();
        conn
    }

    #[test]
    fn test_ensure_is_idempotent() {
        let conn = open_memory();
        ensure(&conn).unwrap();
        assert!(applied(&conn).unwrap().is_empty());
    }

    #[test]
    fn test_record_then_applied_round_trips() {
        let conn = open_memory();
        let now = Utc::now();
        record(&conn, "20230907121500_CoreIdentity", "0.0.1", &now).unwrap();
        record(&conn, "20230907124500_VaultItems", "0.0.1", &now).unwrap();

        let rows = applied(&conn).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].id, "20230907121500_CoreIdentity");
        assert_eq!(rows[0].product_version, "0.0.1");
        assert_eq!(rows[0].applied_at.timestamp(), now.timestamp());
    }

    #[test]
    fn test_applied_orders_by_id() {
        let conn = open_memory();
        let now = Utc::now();
        record(&conn, "20231019140000_Third", "0.0.1", &now).unwrap();
        record(&conn, "20230907121500_First", "0.0.1", &now).unwrap();

        let ids: Vec<_> = applied(&conn).unwrap().into_iter().map(|r| r.id).collect();
        assert_eq!(ids, ["20230907121500_First", "20231019140000_Third"]);
    }

    #[test]
    fn test_is_applied_and_remove() {
        let conn = open_memory();
        let id = "20230907121500_CoreIdentity";
        assert!(!is_applied(&conn, id).unwrap());

        record(&conn, id, "0.0.1", &Utc::now()).unwrap();
        assert!(is_applied(&conn, id).unwrap());

        remove(&conn, id).unwrap();
        assert!(!is_applied(&conn, id).unwrap());
    }

    #[test]
    fn test_duplicate_record_is_rejected() {
        let conn = open_memory();
        let id = "20230907121500_CoreIdentity";
        record(&conn, id, "0.0.1", &Utc::now()).unwrap();
        assert!(record(&conn, id, "0.0.1", &Utc::now()).is_err());
    }
}
