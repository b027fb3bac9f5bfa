//! The bundled Lockbox history applied end to end against a real database
//! file, including the access-grant backfill and the defaults rebuild.

use std::path::{Path, PathBuf};

use lockbox_migrate::config::Settings;
use lockbox_migrate::error::Error;
use lockbox_migrate::history;
use lockbox_migrate::runner::Runner;
use rusqlite::{Connection, params};
use tempfile::TempDir;

const EXPAND_ACCESS_GRANTS: &str = "20240705090000_ExpandAccessGrants";

fn temp_db() -> (TempDir, PathBuf) {
    let dir = TempDir::new().expect("failed to create temp dir");
    let path = dir.path().join("lockbox.db");
    (dir, path)
}

fn open_runner(path: &Path) -> Runner<'static> {
    Runner::open(path, history::history(), Settings::default()).unwrap()
}

fn table_exists(conn: &Connection, name: &str) -> bool {
    let count: i64 = conn
        .query_row(
            "SELECT count(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
            [name],
            |row| row.get(0),
        )
        .unwrap();
    count > 0
}

fn column_exists(conn: &Connection, table: &str, column: &str) -> bool {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table})")).unwrap();
    let columns: Vec<String> = stmt
        .query_map([], |row| row.get::<_, String>(1))
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();
    columns.iter().any(|c| c == column)
}

fn insert_organization(conn: &Connection, id: &str) {
    conn.execute(
        "INSERT INTO organizations (id, name, billing_email, plan, plan_type, created_at, updated_at)
         VALUES (?1, ?1, 'billing@example.com', 'Teams', 1, '2024-01-01T00:00:00Z', '2024-01-01T00:00:00Z')",
        params![id],
    )
    .unwrap();
}

#[test]
fn test_full_up_builds_the_complete_schema() {
    let (_dir, path) = temp_db();
    let mut runner = open_runner(&path);

    let summary = runner.up(None).unwrap();
    assert_eq!(summary.changesets.len(), history::history().len());

    let conn = Connection::open(&path).unwrap();
    for table in [
        "users",
        "organizations",
        "organization_users",
        "folders",
        "ciphers",
        "sends",
        "collections",
        "collection_ciphers",
        "groups",
        "group_users",
        "collection_users",
        "collection_groups",
        "devices",
        "grants",
        "sso_configs",
        "sso_users",
        "webauthn_credentials",
        "events",
        "auth_requests",
        "providers",
        "provider_users",
        "provider_organizations",
        "organization_sponsorships",
        "policies",
        "projects",
        "secrets",
        "project_secrets",
        "service_accounts",
        "access_policies",
        "api_keys",
        "notifications",
        "notification_statuses",
        "opaque_key_exchange_credentials",
        "user_signature_key_pairs",
        "provider_plans",
        "provider_invoice_items",
        "organization_reports",
    ] {
        assert!(table_exists(&conn, table), "missing table {table}");
    }

    // The blanket flag is gone; the expanded grant columns remain.
    assert!(!column_exists(&conn, "organization_users", "access_all"));
    assert!(!column_exists(&conn, "groups", "access_all"));
    assert!(column_exists(&conn, "collection_users", "manage"));

    let status = runner.status().unwrap();
    assert!(status.changesets.iter().all(|cs| cs.applied));
    assert!(status.orphaned.is_empty());
}

#[test]
fn test_tightened_defaults_apply_to_new_rows_only() {
    let (_dir, path) = temp_db();
    let mut runner = open_runner(&path);

    runner
        .up(Some("20250430101500_OrganizationReports"))
        .unwrap();
    let conn = Connection::open(&path).unwrap();
    insert_organization(&conn, "org-before");

    runner.up(None).unwrap();
    insert_organization(&conn, "org-after");

    let limits = |id: &str| -> (i64, i64) {
        conn.query_row(
            "SELECT limit_collection_creation, limit_collection_deletion
             FROM organizations WHERE id = ?1",
            [id],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .unwrap()
    };
    assert_eq!(limits("org-before"), (0, 0));
    assert_eq!(limits("org-after"), (1, 1));
}

#[test]
fn test_access_grant_backfill_expands_blanket_flags() {
    let (_dir, path) = temp_db();
    let mut runner = open_runner(&path);

    runner
        .up(Some("20240704171500_CollectionManageFlag"))
        .unwrap();

    let conn = Connection::open(&path).unwrap();
    insert_organization(&conn, "org-1");
    conn.execute(
        "INSERT INTO organization_users (id, organization_id, email, status, access_all, created_at, updated_at)
         VALUES ('member-1', 'org-1', 'invited@example.com', 0, 1, '2024-01-01T00:00:00Z', '2024-01-01T00:00:00Z')",
        [],
    )
    .unwrap();
    conn.execute(
        "INSERT INTO groups (id, organization_id, name, access_all, created_at, updated_at)
         VALUES ('group-1', 'org-1', 'Everyone', 1, '2024-01-01T00:00:00Z', '2024-01-01T00:00:00Z')",
        [],
    )
    .unwrap();
    for collection in ["collection-1", "collection-2"] {
        conn.execute(
            "INSERT INTO collections (id, organization_id, name, created_at, updated_at)
             VALUES (?1, 'org-1', ?1, '2024-01-01T00:00:00Z', '2024-01-01T00:00:00Z')",
            params![collection],
        )
        .unwrap();
    }
    // An explicit grant that must survive the backfill untouched.
    conn.execute(
        "INSERT INTO collection_users (collection_id, organization_user_id, read_only, hide_passwords, manage)
         VALUES ('collection-1', 'member-1', 1, 0, 0)",
        [],
    )
    .unwrap();

    let summary = runner.up(Some(EXPAND_ACCESS_GRANTS)).unwrap();
    assert_eq!(summary.changesets, [EXPAND_ACCESS_GRANTS]);

    let count = |sql: &str| -> i64 { conn.query_row(sql, [], |row| row.get(0)).unwrap() };
    assert_eq!(
        count("SELECT count(*) FROM collection_users WHERE organization_user_id = 'member-1'"),
        2
    );
    assert_eq!(
        count("SELECT count(*) FROM collection_groups WHERE group_id = 'group-1'"),
        2
    );
    // INSERT OR IGNORE left the hand-written row's read_only alone.
    assert_eq!(
        count(
            "SELECT read_only FROM collection_users
             WHERE collection_id = 'collection-1' AND organization_user_id = 'member-1'"
        ),
        1
    );
}

#[test]
fn test_rollback_stops_at_the_forward_only_backfill() {
    let (_dir, path) = temp_db();
    let mut runner = open_runner(&path);
    runner.up(None).unwrap();

    // Everything after the backfill reverts cleanly.
    let summary = runner.down(Some(EXPAND_ACCESS_GRANTS)).unwrap();
    assert_eq!(summary.changesets.len(), 7);

    let conn = Connection::open(&path).unwrap();
    assert!(!table_exists(&conn, "notifications"));
    assert!(column_exists(&conn, "groups", "access_all"));

    // The backfill itself cannot be crossed.
    let err = runner.down(None).unwrap_err();
    assert!(matches!(err, Error::IrreversibleMigration { .. }));

    // And the schema re-applies from there.
    let summary = runner.up(None).unwrap();
    assert_eq!(summary.changesets.len(), 7);
    assert!(table_exists(&conn, "notifications"));
}
