use crate::changeset::{ChangeSet, Operation, Rollback};

pub const CHANGE_SET: ChangeSet = ChangeSet {
    id: "20240109103000_EventLog",
    up: Operation::Sql(UP),
    down: Rollback::Reversible(Operation::Sql(DOWN)),
    suspend_foreign_keys: false,
};

const UP: &str = r#"
-- Append-only audit log. Reference columns are deliberately unconstrained:
-- deleting an entity must never rewrite or block its audit trail.
CREATE TABLE events (
    id TEXT PRIMARY KEY,
    type INTEGER NOT NULL,
    occurred_at TEXT NOT NULL,
    user_id TEXT,
    organization_id TEXT,
    cipher_id TEXT,
    collection_id TEXT,
    group_id TEXT,
    policy_id TEXT,
    organization_user_id TEXT,
    provider_id TEXT,
    provider_user_id TEXT,
    provider_organization_id TEXT,
    device_type INTEGER,
    ip_address TEXT,
    acting_user_id TEXT,
    system_user INTEGER,
    domain_name TEXT,
    secret_id TEXT,
    service_account_id TEXT
);

CREATE INDEX idx_events_occurred_at ON events (occurred_at);
CREATE INDEX idx_events_organization_id_occurred_at ON events (organization_id, occurred_at);
"#;

const DOWN: &str = r#"
DROP TABLE events;
"#;
