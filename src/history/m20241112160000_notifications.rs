use crate::changeset::{ChangeSet, Operation, Rollback};

pub const CHANGE_SET: ChangeSet = ChangeSet {
    id: "20241112160000_Notifications",
    up: Operation::Sql(UP),
    down: Rollback::Reversible(Operation::Sql(DOWN)),
    suspend_foreign_keys: false,
};

const UP: &str = r#"
-- Server-pushed notices. global rows fan out to every client of the matching
-- client_type; targeted rows pin a user and/or organization.
CREATE TABLE notifications (
    id TEXT PRIMARY KEY,
    priority INTEGER NOT NULL,
    global INTEGER NOT NULL DEFAULT 0,
    client_type INTEGER NOT NULL,
    user_id TEXT REFERENCES users (id) ON DELETE CASCADE,
    organization_id TEXT REFERENCES organizations (id) ON DELETE RESTRICT,
    title TEXT,
    body TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

-- Matches the broadcast query shape: who should see what, newest first.
CREATE INDEX idx_notifications_broadcast
    ON notifications (client_type, global, user_id, organization_id, priority, created_at);

-- Per-user read/dismissed state.
CREATE TABLE notification_statuses (
    user_id TEXT NOT NULL REFERENCES users (id) ON DELETE CASCADE,
    notification_id TEXT NOT NULL REFERENCES notifications (id) ON DELETE CASCADE,
    read_at TEXT,
    deleted_at TEXT,
    PRIMARY KEY (user_id, notification_id)
);
"#;

const DOWN: &str = r#"
DROP TABLE notification_statuses;
DROP TABLE notifications;
"#;
