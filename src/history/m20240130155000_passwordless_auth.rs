use crate::changeset::{ChangeSet, Operation, Rollback};

pub const CHANGE_SET: ChangeSet = ChangeSet {
    id: "20240130155000_PasswordlessAuth",
    up: Operation::Sql(UP),
    down: Rollback::Reversible(Operation::Sql(DOWN)),
    suspend_foreign_keys: false,
};

const UP: &str = r#"
-- Login-with-device approvals and admin account-recovery requests.
-- approved stays NULL until the request is answered.
CREATE TABLE auth_requests (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL REFERENCES users (id) ON DELETE CASCADE,
    organization_id TEXT REFERENCES organizations (id) ON DELETE RESTRICT,
    type INTEGER NOT NULL,
    request_device_identifier TEXT NOT NULL,
    request_device_type INTEGER NOT NULL,
    request_ip TEXT NOT NULL,
    response_device_id TEXT REFERENCES devices (id) ON DELETE RESTRICT,
    access_code TEXT,
    public_key TEXT NOT NULL,
    key TEXT,
    master_password_hash TEXT,
    approved INTEGER,
    created_at TEXT NOT NULL,
    responded_at TEXT,
    authenticated_at TEXT
);

CREATE INDEX idx_auth_requests_user_id ON auth_requests (user_id);
"#;

const DOWN: &str = r#"
DROP TABLE auth_requests;
"#;
