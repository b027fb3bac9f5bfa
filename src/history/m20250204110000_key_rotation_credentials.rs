use crate::changeset::{ChangeSet, Operation, Rollback};

pub const CHANGE_SET: ChangeSet = ChangeSet {
    id: "20250204110000_KeyRotationCredentials",
    up: Operation::Sql(UP),
    down: Rollback::Reversible(Operation::Sql(DOWN)),
    suspend_foreign_keys: false,
};

const UP: &str = r#"
-- OPAQUE key-exchange login credential, at most one per user.
CREATE TABLE opaque_key_exchange_credentials (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL REFERENCES users (id) ON DELETE CASCADE,
    credential_blob TEXT NOT NULL,
    cipher_configuration TEXT NOT NULL,
    cipher_text TEXT NOT NULL,
    created_at TEXT NOT NULL
);

CREATE UNIQUE INDEX idx_opaque_key_exchange_credentials_user_id
    ON opaque_key_exchange_credentials (user_id);

-- Account signature key pair, at most one per user.
CREATE TABLE user_signature_key_pairs (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL REFERENCES users (id) ON DELETE CASCADE,
    algorithm INTEGER NOT NULL,
    signing_key TEXT NOT NULL,
    verifying_key TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE UNIQUE INDEX idx_user_signature_key_pairs_user_id
    ON user_signature_key_pairs (user_id);

ALTER TABLE users ADD COLUMN last_key_rotation_at TEXT;
"#;

const DOWN: &str = r#"
ALTER TABLE users DROP COLUMN last_key_rotation_at;
DROP TABLE user_signature_key_pairs;
DROP TABLE opaque_key_exchange_credentials;
"#;
