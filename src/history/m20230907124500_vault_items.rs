use crate::changeset::{ChangeSet, Operation, Rollback};

pub const CHANGE_SET: ChangeSet = ChangeSet {
    id: "20230907124500_VaultItems",
    up: Operation::Sql(UP),
    down: Rollback::Reversible(Operation::Sql(DOWN)),
    suspend_foreign_keys: false,
};

const UP: &str = r#"
-- Per-user folders. name is an encrypted blob like everything user-visible.
CREATE TABLE folders (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL REFERENCES users (id) ON DELETE CASCADE,
    name TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE INDEX idx_folders_user_id ON folders (user_id);

-- Vault items. Owned by a user or by an organization; the two columns are
-- mutually exclusive at the application layer. deleted_at is the trash bin,
-- and an organization with items cannot be deleted out from under them.
CREATE TABLE ciphers (
    id TEXT PRIMARY KEY,
    user_id TEXT REFERENCES users (id) ON DELETE CASCADE,
    organization_id TEXT REFERENCES organizations (id) ON DELETE RESTRICT,
    folder_id TEXT REFERENCES folders (id) ON DELETE SET NULL,
    type INTEGER NOT NULL,
    data TEXT,
    favorites TEXT,
    attachments TEXT,
    reprompt INTEGER,
    key TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    deleted_at TEXT
);

CREATE INDEX idx_ciphers_user_id ON ciphers (user_id);
CREATE INDEX idx_ciphers_organization_id ON ciphers (organization_id);
CREATE INDEX idx_ciphers_deleted_at ON ciphers (deleted_at);

-- Ephemeral shares. deletion_at is a hard deadline enforced by a sweep job,
-- not a soft-delete marker.
CREATE TABLE sends (
    id TEXT PRIMARY KEY,
    user_id TEXT REFERENCES users (id) ON DELETE CASCADE,
    organization_id TEXT REFERENCES organizations (id) ON DELETE RESTRICT,
    type INTEGER NOT NULL,
    data TEXT NOT NULL,
    key TEXT NOT NULL,
    password_hash TEXT,
    max_access_count INTEGER,
    access_count INTEGER NOT NULL DEFAULT 0,
    hide_email INTEGER,
    disabled INTEGER NOT NULL DEFAULT 0,
    expires_at TEXT,
    deletion_at TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE INDEX idx_sends_user_id ON sends (user_id);
CREATE INDEX idx_sends_deletion_at ON sends (deletion_at);
"#;

const DOWN: &str = r#"
DROP TABLE sends;
DROP TABLE ciphers;
DROP TABLE folders;
"#;
