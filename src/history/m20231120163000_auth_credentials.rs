use crate::changeset::{ChangeSet, Operation, Rollback};

pub const CHANGE_SET: ChangeSet = ChangeSet {
    id: "20231120163000_AuthCredentials",
    up: Operation::Sql(UP),
    down: Rollback::Reversible(Operation::Sql(DOWN)),
    suspend_foreign_keys: false,
};

const UP: &str = r#"
-- Registered client installs, one row per device.
CREATE TABLE devices (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL REFERENCES users (id) ON DELETE CASCADE,
    name TEXT NOT NULL,
    type INTEGER NOT NULL,
    identifier TEXT NOT NULL,
    push_token TEXT,
    encrypted_user_key TEXT,
    encrypted_public_key TEXT,
    encrypted_private_key TEXT,
    active INTEGER NOT NULL DEFAULT 1,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE UNIQUE INDEX idx_devices_user_id_identifier ON devices (user_id, identifier);
CREATE INDEX idx_devices_identifier ON devices (identifier);

-- Token-server persisted grants: refresh tokens, device codes, consents.
-- key is the natural lookup handle issued to clients.
CREATE TABLE grants (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    key TEXT NOT NULL,
    type TEXT NOT NULL,
    subject_id TEXT,
    session_id TEXT,
    client_id TEXT NOT NULL,
    description TEXT,
    data TEXT NOT NULL,
    created_at TEXT NOT NULL,
    expires_at TEXT,
    consumed_at TEXT
);

CREATE UNIQUE INDEX idx_grants_key ON grants (key);
CREATE INDEX idx_grants_expires_at ON grants (expires_at);

-- At most one SSO configuration per organization.
CREATE TABLE sso_configs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    organization_id TEXT NOT NULL REFERENCES organizations (id) ON DELETE CASCADE,
    enabled INTEGER NOT NULL DEFAULT 1,
    data TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE UNIQUE INDEX idx_sso_configs_organization_id ON sso_configs (organization_id);

-- Links a directory identity to a user within one organization.
CREATE TABLE sso_users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id TEXT NOT NULL REFERENCES users (id) ON DELETE CASCADE,
    organization_id TEXT REFERENCES organizations (id) ON DELETE CASCADE,
    external_id TEXT NOT NULL,
    created_at TEXT NOT NULL
);

CREATE UNIQUE INDEX idx_sso_users_organization_id_external_id ON sso_users (organization_id, external_id);
CREATE UNIQUE INDEX idx_sso_users_organization_id_user_id ON sso_users (organization_id, user_id);

-- Passkeys, for login and for vault decryption (PRF).
CREATE TABLE webauthn_credentials (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL REFERENCES users (id) ON DELETE CASCADE,
    name TEXT NOT NULL,
    public_key TEXT NOT NULL,
    credential_id TEXT NOT NULL,
    counter INTEGER NOT NULL DEFAULT 0,
    type TEXT,
    aa_guid TEXT NOT NULL,
    encrypted_user_key TEXT,
    encrypted_public_key TEXT,
    encrypted_private_key TEXT,
    supports_prf INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE INDEX idx_webauthn_credentials_user_id ON webauthn_credentials (user_id);
"#;

const DOWN: &str = r#"
DROP TABLE webauthn_credentials;
DROP TABLE sso_users;
DROP TABLE sso_configs;
DROP TABLE grants;
DROP TABLE devices;
"#;
