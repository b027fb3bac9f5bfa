use crate::changeset::{ChangeSet, Operation, Rollback};

pub const CHANGE_SET: ChangeSet = ChangeSet {
    id: "20240506132000_SecretsManager",
    up: Operation::Sql(UP),
    down: Rollback::Reversible(Operation::Sql(DOWN)),
    suspend_foreign_keys: false,
};

const UP: &str = r#"
-- Machine-credential store: projects group secrets; service accounts and
-- members are granted row-level access through access policies.
CREATE TABLE projects (
    id TEXT PRIMARY KEY,
    organization_id TEXT NOT NULL REFERENCES organizations (id) ON DELETE CASCADE,
    name TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    deleted_at TEXT
);

CREATE INDEX idx_projects_organization_id ON projects (organization_id);
CREATE INDEX idx_projects_deleted_at ON projects (deleted_at);

CREATE TABLE secrets (
    id TEXT PRIMARY KEY,
    organization_id TEXT NOT NULL REFERENCES organizations (id) ON DELETE CASCADE,
    key TEXT,
    value TEXT,
    note TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    deleted_at TEXT
);

CREATE INDEX idx_secrets_organization_id ON secrets (organization_id);
CREATE INDEX idx_secrets_deleted_at ON secrets (deleted_at);

CREATE TABLE project_secrets (
    project_id TEXT NOT NULL REFERENCES projects (id) ON DELETE CASCADE,
    secret_id TEXT NOT NULL REFERENCES secrets (id) ON DELETE CASCADE,
    PRIMARY KEY (project_id, secret_id)
);

CREATE TABLE service_accounts (
    id TEXT PRIMARY KEY,
    organization_id TEXT NOT NULL REFERENCES organizations (id) ON DELETE CASCADE,
    name TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE INDEX idx_service_accounts_organization_id ON service_accounts (organization_id);

-- One grant row: exactly one subject, exactly one target. kind spells out
-- the pair so consumers never sniff column nullability.
CREATE TABLE access_policies (
    id TEXT PRIMARY KEY,
    kind TEXT NOT NULL CHECK (kind IN (
        'user_project', 'user_secret', 'user_service_account',
        'group_project', 'group_secret', 'group_service_account',
        'service_account_project', 'service_account_secret'
    )),
    organization_user_id TEXT REFERENCES organization_users (id) ON DELETE CASCADE,
    group_id TEXT REFERENCES groups (id) ON DELETE CASCADE,
    service_account_id TEXT REFERENCES service_accounts (id) ON DELETE CASCADE,
    granted_project_id TEXT REFERENCES projects (id) ON DELETE CASCADE,
    granted_secret_id TEXT REFERENCES secrets (id) ON DELETE CASCADE,
    granted_service_account_id TEXT REFERENCES service_accounts (id) ON DELETE CASCADE,
    read INTEGER NOT NULL DEFAULT 0,
    write INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    CHECK ((organization_user_id IS NOT NULL) + (group_id IS NOT NULL)
         + (service_account_id IS NOT NULL) = 1),
    CHECK ((granted_project_id IS NOT NULL) + (granted_secret_id IS NOT NULL)
         + (granted_service_account_id IS NOT NULL) = 1)
);

CREATE INDEX idx_access_policies_granted_project_id ON access_policies (granted_project_id);
CREATE INDEX idx_access_policies_granted_secret_id ON access_policies (granted_secret_id);

-- Machine tokens. service_account_id is NULL for user-scoped keys.
CREATE TABLE api_keys (
    id TEXT PRIMARY KEY,
    service_account_id TEXT REFERENCES service_accounts (id) ON DELETE CASCADE,
    name TEXT NOT NULL,
    client_secret_hash TEXT,
    scope TEXT NOT NULL,
    encrypted_payload TEXT NOT NULL,
    key TEXT NOT NULL,
    expires_at TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE INDEX idx_api_keys_service_account_id ON api_keys (service_account_id);

ALTER TABLE organization_users ADD COLUMN access_secrets_manager INTEGER NOT NULL DEFAULT 0;
"#;

const DOWN: &str = r#"
ALTER TABLE organization_users DROP COLUMN access_secrets_manager;
DROP TABLE api_keys;
DROP TABLE access_policies;
DROP TABLE service_accounts;
DROP TABLE project_secrets;
DROP TABLE secrets;
DROP TABLE projects;
"#;
