use crate::changeset::{ChangeSet, Operation, Rollback};

pub const CHANGE_SET: ChangeSet = ChangeSet {
    id: "20240215120000_ProviderTier",
    up: Operation::Sql(UP),
    down: Rollback::Reversible(Operation::Sql(DOWN)),
    suspend_foreign_keys: false,
};

const UP: &str = r#"
-- Managed service providers operating vaults for client organizations.
CREATE TABLE providers (
    id TEXT PRIMARY KEY,
    name TEXT,
    business_name TEXT,
    billing_email TEXT,
    status INTEGER NOT NULL DEFAULT 0,
    type INTEGER NOT NULL DEFAULT 0,
    use_events INTEGER NOT NULL DEFAULT 0,
    enabled INTEGER NOT NULL DEFAULT 1,
    gateway INTEGER,
    gateway_customer_id TEXT,
    gateway_subscription_id TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

-- Provider staff. Deleting a user with provider duties is blocked until the
-- membership is removed.
CREATE TABLE provider_users (
    id TEXT PRIMARY KEY,
    provider_id TEXT NOT NULL REFERENCES providers (id) ON DELETE CASCADE,
    user_id TEXT REFERENCES users (id) ON DELETE RESTRICT,
    email TEXT,
    key TEXT,
    status INTEGER NOT NULL DEFAULT 0,
    type INTEGER NOT NULL DEFAULT 0,
    permissions TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE INDEX idx_provider_users_provider_id ON provider_users (provider_id);
CREATE INDEX idx_provider_users_user_id ON provider_users (user_id);

CREATE TABLE provider_organizations (
    id TEXT PRIMARY KEY,
    provider_id TEXT NOT NULL REFERENCES providers (id) ON DELETE CASCADE,
    organization_id TEXT NOT NULL REFERENCES organizations (id) ON DELETE CASCADE,
    key TEXT,
    settings TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE UNIQUE INDEX idx_provider_organizations_provider_id_organization_id
    ON provider_organizations (provider_id, organization_id);
"#;

const DOWN: &str = r#"
DROP TABLE provider_organizations;
DROP TABLE provider_users;
DROP TABLE providers;
"#;
