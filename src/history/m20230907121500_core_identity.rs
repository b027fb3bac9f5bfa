use crate::changeset::{ChangeSet, Operation, Rollback};

pub const CHANGE_SET: ChangeSet = ChangeSet {
    id: "20230907121500_CoreIdentity",
    up: Operation::Sql(UP),
    down: Rollback::Reversible(Operation::Sql(DOWN)),
    suspend_foreign_keys: false,
};

const UP: &str = r#"
-- Vault account holders. Key material and password hints are encrypted blobs;
-- nothing in this table is plaintext secret data.
CREATE TABLE users (
    id TEXT PRIMARY KEY,
    name TEXT,
    email TEXT NOT NULL COLLATE NOCASE,
    email_verified INTEGER NOT NULL DEFAULT 0,
    master_password_hash TEXT,
    master_password_hint TEXT,
    security_stamp TEXT NOT NULL,
    key TEXT,
    public_key TEXT,
    private_key TEXT,
    kdf_type INTEGER NOT NULL DEFAULT 0,
    kdf_iterations INTEGER NOT NULL,
    kdf_memory INTEGER,
    kdf_parallelism INTEGER,
    two_factor_providers TEXT,
    two_factor_recovery_code TEXT,
    equivalent_domains TEXT,
    premium INTEGER NOT NULL DEFAULT 0,
    premium_expires_at TEXT,
    storage_bytes INTEGER,
    max_storage_gb INTEGER,
    gateway INTEGER,
    gateway_customer_id TEXT,
    gateway_subscription_id TEXT,
    api_key TEXT NOT NULL,
    force_password_reset INTEGER NOT NULL DEFAULT 0,
    uses_key_connector INTEGER NOT NULL DEFAULT 0,
    verify_devices INTEGER NOT NULL DEFAULT 1,
    failed_login_count INTEGER NOT NULL DEFAULT 0,
    last_failed_login_at TEXT,
    avatar_color TEXT,
    account_revision_at TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE UNIQUE INDEX idx_users_email ON users (email);

-- Paid tenants. Collection management starts loose here; a later change-set
-- tightens the defaults for new rows.
CREATE TABLE organizations (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    business_name TEXT,
    billing_email TEXT NOT NULL,
    plan TEXT NOT NULL,
    plan_type INTEGER NOT NULL,
    seats INTEGER,
    max_collections INTEGER,
    use_policies INTEGER NOT NULL DEFAULT 0,
    use_sso INTEGER NOT NULL DEFAULT 0,
    use_key_connector INTEGER NOT NULL DEFAULT 0,
    use_scim INTEGER NOT NULL DEFAULT 0,
    use_groups INTEGER NOT NULL DEFAULT 0,
    use_directory INTEGER NOT NULL DEFAULT 0,
    use_events INTEGER NOT NULL DEFAULT 0,
    use_totp INTEGER NOT NULL DEFAULT 0,
    use_2fa INTEGER NOT NULL DEFAULT 0,
    use_api INTEGER NOT NULL DEFAULT 0,
    use_reset_password INTEGER NOT NULL DEFAULT 0,
    use_secrets_manager INTEGER NOT NULL DEFAULT 0,
    self_host INTEGER NOT NULL DEFAULT 0,
    users_get_premium INTEGER NOT NULL DEFAULT 0,
    storage_bytes INTEGER,
    max_storage_gb INTEGER,
    gateway INTEGER,
    gateway_customer_id TEXT,
    gateway_subscription_id TEXT,
    reference_data TEXT,
    enabled INTEGER NOT NULL DEFAULT 1,
    license_key TEXT,
    public_key TEXT,
    private_key TEXT,
    two_factor_providers TEXT,
    expires_at TEXT,
    identifier TEXT,
    limit_collection_creation INTEGER NOT NULL DEFAULT 0,
    limit_collection_deletion INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE UNIQUE INDEX idx_organizations_identifier ON organizations (identifier)
    WHERE identifier IS NOT NULL;

-- Membership joining users to organizations. user_id stays NULL until an
-- invited email accepts. status: 0 invited, 1 accepted, 2 confirmed, -1 revoked.
CREATE TABLE organization_users (
    id TEXT PRIMARY KEY,
    organization_id TEXT NOT NULL REFERENCES organizations (id) ON DELETE CASCADE,
    user_id TEXT REFERENCES users (id) ON DELETE CASCADE,
    email TEXT,
    key TEXT,
    reset_password_key TEXT,
    status INTEGER NOT NULL DEFAULT 0,
    type INTEGER NOT NULL DEFAULT 2,
    access_all INTEGER NOT NULL DEFAULT 0,
    external_id TEXT,
    permissions TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE INDEX idx_organization_users_organization_id ON organization_users (organization_id);
CREATE INDEX idx_organization_users_user_id ON organization_users (user_id);
"#;

const DOWN: &str = r#"
DROP TABLE organization_users;
DROP TABLE organizations;
DROP TABLE users;
"#;
