use crate::changeset::{ChangeSet, Operation, Rollback};

pub const CHANGE_SET: ChangeSet = ChangeSet {
    id: "20231019140000_CollectionAccess",
    up: Operation::Sql(UP),
    down: Rollback::Reversible(Operation::Sql(DOWN)),
    suspend_foreign_keys: false,
};

const UP: &str = r#"
-- Named buckets of shared organization items.
CREATE TABLE collections (
    id TEXT PRIMARY KEY,
    organization_id TEXT NOT NULL REFERENCES organizations (id) ON DELETE CASCADE,
    name TEXT NOT NULL,
    external_id TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE INDEX idx_collections_organization_id ON collections (organization_id);

CREATE TABLE collection_ciphers (
    collection_id TEXT NOT NULL REFERENCES collections (id) ON DELETE CASCADE,
    cipher_id TEXT NOT NULL REFERENCES ciphers (id) ON DELETE CASCADE,
    PRIMARY KEY (collection_id, cipher_id)
);

CREATE INDEX idx_collection_ciphers_cipher_id ON collection_ciphers (cipher_id);

-- Directory-syncable member groups. access_all bypasses per-collection
-- grants; a later change-set expands it into explicit rows and drops it.
CREATE TABLE groups (
    id TEXT PRIMARY KEY,
    organization_id TEXT NOT NULL REFERENCES organizations (id) ON DELETE CASCADE,
    name TEXT NOT NULL,
    access_all INTEGER NOT NULL DEFAULT 0,
    external_id TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE INDEX idx_groups_organization_id ON groups (organization_id);

CREATE TABLE group_users (
    group_id TEXT NOT NULL REFERENCES groups (id) ON DELETE CASCADE,
    organization_user_id TEXT NOT NULL REFERENCES organization_users (id) ON DELETE CASCADE,
    PRIMARY KEY (group_id, organization_user_id)
);

CREATE INDEX idx_group_users_organization_user_id ON group_users (organization_user_id);

CREATE TABLE collection_users (
    collection_id TEXT NOT NULL REFERENCES collections (id) ON DELETE CASCADE,
    organization_user_id TEXT NOT NULL REFERENCES organization_users (id) ON DELETE CASCADE,
    read_only INTEGER NOT NULL DEFAULT 0,
    hide_passwords INTEGER NOT NULL DEFAULT 0,
    PRIMARY KEY (collection_id, organization_user_id)
);

CREATE INDEX idx_collection_users_organization_user_id ON collection_users (organization_user_id);

CREATE TABLE collection_groups (
    collection_id TEXT NOT NULL REFERENCES collections (id) ON DELETE CASCADE,
    group_id TEXT NOT NULL REFERENCES groups (id) ON DELETE CASCADE,
    read_only INTEGER NOT NULL DEFAULT 0,
    hide_passwords INTEGER NOT NULL DEFAULT 0,
    PRIMARY KEY (collection_id, group_id)
);

CREATE INDEX idx_collection_groups_group_id ON collection_groups (group_id);
"#;

const DOWN: &str = r#"
DROP TABLE collection_groups;
DROP TABLE collection_users;
DROP TABLE group_users;
DROP TABLE groups;
DROP TABLE collection_ciphers;
DROP TABLE collections;
"#;
