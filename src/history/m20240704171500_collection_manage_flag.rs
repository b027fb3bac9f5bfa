use crate::changeset::{ChangeSet, Operation, Rollback};

pub const CHANGE_SET: ChangeSet = ChangeSet {
    id: "20240704171500_CollectionManageFlag",
    up: Operation::Sql(UP),
    down: Rollback::Reversible(Operation::Sql(DOWN)),
    suspend_foreign_keys: false,
};

// manage lets a member or group rename/delete the collection and edit its
// grants, the first step of retiring the blanket access_all flag.
const UP: &str = r#"
ALTER TABLE collection_users ADD COLUMN manage INTEGER NOT NULL DEFAULT 0;
ALTER TABLE collection_groups ADD COLUMN manage INTEGER NOT NULL DEFAULT 0;
"#;

const DOWN: &str = r#"
ALTER TABLE collection_groups DROP COLUMN manage;
ALTER TABLE collection_users DROP COLUMN manage;
"#;
