use crate::changeset::{ChangeSet, Operation, Rollback};

pub const CHANGE_SET: ChangeSet = ChangeSet {
    id: "20240705090100_DropAccessAllColumns",
    up: Operation::Sql(UP),
    down: Rollback::Reversible(Operation::Sql(DOWN)),
    suspend_foreign_keys: false,
};

const UP: &str = r#"
ALTER TABLE organization_users DROP COLUMN access_all;
ALTER TABLE groups DROP COLUMN access_all;
"#;

// Restores the columns, not their values; the expanded rows from the
// preceding change-set stay authoritative.
const DOWN: &str = r#"
ALTER TABLE groups ADD COLUMN access_all INTEGER NOT NULL DEFAULT 0;
ALTER TABLE organization_users ADD COLUMN access_all INTEGER NOT NULL DEFAULT 0;
"#;
