use crate::changeset::{ChangeSet, Operation, Rollback};

// Flips the limit_collection_creation / limit_collection_deletion defaults to
// restrictive for rows created from here on. SQLite cannot change a column
// default in place, so both directions rebuild the table; the runner suspends
// foreign key enforcement around the transaction and gates the commit on
// a clean foreign_key_check.
pub const CHANGE_SET: ChangeSet = ChangeSet {
    id: "20250615084500_TightenOrganizationDefaults",
    up: Operation::Script("2025-06-15_00_RebuildOrganizationsStrictDefaults"),
    down: Rollback::Reversible(Operation::Script(
        "2025-06-15_01_RebuildOrganizationsLooseDefaults",
    )),
    suspend_foreign_keys: true,
};
