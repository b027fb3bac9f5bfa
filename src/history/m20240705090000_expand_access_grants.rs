use crate::changeset::{ChangeSet, Operation, Rollback};

// Synthesized grant rows are indistinguishable from hand-written ones
// afterwards, so this backfill cannot be undone.
pub const CHANGE_SET: ChangeSet = ChangeSet {
    id: "20240705090000_ExpandAccessGrants",
    up: Operation::Script("2024-07-05_00_ExpandAccessGrants"),
    down: Rollback::ForwardOnly,
    suspend_foreign_keys: false,
};
