use crate::changeset::{ChangeSet, Operation, Rollback};

pub const CHANGE_SET: ChangeSet = ChangeSet {
    id: "20240822101500_EventIndexTuning",
    up: Operation::Sql(UP),
    down: Rollback::Reversible(Operation::Sql(DOWN)),
    suspend_foreign_keys: false,
};

// Admin event exports filter by actor; widen the org/date index instead of
// adding a third one.
const UP: &str = r#"
DROP INDEX idx_events_organization_id_occurred_at;
CREATE INDEX idx_events_organization_id_occurred_at_acting_user_id
    ON events (organization_id, occurred_at, acting_user_id);
"#;

const DOWN: &str = r#"
DROP INDEX idx_events_organization_id_occurred_at_acting_user_id;
CREATE INDEX idx_events_organization_id_occurred_at ON events (organization_id, occurred_at);
"#;
