use crate::changeset::{ChangeSet, Operation, Rollback};

pub const CHANGE_SET: ChangeSet = ChangeSet {
    id: "20240318094500_OrganizationSponsorships",
    up: Operation::Sql(UP),
    down: Rollback::Reversible(Operation::Sql(DOWN)),
    suspend_foreign_keys: false,
};

const UP: &str = r#"
-- An organization seat sponsoring a personal plan. The org edges soften to
-- NULL so the sponsorship record outlives either side; a sweep job handles
-- rows flagged to_delete.
CREATE TABLE organization_sponsorships (
    id TEXT PRIMARY KEY,
    sponsoring_organization_id TEXT REFERENCES organizations (id) ON DELETE SET NULL,
    sponsoring_organization_user_id TEXT NOT NULL,
    sponsored_organization_id TEXT REFERENCES organizations (id) ON DELETE SET NULL,
    friendly_name TEXT,
    offered_to_email TEXT,
    plan_sponsorship_type INTEGER,
    to_delete INTEGER NOT NULL DEFAULT 0,
    last_synced_at TEXT,
    valid_until TEXT
);

CREATE INDEX idx_organization_sponsorships_sponsoring_organization_id
    ON organization_sponsorships (sponsoring_organization_id);
CREATE INDEX idx_organization_sponsorships_sponsored_organization_id
    ON organization_sponsorships (sponsored_organization_id);
"#;

const DOWN: &str = r#"
DROP TABLE organization_sponsorships;
"#;
