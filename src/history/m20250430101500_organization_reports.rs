use crate::changeset::{ChangeSet, Operation, Rollback};

pub const CHANGE_SET: ChangeSet = ChangeSet {
    id: "20250430101500_OrganizationReports",
    up: Operation::Sql(UP),
    down: Rollback::Reversible(Operation::Sql(DOWN)),
    suspend_foreign_keys: false,
};

const UP: &str = r#"
-- Periodic security-health snapshots per organization. The report payloads
-- are encrypted client-side under content_encryption_key.
CREATE TABLE organization_reports (
    id TEXT PRIMARY KEY,
    organization_id TEXT NOT NULL REFERENCES organizations (id) ON DELETE CASCADE,
    generated_at TEXT NOT NULL,
    summary_data TEXT,
    report_data TEXT,
    application_data TEXT,
    content_encryption_key TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE INDEX idx_organization_reports_organization_id_generated_at
    ON organization_reports (organization_id, generated_at);
"#;

const DOWN: &str = r#"
DROP TABLE organization_reports;
"#;
