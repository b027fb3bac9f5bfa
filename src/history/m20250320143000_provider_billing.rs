use crate::changeset::{ChangeSet, Operation, Rollback};

pub const CHANGE_SET: ChangeSet = ChangeSet {
    id: "20250320143000_ProviderBilling",
    up: Operation::Sql(UP),
    down: Rollback::Reversible(Operation::Sql(DOWN)),
    suspend_foreign_keys: false,
};

const UP: &str = r#"
-- Seat tiers a provider has purchased, one row per plan.
CREATE TABLE provider_plans (
    id TEXT PRIMARY KEY,
    provider_id TEXT NOT NULL REFERENCES providers (id) ON DELETE CASCADE,
    plan_type INTEGER NOT NULL,
    seat_minimum INTEGER,
    purchased_seats INTEGER,
    allocated_seats INTEGER
);

CREATE UNIQUE INDEX idx_provider_plans_provider_id_plan_type
    ON provider_plans (provider_id, plan_type);

-- Invoice lines mirrored from the payment gateway. Money in cents.
CREATE TABLE provider_invoice_items (
    id TEXT PRIMARY KEY,
    provider_id TEXT NOT NULL REFERENCES providers (id) ON DELETE CASCADE,
    invoice_id TEXT NOT NULL,
    invoice_number TEXT NOT NULL,
    client_name TEXT NOT NULL,
    plan_name TEXT NOT NULL,
    assigned_seats INTEGER NOT NULL DEFAULT 0,
    used_seats INTEGER NOT NULL DEFAULT 0,
    total_cents INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL
);

CREATE INDEX idx_provider_invoice_items_provider_id ON provider_invoice_items (provider_id);
"#;

const DOWN: &str = r#"
DROP TABLE provider_invoice_items;
DROP TABLE provider_plans;
"#;
