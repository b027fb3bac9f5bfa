//! The Lockbox schema history, one module per change-set.
//!
//! Ids are `{yyyyMMddHHmmss}_{DescriptiveName}` and the registry below must
//! stay in ascending order; `Runner::open` refuses a history that is not.

mod m20230907121500_core_identity;
mod m20230907124500_vault_items;
mod m20231019140000_collection_access;
mod m20231120163000_auth_credentials;
mod m20240109103000_event_log;
mod m20240130155000_passwordless_auth;
mod m20240215120000_provider_tier;
mod m20240318094500_organization_sponsorships;
mod m20240402113000_org_policies;
mod m20240506132000_secrets_manager;
mod m20240704171500_collection_manage_flag;
mod m20240705090000_expand_access_grants;
mod m20240705090100_drop_access_all_columns;
mod m20240822101500_event_index_tuning;
mod m20241112160000_notifications;
mod m20250204110000_key_rotation_credentials;
mod m20250320143000_provider_billing;
mod m20250430101500_organization_reports;
mod m20250615084500_tighten_organization_defaults;

use crate::changeset::ChangeSet;

static HISTORY: [ChangeSet; 19] = [
    m20230907121500_core_identity::CHANGE_SET,
    m20230907124500_vault_items::CHANGE_SET,
    m20231019140000_collection_access::CHANGE_SET,
    m20231120163000_auth_credentials::CHANGE_SET,
    m20240109103000_event_log::CHANGE_SET,
    m20240130155000_passwordless_auth::CHANGE_SET,
    m20240215120000_provider_tier::CHANGE_SET,
    m20240318094500_organization_sponsorships::CHANGE_SET,
    m20240402113000_org_policies::CHANGE_SET,
    m20240506132000_secrets_manager::CHANGE_SET,
    m20240704171500_collection_manage_flag::CHANGE_SET,
    m20240705090000_expand_access_grants::CHANGE_SET,
    m20240705090100_drop_access_all_columns::CHANGE_SET,
    m20240822101500_event_index_tuning::CHANGE_SET,
    m20241112160000_notifications::CHANGE_SET,
    m20250204110000_key_rotation_credentials::CHANGE_SET,
    m20250320143000_provider_billing::CHANGE_SET,
    m20250430101500_organization_reports::CHANGE_SET,
    m20250615084500_tighten_organization_defaults::CHANGE_SET,
];

/// Every bundled change-set, ascending.
#[must_use]
pub fn history() -> &'static [ChangeSet] {
    &HISTORY
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::changeset::{Operation, Rollback, validate_history};

    #[test]
    fn test_bundled_history_is_well_ordered() {
        validate_history(history()).unwrap();
    }

    #[test]
    fn test_bundled_scripts_resolve_and_verify() {
        for change_set in history() {
            let mut ops = vec![&change_set.up];
            if let Rollback::Reversible(down) = &change_set.down {
                ops.push(down);
            }
            for op in ops {
                if let Operation::Script(name) = op {
                    crate::scripts::load(name).unwrap();
                }
            }
        }
    }

    #[test]
    fn test_access_grant_expansion_is_forward_only() {
        let expand = history()
            .iter()
            .find(|cs| cs.name() == "ExpandAccessGrants")
            .unwrap();
        assert!(!expand.is_reversible());

        let forward_only = history().iter().filter(|cs| !cs.is_reversible()).count();
        assert_eq!(forward_only, 1);
    }
}
