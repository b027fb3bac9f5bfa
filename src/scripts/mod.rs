//! Embedded raw-SQL scripts for data motion that plain DDL cannot express.
//!
//! Every script a change-set names must have a manifest entry mapping its
//! logical name to the embedded text and a sha256 of that text. The digest is
//! re-checked on every load, so a script edited without its checksum (or the
//! reverse) fails loudly instead of silently drifting from the change-set
//! that references it.

use sha2::{Digest, Sha256};

use crate::error::{Error, Result};

/// One embedded script: logical name, sha256 of the text, and the text itself.
#[derive(Debug, Clone)]
pub struct Script {
    /// File stem of the embedded file, `{yyyy-MM-dd}_{NN}_{Name}`.
    pub name: &'static str,
    /// Lowercase sha256 hex of `text`.
    pub checksum: &'static str,
    pub text: &'static str,
}

/// Every script bundled with the history, in name order.
pub static MANIFEST: &[Script] = &[
    Script {
        name: "2024-07-05_00_ExpandAccessGrants",
        checksum: "740a4534cfef1b8565773cd37e30d76daa7fdd912edd8996eb3c2b36138d4c0f",
        text: include_str!("sql/2024-07-05_00_ExpandAccessGrants.sql"),
    },
    Script {
        name: "2025-06-15_00_RebuildOrganizationsStrictDefaults",
        checksum: "5399fbe5b9dfa515c01090e41f4f1b379064b061676ac51307b99d3ae29185a7",
        text: include_str!("sql/2025-06-15_00_RebuildOrganizationsStrictDefaults.sql"),
    },
    Script {
        name: "2025-06-15_01_RebuildOrganizationsLooseDefaults",
        checksum: "0506fe0ecfa51b553541c05305ccc24b0a3e844e26b73eedef8c41baa12c000a",
        text: include_str!("sql/2025-06-15_01_RebuildOrganizationsLooseDefaults.sql"),
    },
];

/// Looks a script up by logical name.
pub fn find(name: &str) -> Result<&'static Script> {
    MANIFEST
        .iter()
        .find(|script| script.name == name)
        .ok_or_else(|| Error::MissingScript {
            name: name.to_string(),
        })
}

/// Recomputes the digest of the embedded text against the manifest entry.
pub fn verify(script: &Script) -> Result<()> {
    if digest(script.text) != script.checksum {
        return Err(Error::ScriptChecksum {
            name: script.name.to_string(),
        });
    }
    Ok(())
}

/// Resolves and verifies a script; what the runner calls per execution.
pub fn load(name: &str) -> Result<&'static str> {
    let script = find(name)?;
    verify(script)?;
    Ok(script.text)
}

fn digest(text: &str) -> String {
    hex::encode(Sha256::digest(text.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manifest_entries_verify() {
        for script in MANIFEST {
            verify(script).unwrap_or_else(|e| panic!("{}: {e}", script.name));
        }
    }

    #[test]
    fn test_manifest_names_are_unique_and_well_formed() {
        for (i, script) in MANIFEST.iter().enumerate() {
            assert!(
                MANIFEST[..i].iter().all(|prior| prior.name != script.name),
                "duplicate script name {}",
                script.name
            );

            // {yyyy-MM-dd}_{NN}_{Name}
            let bytes = script.name.as_bytes();
            assert!(bytes.len() > 14, "name too short: {}", script.name);
            let (date, rest) = script.name.split_at(10);
            assert!(
                chrono::NaiveDate::parse_from_str(date, "%Y-%m-%d").is_ok(),
                "bad date prefix in {}",
                script.name
            );
            let rest = rest.strip_prefix('_').expect("separator after date");
            let (seq, name) = rest.split_at(2);
            assert!(seq.bytes().all(|b| b.is_ascii_digit()), "bad sequence in {seq}");
            let name = name.strip_prefix('_').expect("separator after sequence");
            assert!(!name.is_empty());
        }
    }

    #[test]
    fn test_find_unknown_name_is_missing_script() {
        assert!(matches!(
            find("2024-01-01_00_NoSuchScript"),
            Err(Error::MissingScript { .. })
        ));
    }

    #[test]
    fn test_load_returns_the_text() {
        let text = load("2024-07-05_00_ExpandAccessGrants").unwrap();
        assert!(text.contains("INSERT OR IGNORE INTO collection_users"));
    }

    #[test]
    fn test_verify_rejects_tampered_text() {
        let script = Script {
            name: "2024-07-05_00_ExpandAccessGrants",
            checksum: "740a4534cfef1b8565773cd37e30d76daa7fdd912edd8996eb3c2b36138d4c0f",
            text: "DELETE FROM collection_users;",
        };
        assert!(matches!(
            verify(&script),
            Err(Error::ScriptChecksum { .. })
        ));
    }
}
