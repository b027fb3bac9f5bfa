use chrono::NaiveDateTime;

use crate::error::{Error, Result};

/// Digits in the `yyyyMMddHHmmss` prefix of a change-set id.
pub const TIMESTAMP_LEN: usize = 14;

/// One schema revision: an id, how to apply it, and how (or whether) to undo it.
#[derive(Debug, Clone)]
pub struct ChangeSet {
    /// `{yyyyMMddHHmmss}_{DescriptiveName}`. The history is ordered by this id.
    pub id: &'static str,
    pub up: Operation,
    pub down: Rollback,
    /// Set on change-sets that rebuild a table other tables reference. The
    /// runner turns foreign key enforcement off around the transaction and
    /// gates the commit on `PRAGMA foreign_key_check` reporting nothing.
    pub suspend_foreign_keys: bool,
}

/// The executable side of a change-set.
#[derive(Debug, Clone)]
pub enum Operation {
    /// Inline SQL batch, executed verbatim.
    Sql(&'static str),
    /// Logical name of an embedded script, resolved through the manifest.
    Script(&'static str),
}

/// How a change-set rolls back.
#[derive(Debug, Clone)]
pub enum Rollback {
    Reversible(Operation),
    /// Applying this change-set loses information a rollback would need.
    /// Rollback plans containing one are rejected before anything executes.
    ForwardOnly,
}

impl ChangeSet {
    /// The `yyyyMMddHHmmss` prefix of the id.
    #[must_use]
    pub fn timestamp(&self) -> &str {
        self.id.get(..TIMESTAMP_LEN).unwrap_or(self.id)
    }

    /// The descriptive name after the timestamp.
    #[must_use]
    pub fn name(&self) -> &str {
        match self.id.split_once('_') {
            Some((_, name)) => name,
            None => self.id,
        }
    }

    #[must_use]
    pub fn is_reversible(&self) -> bool {
        matches!(self.down, Rollback::Reversible(_))
    }
}

/// Checks one id against the `{yyyyMMddHHmmss}_{DescriptiveName}` shape.
pub fn validate_id(id: &str) -> Result<()> {
    let bad = || Error::InvalidId(id.to_string());

    let (stamp, name) = id.split_at_checked(TIMESTAMP_LEN).ok_or_else(bad)?;
    if !stamp.bytes().all(|b| b.is_ascii_digit()) {
        return Err(bad());
    }
    if NaiveDateTime::parse_from_str(stamp, "%Y%m%d%H%M%S").is_err() {
        return Err(bad());
    }
    let Some(name) = name.strip_prefix('_') else {
        return Err(bad());
    };
    if name.is_empty() || !name.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_') {
        return Err(bad());
    }
    Ok(())
}

/// Checks a whole history: valid ids, strictly ascending, no duplicates.
///
/// Lexical order on valid ids equals timestamp order, so a single comparison
/// covers both duplicate and out-of-order ids.
pub fn validate_history(history: &[ChangeSet]) -> Result<()> {
    for change_set in history {
        validate_id(change_set.id)?;
    }
    for pair in history.windows(2) {
        if pair[0].id >= pair[1].id {
            return Err(Error::OrderingConflict(format!(
                "{} does not precede {}",
                pair[0].id, pair[1].id
            )));
        }
    }
    Ok(())
}
