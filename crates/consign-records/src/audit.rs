use serde::Serialize;

/// Result of checking an index against the records it lists.
///
/// The audit is read-only and repairs nothing. It can find index entries
/// whose record is missing or corrupt, and identifiers listed twice. It
/// cannot find orphaned records (written but never indexed), because the
/// store offers no way to enumerate keys.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct IndexAudit {
    pub schema: String,
    pub index_key: String,
    /// Number of identifiers in the index record.
    pub index_len: usize,
    /// Indexed identifiers whose record decodes.
    pub present: Vec<String>,
    /// Indexed identifiers with no record.
    pub missing: Vec<String>,
    /// Indexed identifiers whose record fails to decode, with the reason.
    pub corrupt: Vec<(String, String)>,
    /// Identifiers listed more than once.
    pub duplicates: Vec<String>,
}

impl IndexAudit {
    /// Returns `true` if every indexed identifier resolves exactly once.
    pub fn is_consistent(&self) -> bool {
        self.missing.is_empty() && self.corrupt.is_empty() && self.duplicates.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_audit_is_consistent() {
        assert!(IndexAudit::default().is_consistent());
    }

    #[test]
    fn any_defect_is_inconsistent() {
        let audit = IndexAudit {
            missing: vec!["P9".into()],
            ..Default::default()
        };
        assert!(!audit.is_consistent());

        let audit = IndexAudit {
            corrupt: vec![("P3".into(), "eof".into())],
            ..Default::default()
        };
        assert!(!audit.is_consistent());
    }
}
