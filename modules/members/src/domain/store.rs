use std::sync::atomic::{AtomicI64, Ordering};

use dashmap::DashMap;
use tracing::debug;

use crate::domain::error::MemberError;
use crate::generated::member;

/// Process-local member storage. Members are kept in their latest version.
#[derive(Debug)]
pub struct MemberStore {
    members: DashMap<i64, member::Version2>,
    next_id: AtomicI64,
}

impl Default for MemberStore {
    fn default() -> Self {
        Self {
            members: DashMap::new(),
            next_id: AtomicI64::new(1),
        }
    }
}

impl MemberStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a member of any version. Returns the new id and the stored record.
    pub fn insert(&self, value: member::All) -> (i64, member::Version2) {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let latest = upgrade(value);
        self.members.insert(id, latest.clone());
        debug!(id, "member stored");
        (id, latest)
    }

    pub fn get(&self, id: i64) -> Result<member::Version2, MemberError> {
        if id < 1 {
            return Err(MemberError::InvalidId { id });
        }
        self.members
            .get(&id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| MemberError::not_found(id))
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Bring any member version up to the latest one.
pub fn upgrade(value: member::All) -> member::Version2 {
    match value {
        member::All::Version1(v1) => member::Version2 {
            first_name: v1.first_name,
            last_name: v1.last_name,
            records: Vec::new(),
        },
        member::All::Version2(v2) => v2,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generated::Record;

    #[test]
    fn older_versions_are_upgraded_on_insert() {
        let store = MemberStore::new();
        let (id, stored) = store.insert(member::All::Version1(member::Version1 {
            first_name: "Simon".into(),
            last_name: "Backx".into(),
        }));

        assert_eq!(id, 1);
        assert!(stored.records.is_empty());
        assert_eq!(store.get(id).unwrap(), stored);
    }

    #[test]
    fn ids_are_assigned_in_order() {
        let store = MemberStore::new();
        let simon = member::All::Version2(member::Version2 {
            first_name: "Simon".into(),
            last_name: "Backx".into(),
            records: vec![Record { name: "hallo".into() }],
        });
        assert_eq!(store.insert(simon.clone()).0, 1);
        assert_eq!(store.insert(simon).0, 2);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn lookups_report_missing_and_invalid_ids() {
        let store = MemberStore::new();
        assert!(matches!(store.get(7), Err(MemberError::NotFound { id: 7 })));
        assert!(matches!(store.get(0), Err(MemberError::InvalidId { id: 0 })));
    }
}
