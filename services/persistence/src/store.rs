//! Entity store contract and in-memory implementation
//!
//! The ledger never sees storage details: it loads an entity by id, gets
//! `None` when the row is absent, and saves whole rows back. Rows travel as
//! `serde_json::Value` so any backend that can hold JSON documents can
//! implement the trait.

use serde_json::Value;
use std::collections::BTreeMap;
use thiserror::Error;
use types::entity::{Entity, EntityKind};

// ── Errors ──────────────────────────────────────────────────────────

#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    #[error("Serialization error for {kind} {id}: {reason}")]
    Serialization {
        kind: EntityKind,
        id: String,
        reason: String,
    },

    #[error("Storage backend error: {0}")]
    Backend(String),
}

// ── Contract ────────────────────────────────────────────────────────

/// Key-value store of entity rows.
pub trait EntityStore {
    /// Raw row, `None` when absent.
    fn get(&self, kind: EntityKind, id: &str) -> Result<Option<Value>, StoreError>;

    /// Insert or overwrite a row.
    fn put(&mut self, kind: EntityKind, id: &str, row: Value) -> Result<(), StoreError>;

    fn exists(&self, kind: EntityKind, id: &str) -> Result<bool, StoreError> {
        Ok(self.get(kind, id)?.is_some())
    }

    /// Typed load.
    fn load<E: Entity>(&self, id: &str) -> Result<Option<E>, StoreError>
    where
        Self: Sized,
    {
        match self.get(E::KIND, id)? {
            Some(row) => serde_json::from_value(row)
                .map(Some)
                .map_err(|e| StoreError::Serialization {
                    kind: E::KIND,
                    id: id.to_string(),
                    reason: e.to_string(),
                }),
            None => Ok(None),
        }
    }

    /// Typed save, keyed by the entity's own id.
    fn save<E: Entity>(&mut self, entity: &E) -> Result<(), StoreError>
    where
        Self: Sized,
    {
        let row = serde_json::to_value(entity).map_err(|e| StoreError::Serialization {
            kind: E::KIND,
            id: entity.id().to_string(),
            reason: e.to_string(),
        })?;
        self.put(E::KIND, entity.id(), row)
    }
}

// ── In-memory store ─────────────────────────────────────────────────

/// Rows per entity kind, each table sorted by id.
pub type Tables = BTreeMap<EntityKind, BTreeMap<String, Value>>;

/// `BTreeMap`-backed store with deterministic iteration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryStore {
    tables: Tables,
    writes: u64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a store from captured tables.
    pub fn from_tables(tables: Tables) -> Self {
        Self { tables, writes: 0 }
    }

    pub fn tables(&self) -> &Tables {
        &self.tables
    }

    pub fn table(&self, kind: EntityKind) -> Option<&BTreeMap<String, Value>> {
        self.tables.get(&kind)
    }

    /// Number of rows of one kind.
    pub fn count(&self, kind: EntityKind) -> usize {
        self.tables.get(&kind).map_or(0, BTreeMap::len)
    }

    pub fn total_rows(&self) -> usize {
        self.tables.values().map(BTreeMap::len).sum()
    }

    /// Number of `put` calls since creation, overwrites included.
    pub fn writes(&self) -> u64 {
        self.writes
    }
}

impl EntityStore for MemoryStore {
    fn get(&self, kind: EntityKind, id: &str) -> Result<Option<Value>, StoreError> {
        Ok(self.tables.get(&kind).and_then(|t| t.get(id)).cloned())
    }

    fn put(&mut self, kind: EntityKind, id: &str, row: Value) -> Result<(), StoreError> {
        self.tables
            .entry(kind)
            .or_default()
            .insert(id.to_string(), row);
        self.writes += 1;
        Ok(())
    }
}

// ── Tests ───────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use types::account::User;
    use types::ids::Address;
    use types::numeric::Decimal;

    #[test]
    fn test_load_absent_is_none() {
        let store = MemoryStore::new();
        let user: Option<User> = store.load("0xabc").unwrap();
        assert!(user.is_none());
    }

    #[test]
    fn test_save_then_load() {
        let mut store = MemoryStore::new();
        let mut user = User::new(Address::new([7u8; 20]));
        user.total_vault_dai = Decimal::from(12i64);
        store.save(&user).unwrap();

        let loaded: User = store.load(&user.id).unwrap().unwrap();
        assert_eq!(loaded, user);
        assert_eq!(store.count(EntityKind::User), 1);
    }

    #[test]
    fn test_overwrite_keeps_one_row() {
        let mut store = MemoryStore::new();
        let user = User::new(Address::new([7u8; 20]));
        store.save(&user).unwrap();
        store.save(&user).unwrap();
        assert_eq!(store.count(EntityKind::User), 1);
        assert_eq!(store.writes(), 2);
    }

    #[test]
    fn test_kinds_are_separate_tables() {
        let mut store = MemoryStore::new();
        store.put(EntityKind::Vault, "x", json!({"a": 1})).unwrap();
        assert!(store.exists(EntityKind::Vault, "x").unwrap());
        assert!(!store.exists(EntityKind::User, "x").unwrap());
    }

    #[test]
    fn test_malformed_row_is_serialization_error() {
        let mut store = MemoryStore::new();
        store.put(EntityKind::User, "bad", json!({"id": 5})).unwrap();
        let err = store.load::<User>("bad").unwrap_err();
        assert!(matches!(err, StoreError::Serialization { kind: EntityKind::User, .. }));
    }
}
