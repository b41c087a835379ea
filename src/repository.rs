//! Table access on top of a pluggable byte source.
//!
//! [`MasterDataRepo`] decodes each table at most once per instance and hands
//! out shared row vectors; the index helpers build the lookup maps the
//! composition repos need. The repo is single-threaded by design, matching
//! the one-shot snapshot workload.

use std::any::Any;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt::Display;
use std::fs;
use std::hash::Hash;
use std::path::PathBuf;
use std::rc::Rc;

use anyhow::Context;

use crate::error::{MasterDataError, Result};
use crate::schema::{decode_all, Record, Table};

/// Provider of raw table payloads.
///
/// Implementations decide where bytes come from (directory snapshot, asset
/// archive, in-memory fixture); the repo owns decoding and caching.
pub trait MasterDataSource {
    fn bytes_for(&self, table: Table) -> anyhow::Result<Vec<u8>>;
}

/// Source reading `<root>/<TableName>.bin` from a local snapshot directory.
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl MasterDataSource for DirectorySource {
    fn bytes_for(&self, table: Table) -> anyhow::Result<Vec<u8>> {
        let path = self.root.join(format!("{}.bin", table.name()));
        fs::read(&path).with_context(|| format!("reading {}", path.display()))
    }
}

/// Decoding cache over a [`MasterDataSource`].
pub struct MasterDataRepo {
    source: Box<dyn MasterDataSource>,
    cache: RefCell<HashMap<Table, Rc<dyn Any>>>,
}

impl MasterDataRepo {
    pub fn new(source: Box<dyn MasterDataSource>) -> Self {
        Self {
            source,
            cache: RefCell::new(HashMap::new()),
        }
    }

    /// All rows of `T`'s table, decoded once and shared thereafter.
    pub fn read<T: Record + 'static>(&self) -> Result<Rc<Vec<T>>> {
        if let Some(entry) = self.cache.borrow().get(&T::TABLE) {
            let rows = entry
                .clone()
                .downcast::<Vec<T>>()
                .expect("cache entries are keyed by their record's table");
            return Ok(rows);
        }
        let bytes = self
            .source
            .bytes_for(T::TABLE)
            .map_err(|source| MasterDataError::Source {
                table: T::TABLE,
                source,
            })?;
        let rows: Rc<Vec<T>> = Rc::new(decode_all(&bytes).map_err(|source| {
            MasterDataError::Decode {
                table: T::TABLE,
                source,
            }
        })?);
        self.cache
            .borrow_mut()
            .insert(T::TABLE, rows.clone() as Rc<dyn Any>);
        Ok(rows)
    }

    /// Unique-key lookup map. A duplicate key is a data defect and fatal.
    pub fn index<T, K, F>(&self, key: F) -> Result<HashMap<K, T>>
    where
        T: Record + Clone + 'static,
        K: Eq + Hash + Display,
        F: Fn(&T) -> K,
    {
        let rows = self.read::<T>()?;
        let mut map = HashMap::with_capacity(rows.len());
        for row in rows.iter() {
            let k = key(row);
            if map.contains_key(&k) {
                return Err(MasterDataError::DuplicateKey {
                    table: T::TABLE,
                    key: k.to_string(),
                });
            }
            map.insert(k, row.clone());
        }
        Ok(map)
    }

    /// Multi-row grouping, preserving wire order within each group.
    pub fn group_by<T, K, F>(&self, key: F) -> Result<HashMap<K, Vec<T>>>
    where
        T: Record + Clone + 'static,
        K: Eq + Hash,
        F: Fn(&T) -> K,
    {
        let rows = self.read::<T>()?;
        let mut map: HashMap<K, Vec<T>> = HashMap::new();
        for row in rows.iter() {
            map.entry(key(row)).or_default().push(row.clone());
        }
        Ok(map)
    }

    /// Two-level unique index; duplicates within a leaf are fatal.
    pub fn nested_index<T, K1, K2, F>(&self, key: F) -> Result<HashMap<K1, HashMap<K2, T>>>
    where
        T: Record + Clone + 'static,
        K1: Eq + Hash + Display,
        K2: Eq + Hash + Display,
        F: Fn(&T) -> (K1, K2),
    {
        let rows = self.read::<T>()?;
        let mut map: HashMap<K1, HashMap<K2, T>> = HashMap::new();
        for row in rows.iter() {
            let (k1, k2) = key(row);
            let leaf = map.entry(k1).or_default();
            if leaf.contains_key(&k2) {
                return Err(MasterDataError::DuplicateKey {
                    table: T::TABLE,
                    key: k2.to_string(),
                });
            }
            leaf.insert(k2, row.clone());
        }
        Ok(map)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::schema::encode_all;
    use crate::schema::records::UnitEvolutionPatternRow;

    struct CountingSource {
        payload: Vec<u8>,
        reads: Rc<Cell<usize>>,
    }

    impl MasterDataSource for CountingSource {
        fn bytes_for(&self, _table: Table) -> anyhow::Result<Vec<u8>> {
            self.reads.set(self.reads.get() + 1);
            Ok(self.payload.clone())
        }
    }

    fn repo_with(rows: &[UnitEvolutionPatternRow]) -> (MasterDataRepo, Rc<Cell<usize>>) {
        let reads = Rc::new(Cell::new(0));
        let source = CountingSource {
            payload: encode_all(rows),
            reads: reads.clone(),
        };
        (MasterDataRepo::new(Box::new(source)), reads)
    }

    fn edge(id: i32, unit_id: i32, target: i32) -> UnitEvolutionPatternRow {
        UnitEvolutionPatternRow {
            id,
            unit_id,
            target_unit_id: target,
            threshold_level: 30,
            money: 0,
        }
    }

    #[test]
    fn test_read_decodes_once() {
        let (repo, reads) = repo_with(&[edge(1, 10, 11)]);
        let first = repo.read::<UnitEvolutionPatternRow>().unwrap();
        let second = repo.read::<UnitEvolutionPatternRow>().unwrap();
        assert_eq!(reads.get(), 1);
        assert!(Rc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_index_rejects_duplicate_keys() {
        let (repo, _) = repo_with(&[edge(1, 10, 11), edge(2, 10, 12)]);
        let err = repo
            .index::<UnitEvolutionPatternRow, _, _>(|r| r.unit_id)
            .unwrap_err();
        assert!(matches!(
            err,
            MasterDataError::DuplicateKey {
                table: Table::UnitEvolutionPattern,
                ..
            }
        ));
    }

    #[test]
    fn test_group_by_preserves_order() {
        let (repo, _) = repo_with(&[edge(1, 10, 11), edge(2, 10, 12), edge(3, 20, 21)]);
        let groups = repo
            .group_by::<UnitEvolutionPatternRow, _, _>(|r| r.unit_id)
            .unwrap();
        let ids: Vec<i32> = groups[&10].iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(groups[&20].len(), 1);
    }

    #[test]
    fn test_nested_index() {
        let (repo, _) = repo_with(&[edge(1, 10, 11), edge(2, 20, 21)]);
        let nested = repo
            .nested_index::<UnitEvolutionPatternRow, _, _, _>(|r| (r.unit_id, r.target_unit_id))
            .unwrap();
        assert_eq!(nested[&10][&11].id, 1);
        assert_eq!(nested[&20][&21].id, 2);
    }

    #[test]
    fn test_source_failure_carries_table() {
        struct FailingSource;
        impl MasterDataSource for FailingSource {
            fn bytes_for(&self, _table: Table) -> anyhow::Result<Vec<u8>> {
                anyhow::bail!("snapshot missing")
            }
        }
        let repo = MasterDataRepo::new(Box::new(FailingSource));
        let err = repo.read::<UnitEvolutionPatternRow>().unwrap_err();
        assert!(matches!(
            err,
            MasterDataError::Source {
                table: Table::UnitEvolutionPattern,
                ..
            }
        ));
    }
}
