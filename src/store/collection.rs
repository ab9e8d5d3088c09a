use std::collections::btree_map::Values;
use std::collections::{BTreeMap, HashMap};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::types::{OrbitalElements, Satellite, SatelliteId, SatellitePass, TelemetryPoint};

/// A row that can live in a [`Collection`].
pub trait Record: Clone {
    fn id(&self) -> u64;

    /// Owning satellite, used for the per-satellite index.
    fn satellite_id(&self) -> Option<SatelliteId>;
}

/// Append-only rows of one entity kind with their own id sequence.
///
/// Ids start at 1, grow by one per insert and are never reused. Rows are kept
/// keyed by id, so iteration order is insertion order. A secondary index maps
/// each satellite to its row ids (also in insertion order).
///
/// One `RwLock` guards the whole collection; it is only held for the duration
/// of a single call.
pub struct Collection<T> {
    inner: RwLock<Rows<T>>,
}

struct Rows<T> {
    next_id: u64,
    rows: BTreeMap<u64, T>,
    by_satellite: HashMap<SatelliteId, Vec<u64>>,
}

impl<T: Record> Default for Collection<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Record> Collection<T> {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Rows {
                next_id: 1,
                rows: BTreeMap::new(),
                by_satellite: HashMap::new(),
            }),
        }
    }

    // Poisoned locks are recovered; rows never hold partial writes.
    fn read(&self) -> RwLockReadGuard<'_, Rows<T>> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Rows<T>> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Allocate the next id and insert the row built from it.
    pub fn insert_with(&self, build: impl FnOnce(u64) -> T) -> T {
        let mut rows = self.write();
        let id = rows.next_id;
        let row = build(id);
        rows.commit(row.clone());
        row
    }

    /// Like [`insert_with`](Self::insert_with), but the builder sees the
    /// existing rows and may refuse. The id is only consumed on success.
    pub fn try_insert_with<E>(
        &self,
        build: impl FnOnce(u64, Values<'_, u64, T>) -> Result<T, E>,
    ) -> Result<T, E> {
        let mut rows = self.write();
        let id = rows.next_id;
        let row = build(id, rows.rows.values())?;
        rows.commit(row.clone());
        Ok(row)
    }

    pub fn get(&self, id: u64) -> Option<T> {
        self.read().rows.get(&id).cloned()
    }

    /// All rows in insertion order.
    pub fn list(&self) -> Vec<T> {
        self.read().rows.values().cloned().collect()
    }

    pub fn find(&self, predicate: impl Fn(&T) -> bool) -> Option<T> {
        self.read().rows.values().find(|row| predicate(row)).cloned()
    }

    /// Rows owned by `satellite`, in insertion order.
    pub fn for_satellite(&self, satellite: SatelliteId) -> Vec<T> {
        let rows = self.read();
        rows.by_satellite
            .get(&satellite)
            .map(|ids| ids.iter().filter_map(|id| rows.rows.get(id)).cloned().collect())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.read().rows.len()
    }

    /// Replace row `id` with the value computed from the current row and its
    /// siblings. `Ok(None)` when `id` does not exist.
    pub fn try_update<E>(
        &self,
        id: u64,
        apply: impl FnOnce(&T, Values<'_, u64, T>) -> Result<T, E>,
    ) -> Result<Option<T>, E> {
        let mut rows = self.write();
        let Some(current) = rows.rows.get(&id) else {
            return Ok(None);
        };
        let old_owner = current.satellite_id();
        let updated = apply(current, rows.rows.values())?;

        if updated.satellite_id() != old_owner {
            if let Some(owner) = old_owner {
                if let Some(ids) = rows.by_satellite.get_mut(&owner) {
                    ids.retain(|row_id| *row_id != id);
                }
            }
            if let Some(owner) = updated.satellite_id() {
                let ids = rows.by_satellite.entry(owner).or_default();
                let at = ids.partition_point(|row_id| *row_id < id);
                ids.insert(at, id);
            }
        }

        rows.rows.insert(id, updated.clone());
        Ok(Some(updated))
    }
}

impl<T: Record> Rows<T> {
    fn commit(&mut self, row: T) {
        let id = row.id();
        self.next_id = self.next_id.max(id + 1);
        if let Some(owner) = row.satellite_id() {
            self.by_satellite.entry(owner).or_default().push(id);
        }
        self.rows.insert(id, row);
    }
}

impl Record for Satellite {
    fn id(&self) -> u64 {
        self.id
    }

    fn satellite_id(&self) -> Option<SatelliteId> {
        None
    }
}

impl Record for TelemetryPoint {
    fn id(&self) -> u64 {
        self.id
    }

    fn satellite_id(&self) -> Option<SatelliteId> {
        self.satellite_id
    }
}

impl Record for SatellitePass {
    fn id(&self) -> u64 {
        self.id
    }

    fn satellite_id(&self) -> Option<SatelliteId> {
        self.satellite_id
    }
}

impl Record for OrbitalElements {
    fn id(&self) -> u64 {
        self.id
    }

    fn satellite_id(&self) -> Option<SatelliteId> {
        self.satellite_id
    }
}
