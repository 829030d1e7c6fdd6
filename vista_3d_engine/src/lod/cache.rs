/// Named, reference-counted LOD list cache.
///
/// All instances of the same ROI type share one [`ViewLodList`]. The cache
/// is the unique owner of every managed list; outside holders keep a
/// [`LodListKey`] and route every access and every reference-count change
/// through the cache, so a list is destroyed exactly once, when its count
/// reaches zero.

use rustc_hash::FxHashMap;
use slotmap::{new_key_type, SlotMap};

use crate::{engine_debug, engine_warn};

use super::lod_list::LodList;
use super::view_lod::ViewLod;

/// LOD list shared between all instances of one ROI type.
pub type ViewLodList = LodList<ViewLod>;

new_key_type! {
    /// Stable handle to a cache-owned [`ViewLodList`].
    pub struct LodListKey;
}

struct CacheEntry {
    name: String,
    ref_count: u32,
    list: ViewLodList,
}

/// Registry of [`ViewLodList`]s keyed by ROI type name.
///
/// Names are case-sensitive; comparison is strict. Lookup failures are
/// silent (`None`).
pub struct LodCache {
    entries: SlotMap<LodListKey, CacheEntry>,
    by_name: FxHashMap<String, LodListKey>,
    name_uid: u64,
}

impl LodCache {
    pub fn new() -> Self {
        Self {
            entries: SlotMap::with_key(),
            by_name: FxHashMap::default(),
            name_uid: 0,
        }
    }

    /// Create a list under `name` with room for `capacity` levels.
    ///
    /// The new list starts with a reference count of 1; the caller owns
    /// that reference and must [`release`](Self::release) it. When the
    /// name is already taken a monotonically increasing UID is appended
    /// to disambiguate and creation still succeeds.
    pub fn create(&mut self, name: &str, capacity: usize) -> LodListKey {
        let mut unique = name.to_string();
        while self.by_name.contains_key(&unique) {
            self.name_uid += 1;
            unique = format!("{}#{}", name, self.name_uid);
        }

        engine_debug!("vista3d::LodCache", "create '{}' capacity {}", unique, capacity);
        let key = self.entries.insert(CacheEntry {
            name: unique.clone(),
            ref_count: 1,
            list: ViewLodList::with_capacity(capacity),
        });
        self.by_name.insert(unique, key);
        key
    }

    /// Look up an existing list, incrementing its reference count.
    pub fn lookup(&mut self, name: &str) -> Option<LodListKey> {
        let key = *self.by_name.get(name)?;
        if let Some(entry) = self.entries.get_mut(key) {
            entry.ref_count += 1;
        }
        Some(key)
    }

    /// Add a reference to a held key. Returns the new count.
    pub fn add_ref(&mut self, key: LodListKey) -> u32 {
        match self.entries.get_mut(key) {
            Some(entry) => {
                entry.ref_count += 1;
                entry.ref_count
            }
            None => 0,
        }
    }

    /// Drop a reference. The list is unregistered and destroyed when the
    /// count reaches zero. Returns the new count.
    pub fn release(&mut self, key: LodListKey) -> u32 {
        let count = match self.entries.get_mut(key) {
            Some(entry) => {
                entry.ref_count -= 1;
                entry.ref_count
            }
            None => return 0,
        };

        if count == 0 {
            self.destroy(key);
        }
        count
    }

    /// Unconditionally remove a list. Returns true iff it was present.
    pub fn destroy(&mut self, key: LodListKey) -> bool {
        match self.entries.remove(key) {
            Some(entry) => {
                engine_debug!("vista3d::LodCache", "destroy '{}'", entry.name);
                self.by_name.remove(&entry.name);
                true
            }
            None => {
                engine_warn!("vista3d::LodCache", "destroy of unknown list");
                false
            }
        }
    }

    /// Access a held list.
    pub fn get(&self, key: LodListKey) -> Option<&ViewLodList> {
        self.entries.get(key).map(|entry| &entry.list)
    }

    /// Mutable access, for producers filling in levels.
    pub fn get_mut(&mut self, key: LodListKey) -> Option<&mut ViewLodList> {
        self.entries.get_mut(key).map(|entry| &mut entry.list)
    }

    /// Registered name of a held list.
    pub fn name_of(&self, key: LodListKey) -> Option<&str> {
        self.entries.get(key).map(|entry| entry.name.as_str())
    }

    /// Current reference count of a held list, 0 for dead keys.
    pub fn ref_count(&self, key: LodListKey) -> u32 {
        self.entries.get(key).map(|entry| entry.ref_count).unwrap_or(0)
    }

    /// Number of lists currently registered.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for LodCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "cache_tests.rs"]
mod tests;
