/// Interned identifiers for script resources.
///
/// Every action carries the atom id of the SI file it came from. Interning
/// keeps the ids cheap to clone and compare: one allocation per distinct
/// string for the lifetime of the process.

use std::sync::{Arc, Mutex, OnceLock};

use rustc_hash::FxHashMap;

static INTERNER: OnceLock<Mutex<FxHashMap<String, Arc<str>>>> = OnceLock::new();

fn interner() -> &'static Mutex<FxHashMap<String, Arc<str>>> {
    INTERNER.get_or_init(|| Mutex::new(FxHashMap::default()))
}

/// An interned identifier for a script resource.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AtomId(Arc<str>);

impl AtomId {
    pub fn new(value: &str) -> Self {
        let mut map = match interner().lock() {
            Ok(map) => map,
            // A poisoned interner still holds valid data
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Some(existing) = map.get(value) {
            return AtomId(Arc::clone(existing));
        }
        let interned: Arc<str> = Arc::from(value);
        map.insert(value.to_string(), Arc::clone(&interned));
        AtomId(interned)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Pointer identity: true for ids interned from equal strings.
    pub fn same(&self, other: &AtomId) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Default for AtomId {
    fn default() -> Self {
        AtomId::new("")
    }
}

impl std::fmt::Display for AtomId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
#[path = "atom_tests.rs"]
mod tests;
