//! String interner for identifiers.
//!
//! Provides O(1) interning and lookup. Interned strings are leaked into
//! `&'static str` storage so that lookups can hand out references without
//! holding the lock; a program's identifier set is bounded and lives for
//! the duration of the compilation anyway.

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::Name;

/// Panic helper for interner overflow (cold path, never inlined).
#[cold]
#[inline(never)]
fn panic_interner_full(count: usize) -> ! {
    panic!("interner capacity exceeded: {count} strings, max is {}", u32::MAX)
}

struct InternerState {
    /// Map from string content to index.
    map: FxHashMap<&'static str, u32>,
    /// Storage for string contents, indexed by `Name`.
    strings: Vec<&'static str>,
}

/// Thread-safe string interner.
///
/// The empty string is pre-interned as [`Name::EMPTY`].
pub struct Interner {
    state: RwLock<InternerState>,
}

impl Interner {
    /// Create a new interner with the empty string pre-interned.
    pub fn new() -> Self {
        let mut map = FxHashMap::default();
        let empty: &'static str = "";
        map.insert(empty, 0);
        Self {
            state: RwLock::new(InternerState {
                map,
                strings: vec![empty],
            }),
        }
    }

    /// Intern a string, returning its handle.
    pub fn intern(&self, text: &str) -> Name {
        if let Some(&idx) = self.state.read().map.get(text) {
            return Name::from_raw(idx);
        }

        let mut state = self.state.write();
        // Re-check under the write lock: another thread may have interned
        // the same string between the locks.
        if let Some(&idx) = state.map.get(text) {
            return Name::from_raw(idx);
        }

        let Ok(idx) = u32::try_from(state.strings.len()) else {
            panic_interner_full(state.strings.len());
        };
        let leaked: &'static str = Box::leak(text.to_owned().into_boxed_str());
        state.map.insert(leaked, idx);
        state.strings.push(leaked);
        Name::from_raw(idx)
    }

    /// Resolve a handle back to its string.
    ///
    /// # Panics
    /// Panics if `name` did not come from this interner.
    pub fn resolve(&self, name: Name) -> &'static str {
        self.state.read().strings[name.raw() as usize]
    }

    /// Number of interned strings.
    pub fn len(&self) -> usize {
        self.state.read().strings.len()
    }

    /// Whether only the pre-interned empty string is present.
    pub fn is_empty(&self) -> bool {
        self.len() == 1
    }
}

impl Default for Interner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests;
