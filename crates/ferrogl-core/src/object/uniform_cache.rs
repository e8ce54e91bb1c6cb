use std::collections::HashMap;

/// Per-program map from uniform name to resolved location.
///
/// Only successful lookups are stored. The cache is never invalidated on
/// its own: a relink that moves locations leaves stale entries until
/// [`clear`](Self::clear) is called.
#[derive(Debug, Clone, Default)]
pub struct UniformLocationCache {
    locations: HashMap<String, i32>,
}

impl UniformLocationCache {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn get(&self, name: &str) -> Option<i32> {
        self.locations.get(name).copied()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.locations.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    pub fn clear(&mut self) {
        self.locations.clear();
    }

    /// Returns the cached location, or runs `lookup` and caches a hit.
    pub fn resolve(&mut self, name: &str, lookup: impl FnOnce(&str) -> Option<i32>) -> Option<i32> {
        if let Some(location) = self.get(name) {
            return Some(location);
        }
        let location = lookup(name)?;
        log::trace!("uniform `{name}` resolved to location {location}");
        self.locations.insert(name.to_owned(), location);
        Some(location)
    }
}
