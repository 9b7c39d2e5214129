use std::collections::HashMap;

/// Write-once, read-many mapping from panel id to live widget handle.
///
/// Built exactly once per bootstrap activation, then only read while the
/// link commands apply. Construction and consumption are strictly ordered
/// within the same run, so no interior locking is needed.
#[derive(Debug)]
pub struct InstanceRegistry<H> {
    entries: HashMap<String, H>,
}

impl<H> InstanceRegistry<H> {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Record a mounted instance. The first write for an id wins; later
    /// writes are ignored and reported as rejected.
    pub fn record(&mut self, id: impl Into<String>, handle: H) -> bool {
        let id = id.into();
        if self.entries.contains_key(&id) {
            return false;
        }
        self.entries.insert(id, handle);
        true
    }

    pub fn get(&self, id: &str) -> Option<&H> {
        self.entries.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<H> Default for InstanceRegistry<H> {
    fn default() -> Self {
        Self::new()
    }
}
