use std::collections::HashSet;

/// Keys already emitted by one stage during one run.
///
/// Each stage owns its own set; nothing is shared between stages or runs.
#[derive(Debug, Default)]
pub struct SeenSet {
    keys: HashSet<String>,
}

impl SeenSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `key`, returning `true` only the first time it is offered.
    pub fn first_sighting(&mut self, key: &str) -> bool {
        if self.keys.contains(key) {
            return false;
        }
        self.keys.insert(key.to_owned());
        true
    }

    pub fn contains(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}
