use st_core::{Block, BlockId};
use std::collections::hash_map::DefaultHasher;
use std::collections::{HashMap, HashSet};
use std::hash::{Hash, Hasher};

#[derive(Debug, Clone, Copy)]
struct CacheEntry {
    sig: u64,
    rows: u32,
}

/// Last measured row span per block, keyed by a (text, type, width) signature.
#[derive(Debug, Default)]
pub struct HeightCache {
    entries: HashMap<BlockId, CacheEntry>,
    hits: u64,
    misses: u64,
}

impl HeightCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&mut self, id: &BlockId, sig: u64) -> Option<u32> {
        match self.entries.get(id) {
            Some(entry) if entry.sig == sig => {
                self.hits += 1;
                Some(entry.rows)
            }
            _ => {
                self.misses += 1;
                None
            }
        }
    }

    pub fn insert(&mut self, id: BlockId, sig: u64, rows: u32) {
        self.entries.insert(id, CacheEntry { sig, rows });
    }

    /// Drops entries for blocks no longer in `live`.
    pub fn retain_live<'a>(&mut self, live: impl IntoIterator<Item = &'a BlockId>) {
        let live: HashSet<&BlockId> = live.into_iter().collect();
        self.entries.retain(|id, _| live.contains(id));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// `config_key` comes from `GridConfig::fingerprint`.
pub fn block_signature(block: &Block, config_key: u64) -> u64 {
    let mut hasher = DefaultHasher::new();
    block.text.hash(&mut hasher);
    block.content_type.hash(&mut hasher);
    block.position.w.hash(&mut hasher);
    config_key.hash(&mut hasher);
    hasher.finish()
}
