use crate::BlockId;
use uuid::Uuid;

/// Source of fresh block identifiers.
pub trait IdGenerator {
    fn next_id(&mut self) -> BlockId;
}

/// `rect1`, `rect2`, ... from a counter that only moves forward, so an id
/// freed by a removal is never handed out again.
#[derive(Debug, Clone)]
pub struct SequentialIds {
    prefix: String,
    next: u64,
}

impl SequentialIds {
    pub fn new() -> Self {
        Self::starting_at(1)
    }

    pub fn starting_at(next: u64) -> Self {
        Self { prefix: "rect".to_string(), next }
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Moves the counter past any numeric suffix already in use.
    pub fn observe(&mut self, id: &BlockId) {
        if let Some(n) = id.as_str().strip_prefix(self.prefix.as_str()).and_then(|s| s.parse::<u64>().ok()) {
            if n >= self.next {
                self.next = n + 1;
            }
        }
    }
}

impl Default for SequentialIds {
    fn default() -> Self {
        Self::new()
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&mut self) -> BlockId {
        let id = BlockId(format!("{}{}", self.prefix, self.next));
        self.next += 1;
        id
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct RandomIds;

impl IdGenerator for RandomIds {
    fn next_id(&mut self) -> BlockId {
        BlockId(Uuid::new_v4().to_string())
    }
}
