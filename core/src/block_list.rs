use crate::{Block, BlockId, ContentType, GridRect, IdGenerator, NoteCommand, SequentialIds};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use uuid::Uuid;

/// Grid row height in pixels used by the notes surface.
pub const ROW_UNIT_PX: f32 = 30.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Key {
    Enter,
    Backspace,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyInput {
    pub key: Key,
    pub shift: bool,
}

impl KeyInput {
    pub fn plain(key: Key) -> Self {
        Self { key, shift: false }
    }

    pub fn shifted(key: Key) -> Self {
        Self { key, shift: true }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyOutcome {
    /// The list changed structurally; focus moves to this block.
    Focus(BlockId),
    /// Not a structural edit; the host applies its default text handling.
    Passthrough,
}

/// Converts a rendered pixel height into whole grid rows, at least one.
pub fn rows_for_height(pixel_height: f32, row_unit: f32) -> u32 {
    if !pixel_height.is_finite() || !row_unit.is_finite() || row_unit <= 0.0 || pixel_height <= 0.0 {
        return 1;
    }
    ((pixel_height / row_unit).ceil() as u32).max(1)
}

/// Ordered notes blocks laid out as a single-column grid. Rows (`y`) always
/// match visual order with no gaps, and the list is never empty.
pub struct BlockList {
    blocks: Vec<Block>,
    ids: Box<dyn IdGenerator>,
    version: u64,
    updated_at: i64,
}

impl BlockList {
    pub fn new(mut ids: Box<dyn IdGenerator>) -> Self {
        let first = Block::new(ids.next_id(), ContentType::Paragraph);
        Self { blocks: vec![first], ids, version: 1, updated_at: 0 }
    }

    /// Starts at `rect1` with sequential ids.
    pub fn sequential() -> Self {
        Self::new(Box::new(SequentialIds::new()))
    }

    /// Adopts existing blocks in order. A repeated id keeps its first
    /// occurrence; later copies get fresh ids.
    pub fn from_blocks(blocks: Vec<Block>, ids: Box<dyn IdGenerator>) -> Self {
        let mut list = Self { blocks, ids, version: 1, updated_at: 0 };
        let mut seen = HashSet::with_capacity(list.blocks.len());
        for i in 0..list.blocks.len() {
            if seen.insert(list.blocks[i].id.clone()) {
                continue;
            }
            let fresh = list.fresh_id();
            tracing::debug!(duplicate = %list.blocks[i].id, block = %fresh, "reassigning duplicate block id");
            seen.insert(fresh.clone());
            list.blocks[i].id = fresh;
        }
        if list.blocks.is_empty() {
            let id = list.fresh_id();
            list.blocks.push(Block::new(id, ContentType::Paragraph));
        }
        list.renumber();
        list
    }

    /// Sequential ids continuing after the highest `rectN` already present.
    pub fn from_blocks_sequential(blocks: Vec<Block>) -> Self {
        let mut ids = SequentialIds::starting_at(blocks.len() as u64 + 1);
        for block in &blocks {
            ids.observe(&block.id);
        }
        Self::from_blocks(blocks, Box::new(ids))
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn get(&self, id: &BlockId) -> Option<&Block> {
        self.blocks.iter().find(|b| &b.id == id)
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn updated_at(&self) -> i64 {
        self.updated_at
    }

    pub fn execute(&mut self, cmd: NoteCommand) -> Option<BlockId> {
        match cmd {
            NoteCommand::Key { id, input } => match self.handle_key(&id, input) {
                KeyOutcome::Focus(next) => Some(next),
                KeyOutcome::Passthrough => None,
            },
            NoteCommand::SetContentType { id, content_type } => {
                self.set_content_type(&id, content_type).then_some(id)
            }
            NoteCommand::SetText { id, text } => self.set_text(&id, text).then_some(id),
            NoteCommand::AddBlock(content_type) => Some(self.add_block(content_type)),
        }
    }

    /// Appends a fresh empty block at the bottom.
    pub fn add_block(&mut self, content_type: ContentType) -> BlockId {
        let id = self.fresh_id();
        self.blocks.push(Block::new(id.clone(), content_type));
        self.renumber();
        self.touch();
        tracing::debug!(block = %id, "appended block");
        id
    }

    /// Inserts `block` directly below `anchor`; blocks underneath move down
    /// one row. Unknown anchors and duplicate ids are ignored.
    pub fn insert_after(&mut self, anchor: &BlockId, mut block: Block) -> bool {
        if self.position_of(&block.id).is_some() {
            tracing::debug!(block = %block.id, "ignoring insert of duplicate block id");
            return false;
        }
        let Some(pos) = self.position_of(anchor) else {
            return false;
        };
        block.position.y = self.blocks[pos].position.y + 1;
        tracing::debug!(anchor = %anchor, block = %block.id, "inserting block");
        self.blocks.insert(pos + 1, block);
        self.renumber();
        self.touch();
        true
    }

    /// Removes `id` and closes the gap. Returns the block that should take
    /// focus: the one above, else the new first block. Removing the only
    /// block leaves a single fresh empty paragraph.
    pub fn remove(&mut self, id: &BlockId) -> Option<BlockId> {
        let pos = self.position_of(id)?;
        self.blocks.remove(pos);
        tracing::debug!(block = %id, "removed block");
        if self.blocks.is_empty() {
            let fresh = self.fresh_id();
            self.blocks.push(Block::new(fresh, ContentType::Paragraph));
        }
        self.renumber();
        self.touch();
        let focus = if pos > 0 { &self.blocks[pos - 1] } else { &self.blocks[0] };
        Some(focus.id.clone())
    }

    /// Splits after `id`: the new empty block keeps the Task type, anything
    /// else continues as a paragraph. Returns the new block's id.
    pub fn on_enter_key(&mut self, id: &BlockId) -> Option<BlockId> {
        let anchor = self.get(id)?;
        let content_type = anchor.content_type.continuation();
        let GridRect { x, w, .. } = anchor.position;
        let new_id = self.fresh_id();
        let mut block = Block::new(new_id.clone(), content_type);
        block.position.x = x;
        block.position.w = w;
        self.insert_after(id, block).then_some(new_id)
    }

    /// Removes `id` only when its text is empty.
    pub fn on_backspace_at_empty(&mut self, id: &BlockId) -> Option<BlockId> {
        if !self.get(id)?.is_empty() {
            return None;
        }
        self.remove(id)
    }

    pub fn handle_key(&mut self, id: &BlockId, input: KeyInput) -> KeyOutcome {
        let next = match (input.key, input.shift) {
            (Key::Enter, false) => self.on_enter_key(id),
            (Key::Backspace, _) => self.on_backspace_at_empty(id),
            _ => None,
        };
        match next {
            Some(focus) => KeyOutcome::Focus(focus),
            None => KeyOutcome::Passthrough,
        }
    }

    pub fn set_content_type(&mut self, id: &BlockId, content_type: ContentType) -> bool {
        let Some(block) = self.blocks.iter_mut().find(|b| &b.id == id) else {
            return false;
        };
        block.content_type = content_type;
        self.touch();
        true
    }

    /// Replaces the text. Callers recompute the row span afterwards.
    pub fn set_text(&mut self, id: &BlockId, text: impl Into<String>) -> bool {
        let Some(block) = self.blocks.iter_mut().find(|b| &b.id == id) else {
            return false;
        };
        block.text = text.into();
        self.touch();
        true
    }

    /// Sets `h`; returns whether it changed.
    pub fn set_row_span(&mut self, id: &BlockId, rows: u32) -> bool {
        let rows = rows.max(1);
        match self.blocks.iter_mut().find(|b| &b.id == id) {
            Some(block) if block.position.h != rows => {
                block.position.h = rows;
                true
            }
            _ => false,
        }
    }

    pub fn apply_pixel_height(&mut self, id: &BlockId, pixel_height: f32, row_unit: f32) -> bool {
        self.set_row_span(id, rows_for_height(pixel_height, row_unit))
    }

    fn position_of(&self, id: &BlockId) -> Option<usize> {
        self.blocks.iter().position(|b| &b.id == id)
    }

    /// Next generator id not already in the list. A generator that keeps
    /// colliding falls back to a random id.
    fn fresh_id(&mut self) -> BlockId {
        for _ in 0..=self.blocks.len() {
            let id = self.ids.next_id();
            if self.position_of(&id).is_none() {
                return id;
            }
            tracing::debug!(block = %id, "generated id already in use");
        }
        let id = BlockId(format!("block-{}", Uuid::new_v4()));
        tracing::warn!(block = %id, "id generator kept colliding, using a random id");
        id
    }

    fn renumber(&mut self) {
        for (row, block) in self.blocks.iter_mut().enumerate() {
            block.position.y = row as u32;
        }
    }

    fn touch(&mut self) {
        self.version = self.version.saturating_add(1);
        self.updated_at = chrono::Utc::now().timestamp();
    }
}

impl Default for BlockList {
    fn default() -> Self {
        Self::sequential()
    }
}

impl fmt::Debug for BlockList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlockList")
            .field("blocks", &self.blocks)
            .field("version", &self.version)
            .field("updated_at", &self.updated_at)
            .finish()
    }
}
