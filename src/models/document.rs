//! Host document model
//!
//! An explicit, in-memory stand-in for the editable tree the browser host
//! owns: a flat sequence of blocks, some of which are tables or images. The
//! engines only need to enumerate table rows/cells, replace a table's rows,
//! remove blocks and touch inline styles, so that is all this exposes.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::style::InlineStyle;
use super::table::Table;

/// Stable identifier of a block within a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockId(pub u32);

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Load state of an image source
///
/// Geometry is only ever computed for a `Ready` image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageStatus {
    #[default]
    Loading,
    Ready,
    Failed,
}

/// A freely placed `<img>`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ImageBlock {
    pub src: String,

    #[serde(default)]
    pub alt: String,

    #[serde(default)]
    pub status: ImageStatus,

    #[serde(default)]
    pub style: InlineStyle,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum BlockKind {
    Paragraph { html: String },
    Table(Table),
    Image(ImageBlock),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub id: BlockId,
    #[serde(flatten)]
    pub kind: BlockKind,
}

/// Ordered block list with id allocation
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub blocks: Vec<Block>,

    #[serde(default)]
    next_id: u32,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a block and return its id
    pub fn push(&mut self, kind: BlockKind) -> BlockId {
        let id = self.allocate_id();
        self.blocks.push(Block { id, kind });
        id
    }

    /// Insert a block at `index` (clamped) and return its id
    pub fn insert(&mut self, index: usize, kind: BlockKind) -> BlockId {
        let id = self.allocate_id();
        let index = index.min(self.blocks.len());
        self.blocks.insert(index, Block { id, kind });
        id
    }

    /// Re-insert a previously removed block under its original id
    pub fn restore(&mut self, index: usize, block: Block) {
        self.next_id = self.next_id.max(block.id.0.saturating_add(1));
        let index = index.min(self.blocks.len());
        self.blocks.insert(index, block);
    }

    pub fn push_table(&mut self, table: Table) -> BlockId {
        self.push(BlockKind::Table(table))
    }

    pub fn push_image(&mut self, image: ImageBlock) -> BlockId {
        self.push(BlockKind::Image(image))
    }

    fn allocate_id(&mut self) -> BlockId {
        // Documents deserialized without a counter still get fresh ids
        let floor = self
            .blocks
            .iter()
            .map(|b| b.id.0.saturating_add(1))
            .max()
            .unwrap_or(0);
        self.next_id = self.next_id.max(floor);
        let mut id = BlockId(self.next_id);
        if self.block(id).is_some() {
            // Counter exhausted at u32::MAX; reuse the lowest free id
            let free = (0..=u32::MAX).find(|n| self.block(BlockId(*n)).is_none());
            id = BlockId(free.unwrap_or(u32::MAX));
            log::warn!("block id space exhausted, reusing {}", id);
        }
        self.next_id = self.next_id.saturating_add(1);
        id
    }

    pub fn index_of(&self, id: BlockId) -> Option<usize> {
        self.blocks.iter().position(|b| b.id == id)
    }

    pub fn block(&self, id: BlockId) -> Option<&Block> {
        self.blocks.iter().find(|b| b.id == id)
    }

    pub fn remove(&mut self, id: BlockId) -> Option<(usize, Block)> {
        let index = self.index_of(id)?;
        Some((index, self.blocks.remove(index)))
    }

    pub fn table(&self, id: BlockId) -> Option<&Table> {
        match &self.block(id)?.kind {
            BlockKind::Table(t) => Some(t),
            _ => None,
        }
    }

    pub fn table_mut(&mut self, id: BlockId) -> Option<&mut Table> {
        match &mut self.blocks.iter_mut().find(|b| b.id == id)?.kind {
            BlockKind::Table(t) => Some(t),
            _ => None,
        }
    }

    pub fn image(&self, id: BlockId) -> Option<&ImageBlock> {
        match &self.block(id)?.kind {
            BlockKind::Image(img) => Some(img),
            _ => None,
        }
    }

    pub fn image_mut(&mut self, id: BlockId) -> Option<&mut ImageBlock> {
        match &mut self.blocks.iter_mut().find(|b| b.id == id)?.kind {
            BlockKind::Image(img) => Some(img),
            _ => None,
        }
    }

    pub fn table_ids(&self) -> impl Iterator<Item = BlockId> + '_ {
        self.blocks
            .iter()
            .filter(|b| matches!(b.kind, BlockKind::Table(_)))
            .map(|b| b.id)
    }
}
