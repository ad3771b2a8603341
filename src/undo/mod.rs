use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use crate::error::EditorError;
use crate::image::ImageTransformState;
use crate::models::{Block, BlockId, Document};

/// Represents a reversible edit
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Command {
    /// A block was replaced or removed (table operations, table deletion)
    ReplaceBlock {
        block: BlockId,
        /// Position in the document, used when the block has to be re-inserted
        index: usize,
        before: Option<Block>,
        after: Option<Block>,
    },
    /// A finished image gesture
    TransformImage {
        block: BlockId,
        before: ImageTransformState,
        after: ImageTransformState,
    },
}

impl Command {
    /// Execute this command on the document
    pub fn execute(&self, doc: &mut Document) -> Result<(), EditorError> {
        match self {
            Command::ReplaceBlock {
                block, index, after, ..
            } => put_block(doc, *block, *index, after),
            Command::TransformImage { block, after, .. } => put_transform(doc, *block, after),
        }
    }

    /// Undo this command (reverse the operation)
    pub fn undo(&self, doc: &mut Document) -> Result<(), EditorError> {
        match self {
            Command::ReplaceBlock {
                block, index, before, ..
            } => put_block(doc, *block, *index, before),
            Command::TransformImage { block, before, .. } => put_transform(doc, *block, before),
        }
    }

    /// Get the affected block for this command
    pub fn affected_block(&self) -> BlockId {
        match self {
            Command::ReplaceBlock { block, .. } => *block,
            Command::TransformImage { block, .. } => *block,
        }
    }
}

fn put_block(doc: &mut Document, id: BlockId, index: usize, snapshot: &Option<Block>) -> Result<(), EditorError> {
    match (snapshot, doc.index_of(id)) {
        (Some(block), Some(i)) => {
            doc.blocks[i] = block.clone();
        }
        (Some(block), None) => doc.restore(index, block.clone()),
        (None, Some(_)) => {
            doc.remove(id);
        }
        (None, None) => return Err(EditorError::BlockNotFound(id)),
    }
    Ok(())
}

fn put_transform(doc: &mut Document, id: BlockId, state: &ImageTransformState) -> Result<(), EditorError> {
    let image = doc.image_mut(id).ok_or(EditorError::BlockNotFound(id))?;
    image.style.extend(&state.to_inline_style());
    Ok(())
}

/// Bounded undo/redo history
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UndoStack {
    /// Stack of commands that can be undone
    pub commands: VecDeque<Command>,
    /// Current position in the stack (for redo support)
    pub current_index: usize,
    /// Maximum number of commands to keep in history
    max_size: usize,
}

impl Default for UndoStack {
    fn default() -> Self {
        Self::new(100)
    }
}

impl UndoStack {
    pub fn new(max_size: usize) -> Self {
        Self {
            commands: VecDeque::new(),
            current_index: 0,
            max_size: max_size.max(1),
        }
    }

    /// Record an already-applied command; drops any redo history
    pub fn push(&mut self, command: Command) {
        self.commands.truncate(self.current_index);
        self.commands.push_back(command);
        self.current_index = self.commands.len();

        if self.commands.len() > self.max_size {
            self.commands.pop_front();
            self.current_index = self.current_index.saturating_sub(1);
        }
    }

    /// Undo the last command; `Ok(None)` when there is nothing to undo
    pub fn undo(&mut self, doc: &mut Document) -> Result<Option<Command>, EditorError> {
        if !self.can_undo() {
            return Ok(None);
        }
        let command = self.commands[self.current_index - 1].clone();
        command.undo(doc)?;
        self.current_index -= 1;
        Ok(Some(command))
    }

    /// Redo the last undone command; `Ok(None)` when there is nothing to redo
    pub fn redo(&mut self, doc: &mut Document) -> Result<Option<Command>, EditorError> {
        if !self.can_redo() {
            return Ok(None);
        }
        let command = self.commands[self.current_index].clone();
        command.execute(doc)?;
        self.current_index += 1;
        Ok(Some(command))
    }

    pub fn can_undo(&self) -> bool {
        self.current_index > 0
    }

    pub fn can_redo(&self) -> bool {
        self.current_index < self.commands.len()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
        self.current_index = 0;
    }

    pub fn undo_count(&self) -> usize {
        self.current_index
    }

    pub fn redo_count(&self) -> usize {
        self.commands.len() - self.current_index
    }
}
