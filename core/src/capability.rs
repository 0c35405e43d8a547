use serde::{Deserialize, Serialize};

/// Whether undo/redo are currently available on an editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapabilityFlags {
    pub can_undo: bool,
    pub can_redo: bool,
}

/// Boxed observer fired with the new flags after a history mutation.
pub type ChangeListener = Box<dyn FnMut(CapabilityFlags)>;

/// Explicit undo/redo handle handed to floating controls instead of a global.
pub trait UndoRedo {
    fn can_undo(&self) -> bool;
    fn can_redo(&self) -> bool;
    /// Returns `false` when there was nothing to undo.
    fn undo(&mut self) -> bool;
    /// Returns `false` when there was nothing to redo.
    fn redo(&mut self) -> bool;

    fn flags(&self) -> CapabilityFlags {
        CapabilityFlags { can_undo: self.can_undo(), can_redo: self.can_redo() }
    }
}
