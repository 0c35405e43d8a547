use crate::{BlockId, ContentType, HeaderElement, KeyInput};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderCommand {
    ToggleElement(HeaderElement),
    SetElement(HeaderElement, bool),
    SetHeight(i32),
    SetLayout(String),
    SetBgColor(String),
    Undo,
    Redo,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteCommand {
    Key { id: BlockId, input: KeyInput },
    SetContentType { id: BlockId, content_type: ContentType },
    SetText { id: BlockId, text: String },
    AddBlock(ContentType),
}
