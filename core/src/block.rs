use serde::{Deserialize, Serialize};
use std::fmt;

/// Columns a full-width block spans on the notes grid.
pub const GRID_COLUMNS: u32 = 12;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockId(pub String);

impl BlockId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BlockId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// `x`/`w` in columns, `y`/`h` in rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridRect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl Default for GridRect {
    fn default() -> Self {
        Self { x: 0, y: 0, w: GRID_COLUMNS, h: 1 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    #[default]
    Paragraph,
    Task,
    Heading1,
    Heading2,
    Heading3,
    BulletPoint,
    NumberedList,
    Divider,
    Blockquote,
    Image,
    Attachment,
}

impl ContentType {
    pub const ALL: [ContentType; 11] = [
        ContentType::Paragraph,
        ContentType::Task,
        ContentType::Heading1,
        ContentType::Heading2,
        ContentType::Heading3,
        ContentType::BulletPoint,
        ContentType::NumberedList,
        ContentType::Divider,
        ContentType::Blockquote,
        ContentType::Image,
        ContentType::Attachment,
    ];

    /// Menu label for the block type picker.
    pub fn label(self) -> &'static str {
        match self {
            ContentType::Paragraph => "Text",
            ContentType::Task => "To-do list",
            ContentType::Heading1 => "Heading 1",
            ContentType::Heading2 => "Heading 2",
            ContentType::Heading3 => "Heading 3",
            ContentType::BulletPoint => "Bulleted list",
            ContentType::NumberedList => "Numbered list",
            ContentType::Divider => "Divider",
            ContentType::Blockquote => "Quote",
            ContentType::Image => "Image",
            ContentType::Attachment => "Attachment",
        }
    }

    /// Type given to the block created by pressing Enter inside this one.
    pub fn continuation(self) -> ContentType {
        match self {
            ContentType::Task => ContentType::Task,
            _ => ContentType::Paragraph,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub id: BlockId,
    pub position: GridRect,
    pub content_type: ContentType,
    /// HTML fragment for rich blocks.
    pub text: String,
}

impl Block {
    pub fn new(id: BlockId, content_type: ContentType) -> Self {
        Self { id, position: GridRect::default(), content_type, text: String::new() }
    }

    /// No characters at all once markup is stripped. Whitespace and
    /// `&nbsp;` are content.
    pub fn is_empty(&self) -> bool {
        plain_text(&self.text).is_empty()
    }
}

const BLOCK_TAGS: [&str; 14] = [
    "div", "p", "li", "ul", "ol", "pre", "blockquote", "h1", "h2", "h3", "h4", "h5", "h6", "hr",
];

/// Strips markup from an HTML fragment the way a browser renders its
/// text: `<br>` is a line break, an opening block tag starts a new line
/// unless one was just started, and a single trailing break collapses.
/// The common named entities are decoded.
pub fn plain_text(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut rest = html;
    while let Some(start) = rest.find(['<', '&']) {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];
        if tail.starts_with('<') {
            match tail.find('>') {
                Some(end) => {
                    match tag_name(&tail[1..end]) {
                        Tag::Break => out.push('\n'),
                        Tag::OpenBlock if !out.is_empty() && !out.ends_with('\n') => out.push('\n'),
                        _ => {}
                    }
                    rest = &tail[end + 1..];
                }
                None => {
                    out.push_str(tail);
                    rest = "";
                }
            }
        } else {
            let (decoded, consumed) = decode_entity(tail);
            out.push_str(decoded);
            rest = &tail[consumed..];
        }
    }
    out.push_str(rest);
    if out.ends_with('\n') {
        out.pop();
    }
    out
}

enum Tag {
    Break,
    OpenBlock,
    Other,
}

fn tag_name(inner: &str) -> Tag {
    let inner = inner.trim();
    if inner.starts_with('/') || inner.starts_with('!') {
        return Tag::Other;
    }
    let name: String = inner
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect();
    if name == "br" {
        Tag::Break
    } else if BLOCK_TAGS.contains(&name.as_str()) {
        Tag::OpenBlock
    } else {
        Tag::Other
    }
}

fn decode_entity(tail: &str) -> (&str, usize) {
    const ENTITIES: [(&str, &str); 6] = [
        ("&amp;", "&"),
        ("&lt;", "<"),
        ("&gt;", ">"),
        ("&quot;", "\""),
        ("&#39;", "'"),
        ("&nbsp;", " "),
    ];
    for (entity, text) in ENTITIES {
        if tail.starts_with(entity) {
            return (text, entity.len());
        }
    }
    ("&", 1)
}
