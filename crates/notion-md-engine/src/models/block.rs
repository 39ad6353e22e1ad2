use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use super::{BlockId, RichText};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeadingLevel {
    H1,
    H2,
    H3,
}

impl HeadingLevel {
    pub fn marker(self) -> &'static str {
        match self {
            HeadingLevel::H1 => "#",
            HeadingLevel::H2 => "##",
            HeadingLevel::H3 => "###",
        }
    }
}

/// Kind-specific payload of a block. Each variant carries only what that kind needs.
#[derive(Debug, Clone, PartialEq)]
pub enum BlockKind {
    Heading {
        level: HeadingLevel,
        text: Vec<RichText>,
    },
    Paragraph(Vec<RichText>),
    BulletedListItem(Vec<RichText>),
    NumberedListItem(Vec<RichText>),
    Code {
        language: String,
        text: Vec<RichText>,
    },
    /// A block type outside the supported set, kept by its API type name
    Unsupported(String),
}

impl BlockKind {
    /// Rich text runs of this block; unsupported kinds have none
    pub fn rich_text(&self) -> &[RichText] {
        match self {
            BlockKind::Heading { text, .. }
            | BlockKind::Paragraph(text)
            | BlockKind::BulletedListItem(text)
            | BlockKind::NumberedListItem(text)
            | BlockKind::Code { text, .. } => text,
            BlockKind::Unsupported(_) => &[],
        }
    }
}

/// One unit of document content as returned by the block children endpoint.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "RawBlock")]
pub struct Block {
    pub id: BlockId,
    pub has_children: bool,
    pub kind: BlockKind,
}

impl Block {
    pub fn new(kind: BlockKind) -> Self {
        Self {
            id: BlockId::default(),
            has_children: false,
            kind,
        }
    }

    pub fn with_id(mut self, id: BlockId) -> Self {
        self.id = id;
        self
    }

    pub fn with_children(mut self, has_children: bool) -> Self {
        self.has_children = has_children;
        self
    }
}

/// A block paired with its nesting depth below the fetch root (0 = top level).
#[derive(Debug, Clone, PartialEq)]
pub struct BlockWithIndent {
    pub block: Block,
    pub depth: usize,
}

/// One page of block children, also the shape of a standalone exported document.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct BlockPage {
    pub object: String,
    pub results: Vec<Block>,
    pub next_cursor: Option<String>,
    pub has_more: bool,
}

/// Wire shape: `{"id", "type", "has_children", "<type>": {payload}}`.
#[derive(Deserialize)]
struct RawBlock {
    #[serde(default)]
    id: BlockId,
    #[serde(default)]
    has_children: bool,
    #[serde(rename = "type")]
    kind: String,
    #[serde(flatten)]
    payloads: Map<String, Value>,
}

#[derive(Default, Deserialize)]
#[serde(default)]
struct TextPayload {
    rich_text: Vec<RichText>,
}

#[derive(Default, Deserialize)]
#[serde(default)]
struct CodePayload {
    rich_text: Vec<RichText>,
    language: String,
}

impl RawBlock {
    /// Decode the payload stored under the block's own type name; absent means empty.
    fn payload<T: DeserializeOwned + Default>(&mut self) -> Result<T, serde_json::Error> {
        match self.payloads.remove(&self.kind) {
            None | Some(Value::Null) => Ok(T::default()),
            Some(value) => serde_json::from_value(value),
        }
    }

    fn text(&mut self) -> Result<Vec<RichText>, serde_json::Error> {
        self.payload::<TextPayload>().map(|p| p.rich_text)
    }
}

impl TryFrom<RawBlock> for Block {
    type Error = serde_json::Error;

    fn try_from(mut raw: RawBlock) -> Result<Self, Self::Error> {
        let type_name = raw.kind.clone();
        let kind = match type_name.as_str() {
            "heading_1" => BlockKind::Heading {
                level: HeadingLevel::H1,
                text: raw.text()?,
            },
            "heading_2" => BlockKind::Heading {
                level: HeadingLevel::H2,
                text: raw.text()?,
            },
            "heading_3" => BlockKind::Heading {
                level: HeadingLevel::H3,
                text: raw.text()?,
            },
            "paragraph" => BlockKind::Paragraph(raw.text()?),
            "bulleted_list_item" => BlockKind::BulletedListItem(raw.text()?),
            "numbered_list_item" => BlockKind::NumberedListItem(raw.text()?),
            "code" => {
                let code: CodePayload = raw.payload()?;
                BlockKind::Code {
                    language: code.language,
                    text: code.rich_text,
                }
            }
            other => BlockKind::Unsupported(other.to_string()),
        };

        Ok(Block {
            id: raw.id,
            has_children: raw.has_children,
            kind,
        })
    }
}
