pub mod block;
pub mod block_id;
pub mod rich_text;

pub use block::{Block, BlockKind, BlockPage, BlockWithIndent, HeadingLevel};
pub use block_id::BlockId;
pub use rich_text::{Annotations, RichText};
