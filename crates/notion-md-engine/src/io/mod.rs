use std::io::{Read, Write};

use crate::error::ConvertError;
use crate::models::BlockPage;
use crate::render::MarkdownRenderer;

/// Read a single exported block list (`{"object": "list", "results": [...]}`)
pub fn read_document<R: Read>(reader: R) -> Result<BlockPage, ConvertError> {
    Ok(serde_json::from_reader(reader)?)
}

/// Convert an exported block list to Markdown without touching the network
pub fn convert_document<R: Read>(
    reader: R,
    renderer: &MarkdownRenderer,
) -> Result<String, ConvertError> {
    let document = read_document(reader)?;
    Ok(renderer.render(&document.results))
}

/// Write rendered Markdown verbatim and flush
pub fn write_markdown<W: Write>(mut writer: W, markdown: &str) -> std::io::Result<()> {
    writer.write_all(markdown.as_bytes())?;
    writer.flush()
}
