use std::collections::HashMap;

use notion_md_engine::{
    ApiError, BlockId, BlockPage, ChildrenSource, MarkdownRenderer, NoopObserver, TreeFetcher,
    convert_document,
};
use pretty_assertions::assert_eq;
use rstest::rstest;

fn fixture(name: &str) -> String {
    std::fs::read_to_string(format!(
        "{}/tests/fixtures/{name}",
        env!("CARGO_MANIFEST_DIR")
    ))
    .unwrap()
}

#[rstest]
#[case("empty_list")]
#[case("mixed_page")]
fn fixture_converts_to_expected_markdown(#[case] name: &str) {
    let json = fixture(&format!("{name}.json"));
    let expected = fixture(&format!("{name}.md"));

    let markdown = convert_document(json.as_bytes(), &MarkdownRenderer::new()).unwrap();

    assert_eq!(markdown, expected);
}

/// Serves canned JSON pages keyed by `(block id, cursor)`, the way the API would.
struct JsonPages {
    pages: HashMap<(String, Option<String>), String>,
}

impl JsonPages {
    fn new(pages: &[(&str, Option<&str>, &str)]) -> Self {
        Self {
            pages: pages
                .iter()
                .map(|(id, cursor, body)| {
                    ((id.to_string(), cursor.map(str::to_string)), body.to_string())
                })
                .collect(),
        }
    }
}

impl ChildrenSource for JsonPages {
    fn list_children(
        &self,
        block_id: &BlockId,
        cursor: Option<&str>,
    ) -> Result<BlockPage, ApiError> {
        let key = (block_id.to_string(), cursor.map(str::to_string));
        match self.pages.get(&key) {
            Some(body) => Ok(serde_json::from_str(body)?),
            None => Err(ApiError::Status {
                status: 404,
                code: "object_not_found".to_string(),
                message: format!("no page for {key:?}"),
            }),
        }
    }
}

const ROOT: &str = "cec15681-9083-4e1f-a0ae-72d268507aab";
const LIST_PARENT: &str = "00000001-0000-4000-8000-000000000001";

fn nested_page_source() -> JsonPages {
    JsonPages::new(&[
        (
            ROOT,
            None,
            r#"{
                "object": "list",
                "results": [
                    {"id": "00000002-0000-4000-8000-000000000002", "type": "heading_1", "has_children": false,
                     "heading_1": {"rich_text": [{"plain_text": "Shopping"}]}},
                    {"id": "00000001-0000-4000-8000-000000000001", "type": "bulleted_list_item", "has_children": true,
                     "bulleted_list_item": {"rich_text": [{"plain_text": "Fruit"}]}}
                ],
                "next_cursor": "page-2",
                "has_more": true
            }"#,
        ),
        (
            ROOT,
            Some("page-2"),
            r#"{
                "object": "list",
                "results": [
                    {"id": "00000003-0000-4000-8000-000000000003", "type": "bulleted_list_item", "has_children": false,
                     "bulleted_list_item": {"rich_text": [{"plain_text": "Bread"}]}}
                ],
                "next_cursor": null,
                "has_more": false
            }"#,
        ),
        (
            LIST_PARENT,
            None,
            r#"{
                "object": "list",
                "results": [
                    {"id": "00000004-0000-4000-8000-000000000004", "type": "bulleted_list_item", "has_children": false,
                     "bulleted_list_item": {"rich_text": [{"plain_text": "Apples", "annotations": {"bold": true}}]}},
                    {"id": "00000005-0000-4000-8000-000000000005", "type": "image", "has_children": false,
                     "image": {"type": "external", "external": {"url": "https://example.com/a.png"}}}
                ],
                "next_cursor": null,
                "has_more": false
            }"#,
        ),
    ])
}

#[test]
fn fetched_tree_renders_depth_blind_by_default() {
    let source = nested_page_source();
    let root = BlockId::resolve(&format!("https://www.notion.so/team/List-{}", ROOT.replace('-', "")))
        .unwrap();

    let blocks = TreeFetcher::new(&source)
        .with_observer(NoopObserver)
        .fetch_tree(&root)
        .unwrap();
    let markdown = MarkdownRenderer::new().render_tree(&blocks);

    assert_eq!(
        blocks.iter().map(|entry| entry.depth).collect::<Vec<_>>(),
        vec![0, 0, 1, 1, 0]
    );
    assert_eq!(markdown, "# Shopping\n\n- Fruit\n- **Apples**\n- Bread\n");
}

#[test]
fn fetched_tree_renders_nested_lists_when_enabled() {
    let source = nested_page_source();
    let root = BlockId::resolve(ROOT).unwrap();

    let blocks = TreeFetcher::new(&source).fetch_tree(&root).unwrap();
    let markdown = MarkdownRenderer::new()
        .with_nested_indent(true)
        .render_tree(&blocks);

    assert_eq!(
        markdown,
        "# Shopping\n\n- Fruit\n    - **Apples**\n- Bread\n"
    );
}

#[test]
fn missing_subtree_fails_whole_conversion() {
    let mut source = nested_page_source();
    source
        .pages
        .retain(|(id, _), _| id.as_str() != LIST_PARENT);
    let root = BlockId::resolve(ROOT).unwrap();

    let err = TreeFetcher::new(&source).fetch_tree(&root).unwrap_err();

    assert!(
        err.to_string()
            .starts_with(&format!("failed to get children for block {LIST_PARENT}: HTTP 404"))
    );
}
