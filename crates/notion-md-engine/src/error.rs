use crate::client::ApiError;
use crate::models::BlockId;

#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    #[error("invalid block id or Notion URL: {0:?}")]
    Resolution(String),
    #[error("authentication failed: {0}")]
    Auth(String),
    #[error("failed to get children for block {block_id}: {source}")]
    Fetch {
        block_id: BlockId,
        #[source]
        source: ApiError,
    },
    #[error("maximum recursion depth ({max_depth}) exceeded")]
    DepthExceeded { max_depth: usize },
    #[error("fetch cancelled")]
    Cancelled,
    #[error("failed to decode document: {0}")]
    Decode(#[from] serde_json::Error),
}
