//! Recursive, paginated block tree fetching.
//!
//! The fetcher linearizes a block tree into a pre-order, depth-annotated list:
//! every block is followed by all of its descendants before its next sibling.
//! Requests are issued one at a time and any failure aborts the whole fetch.

pub mod cancel;
pub mod observer;
pub mod retry;

pub use cancel::CancelToken;
pub use observer::{FetchObserver, LogObserver, NoopObserver};
pub use retry::Retrying;

use crate::client::ApiError;
use crate::error::ConvertError;
use crate::models::{Block, BlockId, BlockPage, BlockWithIndent};

pub const DEFAULT_MAX_DEPTH: usize = 10;

/// Paginated listing of a block's direct children.
pub trait ChildrenSource {
    /// Fetch one page of children, starting at `cursor` (or the first page when `None`).
    fn list_children(&self, block_id: &BlockId, cursor: Option<&str>)
    -> Result<BlockPage, ApiError>;

    /// Like [`list_children`](Self::list_children), for sources that may issue more
    /// than one request per page; they must check `cancel` before each extra request.
    fn list_children_cancellable(
        &self,
        block_id: &BlockId,
        cursor: Option<&str>,
        _cancel: &CancelToken,
    ) -> Result<BlockPage, ApiError> {
        self.list_children(block_id, cursor)
    }
}

impl<S: ChildrenSource + ?Sized> ChildrenSource for &S {
    fn list_children(
        &self,
        block_id: &BlockId,
        cursor: Option<&str>,
    ) -> Result<BlockPage, ApiError> {
        (**self).list_children(block_id, cursor)
    }

    fn list_children_cancellable(
        &self,
        block_id: &BlockId,
        cursor: Option<&str>,
        cancel: &CancelToken,
    ) -> Result<BlockPage, ApiError> {
        (**self).list_children_cancellable(block_id, cursor, cancel)
    }
}

pub struct TreeFetcher<S, O = LogObserver> {
    source: S,
    observer: O,
    max_depth: usize,
    cancel: CancelToken,
}

impl<S: ChildrenSource> TreeFetcher<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            observer: LogObserver,
            max_depth: DEFAULT_MAX_DEPTH,
            cancel: CancelToken::new(),
        }
    }
}

impl<S: ChildrenSource, O: FetchObserver> TreeFetcher<S, O> {
    pub fn with_observer<P: FetchObserver>(self, observer: P) -> TreeFetcher<S, P> {
        TreeFetcher {
            source: self.source,
            observer,
            max_depth: self.max_depth,
            cancel: self.cancel,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_cancel_token(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Fetch every descendant of `root`, in pre-order, with depth 0 for its direct children.
    ///
    /// Fails with [`ConvertError::DepthExceeded`] if a block below `max_depth` still has
    /// children. No partial result is returned on any failure.
    pub fn fetch_tree(&self, root: &BlockId) -> Result<Vec<BlockWithIndent>, ConvertError> {
        let mut blocks = Vec::new();
        self.collect(root, 0, &mut blocks)?;
        Ok(blocks)
    }

    fn collect(
        &self,
        block_id: &BlockId,
        depth: usize,
        out: &mut Vec<BlockWithIndent>,
    ) -> Result<(), ConvertError> {
        if depth > self.max_depth {
            return Err(ConvertError::DepthExceeded {
                max_depth: self.max_depth,
            });
        }

        self.observer.entering(block_id, depth);
        let children = self.fetch_children(block_id)?;
        let total = children.len();
        self.observer.children_found(block_id, depth, total);

        for (index, block) in children.into_iter().enumerate() {
            let child_id = block.id;
            let has_children = block.has_children;
            out.push(BlockWithIndent { block, depth });

            if has_children {
                self.observer.descending(index + 1, total, depth);
                self.collect(&child_id, depth + 1, out)?;
            }
        }

        self.observer.leaving(block_id, depth);
        Ok(())
    }

    /// Fetch all pages of a block's direct children, concatenated in request order.
    pub fn fetch_children(&self, block_id: &BlockId) -> Result<Vec<Block>, ConvertError> {
        let mut blocks = Vec::new();
        let mut cursor: Option<String> = None;
        let mut page_number = 1;

        loop {
            if self.cancel.is_cancelled() {
                return Err(ConvertError::Cancelled);
            }

            let page = self
                .source
                .list_children_cancellable(block_id, cursor.as_deref(), &self.cancel)
                .map_err(|source| {
                    // A request that failed after the abort signal reports the abort
                    if self.cancel.is_cancelled() {
                        ConvertError::Cancelled
                    } else {
                        ConvertError::Fetch {
                            block_id: *block_id,
                            source,
                        }
                    }
                })?;
            self.observer
                .page_fetched(block_id, page_number, page.results.len(), page.has_more);
            blocks.extend(page.results);

            if !page.has_more {
                break;
            }
            match page.next_cursor {
                Some(next) => cursor = Some(next),
                None => {
                    log::warn!("Block {block_id} reported more pages without a cursor");
                    break;
                }
            }
            page_number += 1;
        }

        Ok(blocks)
    }
}
