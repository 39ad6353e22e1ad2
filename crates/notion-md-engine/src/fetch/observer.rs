use crate::models::BlockId;

/// Hooks invoked by the tree fetcher as it walks the block tree.
///
/// Observers see progress only; they cannot alter what is fetched or returned.
pub trait FetchObserver {
    fn entering(&self, _block_id: &BlockId, _depth: usize) {}

    fn page_fetched(&self, _block_id: &BlockId, _page_number: usize, _count: usize, _has_more: bool) {}

    fn children_found(&self, _block_id: &BlockId, _depth: usize, _count: usize) {}

    /// `index` is 1-based within the `total` children at `depth`
    fn descending(&self, _index: usize, _total: usize, _depth: usize) {}

    fn leaving(&self, _block_id: &BlockId, _depth: usize) {}
}

/// Observer that ignores every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl FetchObserver for NoopObserver {}

/// Observer that reports fetch progress through the `log` facade at debug level.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogObserver;

impl FetchObserver for LogObserver {
    fn entering(&self, block_id: &BlockId, depth: usize) {
        log::debug!("Fetching children for block {block_id} (depth: {depth})");
    }

    fn page_fetched(&self, block_id: &BlockId, page_number: usize, count: usize, has_more: bool) {
        log::debug!(
            "Received page {page_number} for block {block_id}: {count} blocks (has_more: {has_more})"
        );
    }

    fn children_found(&self, _block_id: &BlockId, depth: usize, count: usize) {
        log::debug!("Found {count} children at depth {depth}");
    }

    fn descending(&self, index: usize, total: usize, _depth: usize) {
        log::debug!("Block {index}/{total} has children, recursing");
    }

    fn leaving(&self, block_id: &BlockId, depth: usize) {
        log::trace!("Finished block {block_id} (depth: {depth})");
    }
}

impl<O: FetchObserver + ?Sized> FetchObserver for &O {
    fn entering(&self, block_id: &BlockId, depth: usize) {
        (**self).entering(block_id, depth);
    }

    fn page_fetched(&self, block_id: &BlockId, page_number: usize, count: usize, has_more: bool) {
        (**self).page_fetched(block_id, page_number, count, has_more);
    }

    fn children_found(&self, block_id: &BlockId, depth: usize, count: usize) {
        (**self).children_found(block_id, depth, count);
    }

    fn descending(&self, index: usize, total: usize, depth: usize) {
        (**self).descending(index, total, depth);
    }

    fn leaving(&self, block_id: &BlockId, depth: usize) {
        (**self).leaving(block_id, depth);
    }
}
