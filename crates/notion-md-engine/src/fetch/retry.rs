use std::thread;
use std::time::Duration;

use super::{CancelToken, ChildrenSource};
use crate::client::ApiError;
use crate::models::{BlockId, BlockPage};

/// Wraps a children source and re-issues requests that failed with a retryable error.
///
/// With `max_retries == 0` every failure is returned immediately. No retry is
/// sent once the fetch's [`CancelToken`] is cancelled; the last failure is returned.
pub struct Retrying<S> {
    inner: S,
    max_retries: u32,
    backoff: Duration,
}

impl<S> Retrying<S> {
    pub fn new(inner: S, max_retries: u32) -> Self {
        Self {
            inner,
            max_retries,
            backoff: Duration::from_millis(500),
        }
    }

    /// Delay before the first retry; later retries wait proportionally longer
    pub fn with_backoff(mut self, backoff: Duration) -> Self {
        self.backoff = backoff;
        self
    }
}

impl<S: ChildrenSource> ChildrenSource for Retrying<S> {
    fn list_children(
        &self,
        block_id: &BlockId,
        cursor: Option<&str>,
    ) -> Result<BlockPage, ApiError> {
        self.list_children_cancellable(block_id, cursor, &CancelToken::new())
    }

    fn list_children_cancellable(
        &self,
        block_id: &BlockId,
        cursor: Option<&str>,
        cancel: &CancelToken,
    ) -> Result<BlockPage, ApiError> {
        let mut attempt = 0;
        loop {
            let err = match self.inner.list_children_cancellable(block_id, cursor, cancel) {
                Err(err) if err.is_retryable() => err,
                result => return result,
            };
            if attempt >= self.max_retries || cancel.is_cancelled() {
                return Err(err);
            }

            attempt += 1;
            log::warn!(
                "Request for block {block_id} failed ({err}), retry {attempt}/{}",
                self.max_retries
            );
            thread::sleep(self.backoff * attempt);

            if cancel.is_cancelled() {
                return Err(err);
            }
        }
    }
}
