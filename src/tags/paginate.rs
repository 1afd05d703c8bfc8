/// Offset pagination over a `GraphQuery` service.
use crate::graph::{GraphError, GraphQuery, Page, Scope};
use crate::types::ResultRecord;

/// Records requested per call.
pub const PAGE_SIZE: usize = 1000;

/// Progress after one page: records in the page, and running total.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchProgress {
    pub batch: usize,
    pub total: usize,
}

/// Sequential pager with a fixed page size.
#[derive(Debug, Clone, Copy)]
pub struct Pager {
    page_size: usize,
}

impl Default for Pager {
    fn default() -> Self {
        Self::new(PAGE_SIZE)
    }
}

impl Pager {
    /// A pager requesting `page_size` records per call. Zero is treated as one.
    #[must_use]
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
        }
    }

    /// Fetch every page of `query`, in order.
    ///
    /// Offsets advance by the page size (0, N, 2N, ...) regardless of how many
    /// records a page held. Fetching stops after the first page holding fewer
    /// than N records, including an empty one. `on_batch` runs after each page.
    ///
    /// # Errors
    ///
    /// Returns the first `GraphError`; records gathered so far are dropped.
    pub fn fetch_all<F>(
        self,
        service: &dyn GraphQuery,
        query: &str,
        scope: &Scope,
        mut on_batch: F,
    ) -> Result<Vec<ResultRecord>, GraphError>
    where
        F: FnMut(BatchProgress),
    {
        let mut records = Vec::new();
        let mut skip = 0;

        loop {
            let page = Page {
                top: self.page_size,
                skip,
            };
            tracing::debug!(top = page.top, skip = page.skip, "requesting page");
            let batch = service.execute(query, page, scope)?;
            let batch_len = batch.len();
            records.extend(batch);

            let progress = BatchProgress {
                batch: batch_len,
                total: records.len(),
            };
            tracing::info!(
                batch = progress.batch,
                total = progress.total,
                skip,
                "page received"
            );
            on_batch(progress);

            if batch_len < self.page_size {
                break;
            }
            skip += self.page_size;
        }

        Ok(records)
    }
}
