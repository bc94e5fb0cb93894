//! Lazy iteration over paged list endpoints
//!
//! A list endpoint hands back one page at a time together with the cursor
//! state for the next page. [`paginate`] turns such a page-fetch function into
//! a single [`PageStream`] that only performs I/O when the consumer has drained
//! the current page.


use crate::error::{TraceError, TraceResult};
use futures::stream::{self, Stream, TryStreamExt};
use std::future::Future;
use std::pin::Pin;

/// Stream of items fetched page by page
pub type PageStream<T> = Pin<Box<dyn Stream<Item = TraceResult<T>> + Send>>;

/// Offset/limit cursor state used by the stores in this crate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub offset: usize,
    pub limit: usize,
}

impl PageRequest {
    /// First page with the given page size
    pub fn first(limit: usize) -> Self {
        Self { offset: 0, limit }
    }

    /// Cursor for the page after one that returned `received` items.
    ///
    /// A short page means the listing is exhausted.
    pub fn next_after(&self, received: usize) -> Option<Self> {
        if received == 0 || received < self.limit {
            None
        } else {
            Some(Self {
                offset: self.offset + received,
                limit: self.limit,
            })
        }
    }
}

/// One page of results plus the cursor for the next page, if any
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T, C = PageRequest> {
    pub items: Vec<T>,
    pub next: Option<C>,
}

impl<T, C> Page<T, C> {
    pub fn new(items: Vec<T>, next: Option<C>) -> Self {
        Self { items, next }
    }

    /// A final page
    pub fn last(items: Vec<T>) -> Self {
        Self { items, next: None }
    }
}

impl<T> Page<T, PageRequest> {
    /// Cut the page addressed by `request` out of a fully materialized listing
    pub fn slice(all: Vec<T>, request: PageRequest) -> Self {
        let total = all.len();
        let end = request.offset.saturating_add(request.limit).min(total);
        let items: Vec<T> = all
            .into_iter()
            .skip(request.offset)
            .take(request.limit)
            .collect();
        let next = (end < total && !items.is_empty()).then(|| PageRequest {
            offset: end,
            limit: request.limit,
        });
        Self { items, next }
    }
}

/// Build a lazy stream from a page-fetch function.
///
/// Pages are fetched only when the previous one has been consumed. A fetch
/// error is yielded as an `Err` item and ends the stream; items already
/// yielded stay yielded. An empty page ends the stream even if it carries a
/// next cursor. No filtering happens here: the fetch function owns the query.
///
/// # Examples
///
/// ```
/// use futures::TryStreamExt;
/// use tracery_core::pagination::{paginate, Page, PageRequest};
///
/// # async fn example() -> tracery_core::error::TraceResult<()> {
/// let data: Vec<u32> = (0..5).collect();
/// let items: Vec<u32> = paginate(PageRequest::first(2), move |request| {
///     let data = data.clone();
///     async move { Ok(Page::slice(data, request)) }
/// })
/// .try_collect()
/// .await?;
/// assert_eq!(items, vec![0, 1, 2, 3, 4]);
/// # Ok(())
/// # }
/// ```
pub fn paginate<T, C, F, Fut>(start: C, mut fetch: F) -> PageStream<T>
where
    T: Send + 'static,
    C: Send + 'static,
    F: FnMut(C) -> Fut + Send + 'static,
    Fut: Future<Output = TraceResult<Page<T, C>>> + Send + 'static,
{
    let pages = stream::try_unfold(Some(start), move |cursor: Option<C>| {
        next_page(cursor.map(&mut fetch))
    });

    Box::pin(
        pages
            .map_ok(|items: Vec<T>| stream::iter(items.into_iter().map(Ok::<T, TraceError>)))
            .try_flatten(),
    )
}

async fn next_page<T, C, Fut>(pending: Option<Fut>) -> TraceResult<Option<(Vec<T>, Option<C>)>>
where
    Fut: Future<Output = TraceResult<Page<T, C>>>,
{
    let Some(pending) = pending else {
        return Ok(None);
    };
    let page = pending.await?;
    if page.items.is_empty() {
        return Ok(None);
    }
    Ok(Some((page.items, page.next)))
}

/// Drain a stream into a vector, stopping at the first error
pub async fn collect_all<T>(stream: PageStream<T>) -> TraceResult<Vec<T>> {
    stream.try_collect().await
}
