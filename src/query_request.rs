//
// Copyright (c) 2024, 2025 Oracle and/or its affiliates. All rights reserved.
//
// Licensed under the Universal Permissive License v 1.0 as shown at
//  https://oss.oracle.com/licenses/upl/
//
use crate::error::{ia_err, DocumentDBError, DocumentDBErrorCode};
use crate::handle::{Handle, RequestSpec};
use crate::request_builder::{QueryPage, HEADER_CONTINUATION};
use crate::resource::{decode_items, Operation, ParentLink, Resource};

use serde_json::Value;
use std::marker::PhantomData;
use std::result::Result;
use std::time::Duration;
use tracing::{debug, trace};

/// Page size that lets the service choose how many items to return.
pub const DYNAMIC_PAGE_SIZE: i32 = -1;

/// Encapsulates a SQL query over all resources of one kind under a parent.
///
/// Executing the request fetches the first page of results and returns a
/// [`QueryIterator`], which fetches further pages as it is advanced.
///
/// ## Simple Example
/// Here is a simple example of running a query that will return every document
/// in a collection:
///
/// ```no_run
/// # use documentdb_rust_sdk::{Handle, QueryRequest};
/// # use documentdb_rust_sdk::types::{Collection, Document};
/// # #[tokio::main]
/// # pub async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// # let handle = Handle::builder().from_environment()?.build()?;
/// # let coll = Collection::default();
/// let mut iter = QueryRequest::<Document>::new(&coll, "SELECT * FROM c")
///     .page_size(50)?
///     .execute(&handle)
///     .await?;
/// while iter.has_more().await? {
///     let doc = iter.next()?;
///     println!("Document = {}", doc.payload());
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct QueryRequest<R: Resource> {
    pub(crate) parent: ParentLink,
    pub(crate) query: String,
    pub(crate) page_size: i32,
    pub(crate) timeout: Option<Duration>,
    kind: PhantomData<fn() -> R>,
}

impl<R: Resource> QueryRequest<R> {
    /// Create a new `QueryRequest` for the children of `parent`.
    pub fn new(parent: &R::Parent, query: &str) -> QueryRequest<R> {
        QueryRequest {
            parent: ParentLink::of(parent),
            query: query.to_string(),
            page_size: DYNAMIC_PAGE_SIZE,
            timeout: None,
            kind: PhantomData,
        }
    }

    /// Set the maximum number of items per page.
    ///
    /// Must be positive, or [`DYNAMIC_PAGE_SIZE`] (the default).
    pub fn page_size(mut self, size: i32) -> Result<Self, DocumentDBError> {
        if size <= 0 && size != DYNAMIC_PAGE_SIZE {
            return ia_err!("invalid page size {}", size);
        }
        self.page_size = size;
        Ok(self)
    }

    /// Specify the timeout value for each page request.
    pub fn timeout(mut self, t: &Duration) -> Self {
        self.timeout = Some(*t);
        self
    }

    /// Execute the query, fetching its first page.
    ///
    /// The returned iterator holds a clone of `h` for fetching later pages.
    pub async fn execute(&self, h: &Handle) -> Result<QueryIterator<R>, DocumentDBError> {
        let kind = R::KIND;
        let mut spec = RequestSpec::new(
            Operation::Query,
            kind,
            &self.parent.resource_id,
            kind.feed_path(&self.parent.self_link),
        );
        spec.query = Some(QueryPage {
            query: self.query.clone(),
            page_size: self.page_size,
            continuation: String::new(),
        });
        spec.timeout = self.timeout;
        let mut iter = QueryIterator {
            handle: h.clone(),
            spec,
            buffer: Vec::new(),
            cursor: 0,
            confirmed: false,
            pages: 0,
            kind: PhantomData,
        };
        iter.fetch_page().await?;
        Ok(iter)
    }
}

/// A forward-only cursor over the results of a [`QueryRequest`].
///
/// Call [`has_more()`](QueryIterator::has_more()) before every call to
/// [`next()`](QueryIterator::next()). `has_more()` only does network I/O when
/// the current page is used up and the service returned a continuation token.
///
/// An iterator must be driven by one task at a time; it is not restartable.
#[derive(Debug)]
pub struct QueryIterator<R: Resource> {
    handle: Handle,
    spec: RequestSpec,
    buffer: Vec<Value>,
    // invariant: cursor <= buffer.len()
    cursor: usize,
    // set when has_more() returned true, cleared by next()
    confirmed: bool,
    pages: usize,
    kind: PhantomData<fn() -> R>,
}

impl<R: Resource> QueryIterator<R> {
    fn continuation(&self) -> &str {
        match &self.spec.query {
            Some(q) => &q.continuation,
            None => "",
        }
    }

    /// The continuation token for the next page; empty when the service
    /// has no more pages.
    pub fn continuation_token(&self) -> &str {
        self.continuation()
    }

    /// Number of pages fetched so far, including the first.
    pub fn pages_fetched(&self) -> usize {
        self.pages
    }

    /// Return true if [`next()`](QueryIterator::next()) has an item to return.
    ///
    /// When the buffered page is used up and a continuation token is held, this
    /// fetches the next page first. Pages that come back empty with a further
    /// continuation token are skipped. Once this returns `false` it always will.
    pub async fn has_more(&mut self) -> Result<bool, DocumentDBError> {
        loop {
            if self.cursor < self.buffer.len() {
                self.confirmed = true;
                return Ok(true);
            }
            if self.continuation().is_empty() {
                self.confirmed = false;
                return Ok(false);
            }
            self.fetch_page().await?;
            if self.buffer.is_empty() && !self.continuation().is_empty() {
                debug!(
                    "query page {} was empty but has a continuation token; fetching again",
                    self.pages
                );
            }
        }
    }

    /// Return the next item.
    ///
    /// Returns an [`IteratorMisuse`](DocumentDBErrorCode::IteratorMisuse)
    /// error unless the last call on this iterator was a
    /// [`has_more()`](QueryIterator::has_more()) that returned `true`.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Result<R, DocumentDBError> {
        if !self.confirmed || self.cursor >= self.buffer.len() {
            return Err(DocumentDBError::new(
                DocumentDBErrorCode::IteratorMisuse,
                "next() called without has_more() returning true first",
            ));
        }
        self.confirmed = false;
        let v = self.buffer[self.cursor].take();
        self.cursor += 1;
        R::from_json(v)
    }

    /// Drain the iterator, collecting every remaining item.
    pub async fn collect_all(&mut self) -> Result<Vec<R>, DocumentDBError> {
        let mut out = Vec::new();
        while self.has_more().await? {
            out.push(self.next()?);
        }
        Ok(out)
    }

    // Fetch the page named by the current continuation token, replacing
    // the buffer. On error the iterator is left as it was.
    async fn fetch_page(&mut self) -> Result<(), DocumentDBError> {
        let resp = self.handle.send_and_receive(&self.spec).await?;
        let (items, _) = decode_items(self.spec.kind, &resp.body)?;
        let next = resp.header(HEADER_CONTINUATION).unwrap_or("").to_string();
        trace!(
            "query page {}: {} item(s), continuation={:?}",
            self.pages + 1,
            items.len(),
            next
        );
        if let Some(q) = &mut self.spec.query {
            q.continuation = next;
        }
        self.buffer = items;
        self.cursor = 0;
        self.pages += 1;
        Ok(())
    }
}
