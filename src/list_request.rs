//
// Copyright (c) 2024 Oracle and/or its affiliates. All rights reserved.
//
// Licensed under the Universal Permissive License v 1.0 as shown at
//  https://oss.oracle.com/licenses/upl/
//
use crate::error::DocumentDBError;
use crate::handle::{Handle, RequestSpec};
use crate::resource::{decode_items, Operation, ParentLink, Resource};
use std::marker::PhantomData;
use std::result::Result;
use std::time::Duration;

/// Struct used for listing all resources of one kind under a parent.
///
/// Like [`GetRequest`](crate::GetRequest), a list is not resubmitted when
/// the server throttles it.
#[derive(Debug)]
pub struct ListRequest<R: Resource> {
    pub(crate) parent: ParentLink,
    pub(crate) timeout: Option<Duration>,
    kind: PhantomData<fn() -> R>,
}

/// Struct representing the result of a [`ListRequest`] operation.
#[derive(Debug)]
pub struct ListResult<R: Resource> {
    pub(crate) items: Vec<R>,
    pub(crate) count: u64,
}

impl<R: Resource> ListResult<R> {
    /// The resources returned.
    pub fn items(&self) -> &[R] {
        &self.items
    }
    /// Consume the result, returning the resources.
    pub fn into_items(self) -> Vec<R> {
        self.items
    }
    /// The `_count` reported by the service.
    pub fn count(&self) -> u64 {
        self.count
    }
}

impl<R: Resource> ListRequest<R> {
    /// Create a new `ListRequest`.
    pub fn new(parent: &R::Parent) -> ListRequest<R> {
        ListRequest {
            parent: ParentLink::of(parent),
            timeout: None,
            kind: PhantomData,
        }
    }

    /// Specify the timeout value for the request.
    ///
    /// If not set, the default timeout value configured for the [`Handle`](crate::HandleBuilder::timeout()) is used.
    pub fn timeout(mut self, t: &Duration) -> Self {
        self.timeout = Some(*t);
        self
    }

    /// Execute the request, returning a [`ListResult`].
    ///
    /// ```no_run
    /// use documentdb_rust_sdk::{Account, Handle, ListRequest};
    /// use documentdb_rust_sdk::types::Database;
    /// # #[tokio::main]
    /// # pub async fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// # let handle = Handle::builder().from_environment()?.build()?;
    /// let res = ListRequest::<Database>::new(&Account).execute(&handle).await?;
    /// for db in res.items() {
    ///     println!("{} ({})", db.id(), db.resource_id());
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn execute(&self, h: &Handle) -> Result<ListResult<R>, DocumentDBError> {
        let kind = R::KIND;
        let mut spec = RequestSpec::new(
            Operation::List,
            kind,
            &self.parent.resource_id,
            kind.feed_path(&self.parent.self_link),
        );
        spec.timeout = self.timeout;
        let resp = h.send_and_receive(&spec).await?;
        let (values, count) = decode_items(kind, &resp.body)?;
        let mut items = Vec::with_capacity(values.len());
        for v in values {
            items.push(R::from_json(v)?);
        }
        let count = count.unwrap_or(items.len() as u64);
        Ok(ListResult { items, count })
    }
}
