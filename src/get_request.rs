//
// Copyright (c) 2024 Oracle and/or its affiliates. All rights reserved.
//
// Licensed under the Universal Permissive License v 1.0 as shown at
//  https://oss.oracle.com/licenses/upl/
//
use crate::error::DocumentDBError;
use crate::handle::{Handle, RequestSpec};
use crate::resource::{decode_resource, Operation, ParentLink, Resource};
use std::marker::PhantomData;
use std::result::Result;
use std::time::Duration;

/// Struct used for reading a single resource by its resource id.
///
/// Unlike writes and queries, a get is not resubmitted when the server
/// throttles it: a 429 is returned to the caller as a
/// [`ServerError`](crate::DocumentDBErrorCode::ServerError).
#[derive(Debug)]
pub struct GetRequest<R: Resource> {
    pub(crate) parent: ParentLink,
    pub(crate) resource_id: String,
    pub(crate) timeout: Option<Duration>,
    kind: PhantomData<fn() -> R>,
}

impl<R: Resource> GetRequest<R> {
    /// Create a new `GetRequest`.
    ///
    /// `resource_id` is the server-assigned id (`_rid`) of the resource.
    pub fn new(parent: &R::Parent, resource_id: &str) -> GetRequest<R> {
        GetRequest {
            parent: ParentLink::of(parent),
            resource_id: resource_id.to_string(),
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

    /// Execute the request, returning the resource.
    ///
    /// If the resource does not exist, the error code is
    /// [`NotFound`](crate::DocumentDBErrorCode::NotFound).
    /// ```no_run
    /// use documentdb_rust_sdk::{Account, GetRequest, Handle};
    /// use documentdb_rust_sdk::types::{Collection, Database, Document};
    /// # #[tokio::main]
    /// # pub async fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// # let handle = Handle::builder().from_environment()?.build()?;
    /// let db: Database = GetRequest::new(&Account, "Hd8VAA==").execute(&handle).await?;
    /// let coll = GetRequest::<Collection>::new(&db, "Hd8VAKLCdwA=").execute(&handle).await?;
    /// match GetRequest::<Document>::new(&coll, "Hd8VAKLCdwABAAAAAAAAAA==").execute(&handle).await {
    ///     Ok(doc) => println!("document: {}", doc.payload()),
    ///     Err(e) if e.is_not_found() => println!("no such document"),
    ///     Err(e) => return Err(e.into()),
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn execute(&self, h: &Handle) -> Result<R, DocumentDBError> {
        let kind = R::KIND;
        let mut spec = RequestSpec::new(
            Operation::Read,
            kind,
            &self.resource_id,
            kind.item_path(&self.parent.self_link, &self.resource_id),
        );
        spec.timeout = self.timeout;
        let resp = h.send_and_receive(&spec).await?;
        decode_resource(&resp.body)
    }
}
