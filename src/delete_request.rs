//
// Copyright (c) 2024 Oracle and/or its affiliates. All rights reserved.
//
// Licensed under the Universal Permissive License v 1.0 as shown at
//  https://oss.oracle.com/licenses/upl/
//
use crate::error::DocumentDBError;
use crate::handle::{Handle, RequestSpec};
use crate::resource::{Operation, ParentLink, Resource};
use std::marker::PhantomData;
use std::result::Result;
use std::time::Duration;

/// Struct used for deleting a single resource.
#[derive(Debug)]
pub struct DeleteRequest<R: Resource> {
    pub(crate) parent: ParentLink,
    pub(crate) resource_id: String,
    pub(crate) timeout: Option<Duration>,
    kind: PhantomData<fn() -> R>,
}

impl<R: Resource> DeleteRequest<R> {
    /// Create a new `DeleteRequest` for the resource `resource_id` under `parent`.
    pub fn new(parent: &R::Parent, resource_id: &str) -> DeleteRequest<R> {
        DeleteRequest {
            parent: ParentLink::of(parent),
            resource_id: resource_id.to_string(),
            timeout: None,
            kind: PhantomData,
        }
    }

    /// Create a new `DeleteRequest` for a resource previously read or created.
    pub fn for_resource(parent: &R::Parent, resource: &R) -> DeleteRequest<R> {
        Self::new(parent, resource.identity().resource_id())
    }

    /// Specify the timeout value for each attempt of the request.
    pub fn timeout(mut self, t: &Duration) -> Self {
        self.timeout = Some(*t);
        self
    }

    /// Execute the request.
    ///
    /// Deleting a resource that does not exist returns a
    /// [`NotFound`](crate::DocumentDBErrorCode::NotFound) error.
    pub async fn execute(&self, h: &Handle) -> Result<(), DocumentDBError> {
        let kind = R::KIND;
        let mut spec = RequestSpec::new(
            Operation::Delete,
            kind,
            &self.resource_id,
            kind.item_path(&self.parent.self_link, &self.resource_id),
        );
        spec.timeout = self.timeout;
        h.send_and_receive(&spec).await?;
        Ok(())
    }
}
