//
// Copyright (c) 2024, 2025 Oracle and/or its affiliates. All rights reserved.
//
// Licensed under the Universal Permissive License v 1.0 as shown at
//  https://oss.oracle.com/licenses/upl/
//
use crate::definition::Definition;
use crate::error::DocumentDBError;
use crate::handle::{Handle, RequestSpec};
use crate::resource::{decode_resource, Operation, ParentLink, Resource};
use std::result::Result;
use std::time::Duration;

/// Struct used for creating a resource under its parent.
///
/// The kind of resource is given by the [`Definition`]: for example a
/// [`DocumentDefinition`](crate::DocumentDefinition) creates a
/// [`Document`](crate::types::Document) in a collection.
/// ```no_run
/// use documentdb_rust_sdk::{Account, CreateRequest, DatabaseDefinition, CollectionDefinition, Handle};
/// # #[tokio::main]
/// # pub async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// # let handle = Handle::builder().from_environment()?.build()?;
/// let db = CreateRequest::new(&Account, DatabaseDefinition::new("mydb"))
///     .execute(&handle)
///     .await?;
/// let coll = CreateRequest::new(&db, CollectionDefinition::new("items"))
///     .execute(&handle)
///     .await?;
/// println!("created {}", coll.self_link());
/// # Ok(())
/// # }
/// ```
///
/// A create that the server throttles (http 429) is resubmitted after the
/// server's requested delay, up to the handle's attempt limit.
#[derive(Debug)]
pub struct CreateRequest<D: Definition> {
    pub(crate) parent: ParentLink,
    pub(crate) definition: D,
    pub(crate) timeout: Option<Duration>,
}

impl<D: Definition> CreateRequest<D> {
    /// Create a new `CreateRequest` for `definition` under `parent`.
    pub fn new(parent: &<D::Resource as Resource>::Parent, definition: D) -> CreateRequest<D> {
        CreateRequest {
            parent: ParentLink::of(parent),
            definition,
            timeout: None,
        }
    }

    /// Specify the timeout value for each attempt of the request.
    ///
    /// If not set, the default timeout value configured for the [`Handle`](crate::HandleBuilder::timeout()) is used.
    pub fn timeout(mut self, t: &Duration) -> Self {
        self.timeout = Some(*t);
        self
    }

    /// Execute the request, returning the new resource as stored by the service.
    ///
    /// Returns an [`AlreadyExists`](crate::DocumentDBErrorCode::AlreadyExists) error if a
    /// resource with the same id exists under the parent.
    pub async fn execute(&self, h: &Handle) -> Result<D::Resource, DocumentDBError> {
        let kind = <D::Resource as Resource>::KIND;
        let mut spec = RequestSpec::new(
            Operation::Create,
            kind,
            &self.parent.resource_id,
            kind.feed_path(&self.parent.self_link),
        );
        spec.body = Some(self.definition.to_body()?);
        spec.timeout = self.timeout;
        let resp = h.send_and_receive(&spec).await?;
        decode_resource(&resp.body)
    }
}
