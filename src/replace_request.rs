//
// Copyright (c) 2024 Oracle and/or its affiliates. All rights reserved.
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

/// Struct used for replacing an existing resource with a new definition.
///
/// The resource keeps its resource id; the id in the definition may differ
/// from the current one, which renames the resource.
#[derive(Debug)]
pub struct ReplaceRequest<D: Definition> {
    pub(crate) parent: ParentLink,
    pub(crate) resource_id: String,
    pub(crate) definition: D,
    pub(crate) timeout: Option<Duration>,
}

impl<D: Definition> ReplaceRequest<D> {
    /// Create a new `ReplaceRequest` for the resource `resource_id` under `parent`.
    pub fn new(
        parent: &<D::Resource as Resource>::Parent,
        resource_id: &str,
        definition: D,
    ) -> ReplaceRequest<D> {
        ReplaceRequest {
            parent: ParentLink::of(parent),
            resource_id: resource_id.to_string(),
            definition,
            timeout: None,
        }
    }

    /// Specify the timeout value for each attempt of the request.
    pub fn timeout(mut self, t: &Duration) -> Self {
        self.timeout = Some(*t);
        self
    }

    /// Execute the request, returning the resource as now stored by the service.
    pub async fn execute(&self, h: &Handle) -> Result<D::Resource, DocumentDBError> {
        let kind = <D::Resource as Resource>::KIND;
        let mut spec = RequestSpec::new(
            Operation::Replace,
            kind,
            &self.resource_id,
            kind.item_path(&self.parent.self_link, &self.resource_id),
        );
        spec.body = Some(self.definition.to_body()?);
        spec.timeout = self.timeout;
        let resp = h.send_and_receive(&spec).await?;
        decode_resource(&resp.body)
    }
}
