//
// Copyright (c) 2024, 2025 Oracle and/or its affiliates. All rights reserved.
//
// Licensed under the Universal Permissive License v 1.0 as shown at
//  https://oss.oracle.com/licenses/upl/
//
use crate::definition::RequestBody;
use crate::error::DocumentDBError;
use crate::handle::{Handle, RequestSpec};
use crate::resource::{Operation, Parent, ParentLink, ResourceKind};
use crate::types::Collection;
use serde_json::Value;
use std::result::Result;
use std::time::Duration;

/// Struct used for running a stored procedure of a collection.
///
/// ```no_run
/// # use documentdb_rust_sdk::{ExecuteStoredProcedureRequest, Handle};
/// # use documentdb_rust_sdk::types::Collection;
/// # use serde_json::json;
/// # #[tokio::main]
/// # pub async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// # let handle = Handle::builder().from_environment()?.build()?;
/// # let coll = Collection::default();
/// let out = ExecuteStoredProcedureRequest::new(&coll, "Hd8VAKLCdwABAAAAAAAAgA==")
///     .input(json!(["hello", 42]))
///     .execute(&handle)
///     .await?;
/// println!("procedure returned {}", out);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct ExecuteStoredProcedureRequest {
    pub(crate) collection: ParentLink,
    pub(crate) resource_id: String,
    pub(crate) input: Value,
    pub(crate) timeout: Option<Duration>,
}

impl ExecuteStoredProcedureRequest {
    /// Create a new request for the stored procedure `resource_id` in `collection`.
    pub fn new(collection: &Collection, resource_id: &str) -> ExecuteStoredProcedureRequest {
        ExecuteStoredProcedureRequest {
            collection: ParentLink::of(collection as &dyn Parent),
            resource_id: resource_id.to_string(),
            input: Value::Array(Vec::new()),
            timeout: None,
        }
    }

    /// Set the input passed to the procedure. The default is an empty array.
    pub fn input(mut self, input: Value) -> Self {
        self.input = input;
        self
    }

    /// Specify the timeout value for each attempt of the request.
    pub fn timeout(mut self, t: &Duration) -> Self {
        self.timeout = Some(*t);
        self
    }

    /// Execute the procedure, returning its JSON output (`Null` if it
    /// produced none).
    pub async fn execute(&self, h: &Handle) -> Result<Value, DocumentDBError> {
        let kind = ResourceKind::StoredProcedure;
        let mut spec = RequestSpec::new(
            Operation::Execute,
            kind,
            &self.resource_id,
            kind.item_path(&self.collection.self_link, &self.resource_id),
        );
        spec.body = Some(RequestBody::Json(self.input.clone()));
        spec.timeout = self.timeout;
        let resp = h.send_and_receive(&spec).await?;
        if resp.body.iter().all(|b| b.is_ascii_whitespace()) {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_slice(&resp.body)?)
    }
}
