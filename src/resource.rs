//
// Copyright (c) 2024, 2025 Oracle and/or its affiliates. All rights reserved.
//
// Licensed under the Universal Permissive License v 1.0 as shown at
//  https://oss.oracle.com/licenses/upl/
//
//! The per-kind table that drives every generic request in this crate.

use crate::error::{DocumentDBError, DocumentDBErrorCode};
use crate::types::ResourceIdentity;
use reqwest::{Method, StatusCode};
use serde_json::Value;

/// The nine kinds of addressable resources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Database,
    Collection,
    Document,
    User,
    Permission,
    Trigger,
    StoredProcedure,
    UserDefinedFunction,
    Attachment,
}

// (kind, path segment, field holding the items of a list or query response).
// Rows are in declaration order of ResourceKind.
const KIND_TABLE: [(ResourceKind, &str, &str); 9] = [
    (ResourceKind::Database, "dbs", "Databases"),
    (ResourceKind::Collection, "colls", "DocumentCollections"),
    (ResourceKind::Document, "docs", "Documents"),
    (ResourceKind::User, "users", "Users"),
    (ResourceKind::Permission, "permissions", "Permissions"),
    (ResourceKind::Trigger, "triggers", "Triggers"),
    (ResourceKind::StoredProcedure, "sprocs", "StoredProcedures"),
    (ResourceKind::UserDefinedFunction, "udfs", "UserDefinedFunctions"),
    (ResourceKind::Attachment, "attachments", "Attachments"),
];

impl ResourceKind {
    fn entry(&self) -> &'static (ResourceKind, &'static str, &'static str) {
        &KIND_TABLE[*self as usize]
    }

    /// The lowercase path segment, which is also the resource type that
    /// is signed: `dbs`, `colls`, `docs`, ...
    pub fn path_segment(&self) -> &'static str {
        self.entry().1
    }

    /// The field of a list or query response body that holds the items.
    pub fn list_field(&self) -> &'static str {
        self.entry().2
    }

    /// Path addressing all children of this kind under `parent_link`.
    pub(crate) fn feed_path(&self, parent_link: &str) -> String {
        let base = parent_link.trim_matches('/');
        if base.is_empty() {
            return self.path_segment().to_string();
        }
        format!("{}/{}", base, self.path_segment())
    }

    /// Path addressing one child, by its resource id.
    pub(crate) fn item_path(&self, parent_link: &str, resource_id: &str) -> String {
        format!("{}/{}", self.feed_path(parent_link), resource_id)
    }
}

/// A record type that can be read from the service.
pub trait Resource: Sized + Send + 'static {
    /// The kind of resource this one lives under.
    type Parent: Parent;
    const KIND: ResourceKind;

    /// Decode one record from its JSON body.
    fn from_json(v: Value) -> Result<Self, DocumentDBError>;

    fn identity(&self) -> &ResourceIdentity;
}

/// Anything that can contain child resources.
pub trait Parent {
    /// Base path for children; empty for the account root.
    fn self_link(&self) -> &str;
    /// Resource id signed on requests that address the children as a
    /// whole (create, list, query); empty for the account root.
    fn resource_id(&self) -> &str;
}

/// The account root. Databases are its children.
#[derive(Debug, Clone, Copy, Default)]
pub struct Account;

impl Parent for Account {
    fn self_link(&self) -> &str {
        ""
    }
    fn resource_id(&self) -> &str {
        ""
    }
}

// The owned parts of a Parent that a request keeps.
#[derive(Debug, Clone, Default)]
pub(crate) struct ParentLink {
    pub(crate) self_link: String,
    pub(crate) resource_id: String,
}

impl ParentLink {
    pub(crate) fn of(p: &dyn Parent) -> ParentLink {
        ParentLink {
            self_link: p.self_link().to_string(),
            resource_id: p.resource_id().to_string(),
        }
    }
}

/// The operations the generic requests perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Operation {
    Create,
    Read,
    List,
    Replace,
    Delete,
    Query,
    Execute,
}

impl Operation {
    pub(crate) fn method(&self) -> Method {
        match self {
            Operation::Create | Operation::Query | Operation::Execute => Method::POST,
            Operation::Read | Operation::List => Method::GET,
            Operation::Replace => Method::PUT,
            Operation::Delete => Method::DELETE,
        }
    }

    pub(crate) fn expected_status(&self) -> StatusCode {
        match self {
            Operation::Create => StatusCode::CREATED,
            Operation::Delete => StatusCode::NO_CONTENT,
            _ => StatusCode::OK,
        }
    }

    /// Plain reads and lists surface a 429 to the caller; everything
    /// else waits out the server's backoff hint and resubmits.
    pub(crate) fn retries_on_throttle(&self) -> bool {
        !matches!(self, Operation::Read | Operation::List)
    }
}

/// Decode a single-resource response body.
pub(crate) fn decode_resource<R: Resource>(body: &[u8]) -> Result<R, DocumentDBError> {
    let v: Value = serde_json::from_slice(body)?;
    R::from_json(v)
}

/// Split a list or query response body into its items and `_count`.
pub(crate) fn decode_items(
    kind: ResourceKind,
    body: &[u8],
) -> Result<(Vec<Value>, Option<u64>), DocumentDBError> {
    let mut v: Value = serde_json::from_slice(body)?;
    let count = v.get("_count").and_then(|c| c.as_u64());
    match v.get_mut(kind.list_field()).map(Value::take) {
        Some(Value::Array(items)) => Ok((items, count)),
        _ => Err(DocumentDBError::new(
            DocumentDBErrorCode::BadResponse,
            &format!("response has no '{}' array", kind.list_field()),
        )),
    }
}
