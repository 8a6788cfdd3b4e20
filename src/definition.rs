//
// Copyright (c) 2024, 2025 Oracle and/or its affiliates. All rights reserved.
//
// Licensed under the Universal Permissive License v 1.0 as shown at
//  https://oss.oracle.com/licenses/upl/
//
//! Request bodies for [`CreateRequest`](crate::CreateRequest) and
//! [`ReplaceRequest`](crate::ReplaceRequest), one definition per kind.

use crate::error::{ia_err, DocumentDBError};
use crate::resource::Resource;
use crate::types::{
    Attachment, Collection, Database, Document, IndexingPolicy, Permission, PermissionMode,
    StoredProcedure, Trigger, TriggerOperation, TriggerType, User, UserDefinedFunction,
};
use bytes::Bytes;
use serde::Serialize;
use serde_json::{json, Map, Value};

/// The body of a create or replace request.
#[derive(Debug, Clone)]
pub enum RequestBody {
    /// A JSON body, sent as `application/json`.
    Json(Value),
    /// Raw media with its own content type; `slug` names the new resource.
    Raw {
        content_type: String,
        slug: String,
        data: Bytes,
    },
}

/// The client-side description of a resource to create or replace.
pub trait Definition: Send + Sync {
    /// The resource the service returns for this definition.
    type Resource: Resource;

    fn to_body(&self) -> Result<RequestBody, DocumentDBError>;
}

fn with_id(id: &str) -> Map<String, Value> {
    let mut m = Map::new();
    m.insert("id".to_string(), Value::String(id.to_string()));
    m
}

#[derive(Debug, Clone)]
pub struct DatabaseDefinition {
    id: String,
}

impl DatabaseDefinition {
    pub fn new(id: &str) -> DatabaseDefinition {
        DatabaseDefinition { id: id.to_string() }
    }
}

impl Definition for DatabaseDefinition {
    type Resource = Database;

    fn to_body(&self) -> Result<RequestBody, DocumentDBError> {
        Ok(RequestBody::Json(Value::Object(with_id(&self.id))))
    }
}

#[derive(Debug, Clone)]
pub struct CollectionDefinition {
    id: String,
    indexing_policy: Option<IndexingPolicy>,
}

impl CollectionDefinition {
    pub fn new(id: &str) -> CollectionDefinition {
        CollectionDefinition {
            id: id.to_string(),
            indexing_policy: None,
        }
    }

    /// Set the indexing policy. If not set, the service default is used.
    pub fn indexing_policy(mut self, policy: IndexingPolicy) -> Self {
        self.indexing_policy = Some(policy);
        self
    }
}

impl Definition for CollectionDefinition {
    type Resource = Collection;

    fn to_body(&self) -> Result<RequestBody, DocumentDBError> {
        let mut m = with_id(&self.id);
        if let Some(p) = &self.indexing_policy {
            m.insert("indexingPolicy".to_string(), serde_json::to_value(p)?);
        }
        Ok(RequestBody::Json(Value::Object(m)))
    }
}

/// A JSON document.
///
/// If the document has no `id` field, a random one is generated when the
/// definition is created, so every attempt of the request sends the same id.
#[derive(Debug, Clone)]
pub struct DocumentDefinition {
    value: Value,
}

impl DocumentDefinition {
    pub fn new(mut value: Value) -> DocumentDefinition {
        if let Value::Object(m) = &mut value {
            if !m.contains_key("id") {
                m.insert("id".to_string(), Value::String(generate_id()));
            }
        }
        DocumentDefinition { value }
    }

    /// Create a definition from any serializable application type.
    pub fn from_serialize<T: Serialize>(doc: &T) -> Result<DocumentDefinition, DocumentDBError> {
        Ok(DocumentDefinition::new(serde_json::to_value(doc)?))
    }

    /// The document id, if the JSON is an object with a string `id`.
    pub fn id(&self) -> Option<&str> {
        self.value.get("id").and_then(|v| v.as_str())
    }
}

impl Definition for DocumentDefinition {
    type Resource = Document;

    fn to_body(&self) -> Result<RequestBody, DocumentDBError> {
        if !self.value.is_object() {
            return ia_err!("a document must be a JSON object");
        }
        Ok(RequestBody::Json(self.value.clone()))
    }
}

#[derive(Debug, Clone)]
pub struct UserDefinition {
    id: String,
}

impl UserDefinition {
    pub fn new(id: &str) -> UserDefinition {
        UserDefinition { id: id.to_string() }
    }
}

impl Definition for UserDefinition {
    type Resource = User;

    fn to_body(&self) -> Result<RequestBody, DocumentDBError> {
        Ok(RequestBody::Json(Value::Object(with_id(&self.id))))
    }
}

#[derive(Debug, Clone)]
pub struct PermissionDefinition {
    id: String,
    mode: PermissionMode,
    resource: String,
}

impl PermissionDefinition {
    /// `resource` is the self-link of the resource to grant access to.
    pub fn new(id: &str, mode: PermissionMode, resource: &str) -> PermissionDefinition {
        PermissionDefinition {
            id: id.to_string(),
            mode,
            resource: resource.to_string(),
        }
    }
}

impl Definition for PermissionDefinition {
    type Resource = Permission;

    fn to_body(&self) -> Result<RequestBody, DocumentDBError> {
        Ok(RequestBody::Json(json!({
            "id": self.id,
            "permissionMode": self.mode.as_str(),
            "resource": self.resource,
        })))
    }
}

#[derive(Debug, Clone)]
pub struct TriggerDefinition {
    id: String,
    body: String,
    operation: TriggerOperation,
    trigger_type: TriggerType,
}

impl TriggerDefinition {
    pub fn new(
        id: &str,
        body: &str,
        operation: TriggerOperation,
        trigger_type: TriggerType,
    ) -> TriggerDefinition {
        TriggerDefinition {
            id: id.to_string(),
            body: body.to_string(),
            operation,
            trigger_type,
        }
    }
}

impl Definition for TriggerDefinition {
    type Resource = Trigger;

    fn to_body(&self) -> Result<RequestBody, DocumentDBError> {
        Ok(RequestBody::Json(json!({
            "id": self.id,
            "body": self.body,
            "triggerOperation": self.operation.as_str(),
            "triggerType": self.trigger_type.as_str(),
        })))
    }
}

#[derive(Debug, Clone)]
pub struct StoredProcedureDefinition {
    id: String,
    body: String,
}

impl StoredProcedureDefinition {
    pub fn new(id: &str, body: &str) -> StoredProcedureDefinition {
        StoredProcedureDefinition {
            id: id.to_string(),
            body: body.to_string(),
        }
    }
}

impl Definition for StoredProcedureDefinition {
    type Resource = StoredProcedure;

    fn to_body(&self) -> Result<RequestBody, DocumentDBError> {
        Ok(RequestBody::Json(json!({ "id": self.id, "body": self.body })))
    }
}

#[derive(Debug, Clone)]
pub struct UserDefinedFunctionDefinition {
    id: String,
    body: String,
}

impl UserDefinedFunctionDefinition {
    pub fn new(id: &str, body: &str) -> UserDefinedFunctionDefinition {
        UserDefinedFunctionDefinition {
            id: id.to_string(),
            body: body.to_string(),
        }
    }
}

impl Definition for UserDefinedFunctionDefinition {
    type Resource = UserDefinedFunction;

    fn to_body(&self) -> Result<RequestBody, DocumentDBError> {
        Ok(RequestBody::Json(json!({ "id": self.id, "body": self.body })))
    }
}

/// An attachment that points at media stored elsewhere.
#[derive(Debug, Clone)]
pub struct AttachmentDefinition {
    id: String,
    content_type: String,
    media: String,
}

impl AttachmentDefinition {
    pub fn new(id: &str, content_type: &str, media: &str) -> AttachmentDefinition {
        AttachmentDefinition {
            id: id.to_string(),
            content_type: content_type.to_string(),
            media: media.to_string(),
        }
    }
}

impl Definition for AttachmentDefinition {
    type Resource = Attachment;

    fn to_body(&self) -> Result<RequestBody, DocumentDBError> {
        Ok(RequestBody::Json(json!({
            "id": self.id,
            "contentType": self.content_type,
            "media": self.media,
        })))
    }
}

/// An attachment whose media bytes are uploaded to the service.
#[derive(Debug, Clone)]
pub struct AttachmentMedia {
    slug: String,
    content_type: String,
    data: Bytes,
}

impl AttachmentMedia {
    /// `slug` becomes the id of the new attachment.
    pub fn new(slug: &str, content_type: &str, data: impl Into<Bytes>) -> AttachmentMedia {
        AttachmentMedia {
            slug: slug.to_string(),
            content_type: content_type.to_string(),
            data: data.into(),
        }
    }
}

impl Definition for AttachmentMedia {
    type Resource = Attachment;

    fn to_body(&self) -> Result<RequestBody, DocumentDBError> {
        if self.content_type.is_empty() {
            return ia_err!("attachment media requires a content type");
        }
        Ok(RequestBody::Raw {
            content_type: self.content_type.clone(),
            slug: self.slug.clone(),
            data: self.data.clone(),
        })
    }
}

// A random (version 4) GUID in its usual hyphenated form.
fn generate_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
