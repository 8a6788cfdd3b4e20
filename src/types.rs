//
// Copyright (c) 2024, 2025 Oracle and/or its affiliates. All rights reserved.
//
// Licensed under the Universal Permissive License v 1.0 as shown at
//  https://oss.oracle.com/licenses/upl/
//
//! Records returned by the service, and the enumerations they use.
//!
//! Every resource embeds a [`ResourceIdentity`] and adds the fields of its
//! own kind. Resources are created by the request structs in this crate
//! (for example [`GetRequest`](crate::GetRequest)) and are plain values: they
//! hold no connection to the server.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_derive::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::result::Result;
use std::str::FromStr;

use crate::error::{ia_err, DocumentDBError};
use crate::resource::{Parent, Resource, ResourceKind};

// Bidirectional string mapping for an enum. Parsing ignores letter case;
// anything not in the table is an error.
macro_rules! string_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $wire:literal, )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $( $(#[$vmeta])* $variant, )+
        }

        impl $name {
            const TABLE: &'static [($name, &'static str)] = &[ $( ($name::$variant, $wire), )+ ];

            /// The string sent to and received from the service.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $( $name::$variant => $wire, )+
                }
            }
        }

        impl FromStr for $name {
            type Err = DocumentDBError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                for (v, wire) in Self::TABLE {
                    if wire.eq_ignore_ascii_case(s.trim()) {
                        return Ok(*v);
                    }
                }
                ia_err!("invalid {} value '{}'", stringify!($name), s)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let s = String::deserialize(deserializer)?;
                $name::from_str(&s).map_err(|e| serde::de::Error::custom(e.message))
            }
        }
    };
}

string_enum! {
    /// The operation(s) a trigger fires on.
    TriggerOperation {
        All => "All",
        Create => "Create",
        Update => "Update",
        Replace => "Replace",
        Delete => "Delete",
    }
}

string_enum! {
    /// Whether a trigger runs before or after its operation.
    TriggerType {
        Pre => "Pre",
        Post => "Post",
    }
}

string_enum! {
    /// The access a [`Permission`] grants on its resource.
    PermissionMode {
        Read => "Read",
        All => "All",
    }
}

string_enum! {
    /// When a collection's index is updated relative to writes.
    #[derive(Default)]
    IndexingMode {
        /// The index is updated synchronously with each write.
        #[default]
        Consistent => "consistent",
        /// The index is updated asynchronously.
        Lazy => "lazy",
        None => "none",
    }
}

string_enum! {
    IndexKind {
        Hash => "Hash",
        Range => "Range",
        Spatial => "Spatial",
    }
}

/// The fields the service assigns to every resource.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ResourceIdentity {
    #[serde(default)]
    pub(crate) id: String,
    #[serde(rename = "_rid", default)]
    pub(crate) resource_id: String,
    #[serde(rename = "_ts", default)]
    pub(crate) timestamp: i64,
    #[serde(rename = "_self", default)]
    pub(crate) self_link: String,
    #[serde(rename = "_etag", default)]
    pub(crate) etag: String,
}

impl ResourceIdentity {
    /// The user-chosen name, unique within the parent.
    pub fn id(&self) -> &str {
        &self.id
    }
    /// The server-assigned identifier. It never changes, even when the
    /// resource is renamed by a replace.
    pub fn resource_id(&self) -> &str {
        &self.resource_id
    }
    /// Last modification time, in seconds since the epoch.
    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }
    /// Last modification time as a [`DateTime`], if the timestamp is in range.
    pub fn last_modified(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.timestamp, 0)
    }
    /// The server-assigned relative path of this resource, used as the
    /// base path for its children.
    pub fn self_link(&self) -> &str {
        &self.self_link
    }
    /// Opaque version token.
    pub fn etag(&self) -> &str {
        &self.etag
    }
}

// Deserialize one resource record through its derived serde shape.
fn decode<T: DeserializeOwned>(v: Value) -> Result<T, DocumentDBError> {
    Ok(serde_json::from_value(v)?)
}

// Accessors shared by every kind, plus the Resource and Parent plumbing.
macro_rules! resource {
    ($name:ident, $kind:expr, $parent:ty) => {
        impl $name {
            pub fn identity(&self) -> &ResourceIdentity {
                &self.identity
            }
            pub fn id(&self) -> &str {
                &self.identity.id
            }
            pub fn resource_id(&self) -> &str {
                &self.identity.resource_id
            }
            pub fn self_link(&self) -> &str {
                &self.identity.self_link
            }
            pub fn etag(&self) -> &str {
                &self.identity.etag
            }
            pub fn timestamp(&self) -> i64 {
                self.identity.timestamp
            }
        }

        impl Resource for $name {
            type Parent = $parent;
            const KIND: ResourceKind = $kind;

            fn from_json(v: Value) -> Result<Self, DocumentDBError> {
                decode(v)
            }

            fn identity(&self) -> &ResourceIdentity {
                &self.identity
            }
        }
    };
}

macro_rules! parent {
    ($name:ident) => {
        impl Parent for $name {
            fn self_link(&self) -> &str {
                &self.identity.self_link
            }
            fn resource_id(&self) -> &str {
                &self.identity.resource_id
            }
        }
    };
}

/// A database: the top-level container of collections and users.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Database {
    #[serde(flatten)]
    pub(crate) identity: ResourceIdentity,
    #[serde(rename = "_colls", default)]
    pub(crate) collections_link: String,
    #[serde(rename = "_users", default)]
    pub(crate) users_link: String,
}

resource!(Database, ResourceKind::Database, crate::resource::Account);
parent!(Database);

impl Database {
    pub fn collections_link(&self) -> &str {
        &self.collections_link
    }
    pub fn users_link(&self) -> &str {
        &self.users_link
    }
}

/// A collection of documents, with its scripts and indexing policy.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Collection {
    #[serde(flatten)]
    pub(crate) identity: ResourceIdentity,
    #[serde(rename = "_docs", default)]
    pub(crate) documents_link: String,
    #[serde(rename = "_sprocs", default)]
    pub(crate) stored_procedures_link: String,
    #[serde(rename = "_triggers", default)]
    pub(crate) triggers_link: String,
    #[serde(rename = "_udfs", default)]
    pub(crate) user_defined_functions_link: String,
    #[serde(rename = "_conflicts", default)]
    pub(crate) conflicts_link: String,
    #[serde(rename = "indexingPolicy", default)]
    pub(crate) indexing_policy: Option<IndexingPolicy>,
}

resource!(Collection, ResourceKind::Collection, Database);
parent!(Collection);

impl Collection {
    pub fn documents_link(&self) -> &str {
        &self.documents_link
    }
    pub fn stored_procedures_link(&self) -> &str {
        &self.stored_procedures_link
    }
    pub fn triggers_link(&self) -> &str {
        &self.triggers_link
    }
    pub fn user_defined_functions_link(&self) -> &str {
        &self.user_defined_functions_link
    }
    pub fn conflicts_link(&self) -> &str {
        &self.conflicts_link
    }
    /// The indexing policy, if the service returned one.
    pub fn indexing_policy(&self) -> Option<&IndexingPolicy> {
        self.indexing_policy.as_ref()
    }
}

/// A JSON document.
///
/// The complete JSON body returned by the service, system fields included,
/// is kept in [`payload()`](Document::payload()).
#[derive(Debug, Clone, Default)]
pub struct Document {
    pub(crate) identity: ResourceIdentity,
    pub(crate) attachments_link: String,
    pub(crate) payload: Value,
}

impl Document {
    pub fn identity(&self) -> &ResourceIdentity {
        &self.identity
    }
    pub fn id(&self) -> &str {
        &self.identity.id
    }
    pub fn resource_id(&self) -> &str {
        &self.identity.resource_id
    }
    pub fn self_link(&self) -> &str {
        &self.identity.self_link
    }
    pub fn etag(&self) -> &str {
        &self.identity.etag
    }
    pub fn timestamp(&self) -> i64 {
        self.identity.timestamp
    }
    pub fn attachments_link(&self) -> &str {
        &self.attachments_link
    }
    /// The full JSON body of the document.
    pub fn payload(&self) -> &Value {
        &self.payload
    }
    /// Consume the document, returning its JSON body.
    pub fn into_payload(self) -> Value {
        self.payload
    }
    /// Deserialize the document body into an application type.
    ///
    /// Fields of `T` not present in the document must have serde defaults;
    /// system fields such as `_rid` are ignored unless `T` asks for them.
    pub fn to_typed<T: DeserializeOwned>(&self) -> Result<T, DocumentDBError> {
        Ok(serde_json::from_value(self.payload.clone())?)
    }
}

impl Resource for Document {
    type Parent = Collection;
    const KIND: ResourceKind = ResourceKind::Document;

    fn from_json(v: Value) -> Result<Self, DocumentDBError> {
        let identity: ResourceIdentity = serde_json::from_value(v.clone())?;
        let attachments_link = match v.get("_attachments") {
            Some(Value::String(s)) => s.clone(),
            _ => String::new(),
        };
        Ok(Document {
            identity,
            attachments_link,
            payload: v,
        })
    }

    fn identity(&self) -> &ResourceIdentity {
        &self.identity
    }
}

parent!(Document);

/// A user of a database. Users hold permissions.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct User {
    #[serde(flatten)]
    pub(crate) identity: ResourceIdentity,
    #[serde(rename = "_permissions", default)]
    pub(crate) permissions_link: String,
}

resource!(User, ResourceKind::User, Database);
parent!(User);

impl User {
    pub fn permissions_link(&self) -> &str {
        &self.permissions_link
    }
}

/// Access for a [`User`] to one resource.
#[derive(Debug, Clone, Deserialize)]
pub struct Permission {
    #[serde(flatten)]
    pub(crate) identity: ResourceIdentity,
    #[serde(rename = "permissionMode")]
    pub(crate) mode: PermissionMode,
    #[serde(default)]
    pub(crate) resource: String,
    #[serde(rename = "_token", default)]
    pub(crate) token: String,
}

resource!(Permission, ResourceKind::Permission, User);

impl Permission {
    pub fn mode(&self) -> PermissionMode {
        self.mode
    }
    /// Self-link of the resource this permission applies to.
    pub fn resource(&self) -> &str {
        &self.resource
    }
    /// Resource token issued for this permission.
    pub fn token(&self) -> &str {
        &self.token
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Trigger {
    #[serde(flatten)]
    pub(crate) identity: ResourceIdentity,
    #[serde(default)]
    pub(crate) body: String,
    #[serde(rename = "triggerOperation")]
    pub(crate) operation: TriggerOperation,
    #[serde(rename = "triggerType")]
    pub(crate) trigger_type: TriggerType,
}

resource!(Trigger, ResourceKind::Trigger, Collection);

impl Trigger {
    /// The javascript source of the trigger.
    pub fn body(&self) -> &str {
        &self.body
    }
    pub fn operation(&self) -> TriggerOperation {
        self.operation
    }
    pub fn trigger_type(&self) -> TriggerType {
        self.trigger_type
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StoredProcedure {
    #[serde(flatten)]
    pub(crate) identity: ResourceIdentity,
    #[serde(default)]
    pub(crate) body: String,
}

resource!(StoredProcedure, ResourceKind::StoredProcedure, Collection);

impl StoredProcedure {
    /// The javascript source of the stored procedure.
    pub fn body(&self) -> &str {
        &self.body
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserDefinedFunction {
    #[serde(flatten)]
    pub(crate) identity: ResourceIdentity,
    #[serde(default)]
    pub(crate) body: String,
}

resource!(
    UserDefinedFunction,
    ResourceKind::UserDefinedFunction,
    Collection
);

impl UserDefinedFunction {
    /// The javascript source of the function.
    pub fn body(&self) -> &str {
        &self.body
    }
}

/// Metadata for a blob attached to a [`Document`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Attachment {
    #[serde(flatten)]
    pub(crate) identity: ResourceIdentity,
    #[serde(rename = "contentType", default)]
    pub(crate) content_type: String,
    #[serde(default)]
    pub(crate) media: String,
}

resource!(Attachment, ResourceKind::Attachment, Document);

impl Attachment {
    pub fn content_type(&self) -> &str {
        &self.content_type
    }
    /// Link to the attachment's media. For uploaded media this is a
    /// path on the service, otherwise the external URL given at creation.
    pub fn media(&self) -> &str {
        &self.media
    }
}

/// How documents in a collection are indexed.
///
/// Both the current camel-case field names and the older capitalized
/// ones (`IncludedPaths`, `Path`, ...) are accepted when decoding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexingPolicy {
    #[serde(default = "default_automatic")]
    pub automatic: bool,
    #[serde(default)]
    pub indexing_mode: IndexingMode,
    #[serde(default, alias = "IncludedPaths")]
    pub included_paths: Vec<IncludedPath>,
    #[serde(default, alias = "ExcludedPaths")]
    pub excluded_paths: Vec<ExcludedPath>,
}

fn default_automatic() -> bool {
    true
}

impl Default for IndexingPolicy {
    fn default() -> Self {
        IndexingPolicy {
            automatic: true,
            indexing_mode: IndexingMode::Consistent,
            included_paths: vec![IncludedPath {
                path: "/*".to_string(),
                indexes: Vec::new(),
            }],
            excluded_paths: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncludedPath {
    #[serde(alias = "Path")]
    pub path: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub indexes: Vec<Index>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExcludedPath {
    #[serde(alias = "Path")]
    pub path: String,
}

/// One index on an included path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Index {
    #[serde(alias = "IndexType")]
    pub kind: IndexKind,
    /// `String`, `Number`, `Point`, ...
    #[serde(rename = "dataType", default, skip_serializing_if = "String::is_empty")]
    pub data_type: String,
    /// -1 means maximum precision.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub precision: Option<i32>,
}

impl Index {
    pub fn new(kind: IndexKind, data_type: &str, precision: Option<i32>) -> Index {
        Index {
            kind,
            data_type: data_type.to_string(),
            precision,
        }
    }
}
