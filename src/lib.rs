//
// Copyright (c) 2024, 2025 Oracle and/or its affiliates. All rights reserved.
//
// Licensed under the Universal Permissive License v 1.0 as shown at
//  https://oss.oracle.com/licenses/upl/
//
//! DocumentDB Rust SDK
//!
//! This is a Rust SDK for the DocumentDB REST API. It maps the service's
//! resources (databases, collections, documents, users, permissions, triggers,
//! stored procedures, user-defined functions and attachments) onto signed
//! HTTP requests and decodes the JSON responses into typed records.
//!
//! This SDK supplies and uses Rust `async` methods throughout, using the [tokio](https://crates.io/crates/tokio) runtime.
//! A thin blocking wrapper is available in the [`blocking`] module.
//!
//! The general flow for an application is:
//! - Create a [`HandleBuilder`] with the account endpoint and master key
//! - Create a [`Handle`] from the [`HandleBuilder`] that will be used throughout the application, across all threads
//! - Interact with the service using the [`Handle`] and Request structs such as [`CreateRequest`], [`GetRequest`], [`QueryRequest`], etc.
//!
//! ## Simple Example
//! The following code creates a [`Handle`] from values in the current environment,
//! creates a database and a collection, stores a document and queries it back.
//! ```no_run
//! use documentdb_rust_sdk::types::Document;
//! use documentdb_rust_sdk::{Account, CollectionDefinition, CreateRequest, DatabaseDefinition};
//! use documentdb_rust_sdk::{DocumentDefinition, Handle, QueryRequest};
//! use serde_json::json;
//! use std::error::Error;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn Error>> {
//!     let handle = Handle::builder().from_environment()?.build()?;
//!     let db = CreateRequest::new(&Account, DatabaseDefinition::new("todo"))
//!         .execute(&handle)
//!         .await?;
//!     let coll = CreateRequest::new(&db, CollectionDefinition::new("items"))
//!         .execute(&handle)
//!         .await?;
//!     CreateRequest::new(&coll, DocumentDefinition::new(json!({"id": "1", "task": "write docs"})))
//!         .execute(&handle)
//!         .await?;
//!     let mut iter = QueryRequest::<Document>::new(&coll, "SELECT * FROM c")
//!         .execute(&handle)
//!         .await?;
//!     while iter.has_more().await? {
//!         println!("{}", iter.next()?.payload());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Configuring the SDK
//!
//! Two values are required: the account endpoint (for example
//! `https://myaccount.documents.azure.com:443/`) and the account master key in
//! its base64 form. They can be given in code with [`HandleBuilder::endpoint()`]
//! and [`HandleBuilder::master_key()`], read from an INI file with
//! [`HandleBuilder::auth_from_file()`]:
//!
//! ```ini
//! [DEFAULT]
//! endpoint=https://myaccount.documents.azure.com:443/
//! master_key=<base64 master key>
//! ```
//!
//! or collected from the environment with [`HandleBuilder::from_environment()`].
//! A malformed master key is rejected when it is set on the builder, so a
//! [`Handle`] never fails to sign a request.
//!
//! ## Request signing
//!
//! Every request carries an `x-ms-date` header with the current time and an
//! `Authorization` header holding a HMAC-SHA256 signature, keyed with the master
//! key, over the lower-cased http verb, resource type, resource id and date.
//! A new date and signature are computed for every attempt of a request.
//!
//! ## Throttling
//!
//! When the service answers a create, replace, delete, query page or stored
//! procedure call with http 429, the [`Handle`] waits for the time given in the
//! `x-ms-retry-after-ms` response header and resubmits, up to 20 attempts in
//! total (see [`HandleBuilder::max_attempts()`]). Gets and lists are not
//! resubmitted. When the attempts run out the last response is returned as a
//! [`DocumentDBErrorCode::ServerError`].
//!
//! ## Logging
//!
//! The SDK logs through [tracing](https://crates.io/crates/tracing): `debug` for
//! handle creation and abandoned retries, `trace` for each request built and
//! each throttling delay. The master key is never logged.

pub(crate) mod auth_common;
pub use crate::auth_common::master_key::MasterKey;

pub mod blocking;

pub(crate) mod create_request;
pub use crate::create_request::CreateRequest;

pub(crate) mod definition;
pub use crate::definition::{
    AttachmentDefinition, AttachmentMedia, CollectionDefinition, DatabaseDefinition, Definition,
    DocumentDefinition, PermissionDefinition, RequestBody, StoredProcedureDefinition,
    TriggerDefinition, UserDefinedFunctionDefinition, UserDefinition,
};

pub(crate) mod delete_request;
pub use crate::delete_request::DeleteRequest;

pub(crate) mod error;
pub use crate::error::{DocumentDBError, DocumentDBErrorCode};

pub(crate) mod execute_request;
pub use crate::execute_request::ExecuteStoredProcedureRequest;

pub(crate) mod get_request;
pub use crate::get_request::GetRequest;

pub(crate) mod handle;
pub use crate::handle::{Handle, DEFAULT_API_VERSION, DEFAULT_MAX_ATTEMPTS};

pub(crate) mod handle_builder;
pub use crate::handle_builder::HandleBuilder;

pub(crate) mod list_request;
pub use crate::list_request::{ListRequest, ListResult};

#[cfg(test)]
pub(crate) mod mock_transport;

pub(crate) mod query_request;
pub use crate::query_request::{QueryIterator, QueryRequest, DYNAMIC_PAGE_SIZE};

#[cfg(test)]
pub(crate) mod query_tests;

pub(crate) mod replace_request;
pub use crate::replace_request::ReplaceRequest;

pub(crate) mod request_builder;

pub(crate) mod resource;
pub use crate::resource::{Account, Parent, Resource, ResourceKind};

#[cfg(test)]
pub(crate) mod retry_tests;

pub mod transport;
pub use crate::transport::{HttpResponse, HttpSend, SignedRequest};

pub mod types;
