//
// Copyright (c) 2024, 2025 Oracle and/or its affiliates. All rights reserved.
//
// Licensed under the Universal Permissive License v 1.0 as shown at
//  https://oss.oracle.com/licenses/upl/
//
use crate::auth_common::master_key::MasterKey;
use crate::definition::RequestBody;
use crate::error::DocumentDBErrorCode::RateLimited;
use crate::error::{ia_err, DocumentDBError, DocumentDBErrorCode};
use crate::handle_builder::HandleBuilder;
use crate::request_builder::{set_body, QueryPage, HEADER_RETRY_AFTER_MS};
use crate::resource::{Operation, ResourceKind};
use crate::transport::{HttpResponse, HttpSend, SignedRequest};

use std::result::Result;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, trace};
use url::Url;

/// Default api version sent in `x-ms-version`.
pub const DEFAULT_API_VERSION: &str = "2017-02-22";

/// Default number of send attempts for an operation that is throttled.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 20;

/// **The main database handle**.
///
/// This should be created once and used
/// throughout the application lifetime, across all threads.
///
/// Note: there is no need to enclose this struct in an `Rc` or [`Arc`], as it uses an
/// [`Arc`] internally, so calling `.clone()` on this struct will always return the
/// same underlying handle.
#[derive(Clone, Debug)]
pub struct Handle {
    // Use an inner Arc so cloning keeps the same contents
    pub(crate) inner: Arc<HandleRef>,
}

#[derive(Debug)]
pub(crate) struct HandleRef {
    pub(crate) transport: Arc<dyn HttpSend>,
    pub(crate) endpoint: Url,
    pub(crate) master_key: MasterKey,
    pub(crate) api_version: String,
    pub(crate) max_attempts: u32,
    timeout: Duration,
}

/// Everything needed to build (and rebuild) the request for one operation.
#[derive(Debug, Clone)]
pub(crate) struct RequestSpec {
    pub(crate) op: Operation,
    pub(crate) kind: ResourceKind,
    // resource id that goes into the signature
    pub(crate) signing_id: String,
    pub(crate) path: String,
    pub(crate) body: Option<RequestBody>,
    pub(crate) query: Option<QueryPage>,
    pub(crate) timeout: Option<Duration>,
}

impl RequestSpec {
    pub(crate) fn new(op: Operation, kind: ResourceKind, signing_id: &str, path: String) -> Self {
        RequestSpec {
            op,
            kind,
            signing_id: signing_id.to_string(),
            path,
            body: None,
            query: None,
            timeout: None,
        }
    }
}

impl Handle {
    /// Create a new [`HandleBuilder`].
    pub fn builder() -> HandleBuilder {
        HandleBuilder::new()
    }

    // Create the new Handle based on builder configuration
    pub(crate) fn new(b: &HandleBuilder) -> Result<Handle, DocumentDBError> {
        let builder = b.clone();
        let endpoint = match &builder.endpoint {
            Some(e) => e.clone(),
            None => {
                if builder.from_environment {
                    return ia_err!("cannot build handle: no endpoint given. set DOCUMENTDB_ENDPOINT or DOCUMENTDB_CONFIG_FILE.");
                }
                return ia_err!("cannot build handle: call HandleBuilder::endpoint()");
            }
        };
        let master_key = match &builder.master_key {
            Some(k) => k.clone(),
            None => {
                if builder.from_environment {
                    return ia_err!("cannot build handle: no master key given. set DOCUMENTDB_MASTER_KEY or DOCUMENTDB_CONFIG_FILE.");
                }
                return ia_err!("cannot build handle: call HandleBuilder::master_key()");
            }
        };
        // default timeout to 30 seconds
        let timeout = builder.timeout.unwrap_or(Duration::new(30, 0));
        let transport: Arc<dyn HttpSend> = {
            if let Some(t) = &builder.transport {
                t.clone()
            } else if let Some(c) = &builder.client {
                Arc::new(c.clone())
            } else {
                let mut cb = reqwest::Client::builder()
                    .timeout(timeout)
                    .connect_timeout(timeout);
                if let Some(cert) = &builder.add_cert {
                    cb = cb.add_root_certificate(cert.clone());
                }
                if builder.accept_invalid_certs {
                    cb = cb.danger_accept_invalid_certs(true);
                }
                Arc::new(cb.build()?)
            }
        };
        debug!(
            "Creating new Handle: endpoint={}, api_version={}, max_attempts={}",
            endpoint, builder.api_version, builder.max_attempts
        );
        Ok(Handle {
            inner: Arc::new(HandleRef {
                transport,
                endpoint,
                master_key,
                api_version: builder.api_version,
                max_attempts: builder.max_attempts,
                timeout,
            }),
        })
    }

    /// The endpoint all request paths are resolved against.
    pub fn endpoint(&self) -> &Url {
        &self.inner.endpoint
    }

    pub(crate) fn url_for(&self, path: &str) -> Result<Url, DocumentDBError> {
        Ok(self.inner.endpoint.join(path.trim_start_matches('/'))?)
    }

    fn get_retry_after(resp: &HttpResponse) -> Option<Duration> {
        let v = resp.header(HEADER_RETRY_AFTER_MS)?;
        match v.trim().parse::<u64>() {
            Ok(ms) => Some(Duration::from_millis(ms)),
            Err(_) => None,
        }
    }

    /// Send the operation, waiting out 429 responses on operations that
    /// allow it, up to the handle's attempt ceiling.
    ///
    /// Returns the response only if its status is the one the operation
    /// expects; every other status becomes a typed error.
    pub(crate) async fn send_and_receive(
        &self,
        spec: &RequestSpec,
    ) -> Result<HttpResponse, DocumentDBError> {
        let mut attempts: u32 = 0;
        loop {
            attempts += 1;
            let err = match self.send_and_receive_once(spec).await {
                Ok(r) => return Ok(r),
                Err(e) => e,
            };
            if err.code != RateLimited {
                return Err(err);
            }
            let delay = match err.retry_after {
                Some(d) if spec.op.retries_on_throttle() && attempts < self.inner.max_attempts => d,
                _ => {
                    debug!(
                        "giving up on throttled {:?} {} after {} attempt(s)",
                        spec.op, spec.path, attempts
                    );
                    return Err(throttle_failure(err));
                }
            };
            trace!(
                "throttled on attempt {}: waiting {}ms before resubmitting",
                attempts,
                delay.as_millis()
            );
            tokio::time::sleep(delay).await;
        }
    }

    pub(crate) async fn send_and_receive_once(
        &self,
        spec: &RequestSpec,
    ) -> Result<HttpResponse, DocumentDBError> {
        let req = self.build_for(spec)?;
        let resp = self.inner.transport.http_send(req).await?;
        if resp.status == spec.op.expected_status() {
            return Ok(resp);
        }
        let mut err = DocumentDBError::classify(resp.status.as_u16(), &resp.body);
        if resp.status.as_u16() == 429 {
            err.code = RateLimited;
            err.retry_after = Self::get_retry_after(&resp);
        }
        Err(err)
    }

    // A freshly dated and signed request for one attempt.
    fn build_for(&self, spec: &RequestSpec) -> Result<SignedRequest, DocumentDBError> {
        let url = self.url_for(&spec.path)?;
        let timeout = self.get_timeout(&spec.timeout);
        let resource_type = spec.kind.path_segment();
        if let Some(q) = &spec.query {
            return self.build_query_request(q, resource_type, &spec.signing_id, url, timeout);
        }
        let mut req = self.build_request(
            spec.op.method(),
            resource_type,
            &spec.signing_id,
            url,
            timeout,
        )?;
        if let Some(b) = &spec.body {
            set_body(&mut req, b)?;
        }
        Ok(req)
    }

    pub(crate) fn get_timeout(&self, t: &Option<Duration>) -> Duration {
        // if t is given, use that. If not, use handle's timeout
        if let Some(d) = t {
            return *d;
        }
        self.inner.timeout
    }
}

// A 429 that is handed back to the caller is a plain server error.
fn throttle_failure(mut err: DocumentDBError) -> DocumentDBError {
    err.code = DocumentDBErrorCode::ServerError;
    err.retry_after = None;
    err
}
