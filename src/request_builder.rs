//
// Copyright (c) 2024, 2025 Oracle and/or its affiliates. All rights reserved.
//
// Licensed under the Universal Permissive License v 1.0 as shown at
//  https://oss.oracle.com/licenses/upl/
//
use crate::auth_common::signer;
use crate::definition::RequestBody;
use crate::error::{user_agent, DocumentDBError};
use crate::handle::Handle;
use crate::transport::SignedRequest;
use bytes::Bytes;
use chrono::Utc;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use reqwest::Method;
use std::time::Duration;
use tracing::trace;
use url::Url;

pub(crate) const HEADER_DATE: &str = "x-ms-date";
pub(crate) const HEADER_VERSION: &str = "x-ms-version";
pub(crate) const HEADER_CONTINUATION: &str = "x-ms-continuation";
pub(crate) const HEADER_IS_QUERY: &str = "x-ms-documentdb-isquery";
pub(crate) const HEADER_MAX_ITEM_COUNT: &str = "x-ms-max-item-count";
pub(crate) const HEADER_RETRY_AFTER_MS: &str = "x-ms-retry-after-ms";
pub(crate) const HEADER_SLUG: &str = "slug";

const MIME_JSON: &str = "application/json";
const MIME_SQL: &str = "application/sql";

/// One page request of a query.
#[derive(Debug, Clone, Default)]
pub(crate) struct QueryPage {
    pub(crate) query: String,
    pub(crate) page_size: i32,
    // empty for the first page
    pub(crate) continuation: String,
}

impl Handle {
    /// Build a signed request with the standard headers.
    ///
    /// The date is taken from the clock here and signed right away, so every
    /// call yields a fresh timestamp and signature.
    pub(crate) fn build_request(
        &self,
        method: Method,
        resource_type: &str,
        resource_id: &str,
        url: Url,
        timeout: Duration,
    ) -> Result<SignedRequest, DocumentDBError> {
        let date = signer::format_http_date(Utc::now());
        let sig = signer::sign(
            method.as_str(),
            resource_type,
            resource_id,
            &date,
            &self.inner.master_key,
        )?;
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(MIME_JSON));
        headers.insert(USER_AGENT, HeaderValue::from_str(user_agent())?);
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&signer::authorization_header(&sig))?,
        );
        headers.insert(HEADER_DATE, HeaderValue::from_str(&date)?);
        headers.insert(
            HEADER_VERSION,
            HeaderValue::from_str(&self.inner.api_version)?,
        );
        trace!("built {} {} ({} {:?})", method, url, resource_type, resource_id);
        Ok(SignedRequest {
            method,
            url,
            headers,
            body: Bytes::new(),
            timeout,
        })
    }

    /// Build a signed query request: a POST carrying the query text, with
    /// the continuation header set only when resuming.
    pub(crate) fn build_query_request(
        &self,
        page: &QueryPage,
        resource_type: &str,
        resource_id: &str,
        url: Url,
        timeout: Duration,
    ) -> Result<SignedRequest, DocumentDBError> {
        let mut req = self.build_request(Method::POST, resource_type, resource_id, url, timeout)?;
        req.headers
            .insert(CONTENT_TYPE, HeaderValue::from_static(MIME_SQL));
        req.headers
            .insert(HEADER_IS_QUERY, HeaderValue::from_static("true"));
        req.headers
            .insert(HEADER_MAX_ITEM_COUNT, HeaderValue::from(page.page_size));
        if !page.continuation.is_empty() {
            req.headers.insert(
                HEADER_CONTINUATION,
                HeaderValue::from_str(&page.continuation)?,
            );
        }
        req.body = Bytes::from(page.query.clone());
        Ok(req)
    }
}

/// Attach a create/replace body and its content headers.
pub(crate) fn set_body(req: &mut SignedRequest, body: &RequestBody) -> Result<(), DocumentDBError> {
    match body {
        RequestBody::Json(v) => {
            req.headers
                .insert(CONTENT_TYPE, HeaderValue::from_static(MIME_JSON));
            req.body = Bytes::from(serde_json::to_vec(v)?);
        }
        RequestBody::Raw {
            content_type,
            slug,
            data,
        } => {
            req.headers
                .insert(CONTENT_TYPE, HeaderValue::from_str(content_type)?);
            req.headers.insert(HEADER_SLUG, HeaderValue::from_str(slug)?);
            req.body = data.clone();
        }
    }
    Ok(())
}
