//
// Copyright (c) 2024, 2025 Oracle and/or its affiliates. All rights reserved.
//
// Licensed under the Universal Permissive License v 1.0 as shown at
//  https://oss.oracle.com/licenses/upl/
//
//! The http seam between the [`Handle`](crate::Handle) and the network.
//!
//! By default requests go out through a [`reqwest::Client`]. Any other
//! implementation of [`HttpSend`] can be plugged in with
//! [`HandleBuilder::transport()`](crate::HandleBuilder::transport()).

use crate::error::DocumentDBError;
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Method, StatusCode};
use std::fmt::Debug;
use std::time::Duration;
use url::Url;

/// A fully built and signed request, ready to be sent once.
#[derive(Debug, Clone)]
pub struct SignedRequest {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
    pub body: Bytes,
    pub timeout: Duration,
}

impl SignedRequest {
    /// Value of a request header as a string, if present and printable.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

/// The parts of an http response the SDK looks at.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<Bytes>) -> HttpResponse {
        HttpResponse {
            status: StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            headers: HeaderMap::new(),
            body: body.into(),
        }
    }

    /// Add a response header. Invalid header names or values are ignored.
    pub fn with_header(mut self, name: &str, value: &str) -> HttpResponse {
        if let (Ok(n), Ok(v)) = (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            self.headers.insert(n, v);
        }
        self
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

/// Sends one request and returns the response, whatever its status.
///
/// Implementations must not retry or interpret the status code: the
/// [`Handle`](crate::Handle) does that.
#[async_trait]
pub trait HttpSend: Debug + Send + Sync + 'static {
    async fn http_send(&self, req: SignedRequest) -> Result<HttpResponse, DocumentDBError>;
}

#[async_trait]
impl HttpSend for reqwest::Client {
    async fn http_send(&self, req: SignedRequest) -> Result<HttpResponse, DocumentDBError> {
        let resp = self
            .request(req.method, req.url)
            .headers(req.headers)
            .body(req.body)
            .timeout(req.timeout)
            .send()
            .await?;
        let status = resp.status();
        let headers = resp.headers().clone();
        let body = resp.bytes().await?;
        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_headers() {
        let r = HttpResponse::new(429, "")
            .with_header("x-ms-retry-after-ms", "10")
            .with_header("bad name", "x")
            .with_header("x-ms-continuation", "bad\nvalue");
        assert_eq!(r.header("x-ms-retry-after-ms"), Some("10"));
        assert_eq!(r.headers.len(), 1);
        assert_eq!(HttpResponse::new(1000, "").status, StatusCode::INTERNAL_SERVER_ERROR);
    }
}
