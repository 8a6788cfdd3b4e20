//
// Copyright (c) 2024, 2025 Oracle and/or its affiliates. All rights reserved.
//
// Licensed under the Universal Permissive License v 1.0 as shown at
//  https://oss.oracle.com/licenses/upl/
//
use crate::error::DocumentDBError;
use crate::handle::Handle;
use crate::transport::{HttpResponse, HttpSend, SignedRequest};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

pub(crate) const TEST_ENDPOINT: &str = "https://acct.documents.azure.com:443/";
pub(crate) const TEST_KEY: &str =
    "C2y6yDjf5/R+ob0N8A7Cgv30VRDJIWEHLM+4QDU5DE2nQ9nDuVTqobD4b8mGGyPMbIZnqyMsEcaGQy67XIw/Jw==";

#[derive(Debug, Default)]
struct MockState {
    script: Mutex<VecDeque<HttpResponse>>,
    // returned once the script runs dry
    fallback: Mutex<Option<HttpResponse>>,
    sent: Mutex<Vec<SignedRequest>>,
}

/// Replays canned responses and records every request it is handed.
/// Clones share the same script and log.
#[derive(Debug, Clone, Default)]
pub(crate) struct MockTransport {
    state: Arc<MockState>,
}

impl MockTransport {
    pub(crate) fn new() -> MockTransport {
        MockTransport::default()
    }

    pub(crate) fn respond(self, resp: HttpResponse) -> Self {
        self.state.script.lock().unwrap().push_back(resp);
        self
    }

    pub(crate) fn respond_always(self, resp: HttpResponse) -> Self {
        *self.state.fallback.lock().unwrap() = Some(resp);
        self
    }

    pub(crate) fn sent(&self) -> Vec<SignedRequest> {
        self.state.sent.lock().unwrap().clone()
    }

    pub(crate) fn send_count(&self) -> usize {
        self.state.sent.lock().unwrap().len()
    }

    pub(crate) fn handle(&self) -> Result<Handle, DocumentDBError> {
        Handle::builder()
            .endpoint(TEST_ENDPOINT)?
            .master_key(TEST_KEY)?
            .transport(self.clone())?
            .build()
    }
}

#[async_trait]
impl HttpSend for MockTransport {
    async fn http_send(&self, req: SignedRequest) -> Result<HttpResponse, DocumentDBError> {
        self.state.sent.lock().unwrap().push(req);
        if let Some(r) = self.state.script.lock().unwrap().pop_front() {
            return Ok(r);
        }
        match &*self.state.fallback.lock().unwrap() {
            Some(r) => Ok(r.clone()),
            None => Ok(HttpResponse::new(
                500,
                r#"{"code":"InternalServerError","message":"mock script exhausted"}"#,
            )),
        }
    }
}

/// A 429 response asking for a retry after `ms` milliseconds.
pub(crate) fn throttled(ms: u64) -> HttpResponse {
    HttpResponse::new(
        429,
        r#"{"code":"TooManyRequests","message":"Request rate is large"}"#,
    )
    .with_header("x-ms-retry-after-ms", &ms.to_string())
}
