//
// Copyright (c) 2024, 2025 Oracle and/or its affiliates. All rights reserved.
//
// Licensed under the Universal Permissive License v 1.0 as shown at
//  https://oss.oracle.com/licenses/upl/
//
use crate::auth_common::master_key::MasterKey;
use crate::error::{DocumentDBError, DocumentDBErrorCode};
use base64::prelude::{Engine as _, BASE64_STANDARD};
use chrono::prelude::*;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use tracing::trace;

/// Format a time as an RFC1123 http date, e.g. `Thu, 27 Apr 2017 00:51:12 GMT`.
pub(crate) fn format_http_date(utc: DateTime<Utc>) -> String {
    utc.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

fn string_to_sign(verb: &str, resource_type: &str, resource_id: &str, date: &str) -> String {
    // The empty line before the final newline is an unused token slot.
    format!(
        "{}\n{}\n{}\n{}\n\n",
        verb, resource_type, resource_id, date
    )
    .to_lowercase()
}

/// Compute the base64 HMAC-SHA256 signature of a request.
///
/// The canonical text is lower-cased before hashing, so the letter case of
/// any input does not change the result.
pub(crate) fn sign(
    verb: &str,
    resource_type: &str,
    resource_id: &str,
    date: &str,
    key: &MasterKey,
) -> Result<String, DocumentDBError> {
    let text = string_to_sign(verb, resource_type, resource_id, date);
    trace!("string to sign: {:?}", text);
    let mut h = Hmac::<Sha256>::new_from_slice(key.as_bytes()).map_err(|e| {
        DocumentDBError::new(
            DocumentDBErrorCode::InvalidKey,
            &format!("cannot key HMAC: {}", e),
        )
    })?;
    h.update(text.as_bytes());
    Ok(BASE64_STANDARD.encode(h.finalize().into_bytes()))
}

/// Build the `Authorization` header value for a signature.
pub(crate) fn authorization_header(signature: &str) -> String {
    let encoded: String = url::form_urlencoded::byte_serialize(signature.as_bytes()).collect();
    format!("type=master&ver=1.0&sig={}", encoded)
}
