//
// Copyright (c) 2024, 2025 Oracle and/or its affiliates. All rights reserved.
//
// Licensed under the Universal Permissive License v 1.0 as shown at
//  https://oss.oracle.com/licenses/upl/
//
use crate::error::{DocumentDBError, DocumentDBErrorCode};
use base64::prelude::{Engine as _, BASE64_STANDARD};

/// Length in bytes of a decoded account master key.
pub const MASTER_KEY_LEN: usize = 64;

/// The decoded shared secret used to sign every request.
///
/// A `MasterKey` can only be created from a well-formed base64 key, so a
/// [`Handle`](crate::Handle) holding one never fails to sign. The key bytes
/// are never printed: the [`Debug`] output is redacted.
#[derive(Clone, PartialEq, Eq)]
pub struct MasterKey {
    bytes: Vec<u8>,
}

impl MasterKey {
    /// Decode a base64 master key, as shown in the account's key settings.
    pub fn from_base64(key: &str) -> Result<MasterKey, DocumentDBError> {
        let bytes = BASE64_STANDARD.decode(key.trim()).map_err(|e| {
            DocumentDBError::new(
                DocumentDBErrorCode::InvalidKey,
                &format!("master key is not valid base64: {}", e),
            )
        })?;
        if bytes.len() != MASTER_KEY_LEN {
            return Err(DocumentDBError::new(
                DocumentDBErrorCode::InvalidKey,
                &format!(
                    "master key must decode to {} bytes, got {}",
                    MASTER_KEY_LEN,
                    bytes.len()
                ),
            ));
        }
        Ok(MasterKey { bytes })
    }

    pub(crate) fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl std::fmt::Debug for MasterKey {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "MasterKey(<redacted>)")
    }
}
