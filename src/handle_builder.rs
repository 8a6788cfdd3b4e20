//
// Copyright (c) 2024, 2025 Oracle and/or its affiliates. All rights reserved.
//
// Licensed under the Universal Permissive License v 1.0 as shown at
//  https://oss.oracle.com/licenses/upl/
//
//! Builder for creating a [`DocumentDB Handle`](crate::Handle)
//!

use std::default::Default;
use std::env;
use std::path::Path;
use std::result::Result;
use std::sync::Arc;
use std::time::Duration;

use crate::auth_common::config_file::{AccountConfig, DEFAULT_CONFIG_FILE_PATH};
use crate::auth_common::file_utils::{expand_user_home, file_to_string};
use crate::auth_common::master_key::MasterKey;
use crate::error::{ia_err, DocumentDBError};
use crate::handle::{Handle, DEFAULT_API_VERSION, DEFAULT_MAX_ATTEMPTS};
use crate::transport::HttpSend;
use reqwest::Certificate;
use reqwest::Client;
use url::Url;

/// Builder used to set all the parameters to create a [`DocumentDB Handle`](crate::Handle).
///
/// An endpoint and a master key are required; everything else has a default.
#[derive(Debug, Clone)]
pub struct HandleBuilder {
    pub(crate) endpoint: Option<Url>,
    pub(crate) master_key: Option<MasterKey>,
    pub(crate) timeout: Option<Duration>,
    pub(crate) api_version: String,
    pub(crate) max_attempts: u32,
    pub(crate) add_cert: Option<Certificate>,
    pub(crate) client: Option<Client>,
    pub(crate) transport: Option<Arc<dyn HttpSend>>,
    pub(crate) accept_invalid_certs: bool,
    // For error messaging
    pub(crate) from_environment: bool,
}

impl Default for HandleBuilder {
    fn default() -> Self {
        HandleBuilder {
            endpoint: None,
            master_key: None,
            timeout: None,
            api_version: DEFAULT_API_VERSION.to_string(),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            add_cert: None,
            client: None,
            transport: None,
            accept_invalid_certs: false,
            from_environment: false,
        }
    }
}

impl HandleBuilder {
    /// Create a new HandleBuilder struct.
    ///
    /// The default HandleBuilder has no endpoint or key. Consider calling
    /// [`from_environment()`](HandleBuilder::from_environment()) to collect them from
    /// the local environment.
    pub fn new() -> Self {
        HandleBuilder {
            ..Default::default()
        }
    }
    /// Build a new [`Handle`].
    ///
    /// Note: if the [`HandleBuilder`] contains a [`transport()`](HandleBuilder::transport())
    /// or an existing [`reqwest::Client`], that is used. Otherwise a new
    /// [`reqwest::Client`] is created for the handle's own use.
    pub fn build(self) -> Result<Handle, DocumentDBError> {
        Handle::new(&self)
    }
    /// Gather configuration settings from the current environment.
    ///
    /// This method will scan the process [`standard environment`](std::env::Vars) to collect and
    /// set the configuration parameters. The values can be overridden in code if this method is
    /// called first and other methods are called afterwards, for example:
    ///```no_run
    /// # use documentdb_rust_sdk::Handle;
    /// # use std::time::Duration;
    /// # fn run() -> Result<(), Box<dyn std::error::Error>> {
    ///   let handle = Handle::builder()
    ///       .from_environment()?
    ///       .timeout(Duration::from_secs(10))?
    ///       .build()?;
    /// # Ok(())
    /// # }
    ///```
    /// The following environment variables are used:
    ///
    /// | variable | description |
    /// | -------- | ----------- |
    /// | `DOCUMENTDB_CONFIG_FILE` | Path to an account config file (see [`HandleBuilder::auth_from_file()`]). Read first, so the variables below override it. |
    /// | `DOCUMENTDB_PROFILE` | Profile to use from the config file. Defaults to `DEFAULT`. |
    /// | `DOCUMENTDB_ENDPOINT` | The account endpoint URL. See [`HandleBuilder::endpoint()`]. |
    /// | `DOCUMENTDB_MASTER_KEY` | The base64 master key. See [`HandleBuilder::master_key()`]. |
    /// | `DOCUMENTDB_CA_CERT` | Path to an extra root certificate in `pem` format (see [`HandleBuilder::add_cert_from_pemfile()`]). |
    /// | `DOCUMENTDB_ACCEPT_INVALID_CERTS` | If this is set to `1` or `true`, do not check certificates (see [`HandleBuilder::danger_accept_invalid_certs()`]). |
    ///
    /// If none of `DOCUMENTDB_CONFIG_FILE`, `DOCUMENTDB_ENDPOINT` and
    /// `DOCUMENTDB_MASTER_KEY` is set, the file `~/.documentdb/config` is read if it exists.
    pub fn from_environment(mut self) -> Result<Self, DocumentDBError> {
        self.from_environment = true;
        let profile = env::var("DOCUMENTDB_PROFILE").unwrap_or_else(|_| "DEFAULT".to_string());
        let file = env::var("DOCUMENTDB_CONFIG_FILE").ok();
        let endpoint = env::var("DOCUMENTDB_ENDPOINT").ok();
        let key = env::var("DOCUMENTDB_MASTER_KEY").ok();
        if let Some(fname) = &file {
            self = self.auth_from_file_with_profile(fname, &profile)?;
        } else if endpoint.is_none() && key.is_none() {
            let default_path = expand_user_home(DEFAULT_CONFIG_FILE_PATH)?;
            if Path::new(&default_path).exists() {
                self = self.auth_from_file_with_profile(&default_path, &profile)?;
            }
        }
        if let Some(val) = endpoint {
            self = self.endpoint(&val)?;
        }
        if let Some(val) = key {
            self = self.master_key(&val)?;
        }
        if let Ok(val) = env::var("DOCUMENTDB_CA_CERT") {
            self = self.add_cert_from_pemfile(&val)?;
        }
        if let Ok(val) = env::var("DOCUMENTDB_ACCEPT_INVALID_CERTS") {
            let lv = val.to_lowercase();
            if lv == "true" || lv == "1" {
                self = self.danger_accept_invalid_certs(true)?;
            }
        }
        Ok(self)
    }
    /// Set the account endpoint, for example `https://myaccount.documents.azure.com:443/`.
    ///
    /// Only `http` and `https` URLs are accepted. Resource paths are resolved
    /// relative to the endpoint's path.
    pub fn endpoint(mut self, endpoint: &str) -> Result<Self, DocumentDBError> {
        let mut url = Url::parse(endpoint.trim())?;
        if url.scheme() != "https" && url.scheme() != "http" {
            return ia_err!("invalid endpoint scheme '{}': use http or https", url.scheme());
        }
        if !url.path().ends_with('/') {
            let p = format!("{}/", url.path());
            url.set_path(&p);
        }
        self.endpoint = Some(url);
        Ok(self)
    }
    /// Set the account master key, in its base64 form.
    ///
    /// The key is decoded and checked here, so a malformed key is reported
    /// before any request is attempted.
    pub fn master_key(mut self, key: &str) -> Result<Self, DocumentDBError> {
        self.master_key = Some(MasterKey::from_base64(key)?);
        Ok(self)
    }
    /// Read the endpoint and master key from the `DEFAULT` profile of a config file.
    ///
    /// The file uses INI syntax:
    ///```ini
    /// [DEFAULT]
    /// endpoint=https://myaccount.documents.azure.com:443/
    /// master_key=<base64 master key>
    ///```
    pub fn auth_from_file(self, config_file: &str) -> Result<Self, DocumentDBError> {
        self.auth_from_file_with_profile(config_file, "DEFAULT")
    }
    /// Read the endpoint and master key from a named profile of a config file.
    pub fn auth_from_file_with_profile(
        self,
        config_file: &str,
        profile: &str,
    ) -> Result<Self, DocumentDBError> {
        let c = AccountConfig::new_from_file(config_file, profile)?;
        self.endpoint(&c.endpoint)?.master_key(&c.master_key)
    }
    /// Set the api version sent in the `x-ms-version` header.
    ///
    /// The default is `2017-02-22`.
    pub fn api_version(mut self, version: &str) -> Result<Self, DocumentDBError> {
        if version.is_empty() {
            return ia_err!("api version must not be empty");
        }
        self.api_version = version.to_string();
        Ok(self)
    }
    /// Set the maximum number of attempts for an operation the server throttles
    /// (http 429). Between attempts the handle waits for the time the server
    /// asks for in `x-ms-retry-after-ms`.
    ///
    /// The default is 20. A value of 1 disables retries.
    pub fn max_attempts(mut self, attempts: u32) -> Result<Self, DocumentDBError> {
        if attempts == 0 {
            return ia_err!("max_attempts must be at least 1");
        }
        self.max_attempts = attempts;
        Ok(self)
    }
    /// Add a root certificate to use for https connections from a file.
    ///
    /// The file must contain an x509 certificate in `PEM` file format.
    pub fn add_cert_from_pemfile(self, pemfile: &str) -> Result<Self, DocumentDBError> {
        let buf = file_to_string(pemfile)?.into_bytes();
        match reqwest::Certificate::from_pem(&buf) {
            Ok(cert) => self.add_cert(cert),
            Err(e) => ia_err!("error getting certificate from pemfile {}: {}", pemfile, e),
        }
    }

    /// Add a root certificate to use for https connections, such as the one
    /// of a local emulator.
    pub fn add_cert(mut self, cert: Certificate) -> Result<Self, DocumentDBError> {
        self.add_cert = Some(cert);
        Ok(self)
    }
    // see https://docs.rs/reqwest/latest/reqwest/struct.ClientBuilder.html#method.danger_accept_invalid_certs
    /// Allow https connection without validating certificates.
    ///
    /// **Warning:** This is only recommended for local testing purposes. Its use is insecure. See [`reqwest::ClientBuilder::danger_accept_invalid_certs()`] for details.
    ///
    pub fn danger_accept_invalid_certs(
        mut self,
        accept_invalid_certs: bool,
    ) -> Result<Self, DocumentDBError> {
        self.accept_invalid_certs = accept_invalid_certs;
        Ok(self)
    }
    /// Specify a [`reqwest::Client`] to use for all http/s connections.
    ///
    /// By default, the [`Handle`](crate::Handle) creates an internal [`reqwest::Client`] to use for
    /// all communications. If your application already has a reqwest Client, you can pass that
    /// into the HandleBuilder to avoid creating multiple connection pools.
    pub fn reqwest_client(mut self, client: &Client) -> Result<Self, DocumentDBError> {
        self.client = Some(client.clone());
        Ok(self)
    }
    /// Specify a custom [`HttpSend`] transport. This takes precedence over
    /// [`reqwest_client()`](HandleBuilder::reqwest_client()).
    pub fn transport(mut self, transport: impl HttpSend) -> Result<Self, DocumentDBError> {
        self.transport = Some(Arc::new(transport));
        Ok(self)
    }
    /// Specify the timeout used for operations.
    ///
    /// This is used for both connection and request timeouts.
    /// Note that the request timeout can be set on a per-request basis.
    ///
    /// The default timeout is 30 seconds.
    pub fn timeout(mut self, timeout: Duration) -> Result<Self, DocumentDBError> {
        if timeout.is_zero() {
            return ia_err!("timeout must be greater than zero");
        }
        self.timeout = Some(timeout);
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DocumentDBErrorCode;
    use std::io::Write;

    const KEY: &str =
        "C2y6yDjf5/R+ob0N8A7Cgv30VRDJIWEHLM+4QDU5DE2nQ9nDuVTqobD4b8mGGyPMbIZnqyMsEcaGQy67XIw/Jw==";

    #[test]
    fn endpoint_normalized() {
        let b = HandleBuilder::new()
            .endpoint("https://acct.documents.azure.com:443")
            .unwrap();
        assert_eq!(
            b.endpoint.unwrap().as_str(),
            "https://acct.documents.azure.com/"
        );
        assert!(HandleBuilder::new().endpoint("ftp://x").is_err());
        assert!(HandleBuilder::new().endpoint("not a url").is_err());
    }

    #[test]
    fn bad_key_fails_at_configuration() {
        let e = HandleBuilder::new().master_key("%%%").unwrap_err();
        assert_eq!(e.code, DocumentDBErrorCode::InvalidKey);
    }

    #[test]
    fn build_requires_endpoint_and_key() {
        let e = HandleBuilder::new().master_key(KEY).unwrap().build().unwrap_err();
        assert_eq!(e.code, DocumentDBErrorCode::IllegalArgument);
        let e = HandleBuilder::new()
            .endpoint("https://localhost:8081/")
            .unwrap()
            .build()
            .unwrap_err();
        assert!(e.message.contains("master_key"));
        let h = HandleBuilder::new()
            .endpoint("https://localhost:8081/")
            .unwrap()
            .master_key(KEY)
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(h.inner.api_version, DEFAULT_API_VERSION);
        assert_eq!(h.inner.max_attempts, DEFAULT_MAX_ATTEMPTS);
    }

    #[test]
    fn limits_validated() {
        assert!(HandleBuilder::new().max_attempts(0).is_err());
        assert!(HandleBuilder::new().timeout(Duration::ZERO).is_err());
        assert!(HandleBuilder::new().api_version("").is_err());
    }

    #[test]
    fn from_config_file() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        write!(
            f,
            "[DEFAULT]\nendpoint=https://localhost:8081\nmaster_key={}\n",
            KEY
        )
        .unwrap();
        let b = HandleBuilder::new()
            .auth_from_file(f.path().to_str().unwrap())
            .unwrap();
        assert_eq!(b.endpoint.unwrap().as_str(), "https://localhost:8081/");
        assert!(b.master_key.is_some());
    }
}
