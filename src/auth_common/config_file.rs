//
// Copyright (c) 2024, 2025 Oracle and/or its affiliates. All rights reserved.
//
// Licensed under the Universal Permissive License v 1.0 as shown at
//  https://oss.oracle.com/licenses/upl/
//
use crate::auth_common::file_utils::expand_user_home;
use crate::error::{ia_err, DocumentDBError};
use ini::Ini;

pub(crate) const DEFAULT_CONFIG_FILE_PATH: &str = "~/.documentdb/config";
const ENDPOINT: &str = "endpoint";
const MASTER_KEY: &str = "master_key";

/// Account settings read from one profile of an INI-style config file:
/// ```ini
/// [DEFAULT]
/// endpoint=https://myaccount.documents.azure.com:443/
/// master_key=<base64 master key>
/// ```
#[derive(Debug, Clone)]
pub(crate) struct AccountConfig {
    pub(crate) endpoint: String,
    pub(crate) master_key: String,
}

fn get_section_variable(
    file: &str,
    props: &ini::Properties,
    var: &str,
) -> Result<String, DocumentDBError> {
    match props.get(var) {
        Some(v) => Ok(v.trim().to_string()),
        None => ia_err!("error reading config file '{}': missing field '{}'", file, var),
    }
}

impl AccountConfig {
    pub(crate) fn new_from_file(
        config_file_path: &str,
        profile_name: &str,
    ) -> Result<Self, DocumentDBError> {
        tracing::debug!(
            "Reading account config from file {} and profile {}",
            config_file_path,
            profile_name
        );
        let file_path = expand_user_home(config_file_path)?;
        let config = match Ini::load_from_file(&file_path) {
            Ok(c) => c,
            Err(e) => {
                return ia_err!("error reading config file '{}': {}", file_path, e);
            }
        };
        let profile_data = match config.section(Some(profile_name)) {
            Some(p) => p,
            None => {
                return ia_err!(
                    "error reading config file '{}': missing profile '{}'",
                    file_path,
                    profile_name
                );
            }
        };
        Ok(AccountConfig {
            endpoint: get_section_variable(&file_path, profile_data, ENDPOINT)?,
            master_key: get_section_variable(&file_path, profile_data, MASTER_KEY)?,
        })
    }
}
