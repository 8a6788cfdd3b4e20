//
// Copyright (c) 2024, 2025 Oracle and/or its affiliates. All rights reserved.
//
// Licensed under the Universal Permissive License v 1.0 as shown at
//  https://oss.oracle.com/licenses/upl/
//
use crate::error::{ia_err, DocumentDBError};
use dirs;
use std::path::PathBuf;

/// Expand a leading `~/` (or `~\`) to the current user's home directory.
///
/// Paths without a leading `~` are returned unchanged.
pub(crate) fn expand_user_home(file_path: &str) -> Result<String, DocumentDBError> {
    if file_path.starts_with("~/") || file_path.starts_with("~\\") {
        if let Some(home_dir) = dirs::home_dir() {
            let full_path = home_dir.join(PathBuf::from(correct_path(&file_path[2..])));
            return Ok(format!("{}", full_path.display()));
        }
        return ia_err!("cannot expand '{}': no home directory found", file_path);
    }
    Ok(file_path.to_string())
}

/// Read an entire file into a string, expanding `~` first.
pub(crate) fn file_to_string(file_path: &str) -> Result<String, DocumentDBError> {
    let path = expand_user_home(file_path)?;
    match std::fs::read_to_string(&path) {
        Ok(s) => Ok(s),
        Err(e) => ia_err!("error reading file '{}': {}", path, e),
    }
}

fn correct_path(file_path: &str) -> String {
    if cfg!(target_os = "windows") {
        file_path.replace('/', "\\")
    } else {
        file_path.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_path_unchanged() {
        assert_eq!(expand_user_home("/etc/hosts").unwrap(), "/etc/hosts");
        assert_eq!(expand_user_home("relative/x").unwrap(), "relative/x");
    }

    #[test]
    fn tilde_is_expanded() {
        if let Some(home) = dirs::home_dir() {
            let p = expand_user_home("~/docdb.ini").unwrap();
            assert!(p.starts_with(&format!("{}", home.display())));
            assert!(p.ends_with("docdb.ini"));
        }
    }

    #[test]
    fn missing_file_is_an_error() {
        let e = file_to_string("/definitely/not/here.ini").unwrap_err();
        assert!(e.message.contains("/definitely/not/here.ini"));
    }
}
