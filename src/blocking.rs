//
// Copyright (c) 2024, 2025 Oracle and/or its affiliates. All rights reserved.
//
// Licensed under the Universal Permissive License v 1.0 as shown at
//  https://oss.oracle.com/licenses/upl/
//
//! Blocking access for applications that do not run an async runtime.
//!
//! A [`BlockingHandle`] owns a single-threaded tokio runtime and drives the
//! ordinary async requests on it. It must not be used from inside another
//! tokio runtime.
//! ```no_run
//! use documentdb_rust_sdk::blocking::BlockingHandle;
//! use documentdb_rust_sdk::{Account, Handle, ListRequest, QueryRequest};
//! use documentdb_rust_sdk::types::Database;
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let bh = BlockingHandle::new(Handle::builder().from_environment()?.build()?)?;
//! let dbs = bh.run(ListRequest::<Database>::new(&Account).execute(bh.handle()))?;
//! println!("{} database(s)", dbs.count());
//! for db in bh.query(&QueryRequest::<Database>::new(&Account, "SELECT * FROM root"))? {
//!     println!("{}", db?.id());
//! }
//! # Ok(())
//! # }
//! ```

use crate::error::{DocumentDBError, DocumentDBErrorCode};
use crate::handle::Handle;
use crate::query_request::{QueryIterator, QueryRequest};
use crate::resource::Resource;
use std::future::Future;
use tokio::runtime::Runtime;

/// A [`Handle`] paired with its own runtime.
#[derive(Debug)]
pub struct BlockingHandle {
    handle: Handle,
    runtime: Runtime,
}

impl BlockingHandle {
    pub fn new(handle: Handle) -> Result<BlockingHandle, DocumentDBError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| {
                DocumentDBError::new(
                    DocumentDBErrorCode::TransportError,
                    &format!("cannot start runtime: {}", e),
                )
            })?;
        Ok(BlockingHandle { handle, runtime })
    }

    /// The wrapped async handle, for building requests.
    pub fn handle(&self) -> &Handle {
        &self.handle
    }

    /// Run one request future to completion.
    pub fn run<F: Future>(&self, f: F) -> F::Output {
        self.runtime.block_on(f)
    }

    /// Execute a query, returning a std [`Iterator`] over its results.
    pub fn query<R: Resource>(
        &self,
        req: &QueryRequest<R>,
    ) -> Result<BlockingQueryIterator<'_, R>, DocumentDBError> {
        let inner = self.runtime.block_on(req.execute(&self.handle))?;
        Ok(BlockingQueryIterator {
            runtime: &self.runtime,
            inner,
            done: false,
        })
    }
}

/// Iterator over query results that fetches pages on the owning
/// [`BlockingHandle`]'s runtime. After an error it yields nothing more.
#[derive(Debug)]
pub struct BlockingQueryIterator<'a, R: Resource> {
    runtime: &'a Runtime,
    inner: QueryIterator<R>,
    done: bool,
}

impl<R: Resource> Iterator for BlockingQueryIterator<'_, R> {
    type Item = Result<R, DocumentDBError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.runtime.block_on(self.inner.has_more()) {
            Ok(true) => Some(self.inner.next()),
            Ok(false) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}
