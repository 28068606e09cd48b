// SPDX-FileCopyrightText: © 2023 Technical University of Munich, Chair of Connected Mobility
// SPDX-FileCopyrightText: © 2023 Claudio Cicconetti <c.cicconetti@iit.cnr.it>
// SPDX-License-Identifier: MIT

use crate::function_descriptor::FunctionDescriptor;

/// Failures reported by a descriptor store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// No descriptor is stored with the given key.
    #[error("function {name} not found in namespace {namespace}")]
    NotFound { name: String, namespace: String },
    /// The stored descriptor changed since it was fetched.
    #[error("conflict on function {name} in namespace {namespace}: {detail}")]
    Conflict { name: String, namespace: String, detail: String },
    /// The store refused the credentials used.
    #[error("not authorized: {0}")]
    Unauthorized(String),
    /// The store could not be reached or its reply could not be decoded.
    #[error("transport error: {0}")]
    Transport(String),
    /// Any other rejection from the store.
    #[error("store replied with status {status}: {message}")]
    Api { status: u16, message: String },
}

/// System of record holding function descriptors, keyed by (name, namespace).
#[async_trait::async_trait]
pub trait DescriptorStore: Sync + Send {
    /// Fetch a snapshot of the descriptor stored with the given key.
    async fn get(&mut self, name: &str, namespace: &str) -> Result<FunctionDescriptor, StoreError>;

    /// Replace the stored descriptor with the given one, keyed by its name
    /// and namespace. The write is atomic: on error, the previous
    /// descriptor is left untouched. A patch never creates a descriptor.
    async fn patch(&mut self, descriptor: &FunctionDescriptor) -> Result<(), StoreError>;
}
