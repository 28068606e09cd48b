// SPDX-FileCopyrightText: © 2023 Claudio Cicconetti <c.cicconetti@iit.cnr.it>
// SPDX-License-Identifier: MIT

use fnless_api::descriptor_store::StoreError;

/// Reasons for a function update to be aborted.
///
/// Input errors are raised before the store is contacted, hence the stored
/// descriptor is never modified when one of them is returned.
#[derive(Debug, thiserror::Error)]
pub enum UpdateError {
    #[error("Invalid port number {0} specified")]
    InvalidPort(i64),
    #[error("Invalid runtime: {runtime}. Supported runtimes are: {}", .supported.join(", "))]
    InvalidRuntime { runtime: String, supported: Vec<String> },
    #[error("Invalid {field} quantity: {value}")]
    InvalidQuantity { field: &'static str, value: String },
    #[error("Dependency file {} is not valid UTF-8 text", .path.display())]
    InvalidDependencies { path: std::path::PathBuf },
    #[error("Unable to read file {}: {source}", .path.display())]
    ReadFile { path: std::path::PathBuf, source: std::io::Error },
    #[error("function {name} not found in namespace {namespace}")]
    FunctionNotFound { name: String, namespace: String },
    #[error(transparent)]
    Store(#[from] StoreError),
}
