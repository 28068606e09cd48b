// SPDX-FileCopyrightText: © 2024 Claudio Cicconetti <c.cicconetti@iit.cnr.it>
// SPDX-License-Identifier: MIT

use fnless_api::descriptor_store::{DescriptorStore, StoreError};
use fnless_api::function_descriptor::FunctionDescriptor;
use fnless_api::runtime_catalog::RuntimeCatalog;

use crate::error::UpdateError;
use crate::override_set::{OverrideSet, RawOverrides};

/// Namespace used when neither the user nor the configuration gives one.
pub const DEFAULT_NAMESPACE: &str = "default";

/// Namespace where the function is looked up: the one given by the user,
/// else the configured default, else [`DEFAULT_NAMESPACE`].
pub fn resolve_namespace(requested: &Option<String>, configured: &str) -> String {
    match requested.as_deref().filter(|x| !x.is_empty()) {
        Some(namespace) => namespace.to_string(),
        None if !configured.is_empty() => configured.to_string(),
        None => DEFAULT_NAMESPACE.to_string(),
    }
}

/// Update a deployed function with the changes requested.
///
/// The overrides are validated first, then the previous descriptor is
/// fetched, reconciled and submitted back as a single patch. Nothing is
/// written to the store if any step before the patch fails.
/// Return the descriptor submitted.
pub async fn update_function(
    store: &mut dyn DescriptorStore,
    catalog: &dyn RuntimeCatalog,
    default_namespace: &str,
    function_name: &str,
    raw: &RawOverrides,
) -> Result<FunctionDescriptor, UpdateError> {
    let namespace = resolve_namespace(&raw.namespace, default_namespace);
    log::debug!("updating function {} in namespace {}", function_name, namespace);

    let overrides = OverrideSet::build(raw, catalog)?;
    if overrides.is_empty() {
        log::warn!("no change requested for function {}", function_name);
    }

    let previous = store.get(function_name, &namespace).await.map_err(|err| match err {
        StoreError::NotFound { name, namespace } => UpdateError::FunctionNotFound { name, namespace },
        err => UpdateError::Store(err),
    })?;

    let next = crate::reconciler::reconcile(&previous, &overrides);
    crate::submitter::submit(store, &next).await?;
    Ok(next)
}
