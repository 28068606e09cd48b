// SPDX-FileCopyrightText: © 2024 Claudio Cicconetti <c.cicconetti@iit.cnr.it>
// SPDX-License-Identifier: MIT

use fnless_api::descriptor_store::DescriptorStore;
use fnless_api::function_descriptor::FunctionDescriptor;

use crate::error::UpdateError;

/// Submit the next version of a descriptor as a single patch.
///
/// There is no retry: a conflict, an authorization failure or a transport
/// error is returned as is, and the store keeps the previous descriptor.
pub async fn submit(store: &mut dyn DescriptorStore, next: &FunctionDescriptor) -> Result<(), UpdateError> {
    log::info!("Redeploying function...");
    log::debug!("next descriptor: {}", next);
    store.patch(next).await?;
    log::info!("Function {} submitted for deployment", next.name);
    Ok(())
}
