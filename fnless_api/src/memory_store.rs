// SPDX-FileCopyrightText: © 2024 Claudio Cicconetti <c.cicconetti@iit.cnr.it>
// SPDX-License-Identifier: MIT

use crate::descriptor_store::{DescriptorStore, StoreError};
use crate::function_descriptor::FunctionDescriptor;

/// A descriptor store kept in memory.
///
/// Every successful patch bumps the resource version of the descriptor and
/// a patch carrying a different version than the stored one is rejected
/// with [`StoreError::Conflict`].
#[derive(Default)]
pub struct MemoryDescriptorStore {
    descriptors: std::collections::HashMap<(String, String), FunctionDescriptor>,
    patches: usize,
    rejection: Option<StoreError>,
}

impl MemoryDescriptorStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a descriptor, bypassing the version check.
    pub fn insert(&mut self, mut descriptor: FunctionDescriptor) {
        if descriptor.resource_version.is_none() {
            descriptor.resource_version = Some(String::from("1"));
        }
        self.descriptors.insert(descriptor.key(), descriptor);
    }

    /// Descriptor currently stored with the given key.
    pub fn stored(&self, name: &str, namespace: &str) -> Option<&FunctionDescriptor> {
        self.descriptors.get(&(name.to_string(), namespace.to_string()))
    }

    /// Number of patches received, including the rejected ones.
    pub fn patch_count(&self) -> usize {
        self.patches
    }

    /// Reject all the following patches with the given error.
    pub fn reject_patches_with(&mut self, err: StoreError) {
        self.rejection = Some(err);
    }
}

#[async_trait::async_trait]
impl DescriptorStore for MemoryDescriptorStore {
    async fn get(&mut self, name: &str, namespace: &str) -> Result<FunctionDescriptor, StoreError> {
        match self.stored(name, namespace) {
            Some(descriptor) => Ok(descriptor.clone()),
            None => Err(StoreError::NotFound {
                name: name.to_string(),
                namespace: namespace.to_string(),
            }),
        }
    }

    async fn patch(&mut self, descriptor: &FunctionDescriptor) -> Result<(), StoreError> {
        self.patches += 1;
        if let Some(err) = &self.rejection {
            return Err(err.clone());
        }
        let key = descriptor.key();
        let stored = match self.descriptors.get(&key) {
            Some(stored) => stored,
            None => {
                return Err(StoreError::NotFound {
                    name: key.0,
                    namespace: key.1,
                })
            }
        };
        if stored.resource_version != descriptor.resource_version {
            return Err(StoreError::Conflict {
                name: key.0,
                namespace: key.1,
                detail: format!(
                    "stored version {} differs from patched version {}",
                    stored.resource_version.as_deref().unwrap_or("none"),
                    descriptor.resource_version.as_deref().unwrap_or("none")
                ),
            });
        }
        let next_version = stored
            .resource_version
            .as_deref()
            .and_then(|x| x.parse::<u64>().ok())
            .unwrap_or_default()
            + 1;
        let mut next = descriptor.clone();
        next.resource_version = Some(next_version.to_string());
        log::debug!("patched {}/{} to version {}", key.1, key.0, next_version);
        self.descriptors.insert(key, next);
        Ok(())
    }
}
