// SPDX-FileCopyrightText: © 2024 Claudio Cicconetti <c.cicconetti@iit.cnr.it>
// SPDX-License-Identifier: MIT

use fnless_api::function_descriptor::FunctionDescriptor;

use crate::override_set::OverrideSet;

/// Produce the next version of a function descriptor.
///
/// Each field is taken from the overrides, if present, or else kept from
/// the previous descriptor. Labels, secrets and environment variables are
/// replaced as a whole by a non-empty override, never merged. The name,
/// namespace and resource version always come from `previous`.
pub fn reconcile(previous: &FunctionDescriptor, overrides: &OverrideSet) -> FunctionDescriptor {
    let mut next = previous.clone();

    if let Some(runtime) = &overrides.runtime {
        next.runtime = runtime.clone();
    }
    if let Some(handler) = &overrides.handler {
        next.handler = handler.clone();
    }
    if let Some(code) = &overrides.code {
        next.function = Some(code.content.clone());
        next.function_content_type = code.content_type;
        next.checksum = Some(code.checksum.clone());
    }
    if let Some(deps) = &overrides.deps {
        next.deps = Some(deps.clone());
    }
    if let Some(runtime_image) = &overrides.runtime_image {
        next.runtime_image = Some(runtime_image.clone());
    }
    if let Some(cpu) = &overrides.cpu {
        next.resources.cpu = Some(cpu.clone());
    }
    if let Some(memory) = &overrides.memory {
        next.resources.memory = Some(memory.clone());
    }
    if let Some(timeout) = &overrides.timeout {
        next.timeout = timeout.clone();
    }
    if let Some(headless) = overrides.headless {
        next.service.headless = headless;
    }
    if let Some(port) = overrides.port {
        next.service.port = port;
    }

    if !overrides.labels.is_empty() {
        next.labels = overrides.labels.iter().cloned().collect();
    }
    if !overrides.secrets.is_empty() {
        next.secrets = overrides.secrets.iter().cloned().collect();
    }
    if !overrides.env.is_empty() {
        next.env = overrides.env.clone();
    }

    next
}
