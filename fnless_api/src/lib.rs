// SPDX-FileCopyrightText: © 2023 Technical University of Munich, Chair of Connected Mobility
// SPDX-FileCopyrightText: © 2023 Claudio Cicconetti <c.cicconetti@iit.cnr.it>
// SPDX-License-Identifier: MIT

pub mod descriptor_store;
pub mod function_descriptor;
pub mod http_store;
pub mod memory_store;
pub mod runtime_catalog;
pub mod util;
