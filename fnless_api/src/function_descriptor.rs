// SPDX-FileCopyrightText: © 2023 Technical University of Munich, Chair of Connected Mobility
// SPDX-FileCopyrightText: © 2023 Claudio Cicconetti <c.cicconetti@iit.cnr.it>
// SPDX-License-Identifier: MIT

/// Timeout assigned to functions that never had one, in seconds.
pub const DEFAULT_TIMEOUT: &str = "180";

/// Port assigned to functions that never had one.
pub const DEFAULT_PORT: u16 = 8080;

#[derive(Debug, Clone, Copy, serde::Deserialize, serde::Serialize, PartialEq, Eq, Default)]
pub enum ContentType {
    /// Source code stored verbatim.
    #[default]
    #[serde(rename = "text")]
    Text,
    /// Binary payload, stored base64-encoded.
    #[serde(rename = "base64")]
    Base64,
    /// Zip archive, stored base64-encoded.
    #[serde(rename = "base64+zip")]
    Base64Zip,
}

impl std::fmt::Display for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                ContentType::Text => "text",
                ContentType::Base64 => "base64",
                ContentType::Base64Zip => "base64+zip",
            }
        )
    }
}

#[derive(Debug, Clone, serde::Deserialize, serde::Serialize, PartialEq, Eq, Default)]
pub struct ResourceRequests {
    /// CPU quantity, e.g., `100m`, kept as given by the user.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpu: Option<String>,
    /// Memory quantity, e.g., `128Mi`, kept as given by the user.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory: Option<String>,
}

#[derive(Debug, Clone, serde::Deserialize, serde::Serialize, PartialEq, Eq)]
pub struct ServiceSpec {
    /// Expose the function without a single service IP and load balancing.
    pub headless: bool,
    /// Port where the function is exposed, in [1, 65535].
    pub port: u16,
}

impl Default for ServiceSpec {
    fn default() -> Self {
        Self {
            headless: false,
            port: DEFAULT_PORT,
        }
    }
}

#[derive(Debug, Clone, serde::Deserialize, serde::Serialize, PartialEq, Eq)]
pub struct EnvVar {
    pub name: String,
    pub value: String,
}

impl std::fmt::Display for EnvVar {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}={}", self.name, self.value)
    }
}

/// Complete declarative record of a deployed function, as kept by the
/// descriptor store.
#[derive(Debug, Clone, serde::Deserialize, serde::Serialize, PartialEq, Eq)]
pub struct FunctionDescriptor {
    /// Function name, immutable.
    pub name: String,
    /// Namespace of the function, immutable.
    pub namespace: String,
    /// Runtime identifier, e.g., `python3.6`.
    pub runtime: String,
    /// Entry point, in the form `module.function`.
    pub handler: String,
    /// Inline source code (if present).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function: Option<String>,
    /// Digest of the source code, in the form `sha256:<hex>`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checksum: Option<String>,
    /// Encoding of the source code.
    #[serde(default)]
    pub function_content_type: ContentType,
    /// Dependency manifest, e.g., the content of a `requirements.txt`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deps: Option<String>,
    /// Custom image replacing the default one of the runtime.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runtime_image: Option<String>,
    #[serde(default)]
    pub resources: ResourceRequests,
    /// Maximum execution time, in seconds.
    pub timeout: String,
    #[serde(default)]
    pub service: ServiceSpec,
    #[serde(default)]
    pub labels: std::collections::BTreeMap<String, String>,
    /// Environment variables, in order. The same name may appear more than once.
    #[serde(default)]
    pub env: Vec<EnvVar>,
    /// Names of the secrets mounted into the function's container.
    #[serde(default)]
    pub secrets: std::collections::BTreeSet<String>,
    /// Store version observed when the descriptor was fetched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_version: Option<String>,
}

impl FunctionDescriptor {
    /// Descriptor with the given identity, runtime and handler, all other
    /// fields taking their default values.
    pub fn new(name: &str, namespace: &str, runtime: &str, handler: &str) -> Self {
        Self {
            name: name.to_string(),
            namespace: namespace.to_string(),
            runtime: runtime.to_string(),
            handler: handler.to_string(),
            function: None,
            checksum: None,
            function_content_type: ContentType::default(),
            deps: None,
            runtime_image: None,
            resources: ResourceRequests::default(),
            timeout: DEFAULT_TIMEOUT.to_string(),
            service: ServiceSpec::default(),
            labels: std::collections::BTreeMap::new(),
            env: vec![],
            secrets: std::collections::BTreeSet::new(),
            resource_version: None,
        }
    }

    /// Key of the descriptor in the store.
    pub fn key(&self) -> (String, String) {
        (self.name.clone(), self.namespace.clone())
    }
}

impl std::fmt::Display for FunctionDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "{}/{} runtime {}, handler {}, code {}, timeout {}, cpu {}, memory {}, headless {}, port {}, labels [{}], env [{}], secrets [{}]",
            self.namespace,
            self.name,
            self.runtime,
            self.handler,
            self.function_content_type,
            self.timeout,
            self.resources.cpu.as_deref().unwrap_or("-"),
            self.resources.memory.as_deref().unwrap_or("-"),
            self.service.headless,
            self.service.port,
            self.labels.iter().map(|(k, v)| format!("{}={}", k, v)).collect::<Vec<String>>().join(","),
            self.env.iter().map(|x| x.to_string()).collect::<Vec<String>>().join(","),
            self.secrets.iter().cloned().collect::<Vec<String>>().join(",")
        )
    }
}
