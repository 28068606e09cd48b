// SPDX-FileCopyrightText: © 2023 Technical University of Munich, Chair of Connected Mobility
// SPDX-FileCopyrightText: © 2023 Claudio Cicconetti <c.cicconetti@iit.cnr.it>
// SPDX-License-Identifier: MIT

use fnless_api::runtime_catalog::RuntimeSpec;

#[derive(Debug, Clone, serde::Deserialize, serde::Serialize)]
pub struct CliConfig {
    /// URL of the control plane's descriptor store.
    pub store_url: String,
    /// Namespace used when none is given on the command line.
    #[serde(default)]
    pub default_namespace: String,
    #[serde(default)]
    pub basic_auth_user: Option<String>,
    #[serde(default)]
    pub basic_auth_pass: Option<String>,
    /// Runtimes that functions may use.
    #[serde(default)]
    pub runtimes: Vec<RuntimeSpec>,
}

impl CliConfig {
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        if std::fs::metadata(path).is_err() {
            return Err(anyhow::anyhow!("configuration file does not exist or cannot be accessed: {}", path));
        }
        let conf: CliConfig = toml::from_str(&std::fs::read_to_string(path)?)?;
        log::debug!("Got Config: {:?}", conf);
        Ok(conf)
    }

    pub fn runtime_catalog(&self) -> fnless_api::runtime_catalog::ConfigRuntimeCatalog {
        fnless_api::runtime_catalog::ConfigRuntimeCatalog::new(&self.runtimes)
    }

    pub fn descriptor_store(&self) -> fnless_api::http_store::HttpDescriptorStore {
        fnless_api::http_store::HttpDescriptorStore::new(&self.store_url, self.basic_auth_user.clone(), self.basic_auth_pass.clone())
    }
}

pub fn fnless_cli_default_conf() -> String {
    String::from(
        r##"store_url = "http://127.0.0.1:7021"
default_namespace = "default"
#basic_auth_user = <username>
#basic_auth_pass = <password>

[[runtimes]]
id = "python"
dep_name = "requirements.txt"
versions = [
    { name = "python27", version = "2.7" },
    { name = "python36", version = "3.6" },
]

[[runtimes]]
id = "nodejs"
dep_name = "package.json"
versions = [
    { name = "node6", version = "6" },
    { name = "node8", version = "8" },
]
"##,
    )
}
