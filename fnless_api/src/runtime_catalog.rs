// SPDX-FileCopyrightText: © 2023 Technical University of Munich, Chair of Connected Mobility
// SPDX-FileCopyrightText: © 2023 Claudio Cicconetti <c.cicconetti@iit.cnr.it>
// SPDX-License-Identifier: MIT

/// Registry of the runtimes that functions may use.
pub trait RuntimeCatalog: Sync + Send {
    /// Return true if the given runtime identifier is supported.
    fn is_valid(&self, runtime: &str) -> bool;

    /// Identifiers of all the supported runtimes, in catalog order.
    fn list_supported(&self) -> Vec<String>;
}

/// A runtime version, configured either as a plain version string, e.g.,
/// `"3.6"`, or as a table with its name and image.
#[derive(Debug, Clone, serde::Deserialize, serde::Serialize, PartialEq)]
#[serde(from = "RuntimeVersionConf")]
pub struct RuntimeVersion {
    /// Short name of the version, e.g., `python36`. May be empty.
    pub name: String,
    /// Version appended to the runtime identifier, e.g., `3.6`.
    pub version: String,
    /// Default image of this runtime version.
    pub image: Option<String>,
}

#[derive(serde::Deserialize)]
#[serde(untagged)]
enum RuntimeVersionConf {
    Version(String),
    Table {
        #[serde(default)]
        name: String,
        version: String,
        #[serde(default)]
        image: Option<String>,
    },
}

impl From<RuntimeVersionConf> for RuntimeVersion {
    fn from(conf: RuntimeVersionConf) -> Self {
        match conf {
            RuntimeVersionConf::Version(version) => Self {
                name: String::default(),
                version,
                image: None,
            },
            RuntimeVersionConf::Table { name, version, image } => Self { name, version, image },
        }
    }
}

/// A runtime family, as configured.
#[derive(Debug, Clone, serde::Deserialize, serde::Serialize, PartialEq)]
pub struct RuntimeSpec {
    /// Runtime family, e.g., `python`.
    pub id: String,
    /// Name of the dependency manifest file, e.g., `requirements.txt`.
    #[serde(default)]
    pub dep_name: String,
    pub versions: Vec<RuntimeVersion>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeEntry {
    /// Identifier used in function descriptors, e.g., `python3.6`.
    pub identifier: String,
    /// Human-readable description.
    pub display: String,
}

/// Runtime catalog built from the configured runtime families.
pub struct ConfigRuntimeCatalog {
    entries: Vec<RuntimeEntry>,
}

impl ConfigRuntimeCatalog {
    pub fn new(runtimes: &[RuntimeSpec]) -> Self {
        let mut entries = vec![];
        for runtime in runtimes {
            for version in &runtime.versions {
                let mut details = vec![];
                if !version.name.is_empty() {
                    details.push(version.name.clone());
                }
                if let Some(image) = &version.image {
                    details.push(format!("image {}", image));
                }
                if !runtime.dep_name.is_empty() {
                    details.push(format!("deps {}", runtime.dep_name));
                }
                entries.push(RuntimeEntry {
                    identifier: format!("{}{}", runtime.id, version.version),
                    display: match details.is_empty() {
                        true => format!("{} {}", runtime.id, version.version),
                        false => format!("{} {} ({})", runtime.id, version.version, details.join(", ")),
                    },
                });
            }
        }
        Self { entries }
    }

    pub fn entry(&self, runtime: &str) -> Option<&RuntimeEntry> {
        self.entries.iter().find(|x| x.identifier == runtime)
    }
}

impl RuntimeCatalog for ConfigRuntimeCatalog {
    fn is_valid(&self, runtime: &str) -> bool {
        match self.entry(runtime) {
            Some(entry) => {
                log::debug!("runtime {}: {}", runtime, entry.display);
                true
            }
            None => false,
        }
    }

    fn list_supported(&self) -> Vec<String> {
        self.entries.iter().map(|x| x.identifier.clone()).collect()
    }
}
