// SPDX-FileCopyrightText: © 2023 Technical University of Munich, Chair of Connected Mobility
// SPDX-FileCopyrightText: © 2023 Claudio Cicconetti <c.cicconetti@iit.cnr.it>
// SPDX-License-Identifier: MIT

use base64::Engine;
use fnless_api::function_descriptor::{ContentType, EnvVar};
use fnless_api::runtime_catalog::RuntimeCatalog;
use sha2::Digest;

use crate::error::UpdateError;

/// Changes requested by the user, as given on the command line.
///
/// Empty strings and empty lists mean that no change is requested.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawOverrides {
    pub namespace: Option<String>,
    pub runtime: Option<String>,
    pub handler: Option<String>,
    /// Path of the file containing the function's code.
    pub from_file: Option<String>,
    /// Path of the file containing the dependency manifest.
    pub dependencies: Option<String>,
    pub runtime_image: Option<String>,
    pub memory: Option<String>,
    pub cpu: Option<String>,
    pub timeout: Option<String>,
    pub headless: Option<bool>,
    pub port: Option<i64>,
    /// Labels, as `key=value`.
    pub labels: Vec<String>,
    pub secrets: Vec<String>,
    /// Environment variables, as `NAME=value`.
    pub env: Vec<String>,
}

/// Function code read from a file, with its encoding and checksum.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionCode {
    pub content: String,
    pub content_type: ContentType,
    pub checksum: String,
}

impl FunctionCode {
    /// Encode the raw content of the file at `path`.
    ///
    /// Zip archives and files that are not valid UTF-8 are base64-encoded.
    /// The checksum is always computed on the raw bytes.
    pub fn from_bytes(path: &std::path::Path, bytes: Vec<u8>) -> Self {
        let checksum = format!("sha256:{}", hex::encode(sha2::Sha256::digest(&bytes)));
        let is_zip = path.extension().map_or(false, |x| x.eq_ignore_ascii_case("zip"));
        let (content, content_type) = match is_zip {
            true => (base64::engine::general_purpose::STANDARD.encode(&bytes), ContentType::Base64Zip),
            false => match String::from_utf8(bytes) {
                Ok(text) => (text, ContentType::Text),
                Err(err) => (base64::engine::general_purpose::STANDARD.encode(err.as_bytes()), ContentType::Base64),
            },
        };
        Self {
            content,
            content_type,
            checksum,
        }
    }
}

/// Normalized set of changes to apply to a function descriptor.
///
/// A field set to `None`, or an empty collection, keeps the previous value.
/// [`OverrideSet::build`] validates every field before returning, while
/// `OverrideSet::default()` is the empty set that requests no change.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OverrideSet {
    pub(crate) runtime: Option<String>,
    pub(crate) handler: Option<String>,
    pub(crate) code: Option<FunctionCode>,
    pub(crate) deps: Option<String>,
    pub(crate) runtime_image: Option<String>,
    pub(crate) cpu: Option<String>,
    pub(crate) memory: Option<String>,
    pub(crate) timeout: Option<String>,
    pub(crate) headless: Option<bool>,
    pub(crate) port: Option<u16>,
    pub(crate) labels: Vec<(String, String)>,
    pub(crate) secrets: Vec<String>,
    pub(crate) env: Vec<EnvVar>,
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.as_ref().filter(|x| !x.is_empty()).cloned()
}

/// Check that a resource quantity is a decimal number with an optional
/// SI (`m`, `k`, `M`, ...) or binary (`Ki`, `Mi`, ...) suffix.
pub fn is_valid_quantity(quantity: &str) -> bool {
    let re = regex::Regex::new(r"^([0-9]+(\.[0-9]*)?|\.[0-9]+)(m|k|M|G|T|P|E|Ki|Mi|Gi|Ti|Pi|Ei)?$").unwrap();
    re.is_match(quantity)
}

fn read_file(path: &str) -> Result<Vec<u8>, UpdateError> {
    std::fs::read(path).map_err(|source| UpdateError::ReadFile {
        path: std::path::PathBuf::from(path),
        source,
    })
}

impl OverrideSet {
    /// Validate the raw overrides and turn them into an override set.
    ///
    /// The port, runtime and resource quantities are checked before any file
    /// is read. The runtime catalog is queried only if a runtime is given.
    pub fn build(raw: &RawOverrides, catalog: &dyn RuntimeCatalog) -> Result<Self, UpdateError> {
        let port = match raw.port {
            Some(port) => match u16::try_from(port) {
                Ok(port) if port >= 1 => Some(port),
                _ => return Err(UpdateError::InvalidPort(port)),
            },
            None => None,
        };

        let runtime = non_empty(&raw.runtime);
        if let Some(runtime) = &runtime {
            if !catalog.is_valid(runtime) {
                return Err(UpdateError::InvalidRuntime {
                    runtime: runtime.clone(),
                    supported: catalog.list_supported(),
                });
            }
        }

        let cpu = non_empty(&raw.cpu);
        let memory = non_empty(&raw.memory);
        for (field, quantity) in [("cpu", &cpu), ("memory", &memory)] {
            if let Some(quantity) = quantity {
                if !is_valid_quantity(quantity) {
                    return Err(UpdateError::InvalidQuantity {
                        field,
                        value: quantity.clone(),
                    });
                }
            }
        }

        // An empty manifest does not replace the previous one.
        let deps = match non_empty(&raw.dependencies) {
            Some(path) => {
                let deps = String::from_utf8(read_file(&path)?).map_err(|_| UpdateError::InvalidDependencies {
                    path: std::path::PathBuf::from(&path),
                })?;
                Some(deps).filter(|x| !x.is_empty())
            }
            None => None,
        };

        let code = match non_empty(&raw.from_file) {
            Some(path) => Some(FunctionCode::from_bytes(std::path::Path::new(&path), read_file(&path)?)),
            None => None,
        };

        let overrides = Self {
            runtime,
            handler: non_empty(&raw.handler),
            code,
            deps,
            runtime_image: non_empty(&raw.runtime_image),
            cpu,
            memory,
            timeout: non_empty(&raw.timeout),
            headless: raw.headless,
            port,
            labels: raw
                .labels
                .iter()
                .filter(|x| !x.is_empty())
                .map(|x| fnless_api::util::split_key_value(x))
                .collect(),
            secrets: raw.secrets.iter().filter(|x| !x.is_empty()).cloned().collect(),
            env: raw
                .env
                .iter()
                .filter(|x| !x.is_empty())
                .map(|x| {
                    let (name, value) = fnless_api::util::split_key_value(x);
                    EnvVar { name, value }
                })
                .collect(),
        };
        log::debug!("overrides: {:?}", overrides);
        Ok(overrides)
    }

    /// Return true if no change is requested.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use fnless_api::runtime_catalog::{ConfigRuntimeCatalog, RuntimeSpec, RuntimeVersion};

    fn catalog() -> ConfigRuntimeCatalog {
        ConfigRuntimeCatalog::new(&[RuntimeSpec {
            id: String::from("python"),
            dep_name: String::from("requirements.txt"),
            versions: vec![
                RuntimeVersion {
                    name: String::from("python27"),
                    version: String::from("2.7"),
                    image: None,
                },
                RuntimeVersion {
                    name: String::from("python36"),
                    version: String::from("3.6"),
                    image: None,
                },
            ],
        }])
    }

    fn temp_file(suffix: &str, content: &[u8]) -> String {
        let path = std::env::temp_dir().join(format!("fnless-{}{}", uuid::Uuid::new_v4(), suffix));
        std::fs::write(&path, content).unwrap();
        path.to_str().unwrap().to_string()
    }

    #[test]
    fn test_override_set_nothing_requested() {
        let raw = RawOverrides {
            namespace: Some(String::from("ns1")),
            runtime: Some(String::default()),
            handler: Some(String::default()),
            from_file: Some(String::default()),
            dependencies: Some(String::default()),
            timeout: Some(String::default()),
            labels: vec![String::default()],
            ..Default::default()
        };
        assert!(OverrideSet::build(&raw, &catalog()).unwrap().is_empty());
        assert!(OverrideSet::build(&RawOverrides::default(), &catalog()).unwrap().is_empty());
    }

    #[test]
    fn test_override_set_port_range() {
        for port in [0, -1, 65536, 100000] {
            let raw = RawOverrides {
                port: Some(port),
                ..Default::default()
            };
            match OverrideSet::build(&raw, &catalog()) {
                Err(UpdateError::InvalidPort(val)) => assert_eq!(val, port),
                other => panic!("unexpected result for port {}: {:?}", port, other),
            }
        }
        for port in [1, 8080, 65535] {
            let raw = RawOverrides {
                port: Some(port),
                ..Default::default()
            };
            assert_eq!(OverrideSet::build(&raw, &catalog()).unwrap().port, Some(port as u16));
        }
    }

    #[test]
    fn test_override_set_runtime() {
        let raw = RawOverrides {
            runtime: Some(String::from("python3.6")),
            ..Default::default()
        };
        assert_eq!(OverrideSet::build(&raw, &catalog()).unwrap().runtime, Some(String::from("python3.6")));

        let raw = RawOverrides {
            runtime: Some(String::from("ruby2.4")),
            ..Default::default()
        };
        match OverrideSet::build(&raw, &catalog()) {
            Err(UpdateError::InvalidRuntime { runtime, supported }) => {
                assert_eq!(runtime, "ruby2.4");
                assert_eq!(supported, catalog().list_supported());
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_override_set_quantities() {
        for quantity in ["100m", "0.5", "1", ".5", "128Mi", "1Gi", "2k", "1.5G"] {
            assert!(is_valid_quantity(quantity), "{}", quantity);
        }
        for quantity in ["", "m", "lots", "128MB", "1.2.3", "-1", "1 Gi"] {
            assert!(!is_valid_quantity(quantity), "{}", quantity);
        }

        let raw = RawOverrides {
            cpu: Some(String::from("100m")),
            memory: Some(String::from("128MB")),
            ..Default::default()
        };
        match OverrideSet::build(&raw, &catalog()) {
            Err(UpdateError::InvalidQuantity { field, value }) => {
                assert_eq!(field, "memory");
                assert_eq!(value, "128MB");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_override_set_dependencies() {
        let path = temp_file(".txt", b"requests==2.31.0\n");
        let raw = RawOverrides {
            dependencies: Some(path.clone()),
            ..Default::default()
        };
        assert_eq!(
            OverrideSet::build(&raw, &catalog()).unwrap().deps,
            Some(String::from("requests==2.31.0\n"))
        );
        std::fs::remove_file(&path).unwrap();

        match OverrideSet::build(&raw, &catalog()) {
            Err(UpdateError::ReadFile { path: err_path, .. }) => assert_eq!(err_path, std::path::PathBuf::from(&path)),
            other => panic!("unexpected result: {:?}", other),
        }

        let path = temp_file(".txt", b"");
        let raw = RawOverrides {
            dependencies: Some(path.clone()),
            ..Default::default()
        };
        assert_eq!(OverrideSet::build(&raw, &catalog()).unwrap().deps, None);
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_override_set_dependencies_not_utf8() {
        let path = temp_file(".txt", &[b'a', 0xff, b'b']);
        let raw = RawOverrides {
            dependencies: Some(path.clone()),
            ..Default::default()
        };
        match OverrideSet::build(&raw, &catalog()) {
            Err(UpdateError::InvalidDependencies { path: err_path }) => assert_eq!(err_path, std::path::PathBuf::from(&path)),
            other => panic!("unexpected result: {:?}", other),
        }
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_override_set_invalid_port_reads_no_file() {
        let raw = RawOverrides {
            port: Some(0),
            dependencies: Some(String::from("/this/file/does/not/exist")),
            ..Default::default()
        };
        assert!(matches!(OverrideSet::build(&raw, &catalog()), Err(UpdateError::InvalidPort(0))));
    }

    #[test]
    fn test_override_set_code() {
        let path = temp_file(".py", b"def foo(event, context):\n    return 'hello'\n");
        let raw = RawOverrides {
            from_file: Some(path.clone()),
            ..Default::default()
        };
        let code = OverrideSet::build(&raw, &catalog()).unwrap().code.unwrap();
        assert_eq!(code.content, "def foo(event, context):\n    return 'hello'\n");
        assert_eq!(code.content_type, ContentType::Text);
        assert!(code.checksum.starts_with("sha256:"));
        assert_eq!(code.checksum.len(), "sha256:".len() + 64);
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_function_code_encoding() {
        let code = FunctionCode::from_bytes(std::path::Path::new("hello.txt"), b"hello".to_vec());
        assert_eq!(code.content_type, ContentType::Text);
        assert_eq!(
            code.checksum,
            "sha256:2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
        );

        let code = FunctionCode::from_bytes(std::path::Path::new("bundle.ZIP"), b"hello".to_vec());
        assert_eq!(code.content_type, ContentType::Base64Zip);
        assert_eq!(code.content, "aGVsbG8=");

        let code = FunctionCode::from_bytes(std::path::Path::new("blob.bin"), vec![0xff, 0xfe, 0x00]);
        assert_eq!(code.content_type, ContentType::Base64);
        assert_eq!(code.content, "//4A");
    }

    #[test]
    fn test_override_set_collections() {
        let raw = RawOverrides {
            labels: vec![String::from("b=2"), String::from("tier"), String::from("expr=a=b")],
            secrets: vec![String::from("s1"), String::default(), String::from("s2")],
            env: vec![String::from("A=1"), String::from("B"), String::from("A=2")],
            ..Default::default()
        };
        let overrides = OverrideSet::build(&raw, &catalog()).unwrap();
        assert_eq!(
            overrides.labels,
            vec![
                (String::from("b"), String::from("2")),
                (String::from("tier"), String::default()),
                (String::from("expr"), String::from("a=b")),
            ]
        );
        assert_eq!(overrides.secrets, vec![String::from("s1"), String::from("s2")]);
        assert_eq!(
            overrides.env.iter().map(|x| x.to_string()).collect::<Vec<String>>(),
            vec!["A=1", "B=", "A=2"]
        );
    }
}
