use std::path::Path;

use anyhow::Context;
use classgate::ClassGateConfig;
use figment::Figment;
use figment::providers::{Env, Format, Yaml};
use serde::Deserialize;
use static_stores_plugin::StaticStoresConfig;

/// Environment variables with this prefix override file values.
/// `__` separates nested keys: `CLASSGATE_GATE__SESSION_TENANT=open`.
pub const ENV_PREFIX: &str = "CLASSGATE_";

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    /// Socket address to bind, e.g. `127.0.0.1:8087`.
    pub listen: String,

    pub logging: LoggingConfig,

    pub gate: ClassGateConfig,

    pub stores: StaticStoresConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: "127.0.0.1:8087".to_owned(),
            logging: LoggingConfig::default(),
            gate: ClassGateConfig::default(),
            stores: StaticStoresConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// Default filter directive; `RUST_LOG` takes precedence.
    pub level: String,

    /// Emit JSON lines instead of human-readable output.
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            json: false,
        }
    }
}

/// Load the YAML file at `path` (if any), then apply environment overrides.
///
/// # Errors
///
/// Fails when the file cannot be parsed or a value has the wrong shape.
pub fn load(path: Option<&Path>) -> anyhow::Result<ServerConfig> {
    let mut figment = Figment::new();
    if let Some(path) = path {
        anyhow::ensure!(path.exists(), "config file {} does not exist", path.display());
        figment = figment.merge(Yaml::file(path));
    }
    figment
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
        .extract()
        .context("invalid classgate configuration")
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn loads_yaml_over_defaults() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(
            file,
            r#"
listen: "0.0.0.0:9000"
logging:
  json: true
gate:
  session_tenant: guests
  identity_provider:
    issuer: "https://idp.example.com/"
    audience: "https://api.classgate.dev"
stores:
  projects:
    - id: p-1
      tenant: guests
      owner_id: stu-1
"#
        )
        .unwrap();

        let config = load(Some(file.path())).unwrap();

        assert_eq!(config.listen, "0.0.0.0:9000");
        assert!(config.logging.json);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.gate.session_tenant, "guests");
        assert_eq!(config.gate.path_params.tenant, "class_id");
        assert_eq!(config.stores.projects.len(), 1);
        config.gate.validate().unwrap();
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(file, "gate:\n  sesion_tenant: typo").unwrap();

        assert!(load(Some(file.path())).is_err());
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(load(Some(Path::new("/nonexistent/classgate.yaml"))).is_err());
    }
}
