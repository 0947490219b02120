//! Format-agnostic loading and saving of configuration trees

use std::path::Path;

use sophconf::{Config, InitTable, InitValue, Policy, Value};

use crate::{Error, Format, Result, io};

const IN_MEMORY: &str = "<string>";

/// Format-agnostic configuration store.
///
/// Detects the format from the file extension and converts between
/// documents and [`Config`] trees. Nested mappings become sections; every
/// other value becomes an option.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConfigStore {
    policy: Policy,
}

impl ConfigStore {
    /// Create a store that loads unprotected, untyped trees.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store whose loaded trees carry `policy` on their root node.
    ///
    /// Sections below the root keep the default policy.
    pub fn with_policy(policy: Policy) -> Self {
        Self { policy }
    }

    /// Load a configuration tree from a file.
    ///
    /// Format is detected from file extension:
    /// - `.toml` -> TOML
    /// - `.json` -> JSON
    /// - `.yaml`, `.yml` -> YAML
    pub fn load(&self, path: &Path) -> Result<Config> {
        let format = Format::from_path(path)?;
        let content = io::read_text(path)?;
        tracing::debug!(path = %path.display(), %format, "Loading config");
        self.parse(&content, format, path)
    }

    /// Parse a configuration tree from a string in the given format.
    pub fn parse_str(&self, content: &str, format: Format) -> Result<Config> {
        self.parse(content, format, Path::new(IN_MEMORY))
    }

    /// Save a configuration tree to a file.
    ///
    /// Format is determined from file extension.
    /// Uses atomic write to prevent corruption.
    pub fn save(&self, path: &Path, config: &Config) -> Result<()> {
        let format = Format::from_path(path)?;
        let content = render(config, format, path)?;
        tracing::debug!(path = %path.display(), %format, "Saving config");
        io::write_text(path, &content)
    }

    /// Render a configuration tree in the given format.
    ///
    /// TOML has no null, so trees holding [`Value::Null`] options only
    /// render as JSON or YAML.
    pub fn to_string(&self, config: &Config, format: Format) -> Result<String> {
        render(config, format, Path::new(IN_MEMORY))
    }

    fn parse(&self, content: &str, format: Format, path: &Path) -> Result<Config> {
        let parse_error = |message: String| Error::ConfigParse {
            path: path.to_path_buf(),
            format: format.to_string(),
            message,
        };

        let root: InitValue = match format {
            Format::Toml => toml::from_str::<InitTable>(content)
                .map(InitValue::Table)
                .map_err(|e| parse_error(e.to_string()))?,
            Format::Json => {
                serde_json::from_str(content).map_err(|e| parse_error(e.to_string()))?
            }
            Format::Yaml => {
                serde_yaml::from_str(content).map_err(|e| parse_error(e.to_string()))?
            }
        };

        match root {
            InitValue::Table(table) => Ok(Config::from_table_with_policy(table, self.policy)),
            // An empty YAML document
            InitValue::Value(Value::Null) => Ok(Config::with_policy(self.policy)),
            InitValue::Value(_) => Err(Error::InvalidRoot {
                path: path.to_path_buf(),
                format: format.to_string(),
            }),
        }
    }
}

fn render(config: &Config, format: Format, path: &Path) -> Result<String> {
    let serialize_error = |message: String| Error::ConfigSerialize {
        path: path.to_path_buf(),
        format: format.to_string(),
        message,
    };

    match format {
        Format::Toml => toml::to_string_pretty(config).map_err(|e| serialize_error(e.to_string())),
        Format::Json => {
            // serde_json writes NaN and infinities as null
            if let Some(option) = non_finite_option(config) {
                return Err(serialize_error(format!(
                    "option {option} holds a non-finite float"
                )));
            }
            serde_json::to_string_pretty(config)
                .map(|mut s| {
                    s.push('\n');
                    s
                })
                .map_err(|e| serialize_error(e.to_string()))
        }
        Format::Yaml => serde_yaml::to_string(config).map_err(|e| serialize_error(e.to_string())),
    }
}

/// Dotted path of the first option holding a NaN or infinite float.
fn non_finite_option(config: &Config) -> Option<String> {
    fn is_non_finite(value: &Value) -> bool {
        match value {
            Value::Float(v) => !v.is_finite(),
            Value::List(items) => items.iter().any(is_non_finite),
            _ => false,
        }
    }

    config
        .flatten()
        .into_iter()
        .find(|(_, value)| is_non_finite(value))
        .map(|(path, _)| path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn test_parse_str_toml_builds_sections() {
        let store = ConfigStore::new();
        let config = store
            .parse_str(
                "option1 = 5\n\n[section1]\noption2 = true\n\n[section1.section3]\n",
                Format::Toml,
            )
            .unwrap();

        assert_eq!(config.option("option1").unwrap(), &Value::Integer(5));
        assert_eq!(
            config.lookup("section1.option2").unwrap().as_value(),
            Some(&Value::Bool(true))
        );
        assert!(config.lookup("section1.section3").unwrap().is_section());
    }

    #[test]
    fn test_policy_applies_to_root_only() {
        let store = ConfigStore::with_policy(Policy::strict());
        let config = store
            .parse_str(r#"{"a": 1, "s": {"b": 2}}"#, Format::Json)
            .unwrap();

        assert_eq!(config.policy(), Policy::strict());
        assert_eq!(config.section("s").unwrap().policy(), Policy::default());
    }

    #[test]
    fn test_non_mapping_root_is_rejected() {
        let store = ConfigStore::new();
        let err = store.parse_str("[1, 2, 3]", Format::Json).unwrap_err();
        assert!(matches!(err, Error::InvalidRoot { .. }));
    }

    #[test]
    fn test_empty_yaml_is_empty_config() {
        let store = ConfigStore::new();
        let config = store.parse_str("", Format::Yaml).unwrap();
        assert!(config.is_empty());
    }

    #[test]
    fn test_parse_error_names_format() {
        let store = ConfigStore::new();
        let err = store.parse_str("option1 = ", Format::Toml).unwrap_err();
        match err {
            Error::ConfigParse { format, .. } => assert_eq!(format, "TOML"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_null_options_do_not_render_as_toml() {
        let mut config = Config::new();
        config.create_option("verbose", Value::Null);

        let store = ConfigStore::new();
        assert!(matches!(
            store.to_string(&config, Format::Toml),
            Err(Error::ConfigSerialize { .. })
        ));
        let json = store.to_string(&config, Format::Json).unwrap();
        assert!(json.contains("\"verbose\": null"));
    }

    #[rstest]
    #[case(f64::NAN)]
    #[case(f64::INFINITY)]
    #[case(f64::NEG_INFINITY)]
    fn test_non_finite_floats_do_not_render_as_json(#[case] v: f64) {
        let mut config = Config::new();
        config.create_section("Solver", None);
        config
            .section_mut("Solver")
            .unwrap()
            .create_option("tolerance", v);

        let err = ConfigStore::new()
            .to_string(&config, Format::Json)
            .unwrap_err();
        match err {
            Error::ConfigSerialize { message, .. } => {
                assert!(message.contains("Solver.tolerance"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_non_finite_float_in_list_does_not_render_as_json() {
        let mut config = Config::new();
        config.create_option("weights", vec![1.0, f64::INFINITY]);

        assert!(matches!(
            ConfigStore::new().to_string(&config, Format::Json),
            Err(Error::ConfigSerialize { .. })
        ));
    }

    #[test]
    fn test_non_finite_float_keeps_its_kind_in_yaml() {
        let mut config = Config::new();
        config.create_option("limit", f64::INFINITY);

        let store = ConfigStore::new();
        let text = store.to_string(&config, Format::Yaml).unwrap();
        let loaded = store.parse_str(&text, Format::Yaml).unwrap();
        assert_eq!(loaded.option("limit").unwrap(), &Value::Float(f64::INFINITY));
    }

    #[test]
    fn test_toml_datetime_loads_as_option() {
        let store = ConfigStore::new();
        let config = store
            .parse_str("when = 1979-05-27T07:32:00Z
", Format::Toml)
            .unwrap();

        assert!(config.has_option("when"));
        assert!(!config.has_section("when"));
        assert_eq!(
            config.option("when").unwrap(),
            &Value::from("1979-05-27T07:32:00Z")
        );

        let text = store.to_string(&config, Format::Toml).unwrap();
        assert!(!text.contains("$__toml_private_datetime"));
        assert!(text.contains("when = \"1979-05-27T07:32:00Z\""));
    }
}
