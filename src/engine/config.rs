use serde::Deserialize;

use crate::codec::{Error, InchiOption, format_options};

/// Settings shared by every call an [`InchiEngine`](crate::InchiEngine) makes.
///
/// Can be loaded from TOML; missing keys take their default values.
///
/// # Examples
///
/// ```
/// use inchi_forge::{EngineConfig, InchiOption};
///
/// let config = EngineConfig::from_toml(r#"
///     options = ["Compress", "-SNon"]
///     key_extensions = true
/// "#)?;
///
/// assert_eq!(config.options, vec![InchiOption::Compress, InchiOption::SNon]);
/// assert!(config.key_extensions);
/// assert!(!config.standard);
/// # Ok::<(), inchi_forge::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Switches appended to the options of every structure call.
    pub options: Vec<InchiOption>,

    /// Use the standard-identifier entry points.
    pub standard: bool,

    /// Request the two hash extensions when deriving keys.
    pub key_extensions: bool,

    /// Check identifiers in strict mode (includes a library round trip).
    pub strict_check: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            options: Vec::new(),
            standard: false,
            key_extensions: false,
            strict_check: false,
        }
    }
}

impl EngineConfig {
    /// Parses a configuration from TOML.
    ///
    /// # Errors
    ///
    /// [`Error::ConfigParse`] for malformed TOML, unknown keys or unrecognised
    /// option names.
    pub fn from_toml(source: &str) -> Result<Self, Error> {
        Ok(toml::from_str(source)?)
    }

    /// Combines per-call options with the configured defaults.
    ///
    /// Configured switches already present in `options` are not repeated.
    pub(crate) fn merge_options(&self, options: &str) -> String {
        let mut merged = options.trim_end().to_string();
        let extra: Vec<InchiOption> = self
            .options
            .iter()
            .copied()
            .filter(|op| !mentions(options, *op))
            .collect();
        if extra.is_empty() {
            return options.to_string();
        }
        if !merged.is_empty() {
            merged.push(' ');
        }
        merged.push_str(&format_options(&extra));
        merged
    }
}

fn mentions(options: &str, op: InchiOption) -> bool {
    options
        .split_whitespace()
        .any(|token| token.parse::<InchiOption>().is_ok_and(|parsed| parsed == op))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::FLAG_CHAR;

    #[test]
    fn default_config_values() {
        let config = EngineConfig::default();
        assert!(config.options.is_empty());
        assert!(!config.standard);
        assert!(!config.key_extensions);
        assert!(!config.strict_check);
    }

    #[test]
    fn empty_toml_gives_defaults() {
        assert_eq!(EngineConfig::from_toml("").unwrap(), EngineConfig::default());
    }

    #[test]
    fn parses_all_fields() {
        let config = EngineConfig::from_toml(
            r#"
            options = ["fixedh", "/RecMet"]
            standard = true
            key_extensions = true
            strict_check = true
            "#,
        )
        .unwrap();
        assert_eq!(
            config.options,
            vec![InchiOption::FixedH, InchiOption::RecMet]
        );
        assert!(config.standard);
        assert!(config.key_extensions);
        assert!(config.strict_check);
    }

    #[test]
    fn errors_on_unknown_option() {
        let err = EngineConfig::from_toml(r#"options = ["Bogus"]"#).unwrap_err();
        assert!(matches!(err, Error::ConfigParse(_)));
    }

    #[test]
    fn errors_on_unknown_key() {
        let err = EngineConfig::from_toml("verbose = true").unwrap_err();
        assert!(matches!(err, Error::ConfigParse(_)));
    }

    #[test]
    fn errors_on_invalid_toml() {
        assert!(EngineConfig::from_toml("not valid [[[toml").is_err());
    }

    #[test]
    fn merge_appends_configured_options() {
        let config = EngineConfig {
            options: vec![InchiOption::Compress],
            ..Default::default()
        };
        assert_eq!(config.merge_options(""), format!("{FLAG_CHAR}Compress "));
        assert_eq!(
            config.merge_options("-SNon "),
            format!("-SNon {FLAG_CHAR}Compress ")
        );
    }

    #[test]
    fn merge_skips_options_already_present() {
        let config = EngineConfig {
            options: vec![InchiOption::Compress, InchiOption::FixedH],
            ..Default::default()
        };
        assert_eq!(
            config.merge_options("/compress"),
            format!("/compress {FLAG_CHAR}FixedH ")
        );
        assert_eq!(config.merge_options("-Compress -FixedH"), "-Compress -FixedH");
    }

    #[test]
    fn merge_without_configured_options_is_identity() {
        let config = EngineConfig::default();
        assert_eq!(config.merge_options("-SNon "), "-SNon ");
    }
}
