use std::fs;

use anyhow::{Context, Result};
use inchi_forge::{EngineConfig, InchiEngine, LibInchi};

use crate::cli::EngineOptions;

/// Loads the `--config` file, if any, and applies the command-line flags on top.
///
/// Flags only switch settings on; they never turn off what the file enables.
pub fn build_engine_config(opts: &EngineOptions) -> Result<EngineConfig> {
    let mut config = match &opts.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("Failed to read engine config: {}", path.display()))?;
            EngineConfig::from_toml(&text)
                .with_context(|| format!("Invalid engine config: {}", path.display()))?
        }
        None => EngineConfig::default(),
    };

    config.standard |= opts.standard;
    config.key_extensions |= opts.extensions;
    config.strict_check |= opts.strict;

    Ok(config)
}

/// Builds an engine over the system library.
pub fn build_engine(opts: &EngineOptions) -> Result<InchiEngine<LibInchi>> {
    let backend = if opts.serialize {
        LibInchi::serialized()
    } else {
        LibInchi::new()
    };
    Ok(InchiEngine::with_config(backend, build_engine_config(opts)?))
}

/// The per-call options given with `--options`.
pub fn call_options(opts: &EngineOptions) -> &str {
    opts.options.as_deref().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use inchi_forge::InchiOption;
    use std::io::Write;

    fn options() -> EngineOptions {
        EngineOptions {
            config: None,
            options: None,
            standard: false,
            extensions: false,
            strict: false,
            serialize: false,
        }
    }

    #[test]
    fn defaults_without_file_or_flags() {
        assert_eq!(build_engine_config(&options()).unwrap(), EngineConfig::default());
    }

    #[test]
    fn flags_switch_settings_on() {
        let opts = EngineOptions {
            standard: true,
            extensions: true,
            strict: true,
            ..options()
        };
        let config = build_engine_config(&opts).unwrap();
        assert!(config.standard);
        assert!(config.key_extensions);
        assert!(config.strict_check);
    }

    #[test]
    fn file_settings_survive_unset_flags() {
        let path = std::env::temp_dir().join(format!("iforge-config-{}.toml", std::process::id()));
        let mut file = fs::File::create(&path).unwrap();
        writeln!(file, "options = [\"FixedH\"]\nkey_extensions = true").unwrap();
        drop(file);

        let opts = EngineOptions {
            config: Some(path.clone()),
            ..options()
        };
        let config = build_engine_config(&opts);
        fs::remove_file(&path).unwrap();

        let config = config.unwrap();
        assert_eq!(config.options, vec![InchiOption::FixedH]);
        assert!(config.key_extensions);
        assert!(!config.standard);
    }

    #[test]
    fn missing_file_is_reported_with_its_path() {
        let opts = EngineOptions {
            config: Some("/nonexistent/iforge.toml".into()),
            ..options()
        };
        let err = build_engine_config(&opts).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/iforge.toml"));
    }

    #[test]
    fn call_options_default_to_empty() {
        assert_eq!(call_options(&options()), "");
    }
}
