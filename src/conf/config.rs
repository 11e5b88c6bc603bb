use crate::{
    conf::CodecConfig,
    core::CodecError::{self, ConfigParsingError},
};
use config::Config as CConfig;
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub codec: CodecConfig,
}

impl Config {
    pub fn from_str(toml_str: &str) -> Result<Config, CodecError> {
        Self::build(CConfig::builder().add_source(config::File::from_str(
            toml_str,
            config::FileFormat::Toml,
        )))
    }

    /// Load a TOML file, then apply `CHCOL_CODEC__*` environment overrides.
    pub fn from_file(path: &str) -> Result<Config, CodecError> {
        Self::build(
            CConfig::builder()
                .add_source(config::File::new(path, config::FileFormat::Toml))
                .add_source(
                    config::Environment::with_prefix("CHCOL")
                        .prefix_separator("_")
                        .separator("__"),
                ),
        )
    }

    fn build(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<Config, CodecError> {
        builder
            .build()
            .map_err(|e| ConfigParsingError(e.to_string()))?
            .try_deserialize::<Config>()
            .map_err(|e| ConfigParsingError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conf::DecodeStrategy;

    #[test]
    fn load_correct_toml() {
        let toml = r#"
        [codec]
        decode = "portable"
        strict_types = false
        "#;
        let conf = Config::from_str(toml);
        assert_eq!(
            conf,
            Ok(Config {
                codec: CodecConfig {
                    decode: DecodeStrategy::Portable,
                    strict_types: false,
                }
            })
        );
    }

    #[test]
    fn load_empty_toml_uses_defaults() {
        let conf = Config::from_str("").unwrap();
        assert_eq!(conf, Config::default());
    }

    #[test]
    fn reject_unknown_fields() {
        let toml = r#"
        [codec]
        decode = "auto"
        key_width = 2
        "#;
        assert!(matches!(
            Config::from_str(toml),
            Err(CodecError::ConfigParsingError(_))
        ));
    }

    #[test]
    fn reject_unknown_strategy() {
        let toml = r#"
        [codec]
        decode = "simd"
        "#;
        assert!(Config::from_str(toml).is_err());
    }
}
