use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Which decoder turns raw little-endian column bytes into values.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DecodeStrategy {
    /// Reinterpret buffer memory directly when the target is little-endian.
    #[default]
    Auto,
    /// Always decode with explicit little-endian reads.
    Portable,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct CodecConfig {
    #[serde(default)]
    pub decode: DecodeStrategy,
    /// Reject a column whose type name differs from the block header. When
    /// off, no check replaces it: the caller must supply a column with the
    /// same wire layout as the header type.
    #[serde(default = "CodecConfig::default_strict_types")]
    pub strict_types: bool,
}

impl CodecConfig {
    fn default_strict_types() -> bool {
        true
    }
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            decode: DecodeStrategy::default(),
            strict_types: Self::default_strict_types(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codec_default() {
        let codec = CodecConfig::default();
        assert_eq!(codec.decode, DecodeStrategy::Auto);
        assert!(codec.strict_types);
    }
}
