use std::path::PathBuf;

use clap::Parser;
use log::kv::{ToValue, Value};

use crate::conf::DecodeStrategy;

/// Decode a file of Native-format blocks and print one JSON object per row.
#[derive(Parser, Debug, PartialEq)]
#[command(version, about)]
pub struct CliArgs {
    #[arg(short, long)]
    pub config: Option<String>,

    /// Override the decode strategy from the config file.
    #[arg(short, long, value_enum)]
    pub strategy: Option<DecodeStrategy>,

    /// File holding one or more concatenated Native blocks.
    pub input: PathBuf,
}

impl ToValue for CliArgs {
    fn to_value(&self) -> Value<'_> {
        Value::from_debug(self)
    }
}
