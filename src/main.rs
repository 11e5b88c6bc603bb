use std::io::{BufWriter, Write};

use anyhow::Context;
use chcol::column::decode;
use chcol::conf::Config;
use chcol::core::{CliArgs, setup_logging};
use chcol::dump::dump_blocks;
use clap::Parser;
use log::info;

fn main() -> anyhow::Result<()> {
    setup_logging();
    let args = CliArgs::parse();
    info!(args = args; "chcol started.");

    let mut config = match &args.config {
        Some(path) => Config::from_file(path).with_context(|| format!("loading config {path}"))?,
        None => Config::default(),
    };
    if let Some(strategy) = args.strategy {
        config.codec.decode = strategy;
    }
    decode::configure(config.codec.decode);

    let data = std::fs::read(&args.input)
        .with_context(|| format!("reading {}", args.input.display()))?;
    let stdout = std::io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let rows = dump_blocks(&data, &config.codec, &mut out)
        .with_context(|| format!("decoding {}", args.input.display()))?;
    out.flush()?;

    info!("Decoded {} rows from {}", rows, args.input.display());
    Ok(())
}
