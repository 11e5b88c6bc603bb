mod codec;
mod config;

pub use codec::{CodecConfig, DecodeStrategy};
pub use config::Config;
