pub mod block;
pub mod column;
pub mod conf;
pub mod core;
pub mod dump;
pub mod dynamic;
pub mod types;

#[cfg(feature = "testutil")]
pub mod testutil;
