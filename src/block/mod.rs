pub(crate) mod format;
mod read;
mod write;

pub use read::SelectCursor;
pub use write::BlockWriter;
