pub mod channel;
pub mod file;
pub mod header;

pub use channel::*;
pub use file::*;
pub use header::*;
