pub mod channel;
pub mod header;
pub mod main;
pub mod stream;

pub use channel::*;
pub use header::*;
pub use main::*;
pub use stream::*;
