pub mod context;
pub mod snapshot;

pub use context::*;
pub use snapshot::*;
